pub mod listener;
pub mod snapshot;
pub mod speed;
pub mod state;
pub mod streams;

use std::time::Duration;

pub use listener::{Callbacks, PacerEvent, PacerListener};
pub use snapshot::Snapshot;
pub use speed::SpeedBounds;
pub use state::{PlaybackPhase, PlaybackState, ReadingMode};
pub use streams::Streams;

use crate::bionic::BionicWord;
use crate::chunking::Chunk;
use crate::clock::{Clock, SystemClock};
use crate::session::SessionConfig;
use crate::timer::TimerSlot;

const ELAPSED_INTERVAL: Duration = Duration::from_secs(1);
const NANOS_PER_MINUTE: u64 = 60_000_000_000;

/// Paces a text at a words-per-minute rate.
///
/// The pacer never spawns threads or sleeps. It keeps two single-shot timers
/// (one for advancing, one for the elapsed-seconds counter) as deadlines on
/// its own clock; the owner calls [`Pacer::poll`] whenever
/// [`Pacer::time_until_next_timer`] has run out.
///
/// Advancing is drift corrected: each re-arm is computed from an absolute
/// expected time that moves forward by exactly one delay per step, so a late
/// fire shortens the next wait instead of pushing every later step back.
pub struct Pacer<C: Clock = SystemClock> {
    config: SessionConfig,
    clock: C,
    state: PlaybackState,
    streams: Streams,
    advance: TimerSlot,
    elapsed: TimerSlot,
    expected_time: Option<Duration>,
    listener: Option<Box<dyn PacerListener>>,
    disposed: bool,
}

impl Pacer<SystemClock> {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }
}

impl<C: Clock> Pacer<C> {
    pub fn with_clock(config: SessionConfig, clock: C) -> Self {
        let streams = Streams::derive(&config);
        let speed = config.speed_bounds.clamp(i64::from(config.initial_speed_wpm));
        if speed != config.initial_speed_wpm {
            log::warn!(
                "initial speed {} wpm clamped to {speed}",
                config.initial_speed_wpm
            );
        }
        let state = PlaybackState::idle(config.mode, speed);

        Self {
            config,
            clock,
            state,
            streams,
            advance: TimerSlot::new(),
            elapsed: TimerSlot::new(),
            expected_time: None,
            listener: None,
            disposed: false,
        }
    }

    pub fn with_listener(mut self, listener: impl PacerListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn set_listener(&mut self, listener: Box<dyn PacerListener>) {
        if !self.disposed {
            self.listener = Some(listener);
        }
    }

    // ---- actions ----------------------------------------------------------

    /// Starts from the first item. Also restarts a completed run.
    pub fn start(&mut self) {
        if self.disposed {
            return;
        }
        if self.total_items() == 0 {
            log::debug!("start ignored: nothing to read");
            return;
        }

        self.state.position = 0;
        self.state.is_complete = false;
        self.state.is_playing = true;
        self.state.is_paused = false;
        self.state.elapsed_secs = 0;

        log::info!(
            "reading {} items in {} mode at {} wpm",
            self.total_items(),
            self.state.mode,
            self.state.speed_wpm
        );

        self.publish_progress();
        let now = self.clock.now();
        self.anchor_schedule(now);
        self.elapsed.arm(now + ELAPSED_INTERVAL);
    }

    pub fn pause(&mut self) {
        if self.disposed || self.phase() != PlaybackPhase::Playing {
            return;
        }

        self.state.is_paused = true;
        self.advance.cancel();
        self.elapsed.cancel();
        self.expected_time = None;
        log::debug!("paused at {}", self.state.position);
    }

    pub fn resume(&mut self) {
        if self.disposed || self.phase() != PlaybackPhase::Paused {
            return;
        }

        self.state.is_paused = false;
        let now = self.clock.now();
        self.anchor_schedule(now);
        self.elapsed.arm(now + ELAPSED_INTERVAL);
        log::debug!("resumed at {}", self.state.position);
    }

    pub fn toggle_pause(&mut self) {
        match self.phase() {
            PlaybackPhase::Playing => self.pause(),
            PlaybackPhase::Paused => self.resume(),
            PlaybackPhase::Idle | PlaybackPhase::Complete => {}
        }
    }

    /// Back to the idle shape, keeping mode and speed.
    pub fn reset(&mut self) {
        if self.disposed {
            return;
        }
        self.cancel_timers();
        self.state = PlaybackState::idle(self.state.mode, self.state.speed_wpm);
        self.publish_progress();
        log::debug!("reset");
    }

    /// Switches stream. Playback returns to the idle shape since positions
    /// in one stream mean nothing in another.
    pub fn set_mode(&mut self, mode: ReadingMode) {
        if self.disposed {
            return;
        }
        self.cancel_timers();
        self.state = PlaybackState::idle(mode, self.state.speed_wpm);
        self.publish_progress();
        log::debug!("mode set to {mode}, {} items", self.total_items());
    }

    /// Clamped to the configured bounds. A step already in flight keeps its
    /// deadline; the new speed applies from the next one.
    pub fn set_speed(&mut self, wpm: i64) {
        if self.disposed {
            return;
        }
        let bounds = self.config.speed_bounds;
        let speed = bounds.clamp(wpm);
        if !bounds.contains(wpm) {
            log::warn!(
                "speed {wpm} wpm outside {}..={}, using {speed}",
                bounds.min_wpm(),
                bounds.max_wpm()
            );
        }
        self.state.speed_wpm = speed;
    }

    pub fn speed_up(&mut self) {
        let step = i64::from(self.config.speed_bounds.step_wpm());
        self.set_speed(i64::from(self.state.speed_wpm) + step);
    }

    pub fn slow_down(&mut self) {
        let step = i64::from(self.config.speed_bounds.step_wpm());
        self.set_speed(i64::from(self.state.speed_wpm) - step);
    }

    /// Jumps to `position`, clamped into the active stream.
    pub fn set_position(&mut self, position: i64) {
        if self.disposed {
            return;
        }
        let total = self.total_items();
        if total == 0 {
            return;
        }

        let last = i64::try_from(total - 1).unwrap_or(i64::MAX);
        let clamped = position.clamp(0, last);
        if clamped != position {
            log::warn!("position {position} clamped to {clamped}");
        }

        self.state.position = usize::try_from(clamped).unwrap_or(0);
        self.publish_progress();
        if self.state.is_running() {
            let now = self.clock.now();
            self.anchor_schedule(now);
        }
    }

    /// Goes back one item. A no-op at the first item.
    pub fn step_back(&mut self) {
        if self.disposed || self.state.position == 0 {
            return;
        }

        self.state.position -= 1;
        self.publish_progress();
        if self.state.is_running() {
            let now = self.clock.now();
            self.anchor_schedule(now);
        }
    }

    /// Cancels both timers and detaches the listener. Every later call is a
    /// no-op, so nothing fires into an owner that stopped listening.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.cancel_timers();
        self.state.is_playing = false;
        self.listener = None;
        self.disposed = true;
        log::debug!("disposed");
    }

    // ---- timers -----------------------------------------------------------

    /// Fires whatever timers are due. At most one advance happens per call,
    /// so an owner that renders between polls shows every item.
    ///
    /// Returns true if anything observable changed.
    pub fn poll(&mut self) -> bool {
        if self.disposed {
            return false;
        }

        let now = self.clock.now();
        let mut changed = false;

        while let Some(deadline) = self.elapsed.take_due(now) {
            self.state.elapsed_secs += 1;
            self.elapsed.arm(deadline + ELAPSED_INTERVAL);
            changed = true;
        }

        if self.advance.take_due(now).is_some() {
            self.tick();
            changed = true;
        }

        changed
    }

    /// One step of the advance loop: complete if the last item is showing,
    /// otherwise advance and re-arm against the expected schedule.
    pub fn tick(&mut self) {
        if self.disposed || !self.state.is_running() {
            return;
        }

        let now = self.clock.now();
        let total = self.total_items();

        if self.state.position + 1 >= total {
            self.complete();
            return;
        }

        self.state.position += 1;
        self.publish_progress();

        let delay = self.tick_delay();
        let expected = self.expected_time.unwrap_or(now) + delay;
        self.expected_time = Some(expected);

        let next_timeout = expected.saturating_sub(now);
        self.advance.arm(now + next_timeout);
        log::trace!(
            "advanced to {}, next in {}ms",
            self.state.position,
            next_timeout.as_millis()
        );
    }

    fn complete(&mut self) {
        self.cancel_timers();
        self.state.is_complete = true;
        self.state.is_playing = false;
        self.state.is_paused = false;

        log::info!(
            "finished {} items in {}s",
            self.total_items(),
            self.state.elapsed_secs
        );
        if let Some(listener) = self.listener.as_mut() {
            listener.on_complete();
        }
    }

    /// Restarts the drift schedule one delay from `now`.
    fn anchor_schedule(&mut self, now: Duration) {
        let expected = now + self.tick_delay();
        self.expected_time = Some(expected);
        self.advance.arm(expected);
    }

    fn cancel_timers(&mut self) {
        self.advance.cancel();
        self.elapsed.cancel();
        self.expected_time = None;
    }

    fn publish_progress(&mut self) {
        let progress = self.progress();
        if let Some(listener) = self.listener.as_mut() {
            listener.on_progress(progress);
        }
    }

    // ---- read model -------------------------------------------------------

    /// Dwell time of one step. In chunk mode one step shows `chunk_size`
    /// words, so the delay scales with it to keep the effective rate.
    pub fn tick_delay(&self) -> Duration {
        let wpm = u64::from(self.state.speed_wpm.max(1));
        let base = Duration::from_nanos(NANOS_PER_MINUTE / wpm);
        match self.state.mode {
            ReadingMode::Chunk => {
                let size = u32::try_from(self.config.chunk_size).unwrap_or(u32::MAX);
                base.saturating_mul(size)
            }
            ReadingMode::Word | ReadingMode::Bionic => base,
        }
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.advance.deadline(), self.elapsed.deadline()) {
            (Some(a), Some(e)) => Some(a.min(e)),
            (a, e) => a.or(e),
        }
    }

    pub fn advance_deadline(&self) -> Option<Duration> {
        self.advance.deadline()
    }

    pub fn time_until_next_timer(&self) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_sub(self.clock.now()))
    }

    /// Absolute time the next step is scheduled for, if playing.
    pub fn expected_time(&self) -> Option<Duration> {
        self.expected_time
    }

    pub fn total_items(&self) -> usize {
        match self.state.mode {
            ReadingMode::Chunk => self.streams.chunks.len(),
            ReadingMode::Word | ReadingMode::Bionic => self.streams.words.len(),
        }
    }

    pub fn progress(&self) -> f64 {
        let total = self.total_items();
        if total == 0 {
            return 0.0;
        }
        (self.state.position + 1) as f64 * 100.0 / total as f64
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.state.phase()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn mode(&self) -> ReadingMode {
        self.state.mode
    }

    pub fn speed_wpm(&self) -> u32 {
        self.state.speed_wpm
    }

    pub fn position(&self) -> usize {
        self.state.position
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.state.elapsed_secs
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn words(&self) -> &[String] {
        &self.streams.words
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.streams.chunks
    }

    pub fn bionic_words(&self) -> &[BionicWord] {
        &self.streams.bionic
    }

    fn in_word_stream(&self) -> bool {
        self.state.mode != ReadingMode::Chunk
    }

    pub fn current_word(&self) -> Option<&str> {
        if !self.in_word_stream() {
            return None;
        }
        self.streams
            .words
            .get(self.state.position)
            .map(String::as_str)
    }

    pub fn current_bionic(&self) -> Option<&BionicWord> {
        if !self.in_word_stream() {
            return None;
        }
        self.streams.bionic.get(self.state.position)
    }

    pub fn current_chunk(&self) -> Option<&Chunk> {
        self.chunk_at(Some(self.state.position))
    }

    pub fn previous_chunk(&self) -> Option<&Chunk> {
        self.chunk_at(self.state.position.checked_sub(1))
    }

    pub fn next_chunk(&self) -> Option<&Chunk> {
        self.chunk_at(self.state.position.checked_add(1))
    }

    fn chunk_at(&self, index: Option<usize>) -> Option<&Chunk> {
        if self.in_word_stream() {
            return None;
        }
        self.streams.chunks.get(index?)
    }

    /// Seconds left if playback ran from here without interruption.
    pub fn remaining_secs(&self) -> u64 {
        let left = self.total_items().saturating_sub(self.state.position);
        let left = u32::try_from(left).unwrap_or(u32::MAX);
        self.tick_delay().saturating_mul(left).as_secs()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.state.mode,
            phase: self.phase(),
            speed_wpm: self.state.speed_wpm,
            is_paused: self.state.is_paused,
            is_playing: self.state.is_playing,
            is_complete: self.state.is_complete,
            position: self.state.position,
            total_items: self.total_items(),
            progress: self.progress(),
            elapsed_secs: self.state.elapsed_secs,
            remaining_secs: self.remaining_secs(),
            current_word: self.current_word().map(str::to_owned),
            current_bionic: self.current_bionic().cloned(),
            previous_chunk: self.previous_chunk().cloned(),
            current_chunk: self.current_chunk().cloned(),
            next_chunk: self.next_chunk().cloned(),
        }
    }
}

impl<C: Clock> Drop for Pacer<C> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<C: Clock> std::fmt::Debug for Pacer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pacer")
            .field("state", &self.state)
            .field("total_items", &self.total_items())
            .field("advance", &self.advance)
            .field("elapsed", &self.elapsed)
            .field("expected_time", &self.expected_time)
            .field("disposed", &self.disposed)
            .finish()
    }
}
