use std::sync::mpsc::Sender;

/// Notifications a pacer emits while its state changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PacerEvent {
    Progress(f64),
    Complete,
}

/// Observer for progress and completion. Both hooks default to doing nothing.
pub trait PacerListener {
    /// Called synchronously whenever the position (or the stream it indexes)
    /// changes, with the new percentage.
    fn on_progress(&mut self, _percent: f64) {}

    /// Called once per run, when the last item has been shown for its full
    /// dwell time.
    fn on_complete(&mut self) {}
}

/// Forwards events into a channel; a hung-up receiver is ignored.
impl PacerListener for Sender<PacerEvent> {
    fn on_progress(&mut self, percent: f64) {
        let _ = self.send(PacerEvent::Progress(percent));
    }

    fn on_complete(&mut self) {
        let _ = self.send(PacerEvent::Complete);
    }
}

/// Closure-based listener
#[derive(Default)]
pub struct Callbacks {
    on_progress: Option<Box<dyn FnMut(f64)>>,
    on_complete: Option<Box<dyn FnMut()>>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_progress(mut self, f: impl FnMut(f64) + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

impl PacerListener for Callbacks {
    fn on_progress(&mut self, percent: f64) {
        if let Some(f) = self.on_progress.as_mut() {
            f(percent);
        }
    }

    fn on_complete(&mut self) {
        if let Some(f) = self.on_complete.as_mut() {
            f();
        }
    }
}
