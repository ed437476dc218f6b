use itertools::Itertools;
use pacer::{
    clock::Clock,
    scheduler::{PlaybackPhase, ReadingMode, Snapshot},
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

const HELP: &str = "(space) play/pause  (s)tart  (r)eset  ←/→ step  ↑/↓ speed  (1) word (2) bionic (3) chunk  (?) help  (esc) quit";

pub fn draw<C: Clock>(app: &App<C>, f: &mut Frame) {
    f.render_widget(app, f.area());
}

/// `m:ss` for the status line
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Lines a piece of text needs when wrapped to `width` columns.
fn occupied_lines(text: &str, width: u16) -> u16 {
    if width == 0 || text.width() <= width as usize {
        return 1;
    }
    (text.width() as f64 / width as f64).ceil() as u16
}

fn status_line(snapshot: &Snapshot, title: &str) -> String {
    let phase = match snapshot.phase {
        PlaybackPhase::Idle => "ready",
        PlaybackPhase::Playing => "reading",
        PlaybackPhase::Paused => "paused",
        PlaybackPhase::Complete => "done",
    };
    format!(
        "{title}  ·  {} mode  ·  {} wpm  ·  {phase}",
        snapshot.mode.to_string().to_lowercase(),
        snapshot.speed_wpm
    )
}

fn reading_lines(snapshot: &Snapshot) -> Vec<Line<'static>> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    match snapshot.mode {
        ReadingMode::Word => vec![Line::from(Span::styled(
            snapshot.current_word.clone().unwrap_or_default(),
            bold_style,
        ))],
        ReadingMode::Bionic => {
            let spans = snapshot
                .current_bionic
                .as_ref()
                .map(|b| {
                    vec![
                        Span::styled(b.bold.clone(), bold_style),
                        Span::styled(b.normal.clone(), dim_style),
                    ]
                })
                .unwrap_or_default();
            vec![Line::from(spans)]
        }
        ReadingMode::Chunk => {
            let render = |chunk: &Option<Vec<String>>, style: Style| {
                Line::from(Span::styled(
                    chunk.as_ref().map(|c| c.iter().join(" ")).unwrap_or_default(),
                    style,
                ))
            };
            vec![
                render(&snapshot.previous_chunk, dim_style),
                Line::default(),
                render(&snapshot.current_chunk, bold_style.fg(Color::Cyan)),
                Line::default(),
                render(&snapshot.next_chunk, dim_style),
            ]
        }
    }
}

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.pacer.snapshot();
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let lines = if snapshot.total_items == 0 {
            vec![Line::from(Span::styled("nothing to read", italic_style))]
        } else {
            reading_lines(&snapshot)
        };

        let inner_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2);
        let text_height: u16 = lines
            .iter()
            .map(|l| occupied_lines(&l.to_string(), inner_width))
            .sum();
        let help_height = if self.show_help { 3 } else { 1 };
        let free = area
            .height
            .saturating_sub(text_height + help_height + 3 + VERTICAL_MARGIN * 2);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),              // status
                Constraint::Length(free / 2),       // padding
                Constraint::Length(text_height),    // reading area
                Constraint::Min(0),                 // padding
                Constraint::Length(2),              // progress
                Constraint::Length(help_height),    // legend
            ])
            .split(area);

        Paragraph::new(Span::styled(
            status_line(&snapshot, &self.title),
            Style::default().fg(Color::Gray),
        ))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[2], buf);

        let label = format!(
            "{}/{}  ·  {:.0}%  ·  {} elapsed  ·  {} left",
            (snapshot.position + 1).min(snapshot.total_items),
            snapshot.total_items,
            snapshot.progress,
            format_clock(snapshot.elapsed_secs),
            format_clock(snapshot.remaining_secs),
        );
        Gauge::default()
            .block(Block::default().borders(Borders::TOP))
            .gauge_style(Style::default().fg(Color::Magenta))
            .ratio((snapshot.progress / 100.0).clamp(0.0, 1.0))
            .label(label)
            .render(chunks[4], buf);

        let legend = match (self.show_help, snapshot.phase) {
            (true, _) => HELP,
            (false, PlaybackPhase::Complete) => "(space) read again / (esc)ape",
            (false, PlaybackPhase::Idle) => "(space) start / (?) help / (esc)ape",
            (false, _) => "(space) pause / (?) help / (esc)ape",
        };
        Paragraph::new(Span::styled(legend, italic_style))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[5], buf);
    }
}
