pub mod digits;
pub mod panels;
pub mod screen;

use endclock::{
    config::Theme,
    format::{end_label_text, last_end_text, line_label, next_up_text},
    round::{Hold, RoundSnapshot, Status},
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

/// Colours for one theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub dim: Color,
    pub accent: Color,
    pub prep: Color,
    pub shoot: Color,
    pub warning: Color,
    pub highlight_bg: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                bg: Color::Reset,
                fg: Color::White,
                dim: Color::DarkGray,
                accent: Color::Cyan,
                prep: Color::Yellow,
                shoot: Color::Green,
                warning: Color::Red,
                highlight_bg: Color::DarkGray,
            },
            Theme::Light => Self {
                bg: Color::White,
                fg: Color::Black,
                dim: Color::Gray,
                accent: Color::Blue,
                prep: Color::Rgb(176, 120, 0),
                shoot: Color::Rgb(0, 128, 0),
                warning: Color::Red,
                highlight_bg: Color::Gray,
            },
        }
    }

    fn timer_color(&self, snap: &RoundSnapshot) -> Color {
        match snap.status {
            _ if snap.paused => self.dim,
            Status::Prep => self.prep,
            Status::Shoot if snap.warning => self.warning,
            Status::Shoot => self.shoot,
            _ => self.dim,
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = Palette::for_theme(self.settings.theme);
        buf.set_style(area, Style::default().bg(palette.bg).fg(palette.fg));

        if self.round.state().status == Status::Idle {
            panels::render_settings(&self.settings, self.selected_field(), area, buf, &palette);
            return;
        }

        let snap = self.round.snapshot();
        let show_stats = matches!(snap.status, Status::Between | Status::Finished);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2),                               // end / line
                Constraint::Length(1),                               // phase
                Constraint::Min(1),                                  // timer
                Constraint::Length(if show_stats { 4 } else { 0 }), // stats
                Constraint::Length(1),                               // legend
            ])
            .split(area);

        render_header(&snap, chunks[0], buf, &palette);
        render_phase(&snap, chunks[1], buf, &palette);
        render_timer(&snap, chunks[2], buf, &palette);
        if show_stats {
            panels::render_stats(&snap.stats, chunks[3], buf, &palette);
        }
        panels::render_round_legend(&snap, chunks[4], buf, &palette);
    }
}

fn render_header(snap: &RoundSnapshot, area: Rect, buf: &mut Buffer, palette: &Palette) {
    let bold = Style::default().fg(palette.fg).add_modifier(Modifier::BOLD);
    let accent = Style::default().fg(palette.accent).add_modifier(Modifier::BOLD);

    let end_text = match (snap.status, snap.end_label, snap.next_up) {
        (Status::Finished, _, _) => "Finished".to_string(),
        (_, Some(label), Some(_)) => last_end_text(&label),
        (_, Some(label), None) => end_label_text(&label),
        (_, None, _) => "Ready".to_string(),
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(end_text, bold),
        Span::raw("   "),
        Span::styled(line_label(snap.line_count, snap.current_line), accent),
    ])];
    if let Some(next) = snap.next_up {
        lines.push(Line::from(Span::styled(next_up_text(&next), accent)));
    }

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_phase(snap: &RoundSnapshot, area: Rect, buf: &mut Buffer, palette: &Palette) {
    let phase = match snap.status {
        Status::Idle => "READY",
        Status::Prep => "PREP",
        Status::Shoot => "SHOOT",
        Status::Between => "WAITING",
        Status::Finished => "FINISHED",
    };
    let hold = match snap.hold {
        Hold::Running => "",
        Hold::Paused => "  ·  PAUSED",
        Hold::Restarted => "  ·  RESTARTED (resume or skip)",
    };

    Paragraph::new(Span::styled(
        format!("{phase}{hold}"),
        Style::default()
            .fg(palette.timer_color(snap))
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(area, buf);
}

fn render_timer(snap: &RoundSnapshot, area: Rect, buf: &mut Buffer, palette: &Palette) {
    let text = snap.display_seconds.to_string();
    let mut style = Style::default()
        .fg(palette.timer_color(snap))
        .add_modifier(Modifier::BOLD);
    if snap.paused {
        style = style.add_modifier(Modifier::DIM);
    }

    let big = digits::big_lines(&text);
    let fits = area.height >= digits::GLYPH_HEIGHT
        && big.first().map(|l| l.width()).unwrap_or(0) <= area.width as usize;

    if !fits {
        Paragraph::new(Span::styled(text, style))
            .alignment(Alignment::Center)
            .render(area, buf);
        return;
    }

    let top_pad = (area.height - digits::GLYPH_HEIGHT) / 2;
    let rect = Rect {
        y: area.y + top_pad,
        height: digits::GLYPH_HEIGHT,
        ..area
    };
    let lines: Vec<Line> = big
        .into_iter()
        .map(|l| Line::from(Span::styled(l, style)))
        .collect();

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(rect, buf);
}
