use endclock::{
    config::{SettingField, Settings},
    format::{format_finish, format_optional_duration, format_time_of_day},
    round::RoundSnapshot,
    tracker::SegmentStats,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use super::Palette;

pub fn render_settings(
    settings: &Settings,
    selected: SettingField,
    area: Rect,
    buf: &mut Buffer,
    palette: &Palette,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Settings table
            Constraint::Length(3), // Instructions
        ])
        .split(area);

    Paragraph::new("endclock · archery round timer")
        .block(Block::default().borders(Borders::ALL))
        .style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let rows: Vec<Row> = SettingField::ALL
        .iter()
        .map(|field| {
            let style = if *field == selected {
                Style::default()
                    .bg(palette.highlight_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.fg)
            };
            Row::new(vec![
                Cell::from(field.label()),
                Cell::from(settings.value_text(*field)),
            ])
            .style(style)
        })
        .collect();

    let round = &settings.round;
    let title = format!(
        "Round: {} ends x {} line(s) = {} segments",
        round.total_ends(),
        round.line_count,
        round.total_segments()
    );

    Table::new(rows, [Constraint::Length(18), Constraint::Min(12)])
        .block(Block::default().borders(Borders::ALL).title(title))
        .render(chunks[1], buf);

    Paragraph::new(
        "↑/↓ select  ←/→ adjust  (p) preset  (t) theme\ns/enter start  (q) quit",
    )
    .style(
        Style::default()
            .fg(palette.dim)
            .add_modifier(Modifier::ITALIC),
    )
    .alignment(Alignment::Center)
    .render(chunks[2], buf);
}

pub fn render_stats(stats: &SegmentStats, area: Rect, buf: &mut Buffer, palette: &Palette) {
    let label = Style::default().fg(palette.dim);
    let value = Style::default().fg(palette.fg).add_modifier(Modifier::BOLD);

    let started = stats
        .started_at
        .map(format_time_of_day)
        .unwrap_or_else(|| "--:--".to_string());

    let lines = vec![
        Line::from(vec![
            Span::styled("Started at: ", label),
            Span::styled(started, value),
            Span::raw("   "),
            Span::styled("Total: ", label),
            Span::styled(format_optional_duration(stats.elapsed_ms), value),
        ]),
        Line::from(vec![
            Span::styled("Last End: ", label),
            Span::styled(format_optional_duration(stats.last_ms), value),
            Span::raw("   "),
            Span::styled("Avg End: ", label),
            Span::styled(
                format_optional_duration(stats.average_ms.map(|avg| avg as u64)),
                value,
            ),
            Span::raw("   "),
            Span::styled("Est Finish: ", label),
            Span::styled(format_finish(stats.finish), value),
        ]),
    ];

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::TOP).title("Stats"))
        .alignment(Alignment::Center)
        .render(area, buf);
}

/// Key legend; actions the round would reject right now are dimmed
pub fn render_round_legend(snap: &RoundSnapshot, area: Rect, buf: &mut Buffer, palette: &Palette) {
    let enabled = Style::default().fg(palette.fg).add_modifier(Modifier::ITALIC);
    let disabled = Style::default()
        .fg(palette.dim)
        .add_modifier(Modifier::DIM);

    let pause_label = if snap.paused { "(d) resume" } else { "(d) pause" };
    let items = [
        (pause_label, snap.can_pause),
        ("(f) finish now", snap.can_finish_now),
        ("(space) next line/end", snap.can_advance),
        ("(j) restart end", snap.can_restart),
        ("(k) reset", true),
        ("(q) quit", true),
    ];

    let mut spans = Vec::with_capacity(items.len() * 2);
    for (i, (text, on)) in items.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*text, if *on { enabled } else { disabled }));
    }

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buf);
}
