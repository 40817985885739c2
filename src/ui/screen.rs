use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::Palette;
use crate::{App, AppScreen};

/// A UI Screen boundary: responsible for rendering
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Settings panel while idle, the round view otherwise
pub struct MainScreen;

impl Screen for MainScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Round view with the reset confirmation on top
pub struct ConfirmResetScreen;

impl Screen for ConfirmResetScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());

        let palette = Palette::for_theme(app.settings.theme);
        let area = centered_rect(44, 5, f.area());
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new("Reset the round? Stats will be lost.\n\n(y)es / (n)o")
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Confirm")
                        .border_style(Style::default().fg(palette.warning)),
                )
                .style(Style::default().add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center),
            area,
        );
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(width),
            Constraint::Fill(1),
        ])
        .split(vertical[1])[1]
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(app: &App) -> Box<dyn Screen> {
    match app.screen {
        AppScreen::Main => Box::new(MainScreen),
        AppScreen::ConfirmReset => Box::new(ConfirmResetScreen),
    }
}
