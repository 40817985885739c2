use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Which key map applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Round is idle, the settings panel is showing
    Setup,
    Running,
    ConfirmReset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    TogglePause,
    FinishNow,
    NextSegment,
    RestartEnd,
    RequestReset,
    ConfirmReset,
    CancelReset,
    SelectPrev,
    SelectNext,
    Increase,
    Decrease,
    CyclePreset,
    ToggleTheme,
    Quit,
}

pub fn action_for(key: KeyEvent, mode: Mode) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    let code = match key.code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    };

    match mode {
        Mode::ConfirmReset => match code {
            KeyCode::Char('y') | KeyCode::Enter => Some(Action::ConfirmReset),
            KeyCode::Char('n') | KeyCode::Esc => Some(Action::CancelReset),
            _ => None,
        },
        Mode::Setup => match code {
            KeyCode::Char('s') | KeyCode::Enter => Some(Action::Start),
            KeyCode::Up => Some(Action::SelectPrev),
            KeyCode::Down | KeyCode::Tab => Some(Action::SelectNext),
            KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::Increase),
            KeyCode::Left | KeyCode::Char('-') => Some(Action::Decrease),
            KeyCode::Char('p') => Some(Action::CyclePreset),
            KeyCode::Char('t') => Some(Action::ToggleTheme),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        },
        Mode::Running => match code {
            KeyCode::Char('d') => Some(Action::TogglePause),
            KeyCode::Char('f') => Some(Action::FinishNow),
            KeyCode::Char(' ') => Some(Action::NextSegment),
            KeyCode::Char('j') => Some(Action::RestartEnd),
            KeyCode::Char('k') => Some(Action::RequestReset),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        },
    }
}
