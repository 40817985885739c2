pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use endclock::{
    app_dirs::AppDirs,
    clock::SystemTimeSource,
    config::{FileSettingsStore, Preset, SettingField, Settings, SettingsStore, Theme},
    controls::{action_for, Action, Mode},
    cue::{CueSink, TerminalBell},
    round::{Round, Status},
    runtime::{CrosstermEventSource, FixedTicker, Flow, Runner, TimerEvent},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::File,
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
};
use tracing_subscriber::EnvFilter;

/// archery practice round timer
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "A terminal timer for archery practice rounds: prep and shoot intervals across practice and scoring ends, single or dual (AB/CD) lines, with live end statistics."
)]
pub struct Cli {
    /// preset to start from (custom restores your last custom values)
    #[clap(long, value_enum)]
    preset: Option<Preset>,

    /// number of shooting lines (1 = single line, 2 = AB / CD)
    #[clap(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=2))]
    lines: Option<u8>,

    /// number of scoring ends
    #[clap(short = 'e', long)]
    ends: Option<u32>,

    /// number of practice ends shot before scoring
    #[clap(long)]
    practice_ends: Option<u32>,

    /// preparation time in seconds (0 skips straight to shooting)
    #[clap(long)]
    prep: Option<u32>,

    /// shooting time in seconds
    #[clap(short = 's', long)]
    shoot: Option<u32>,

    /// seconds left at which the shoot timer turns to warning
    #[clap(short = 'w', long)]
    warning: Option<u32>,

    /// silence the prep signal
    #[clap(long)]
    no_beep_prep: bool,

    /// silence the shoot signal
    #[clap(long)]
    no_beep_shoot: bool,

    /// silence the end-of-shooting signal
    #[clap(long)]
    no_beep_end: bool,

    /// colour theme
    #[clap(long, value_enum)]
    theme: Option<Theme>,

    /// settings file to load and save instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// do not save settings changes
    #[clap(long)]
    no_save: bool,

    /// write logs to the default state directory
    #[clap(long)]
    log: bool,

    /// write logs to this file (implies --log)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn has_round_overrides(&self) -> bool {
        self.lines.is_some()
            || self.ends.is_some()
            || self.practice_ends.is_some()
            || self.prep.is_some()
            || self.shoot.is_some()
            || self.warning.is_some()
            || self.no_beep_prep
            || self.no_beep_shoot
            || self.no_beep_end
    }

    /// Layer command line choices over loaded settings. Explicit round values
    /// behave like manual edits and switch the preset to Custom.
    fn apply_to(&self, settings: &mut Settings) {
        if let Some(preset) = self.preset {
            settings.select_preset(preset);
        }
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        if !self.has_round_overrides() {
            return;
        }

        let mut cfg = settings.round;
        if let Some(lines) = self.lines {
            cfg.line_count = lines;
        }
        if let Some(ends) = self.ends {
            cfg.scoring_ends = ends;
        }
        if let Some(practice) = self.practice_ends {
            cfg.practice_ends = practice;
        }
        if let Some(prep) = self.prep {
            cfg.prep_secs = prep;
        }
        if let Some(shoot) = self.shoot {
            cfg.shoot_secs = shoot;
        }
        if let Some(warning) = self.warning {
            cfg.warning_threshold_secs = warning;
        }
        cfg.beep_on_prep &= !self.no_beep_prep;
        cfg.beep_on_shoot &= !self.no_beep_shoot;
        cfg.beep_on_end_complete &= !self.no_beep_end;

        settings.round = cfg;
        settings.custom = cfg;
        settings.preset = Preset::Custom;
    }

    fn log_path(&self) -> Option<PathBuf> {
        match (&self.log_file, self.log) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => AppDirs::log_path(),
            (None, false) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Main,
    ConfirmReset,
}

pub struct App {
    pub settings: Settings,
    pub round: Round<SystemTimeSource>,
    pub screen: AppScreen,
    pub selected: usize,
    store: Option<FileSettingsStore>,
}

impl App {
    pub fn new(settings: Settings, store: Option<FileSettingsStore>) -> Self {
        Self {
            round: Round::new(settings.round, SystemTimeSource::new()),
            settings,
            screen: AppScreen::Main,
            selected: 0,
            store,
        }
    }

    pub fn mode(&self) -> Mode {
        match (self.screen, self.round.state().status) {
            (AppScreen::ConfirmReset, _) => Mode::ConfirmReset,
            (AppScreen::Main, Status::Idle) => Mode::Setup,
            (AppScreen::Main, _) => Mode::Running,
        }
    }

    pub fn selected_field(&self) -> SettingField {
        SettingField::ALL[self.selected % SettingField::ALL.len()]
    }

    pub fn apply(&mut self, action: Action) -> Flow {
        let round = &mut self.round;
        match action {
            Action::Quit => return Flow::Quit,
            Action::Start => {
                round.configure(self.settings.round);
                round.start_round();
            }
            Action::TogglePause => {
                round.toggle_pause();
            }
            Action::FinishNow => {
                round.finish_now();
            }
            Action::NextSegment => {
                round.next_segment();
            }
            Action::RestartEnd => {
                round.restart_end();
            }
            Action::RequestReset => {
                if round.can_reset() {
                    self.screen = AppScreen::ConfirmReset;
                }
            }
            Action::ConfirmReset => {
                round.reset();
                self.screen = AppScreen::Main;
            }
            Action::CancelReset => self.screen = AppScreen::Main,
            Action::SelectPrev => {
                let len = SettingField::ALL.len();
                self.selected = (self.selected + len - 1) % len;
            }
            Action::SelectNext => {
                self.selected = (self.selected + 1) % SettingField::ALL.len();
            }
            Action::Increase => self.edit(self.selected_field(), 1),
            Action::Decrease => self.edit(self.selected_field(), -1),
            Action::CyclePreset => self.edit(SettingField::Preset, 1),
            Action::ToggleTheme => self.edit(SettingField::Theme, 1),
        }
        Flow::Continue
    }

    fn edit(&mut self, field: SettingField, delta: i64) {
        if self.settings.edit(field, delta) {
            self.round.configure(self.settings.round);
            self.persist();
        }
    }

    fn persist(&self) {
        if let Some(store) = &self.store {
            if let Err(err) = store.save(&self.settings) {
                tracing::warn!(path = %store.path().display(), %err, "failed to save settings");
            }
        }
    }
}

fn init_tracing(path: Option<PathBuf>) {
    let Some(path) = path else {
        return;
    };
    if let Some(parent) = path.parent() {
        if let Err(err) = std::fs::create_dir_all(parent) {
            eprintln!("could not create log directory {}: {err}", parent.display());
        }
    }
    match File::create(&path) {
        Ok(file) => {
            if let Err(err) = tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
            {
                eprintln!("could not install logger: {err}");
            }
        }
        Err(err) => eprintln!("could not open log file {}: {err}", path.display()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.log_path());

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = cli
        .config
        .as_ref()
        .map(FileSettingsStore::with_path)
        .unwrap_or_default();
    let mut settings = store.load();
    cli.apply_to(&mut settings);
    if let Err(err) = settings.round.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, err).exit();
    }
    tracing::info!(preset = %settings.preset, "starting");

    let store = (!cli.no_save).then_some(store);
    let mut app = App::new(settings, store);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::frames());
    let mut bell = TerminalBell::new(io::stdout());

    terminal.draw(|f| ui(app, f))?;

    runner.run(|event| -> Result<Flow, Box<dyn Error>> {
        match event {
            TimerEvent::Key(key) => {
                if let Some(action) = action_for(key, app.mode()) {
                    if app.apply(action) == Flow::Quit {
                        return Ok(Flow::Quit);
                    }
                }
            }
            TimerEvent::Resize => {}
            TimerEvent::Tick => {
                app.round.tick();
            }
        }

        for cue in app.round.drain_cues() {
            bell.emit(cue);
        }
        terminal.draw(|f| ui(app, f))?;
        Ok(Flow::Continue)
    })
}

fn ui(app: &App, f: &mut Frame) {
    ui::screen::current_screen(app).render(app, f);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn app_with(settings: Settings) -> App {
        App::new(settings, None)
    }

    fn rendered(app: &App) -> String {
        let backend = TestBackend::new(100, 32);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(app, f)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["endclock"]);
        assert_eq!(cli.preset, None);
        assert_eq!(cli.lines, None);
        assert!(!cli.no_beep_prep);
        assert!(!cli.has_round_overrides());
        assert_eq!(cli.log_path(), None);
    }

    #[test]
    fn test_cli_rejects_three_lines() {
        assert!(Cli::try_parse_from(["endclock", "--lines", "3"]).is_err());
    }

    #[test]
    fn test_cli_preset_only_keeps_named_preset() {
        let cli = Cli::parse_from(["endclock", "--preset", "usa-outdoor"]);
        let mut settings = Settings::default();
        cli.apply_to(&mut settings);
        assert_eq!(settings.preset, Preset::UsaOutdoor);
        assert_eq!(settings.round.shoot_secs, 240);
    }

    #[test]
    fn test_cli_overrides_switch_to_custom() {
        let cli = Cli::parse_from([
            "endclock",
            "--preset",
            "usa18m",
            "-l",
            "1",
            "--shoot",
            "90",
            "--no-beep-end",
        ]);
        let mut settings = Settings::default();
        cli.apply_to(&mut settings);

        assert_eq!(settings.preset, Preset::Custom);
        assert_eq!(settings.round.line_count, 1);
        assert_eq!(settings.round.shoot_secs, 90);
        assert_eq!(settings.round.prep_secs, 10);
        assert!(!settings.round.beep_on_end_complete);
        assert_eq!(settings.custom, settings.round);
    }

    #[test]
    fn test_cli_log_file_implies_logging() {
        let cli = Cli::parse_from(["endclock", "--log-file", "/tmp/endclock-test.log"]);
        assert_eq!(cli.log_path(), Some(PathBuf::from("/tmp/endclock-test.log")));
    }

    #[test]
    fn test_init_tracing_survives_unwritable_log_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        // parent is a regular file: directory creation and file open both fail
        init_tracing(Some(blocker.join("logs").join("endclock.log")));
        init_tracing(None);
        assert!(!blocker.join("logs").exists());
    }

    #[test]
    fn test_app_modes_follow_round() {
        let mut app = app_with(Settings::default());
        assert_eq!(app.mode(), Mode::Setup);

        app.apply(Action::Start);
        assert_eq!(app.round.state().status, Status::Prep);
        assert_eq!(app.mode(), Mode::Running);

        app.apply(Action::RequestReset);
        assert_eq!(app.mode(), Mode::ConfirmReset);
        app.apply(Action::CancelReset);
        assert_eq!(app.round.state().status, Status::Prep);

        app.apply(Action::RequestReset);
        app.apply(Action::ConfirmReset);
        assert_eq!(app.round.state().status, Status::Idle);
        assert_eq!(app.mode(), Mode::Setup);
    }

    #[test]
    fn test_request_reset_ignored_when_idle() {
        let mut app = app_with(Settings::default());
        app.apply(Action::RequestReset);
        assert_eq!(app.screen, AppScreen::Main);
    }

    #[test]
    fn test_app_start_uses_edited_settings() {
        let mut app = app_with(Settings::default());
        // Lines field
        app.apply(Action::SelectNext);
        assert_eq!(app.selected_field(), SettingField::Lines);
        app.apply(Action::Decrease);
        assert_eq!(app.settings.preset, Preset::Custom);

        app.apply(Action::Start);
        assert_eq!(app.round.config().line_count, 1);
    }

    #[test]
    fn test_selection_wraps() {
        let mut app = app_with(Settings::default());
        app.apply(Action::SelectPrev);
        assert_eq!(app.selected_field(), SettingField::Theme);
        app.apply(Action::SelectNext);
        assert_eq!(app.selected_field(), SettingField::Preset);
    }

    #[test]
    fn test_quit_action() {
        let mut app = app_with(Settings::default());
        assert_eq!(app.apply(Action::Quit), Flow::Quit);
        assert_eq!(app.apply(Action::SelectNext), Flow::Continue);
    }

    #[test]
    fn test_ui_setup_screen() {
        let app = app_with(Settings::default());
        let content = rendered(&app);
        assert!(content.contains("Preset"));
        assert!(content.contains("USA 18m"));
        assert!(content.contains("start"));
    }

    #[test]
    fn test_ui_running_screen() {
        let mut app = app_with(Settings::default());
        app.apply(Action::Start);
        let content = rendered(&app);
        assert!(content.contains("Practice 1 / 2"));
        assert!(content.contains("Line AB"));
        assert!(content.contains("PREP"));
    }

    #[test]
    fn test_ui_between_screen_shows_stats() {
        let mut app = app_with(Settings::default());
        app.apply(Action::Start);
        app.apply(Action::FinishNow);
        let content = rendered(&app);
        assert!(content.contains("Last End"));
        assert!(content.contains("--:--"));
    }

    #[test]
    fn test_ui_confirm_reset_overlay() {
        let mut app = app_with(Settings::default());
        app.apply(Action::Start);
        app.apply(Action::RequestReset);
        let content = rendered(&app);
        assert!(content.contains("Reset the round?"));
    }

    #[test]
    fn test_ui_finished_screen() {
        let mut settings = Settings::default();
        settings.round.line_count = 1;
        settings.round.practice_ends = 0;
        settings.round.scoring_ends = 1;
        let mut app = app_with(settings);
        app.apply(Action::Start);
        app.apply(Action::FinishNow);
        app.apply(Action::NextSegment);
        assert_eq!(app.round.state().status, Status::Finished);

        let content = rendered(&app);
        assert!(content.contains("Finished"));
        assert!(content.contains("Done"));
    }

    #[test]
    fn test_ui_tiny_terminal_does_not_panic() {
        let mut app = app_with(Settings::default());
        app.apply(Action::Start);
        let backend = TestBackend::new(20, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(&app, f)).unwrap();
    }
}
