use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::util::step_clamped;

const MAX_ENDS: u32 = 99;
const MAX_PREP_SECS: u32 = 600;
const MAX_SHOOT_SECS: u32 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("line count must be 1 or 2 (got {0})")]
    InvalidLineCount(u8),
    #[error("a round needs at least one end")]
    NoEnds,
}

/// Parameters of one round. Read-only while the round runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    pub line_count: u8,
    pub scoring_ends: u32,
    pub practice_ends: u32,
    pub prep_secs: u32,
    pub shoot_secs: u32,
    pub warning_threshold_secs: u32,
    pub beep_on_prep: bool,
    pub beep_on_shoot: bool,
    pub beep_on_end_complete: bool,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            line_count: 2,
            scoring_ends: 20,
            practice_ends: 2,
            prep_secs: 10,
            shoot_secs: 120,
            warning_threshold_secs: 30,
            beep_on_prep: true,
            beep_on_shoot: true,
            beep_on_end_complete: true,
        }
    }
}

impl RoundConfig {
    pub fn total_ends(&self) -> u32 {
        self.practice_ends + self.scoring_ends
    }

    pub fn total_segments(&self) -> usize {
        self.total_ends() as usize * self.line_count as usize
    }

    pub fn is_dual_line(&self) -> bool {
        self.line_count == 2
    }

    /// Practice ends come first, so an end is practice iff its 1-based index is within them
    pub fn is_practice(&self, end_index: u32) -> bool {
        end_index <= self.practice_ends
    }

    pub fn prep_ms(&self) -> i64 {
        self.prep_secs as i64 * 1000
    }

    pub fn shoot_ms(&self) -> i64 {
        self.shoot_secs as i64 * 1000
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if !(1..=2).contains(&self.line_count) {
            return Err(ConfigError::InvalidLineCount(self.line_count));
        }
        if self.total_ends() == 0 {
            return Err(ConfigError::NoEnds);
        }
        Ok(self)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    #[default]
    #[strum(to_string = "USA 18m")]
    #[value(name = "usa18m")]
    Usa18m,
    #[strum(to_string = "USA Outdoor")]
    UsaOutdoor,
    #[strum(to_string = "Custom")]
    Custom,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Usa18m, Preset::UsaOutdoor, Preset::Custom];

    /// Overwrite the timing and end-count fields this preset defines.
    /// Line count and cue flags are left alone.
    pub fn apply_to(&self, cfg: &mut RoundConfig) {
        let (prep, shoot, warning, ends, practice) = match self {
            Preset::Usa18m => (10, 120, 30, 10, 2),
            Preset::UsaOutdoor => (10, 240, 30, 12, 2),
            Preset::Custom => return,
        };
        cfg.prep_secs = prep;
        cfg.shoot_secs = shoot;
        cfg.warning_threshold_secs = warning;
        cfg.scoring_ends = ends;
        cfg.practice_ends = practice;
    }

    pub fn cycled(&self, delta: i64) -> Preset {
        let idx = Preset::ALL.iter().position(|p| p == self).unwrap_or(0) as i64;
        let len = Preset::ALL.len() as i64;
        Preset::ALL[(idx + delta).rem_euclid(len) as usize]
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Editable settings in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    Preset,
    Lines,
    ScoringEnds,
    PracticeEnds,
    PrepSecs,
    ShootSecs,
    WarningSecs,
    BeepPrep,
    BeepShoot,
    BeepEnd,
    Theme,
}

impl SettingField {
    pub const ALL: [SettingField; 11] = [
        SettingField::Preset,
        SettingField::Lines,
        SettingField::ScoringEnds,
        SettingField::PracticeEnds,
        SettingField::PrepSecs,
        SettingField::ShootSecs,
        SettingField::WarningSecs,
        SettingField::BeepPrep,
        SettingField::BeepShoot,
        SettingField::BeepEnd,
        SettingField::Theme,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SettingField::Preset => "Preset",
            SettingField::Lines => "Lines",
            SettingField::ScoringEnds => "Ends",
            SettingField::PracticeEnds => "Practice ends",
            SettingField::PrepSecs => "Prep time (s)",
            SettingField::ShootSecs => "Shoot time (s)",
            SettingField::WarningSecs => "Warning at (s)",
            SettingField::BeepPrep => "Beep on prep",
            SettingField::BeepShoot => "Beep on shoot",
            SettingField::BeepEnd => "Beep on end",
            SettingField::Theme => "Theme",
        }
    }

    /// Whether editing this field turns the preset into Custom
    fn is_round_field(&self) -> bool {
        !matches!(self, SettingField::Preset | SettingField::Theme)
    }
}

fn on_off(flag: bool) -> String {
    if flag { "ON" } else { "OFF" }.to_string()
}

/// Everything the settings surface owns: the active round config plus the
/// remembered custom values, the chosen preset and the theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub preset: Preset,
    pub round: RoundConfig,
    pub custom: RoundConfig,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        let mut round = RoundConfig::default();
        Preset::default().apply_to(&mut round);
        Self {
            preset: Preset::default(),
            round,
            custom: RoundConfig::default(),
            theme: Theme::default(),
        }
    }
}

impl Settings {
    /// Switching to a named preset applies its values; switching to Custom
    /// restores the remembered custom values.
    pub fn select_preset(&mut self, preset: Preset) {
        self.preset = preset;
        match preset {
            Preset::Custom => self.round = self.custom,
            named => named.apply_to(&mut self.round),
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    /// Adjust one field by `delta` steps. Round fields switch the preset to
    /// Custom and are remembered as the custom set. Returns whether anything changed.
    pub fn edit(&mut self, field: SettingField, delta: i64) -> bool {
        let before = self.clone();

        match field {
            SettingField::Preset => self.select_preset(self.preset.cycled(delta)),
            SettingField::Theme => self.toggle_theme(),
            _ => {
                let mut cfg = self.round;
                match field {
                    SettingField::Lines => {
                        cfg.line_count = step_clamped(cfg.line_count as u32, delta, 1, 2) as u8
                    }
                    SettingField::ScoringEnds => {
                        let min = u32::from(cfg.practice_ends == 0);
                        cfg.scoring_ends = step_clamped(cfg.scoring_ends, delta, min, MAX_ENDS)
                    }
                    SettingField::PracticeEnds => {
                        let min = u32::from(cfg.scoring_ends == 0);
                        cfg.practice_ends = step_clamped(cfg.practice_ends, delta, min, MAX_ENDS)
                    }
                    SettingField::PrepSecs => {
                        cfg.prep_secs = step_clamped(cfg.prep_secs, delta, 0, MAX_PREP_SECS)
                    }
                    SettingField::ShootSecs => {
                        cfg.shoot_secs =
                            step_clamped(cfg.shoot_secs, delta * 5, 0, MAX_SHOOT_SECS)
                    }
                    SettingField::WarningSecs => {
                        cfg.warning_threshold_secs =
                            step_clamped(cfg.warning_threshold_secs, delta * 5, 0, MAX_SHOOT_SECS)
                    }
                    SettingField::BeepPrep => cfg.beep_on_prep = !cfg.beep_on_prep,
                    SettingField::BeepShoot => cfg.beep_on_shoot = !cfg.beep_on_shoot,
                    SettingField::BeepEnd => cfg.beep_on_end_complete = !cfg.beep_on_end_complete,
                    SettingField::Preset | SettingField::Theme => {}
                }

                if cfg.validate().is_err() {
                    return false;
                }
                if field.is_round_field() && cfg != self.round {
                    self.round = cfg;
                    self.preset = Preset::Custom;
                    self.custom = cfg;
                }
            }
        }

        *self != before
    }

    pub fn value_text(&self, field: SettingField) -> String {
        let cfg = &self.round;
        match field {
            SettingField::Preset => self.preset.to_string(),
            SettingField::Lines => match cfg.line_count {
                1 => "1 (single)".to_string(),
                n => format!("{n} (AB / CD)"),
            },
            SettingField::ScoringEnds => cfg.scoring_ends.to_string(),
            SettingField::PracticeEnds => cfg.practice_ends.to_string(),
            SettingField::PrepSecs => cfg.prep_secs.to_string(),
            SettingField::ShootSecs => cfg.shoot_secs.to_string(),
            SettingField::WarningSecs => cfg.warning_threshold_secs.to_string(),
            SettingField::BeepPrep => on_off(cfg.beep_on_prep),
            SettingField::BeepShoot => on_off(cfg.beep_on_shoot),
            SettingField::BeepEnd => on_off(cfg.beep_on_end_complete),
            SettingField::Theme => self.theme.to_string(),
        }
    }
}

pub trait SettingsStore {
    fn load(&self) -> Settings;
    fn save(&self, settings: &Settings) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "endclock") {
            pd.config_dir().join("settings.json")
        } else {
            PathBuf::from("endclock_settings.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileSettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Settings {
        let Ok(bytes) = fs::read(&self.path) else {
            return Settings::default();
        };
        match serde_json::from_slice::<Settings>(&bytes) {
            Ok(settings) => match (settings.round.validate(), settings.custom.validate()) {
                (Ok(_), Ok(_)) => settings,
                (Err(err), _) | (_, Err(err)) => {
                    tracing::warn!(path = %self.path.display(), %err, "ignoring invalid settings");
                    Settings::default()
                }
            },
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "ignoring malformed settings");
                Settings::default()
            }
        }
    }

    fn save(&self, settings: &Settings) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(settings).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}
