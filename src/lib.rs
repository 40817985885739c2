// Library surface for headless/integration tests and reuse.
// The terminal UI and CLI live in main.rs.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod controls;
pub mod cue;
pub mod format;
pub mod round;
pub mod runtime;
pub mod tracker;
pub mod util;
