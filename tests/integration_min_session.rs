// Drives the compiled binary through a PTY: the real event loop and
// crossterm input handling, without touching internal modules.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Unix-only and ignored by default.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn start_round_then_quit() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("endclock");
    let cmd = format!("{} --no-save --prep 5 --shoot 30", bin.display());

    let mut p = spawn(cmd)?;

    // let the alternate screen come up
    std::thread::sleep(Duration::from_millis(200));

    // start from the settings panel
    p.send("s")?;
    std::thread::sleep(Duration::from_millis(300));

    p.send("q")?;
    p.expect(Eof)?;
    Ok(())
}

#[test]
#[ignore]
fn quit_from_settings_panel() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("endclock");
    let mut p = spawn(format!("{} --no-save", bin.display()))?;

    std::thread::sleep(Duration::from_millis(200));
    p.send("\x1b")?; // ESC

    p.expect(Eof)?;
    Ok(())
}
