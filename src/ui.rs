//! Console output helpers.
//!
//! All user-visible messages go through these functions so the `--slow`
//! flag (a cosmetic delay after each line, kept for parity with the
//! original installer) applies uniformly.

use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

static SLOW_MODE: AtomicBool = AtomicBool::new(false);

const SLOW_DELAY: Duration = Duration::from_secs(2);

pub fn set_slow(enabled: bool) {
    SLOW_MODE.store(enabled, Ordering::Relaxed);
}

fn pause() {
    if SLOW_MODE.load(Ordering::Relaxed) {
        std::thread::sleep(SLOW_DELAY);
    }
}

pub fn step(message: &str) {
    println!("{message}");
    pause();
}

pub fn success(message: &str) {
    println!("{} {message}", "✓".green());
    pause();
}

pub fn warn(message: &str) {
    eprintln!("{} {message}", "warning:".yellow().bold());
    pause();
}

pub fn error(message: &str) {
    eprintln!("{} {message}", "error:".red().bold());
    pause();
}
