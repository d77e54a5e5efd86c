// Prevents additional console window on Windows in release
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

use clap::Parser;
use laverna_lib::RunMode;

/// Laverna - note taking app
#[derive(Parser, Debug)]
#[command(name = "laverna")]
#[command(about = "Laverna desktop app", long_about = None)]
struct Args {
    /// Load the frontend from the dev server and open developer tools
    #[arg(long, env = "LAVERNA_DEV")]
    dev: bool,

    /// Start hidden in the system tray
    #[arg(long, env = "LAVERNA_TRAY")]
    tray: bool,
}

impl Args {
    fn run_mode(&self) -> RunMode {
        RunMode {
            dev: self.dev,
            tray: self.tray,
        }
    }
}

fn main() {
    let args = Args::parse();
    laverna_lib::run(args.run_mode());
}
