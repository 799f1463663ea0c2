pub mod check;
pub mod completion;
pub mod config;
pub mod guide;

use colored::Colorize;

pub fn print_version() {
    println!(
        "{} {}",
        "fagvalg".bold(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
}
