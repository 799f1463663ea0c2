use anyhow::Result;
use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::{self, Config};
use crate::presenter::PresenterOptions;

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();
    let defaults = PresenterOptions::default();
    let options = config.presenter_options();

    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("{}", "(not created yet, showing defaults)".dimmed());
    }
    println!();

    let rows = [
        ("defaults.theme", config.theme().unwrap_or("light").to_string(), config.theme().is_none()),
        (
            "defaults.start_slide",
            config.start_slide().unwrap_or(1).to_string(),
            config.start_slide().is_none(),
        ),
        (
            "input.swipe_threshold",
            options.swipe_threshold.to_string(),
            options.swipe_threshold == defaults.swipe_threshold,
        ),
        (
            "animation.stagger_ms",
            options.stagger_ms.to_string(),
            options.stagger_ms == defaults.stagger_ms,
        ),
        (
            "animation.transition_ms",
            options.transition_ms.to_string(),
            options.transition_ms == defaults.transition_ms,
        ),
    ];
    debug_assert_eq!(rows.len(), config::KEYS.len());

    for (key, value, is_default) in rows {
        let marker = if is_default { " (default)".dimmed().to_string() } else { String::new() };
        println!("  {:<26}{}{}", key.cyan(), value, marker);
    }
    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let path = Config::path()?;
    let mut config = if path.exists() {
        Config::load_from(&path)?
    } else {
        Config::default()
    };
    config.set(key, value)?;
    let path = config.save()?;
    println!(
        "{} {} = {} {}",
        "Saved".green().bold(),
        key,
        value,
        format!("({})", path.display()).dimmed()
    );
    Ok(())
}
