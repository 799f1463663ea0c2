use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::Config;
use crate::deck::Deck;

#[derive(Parser)]
#[command(name = "fagvalg")]
#[command(author, version, about)]
#[command(long_about = "Interactive presentation about choosing subjects for Vg2 and Vg3.\n\n\
    Without arguments the built-in deck is presented.\n\n\
    Examples:\n  \
    fagvalg                      Present the built-in deck (fullscreen)\n  \
    fagvalg --windowed --slide 10  Start on the first subject widget in a window\n  \
    fagvalg my-deck.md           Present another deck file\n  \
    fagvalg check my-deck.md     Validate a deck without opening a window\n  \
    fagvalg guide                Print the counseling notes")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Deck file to present (defaults to the built-in deck)
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long, global = false)]
    pub slide: Option<usize>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the counseling notes that accompany the presentation
    Guide {
        /// Print the raw markdown without formatting
        #[arg(long)]
        plain: bool,
    },

    /// Load and validate a deck, then print a summary
    Check {
        /// Deck file (defaults to the built-in deck)
        file: Option<PathBuf>,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.theme, input.swipe_threshold, animation.stagger_ms)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    /// Level for the tracing subscriber derived from `-v` / `-q`.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            return tracing::Level::ERROR;
        }
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Guide { plain }) => {
                crate::commands::guide::run(plain);
                Ok(())
            }
            Some(Commands::Check { file }) => crate::commands::check::run(file.as_deref()),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                crate::commands::print_version();
                Ok(())
            }
            None => {
                let deck = match &self.file {
                    Some(file) => {
                        if !file.exists() {
                            anyhow::bail!("File not found: {}", file.display());
                        }
                        Deck::from_file(file)?
                    }
                    None => Deck::embedded()?,
                };
                let config = Config::load_or_default();
                crate::app::run(deck, self.file, self.windowed, self.slide, config)
            }
        }
    }
}
