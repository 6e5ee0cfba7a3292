//! Command line overrides layered over the config file.

use std::path::PathBuf;

use clap::Parser;
use confetti_config::Config;

/// Confetti bursting across your terminal
#[derive(Parser, Debug, Default)]
#[command(name = "confetti")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Number of flakes per cycle
    #[arg(long)]
    pub count: Option<usize>,

    /// Fall duration in milliseconds
    #[arg(long, value_name = "MS")]
    pub fall_duration: Option<u64>,

    /// Blast duration in milliseconds
    #[arg(long, value_name = "MS")]
    pub blast_duration: Option<u64>,

    /// Fade flakes out at the end of each fall
    #[arg(long)]
    pub fade: bool,

    /// Blast the flakes from the bottom corners
    #[arg(long)]
    pub cannons: bool,

    /// Wait for `r` instead of starting right away
    #[arg(long)]
    pub no_autoplay: bool,

    /// Run a single cycle instead of looping
    #[arg(long)]
    pub once: bool,

    /// Delay before the first cycle in milliseconds
    #[arg(long, value_name = "MS")]
    pub delay: Option<u64>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the effective settings to the config file and exit
    #[arg(long)]
    pub save_config: bool,
}

impl Cli {
    /// Apply the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        let options = &mut config.confetti;
        if let Some(count) = self.count {
            options.count = count;
        }
        if let Some(ms) = self.fall_duration {
            options.fall_duration = ms;
        }
        if let Some(ms) = self.blast_duration {
            options.blast_duration = ms;
        }
        if let Some(ms) = self.delay {
            options.auto_start_delay = ms;
        }
        if self.fade {
            options.fade_out_on_end = true;
        }
        if self.no_autoplay {
            options.autoplay = false;
        }
        if self.once {
            options.is_infinite = Some(false);
        }
    }
}
