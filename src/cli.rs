//! Command-line interface for sos.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::app::DEFAULT_THINK_DELAY;
use crate::game::{Mode, DEFAULT_BOARD_SIZE};

/// SOS - place S or O, complete S-O-S lines, outscore your opponent
#[derive(Parser, Debug)]
#[command(name = "sos")]
#[command(about = "The SOS pencil-and-paper game in your terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Initial board size (3 to 15; anything else falls back to 7)
    #[arg(short, long, default_value_t = DEFAULT_BOARD_SIZE)]
    pub size: usize,

    /// Who plays the second seat
    #[arg(short, long, value_enum, default_value_t = ModeArg::Pvc)]
    pub mode: ModeArg,

    /// How long the computer thinks before moving, in milliseconds
    #[arg(long, default_value_t = DEFAULT_THINK_DELAY.as_millis() as u64)]
    pub think_ms: u64,

    /// Archive database file (defaults to the OS data directory)
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Where log output goes; the terminal belongs to the UI
    #[arg(long, default_value = "sos.log")]
    pub log_file: PathBuf,
}

/// Game mode as spelled on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    /// Player vs computer
    Pvc,
    /// Player vs player
    Pvp,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Pvc => Mode::Pvc,
            ModeArg::Pvp => Mode::Pvp,
        }
    }
}

impl Cli {
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["sos"]).unwrap();
        assert_eq!(cli.size, 7);
        assert_eq!(Mode::from(cli.mode), Mode::Pvc);
        assert_eq!(cli.think_delay(), Duration::from_millis(1000));
        assert!(cli.db.is_none());
        assert_eq!(cli.log_file, PathBuf::from("sos.log"));
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "sos", "--size", "9", "--mode", "pvp", "--think-ms", "0", "--db", "/tmp/x.db",
        ])
        .unwrap();
        assert_eq!(cli.size, 9);
        assert_eq!(Mode::from(cli.mode), Mode::Pvp);
        assert_eq!(cli.think_delay(), Duration::ZERO);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Cli::try_parse_from(["sos", "--mode", "cvc"]).is_err());
    }
}
