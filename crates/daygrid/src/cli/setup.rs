use clap::{Args, Parser, Subcommand, ValueEnum};
use daygridapp::api::DayRef;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "daygrid",
    bin_name = "daygrid",
    version,
    disable_help_subcommand = true
)]
#[command(about = "One short note per day, drawn as a year of 365 dots", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// App data directory [default: $DAYGRID_DATA or the OS data directory]
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DayArgs {
    /// Day key, e.g. 2024-41
    #[arg(long, value_name = "KEY", conflicts_with = "date")]
    pub day: Option<String>,

    /// Calendar date, YYYY-MM-DD
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,
}

impl DayArgs {
    pub fn day_ref(&self) -> DayRef {
        match (&self.day, &self.date) {
            (Some(key), _) => DayRef::Key(key.clone()),
            (None, Some(date)) => DayRef::Date(date.clone()),
            (None, None) => DayRef::Today,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl From<Toggle> for bool {
    fn from(toggle: Toggle) -> bool {
        toggle == Toggle::On
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the note for today (or another day)
    #[command(alias = "w", display_order = 1)]
    Write {
        #[command(flatten)]
        day: DayArgs,

        /// Note text
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Show one day's note
    #[command(alias = "s", display_order = 2)]
    Show {
        #[command(flatten)]
        day: DayArgs,
    },

    /// List notes, or draw a year's grid
    #[command(alias = "ls", display_order = 3)]
    List {
        /// Only this year, drawn as a grid
        #[arg(long)]
        year: Option<i32>,
    },

    /// Delete one day's note
    #[command(alias = "rm", display_order = 4)]
    Delete {
        #[command(flatten)]
        day: DayArgs,
    },

    /// Where the journal is stored
    #[command(display_order = 10)]
    Storage {
        #[command(subcommand)]
        action: StorageCommands,
    },

    /// Export or import a backup file
    #[command(display_order = 11)]
    Backup {
        #[command(subcommand)]
        action: BackupCommands,
    },

    /// Show or change preferences
    #[command(display_order = 12)]
    Settings {
        /// Sound effects
        #[arg(long, value_enum)]
        sound: Option<Toggle>,

        /// Daily reminder
        #[arg(long, value_enum)]
        notifications: Option<Toggle>,

        /// Reminder time, HH:MM
        #[arg(long, value_name = "HH:MM")]
        time: Option<String>,
    },

    /// Show the effective configuration
    #[command(display_order = 13)]
    Config,
}

#[derive(Subcommand, Debug)]
pub enum StorageCommands {
    /// Show the active store and the directory's state
    Status,

    /// Move the journal from local storage into a directory
    Migrate {
        /// Directory to use instead of prompting
        #[arg(long, value_name = "PATH")]
        dir: Option<PathBuf>,
    },

    /// Point the journal at another directory
    Change {
        /// Directory to use instead of prompting
        #[arg(long, value_name = "PATH")]
        dir: Option<PathBuf>,
    },

    /// Go back to local storage, leaving the directory's files in place
    Local,
}

#[derive(Subcommand, Debug)]
pub enum BackupCommands {
    /// Write all entries and settings to a JSON file
    Export {
        /// Output file [default: journal-backup-<today>.json in the current directory]
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Restore entries and settings from a backup file
    Import {
        /// Backup file
        path: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_write_collects_words() {
        let cli = Cli::parse_from(["daygrid", "write", "--day", "2024-3", "hello", "world"]);
        match cli.command {
            Some(Commands::Write { day, text }) => {
                assert_eq!(day.day_ref(), DayRef::Key("2024-3".to_string()));
                assert_eq!(text.join(" "), "hello world");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_day_and_date_conflict() {
        let parsed = Cli::try_parse_from([
            "daygrid", "show", "--day", "2024-3", "--date", "2024-01-04",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_day_defaults_to_today() {
        let cli = Cli::parse_from(["daygrid", "show"]);
        match cli.command {
            Some(Commands::Show { day }) => assert_eq!(day.day_ref(), DayRef::Today),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["daygrid", "storage", "status", "--verbose", "--data", "/tmp/x"]);
        assert!(cli.verbose);
        assert_eq!(cli.data, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn test_settings_toggles() {
        let cli = Cli::parse_from(["daygrid", "settings", "--sound", "on", "--time", "7:30"]);
        match cli.command {
            Some(Commands::Settings {
                sound,
                notifications,
                time,
            }) => {
                assert_eq!(sound.map(bool::from), Some(true));
                assert_eq!(notifications, None);
                assert_eq!(time.as_deref(), Some("7:30"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
