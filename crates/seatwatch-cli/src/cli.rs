use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "seatwatch",
    about = "Seatwatch: track course section seat availability",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Track sections periodically until interrupted
    Watch(WatchArgs),
    /// Run one update cycle against a second snapshot file
    Check(CheckArgs),
    /// Show field changes between two snapshot files
    Diff(DiffArgs),
    /// List the sections in a snapshot file
    Show(ShowArgs),
}

#[derive(Args)]
pub struct WatchArgs {
    /// JSON snapshot file; seeds the tracker and is re-read every cycle
    #[arg(short, long)]
    pub sections: PathBuf,
    /// TOML tracker configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Override the configured interval, in seconds
    #[arg(short, long)]
    pub interval: Option<u64>,
    /// Append changes to this file
    #[arg(long)]
    pub export: Option<PathBuf>,
    /// Do not print changes to stdout
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// JSON snapshot file holding the known state
    #[arg(short, long)]
    pub sections: PathBuf,
    /// JSON snapshot file holding the fresh state
    #[arg(short, long)]
    pub against: PathBuf,
}

#[derive(Args)]
pub struct DiffArgs {
    pub old: PathBuf,
    pub new: PathBuf,
}

#[derive(Args)]
pub struct ShowArgs {
    pub sections: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_watch() {
        let cli = Cli::try_parse_from(["seatwatch", "watch", "--sections", "s.json"]).unwrap();
        if let Command::Watch(args) = cli.command {
            assert_eq!(args.sections, PathBuf::from("s.json"));
            assert!(args.config.is_none());
            assert!(args.interval.is_none());
            assert!(!args.quiet);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_watch_full() {
        let cli = Cli::try_parse_from([
            "seatwatch", "watch", "-s", "s.json", "-c", "seatwatch.toml",
            "-i", "60", "--export", "updates.txt", "--quiet",
        ])
        .unwrap();
        if let Command::Watch(args) = cli.command {
            assert_eq!(args.config, Some(PathBuf::from("seatwatch.toml")));
            assert_eq!(args.interval, Some(60));
            assert_eq!(args.export, Some(PathBuf::from("updates.txt")));
            assert!(args.quiet);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn watch_requires_sections() {
        assert!(Cli::try_parse_from(["seatwatch", "watch"]).is_err());
    }

    #[test]
    fn parse_check() {
        let cli = Cli::try_parse_from(["seatwatch", "check", "-s", "old.json", "-a", "new.json"]).unwrap();
        if let Command::Check(args) = cli.command {
            assert_eq!(args.sections, PathBuf::from("old.json"));
            assert_eq!(args.against, PathBuf::from("new.json"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_diff() {
        let cli = Cli::try_parse_from(["seatwatch", "diff", "a.json", "b.json"]).unwrap();
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.old, PathBuf::from("a.json"));
            assert_eq!(args.new, PathBuf::from("b.json"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_show() {
        let cli = Cli::try_parse_from(["seatwatch", "show", "s.json"]).unwrap();
        assert!(matches!(cli.command, Command::Show(_)));
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["seatwatch", "--verbose", "show", "s.json"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["seatwatch", "diff", "a.json", "b.json", "--format", "json"]).unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
