use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "envkit", version, about = "Discover, download and unpack JDK builds")]
pub struct Cli {
    /// Additional configuration file (TOML, YAML or JSON).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More logging; repeat for more detail.
    #[arg(short, long, global = true, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors and hide progress bars.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}
impl Cli {
    /// Log directive used when `RUST_LOG` isn't set.
    pub fn log_directive(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "envkit=error",
            (false, 0) => "envkit=info",
            (false, 1) => "envkit=debug",
            (false, _) => "envkit=trace",
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the JDK builds available for download.
    List {
        /// Ignore the link cache and fetch the listing page again.
        #[arg(long)]
        refresh: bool,
    },
    /// Download a JDK build and unpack it into the install directory.
    Install {
        /// Build name, as shown by `envkit list`.
        name: String,
        /// Ignore the link cache and fetch the listing page again.
        #[arg(long)]
        refresh: bool,
        /// Keep the downloaded archive after extracting it.
        #[arg(long)]
        keep_archive: bool,
    },
    /// Unpack a local zip archive.
    Extract {
        archive: PathBuf,
        /// Defaults to the configured install directory.
        destination: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(&["envkit", "list"], "envkit=info")]
    #[case(&["envkit", "-v", "list"], "envkit=debug")]
    #[case(&["envkit", "list", "-vvv"], "envkit=trace")]
    #[case(&["envkit", "--quiet", "list"], "envkit=error")]
    fn test_log_directive(#[case] args: &[&str], #[case] expected: &str) {
        assert_eq!(Cli::parse_from(args).log_directive(), expected);
    }

    #[test]
    fn test_install_arguments() {
        let cli = Cli::parse_from(["envkit", "--config", "envkit.yml", "install", "openjdk-21", "--keep-archive"]);
        assert_eq!(cli.config, Some(PathBuf::from("envkit.yml")));
        match cli.command {
            Command::Install { name, refresh, keep_archive } => {
                assert_eq!(name, "openjdk-21");
                assert!(!refresh);
                assert!(keep_archive);
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["envkit", "-v", "-q", "list"]).is_err());
    }
}
