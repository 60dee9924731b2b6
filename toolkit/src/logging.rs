//! Tracing setup for the `lkg` binary

use clap::ArgMatches;
use tracing_subscriber::EnvFilter;

/// Log verbosity selected on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verbosity {
    /// Number of `-v` flags
    pub verbose: u8,
    /// `-q` was given
    pub quiet: bool,
}

impl Verbosity {
    /// Read `-v`/`-q` from parsed arguments
    #[must_use]
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            verbose: matches.get_count("verbose"),
            quiet: matches.get_flag("quiet"),
        }
    }

    /// Default filter directive when `RUST_LOG` is unset
    #[must_use]
    pub fn directive(self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Install the global subscriber, logging to stderr
///
/// `RUST_LOG` takes precedence over the command-line verbosity. Calling this
/// twice keeps the first subscriber.
pub fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
