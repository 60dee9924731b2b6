//! Command-line definition

use clap::{value_parser, Arg, ArgAction, Command};
use lkg_core::formats::ColumnSelector;
use std::path::PathBuf;

fn path_arg(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .value_name("PATH")
        .value_parser(value_parser!(PathBuf))
        .help(help)
}

/// Build the `lkg` command
#[must_use]
pub fn build_cli() -> Command {
    Command::new("lkg")
        .version(lkg_core::VERSION)
        .about("Data-wrangling tools for the Linux kernel knowledge graph")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More log output (repeatable)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .global(true)
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Only log errors"),
        )
        .subcommand(
            Command::new("sanitize")
                .about("Drop empty code references from an entity cache")
                .arg(path_arg("input", "Entity cache JSON").required(true))
                .arg(path_arg("output", "Write here instead of overwriting the input")),
        )
        .subcommand(
            Command::new("cache-stats")
                .about("Count populated and empty cache entries")
                .arg(path_arg("input", "Cache JSON").required(true))
                .arg(
                    Arg::new("list-limit")
                        .long("list-limit")
                        .value_name("N")
                        .value_parser(value_parser!(usize))
                        .help("Url-bearing keys to list"),
                ),
        )
        .subcommand(
            Command::new("reconcile")
                .about("Attach feature and commit ids to a mention table")
                .arg(path_arg("table", "Mention table (CSV/TSV)").required(true))
                .arg(path_arg("mentions", "Mention metadata JSON").required(true))
                .arg(path_arg("output", "Write here instead of overwriting the table"))
                .arg(
                    Arg::new("sample")
                        .long("sample")
                        .value_name("N")
                        .value_parser(value_parser!(usize))
                        .help("Rows shown after the join"),
                ),
        )
        .subcommand(
            Command::new("features")
                .about("Group mentions by feature in a feature sheet")
                .arg(path_arg("table", "Feature sheet (CSV/TSV)").required(true))
                .arg(
                    Arg::new("show-mentions")
                        .long("show-mentions")
                        .action(ArgAction::SetTrue)
                        .help("List every mention"),
                ),
        )
        .subcommand(
            Command::new("check-json-cells")
                .about("Check that a table column holds valid JSON")
                .arg(path_arg("table", "Table (CSV/TSV)").required(true))
                .arg(
                    Arg::new("column")
                        .long("column")
                        .value_name("INDEX|NAME")
                        .value_parser(value_parser!(ColumnSelector))
                        .help("Zero-based column index or header name"),
                ),
        )
        .subcommand(
            Command::new("extract-links")
                .about("Extract concept/Wikipedia pairs from a linking result")
                .arg(path_arg("input", "Linking result JSON").required(true))
                .arg(path_arg("output", "Link list JSON").required(true)),
        )
        .subcommand(
            Command::new("probe")
                .about("Check connectivity to the Wikipedia endpoints")
                .arg(
                    Arg::new("url")
                        .long("url")
                        .value_name("URL")
                        .action(ArgAction::Append)
                        .help("Endpoint to probe (repeatable)"),
                )
                .arg(
                    Arg::new("connect-timeout")
                        .long("connect-timeout")
                        .value_name("SECS")
                        .value_parser(value_parser!(u64).range(1..))
                        .help("Connect timeout"),
                )
                .arg(
                    Arg::new("timeout")
                        .long("timeout")
                        .value_name("SECS")
                        .value_parser(value_parser!(u64).range(1..))
                        .help("Overall request timeout"),
                ),
        )
}
