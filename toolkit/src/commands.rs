//! Subcommand dispatch
//!
//! Each handler runs one tool and writes its report to `out`. Failures are
//! returned as [`ToolError`] so the binary can map them to exit codes.

use clap::ArgMatches;
use lkg_core::config::ToolkitConfig;
use lkg_core::error::{ConfigError, IoError, ToolError, ToolResult};
use lkg_core::formats::ColumnSelector;
use lkg_core::layer::DocumentLayer;
use lkg_probe::ProbeConfig;
use lkg_reconcile::ReconcileOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const COMMAND_LINE: &str = "<command line>";

/// Defaults, then the `--config` file, then command-line overrides
///
/// # Errors
/// `ConfigError` if the file is unreadable or the merged values are invalid
pub fn resolve_config(matches: &ArgMatches) -> Result<ToolkitConfig, ConfigError> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ToolkitConfig::from_file(path)?,
        None => ToolkitConfig::default(),
    };

    if let Some((name, args)) = matches.subcommand() {
        match name {
            "cache-stats" => {
                if let Some(limit) = args.get_one::<usize>("list-limit") {
                    config = config.with_list_limit(*limit);
                }
            }
            "reconcile" => {
                if let Some(rows) = args.get_one::<usize>("sample") {
                    config = config.with_sample_size(*rows);
                }
            }
            "check-json-cells" => {
                if let Some(column) = args.get_one::<ColumnSelector>("column") {
                    config = config.with_json_column(column.clone());
                }
            }
            "probe" => {
                if let Some(urls) = args.get_many::<String>("url") {
                    config.probe.urls = urls.cloned().collect();
                }
                if let Some(secs) = args.get_one::<u64>("connect-timeout") {
                    config.probe.connect_timeout_secs = *secs;
                }
                if let Some(secs) = args.get_one::<u64>("timeout") {
                    config.probe.timeout_secs = *secs;
                }
            }
            _ => {}
        }
    }

    // File values were validated against the file path when loaded
    config.validate(Path::new(COMMAND_LINE))?;
    Ok(config)
}

fn emit(out: &mut dyn Write, text: &str) -> ToolResult<()> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| IoError::write("<stdout>", e))?;
    Ok(())
}

fn required_path<'a>(args: &'a ArgMatches, id: &str) -> &'a Path {
    // clap enforces `required(true)` before we get here
    args.get_one::<PathBuf>(id).map_or(Path::new(""), PathBuf::as_path)
}

/// Run the selected subcommand
///
/// # Errors
/// The tool's [`ToolError`]; a failed probe is reported, not returned
pub async fn run(matches: &ArgMatches, out: &mut dyn Write) -> ToolResult<()> {
    let config = resolve_config(matches)?;
    let layer = DocumentLayer::with_max_file_size(config.limits.max_file_size);

    match matches.subcommand() {
        Some(("sanitize", args)) => {
            let input = required_path(args, "input");
            let output = args.get_one::<PathBuf>("output").map(PathBuf::as_path);
            let report = lkg_cache::sanitize(&layer, input, output)?;
            emit(out, &report.generate_text())
        }
        Some(("cache-stats", args)) => {
            let input = required_path(args, "input");
            let census = lkg_cache::census(&layer, input)?;
            let source = input.display().to_string();
            emit(out, &census.generate_text(&source, config.census.list_limit))
        }
        Some(("reconcile", args)) => {
            let options = ReconcileOptions {
                output: args.get_one::<PathBuf>("output").cloned(),
                sample_size: config.reconcile.sample_size,
            };
            let report = lkg_reconcile::reconcile(
                &layer,
                required_path(args, "table"),
                required_path(args, "mentions"),
                &options,
            )?;
            emit(out, &report.generate_text())
        }
        Some(("features", args)) => {
            let features = lkg_reconcile::feature_mentions(&layer, required_path(args, "table"))?;
            let show = args.get_flag("show-mentions");
            emit(out, &lkg_reconcile::features_text(&features, show))
        }
        Some(("check-json-cells", args)) => {
            let report = lkg_inspect::check_json_cells(
                &layer,
                required_path(args, "table"),
                &config.inspect.json_column,
            )?;
            emit(out, &report.generate_text())
        }
        Some(("extract-links", args)) => {
            let report = lkg_inspect::extract_links(
                &layer,
                required_path(args, "input"),
                required_path(args, "output"),
            )?;
            emit(out, &report.generate_text())
        }
        Some(("probe", _)) => match lkg_probe::probe(ProbeConfig::from(&config.probe)).await {
            Ok(report) => emit(out, &report.generate_text()),
            Err(e) => {
                tracing::error!(error = %e, "probe could not start");
                emit(out, &format!("Probe could not start: {}\n", ToolError::from(e)))
            }
        },
        Some((other, _)) => {
            tracing::warn!(command = other, "unknown subcommand");
            Ok(())
        }
        None => Ok(()),
    }
}
