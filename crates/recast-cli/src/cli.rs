/*!
# Command Line

`recast process <PATH>...` rewrites units; `recast list-rules` prints the
catalogue. Flags override values from `--config`.
*/

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing::debug;

use recast_core::rules::catalogue;
use recast_core::{BatchRunner, LanguageVersion, OutputFormat, RecastConfig};

use crate::report::{render_rules, render_summary};

/// How a successful invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// The batch ran, but at least one unit failed
    UnitsFailed,
}

impl Status {
    pub fn code(self) -> u8 {
        match self {
            Status::Success => 0,
            Status::UnitsFailed => 1,
        }
    }
}

pub fn build_command() -> Command {
    Command::new("recast")
        .version(recast_core::VERSION)
        .about("Batch source-to-source rewriting of PHP syntax trees")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log every rewrite")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("JSON configuration file")
                .global(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .value_name("VERSION")
                .help("Target language version, e.g. 7.4")
                .global(true),
        )
        .subcommand(
            Command::new("process")
                .about("Rewrite tree documents until no rule applies")
                .arg(
                    Arg::new("paths")
                        .value_name("PATH")
                        .help("Files or directories to rewrite")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_name("DIR")
                        .help("Write results under DIR instead of in place")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_name("FORMAT")
                        .help("Output format")
                        .value_parser(["json", "source"]),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help("Report rewrites without writing files")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("max-passes")
                        .long("max-passes")
                        .value_name("N")
                        .help("Pass budget per unit")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("rule")
                        .long("rule")
                        .short('r')
                        .value_name("NAME")
                        .help("Only run this rule; repeat for more")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("no-parallel")
                        .long("no-parallel")
                        .help("Rewrite units one at a time")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("list-rules")
                .about("List available rules")
                .arg(
                    Arg::new("samples")
                        .long("samples")
                        .help("Show before/after samples")
                        .action(ArgAction::SetTrue),
                ),
        )
}

/// Configuration from the `--config` file or defaults, with the global
/// flags applied on top
pub fn resolve_config(matches: &ArgMatches) -> Result<RecastConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => RecastConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => RecastConfig::default(),
    };

    if let Some(target) = matches.get_one::<String>("target") {
        config.target_version = target.parse::<LanguageVersion>()?;
    }

    config.validate()?;
    Ok(config)
}

/// [`resolve_config`] plus the `process` flags
pub fn resolve_process_config(matches: &ArgMatches) -> Result<RecastConfig> {
    let mut config = resolve_config(matches)?;

    if let Some(output) = matches.get_one::<PathBuf>("output") {
        config.output_dir = Some(output.clone());
    }
    if let Some(format) = matches.get_one::<String>("format") {
        config.output_format = format.parse::<OutputFormat>()?;
    }
    if matches.get_flag("dry-run") {
        config.dry_run = true;
    }
    if let Some(max_passes) = matches.get_one::<usize>("max-passes") {
        config.max_passes = *max_passes;
    }
    if let Some(rules) = matches.get_many::<String>("rule") {
        config.rules = rules.cloned().collect();
    }
    if matches.get_flag("no-parallel") {
        config.parallel = false;
    }

    config.validate()?;
    Ok(config)
}

/// Run the parsed command line, writing the report to `out`
pub fn execute(matches: &ArgMatches, out: &mut dyn Write) -> Result<Status> {
    match matches.subcommand() {
        Some(("process", sub)) => {
            let config = resolve_process_config(sub)?;
            debug!(?config, "resolved configuration");

            let paths: Vec<PathBuf> = sub
                .get_many::<PathBuf>("paths")
                .map(|paths| paths.cloned().collect())
                .unwrap_or_default();
            let dry_run = config.dry_run;
            let runner = BatchRunner::from_config(config)?;
            let summary = runner.run(&paths)?;

            write!(out, "{}", render_summary(&summary, dry_run))?;
            Ok(if summary.success() {
                Status::Success
            } else {
                Status::UnitsFailed
            })
        }
        Some(("list-rules", sub)) => {
            let config = resolve_config(sub)?;
            let rules = catalogue::all_rules(config.target_version);
            write!(
                out,
                "{}",
                render_rules(&rules, config.target_version, sub.get_flag("samples"))
            )?;
            Ok(Status::Success)
        }
        Some((other, _)) => anyhow::bail!("Unknown command: {other}"),
        None => anyhow::bail!("No command given"),
    }
}
