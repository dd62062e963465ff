/*!
# Batch Runner

Rewrites many units, each with its own engine. Inputs are tree documents or
directories of them; directories are walked recursively in sorted order.

A unit that fails (unreadable, malformed, non-converging, or a rule breaking
its contract) is recorded and the batch moves on. Only an unusable input
path fails the whole run.
*/

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::ast::{SyntaxTree, ToSource};
use crate::config::{OutputFormat, RecastConfig};
use crate::engine::{Engine, Rule};
use crate::rules::catalogue;
use crate::{Result, RewriteError};

/// One input file together with its path relative to the input it was found under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub path: PathBuf,
    pub relative: PathBuf,
}

/// Result of a unit that converged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitReport {
    pub path: PathBuf,
    pub passes: usize,
    pub mutations: usize,
    pub removals: usize,
    /// Where the result was written; `None` for dry runs and unchanged in-place units
    pub written: Option<PathBuf>,
}

impl UnitReport {
    pub fn changed(&self) -> bool {
        self.mutations + self.removals > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Pass budget exhausted
    NonConvergence,
    /// A rule misused the modifier manipulator or asked for an invalid removal
    RuleViolation,
    /// The unit is not a valid tree document
    Parse,
    Io,
    /// The runner was set up with a configuration the unit cannot use
    Config,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFailure {
    pub path: PathBuf,
    pub kind: FailureKind,
    pub message: String,
}

/// Totals over a batch, with per-unit results in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub units: usize,
    pub changed: usize,
    pub unchanged: usize,
    /// Passes summed over converged units
    pub passes: usize,
    pub reports: Vec<UnitReport>,
    pub failures: Vec<UnitFailure>,
}

impl BatchSummary {
    fn record(&mut self, outcome: std::result::Result<UnitReport, UnitFailure>) {
        self.units += 1;
        match outcome {
            Ok(report) => {
                if report.changed() {
                    self.changed += 1;
                } else {
                    self.unchanged += 1;
                }
                self.passes += report.passes;
                self.reports.push(report);
            }
            Err(failure) => self.failures.push(failure),
        }
    }

    pub fn success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Rewrites units with a shared, read-only rule set
pub struct BatchRunner {
    config: RecastConfig,
    rules: Vec<Arc<dyn Rule>>,
}

impl BatchRunner {
    pub fn new(config: RecastConfig, rules: Vec<Arc<dyn Rule>>) -> Self {
        Self { config, rules }
    }

    /// Runner with the catalogue rule set selected by `config`
    pub fn from_config(config: RecastConfig) -> Result<Self> {
        config.validate()?;
        let rules = catalogue::build(&config)?;
        Ok(Self::new(config, rules))
    }

    pub fn config(&self) -> &RecastConfig {
        &self.config
    }

    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    pub fn run(&self, inputs: &[PathBuf]) -> Result<BatchSummary> {
        let units = self.collect_units(inputs)?;
        info!(
            units = units.len(),
            rules = self.rules.len(),
            parallel = self.config.parallel,
            dry_run = self.config.dry_run,
            "starting batch"
        );

        let outcomes: Vec<_> = if self.config.parallel {
            units.par_iter().map(|unit| self.process(unit)).collect()
        } else {
            units.iter().map(|unit| self.process(unit)).collect()
        };

        let mut summary = BatchSummary::default();
        for outcome in outcomes {
            summary.record(outcome);
        }
        info!(
            units = summary.units,
            changed = summary.changed,
            failed = summary.failures.len(),
            "batch finished"
        );
        Ok(summary)
    }

    /// Input files in processing order. A file named directly is taken
    /// whatever its extension.
    ///
    /// Fails when two units would be written to the same destination.
    pub fn collect_units(&self, inputs: &[PathBuf]) -> Result<Vec<Unit>> {
        let mut units = Vec::new();
        for input in inputs {
            if input.is_dir() {
                self.walk(input, input, &mut units)?;
            } else if input.is_file() {
                let relative = input
                    .file_name()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| input.clone());
                units.push(Unit {
                    path: input.clone(),
                    relative,
                });
            } else {
                return Err(RewriteError::Config(format!(
                    "input does not exist: {}",
                    input.display()
                )));
            }
        }
        self.check_destinations(&units)?;
        Ok(units)
    }

    fn check_destinations(&self, units: &[Unit]) -> Result<()> {
        let mut claimed: HashMap<PathBuf, &Path> = HashMap::with_capacity(units.len());
        for unit in units {
            if let Some(first) = claimed.insert(self.destination(unit), &unit.path) {
                return Err(RewriteError::Config(format!(
                    "{} and {} would both be written to {}",
                    first.display(),
                    unit.path.display(),
                    self.destination(unit).display()
                )));
            }
        }
        Ok(())
    }

    fn walk(&self, root: &Path, dir: &Path, units: &mut Vec<Unit>) -> Result<()> {
        let mut entries = fs::read_dir(dir)?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        for path in entries {
            if path.is_dir() {
                self.walk(root, &path, units)?;
            } else if self.should_process_file(&path) {
                let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
                units.push(Unit { path, relative });
            }
        }
        Ok(())
    }

    fn should_process_file(&self, path: &Path) -> bool {
        path.extension().is_some_and(|extension| {
            let extension = extension.to_string_lossy();
            self.config
                .extensions
                .iter()
                .any(|wanted| wanted.eq_ignore_ascii_case(&extension))
        })
    }

    fn process(&self, unit: &Unit) -> std::result::Result<UnitReport, UnitFailure> {
        match self.process_unit(unit) {
            Ok(report) => {
                if report.changed() {
                    info!(
                        unit = %unit.path.display(),
                        passes = report.passes,
                        mutations = report.mutations,
                        removals = report.removals,
                        "rewrote unit"
                    );
                } else {
                    debug!(unit = %unit.path.display(), "unit unchanged");
                }
                Ok(report)
            }
            Err(error) => {
                let failure = UnitFailure {
                    path: unit.path.clone(),
                    kind: classify(&error),
                    message: format!("{error:#}"),
                };
                warn!(
                    unit = %unit.path.display(),
                    kind = ?failure.kind,
                    error = %failure.message,
                    "unit failed"
                );
                Err(failure)
            }
        }
    }

    fn process_unit(&self, unit: &Unit) -> anyhow::Result<UnitReport> {
        let source = fs::read_to_string(&unit.path)
            .with_context(|| format!("Failed to read {}", unit.path.display()))?;
        let mut tree = SyntaxTree::from_json(&source)
            .with_context(|| format!("Failed to parse {}", unit.path.display()))?;

        let mut engine = Engine::new()
            .max_passes(self.config.max_passes)
            .for_unit(unit.path.to_string_lossy());
        for rule in &self.rules {
            engine.register(Arc::clone(rule));
        }
        let summary = engine.run(&mut tree)?;

        let mut report = UnitReport {
            path: unit.path.clone(),
            passes: summary.passes,
            mutations: summary.mutations,
            removals: summary.removals,
            written: None,
        };

        let destination = self.destination(unit);
        let needs_write = summary.changed() || destination != unit.path;
        if self.config.dry_run || !needs_write {
            return Ok(report);
        }

        let output = match self.config.output_format {
            OutputFormat::Json => tree.to_json()?,
            OutputFormat::Source => tree.to_source(),
        };
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&destination, output)
            .with_context(|| format!("Failed to write {}", destination.display()))?;
        report.written = Some(destination);
        Ok(report)
    }

    /// Output path of a unit: mirrored under the output directory, or in
    /// place; printed source goes to a `.php` file
    fn destination(&self, unit: &Unit) -> PathBuf {
        let base = match &self.config.output_dir {
            Some(dir) => dir.join(&unit.relative),
            None => unit.path.clone(),
        };
        match self.config.output_format {
            OutputFormat::Json => base,
            OutputFormat::Source => base.with_extension(OutputFormat::Source.extension()),
        }
    }
}

fn classify(error: &anyhow::Error) -> FailureKind {
    if let Some(error) = error.downcast_ref::<RewriteError>() {
        return match error {
            RewriteError::NonConvergence { .. } => FailureKind::NonConvergence,
            RewriteError::Modifier(_) | RewriteError::InvalidRemoval { .. } => {
                FailureKind::RuleViolation
            }
            RewriteError::Json(_) => FailureKind::Parse,
            RewriteError::Io(_) => FailureKind::Io,
            RewriteError::Config(_) => FailureKind::Config,
        };
    }
    if error.downcast_ref::<serde_json::Error>().is_some() {
        FailureKind::Parse
    } else {
        FailureKind::Io
    }
}
