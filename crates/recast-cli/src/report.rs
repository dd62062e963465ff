//! Plain-text reports printed by the CLI.

use std::fmt::Write;
use std::sync::Arc;

use recast_core::engine::Rule;
use recast_core::{BatchSummary, FailureKind, LanguageVersion};

fn failure_label(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::NonConvergence => "non-convergence",
        FailureKind::RuleViolation => "rule violation",
        FailureKind::Parse => "parse error",
        FailureKind::Io => "i/o error",
        FailureKind::Config => "configuration error",
    }
}

/// One line per changed or failed unit, then the totals
pub fn render_summary(summary: &BatchSummary, dry_run: bool) -> String {
    let mut out = String::new();
    let verb = if dry_run { "would rewrite" } else { "rewrote" };

    for report in summary.reports.iter().filter(|report| report.changed()) {
        let _ = write!(
            out,
            "{verb} {} ({} passes, {} mutations, {} removals)",
            report.path.display(),
            report.passes,
            report.mutations,
            report.removals
        );
        match &report.written {
            Some(written) if *written != report.path => {
                let _ = writeln!(out, " -> {}", written.display());
            }
            _ => out.push('\n'),
        }
    }
    for failure in &summary.failures {
        let _ = writeln!(
            out,
            "FAILED {} [{}]: {}",
            failure.path.display(),
            failure_label(failure.kind),
            failure.message
        );
    }

    let _ = writeln!(
        out,
        "Processed {} units: {} changed, {} unchanged, {} failed",
        summary.units,
        summary.changed,
        summary.unchanged,
        summary.failures.len()
    );
    out
}

/// The catalogue with each rule's minimum version and whether it runs for `target`
pub fn render_rules(rules: &[Arc<dyn Rule>], target: LanguageVersion, samples: bool) -> String {
    let mut out = String::new();
    for rule in rules {
        let definition = rule.definition();
        let gate = match rule.min_version() {
            Some(min) if target < min => format!(" (requires {min}, inactive for {target})"),
            Some(min) => format!(" (requires {min})"),
            None => String::new(),
        };
        let _ = writeln!(out, "{}{gate}", rule.name());
        let _ = writeln!(out, "    {}", definition.description);

        if samples && !definition.before.is_empty() {
            let _ = writeln!(out, "\n    before:");
            for line in definition.before.lines() {
                let _ = writeln!(out, "        {line}");
            }
            let _ = writeln!(out, "    after:");
            for line in definition.after.lines() {
                let _ = writeln!(out, "        {line}");
            }
            out.push('\n');
        }
    }
    out
}
