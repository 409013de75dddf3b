// crates/cli/src/presentation.rs
use crate::config::Config;
use crate::error::Result;
use crate::options::{OutputFormat, Verbosity};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use echidna_coverage_engine::{CoverageStats, FileReport, ScopeSummary};
use serde::Serialize;
use std::io::Write;

const RULE_WIDTH: usize = 50;

/// Files whose line coverage is under the configured threshold.
pub fn files_below_threshold(reports: &[FileReport], threshold: f64) -> Vec<&FileReport> {
    reports
        .iter()
        .filter(|r| r.coverage.line_coverage_percentage.is_below(threshold))
        .collect()
}

pub fn print_results(
    reports: &[FileReport],
    scope: Option<&ScopeSummary>,
    config: &Config,
) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_results(&mut out, reports, scope, config)
}

pub fn write_results<W: Write>(
    out: &mut W,
    reports: &[FileReport],
    scope: Option<&ScopeSummary>,
    config: &Config,
) -> Result<()> {
    match config.format {
        OutputFormat::Json => write_json(out, reports, scope, config),
        OutputFormat::Table => write_table(out, reports, scope, config),
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    files: &'a [FileReport],
    scope: &'a ScopeSummary,
}

fn write_json<W: Write>(
    out: &mut W,
    reports: &[FileReport],
    scope: Option<&ScopeSummary>,
    config: &Config,
) -> Result<()> {
    let json = match scope {
        Some(scope) => serde_json::to_string_pretty(&JsonDocument {
            files: reports,
            scope,
        })?,
        None => serde_json::to_string_pretty(reports)?,
    };
    writeln!(out, "{json}")?;

    // stdout stays machine-readable
    for report in files_below_threshold(reports, config.threshold) {
        eprintln!(
            "Warning: {} coverage {} below threshold {}%",
            report.file_path,
            report.coverage.line_coverage_percentage,
            config.threshold
        );
    }
    Ok(())
}

fn write_table<W: Write>(
    out: &mut W,
    reports: &[FileReport],
    scope: Option<&ScopeSummary>,
    config: &Config,
) -> Result<()> {
    let rule = "═".repeat(RULE_WIDTH);

    if reports.is_empty() {
        writeln!(out, "No source files found in trace")?;
    }

    for report in reports {
        writeln!(out)?;
        writeln!(out, "{rule}")?;
        writeln!(out, "File: {}", report.file_path)?;
        writeln!(out, "{rule}")?;

        if report.coverage.is_totally_uncovered() && config.verbosity == Verbosity::Summary {
            writeln!(out, "File totally uncovered")?;
            continue;
        }

        writeln!(out, "{}", stats_table(&report.coverage))?;

        if config.verbosity >= Verbosity::Functions {
            write_uncovered_functions(out, report, config.verbosity)?;
        }

        if report
            .coverage
            .line_coverage_percentage
            .is_below(config.threshold)
        {
            writeln!(
                out,
                "Warning: Coverage {} below threshold {}%",
                report.coverage.line_coverage_percentage, config.threshold
            )?;
        }
        writeln!(out, "{rule}")?;
    }

    if let Some(scope) = scope {
        write_scope(out, scope)?;
    }
    Ok(())
}

fn stats_table(stats: &CoverageStats) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);
    let rows = [
        ("totalFunctions", stats.total_functions.to_string()),
        (
            "fullyCoveredFunctions",
            stats.fully_covered_functions.to_string(),
        ),
        ("coveredLines", stats.covered_lines.to_string()),
        ("revertedLines", stats.reverted_lines.to_string()),
        ("untouchedLines", stats.untouched_lines.to_string()),
        (
            "functionCoveragePercentage",
            stats.function_coverage_percentage.to_string(),
        ),
        (
            "lineCoveragePercentage",
            stats.line_coverage_percentage.to_string(),
        ),
    ];
    for (metric, value) in rows {
        table.add_row(vec![metric.to_string(), value]);
    }
    table
}

fn write_uncovered_functions<W: Write>(
    out: &mut W,
    report: &FileReport,
    verbosity: Verbosity,
) -> Result<()> {
    let uncovered: Vec<_> = report.uncovered_functions().collect();
    if uncovered.is_empty() {
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Function", "Touched", "Reverted", "Untouched lines"]);
    for function in &uncovered {
        table.add_row(vec![
            function.name.clone(),
            function.touched.to_string(),
            function.reverted.to_string(),
            function.untouched_line_count.to_string(),
        ]);
    }
    writeln!(out)?;
    writeln!(out, "Not fully covered functions:")?;
    writeln!(out, "{table}")?;

    if verbosity < Verbosity::Lines {
        return Ok(());
    }

    for function in uncovered {
        if function.untouched_snippets.is_empty() && function.reverted_snippets.is_empty() {
            continue;
        }
        writeln!(out)?;
        writeln!(out, "Function: {}", function.name)?;
        if !function.untouched_snippets.is_empty() {
            writeln!(out, "Untouched lines:")?;
            for line in &function.untouched_snippets {
                writeln!(out, "    {line}")?;
            }
        }
        if !function.reverted_snippets.is_empty() {
            writeln!(out, "Reverted lines:")?;
            for line in &function.reverted_snippets {
                writeln!(out, "    {line}")?;
            }
        }
    }
    Ok(())
}

fn write_scope<W: Write>(out: &mut W, scope: &ScopeSummary) -> Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "Scope coverage: {} ({} of {} lines, {} of {} files matched)",
        scope.line_coverage_percentage,
        scope.covered_lines,
        scope.covered_lines + scope.untouched_lines,
        scope.files_matched,
        scope.files_in_scope
    )?;
    for missing in &scope.missing {
        writeln!(out, "  not in trace: {missing}")?;
    }
    Ok(())
}
