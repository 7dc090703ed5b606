use super::CliError;
use super::helpers::{resolve_input_pairs, write_json_report, write_text_output};
use fitsdiff_core::{DiffConfig, DiffReport, SnapshotReader, run_diff};
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct CompareArgs {
    /// First input: snapshot file, directory, or file-name pattern
    #[arg(value_name = "FILE1")]
    file1: String,

    /// Second input: snapshot file, directory, or file-name pattern
    #[arg(value_name = "FILE2")]
    file2: String,

    /// Keywords whose values are skipped: comma list, @listfile, or '*'
    #[arg(long, default_value = "")]
    value_exclusions: String,

    /// Keywords whose comments are skipped: comma list, @listfile, or '*'
    #[arg(long, default_value = "")]
    comment_exclusions: String,

    /// Table columns that are skipped: comma list, @listfile, or '*'
    #[arg(long, default_value = "")]
    field_exclusions: String,

    /// Cap on reported data discrepancies per unit
    #[arg(long, default_value_t = 10)]
    max_diff: i64,

    /// Relative tolerance for numeric comparisons
    #[arg(long, default_value_t = 0.0, value_parser = parse_delta)]
    delta: f64,

    /// Trim trailing blanks from text values before comparing
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set, value_name = "BOOL")]
    neglect_blanks: bool,

    /// Write the textual report to this file instead of standard output
    #[arg(long)]
    output: Option<PathBuf>,

    /// Also write a JSON report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

impl CompareArgs {
    fn diff_config(&self) -> DiffConfig {
        DiffConfig {
            value_exclusions: self.value_exclusions.clone(),
            comment_exclusions: self.comment_exclusions.clone(),
            field_exclusions: self.field_exclusions.clone(),
            max_diff: self.max_diff,
            delta: self.delta,
            neglect_blanks: self.neglect_blanks,
        }
    }
}

fn parse_delta(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if value < 0.0 {
        return Err("relative tolerance must not be negative".to_string());
    }
    Ok(value)
}

pub(super) fn run_compare_command(args: CompareArgs) -> Result<i32, CliError> {
    let pairs = resolve_input_pairs(&args.file1, &args.file2)?;
    tracing::debug!(pairs = pairs.len(), "Resolved input pairs");
    let config = args.diff_config();

    let mut runs: Vec<DiffReport> = Vec::with_capacity(pairs.len());
    for (first, second) in &pairs {
        let run = run_diff(&config, &SnapshotReader, first, second)?;
        tracing::debug!(
            file1 = %first.display(),
            file2 = %second.display(),
            identical = run.identical,
            "Compared pair"
        );
        runs.push(run);
    }

    let identical = runs.iter().all(|run| run.identical);
    let rendered: String = runs.iter().map(DiffReport::render).collect();
    write_text_output(args.output.as_deref(), &rendered)?;
    if let Some(report_path) = args.report.as_deref() {
        write_json_report(report_path, identical, &runs)?;
    }

    if identical { Ok(0) } else { Ok(1) }
}
