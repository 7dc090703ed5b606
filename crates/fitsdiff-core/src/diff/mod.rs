pub mod arrays;
pub mod exclusions;
pub mod headers;
pub mod images;
pub mod report;
pub mod tables;

pub use arrays::{CoordinateSet, display_location, locate_differences};
pub use exclusions::ExclusionSet;
pub use headers::HeaderIndex;
pub use report::{DiffLog, PrintBudget};

use crate::domain::{DiffResult, FileLabels, FitsDiffError};
use crate::hdu::{Hdu, HduList, HduSource};
use serde::Serialize;
use std::path::Path;

/// Knobs of one comparison run.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffConfig {
    /// Keywords whose values are not compared; comma list, `@file` or `*`.
    pub value_exclusions: String,
    /// Keywords whose comments are not compared; same forms as the values.
    pub comment_exclusions: String,
    /// Table columns not compared, matched against both sides' names.
    pub field_exclusions: String,
    /// Cap on printed per-element detail lines per unit; negative behaves
    /// like zero.
    pub max_diff: i64,
    /// Relative numeric tolerance; zero compares exactly.
    pub delta: f64,
    /// Ignore trailing blanks of text card values.
    pub neglect_blanks: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            value_exclusions: String::new(),
            comment_exclusions: String::new(),
            field_exclusions: String::new(),
            max_diff: 10,
            delta: 0.0,
            neglect_blanks: true,
        }
    }
}

/// Outcome of one file-pair comparison.
#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    pub identical: bool,
    pub file1: String,
    pub file2: String,
    pub unit_count: usize,
    pub units: Vec<UnitDiffSummary>,
    pub lines: Vec<String>,
}

impl DiffReport {
    /// Full textual report with a trailing newline.
    pub fn render(&self) -> String {
        let mut rendered = self.lines.join("\n");
        rendered.push('\n');
        rendered
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitDiffSummary {
    pub label: String,
    pub header_differs: bool,
    pub data_differs: bool,
    pub data_difference_count: u64,
}

/// Opens both files through `source` and compares them unit by unit.
pub fn run_diff(
    config: &DiffConfig,
    source: &dyn HduSource,
    first_path: &Path,
    second_path: &Path,
) -> DiffResult<DiffReport> {
    let labels = FileLabels::new(
        first_path.display().to_string(),
        second_path.display().to_string(),
    );
    let first = source.open(first_path)?;
    let second = source.open(second_path)?;
    compare_hdu_lists(config, &first, &second, &labels)
}

/// Compares two already-loaded unit lists.
///
/// Only two conditions abort the run: the lists disagreeing on unit count,
/// and (through [`run_diff`]) a file that cannot be opened. Everything else
/// becomes report lines.
pub fn compare_hdu_lists(
    config: &DiffConfig,
    first: &HduList,
    second: &HduList,
    labels: &FileLabels,
) -> DiffResult<DiffReport> {
    let value_exclusions = ExclusionSet::parse(&config.value_exclusions);
    let comment_exclusions = ExclusionSet::parse(&config.comment_exclusions);
    let field_exclusions = ExclusionSet::parse(&config.field_exclusions);
    let delta = config.delta.max(0.0);
    let budget_limit = usize::try_from(config.max_diff).unwrap_or(0);

    let mut log = DiffLog::new();
    for set in [&value_exclusions, &comment_exclusions, &field_exclusions] {
        if let Some(caution) = set.caution() {
            log.push(caution);
        }
    }

    log.push(format!(" fitsdiff: {}", env!("CARGO_PKG_VERSION")));
    log.push(format!(" file1 = {}", labels.first));
    log.push(format!(" file2 = {}", labels.second));
    log.push(format!(
        " Keyword(s) not to be compared: {:?}",
        value_exclusions.tokens()
    ));
    log.push(format!(
        " Keyword comment(s) not to be compared: {:?}",
        comment_exclusions.tokens()
    ));
    log.push(format!(
        " Table column(s) not to be compared: {:?}",
        field_exclusions.tokens()
    ));
    log.push(format!(
        " Maximum number of different data points to be reported: {budget_limit}"
    ));
    log.push(format!(
        " Relative tolerance for numerical comparisons: {delta}"
    ));

    if first.len() != second.len() {
        return Err(FitsDiffError::UnitCountMismatch {
            first: labels.first.clone(),
            second: labels.second.clone(),
            first_count: first.len(),
            second_count: second.len(),
        });
    }

    let mut units = Vec::with_capacity(first.len());
    for (index, (unit1, unit2)) in first.hdus.iter().zip(&second.hdus).enumerate() {
        let label = unit_label(index, unit1, unit2);
        log.blank();
        log.push(format!("{label}:"));

        let marks_before_header = log.marks();
        let first_index = HeaderIndex::build(&unit1.cards, config.neglect_blanks);
        let second_index = HeaderIndex::build(&unit2.cards, config.neglect_blanks);
        headers::report_extra_keywords(&first_index, &second_index, labels, &mut log);
        if !value_exclusions.excludes_all() {
            headers::compare_keyword_values(
                &first_index,
                &second_index,
                &value_exclusions,
                delta,
                labels,
                &mut log,
            );
        }
        if !comment_exclusions.excludes_all() {
            headers::compare_keyword_comments(
                &first_index,
                &second_index,
                &comment_exclusions,
                labels,
                &mut log,
            );
        }
        let header_differs = log.marks() > marks_before_header;

        let marks_before_data = log.marks();
        let mut data_difference_count = 0;
        if let Some(shape) = validate_dimensions(unit1, unit2, &mut log) {
            // Each unit draws detail lines from a fresh budget.
            let mut budget = PrintBudget::new(budget_limit);
            if unit1.is_tabular() || unit2.is_tabular() {
                if !field_exclusions.excludes_all() {
                    data_difference_count = tables::compare_tables(
                        unit1,
                        unit2,
                        delta,
                        &field_exclusions,
                        &mut budget,
                        labels,
                        &mut log,
                    );
                }
            } else {
                data_difference_count = images::compare_images(
                    unit1,
                    unit2,
                    &shape,
                    delta,
                    &mut budget,
                    labels,
                    &mut log,
                );
            }
        }
        let data_differs = log.marks() > marks_before_data;

        units.push(UnitDiffSummary {
            label,
            header_differs,
            data_differs,
            data_difference_count,
        });
    }

    let identical = !log.difference_found();
    if identical {
        log.blank();
        log.push("No difference is found.");
    }

    Ok(DiffReport {
        identical,
        file1: labels.first.clone(),
        file2: labels.second.clone(),
        unit_count: first.len(),
        units,
        lines: log.into_lines(),
    })
}

fn unit_label(index: usize, first: &Hdu, second: &Hdu) -> String {
    if index == 0 {
        return "Primary HDU".to_string();
    }
    match first.extension_tag().or_else(|| second.extension_tag()) {
        Some(tag) if !tag.is_empty() => format!("{tag} Extension {index} HDU"),
        _ => format!("Extension {index} HDU"),
    }
}

/// Compares declared shapes before any payload walk. A mismatch or naught
/// dimensionality stops the data comparison for this unit; only the mismatch
/// counts as a difference.
pub(crate) fn validate_dimensions(
    first: &Hdu,
    second: &Hdu,
    log: &mut DiffLog,
) -> Option<Vec<usize>> {
    if first.shape != second.shape {
        log.push("Input files have different dimensions");
        log.mark_difference();
        return None;
    }
    if first.shape.is_empty() {
        log.push("Input files have naught dimensions");
        return None;
    }
    Some(first.shape.clone())
}
