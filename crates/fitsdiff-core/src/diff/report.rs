use crate::hdu::CardValue;

/// Accumulated report lines plus the run verdict.
///
/// Detectors append lines as they find discrepancies and flip the verdict
/// flag; the flag and the printed lines are deliberately independent so a
/// suppressed detail line still counts against the verdict.
#[derive(Debug, Default)]
pub struct DiffLog {
    lines: Vec<String>,
    marks: u64,
}

impl DiffLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Records that a difference was seen without printing anything.
    pub fn mark_difference(&mut self) {
        self.marks += 1;
    }

    pub fn difference_found(&self) -> bool {
        self.marks > 0
    }

    /// Running mark count, for attributing differences to a phase.
    pub(crate) fn marks(&self) -> u64 {
        self.marks
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Number of per-element detail lines one unit may still print.
///
/// Totals are never limited by the budget; only detail lines draw from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintBudget {
    remaining: usize,
}

impl PrintBudget {
    pub fn new(limit: usize) -> Self {
        Self { remaining: limit }
    }

    /// Takes one detail line from the budget, returning false once spent.
    pub fn take(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

pub(crate) fn display_card_value(value: Option<&CardValue>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "(undefined)".to_string(),
    }
}

/// `[3, 2]`-style rendering of a display-order location.
pub(crate) fn display_indices(indices: &[usize]) -> String {
    let rendered: Vec<String> = indices.iter().map(|index| index.to_string()).collect();
    format!("[{}]", rendered.join(", "))
}

pub(crate) fn data_point_count_line(count: u64) -> String {
    format!("    There are {count} different data points.")
}
