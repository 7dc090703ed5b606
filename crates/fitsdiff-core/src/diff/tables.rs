use super::arrays::{display_location, flat_index, locate_differences};
use super::exclusions::ExclusionSet;
use super::report::{DiffLog, PrintBudget, data_point_count_line, display_indices};
use crate::domain::FileLabels;
use crate::hdu::{Column, Hdu, Payload};

fn table_columns(unit: &Hdu) -> Option<&[Column]> {
    match &unit.payload {
        Payload::Table { columns } => Some(columns),
        _ => None,
    }
}

/// Columns must agree on declared format, element kind and cell shape before
/// their values are walked.
fn column_mismatch(
    first: &Column,
    second: &Column,
    column_number: usize,
    labels: &FileLabels,
) -> Option<String> {
    if first.format != second.format {
        return Some(format!(
            "Different data type at column {column_number}: {} is {}, {} is {}",
            labels.first, first.format, labels.second, second.format
        ));
    }
    if first.values.kind() != second.values.kind() {
        return Some(format!(
            "Different data type at column {column_number}: {} is {}, {} is {}",
            labels.first,
            first.values.kind(),
            labels.second,
            second.values.kind()
        ));
    }
    if first.storage_shape() != second.storage_shape() {
        return Some(format!(
            "Different cell shape at column {column_number}: {} is {:?}, {} is {:?}",
            labels.first,
            first.storage_shape(),
            labels.second,
            second.storage_shape()
        ));
    }
    None
}

/// Compares two tabular units column by column and returns the total number
/// of discrepant cells. The print budget is shared across all columns of the
/// unit; the total is counted in full regardless.
pub(crate) fn compare_tables(
    first: &Hdu,
    second: &Hdu,
    delta: f64,
    exclusions: &ExclusionSet,
    budget: &mut PrintBudget,
    labels: &FileLabels,
    log: &mut DiffLog,
) -> u64 {
    let (first_columns, second_columns) = match (table_columns(first), table_columns(second)) {
        (None, None) => return 0,
        (Some(_), None) | (None, Some(_)) => {
            log.push("One file has no data and the other does.");
            log.mark_difference();
            return 0;
        }
        (Some(lhs), Some(rhs)) => (lhs, rhs),
    };

    if first_columns.len() != second_columns.len() {
        log.push(format!(
            "Different no. of columns: {} has {}, {} has {}",
            labels.first,
            first_columns.len(),
            labels.second,
            second_columns.len()
        ));
        log.mark_difference();
    }
    let shared = first_columns.len().min(second_columns.len());

    let mut total_found = 0u64;
    for (index, (column1, column2)) in first_columns[..shared]
        .iter()
        .zip(&second_columns[..shared])
        .enumerate()
    {
        let column_number = index + 1;
        if let Some(line) = column_mismatch(column1, column2, column_number, labels) {
            log.push(line);
            log.mark_difference();
            continue;
        }
        if exclusions.excludes(&column1.name) || exclusions.excludes(&column2.name) {
            continue;
        }

        let shape = column1.storage_shape();
        let found = locate_differences(&column1.values, &column2.values, &shape, delta);
        total_found += found.len() as u64;
        if found.is_empty() {
            continue;
        }

        if budget.remaining() > 0 {
            log.push(format!("    Data differ at column {column_number}:"));
        }
        for position in 0..found.len() {
            if !budget.take() {
                break;
            }
            let storage = found.storage_indices(position);
            let location = display_location(&storage);
            let row = location[location.len() - 1];
            let cell = if location.len() > 1 {
                format!(" at {},", display_indices(&location[..location.len() - 1]))
            } else {
                String::new()
            };
            let flat = flat_index(&storage, &shape);
            log.push(format!(
                "      Row {:>3},{} file 1: {:>16}    file 2: {:>16}",
                row,
                cell,
                column1.values.display_element(flat),
                column2.values.display_element(flat)
            ));
        }
    }

    log.push(data_point_count_line(total_found));
    if total_found > 0 {
        log.mark_difference();
    }
    total_found
}
