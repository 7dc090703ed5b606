use super::arrays::{display_location, flat_index, locate_differences};
use super::report::{DiffLog, PrintBudget, data_point_count_line, display_indices};
use crate::domain::FileLabels;
use crate::hdu::{ElementArray, Hdu, Payload};

fn array_data(unit: &Hdu) -> Option<&ElementArray> {
    match &unit.payload {
        Payload::Array { data } => Some(data),
        _ => None,
    }
}

/// Compares two array units element-wise and returns the discrepancy count.
///
/// Integer payloads are always compared exactly; the requested tolerance only
/// reaches floating and complex images.
pub(crate) fn compare_images(
    first: &Hdu,
    second: &Hdu,
    shape: &[usize],
    delta: f64,
    budget: &mut PrintBudget,
    labels: &FileLabels,
    log: &mut DiffLog,
) -> u64 {
    let (first_data, second_data) = match (array_data(first), array_data(second)) {
        (None, None) => return 0,
        (Some(_), None) | (None, Some(_)) => {
            log.push("One file has no data and the other does.");
            log.mark_difference();
            return 0;
        }
        (Some(lhs), Some(rhs)) => (lhs, rhs),
    };

    if first_data.kind() != second_data.kind() {
        log.push(format!(
            "Input files have different data types: {} is {}, {} is {}",
            labels.first,
            first_data.kind(),
            labels.second,
            second_data.kind()
        ));
        log.mark_difference();
        return 0;
    }

    let delta = if first_data.kind().is_integer() {
        0.0
    } else {
        delta
    };
    let found = locate_differences(first_data, second_data, shape, delta);
    let total = found.len() as u64;

    for position in 0..found.len() {
        if !budget.take() {
            break;
        }
        let storage = found.storage_indices(position);
        let location = display_location(&storage);
        let flat = flat_index(&storage, shape);
        log.push(format!(
            "    Data differ at {:>16}, file 1: {:>11} file 2: {:>11}",
            display_indices(&location),
            first_data.display_element(flat),
            second_data.display_element(flat)
        ));
    }

    log.push(data_point_count_line(total));
    if total > 0 {
        log.mark_difference();
    }
    total
}
