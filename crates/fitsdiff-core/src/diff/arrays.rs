use crate::hdu::ElementArray;
use num_complex::{Complex32, Complex64};

/// Per-axis, zero-based storage-order indices of the discrepant elements
/// found by one array comparison. Axis `d` of discrepancy `p` is
/// `axes[d][p]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateSet {
    axes: Vec<Vec<usize>>,
}

impl CoordinateSet {
    fn empty(dimensions: usize) -> Self {
        Self {
            axes: vec![Vec::new(); dimensions],
        }
    }

    pub fn dimensions(&self) -> usize {
        self.axes.len()
    }

    pub fn len(&self) -> usize {
        self.axes.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push_flat(&mut self, shape: &[usize], flat: usize) {
        let mut remainder = flat;
        for axis in (0..shape.len()).rev() {
            self.axes[axis].push(remainder % shape[axis]);
            remainder /= shape[axis];
        }
    }

    /// Storage-order index vector of the `position`-th discrepancy.
    pub fn storage_indices(&self, position: usize) -> Vec<usize> {
        self.axes.iter().map(|axis| axis[position]).collect()
    }
}

/// Converts a storage-order index vector for display: axes reversed and
/// indices shifted to 1-based. The last entry of the result is the slowest
/// storage axis, the row number for table cells.
pub fn display_location(storage_indices: &[usize]) -> Vec<usize> {
    storage_indices.iter().rev().map(|index| index + 1).collect()
}

pub(crate) fn flat_index(storage_indices: &[usize], shape: &[usize]) -> usize {
    let mut flat = 0;
    for (&index, &extent) in storage_indices.iter().zip(shape) {
        flat = flat * extent + index;
    }
    flat
}

/// Asymmetric relative test shared by keyword and array comparisons: a gap
/// counts when it exceeds the tolerance-scaled magnitude of either operand.
pub(crate) fn exceeds_relative_envelope(first: f64, second: f64, delta: f64) -> bool {
    let gap = (second - first).abs();
    gap > (first * delta).abs() || gap > (second * delta).abs()
}

/// Element-level operations the locator needs from each supported kind.
trait DiffElement {
    fn differs_exactly(first: &Self, second: &Self) -> bool;
    /// `|second - first| / delta`; only evaluated with `delta > 0`.
    fn scaled_gap(first: &Self, second: &Self, delta: f64) -> f64;
    fn magnitude(&self) -> f64;
}

macro_rules! integer_diff_element {
    ($($kind:ty),*) => {
        $(impl DiffElement for $kind {
            fn differs_exactly(first: &Self, second: &Self) -> bool {
                first != second
            }

            fn scaled_gap(first: &Self, second: &Self, delta: f64) -> f64 {
                ((*second as f64) - (*first as f64)).abs() / delta
            }

            fn magnitude(&self) -> f64 {
                (*self as f64).abs()
            }
        })*
    };
}

integer_diff_element!(u8, i16, i32, i64);

impl DiffElement for f32 {
    fn differs_exactly(first: &Self, second: &Self) -> bool {
        first != second
    }

    fn scaled_gap(first: &Self, second: &Self, delta: f64) -> f64 {
        (f64::from(*second) - f64::from(*first)).abs() / delta
    }

    fn magnitude(&self) -> f64 {
        f64::from(*self).abs()
    }
}

impl DiffElement for f64 {
    fn differs_exactly(first: &Self, second: &Self) -> bool {
        first != second
    }

    fn scaled_gap(first: &Self, second: &Self, delta: f64) -> f64 {
        (second - first).abs() / delta
    }

    fn magnitude(&self) -> f64 {
        self.abs()
    }
}

impl DiffElement for Complex32 {
    fn differs_exactly(first: &Self, second: &Self) -> bool {
        first != second
    }

    fn scaled_gap(first: &Self, second: &Self, delta: f64) -> f64 {
        f64::from((second - first).norm()) / delta
    }

    fn magnitude(&self) -> f64 {
        f64::from(self.norm())
    }
}

impl DiffElement for Complex64 {
    fn differs_exactly(first: &Self, second: &Self) -> bool {
        first != second
    }

    fn scaled_gap(first: &Self, second: &Self, delta: f64) -> f64 {
        (second - first).norm() / delta
    }

    fn magnitude(&self) -> f64 {
        self.norm()
    }
}

// Text never reaches the tolerant path; the stubs keep the locator generic.
impl DiffElement for String {
    fn differs_exactly(first: &Self, second: &Self) -> bool {
        first != second
    }

    fn scaled_gap(_first: &Self, _second: &Self, _delta: f64) -> f64 {
        0.0
    }

    fn magnitude(&self) -> f64 {
        0.0
    }
}

impl DiffElement for bool {
    fn differs_exactly(first: &Self, second: &Self) -> bool {
        first != second
    }

    fn scaled_gap(first: &Self, second: &Self, delta: f64) -> f64 {
        (f64::from(u8::from(*second)) - f64::from(u8::from(*first))).abs() / delta
    }

    fn magnitude(&self) -> f64 {
        f64::from(u8::from(*self))
    }
}

/// Locates every element pair whose divergence exceeds the relative
/// tolerance `delta`, or every unequal pair when `delta` is zero.
///
/// Both operands must share `shape`; logical and text arrays are always
/// compared exactly whatever tolerance was requested.
pub fn locate_differences(
    first: &ElementArray,
    second: &ElementArray,
    shape: &[usize],
    delta: f64,
) -> CoordinateSet {
    let delta = if first.kind().forces_exact() {
        0.0
    } else {
        delta
    };
    match (first, second) {
        (ElementArray::Logical(a), ElementArray::Logical(b)) => locate_in(a, b, shape, delta),
        (ElementArray::Byte(a), ElementArray::Byte(b)) => locate_in(a, b, shape, delta),
        (ElementArray::Int16(a), ElementArray::Int16(b)) => locate_in(a, b, shape, delta),
        (ElementArray::Int32(a), ElementArray::Int32(b)) => locate_in(a, b, shape, delta),
        (ElementArray::Int64(a), ElementArray::Int64(b)) => locate_in(a, b, shape, delta),
        (ElementArray::Float32(a), ElementArray::Float32(b)) => locate_in(a, b, shape, delta),
        (ElementArray::Float64(a), ElementArray::Float64(b)) => locate_in(a, b, shape, delta),
        (ElementArray::Complex32(a), ElementArray::Complex32(b)) => locate_in(a, b, shape, delta),
        (ElementArray::Complex64(a), ElementArray::Complex64(b)) => locate_in(a, b, shape, delta),
        (ElementArray::Text(a), ElementArray::Text(b)) => locate_in(a, b, shape, delta),
        // Mismatched kinds are rejected by the comparators before this point.
        _ => CoordinateSet::empty(shape.len()),
    }
}

fn locate_in<T: DiffElement>(
    first: &[T],
    second: &[T],
    shape: &[usize],
    delta: f64,
) -> CoordinateSet {
    let mut found = CoordinateSet::empty(shape.len());
    let total = first.len().min(second.len());

    if delta == 0.0 {
        for flat in 0..total {
            if T::differs_exactly(&first[flat], &second[flat]) {
                found.push_flat(shape, flat);
            }
        }
        return found;
    }

    let candidates: Vec<usize> = (0..total)
        .filter(|&flat| T::scaled_gap(&first[flat], &second[flat], delta) != 0.0)
        .collect();
    if candidates.is_empty() {
        return found;
    }

    if candidates.len() < total / 3 {
        // Few candidates: test only the extracted positions.
        for &flat in &candidates {
            let gap = T::scaled_gap(&first[flat], &second[flat], delta);
            if gap > first[flat].magnitude() || gap > second[flat].magnitude() {
                found.push_flat(shape, flat);
            }
        }
    } else {
        // Dense disagreement: sweep the whole arrays in one pass.
        for flat in 0..total {
            let gap = T::scaled_gap(&first[flat], &second[flat], delta);
            if gap > first[flat].magnitude() || gap > second[flat].magnitude() {
                found.push_flat(shape, flat);
            }
        }
    }

    found
}
