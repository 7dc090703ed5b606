use num_complex::{Complex32, Complex64};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Parsed value of a header card.
///
/// Untagged so snapshot files can write card values as plain JSON scalars:
/// booleans become logicals, integral numbers integers, fractional numbers
/// reals and strings text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardValue {
    Logical(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Display for CardValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logical(true) => f.write_str("T"),
            Self::Logical(false) => f.write_str("F"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Real(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// One header card. A missing `value` models a valueless card such as
/// HISTORY, COMMENT or a blank keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<CardValue>,
    #[serde(default)]
    pub comment: String,
}

impl Card {
    pub fn new(keyword: impl Into<String>, value: Option<CardValue>) -> Self {
        Self {
            keyword: keyword.into(),
            value,
            comment: String::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

/// Element type of a payload array or table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Logical,
    Byte,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Complex32,
    Complex64,
    Text,
}

impl ElementKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Logical => "logical",
            Self::Byte => "byte",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex32 => "complex32",
            Self::Complex64 => "complex64",
            Self::Text => "text",
        }
    }

    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Byte | Self::Int16 | Self::Int32 | Self::Int64)
    }

    /// Kinds that are always compared exactly, whatever tolerance was asked
    /// for.
    pub const fn forces_exact(self) -> bool {
        matches!(self, Self::Logical | Self::Text)
    }
}

impl Display for ElementKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat element storage for one payload array or one table column, in
/// storage order (last axis fastest).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ElementArray {
    Logical(Vec<bool>),
    Byte(Vec<u8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Complex32(Vec<Complex32>),
    Complex64(Vec<Complex64>),
    Text(Vec<String>),
}

impl ElementArray {
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Logical(_) => ElementKind::Logical,
            Self::Byte(_) => ElementKind::Byte,
            Self::Int16(_) => ElementKind::Int16,
            Self::Int32(_) => ElementKind::Int32,
            Self::Int64(_) => ElementKind::Int64,
            Self::Float32(_) => ElementKind::Float32,
            Self::Float64(_) => ElementKind::Float64,
            Self::Complex32(_) => ElementKind::Complex32,
            Self::Complex64(_) => ElementKind::Complex64,
            Self::Text(_) => ElementKind::Text,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Logical(values) => values.len(),
            Self::Byte(values) => values.len(),
            Self::Int16(values) => values.len(),
            Self::Int32(values) => values.len(),
            Self::Int64(values) => values.len(),
            Self::Float32(values) => values.len(),
            Self::Float64(values) => values.len(),
            Self::Complex32(values) => values.len(),
            Self::Complex64(values) => values.len(),
            Self::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Renders the element at `index` for a report line.
    pub fn display_element(&self, index: usize) -> String {
        match self {
            Self::Logical(values) => if values[index] { "T" } else { "F" }.to_string(),
            Self::Byte(values) => values[index].to_string(),
            Self::Int16(values) => values[index].to_string(),
            Self::Int32(values) => values[index].to_string(),
            Self::Int64(values) => values[index].to_string(),
            Self::Float32(values) => values[index].to_string(),
            Self::Float64(values) => values[index].to_string(),
            Self::Complex32(values) => values[index].to_string(),
            Self::Complex64(values) => values[index].to_string(),
            Self::Text(values) => values[index].clone(),
        }
    }
}

/// One field of a tabular unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Declared field format tag, e.g. `1E`, `D` or `10A`.
    pub format: String,
    /// Storage-order cell shape; `[rows]` for scalar fields, `[rows, width]`
    /// for vector fields. Empty means one axis of `values.len()` elements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shape: Vec<usize>,
    pub values: ElementArray,
}

impl Column {
    pub fn storage_shape(&self) -> Vec<usize> {
        if self.shape.is_empty() {
            vec![self.values.len()]
        } else {
            self.shape.clone()
        }
    }
}

/// Data section of one unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    #[default]
    Absent,
    Array {
        data: ElementArray,
    },
    Table {
        columns: Vec<Column>,
    },
}

/// One header-data unit: cards, declared storage-order shape and payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Hdu {
    #[serde(default)]
    pub cards: Vec<Card>,
    /// Declared axis extents, slowest axis first. Empty means the unit has
    /// naught dimensions.
    #[serde(default)]
    pub shape: Vec<usize>,
    #[serde(default)]
    pub payload: Payload,
}

impl Hdu {
    pub fn is_tabular(&self) -> bool {
        matches!(self.payload, Payload::Table { .. })
    }

    /// XTENSION tag of this unit, if the header declares one.
    pub fn extension_tag(&self) -> Option<&str> {
        self.cards
            .iter()
            .find(|card| card.keyword.eq_ignore_ascii_case("XTENSION"))
            .and_then(|card| match &card.value {
                Some(CardValue::Text(tag)) => Some(tag.trim()),
                _ => None,
            })
    }
}

/// Ordered units of one FITS file, primary first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HduList {
    pub hdus: Vec<Hdu>,
}

impl HduList {
    pub fn len(&self) -> usize {
        self.hdus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hdus.is_empty()
    }
}
