use super::arrays::exceeds_relative_envelope;
use super::exclusions::ExclusionSet;
use super::report::{DiffLog, display_card_value};
use crate::domain::FileLabels;
use crate::hdu::{Card, CardValue};
use std::collections::BTreeMap;

/// Header cards of one unit grouped by keyword, occurrence order preserved.
///
/// Values and comments are kept in lockstep per keyword so the n-th entry of
/// both runs describes the n-th card carrying that keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderIndex {
    values: BTreeMap<String, Vec<Option<CardValue>>>,
    comments: BTreeMap<String, Vec<String>>,
}

impl HeaderIndex {
    /// Groups `cards` by upper-cased keyword. With `neglect_blanks` set,
    /// trailing whitespace of text values is dropped before comparison;
    /// comments are always taken verbatim.
    pub fn build(cards: &[Card], neglect_blanks: bool) -> Self {
        let mut values: BTreeMap<String, Vec<Option<CardValue>>> = BTreeMap::new();
        let mut comments: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for card in cards {
            let keyword = card.keyword.to_uppercase();
            let value = match &card.value {
                Some(CardValue::Text(text)) if neglect_blanks => {
                    Some(CardValue::Text(text.trim_end().to_string()))
                }
                other => other.clone(),
            };
            values.entry(keyword.clone()).or_default().push(value);
            comments
                .entry(keyword)
                .or_default()
                .push(card.comment.clone());
        }

        Self { values, comments }
    }

    /// Keywords in sorted order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.values.contains_key(keyword)
    }

    pub fn occurrences(&self, keyword: &str) -> usize {
        self.values.get(keyword).map_or(0, Vec::len)
    }

    pub fn values(&self, keyword: &str) -> &[Option<CardValue>] {
        self.values.get(keyword).map_or(&[], Vec::as_slice)
    }

    pub fn comments(&self, keyword: &str) -> &[String] {
        self.comments.get(keyword).map_or(&[], Vec::as_slice)
    }
}

/// Reports keywords present on only one side, and occurrence-count mismatches
/// for keywords present on both.
pub(crate) fn report_extra_keywords(
    first: &HeaderIndex,
    second: &HeaderIndex,
    labels: &FileLabels,
    log: &mut DiffLog,
) {
    for keyword in first.keywords() {
        if !second.contains(keyword) {
            log.push(format!(
                "  Extra keyword {:<8} in {}",
                keyword, labels.first
            ));
            log.mark_difference();
        } else if first.occurrences(keyword) != second.occurrences(keyword) {
            log.push(format!(
                "  Inconsistent occurrence of keyword {:<8} {} has {}, {} has {}",
                keyword,
                labels.first,
                first.occurrences(keyword),
                labels.second,
                second.occurrences(keyword)
            ));
            log.mark_difference();
        }
    }

    for keyword in second.keywords() {
        if !first.contains(keyword) {
            log.push(format!(
                "  Extra keyword {:<8} in {}",
                keyword, labels.second
            ));
            log.mark_difference();
        }
    }
}

/// Tolerance applies only to real-real pairs; an integer against a real is
/// equal when numerically equal, and every other pairing compares exactly.
fn card_values_differ(first: Option<&CardValue>, second: Option<&CardValue>, delta: f64) -> bool {
    match (first, second) {
        (Some(CardValue::Real(a)), Some(CardValue::Real(b))) => {
            exceeds_relative_envelope(*a, *b, delta)
        }
        (Some(CardValue::Integer(a)), Some(CardValue::Real(b)))
        | (Some(CardValue::Real(b)), Some(CardValue::Integer(a))) => (*a as f64) != *b,
        (lhs, rhs) => lhs != rhs,
    }
}

fn occurrence_suffix(index: usize) -> String {
    if index == 0 {
        String::new()
    } else {
        format!("[{}]", index + 1)
    }
}

pub(crate) fn compare_keyword_values(
    first: &HeaderIndex,
    second: &HeaderIndex,
    exclusions: &ExclusionSet,
    delta: f64,
    labels: &FileLabels,
    log: &mut DiffLog,
) {
    for keyword in first.keywords() {
        if !second.contains(keyword) || exclusions.excludes(keyword) {
            continue;
        }
        let first_values = first.values(keyword);
        let second_values = second.values(keyword);
        let shared = first_values.len().min(second_values.len());

        for index in 0..shared {
            let lhs = first_values[index].as_ref();
            let rhs = second_values[index].as_ref();
            if card_values_differ(lhs, rhs, delta) {
                log.push(format!(
                    "  Keyword {:<8}{} has different values:",
                    keyword,
                    occurrence_suffix(index)
                ));
                log.push(format!("    {}: {}", labels.first, display_card_value(lhs)));
                log.push(format!("    {}: {}", labels.second, display_card_value(rhs)));
                log.mark_difference();
            }
        }
    }
}

pub(crate) fn compare_keyword_comments(
    first: &HeaderIndex,
    second: &HeaderIndex,
    exclusions: &ExclusionSet,
    labels: &FileLabels,
    log: &mut DiffLog,
) {
    for keyword in first.keywords() {
        if !second.contains(keyword) || exclusions.excludes(keyword) {
            continue;
        }
        let first_comments = first.comments(keyword);
        let second_comments = second.comments(keyword);
        let shared = first_comments.len().min(second_comments.len());

        for index in 0..shared {
            if first_comments[index] != second_comments[index] {
                log.push(format!(
                    "  Keyword {:<8}{} has different comments:",
                    keyword,
                    occurrence_suffix(index)
                ));
                log.push(format!("    {}: {}", labels.first, first_comments[index]));
                log.push(format!("    {}: {}", labels.second, second_comments[index]));
                log.mark_difference();
            }
        }
    }
}
