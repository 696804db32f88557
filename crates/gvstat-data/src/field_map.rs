//! Decoding of packed `key::value||key::value` fields
//!
//! The incident dataset stores a variable number of participants per row by
//! packing one attribute of every participant into a single string:
//!
//! ```text
//! 0::Male||1::Female||2::Male
//! ```
//!
//! The key is the participant index within the incident and the value is the
//! attribute (gender, age, type, status, ...). The literal `NA` stands for
//! "no data".
//!
//! Upstream entries are inconsistent, so decoding is tolerant: a segment that
//! is not exactly one `key::value` pair contributes nothing, and the remaining
//! segments are still decoded. When a key repeats, the first value is kept.
//!
//! # Examples
//!
//! ```
//! use gvstat_data::field_map::parse_field_mapping;
//!
//! let mapping = parse_field_mapping("0::Victim||bad||1::Subject-Suspect||0::Victim");
//! assert_eq!(mapping.len(), 2);
//! assert_eq!(mapping.get("0"), Some("Victim"));
//! assert_eq!(mapping.get("1"), Some("Subject-Suspect"));
//! ```

use std::collections::{BTreeMap, BTreeSet, btree_map};

use serde::{Deserialize, Serialize};

/// Placeholder for a field with no data.
pub const NO_DATA: &str = "NA";

const SEGMENT_SEPARATOR: &str = "||";
const PAIR_SEPARATOR: &str = "::";

/// Mapping decoded from one packed field, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping {
    entries: BTreeMap<String, String>,
}

impl FieldMapping {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    /// Inserts `key -> value` unless `key` is already present.
    ///
    /// Returns `true` if the entry was inserted.
    pub fn insert_first(&mut self, key: &str, value: &str) -> bool {
        match self.entries.entry(key.to_owned()) {
            btree_map::Entry::Vacant(entry) => {
                entry.insert(value.to_owned());
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }
}

/// Splits one segment into its key and value.
///
/// Returns `None` unless the segment contains exactly one `::` separator.
///
/// # Examples
///
/// ```
/// use gvstat_data::field_map::parse_segment;
///
/// assert_eq!(parse_segment("0::Male"), Some(("0", "Male")));
/// assert_eq!(parse_segment("Male"), None);
/// assert_eq!(parse_segment("0::Male::x"), None);
/// assert_eq!(parse_segment(""), None);
/// ```
#[must_use]
pub fn parse_segment(segment: &str) -> Option<(&str, &str)> {
    let (key, value) = segment.split_once(PAIR_SEPARATOR)?;
    if value.contains(PAIR_SEPARATOR) {
        return None;
    }
    Some((key, value))
}

/// Decodes a packed field into a mapping.
///
/// `NA` and the empty string yield an empty mapping. Malformed segments are
/// dropped and duplicate keys keep their first value. This function never fails.
#[must_use]
pub fn parse_field_mapping(field: &str) -> FieldMapping {
    let mut mapping = FieldMapping::default();
    if field.is_empty() || field == NO_DATA {
        return mapping;
    }
    for (key, value) in field.split(SEGMENT_SEPARATOR).filter_map(parse_segment) {
        mapping.insert_first(key, value);
    }
    mapping
}

/// Collects every distinct value across a set of mappings.
///
/// # Examples
///
/// ```
/// use gvstat_data::field_map::{distinct_values, parse_field_mapping};
///
/// let rows = [
///     parse_field_mapping("0::Male||1::Female"),
///     parse_field_mapping("0::Male"),
///     parse_field_mapping("NA"),
/// ];
/// let values = distinct_values(&rows);
/// assert_eq!(values.into_iter().collect::<Vec<_>>(), ["Female", "Male"]);
/// ```
pub fn distinct_values<'a, I>(mappings: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a FieldMapping>,
{
    mappings
        .into_iter()
        .flat_map(FieldMapping::values)
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(mapping: &FieldMapping) -> Vec<(&str, &str)> {
        mapping.iter().collect()
    }

    #[test]
    fn test_no_data() {
        assert!(parse_field_mapping("NA").is_empty());
        assert!(parse_field_mapping("").is_empty());
    }

    #[test]
    fn test_malformed_segment_dropped() {
        let mapping = parse_field_mapping("a::1||bad||b::2");
        assert_eq!(pairs(&mapping), [("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_first_wins() {
        let mapping = parse_field_mapping("a::1||a::2");
        assert_eq!(pairs(&mapping), [("a", "1")]);
    }

    #[test]
    fn test_extra_separator_and_empty_segments_dropped() {
        let mapping = parse_field_mapping("||a::1::2||||b::3||");
        assert_eq!(pairs(&mapping), [("b", "3")]);
    }

    #[test]
    fn test_empty_key_or_value_kept() {
        let mapping = parse_field_mapping("::x||k::");
        assert_eq!(pairs(&mapping), [("", "x"), ("k", "")]);
    }

    #[test]
    fn test_valid_segments_roundtrip_first_seen() {
        let input = [("0", "Male"), ("1", "Female"), ("0", "Female"), ("2", "Male")];
        let field = input
            .iter()
            .map(|(k, v)| format!("{k}::{v}"))
            .collect::<Vec<_>>()
            .join("||");
        let mapping = parse_field_mapping(&field);
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.get("0"), Some("Male"));
        assert_eq!(mapping.get("1"), Some("Female"));
        assert_eq!(mapping.get("2"), Some("Male"));
    }

    #[test]
    fn test_real_world_field() {
        let mapping = parse_field_mapping("0::Adult 18+||1::Adult 18+||2::Teen 12-17");
        let values = distinct_values([&mapping]);
        assert_eq!(
            values.into_iter().collect::<Vec<_>>(),
            ["Adult 18+", "Teen 12-17"]
        );
    }
}
