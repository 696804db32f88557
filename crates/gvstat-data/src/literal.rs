//! Safe decoding of textual participant lists
//!
//! The per-role tables carry each incident's participants as a list literal:
//!
//! ```text
//! [{'age': 20, 'gender': 'Male', 'status': 'Injured'}, {'age': 31, 'gender': 'Female'}]
//! ```
//!
//! The literal is decoded with a small PEG grammar and is never evaluated.
//! Supported values are quoted strings (single or double quotes, backslash
//! escapes), integers, floats, `None`, `True` and `False`.
//!
//! A dictionary that does not match the grammar is skipped and decoding
//! continues with the next one, so a single bad entry cannot hide the rest of
//! the row. Only a text that is not a list at all is reported as an error.

use std::collections::BTreeMap;

use pest::{Parser as _, iterators::Pair};

use crate::participant::{Gender, Participant, age_from_float, age_from_int, parse_age};

#[derive(pest_derive::Parser)]
#[grammar = "participant_list.pest"]
struct ParticipantListParser;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ParseListError {
    #[display("invalid participant list: {message}")]
    Syntax { message: String },
}

/// A scalar value inside a participant dictionary.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
}

/// One decoded participant dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiteralEntry {
    pub fields: BTreeMap<String, LiteralValue>,
}

impl LiteralEntry {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&LiteralValue> {
        self.fields.get(key)
    }

    fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            LiteralValue::Str(value) => Some(value),
            _ => None,
        }
    }

    /// The `age` field as a non-negative integer, if it is one.
    #[must_use]
    pub fn age(&self) -> Option<u32> {
        match self.get("age")? {
            LiteralValue::Int(value) => age_from_int(*value),
            LiteralValue::Float(value) => age_from_float(*value),
            LiteralValue::Str(value) => parse_age(value),
            LiteralValue::Bool(_) | LiteralValue::None => None,
        }
    }

    #[must_use]
    pub fn to_participant(&self) -> Participant {
        Participant {
            age: self.age(),
            gender: Gender::parse(self.get_str("gender").unwrap_or_default()),
            status: self.get_str("status").map(str::to_owned),
        }
    }
}

/// Decodes a participant list literal.
///
/// Malformed entries are skipped; the error case is reserved for text that is
/// not a bracketed list.
///
/// # Examples
///
/// ```
/// use gvstat_data::literal::parse_participant_list;
///
/// let entries =
///     parse_participant_list("[{'age': 20, 'gender': 'Male'}, {'age': oops}, {'age': 7}]")?;
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[0].age(), Some(20));
/// assert_eq!(entries[1].age(), Some(7));
/// # Ok::<(), gvstat_data::literal::ParseListError>(())
/// ```
pub fn parse_participant_list(text: &str) -> Result<Vec<LiteralEntry>, ParseListError> {
    let mut pairs = ParticipantListParser::parse(Rule::list, text).map_err(|err| {
        ParseListError::Syntax {
            message: err.to_string(),
        }
    })?;

    let mut entries = vec![];
    let mut skipped = 0;
    let Some(list) = pairs.next() else {
        return Ok(entries);
    };
    for item in list.into_inner() {
        match item.as_rule() {
            Rule::entry => match parse_entry(item) {
                Some(entry) => entries.push(entry),
                None => skipped += 1,
            },
            Rule::skipped => skipped += 1,
            _ => {}
        }
    }
    if skipped > 0 {
        log::debug!("skipped {skipped} malformed participant entries");
    }
    Ok(entries)
}

/// Decodes a participant list, treating an undecodable text as an empty list.
#[must_use]
pub fn participants_from_literal(text: &str) -> Vec<Participant> {
    match parse_participant_list(text) {
        Ok(entries) => entries.iter().map(LiteralEntry::to_participant).collect(),
        Err(err) => {
            log::debug!("ignoring row: {err}");
            vec![]
        }
    }
}

/// Encodes participants in the literal form read by [`parse_participant_list`].
///
/// Absent fields are omitted.
///
/// # Examples
///
/// ```
/// use gvstat_data::{
///     literal::format_participant_list,
///     participant::{Gender, Participant},
/// };
///
/// let participants = [Participant::new(Some(20), Gender::Male, Some("Injured".into()))];
/// assert_eq!(
///     format_participant_list(&participants),
///     "[{'age': 20, 'gender': 'Male', 'status': 'Injured'}]"
/// );
/// ```
#[must_use]
pub fn format_participant_list(participants: &[Participant]) -> String {
    let entries = participants
        .iter()
        .map(|participant| {
            let mut fields = vec![];
            if let Some(age) = participant.age {
                fields.push(format!("'age': {age}"));
            }
            fields.push(format!("'gender': {}", quote(participant.gender.as_str())));
            if let Some(status) = &participant.status {
                fields.push(format!("'status': {}", quote(status)));
            }
            format!("{{{}}}", fields.join(", "))
        })
        .collect::<Vec<_>>();
    format!("[{}]", entries.join(", "))
}

fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        match ch {
            '\'' | '\\' => {
                quoted.push('\\');
                quoted.push(ch);
            }
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('\'');
    quoted
}

fn unescape(raw: &str) -> String {
    let mut value = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            value.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some(other) => value.push(other),
            None => value.push('\\'),
        }
    }
    value
}

fn parse_string(pair: Pair<'_, Rule>) -> Option<String> {
    let inner = pair.into_inner().next()?;
    Some(unescape(inner.as_str()))
}

fn parse_value(pair: Pair<'_, Rule>) -> Option<LiteralValue> {
    let value = match pair.as_rule() {
        Rule::string => LiteralValue::Str(parse_string(pair)?),
        Rule::integer => LiteralValue::Int(pair.as_str().parse().ok()?),
        Rule::float => LiteralValue::Float(pair.as_str().parse().ok()?),
        Rule::boolean => LiteralValue::Bool(pair.as_str() == "True"),
        Rule::none => LiteralValue::None,
        _ => return None,
    };
    Some(value)
}

fn parse_entry(entry: Pair<'_, Rule>) -> Option<LiteralEntry> {
    let mut fields = BTreeMap::new();
    for pair in entry.into_inner() {
        let mut inner = pair.into_inner();
        let key = parse_string(inner.next()?)?;
        let value = parse_value(inner.next()?)?;
        // Later keys override earlier ones, as in a dict display.
        fields.insert(key, value);
    }
    Some(LiteralEntry { fields })
}
