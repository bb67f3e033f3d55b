//! Parsing of term-bank files into frequency buckets.
//!
//! A term bank is a JSON array of three-element rows. Position 0 is the
//! word, position 1 is a mode marker the converter ignores, and position 2
//! carries the frequency information in one of three shapes that vary
//! between dictionaries: a bare integer rank, a `"rank/total"` style
//! string, or a detail object with an optional reading.

use std::fmt;
use std::io::Read;

use indexmap::IndexMap;
use log::warn;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ConvertError;

/// Zip entries with this name prefix hold frequency data.
pub const TERM_BANK_PREFIX: &str = "term_meta_bank_";

/// One raw row of a term bank: `[word, mode, frequency info]`.
#[derive(Debug, Clone, Deserialize)]
pub struct TermMetaRow(pub String, pub Value, pub FrequencyInfo);

/// The frequency field of a row, one variant per supported shape.
///
/// Deserialization tries the variants in order, so anything that is not an
/// integer, a string, or an object falls through to `Unsupported` and
/// fails the archive.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FrequencyInfo {
    Rank(i64),
    Label(String),
    Detailed(FrequencyDetails),
    Unsupported(Value),
}

/// Object-shaped frequency info.
#[derive(Debug, Clone, Deserialize)]
pub struct FrequencyDetails {
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub frequency: Option<Value>,
    #[serde(default)]
    pub reading: Option<String>,
}

/// A parsed word with its reading already normalized to katakana.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEntry {
    pub word: String,
    pub reading: Option<String>,
}

/// The value words are bucketed and sorted by.
///
/// Whatever raw type the dictionary used is kept: comparability is only
/// guaranteed within one kind, and the assembler rejects archives that mix
/// kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrequencyKey {
    Number(serde_json::Number),
    Text(String),
}

impl FrequencyKey {
    pub fn is_number(&self) -> bool {
        matches!(self, FrequencyKey::Number(_))
    }
}

impl fmt::Display for FrequencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrequencyKey::Number(n) => write!(f, "{n}"),
            FrequencyKey::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Frequency key → entries sharing it, both in first-seen order.
pub type FrequencyBuckets = IndexMap<FrequencyKey, Vec<TermEntry>>;

/// Parse one term bank's JSON content into its bucket contribution.
pub fn parse_term_bank<R: Read>(reader: R) -> Result<FrequencyBuckets, ConvertError> {
    let rows: Vec<TermMetaRow> = serde_json::from_reader(reader)?;

    let mut buckets = FrequencyBuckets::default();
    for row in rows {
        let (key, entry) = resolve_row(row)?;
        buckets.entry(key).or_default().push(entry);
    }
    Ok(buckets)
}

/// Extract the frequency key and cleaned-up entry from one row.
fn resolve_row(row: TermMetaRow) -> Result<(FrequencyKey, TermEntry), ConvertError> {
    let TermMetaRow(raw_word, _mode, info) = row;

    // Some dictionaries ship words with a BOM glued on; strip it along
    // with surrounding whitespace.
    let word = raw_word.replace('\u{FEFF}', "").trim().to_string();

    match info {
        FrequencyInfo::Rank(rank) => Ok((
            FrequencyKey::Number(rank.into()),
            TermEntry { word, reading: None },
        )),
        FrequencyInfo::Label(label) => {
            // Labels like "1234/56789" rank by the part before the slash.
            let key = match label.split_once('/') {
                Some((rank, _)) => rank,
                None => label.as_str(),
            };
            Ok((
                FrequencyKey::Text(key.to_string()),
                TermEntry { word, reading: None },
            ))
        }
        FrequencyInfo::Detailed(details) => resolve_detailed(word, details),
        FrequencyInfo::Unsupported(value) => {
            warn!("Unsupported format for \"{word}\": {value}");
            Err(ConvertError::UnsupportedFormat(value))
        }
    }
}

fn resolve_detailed(
    word: String,
    details: FrequencyDetails,
) -> Result<(FrequencyKey, TermEntry), ConvertError> {
    let raw = match (details.value, details.frequency) {
        (Some(value), _) => value,
        (None, Some(frequency)) => frequency,
        (None, None) => return Err(ConvertError::MissingFrequency { word }),
    };

    // Some dictionaries nest the displayed value one level deeper, as in
    // {"frequency": {"value": 42, "displayValue": "42㉑"}}.
    let resolved = match raw {
        Value::Object(map) => map
            .get("value")
            .cloned()
            .ok_or_else(|| ConvertError::MissingNestedValue { word: word.clone() })?,
        other => other,
    };

    let key = match resolved {
        Value::Number(n) => FrequencyKey::Number(n),
        Value::String(s) => FrequencyKey::Text(s),
        value => return Err(ConvertError::InvalidFrequencyValue { word, value }),
    };

    let reading = details
        .reading
        .filter(|r| !r.is_empty())
        .map(|r| kana_utils::to_katakana(&r));

    Ok((key, TermEntry { word, reading }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(rows: serde_json::Value) -> Result<FrequencyBuckets, ConvertError> {
        parse_term_bank(rows.to_string().as_bytes())
    }

    fn number_key(n: i64) -> FrequencyKey {
        FrequencyKey::Number(n.into())
    }

    #[test]
    fn test_integer_rank_is_the_key() {
        let buckets = parse(json!([["猫", 0, 100]])).unwrap();
        let entries = buckets.get(&number_key(100)).unwrap();
        assert_eq!(entries[0].word, "猫");
        assert_eq!(entries[0].reading, None);
    }

    #[test]
    fn test_string_label_splits_on_slash() {
        let buckets = parse(json!([["猫", 0, "1234/56789"]])).unwrap();
        assert!(buckets.contains_key(&FrequencyKey::Text("1234".to_string())));

        let buckets = parse(json!([["犬", 0, "777"]])).unwrap();
        assert!(buckets.contains_key(&FrequencyKey::Text("777".to_string())));
    }

    #[test]
    fn test_detail_object_uses_value_field() {
        let buckets = parse(json!([["猫", 0, {"value": 12}]])).unwrap();
        assert!(buckets.contains_key(&number_key(12)));
    }

    #[test]
    fn test_detail_object_falls_back_to_frequency_field() {
        let buckets = parse(json!([["猫", 0, {"frequency": 34}]])).unwrap();
        assert!(buckets.contains_key(&number_key(34)));
    }

    #[test]
    fn test_nested_value_object_resolves_to_inner_value() {
        let buckets =
            parse(json!([["猫", 0, {"frequency": {"value": 42, "displayValue": "42㉑"}}]]))
                .unwrap();
        assert!(buckets.contains_key(&number_key(42)));
    }

    #[test]
    fn test_reading_is_converted_to_katakana() {
        let buckets = parse(json!([["犬", 0, {"value": 50, "reading": "いぬ"}]])).unwrap();
        let entries = buckets.get(&number_key(50)).unwrap();
        assert_eq!(entries[0].reading.as_deref(), Some("イヌ"));
    }

    #[test]
    fn test_empty_reading_is_dropped() {
        let buckets = parse(json!([["犬", 0, {"value": 50, "reading": ""}]])).unwrap();
        let entries = buckets.get(&number_key(50)).unwrap();
        assert_eq!(entries[0].reading, None);
    }

    #[test]
    fn test_bom_and_whitespace_are_stripped() {
        let buckets = parse(json!([["\u{FEFF}  猫 ", 0, 1]])).unwrap();
        let entries = buckets.get(&number_key(1)).unwrap();
        assert_eq!(entries[0].word, "猫");
    }

    #[test]
    fn test_entries_with_the_same_key_share_a_bucket() {
        let buckets = parse(json!([["猫", 0, 5], ["犬", 0, 5], ["鳥", 0, 7]])).unwrap();
        let entries = buckets.get(&number_key(5)).unwrap();
        let words: Vec<&str> = entries.iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, ["猫", "犬"]);
    }

    #[test]
    fn test_unsupported_shape_is_an_error() {
        let err = parse(json!([["猫", 0, [1, 2]]])).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat(_)));

        let err = parse(json!([["猫", 0, null]])).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_value_and_frequency_is_an_error() {
        let err = parse(json!([["猫", 0, {"reading": "ねこ"}]])).unwrap_err();
        assert!(matches!(err, ConvertError::MissingFrequency { .. }));
    }

    #[test]
    fn test_nested_object_without_value_is_an_error() {
        let err = parse(json!([["猫", 0, {"frequency": {"displayValue": "?"}}]])).unwrap_err();
        assert!(matches!(err, ConvertError::MissingNestedValue { .. }));
    }

    #[test]
    fn test_string_frequency_value_in_detail_object() {
        let buckets = parse(json!([["猫", 0, {"value": "common"}]])).unwrap();
        assert!(buckets.contains_key(&FrequencyKey::Text("common".to_string())));
    }
}
