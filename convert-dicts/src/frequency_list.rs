//! Aggregation of per-bank buckets and assembly of the final list.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ConvertError;
use crate::term_bank::{FrequencyBuckets, FrequencyKey};

/// How same-key buckets from consecutive term banks combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Later banks' entries follow earlier ones, so nothing is lost when
    /// two banks emit the same key.
    #[default]
    Append,
    /// Later banks overwrite earlier ones for a shared key. Reproduces the
    /// shallow-merge semantics of older converters; only useful when their
    /// exact output must be matched.
    Replace,
}

/// Direction the frequency buckets are ordered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// The reverse flag means frequency values are occurrence counts, so
    /// bigger is more common and the list starts from the biggest value.
    pub fn from_reverse_flag(is_reverse: bool) -> Self {
        if is_reverse {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }
}

/// Fold one term bank's buckets into the archive-wide aggregate.
pub fn merge_buckets(
    aggregate: &mut FrequencyBuckets,
    bank: FrequencyBuckets,
    policy: MergePolicy,
) {
    for (key, entries) in bank {
        match policy {
            MergePolicy::Append => aggregate.entry(key).or_default().extend(entries),
            MergePolicy::Replace => {
                aggregate.insert(key, entries);
            }
        }
    }
}

/// One element of the output list: a bare word, or a word paired with its
/// katakana reading. Serializes as `"猫"` or `["犬","イヌ"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrequencyListEntry {
    WithReading(String, String),
    Word(String),
}

impl FrequencyListEntry {
    pub fn word(&self) -> &str {
        match self {
            FrequencyListEntry::WithReading(word, _) | FrequencyListEntry::Word(word) => word,
        }
    }
}

impl fmt::Display for FrequencyListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrequencyListEntry::Word(word) => write!(f, "{word}"),
            FrequencyListEntry::WithReading(word, reading) => write!(f, "{word} [{reading}]"),
        }
    }
}

/// Sort the buckets, flatten them, and drop repeated words.
///
/// A word is emitted at most once across the whole list, whichever form it
/// first appears in; later occurrences are skipped. Buckets whose keys mix
/// numbers and strings cannot be ordered and fail the archive.
pub fn assemble(
    buckets: FrequencyBuckets,
    order: SortOrder,
) -> Result<Vec<FrequencyListEntry>, ConvertError> {
    let numbers = buckets.keys().filter(|key| key.is_number()).count();
    if numbers != 0 && numbers != buckets.len() {
        return Err(ConvertError::MixedKeyKinds);
    }

    let mut sorted: Vec<_> = buckets.into_iter().collect();
    sorted.sort_by(|(a, _), (b, _)| compare_keys(a, b));
    if order == SortOrder::Descending {
        // Reversal happens at bucket level; entries inside a bucket keep
        // their first-seen order either way.
        sorted.reverse();
    }

    let mut list = Vec::new();
    let mut emitted: HashSet<String> = HashSet::new();
    for (key, entries) in sorted {
        for entry in entries {
            let item = match entry.reading {
                Some(reading) => FrequencyListEntry::WithReading(entry.word, reading),
                None => FrequencyListEntry::Word(entry.word),
            };
            if emitted.contains(item.word()) {
                debug!(
                    "Duplicate entry detected for {} at {key}. Skipping.",
                    item.word()
                );
                continue;
            }
            emitted.insert(item.word().to_string());
            list.push(item);
        }
    }
    Ok(list)
}

fn compare_keys(a: &FrequencyKey, b: &FrequencyKey) -> Ordering {
    match (a, b) {
        (FrequencyKey::Number(x), FrequencyKey::Number(y)) => compare_numbers(x, y),
        (FrequencyKey::Text(x), FrequencyKey::Text(y)) => x.cmp(y),
        // Unreachable: homogeneity is checked before sorting.
        _ => Ordering::Equal,
    }
}

fn compare_numbers(x: &serde_json::Number, y: &serde_json::Number) -> Ordering {
    match (x.as_i64(), y.as_i64()) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => x
            .as_f64()
            .unwrap_or(0.0)
            .total_cmp(&y.as_f64().unwrap_or(0.0)),
    }
}

/// Write the list as a single JSON array, UTF-8 encoded. Non-ASCII
/// characters are written literally, not `\u`-escaped.
pub fn write_frequency_list(
    list: &[FrequencyListEntry],
    path: &Path,
) -> Result<(), ConvertError> {
    debug!("Saving the frequency list.");
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, list)?;
    writer.flush()?;
    Ok(())
}
