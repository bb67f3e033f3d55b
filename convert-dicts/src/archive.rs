//! Scanning dictionary archives for term-bank entries.

use std::io::{Read, Seek};

use zip::ZipArchive;

use crate::error::ConvertError;
use crate::term_bank::TERM_BANK_PREFIX;

/// Names of the term-bank entries in `archive`, in archive order.
///
/// Nothing beyond the name prefix is filtered; a corrupt archive surfaces
/// as a zip error for the caller's per-archive guard.
pub fn term_bank_names<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<Vec<String>, ConvertError> {
    let mut names = Vec::new();
    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        if entry.name().starts_with(TERM_BANK_PREFIX) {
            names.push(entry.name().to_string());
        }
    }
    Ok(names)
}
