//! The per-archive pipeline and the directory-level run driver.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{debug, error, info, warn};
use rand::Rng;
use zip::ZipArchive;

use crate::archive;
use crate::error::ConvertError;
use crate::frequency_list::{self, FrequencyListEntry, MergePolicy, SortOrder};
use crate::term_bank::{self, FrequencyBuckets};

/// Settings for one conversion run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub order: SortOrder,
    pub merge_policy: MergePolicy,
    /// Number of random spot-check entries printed per converted list.
    pub tests: usize,
}

/// Build the frequency list for a single archive.
pub fn convert_archive(
    path: &Path,
    order: SortOrder,
    policy: MergePolicy,
) -> Result<Vec<FrequencyListEntry>, ConvertError> {
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    info!("Processing archive: {name}.");

    let file = File::open(path)?;
    let mut zip = ZipArchive::new(file)?;
    let term_banks = archive::term_bank_names(&mut zip)?;
    debug!("Found {} term bank files in {name}.", term_banks.len());

    let mut buckets = FrequencyBuckets::default();
    for bank in &term_banks {
        debug!("Processing term bank: {bank}.");
        let reader = BufReader::new(zip.by_name(bank)?);
        let partial = term_bank::parse_term_bank(reader)?;
        frequency_list::merge_buckets(&mut buckets, partial, policy);
    }

    debug!("Creating a frequency list.");
    frequency_list::assemble(buckets, order)
}

/// Convert every archive in the input directory.
///
/// Failures are contained per archive: a broken archive is logged and
/// skipped, and the run carries on with the next one.
pub fn run(config: &RunConfig) -> anyhow::Result<()> {
    info!("Starting conversion process.");

    fs::create_dir_all(&config.output).with_context(|| {
        format!(
            "failed to create output directory {}",
            config.output.display()
        )
    })?;

    let entries = fs::read_dir(&config.input).with_context(|| {
        format!("failed to read input directory {}", config.input.display())
    })?;

    for dir_entry in entries {
        let path = dir_entry?.path();
        let name = path.file_name().unwrap_or_default().to_string_lossy().into_owned();

        if path.extension().and_then(|ext| ext.to_str()) != Some("zip") {
            let suffix = path
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_default();
            println!("Can't convert {name}: {suffix} is not a valid dictionary format. Skipping.");
            warn!("Skipped {name}: unsupported format.");
            continue;
        }

        if let Err(err) = convert_one(&path, config) {
            let message = format!("Unexpected error converting {name}. Skipping.");
            println!("{message}");
            error!("{message}\n{err:?}");
        }
    }

    info!("Conversion process complete.");
    Ok(())
}

/// Convert one archive and write its output file; everything in here is
/// covered by the caller's per-archive guard.
fn convert_one(path: &Path, config: &RunConfig) -> anyhow::Result<()> {
    let list = convert_archive(path, config.order, config.merge_policy)?;

    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let output_name = format!("{stem}.json");
    let output_path = config.output.join(&output_name);
    frequency_list::write_frequency_list(&list, &output_path)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    let name = path.file_name().unwrap_or_default().to_string_lossy();
    println!("Successfully converted {name} to {output_name}");
    info!("Conversion of {name} successful.");

    if config.tests > 0 {
        print_test_cases(&list, config.tests);
    }

    Ok(())
}

/// Print random entries so a conversion can be spot-checked by hand.
/// Samples with replacement, matching positions as a human would count
/// them (from 1).
fn print_test_cases(list: &[FrequencyListEntry], count: usize) {
    if list.is_empty() {
        return;
    }
    println!("Tests:");
    let mut rng = rand::rng();
    for _ in 0..count {
        let position = rng.random_range(0..list.len());
        println!("Position {}: {}", position + 1, list[position]);
    }
}
