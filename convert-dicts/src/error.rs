use thiserror::Error;

/// Errors that abort processing of a single archive.
///
/// The run driver catches these per archive, logs them, and moves on to
/// the next archive, so none of them ends the batch.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The frequency field was not an object, string, or integer.
    #[error("unsupported frequency format: {0}")]
    UnsupportedFormat(serde_json::Value),

    #[error("term \"{word}\" has no `value` or `frequency` field")]
    MissingFrequency { word: String },

    #[error("nested frequency object for term \"{word}\" has no `value` field")]
    MissingNestedValue { word: String },

    #[error("frequency for term \"{word}\" is not a number or string: {value}")]
    InvalidFrequencyValue {
        word: String,
        value: serde_json::Value,
    },

    /// Numeric and string frequency keys have no defined ordering against
    /// each other, so an archive mixing them cannot be sorted.
    #[error("archive mixes numeric and string frequency keys")]
    MixedKeyKinds,

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
