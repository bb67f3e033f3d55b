//! Kana script utilities for normalizing dictionary readings.
//!
//! Dictionary files record phonetic readings in a mix of hiragana and
//! katakana. For consistent lookup the converter normalizes every reading
//! to katakana; characters outside the hiragana block (katakana, kanji,
//! Latin, punctuation) pass through unchanged.
//!
//! # Example
//!
//! ```
//! use kana_utils::to_katakana;
//!
//! assert_eq!(to_katakana("いぬ"), "イヌ");
//! assert_eq!(to_katakana("子ねこ"), "子ネコ");
//! ```

/// Distance between a hiragana code point and its katakana counterpart.
const KANA_BLOCK_OFFSET: u32 = 0x60;

/// Convert every hiragana character in `text` to its katakana equivalent.
///
/// Characters that are already katakana, or are not kana at all, are left
/// untouched, so mixed-script readings come out with only their hiragana
/// spans converted.
pub fn to_katakana(text: &str) -> String {
    text.chars().map(katakana_char).collect()
}

fn katakana_char(c: char) -> char {
    match c {
        // Hiragana ぁ (U+3041) through ゖ (U+3096) sit exactly 0x60 below
        // their katakana counterparts ァ (U+30A1) through ヶ (U+30F6).
        'ぁ'..='ゖ' => char::from_u32(c as u32 + KANA_BLOCK_OFFSET).unwrap_or(c),

        // Iteration marks: ゝ (U+309D) → ヽ (U+30FD), ゞ (U+309E) → ヾ (U+30FE)
        'ゝ' => 'ヽ',
        'ゞ' => 'ヾ',

        _ => c,
    }
}

/// Whether `c` is a hiragana character (including the iteration marks).
pub fn is_hiragana(c: char) -> bool {
    matches!(c, 'ぁ'..='ゖ' | 'ゝ' | 'ゞ')
}

/// Whether `c` is a katakana character (including the iteration marks and
/// the prolonged sound mark ー).
pub fn is_katakana(c: char) -> bool {
    matches!(c, 'ァ'..='ヶ' | 'ヽ' | 'ヾ' | 'ー')
}

/// Whether `text` is non-empty and consists entirely of kana.
pub fn is_kana(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| is_hiragana(c) || is_katakana(c))
}
