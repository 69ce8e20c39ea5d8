//! Phone identity matching.
//!
//! Loyalty users type their phone number in whatever shape they like at
//! registration, and the spreadsheets we join against are no better. Nothing
//! is ever stored in canonical form, so every comparison re-derives the
//! equivalent surface forms of both sides and checks for overlap.
//!
//! All functions here are pure and total: malformed input produces an empty
//! string or an empty set, never an error, and nothing is logged.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Bosnia-and-Herzegovina country calling code.
pub const COUNTRY_CODE: &str = "387";

/// Cell contents that mean "no phone on file".
const PLACEHOLDERS: &[&str] = &["---", "N/A"];

/// Local subscriber lengths once the trunk `0` is removed.
const SUBSCRIBER_LENGTHS: std::ops::RangeInclusive<usize> = 8..=9;

/// Strip everything except ASCII digits.
///
/// Empty input and the placeholder strings short-circuit to an empty string.
pub fn clean(raw: &str) -> String {
    if raw.is_empty() || PLACEHOLDERS.contains(&raw.trim()) {
        return String::new();
    }
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Canonicalize a raw phone string.
///
/// The usual result is the zero-prefixed local number (`062267066`).
/// Inputs that already are local numbers (8 digits, or 9 digits with the
/// trunk `0`) are handled first so they keep that shape:
///
/// - 8 digits get a `0` prepended;
/// - 9 digits starting with `0` are returned unchanged.
///
/// Everything else has a leading `387` removed, then all leading zeros. A
/// remaining 8- or 9-digit subscriber number gets a single `0` prepended.
/// Any other length falls back to the cleaned digits, untouched, which keeps
/// the function idempotent.
pub fn normalize(raw: &str) -> String {
    let digits = clean(raw);
    if digits.is_empty() {
        return digits;
    }

    match digits.len() {
        8 => return format!("0{digits}"),
        9 if digits.starts_with('0') => return digits,
        _ => {}
    }

    let local = match digits.strip_prefix(COUNTRY_CODE) {
        Some(rest) if !rest.is_empty() => rest,
        _ => digits.as_str(),
    };
    let subscriber = local.trim_start_matches('0');

    if SUBSCRIBER_LENGTHS.contains(&subscriber.len()) {
        format!("0{subscriber}")
    } else {
        digits
    }
}

/// Every surface form considered equivalent to `raw`.
///
/// For a 9-digit canonical number `0XXXXXXXX` this is the number itself, the
/// bare 8 digits, and the 8 digits behind `387` and `+387`. Input that does
/// not canonicalize to a valid [`PhoneNumber`] has no variants, so junk such
/// as `"0"` or `"123"` matches nothing, not even itself.
pub fn variants(raw: &str) -> BTreeSet<String> {
    PhoneNumber::parse(raw)
        .map(|phone| phone.variants())
        .unwrap_or_default()
}

/// Whether two raw phone strings identify the same subscriber.
///
/// True only when the variant sets share an exact string. There is no
/// substring or suffix matching.
pub fn matches(a: &str, b: &str) -> bool {
    let left = variants(a);
    if left.is_empty() {
        return false;
    }
    variants(b).iter().any(|v| left.contains(v))
}

/// A validated, canonical local phone number.
///
/// Only zero-prefixed numbers with an 8 or 9 digit subscriber part are
/// accepted; everything else is treated as "no identity available".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Canonicalize `raw`, returning `None` when it is not a plausible number.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize(raw);
        let subscriber = normalized.strip_prefix('0')?;
        if SUBSCRIBER_LENGTHS.contains(&subscriber.len()) && !subscriber.starts_with('0') {
            Some(Self(normalized))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Surface forms to look this number up by.
    pub fn variants(&self) -> BTreeSet<String> {
        let mut set = BTreeSet::new();
        if let Some(bare) = self.0.strip_prefix('0').filter(|b| b.len() == 8) {
            set.insert(bare.to_string());
            set.insert(format!("{COUNTRY_CODE}{bare}"));
            set.insert(format!("+{COUNTRY_CODE}{bare}"));
        }
        set.insert(self.0.clone());
        set
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PhoneNumber::parse(&value).ok_or_else(|| format!("invalid phone number: {value}"))
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic digit strings for property checks.
    fn digit_strings(len: usize, count: usize, seed: u64) -> Vec<String> {
        let mut state = seed;
        (0..count)
            .map(|_| {
                (0..len)
                    .map(|_| {
                        state = state
                            .wrapping_mul(6364136223846793005)
                            .wrapping_add(1442695040888963407);
                        char::from(b'0' + ((state >> 33) % 10) as u8)
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_clean_placeholders() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("---"), "");
        assert_eq!(clean("N/A"), "");
        assert_eq!(clean("no phone"), "");
    }

    #[test]
    fn test_clean_strips_punctuation() {
        assert_eq!(clean("062/267-066"), "062267066");
        assert_eq!(clean("+387 62 267 066"), "38762267066");
        assert_eq!(clean("(062) 267.066"), "062267066");
    }

    #[test]
    fn test_normalize_surface_forms() {
        for raw in ["062267066", "62267066", "38762267066", "+38762267066", "+387 62 267-066"] {
            assert_eq!(normalize(raw), "062267066", "input {raw}");
        }
    }

    #[test]
    fn test_normalize_empty_and_short() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("N/A"), "");
        assert_eq!(normalize("12345"), "12345");
    }

    #[test]
    fn test_normalize_nine_digit_subscriber() {
        assert_eq!(normalize("612345678"), "0612345678");
        assert_eq!(normalize("387612345678"), "0612345678");
    }

    #[test]
    fn test_normalize_idempotent() {
        let mut inputs: Vec<String> = [
            "", "---", "0", "387", "3870", "03871234", "38712345", "00000000",
            "001234567", "+38762267066", "062/267-066", "0038762267066", "9999999999999",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        for len in 1..=13 {
            inputs.extend(digit_strings(len, 200, len as u64));
        }

        for s in inputs {
            let once = normalize(&s);
            assert_eq!(normalize(&once), once, "input {s}");
        }
    }

    #[test]
    fn test_normalize_eight_digits_gain_trunk_zero() {
        let mut inputs = digit_strings(8, 500, 42);
        inputs.extend(["38712345", "00000000", "01234567"].map(String::from));
        for d in inputs {
            let n = normalize(&d);
            assert_eq!(n.len(), 9, "input {d}");
            assert!(n.starts_with('0'), "input {d}");
        }
    }

    #[test]
    fn test_normalize_keeps_nine_digits_with_zero() {
        for tail in digit_strings(8, 500, 7) {
            let d = format!("0{tail}");
            assert_eq!(normalize(&d), d);
        }
    }

    #[test]
    fn test_variants_empty() {
        assert!(variants("").is_empty());
        assert!(variants("---").is_empty());
    }

    #[test]
    fn test_variants_canonical() {
        let v = variants("062267066");
        let expected: BTreeSet<String> = ["062267066", "62267066", "38762267066", "+38762267066"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(v, expected);
    }

    #[test]
    fn test_variants_of_invalid_numbers_are_empty() {
        for raw in ["0", "123", "12-3", "12345", "1234567", "001234567", "00000000", "9999999999999"] {
            assert!(variants(raw).is_empty(), "input {raw}");
        }
    }

    #[test]
    fn test_variants_ten_digit_canonical() {
        let v = variants("+387 61 234 5678");
        assert_eq!(v.len(), 1);
        assert!(v.contains("0612345678"));
    }

    #[test]
    fn test_matches_equivalent_forms() {
        assert!(matches("062267066", "62267066"));
        assert!(matches("062267066", "38762267066"));
        assert!(matches("062267066", "+38762267066"));
        assert!(matches("062 267 066", "+387 62 267 066"));
    }

    #[test]
    fn test_matches_rejects_unrelated() {
        assert!(!matches("061201891", "12345678"));
        assert!(!matches("", "062267066"));
        assert!(!matches("062267066", ""));
        assert!(!matches("N/A", "N/A"));
    }

    #[test]
    fn test_short_numbers_never_match() {
        assert!(!matches("0", "0"));
        assert!(!matches("123", "123"));
        assert!(!matches("123", "12-3"));
        assert!(!matches("1234567", "1234567"));
    }

    #[test]
    fn test_matches_no_containment() {
        assert!(!matches("061234567", "1234567"));
        assert!(!matches("0612345678", "612345"));
    }

    #[test]
    fn test_matches_eight_digit_user_against_zero_prefixed_cell() {
        // "061201891" is nine digits, so both sides canonicalize identically.
        assert!(matches("61201891", "061201891"));
        assert!(matches("061201891", "61201891"));
    }

    #[test]
    fn test_phone_number_parse() {
        assert_eq!(PhoneNumber::parse("+387 62 267 066").unwrap().as_str(), "062267066");
        assert_eq!(PhoneNumber::parse("612345678").unwrap().as_str(), "0612345678");
        assert!(PhoneNumber::parse("").is_none());
        assert!(PhoneNumber::parse("1234567").is_none());
        assert!(PhoneNumber::parse("001234567").is_none());
    }

    #[test]
    fn test_phone_number_serde() {
        let phone: PhoneNumber = serde_json::from_str("\"62267066\"").unwrap();
        assert_eq!(phone.as_str(), "062267066");
        assert!(serde_json::from_str::<PhoneNumber>("\"123\"").is_err());
        assert_eq!(serde_json::to_string(&phone).unwrap(), "\"062267066\"");
    }
}
