//! # The Canonical Product Reference
//!
//! A [`Reference`] is a 7-digit product identifier derived from the
//! `NNN-NNNN` code embedded in image file names. The canonical storage
//! format is the 7 digits with the separator stripped.
//!
//! ## Validation
//!
//! - Must be exactly 7 digits (0-9) after separators are removed
//! - Leading zeros are significant (e.g., `"0120001"` is valid)
//! - Accepted caller shapes: `NNNNNNN`, `NNN.NNNN`, `NNN-NNNN`

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Canonical 7-digit product reference.
///
/// Equality and hashing are exact string equality on the canonical form,
/// so `Reference` can key a map directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Reference(String);

/// Deserializes as a plain `String`, then routes through [`Reference::new`]
/// so invalid values are rejected at deserialization time — not silently
/// accepted.
impl<'de> Deserialize<'de> for Reference {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl Reference {
    /// Create a reference from an already-canonical string value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidReference`] if the value is not
    /// exactly 7 ASCII digits.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.len() != 7 || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidReference { input: s });
        }
        Ok(Self(s))
    }

    /// Normalize a caller-supplied reference string into canonical form.
    ///
    /// Trims surrounding whitespace, removes every `.` and `-`, then
    /// requires the remainder to be exactly 7 decimal digits. Accepts
    /// `"1000001"`, `"100.0001"`, and `"100-0001"` alike.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidReference`] carrying the trimmed
    /// input when the digit-only form is not exactly 7 digits. The check is
    /// purely local — no cache or upstream interaction happens here.
    pub fn normalize(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let digits: String = trimmed.chars().filter(|c| *c != '.' && *c != '-').collect();
        if digits.len() != 7 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidReference {
                input: trimmed.to_string(),
            });
        }
        Ok(Self(digits))
    }

    /// Extract a reference from an image file's base name.
    ///
    /// Scans for the first occurrence of the fixed pattern — three digits,
    /// a `-`, four digits — anywhere in the name, and concatenates the two
    /// digit groups: `"100-0001 CANDY.jpeg"` yields `"1000001"`. Returns
    /// `None` when the pattern is absent.
    ///
    /// The pattern is unanchored, so a match may begin inside a longer
    /// digit run. No validation beyond the pattern is performed.
    pub fn extract(file_name: &str) -> Option<Self> {
        let bytes = file_name.as_bytes();
        if bytes.len() < 8 {
            return None;
        }
        for i in 0..=bytes.len() - 8 {
            if bytes[i..i + 3].iter().all(u8::is_ascii_digit)
                && bytes[i + 3] == b'-'
                && bytes[i + 4..i + 8].iter().all(u8::is_ascii_digit)
            {
                // All matched bytes are ASCII, so slicing is safe here.
                let mut canonical = String::with_capacity(7);
                canonical.push_str(&file_name[i..i + 3]);
                canonical.push_str(&file_name[i + 4..i + 8]);
                return Some(Self(canonical));
            }
        }
        None
    }

    /// Access the canonical 7-digit string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- normalize --

    #[test]
    fn normalize_accepts_all_three_shapes() {
        for input in ["1000001", "100.0001", "100-0001"] {
            let r = Reference::normalize(input).unwrap();
            assert_eq!(r.as_str(), "1000001", "input: {input}");
        }
    }

    #[test]
    fn normalize_trims_whitespace() {
        let r = Reference::normalize("  100-0001 ").unwrap();
        assert_eq!(r.as_str(), "1000001");
    }

    #[test]
    fn normalize_preserves_leading_zeros() {
        let r = Reference::normalize("012-0001").unwrap();
        assert_eq!(r.as_str(), "0120001");
    }

    #[test]
    fn normalize_rejects_wrong_length() {
        assert!(Reference::normalize("100001").is_err()); // 6 digits
        assert!(Reference::normalize("10000001").is_err()); // 8 digits
        assert!(Reference::normalize("100-001").is_err());
        assert!(Reference::normalize("").is_err());
    }

    #[test]
    fn normalize_rejects_non_digits() {
        assert!(Reference::normalize("100-000a").is_err());
        assert!(Reference::normalize("abc-defg").is_err());
        // Stripping separators must not legitimize other punctuation.
        assert!(Reference::normalize("100_0001").is_err());
    }

    #[test]
    fn normalize_error_carries_trimmed_input() {
        let err = Reference::normalize("  bogus ").unwrap_err();
        let ValidationError::InvalidReference { input } = err;
        assert_eq!(input, "bogus");
    }

    // -- extract --

    #[test]
    fn extract_from_typical_file_name() {
        let r = Reference::extract("100-0001 CANDY.jpeg").unwrap();
        assert_eq!(r.as_str(), "1000001");
    }

    #[test]
    fn extract_absent_pattern() {
        assert!(Reference::extract("nofile.jpeg").is_none());
        assert!(Reference::extract("").is_none());
        assert!(Reference::extract("1000001.jpeg").is_none()); // no separator
    }

    #[test]
    fn extract_first_match_wins() {
        let r = Reference::extract("111-1111 alt 222-2222.jpg").unwrap();
        assert_eq!(r.as_str(), "1111111");
    }

    #[test]
    fn extract_pattern_inside_longer_digit_run() {
        // The pattern is unanchored: the match starts one digit into the run.
        let r = Reference::extract("x1234-5678.jpg").unwrap();
        assert_eq!(r.as_str(), "2345678");
    }

    #[test]
    fn extract_ignores_trailing_digits_after_group() {
        let r = Reference::extract("100-00012.jpg").unwrap();
        assert_eq!(r.as_str(), "1000001");
    }

    #[test]
    fn extract_handles_multibyte_names() {
        let r = Reference::extract("café 100-0001.jpeg").unwrap();
        assert_eq!(r.as_str(), "1000001");
        assert!(Reference::extract("café.jpeg").is_none());
    }

    // -- constructor + serde --

    #[test]
    fn new_rejects_invalid() {
        assert!(Reference::new("123456").is_err());
        assert!(Reference::new("12345678").is_err());
        assert!(Reference::new("12a4567").is_err());
        assert!(Reference::new("100-001").is_err()); // new() does not normalize
    }

    #[test]
    fn serde_roundtrip() {
        let r = Reference::new("1000001").unwrap();
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, "\"1000001\"");
        let back: Reference = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn deserialize_rejects_invalid() {
        assert!(serde_json::from_str::<Reference>("\"123\"").is_err());
    }

    #[test]
    fn display_is_canonical_form() {
        let r = Reference::normalize("100.0001").unwrap();
        assert_eq!(r.to_string(), "1000001");
    }
}
