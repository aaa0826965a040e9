//! Cameroonian phone numbers and carrier classification.
//!
//! Numbers are reduced to their nine national digits before matching, so
//! `+237 677-12-34-56`, `00237677123456` and `677123456` all classify the
//! same way. Prefix ranges:
//!
//! | Operator | Prefixes |
//! |---|---|
//! | MTN | 67x, 650-654, 680-684 |
//! | Orange | 69x, 655-659, 685-689, 640-644 |
//! | Nexttel | 66x |
//! | Camtel | 62x, 22x-24x (fixed lines) |

use crate::errors::{CoreError, CoreResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Cameroon country calling code.
pub const COUNTRY_CODE: &str = "237";

const NATIONAL_LEN: usize = 9;

static MTN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^6(?:7\d|5[0-4]|8[0-4])\d{6}$").expect("static MTN pattern"));
static ORANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^6(?:9\d|5[5-9]|8[5-9]|4[0-4])\d{6}$").expect("static Orange pattern")
});
static NEXTTEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^66\d{7}$").expect("static Nexttel pattern"));
static CAMTEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:62\d|2[2-4]\d)\d{6}$").expect("static Camtel pattern"));

/// Mobile or fixed-line carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// MTN Cameroon.
    Mtn,
    /// Orange Cameroun.
    Orange,
    /// Nexttel (Viettel).
    Nexttel,
    /// Camtel, mobile (Blue) and fixed lines.
    Camtel,
    /// No known prefix matched.
    Unknown,
}

impl Operator {
    /// All known carriers, in display order.
    pub const KNOWN: [Operator; 4] = [
        Operator::Mtn,
        Operator::Orange,
        Operator::Nexttel,
        Operator::Camtel,
    ];

    /// Human-readable carrier name.
    pub fn label(&self) -> &'static str {
        match self {
            Operator::Mtn => "MTN",
            Operator::Orange => "Orange",
            Operator::Nexttel => "Nexttel",
            Operator::Camtel => "Camtel",
            Operator::Unknown => "Unknown",
        }
    }

    /// Whether a carrier was identified.
    pub fn is_known(&self) -> bool {
        !matches!(self, Operator::Unknown)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reduce a raw phone string to its national form.
///
/// Separators (spaces, dashes, dots, parentheses) are dropped and a leading
/// `+237`, `00237` or `237` is removed when what remains is a full national
/// number. Anything else is returned as-is after separator removal.
pub fn normalize(raw: &str) -> String {
    let compact: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')' | '\u{a0}'))
        .collect();
    let digits = compact.strip_prefix('+').unwrap_or(&compact);

    let national = if digits.len() == NATIONAL_LEN + 5 && digits.starts_with("00237") {
        &digits[5..]
    } else if digits.len() == NATIONAL_LEN + COUNTRY_CODE.len() && digits.starts_with(COUNTRY_CODE)
    {
        &digits[COUNTRY_CODE.len()..]
    } else {
        digits
    };

    national.to_string()
}

/// Classify a raw phone string by carrier prefix.
pub fn classify(raw: &str) -> Operator {
    let national = normalize(raw);

    if MTN.is_match(&national) {
        Operator::Mtn
    } else if ORANGE.is_match(&national) {
        Operator::Orange
    } else if NEXTTEL.is_match(&national) {
        Operator::Nexttel
    } else if CAMTEL.is_match(&national) {
        Operator::Camtel
    } else {
        Operator::Unknown
    }
}

/// A validated Cameroonian phone number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber {
    national: String,
}

impl PhoneNumber {
    /// Parse and normalise a phone number.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPhone`] unless the input reduces to nine
    /// digits starting with `2` or `6`.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let national = normalize(raw);
        let valid = national.len() == NATIONAL_LEN
            && national.chars().all(|c| c.is_ascii_digit())
            && matches!(national.as_bytes()[0], b'2' | b'6');

        if !valid {
            return Err(CoreError::invalid_phone(raw));
        }

        Ok(Self { national })
    }

    /// The nine national digits.
    pub fn national(&self) -> &str {
        &self.national
    }

    /// E.164 form, e.g. `+237677123456`.
    pub fn e164(&self) -> String {
        format!("+{}{}", COUNTRY_CODE, self.national)
    }

    /// Carrier for this number.
    pub fn operator(&self) -> Operator {
        classify(&self.national)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.e164())
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.e164()
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("677123456", Operator::Mtn)]
    #[case("650123456", Operator::Mtn)]
    #[case("654999999", Operator::Mtn)]
    #[case("680000000", Operator::Mtn)]
    #[case("684123456", Operator::Mtn)]
    #[case("699123456", Operator::Orange)]
    #[case("655123456", Operator::Orange)]
    #[case("659123456", Operator::Orange)]
    #[case("686123456", Operator::Orange)]
    #[case("640123456", Operator::Orange)]
    #[case("666123456", Operator::Nexttel)]
    #[case("620123456", Operator::Camtel)]
    #[case("222123456", Operator::Camtel)]
    #[case("243123456", Operator::Camtel)]
    #[case("600123456", Operator::Unknown)]
    #[case("645123456", Operator::Unknown)]
    #[case("12345", Operator::Unknown)]
    fn test_classify(#[case] raw: &str, #[case] expected: Operator) {
        assert_eq!(classify(raw), expected);
    }

    #[rstest]
    #[case("+237 677 12 34 56", "677123456")]
    #[case("00237677123456", "677123456")]
    #[case("237677123456", "677123456")]
    #[case("(677) 12-34-56", "677123456")]
    #[case("6.77.12.34.56", "677123456")]
    #[case("2376771234", "2376771234")]
    fn test_normalize(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize(raw), expected);
    }

    #[test]
    fn test_parse_valid() {
        let phone = PhoneNumber::parse("+237 699 00 11 22").unwrap();
        assert_eq!(phone.national(), "699001122");
        assert_eq!(phone.e164(), "+237699001122");
        assert_eq!(phone.operator(), Operator::Orange);
        assert_eq!(phone.to_string(), "+237699001122");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(PhoneNumber::parse("").is_err());
        assert!(PhoneNumber::parse("67712345").is_err());
        assert!(PhoneNumber::parse("777123456").is_err());
        assert!(PhoneNumber::parse("67712345a").is_err());
        assert!(PhoneNumber::parse("+33 6 12 34 56 78").is_err());
    }

    #[test]
    fn test_serde_uses_e164() {
        let phone: PhoneNumber = serde_json::from_str("\"677123456\"").unwrap();
        assert_eq!(serde_json::to_string(&phone).unwrap(), "\"+237677123456\"");

        let err = serde_json::from_str::<PhoneNumber>("\"nope\"");
        assert!(err.is_err());
    }

    #[test]
    fn test_operator_labels() {
        assert_eq!(Operator::Mtn.to_string(), "MTN");
        assert!(Operator::Camtel.is_known());
        assert!(!Operator::Unknown.is_known());
        assert_eq!(
            serde_json::to_string(&Operator::Nexttel).unwrap(),
            "\"nexttel\""
        );
    }
}
