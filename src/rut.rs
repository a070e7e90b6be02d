//! Chilean RUT (national identifier) parsing and check-digit validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RutError {
    #[error("RUT \"{0}\" is too short")]
    TooShort(String),
    #[error("RUT body \"{0}\" must contain only digits")]
    NonNumericBody(String),
    #[error("RUT check digit mismatch: expected {expected}, got {found}")]
    CheckDigit { expected: char, found: char },
}

/// A validated RUT stored in canonical `body-DV` form (`12345678-5`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rut(String);

/// Strips dots, dashes and whitespace, uppercases, and re-inserts the dash
/// before the final character. Inputs shorter than two characters are
/// returned cleaned but without a dash.
pub fn normalize(raw: &str) -> String {
    let clean: String = raw
        .chars()
        .filter(|c| !matches!(c, '.' | '-') && !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    if clean.chars().count() < 2 {
        return clean;
    }
    let split = clean.len() - clean.chars().last().map_or(0, char::len_utf8);
    format!("{}-{}", &clean[..split], &clean[split..])
}

/// Modulo-11 check digit for a numeric body (weights 2..=7, cycling from
/// the rightmost digit).
pub fn check_digit(body: &str) -> Option<char> {
    let mut sum = 0u32;
    let mut weight = 2u32;
    for c in body.chars().rev() {
        sum += c.to_digit(10)? * weight;
        weight = if weight == 7 { 2 } else { weight + 1 };
    }
    Some(match 11 - (sum % 11) {
        11 => '0',
        10 => 'K',
        d => char::from_digit(d, 10)?,
    })
}

impl Rut {
    /// Parses and validates a RUT in any common notation
    /// (`12.345.678-5`, `123456785`, `12345678-5`).
    ///
    /// # Errors
    ///
    /// Returns a [`RutError`] for malformed input or a wrong check digit.
    pub fn parse(raw: &str) -> Result<Self, RutError> {
        let canonical = normalize(raw);
        let Some((body, dv)) = canonical.split_once('-') else {
            return Err(RutError::TooShort(raw.to_string()));
        };
        if body.is_empty() || !body.chars().all(|c| c.is_ascii_digit()) {
            return Err(RutError::NonNumericBody(body.to_string()));
        }
        let found = dv.chars().next().unwrap_or(' ');
        let expected = check_digit(body).ok_or_else(|| RutError::NonNumericBody(body.to_string()))?;
        if expected != found {
            return Err(RutError::CheckDigit { expected, found });
        }
        Ok(Self(canonical))
    }

    /// Canonical `body-DV` form, suitable as a storage key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Rut {
    type Err = RutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Rut {
    type Error = RutError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Rut> for String {
    fn from(rut: Rut) -> Self {
        rut.0
    }
}

impl fmt::Display for Rut {
    /// Renders with thousands dots: `12.345.678-5`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (body, dv) = self.0.split_once('-').unwrap_or((self.0.as_str(), ""));
        let digits: Vec<char> = body.chars().collect();
        let mut out = String::with_capacity(body.len() + body.len() / 3 + 2);
        for (i, c) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push('.');
            }
            out.push(*c);
        }
        write!(f, "{out}-{dv}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_common_notations() {
        assert_eq!(normalize("12.345.678-5"), "12345678-5");
        assert_eq!(normalize(" 12345678k "), "12345678-K");
        assert_eq!(normalize("7"), "7");
    }

    #[test]
    fn computes_check_digits() {
        assert_eq!(check_digit("12345678"), Some('5'));
        assert_eq!(check_digit("11111111"), Some('1'));
        assert_eq!(check_digit("10000013"), Some('K'));
        assert_eq!(check_digit("14"), Some('0'));
        assert_eq!(check_digit("12a"), None);
    }

    #[test]
    fn parses_valid_rut() {
        let rut = Rut::parse("12.345.678-5");
        assert_eq!(rut.as_ref().map(Rut::as_str), Ok("12345678-5"));
        assert_eq!(rut.map(|r| r.to_string()), Ok("12.345.678-5".to_string()));
    }

    #[test]
    fn accepts_lowercase_k() {
        assert!(Rut::parse("10.000.013-k").is_ok());
    }

    #[test]
    fn rejects_wrong_check_digit() {
        assert_eq!(
            Rut::parse("12.345.678-9"),
            Err(RutError::CheckDigit {
                expected: '5',
                found: '9'
            })
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(Rut::parse("1"), Err(RutError::TooShort(_))));
        assert!(matches!(Rut::parse("12.34a.678-5"), Err(RutError::NonNumericBody(_))));
    }

    #[test]
    fn formats_short_bodies() {
        let rut = Rut::parse("1000005-K").unwrap();
        assert_eq!(rut.to_string(), "1.000.005-K");
        let rut = Rut::parse("14-0").unwrap();
        assert_eq!(rut.to_string(), "14-0");
    }
}
