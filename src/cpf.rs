use crate::errors::AppError;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Number of digits in a CPF.
pub const CPF_LEN: usize = 11;

fn cpf_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{11}$").expect("CPF pattern is a valid regex"))
}

/// Strips every character that is not an ASCII decimal digit.
///
/// `"123.456.789-09"` becomes `"12345678909"`, `"abc"` becomes `""`.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// A validated CPF: exactly 11 ASCII digits.
///
/// The only way to obtain one is [`Cpf::parse`], so holding a `Cpf` means the
/// value was checked before any outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cpf(String);

impl Cpf {
    /// Normalizes `raw` and validates the result.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidCpf` echoing the normalized value when it is
    /// empty or not exactly 11 digits.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let normalized = normalize(raw);

        if normalized.is_empty()
            || normalized.len() != CPF_LEN
            || !cpf_pattern().is_match(&normalized)
        {
            return Err(AppError::InvalidCpf {
                received: normalized,
            });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Log-safe rendering that keeps only the first three and the check digits.
    pub fn masked(&self) -> String {
        format!("{}.***.***-{}", &self.0[..3], &self.0[9..])
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
