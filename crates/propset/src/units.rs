//! Value types with string factories: file sizes and durations.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const KB: u64 = 1024;
const MB: u64 = KB * KB;
const GB: u64 = MB * KB;

/// Errors produced while parsing unit-suffixed values.
#[propset_derive::propset_error]
#[derive(Clone, PartialEq, Eq)]
pub enum UnitError {
    #[error("Malformed amount in \"{input}\"{}", format_context(.context))]
    Malformed { input: String, context: Option<Cow<'static, str>> },

    #[error("Unknown unit \"{unit}\" in \"{input}\"{}", format_context(.context))]
    UnknownUnit { unit: String, input: String, context: Option<Cow<'static, str>> },

    #[error("Value \"{input}\" is out of range{}", format_context(.context))]
    Overflow { input: String, context: Option<Cow<'static, str>> },
}

/// Splits `"10 kb"` into `(10, "kb")`; the unit is lower-cased and may be empty.
fn split_amount(input: &str) -> Result<(u64, String), UnitError> {
    let trimmed = input.trim();
    let digits = trimmed.find(|c: char| !c.is_ascii_digit()).unwrap_or(trimmed.len());
    let amount = trimmed[..digits]
        .parse::<u64>()
        .map_err(|_| UnitError::Malformed { input: input.to_owned(), context: None })?;
    Ok((amount, trimmed[digits..].trim_start().to_ascii_lowercase()))
}

/// Splits `"1.5 seconds"` into `(1.5, "seconds")`; the unit is lower-cased and may be empty.
fn split_decimal(input: &str) -> Result<(f64, String), UnitError> {
    let trimmed = input.trim();
    let end = trimmed.find(|c: char| !c.is_ascii_digit() && c != '.').unwrap_or(trimmed.len());
    let amount = trimmed[..end]
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| UnitError::Malformed { input: input.to_owned(), context: None })?;
    Ok((amount, trimmed[end..].trim_start().to_ascii_lowercase()))
}

fn scale(input: &str, amount: u64, factor: u64) -> Result<u64, UnitError> {
    amount
        .checked_mul(factor)
        .ok_or_else(|| UnitError::Overflow { input: input.to_owned(), context: None })
}

/// A size in bytes, written as `"512"`, `"10 kb"`, `"5MB"` or `"2 gb"` (powers of 1024).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FileSize(u64);

impl FileSize {
    #[must_use]
    pub const fn new(bytes: u64) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn bytes(self) -> u64 {
        self.0
    }
}

impl FromStr for FileSize {
    type Err = UnitError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (amount, unit) = split_amount(input)?;
        let factor = match unit.as_str() {
            "" | "b" => 1,
            "kb" => KB,
            "mb" => MB,
            "gb" => GB,
            _ => return Err(UnitError::UnknownUnit { unit, input: input.to_owned(), context: None }),
        };
        scale(input, amount, factor).map(Self)
    }
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            bytes if bytes >= GB && bytes % GB == 0 => write!(f, "{} GB", bytes / GB),
            bytes if bytes >= MB && bytes % MB == 0 => write!(f, "{} MB", bytes / MB),
            bytes if bytes >= KB && bytes % KB == 0 => write!(f, "{} KB", bytes / KB),
            bytes => write!(f, "{bytes} bytes"),
        }
    }
}

impl From<FileSize> for u64 {
    fn from(size: FileSize) -> Self {
        size.0
    }
}

/// A duration written as `"250"`, `"250 ms"`, `"1.5 seconds"` or `"1 day"`. A bare
/// number is in milliseconds; the amount may carry a fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ConfigDuration(Duration);

impl ConfigDuration {
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self(duration)
    }

    #[must_use]
    pub const fn as_duration(self) -> Duration {
        self.0
    }
}

impl FromStr for ConfigDuration {
    type Err = UnitError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (amount, unit) = split_decimal(input)?;
        let millis_per_unit = match unit.as_str() {
            "" | "ms" | "milli" | "millis" | "millisecond" | "milliseconds" => 1.0,
            "s" | "second" | "seconds" => 1_000.0,
            "minute" | "minutes" => 60_000.0,
            "hour" | "hours" => 3_600_000.0,
            "day" | "days" => 86_400_000.0,
            _ => return Err(UnitError::UnknownUnit { unit, input: input.to_owned(), context: None }),
        };
        Duration::try_from_secs_f64(amount * millis_per_unit / 1_000.0)
            .map(Self)
            .map_err(|_| UnitError::Overflow { input: input.to_owned(), context: None })
    }
}

impl fmt::Display for ConfigDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.0.as_millis();
        match millis {
            m if m >= 86_400_000 && m % 86_400_000 == 0 => write!(f, "{} days", m / 86_400_000),
            m if m >= 3_600_000 && m % 3_600_000 == 0 => write!(f, "{} hours", m / 3_600_000),
            m if m >= 60_000 && m % 60_000 == 0 => write!(f, "{} minutes", m / 60_000),
            m if m >= 1_000 && m % 1_000 == 0 => write!(f, "{} seconds", m / 1_000),
            m => write!(f, "{m} milliseconds"),
        }
    }
}

impl From<ConfigDuration> for Duration {
    fn from(duration: ConfigDuration) -> Self {
        duration.0
    }
}

crate::string_factory!(FileSize, ConfigDuration);
