//! Slot range and cache sizing for a printing session

use crate::error::{PrintError, PrintResult};
use std::path::PathBuf;

/// User-defined character configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | UDC_FIRST_CODE | 0x20 | First redefinable code |
/// | UDC_LAST_CODE | 0x7E | Last redefinable code |
/// | UDC_PROBATIONARY_CAPACITY | 8 | Slots reserved for characters seen once |
/// | UNIFONT_PATH | unifont_all-17.0.03.hex | Glyph source file |
///
/// Codes accept decimal (`32`) or hex (`0x20`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UdcConfig {
    /// First code of the redefinable range
    pub first_code: u8,
    /// Last code of the redefinable range (inclusive)
    pub last_code: u8,
    /// Probationary segment size; the rest of the range is protected
    pub probationary_capacity: usize,
    /// Unifont `.hex` file
    pub font_path: PathBuf,
}

impl UdcConfig {
    pub const DEFAULT_FIRST_CODE: u8 = 0x20;
    pub const DEFAULT_LAST_CODE: u8 = 0x7E;
    pub const DEFAULT_PROBATIONARY_CAPACITY: usize = 8;
    pub const DEFAULT_FONT_PATH: &'static str = "unifont_all-17.0.03.hex";

    /// `ESC &` only redefines printable codes; lower codes are control bytes
    pub const MIN_CODE: u8 = 0x20;
    pub const MAX_CODE: u8 = 0x7E;

    /// Load from environment variables
    ///
    /// Unset or unparsable variables fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            first_code: std::env::var("UDC_FIRST_CODE")
                .ok()
                .and_then(|v| parse_code(&v))
                .unwrap_or(Self::DEFAULT_FIRST_CODE),
            last_code: std::env::var("UDC_LAST_CODE")
                .ok()
                .and_then(|v| parse_code(&v))
                .unwrap_or(Self::DEFAULT_LAST_CODE),
            probationary_capacity: std::env::var("UDC_PROBATIONARY_CAPACITY")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(Self::DEFAULT_PROBATIONARY_CAPACITY),
            font_path: std::env::var("UNIFONT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| Self::DEFAULT_FONT_PATH.into()),
        }
    }

    /// Number of codes in the redefinable range
    pub fn slot_count(&self) -> usize {
        if self.first_code > self.last_code {
            return 0;
        }
        usize::from(self.last_code - self.first_code) + 1
    }

    pub fn validate(&self) -> PrintResult<()> {
        if self.first_code > self.last_code {
            return Err(PrintError::InvalidConfig(format!(
                "Empty code range: 0x{:02X}..=0x{:02X}",
                self.first_code, self.last_code
            )));
        }
        if self.first_code < Self::MIN_CODE || self.last_code > Self::MAX_CODE {
            return Err(PrintError::InvalidConfig(format!(
                "Code range 0x{:02X}..=0x{:02X} must stay within 0x{:02X}..=0x{:02X}",
                self.first_code,
                self.last_code,
                Self::MIN_CODE,
                Self::MAX_CODE
            )));
        }
        if self.probationary_capacity == 0 || self.probationary_capacity >= self.slot_count() {
            return Err(PrintError::InvalidConfig(format!(
                "Probationary capacity {} must be between 1 and {}",
                self.probationary_capacity,
                self.slot_count().saturating_sub(1)
            )));
        }
        Ok(())
    }
}

impl Default for UdcConfig {
    fn default() -> Self {
        Self {
            first_code: Self::DEFAULT_FIRST_CODE,
            last_code: Self::DEFAULT_LAST_CODE,
            probationary_capacity: Self::DEFAULT_PROBATIONARY_CAPACITY,
            font_path: Self::DEFAULT_FONT_PATH.into(),
        }
    }
}

fn parse_code(value: &str) -> Option<u8> {
    let value = value.trim();
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = UdcConfig::default();
        assert_eq!(config.slot_count(), 95);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code("0x20"), Some(0x20));
        assert_eq!(parse_code(" 0X7e "), Some(0x7E));
        assert_eq!(parse_code("126"), Some(126));
        assert_eq!(parse_code("0x100"), None);
        assert_eq!(parse_code("tilde"), None);
    }

    #[test]
    fn test_validate_rejects() {
        let inverted = UdcConfig {
            first_code: 0x7E,
            last_code: 0x20,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());

        // NUL and ESC would be sent as slot codes
        let control = UdcConfig {
            first_code: 0x00,
            ..Default::default()
        };
        assert!(matches!(
            control.validate(),
            Err(PrintError::InvalidConfig(_))
        ));

        let delete = UdcConfig {
            last_code: 0x7F,
            ..Default::default()
        };
        assert!(matches!(
            delete.validate(),
            Err(PrintError::InvalidConfig(_))
        ));

        let too_large = UdcConfig {
            probationary_capacity: 95,
            ..Default::default()
        };
        assert!(too_large.validate().is_err());

        let zero = UdcConfig {
            probationary_capacity: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let tiny = UdcConfig {
            first_code: 0x20,
            last_code: 0x21,
            probationary_capacity: 1,
            ..Default::default()
        };
        assert!(tiny.validate().is_ok());
    }
}
