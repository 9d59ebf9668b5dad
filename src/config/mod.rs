//! Configuration parsing and validation

mod schema;

pub use schema::*;

use crate::error::{BridgeError, Result};

/// Parse a user-facing channel number ("1"-"16") into a 0-based channel.
pub fn parse_channel(value: &str) -> Result<u8> {
    let channel: i64 = value
        .trim()
        .parse()
        .map_err(|_| BridgeError::InvalidChannel(value.to_string()))?;
    SessionConfig::new(channel, 0, false).map(|c| c.channel)
}

/// Parse a transpose amount ("-126"-"126").
pub fn parse_transpose(value: &str) -> Result<i8> {
    let transpose: i64 = value
        .trim()
        .parse()
        .map_err(|_| BridgeError::InvalidTranspose(value.to_string()))?;
    SessionConfig::new(DEFAULT_CHANNEL as i64, transpose, false).map(|c| c.transpose)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_channel() {
        assert_eq!(parse_channel("10").unwrap(), 9);
        assert_eq!(parse_channel(" 1 ").unwrap(), 0);
        assert!(parse_channel("0").is_err());
        assert!(parse_channel("seventeen").is_err());
    }

    #[test]
    fn test_parse_transpose() {
        assert_eq!(parse_transpose("-12").unwrap(), -12);
        assert_eq!(parse_transpose("100").unwrap(), 100);
        assert!(parse_transpose("127").is_err());
        assert!(parse_transpose("up").is_err());
    }
}
