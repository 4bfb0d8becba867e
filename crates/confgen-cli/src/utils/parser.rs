use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Seed cannot be empty.")]
    EmptySeed,

    #[error("Invalid seed '{0}'. Expected a non-negative integer in decimal or 0x-prefixed hex (e.g., '61453' or '0xf00d').")]
    InvalidSeed(String),
}

/// Parses a random seed given in decimal or with a `0x` prefix in hex.
pub fn parse_seed(s: &str) -> Result<u64, ParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptySeed);
    }

    let digits = trimmed.replace('_', "");
    let parsed = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => digits.parse::<u64>(),
    };
    parsed.map_err(|_| ParseError::InvalidSeed(s.to_string()))
}
