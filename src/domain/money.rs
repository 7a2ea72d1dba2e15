use std::fmt;

/// Amounts are whole yen as integers; there is no fractional unit.
pub type Yen = i64;

/// Format yen with thousands separators.
/// Example: 1200 -> "1,200", -50 -> "-50"
pub fn format_yen(amount: Yen) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let digits = amount.abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}", sign, grouped)
}

/// Parse a yen amount, tolerating thousands separators and a trailing unit.
/// Example: "1200" -> 1200, "1,200" -> 1200, "1200円" -> 1200
pub fn parse_yen(input: &str) -> Result<Yen, ParseYenError> {
    let cleaned: String = input
        .trim()
        .trim_end_matches('円')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    if cleaned.is_empty() {
        return Err(ParseYenError::InvalidFormat);
    }

    cleaned.parse().map_err(|_| ParseYenError::InvalidFormat)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseYenError {
    InvalidFormat,
}

impl fmt::Display for ParseYenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseYenError::InvalidFormat => write!(f, "invalid yen amount"),
        }
    }
}

impl std::error::Error for ParseYenError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_yen() {
        assert_eq!(format_yen(0), "0");
        assert_eq!(format_yen(300), "300");
        assert_eq!(format_yen(1200), "1,200");
        assert_eq!(format_yen(1234567), "1,234,567");
        assert_eq!(format_yen(-1200), "-1,200");
    }

    #[test]
    fn test_parse_yen() {
        assert_eq!(parse_yen("1200"), Ok(1200));
        assert_eq!(parse_yen("1,200"), Ok(1200));
        assert_eq!(parse_yen(" 300 "), Ok(300));
        assert_eq!(parse_yen("1200円"), Ok(1200));
        assert_eq!(parse_yen("-50"), Ok(-50));
    }

    #[test]
    fn test_parse_yen_invalid() {
        assert!(parse_yen("abc").is_err());
        assert!(parse_yen("").is_err());
        assert!(parse_yen("12.50").is_err());
    }
}
