use chrono::Month;

use crate::errors::{Result, TrackerError};

/// Parses `1`..`12`, an English month name, or its three-letter abbreviation.
pub fn parse_month(text: &str) -> Result<u32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TrackerError::InvalidArgument("month is required".into()));
    }

    if trimmed.chars().all(|ch| ch.is_ascii_digit()) {
        return match trimmed.parse::<u32>() {
            Ok(value @ 1..=12) => Ok(value),
            _ => Err(TrackerError::InvalidArgument(format!(
                "month must be between 1 and 12, got {trimmed}"
            ))),
        };
    }

    trimmed
        .parse::<Month>()
        .map(|month| month.number_from_month())
        .map_err(|_| {
            TrackerError::InvalidArgument(format!(
                "invalid month `{trimmed}` (use 1-12 or a month name)"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers_and_names() {
        assert_eq!(parse_month("1").unwrap(), 1);
        assert_eq!(parse_month("06").unwrap(), 6);
        assert_eq!(parse_month("12").unwrap(), 12);
        assert_eq!(parse_month("Jan").unwrap(), 1);
        assert_eq!(parse_month("January").unwrap(), 1);
        assert_eq!(parse_month("december").unwrap(), 12);
        assert_eq!(parse_month(" Sep ").unwrap(), 9);
    }

    #[test]
    fn rejects_out_of_range_and_garbage() {
        for input in ["0", "13", "", "invalid", "-1", "Janu", "1.5"] {
            assert!(
                matches!(parse_month(input), Err(TrackerError::InvalidArgument(_))),
                "input {input:?}"
            );
        }
    }
}
