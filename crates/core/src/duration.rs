//! Decoding of the compact `PT#H#M#S` duration encoding.

use crate::error::DecodeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Unit {
    Hours,
    Minutes,
    Seconds,
}

impl Unit {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'H' => Some(Unit::Hours),
            'M' => Some(Unit::Minutes),
            'S' => Some(Unit::Seconds),
            _ => None,
        }
    }

    fn seconds(self) -> u64 {
        match self {
            Unit::Hours => 3600,
            Unit::Minutes => 60,
            Unit::Seconds => 1,
        }
    }
}

const SECONDS_PER_DAY: u64 = 86_400;

/// Decode a duration such as `PT1H2M3S` or `P1DT2H` into whole seconds.
///
/// An optional day group may precede the `T`. Time groups are optional but
/// must appear in hours, minutes, seconds order, each at most once. A unit
/// with no digits before it counts as zero. The empty string decodes to zero.
pub fn decode(encoded: &str) -> Result<u64, DecodeError> {
    if encoded.is_empty() {
        return Ok(0);
    }

    let missing = || DecodeError::MissingDesignator {
        input: encoded.to_string(),
    };
    let overflow = || DecodeError::Overflow {
        input: encoded.to_string(),
    };

    let body = encoded.strip_prefix('P').ok_or_else(missing)?;
    let (date, time) = match body.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None if body.is_empty() => return Err(missing()),
        None => (body, None),
    };

    let days = match date.strip_suffix('D') {
        Some(digits) => number(encoded, digits)?,
        None if date.is_empty() => 0,
        None => {
            // Digits must end in a unit; anything else is out of place.
            number(encoded, date)?;
            return Err(DecodeError::TrailingDigits {
                input: encoded.to_string(),
            });
        }
    };

    let mut total = days.checked_mul(SECONDS_PER_DAY).ok_or_else(overflow)?;
    if let Some(time) = time {
        total = total
            .checked_add(decode_time(encoded, time)?)
            .ok_or_else(overflow)?;
    }
    Ok(total)
}

/// Parse a run of decimal digits; empty counts as zero.
fn number(input: &str, digits: &str) -> Result<u64, DecodeError> {
    digits.chars().try_fold(0u64, |acc, c| {
        let digit = c.to_digit(10).ok_or_else(|| DecodeError::UnexpectedChar {
            input: input.to_string(),
            found: c,
        })?;
        acc.checked_mul(10)
            .and_then(|n| n.checked_add(u64::from(digit)))
            .ok_or_else(|| DecodeError::Overflow {
                input: input.to_string(),
            })
    })
}

fn decode_time(encoded: &str, body: &str) -> Result<u64, DecodeError> {
    let overflow = || DecodeError::Overflow {
        input: encoded.to_string(),
    };

    let mut total: u64 = 0;
    let mut pending: Option<u64> = None;
    let mut last_unit: Option<Unit> = None;

    for c in body.chars() {
        if let Some(digit) = c.to_digit(10) {
            let value = pending
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|n| n.checked_add(u64::from(digit)))
                .ok_or_else(overflow)?;
            pending = Some(value);
            continue;
        }

        let unit = Unit::from_char(c).ok_or_else(|| DecodeError::UnexpectedChar {
            input: encoded.to_string(),
            found: c,
        })?;

        if last_unit.is_some_and(|prev| prev >= unit) {
            return Err(DecodeError::UnitOutOfOrder {
                input: encoded.to_string(),
                unit: c,
            });
        }
        last_unit = Some(unit);

        let amount = pending
            .take()
            .unwrap_or(0)
            .checked_mul(unit.seconds())
            .ok_or_else(overflow)?;
        total = total.checked_add(amount).ok_or_else(overflow)?;
    }

    if pending.is_some() {
        return Err(DecodeError::TrailingDigits {
            input: encoded.to_string(),
        });
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_and_partial_groups() {
        assert_eq!(decode("PT1H2M3S"), Ok(3723));
        assert_eq!(decode("PT45S"), Ok(45));
        assert_eq!(decode("PT0S"), Ok(0));
        assert_eq!(decode("PT2H"), Ok(7200));
        assert_eq!(decode("PT1H30S"), Ok(3630));
        assert_eq!(decode("PT10M"), Ok(600));
    }

    #[test]
    fn empty_input_and_bare_designator_are_zero() {
        assert_eq!(decode(""), Ok(0));
        assert_eq!(decode("PT"), Ok(0));
    }

    #[test]
    fn unit_without_digits_counts_as_zero() {
        assert_eq!(decode("PTM5S"), Ok(5));
    }

    #[test]
    fn rejects_missing_designator() {
        assert!(matches!(
            decode("1H2M"),
            Err(DecodeError::MissingDesignator { .. })
        ));
        assert!(matches!(
            decode("P"),
            Err(DecodeError::MissingDesignator { .. })
        ));
    }

    #[test]
    fn leading_day_group_is_accepted() {
        assert_eq!(decode("P1DT2H3M4S"), Ok(86_400 + 7_384));
        assert_eq!(decode("P2D"), Ok(172_800));
        assert_eq!(decode("P0D"), Ok(0));
        assert_eq!(decode("P1DT"), Ok(86_400));
    }

    #[test]
    fn malformed_day_group_is_rejected() {
        assert!(matches!(
            decode("P1"),
            Err(DecodeError::TrailingDigits { .. })
        ));
        assert!(matches!(
            decode("P1HT5S"),
            Err(DecodeError::UnexpectedChar { found: 'H', .. })
        ));
        assert!(matches!(
            decode("P999999999999999DT1S"),
            Err(DecodeError::Overflow { .. })
        ));
    }

    #[test]
    fn rejects_characters_outside_the_grammar() {
        assert_eq!(
            decode("PT1.5S"),
            Err(DecodeError::UnexpectedChar {
                input: "PT1.5S".into(),
                found: '.'
            })
        );
        assert!(matches!(
            decode("PT1D"),
            Err(DecodeError::UnexpectedChar { found: 'D', .. })
        ));
    }

    #[test]
    fn rejects_out_of_order_and_repeated_units() {
        assert!(matches!(
            decode("PT3S2M"),
            Err(DecodeError::UnitOutOfOrder { unit: 'M', .. })
        ));
        assert!(matches!(
            decode("PT1M1M"),
            Err(DecodeError::UnitOutOfOrder { unit: 'M', .. })
        ));
    }

    #[test]
    fn rejects_trailing_digits() {
        assert!(matches!(
            decode("PT1M30"),
            Err(DecodeError::TrailingDigits { .. })
        ));
    }

    #[test]
    fn rejects_overflow() {
        assert!(matches!(
            decode("PT99999999999999999999S"),
            Err(DecodeError::Overflow { .. })
        ));
        assert!(matches!(
            decode("PT9999999999999999H"),
            Err(DecodeError::Overflow { .. })
        ));
    }
}
