use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

/// Parse a rate flag given either as a fraction (`0.055`) or as a
/// percentage (`5.5`, `1%`). A trailing `%` always means percent; bare
/// numbers above 1 are read as percentages too.
///
/// The bare-number rule applies to every rate flag, the financing ratio
/// included, so a 120% ratio must be entered as `120` or `120%`.
pub fn parse_rate(s: &str) -> Result<Decimal, String> {
    let trimmed = s.trim();
    let (number, percent) = match trimmed.strip_suffix('%') {
        Some(rest) => (rest, true),
        None => (trimmed, false),
    };
    let value = Decimal::from_str(number.trim().replacen(',', ".", 1).as_str())
        .map_err(|e| format!("invalid rate '{s}': {e}"))?;
    if value < Decimal::ZERO {
        return Err(format!("invalid rate '{s}': must not be negative"));
    }
    Ok(if percent || value > Decimal::ONE {
        value / dec!(100)
    } else {
        value
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_passes_through() {
        assert_eq!(parse_rate("0.055").unwrap(), dec!(0.055));
        assert_eq!(parse_rate("1").unwrap(), dec!(1));
    }

    #[test]
    fn test_percentage_is_scaled() {
        assert_eq!(parse_rate("5.5").unwrap(), dec!(0.055));
        assert_eq!(parse_rate("6,5%").unwrap(), dec!(0.065));
        assert_eq!(parse_rate("120").unwrap(), dec!(1.2));
    }

    #[test]
    fn test_percent_sign_always_scales() {
        assert_eq!(parse_rate("1%").unwrap(), dec!(0.01));
        assert_eq!(parse_rate("0.5%").unwrap(), dec!(0.005));
        assert_eq!(parse_rate(" 120 % ").unwrap(), dec!(1.2));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_rate("abc").is_err());
        assert!(parse_rate("-3").is_err());
    }
}
