use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Rate;

/// Margin above which a deal is rated [`MarginRating::Ok`].
pub const OK_MARGIN_THRESHOLD: Decimal = dec!(0.20);

/// Margin at or above which a deal is at least [`MarginRating::Borderline`].
pub const BORDERLINE_MARGIN_THRESHOLD: Decimal = dec!(0.10);

/// Traffic-light classification of a deal margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginRating {
    /// Margin strictly above 20%
    Ok,
    /// Margin between 10% and 20% inclusive
    Borderline,
    /// Margin below 10%
    NoGo,
}

impl MarginRating {
    pub fn from_margin(margin: Rate) -> Self {
        if margin > OK_MARGIN_THRESHOLD {
            MarginRating::Ok
        } else if margin >= BORDERLINE_MARGIN_THRESHOLD {
            MarginRating::Borderline
        } else {
            MarginRating::NoGo
        }
    }

    /// Undefined margins carry no rating.
    pub fn classify(margin: Option<Rate>) -> Option<Self> {
        margin.map(Self::from_margin)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarginRating::Ok => "OK",
            MarginRating::Borderline => "Borderline",
            MarginRating::NoGo => "No-Go",
        }
    }
}

impl fmt::Display for MarginRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(MarginRating::from_margin(dec!(0.2001)), MarginRating::Ok);
        assert_eq!(MarginRating::from_margin(dec!(0.20)), MarginRating::Borderline);
        assert_eq!(MarginRating::from_margin(dec!(0.10)), MarginRating::Borderline);
        assert_eq!(MarginRating::from_margin(dec!(0.0999)), MarginRating::NoGo);
        assert_eq!(MarginRating::from_margin(dec!(-0.5)), MarginRating::NoGo);
    }

    #[test]
    fn test_undefined_has_no_rating() {
        assert_eq!(MarginRating::classify(None), None);
    }
}
