//! Purchase-price negotiation sensitivity.
//!
//! Re-derives acquisition and financing cost at each fixed discount tier,
//! keeping the renovation and holding totals of the undiscounted deal.
//! The tier formulas deliberately differ from the headline valuation:
//!
//! * financing charges apply to the discounted price itself, not to a
//!   financing-ratio-scaled amount;
//! * tier profits exclude the fixed sale broker fee;
//! * the high-scenario tier profit deducts the co-investor share of the
//!   *low* sale price.

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::engine::{cost_basis, margin, HoldingCosts, RenovationCosts};
use super::params::DealParameters;
use crate::types::{Money, Rate};

pub const TIER_COUNT: usize = 8;

/// Purchase-price discounts, ascending.
pub const DISCOUNT_TIERS: [Rate; TIER_COUNT] = [
    dec!(0.10),
    dec!(0.15),
    dec!(0.20),
    dec!(0.25),
    dec!(0.30),
    dec!(0.35),
    dec!(0.40),
    dec!(0.45),
];

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// One row of the negotiation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationEntry {
    /// Discount off the asking price (fraction)
    pub discount: Rate,
    /// price * (1 - discount)
    pub discounted_price: Money,
    /// Total investment recomputed at the discounted price
    pub total_investment: Money,
    pub profit_low: Money,
    pub margin_low: Option<Rate>,
    pub profit_high: Money,
    pub margin_high: Option<Rate>,
}

/// Build the full negotiation table for a deal.
pub fn negotiation_table(
    p: &DealParameters,
    sale_price_low: Money,
    sale_price_high: Money,
    renovation: &RenovationCosts,
    holding: &HoldingCosts,
) -> [NegotiationEntry; TIER_COUNT] {
    DISCOUNT_TIERS.map(|discount| {
        negotiation_entry(
            p,
            discount,
            sale_price_low,
            sale_price_high,
            renovation,
            holding,
        )
    })
}

/// Evaluate a single discount tier.
pub fn negotiation_entry(
    p: &DealParameters,
    discount: Rate,
    sale_price_low: Money,
    sale_price_high: Money,
    renovation: &RenovationCosts,
    holding: &HoldingCosts,
) -> NegotiationEntry {
    let discounted_price = p.price * (Decimal::ONE - discount);

    let acquisition =
        discounted_price + (p.transfer_tax_pct + p.broker_pct + p.notary_pct) * discounted_price;
    let financing = p.other_financing_pct * discounted_price
        + p.origination_pct * discounted_price
        + discounted_price * (p.annual_rate / MONTHS_PER_YEAR) * p.duration_months;
    let total_investment =
        acquisition + financing + renovation.total + holding.monthly * p.duration_months;

    let coinvestor_share_low = p.coinvestor_pct * sale_price_low;
    let profit_low = sale_price_low - total_investment - coinvestor_share_low - p.staging_fee;
    let profit_high = sale_price_high - total_investment - coinvestor_share_low - p.staging_fee;

    let basis = cost_basis(p, total_investment);

    NegotiationEntry {
        discount,
        discounted_price,
        total_investment,
        profit_low,
        margin_low: margin(sale_price_low, basis),
        profit_high,
        margin_high: margin(sale_price_high, basis),
    }
}

/// Index of the tier with the strictly greatest defined low-scenario margin.
///
/// Ties keep the earliest tier; when no tier has a defined margin the first
/// tier is selected.
pub fn select_best_tier(entries: &[NegotiationEntry]) -> usize {
    let mut best: Option<(usize, Rate)> = None;
    for (i, entry) in entries.iter().enumerate() {
        if let Some(m) = entry.margin_low {
            if best.is_none_or(|(_, b)| m > b) {
                best = Some((i, m));
            }
        }
    }
    match best {
        Some((i, m)) => {
            debug!("negotiation: best tier {i} with margin {m}");
            i
        }
        None => {
            debug!("negotiation: no tier has a defined margin, defaulting to 0");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(margin_low: Option<Rate>) -> NegotiationEntry {
        NegotiationEntry {
            discount: dec!(0.10),
            discounted_price: Decimal::ZERO,
            total_investment: Decimal::ZERO,
            profit_low: Decimal::ZERO,
            margin_low,
            profit_high: Decimal::ZERO,
            margin_high: None,
        }
    }

    #[test]
    fn test_tiers_are_fixed_and_ascending() {
        assert_eq!(DISCOUNT_TIERS.len(), 8);
        assert_eq!(DISCOUNT_TIERS[0], dec!(0.10));
        assert_eq!(DISCOUNT_TIERS[7], dec!(0.45));
        assert!(DISCOUNT_TIERS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_best_tier_strict_max() {
        let entries = vec![
            entry(Some(dec!(0.1))),
            entry(Some(dec!(0.3))),
            entry(None),
            entry(Some(dec!(0.2))),
        ];
        assert_eq!(select_best_tier(&entries), 1);
    }

    #[test]
    fn test_best_tier_ties_keep_earliest() {
        let entries = vec![
            entry(None),
            entry(Some(dec!(0.25))),
            entry(Some(dec!(0.25))),
        ];
        assert_eq!(select_best_tier(&entries), 1);
    }

    #[test]
    fn test_best_tier_defaults_to_zero() {
        let entries = vec![entry(None), entry(None), entry(None)];
        assert_eq!(select_best_tier(&entries), 0);
    }

    #[test]
    fn test_negative_margins_still_selected() {
        let entries = vec![entry(None), entry(Some(dec!(-0.4))), entry(Some(dec!(-0.2)))];
        assert_eq!(select_best_tier(&entries), 2);
    }
}
