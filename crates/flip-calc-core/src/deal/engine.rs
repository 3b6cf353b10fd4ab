use log::trace;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::negotiation::{negotiation_table, select_best_tier, NegotiationEntry, TIER_COUNT};
use super::params::DealParameters;
use super::rating::MarginRating;
use crate::types::{Money, Rate, Scenario};

/// Fixed markup applied to the sale price in the gross-yield denominator.
pub const YIELD_PRICE_MARKUP: Decimal = dec!(1.10);

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Purchase price plus the three flat acquisition surcharges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionCosts {
    pub notary: Money,
    pub broker: Money,
    pub transfer_tax: Money,
    /// price + notary + broker + transfer tax
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenovationCosts {
    /// Buffer on the renovation budget alone
    pub contingency: Money,
    pub total: Money,
}

/// Flat-balance financing charges over the project duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancingCosts {
    pub financed_amount: Money,
    pub interest: Money,
    pub origination_fee: Money,
    pub other: Money,
    /// interest + origination fee + other
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingCosts {
    pub monthly: Money,
    pub total: Money,
}

/// Buy-to-let comparison metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalMetrics {
    pub annual_rent: Money,
    /// `None` when the low sale price is zero
    pub gross_yield_low: Option<Rate>,
    /// `None` when the high sale price is zero
    pub gross_yield_high: Option<Rate>,
    pub buyer_monthly_payment_low: Money,
    pub buyer_monthly_payment_high: Money,
}

/// Complete deal valuation. Fully derived from [`DealParameters`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealResult {
    pub sale_price_low: Money,
    pub sale_price_high: Money,
    pub acquisition: AcquisitionCosts,
    pub renovation: RenovationCosts,
    pub financing: FinancingCosts,
    pub holding: HoldingCosts,
    pub total_investment: Money,
    pub profit_low: Money,
    pub profit_high: Money,
    /// Denominator used for both margins
    pub margin_cost_basis: Money,
    /// `None` when the cost basis is not positive
    pub margin_low: Option<Rate>,
    pub margin_high: Option<Rate>,
    pub rating_low: Option<MarginRating>,
    pub rating_high: Option<MarginRating>,
    pub rental: RentalMetrics,
    /// Purchase-price discount tiers in ascending order
    pub negotiation: [NegotiationEntry; TIER_COUNT],
    /// Index into `negotiation` of the best low-scenario margin
    pub best_tier: usize,
}

impl DealResult {
    pub fn sale_price(&self, scenario: Scenario) -> Money {
        match scenario {
            Scenario::Low => self.sale_price_low,
            Scenario::High => self.sale_price_high,
        }
    }

    pub fn profit(&self, scenario: Scenario) -> Money {
        match scenario {
            Scenario::Low => self.profit_low,
            Scenario::High => self.profit_high,
        }
    }

    pub fn margin(&self, scenario: Scenario) -> Option<Rate> {
        match scenario {
            Scenario::Low => self.margin_low,
            Scenario::High => self.margin_high,
        }
    }

    pub fn best_negotiation(&self) -> &NegotiationEntry {
        &self.negotiation[self.best_tier]
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Value a fix-and-flip deal.
///
/// Pure and infallible: identical parameters always produce an identical
/// result. The parameters are re-bounded with
/// [`DealParameters::normalized`] first, so negative or out-of-range typed
/// fields cannot leak into the formulas; degenerate denominators surface as
/// `None` margins or yields rather than errors.
pub fn evaluate_deal(p: &DealParameters) -> DealResult {
    evaluate_normalized(&p.normalized())
}

/// Engine body. `p` must already be normalized.
pub(crate) fn evaluate_normalized(p: &DealParameters) -> DealResult {
    let sale_price_low = p.market_price_low * p.area;
    let sale_price_high = p.market_price_high * p.area;

    let acquisition = acquisition_costs(p);
    let renovation = renovation_costs(p);
    let financing = financing_costs(p);
    let holding = holding_costs(p);

    let total_investment = acquisition.total + renovation.total + financing.total + holding.total;

    let profit_low = sale_profit(p, sale_price_low, total_investment);
    let profit_high = sale_profit(p, sale_price_high, total_investment);

    let margin_cost_basis = cost_basis(p, total_investment);
    let margin_low = margin(sale_price_low, margin_cost_basis);
    let margin_high = margin(sale_price_high, margin_cost_basis);

    let rental = rental_metrics(p, sale_price_low, sale_price_high);

    let negotiation = negotiation_table(p, sale_price_low, sale_price_high, &renovation, &holding);
    let best_tier = select_best_tier(&negotiation);

    trace!(
        "evaluate_deal: total_investment={total_investment} margin_low={margin_low:?} best_tier={best_tier}"
    );

    DealResult {
        sale_price_low,
        sale_price_high,
        acquisition,
        renovation,
        financing,
        holding,
        total_investment,
        profit_low,
        profit_high,
        margin_cost_basis,
        margin_low,
        margin_high,
        rating_low: MarginRating::classify(margin_low),
        rating_high: MarginRating::classify(margin_high),
        rental,
        negotiation,
        best_tier,
    }
}

pub fn acquisition_costs(p: &DealParameters) -> AcquisitionCosts {
    let notary = p.price * p.notary_pct;
    let broker = p.price * p.broker_pct;
    let transfer_tax = p.price * p.transfer_tax_pct;
    AcquisitionCosts {
        notary,
        broker,
        transfer_tax,
        total: p.price + notary + broker + transfer_tax,
    }
}

/// Contingency applies to the renovation budget only, never to
/// decluttering, kitchen or miscellaneous items.
pub fn renovation_costs(p: &DealParameters) -> RenovationCosts {
    let contingency = p.renovation_budget * p.contingency_pct;
    RenovationCosts {
        contingency,
        total: p.decluttering + p.renovation_budget + contingency + p.kitchen + p.misc,
    }
}

/// Simple interest on the full financed amount for the whole duration; no
/// amortization. The financing ratio is not clamped to 1.0.
pub fn financing_costs(p: &DealParameters) -> FinancingCosts {
    let financed_amount = p.price * p.financing_ratio;
    let interest = financed_amount * (p.annual_rate / MONTHS_PER_YEAR) * p.duration_months;
    let origination_fee = financed_amount * p.origination_pct;
    let other = financed_amount * p.other_financing_pct;
    FinancingCosts {
        financed_amount,
        interest,
        origination_fee,
        other,
        total: interest + origination_fee + other,
    }
}

pub fn holding_costs(p: &DealParameters) -> HoldingCosts {
    let monthly = p.condo_fee + p.utilities;
    HoldingCosts {
        monthly,
        total: monthly * p.duration_months,
    }
}

/// Margin cost basis: total investment plus the sale-side charges.
///
/// The co-investor share enters as the bare fraction, not scaled by a sale
/// price.
pub fn cost_basis(p: &DealParameters, total_investment: Money) -> Money {
    total_investment + p.broker_fee_fixed + p.coinvestor_pct + p.staging_fee
}

/// `(sale_price - cost_basis) / cost_basis`, or `None` unless the basis is
/// positive and the quotient fits a Decimal.
pub fn margin(sale_price: Money, cost_basis: Money) -> Option<Rate> {
    if cost_basis > Decimal::ZERO {
        (sale_price - cost_basis).checked_div(cost_basis)
    } else {
        None
    }
}

pub fn rental_metrics(
    p: &DealParameters,
    sale_price_low: Money,
    sale_price_high: Money,
) -> RentalMetrics {
    let annual_rent = p.rent_per_area * p.area * MONTHS_PER_YEAR;
    RentalMetrics {
        annual_rent,
        gross_yield_low: gross_yield(annual_rent, sale_price_low),
        gross_yield_high: gross_yield(annual_rent, sale_price_high),
        buyer_monthly_payment_low: sale_price_low * p.buyer_rate / MONTHS_PER_YEAR,
        buyer_monthly_payment_high: sale_price_high * p.buyer_rate / MONTHS_PER_YEAR,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sale_profit(p: &DealParameters, sale_price: Money, total_investment: Money) -> Money {
    sale_price
        - total_investment
        - p.coinvestor_pct * sale_price
        - p.staging_fee
        - p.broker_fee_fixed
}

fn gross_yield(annual_rent: Money, sale_price: Money) -> Option<Rate> {
    if sale_price.is_zero() {
        return None;
    }
    annual_rent.checked_div(sale_price * YIELD_PRICE_MARKUP)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DealParameters {
        DealParameters {
            price: dec!(95000),
            area: dec!(66),
            market_price_low: dec!(2700),
            market_price_high: dec!(2800),
            decluttering: dec!(2000),
            renovation_budget: dec!(32000),
            kitchen: dec!(5000),
            condo_fee: dec!(250),
            utilities: dec!(140),
            ..Default::default()
        }
    }

    #[test]
    fn test_acquisition_block() {
        let a = acquisition_costs(&sample());
        assert_eq!(a.notary, dec!(1425));
        assert_eq!(a.broker, dec!(3420));
        assert_eq!(a.transfer_tax, dec!(6175));
        assert_eq!(a.total, dec!(106020));
    }

    #[test]
    fn test_renovation_block() {
        let r = renovation_costs(&sample());
        assert_eq!(r.contingency, dec!(3200));
        assert_eq!(r.total, dec!(42200));
    }

    #[test]
    fn test_financing_block_flat_interest() {
        let f = financing_costs(&sample());
        assert_eq!(f.financed_amount, dec!(95000));
        assert_eq!(f.origination_fee, dec!(950));
        assert!((f.interest - dec!(3483.3333)).abs() < dec!(0.001));
        assert!((f.total - dec!(4433.3333)).abs() < dec!(0.001));
    }

    #[test]
    fn test_financing_ratio_not_clamped() {
        let mut p = sample();
        p.financing_ratio = dec!(1.2);
        let f = financing_costs(&p);
        assert_eq!(f.financed_amount, dec!(114000));
    }

    #[test]
    fn test_holding_block() {
        let h = holding_costs(&sample());
        assert_eq!(h.monthly, dec!(390));
        assert_eq!(h.total, dec!(3120));
    }

    #[test]
    fn test_margin_undefined_for_non_positive_basis() {
        assert_eq!(margin(dec!(100), Decimal::ZERO), None);
        assert_eq!(margin(dec!(150), dec!(100)), Some(dec!(0.5)));
    }

    #[test]
    fn test_gross_yield_undefined_for_zero_sale_price() {
        assert_eq!(gross_yield(dec!(12000), Decimal::ZERO), None);
        assert_eq!(gross_yield(dec!(11000), dec!(100000)), Some(dec!(0.1)));
    }

    #[test]
    fn test_rental_block() {
        let mut p = sample();
        p.rent_per_area = dec!(10);
        let r = rental_metrics(&p, dec!(178200), dec!(184800));
        assert_eq!(r.annual_rent, dec!(7920));
        assert_eq!(r.buyer_monthly_payment_low, dec!(801.9));
        assert!(r.gross_yield_low.is_some());
    }
}
