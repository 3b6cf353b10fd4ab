//! Input normalization.
//!
//! Turns a loosely shaped [`RawDealParameters`] into canonical
//! [`DealParameters`]. Normalization is total: anything that cannot be read
//! as a finite number becomes zero, negatives become zero, and every field is
//! held below a per-kind ceiling so that downstream Decimal arithmetic cannot
//! overflow.

use log::{debug, trace};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use std::str::FromStr;

use super::params::{DealParameters, RawDealParameters};

/// Floor applied to the livable area so it can serve as a denominator.
pub const AREA_EPSILON: Decimal = dec!(0.000000001);

/// Ceiling for money amounts and per-area prices.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// Ceiling for livable area (m²).
pub const MAX_AREA: Decimal = dec!(10000000);

/// Ceiling for rate fields (fractions).
pub const MAX_RATE: Decimal = dec!(100);

/// Ceiling for durations in months.
pub const MAX_MONTHS: Decimal = dec!(1200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Amount,
    Area,
    Rate,
    Months,
}

impl FieldKind {
    fn ceiling(self) -> Decimal {
        match self {
            FieldKind::Amount => MAX_AMOUNT,
            FieldKind::Area => MAX_AREA,
            FieldKind::Rate => MAX_RATE,
            FieldKind::Months => MAX_MONTHS,
        }
    }
}

/// Read a JSON value leniently as a Decimal.
///
/// Numbers are read through their decimal text. Strings are trimmed and the
/// first decimal comma is treated as a decimal point; empty text reads as
/// zero. Returns `None` for anything else, and for text that is not a finite
/// number.
pub fn parse_lenient(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal_text(&n.to_string()),
        Value::String(s) => parse_decimal_text(&s.replacen(',', ".", 1)),
        _ => None,
    }
}

fn parse_decimal_text(text: &str) -> Option<Decimal> {
    let t = text.trim();
    if t.is_empty() {
        return Some(Decimal::ZERO);
    }
    if let Ok(d) = Decimal::from_str(t) {
        return Some(d);
    }
    // Scientific notation, or magnitudes outside Decimal's range.
    let f = t.parse::<f64>().ok().filter(|f| f.is_finite())?;
    match Decimal::from_f64(f) {
        Some(d) => Some(d),
        None if f.abs() < 1.0 => Some(Decimal::ZERO),
        None if f > 0.0 => Some(Decimal::MAX),
        None => Some(Decimal::ZERO),
    }
}

fn clamp(value: Decimal, kind: FieldKind) -> Decimal {
    value.max(Decimal::ZERO).min(kind.ceiling())
}

fn field(name: &str, value: Option<&Value>, kind: FieldKind) -> Decimal {
    let parsed = match value {
        None => Decimal::ZERO,
        Some(v) => match parse_lenient(v) {
            Some(d) => d,
            None => {
                debug!("normalize: {name} = {v} is not numeric, using 0");
                Decimal::ZERO
            }
        },
    };
    let clamped = clamp(parsed, kind);
    if clamped != parsed {
        trace!("normalize: {name} clamped from {parsed} to {clamped}");
    }
    clamped
}

/// Normalize a raw record into canonical engine inputs. Never fails.
pub fn normalize(raw: &RawDealParameters) -> DealParameters {
    use FieldKind::*;

    let area = field("area", raw.area.as_ref(), Area).max(AREA_EPSILON);

    DealParameters {
        price: field("price", raw.price.as_ref(), Amount),
        area,
        market_price_low: field("market_price_low", raw.market_price_low.as_ref(), Amount),
        market_price_high: field("market_price_high", raw.market_price_high.as_ref(), Amount),
        notary_pct: field("notary_pct", raw.notary_pct.as_ref(), Rate),
        broker_pct: field("broker_pct", raw.broker_pct.as_ref(), Rate),
        transfer_tax_pct: field("transfer_tax_pct", raw.transfer_tax_pct.as_ref(), Rate),
        decluttering: field("decluttering", raw.decluttering.as_ref(), Amount),
        renovation_budget: field("renovation_budget", raw.renovation_budget.as_ref(), Amount),
        contingency_pct: field("contingency_pct", raw.contingency_pct.as_ref(), Rate),
        kitchen: field("kitchen", raw.kitchen.as_ref(), Amount),
        misc: field("misc", raw.misc.as_ref(), Amount),
        duration_months: field("duration_months", raw.duration_months.as_ref(), Months),
        financing_ratio: field("financing_ratio", raw.financing_ratio.as_ref(), Rate),
        annual_rate: field("annual_rate", raw.annual_rate.as_ref(), Rate),
        origination_pct: field("origination_pct", raw.origination_pct.as_ref(), Rate),
        other_financing_pct: field(
            "other_financing_pct",
            raw.other_financing_pct.as_ref(),
            Rate,
        ),
        condo_fee: field("condo_fee", raw.condo_fee.as_ref(), Amount),
        utilities: field("utilities", raw.utilities.as_ref(), Amount),
        broker_fee_fixed: field("broker_fee_fixed", raw.broker_fee_fixed.as_ref(), Amount),
        coinvestor_pct: field("coinvestor_pct", raw.coinvestor_pct.as_ref(), Rate),
        staging_fee: field("staging_fee", raw.staging_fee.as_ref(), Amount),
        rent_per_area: field("rent_per_area", raw.rent_per_area.as_ref(), Amount),
        buyer_rate: field("buyer_rate", raw.buyer_rate.as_ref(), Rate),
    }
}

impl DealParameters {
    /// Reapply the normalization bounds to an already typed record.
    pub fn normalized(&self) -> Self {
        use FieldKind::*;
        Self {
            price: clamp(self.price, Amount),
            area: clamp(self.area, Area).max(AREA_EPSILON),
            market_price_low: clamp(self.market_price_low, Amount),
            market_price_high: clamp(self.market_price_high, Amount),
            notary_pct: clamp(self.notary_pct, Rate),
            broker_pct: clamp(self.broker_pct, Rate),
            transfer_tax_pct: clamp(self.transfer_tax_pct, Rate),
            decluttering: clamp(self.decluttering, Amount),
            renovation_budget: clamp(self.renovation_budget, Amount),
            contingency_pct: clamp(self.contingency_pct, Rate),
            kitchen: clamp(self.kitchen, Amount),
            misc: clamp(self.misc, Amount),
            duration_months: clamp(self.duration_months, Months),
            financing_ratio: clamp(self.financing_ratio, Rate),
            annual_rate: clamp(self.annual_rate, Rate),
            origination_pct: clamp(self.origination_pct, Rate),
            other_financing_pct: clamp(self.other_financing_pct, Rate),
            condo_fee: clamp(self.condo_fee, Amount),
            utilities: clamp(self.utilities, Amount),
            broker_fee_fixed: clamp(self.broker_fee_fixed, Amount),
            coinvestor_pct: clamp(self.coinvestor_pct, Rate),
            staging_fee: clamp(self.staging_fee, Amount),
            rent_per_area: clamp(self.rent_per_area, Amount),
            buyer_rate: clamp(self.buyer_rate, Rate),
        }
    }
}
