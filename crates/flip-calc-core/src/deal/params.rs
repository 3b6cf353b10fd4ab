use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Area, Money, Months, Rate};

// ---------------------------------------------------------------------------
// Normalized parameters
// ---------------------------------------------------------------------------

/// Canonical deal parameters consumed by the valuation engine.
///
/// Every field is a finite, non-negative Decimal. Every `Rate` field is a
/// fraction (0.05 = 5%), never a whole-number percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealParameters {
    // --- Property & market ---
    /// Purchase price of the property
    pub price: Money,
    /// Livable area in square metres (floored to a small epsilon)
    pub area: Area,
    /// Market price per square metre, conservative scenario
    pub market_price_low: Money,
    /// Market price per square metre, optimistic scenario
    pub market_price_high: Money,

    // --- Acquisition surcharges (fractions of price) ---
    /// Notary and land-registry fees
    pub notary_pct: Rate,
    /// Buyer-side broker commission
    pub broker_pct: Rate,
    /// Real-estate transfer tax
    pub transfer_tax_pct: Rate,

    // --- Renovation ---
    pub decluttering: Money,
    pub renovation_budget: Money,
    /// Contingency buffer, applied to `renovation_budget` only
    pub contingency_pct: Rate,
    pub kitchen: Money,
    pub misc: Money,

    // --- Financing ---
    /// Project duration in months; drives interest and holding costs
    pub duration_months: Months,
    /// Share of the purchase price that is financed (may exceed 1.0)
    pub financing_ratio: Rate,
    /// Nominal annual interest rate, charged flat on the financed amount
    pub annual_rate: Rate,
    /// Loan origination fee as a fraction of the financed amount
    pub origination_pct: Rate,
    /// Other financing charges as a fraction of the financed amount
    pub other_financing_pct: Rate,

    // --- Monthly holding costs ---
    pub condo_fee: Money,
    pub utilities: Money,

    // --- Sale side ---
    /// Fixed broker fee paid on resale
    pub broker_fee_fixed: Money,
    /// Co-investor share of the sale price
    pub coinvestor_pct: Rate,
    pub staging_fee: Money,

    // --- Rental ---
    /// Achievable monthly rent per square metre
    pub rent_per_area: Money,
    /// Annual rate (interest plus repayment) assumed for an end buyer's mortgage
    pub buyer_rate: Rate,
}

impl Default for DealParameters {
    /// Template assumptions for a blank deal.
    fn default() -> Self {
        Self {
            price: Decimal::ZERO,
            area: Decimal::ZERO,
            market_price_low: Decimal::ZERO,
            market_price_high: Decimal::ZERO,
            notary_pct: dec!(0.015),
            broker_pct: dec!(0.036),
            transfer_tax_pct: dec!(0.065),
            decluttering: Decimal::ZERO,
            renovation_budget: Decimal::ZERO,
            contingency_pct: dec!(0.10),
            kitchen: Decimal::ZERO,
            misc: Decimal::ZERO,
            duration_months: dec!(8),
            financing_ratio: dec!(1.0),
            annual_rate: dec!(0.055),
            origination_pct: dec!(0.01),
            other_financing_pct: Decimal::ZERO,
            condo_fee: Decimal::ZERO,
            utilities: Decimal::ZERO,
            broker_fee_fixed: Decimal::ZERO,
            coinvestor_pct: Decimal::ZERO,
            staging_fee: Decimal::ZERO,
            rent_per_area: Decimal::ZERO,
            buyer_rate: dec!(0.054),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw parameters
// ---------------------------------------------------------------------------

/// Loosely shaped deal record as supplied by forms, files or foreign callers.
///
/// Any field may be missing, negative, a number, or text (including
/// decimal-comma formatting such as `"1,5"`). See [`super::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDealParameters {
    #[serde(alias = "kaufpreis", skip_serializing_if = "Option::is_none")]
    pub price: Option<serde_json::Value>,
    #[serde(alias = "wohnflaeche", skip_serializing_if = "Option::is_none")]
    pub area: Option<serde_json::Value>,
    #[serde(alias = "marktpreis_g", skip_serializing_if = "Option::is_none")]
    pub market_price_low: Option<serde_json::Value>,
    #[serde(alias = "marktpreis_h", skip_serializing_if = "Option::is_none")]
    pub market_price_high: Option<serde_json::Value>,
    #[serde(alias = "notar_pct", skip_serializing_if = "Option::is_none")]
    pub notary_pct: Option<serde_json::Value>,
    #[serde(alias = "makler_ankauf_pct", skip_serializing_if = "Option::is_none")]
    pub broker_pct: Option<serde_json::Value>,
    #[serde(alias = "grest_pct", skip_serializing_if = "Option::is_none")]
    pub transfer_tax_pct: Option<serde_json::Value>,
    #[serde(alias = "entruempelung", skip_serializing_if = "Option::is_none")]
    pub decluttering: Option<serde_json::Value>,
    #[serde(alias = "renovierung", skip_serializing_if = "Option::is_none")]
    pub renovation_budget: Option<serde_json::Value>,
    #[serde(alias = "puffer_pct", skip_serializing_if = "Option::is_none")]
    pub contingency_pct: Option<serde_json::Value>,
    #[serde(alias = "kueche", skip_serializing_if = "Option::is_none")]
    pub kitchen: Option<serde_json::Value>,
    #[serde(alias = "sonstiges", skip_serializing_if = "Option::is_none")]
    pub misc: Option<serde_json::Value>,
    #[serde(alias = "projektdauer_monate", skip_serializing_if = "Option::is_none")]
    pub duration_months: Option<serde_json::Value>,
    #[serde(alias = "finanzierungsquote", skip_serializing_if = "Option::is_none")]
    pub financing_ratio: Option<serde_json::Value>,
    #[serde(alias = "zins_pa", skip_serializing_if = "Option::is_none")]
    pub annual_rate: Option<serde_json::Value>,
    #[serde(alias = "bearb_pct", skip_serializing_if = "Option::is_none")]
    pub origination_pct: Option<serde_json::Value>,
    #[serde(alias = "fin_sonst_pct", skip_serializing_if = "Option::is_none")]
    pub other_financing_pct: Option<serde_json::Value>,
    #[serde(alias = "hausgeld_monat", skip_serializing_if = "Option::is_none")]
    pub condo_fee: Option<serde_json::Value>,
    #[serde(alias = "strom_heizung_monat", skip_serializing_if = "Option::is_none")]
    pub utilities: Option<serde_json::Value>,
    #[serde(alias = "verkauf_makler_fix", skip_serializing_if = "Option::is_none")]
    pub broker_fee_fixed: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coinvestor_pct: Option<serde_json::Value>,
    #[serde(alias = "homestaging_fix", skip_serializing_if = "Option::is_none")]
    pub staging_fee: Option<serde_json::Value>,
    #[serde(alias = "pot_miete_qm", skip_serializing_if = "Option::is_none")]
    pub rent_per_area: Option<serde_json::Value>,
    #[serde(alias = "kaeufer_zins_tilg_pa", skip_serializing_if = "Option::is_none")]
    pub buyer_rate: Option<serde_json::Value>,
}

impl From<&DealParameters> for RawDealParameters {
    fn from(p: &DealParameters) -> Self {
        let v = |d: Decimal| Some(serde_json::Value::String(d.normalize().to_string()));
        Self {
            price: v(p.price),
            area: v(p.area),
            market_price_low: v(p.market_price_low),
            market_price_high: v(p.market_price_high),
            notary_pct: v(p.notary_pct),
            broker_pct: v(p.broker_pct),
            transfer_tax_pct: v(p.transfer_tax_pct),
            decluttering: v(p.decluttering),
            renovation_budget: v(p.renovation_budget),
            contingency_pct: v(p.contingency_pct),
            kitchen: v(p.kitchen),
            misc: v(p.misc),
            duration_months: v(p.duration_months),
            financing_ratio: v(p.financing_ratio),
            annual_rate: v(p.annual_rate),
            origination_pct: v(p.origination_pct),
            other_financing_pct: v(p.other_financing_pct),
            condo_fee: v(p.condo_fee),
            utilities: v(p.utilities),
            broker_fee_fixed: v(p.broker_fee_fixed),
            coinvestor_pct: v(p.coinvestor_pct),
            staging_fee: v(p.staging_fee),
            rent_per_area: v(p.rent_per_area),
            buyer_rate: v(p.buyer_rate),
        }
    }
}
