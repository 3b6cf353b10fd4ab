use rust_decimal::Decimal;
use std::time::Instant;

use super::engine::{evaluate_normalized, DealResult};
use super::normalize::{normalize, AREA_EPSILON};
use super::params::{DealParameters, RawDealParameters};
use super::rating::BORDERLINE_MARGIN_THRESHOLD;
use crate::types::{with_metadata, ComputationOutput};

const METHODOLOGY: &str = "Fix-and-Flip Deal Valuation (flat-interest spreadsheet model)";

/// Normalize a raw deal record, value it, and wrap the result in the
/// standard output envelope with advisory warnings.
pub fn analyze_deal(raw: &RawDealParameters) -> ComputationOutput<DealResult> {
    analyze_parameters(&normalize(raw))
}

/// As [`analyze_deal`], for already typed parameters.
pub fn analyze_parameters(params: &DealParameters) -> ComputationOutput<DealResult> {
    let start = Instant::now();
    // Normalized once here so the envelope's assumptions and warnings see
    // the same inputs as the engine.
    let params = params.normalized();

    let result = evaluate_normalized(&params);
    let warnings = collect_warnings(&params, &result);

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(METHODOLOGY, &params, warnings, elapsed, result)
}

fn collect_warnings(p: &DealParameters, r: &DealResult) -> Vec<String> {
    let mut warnings = Vec::new();

    if p.area <= AREA_EPSILON {
        warnings.push("Livable area is zero; sale prices and rent are effectively zero".into());
    }

    if p.financing_ratio > Decimal::ONE {
        warnings.push(format!(
            "Financing ratio {} exceeds 100% of the purchase price",
            p.financing_ratio
        ));
    }

    match r.margin_low {
        None => warnings.push("Margin is undefined: cost basis is not positive".into()),
        Some(m) if m < BORDERLINE_MARGIN_THRESHOLD => warnings.push(format!(
            "Low-scenario margin {:.1}% is below the 10% threshold",
            m * Decimal::ONE_HUNDRED
        )),
        _ => {}
    }

    if r.sale_price_high < r.total_investment {
        warnings.push(
            "High-scenario sale price is below total investment; the deal loses money in both scenarios"
                .into(),
        );
    }

    warnings
}
