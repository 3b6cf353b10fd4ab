use flip_calc_core::deal::engine::{self, evaluate_deal};
use flip_calc_core::deal::negotiation::DISCOUNT_TIERS;
use flip_calc_core::deal::{analyze_deal, normalize, DealParameters, MarginRating, RawDealParameters};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

/// 66 m² flat bought at 95k, renovated for ~42k, sold at 2.7k-2.8k per m².
fn reference_deal() -> DealParameters {
    DealParameters {
        price: dec!(95000),
        area: dec!(66),
        market_price_low: dec!(2700),
        market_price_high: dec!(2800),
        notary_pct: dec!(0.015),
        broker_pct: dec!(0.036),
        transfer_tax_pct: dec!(0.065),
        decluttering: dec!(2000),
        renovation_budget: dec!(32000),
        contingency_pct: dec!(0.10),
        kitchen: dec!(5000),
        misc: dec!(0),
        duration_months: dec!(8),
        financing_ratio: dec!(1.0),
        annual_rate: dec!(0.055),
        origination_pct: dec!(0.01),
        other_financing_pct: dec!(0),
        condo_fee: dec!(250),
        utilities: dec!(140),
        broker_fee_fixed: dec!(0),
        coinvestor_pct: dec!(0),
        staging_fee: dec!(0),
        rent_per_area: dec!(0),
        buyer_rate: dec!(0.054),
    }
}

fn close(actual: Decimal, expected: Decimal, tol: Decimal) -> bool {
    (actual - expected).abs() < tol
}

// ===========================================================================
// End-to-end
// ===========================================================================

#[test]
fn test_reference_deal_headline_figures() {
    let r = evaluate_deal(&reference_deal());

    assert_eq!(r.sale_price_low, dec!(178200));
    assert_eq!(r.sale_price_high, dec!(184800));
    assert_eq!(r.acquisition.total, dec!(106020));
    assert_eq!(r.renovation.total, dec!(42200));
    assert_eq!(r.holding.total, dec!(3120));
    assert!(
        close(r.financing.total, dec!(4433.33), dec!(0.01)),
        "financing total {}",
        r.financing.total
    );
    assert!(
        close(r.total_investment, dec!(155773.33), dec!(0.01)),
        "total investment {}",
        r.total_investment
    );
    assert!(
        close(r.profit_low, dec!(22426.67), dec!(0.01)),
        "profit low {}",
        r.profit_low
    );
    let margin_low = r.margin_low.expect("margin defined");
    assert!(
        close(margin_low, dec!(0.144), dec!(0.0005)),
        "margin low {margin_low}"
    );
    assert_eq!(r.rating_low, Some(MarginRating::Borderline));
}

#[test]
fn test_reference_deal_negotiation() {
    let r = evaluate_deal(&reference_deal());

    let first = &r.negotiation[0];
    assert_eq!(first.discounted_price, dec!(85500));
    // 85500 * 1.116 + 855 + 3135 + 42200 + 3120
    assert!(close(first.total_investment, dec!(144728), dec!(0.01)));
    assert!(close(first.profit_low, dec!(33472), dec!(0.01)));

    // Deeper discounts always improve the margin here, so the last tier wins.
    assert_eq!(r.best_tier, 7);
    assert_eq!(r.best_negotiation().discount, dec!(0.45));
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_purity() {
    let p = reference_deal();
    let copy = p.clone();
    assert_eq!(evaluate_deal(&p), evaluate_deal(&copy));
    assert_eq!(p, copy);
}

#[test]
fn test_acquisition_additivity() {
    let mut p = reference_deal();
    for price in [dec!(0), dec!(1), dec!(123456.78), dec!(2500000)] {
        p.price = price;
        let a = engine::acquisition_costs(&p);
        assert_eq!(
            a.total,
            price + price * (p.notary_pct + p.broker_pct + p.transfer_tax_pct)
        );
    }
}

#[test]
fn test_contingency_applies_to_budget_only() {
    let base = reference_deal();
    let base_r = engine::renovation_costs(&base);

    let mut more_kitchen = base.clone();
    more_kitchen.kitchen += dec!(4000);
    more_kitchen.misc += dec!(1500);
    more_kitchen.decluttering += dec!(500);
    let r = engine::renovation_costs(&more_kitchen);
    assert_eq!(r.contingency, base_r.contingency);
    assert_eq!(r.total, base_r.total + dec!(6000));

    let mut bigger_budget = base.clone();
    bigger_budget.renovation_budget += dec!(1000);
    let r = engine::renovation_costs(&bigger_budget);
    assert_eq!(r.contingency, base_r.contingency + dec!(100));
    assert_eq!(r.total, base_r.total + dec!(1100));
}

#[test]
fn test_negotiation_discounted_prices_exact() {
    let p = reference_deal();
    let r = evaluate_deal(&p);
    assert_eq!(r.negotiation.len(), DISCOUNT_TIERS.len());
    for (entry, tier) in r.negotiation.iter().zip(DISCOUNT_TIERS) {
        assert_eq!(entry.discount, tier);
        assert_eq!(entry.discounted_price, p.price * (Decimal::ONE - tier));
    }
}

#[test]
fn test_best_tier_is_strict_maximum() {
    let mut p = reference_deal();
    p.coinvestor_pct = dec!(0.2);
    p.staging_fee = dec!(3000);
    let r = evaluate_deal(&p);
    let best = r.negotiation[r.best_tier].margin_low.unwrap();
    for (i, e) in r.negotiation.iter().enumerate() {
        if let Some(m) = e.margin_low {
            if i < r.best_tier {
                assert!(m < best);
            } else {
                assert!(m <= best);
            }
        }
    }
}

// ===========================================================================
// Carried-over formula asymmetries
// ===========================================================================

#[test]
fn test_cost_basis_uses_bare_coinvestor_fraction() {
    let mut p = reference_deal();
    p.coinvestor_pct = dec!(0.5);
    p.broker_fee_fixed = dec!(2000);
    p.staging_fee = dec!(1000);
    let r = evaluate_deal(&p);
    assert_eq!(
        r.margin_cost_basis,
        r.total_investment + dec!(2000) + dec!(0.5) + dec!(1000)
    );
    // Profit, by contrast, scales the share by the sale price.
    assert_eq!(
        r.profit_low,
        r.sale_price_low - r.total_investment - dec!(0.5) * r.sale_price_low - dec!(1000) - dec!(2000)
    );
}

#[test]
fn test_negotiation_profit_excludes_fixed_broker_fee() {
    let without_fee = evaluate_deal(&reference_deal());
    let mut p = reference_deal();
    p.broker_fee_fixed = dec!(5000);
    let with_fee = evaluate_deal(&p);

    assert_eq!(with_fee.profit_low, without_fee.profit_low - dec!(5000));
    for (a, b) in with_fee.negotiation.iter().zip(without_fee.negotiation.iter()) {
        assert_eq!(a.profit_low, b.profit_low);
        assert_eq!(a.profit_high, b.profit_high);
        // ...but the fee still enters the tier margin denominator.
        assert!(a.margin_low.unwrap() < b.margin_low.unwrap());
    }
}

#[test]
fn test_negotiation_high_profit_uses_low_sale_price_share() {
    let mut p = reference_deal();
    p.coinvestor_pct = dec!(0.1);
    let r = evaluate_deal(&p);
    for e in r.negotiation.iter() {
        assert_eq!(
            e.profit_high,
            r.sale_price_high - e.total_investment - dec!(0.1) * r.sale_price_low
        );
    }
}

#[test]
fn test_negotiation_financing_ignores_financing_ratio() {
    let full = evaluate_deal(&reference_deal());
    let mut p = reference_deal();
    p.financing_ratio = dec!(0.5);
    let half = evaluate_deal(&p);

    assert!(half.financing.total < full.financing.total);
    for (a, b) in half.negotiation.iter().zip(full.negotiation.iter()) {
        assert_eq!(a.total_investment, b.total_investment);
    }
}

// ===========================================================================
// Normalization and undefined values
// ===========================================================================

#[test]
fn test_zero_cost_basis_yields_undefined_margins() {
    let r = evaluate_deal(&normalize(&RawDealParameters::default()));
    assert_eq!(r.margin_cost_basis, Decimal::ZERO);
    assert_eq!(r.margin_low, None);
    assert_eq!(r.margin_high, None);
    assert_eq!(r.rating_low, None);
    assert!(r.negotiation.iter().all(|e| e.margin_low.is_none()));
    assert_eq!(r.best_tier, 0);
    assert_eq!(r.rental.gross_yield_low, None);
}

#[test]
fn test_malformed_input_never_panics() {
    let raw: RawDealParameters = serde_json::from_value(json!({
        "price": "-12",
        "area": "sixty",
        "market_price_low": "2.700,00",
        "market_price_high": [1, 2],
        "notary_pct": {"a": 1},
        "annual_rate": "1e40",
        "duration_months": "NaN",
        "financing_ratio": true,
        "kitchen": null,
        "rent_per_area": "12,5"
    }))
    .unwrap();
    let out = analyze_deal(&raw);
    assert_eq!(out.result.acquisition.total, Decimal::ZERO);
    assert_eq!(out.result.negotiation.len(), 8);
}

#[test]
fn test_extreme_inputs_stay_bounded() {
    let huge = json!("99999999999999999999999999999999");
    let raw = RawDealParameters {
        price: Some(huge.clone()),
        area: Some(huge.clone()),
        market_price_low: Some(huge.clone()),
        market_price_high: Some(huge.clone()),
        financing_ratio: Some(huge.clone()),
        annual_rate: Some(huge.clone()),
        duration_months: Some(huge.clone()),
        coinvestor_pct: Some(huge.clone()),
        rent_per_area: Some(huge.clone()),
        buyer_rate: Some(huge),
        ..Default::default()
    };
    let r = analyze_deal(&raw).result;
    assert!(r.total_investment > Decimal::ZERO);
    assert!(r.margin_low.is_some());
}

#[test]
fn test_tiny_denominator_overflow_is_undefined() {
    let p = DealParameters {
        market_price_low: dec!(1000000000000),
        area: dec!(10000000),
        staging_fee: dec!(0.0000000000000000000000000001),
        contingency_pct: Decimal::ZERO,
        notary_pct: Decimal::ZERO,
        broker_pct: Decimal::ZERO,
        transfer_tax_pct: Decimal::ZERO,
        origination_pct: Decimal::ZERO,
        annual_rate: Decimal::ZERO,
        ..Default::default()
    };
    let r = evaluate_deal(&p);
    assert!(r.margin_cost_basis > Decimal::ZERO);
    assert_eq!(r.margin_low, None);
}

#[test]
fn test_typed_parameters_are_bounded_before_evaluation() {
    let huge = DealParameters {
        price: Decimal::MAX,
        ..reference_deal()
    };
    let r = evaluate_deal(&huge);
    assert_eq!(r.acquisition.total, dec!(1000000000000) * dec!(1.116));

    let negative = DealParameters {
        price: dec!(-1000),
        ..reference_deal()
    };
    let r = evaluate_deal(&negative);
    assert_eq!(r.acquisition.total, Decimal::ZERO);
    assert_eq!(evaluate_deal(&negative), evaluate_deal(&negative.normalized()));
}
