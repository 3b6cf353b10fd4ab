use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use flip_calc_core::deal::{self, DealParameters, RawDealParameters};
use flip_calc_core::regions;

use crate::input;
use crate::input::rates::parse_rate;

/// Deal parameters given as flags. Unset flags keep the template
/// assumptions (see `ffc template`). Rate flags accept `0.055` or `5.5`.
#[derive(Args)]
pub struct DealArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Region label (e.g. "BY", "Berlin"); sets the transfer-tax rate
    #[arg(long)]
    pub region: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Livable area (m²)
    #[arg(long)]
    pub area: Option<Decimal>,

    /// Market price per m², low scenario
    #[arg(long)]
    pub market_low: Option<Decimal>,

    /// Market price per m², high scenario
    #[arg(long)]
    pub market_high: Option<Decimal>,

    /// Notary and land-registry fees
    #[arg(long, value_parser = parse_rate)]
    pub notary: Option<Decimal>,

    /// Buyer-side broker commission
    #[arg(long, value_parser = parse_rate)]
    pub broker: Option<Decimal>,

    /// Transfer tax (ignored when --region is given)
    #[arg(long, value_parser = parse_rate)]
    pub transfer_tax: Option<Decimal>,

    /// Decluttering cost
    #[arg(long)]
    pub decluttering: Option<Decimal>,

    /// Renovation budget
    #[arg(long)]
    pub renovation: Option<Decimal>,

    /// Contingency on the renovation budget
    #[arg(long, value_parser = parse_rate)]
    pub contingency: Option<Decimal>,

    /// Kitchen
    #[arg(long)]
    pub kitchen: Option<Decimal>,

    /// Miscellaneous renovation items
    #[arg(long)]
    pub misc: Option<Decimal>,

    /// Project duration in months
    #[arg(long)]
    pub months: Option<Decimal>,

    /// Financed share of the purchase price
    #[arg(long, value_parser = parse_rate)]
    pub financing_ratio: Option<Decimal>,

    /// Annual interest rate
    #[arg(long, value_parser = parse_rate)]
    pub rate: Option<Decimal>,

    /// Loan origination fee
    #[arg(long, value_parser = parse_rate)]
    pub origination: Option<Decimal>,

    /// Other financing charges
    #[arg(long, value_parser = parse_rate)]
    pub other_financing: Option<Decimal>,

    /// Monthly condo fee
    #[arg(long)]
    pub condo_fee: Option<Decimal>,

    /// Monthly utilities
    #[arg(long)]
    pub utilities: Option<Decimal>,

    /// Fixed broker fee on resale
    #[arg(long)]
    pub sale_broker_fee: Option<Decimal>,

    /// Co-investor share of the sale price
    #[arg(long, value_parser = parse_rate)]
    pub coinvestor: Option<Decimal>,

    /// Home-staging fee
    #[arg(long)]
    pub staging: Option<Decimal>,

    /// Monthly rent per m²
    #[arg(long)]
    pub rent: Option<Decimal>,

    /// End buyer's annual mortgage rate (interest plus repayment)
    #[arg(long, value_parser = parse_rate)]
    pub buyer_rate: Option<Decimal>,
}

/// Arguments for a full deal valuation
#[derive(Args)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub deal: DealArgs,
}

/// Arguments for the negotiation table
#[derive(Args)]
pub struct NegotiateArgs {
    #[command(flatten)]
    pub deal: DealArgs,
}

fn set(target: &mut Decimal, value: Option<Decimal>) {
    if let Some(v) = value {
        *target = v;
    }
}

fn params_from_flags(args: &DealArgs) -> DealParameters {
    let mut p = DealParameters::default();
    set(&mut p.price, args.price);
    set(&mut p.area, args.area);
    set(&mut p.market_price_low, args.market_low);
    set(&mut p.market_price_high, args.market_high);
    set(&mut p.notary_pct, args.notary);
    set(&mut p.broker_pct, args.broker);
    set(&mut p.transfer_tax_pct, args.transfer_tax);
    set(&mut p.decluttering, args.decluttering);
    set(&mut p.renovation_budget, args.renovation);
    set(&mut p.contingency_pct, args.contingency);
    set(&mut p.kitchen, args.kitchen);
    set(&mut p.misc, args.misc);
    set(&mut p.duration_months, args.months);
    set(&mut p.financing_ratio, args.financing_ratio);
    set(&mut p.annual_rate, args.rate);
    set(&mut p.origination_pct, args.origination);
    set(&mut p.other_financing_pct, args.other_financing);
    set(&mut p.condo_fee, args.condo_fee);
    set(&mut p.utilities, args.utilities);
    set(&mut p.broker_fee_fixed, args.sale_broker_fee);
    set(&mut p.coinvestor_pct, args.coinvestor);
    set(&mut p.staging_fee, args.staging);
    set(&mut p.rent_per_area, args.rent);
    set(&mut p.buyer_rate, args.buyer_rate);
    p
}

/// Resolve deal parameters from --input, piped stdin, or flags, in that order.
pub fn resolve_parameters(args: &DealArgs) -> Result<RawDealParameters, Box<dyn std::error::Error>> {
    let mut raw: RawDealParameters = if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        RawDealParameters::from(&params_from_flags(args))
    };

    if let Some(ref label) = args.region {
        let lookup = regions::lookup_transfer_tax(label);
        if lookup.fallback {
            log::warn!(
                "unknown region '{label}', using fallback transfer tax {}",
                lookup.rate
            );
        }
        raw.transfer_tax_pct = Some(Value::String(lookup.rate.to_string()));
    }

    Ok(raw)
}

pub fn run_evaluate(args: EvaluateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = resolve_parameters(&args.deal)?;
    let result = deal::analyze_deal(&raw);
    Ok(serde_json::to_value(result)?)
}

pub fn run_negotiate(args: NegotiateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = resolve_parameters(&args.deal)?;
    let output = deal::analyze_deal(&raw);
    let best_tier = output.result.best_tier;

    let mut rows = Vec::with_capacity(output.result.negotiation.len());
    for (i, entry) in output.result.negotiation.iter().enumerate() {
        let mut row = serde_json::to_value(entry)?;
        if let Value::Object(ref mut map) = row {
            map.insert("best".into(), Value::Bool(i == best_tier));
        }
        rows.push(row);
    }

    Ok(json!({
        "results": rows,
        "best_tier": best_tier,
        "warnings": output.warnings,
    }))
}

pub fn run_template() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(json!({ "result": DealParameters::default() }))
}
