use clap::Args;
use serde_json::{json, Value};

use flip_calc_core::regions::{self, Region, FALLBACK_TRANSFER_TAX_RATE};

/// Arguments for transfer-tax lookup
#[derive(Args)]
pub struct TransferTaxArgs {
    /// Region code or name (e.g. "NW", "Nordrhein-Westfalen")
    #[arg(long)]
    pub region: String,
}

pub fn run_transfer_tax(args: TransferTaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let lookup = regions::lookup_transfer_tax(&args.region);
    Ok(json!({ "result": lookup }))
}

pub fn run_regions() -> Result<Value, Box<dyn std::error::Error>> {
    let rows: Vec<Value> = Region::ALL
        .iter()
        .map(|r| {
            json!({
                "code": r.code(),
                "name": r.name(),
                "transfer_tax_rate": r.transfer_tax_rate(),
            })
        })
        .collect();
    Ok(json!({
        "results": rows,
        "fallback_rate": FALLBACK_TRANSFER_TAX_RATE,
    }))
}
