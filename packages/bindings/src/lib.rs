use napi::Result as NapiResult;
use napi_derive::napi;

use flip_calc_core::deal::{self, DealParameters, RawDealParameters};
use flip_calc_core::portfolio::DealBook;
use flip_calc_core::regions;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Deal valuation
// ---------------------------------------------------------------------------

/// Value a deal. Accepts any JSON object; malformed fields normalize to 0.
#[napi]
pub fn evaluate_deal(input_json: String) -> NapiResult<String> {
    let input: RawDealParameters = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal::analyze_deal(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn negotiation_table(input_json: String) -> NapiResult<String> {
    let input: RawDealParameters = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let result = deal::evaluate_deal(&deal::normalize(&input));
    serde_json::to_string(&serde_json::json!({
        "negotiation": result.negotiation,
        "best_tier": result.best_tier,
    }))
    .map_err(to_napi_error)
}

#[napi]
pub fn default_deal() -> NapiResult<String> {
    serde_json::to_string(&DealParameters::default()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

#[napi]
pub fn transfer_tax_rate(region: String) -> NapiResult<String> {
    let lookup = regions::lookup_transfer_tax(&region);
    serde_json::to_string(&lookup).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Deal book
// ---------------------------------------------------------------------------

#[napi]
pub fn summarize_deals(book_json: String) -> NapiResult<String> {
    let book = DealBook::from_json(&book_json).map_err(to_napi_error)?;
    serde_json::to_string(&book.summaries()).map_err(to_napi_error)
}

#[napi]
pub fn compare_deals(book_json: String, ids: Vec<String>) -> NapiResult<String> {
    let book = DealBook::from_json(&book_json).map_err(to_napi_error)?;
    serde_json::to_string(&book.compare(&ids)).map_err(to_napi_error)
}

#[napi]
pub fn duplicate_deal(book_json: String, id: String) -> NapiResult<String> {
    let mut book = DealBook::from_json(&book_json).map_err(to_napi_error)?;
    book.duplicate(&id).map_err(to_napi_error)?;
    book.to_json().map_err(to_napi_error)
}

#[napi]
pub fn delete_deal(book_json: String, id: String) -> NapiResult<String> {
    let mut book = DealBook::from_json(&book_json).map_err(to_napi_error)?;
    book.delete(&id).map_err(to_napi_error)?;
    book.to_json().map_err(to_napi_error)
}
