//! Deal valuation engine.
//!
//! A raw parameter record is normalized ([`normalize`]), then the
//! acquisition, renovation, financing and holding blocks are computed,
//! aggregated into profit and margin for both sale-price scenarios,
//! complemented by rental metrics, and finally swept across the fixed
//! negotiation tiers ([`negotiation`]).

pub mod analysis;
pub mod engine;
pub mod negotiation;
pub mod normalize;
pub mod params;
pub mod rating;

pub use analysis::{analyze_deal, analyze_parameters};
pub use engine::{evaluate_deal, DealResult};
pub use negotiation::{NegotiationEntry, DISCOUNT_TIERS};
pub use normalize::normalize;
pub use params::{DealParameters, RawDealParameters};
pub use rating::MarginRating;
