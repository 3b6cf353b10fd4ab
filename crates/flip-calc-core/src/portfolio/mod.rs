//! Deal book: the list of candidate deals a user works on, with JSON
//! import/export and side-by-side comparison.

pub mod book;
pub mod compare;

pub use book::{Deal, DealBook};
pub use compare::{DealSummary, MAX_COMPARE};
