use log::debug;
use serde::{Deserialize, Serialize};

use super::book::{Deal, DealBook};
use crate::deal::MarginRating;
use crate::types::{Money, Rate};

/// Maximum number of deals shown side by side.
pub const MAX_COMPARE: usize = 3;

/// Headline figures of one deal for list and comparison views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealSummary {
    pub id: String,
    pub name: String,
    pub city: String,
    pub total_investment: Money,
    pub profit_low: Money,
    pub margin_low: Option<Rate>,
    pub rating_low: Option<MarginRating>,
}

impl From<&Deal> for DealSummary {
    fn from(deal: &Deal) -> Self {
        let r = deal.evaluate();
        Self {
            id: deal.id.clone(),
            name: deal.name.clone(),
            city: deal.city.clone(),
            total_investment: r.total_investment,
            profit_low: r.profit_low,
            margin_low: r.margin_low,
            rating_low: r.rating_low,
        }
    }
}

impl DealBook {
    /// Summaries of every deal, in book order.
    pub fn summaries(&self) -> Vec<DealSummary> {
        self.deals().iter().map(DealSummary::from).collect()
    }

    /// Side-by-side comparison of up to [`MAX_COMPARE`] deals.
    ///
    /// Only the first `MAX_COMPARE` ids are honoured. Selected deals appear
    /// in book order; ids that match no deal are skipped.
    pub fn compare<S: AsRef<str>>(&self, ids: &[S]) -> Vec<DealSummary> {
        let wanted: Vec<&str> = ids.iter().take(MAX_COMPARE).map(|s| s.as_ref()).collect();
        if ids.len() > MAX_COMPARE {
            debug!(
                "compare: {} ids requested, keeping the first {MAX_COMPARE}",
                ids.len()
            );
        }
        self.deals()
            .iter()
            .filter(|d| wanted.contains(&d.id.as_str()))
            .map(DealSummary::from)
            .collect()
    }
}
