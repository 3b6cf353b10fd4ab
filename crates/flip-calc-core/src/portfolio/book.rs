use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::deal::{
    analyze_deal, evaluate_deal, normalize, DealParameters, DealResult, RawDealParameters,
};
use crate::error::FlipCalcError;
use crate::types::ComputationOutput;
use crate::FlipCalcResult;

const BLANK_DEAL_NAME: &str = "Blank deal";
const COPY_SUFFIX: &str = " (copy)";

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A named deal with its (not yet normalized) parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default, alias = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub params: RawDealParameters,
}

impl Deal {
    /// A fresh deal carrying the template assumptions.
    pub fn blank() -> Self {
        Self {
            id: new_id(),
            name: BLANK_DEAL_NAME.to_string(),
            city: String::new(),
            created_at: Some(Utc::now()),
            params: RawDealParameters::from(&DealParameters::default()),
        }
    }

    pub fn parameters(&self) -> DealParameters {
        normalize(&self.params)
    }

    pub fn evaluate(&self) -> DealResult {
        evaluate_deal(&self.parameters())
    }

    pub fn analyze(&self) -> ComputationOutput<DealResult> {
        analyze_deal(&self.params)
    }
}

/// Ordered collection of deals, newest first. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DealBook {
    deals: Vec<Deal>,
}

impl Default for DealBook {
    fn default() -> Self {
        Self::new()
    }
}

impl DealBook {
    /// A book holding one blank deal.
    pub fn new() -> Self {
        Self {
            deals: vec![Deal::blank()],
        }
    }

    /// Build a book from deals; missing ids are assigned and an empty list
    /// yields a book with one blank deal.
    pub fn from_deals(mut deals: Vec<Deal>) -> Self {
        for deal in deals.iter_mut().filter(|d| d.id.is_empty()) {
            deal.id = new_id();
            debug!("book: assigned id {} to imported deal {:?}", deal.id, deal.name);
        }
        if deals.is_empty() {
            deals.push(Deal::blank());
        }
        Self { deals }
    }

    /// Import a book from JSON. The top level must be an array of deals.
    pub fn from_json(json: &str) -> FlipCalcResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_array() {
            return Err(FlipCalcError::ImportFormat(
                "deal book JSON must be an array".into(),
            ));
        }
        let deals: Vec<Deal> = serde_json::from_value(value)?;
        Ok(Self::from_deals(deals))
    }

    /// Export the book as pretty-printed JSON.
    pub fn to_json(&self) -> FlipCalcResult<String> {
        Ok(serde_json::to_string_pretty(&self.deals)?)
    }

    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    pub fn len(&self) -> usize {
        self.deals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deals.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Deal> {
        self.deals.iter().find(|d| d.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Deal> {
        self.deals.iter_mut().find(|d| d.id == id)
    }

    fn position(&self, id: &str) -> FlipCalcResult<usize> {
        self.deals
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| FlipCalcError::DealNotFound(id.to_string()))
    }

    /// Insert a blank deal at the front and return it.
    pub fn create(&mut self) -> &Deal {
        self.deals.insert(0, Deal::blank());
        debug!("book: created deal {}", self.deals[0].id);
        &self.deals[0]
    }

    /// Copy a deal under a new id and name, inserted at the front.
    pub fn duplicate(&mut self, id: &str) -> FlipCalcResult<&Deal> {
        let idx = self.position(id)?;
        let source = &self.deals[idx];
        let copy = Deal {
            id: new_id(),
            name: format!("{}{}", source.name, COPY_SUFFIX),
            city: source.city.clone(),
            created_at: Some(Utc::now()),
            params: source.params.clone(),
        };
        debug!("book: duplicated {id} as {}", copy.id);
        self.deals.insert(0, copy);
        Ok(&self.deals[0])
    }

    /// Remove a deal. Removing the last deal leaves a fresh blank one.
    pub fn delete(&mut self, id: &str) -> FlipCalcResult<Deal> {
        let idx = self.position(id)?;
        let removed = self.deals.remove(idx);
        if self.deals.is_empty() {
            self.deals.push(Deal::blank());
        }
        debug!("book: deleted {id}");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_blank_deal_uses_template() {
        let deal = Deal::blank();
        let p = deal.parameters();
        assert_eq!(p.notary_pct, dec!(0.015));
        assert_eq!(p.duration_months, dec!(8));
        assert_eq!(deal.name, "Blank deal");
        assert!(!deal.id.is_empty());
    }

    #[test]
    fn test_create_inserts_at_front() {
        let mut book = DealBook::new();
        let first = book.deals()[0].id.clone();
        let created = book.create().id.clone();
        assert_eq!(book.len(), 2);
        assert_eq!(book.deals()[0].id, created);
        assert_eq!(book.deals()[1].id, first);
    }

    #[test]
    fn test_delete_last_leaves_blank() {
        let mut book = DealBook::new();
        let id = book.deals()[0].id.clone();
        book.delete(&id).unwrap();
        assert_eq!(book.len(), 1);
        assert_ne!(book.deals()[0].id, id);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let mut book = DealBook::new();
        assert!(matches!(
            book.duplicate("missing"),
            Err(FlipCalcError::DealNotFound(_))
        ));
        assert!(matches!(
            book.delete("missing"),
            Err(FlipCalcError::DealNotFound(_))
        ));
    }
}
