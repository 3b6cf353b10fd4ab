//! Transfer-tax (Grunderwerbsteuer) rates of the German federal states.
//!
//! The engine only consumes a transfer-tax fraction; this table is the
//! region-rate collaborator that derives one from a jurisdiction label.

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::deal::DealParameters;
use crate::error::FlipCalcError;
use crate::types::Rate;

/// Rate used for labels that match no known region.
pub const FALLBACK_TRANSFER_TAX_RATE: Decimal = dec!(0.065);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    BadenWuerttemberg,
    Bayern,
    Berlin,
    Brandenburg,
    Bremen,
    Hamburg,
    Hessen,
    MecklenburgVorpommern,
    Niedersachsen,
    NordrheinWestfalen,
    RheinlandPfalz,
    Saarland,
    Sachsen,
    SachsenAnhalt,
    SchleswigHolstein,
    Thueringen,
}

impl Region {
    pub const ALL: [Region; 16] = [
        Region::BadenWuerttemberg,
        Region::Bayern,
        Region::Berlin,
        Region::Brandenburg,
        Region::Bremen,
        Region::Hamburg,
        Region::Hessen,
        Region::MecklenburgVorpommern,
        Region::Niedersachsen,
        Region::NordrheinWestfalen,
        Region::RheinlandPfalz,
        Region::Saarland,
        Region::Sachsen,
        Region::SachsenAnhalt,
        Region::SchleswigHolstein,
        Region::Thueringen,
    ];

    /// ISO 3166-2:DE subdivision code
    pub fn code(&self) -> &'static str {
        match self {
            Region::BadenWuerttemberg => "BW",
            Region::Bayern => "BY",
            Region::Berlin => "BE",
            Region::Brandenburg => "BB",
            Region::Bremen => "HB",
            Region::Hamburg => "HH",
            Region::Hessen => "HE",
            Region::MecklenburgVorpommern => "MV",
            Region::Niedersachsen => "NI",
            Region::NordrheinWestfalen => "NW",
            Region::RheinlandPfalz => "RP",
            Region::Saarland => "SL",
            Region::Sachsen => "SN",
            Region::SachsenAnhalt => "ST",
            Region::SchleswigHolstein => "SH",
            Region::Thueringen => "TH",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Region::BadenWuerttemberg => "Baden-Württemberg",
            Region::Bayern => "Bayern",
            Region::Berlin => "Berlin",
            Region::Brandenburg => "Brandenburg",
            Region::Bremen => "Bremen",
            Region::Hamburg => "Hamburg",
            Region::Hessen => "Hessen",
            Region::MecklenburgVorpommern => "Mecklenburg-Vorpommern",
            Region::Niedersachsen => "Niedersachsen",
            Region::NordrheinWestfalen => "Nordrhein-Westfalen",
            Region::RheinlandPfalz => "Rheinland-Pfalz",
            Region::Saarland => "Saarland",
            Region::Sachsen => "Sachsen",
            Region::SachsenAnhalt => "Sachsen-Anhalt",
            Region::SchleswigHolstein => "Schleswig-Holstein",
            Region::Thueringen => "Thüringen",
        }
    }

    /// Flat transfer-tax rate (fraction of the purchase price)
    pub fn transfer_tax_rate(&self) -> Rate {
        match self {
            Region::Bayern => dec!(0.035),
            Region::BadenWuerttemberg
            | Region::Bremen
            | Region::Niedersachsen
            | Region::RheinlandPfalz
            | Region::SachsenAnhalt
            | Region::Thueringen => dec!(0.05),
            Region::Hamburg | Region::Sachsen => dec!(0.055),
            Region::Berlin | Region::Hessen | Region::MecklenburgVorpommern => dec!(0.06),
            Region::Brandenburg
            | Region::NordrheinWestfalen
            | Region::Saarland
            | Region::SchleswigHolstein => dec!(0.065),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fold case, umlauts and separators so "Baden-Wuerttemberg",
/// "baden württemberg" and "BADEN_WÜRTTEMBERG" compare equal.
fn fold_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.trim().chars().flat_map(char::to_lowercase) {
        match c {
            'ä' => out.push_str("ae"),
            'ö' => out.push_str("oe"),
            'ü' => out.push_str("ue"),
            'ß' => out.push_str("ss"),
            '-' | '_' | ' ' | '.' => {}
            c => out.push(c),
        }
    }
    out
}

impl FromStr for Region {
    type Err = FlipCalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = fold_label(s);
        if folded.is_empty() {
            return Err(FlipCalcError::UnknownRegion(s.to_string()));
        }
        Region::ALL
            .into_iter()
            .find(|r| fold_label(r.code()) == folded || fold_label(r.name()) == folded)
            .ok_or_else(|| FlipCalcError::UnknownRegion(s.to_string()))
    }
}

/// Outcome of a transfer-tax lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferTaxLookup {
    /// Label as supplied by the caller
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    pub rate: Rate,
    /// True when the label was not recognised and the fallback rate applies
    pub fallback: bool,
}

/// Map a jurisdiction label to a transfer-tax rate. Never fails: unknown
/// labels resolve to [`FALLBACK_TRANSFER_TAX_RATE`].
pub fn lookup_transfer_tax(label: &str) -> TransferTaxLookup {
    match label.parse::<Region>() {
        Ok(region) => TransferTaxLookup {
            label: label.to_string(),
            region: Some(region),
            rate: region.transfer_tax_rate(),
            fallback: false,
        },
        Err(_) => {
            debug!("regions: unknown label {label:?}, using fallback rate");
            TransferTaxLookup {
                label: label.to_string(),
                region: None,
                rate: FALLBACK_TRANSFER_TAX_RATE,
                fallback: true,
            }
        }
    }
}

impl DealParameters {
    /// Set the transfer-tax rate from a region.
    pub fn with_region(mut self, region: Region) -> Self {
        self.transfer_tax_pct = region.transfer_tax_rate();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes_and_names() {
        assert_eq!("BY".parse::<Region>().unwrap(), Region::Bayern);
        assert_eq!("nw".parse::<Region>().unwrap(), Region::NordrheinWestfalen);
        assert_eq!("Thüringen".parse::<Region>().unwrap(), Region::Thueringen);
        assert_eq!(
            "baden wuerttemberg".parse::<Region>().unwrap(),
            Region::BadenWuerttemberg
        );
        assert_eq!(
            "Sachsen-Anhalt".parse::<Region>().unwrap(),
            Region::SachsenAnhalt
        );
    }

    #[test]
    fn test_unknown_region_errors() {
        assert!(matches!(
            "Atlantis".parse::<Region>(),
            Err(FlipCalcError::UnknownRegion(_))
        ));
        assert!("".parse::<Region>().is_err());
    }

    #[test]
    fn test_lookup_fallback() {
        let hit = lookup_transfer_tax("Bayern");
        assert_eq!(hit.rate, dec!(0.035));
        assert!(!hit.fallback);

        let miss = lookup_transfer_tax("Tirol");
        assert_eq!(miss.rate, FALLBACK_TRANSFER_TAX_RATE);
        assert!(miss.fallback);
        assert!(miss.region.is_none());
    }

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<&str> = Region::ALL.iter().map(|r| r.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), 16);
    }

    #[test]
    fn test_with_region_sets_transfer_tax() {
        let p = DealParameters::default().with_region(Region::Hamburg);
        assert_eq!(p.transfer_tax_pct, dec!(0.055));
    }
}
