//! Skip catalog model and location keys.
//!
//! A [`Skip`] is one rentable waste container offering as returned by the
//! catalog endpoint. Only size, hire period, the two eligibility flags and the
//! pricing fields drive the engine; the location and audit fields are carried
//! through untouched.

use crate::domain::error::{Result, SkipHireError};
use serde::{Deserialize, Serialize};

/// A rentable skip offering for one location.
///
/// Field names follow the catalog endpoint's JSON so records decode directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skip {
    pub id: i64,
    /// Capacity in yards.
    pub size: u32,
    pub hire_period_days: u32,
    #[serde(default)]
    pub transport_cost: Option<f64>,
    #[serde(default)]
    pub per_tonne_cost: Option<f64>,
    pub price_before_vat: f64,
    /// VAT rate as a percentage, e.g. `20.0`.
    pub vat: f64,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub forbidden: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    pub allowed_on_road: bool,
    pub allows_heavy_waste: bool,
}

impl Skip {
    /// Price including VAT: `price_before_vat * (1 + vat / 100)`.
    #[must_use]
    pub fn total_price(&self) -> f64 {
        self.price_before_vat * (1.0 + self.vat / 100.0)
    }

    /// The VAT portion of [`Self::total_price`].
    #[must_use]
    pub fn vat_amount(&self) -> f64 {
        self.total_price() - self.price_before_vat
    }

    /// Skips that may not stand on the road need a council permit.
    #[must_use]
    pub const fn requires_permit(&self) -> bool {
        !self.allowed_on_road
    }
}

/// Identifies which catalog to fetch: a postal code plus an area name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationKey {
    postcode: String,
    area: String,
}

impl LocationKey {
    /// Builds a key, rejecting blank components.
    ///
    /// Surrounding whitespace is trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns [`SkipHireError::Location`] if either component is empty.
    pub fn new(postcode: impl Into<String>, area: impl Into<String>) -> Result<Self> {
        let postcode = postcode.into().trim().to_string();
        let area = area.into().trim().to_string();

        if postcode.is_empty() {
            return Err(SkipHireError::Location("postcode must not be empty".to_string()));
        }
        if area.is_empty() {
            return Err(SkipHireError::Location("area must not be empty".to_string()));
        }

        Ok(Self { postcode, area })
    }

    #[must_use]
    pub fn postcode(&self) -> &str {
        &self.postcode
    }

    #[must_use]
    pub fn area(&self) -> &str {
        &self.area
    }

    /// Stable string form used as the fetch cache key.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("skips/{}/{}", self.postcode, self.area)
    }
}

impl std::fmt::Display for LocationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.postcode, self.area)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Skip;

    /// A skip with neutral audit fields; tests override what they care about.
    pub fn skip(id: i64, size: u32, hire_period_days: u32, heavy: bool, road: bool) -> Skip {
        Skip {
            id,
            size,
            hire_period_days,
            transport_cost: None,
            per_tonne_cost: None,
            price_before_vat: 200.0,
            vat: 20.0,
            postcode: "NR32".to_string(),
            area: "Lowestoft".to_string(),
            forbidden: false,
            created_at: "2025-04-03T13:51:46.897146".to_string(),
            updated_at: "2025-04-07T13:16:52.813".to_string(),
            allowed_on_road: road,
            allows_heavy_waste: heavy,
        }
    }
}
