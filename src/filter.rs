//! In-memory listing filter.
//!
//! Every supplied criterion must hold for a listing to be kept. Blank values
//! and the `"all"` sentinel impose no constraint, and the input order is
//! preserved.

use crate::models::propertymodel::Property;

/// Value the filter UI sends for "any".
pub const ALL_SENTINEL: &str = "all";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFilter {
    pub listing_type: Option<String>,
    pub category: Option<String>,
    pub property_type: Option<String>,
    pub sector: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub search: Option<String>,
}

/// Trims a raw criterion and drops blanks and the `"all"` sentinel.
pub fn criterion(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL_SENTINEL))
        .map(str::to_string)
}

/// Lenient price parse: thousands separators are allowed, anything that is
/// not a non-negative number is ignored.
pub fn parse_price(raw: Option<&str>) -> Option<i64> {
    let cleaned: String = raw?
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    let value = cleaned.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value.round() as i64)
    } else {
        None
    }
}

impl PropertyFilter {
    pub fn is_empty(&self) -> bool {
        *self == PropertyFilter::default()
    }

    pub fn matches(&self, property: &Property) -> bool {
        if let Some(listing_type) = &self.listing_type {
            if property.listing_type.as_str() != listing_type {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if property.category.as_str() != category {
                return false;
            }
        }
        if let Some(property_type) = &self.property_type {
            if property.property_type.as_str() != property_type {
                return false;
            }
        }
        if let Some(sector) = &self.sector {
            if &property.sector != sector {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if property.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if property.price > max {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            return property.title.to_lowercase().contains(&needle)
                || property.description.to_lowercase().contains(&needle)
                || property.address.to_lowercase().contains(&needle);
        }
        true
    }
}

pub fn filter_properties(properties: &[Property], filter: &PropertyFilter) -> Vec<Property> {
    properties
        .iter()
        .filter(|property| filter.matches(property))
        .cloned()
        .collect()
}
