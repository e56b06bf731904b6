use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    db::propertydb::PropertyRecord,
    filter::{criterion, parse_price, PropertyFilter},
    models::agentmodel::AgentContact,
    models::propertymodel::{AreaUnit, ListingType, Property, PropertyCategory, PropertyType},
    utils::currency::{format_area, format_price},
};

// Query string of the public listing page, e.g.
// `/api/properties?listingType=rent&sector=Sector%20B&minPrice=50000`
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyQueryDto {
    pub listing_type: Option<String>,
    pub category: Option<String>,
    pub property_type: Option<String>,
    pub sector: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub search: Option<String>,
}

impl From<PropertyQueryDto> for PropertyFilter {
    fn from(query: PropertyQueryDto) -> Self {
        PropertyFilter {
            listing_type: criterion(query.listing_type.as_deref()),
            category: criterion(query.category.as_deref()),
            property_type: criterion(query.property_type.as_deref()),
            sector: criterion(query.sector.as_deref()),
            min_price: parse_price(query.min_price.as_deref()),
            max_price: parse_price(query.max_price.as_deref()),
            search: query
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AdminPropertyQueryDto {
    pub search: Option<String>,
}

/// Form numbers arrive either as JSON numbers or as the raw input text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    pub fn coerce(&self) -> Option<f64> {
        let value = match self {
            NumberInput::Number(n) => *n,
            NumberInput::Text(s) => s.trim().replace(',', "").parse::<f64>().ok()?,
        };
        (value.is_finite() && value >= 0.0).then_some(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadDto {
    #[validate(length(min = 1, message = "File name is required"))]
    pub file_name: String,
    /// Base64 payload, optionally as a `data:image/...;base64,` URL.
    #[validate(length(min = 1, message = "Image data is required"))]
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFormDto {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: NumberInput,
    pub listing_type: ListingType,
    pub category: PropertyCategory,
    pub property_type: PropertyType,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: NumberInput,
    pub area_unit: AreaUnit,
    pub sector_id: Option<i64>,
    pub street: Option<String>,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub ready_to_move: bool,
    #[serde(default)]
    pub is_featured: bool,
    pub agent_id: Option<i64>,
    // Stored image URLs to keep, in order. Omitted on an edit means the
    // current images stay as they are.
    pub existing_images: Option<Vec<String>>,
    #[validate]
    #[serde(default)]
    pub new_images: Vec<ImageUploadDto>,
}

impl PropertyFormDto {
    /// Checks the fields that the validator derive cannot, returning the
    /// coerced price and area.
    pub fn check(&self) -> Result<(f64, f64), String> {
        let price = self
            .price
            .coerce()
            .ok_or_else(|| "Price must be a non-negative number".to_string())?;
        let area = self
            .area
            .coerce()
            .ok_or_else(|| "Area must be a non-negative number".to_string())?;

        if self.property_type.category() != self.category {
            return Err(format!(
                "Property type '{}' is not valid for category '{}'",
                self.property_type, self.category
            ));
        }

        Ok((price, area))
    }

    /// Builds the persisted record. `images` are the final, ordered URLs.
    pub fn into_record(self, images: Vec<String>) -> Result<PropertyRecord, String> {
        let (price, area) = self.check()?;

        let residential = self.category == PropertyCategory::Residential;

        Ok(PropertyRecord {
            title: self.title.trim().to_string(),
            description: self.description,
            price: price.round() as i64,
            listing_type: self.listing_type.as_str().to_string(),
            category: self.category.as_str().to_string(),
            property_type: self.property_type.as_str().to_string(),
            bedrooms: self.bedrooms.filter(|_| residential),
            bathrooms: self.bathrooms.filter(|_| residential),
            area,
            area_unit: self.area_unit.as_str().to_string(),
            sector_id: self.sector_id,
            street: self.street.filter(|s| !s.trim().is_empty()),
            address: self.address.trim().to_string(),
            images,
            features: self
                .features
                .iter()
                .map(|f| f.trim())
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect(),
            ready_to_move: self.ready_to_move,
            is_featured: self.is_featured,
            agent_id: self.agent_id,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedDto {
    pub is_featured: bool,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementDto {
    pub property_title: Option<String>,
}

/// Listing as rendered on a property card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyCardDto {
    #[serde(flatten)]
    pub property: Property,
    pub formatted_price: String,
    pub formatted_area: String,
    pub display_images: Vec<String>,
    pub badge: String,
    pub type_label: String,
}

impl PropertyCardDto {
    pub fn from_property(property: Property) -> Self {
        let mut formatted_price = format_price(property.price);
        if property.listing_type == ListingType::Rent {
            formatted_price.push_str("/month");
        }

        PropertyCardDto {
            formatted_area: format_area(property.area, &property.area_unit),
            display_images: property.display_images(),
            badge: property.listing_type.badge().to_string(),
            type_label: property.property_type.label().to_string(),
            formatted_price,
            property,
        }
    }

    pub fn from_properties(properties: Vec<Property>) -> Vec<Self> {
        properties.into_iter().map(PropertyCardDto::from_property).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetailDto {
    #[serde(flatten)]
    pub card: PropertyCardDto,
    pub agent: AgentContact,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsDto {
    pub total: usize,
    pub for_sale: usize,
    pub for_rent: usize,
    pub residential: usize,
    pub commercial: usize,
    pub plots: usize,
    pub views: i64,
    pub call_clicks: i64,
    pub whatsapp_clicks: i64,
}

impl DashboardStatsDto {
    pub fn from_properties(properties: &[Property]) -> Self {
        DashboardStatsDto {
            total: properties.len(),
            for_sale: count_where(properties, |p| p.listing_type == ListingType::Buy),
            for_rent: count_where(properties, |p| p.listing_type == ListingType::Rent),
            residential: count_where(properties, |p| p.category == PropertyCategory::Residential),
            commercial: count_where(properties, |p| p.category == PropertyCategory::Commercial),
            plots: count_where(properties, |p| p.category == PropertyCategory::Plot),
            views: properties.iter().map(|p| p.views).sum(),
            call_clicks: properties.iter().map(|p| p.call_clicks).sum(),
            whatsapp_clicks: properties.iter().map(|p| p.whatsapp_clicks).sum(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub stats: DashboardStatsDto,
    pub recent: Vec<PropertyCardDto>,
}

fn count_where(properties: &[Property], pred: impl Fn(&Property) -> bool) -> usize {
    properties.iter().filter(|p| pred(p)).count()
}
