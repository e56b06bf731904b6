use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{types::Json, FromRow};
use thiserror::Error;
use uuid::Uuid;

/// Image shown when a listing has no uploaded photos.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

#[derive(Debug, Error, Clone, PartialEq)]
#[error("unknown {kind} '{value}'")]
pub struct ParseKindError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseKindError {
    fn new(kind: &'static str, value: &str) -> Self {
        ParseKindError {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Buy,
    Rent,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Buy => "buy",
            ListingType::Rent => "rent",
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            ListingType::Buy => "For Sale",
            ListingType::Rent => "For Rent",
        }
    }
}

impl FromStr for ListingType {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(ListingType::Buy),
            "rent" => Ok(ListingType::Rent),
            other => Err(ParseKindError::new("listing type", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PropertyCategory {
    Residential,
    Commercial,
    Plot,
}

impl PropertyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyCategory::Residential => "residential",
            PropertyCategory::Commercial => "commercial",
            PropertyCategory::Plot => "plot",
        }
    }
}

impl FromStr for PropertyCategory {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "residential" => Ok(PropertyCategory::Residential),
            "commercial" => Ok(PropertyCategory::Commercial),
            "plot" => Ok(PropertyCategory::Plot),
            other => Err(ParseKindError::new("category", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    House,
    Apartment,
    Portion,
    Shop,
    Office,
    Warehouse,
    ResidentialPlot,
    CommercialPlot,
}

impl PropertyType {
    pub const ALL: [PropertyType; 8] = [
        PropertyType::House,
        PropertyType::Apartment,
        PropertyType::Portion,
        PropertyType::Shop,
        PropertyType::Office,
        PropertyType::Warehouse,
        PropertyType::ResidentialPlot,
        PropertyType::CommercialPlot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "house",
            PropertyType::Apartment => "apartment",
            PropertyType::Portion => "portion",
            PropertyType::Shop => "shop",
            PropertyType::Office => "office",
            PropertyType::Warehouse => "warehouse",
            PropertyType::ResidentialPlot => "residential-plot",
            PropertyType::CommercialPlot => "commercial-plot",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::House => "House",
            PropertyType::Apartment => "Apartment",
            PropertyType::Portion => "Portion",
            PropertyType::Shop => "Shop",
            PropertyType::Office => "Office",
            PropertyType::Warehouse => "Warehouse",
            PropertyType::ResidentialPlot => "Residential Plot",
            PropertyType::CommercialPlot => "Commercial Plot",
        }
    }

    /// The only category this type may be listed under.
    pub fn category(&self) -> PropertyCategory {
        match self {
            PropertyType::House | PropertyType::Apartment | PropertyType::Portion => {
                PropertyCategory::Residential
            }
            PropertyType::Shop | PropertyType::Office | PropertyType::Warehouse => {
                PropertyCategory::Commercial
            }
            PropertyType::ResidentialPlot | PropertyType::CommercialPlot => PropertyCategory::Plot,
        }
    }

    pub fn for_category(category: PropertyCategory) -> Vec<PropertyType> {
        PropertyType::ALL
            .into_iter()
            .filter(|t| t.category() == category)
            .collect()
    }
}

impl FromStr for PropertyType {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseKindError::new("property type", s))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AreaUnit {
    Marla,
    Kanal,
    Sqft,
}

impl AreaUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaUnit::Marla => "marla",
            AreaUnit::Kanal => "kanal",
            AreaUnit::Sqft => "sqft",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PropertyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-listing engagement tallies, each backed by its own store procedure.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Counter {
    View,
    Call,
    Whatsapp,
}

impl Counter {
    pub fn procedure(&self) -> &'static str {
        match self {
            Counter::View => "increment_view",
            Counter::Call => "increment_call",
            Counter::Whatsapp => "increment_whatsapp",
        }
    }

    pub fn event_name(&self) -> &'static str {
        match self {
            Counter::View => "property_view",
            Counter::Call => "click_call",
            Counter::Whatsapp => "click_whatsapp",
        }
    }
}

// Raw `properties` row joined with its sector name. Every column that the
// store may leave null is optional here; `Property::try_from` decides the
// defaults.
#[derive(Debug, Clone, FromRow)]
pub struct PropertyRow {
    pub id: i64,
    pub uuid: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub listing_type: String,
    pub category: String,
    pub property_type: String,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: Option<f64>,
    pub area_unit: Option<String>,
    pub unit: Option<String>,
    pub sector_id: Option<i64>,
    pub sector: Option<String>,
    pub street: Option<String>,
    pub address: Option<String>,
    pub images: Option<Json<Value>>,
    pub features: Option<Json<Value>>,
    pub ready_to_move: Option<bool>,
    pub is_featured: Option<bool>,
    pub views: Option<i64>,
    pub call_clicks: Option<i64>,
    pub whatsapp_clicks: Option<i64>,
    pub agent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A listing in the shape the browsing surface and admin forms consume.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: i64,
    pub uuid: Uuid,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub listing_type: ListingType,
    pub category: PropertyCategory,
    pub property_type: PropertyType,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: f64,
    pub area_unit: String,
    pub sector_id: Option<i64>,
    pub sector: String,
    pub street: Option<String>,
    pub address: String,
    pub images: Vec<String>,
    pub features: Vec<String>,
    pub ready_to_move: bool,
    pub is_featured: bool,
    pub views: i64,
    pub call_clicks: i64,
    pub whatsapp_clicks: i64,
    pub agent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// Images to render; an empty gallery yields exactly one placeholder.
    pub fn display_images(&self) -> Vec<String> {
        if self.images.is_empty() {
            vec![PLACEHOLDER_IMAGE.to_string()]
        } else {
            self.images.clone()
        }
    }
}

/// Keeps the string entries of a JSON array; anything else becomes `[]`.
pub fn string_array(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<PropertyRow> for Property {
    type Error = ParseKindError;

    fn try_from(row: PropertyRow) -> Result<Self, Self::Error> {
        let listing_type = row.listing_type.parse::<ListingType>()?;
        let category = row.category.parse::<PropertyCategory>()?;
        let property_type = row.property_type.parse::<PropertyType>()?;

        let area_unit = non_empty(row.area_unit)
            .or_else(|| non_empty(row.unit))
            .unwrap_or_default();

        Ok(Property {
            id: row.id,
            uuid: row.uuid,
            title: row.title,
            description: row.description.unwrap_or_default(),
            price: row.price.unwrap_or(0),
            listing_type,
            category,
            property_type,
            bedrooms: row.bedrooms,
            bathrooms: row.bathrooms,
            area: row.area.unwrap_or(0.0),
            area_unit,
            sector_id: row.sector_id,
            sector: row.sector.unwrap_or_default(),
            street: row.street,
            address: row.address.unwrap_or_default(),
            images: string_array(row.images.as_ref().map(|j| &j.0)),
            features: string_array(row.features.as_ref().map(|j| &j.0)),
            ready_to_move: row.ready_to_move.unwrap_or(false),
            is_featured: row.is_featured.unwrap_or(false),
            views: row.views.unwrap_or(0),
            call_clicks: row.call_clicks.unwrap_or(0),
            whatsapp_clicks: row.whatsapp_clicks.unwrap_or(0),
            agent_id: row.agent_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<Property> for PropertyRow {
    fn from(property: Property) -> Self {
        PropertyRow {
            id: property.id,
            uuid: property.uuid,
            title: property.title,
            description: Some(property.description),
            price: Some(property.price),
            listing_type: property.listing_type.as_str().to_string(),
            category: property.category.as_str().to_string(),
            property_type: property.property_type.as_str().to_string(),
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
            area: Some(property.area),
            area_unit: Some(property.area_unit),
            unit: None,
            sector_id: property.sector_id,
            sector: Some(property.sector),
            street: property.street,
            address: Some(property.address),
            images: Some(Json(Value::from(property.images))),
            features: Some(Json(Value::from(property.features))),
            ready_to_move: Some(property.ready_to_move),
            is_featured: Some(property.is_featured),
            views: Some(property.views),
            call_clicks: Some(property.call_clicks),
            whatsapp_clicks: Some(property.whatsapp_clicks),
            agent_id: property.agent_id,
            created_at: property.created_at,
            updated_at: property.updated_at,
        }
    }
}

/// Maps rows for the public surface, dropping (and logging) any row whose
/// enum columns hold values this service does not know.
pub fn map_rows(rows: Vec<PropertyRow>) -> Vec<Property> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            match Property::try_from(row) {
                Ok(property) => Some(property),
                Err(e) => {
                    tracing::warn!("Skipping property {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    pub(crate) fn sample_row() -> PropertyRow {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        PropertyRow {
            id: 1,
            uuid: Uuid::nil(),
            title: "Beautiful 5 Marla House in Sector A".to_string(),
            description: Some("Modern house with a lawn".to_string()),
            price: Some(18_500_000),
            listing_type: "buy".to_string(),
            category: "residential".to_string(),
            property_type: "house".to_string(),
            bedrooms: Some(4),
            bathrooms: Some(3),
            area: Some(5.0),
            area_unit: Some("marla".to_string()),
            unit: None,
            sector_id: Some(1),
            sector: Some("Sector A".to_string()),
            street: Some("Street 12".to_string()),
            address: Some("House #45, Street 12, Sector A".to_string()),
            images: Some(Json(json!(["https://cdn.example/a.jpg"]))),
            features: Some(Json(json!(["Lawn", "Garage"]))),
            ready_to_move: Some(true),
            is_featured: Some(false),
            views: Some(10),
            call_clicks: Some(2),
            whatsapp_clicks: Some(1),
            agent_id: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn maps_snake_case_row() {
        let property = Property::try_from(sample_row()).unwrap();
        assert_eq!(property.listing_type, ListingType::Buy);
        assert_eq!(property.property_type, PropertyType::House);
        assert_eq!(property.area_unit, "marla");
        assert!(property.ready_to_move);
        assert_eq!(property.features, vec!["Lawn", "Garage"]);
    }

    #[test]
    fn area_unit_falls_back_to_legacy_column() {
        let mut row = sample_row();
        row.area_unit = None;
        row.unit = Some("kanal".to_string());
        assert_eq!(Property::try_from(row).unwrap().area_unit, "kanal");

        let mut row = sample_row();
        row.area_unit = Some(String::new());
        row.unit = None;
        assert_eq!(Property::try_from(row).unwrap().area_unit, "");
    }

    #[test]
    fn null_or_malformed_arrays_become_empty() {
        let mut row = sample_row();
        row.images = None;
        row.features = Some(Json(json!("Lawn")));
        let property = Property::try_from(row).unwrap();
        assert!(property.images.is_empty());
        assert!(property.features.is_empty());
    }

    #[test]
    fn empty_gallery_renders_one_placeholder() {
        let mut row = sample_row();
        row.images = Some(Json(json!([])));
        let property = Property::try_from(row).unwrap();
        assert_eq!(property.display_images(), vec![PLACEHOLDER_IMAGE.to_string()]);
    }

    #[test]
    fn remapping_is_a_no_op() {
        let once = Property::try_from(sample_row()).unwrap();
        let twice = Property::try_from(PropertyRow::from(once.clone())).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn unknown_enum_text_is_rejected() {
        let mut row = sample_row();
        row.property_type = "castle".to_string();
        let err = Property::try_from(row).unwrap_err();
        assert_eq!(err.kind, "property type");

        let mut bad = sample_row();
        bad.listing_type = "lease".to_string();
        assert!(map_rows(vec![bad, sample_row()]).len() == 1);
    }

    #[test]
    fn property_types_belong_to_one_category() {
        assert_eq!(
            PropertyType::for_category(PropertyCategory::Plot),
            vec![PropertyType::ResidentialPlot, PropertyType::CommercialPlot]
        );
        assert_eq!(
            "commercial-plot".parse::<PropertyType>().unwrap().category(),
            PropertyCategory::Plot
        );
    }

    #[test]
    fn serializes_in_camel_case() {
        let property = Property::try_from(sample_row()).unwrap();
        let value = serde_json::to_value(&property).unwrap();
        assert_eq!(value["listingType"], "buy");
        assert_eq!(value["propertyType"], "house");
        assert_eq!(value["readyToMove"], true);
        assert!(value.get("listing_type").is_none());
    }
}
