//! Turns a listing filter into equality constraints on the `properties`
//! read.
//!
//! Field names are translated to their storage columns here and nowhere
//! else. Price bounds and text search are not pushed to the store; they are
//! applied over the mapped rows by [`crate::filter::filter_properties`].

use sqlx::{Postgres, QueryBuilder};

use crate::filter::{PropertyFilter, ALL_SENTINEL};

/// Rows shown in the homepage featured section.
pub const FEATURED_LIMIT: i64 = 6;
/// Sectors listed in the site footer.
pub const FOOTER_SECTOR_LIMIT: i64 = 6;

pub const PROPERTY_SELECT: &str = r#"
    SELECT
        p.id, p.uuid, p.title, p.description, p.price,
        p.listing_type, p.category, p.property_type,
        p.bedrooms, p.bathrooms, p.area, p.area_unit, p.unit,
        p.sector_id, s.name AS sector, p.street, p.address,
        p.images, p.features, p.ready_to_move, p.is_featured,
        p.views, p.call_clicks, p.whatsapp_clicks, p.agent_id,
        p.created_at, p.updated_at
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    ListingType,
    Category,
    PropertyType,
    Sector,
    IsFeatured,
}

impl FilterField {
    pub fn column(&self) -> &'static str {
        match self {
            FilterField::ListingType => "p.listing_type",
            FilterField::Category => "p.category",
            FilterField::PropertyType => "p.property_type",
            // sectors are joined by id and matched by their current name
            FilterField::Sector => "s.name",
            FilterField::IsFeatured => "p.is_featured",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintValue {
    Text(String),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EqConstraint {
    pub field: FilterField,
    pub value: ConstraintValue,
}

impl EqConstraint {
    pub fn text(field: FilterField, value: impl Into<String>) -> Self {
        EqConstraint {
            field,
            value: ConstraintValue::Text(value.into()),
        }
    }

    pub fn flag(field: FilterField, value: bool) -> Self {
        EqConstraint {
            field,
            value: ConstraintValue::Bool(value),
        }
    }

    pub fn column(&self) -> &'static str {
        self.field.column()
    }
}

/// Equality constraints for a normalized filter, in a stable order.
pub fn build_constraints(filter: &PropertyFilter) -> Vec<EqConstraint> {
    let candidates = [
        (FilterField::ListingType, &filter.listing_type),
        (FilterField::Category, &filter.category),
        (FilterField::PropertyType, &filter.property_type),
        (FilterField::Sector, &filter.sector),
    ];

    candidates
        .into_iter()
        .filter_map(|(field, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL_SENTINEL))
                .map(|v| EqConstraint::text(field, v))
        })
        .collect()
}

pub fn featured_constraints() -> Vec<EqConstraint> {
    vec![EqConstraint::flag(FilterField::IsFeatured, true)]
}

/// Appends `WHERE a = $1 AND b = $2 ...`, binding every value.
pub fn push_constraints(builder: &mut QueryBuilder<'_, Postgres>, constraints: &[EqConstraint]) {
    for (i, constraint) in constraints.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        builder.push(constraint.column());
        builder.push(" = ");
        match &constraint.value {
            ConstraintValue::Text(value) => builder.push_bind(value.clone()),
            ConstraintValue::Bool(value) => builder.push_bind(*value),
        };
    }
}

/// Full listing read: select, constraints, newest first, optional limit.
pub fn property_listing_query<'a>(
    constraints: &[EqConstraint],
    limit: Option<i64>,
) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(PROPERTY_SELECT);
    builder.push(" FROM properties p LEFT JOIN sectors s ON s.id = p.sector_id");
    push_constraints(&mut builder, constraints);
    builder.push(" ORDER BY p.created_at DESC");
    if let Some(limit) = limit {
        builder.push(" LIMIT ");
        builder.push_bind(limit);
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(sql: &str) -> String {
        sql.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn translates_ui_fields_to_columns_in_order() {
        let filter = PropertyFilter {
            listing_type: Some("rent".to_string()),
            category: Some("residential".to_string()),
            property_type: Some("apartment".to_string()),
            sector: Some("Sector B".to_string()),
            ..Default::default()
        };
        let columns: Vec<_> = build_constraints(&filter).iter().map(|c| c.column()).collect();
        assert_eq!(
            columns,
            vec!["p.listing_type", "p.category", "p.property_type", "s.name"]
        );
    }

    #[test]
    fn all_sentinel_yields_no_constraint() {
        let with_sentinel = PropertyFilter {
            category: Some("all".to_string()),
            property_type: Some("all".to_string()),
            sector: Some("all".to_string()),
            ..Default::default()
        };
        assert_eq!(build_constraints(&with_sentinel), build_constraints(&PropertyFilter::default()));
        assert!(build_constraints(&with_sentinel).is_empty());
    }

    #[test]
    fn price_and_search_stay_out_of_the_store_query() {
        let filter = PropertyFilter {
            min_price: Some(1),
            max_price: Some(2),
            search: Some("villa".to_string()),
            ..Default::default()
        };
        assert!(build_constraints(&filter).is_empty());
    }

    #[test]
    fn builds_conjunctive_sql_with_binds() {
        let constraints = vec![
            EqConstraint::text(FilterField::ListingType, "buy"),
            EqConstraint::text(FilterField::Sector, "Sector A"),
        ];
        let builder = property_listing_query(&constraints, None);
        let sql = normalize(builder.sql());
        assert!(sql.ends_with(
            "FROM properties p LEFT JOIN sectors s ON s.id = p.sector_id \
             WHERE p.listing_type = $1 AND s.name = $2 ORDER BY p.created_at DESC"
        ));
        assert!(!sql.contains("Sector A"));
    }

    #[test]
    fn featured_read_is_limited() {
        let builder = property_listing_query(&featured_constraints(), Some(FEATURED_LIMIT));
        let sql = normalize(builder.sql());
        assert!(sql.ends_with("WHERE p.is_featured = $1 ORDER BY p.created_at DESC LIMIT $2"));
    }
}
