//! Translates optional browse parameters into a store [`Filter`].

use crate::store::{Filter, Predicate};

pub const LOCATION_FIELD: &str = "location";
pub const PROPERTY_TYPE_FIELD: &str = "property_type";
pub const PRICE_FIELD: &str = "price_in_inr";

/// Browse constraints supplied by a caller. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyQuery {
    pub location: Option<String>,
    pub property_type: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

impl PropertyQuery {
    pub fn filter(&self) -> Filter {
        build_filter(self)
    }
}

/// Emits one clause per supplied input. Blank text counts as not supplied.
pub fn build_filter(query: &PropertyQuery) -> Filter {
    let mut filter = Filter::new();

    if let Some(location) = supplied(query.location.as_deref()) {
        filter = filter.with(LOCATION_FIELD, Predicate::substring(location));
    }

    if let Some(property_type) = supplied(query.property_type.as_deref()) {
        filter = filter.with(PROPERTY_TYPE_FIELD, Predicate::exact(property_type));
    }

    if let Some(range) = Predicate::range(query.min_price, query.max_price) {
        filter = filter.with(PRICE_FIELD, range);
    }

    filter
}

fn supplied(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}
