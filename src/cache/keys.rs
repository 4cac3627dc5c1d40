//! Query keys.
//!
//! A key is a list of segments. Invalidating a key also invalidates every
//! key it is a prefix of, so `["orders"]` covers every order list.

use std::fmt;

use stockroom_client::model::{Id, ListParams, OrderFilter};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

impl<const N: usize> From<[&str; N]> for QueryKey {
    fn from(segments: [&str; N]) -> Self {
        Self::new(segments)
    }
}

// Orders

pub fn orders() -> QueryKey {
    QueryKey::from(["orders"])
}

pub fn orders_list(filter: &OrderFilter) -> QueryKey {
    orders().child("list").child(filter.cache_segment())
}

pub fn order(id: Id) -> QueryKey {
    QueryKey::new(["order".to_string(), id.to_string()])
}

pub fn order_notes(id: Id) -> QueryKey {
    order(id).child("notes")
}

// Products

pub fn products() -> QueryKey {
    QueryKey::from(["products"])
}

pub fn products_list(params: &ListParams) -> QueryKey {
    products().child("list").child(params.cache_segment())
}

/// Prefix of every single-product key.
pub fn product_root() -> QueryKey {
    QueryKey::from(["product"])
}

pub fn product(id: Id) -> QueryKey {
    product_root().child(id.to_string())
}

pub fn product_variants(id: Id) -> QueryKey {
    product(id).child("variants")
}

// Catalog taxonomies, keyed by resource name ("category", "brand", "attribute").

pub fn catalog(name: &str) -> QueryKey {
    QueryKey::new([name])
}

pub fn catalog_list(name: &str, params: &ListParams) -> QueryKey {
    catalog(name).child("list").child(params.cache_segment())
}

pub fn catalog_item(name: &str, id: Id) -> QueryKey {
    catalog(name).child(id.to_string())
}

// Customers

pub fn customers() -> QueryKey {
    QueryKey::from(["customers"])
}

pub fn customers_list(params: &ListParams) -> QueryKey {
    customers().child("list").child(params.cache_segment())
}

pub fn customer(id: Id) -> QueryKey {
    QueryKey::new(["customer".to_string(), id.to_string()])
}
