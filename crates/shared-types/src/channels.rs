//! # Channel Routes
//!
//! Channel naming is a caller/responder contract: one channel per logical
//! request type plus a matching reply channel, distinct per consumer when
//! several services share a responder so replies route back to the right
//! caller. All well-known routes live here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A broker channel name (opaque, addressable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelName(String);

impl ChannelName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChannelName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Identifies the issuing service in message headers, for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceTag {
    Catalog,
    Media,
    Orders,
    Identity,
}

impl ServiceTag {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceTag::Catalog => "catalog",
            ServiceTag::Media => "media",
            ServiceTag::Orders => "orders",
            ServiceTag::Identity => "identity",
        }
    }
}

impl fmt::Display for ServiceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request channel paired with the reply channel answers come back on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    pub request: ChannelName,
    pub reply: ChannelName,
}

impl Route {
    pub fn new(request: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            request: ChannelName::new(request),
            reply: ChannelName::new(reply),
        }
    }
}

/// Credential validation route for one caller service. Each caller gets its
/// own request/reply pair so the identity service's shared handler answers
/// on the right channel.
#[must_use]
pub fn auth_route(caller: ServiceTag) -> Route {
    Route::new(
        format!("auth-request-{caller}"),
        format!("auth-response-{caller}"),
    )
}

/// Media service asks the catalog for a single product (ownership checks).
#[must_use]
pub fn get_product_route() -> Route {
    Route::new("get-product-request", "get-product-reply-media")
}

/// Order service asks the catalog for a batch of products.
#[must_use]
pub fn get_products_route() -> Route {
    Route::new("get-products-request", "get-products-reply-orders")
}

/// Order service asks the catalog to decrement stock.
#[must_use]
pub fn adjust_stock_route() -> Route {
    Route::new("adjust-stock-request", "adjust-stock-reply-orders")
}

/// Catalog asks the media service to delete media for a set of products.
#[must_use]
pub fn delete_media_route() -> Route {
    Route::new("delete-media-for-products", "delete-media-reply-catalog")
}
