use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::product::Product;
use crate::domain::types::UserId;

/// List row returned by the listing and search endpoints.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductSummary {
    pub id: i32,
    pub category: String,
    pub title: String,
    pub status: String,
    pub sell_price: i32,
    /// First stored image, used as the thumbnail.
    pub image_url: Option<String>,
}

impl From<Product> for ProductSummary {
    fn from(value: Product) -> Self {
        Self {
            id: value.id.get(),
            category: value.category.as_str().to_string(),
            title: value.title.into_inner(),
            status: value.status.as_str().to_string(),
            sell_price: value.sell_price.get(),
            image_url: value.images.first().map(|url| url.as_str().to_string()),
        }
    }
}

/// Full detail view; `is_owner` is computed against the requesting caller.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductDetail {
    pub id: i32,
    pub seller_id: i32,
    pub category: String,
    pub title: String,
    pub description: String,
    pub sell_price: i32,
    pub status: String,
    pub image_urls: Vec<String>,
    pub is_owner: bool,
    pub created_at: NaiveDateTime,
}

impl ProductDetail {
    pub fn from_product(product: Product, caller: UserId) -> Self {
        Self {
            id: product.id.get(),
            seller_id: product.user_id.get(),
            category: product.category.as_str().to_string(),
            title: product.title.into_inner(),
            description: product.description.into_inner(),
            sell_price: product.sell_price.get(),
            status: product.status.as_str().to_string(),
            image_urls: product
                .images
                .iter()
                .map(|url| url.as_str().to_string())
                .collect(),
            is_owner: product.user_id == caller,
            created_at: product.created_at,
        }
    }
}

/// Detail pre-filled for the owner's edit form.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductEditView {
    pub id: i32,
    pub category: String,
    pub title: String,
    pub description: String,
    pub sell_price: i32,
    pub image_urls: Vec<String>,
}

impl From<Product> for ProductEditView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.get(),
            category: product.category.as_str().to_string(),
            title: product.title.into_inner(),
            description: product.description.into_inner(),
            sell_price: product.sell_price.get(),
            image_urls: product
                .images
                .iter()
                .map(|url| url.as_str().to_string())
                .collect(),
        }
    }
}
