use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ImageUrl, ProductCategory, ProductDescription, ProductId, ProductStatus, ProductTitle,
    SellPrice, UserId,
};

/// A marketplace listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    /// Owning user. The user lifecycle is managed outside this service.
    pub user_id: UserId,
    pub category: ProductCategory,
    pub title: ProductTitle,
    pub description: ProductDescription,
    pub sell_price: SellPrice,
    pub status: ProductStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    /// Image URLs in display order.
    pub images: Vec<ImageUrl>,
}

/// Information required to create a new [`Product`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub user_id: UserId,
    pub category: ProductCategory,
    pub title: ProductTitle,
    pub description: ProductDescription,
    pub sell_price: SellPrice,
    pub status: ProductStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub images: Vec<ImageUrl>,
}

/// Field changes applied to an existing [`Product`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductUpdate {
    pub category: ProductCategory,
    pub title: ProductTitle,
    pub description: ProductDescription,
    pub sell_price: SellPrice,
    /// `Some` replaces the stored image set, `None` keeps it.
    pub images: Option<Vec<ImageUrl>>,
}
