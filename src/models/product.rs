use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct};
use crate::domain::types::{ImageUrl, ProductCategory, ProductStatus, TypeConstraintError};

/// Diesel model representing the `products` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub user_id: i32,
    pub category: String,
    pub title: String,
    pub description: String,
    pub sell_price: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Product`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct {
    pub user_id: i32,
    pub category: String,
    pub title: String,
    pub description: String,
    pub sell_price: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Convert a stored row into the domain entity, attaching its image URLs.
    pub fn into_domain(
        self,
        images: Vec<ImageUrl>,
    ) -> Result<DomainProduct, TypeConstraintError> {
        Ok(DomainProduct {
            id: self.id.try_into()?,
            user_id: self.user_id.try_into()?,
            category: ProductCategory::try_from(self.category.as_str())?,
            title: self.title.try_into()?,
            description: self.description.try_into()?,
            sell_price: self.sell_price.try_into()?,
            status: ProductStatus::try_from(self.status.as_str())?,
            created_at: self.created_at,
            updated_at: self.updated_at,
            images,
        })
    }
}

impl From<DomainNewProduct> for NewProduct {
    fn from(product: DomainNewProduct) -> Self {
        Self {
            user_id: product.user_id.get(),
            category: product.category.as_str().to_string(),
            title: product.title.into_inner(),
            description: product.description.into_inner(),
            sell_price: product.sell_price.get(),
            status: product.status.as_str().to_string(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}
