use diesel::prelude::*;

use crate::models::product::Product;

/// Diesel model representing the `product_images` table.
#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Product))]
#[diesel(table_name = crate::schema::product_images)]
pub struct ProductImage {
    pub id: i32,
    pub product_id: i32,
    pub url: String,
    /// 0-based display order, matching upload order.
    pub position: i32,
}

/// Insertable form of [`ProductImage`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::product_images)]
pub struct NewProductImage {
    pub product_id: i32,
    pub url: String,
    pub position: i32,
}
