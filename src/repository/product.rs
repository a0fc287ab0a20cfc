use diesel::prelude::*;

use crate::db::DbConnection;
use crate::domain::product::{NewProduct, Product, ProductUpdate};
use crate::domain::types::{ImageUrl, ProductId};
use crate::models::product::{NewProduct as DbNewProduct, Product as DbProduct};
use crate::models::product_image::{NewProductImage as DbNewProductImage, ProductImage as DbProductImage};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, ProductListQuery, ProductReader, ProductWriter};

fn image_rows(product_id: i32, images: &[ImageUrl]) -> Vec<DbNewProductImage> {
    images
        .iter()
        .enumerate()
        .map(|(position, url)| DbNewProductImage {
            product_id,
            url: url.as_str().to_string(),
            position: position as i32,
        })
        .collect()
}

/// Attach image URLs to loaded rows, preserving display order.
fn with_images(conn: &mut DbConnection, rows: Vec<DbProduct>) -> RepositoryResult<Vec<Product>> {
    use crate::schema::product_images;

    let grouped = DbProductImage::belonging_to(&rows)
        .order(product_images::position.asc())
        .load::<DbProductImage>(conn)?
        .grouped_by(&rows);

    rows.into_iter()
        .zip(grouped)
        .map(|(row, images)| {
            let urls = images
                .into_iter()
                .map(|image| ImageUrl::new(image.url))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(row.into_domain(urls)?)
        })
        .collect()
}

impl ProductReader for DieselRepository {
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = products::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(category) = query.category {
                items = items.filter(products::category.eq(category.as_str()));
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();

        // Apply pagination if requested
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let rows = items
            .order(products::id.desc())
            .load::<DbProduct>(&mut conn)?;

        Ok((total, with_images(&mut conn, rows)?))
    }

    fn search_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let pattern = query
            .search
            .as_deref()
            .map(|search| format!("%{}%", search.trim()));

        let query_builder = || {
            let mut items = products::table.into_boxed::<diesel::sqlite::Sqlite>();

            if let Some(category) = query.category {
                items = items.filter(products::category.eq(category.as_str()));
            }

            if let Some(pattern) = pattern.clone() {
                items = items.filter(
                    products::title
                        .like(pattern.clone())
                        .or(products::description.like(pattern)),
                );
            }

            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder();
        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let rows = items
            .order(products::id.desc())
            .load::<DbProduct>(&mut conn)?;

        Ok((total, with_images(&mut conn, rows)?))
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        use crate::schema::{product_images, products};

        let mut conn = self.conn()?;

        let row = products::table
            .filter(products::id.eq(id.get()))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        let urls = product_images::table
            .filter(product_images::product_id.eq(row.id))
            .order(product_images::position.asc())
            .load::<DbProductImage>(&mut conn)?
            .into_iter()
            .map(|image| ImageUrl::new(image.url))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(row.into_domain(urls)?))
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        use crate::schema::{product_images, products};

        let mut conn = self.conn()?;
        let db_product: DbNewProduct = product.clone().into();

        let created = conn.transaction::<DbProduct, diesel::result::Error, _>(|conn| {
            let created: DbProduct = diesel::insert_into(products::table)
                .values(&db_product)
                .get_result(conn)?;

            let rows = image_rows(created.id, &product.images);
            if !rows.is_empty() {
                diesel::insert_into(product_images::table)
                    .values(&rows)
                    .execute(conn)?;
            }

            Ok(created)
        })?;

        Ok(created.into_domain(product.images.clone())?)
    }

    fn update_product(&self, id: ProductId, update: &ProductUpdate) -> RepositoryResult<usize> {
        use crate::schema::{product_images, products};

        let mut conn = self.conn()?;

        let affected = conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            let affected =
                diesel::update(products::table.filter(products::id.eq(id.get())))
                    .set((
                        products::category.eq(update.category.as_str()),
                        products::title.eq(update.title.as_str()),
                        products::description.eq(update.description.as_str()),
                        products::sell_price.eq(update.sell_price.get()),
                        products::updated_at.eq(diesel::dsl::now),
                    ))
                    .execute(conn)?;

            if affected == 0 {
                return Ok(0);
            }

            if let Some(images) = &update.images {
                diesel::delete(
                    product_images::table.filter(product_images::product_id.eq(id.get())),
                )
                .execute(conn)?;

                let rows = image_rows(id.get(), images);
                if !rows.is_empty() {
                    diesel::insert_into(product_images::table)
                        .values(&rows)
                        .execute(conn)?;
                }
            }

            Ok(affected)
        })?;

        Ok(affected)
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize> {
        use crate::schema::{product_images, products};

        let mut conn = self.conn()?;

        let affected = conn.transaction::<usize, diesel::result::Error, _>(|conn| {
            diesel::delete(product_images::table.filter(product_images::product_id.eq(id.get())))
                .execute(conn)?;

            diesel::delete(products::table.filter(products::id.eq(id.get()))).execute(conn)
        })?;

        Ok(affected)
    }
}
