use crate::db::{DbConnection, DbPool};
use crate::domain::product::{NewProduct, Product, ProductUpdate};
use crate::domain::types::{ProductCategory, ProductId};
use crate::pagination::Pagination;
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod product;
#[cfg(test)]
pub mod test;

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Query parameters used when listing or searching products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Restrict to products of one category.
    pub category: Option<ProductCategory>,
    /// Keyword matched against title and description.
    pub search: Option<String>,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    pub fn category(mut self, category: ProductCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Read-only operations for product entities.
pub trait ProductReader {
    /// List products matching the supplied query parameters, newest first.
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    /// Keyword search over title and description, newest first.
    fn search_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    /// Retrieve a product by its identifier.
    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>>;
}

/// Write operations for product entities and their image rows.
pub trait ProductWriter {
    /// Persist a new product together with its image rows.
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product>;
    /// Apply field changes to a product; returns the number of affected rows.
    fn update_product(&self, id: ProductId, update: &ProductUpdate) -> RepositoryResult<usize>;
    /// Delete a product and its image rows; returns the number of deleted products.
    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize>;
}
