use std::sync::Mutex;

use crate::domain::product::{NewProduct, Product, ProductUpdate};
use crate::domain::types::ProductId;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{ProductListQuery, ProductReader, ProductWriter};

/// Simple in-memory repository used for unit tests.
pub struct TestRepository {
    products: Mutex<Vec<Product>>,
    next_id: Mutex<i32>,
    fail_writes: bool,
}

impl Default for TestRepository {
    fn default() -> Self {
        Self::new(vec![])
    }
}

impl TestRepository {
    pub fn new(products: Vec<Product>) -> Self {
        let next_id = products.iter().map(|p| p.id.get()).max().unwrap_or(0) + 1;
        Self {
            products: Mutex::new(products),
            next_id: Mutex::new(next_id),
            fail_writes: false,
        }
    }

    /// A repository whose write operations always fail.
    pub fn failing() -> Self {
        Self {
            products: Mutex::new(vec![]),
            next_id: Mutex::new(1),
            fail_writes: true,
        }
    }

    fn filtered(&self, query: &ProductListQuery, with_search: bool) -> (usize, Vec<Product>) {
        let mut items: Vec<Product> = self.products.lock().unwrap().clone();

        if let Some(category) = query.category {
            items.retain(|p| p.category == category);
        }

        if with_search {
            if let Some(search) = &query.search {
                let search = search.to_lowercase();
                items.retain(|p| {
                    p.title.to_lowercase().contains(&search)
                        || p.description.to_lowercase().contains(&search)
                });
            }
        }

        items.sort_by(|a, b| b.id.cmp(&a.id));
        let total = items.len();

        if let Some(pagination) = &query.pagination {
            let start = (pagination.page.max(1) - 1) * pagination.per_page;
            items = items
                .into_iter()
                .skip(start)
                .take(pagination.per_page)
                .collect();
        }

        (total, items)
    }
}

impl ProductReader for TestRepository {
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        Ok(self.filtered(&query, false))
    }

    fn search_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)> {
        Ok(self.filtered(&query, true))
    }

    fn get_product_by_id(&self, id: ProductId) -> RepositoryResult<Option<Product>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }
}

impl ProductWriter for TestRepository {
    fn create_product(&self, product: &NewProduct) -> RepositoryResult<Product> {
        if self.fail_writes {
            return Err(RepositoryError::Validation("write failure injected".into()));
        }

        let mut next_id = self.next_id.lock().unwrap();
        let id = ProductId::new(*next_id).expect("test ids start at 1");
        *next_id += 1;

        let created = Product {
            id,
            user_id: product.user_id,
            category: product.category,
            title: product.title.clone(),
            description: product.description.clone(),
            sell_price: product.sell_price,
            status: product.status,
            created_at: product.created_at,
            updated_at: product.updated_at,
            images: product.images.clone(),
        };

        self.products.lock().unwrap().push(created.clone());
        Ok(created)
    }

    fn update_product(&self, id: ProductId, update: &ProductUpdate) -> RepositoryResult<usize> {
        if self.fail_writes {
            return Err(RepositoryError::Validation("write failure injected".into()));
        }

        let mut products = self.products.lock().unwrap();
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(0);
        };

        product.category = update.category;
        product.title = update.title.clone();
        product.description = update.description.clone();
        product.sell_price = update.sell_price;
        if let Some(images) = &update.images {
            product.images = images.clone();
        }

        Ok(1)
    }

    fn delete_product(&self, id: ProductId) -> RepositoryResult<usize> {
        if self.fail_writes {
            return Err(RepositoryError::Validation("write failure injected".into()));
        }

        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(before - products.len())
    }
}
