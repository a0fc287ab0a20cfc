use chrono::Utc;
use serde::Deserialize;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::product::{NewProduct, Product, ProductUpdate};
use crate::domain::types::{ImageUrl, ProductCategory, ProductId, ProductStatus, UserId};
use crate::dto::products::{ProductDetail, ProductEditView, ProductSummary};
use crate::forms::products::{CreateProductPayload, UpdateProductPayload};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ProductListQuery, ProductReader, ProductWriter};
use crate::storage::{ImageStore, UploadedImage};

use super::{ServiceError, ServiceResult};

/// Query parameters accepted by the search endpoint.
#[derive(Deserialize, Debug)]
pub struct ProductSearchParams {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    pub category: String,
    pub keyword: String,
}

/// Query parameters accepted by the category listing endpoint.
#[derive(Deserialize, Debug)]
pub struct CategoryListParams {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    pub category: String,
}

/// Query parameters accepted by the full listing endpoint.
#[derive(Deserialize, Debug, Default)]
pub struct ProductListParams {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

fn caller_id(user: &AuthenticatedUser) -> ServiceResult<UserId> {
    let parsed = match user.sub.parse::<i32>() {
        Ok(value) => value,
        Err(_) => {
            log::error!("Invalid subject claim in user context: {}", user.sub);
            return Err(ServiceError::Unauthorized);
        }
    };

    match UserId::new(parsed) {
        Ok(user_id) => Ok(user_id),
        Err(e) => {
            log::error!("Invalid user id in user context: {e}");
            Err(ServiceError::Unauthorized)
        }
    }
}

/// Store every upload, unwinding the ones already written on failure.
fn store_images<S>(images: &[UploadedImage], store: &S) -> ServiceResult<Vec<ImageUrl>>
where
    S: ImageStore + ?Sized,
{
    let mut stored = Vec::with_capacity(images.len());

    for image in images {
        match store.store(image) {
            Ok(url) => stored.push(url),
            Err(e) => {
                log::error!("Failed to store uploaded image: {e}");
                discard_images(store, &stored);
                return Err(ServiceError::Internal);
            }
        }
    }

    Ok(stored)
}

/// Best-effort removal of stored files; failures are logged, not surfaced.
fn discard_images<S>(store: &S, urls: &[ImageUrl])
where
    S: ImageStore + ?Sized,
{
    for url in urls {
        if let Err(e) = store.remove(url) {
            log::error!("Failed to remove stored image {url}: {e}");
        }
    }
}

/// Fetch a product and verify the caller owns it.
fn owned_product<R>(
    product_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Product>
where
    R: ProductReader,
{
    let caller = caller_id(user)?;

    let product_id = match ProductId::new(product_id) {
        Ok(product_id) => product_id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    let product = match repo.get_product_by_id(product_id) {
        Ok(Some(product)) => product,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if product.user_id != caller {
        return Err(ServiceError::Forbidden);
    }

    Ok(product)
}

/// Core business logic for product creation.
///
/// Stores the uploaded images first, then persists the product record and its
/// image rows in one transaction. If the record insert fails, the already
/// stored files are removed so no orphans remain. New products always start
/// in the `SELL` status.
pub fn create_product<R, S>(
    payload: CreateProductPayload,
    user: &AuthenticatedUser,
    repo: &R,
    store: &S,
) -> ServiceResult<ProductId>
where
    R: ProductWriter,
    S: ImageStore,
{
    let user_id = caller_id(user)?;
    let CreateProductPayload {
        title,
        category,
        description,
        sell_price,
        images,
    } = payload;

    let stored = store_images(&images, store)?;

    let now = Utc::now().naive_utc();
    let new_product = NewProduct {
        user_id,
        category,
        title,
        description,
        sell_price,
        status: ProductStatus::Sell,
        created_at: now,
        updated_at: now,
        images: stored.clone(),
    };

    match repo.create_product(&new_product) {
        Ok(product) => Ok(product.id),
        Err(e) => {
            log::error!("Failed to create product: {e}");
            discard_images(store, &stored);
            Err(ServiceError::Internal)
        }
    }
}

/// Keyword search within a category, newest first.
///
/// An empty keyword degenerates to a plain category listing, mirroring the
/// behavior of the listing endpoint.
pub fn search_products<R>(
    params: ProductSearchParams,
    repo: &R,
) -> ServiceResult<Paginated<ProductSummary>>
where
    R: ProductReader,
{
    let category = ProductCategory::try_from(params.category.as_str())?;
    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(DEFAULT_ITEMS_PER_PAGE);

    let mut query = ProductListQuery::default()
        .category(category)
        .paginate(page, per_page);

    let keyword = params.keyword.trim();
    let result = if keyword.is_empty() {
        repo.list_products(query)
    } else {
        query = query.search(keyword);
        repo.search_products(query)
    };

    match result {
        Ok((total, products)) => Ok(Paginated::new(
            products.into_iter().map(ProductSummary::from).collect(),
            page,
            total,
            per_page,
        )),
        Err(e) => {
            log::error!("Failed to search products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Paginated listing of one category, newest first.
pub fn list_by_category<R>(
    params: CategoryListParams,
    repo: &R,
) -> ServiceResult<Paginated<ProductSummary>>
where
    R: ProductReader,
{
    let category = ProductCategory::try_from(params.category.as_str())?;
    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(DEFAULT_ITEMS_PER_PAGE);

    let query = ProductListQuery::default()
        .category(category)
        .paginate(page, per_page);

    match repo.list_products(query) {
        Ok((total, products)) => Ok(Paginated::new(
            products.into_iter().map(ProductSummary::from).collect(),
            page,
            total,
            per_page,
        )),
        Err(e) => {
            log::error!("Failed to list products by category: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Paginated listing over all products, newest first.
pub fn list_all_products<R>(
    params: ProductListParams,
    repo: &R,
) -> ServiceResult<Paginated<ProductSummary>>
where
    R: ProductReader,
{
    let page = params.page.unwrap_or(1);
    let per_page = params.per_page.unwrap_or(DEFAULT_ITEMS_PER_PAGE);

    let query = ProductListQuery::default().paginate(page, per_page);

    match repo.list_products(query) {
        Ok((total, products)) => Ok(Paginated::new(
            products.into_iter().map(ProductSummary::from).collect(),
            page,
            total,
            per_page,
        )),
        Err(e) => {
            log::error!("Failed to list products: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Full product detail, with `is_owner` computed against the caller.
pub fn product_detail<R>(
    product_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ProductDetail>
where
    R: ProductReader,
{
    let caller = caller_id(user)?;

    let product_id = match ProductId::new(product_id) {
        Ok(product_id) => product_id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    match repo.get_product_by_id(product_id) {
        Ok(Some(product)) => Ok(ProductDetail::from_product(product, caller)),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get product: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Detail pre-filled for the edit form. Only the owner may fetch it.
pub fn product_for_edit<R>(
    product_id: i32,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<ProductEditView>
where
    R: ProductReader,
{
    let product = owned_product(product_id, user, repo)?;
    Ok(ProductEditView::from(product))
}

/// Core business logic for product edits.
///
/// Only the owner may update. When the payload carries new images they are
/// stored first and the record's image rows are replaced; the previously
/// stored files are removed once the update has gone through. Without new
/// images the stored set is kept.
pub fn update_product<R, S>(
    payload: UpdateProductPayload,
    user: &AuthenticatedUser,
    product_id: i32,
    repo: &R,
    store: &S,
) -> ServiceResult<()>
where
    R: ProductReader + ProductWriter,
    S: ImageStore,
{
    let existing = owned_product(product_id, user, repo)?;

    let new_urls = match &payload.images {
        Some(images) => Some(store_images(images, store)?),
        None => None,
    };

    let update = ProductUpdate {
        category: payload.category,
        title: payload.title,
        description: payload.description,
        sell_price: payload.sell_price,
        images: new_urls.clone(),
    };

    match repo.update_product(existing.id, &update) {
        Ok(0) => {
            if let Some(urls) = &new_urls {
                discard_images(store, urls);
            }
            Err(ServiceError::NotFound)
        }
        Ok(_) => {
            if new_urls.is_some() {
                discard_images(store, &existing.images);
            }
            Ok(())
        }
        Err(e) => {
            log::error!("Failed to update product: {e}");
            if let Some(urls) = &new_urls {
                discard_images(store, urls);
            }
            Err(ServiceError::Internal)
        }
    }
}

/// Core business logic for product deletion.
///
/// Only the owner may delete. The product and its image rows are removed
/// first; the stored files are then cleaned up best-effort.
pub fn delete_product<R, S>(
    user: &AuthenticatedUser,
    product_id: i32,
    repo: &R,
    store: &S,
) -> ServiceResult<()>
where
    R: ProductReader + ProductWriter,
    S: ImageStore,
{
    let existing = owned_product(product_id, user, repo)?;

    match repo.delete_product(existing.id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            discard_images(store, &existing.images);
            Ok(())
        }
        Err(e) => {
            log::error!("Failed to delete product: {e}");
            Err(ServiceError::Internal)
        }
    }
}
