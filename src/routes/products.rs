use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::domain::auth::AuthenticatedUser;
use crate::forms::products::{CreateProductPayload, ProductForm, UpdateProductPayload};
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::products::{
    CategoryListParams, ProductListParams, ProductSearchParams,
    create_product as create_product_service, delete_product as delete_product_service,
    list_all_products as list_all_products_service, list_by_category as list_by_category_service,
    product_detail as product_detail_service, product_for_edit as product_for_edit_service,
    search_products as search_products_service, update_product as update_product_service,
};
use crate::storage::LocalImageStore;

#[post("")]
pub async fn create_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    store: web::Data<LocalImageStore>,
    MultipartForm(form): MultipartForm<ProductForm>,
) -> impl Responder {
    let payload = match CreateProductPayload::try_from(form) {
        Ok(payload) => payload,
        Err(err) => return error_response(err.into()),
    };

    match create_product_service(payload, &user, repo.get_ref(), store.get_ref()) {
        Ok(product_id) => HttpResponse::Created()
            .append_header(("Location", format!("/products/{product_id}")))
            .finish(),
        Err(err) => error_response(err),
    }
}

#[get("/search")]
pub async fn search_products(
    params: web::Query<ProductSearchParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match search_products_service(params.into_inner(), repo.get_ref()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err),
    }
}

#[get("/category")]
pub async fn list_by_category(
    params: web::Query<CategoryListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_by_category_service(params.into_inner(), repo.get_ref()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err),
    }
}

#[get("")]
pub async fn list_all_products(
    params: web::Query<ProductListParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_all_products_service(params.into_inner(), repo.get_ref()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err),
    }
}

#[get("/edit/{product_id}")]
pub async fn product_for_edit(
    user: AuthenticatedUser,
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match product_for_edit_service(product_id.into_inner(), &user, repo.get_ref()) {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response(err),
    }
}

#[put("/edit/{product_id}")]
pub async fn update_product(
    user: AuthenticatedUser,
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    store: web::Data<LocalImageStore>,
    MultipartForm(form): MultipartForm<ProductForm>,
) -> impl Responder {
    let payload = match UpdateProductPayload::try_from(form) {
        Ok(payload) => payload,
        Err(err) => return error_response(err.into()),
    };

    match update_product_service(
        payload,
        &user,
        product_id.into_inner(),
        repo.get_ref(),
        store.get_ref(),
    ) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}

#[delete("/remove/{product_id}")]
pub async fn delete_product(
    user: AuthenticatedUser,
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    store: web::Data<LocalImageStore>,
) -> impl Responder {
    match delete_product_service(&user, product_id.into_inner(), repo.get_ref(), store.get_ref())
    {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err),
    }
}

#[get("/{product_id}")]
pub async fn product_detail(
    user: AuthenticatedUser,
    product_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match product_detail_service(product_id.into_inner(), &user, repo.get_ref()) {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(err) => error_response(err),
    }
}
