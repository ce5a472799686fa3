use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::auth::Principal;
use crate::middleware::{ApiResponse, ApiResult};
use crate::model::{ErrorResponse, Product, ProductCollectionResponse};
use crate::state::AppState;

/// GET /api/product/products - every product in the catalog
#[utoipa::path(
    get,
    path = "/api/product/products",
    tag = "Product",
    responses(
        (status = 200, description = "Successfully retrieved all products", body = ProductCollectionResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<ProductCollectionResponse> {
    tracing::debug!(principal = %principal.name, "list products");
    let products = state.products.list();
    Ok(ApiResponse::success(ProductCollectionResponse::new(products)))
}

/// GET /api/product/products/:productId - zero or one product, never 404
#[utoipa::path(
    get,
    path = "/api/product/products/{productId}",
    tag = "Product",
    params(("productId" = String, Path, description = "ID of the product to retrieve")),
    responses(
        (status = 200, description = "Matching product, or an empty list when the id is unknown", body = ProductCollectionResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(product_id): Path<String>,
) -> ApiResult<ProductCollectionResponse> {
    tracing::debug!(principal = %principal.name, "get product");
    let products = state.products.get(&product_id);
    Ok(ApiResponse::success(ProductCollectionResponse::new(products)))
}

/// POST /api/product/products - create, generating an id when none is given
#[utoipa::path(
    post,
    path = "/api/product/products",
    tag = "Product",
    request_body = Product,
    responses(
        (status = 201, description = "Product successfully created", body = ProductCollectionResponse),
        (status = 400, description = "Product with same ID already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<Product>, JsonRejection>,
) -> ApiResult<ProductCollectionResponse> {
    let Json(product) = payload?;
    tracing::debug!(principal = %principal.name, "create product");

    let created = state.products.create(product)?;
    Ok(ApiResponse::created(ProductCollectionResponse::single(created)))
}

/// PUT /api/product/products/:productId - replace an existing product
#[utoipa::path(
    put,
    path = "/api/product/products/{productId}",
    tag = "Product",
    params(("productId" = String, Path, description = "ID of the product to update")),
    request_body = Product,
    responses(
        (status = 200, description = "Product successfully updated", body = ProductCollectionResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(product_id): Path<String>,
    payload: Result<Json<Product>, JsonRejection>,
) -> ApiResult<ProductCollectionResponse> {
    let Json(product) = payload?;
    tracing::debug!(principal = %principal.name, "update product");

    let updated = state.products.update(&product_id, product)?;
    Ok(ApiResponse::success(ProductCollectionResponse::single(updated)))
}

/// DELETE /api/product/products/:productId
#[utoipa::path(
    delete,
    path = "/api/product/products/{productId}",
    tag = "Product",
    params(("productId" = String, Path, description = "ID of the product to delete")),
    responses(
        (status = 204, description = "Product successfully deleted"),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(product_id): Path<String>,
) -> ApiResult<()> {
    tracing::debug!(principal = %principal.name, "delete product");
    state.products.delete(&product_id)?;
    Ok(ApiResponse::<()>::no_content())
}
