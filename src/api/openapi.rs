use utoipa::OpenApi;

use crate::handlers::products;
use crate::model::{ErrorResponse, Product, ProductCollectionResponse};

/// OpenAPI document served at `/api/product/api-docs`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product Service",
        description = "APIs for managing product information in the catalog"
    ),
    paths(
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
    ),
    components(schemas(Product, ProductCollectionResponse, ErrorResponse)),
    tags((name = "Product", description = "Catalog CRUD operations"))
)]
pub struct ApiDoc;
