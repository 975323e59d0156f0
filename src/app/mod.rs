//! 应用层：路由分发与共享状态

pub mod product;

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::HttpConfig;
use crate::core::{
    error::CoreError,
    middleware::{json_error_middleware, request_logging_middleware},
};
use product::{handler, ProductService};

/// 启动时构造一次，所有处理器共享
#[derive(Clone)]
pub struct AppState {
    pub product_service: Arc<dyn ProductService>,
}

impl AppState {
    pub fn new(product_service: Arc<dyn ProductService>) -> Self {
        Self { product_service }
    }
}

/// 创建路由
pub fn router(state: AppState, http: &HttpConfig) -> Router {
    Router::new()
        .route("/product", post(handler::create_product))
        .route("/product/search", get(handler::search_products))
        .route("/product/meta/count", get(handler::count_products))
        .route(
            "/product/:id",
            get(handler::get_product)
                .put(handler::update_product)
                .delete(handler::delete_product),
        )
        .route("/products", get(handler::list_products))
        .route("/health", get(health_check))
        .fallback(not_found)
        .layer(TimeoutLayer::new(http.timeout()))
        .layer(middleware::from_fn(json_error_middleware))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, CoreError> {
    state.product_service.ping().await?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "database": "connected",
        "timestamp": chrono::Utc::now()
    })))
}

async fn not_found() -> CoreError {
    CoreError::NotFound("Not found".to_string())
}
