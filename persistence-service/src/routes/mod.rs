pub mod books;
pub mod health;

use crate::state::Store;
use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use books::{get_only, list_saved_books, post_only, preflight, save_book};
use health::health_check;

fn cors(method: Method) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([method, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

pub fn router(store: Store) -> Router {
    Router::new()
        .route("/status", get(health_check))
        .route(
            "/api/save-book",
            post(save_book)
                .options(preflight)
                .fallback(post_only)
                .layer(cors(Method::POST)),
        )
        .route(
            "/api/saved-books",
            get(list_saved_books)
                .options(preflight)
                .fallback(get_only)
                .layer(cors(Method::GET)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}
