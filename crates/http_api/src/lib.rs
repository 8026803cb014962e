mod errors;
mod handlers;
mod middleware;
mod state;

use axum::{Router, middleware as axum_middleware, routing::post};

pub use state::{HttpState, SESSION_HEADER, SessionId, generate_session_id};

pub fn router(state: HttpState) -> Router<()> {
    let sessions = Router::new()
        .route("/session_get", post(handlers::session_get))
        .route("/session_close", post(handlers::session_close))
        .route("/session_dates", post(handlers::session_dates))
        .route("/session_price", post(handlers::session_price))
        .route("/query_all", post(handlers::query_all))
        .route("/tags_list", post(handlers::tags_list))
        .route("/tag_submit", post(handlers::tag_submit))
        .route("/presets_list", post(handlers::presets_list))
        .route("/preset_select", post(handlers::preset_select))
        .route("/preset_save", post(handlers::preset_save))
        .route("/consumption", post(handlers::consumption))
        .route("/usage_table", post(handlers::usage_table))
        .route("/prediction_generate", post(handlers::prediction_generate))
        .route("/growth_rate_set", post(handlers::growth_rate_set))
        .route("/projection", post(handlers::projection))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session,
        ));

    let api = Router::new()
        .route("/session_open", post(handlers::session_open))
        .merge(sessions)
        .route_layer(axum_middleware::from_fn(middleware::require_loopback));

    Router::new()
        .nest("/api", api)
        .fallback(handlers::not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests;
