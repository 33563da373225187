pub mod health;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers;
use crate::middleware::auth::require_api_token;
use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                               WebSocket (open)
///
/// /images/questions/{question_id}/image/{variant}   serve variant (open)
///
/// /questions/find-images                            batch dispatch (POST)
/// /questions/{question_id}/accept-image             compression job (POST)
/// /questions/{question_id}                          delete with cascade
/// /questions/{question_id}/suggested-links          list, add (GET, POST)
/// /questions/{question_id}/suggested-links/{id}     remove (DELETE)
///
/// /jobs                                             list (proxied to worker)
/// /jobs/{id}                                        status (proxied)
/// /jobs/{id}/result                                 result payload (proxied)
/// ```
///
/// Everything below the first two entries sits behind the API-token gate.
/// The WebSocket upgrade and image serving stay open: browsers cannot attach
/// an `Authorization` header to either.
pub fn api_routes(state: AppState) -> Router<AppState> {
    let control = Router::new()
        .route("/questions/find-images", post(handlers::find_images::find_images))
        .route(
            "/questions/{question_id}/accept-image",
            post(handlers::find_images::accept_image),
        )
        .route(
            "/questions/{question_id}",
            delete(handlers::questions::delete),
        )
        .route(
            "/questions/{question_id}/suggested-links",
            get(handlers::suggested_links::list).post(handlers::suggested_links::add),
        )
        .route(
            "/questions/{question_id}/suggested-links/{link_id}",
            delete(handlers::suggested_links::remove),
        )
        .route("/jobs", get(handlers::jobs::list_jobs))
        .route("/jobs/{id}", get(handlers::jobs::get_job))
        .route("/jobs/{id}/result", get(handlers::jobs::get_job_result))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            require_api_token,
        ));

    Router::new()
        .route("/ws", get(ws::ws_handler))
        .route(
            "/images/questions/{question_id}/image/{variant}",
            get(handlers::image_serving::serve_variant),
        )
        .merge(control)
}
