use crate::handlers;
use crate::state::AppState;
use crate::webhook;
use axum::{routing::{get, post, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/habits/:id/toggle", post(handlers::toggle_today))
        .route("/api/habits", get(handlers::list_habits).post(handlers::create_habit))
        .route(
            "/api/habits/:id",
            get(handlers::get_habit)
                .patch(handlers::update_habit)
                .delete(handlers::delete_habit),
        )
        .route("/api/habits/:id/archive", post(handlers::archive_habit))
        .route("/api/habits/:id/toggle", post(handlers::toggle))
        .route("/api/habits/:id/entries", get(handlers::list_entries))
        .route("/api/habits/:id/entries/:date/note", put(handlers::set_note))
        .route("/api/habits/:id/stats", get(handlers::habit_stats))
        .route(
            "/api/habits/:id/comments",
            get(handlers::list_comments).post(handlers::add_comment),
        )
        .route("/api/habits/:id/cheers", post(handlers::cheer))
        .route("/api/stats", get(handlers::overview))
        .route("/api/community", get(handlers::community))
        .route("/api/community/cheers", get(handlers::cheer_options))
        .route("/api/templates", get(handlers::templates))
        .route("/api/webhooks", post(webhook::receive))
        .with_state(state)
}
