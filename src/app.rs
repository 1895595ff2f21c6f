use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/month/prev", post(handlers::previous_month))
        .route("/month/next", post(handlers::next_month))
        .route("/select/date", post(handlers::select_date))
        .route("/select/time", post(handlers::select_time))
        .route("/confirm", post(handlers::confirm))
        .route("/reset", post(handlers::request_reset))
        .route("/reset/answer", post(handlers::answer_reset))
        .route("/api/calendar", get(handlers::get_calendar))
        .route("/api/slots", get(handlers::get_slots))
        .route(
            "/api/bookings",
            get(handlers::get_bookings)
                .post(handlers::create_booking)
                .delete(handlers::reset_bookings),
        )
        .route("/api/session", get(handlers::get_session))
        .with_state(state)
}
