use crate::calendar::{MonthCursor, date_key, parse_date_key};
use crate::errors::{AppError, BookingError};
use crate::models::{
    BookingRequest, BookingResponse, CalendarQuery, CalendarResponse, DateForm, DaySlotsResponse,
    ResetAnswerForm, ResetResponse, SessionResponse, SlotsQuery, TimeForm,
};
use crate::state::AppState;
use crate::store::{Bookings, SLOT_CAPACITY};
use crate::ui::render_index;
use axum::{
    Form, Json,
    extract::{Query, State},
    response::{Html, Redirect},
};
use chrono::NaiveDate;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = state.clock.today();
    let mut session = state.session.lock().await;
    let store = state.store.lock().await;
    let notice = session.take_notice();
    Html(render_index(&session, &store, notice.as_ref(), today))
}

pub async fn next_month(State(state): State<AppState>) -> Redirect {
    state.session.lock().await.next_month();
    Redirect::to("/")
}

pub async fn previous_month(State(state): State<AppState>) -> Redirect {
    state.session.lock().await.previous_month();
    Redirect::to("/")
}

pub async fn select_date(
    State(state): State<AppState>,
    Form(form): Form<DateForm>,
) -> Result<Redirect, AppError> {
    let date = parse_date(&form.date)?;
    let today = state.clock.today();
    state.session.lock().await.select_date(date, today);
    Ok(Redirect::to("/"))
}

pub async fn select_time(State(state): State<AppState>, Form(form): Form<TimeForm>) -> Redirect {
    let mut session = state.session.lock().await;
    let store = state.store.lock().await;
    session.select_time(form.time.trim(), &store);
    Redirect::to("/")
}

pub async fn confirm(State(state): State<AppState>) -> Redirect {
    let today = state.clock.today();
    let mut session = state.session.lock().await;
    let mut store = state.store.lock().await;
    // A rejection is kept on the session and shown after the redirect.
    let _ = session.confirm(&mut store, today);
    Redirect::to("/")
}

pub async fn request_reset(State(state): State<AppState>) -> Redirect {
    state.session.lock().await.request_reset();
    Redirect::to("/")
}

pub async fn answer_reset(
    State(state): State<AppState>,
    Form(form): Form<ResetAnswerForm>,
) -> Redirect {
    let confirmed = form.answer.trim().eq_ignore_ascii_case("yes");
    let mut session = state.session.lock().await;
    let mut store = state.store.lock().await;
    session.answer_reset(confirmed, &mut store);
    Redirect::to("/")
}

pub async fn get_calendar(
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let cursor = MonthCursor::new(query.year, query.month_index);
    let (Some(days_in_month), Some(leading_blanks)) =
        (cursor.days_in_month(), cursor.leading_blanks())
    else {
        return Err(AppError::bad_request("year out of range"));
    };

    Ok(Json(CalendarResponse {
        year: cursor.year(),
        month_index: cursor.month0(),
        label: cursor.label(),
        leading_blanks,
        days_in_month,
        cells: cursor
            .cells()
            .iter()
            .map(|cell| cell.date().map(date_key))
            .collect(),
    }))
}

pub async fn get_slots(
    State(state): State<AppState>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<DaySlotsResponse>, AppError> {
    let date = parse_date(&query.date)?;
    let store = state.store.lock().await;
    Ok(Json(DaySlotsResponse {
        date: date_key(date),
        capacity: SLOT_CAPACITY,
        slots: store.day_slots(date),
    }))
}

pub async fn get_bookings(State(state): State<AppState>) -> Json<Bookings> {
    let store = state.store.lock().await;
    Json(store.bookings().clone())
}

pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<BookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let date = parse_date(&payload.date)?;
    if date < state.clock.today() {
        return Err(BookingError::PastDate.into());
    }

    let time = payload.time.trim();
    let booked = state.store.lock().await.confirm_booking(date, time)?;

    Ok(Json(BookingResponse {
        date: date_key(date),
        time: time.to_string(),
        count: booked.count,
        capacity: SLOT_CAPACITY,
        persisted: booked.persisted,
    }))
}

pub async fn reset_bookings(State(state): State<AppState>) -> Json<ResetResponse> {
    let mut session = state.session.lock().await;
    let mut store = state.store.lock().await;
    let persisted = session.reset(&mut store);
    Json(ResetResponse { persisted })
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = state.session.lock().await;
    Json(SessionResponse {
        mode: session.mode(),
        selected_date: session.selected_date().map(date_key),
        selected_time: session.selected_time().map(str::to_string),
        viewed_month: session.viewed_month().label(),
        confirmation_shown: session.confirmation_shown(),
        reset_prompt: session.reset_prompt(),
    })
}

fn parse_date(text: &str) -> Result<NaiveDate, AppError> {
    parse_date_key(text.trim())
        .ok_or_else(|| AppError::bad_request("date must be formatted as YYYY-MM-DD"))
}
