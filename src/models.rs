use crate::session::Mode;
use crate::store::SlotStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct DateForm {
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct TimeForm {
    pub time: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetAnswerForm {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub year: i32,
    pub month_index: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalendarResponse {
    pub year: i32,
    pub month_index: u32,
    pub label: String,
    pub leading_blanks: u32,
    pub days_in_month: u32,
    /// `null` for padding cells, otherwise the date key.
    pub cells: Vec<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct DaySlotsResponse {
    pub date: String,
    pub capacity: u32,
    pub slots: Vec<SlotStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingRequest {
    pub date: String,
    pub time: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingResponse {
    pub date: String,
    pub time: String,
    pub count: u32,
    pub capacity: u32,
    pub persisted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetResponse {
    pub persisted: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub mode: Mode,
    pub selected_date: Option<String>,
    pub selected_time: Option<String>,
    pub viewed_month: String,
    pub confirmation_shown: bool,
    pub reset_prompt: bool,
}
