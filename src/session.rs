//! Selection state of the booking page and the transitions between its
//! modes.

use crate::calendar::MonthCursor;
use crate::errors::BookingError;
use crate::slots::is_time_slot;
use crate::store::{Booked, BookingStore};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Mode {
    NoDateSelected,
    DateSelected,
    TimeSelected,
    Confirmed,
}

/// One-shot message shown on the next render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Rejected(BookingError),
    ResetDone,
}

#[derive(Debug, Clone)]
pub struct BookingSession {
    selected_date: Option<NaiveDate>,
    selected_time: Option<String>,
    viewed_month: MonthCursor,
    confirmation_shown: bool,
    reset_prompt: bool,
    notice: Option<Notice>,
}

impl BookingSession {
    /// Starts on the month containing `today` with nothing selected.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            selected_date: None,
            selected_time: None,
            viewed_month: MonthCursor::containing(today),
            confirmation_shown: false,
            reset_prompt: false,
            notice: None,
        }
    }

    pub fn mode(&self) -> Mode {
        match (self.selected_date, &self.selected_time) {
            (None, _) => Mode::NoDateSelected,
            (Some(_), None) => Mode::DateSelected,
            (Some(_), Some(_)) if self.confirmation_shown => Mode::Confirmed,
            (Some(_), Some(_)) => Mode::TimeSelected,
        }
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn selected_time(&self) -> Option<&str> {
        self.selected_time.as_deref()
    }

    pub fn viewed_month(&self) -> MonthCursor {
        self.viewed_month
    }

    pub fn confirmation_shown(&self) -> bool {
        self.confirmation_shown
    }

    pub fn reset_prompt(&self) -> bool {
        self.reset_prompt
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn next_month(&mut self) {
        self.viewed_month = self.viewed_month.next();
    }

    pub fn previous_month(&mut self) {
        self.viewed_month = self.viewed_month.previous();
    }

    /// Selects `date` and clears the time and confirmation. Dates before
    /// `today` are ignored; returns whether the selection was taken.
    pub fn select_date(&mut self, date: NaiveDate, today: NaiveDate) -> bool {
        if date < today {
            debug!("ignoring past date {date}");
            return false;
        }
        self.selected_date = Some(date);
        self.selected_time = None;
        self.confirmation_shown = false;
        true
    }

    /// Selects a time slot on the selected date and clears the
    /// confirmation. Ignored without a date, for unknown labels and for
    /// full slots.
    pub fn select_time(&mut self, time: &str, store: &BookingStore) -> bool {
        let Some(date) = self.selected_date else {
            return false;
        };
        if !is_time_slot(time) || store.is_full(date, time) {
            debug!("ignoring unavailable slot {time} on {date}");
            return false;
        }
        self.selected_time = Some(time.to_string());
        self.confirmation_shown = false;
        true
    }

    /// Books the selected slot. Capacity is checked again at this point; a
    /// rejection leaves the selection as it was and is kept as a notice.
    pub fn confirm(
        &mut self,
        store: &mut BookingStore,
        today: NaiveDate,
    ) -> Result<Booked, BookingError> {
        let result = match (self.mode(), self.selected_date, self.selected_time.as_deref()) {
            (Mode::TimeSelected, Some(date), Some(_)) if date < today => Err(BookingError::PastDate),
            (Mode::TimeSelected, Some(date), Some(time)) => store.confirm_booking(date, time),
            _ => Err(BookingError::NothingSelected),
        };

        match &result {
            Ok(_) => self.confirmation_shown = true,
            Err(err) => self.notice = Some(Notice::Rejected(err.clone())),
        }
        result
    }

    /// Opens the yes/no prompt for clearing every booking.
    pub fn request_reset(&mut self) {
        self.reset_prompt = true;
    }

    /// Closes the reset prompt. On yes, clears the store and the selection
    /// and leaves an acknowledgment notice. Returns whether a reset
    /// happened.
    pub fn answer_reset(&mut self, confirmed: bool, store: &mut BookingStore) -> bool {
        self.reset_prompt = false;
        if !confirmed {
            return false;
        }
        self.reset(store);
        true
    }

    /// Clears the store and the selection without a prompt.
    pub fn reset(&mut self, store: &mut BookingStore) -> bool {
        let persisted = store.reset_all();
        self.selected_date = None;
        self.selected_time = None;
        self.confirmation_shown = false;
        self.notice = Some(Notice::ResetDone);
        info!("session cleared after reset");
        persisted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::SLOT_CAPACITY;
    use std::sync::Arc;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (BookingSession, BookingStore, NaiveDate) {
        let today = ymd(2024, 3, 10);
        let store = BookingStore::load(Arc::new(MemoryStorage::new()));
        (BookingSession::new(today), store, today)
    }

    #[test]
    fn walks_through_every_mode() {
        let (mut session, mut store, today) = setup();
        assert_eq!(session.mode(), Mode::NoDateSelected);

        assert!(session.select_date(ymd(2024, 3, 15), today));
        assert_eq!(session.mode(), Mode::DateSelected);

        assert!(session.select_time("10:00 AM", &store));
        assert_eq!(session.mode(), Mode::TimeSelected);

        let booked = session.confirm(&mut store, today).unwrap();
        assert_eq!(booked.count, 1);
        assert_eq!(session.mode(), Mode::Confirmed);
        assert_eq!(
            serde_json::to_string(store.bookings()).unwrap(),
            r#"{"2024-03-15":{"10:00 AM":1}}"#
        );
    }

    #[test]
    fn past_dates_are_ignored() {
        let (mut session, _, today) = setup();
        assert!(!session.select_date(ymd(2024, 3, 9), today));
        assert_eq!(session.mode(), Mode::NoDateSelected);
        assert_eq!(session.take_notice(), None);

        assert!(session.select_date(today, today));
        assert_eq!(session.selected_date(), Some(today));
    }

    #[test]
    fn new_date_clears_time_and_confirmation() {
        let (mut session, mut store, today) = setup();
        session.select_date(ymd(2024, 3, 15), today);
        session.select_time("11:30 AM", &store);
        session.confirm(&mut store, today).unwrap();

        session.select_date(ymd(2024, 3, 16), today);
        assert_eq!(session.selected_time(), None);
        assert!(!session.confirmation_shown());
        assert_eq!(session.mode(), Mode::DateSelected);
    }

    #[test]
    fn new_time_clears_confirmation() {
        let (mut session, mut store, today) = setup();
        session.select_date(ymd(2024, 3, 15), today);
        session.select_time("11:30 AM", &store);
        session.confirm(&mut store, today).unwrap();

        assert!(session.select_time("12:00 PM", &store));
        assert_eq!(session.mode(), Mode::TimeSelected);
        assert_eq!(session.selected_time(), Some("12:00 PM"));
    }

    #[test]
    fn time_needs_a_date_and_free_slot() {
        let (mut session, mut store, today) = setup();
        assert!(!session.select_time("10:00 AM", &store));

        let date = ymd(2024, 3, 15);
        for _ in 0..SLOT_CAPACITY {
            store.confirm_booking(date, "10:00 AM").unwrap();
        }
        session.select_date(date, today);
        assert!(!session.select_time("10:00 AM", &store));
        assert!(!session.select_time("10:15 AM", &store));
        assert_eq!(session.mode(), Mode::DateSelected);
    }

    #[test]
    fn filling_a_slot_then_rejecting() {
        let (mut session, mut store, today) = setup();
        let date = ymd(2024, 3, 15);
        session.select_date(date, today);

        for expected in 1..=SLOT_CAPACITY {
            assert!(session.select_time("10:00 AM", &store));
            assert_eq!(session.confirm(&mut store, today).unwrap().count, expected);
        }
        assert!(store.is_full(date, "10:00 AM"));
        assert!(!session.select_time("10:00 AM", &store));
    }

    #[test]
    fn slot_filled_after_selection_is_rejected() {
        let (mut session, mut store, today) = setup();
        let date = ymd(2024, 3, 15);
        session.select_date(date, today);
        session.select_time("4:00 PM", &store);

        for _ in 0..SLOT_CAPACITY {
            store.confirm_booking(date, "4:00 PM").unwrap();
        }

        assert_eq!(session.confirm(&mut store, today), Err(BookingError::SlotFull));
        assert_eq!(session.mode(), Mode::TimeSelected);
        assert_eq!(session.selected_time(), Some("4:00 PM"));
        assert_eq!(store.booking_count(date, "4:00 PM"), SLOT_CAPACITY);
        assert_eq!(
            session.take_notice(),
            Some(Notice::Rejected(BookingError::SlotFull))
        );
        assert_eq!(session.take_notice(), None);
    }

    #[test]
    fn confirm_requires_time_selected() {
        let (mut session, mut store, today) = setup();
        assert_eq!(
            session.confirm(&mut store, today),
            Err(BookingError::NothingSelected)
        );

        session.select_date(ymd(2024, 3, 15), today);
        session.select_time("10:00 AM", &store);
        session.confirm(&mut store, today).unwrap();
        assert_eq!(
            session.confirm(&mut store, today),
            Err(BookingError::NothingSelected)
        );
        assert_eq!(store.booking_count(ymd(2024, 3, 15), "10:00 AM"), 1);
    }

    #[test]
    fn selection_that_became_past_is_rejected() {
        let (mut session, mut store, today) = setup();
        session.select_date(today, today);
        session.select_time("10:00 AM", &store);

        let tomorrow = today.succ_opt().unwrap();
        assert_eq!(session.confirm(&mut store, tomorrow), Err(BookingError::PastDate));
        assert!(store.bookings().is_empty());
    }

    #[test]
    fn reset_needs_a_yes() {
        let (mut session, mut store, today) = setup();
        session.select_date(ymd(2024, 3, 15), today);
        session.select_time("10:00 AM", &store);
        session.confirm(&mut store, today).unwrap();

        session.request_reset();
        assert!(session.reset_prompt());
        assert!(!session.answer_reset(false, &mut store));
        assert!(!session.reset_prompt());
        assert_eq!(session.mode(), Mode::Confirmed);
        assert!(!store.bookings().is_empty());

        session.request_reset();
        assert!(session.answer_reset(true, &mut store));
        assert_eq!(session.mode(), Mode::NoDateSelected);
        assert!(store.bookings().is_empty());
        assert_eq!(session.take_notice(), Some(Notice::ResetDone));
    }

    #[test]
    fn month_navigation() {
        let (mut session, _, _) = setup();
        session.next_month();
        session.next_month();
        assert_eq!(session.viewed_month(), MonthCursor::new(2024, 4));
        for _ in 0..3 {
            session.previous_month();
        }
        assert_eq!(session.viewed_month(), MonthCursor::new(2024, 1));
    }
}
