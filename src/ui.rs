use crate::calendar::{CalendarCell, WEEKDAY_LABELS, date_key, long_date};
use crate::session::{BookingSession, Notice};
use crate::store::{BookingStore, SLOT_CAPACITY};
use chrono::{Datelike, NaiveDate};
use std::fmt::Write;

pub fn render_index(
    session: &BookingSession,
    store: &BookingStore,
    notice: Option<&Notice>,
    today: NaiveDate,
) -> String {
    INDEX_HTML
        .replace("{{MONTH}}", &session.viewed_month().label())
        .replace("{{NOTICE}}", &render_notice(notice))
        .replace("{{RESET_PROMPT}}", &render_reset_prompt(session))
        .replace("{{GRID}}", &render_grid(session, today))
        .replace("{{SELECTION}}", &render_selection(session, store, today))
}

fn render_notice(notice: Option<&Notice>) -> String {
    match notice {
        Some(Notice::Rejected(err)) => {
            format!(r#"<div class="notice error" role="alert">{err}</div>"#)
        }
        Some(Notice::ResetDone) => {
            r#"<div class="notice ok" role="status">All bookings have been reset!</div>"#.to_string()
        }
        None => String::new(),
    }
}

fn render_reset_prompt(session: &BookingSession) -> String {
    if !session.reset_prompt() {
        return String::new();
    }
    r#"<form class="prompt" method="post" action="/reset/answer">
        <p>Are you sure you want to reset all bookings? This action cannot be undone.</p>
        <button type="submit" name="answer" value="yes" class="danger">Yes, reset</button>
        <button type="submit" name="answer" value="no">No</button>
      </form>"#
        .to_string()
}

fn render_grid(session: &BookingSession, today: NaiveDate) -> String {
    let mut html = String::new();
    for label in WEEKDAY_LABELS {
        let _ = write!(html, r#"<div class="day-header">{label}</div>"#);
    }

    for cell in session.viewed_month().cells() {
        let date = match cell {
            CalendarCell::Blank => {
                html.push_str(r#"<div class="calendar-day empty"></div>"#);
                continue;
            }
            CalendarCell::Day(date) => date,
        };

        let class = if session.selected_date() == Some(date) {
            "selected"
        } else if date == today {
            "today"
        } else if date < today {
            "past"
        } else {
            "available"
        };

        if date < today {
            let _ = write!(html, r#"<div class="calendar-day {class}">{}</div>"#, date.day());
        } else {
            let _ = write!(
                html,
                r#"<button type="submit" name="date" value="{}" class="calendar-day {class}">{}</button>"#,
                date_key(date),
                date.day()
            );
        }
    }
    html
}

fn render_selection(session: &BookingSession, store: &BookingStore, today: NaiveDate) -> String {
    let Some(date) = session.selected_date() else {
        return r#"<p class="hint">Pick a date to see available times.</p>"#.to_string();
    };

    let mut html = format!(
        r#"<div class="selected-date"><h3>Selected Date: {}</h3></div>"#,
        long_date(date)
    );
    if date < today {
        return html;
    }

    html.push_str(r#"<div class="time-slots"><h3>Select Time Slot:</h3><form class="time-grid" method="post" action="/select/time">"#);
    for slot in store.day_slots(date) {
        let selected = if session.selected_time() == Some(slot.time.as_str()) {
            " selected"
        } else {
            ""
        };
        if slot.full {
            let _ = write!(
                html,
                r#"<button type="button" class="time-slot full{selected}" disabled>{} (Fully Booked)</button>"#,
                slot.time
            );
        } else {
            let _ = write!(
                html,
                r#"<button type="submit" name="time" value="{time}" class="time-slot available{selected}">{time} ({count}/{SLOT_CAPACITY})</button>"#,
                time = slot.time,
                count = slot.count
            );
        }
    }
    html.push_str("</form></div>");

    if let Some(time) = session.selected_time() {
        if session.confirmation_shown() {
            let _ = write!(
                html,
                r#"<div class="confirmation-message">
          <h3>Booking Confirmed!</h3>
          <p>Your appointment on {} at {time} has been booked.</p>
          <p>Current bookings for this slot: {}/{SLOT_CAPACITY}</p>
        </div>"#,
                long_date(date),
                store.booking_count(date, time)
            );
        } else {
            html.push_str(
                r#"<form class="booking-actions" method="post" action="/confirm">
          <button type="submit" class="confirm-button">Confirm Booking</button>
        </form>"#,
            );
        }
    }
    html
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Slot Booking</title>
  <style>
    :root {
      --bg: #f4f1ea;
      --ink: #2b2a28;
      --muted: #8c877f;
      --accent: #2f6f8f;
      --accent-soft: #d8ebf3;
      --danger: #c8452d;
      --ok: #2e7d4f;
      --card: #ffffff;
      --shadow: 0 18px 44px rgba(43, 42, 40, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: start center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(720px, 100%);
      background: var(--card);
      border-radius: 20px;
      box-shadow: var(--shadow);
      padding: 28px;
      display: grid;
      gap: 20px;
    }

    .header-section,
    .slot-booking-nav {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    h2, h3 {
      margin: 0;
    }

    button {
      font: inherit;
      border: 1px solid #d6d1c8;
      border-radius: 10px;
      background: #fff;
      padding: 8px 12px;
      cursor: pointer;
    }

    button:disabled {
      cursor: not-allowed;
    }

    .danger,
    .reset-button {
      border-color: var(--danger);
      color: var(--danger);
    }

    .slot-booking-grid {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 6px;
    }

    .day-header {
      text-align: center;
      font-weight: 600;
      color: var(--muted);
    }

    .calendar-day {
      min-height: 44px;
      display: grid;
      place-items: center;
      border-radius: 10px;
    }

    .calendar-day.past {
      color: #c4bfb6;
    }

    .calendar-day.today {
      border: 2px solid var(--accent);
    }

    .calendar-day.selected {
      background: var(--accent);
      color: #fff;
    }

    .time-grid {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(150px, 1fr));
      gap: 8px;
      margin-top: 10px;
    }

    .time-slot.selected {
      background: var(--accent-soft);
      border-color: var(--accent);
    }

    .time-slot.full {
      background: #f1eeea;
      color: var(--muted);
    }

    .confirm-button {
      background: var(--accent);
      border-color: var(--accent);
      color: #fff;
    }

    .confirmation-message,
    .notice,
    .prompt {
      border-radius: 12px;
      padding: 12px 16px;
    }

    .confirmation-message,
    .notice.ok {
      background: #e3f3e8;
      color: var(--ok);
    }

    .notice.error,
    .prompt {
      background: #fbe7e2;
      color: var(--danger);
    }

    .hint {
      color: var(--muted);
      margin: 0;
    }
  </style>
</head>
<body>
  <main class="app">
    <div class="header-section">
      <h2>Select Date &amp; Time</h2>
      <form method="post" action="/reset">
        <button type="submit" class="reset-button">Reset All Bookings</button>
      </form>
    </div>

    {{NOTICE}}
    {{RESET_PROMPT}}

    <div class="slot-booking-nav">
      <form method="post" action="/month/prev"><button type="submit">&lt; Previous</button></form>
      <h3>{{MONTH}}</h3>
      <form method="post" action="/month/next"><button type="submit">Next &gt;</button></form>
    </div>

    <form class="slot-booking-grid" method="post" action="/select/date">
      {{GRID}}
    </form>

    {{SELECTION}}
  </main>
</body>
</html>
"#;
