const FIRST_HOUR: u32 = 10;
const LAST_HOUR: u32 = 17;

/// Half-hour slot labels for a day, "10:00 AM" through "5:00 PM".
///
/// The same list applies to every date. Labels are the keys of the
/// persisted record, so their formatting must not change.
pub fn time_slots() -> Vec<String> {
    let mut slots = Vec::new();
    for hour in FIRST_HOUR..=LAST_HOUR {
        slots.push(slot_label(hour, 0));
        if hour != LAST_HOUR {
            slots.push(slot_label(hour, 30));
        }
    }
    slots
}

pub fn is_time_slot(label: &str) -> bool {
    time_slots().iter().any(|slot| slot == label)
}

/// 12-hour clock label, e.g. `slot_label(14, 30)` is "2:30 PM".
pub fn slot_label(hour: u32, minute: u32) -> String {
    let suffix = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display_hour}:{minute:02} {suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_window() {
        let slots = time_slots();
        assert_eq!(slots.len(), 15);
        assert_eq!(slots.first().map(String::as_str), Some("10:00 AM"));
        assert_eq!(slots.last().map(String::as_str), Some("5:00 PM"));
        assert!(slots.contains(&"12:30 PM".to_string()));
        assert!(slots.contains(&"2:30 PM".to_string()));
        assert!(!slots.contains(&"5:30 PM".to_string()));
    }

    #[test]
    fn labels_use_twelve_hour_clock() {
        assert_eq!(slot_label(10, 0), "10:00 AM");
        assert_eq!(slot_label(11, 30), "11:30 AM");
        assert_eq!(slot_label(12, 0), "12:00 PM");
        assert_eq!(slot_label(13, 0), "1:00 PM");
        assert_eq!(slot_label(0, 30), "12:30 AM");
    }

    #[test]
    fn membership() {
        assert!(is_time_slot("3:30 PM"));
        assert!(!is_time_slot("15:30 PM"));
        assert!(!is_time_slot("9:30 AM"));
    }
}
