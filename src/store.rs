use crate::calendar::date_key;
use crate::errors::BookingError;
use crate::slots::{is_time_slot, time_slots};
use crate::storage::Storage;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use tracing::{debug, error, info, warn};

/// Bookings allowed per date and time slot.
pub const SLOT_CAPACITY: u32 = 5;

/// Name of the persisted record.
pub const STORAGE_KEY: &str = "timeSlotBookings";

/// Time label to booking count.
pub type DaySlots = BTreeMap<String, u32>;

/// Date key to the counts for that day. Serializes as the bare nested map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bookings(BTreeMap<String, DaySlots>);

impl Bookings {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn days(&self) -> &BTreeMap<String, DaySlots> {
        &self.0
    }

    pub fn count(&self, date_key: &str, time: &str) -> u32 {
        self.0
            .get(date_key)
            .and_then(|day| day.get(time))
            .copied()
            .unwrap_or(0)
    }

    fn clamp_to_capacity(&mut self) -> usize {
        let mut clamped = 0;
        for count in self.0.values_mut().flat_map(|day| day.values_mut()) {
            if *count > SLOT_CAPACITY {
                *count = SLOT_CAPACITY;
                clamped += 1;
            }
        }
        clamped
    }
}

/// Result of a successful booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Booked {
    /// Count for the slot after the booking.
    pub count: u32,
    /// False when the write to storage failed; the booking is still held in
    /// memory for the rest of the session.
    pub persisted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotStatus {
    pub time: String,
    pub count: u32,
    pub full: bool,
}

/// Booking counts per date and slot, mirrored to a [`Storage`] record.
///
/// The only constructor is [`BookingStore::load`], so a store always
/// starts from whatever was saved before and never overwrites saved data
/// with an unloaded, empty map.
pub struct BookingStore {
    bookings: Bookings,
    storage: Arc<dyn Storage>,
}

impl BookingStore {
    /// Reads the persisted record. Missing, unreadable or malformed records
    /// all produce an empty store.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let bookings = match storage.read(STORAGE_KEY) {
            Ok(Some(text)) => match serde_json::from_str::<Bookings>(&text) {
                Ok(mut bookings) => {
                    let clamped = bookings.clamp_to_capacity();
                    if clamped > 0 {
                        warn!("clamped {clamped} stored counts to capacity {SLOT_CAPACITY}");
                    }
                    info!("loaded bookings for {} dates", bookings.0.len());
                    bookings
                }
                Err(err) => {
                    error!("failed to parse stored bookings, starting empty: {err}");
                    Bookings::default()
                }
            },
            Ok(None) => {
                info!("no stored bookings found");
                Bookings::default()
            }
            Err(err) => {
                error!("failed to read stored bookings, starting empty: {err}");
                Bookings::default()
            }
        };

        Self { bookings, storage }
    }

    pub fn bookings(&self) -> &Bookings {
        &self.bookings
    }

    pub fn booking_count(&self, date: NaiveDate, time: &str) -> u32 {
        self.bookings.count(&date_key(date), time)
    }

    pub fn is_full(&self, date: NaiveDate, time: &str) -> bool {
        self.booking_count(date, time) >= SLOT_CAPACITY
    }

    /// Every slot of the day with its current count.
    pub fn day_slots(&self, date: NaiveDate) -> Vec<SlotStatus> {
        let key = date_key(date);
        time_slots()
            .into_iter()
            .map(|time| {
                let count = self.bookings.count(&key, &time);
                SlotStatus {
                    full: count >= SLOT_CAPACITY,
                    count,
                    time,
                }
            })
            .collect()
    }

    /// Adds one booking to the slot unless it is already at capacity, then
    /// writes the whole store back to storage.
    pub fn confirm_booking(&mut self, date: NaiveDate, time: &str) -> Result<Booked, BookingError> {
        if !is_time_slot(time) {
            return Err(BookingError::UnknownSlot(time.to_string()));
        }

        let key = date_key(date);
        let current = self.bookings.count(&key, time);
        if current >= SLOT_CAPACITY {
            debug!("rejected booking for {key} {time}: slot full");
            return Err(BookingError::SlotFull);
        }

        let count = current + 1;
        self.bookings
            .0
            .entry(key.clone())
            .or_default()
            .insert(time.to_string(), count);
        info!("booked {key} {time} ({count}/{SLOT_CAPACITY})");

        let persisted = self.persist();
        Ok(Booked { count, persisted })
    }

    /// Drops every booking and deletes the persisted record. Returns false
    /// if the record could not be removed.
    pub fn reset_all(&mut self) -> bool {
        self.bookings = Bookings::default();
        match self.storage.remove(STORAGE_KEY) {
            Ok(()) => {
                info!("all bookings reset");
                true
            }
            Err(err) => {
                error!("failed to remove stored bookings: {err}");
                false
            }
        }
    }

    fn persist(&self) -> bool {
        let payload = match serde_json::to_string(&self.bookings) {
            Ok(payload) => payload,
            Err(err) => {
                error!("failed to serialize bookings: {err}");
                return false;
            }
        };

        match self.storage.write(STORAGE_KEY, &payload) {
            Ok(()) => true,
            Err(err) => {
                error!("failed to save bookings, keeping them in memory: {err}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn empty_store() -> (Arc<MemoryStorage>, BookingStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = BookingStore::load(storage.clone());
        (storage, store)
    }

    #[test]
    fn missing_record_loads_empty() {
        let (storage, store) = empty_store();
        assert!(store.bookings().is_empty());
        assert_eq!(store.booking_count(ymd(2024, 3, 15), "10:00 AM"), 0);
        assert_eq!(storage.get(STORAGE_KEY), None);
    }

    #[test]
    fn corrupt_record_loads_empty() {
        for text in ["not json", "[1,2,3]", r#"{"2024-03-15": {"10:00 AM": -1}}"#] {
            let storage = Arc::new(MemoryStorage::with_entry(STORAGE_KEY, text));
            let store = BookingStore::load(storage);
            assert!(store.bookings().is_empty(), "{text}");
        }
    }

    #[test]
    fn loading_clamps_counts_over_capacity() {
        let storage = Arc::new(MemoryStorage::with_entry(
            STORAGE_KEY,
            r#"{"2024-03-15": {"10:00 AM": 9, "10:30 AM": 2}}"#,
        ));
        let store = BookingStore::load(storage);
        assert_eq!(store.booking_count(ymd(2024, 3, 15), "10:00 AM"), SLOT_CAPACITY);
        assert_eq!(store.booking_count(ymd(2024, 3, 15), "10:30 AM"), 2);
    }

    #[test]
    fn booking_fills_slot_then_rejects() {
        let (storage, mut store) = empty_store();
        let date = ymd(2024, 3, 15);

        let booked = store.confirm_booking(date, "10:00 AM").unwrap();
        assert_eq!(booked, Booked { count: 1, persisted: true });
        assert_eq!(
            storage.get(STORAGE_KEY).as_deref(),
            Some(r#"{"2024-03-15":{"10:00 AM":1}}"#)
        );

        for expected in 2..=SLOT_CAPACITY {
            assert_eq!(store.confirm_booking(date, "10:00 AM").unwrap().count, expected);
        }
        assert!(store.is_full(date, "10:00 AM"));

        let before = store.bookings().clone();
        assert_eq!(store.confirm_booking(date, "10:00 AM"), Err(BookingError::SlotFull));
        assert_eq!(store.bookings(), &before);
        assert_eq!(store.booking_count(date, "10:00 AM"), SLOT_CAPACITY);
    }

    #[test]
    fn booking_touches_only_its_own_slot() {
        let (_, mut store) = empty_store();
        let date = ymd(2024, 3, 15);
        store.confirm_booking(date, "2:30 PM").unwrap();
        store.confirm_booking(ymd(2024, 3, 16), "2:30 PM").unwrap();
        let before = store.bookings().clone();

        store.confirm_booking(date, "2:30 PM").unwrap();

        assert_eq!(store.booking_count(date, "2:30 PM"), 2);
        assert_eq!(store.booking_count(ymd(2024, 3, 16), "2:30 PM"), 1);
        assert_eq!(store.booking_count(date, "3:00 PM"), 0);
        let changed: Vec<_> = store
            .bookings()
            .days()
            .iter()
            .filter(|(key, day)| before.days().get(*key) != Some(day))
            .map(|(key, _)| key.as_str())
            .collect();
        assert_eq!(changed, vec!["2024-03-15"]);
    }

    #[test]
    fn rejected_booking_creates_no_entries() {
        let (storage, mut store) = empty_store();
        let err = store.confirm_booking(ymd(2024, 3, 15), "9:00 AM").unwrap_err();
        assert_eq!(err, BookingError::UnknownSlot("9:00 AM".into()));
        assert!(store.bookings().is_empty());
        assert_eq!(storage.get(STORAGE_KEY), None);
    }

    #[test]
    fn write_failure_keeps_booking_in_memory() {
        let (storage, mut store) = empty_store();
        storage.set_fail_writes(true);

        let booked = store.confirm_booking(ymd(2024, 3, 15), "11:00 AM").unwrap();
        assert_eq!(booked, Booked { count: 1, persisted: false });
        assert_eq!(store.booking_count(ymd(2024, 3, 15), "11:00 AM"), 1);
        assert_eq!(storage.get(STORAGE_KEY), None);
    }

    #[test]
    fn reload_round_trips() {
        let (storage, mut store) = empty_store();
        store.confirm_booking(ymd(2024, 3, 15), "10:00 AM").unwrap();
        store.confirm_booking(ymd(2024, 3, 15), "12:30 PM").unwrap();
        store.confirm_booking(ymd(2024, 12, 31), "5:00 PM").unwrap();
        store.confirm_booking(ymd(2024, 12, 31), "5:00 PM").unwrap();

        let reloaded = BookingStore::load(storage);
        assert_eq!(reloaded.bookings(), store.bookings());
        assert_eq!(reloaded.booking_count(ymd(2024, 12, 31), "5:00 PM"), 2);
    }

    #[test]
    fn reset_clears_memory_and_record() {
        let (storage, mut store) = empty_store();
        store.confirm_booking(ymd(2024, 3, 15), "10:00 AM").unwrap();
        assert!(storage.get(STORAGE_KEY).is_some());

        assert!(store.reset_all());
        assert!(store.bookings().is_empty());
        assert_eq!(storage.get(STORAGE_KEY), None);
        assert!(BookingStore::load(storage).bookings().is_empty());
    }

    #[test]
    fn failed_reset_still_clears_memory() {
        let (storage, mut store) = empty_store();
        store.confirm_booking(ymd(2024, 3, 15), "10:00 AM").unwrap();
        storage.set_fail_writes(true);

        assert!(!store.reset_all());
        assert!(store.bookings().is_empty());
        assert_eq!(store.booking_count(ymd(2024, 3, 15), "10:00 AM"), 0);
        assert!(storage.get(STORAGE_KEY).is_some());
    }

    #[test]
    fn day_slots_cover_whole_window() {
        let (_, mut store) = empty_store();
        let date = ymd(2024, 3, 15);
        for _ in 0..SLOT_CAPACITY {
            store.confirm_booking(date, "1:00 PM").unwrap();
        }

        let slots = store.day_slots(date);
        assert_eq!(slots.len(), time_slots().len());
        let one_pm = slots.iter().find(|slot| slot.time == "1:00 PM").unwrap();
        assert!(one_pm.full);
        assert!(slots.iter().filter(|slot| slot.time != "1:00 PM").all(|slot| slot.count == 0 && !slot.full));
    }
}
