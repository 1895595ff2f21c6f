use crate::clock::Clock;
use crate::session::BookingSession;
use crate::store::BookingStore;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handler state. Lock `session` before `store` when both are needed.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<BookingSession>>,
    pub store: Arc<Mutex<BookingStore>>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Takes an already loaded store, so no request is served before the
    /// persisted bookings have been read.
    pub fn new(store: BookingStore, clock: Arc<dyn Clock>) -> Self {
        let session = BookingSession::new(clock.today());
        Self {
            session: Arc::new(Mutex::new(session)),
            store: Arc::new(Mutex::new(store)),
            clock,
        }
    }
}
