// Core types for the datetool date/time server

pub mod catalog;
pub mod clock;
pub mod error;
pub mod time;
pub mod types;

pub use catalog::{discovery_document, DATE_PATH};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{TimeError, TimeResult};
pub use time::{TimeSnapshot, DEFAULT_UTC_OFFSET_HOURS};
pub use types::*;
