pub mod booking;
pub mod council;

pub use booking::{BinRequest, Booking, BookingOutcome, BookingStatus};
pub use council::CouncilLookup;
