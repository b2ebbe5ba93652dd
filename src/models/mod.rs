pub mod reservation;
pub mod slots;

pub use reservation::{BookingType, PaymentMethod, Reservation, ReservationStatus};
pub use slots::TIME_SLOTS;
