/// The fixed set of bookable time slots offered by every venue. The booking
/// form renders from this list and submissions are validated against it.
pub const TIME_SLOTS: &[&str] = &[
    "12:00 PM", "12:30 PM", "1:00 PM", "1:30 PM", "2:00 PM", "2:30 PM",
    "6:00 PM", "6:30 PM", "7:00 PM", "7:30 PM", "8:00 PM", "8:30 PM",
    "9:00 PM", "9:30 PM",
];

pub fn is_valid_slot(time: &str) -> bool {
    TIME_SLOTS.contains(&time)
}
