use crate::models::Reservation;

pub fn confirmation_subject(r: &Reservation) -> String {
    format!(
        "Your {} on {} is confirmed",
        r.booking_type.label(),
        r.date.format("%B %-d, %Y")
    )
}

/// Renders the guest-facing confirmation text. Optional details (table
/// number, special requests, add-ons) are each rendered as their own block
/// only when present, in that order, so an absent field never leaves a
/// dangling label.
pub fn render_confirmation(r: &Reservation) -> String {
    let mut out = String::new();

    out.push_str(&format!("Hi {},\n\n", r.name));
    out.push_str(&format!(
        "Your {} is confirmed. Here are the details:\n\n",
        r.booking_type.label()
    ));
    out.push_str(&format!("Date: {}\n", r.date.format("%Y-%m-%d")));
    out.push_str(&format!("Time: {}\n", r.time));
    out.push_str(&format!("Guests: {}\n", r.guests));

    if let Some(amount) = r.total_amount {
        out.push_str(&format!("Total: \u{20B9}{amount:.2}\n"));
    }

    if let Some(table) = r.table_number.as_deref().filter(|t| !t.is_empty()) {
        out.push_str(&format!("\nTable Number: {table}\n"));
    }

    if let Some(requests) = r.special_requests.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(&format!("\nSpecial Requests: {requests}\n"));
    }

    if !r.add_ons.is_empty() {
        out.push_str(&format!("\nAdd-ons: {}\n", r.add_ons.join(", ")));
    }

    out.push_str("\nWe look forward to serving you!\n");
    out
}
