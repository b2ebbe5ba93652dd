/// Best-effort phone normalization for the messaging deep link: numbers that
/// do not already carry the default country calling code get it prepended,
/// then everything that is not a digit is stripped. Not full phone
/// validation.
pub fn normalize_for_deep_link(phone: &str, default_country_code: &str) -> String {
    let trimmed = phone.trim().trim_start_matches('+');
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();

    if trimmed.starts_with(default_country_code) {
        digits
    } else {
        format!("{default_country_code}{digits}")
    }
}

/// Deep link to the messaging app, pre-filled with the confirmation text.
pub fn deep_link_url(normalized_phone: &str, message: &str) -> String {
    format!(
        "https://wa.me/{normalized_phone}?text={}",
        urlencoding::encode(message)
    )
}
