use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub default_venue: String,
    pub max_guests: i32,
    pub default_country_code: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_from: String,
    pub allowed_transitions: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "tablier.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            default_venue: env::var("DEFAULT_VENUE").unwrap_or_else(|_| "main".to_string()),
            max_guests: env::var("MAX_GUESTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            default_country_code: env::var("DEFAULT_COUNTRY_CODE")
                .unwrap_or_else(|_| "91".to_string()),
            mail_api_url: env::var("MAIL_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com/emails".to_string()),
            mail_api_key: env::var("MAIL_API_KEY").unwrap_or_default(),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "reservations@example.com".to_string()),
            allowed_transitions: env::var("ALLOWED_TRANSITIONS").ok(),
        }
    }
}
