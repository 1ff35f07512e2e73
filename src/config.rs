use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    pub council_calendar_url: String,
    pub poll_interval_secs: u64,
    pub scrape_timeout_secs: u64,
    pub resend_api_key: String,
    pub notify_email_from: String,
    pub notify_email_to: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "wheeliewash.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            council_calendar_url: env::var("COUNCIL_CALENDAR_URL")
                .unwrap_or_else(|_| "https://collections.ardsandnorthdown.gov.uk/".to_string()),
            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            scrape_timeout_secs: env::var("SCRAPE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(15),
            resend_api_key: env::var("RESEND_API_KEY").unwrap_or_default(),
            notify_email_from: env::var("NOTIFY_EMAIL_FROM")
                .unwrap_or_else(|_| "bookings@wheeliewash.co.uk".to_string()),
            notify_email_to: env::var("NOTIFY_EMAIL_TO").unwrap_or_default(),
        }
    }
}
