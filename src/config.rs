use std::env;

pub const DEFAULT_PAYMENT_IBAN: &str = "005500006717018310113";
pub const DEFAULT_CERTIFICATE_PRICE: i64 = 1000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Account shown to users for the manual bank transfer.
    pub payment_iban: String,
    /// Flat price charged for a course certificate.
    pub certificate_price: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let payment_iban =
            env::var("PAYMENT_IBAN").unwrap_or_else(|_| DEFAULT_PAYMENT_IBAN.to_string());
        let certificate_price = env::var("CERTIFICATE_PRICE")
            .ok()
            .and_then(|p| p.parse::<i64>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(DEFAULT_CERTIFICATE_PRICE);
        Ok(Self {
            port,
            database_url,
            host,
            payment_iban,
            certificate_price,
        })
    }

    /// Config for tests and tooling that only need a database.
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            payment_iban: DEFAULT_PAYMENT_IBAN.to_string(),
            certificate_price: DEFAULT_CERTIFICATE_PRICE,
        }
    }
}
