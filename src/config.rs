use std::env;

/// Settings read once at startup. Missing values are kept as `None` so the
/// request path can report a configuration problem instead of crashing boot.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub email: String,
    pub password: String,
    pub server: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        AppConfig {
            port,
            database_url: env::var("DATABASE_URL").ok(),
            smtp: SmtpConfig::from_env(),
        }
    }
}

impl SmtpConfig {
    fn from_env() -> Option<Self> {
        let email = env::var("SMTP_EMAIL").ok()?;
        let password = env::var("SMTP_PASSWORD").ok()?;
        let server = env::var("SMTP_SERVER").unwrap_or_else(|_| "smtp.gmail.com".to_string());
        let port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .ok()?;

        Some(SmtpConfig {
            email,
            password,
            server,
            port,
        })
    }
}
