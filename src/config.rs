use std::env;

use anyhow::{bail, Context};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    /// Artificial delay applied to every store call.
    pub store_latency_ms: u64,
    pub seed_demo_data: bool,

    /// Required by the reminder trigger; the endpoint is disabled without it.
    pub admin_token: Option<String>,
    /// Daily reminder worker runs at this UTC hour when set.
    pub reminder_hour_utc: Option<u32>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_source(|key| env::var(key).ok())
    }

    pub fn from_source<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match var("PORT") {
            Some(p) => p.parse().context("PORT must be a number")?,
            None => 8080,
        };
        let store_latency_ms = match var("STORE_LATENCY_MS") {
            Some(ms) => ms.parse().context("STORE_LATENCY_MS must be a number")?,
            None => 0,
        };
        let reminder_hour_utc = match var("REMINDER_HOUR_UTC") {
            Some(h) => {
                let hour: u32 = h.parse().context("REMINDER_HOUR_UTC must be a number")?;
                if hour > 23 {
                    bail!("REMINDER_HOUR_UTC must be between 0 and 23");
                }
                Some(hour)
            }
            None => None,
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            frontend_url: var("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".into()),
            cors_extra_origins: var("CORS_EXTRA_ORIGINS")
                .map(|extra| {
                    extra
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            store_latency_ms,
            seed_demo_data: var("SEED_DEMO_DATA")
                .map(|v| v.parse().unwrap_or(true))
                .unwrap_or(true),
            admin_token: var("ADMIN_TOKEN"),
            reminder_hour_utc,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.listen_addr(), "0.0.0.0:8080");
        assert_eq!(cfg.frontend_url, "http://localhost:3000");
        assert_eq!(cfg.store_latency_ms, 0);
        assert!(cfg.seed_demo_data);
        assert!(cfg.admin_token.is_none());
        assert!(cfg.reminder_hour_utc.is_none());
        assert!(cfg.cors_extra_origins.is_empty());
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("PORT", "9000"),
            ("STORE_LATENCY_MS", "500"),
            ("SEED_DEMO_DATA", "false"),
            ("ADMIN_TOKEN", "s3cret"),
            ("REMINDER_HOUR_UTC", "21"),
            ("CORS_EXTRA_ORIGINS", "http://10.0.0.2:3000, ,http://10.0.0.3:3000"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.store_latency_ms, 500);
        assert!(!cfg.seed_demo_data);
        assert_eq!(cfg.admin_token.as_deref(), Some("s3cret"));
        assert_eq!(cfg.reminder_hour_utc, Some(21));
        assert_eq!(cfg.cors_extra_origins.len(), 2);
    }

    #[test]
    fn test_rejects_bad_numbers() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("REMINDER_HOUR_UTC", "24")]).is_err());
        assert!(config(&[("STORE_LATENCY_MS", "-1")]).is_err());
    }

    #[test]
    fn test_blank_admin_token_is_absent() {
        let cfg = config(&[("ADMIN_TOKEN", "   ")]).unwrap();
        assert!(cfg.admin_token.is_none());
    }
}
