use std::str::FromStr;

use anyhow::{Context, Result};
use axum::http::HeaderValue;

// ---------------------------------------------------------------------------
// AllowedOrigins
// ---------------------------------------------------------------------------

/// Origins permitted for cross-origin HTTP requests or realtime connections.
///
/// Parsed from either `"*"` or a comma-separated list such as
/// `"http://localhost:8081,https://station.example"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<HeaderValue>),
}

impl AllowedOrigins {
    /// Whether a browser `Origin` header value is permitted.
    pub fn allows(&self, origin: &HeaderValue) -> bool {
        match self {
            Self::Any => true,
            Self::List(origins) => origins.iter().any(|o| o == origin),
        }
    }
}

impl FromStr for AllowedOrigins {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim() == "*" {
            return Ok(Self::Any);
        }

        let origins = s
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(|o| {
                HeaderValue::from_str(o).with_context(|| format!("invalid origin: {o:?}"))
            })
            .collect::<Result<Vec<_>>>()?;

        if origins.is_empty() {
            anyhow::bail!("origin list must be \"*\" or contain at least one origin");
        }
        if origins.iter().any(|o| o == "*") {
            anyhow::bail!("\"*\" cannot be combined with other origins");
        }
        Ok(Self::List(origins))
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Upper bound on token lifetime: one year.
pub const MAX_JWT_TTL_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Session token lifetime in seconds.
    pub jwt_ttl_secs: u64,
    /// bcrypt cost factor used when hashing new passwords.
    pub bcrypt_cost: u32,
    pub server_host: String,
    pub server_port: u16,
    /// Device path, e.g. `/dev/ttyACM0` or `COM4`.
    pub serial_port: String,
    pub serial_baud_rate: u32,
    pub cors_origins: AllowedOrigins,
    pub realtime_origins: AllowedOrigins,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup, `from_env` being the
    /// process-environment case.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            lookup(key).with_context(|| format!("missing required env var: {key}"))
        };
        let optional =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        let bcrypt_cost: u32 = optional("BCRYPT_COST", "12")
            .parse()
            .context("BCRYPT_COST must be an integer")?;
        if !(4..=31).contains(&bcrypt_cost) {
            anyhow::bail!("BCRYPT_COST must be between 4 and 31");
        }

        let jwt_ttl_secs: u64 = optional("JWT_TTL_SECS", "3600")
            .parse()
            .context("JWT_TTL_SECS must be a positive integer")?;
        if jwt_ttl_secs == 0 || jwt_ttl_secs > MAX_JWT_TTL_SECS {
            anyhow::bail!("JWT_TTL_SECS must be between 1 and {MAX_JWT_TTL_SECS}");
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl_secs,
            bcrypt_cost,
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: optional("PORT", "3000")
                .parse()
                .context("PORT must be a valid port number")?,
            serial_port: optional("SERIAL_PORT", "/dev/ttyACM0"),
            serial_baud_rate: optional("SERIAL_BAUD_RATE", "9600")
                .parse()
                .context("SERIAL_BAUD_RATE must be a positive integer")?,
            cors_origins: optional("CORS_ALLOWED_ORIGINS", "*")
                .parse()
                .context("CORS_ALLOWED_ORIGINS is malformed")?,
            realtime_origins: optional("REALTIME_ALLOWED_ORIGINS", "*")
                .parse()
                .context("REALTIME_ALLOWED_ORIGINS is malformed")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let mut vars: HashMap<String, String> = [
            ("DATABASE_URL", "postgres://localhost/agro"),
            ("JWT_SECRET", "secret"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
        for (k, v) in pairs {
            vars.insert((*k).to_owned(), (*v).to_owned());
        }
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    fn config_without(key: &str) -> Result<Config> {
        let vars: HashMap<&str, &str> = [
            ("DATABASE_URL", "postgres://localhost/agro"),
            ("JWT_SECRET", "secret"),
        ]
        .into_iter()
        .filter(|(k, _)| *k != key)
        .collect();
        Config::from_lookup(|k| vars.get(k).map(|v| (*v).to_owned()))
    }

    /// Full error chain, so context and source messages can both be checked.
    fn chain(err: anyhow::Error) -> String {
        format!("{err:#}")
    }

    #[test]
    fn defaults_apply_when_only_required_vars_are_set() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.database_url, "postgres://localhost/agro");
        assert_eq!(config.jwt_secret, "secret");
        assert_eq!(config.bcrypt_cost, 12);
        assert_eq!(config.jwt_ttl_secs, 3600);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.serial_port, "/dev/ttyACM0");
        assert_eq!(config.serial_baud_rate, 9600);
        assert_eq!(config.cors_origins, AllowedOrigins::Any);
        assert_eq!(config.realtime_origins, AllowedOrigins::Any);
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("SERIAL_PORT", "COM4"),
            ("SERIAL_BAUD_RATE", "115200"),
            ("BCRYPT_COST", "10"),
            ("REALTIME_ALLOWED_ORIGINS", "http://localhost:8081"),
        ])
        .unwrap();

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.serial_port, "COM4");
        assert_eq!(config.serial_baud_rate, 115200);
        assert_eq!(config.bcrypt_cost, 10);
        assert!(matches!(config.realtime_origins, AllowedOrigins::List(_)));
    }

    #[test]
    fn missing_required_vars_are_named() {
        for key in ["DATABASE_URL", "JWT_SECRET"] {
            let err = config_without(key).unwrap_err();
            assert_eq!(err.to_string(), format!("missing required env var: {key}"));
        }
    }

    #[test]
    fn bcrypt_cost_out_of_range_fails() {
        for cost in ["3", "32"] {
            let err = config_from(&[("BCRYPT_COST", cost)]).unwrap_err();
            assert!(err.to_string().contains("BCRYPT_COST"), "{err}");
        }
        assert!(config_from(&[("BCRYPT_COST", "4")]).is_ok());
        assert!(config_from(&[("BCRYPT_COST", "31")]).is_ok());
    }

    #[test]
    fn malformed_numbers_name_their_variable() {
        for key in ["PORT", "SERIAL_BAUD_RATE", "BCRYPT_COST", "JWT_TTL_SECS"] {
            let err = config_from(&[(key, "abc")]).unwrap_err();
            assert!(err.to_string().contains(key), "{key}: {err}");
        }

        let err = config_from(&[("PORT", "70000")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn jwt_ttl_is_bounded() {
        assert!(config_from(&[("JWT_TTL_SECS", "0")]).is_err());
        let err = config_from(&[("JWT_TTL_SECS", "18446744073709551615")]).unwrap_err();
        assert!(err.to_string().contains("JWT_TTL_SECS"));
        assert_eq!(
            config_from(&[("JWT_TTL_SECS", "60")]).unwrap().jwt_ttl_secs,
            60
        );
    }

    #[test]
    fn malformed_origin_list_names_its_variable() {
        let err = config_from(&[("CORS_ALLOWED_ORIGINS", "http://localhost:8081,*")]).unwrap_err();
        assert!(err.to_string().contains("CORS_ALLOWED_ORIGINS"));
        assert!(chain(err).contains("cannot be combined"));
    }

    #[test]
    fn wildcard_mixed_with_origins_errors() {
        let err = "http://localhost:8081,*".parse::<AllowedOrigins>().unwrap_err();
        assert!(err.to_string().contains("cannot be combined"));

        let err = "*, http://localhost:8081".parse::<AllowedOrigins>().unwrap_err();
        assert!(err.to_string().contains("cannot be combined"));
    }

    #[test]
    fn wildcard_parses_to_any() {
        assert_eq!("*".parse::<AllowedOrigins>().unwrap(), AllowedOrigins::Any);
        assert_eq!(" * ".parse::<AllowedOrigins>().unwrap(), AllowedOrigins::Any);
    }

    #[test]
    fn origin_list_is_split_and_trimmed() {
        let origins: AllowedOrigins = "http://localhost:8081, https://station.example"
            .parse()
            .unwrap();
        assert_eq!(
            origins,
            AllowedOrigins::List(vec![
                HeaderValue::from_static("http://localhost:8081"),
                HeaderValue::from_static("https://station.example"),
            ])
        );
    }

    #[test]
    fn empty_origin_list_errors() {
        let err = " , ".parse::<AllowedOrigins>().unwrap_err();
        assert!(err.to_string().contains("at least one origin"));
    }

    #[test]
    fn list_only_allows_listed_origins() {
        let origins: AllowedOrigins = "http://localhost:8081".parse().unwrap();
        assert!(origins.allows(&HeaderValue::from_static("http://localhost:8081")));
        assert!(!origins.allows(&HeaderValue::from_static("http://evil.example")));
    }

    #[test]
    fn any_allows_everything() {
        assert!(AllowedOrigins::Any.allows(&HeaderValue::from_static("http://evil.example")));
    }
}
