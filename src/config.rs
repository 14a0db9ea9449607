//! Configuration types.

use std::time::Duration;

use rust_decimal::Decimal;

use crate::consultation::presentation::SettleDelays;
use crate::consultation::session::SEED_MEASUREMENT;
use crate::error::ConfigError;

/// Which adapter the binary runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Interactive terminal session.
    #[default]
    Cli,
    /// REST API on `port`.
    Http,
}

impl std::str::FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cli" => Ok(Self::Cli),
            "http" => Ok(Self::Http),
            other => Err(format!("unknown run mode '{other}' (expected cli or http)")),
        }
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "cli"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Consultation service configuration.
#[derive(Debug, Clone)]
pub struct ConsultConfig {
    pub mode: RunMode,
    /// Port for the REST API in HTTP mode.
    pub port: u16,
    /// Measurement a fresh session starts with.
    pub seed_measurement: Decimal,
    /// Speaker hand-off pauses used by the terminal adapter.
    pub settle: SettleDelays,
    /// Fixed seed for receipt codes; entropy when unset.
    pub receipt_seed: Option<u64>,
}

impl Default for ConsultConfig {
    fn default() -> Self {
        Self {
            mode: RunMode::Cli,
            port: 8080,
            seed_measurement: SEED_MEASUREMENT,
            settle: SettleDelays::default(),
            receipt_seed: None,
        }
    }
}

impl ConsultConfig {
    pub const ENV_PREFIX: &'static str = "RENO_CONSULT_";

    /// Read `RENO_CONSULT_*` variables from the process environment.
    pub fn from_env() -> crate::error::Result<Self> {
        Ok(Self::from_lookup(|key| std::env::var(key).ok())?)
    }

    /// Build from any key lookup. Unset keys keep their defaults.
    ///
    /// `SETTLE_MS` sets the plain hand-off pause; the diagnosis pause keeps
    /// its 100 ms lead over it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |name: &str| lookup(&format!("{}{name}", Self::ENV_PREFIX));

        if let Some(raw) = get("MODE") {
            config.mode = raw.parse().map_err(|message| invalid("MODE", message))?;
        }
        if let Some(raw) = get("PORT") {
            config.port = parse_number("PORT", &raw)?;
        }
        if let Some(raw) = get("SETTLE_MS") {
            let ms: u64 = parse_number("SETTLE_MS", &raw)?;
            config.settle = SettleDelays {
                advance: Duration::from_millis(ms),
                diagnosis: Duration::from_millis(ms.saturating_add(100)),
            };
        }
        if let Some(raw) = get("RECEIPT_SEED") {
            config.receipt_seed = Some(parse_number("RECEIPT_SEED", &raw)?);
        }

        Ok(config)
    }
}

fn parse_number<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| invalid(key, format!("'{raw}': {e}")))
}

fn invalid(key: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: format!("{}{key}", ConsultConfig::ENV_PREFIX),
        message,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rust_decimal_macros::dec;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let c = ConsultConfig::default();
        assert_eq!(c.mode, RunMode::Cli);
        assert_eq!(c.port, 8080);
        assert_eq!(c.seed_measurement, dec!(15));
        assert_eq!(c.settle.advance, Duration::from_millis(500));
        assert_eq!(c.settle.diagnosis, Duration::from_millis(600));
        assert!(c.receipt_seed.is_none());
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let c = ConsultConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(c.port, 8080);
        assert_eq!(c.mode, RunMode::Cli);
    }

    #[test]
    fn reads_prefixed_variables() {
        let c = ConsultConfig::from_lookup(lookup(&[
            ("RENO_CONSULT_MODE", "HTTP"),
            ("RENO_CONSULT_PORT", "9090"),
            ("RENO_CONSULT_SETTLE_MS", "0"),
            ("RENO_CONSULT_RECEIPT_SEED", "42"),
        ]))
        .unwrap();
        assert_eq!(c.mode, RunMode::Http);
        assert_eq!(c.port, 9090);
        assert_eq!(c.settle.advance, Duration::ZERO);
        assert_eq!(c.settle.diagnosis, Duration::from_millis(100));
        assert_eq!(c.receipt_seed, Some(42));
    }

    #[test]
    fn bad_values_name_the_variable() {
        let err = ConsultConfig::from_lookup(lookup(&[("RENO_CONSULT_PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("RENO_CONSULT_PORT"));

        let err = ConsultConfig::from_lookup(lookup(&[("RENO_CONSULT_MODE", "gui")])).unwrap_err();
        assert!(err.to_string().contains("unknown run mode"));
    }
}
