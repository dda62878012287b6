//! Shop configuration: layout, population, pacing and admission policy.
//!
//! Loaded from JSON, from `BARBERSHOP_*` environment variables, or from a
//! `.env`-style file. Every loader validates before returning.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Upper bound on generated clients. Every client is an OS thread.
pub const MAX_CLIENT_COUNT: u32 = 4096;

const DEFAULT_SERVICE_TIME_UNIT_MS: u64 = 100;
const DEFAULT_ACTOR_STACK_SIZE: usize = 256 * 1024;
const MIN_ACTOR_STACK_SIZE: usize = 16 * 1024;

/// What a client does when every waiting place is taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionPolicy {
    /// Leave immediately.
    #[default]
    Balk,
    /// Block until a place frees up. Rejected only if the shop closes.
    Wait,
}

impl std::str::FromStr for AdmissionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "balk" => Ok(Self::Balk),
            "wait" => Ok(Self::Wait),
            other => Err(format!("unknown admission policy `{other}`")),
        }
    }
}

/// Shop configuration.
///
/// Standing room is given either directly through `standing_capacity` or as
/// the total waiting capacity `shop_capacity`, from which the sofa is
/// subtracted. Giving both is allowed only when they agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Number of barbers (and chairs).
    pub barber_count: u32,
    /// Sofa places.
    pub sofa_capacity: usize,
    /// Standing places.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standing_capacity: Option<usize>,
    /// Total waiting places, sofa included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_capacity: Option<usize>,
    /// Clients generated over the run.
    pub client_count: u32,
    /// Base time unit for simulated work, in milliseconds.
    #[serde(default = "default_service_time_unit_ms")]
    pub service_time_unit_ms: u64,
    /// Behaviour on a full shop.
    #[serde(default)]
    pub admission: AdmissionPolicy,
    /// Stack size for barber and client threads, in bytes.
    #[serde(default = "default_actor_stack_size")]
    pub actor_stack_size: usize,
}

const fn default_service_time_unit_ms() -> u64 {
    DEFAULT_SERVICE_TIME_UNIT_MS
}

const fn default_actor_stack_size() -> usize {
    DEFAULT_ACTOR_STACK_SIZE
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            barber_count: 3,
            sofa_capacity: 4,
            standing_capacity: Some(16),
            shop_capacity: None,
            client_count: 20,
            service_time_unit_ms: DEFAULT_SERVICE_TIME_UNIT_MS,
            admission: AdmissionPolicy::Balk,
            actor_stack_size: DEFAULT_ACTOR_STACK_SIZE,
        }
    }
}

impl ShopConfig {
    /// Default layout: 3 barbers, 4 on the sofa, 16 standing, 20 clients.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of barbers.
    #[must_use]
    pub const fn with_barbers(mut self, count: u32) -> Self {
        self.barber_count = count;
        self
    }

    /// Set the sofa capacity.
    #[must_use]
    pub const fn with_sofa_capacity(mut self, capacity: usize) -> Self {
        self.sofa_capacity = capacity;
        self
    }

    /// Set standing room directly. Clears any total shop capacity.
    #[must_use]
    pub const fn with_standing_capacity(mut self, capacity: usize) -> Self {
        self.standing_capacity = Some(capacity);
        self.shop_capacity = None;
        self
    }

    /// Set total waiting capacity. Clears any direct standing capacity.
    #[must_use]
    pub const fn with_shop_capacity(mut self, capacity: usize) -> Self {
        self.shop_capacity = Some(capacity);
        self.standing_capacity = None;
        self
    }

    /// Set the number of generated clients.
    #[must_use]
    pub const fn with_clients(mut self, count: u32) -> Self {
        self.client_count = count;
        self
    }

    /// Set the simulated time unit.
    #[must_use]
    pub const fn with_service_time_unit_ms(mut self, unit_ms: u64) -> Self {
        self.service_time_unit_ms = unit_ms;
        self
    }

    /// Set the admission policy.
    #[must_use]
    pub const fn with_admission(mut self, policy: AdmissionPolicy) -> Self {
        self.admission = policy;
        self
    }

    /// Set the barber and client thread stack size.
    #[must_use]
    pub const fn with_actor_stack_size(mut self, bytes: usize) -> Self {
        self.actor_stack_size = bytes;
        self
    }

    /// Standing places after resolving `standing_capacity` / `shop_capacity`.
    ///
    /// # Errors
    ///
    /// Fails when neither is given, when the sofa does not fit in the shop,
    /// or when both are given and disagree.
    pub fn standing_places(&self) -> Result<usize, String> {
        match (self.standing_capacity, self.shop_capacity) {
            (None, None) => Err("one of standing_capacity or shop_capacity must be set".into()),
            (Some(standing), None) => Ok(standing),
            (None, Some(total)) => total.checked_sub(self.sofa_capacity).ok_or_else(|| {
                format!(
                    "sofa_capacity ({}) exceeds shop_capacity ({total})",
                    self.sofa_capacity
                )
            }),
            (Some(standing), Some(total)) => {
                if self.sofa_capacity.checked_add(standing) == Some(total) {
                    Ok(standing)
                } else {
                    Err(format!(
                        "shop_capacity ({total}) disagrees with sofa_capacity ({}) + standing_capacity ({standing})",
                        self.sofa_capacity
                    ))
                }
            }
        }
    }

    /// Total waiting places, sofa plus standing.
    ///
    /// # Errors
    ///
    /// Same as [`standing_places`](Self::standing_places).
    pub fn waiting_capacity(&self) -> Result<usize, String> {
        let standing = self.standing_places()?;
        self.sofa_capacity
            .checked_add(standing)
            .ok_or_else(|| "waiting capacity overflows".to_string())
    }

    /// Simulated time unit as a [`Duration`].
    #[must_use]
    pub const fn service_time_unit(&self) -> Duration {
        Duration::from_millis(self.service_time_unit_ms)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if self.barber_count == 0 {
            return Err("barber_count must be greater than 0".into());
        }
        if self.sofa_capacity == 0 {
            return Err("sofa_capacity must be greater than 0".into());
        }
        if self.client_count == 0 {
            return Err("client_count must be greater than 0".into());
        }
        if self.client_count > MAX_CLIENT_COUNT {
            return Err(format!(
                "client_count must not exceed {MAX_CLIENT_COUNT}, got {}",
                self.client_count
            ));
        }
        if self.service_time_unit_ms == 0 {
            return Err("service_time_unit_ms must be greater than 0".into());
        }
        if self.actor_stack_size < MIN_ACTOR_STACK_SIZE {
            return Err(format!(
                "actor_stack_size must be at least {MIN_ACTOR_STACK_SIZE} bytes"
            ));
        }
        self.waiting_capacity().map(|_| ())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation message.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build from `BARBERSHOP_*` process environment variables, falling back
    /// to defaults for anything unset, and validate.
    ///
    /// # Errors
    ///
    /// Returns a message naming the malformed variable or invalid value.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) but reads a `.env`-style file
    /// without touching the process environment.
    ///
    /// # Errors
    ///
    /// Returns a message if the file cannot be read or a value is invalid.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let iter = dotenvy::from_path_iter(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        let mut vars = std::collections::HashMap::new();
        for item in iter {
            let (key, value) = item.map_err(|e| format!("{}: {e}", path.display()))?;
            vars.insert(key, value);
        }
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, String>
        where
            T::Err: std::fmt::Display,
        {
            raw.trim()
                .parse()
                .map_err(|e| format!("{key}: invalid value `{raw}`: {e}"))
        }

        let mut cfg = Self::default();
        if let Some(raw) = lookup("BARBERSHOP_BARBERS") {
            cfg.barber_count = parse("BARBERSHOP_BARBERS", &raw)?;
        }
        if let Some(raw) = lookup("BARBERSHOP_SOFA_CAPACITY") {
            cfg.sofa_capacity = parse("BARBERSHOP_SOFA_CAPACITY", &raw)?;
        }
        if let Some(raw) = lookup("BARBERSHOP_SHOP_CAPACITY") {
            cfg = cfg.with_shop_capacity(parse("BARBERSHOP_SHOP_CAPACITY", &raw)?);
        }
        if let Some(raw) = lookup("BARBERSHOP_STANDING_CAPACITY") {
            cfg.standing_capacity = Some(parse("BARBERSHOP_STANDING_CAPACITY", &raw)?);
        }
        if let Some(raw) = lookup("BARBERSHOP_CLIENTS") {
            cfg.client_count = parse("BARBERSHOP_CLIENTS", &raw)?;
        }
        if let Some(raw) = lookup("BARBERSHOP_SERVICE_UNIT_MS") {
            cfg.service_time_unit_ms = parse("BARBERSHOP_SERVICE_UNIT_MS", &raw)?;
        }
        if let Some(raw) = lookup("BARBERSHOP_ADMISSION") {
            cfg.admission = parse("BARBERSHOP_ADMISSION", &raw)?;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_is_valid() {
        let cfg = ShopConfig::new();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.standing_places(), Ok(16));
        assert_eq!(cfg.waiting_capacity(), Ok(20));
        assert_eq!(cfg.service_time_unit(), Duration::from_millis(100));
    }

    #[test]
    fn test_rejects_zero_values() {
        assert!(ShopConfig::new().with_barbers(0).validate().is_err());
        assert!(ShopConfig::new().with_sofa_capacity(0).validate().is_err());
        assert!(ShopConfig::new().with_clients(0).validate().is_err());
        assert!(ShopConfig::new()
            .with_service_time_unit_ms(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_caps_client_count() {
        assert!(ShopConfig::new()
            .with_clients(MAX_CLIENT_COUNT)
            .validate()
            .is_ok());
        let err = ShopConfig::new()
            .with_clients(MAX_CLIENT_COUNT + 1)
            .validate()
            .unwrap_err();
        assert!(err.contains("client_count"));
    }

    #[test]
    fn test_rejects_tiny_stack() {
        assert!(ShopConfig::new()
            .with_actor_stack_size(1024)
            .validate()
            .is_err());
    }

    #[test]
    fn test_derives_standing_from_shop_capacity() {
        let cfg = ShopConfig::new().with_sofa_capacity(4).with_shop_capacity(20);
        assert_eq!(cfg.standing_places(), Ok(16));
        assert!(cfg.validate().is_ok());

        let exact = ShopConfig::new().with_sofa_capacity(4).with_shop_capacity(4);
        assert_eq!(exact.standing_places(), Ok(0));
    }

    #[test]
    fn test_sofa_larger_than_shop_is_invalid() {
        let err = ShopConfig::new()
            .with_sofa_capacity(5)
            .with_shop_capacity(4)
            .validate()
            .unwrap_err();
        assert!(err.contains("exceeds"));
    }

    #[test]
    fn test_missing_capacity_is_invalid() {
        let mut cfg = ShopConfig::new();
        cfg.standing_capacity = None;
        cfg.shop_capacity = None;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_both_capacities_must_agree() {
        let mut cfg = ShopConfig::new().with_sofa_capacity(4);
        cfg.standing_capacity = Some(16);
        cfg.shop_capacity = Some(20);
        assert_eq!(cfg.standing_places(), Ok(16));

        cfg.shop_capacity = Some(21);
        assert!(cfg.validate().unwrap_err().contains("disagrees"));
    }

    #[test]
    fn test_builders_clear_the_other_capacity() {
        let cfg = ShopConfig::new().with_shop_capacity(10);
        assert_eq!(cfg.standing_capacity, None);
        let cfg = cfg.with_standing_capacity(3);
        assert_eq!(cfg.shop_capacity, None);
        assert_eq!(cfg.standing_capacity, Some(3));
    }

    #[test]
    fn test_parses_json_with_defaults() {
        let cfg = ShopConfig::from_json_str(
            r#"{"barber_count":2,"sofa_capacity":1,"shop_capacity":2,"client_count":5}"#,
        )
        .unwrap();
        assert_eq!(cfg.barber_count, 2);
        assert_eq!(cfg.standing_places(), Ok(1));
        assert_eq!(cfg.service_time_unit_ms, DEFAULT_SERVICE_TIME_UNIT_MS);
        assert_eq!(cfg.admission, AdmissionPolicy::Balk);
    }

    #[test]
    fn test_json_admission_and_errors() {
        let cfg = ShopConfig::from_json_str(
            r#"{"barber_count":1,"sofa_capacity":1,"standing_capacity":0,"client_count":1,"admission":"wait"}"#,
        )
        .unwrap();
        assert_eq!(cfg.admission, AdmissionPolicy::Wait);

        assert!(ShopConfig::from_json_str("{")
            .unwrap_err()
            .starts_with("parse error"));
        assert!(ShopConfig::from_json_str(
            r#"{"barber_count":0,"sofa_capacity":1,"standing_capacity":0,"client_count":1}"#
        )
        .is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_layout() {
        let cfg = ShopConfig::new().with_shop_capacity(9);
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("standing_capacity"));
        assert_eq!(ShopConfig::from_json_str(&json).unwrap(), cfg);
    }

    #[test]
    fn test_env_lookup_overrides_defaults() {
        let cfg = ShopConfig::from_lookup(lookup_from(&[
            ("BARBERSHOP_BARBERS", "1"),
            ("BARBERSHOP_SOFA_CAPACITY", "2"),
            ("BARBERSHOP_SHOP_CAPACITY", "5"),
            ("BARBERSHOP_CLIENTS", " 7 "),
            ("BARBERSHOP_SERVICE_UNIT_MS", "5"),
            ("BARBERSHOP_ADMISSION", "Wait"),
        ]))
        .unwrap();
        assert_eq!(cfg.barber_count, 1);
        assert_eq!(cfg.standing_places(), Ok(3));
        assert_eq!(cfg.client_count, 7);
        assert_eq!(cfg.service_time_unit_ms, 5);
        assert_eq!(cfg.admission, AdmissionPolicy::Wait);
    }

    #[test]
    fn test_env_lookup_names_bad_variable() {
        let err = ShopConfig::from_lookup(lookup_from(&[("BARBERSHOP_CLIENTS", "lots")]))
            .unwrap_err();
        assert!(err.starts_with("BARBERSHOP_CLIENTS"));

        let err = ShopConfig::from_lookup(lookup_from(&[("BARBERSHOP_ADMISSION", "queue")]))
            .unwrap_err();
        assert!(err.contains("unknown admission policy"));
    }

    #[test]
    fn test_env_file_is_read_without_touching_process_env() {
        let path = std::env::temp_dir().join(format!(
            "barbershop-config-test-{}.env",
            std::process::id()
        ));
        std::fs::write(&path, "BARBERSHOP_BARBERS=4\nBARBERSHOP_STANDING_CAPACITY=2\n").unwrap();
        let cfg = ShopConfig::from_env_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(cfg.barber_count, 4);
        assert_eq!(cfg.standing_places(), Ok(2));

        assert!(ShopConfig::from_env_file("/definitely/not/here.env").is_err());
    }
}
