//! Configuration types for seat allocation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every type has a
//! `Default` carrying the standard policy so the engine also runs without
//! a configuration directory.

use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{WfhLimits, normalize_designation};

/// Distance normalisation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistancePolicy {
    /// Distance that yields exactly `weight` points. Not a clamp.
    pub reference: Decimal,
    /// Points awarded at the reference distance.
    pub weight: Decimal,
}

impl Default for DistancePolicy {
    fn default() -> Self {
        Self {
            reference: Decimal::new(20, 0),
            weight: Decimal::new(2, 0),
        }
    }
}

/// WFH usage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WfhPolicy {
    /// Points for a fully unused allowance.
    pub weight: Decimal,
    /// Extra points when no WFH day was used yet.
    pub unused_boost: Decimal,
    /// Extra points when usage is below `low_usage_threshold`.
    pub low_usage_boost: Decimal,
    /// Usage fraction under which `low_usage_boost` applies.
    pub low_usage_threshold: Decimal,
}

impl Default for WfhPolicy {
    fn default() -> Self {
        Self {
            weight: Decimal::new(5, 0),
            unused_boost: Decimal::new(3, 0),
            low_usage_boost: Decimal::new(2, 0),
            low_usage_threshold: Decimal::new(25, 2),
        }
    }
}

/// Priority scoring policy from scoring.yaml.
///
/// # Example
///
/// ```
/// use seat_allocator::config::ScoringPolicy;
/// use rust_decimal::Decimal;
///
/// let policy = ScoringPolicy::default();
/// assert_eq!(policy.base_priority("Manager"), Decimal::new(5, 0));
/// assert_eq!(policy.base_priority("contractor"), Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Base points by lower-cased designation. Unlisted designations get 0.
    pub designation_priorities: BTreeMap<String, Decimal>,
    /// Distance factor settings.
    #[serde(default)]
    pub distance: DistancePolicy,
    /// WFH factor settings.
    #[serde(default)]
    pub wfh: WfhPolicy,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        let designation_priorities = [("manager", 5), ("senior", 3), ("junior", 1), ("intern", 1)]
            .into_iter()
            .map(|(designation, points)| (designation.to_string(), Decimal::new(points, 0)))
            .collect();

        Self {
            designation_priorities,
            distance: DistancePolicy::default(),
            wfh: WfhPolicy::default(),
        }
    }
}

impl ScoringPolicy {
    /// Returns the base priority for a designation, ignoring case.
    pub fn base_priority(&self, designation: &str) -> Decimal {
        self.designation_priorities
            .get(&normalize_designation(designation))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Returns a copy with company-specific designation points applied.
    pub fn with_overrides(&self, overrides: &BTreeMap<String, Decimal>) -> ScoringPolicy {
        let mut policy = self.clone();
        for (designation, points) in overrides {
            policy
                .designation_priorities
                .insert(normalize_designation(designation), *points);
        }
        policy
    }

    /// Re-keys the priority table to lower case.
    pub fn normalized(mut self) -> ScoringPolicy {
        self.designation_priorities = self
            .designation_priorities
            .into_iter()
            .map(|(designation, points)| (normalize_designation(&designation), points))
            .collect();
        self
    }

    /// Rejects settings that would divide by zero or invert the policy.
    pub fn validate(&self) -> EngineResult<()> {
        if self.distance.reference <= Decimal::ZERO {
            return Err(EngineError::configuration(format!(
                "distance reference must be positive, got {}",
                self.distance.reference
            )));
        }
        let weights = [
            ("distance.weight", self.distance.weight),
            ("wfh.weight", self.wfh.weight),
            ("wfh.unused_boost", self.wfh.unused_boost),
            ("wfh.low_usage_boost", self.wfh.low_usage_boost),
            ("wfh.low_usage_threshold", self.wfh.low_usage_threshold),
        ];
        if let Some((name, value)) = weights.iter().find(|(_, value)| *value < Decimal::ZERO) {
            return Err(EngineError::configuration(format!(
                "{} must not be negative, got {}",
                name, value
            )));
        }
        Ok(())
    }
}

/// WFH limits file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WfhLimitsConfig {
    /// Global monthly caps by designation.
    pub limits: WfhLimits,
}

impl WfhLimitsConfig {
    /// Standard caps: 4 for managers, 6 for seniors, 8 otherwise.
    pub fn standard() -> Self {
        Self {
            limits: WfhLimits::from_iter([
                ("manager", 4),
                ("senior", 6),
                ("junior", 8),
                ("intern", 8),
            ]),
        }
    }
}

/// Retry settings for the Load step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts per read, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles afterwards.
    pub initial_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 200,
        }
    }
}

impl RetryPolicy {
    /// Retries without sleeping.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff_ms: 0,
        }
    }

    /// Delay to wait after the given failed attempt (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.initial_backoff_ms.saturating_mul(factor))
    }
}

/// Pacing of persistence writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottlePolicy {
    /// Writes per batch. 0 disables throttling.
    pub batch_size: usize,
    /// Pause after each full batch.
    pub delay_ms: u64,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            batch_size: 5,
            delay_ms: 300,
        }
    }
}

impl ThrottlePolicy {
    /// No pacing at all.
    pub fn disabled() -> Self {
        Self {
            batch_size: 0,
            delay_ms: 0,
        }
    }

    /// Returns the pause, or `None` when throttling is off.
    pub fn delay(&self) -> Option<Duration> {
        (self.batch_size > 0 && self.delay_ms > 0).then(|| Duration::from_millis(self.delay_ms))
    }
}

/// Scheduled run settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Companies allocated at the same time.
    pub max_concurrent_companies: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_companies: 4,
        }
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host or IP address to bind.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// Resolves the bind address. `localhost` maps to 127.0.0.1.
    pub fn socket_addr(&self) -> EngineResult<SocketAddr> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self.host.parse().map_err(|_| {
            EngineError::configuration(format!(
                "server host '{}' must be an IPv4 or IPv6 address",
                self.host
            ))
        })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Runtime configuration from runtime.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Load-step retries.
    #[serde(default)]
    pub retry: RetryPolicy,
    /// Write pacing.
    #[serde(default)]
    pub throttle: ThrottlePolicy,
    /// Scheduled run settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            throttle: ThrottlePolicy::default(),
            scheduler: SchedulerConfig::default(),
            server: ServerConfig::default(),
            log_level: default_log_level(),
        }
    }
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    scoring: ScoringPolicy,
    wfh_limits: WfhLimits,
    runtime: RuntimeConfig,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts, normalising
    /// designation keys.
    pub fn new(scoring: ScoringPolicy, wfh_limits: WfhLimits, runtime: RuntimeConfig) -> Self {
        Self {
            scoring: scoring.normalized(),
            wfh_limits: wfh_limits.normalized(),
            runtime,
        }
    }

    /// Returns the scoring policy.
    pub fn scoring(&self) -> &ScoringPolicy {
        &self.scoring
    }

    /// Returns the global WFH limits.
    pub fn wfh_limits(&self) -> &WfhLimits {
        &self.wfh_limits
    }

    /// Returns the runtime configuration.
    pub fn runtime(&self) -> &RuntimeConfig {
        &self.runtime
    }

    /// Returns a mutable runtime configuration, for CLI overrides.
    pub fn runtime_mut(&mut self) -> &mut RuntimeConfig {
        &mut self.runtime
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(
            ScoringPolicy::default(),
            WfhLimitsConfig::standard().limits,
            RuntimeConfig::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_priority_table() {
        let policy = ScoringPolicy::default();
        assert_eq!(policy.base_priority("manager"), Decimal::new(5, 0));
        assert_eq!(policy.base_priority("SENIOR"), Decimal::new(3, 0));
        assert_eq!(policy.base_priority("junior"), Decimal::new(1, 0));
        assert_eq!(policy.base_priority("Intern"), Decimal::new(1, 0));
        assert_eq!(policy.base_priority("ceo"), Decimal::ZERO);
    }

    #[test]
    fn test_company_overrides_apply_case_insensitively() {
        let overrides = BTreeMap::from([("Intern".to_string(), Decimal::new(2, 0))]);
        let policy = ScoringPolicy::default().with_overrides(&overrides);

        assert_eq!(policy.base_priority("intern"), Decimal::new(2, 0));
        assert_eq!(policy.base_priority("manager"), Decimal::new(5, 0));
    }

    #[test]
    fn test_zero_reference_distance_is_rejected() {
        let mut policy = ScoringPolicy::default();
        policy.distance.reference = Decimal::ZERO;

        assert!(matches!(
            policy.validate(),
            Err(EngineError::Configuration { .. })
        ));
    }

    #[test]
    fn test_negative_weight_is_rejected() {
        let mut policy = ScoringPolicy::default();
        policy.wfh.weight = Decimal::new(-1, 0);

        let err = policy.validate().unwrap_err();
        assert!(err.to_string().contains("wfh.weight"));
    }

    #[test]
    fn test_retry_backoff_doubles() {
        let retry = RetryPolicy {
            max_attempts: 4,
            initial_backoff_ms: 100,
        };
        assert_eq!(retry.backoff(1), Duration::from_millis(100));
        assert_eq!(retry.backoff(2), Duration::from_millis(200));
        assert_eq!(retry.backoff(3), Duration::from_millis(400));
    }

    #[test]
    fn test_throttle_disabled_has_no_delay() {
        assert_eq!(ThrottlePolicy::disabled().delay(), None);
        assert_eq!(
            ThrottlePolicy::default().delay(),
            Some(Duration::from_millis(300))
        );
    }

    #[test]
    fn test_server_socket_addr_localhost() {
        let server = ServerConfig {
            host: "localhost".to_string(),
            port: 8080,
        };
        assert_eq!(server.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_server_socket_addr_rejects_hostname() {
        let server = ServerConfig {
            host: "office.example".to_string(),
            port: 8080,
        };
        assert!(server.socket_addr().is_err());
    }

    #[test]
    fn test_runtime_config_fills_defaults() {
        let runtime: RuntimeConfig = serde_yaml::from_str("log_level: debug\n").unwrap();
        assert_eq!(runtime.log_level, "debug");
        assert_eq!(runtime.retry, RetryPolicy::default());
        assert_eq!(runtime.throttle.batch_size, 5);
    }
}
