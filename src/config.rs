//! Configuration types for sabnzbd-client

use crate::wake::MacAddress;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Main configuration for [`SabClient`](crate::client::SabClient)
///
/// One immutable value passed in at construction; there is no process-wide
/// state. Everything except the endpoint host has a usable default, so a
/// config file may omit whole sections.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SabConfig {
    /// Where the queue manager lives and how to probe it
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// API credentials, each part independently optional
    #[serde(default)]
    pub credentials: Credentials,

    /// Queue categories for routing submissions
    #[serde(default)]
    pub categories: CategoryConfig,

    /// Wake-on-LAN behavior for a sleeping download host
    #[serde(default)]
    pub wake: WakeConfig,

    /// Submit high-priority jobs as forced rather than normal priority
    #[serde(default)]
    pub forced_priority: bool,
}

/// Connection settings for the queue manager endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base URL of the API, including scheme and port
    /// (default: "http://localhost:8080/")
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port probed for reachability checks (default: 8080)
    #[serde(default = "default_probe_port")]
    pub probe_port: u16,

    /// Deadline for the full reachability probe (default: 60 seconds)
    ///
    /// `None` or zero waits for the service indefinitely; reserve that for
    /// callers that tolerate unbounded blocking. The quick pre-submission
    /// probe always uses a fixed 1-second deadline regardless of this
    /// setting.
    #[serde(default = "default_probe_timeout", with = "optional_duration_serde")]
    pub probe_timeout: Option<Duration>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            probe_port: default_probe_port(),
            probe_timeout: default_probe_timeout(),
        }
    }
}

/// API credentials
///
/// Absent or empty parts are omitted from requests entirely rather than
/// sent as empty values.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// HTTP username
    #[serde(default)]
    pub username: Option<String>,

    /// HTTP password
    #[serde(default)]
    pub password: Option<String>,

    /// API key
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Queue category identifiers
///
/// Unset (or empty) identifiers place no category constraint on the queue.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Category for regular shows
    #[serde(default)]
    pub standard: Option<String>,

    /// Category for anime shows
    #[serde(default)]
    pub anime: Option<String>,

    /// Category for regular shows with episodes past the backlog age
    #[serde(default)]
    pub backlog: Option<String>,

    /// Category for anime shows with episodes past the backlog age
    #[serde(default)]
    pub anime_backlog: Option<String>,

    /// Age in days beyond which an episode routes the job into a backlog
    /// category (default: 7)
    #[serde(default = "default_backlog_age_days")]
    pub backlog_age_days: i64,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        Self {
            standard: None,
            anime: None,
            backlog: None,
            anime_backlog: None,
            backlog_age_days: default_backlog_age_days(),
        }
    }
}

/// Wake-on-LAN configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WakeConfig {
    /// Probe the service before deciding whether to wake it
    #[serde(default)]
    pub wait_enabled: bool,

    /// Whether wake-on-LAN is available at all; when set without
    /// `wait_enabled`, every submission sends a wake signal
    #[serde(default)]
    pub wake_enabled: bool,

    /// Hardware address the wake signal is addressed to
    #[serde(default)]
    pub mac_address: Option<MacAddress>,

    /// Where the wake broadcast is sent (default: 255.255.255.255:9);
    /// override for directed-broadcast setups
    #[serde(default = "default_broadcast_addr")]
    pub broadcast_addr: SocketAddr,
}

impl Default for WakeConfig {
    fn default() -> Self {
        Self {
            wait_enabled: false,
            wake_enabled: false,
            mac_address: None,
            broadcast_addr: default_broadcast_addr(),
        }
    }
}

mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

// Default value functions

fn default_host() -> String {
    "http://localhost:8080/".to_string()
}

fn default_probe_port() -> u16 {
    8080
}

fn default_probe_timeout() -> Option<Duration> {
    Some(Duration::from_secs(60))
}

fn default_backlog_age_days() -> i64 {
    7
}

fn default_broadcast_addr() -> SocketAddr {
    SocketAddr::from(([255, 255, 255, 255], 9))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_deserializes_with_defaults() {
        let config: SabConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.endpoint.host, "http://localhost:8080/");
        assert_eq!(config.endpoint.probe_port, 8080);
        assert_eq!(config.endpoint.probe_timeout, Some(Duration::from_secs(60)));
        assert_eq!(config.categories.backlog_age_days, 7);
        assert!(!config.wake.wait_enabled);
        assert!(!config.wake.wake_enabled);
        assert_eq!(
            config.wake.broadcast_addr,
            SocketAddr::from(([255, 255, 255, 255], 9))
        );
        assert!(!config.forced_priority);
    }

    #[test]
    fn probe_timeout_round_trips_as_seconds() {
        let endpoint = EndpointConfig {
            probe_timeout: Some(Duration::from_secs(90)),
            ..Default::default()
        };
        let json = serde_json::to_value(&endpoint).unwrap();
        assert_eq!(json["probe_timeout"], 90);

        let back: EndpointConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.probe_timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn mac_address_deserializes_from_string() {
        let wake: WakeConfig = serde_json::from_str(
            r#"{"wake_enabled": true, "mac_address": "01:23:45:67:89:ab"}"#,
        )
        .unwrap();
        assert_eq!(
            wake.mac_address.map(|mac| mac.octets()),
            Some([0x01, 0x23, 0x45, 0x67, 0x89, 0xab])
        );
    }
}
