//! Wake-on-LAN support for a sleeping download host.
//!
//! Everything here is best-effort: the coordinator logs probe and send
//! failures at warn level and lets the submission proceed regardless.

use crate::config::{EndpointConfig, WakeConfig};
use crate::error::{Error, Result};
use crate::probe;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tokio::net::UdpSocket;
use url::Url;

/// Deadline for the pre-submission quick probe, independent of the
/// configured probe timeout.
const QUICK_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Six-byte hardware (MAC) address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Create an address from raw octets.
    pub fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// The raw octets.
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl FromStr for MacAddress {
    type Err = Error;

    /// Parse `aa:bb:cc:dd:ee:ff` (or `-`-separated) notation.
    fn from_str(s: &str) -> Result<Self> {
        let mut octets = [0u8; 6];
        let mut parts = s.split(|c| c == ':' || c == '-');
        for octet in &mut octets {
            let part = parts
                .next()
                .ok_or_else(|| Error::InvalidMacAddress(s.to_string()))?;
            *octet = u8::from_str_radix(part, 16)
                .map_err(|_| Error::InvalidMacAddress(s.to_string()))?;
        }
        if parts.next().is_some() {
            return Err(Error::InvalidMacAddress(s.to_string()));
        }
        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [o0, o1, o2, o3, o4, o5] = self.0;
        write!(f, "{o0:02x}:{o1:02x}:{o2:02x}:{o3:02x}:{o4:02x}:{o5:02x}")
    }
}

impl TryFrom<String> for MacAddress {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.to_string()
    }
}

/// Make a best-effort attempt to have the download host awake before a
/// submission.
///
/// Runs a quick reachability pre-check, sends a wake signal when the host
/// looks asleep, and re-probes with the full configured timeout afterwards.
/// Never fails and never blocks past the probe timeouts; any trouble is
/// logged and the caller carries on.
pub async fn ensure_awake(endpoint: &EndpointConfig, wake: &WakeConfig) {
    match is_service_awake(endpoint, wake, true).await {
        Ok(true) => {}
        Ok(false) => wake_host(endpoint, wake).await,
        Err(err) => {
            tracing::warn!(error = %err, "availability pre-check failed, skipping wake");
        }
    }
}

/// Reachability decision for the wake flow.
///
/// With `wait_enabled` the service is actually probed: a quick check uses
/// the fixed 1-second deadline, otherwise the configured probe timeout
/// applies. Without it, `wake_enabled` alone treats the host as asleep on
/// every call, and with neither flag the host counts as awake.
async fn is_service_awake(
    endpoint: &EndpointConfig,
    wake: &WakeConfig,
    quick: bool,
) -> Result<bool> {
    if wake.wait_enabled {
        let host = probe_host(endpoint)?;
        let timeout = if quick {
            Some(QUICK_PROBE_TIMEOUT)
        } else {
            endpoint.probe_timeout
        };
        tracing::debug!(host = %host, port = endpoint.probe_port, "checking service availability");
        let online = probe::wait_for_service(&host, endpoint.probe_port, timeout).await?;
        tracing::info!(host = %host, port = endpoint.probe_port, online, "service availability");
        return Ok(online);
    }

    if wake.wake_enabled {
        return Ok(false);
    }

    tracing::debug!("skipping service availability check");
    Ok(true)
}

/// Send the wake signal and, when probing is enabled, verify it worked.
async fn wake_host(endpoint: &EndpointConfig, wake: &WakeConfig) {
    let Some(mac) = wake.mac_address else {
        tracing::warn!("wake requested but no MAC address configured");
        return;
    };

    tracing::debug!(mac = %mac, "waking download host before submission");
    if let Err(err) = send_magic_packet(mac, wake.broadcast_addr).await {
        tracing::warn!(mac = %mac, error = %err, "failed to send wake signal");
    }

    if wake.wait_enabled {
        match is_service_awake(endpoint, wake, false).await {
            Ok(true) => {}
            Ok(false) => tracing::warn!("download host still unreachable after wake"),
            Err(err) => {
                tracing::warn!(error = %err, "post-wake availability check failed");
            }
        }
    }
}

/// Send a wake-on-LAN magic packet for `mac` to the given address.
///
/// The packet is fire-and-forget: nothing acknowledges it and delivery is
/// not verified here.
pub async fn send_magic_packet(mac: MacAddress, broadcast_addr: SocketAddr) -> Result<()> {
    let socket = UdpSocket::bind(("0.0.0.0", 0)).await?;
    socket.set_broadcast(true)?;
    socket.send_to(&magic_packet(mac), broadcast_addr).await?;
    Ok(())
}

/// A magic packet: six `0xFF` bytes followed by the target address
/// repeated sixteen times.
fn magic_packet(mac: MacAddress) -> [u8; 102] {
    let mut packet = [0xFF_u8; 102];
    for chunk in packet[6..].chunks_exact_mut(6) {
        chunk.copy_from_slice(&mac.octets());
    }
    packet
}

/// The hostname to probe, taken from the endpoint's base URL.
fn probe_host(endpoint: &EndpointConfig) -> Result<String> {
    let url = Url::parse(&endpoint.host)?;
    let host = url
        .host_str()
        .ok_or_else(|| Error::MissingProbeHost(endpoint.host.clone()))?;
    Ok(host.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mac() -> MacAddress {
        "01:23:45:67:89:ab".parse().unwrap()
    }

    #[test]
    fn parses_colon_and_dash_notation() {
        assert_eq!(mac().octets(), [0x01, 0x23, 0x45, 0x67, 0x89, 0xab]);
        assert_eq!(
            "01-23-45-67-89-AB".parse::<MacAddress>().unwrap(),
            mac()
        );
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "01:23:45", "01:23:45:67:89:ab:cd", "01:23:45:67:89:zz", "0123456789ab"] {
            assert!(
                bad.parse::<MacAddress>().is_err(),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn display_round_trips() {
        let text = mac().to_string();
        assert_eq!(text, "01:23:45:67:89:ab");
        assert_eq!(text.parse::<MacAddress>().unwrap(), mac());
    }

    #[test]
    fn magic_packet_layout() {
        let packet = magic_packet(mac());
        assert_eq!(packet.len(), 102);
        assert!(packet[..6].iter().all(|&b| b == 0xFF));
        for chunk in packet[6..].chunks_exact(6) {
            assert_eq!(chunk, mac().octets());
        }
    }

    #[tokio::test]
    async fn magic_packet_arrives_at_target() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let target = receiver.local_addr().unwrap();

        send_magic_packet(mac(), target).await.unwrap();

        let mut buf = [0u8; 128];
        let (len, _) = tokio::time::timeout(Duration::from_secs(5), receiver.recv_from(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&buf[..len], magic_packet(mac()));
    }

    #[tokio::test]
    async fn no_flags_means_awake_without_probing() {
        // An unparseable endpoint host would fail any probe attempt; with
        // both flags off the check never touches the network.
        let endpoint = EndpointConfig {
            host: "not a url".to_string(),
            ..Default::default()
        };
        let wake = WakeConfig::default();

        assert!(is_service_awake(&endpoint, &wake, true).await.unwrap());
    }

    #[tokio::test]
    async fn wake_only_flag_means_always_asleep() {
        let endpoint = EndpointConfig {
            host: "not a url".to_string(),
            ..Default::default()
        };
        let wake = WakeConfig {
            wake_enabled: true,
            ..Default::default()
        };

        assert!(!is_service_awake(&endpoint, &wake, true).await.unwrap());
    }

    #[tokio::test]
    async fn wait_flag_probes_the_configured_port() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let endpoint = EndpointConfig {
            host: format!("http://127.0.0.1:{port}/"),
            probe_port: port,
            ..Default::default()
        };
        let wake = WakeConfig {
            wait_enabled: true,
            ..Default::default()
        };

        assert!(is_service_awake(&endpoint, &wake, true).await.unwrap());
    }
}
