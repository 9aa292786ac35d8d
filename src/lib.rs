//! # sabnzbd-client
//!
//! Submission client for SABnzbd-compatible, queue-based download managers.
//!
//! The crate hands a download job (an NZB reference URL or raw NZB bytes)
//! to the manager's HTTP API, optionally waking a sleeping download host
//! over the LAN first. It is deliberately small:
//!
//! - **Library-first**: no CLI or UI, purely a Rust crate for embedding
//! - **Caller-owned state**: one immutable [`SabConfig`] per client, no
//!   globals; configuration loading and the show/episode domain model stay
//!   with the caller
//! - **Fire and report**: submission happens once, with no internal
//!   retries or job tracking; callers needing retry/backoff loop outside
//!
//! ## Quick Start
//!
//! ```no_run
//! use sabnzbd_client::{DownloadJob, JobPayload, SabClient, SabConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = SabConfig::default();
//!     config.endpoint.host = "https://sab.local:9090/".to_string();
//!     config.credentials.api_key = Some("0123456789abcdef".to_string());
//!
//!     let client = SabClient::new(config)?;
//!
//!     let job = DownloadJob {
//!         name: "Some.Show.S01E01".to_string(),
//!         payload: JobPayload::UrlReference(
//!             "https://indexer.example/get/1".to_string(),
//!         ),
//!         is_anime: false,
//!         high_priority: false,
//!         episodes: vec![],
//!     };
//!
//!     let outcome = client.submit(&job).await?;
//!     println!("accepted: {}", outcome.is_success());
//!     Ok(())
//! }
//! ```
//!
//! ## Security caveat
//!
//! TLS certificate verification is disabled for all API calls, so the
//! client works against the self-signed certificates common on local
//! download boxes. Do not use it across untrusted networks.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Queue category selection
pub mod category;
/// API client and connectivity probes
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// TCP reachability probing
pub mod probe;
/// API reply interpretation
pub mod response;
/// Core job types
pub mod types;
/// Wake-on-LAN support
pub mod wake;

// Re-export commonly used types
pub use client::SabClient;
pub use config::{CategoryConfig, Credentials, EndpointConfig, SabConfig, WakeConfig};
pub use error::{Error, Result};
pub use response::ApiOutcome;
pub use types::{DownloadJob, Episode, JobPayload};
pub use wake::MacAddress;
