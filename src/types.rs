//! Core types for sabnzbd-client

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A download job to hand to the queue manager.
///
/// Jobs are owned by the caller and read-only to this crate; typically they
/// are assembled from a search result and its owning show.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadJob {
    /// Display name of the release, also used as the upload filename
    /// (with an `.nzb` extension appended) in inline-data mode
    pub name: String,

    /// What is actually submitted: a reference URL or the raw NZB bytes
    pub payload: JobPayload,

    /// Whether the owning show is an anime (selects the anime categories)
    #[serde(default)]
    pub is_anime: bool,

    /// Whether the job should carry a priority field in the request
    #[serde(default)]
    pub high_priority: bool,

    /// Episodes covered by this job, in the caller's order
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// The submittable content of a [`DownloadJob`].
///
/// This is a closed set: the queue manager understands exactly two add
/// modes, and constructing anything else is impossible by type.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPayload {
    /// An NZB reference URL, submitted with `mode=addurl`
    UrlReference(String),

    /// Raw NZB file contents, uploaded with `mode=addfile`
    InlineData(Vec<u8>),
}

/// Episode metadata relevant to category selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Original air date
    pub air_date: NaiveDate,
}
