//! Queue category selection for outgoing jobs.

use crate::config::CategoryConfig;
use crate::types::DownloadJob;
use chrono::{Local, NaiveDate};

/// Resolve the queue category for a job.
///
/// The base category follows the show kind (anime or standard). Any episode
/// that aired more than `backlog_age_days` before today reroutes the job to
/// the matching backlog category. Returns `None` when the selected
/// identifier is unset or empty, which places no category constraint on the
/// queue.
pub fn resolve(job: &DownloadJob, categories: &CategoryConfig) -> Option<String> {
    resolve_on(job, categories, Local::now().date_naive())
}

fn resolve_on(job: &DownloadJob, categories: &CategoryConfig, today: NaiveDate) -> Option<String> {
    let mut category = if job.is_anime {
        categories.anime.clone()
    } else {
        categories.standard.clone()
    };

    // Each qualifying episode overwrites the choice in turn; the last one
    // in iteration order wins.
    let backlog_age = chrono::Duration::days(categories.backlog_age_days);
    for episode in &job.episodes {
        if today - episode.air_date > backlog_age {
            category = if job.is_anime {
                categories.anime_backlog.clone()
            } else {
                categories.backlog.clone()
            };
        }
    }

    category.filter(|id| !id.is_empty())
}
