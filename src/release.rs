use crate::error::{MsgramError, Result};
use crate::models::Release;
use chrono::{DateTime, Utc};

/// Returns the first release (in list order) whose window contains `reference`.
///
/// Windows are inclusive on both ends. Fails with the reference date as `YYYY-MM-DD` (UTC).
pub fn assert_release_ongoing(releases: &[Release], reference: DateTime<Utc>) -> Result<&Release> {
    let mut ongoing = releases.iter().filter(|release| release.contains(reference));

    let Some(release) = ongoing.next() else {
        return Err(MsgramError::NoOngoingRelease(
            reference.format("%Y-%m-%d").to_string(),
        ));
    };

    let overlapping = ongoing.count();
    if overlapping > 0 {
        tracing::debug!(
            release = %release.name,
            overlapping,
            "Several releases are ongoing; using the first one listed"
        );
    }

    Ok(release)
}
