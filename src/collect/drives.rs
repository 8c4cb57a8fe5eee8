//! Storage collector: used capacity per OneDrive/SharePoint drive

use crate::error::Result;
use crate::graph::GraphClient;
use crate::report::Section;
use colored::Colorize;
use serde::Deserialize;

/// Approximate bytes-per-megabyte divisor used for the report.
const BYTES_PER_MB: u64 = 1_000_000;

#[derive(Debug, Deserialize)]
pub struct Drive {
    pub id: String,
    #[serde(default)]
    pub quota: Quota,
}

#[derive(Debug, Deserialize, Default)]
pub struct Quota {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub remaining: u64,
}

pub async fn collect(client: &GraphClient) -> Result<Section> {
    println!("{} Generating OneDrive table...", "OneDrive".cyan().bold());

    let mut section = Section::new("OneDrive", &["Drive", "Used"]);

    let drives: Vec<Drive> = client.get_all_pages("drives").await?;

    for drive in drives {
        let used = used_megabytes(&drive.quota);
        section.push_row(vec![
            shorten_drive_id(&drive.id).into(),
            format!("{}MB", used).into(),
        ]);
    }

    Ok(section)
}

/// Used capacity in whole megabytes, rounded up
fn used_megabytes(quota: &Quota) -> u64 {
    quota.total.saturating_sub(quota.remaining).div_ceil(BYTES_PER_MB)
}

/// Abbreviate a drive identifier for display: first 5 and last 7 characters
/// joined with an ellipsis. Identifiers short enough to show whole pass
/// through unchanged.
fn shorten_drive_id(id: &str) -> String {
    if id.len() <= 12 {
        return id.to_string();
    }
    format!("{}...{}", &id[..5], &id[id.len() - 7..])
}
