//! Employee collector: tenure, group memberships, and mailbox size per user
//!
//! Users without a given name are treated as resource accounts (conference
//! rooms, shared mailboxes) and excluded from the report.

use crate::error::Result;
use crate::graph::GraphClient;
use crate::report::{Cell, Section};
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Deserialize;

/// Hire dates are reported as this sentinel when the field was never set.
const UNSET_HIRE_DATE: &str = "0001-01-01T00:00:00Z";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HireDate {
    #[serde(default)]
    hire_date: Option<String>,
}

/// Directory object as returned by /memberOf; only the type marker matters.
#[derive(Debug, Deserialize)]
pub struct DirectoryObject {
    #[serde(rename = "@odata.type", default)]
    pub odata_type: Option<String>,
}

/// Message entries only contribute to a count; the payload is ignored.
#[derive(Debug, Deserialize)]
struct Message {}

/// Outcome of the per-user message count
///
/// Enumeration can fail per user (unlicensed mailbox, missing permission,
/// transient network error) without aborting the collector; the failure is
/// carried as a distinct kind and rendered as the "Unknown" sentinel.
#[derive(Debug)]
pub enum MessageTally {
    Counted(u64),
    Unavailable(String),
}

impl From<MessageTally> for Cell {
    fn from(tally: MessageTally) -> Self {
        match tally {
            MessageTally::Counted(n) => Cell::Count(n),
            MessageTally::Unavailable(_) => Cell::Text("Unknown".to_string()),
        }
    }
}

pub async fn collect(client: &GraphClient) -> Result<Section> {
    println!("{} Generating employee table...", "Employees".cyan().bold());

    let mut section = Section::new(
        "Employees",
        &["Employee", "Tenure", "Group Memberships", "Messages"],
    );

    let users: Vec<User> = client.get_all_pages("users").await?;

    for user in users.into_iter().filter(is_person) {
        let name = user.display_name.clone().unwrap_or_else(|| user.id.clone());

        let hire: HireDate = client
            .get(&format!("users/{}?$select=hireDate", user.id))
            .await?;
        let tenure = tenure_label(hire.hire_date.as_deref(), Utc::now());

        let memberships: Vec<DirectoryObject> = client
            .get_all_pages(&format!("users/{}/memberOf", user.id))
            .await?;
        let group_count = group_membership_count(&memberships);

        let messages = count_messages(client, &user.id).await;
        if let MessageTally::Unavailable(reason) = &messages {
            tracing::debug!(user = %user.id, %reason, "message count unavailable");
        }

        section.push_row(vec![
            name.into(),
            tenure.into(),
            group_count.into(),
            messages.into(),
        ]);
    }

    Ok(section)
}

fn is_person(user: &User) -> bool {
    user.given_name.as_deref().is_some_and(|g| !g.is_empty())
}

/// Whole years of tenure against `now`, or "Unknown" for unset dates
fn tenure_label(hire_date: Option<&str>, now: DateTime<Utc>) -> String {
    let raw = match hire_date {
        Some(raw) if raw != UNSET_HIRE_DATE => raw,
        _ => return "Unknown".to_string(),
    };

    match DateTime::parse_from_rfc3339(raw) {
        Ok(hired) => {
            let years = now
                .date_naive()
                .years_since(hired.date_naive())
                .unwrap_or(0);
            format!("{} years", years)
        }
        Err(_) => "Unknown".to_string(),
    }
}

/// Count only memberships whose type marker is a group, excluding roles and
/// other directory-object kinds
fn group_membership_count(memberships: &[DirectoryObject]) -> u64 {
    memberships
        .iter()
        .filter(|m| m.odata_type.as_deref() == Some("#microsoft.graph.group"))
        .count() as u64
}

/// Count a user's mail messages by walking the paged collection to the end
async fn count_messages(client: &GraphClient, user_id: &str) -> MessageTally {
    let mut cursor = client.pages::<Message>(&format!("users/{}/messages?$top=10", user_id));
    let mut total: u64 = 0;

    loop {
        match cursor.next_page().await {
            Ok(Some(page)) => total += page.len() as u64,
            Ok(None) => return MessageTally::Counted(total),
            Err(e) => return MessageTally::Unavailable(e.to_string()),
        }
    }
}
