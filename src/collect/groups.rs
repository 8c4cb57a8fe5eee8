//! Group collector: unified (Microsoft 365) groups and their member counts

use crate::error::Result;
use crate::graph::GraphClient;
use crate::report::Section;
use colored::Colorize;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Member entries only contribute to a count; the payload is ignored.
#[derive(Debug, Deserialize)]
pub struct Member {}

pub async fn collect(client: &GraphClient) -> Result<Section> {
    println!("{} Generating group table...", "Groups".cyan().bold());

    let mut section = Section::new("Groups", &["Group", "Members"]);

    let groups: Vec<Group> = client
        .get_all_pages("groups?$filter=groupTypes/any(a:a eq 'unified')")
        .await?;

    for group in groups {
        let members: Vec<Member> = client
            .get_all_pages(&format!("groups/{}/members", group.id))
            .await?;

        let name = group.display_name.unwrap_or_else(|| group.id.clone());
        section.push_row(vec![name.into(), members.len().into()]);
    }

    Ok(section)
}
