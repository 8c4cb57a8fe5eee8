//! Site-content collector: lists in the tenant root site and their item counts
//!
//! Site inventory lives on the Graph beta surface; the client addresses it
//! with explicit beta calls instead of switching an API version globally.

use crate::error::Result;
use crate::graph::GraphClient;
use crate::report::Section;
use colored::Colorize;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Site {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteList {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// List items only contribute to a count; the payload is ignored.
#[derive(Debug, Deserialize)]
pub struct ListItem {}

pub async fn collect(client: &GraphClient) -> Result<Section> {
    println!(
        "{} Generating SharePoint table...",
        "SharePoint".cyan().bold()
    );

    let mut section = Section::new("SharePoint Lists", &["List", "Items"]);

    let site: Site = client.get_beta("sites/root").await?;

    let lists: Vec<SiteList> = client
        .get_all_pages_beta(&format!("sites/{}/lists", site.id))
        .await?;

    for list in lists {
        let items: Vec<ListItem> = client
            .get_all_pages_beta(&format!("sites/{}/lists/{}/items", site.id, list.id))
            .await?;

        let name = list
            .display_name
            .or(list.name)
            .unwrap_or_else(|| list.id.clone());
        section.push_row(vec![name.into(), items.len().into()]);
    }

    Ok(section)
}
