//! Report sections, HTML rendering, and mail delivery
//!
//! A collector reduces its dataset to a [`Section`]; `render` turns one
//! section into an HTML fragment; `compose` substitutes the concatenated
//! fragments into the mail template; `send` submits the finished report
//! through Graph sendMail.

use crate::error::{Result, Rpt365Error};
use crate::graph::GraphClient;
use serde_json::json;
use std::fmt;
use std::path::Path;

/// Placeholder token replaced by the report body in the mail template.
pub const CONTENT_PLACEHOLDER: &str = "{{content}}";

/// A single cell of a report row: text or a count
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Count(u64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Count(n) => write!(f, "{}", n),
        }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<u64> for Cell {
    fn from(n: u64) -> Self {
        Cell::Count(n)
    }
}

impl From<usize> for Cell {
    fn from(n: usize) -> Self {
        Cell::Count(n as u64)
    }
}

/// One tabular report section: a title, column headers, and data rows
#[derive(Debug, Clone)]
pub struct Section {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Section {
    pub fn new(title: &str, headers: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }
}

/// Render a section as an HTML table fragment
///
/// Pure function of its input. Every field value is HTML-escaped before it is
/// embedded in markup; directory data (display names, list names) is not
/// trusted to be markup-safe.
pub fn render(section: &Section) -> String {
    let mut content = String::from("<div class='data-table'>");
    content.push_str("<h2>");
    content.push_str(&html_escape::encode_text(&section.title));
    content.push_str("</h2>");
    content.push_str("<table>");

    content.push_str("<tr>");
    for header in &section.headers {
        content.push_str("<th>");
        content.push_str(&html_escape::encode_text(header));
        content.push_str("</th>");
    }
    content.push_str("</tr>");

    for row in &section.rows {
        content.push_str("<tr>");
        for cell in row {
            content.push_str("<td>");
            content.push_str(&html_escape::encode_text(&cell.to_string()));
            content.push_str("</td>");
        }
        content.push_str("</tr>");
    }

    content.push_str("</table>");
    content.push_str("</div>");

    content
}

/// Load the mail template from disk
pub fn load_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        Rpt365Error::TemplateError(format!("Failed to read {}: {}", path.display(), e))
    })
}

/// Substitute the report body into the template
pub fn compose(template: &str, body: &str) -> String {
    template.replace(CONTENT_PLACEHOLDER, body)
}

/// Send the report as an email to the admin via Graph sendMail
///
/// Sender and recipient are both the admin address; the subject names the
/// tenant. Delivery confirmation beyond the HTTP status is not handled.
pub async fn send(
    client: &GraphClient,
    tenant_name: &str,
    admin_email: &str,
    html_body: &str,
) -> Result<()> {
    let envelope = json!({
        "message": {
            "subject": format!("Current data for tenant {}", tenant_name),
            "body": {
                "contentType": "html",
                "content": html_body
            },
            "from": {
                "emailAddress": {
                    "name": "Admin",
                    "address": admin_email
                }
            },
            "toRecipients": [
                {
                    "emailAddress": {
                        "name": "Admin",
                        "address": admin_email
                    }
                }
            ]
        },
        "saveToSentItems": false
    });

    client
        .post(&format!("users/{}/sendMail", admin_email), &envelope)
        .await
}
