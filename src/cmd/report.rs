//! Report CLI commands
//!
//! `run` executes the full pipeline (authenticate, collect, render, compose,
//! send); `preview` stops after rendering and prints or writes the HTML.

use crate::collect;
use crate::config::ConfigManager;
use crate::error::Result;
use crate::graph::auth::GraphAuth;
use crate::graph::GraphClient;
use crate::report;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Tenant name to report on (defaults to the active tenant)
    #[arg(short, long)]
    pub tenant: Option<String>,

    /// Path to the HTML mail template
    #[arg(long, default_value = "templates/email-template.html")]
    pub template: PathBuf,

    /// Override the configured admin address
    #[arg(long)]
    pub admin_email: Option<String>,
}

#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Tenant name to report on (defaults to the active tenant)
    #[arg(short, long)]
    pub tenant: Option<String>,

    /// Write the report body to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub async fn run(args: RunArgs) -> Result<()> {
    let config = ConfigManager::new()?;
    let tenant = config.resolve_tenant(args.tenant.as_deref())?;

    println!(
        "{} Generating report for tenant '{}'...",
        "rpt365".cyan().bold(),
        tenant.name
    );

    // Authentication failure aborts the run before any collector executes;
    // a partial report is never sent.
    let token = GraphAuth::new().client_credentials_token(&tenant).await?;
    let client = GraphClient::new(token);

    let body = collect_all(&client).await?;

    let template = report::load_template(&args.template)?;
    let html = report::compose(&template, &body);

    let admin_email = args.admin_email.as_deref().unwrap_or(&tenant.admin_email);
    report::send(&client, &tenant.name, admin_email, &html).await?;

    println!(
        "{} Report sent to {}",
        "Success".green().bold(),
        admin_email
    );

    Ok(())
}

pub async fn preview(args: PreviewArgs) -> Result<()> {
    let config = ConfigManager::new()?;
    let tenant = config.resolve_tenant(args.tenant.as_deref())?;

    println!(
        "{} Generating report preview for tenant '{}'...",
        "rpt365".cyan().bold(),
        tenant.name
    );

    let token = GraphAuth::new().client_credentials_token(&tenant).await?;
    let client = GraphClient::new(token);

    let body = collect_all(&client).await?;

    match args.out {
        Some(path) => {
            std::fs::write(&path, &body)?;
            println!(
                "{} Report written to {}",
                "Success".green().bold(),
                path.display()
            );
        }
        None => println!("{}", body),
    }

    Ok(())
}

/// Run the four collectors in order and concatenate their rendered sections
async fn collect_all(client: &GraphClient) -> Result<String> {
    let mut body = String::new();

    body.push_str(&report::render(&collect::groups::collect(client).await?));
    body.push_str(&report::render(&collect::employees::collect(client).await?));
    body.push_str(&report::render(&collect::drives::collect(client).await?));
    body.push_str(&report::render(&collect::sites::collect(client).await?));

    Ok(body)
}
