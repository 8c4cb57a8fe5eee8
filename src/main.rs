use clap::{Parser, Subcommand};
use colored::Colorize;
use rpt365::{cmd, error};

#[derive(Parser, Debug)]
#[command(
    name = "rpt365",
    about = "Email a Microsoft 365 tenant activity report via Microsoft Graph",
    version,
    long_about = "Collects groups, employees, drive storage and SharePoint list data \
                  from Microsoft Graph, renders it as HTML tables, and emails the \
                  report to the tenant administrator."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the report and email it to the admin
    Run(cmd::report::RunArgs),

    /// Generate the report body without sending it
    Preview(cmd::report::PreviewArgs),

    /// Manage tenant configurations
    #[command(subcommand)]
    Tenant(TenantCommands),
}

#[derive(Subcommand, Debug)]
enum TenantCommands {
    /// Add a new tenant configuration
    Add(cmd::tenant::TenantAddArgs),

    /// List all configured tenants
    List,

    /// Switch active tenant
    Switch(cmd::tenant::TenantSwitchArgs),

    /// Remove a tenant configuration
    Remove(cmd::tenant::TenantRemoveArgs),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> error::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("rpt365=debug")
            .init();
    }

    match cli.command {
        Commands::Run(args) => cmd::report::run(args).await?,
        Commands::Preview(args) => cmd::report::preview(args).await?,
        Commands::Tenant(tenant_cmd) => match tenant_cmd {
            TenantCommands::Add(args) => cmd::tenant::add(args)?,
            TenantCommands::List => cmd::tenant::list()?,
            TenantCommands::Switch(args) => cmd::tenant::switch(args)?,
            TenantCommands::Remove(args) => cmd::tenant::remove(args)?,
        },
    }

    Ok(())
}
