//! Tenant configuration commands

use crate::config::{ConfigManager, TenantConfig};
use crate::error::Result;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug)]
pub struct TenantAddArgs {
    /// Short name for the tenant
    #[arg(short, long)]
    pub name: String,

    /// Directory (tenant) ID
    #[arg(short, long)]
    pub tenant_id: String,

    /// Application (client) ID
    #[arg(short, long)]
    pub client_id: String,

    /// Client secret
    #[arg(short = 's', long)]
    pub client_secret: String,

    /// Admin address the report is sent from and to
    #[arg(short, long)]
    pub admin_email: String,

    /// Optional description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Make this the active tenant
    #[arg(long)]
    pub switch: bool,
}

#[derive(Args, Debug)]
pub struct TenantSwitchArgs {
    /// Tenant name to activate
    pub name: String,
}

#[derive(Args, Debug)]
pub struct TenantRemoveArgs {
    /// Tenant name to remove
    pub name: String,
}

pub fn add(args: TenantAddArgs) -> Result<()> {
    let config = ConfigManager::new()?;

    config.add_tenant(TenantConfig {
        name: args.name.clone(),
        tenant_id: args.tenant_id,
        client_id: args.client_id,
        client_secret: args.client_secret,
        admin_email: args.admin_email,
        description: args.description,
    })?;

    println!("{} Tenant '{}' saved", "Success".green().bold(), args.name);

    if args.switch {
        config.set_active_tenant(&args.name)?;
        println!("→ Active tenant: {}", args.name.cyan().bold());
    }

    Ok(())
}

pub fn list() -> Result<()> {
    let config = ConfigManager::new()?;
    let tenants = config.load_tenants()?;
    let active = config.load_config()?.current_tenant;

    if tenants.is_empty() {
        println!("No tenants configured. Run 'rpt365 tenant add' first.");
        return Ok(());
    }

    println!(
        "{:<16} {:<38} {:<32} {}",
        "NAME".bold(),
        "TENANT ID".bold(),
        "ADMIN".bold(),
        "DESCRIPTION".bold()
    );
    println!("{}", "-".repeat(100));

    for tenant in tenants {
        let marker = if active.as_deref() == Some(tenant.name.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{}{:<15} {:<38} {:<32} {}",
            marker,
            tenant.name,
            tenant.tenant_id,
            tenant.admin_email,
            tenant.description.unwrap_or_default()
        );
    }

    Ok(())
}

pub fn switch(args: TenantSwitchArgs) -> Result<()> {
    let config = ConfigManager::new()?;
    config.set_active_tenant(&args.name)?;
    println!("→ Active tenant: {}", args.name.cyan().bold());
    Ok(())
}

pub fn remove(args: TenantRemoveArgs) -> Result<()> {
    let config = ConfigManager::new()?;
    config.remove_tenant(&args.name)?;
    println!("{} Tenant '{}' removed", "Success".green().bold(), args.name);
    Ok(())
}
