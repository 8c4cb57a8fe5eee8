use crate::error::{Result, Rpt365Error};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub current_tenant: Option<String>,

    #[serde(default)]
    pub log_level: String,
}

/// Tenant-specific configuration
///
/// The client credentials must belong to an app registration with
/// application permissions for Group.Read.All, User.Read.All,
/// Files.Read.All, Sites.Read.All, Mail.Read and Mail.Send.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TenantConfig {
    pub name: String,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,

    /// Address the report is sent from and to.
    pub admin_email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Configuration manager
#[derive(Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let project_dirs = ProjectDirs::from("com", "rpt365", "rpt365").ok_or_else(|| {
            Rpt365Error::ConfigError("Failed to determine config directory".into())
        })?;

        let config_dir = project_dirs.config_dir().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        Ok(Self { config_dir })
    }

    /// Build a manager rooted at an explicit directory (used by tests).
    pub fn with_dir(config_dir: PathBuf) -> Result<Self> {
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }
        Ok(Self { config_dir })
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn tenants_file(&self) -> PathBuf {
        self.config_dir.join("tenants.toml")
    }

    /// Load main config
    pub fn load_config(&self) -> Result<Config> {
        let config_path = self.config_file();

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save main config
    pub fn save_config(&self, config: &Config) -> Result<()> {
        let config_path = self.config_file();
        let contents = toml::to_string_pretty(config)
            .map_err(|e| Rpt365Error::ConfigError(format!("Failed to serialize config: {}", e)))?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Load all tenants
    pub fn load_tenants(&self) -> Result<Vec<TenantConfig>> {
        let tenants_path = self.tenants_file();

        if !tenants_path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(tenants_path)?;

        #[derive(Deserialize)]
        struct TenantsFile {
            tenants: Vec<TenantConfig>,
        }

        let file: TenantsFile = toml::from_str(&contents)?;
        Ok(file.tenants)
    }

    /// Save all tenants
    pub fn save_tenants(&self, tenants: &[TenantConfig]) -> Result<()> {
        let tenants_path = self.tenants_file();

        #[derive(Serialize)]
        struct TenantsFile<'a> {
            tenants: &'a [TenantConfig],
        }

        let file = TenantsFile { tenants };
        let contents = toml::to_string_pretty(&file)
            .map_err(|e| Rpt365Error::ConfigError(format!("Failed to serialize tenants: {}", e)))?;
        fs::write(tenants_path, contents)?;
        Ok(())
    }

    /// Add or update tenant
    pub fn add_tenant(&self, tenant: TenantConfig) -> Result<()> {
        let mut tenants = self.load_tenants()?;

        // Replace an existing tenant with the same name
        tenants.retain(|t| t.name != tenant.name);

        tenants.push(tenant);
        self.save_tenants(&tenants)?;
        Ok(())
    }

    /// Get tenant by name
    pub fn get_tenant(&self, name: &str) -> Result<TenantConfig> {
        let tenants = self.load_tenants()?;
        tenants
            .into_iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Rpt365Error::TenantNotFound(name.to_string()))
    }

    /// Get active tenant
    pub fn get_active_tenant(&self) -> Result<Option<TenantConfig>> {
        let config = self.load_config()?;

        match config.current_tenant {
            Some(tenant_name) => Ok(Some(self.get_tenant(&tenant_name)?)),
            None => Ok(None),
        }
    }

    /// Set the active tenant
    pub fn set_active_tenant(&self, tenant_name: &str) -> Result<()> {
        let _tenant = self.get_tenant(tenant_name)?;

        let mut config = self.load_config()?;
        config.current_tenant = Some(tenant_name.to_string());
        self.save_config(&config)?;

        Ok(())
    }

    /// Remove a tenant by name
    pub fn remove_tenant(&self, tenant_name: &str) -> Result<()> {
        let mut tenants = self.load_tenants()?;
        let original_len = tenants.len();
        tenants.retain(|t| !t.name.eq_ignore_ascii_case(tenant_name));

        if tenants.len() == original_len {
            return Err(Rpt365Error::TenantNotFound(tenant_name.to_string()));
        }

        self.save_tenants(&tenants)?;

        // If this was the active tenant, clear current_tenant
        let config = self.load_config()?;
        if config.current_tenant.as_deref() == Some(tenant_name) {
            let mut updated_config = config;
            updated_config.current_tenant = None;
            self.save_config(&updated_config)?;
        }

        Ok(())
    }

    /// Resolve the tenant to report on: explicit name, process environment,
    /// `.env` file in the config directory, or the active tenant, in that order.
    pub fn resolve_tenant(&self, name: Option<&str>) -> Result<TenantConfig> {
        if let Some(name) = name {
            return self.get_tenant_or_env(name);
        }

        if let Some(tenant) = Self::tenant_from_process_env() {
            return Ok(tenant);
        }

        self.get_active_tenant()?.ok_or_else(|| {
            Rpt365Error::ConfigError(
                "No tenant configured. Run 'rpt365 tenant add' or set RPT365_TENANT_ID, \
                 RPT365_CLIENT_ID, RPT365_CLIENT_SECRET and RPT365_ADMIN_EMAIL."
                    .into(),
            )
        })
    }

    /// Get tenant by name, checking the .env file if tenants.toml misses
    pub fn get_tenant_or_env(&self, name: &str) -> Result<TenantConfig> {
        if let Ok(tenant) = self.get_tenant(name) {
            return Ok(tenant);
        }

        if let Some(tenant) = self.load_env_file(name)? {
            self.add_tenant(tenant.clone())?;
            return Ok(tenant);
        }

        Err(Rpt365Error::TenantNotFound(name.to_string()))
    }

    /// Build a tenant from RPT365_* process environment variables
    fn tenant_from_process_env() -> Option<TenantConfig> {
        let tenant_id = std::env::var("RPT365_TENANT_ID").ok()?;
        let client_id = std::env::var("RPT365_CLIENT_ID").ok()?;
        let client_secret = std::env::var("RPT365_CLIENT_SECRET").ok()?;
        let admin_email = std::env::var("RPT365_ADMIN_EMAIL").ok()?;

        Some(TenantConfig {
            name: "env".to_string(),
            tenant_id,
            client_id,
            client_secret,
            admin_email,
            description: None,
        })
    }

    /// Load tenant from a .env file in the config directory
    ///
    /// Supports format:
    /// ```text
    /// # Client: Contoso
    /// TENANT_ID=xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx
    /// CLIENT_ID=xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx
    /// CLIENT_SECRET=your-secret-here
    /// ADMIN_EMAIL=admin@contoso.onmicrosoft.com
    /// ```
    pub fn load_env_file(&self, name: &str) -> Result<Option<TenantConfig>> {
        let env_path = self.config_dir.join(format!("{}.env", name.to_lowercase()));
        let fallback_path = self.config_dir.join(".env");

        let path = if env_path.exists() {
            env_path
        } else if fallback_path.exists() {
            fallback_path
        } else {
            return Ok(None);
        };

        let contents = fs::read_to_string(&path)?;
        let env_vars = Self::parse_env_file(&contents);

        let lookup = |key: &str| {
            env_vars
                .get(key)
                .or_else(|| env_vars.get(&key.to_lowercase()))
                .cloned()
        };

        match (
            lookup("TENANT_ID"),
            lookup("CLIENT_ID"),
            lookup("CLIENT_SECRET"),
            lookup("ADMIN_EMAIL"),
        ) {
            (Some(tenant_id), Some(client_id), Some(client_secret), Some(admin_email)) => {
                Ok(Some(TenantConfig {
                    name: name.to_string(),
                    tenant_id,
                    client_id,
                    client_secret,
                    admin_email,
                    description: lookup("DESCRIPTION"),
                }))
            }
            _ => Ok(None),
        }
    }

    /// Parse simple .env file format
    fn parse_env_file(contents: &str) -> HashMap<String, String> {
        let mut vars = HashMap::new();

        for line in contents.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(pos) = line.find('=') {
                let key = line[..pos].trim().to_string();
                let value = line[pos + 1..].trim();

                // Remove surrounding quotes if present
                let value = if (value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\''))
                {
                    value[1..value.len() - 1].to_string()
                } else {
                    value.to_string()
                };

                vars.insert(key, value);
            }
        }

        vars
    }
}
