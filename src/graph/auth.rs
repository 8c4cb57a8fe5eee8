use crate::config::TenantConfig;
use crate::error::{Result, Rpt365Error};
use oauth2::{
    basic::BasicClient, reqwest::async_http_client, AuthUrl, ClientId, ClientSecret, Scope,
    TokenResponse, TokenUrl,
};

const MICROSOFT_AUTHORITY: &str = "https://login.microsoftonline.com";
const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

pub struct GraphAuth {
    authority: String,
}

impl GraphAuth {
    pub fn new() -> Self {
        Self {
            authority: MICROSOFT_AUTHORITY.to_string(),
        }
    }

    /// Point the authenticator at a different identity endpoint (used by tests)
    pub fn with_authority(authority: String) -> Self {
        Self { authority }
    }

    /// Acquire an access token using the client credentials flow (non-interactive)
    ///
    /// Authentication failure is fatal for the run: the caller is expected to
    /// propagate this error and exit before touching Graph.
    pub async fn client_credentials_token(&self, tenant: &TenantConfig) -> Result<String> {
        let client_id = ClientId::new(tenant.client_id.clone());
        let client_secret = ClientSecret::new(tenant.client_secret.clone());

        let auth_url = AuthUrl::new(format!(
            "{}/{}/oauth2/v2.0/authorize",
            self.authority, tenant.tenant_id
        ))
        .map_err(|e| Rpt365Error::AuthError(format!("Invalid auth URL: {}", e)))?;

        let token_url = TokenUrl::new(format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority, tenant.tenant_id
        ))
        .map_err(|e| Rpt365Error::AuthError(format!("Invalid token URL: {}", e)))?;

        let client = BasicClient::new(client_id, Some(client_secret), auth_url, Some(token_url));

        let token = client
            .exchange_client_credentials()
            .add_scope(Scope::new(GRAPH_SCOPE.to_string()))
            .request_async(async_http_client)
            .await
            .map_err(|e| {
                Rpt365Error::AuthError(format!("Client credentials exchange failed: {}", e))
            })?;

        Ok(token.access_token().secret().clone())
    }
}

impl Default for GraphAuth {
    fn default() -> Self {
        Self::new()
    }
}
