use thiserror::Error;

#[derive(Error, Debug)]
pub enum Rpt365Error {
    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Graph API error: {0}")]
    GraphApiError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Tenant '{0}' not found")]
    TenantNotFound(String),

    #[error("Report template error: {0}")]
    TemplateError(String),
}

pub type Result<T> = std::result::Result<T, Rpt365Error>;

/// Parse Graph API error response and provide helpful context
pub fn enhance_graph_error(error_response: &str) -> String {
    if let Ok(error_json) = serde_json::from_str::<serde_json::Value>(error_response) {
        if let Some(error_obj) = error_json.get("error") {
            let code = error_obj
                .get("code")
                .and_then(|c| c.as_str())
                .unwrap_or("Unknown");
            let message = error_obj
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("No message");

            let hint = match code {
                "Unauthorized" | "InvalidAuthenticationToken" => {
                    "\nHint: The access token was rejected. Check the client secret and tenant ID."
                }
                "Forbidden" | "Authorization_RequestDenied" | "InsufficientPrivileges" => {
                    "\nHint: The app registration is missing application permissions or admin consent."
                }
                "MailboxNotEnabledForRESTAPI" => {
                    "\nHint: This mailbox is not licensed for Exchange Online."
                }
                "NotFound" | "Request_ResourceNotFound" => {
                    "\nHint: The requested resource doesn't exist. Check IDs and resource names."
                }
                _ => "",
            };

            return format!("{}: {}{}", code, message, hint);
        }
    }

    error_response.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enhances_structured_graph_errors() {
        let body = r#"{"error":{"code":"Request_ResourceNotFound","message":"Resource not found."}}"#;
        let enhanced = enhance_graph_error(body);
        assert!(enhanced.starts_with("Request_ResourceNotFound: Resource not found."));
        assert!(enhanced.contains("Hint:"));
    }

    #[test]
    fn passes_through_unparseable_bodies() {
        assert_eq!(enhance_graph_error("gateway timeout"), "gateway timeout");
    }
}
