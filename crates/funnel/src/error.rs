use thiserror::Error;

use crate::sheet::SheetError;

/// Every way a lead submission can fail, with its response code and status.
#[derive(Debug, Error)]
pub enum LeadError {
    #[error("request body is not valid JSON")]
    InvalidJson,

    #[error("required field `{0}` is missing or empty")]
    Missing(&'static str),

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("sheet id, tab or service account not configured")]
    NotConfigured,

    #[error("service account credentials unreadable: {0}")]
    Credentials(#[from] serde_json::Error),

    #[error("spreadsheet write failed: {0}")]
    Sheet(#[from] SheetError),
}

impl LeadError {
    /// Stable code sent back as `error`.
    pub fn code(&self) -> String {
        match self {
            LeadError::InvalidJson => "invalid_json".to_owned(),
            LeadError::Missing(field) => format!("missing_{field}"),
            LeadError::MethodNotAllowed => "method_not_allowed".to_owned(),
            LeadError::NotConfigured => "server_not_configured".to_owned(),
            LeadError::Credentials(_) | LeadError::Sheet(_) => "internal_error".to_owned(),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            LeadError::InvalidJson | LeadError::Missing(_) => 400,
            LeadError::MethodNotAllowed => 405,
            LeadError::NotConfigured | LeadError::Credentials(_) | LeadError::Sheet(_) => 500,
        }
    }
}
