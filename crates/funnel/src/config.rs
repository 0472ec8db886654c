//! Lead endpoint settings.
//!
//! Values come from a key lookup, normally over the process environment;
//! tests pass their own so nothing reads real env vars.

use std::net::IpAddr;

use serde::Deserialize;

use crate::error::LeadError;
use crate::sheet::SheetTarget;

pub const ENV_SHEET_ID: &str = "AURORA_SHEETS_SHEET_ID";
pub const ENV_TAB: &str = "AURORA_SHEETS_TAB";
pub const ENV_SERVICE_ACCOUNT: &str = "AURORA_SHEETS_SA_JSON";
pub const ENV_DRY_RUN: &str = "AURORA_LEAD_DRY_RUN";

/// Google service account credentials, as pasted into the environment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceAccount {
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub private_key: String,
}

impl ServiceAccount {
    /// Parses the JSON blob, turning escaped `\n` in the key into newlines.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        let mut account: ServiceAccount = serde_json::from_str(raw)?;
        account.private_key = account.private_key.replace("\\n", "\n");
        Ok(account)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LeadConfig {
    pub sheet_id: String,
    pub tab: String,
    pub service_account_json: String,
    pub dry_run: bool,
}

impl LeadConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_owned()).unwrap_or_default();
        Self {
            sheet_id: read(ENV_SHEET_ID),
            tab: read(ENV_TAB),
            service_account_json: read(ENV_SERVICE_ACCOUNT),
            dry_run: is_truthy(&read(ENV_DRY_RUN)),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.sheet_id.is_empty() && !self.tab.is_empty() && !self.service_account_json.is_empty()
    }

    /// Dry run only applies to requests addressed to a loopback host.
    pub fn dry_run_for(&self, host: &str) -> bool {
        self.dry_run && is_loopback_host(host)
    }

    /// Resolves the write target; logs which pieces are missing.
    pub fn target(&self) -> Result<SheetTarget, LeadError> {
        if !self.is_complete() {
            log::error!(
                "lead_api_missing_env has_sheet_id={} has_tab_name={} has_service_account={}",
                !self.sheet_id.is_empty(),
                !self.tab.is_empty(),
                !self.service_account_json.is_empty()
            );
            return Err(LeadError::NotConfigured);
        }
        Ok(SheetTarget {
            sheet_id: self.sheet_id.clone(),
            tab: self.tab.clone(),
            account: ServiceAccount::parse(&self.service_account_json)?,
        })
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// `localhost`, `127.x.x.x` or `::1`, with or without a port.
pub fn is_loopback_host(host: &str) -> bool {
    let host = host.trim();
    let name = if let Some(rest) = host.strip_prefix('[') {
        rest.split(']').next().unwrap_or_default()
    } else if host.matches(':').count() == 1 {
        host.split(':').next().unwrap_or_default()
    } else {
        host
    };
    if name.eq_ignore_ascii_case("localhost") {
        return true;
    }
    name.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback())
}
