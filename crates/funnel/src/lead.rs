//! Lead submission handling.
//!
//! A submission is a JSON object with seven required string fields. Valid
//! submissions become one spreadsheet row: an RFC 3339 timestamp followed
//! by the fields in declared order. Nothing is written unless every field
//! is present, and failed writes are not retried.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::config::LeadConfig;
use crate::error::LeadError;
use crate::sheet::{ensure_tab_and_header, SheetError, SheetStore, SheetTarget};

pub const REQUIRED_FIELDS: [&str; 7] = [
    "session_id",
    "name",
    "company",
    "country",
    "industry",
    "email_domain",
    "source",
];

pub const HEADER: [&str; 8] = [
    "ts",
    "session_id",
    "name",
    "company",
    "country",
    "industry",
    "email_domain",
    "source",
];

/// The seven required values, trimmed, in [`REQUIRED_FIELDS`] order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeadPayload {
    values: [String; 7],
}

impl LeadPayload {
    /// Non-string values read as empty; the first empty field is reported.
    pub fn parse(body: &str) -> Result<Self, LeadError> {
        let json: Value = serde_json::from_str(body).map_err(|_| LeadError::InvalidJson)?;
        let values = REQUIRED_FIELDS.map(|key| {
            json.get(key)
                .and_then(Value::as_str)
                .map(|v| v.trim().to_owned())
                .unwrap_or_default()
        });
        if let Some(missing) = REQUIRED_FIELDS
            .iter()
            .zip(values.iter())
            .find_map(|(key, v)| v.is_empty().then_some(*key))
        {
            return Err(LeadError::Missing(missing));
        }
        Ok(Self { values })
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        REQUIRED_FIELDS
            .iter()
            .position(|f| *f == field)
            .map(|i| self.values[i].as_str())
    }

    /// Row matching [`HEADER`].
    pub fn row(&self, at: DateTime<Utc>) -> Vec<String> {
        let mut row = Vec::with_capacity(HEADER.len());
        row.push(at.to_rfc3339_opts(SecondsFormat::Millis, true));
        row.extend(self.values.iter().cloned());
        row
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LeadResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Status code and JSON body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: LeadResponse,
}

impl Reply {
    pub fn ok() -> Self {
        Self {
            status: 200,
            body: LeadResponse {
                ok: true,
                error: None,
            },
        }
    }

    pub fn error(err: &LeadError) -> Self {
        Self {
            status: err.status(),
            body: LeadResponse {
                ok: false,
                error: Some(err.code()),
            },
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.body).unwrap_or_else(|_| String::from(r#"{"ok":false}"#))
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LeadRequest<'a> {
    pub method: &'a str,
    /// `Host` header, used to gate dry runs.
    pub host: &'a str,
    pub body: &'a str,
}

/// Ensures the tab and header, then appends the payload row.
pub fn submit<S: SheetStore + ?Sized>(
    sheet: &mut S,
    tab: &str,
    payload: &LeadPayload,
    at: DateTime<Utc>,
) -> Result<(), SheetError> {
    ensure_tab_and_header(sheet, tab)?;
    sheet.append_row(tab, payload.row(at))
}

/// Handles one request end to end. `connect` opens the spreadsheet for a
/// resolved target and is only called for valid, configured submissions.
pub fn handle<S, F>(request: &LeadRequest<'_>, config: &LeadConfig, at: DateTime<Utc>, connect: F) -> Reply
where
    S: SheetStore,
    F: FnOnce(&SheetTarget) -> Result<S, SheetError>,
{
    match process(request, config, at, connect) {
        Ok(()) => Reply::ok(),
        Err(err) => {
            if matches!(err, LeadError::Credentials(_) | LeadError::Sheet(_)) {
                log::error!("lead_api_failed {err}");
            }
            Reply::error(&err)
        }
    }
}

fn process<S, F>(
    request: &LeadRequest<'_>,
    config: &LeadConfig,
    at: DateTime<Utc>,
    connect: F,
) -> Result<(), LeadError>
where
    S: SheetStore,
    F: FnOnce(&SheetTarget) -> Result<S, SheetError>,
{
    if !request.method.eq_ignore_ascii_case("POST") {
        return Err(LeadError::MethodNotAllowed);
    }
    let payload = LeadPayload::parse(request.body)?;

    if config.dry_run_for(request.host) {
        log::info!(
            "[lead] dry run, not written session_id={}",
            payload.get("session_id").unwrap_or_default()
        );
        return Ok(());
    }

    let target = config.target()?;
    let mut sheet = connect(&target)?;
    submit(&mut sheet, &target.tab, &payload, at)?;
    log::info!("[lead] appended to tab {}", target.tab);
    Ok(())
}
