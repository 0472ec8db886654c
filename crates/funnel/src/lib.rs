//! Lead-capture funnel shared by the demo pages and the lead endpoint.
//!
//! - [`decision`]: fixed three-line copy chosen from yes/no answers.
//! - [`fingerprint`]: short hash of the answers, kept client-side.
//! - [`lead`]: validation and handling of a lead submission.
//! - [`sheet`]: the spreadsheet the leads are appended to.
//! - [`config`]: endpoint settings read from the environment.

pub mod config;
pub mod decision;
pub mod error;
pub mod fingerprint;
pub mod lead;
pub mod sheet;

pub use config::{LeadConfig, ServiceAccount};
pub use decision::{evaluate_decision, Decision, DecisionCopy, Tension};
pub use error::LeadError;
pub use fingerprint::{create_fingerprint, simple_hash};
pub use lead::{handle, LeadPayload, LeadRequest, LeadResponse, Reply};
pub use sheet::{ensure_tab_and_header, MemorySheet, SheetError, SheetStore, SheetTarget};
