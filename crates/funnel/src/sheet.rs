//! The spreadsheet leads are appended to.
//!
//! [`SheetStore`] is the seam for the remote spreadsheet client; the
//! handler only needs tab listing, tab creation, the first column of a tab,
//! a header write and a row append. [`MemorySheet`] keeps everything in
//! memory for local runs and tests.

use thiserror::Error;

use crate::config::ServiceAccount;
use crate::lead::HEADER;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("tab `{0}` not found")]
    NoSuchTab(String),

    #[error("upstream: {0}")]
    Upstream(String),
}

/// Where a lead goes and the credentials to write it.
#[derive(Clone, Debug)]
pub struct SheetTarget {
    pub sheet_id: String,
    pub tab: String,
    pub account: ServiceAccount,
}

pub trait SheetStore {
    fn tab_titles(&self) -> Result<Vec<String>, SheetError>;
    fn add_tab(&mut self, title: &str) -> Result<(), SheetError>;
    /// Non-empty rows of column A.
    fn first_column(&self, tab: &str) -> Result<Vec<String>, SheetError>;
    /// Overwrites row 1.
    fn write_header(&mut self, tab: &str, header: &[&str]) -> Result<(), SheetError>;
    fn append_row(&mut self, tab: &str, row: Vec<String>) -> Result<(), SheetError>;
}

impl<S: SheetStore + ?Sized> SheetStore for &mut S {
    fn tab_titles(&self) -> Result<Vec<String>, SheetError> {
        (**self).tab_titles()
    }

    fn add_tab(&mut self, title: &str) -> Result<(), SheetError> {
        (**self).add_tab(title)
    }

    fn first_column(&self, tab: &str) -> Result<Vec<String>, SheetError> {
        (**self).first_column(tab)
    }

    fn write_header(&mut self, tab: &str, header: &[&str]) -> Result<(), SheetError> {
        (**self).write_header(tab, header)
    }

    fn append_row(&mut self, tab: &str, row: Vec<String>) -> Result<(), SheetError> {
        (**self).append_row(tab, row)
    }
}

#[inline]
fn same_title(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Creates `tab` unless a tab with the same trimmed, case-folded title
/// exists, then writes the header if column A is empty.
pub fn ensure_tab_and_header<S: SheetStore + ?Sized>(sheet: &mut S, tab: &str) -> Result<(), SheetError> {
    let exists = sheet.tab_titles()?.iter().any(|t| same_title(t, tab));
    if !exists {
        log::info!("[lead] creating tab {tab}");
        sheet.add_tab(tab)?;
    }
    if sheet.first_column(tab)?.is_empty() {
        sheet.write_header(tab, &HEADER)?;
    }
    Ok(())
}

#[derive(Clone, Debug, Default)]
pub struct MemorySheet {
    tabs: Vec<(String, Vec<Vec<String>>)>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tab(mut self, title: &str, rows: Vec<Vec<String>>) -> Self {
        self.tabs.push((title.to_owned(), rows));
        self
    }

    pub fn rows(&self, tab: &str) -> Option<&[Vec<String>]> {
        self.tabs
            .iter()
            .find(|(t, _)| same_title(t, tab))
            .map(|(_, rows)| rows.as_slice())
    }

    fn rows_mut(&mut self, tab: &str) -> Result<&mut Vec<Vec<String>>, SheetError> {
        self.tabs
            .iter_mut()
            .find(|(t, _)| same_title(t, tab))
            .map(|(_, rows)| rows)
            .ok_or_else(|| SheetError::NoSuchTab(tab.to_owned()))
    }
}

impl SheetStore for MemorySheet {
    fn tab_titles(&self) -> Result<Vec<String>, SheetError> {
        Ok(self.tabs.iter().map(|(t, _)| t.clone()).collect())
    }

    fn add_tab(&mut self, title: &str) -> Result<(), SheetError> {
        self.tabs.push((title.to_owned(), Vec::new()));
        Ok(())
    }

    fn first_column(&self, tab: &str) -> Result<Vec<String>, SheetError> {
        let rows = self
            .rows(tab)
            .ok_or_else(|| SheetError::NoSuchTab(tab.to_owned()))?;
        Ok(rows
            .iter()
            .filter_map(|r| r.first())
            .filter(|v| !v.is_empty())
            .cloned()
            .collect())
    }

    fn write_header(&mut self, tab: &str, header: &[&str]) -> Result<(), SheetError> {
        let rows = self.rows_mut(tab)?;
        let header: Vec<String> = header.iter().map(|h| (*h).to_owned()).collect();
        match rows.first_mut() {
            Some(first) => *first = header,
            None => rows.push(header),
        }
        Ok(())
    }

    fn append_row(&mut self, tab: &str, row: Vec<String>) -> Result<(), SheetError> {
        self.rows_mut(tab)?.push(row);
        Ok(())
    }
}
