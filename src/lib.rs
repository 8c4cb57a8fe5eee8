//! rpt365 — Microsoft 365 tenant activity report generator
//!
//! Authenticates to Microsoft Graph with client credentials, collects four
//! independent datasets, renders them as HTML tables, and emails the result
//! to the tenant administrator.

pub mod cmd;
pub mod collect;
pub mod config;
pub mod error;
pub mod graph;
pub mod report;
