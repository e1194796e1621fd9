//! Google Sheets values API client.
//!
//! Blocking reqwest client (no Tokio runtime required) for the
//! `spreadsheets.values` endpoints: one GET to read a range, one PUT to
//! write one. The caller supplies a short-lived OAuth access token; token
//! acquisition is outside this crate.

mod client;

pub use client::{GoogleSheetsClient, DEFAULT_API_BASE};
