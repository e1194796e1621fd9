//! Gemini REST client.
//!
//! Blocking reqwest client (no Tokio runtime required) for the
//! `generateContent` endpoint, with google-search grounding enabled and
//! harm-category safety settings attached to every request. Implements
//! the pipeline's [`TextGenerator`] seam and classifies failures into its
//! transient/blocked/abnormal taxonomy.

mod client;

pub use client::{GeminiClient, DEFAULT_API_BASE, DEFAULT_MODEL};
