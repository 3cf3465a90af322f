// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP workflow client for the Railbook booking agent.
//!
//! Owns the cookie-bearing session against the booking site, issues the
//! sequential page requests and form submissions, classifies responses
//! against known error-panel phrases, and extracts structured results
//! (train rows, the final reservation record) from markup anchors.

pub mod classify;
pub mod client;
pub mod endpoints;
pub mod markup;

pub use classify::PageKind;
pub use client::{ClientConfig, WorkflowClient};
pub use markup::ParsedPage;
