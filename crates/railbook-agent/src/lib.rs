// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Booking orchestration for the Railbook agent.
//!
//! The [`Orchestrator`] is the state machine driving one booking
//! attempt through the workflow client, owning the bounded retry
//! budgets for captcha mismatches and malformed submissions. Train
//! selection is the pure [`select::select_train`] decision. Multiple
//! attempts may run concurrently as fully isolated orchestrators; no
//! session state is ever shared.

pub mod orchestrator;
pub mod select;
pub mod shutdown;

pub use orchestrator::{BookingState, ListingOutcome, Orchestrator, OrchestratorConfig};
pub use select::{select_train, SelectionPrefs};
pub use shutdown::install_signal_handler;
