// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Railbook booking agent.
//!
//! This crate provides the error taxonomy, the domain types carried
//! through the booking workflow, and the external-collaborator traits
//! implemented by adapter crates.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RailbookError;
pub use traits::CaptchaResolver;
pub use types::{
    BookingResult, BookingSession, CarClass, FareClass, Outcome, SeatPreference, StationId,
    TicketCounts, TrainOption, TripRequest,
};
