// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field encoding for the remote booking forms.
//!
//! Pure translation between trip parameters and the exact token strings
//! the remote form protocol expects: half-hour time-slot codes, per-slot
//! ticket tokens, national-id checksum validation, station resolution,
//! and the versioned form-field tables. No I/O happens here; the
//! workflow client consumes these builders verbatim.

pub mod form;
pub mod identity;
pub mod stations;
pub mod tickets;
pub mod time;

pub use form::{FormSchema, SchemaVersion, SpecialFarePrompt};
pub use identity::{validate_national_id, validate_tax_id};
pub use tickets::encode_tickets;
pub use time::{TimeSlot, TIMETABLE};
