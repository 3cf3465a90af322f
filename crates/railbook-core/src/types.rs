// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Railbook workspace.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::RailbookError;

/// Numeric station identifier as the booking form encodes it (1..=12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StationId(pub u8);

impl StationId {
    /// The highest station id on the line.
    pub const MAX: u8 = 12;

    pub fn form_value(&self) -> String {
        self.0.to_string()
    }
}

/// Fare classes recognized by the booking form, in the canonical slot
/// order the form expects.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FareClass {
    Adult,
    Child,
    Disabled,
    Senior,
    College,
}

impl FareClass {
    /// Single-letter type code appended to the per-slot count token.
    pub fn code(&self) -> char {
        match self {
            FareClass::Adult => 'F',
            FareClass::Child => 'H',
            FareClass::Disabled => 'W',
            FareClass::Senior => 'E',
            FareClass::College => 'P',
        }
    }

    /// Fare classes whose passengers must each supply a national id on
    /// the passenger page.
    pub fn requires_companion_id(&self) -> bool {
        matches!(self, FareClass::Disabled | FareClass::Senior)
    }
}

/// Ticket composition: fare class to non-negative count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketCounts(BTreeMap<FareClass, u32>);

impl TicketCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, class: FareClass, count: u32) {
        if count == 0 {
            self.0.remove(&class);
        } else {
            self.0.insert(class, count);
        }
    }

    pub fn with(mut self, class: FareClass, count: u32) -> Self {
        self.set(class, count);
        self
    }

    pub fn count(&self, class: FareClass) -> u32 {
        self.0.get(&class).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }
}

/// Preferred car class radio value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CarClass {
    #[default]
    Standard,
    Business,
}

impl CarClass {
    pub fn form_value(&self) -> &'static str {
        match self {
            CarClass::Standard => "0",
            CarClass::Business => "1",
        }
    }
}

/// Preferred seat zone radio value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SeatPreference {
    #[default]
    Any,
    Window,
    Aisle,
}

impl SeatPreference {
    pub fn form_value(&self) -> &'static str {
        match self {
            SeatPreference::Any => "0",
            SeatPreference::Window => "1",
            SeatPreference::Aisle => "2",
        }
    }
}

/// Immutable input describing one booking attempt.
///
/// Validated once via [`TripRequest::validate`] before any network call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRequest {
    pub origin: StationId,
    pub destination: StationId,
    pub date: NaiveDate,
    pub departure: NaiveTime,
    pub tickets: TicketCounts,
    pub car_class: CarClass,
    pub seat_preference: SeatPreference,
    /// Explicit train number; when set, the listing/selection steps are
    /// skipped and the form routes straight to the passenger page.
    pub train_no: Option<String>,
    /// Latest acceptable arrival time for automatic train selection.
    pub latest_arrival: Option<NaiveTime>,
    pub national_id: String,
    pub phone: String,
    pub email: String,
    /// Loyalty membership number. Selects the loyalty membership mode.
    pub loyalty_id: Option<String>,
    /// Company tax id. Selects the tax-id membership mode when no
    /// loyalty id is present.
    pub tax_id: Option<String>,
    /// National ids for discounted-fare passengers (disabled/senior),
    /// consumed in the order the passenger page prompts for them.
    pub companion_ids: Vec<String>,
}

impl TripRequest {
    /// Rejects structurally invalid requests before any network call.
    ///
    /// The all-zero ticket case is not an error here: the codec defaults
    /// it to a single adult ticket at encoding time.
    pub fn validate(&self, max_tickets: u32) -> Result<(), RailbookError> {
        if self.origin == self.destination {
            return Err(RailbookError::Validation(
                "origin and destination stations must differ".into(),
            ));
        }
        for station in [self.origin, self.destination] {
            if station.0 < 1 || station.0 > StationId::MAX {
                return Err(RailbookError::Validation(format!(
                    "station id {} outside 1..={}",
                    station.0,
                    StationId::MAX
                )));
            }
        }
        let total = self.tickets.total();
        if total > max_tickets {
            return Err(RailbookError::Validation(format!(
                "requested {total} tickets, maximum is {max_tickets}"
            )));
        }
        let companions_needed: u32 = [FareClass::Disabled, FareClass::Senior]
            .iter()
            .map(|c| self.tickets.count(*c))
            .sum();
        if (self.companion_ids.len() as u32) < companions_needed {
            return Err(RailbookError::Validation(format!(
                "{companions_needed} discounted-fare tickets need {companions_needed} companion ids, got {}",
                self.companion_ids.len()
            )));
        }
        Ok(())
    }

    /// Total passengers after the default-to-one-adult rule.
    pub fn passenger_count(&self) -> u32 {
        self.tickets.total().max(1)
    }
}

/// Server-side session identity for one booking attempt.
///
/// Owned exclusively by a single orchestrator run; the captcha image
/// reference is replaced in place on refresh.
#[derive(Debug, Clone)]
pub struct BookingSession {
    /// The server-assigned session cookie value.
    pub token: String,
    /// Absolute URL of the currently active captcha challenge image.
    pub captcha_ref: String,
}

/// One bookable train extracted from the listing page.
///
/// Produced fresh on every listing request; the selection token is only
/// valid within the session that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainOption {
    pub train_no: String,
    pub departure: NaiveTime,
    pub arrival: NaiveTime,
    pub duration_minutes: u32,
    /// Discount label, empty when the train carries no discount.
    pub discount: String,
    /// Opaque value echoed back to confirm this train.
    pub token: String,
}

impl TrainOption {
    pub fn duration_label(&self) -> String {
        format!("{:02}:{:02}", self.duration_minutes / 60, self.duration_minutes % 60)
    }
}

impl std::fmt::Display for TrainOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} ({}) | {}\t{}",
            self.departure.format("%H:%M"),
            self.arrival.format("%H:%M"),
            self.duration_label(),
            self.train_no,
            self.discount
        )
    }
}

/// Terminal artifact of a successful booking run.
#[derive(Debug, Clone, Serialize)]
pub struct BookingResult {
    pub reservation_no: String,
    pub payment_status: String,
    pub car_class: String,
    pub ticket_type: String,
    pub price: String,
    pub date: String,
    pub train_no: String,
    pub duration: String,
    pub departure_time: String,
    pub departure_station: String,
    pub arrival_time: String,
    pub arrival_station: String,
    pub seats: Vec<String>,
}

/// The single discriminated outcome surfaced to the caller.
#[derive(Debug)]
pub enum Outcome {
    Success(Box<BookingResult>),
    Failed(String),
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_trip() -> TripRequest {
        TripRequest {
            origin: StationId(2),
            destination: StationId(12),
            date: NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
            departure: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            tickets: TicketCounts::new().with(FareClass::Adult, 1),
            car_class: CarClass::Standard,
            seat_preference: SeatPreference::Window,
            train_no: None,
            latest_arrival: None,
            national_id: "A123456789".into(),
            phone: "0911222333".into(),
            email: "rider@example.com".into(),
            loyalty_id: None,
            tax_id: None,
            companion_ids: Vec::new(),
        }
    }

    #[test]
    fn valid_trip_passes() {
        assert!(base_trip().validate(10).is_ok());
    }

    #[test]
    fn same_station_rejected() {
        let mut trip = base_trip();
        trip.destination = trip.origin;
        assert!(matches!(
            trip.validate(10),
            Err(RailbookError::Validation(_))
        ));
    }

    #[test]
    fn over_maximum_rejected() {
        let mut trip = base_trip();
        trip.tickets = TicketCounts::new().with(FareClass::Adult, 11);
        assert!(matches!(
            trip.validate(10),
            Err(RailbookError::Validation(_))
        ));
    }

    #[test]
    fn all_zero_tickets_is_not_an_error() {
        let mut trip = base_trip();
        trip.tickets = TicketCounts::new();
        assert!(trip.validate(10).is_ok());
        assert_eq!(trip.passenger_count(), 1);
    }

    #[test]
    fn discounted_fares_require_companion_ids() {
        let mut trip = base_trip();
        trip.tickets = TicketCounts::new()
            .with(FareClass::Adult, 1)
            .with(FareClass::Senior, 2);
        assert!(matches!(
            trip.validate(10),
            Err(RailbookError::Validation(_))
        ));

        trip.companion_ids = vec!["B123456780".into(), "C123456781".into()];
        assert!(trip.validate(10).is_ok());
    }

    #[test]
    fn fare_class_codes_match_form_contract() {
        assert_eq!(FareClass::Adult.code(), 'F');
        assert_eq!(FareClass::Child.code(), 'H');
        assert_eq!(FareClass::Disabled.code(), 'W');
        assert_eq!(FareClass::Senior.code(), 'E');
        assert_eq!(FareClass::College.code(), 'P');
    }
}
