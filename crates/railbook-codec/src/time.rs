// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Half-hour time-slot codes as the booking form encodes them.
//!
//! The form's timetable uses a 4-5 character token per half-hour slot: a
//! clock reading without leading zero and a trailing letter separating
//! morning (`A`) from afternoon (`P`), with dedicated sentinels for the
//! midnight and noon boundaries (`1201A`, `1230A`, `1200N`, `1230P`).

use chrono::{NaiveDateTime, NaiveTime, Timelike};

/// All 48 slot codes in calendar order, 00:00 through 23:30.
///
/// Index `i` corresponds to the slot starting at `i * 30` minutes past
/// midnight; [`TimeSlot::encode`] and [`TimeSlot::time`] both go through
/// this indexing, which keeps the two directions consistent by
/// construction.
pub const TIMETABLE: [&str; 48] = [
    "1201A", "1230A", "100A", "130A", "200A", "230A", "300A", "330A", "400A", "430A", "500A",
    "530A", "600A", "630A", "700A", "730A", "800A", "830A", "900A", "930A", "1000A", "1030A",
    "1100A", "1130A", "1200N", "1230P", "100P", "130P", "200P", "230P", "300P", "330P", "400P",
    "430P", "500P", "530P", "600P", "630P", "700P", "730P", "800P", "830P", "900P", "930P",
    "1000P", "1030P", "1100P", "1130P",
];

/// One half-hour slot of the booking form's timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeSlot(usize);

impl TimeSlot {
    /// Encodes a requested time by flooring the minute to the nearest
    /// half hour and selecting the matching slot.
    pub fn encode(t: NaiveTime) -> TimeSlot {
        let index = (t.hour() * 2 + t.minute() / 30) as usize;
        TimeSlot(index)
    }

    /// Looks up a slot by its wire code.
    pub fn decode(code: &str) -> Option<TimeSlot> {
        TIMETABLE.iter().position(|c| *c == code).map(TimeSlot)
    }

    /// The wire token submitted in the booking form.
    pub fn code(&self) -> &'static str {
        TIMETABLE[self.0]
    }

    /// Start of the slot as a time of day.
    pub fn time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.0 as u32 / 2, (self.0 as u32 % 2) * 30, 0)
            .unwrap_or(NaiveTime::MIN)
    }

    /// Position in the canonical listing order.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Slots still selectable for a travel date, given the current wall
/// clock. For future dates this is the full timetable; for today, slots
/// whose start already passed are dropped.
pub fn selectable_slots(date: chrono::NaiveDate, now: NaiveDateTime) -> Vec<TimeSlot> {
    (0..TIMETABLE.len())
        .map(TimeSlot)
        .filter(|slot| date.and_time(slot.time()) >= now)
        .collect()
}
