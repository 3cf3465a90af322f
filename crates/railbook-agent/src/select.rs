// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Train selection: one pick out of the listed candidates.

use chrono::{Duration, NaiveTime};
use railbook_core::TrainOption;

/// Buffer added to a train's arrival when checking it against the
/// latest-acceptable-arrival constraint.
const ARRIVAL_BUFFER_MINUTES: i64 = 20;

/// Selection preferences for one booking attempt.
#[derive(Debug, Clone, Default)]
pub struct SelectionPrefs {
    /// Automatic pick; otherwise the manual `index` applies.
    pub auto: bool,
    /// Manual 1-based index into the listing, defaulting to the first
    /// option when absent or out of range.
    pub index: Option<usize>,
    /// Latest acceptable arrival time, used by the automatic pick.
    pub latest_arrival: Option<NaiveTime>,
}

/// Picks exactly one train from a non-empty listing.
///
/// Manual mode takes the 1-based index, falling back to the first
/// option. Automatic mode narrows by discount, then by the arrival
/// deadline (with a 20-minute buffer), falling back to the unnarrowed
/// set whenever a restriction would empty it, and finally takes the
/// minimum travel duration with ties broken by listing order.
pub fn select_train<'a>(
    options: &'a [TrainOption],
    prefs: &SelectionPrefs,
) -> Option<&'a TrainOption> {
    if options.is_empty() {
        return None;
    }

    if !prefs.auto {
        let index = prefs
            .index
            .filter(|i| (1..=options.len()).contains(i))
            .unwrap_or(1);
        return options.get(index - 1);
    }

    let mut candidates: Vec<&TrainOption> = options.iter().collect();

    if candidates.iter().any(|t| !t.discount.is_empty()) {
        candidates = narrow(candidates, |t| !t.discount.is_empty());
    }

    if let Some(deadline) = prefs.latest_arrival {
        candidates = narrow(candidates, |t| {
            t.arrival + Duration::minutes(ARRIVAL_BUFFER_MINUTES) < deadline
        });
    }

    candidates
        .into_iter()
        .min_by_key(|t| t.duration_minutes)
}

/// Applies a restriction, keeping the original set when the restriction
/// would leave nothing to pick from.
fn narrow<'a>(
    candidates: Vec<&'a TrainOption>,
    keep: impl Fn(&TrainOption) -> bool,
) -> Vec<&'a TrainOption> {
    let narrowed: Vec<&TrainOption> = candidates.iter().copied().filter(|t| keep(t)).collect();
    if narrowed.is_empty() { candidates } else { narrowed }
}
