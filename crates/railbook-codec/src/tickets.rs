// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-slot ticket count tokens.

use railbook_core::{FareClass, RailbookError, TicketCounts};

use crate::form::FormSchema;

/// Encodes the ticket composition into one token per schema slot, in
/// the schema's canonical fare-class order: `"{count}{type_code}"` for
/// occupied slots, the empty placeholder otherwise.
///
/// An all-zero composition defaults to a single adult ticket. A total
/// over `max_total` is rejected here, before any network call.
pub fn encode_tickets(
    counts: &TicketCounts,
    schema: &FormSchema,
    max_total: u32,
) -> Result<Vec<String>, RailbookError> {
    let total = counts.total();
    if total > max_total {
        return Err(RailbookError::Validation(format!(
            "requested {total} tickets, maximum is {max_total}"
        )));
    }

    let defaulted;
    let counts = if total == 0 {
        defaulted = TicketCounts::new().with(FareClass::Adult, 1);
        &defaulted
    } else {
        counts
    };

    Ok(schema
        .fare_order()
        .iter()
        .map(|class| {
            let n = counts.count(*class);
            if n > 0 {
                format!("{n}{}", class.code())
            } else {
                String::new()
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::SchemaVersion;

    fn schema() -> FormSchema {
        FormSchema::new(SchemaVersion::V5)
    }

    #[test]
    fn single_occupied_slot() {
        let counts = TicketCounts::new().with(FareClass::Adult, 2);
        let tokens = encode_tickets(&counts, &schema(), 10).unwrap();
        assert_eq!(tokens, vec!["2F", "", "", "", ""]);
    }

    #[test]
    fn slots_follow_canonical_order() {
        let counts = TicketCounts::new()
            .with(FareClass::Child, 1)
            .with(FareClass::Senior, 3)
            .with(FareClass::College, 2);
        let tokens = encode_tickets(&counts, &schema(), 10).unwrap();
        assert_eq!(tokens, vec!["", "1H", "", "3E", "2P"]);
    }

    #[test]
    fn all_zero_defaults_to_one_adult() {
        let tokens = encode_tickets(&TicketCounts::new(), &schema(), 10).unwrap();
        assert_eq!(tokens, vec!["1F", "", "", "", ""]);
    }

    #[test]
    fn over_maximum_is_rejected() {
        let counts = TicketCounts::new()
            .with(FareClass::Adult, 6)
            .with(FareClass::Child, 5);
        assert!(matches!(
            encode_tickets(&counts, &schema(), 10),
            Err(RailbookError::Validation(_))
        ));
    }

    #[test]
    fn legacy_schema_has_no_college_slot() {
        let counts = TicketCounts::new().with(FareClass::College, 1);
        let tokens = encode_tickets(&counts, &FormSchema::new(SchemaVersion::V4), 10).unwrap();
        // The college count has no slot in the legacy layout.
        assert_eq!(tokens, vec!["", "", "", ""]);
    }
}
