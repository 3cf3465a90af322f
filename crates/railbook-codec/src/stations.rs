// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Station name resolution.
//!
//! Accepts a numeric id, a romanized name, or a Chinese name (with the
//! 臺/台 variant normalized) and resolves against the configured
//! name-to-id table.

use std::collections::BTreeMap;

use railbook_core::StationId;

/// The twelve stations of the line in id order.
pub const STATIONS: [(&str, u8); 12] = [
    ("Nangang", 1),
    ("Taipei", 2),
    ("Banqiao", 3),
    ("Taoyuan", 4),
    ("Hsinchu", 5),
    ("Miaoli", 6),
    ("Taichung", 7),
    ("Changhua", 8),
    ("Yunlin", 9),
    ("Chiayi", 10),
    ("Tainan", 11),
    ("Zuoying", 12),
];

const CHINESE_NAMES: [(&str, &str); 12] = [
    ("南港", "Nangang"),
    ("台北", "Taipei"),
    ("板橋", "Banqiao"),
    ("桃園", "Taoyuan"),
    ("新竹", "Hsinchu"),
    ("苗栗", "Miaoli"),
    ("台中", "Taichung"),
    ("彰化", "Changhua"),
    ("雲林", "Yunlin"),
    ("嘉義", "Chiayi"),
    ("台南", "Tainan"),
    ("左營", "Zuoying"),
];

/// Default name-to-id table, used when the config leaves `[stations]` out.
pub fn default_table() -> BTreeMap<String, u8> {
    STATIONS
        .iter()
        .map(|(name, id)| (name.to_string(), *id))
        .collect()
}

/// Resolves user input to a station id against the given table.
pub fn resolve(input: &str, table: &BTreeMap<String, u8>) -> Option<StationId> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(id) = input.parse::<u8>() {
        return table.values().any(|v| *v == id).then_some(StationId(id));
    }

    let name = if input.chars().any(|c| c.is_ascii_alphabetic()) {
        capitalize(input)
    } else {
        let normalized = input.replace('臺', "台");
        CHINESE_NAMES
            .iter()
            .find(|(zh, _)| *zh == normalized)
            .map(|(_, en)| en.to_string())?
    };

    table.get(&name).map(|id| StationId(*id))
}

fn capitalize(name: &str) -> String {
    let lower = name.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_romanized_names_case_insensitively() {
        let table = default_table();
        assert_eq!(resolve("Taipei", &table), Some(StationId(2)));
        assert_eq!(resolve("taipei", &table), Some(StationId(2)));
        assert_eq!(resolve("ZUOYING", &table), Some(StationId(12)));
    }

    #[test]
    fn resolves_chinese_names_with_variant_normalization() {
        let table = default_table();
        assert_eq!(resolve("台北", &table), Some(StationId(2)));
        assert_eq!(resolve("臺北", &table), Some(StationId(2)));
        assert_eq!(resolve("左營", &table), Some(StationId(12)));
    }

    #[test]
    fn resolves_numeric_ids_within_table() {
        let table = default_table();
        assert_eq!(resolve("7", &table), Some(StationId(7)));
        assert_eq!(resolve("13", &table), None);
    }

    #[test]
    fn unknown_names_resolve_to_none() {
        let table = default_table();
        assert_eq!(resolve("Kaohsiung", &table), None);
        assert_eq!(resolve("", &table), None);
    }
}
