// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds a [`TripRequest`] from CLI arguments and configuration.

use chrono::{Local, NaiveDate, NaiveTime};
use railbook_codec::stations;
use railbook_config::RailbookConfig;
use railbook_core::{
    CarClass, FareClass, SeatPreference, StationId, TicketCounts, TripRequest,
};

use crate::TripArgs;

/// Resolves the CLI trip arguments against the configured station table.
pub fn build_trip(args: &TripArgs, config: &RailbookConfig) -> Result<TripRequest, String> {
    let origin = resolve_station(&args.from, config)?;
    let destination = resolve_station(&args.to, config)?;

    let date = match &args.date {
        Some(text) => parse_date(text)?,
        None => Local::now().date_naive(),
    };
    let departure = parse_time(&args.time)?;
    let latest_arrival = args.latest_arrival.as_deref().map(parse_time).transpose()?;

    let mut tickets = TicketCounts::new();
    tickets.set(FareClass::Adult, args.adults);
    tickets.set(FareClass::Child, args.children);
    tickets.set(FareClass::Disabled, args.disabled);
    tickets.set(FareClass::Senior, args.seniors);
    tickets.set(FareClass::College, args.college);

    if let Some(tax_id) = &args.tax_id
        && !railbook_codec::validate_tax_id(tax_id)
    {
        return Err(format!("tax id `{tax_id}` must be exactly ten digits"));
    }

    let car_class: CarClass = args
        .car
        .parse()
        .map_err(|_| format!("unknown car class `{}` (standard, business)", args.car))?;
    let seat_preference: SeatPreference = args
        .seat
        .parse()
        .map_err(|_| format!("unknown seat preference `{}` (any, window, aisle)", args.seat))?;

    let trip = TripRequest {
        origin,
        destination,
        date,
        departure,
        tickets,
        car_class,
        seat_preference,
        train_no: args.train_no.clone(),
        latest_arrival,
        national_id: args.id.clone().unwrap_or_default(),
        phone: args.phone.clone().unwrap_or_default(),
        email: args.email.clone().unwrap_or_default(),
        loyalty_id: args.loyalty_id.clone(),
        tax_id: args.tax_id.clone(),
        companion_ids: args.companion_id.clone(),
    };

    trip.validate(config.booking.max_tickets)
        .map_err(|e| e.to_string())?;
    Ok(trip)
}

fn resolve_station(name: &str, config: &RailbookConfig) -> Result<StationId, String> {
    stations::resolve(name, &config.stations).ok_or_else(|| {
        let known: Vec<&str> = config.stations.keys().map(String::as_str).collect();
        format!("unknown station `{name}` (known: {})", known.join(", "))
    })
}

fn parse_date(text: &str) -> Result<NaiveDate, String> {
    let normalized = text.replace('/', "-");
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .map_err(|_| format!("unparseable date `{text}` (expected YYYY-MM-DD)"))
}

fn parse_time(text: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(text, "%H:%M")
        .map_err(|_| format!("unparseable time `{text}` (expected HH:MM)"))
}
