// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal and machine-readable rendering of booking artifacts.

use colored::Colorize;
use railbook_core::{BookingResult, TrainOption};

const RULE: &str = "----------------------------------------------------";

/// Prints the listed trains, numbered the way manual selection counts them.
pub fn print_trains(trains: &[TrainOption]) {
    println!("\n{}", "Available trains:".bold());
    for (i, train) in trains.iter().enumerate() {
        println!("{}. {train}", i + 1);
    }
}

/// Prints the reservation ticket panel.
pub fn print_result(result: &BookingResult, history_url: &str) {
    println!("\n{}", "Booking success!".green().bold());
    println!("\n---------------------- Ticket ----------------------");
    println!("Reservation No: {}", result.reservation_no.yellow().bold());
    println!("Payment Status: {}", result.payment_status);
    println!("Car Type: {}", result.car_class);
    println!("Ticket Type: {}", result.ticket_type);
    println!("Price: {}", result.price);
    println!("{RULE}");
    println!("Date: {}", result.date);
    println!("Train No: {}", result.train_no);
    println!("Duration: {}", result.duration);
    println!(
        "{} ({}) -> {} ({})",
        result.departure_time,
        result.departure_station,
        result.arrival_time,
        result.arrival_station
    );
    println!("{RULE}");
    println!("Seats: {}", result.seats.join(", "));
    println!(
        "\nGo to the reservation record to confirm the ticket and pay!\n ({history_url})"
    );
}

/// One machine-readable JSON line for the result record.
pub fn print_result_json(result: &BookingResult) {
    match serde_json::to_string(result) {
        Ok(line) => println!("{line}"),
        Err(e) => eprintln!("failed to serialize result: {e}"),
    }
}

/// One machine-readable JSON line for a train listing.
pub fn print_trains_json(trains: &[TrainOption]) {
    match serde_json::to_string(trains) {
        Ok(line) => println!("{line}"),
        Err(e) => eprintln!("failed to serialize trains: {e}"),
    }
}
