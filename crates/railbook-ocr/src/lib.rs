// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Captcha recognition adapter for the Railbook booking agent.
//!
//! Implements [`railbook_core::CaptchaResolver`] against an HTTP OCR
//! backend.

mod client;
mod types;

pub use client::OcrClient;
