// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! External-collaborator traits implemented by adapter crates.

mod captcha;

pub use captcha::CaptchaResolver;
