// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! URL layout of the remote booking site.
//!
//! The site embeds the session token in the request path and tracks the
//! workflow step through a numeric interface id in the query string;
//! every template lives here so the client code never formats URLs.

/// URL builder rooted at the configured site base URL.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Landing page that opens a reservation session.
    pub fn landing(&self) -> String {
        format!("{}/IMINT/?locale=tw", self.base)
    }

    /// Reservation home, sent as the step-1 Referer.
    pub fn home(&self) -> String {
        format!("{}/IMINT/", self.base)
    }

    /// Challenge refresh without restarting the session. The random
    /// value busts intermediary caches.
    pub fn captcha_refresh(&self, session_token: &str, random_value: f64) -> String {
        format!(
            "{}/IMINT/;jsessionid={session_token}?wicket:interface=:0:BookingS1Form:homeCaptcha:reCodeLink::IBehaviorListener:0:&random={random_value}",
            self.base
        )
    }

    /// Step-1 search form submission, keyed by the session token.
    pub fn submit_booking_form(&self, session_token: &str) -> String {
        format!(
            "{}/IMINT/;jsessionid={session_token}?wicket:interface=:0:BookingS1Form::IFormSubmitListener",
            self.base
        )
    }

    /// Step-2 train confirmation submission.
    pub fn confirm_train(&self) -> String {
        format!(
            "{}/IMINT/?wicket:interface=:1:BookingS2Form::IFormSubmitListener",
            self.base
        )
    }

    /// Step-3 passenger form submission from the given interface page.
    pub fn confirm_passenger(&self, interface: u8) -> String {
        format!(
            "{}/IMINT/?wicket:interface=:{interface}:BookingS3FormSP::IFormSubmitListener",
            self.base
        )
    }

    /// Result page the server lands on after advancing to `interface`.
    pub fn interface(&self, interface: u8) -> String {
        format!("{}/IMINT/?wicket:interface=:{interface}:", self.base)
    }

    /// Resolves a (possibly relative) markup reference against the base.
    pub fn absolute(&self, reference: &str) -> String {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            reference.to_string()
        } else if reference.starts_with('/') {
            format!("{}{reference}", self.base)
        } else {
            format!("{}/{reference}", self.base)
        }
    }
}
