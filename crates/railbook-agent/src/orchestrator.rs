// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Booking state machine.
//!
//! Drives one booking attempt through the page exchanges:
//! `Init -> AwaitCaptcha -> FormSubmitted -> TrainListed ->
//! TrainConfirmed -> PassengerConfirmed -> Done`, with `Failed` as the
//! absorbing state for non-retryable conditions. Every recoverable
//! failure kind has its own bounded attempt budget; exhausting a budget
//! converts the error to a fatal failure. A request with an explicit
//! train number skips the listing states entirely, as the server's own
//! form routing does.

use std::sync::Arc;

use railbook_client::{PageKind, ParsedPage, WorkflowClient};
use railbook_core::{
    BookingResult, BookingSession, CaptchaResolver, Outcome, RailbookError, TrainOption,
    TripRequest,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::select::{select_train, SelectionPrefs};

/// States of the booking state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    Init,
    AwaitCaptcha,
    FormSubmitted,
    TrainListed,
    TrainConfirmed,
    PassengerConfirmed,
    Done,
    Failed,
}

impl std::fmt::Display for BookingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingState::Init => write!(f, "init"),
            BookingState::AwaitCaptcha => write!(f, "await-captcha"),
            BookingState::FormSubmitted => write!(f, "form-submitted"),
            BookingState::TrainListed => write!(f, "train-listed"),
            BookingState::TrainConfirmed => write!(f, "train-confirmed"),
            BookingState::PassengerConfirmed => write!(f, "passenger-confirmed"),
            BookingState::Done => write!(f, "done"),
            BookingState::Failed => write!(f, "failed"),
        }
    }
}

/// Orchestrator knobs, passed explicitly at construction.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum tickets per reservation.
    pub max_tickets: u32,
    /// Bounded retry budget for captcha mismatches.
    pub max_captcha_retries: u32,
    /// Bounded retry budget per other recoverable failure kind.
    pub max_form_retries: u32,
}

/// Outcome of a listing-only run.
#[derive(Debug)]
pub enum ListingOutcome {
    Trains(Vec<TrainOption>),
    Failed(String),
    Cancelled,
}

/// Why the state machine stopped before producing a result.
enum Halt {
    Cancelled,
    Failed(String),
}

impl From<RailbookError> for Halt {
    fn from(e: RailbookError) -> Self {
        Halt::Failed(e.to_string())
    }
}

/// Bounded attempt counter for one recoverable failure kind.
struct Budget {
    kind: &'static str,
    used: u32,
    limit: u32,
}

impl Budget {
    fn new(kind: &'static str, limit: u32) -> Self {
        Self { kind, used: 0, limit }
    }

    /// Consumes one attempt, failing the run once the budget is gone.
    fn spend(&mut self, reason: &str) -> Result<(), Halt> {
        self.used += 1;
        if self.used > self.limit {
            return Err(Halt::Failed(format!(
                "{} retry budget ({}) exhausted: {reason}",
                self.kind, self.limit
            )));
        }
        warn!(kind = self.kind, attempt = self.used, limit = self.limit, %reason, "retrying");
        Ok(())
    }
}

/// Drives one booking attempt. Owns the workflow client (and with it
/// the session cookie jar) exclusively; a second attempt needs a second
/// orchestrator.
pub struct Orchestrator {
    client: WorkflowClient,
    resolver: Arc<dyn CaptchaResolver>,
    prefs: SelectionPrefs,
    config: OrchestratorConfig,
    cancel: CancellationToken,
    trace: Vec<BookingState>,
}

impl Orchestrator {
    pub fn new(
        client: WorkflowClient,
        resolver: Arc<dyn CaptchaResolver>,
        prefs: SelectionPrefs,
        config: OrchestratorConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            resolver,
            prefs,
            config,
            cancel,
            trace: Vec::new(),
        }
    }

    /// States entered so far, in order.
    pub fn trace(&self) -> &[BookingState] {
        &self.trace
    }

    /// Runs the booking attempt to its terminal outcome.
    pub async fn run(&mut self, trip: &TripRequest) -> Outcome {
        match self.run_inner(trip).await {
            Ok(result) => {
                self.enter(BookingState::Done);
                info!(reservation = %result.reservation_no, "booking complete");
                Outcome::Success(Box::new(result))
            }
            Err(Halt::Cancelled) => {
                info!("booking cancelled before completion");
                Outcome::Cancelled
            }
            Err(Halt::Failed(reason)) => {
                self.enter(BookingState::Failed);
                warn!(%reason, "booking failed");
                Outcome::Failed(reason)
            }
        }
    }

    /// Runs only far enough to list the available trains.
    pub async fn list(&mut self, trip: &TripRequest) -> ListingOutcome {
        match self.list_inner(trip).await {
            Ok(trains) => ListingOutcome::Trains(trains),
            Err(Halt::Cancelled) => ListingOutcome::Cancelled,
            Err(Halt::Failed(reason)) => {
                self.enter(BookingState::Failed);
                ListingOutcome::Failed(reason)
            }
        }
    }

    async fn run_inner(&mut self, trip: &TripRequest) -> Result<BookingResult, Halt> {
        let (page, direct) = self.advance_past_form(trip).await?;

        let page = if direct {
            page
        } else {
            self.enter(BookingState::TrainListed);
            self.confirm_selected_train(&page).await?
        };
        self.enter(BookingState::TrainConfirmed);

        let result_page = self.confirm_passenger(trip, &page, direct).await?;
        self.enter(BookingState::PassengerConfirmed);

        let result = self.client.extract_result(&result_page)?;
        Ok(result)
    }

    async fn list_inner(&mut self, trip: &TripRequest) -> Result<Vec<TrainOption>, Halt> {
        let (page, direct) = self.advance_past_form(trip).await?;
        if direct {
            return Err(Halt::Failed(
                "listing is not available for an explicit train number".into(),
            ));
        }
        self.enter(BookingState::TrainListed);
        Ok(self.client.list_trains(&page)?)
    }

    /// Init through FormSubmitted: opens the session, solves the
    /// captcha, and submits the search form until it advances. Returns
    /// the advanced page and whether the direct-train-number routing is
    /// in effect.
    async fn advance_past_form(
        &mut self,
        trip: &TripRequest,
    ) -> Result<(ParsedPage, bool), Halt> {
        trip.validate(self.config.max_tickets)?;

        self.enter(BookingState::Init);
        self.checkpoint()?;
        let mut session = self.client.start_session().await?;

        self.enter(BookingState::AwaitCaptcha);
        let page = self.submit_with_captcha(&mut session, trip).await?;
        self.enter(BookingState::FormSubmitted);

        Ok((page, trip.train_no.is_some()))
    }

    /// The captcha-solve-and-retry loop around the step-1 submission.
    async fn submit_with_captcha(
        &mut self,
        session: &mut BookingSession,
        trip: &TripRequest,
    ) -> Result<ParsedPage, Halt> {
        let mut captcha = Budget::new("captcha", self.config.max_captcha_retries);
        let mut recognition = Budget::new("recognition", self.config.max_form_retries);
        let mut submission = Budget::new("submission", self.config.max_form_retries);

        loop {
            self.checkpoint()?;
            let image = match self.client.fetch_captcha(session).await {
                Ok(image) => image,
                Err(e) if e.retryable() => {
                    submission.spend(&e.to_string())?;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let text = match self.resolver.resolve(&image).await {
                Ok(text) => text,
                Err(e) if e.retryable() => {
                    recognition.spend(&e.to_string())?;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            debug!(resolver = self.resolver.name(), %text, "captcha resolved");

            self.checkpoint()?;
            match self.client.submit_booking_form(session, trip, &text).await {
                Ok((PageKind::Advance, page)) => return Ok(page),
                Ok((PageKind::Unavailable(msg), _)) => return Err(Halt::Failed(msg)),
                Ok((PageKind::CaptchaMismatch, _)) => {
                    captcha.spend("captcha text rejected")?;
                    self.checkpoint()?;
                    self.client.refresh_captcha(session).await?;
                }
                Ok((PageKind::ValidationError(msg), _)) => {
                    submission.spend(&msg)?;
                }
                Err(e) if e.retryable() => {
                    submission.spend(&e.to_string())?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// TrainListed through TrainConfirmed, re-listing on a bounced
    /// confirmation within the bounded budget.
    async fn confirm_selected_train(&mut self, listing: &ParsedPage) -> Result<ParsedPage, Halt> {
        let mut budget = Budget::new("train-confirmation", self.config.max_form_retries);
        let mut page = listing.clone();

        loop {
            let trains = self.client.list_trains(&page)?;
            if trains.is_empty() {
                return Err(Halt::Failed("no trains available".into()));
            }
            for (i, train) in trains.iter().enumerate() {
                debug!(option = i + 1, train = %train, "listed");
            }

            let selected = select_train(&trains, &self.prefs)
                .ok_or_else(|| Halt::Failed("no trains available".into()))?;
            info!(train = %selected, "selected train");

            self.checkpoint()?;
            match self.client.confirm_train(selected).await {
                Ok((PageKind::Advance, next)) => return Ok(next),
                Ok((PageKind::Unavailable(msg), _)) => return Err(Halt::Failed(msg)),
                Ok((kind, next)) => {
                    let reason = match kind {
                        PageKind::ValidationError(msg) => msg,
                        _ => "train confirmation bounced back to the listing".to_string(),
                    };
                    budget.spend(&reason)?;
                    // A bounced confirmation returns a fresh listing.
                    if next.has_train_listing() {
                        page = next;
                    }
                }
                Err(e) if e.retryable() => {
                    budget.spend(&e.to_string())?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// TrainConfirmed through the final submission.
    async fn confirm_passenger(
        &mut self,
        trip: &TripRequest,
        confirmed: &ParsedPage,
        direct: bool,
    ) -> Result<ParsedPage, Halt> {
        let mut budget = Budget::new("passenger-confirmation", self.config.max_form_retries);

        loop {
            self.checkpoint()?;
            match self.client.confirm_passenger(trip, confirmed, direct).await {
                Ok((PageKind::Advance, next)) => return Ok(next),
                Ok((PageKind::Unavailable(msg), _)) => return Err(Halt::Failed(msg)),
                Ok((PageKind::CaptchaMismatch, _)) => {
                    budget.spend("unexpected captcha rejection on passenger form")?;
                }
                Ok((PageKind::ValidationError(msg), _)) => {
                    budget.spend(&msg)?;
                }
                Err(e) if e.retryable() => {
                    budget.spend(&e.to_string())?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Honors cancellation between HTTP steps: a request already in
    /// flight completes, but no further step starts.
    fn checkpoint(&self) -> Result<(), Halt> {
        if self.cancel.is_cancelled() {
            return Err(Halt::Cancelled);
        }
        Ok(())
    }

    fn enter(&mut self, state: BookingState) {
        debug!(state = %state, "state entered");
        self.trace.push(state);
    }
}
