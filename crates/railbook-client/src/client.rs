// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cookie-bearing HTTP client driving the four page exchanges.
//!
//! One [`WorkflowClient`] serves exactly one booking attempt: the
//! session cookie jar, the server-issued session token, and every
//! selection token it sees belong to that attempt alone.

use std::time::Duration;

use railbook_codec::form;
use railbook_codec::FormSchema;
use railbook_core::{BookingResult, BookingSession, RailbookError, TrainOption, TripRequest};
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use tracing::{debug, info};

use crate::classify::{classify, PageKind};
use crate::endpoints::Endpoints;
use crate::markup::ParsedPage;

const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "zh-TW,zh;q=0.8,en-US;q=0.5,en;q=0.3";

/// Session cookie name issued by the booking site.
const SESSION_COOKIE: &str = "JSESSIONID";

/// Configuration for one workflow client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub proxy: Option<String>,
    pub schema: FormSchema,
    pub max_tickets: u32,
}

/// HTTP workflow client for the booking site.
#[derive(Debug, Clone)]
pub struct WorkflowClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    schema: FormSchema,
    max_tickets: u32,
}

impl WorkflowClient {
    /// Creates a client with a fresh cookie jar for one booking attempt.
    pub fn new(config: ClientConfig) -> Result<Self, RailbookError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| RailbookError::Config(format!("invalid user agent: {e}")))?,
        );
        headers.insert(reqwest::header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE),
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(config.timeout);

        if let Some(proxy) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| RailbookError::Config(format!("invalid proxy url: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let http = builder.build().map_err(|e| RailbookError::Transport {
            message: format!("failed to build HTTP client: {e}"),
            source: Some(Box::new(e)),
        })?;

        Ok(Self {
            http,
            endpoints: Endpoints::new(&config.base_url),
            schema: config.schema,
            max_tickets: config.max_tickets,
        })
    }

    /// Opens a booking session: fetches the landing page and returns the
    /// server-issued session token with the captcha image reference.
    ///
    /// Both must be present; a response missing either is retried once
    /// before the error is surfaced.
    pub async fn start_session(&self) -> Result<BookingSession, RailbookError> {
        let mut last_error = None;
        for attempt in 0..2 {
            match self.try_start_session().await {
                Ok(session) => {
                    info!(attempt, "booking session opened");
                    return Ok(session);
                }
                Err(e) => {
                    debug!(attempt, error = %e, "session open attempt failed");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| RailbookError::Internal(
            "session open failed without an error".into(),
        )))
    }

    async fn try_start_session(&self) -> Result<BookingSession, RailbookError> {
        let response = self
            .http
            .get(self.endpoints.landing())
            .send()
            .await
            .map_err(transport)?;

        let token = response
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(|| RailbookError::Parse("session cookie missing from response".into()))?;

        let page = into_page(response).await?;
        let captcha_ref = self.endpoints.absolute(&page.captcha_image_src()?);

        Ok(BookingSession { token, captcha_ref })
    }

    /// Downloads the current challenge image.
    pub async fn fetch_captcha(&self, session: &BookingSession) -> Result<Vec<u8>, RailbookError> {
        let response = self
            .http
            .get(&session.captcha_ref)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(RailbookError::Transport {
                message: format!("captcha image fetch returned {status}"),
                source: None,
            });
        }
        let bytes = response.bytes().await.map_err(transport)?;
        Ok(bytes.to_vec())
    }

    /// Requests a fresh challenge without restarting the session,
    /// replacing the session's captcha reference in place.
    pub async fn refresh_captcha(
        &self,
        session: &mut BookingSession,
    ) -> Result<(), RailbookError> {
        let url = self
            .endpoints
            .captcha_refresh(&session.token, rand::random::<f64>());
        let response = self.http.get(url).send().await.map_err(transport)?;
        let page = into_page(response).await?;
        session.captcha_ref = self.endpoints.absolute(&page.first_image_src()?);
        info!("captcha challenge refreshed");
        Ok(())
    }

    /// Submits the step-1 search form and classifies the response.
    pub async fn submit_booking_form(
        &self,
        session: &BookingSession,
        trip: &TripRequest,
        captcha_text: &str,
    ) -> Result<(PageKind, ParsedPage), RailbookError> {
        let fields = form::build_booking_form(trip, &self.schema, captcha_text, self.max_tickets)?;
        let url = self.endpoints.submit_booking_form(&session.token);
        let referer = self.endpoints.home();

        let page = self.post_form(&url, &referer, &fields).await?;
        let kind = classify(&page, &self.endpoints.interface(1));
        Ok((kind, page))
    }

    /// Extracts the train rows from an advanced step-1 response.
    ///
    /// An empty list is the terminal no-availability outcome, reported
    /// by the orchestrator rather than retried.
    pub fn list_trains(&self, page: &ParsedPage) -> Result<Vec<TrainOption>, RailbookError> {
        page.train_rows()
    }

    /// Submits the step-2 form confirming the selected train.
    pub async fn confirm_train(
        &self,
        train: &TrainOption,
    ) -> Result<(PageKind, ParsedPage), RailbookError> {
        let fields = form::build_train_form(&train.token);
        let url = self.endpoints.confirm_train();
        let referer = self.endpoints.interface(1);

        let page = self.post_form(&url, &referer, &fields).await?;
        let kind = classify(&page, &self.endpoints.interface(2));
        Ok((kind, page))
    }

    /// Submits the step-3 passenger form.
    ///
    /// The membership radio value is taken from the page in priority
    /// order loyalty-id > tax-id > guest, following which optional
    /// fields the request populates; special-fare prompts found in the
    /// markup are filled from the request's companion ids.
    pub async fn confirm_passenger(
        &self,
        trip: &TripRequest,
        page: &ParsedPage,
        direct_train: bool,
    ) -> Result<(PageKind, ParsedPage), RailbookError> {
        let members = page.member_radio_values()?;
        let member_value = if trip.loyalty_id.is_some() {
            &members[1]
        } else if trip.tax_id.is_some() {
            &members[2]
        } else {
            &members[0]
        };
        let prompts = page.special_fare_prompts();

        let fields = form::build_passenger_form(trip, member_value, &prompts)?;

        let interface = if direct_train { 1 } else { 2 };
        let url = self.endpoints.confirm_passenger(interface);
        let referer = self.endpoints.interface(interface);

        let response = self.post_form(&url, &referer, &fields).await?;
        let kind = classify(&response, &self.endpoints.interface(interface + 1));
        Ok((kind, response))
    }

    /// Extracts the reservation record from the completion page.
    pub fn extract_result(&self, page: &ParsedPage) -> Result<BookingResult, RailbookError> {
        page.booking_result()
    }

    async fn post_form(
        &self,
        url: &str,
        referer: &str,
        fields: &[(String, String)],
    ) -> Result<ParsedPage, RailbookError> {
        let response = self
            .http
            .post(url)
            .header(REFERER, referer)
            .header("Upgrade-Insecure-Requests", "1")
            .form(fields)
            .send()
            .await
            .map_err(transport)?;
        into_page(response).await
    }
}

fn transport(e: reqwest::Error) -> RailbookError {
    let message = if e.is_timeout() {
        format!("request timed out: {e}")
    } else {
        format!("request failed: {e}")
    };
    RailbookError::Transport {
        message,
        source: Some(Box::new(e)),
    }
}

async fn into_page(response: reqwest::Response) -> Result<ParsedPage, RailbookError> {
    let status = response.status();
    let url = response.url().to_string();
    if !status.is_success() {
        return Err(RailbookError::Transport {
            message: format!("{url} returned {status}"),
            source: None,
        });
    }
    let body = response.text().await.map_err(transport)?;
    Ok(ParsedPage::new(url, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use railbook_codec::SchemaVersion;
    use railbook_core::{CarClass, FareClass, SeatPreference, StationId, TicketCounts};
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> WorkflowClient {
        WorkflowClient::new(ClientConfig {
            base_url: base_url.to_string(),
            user_agent: "railbook-test/1.0".into(),
            timeout: Duration::from_secs(5),
            proxy: None,
            schema: FormSchema::new(SchemaVersion::V5),
            max_tickets: 10,
        })
        .unwrap()
    }

    fn trip() -> TripRequest {
        TripRequest {
            origin: StationId(2),
            destination: StationId(12),
            date: NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
            departure: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            tickets: TicketCounts::new().with(FareClass::Adult, 2),
            car_class: CarClass::Standard,
            seat_preference: SeatPreference::Any,
            train_no: None,
            latest_arrival: None,
            national_id: "A123456789".into(),
            phone: "0911222333".into(),
            email: "rider@example.com".into(),
            loyalty_id: None,
            tax_id: None,
            companion_ids: Vec::new(),
        }
    }

    const LANDING: &str = r#"<html><body>
<form><img class="captcha-img" src="/IMINT/captcha?id=1"/></form>
</body></html>"#;

    async fn mount_landing(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/IMINT/"))
            .and(query_param("locale", "tw"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "JSESSIONID=sess42; Path=/IMINT")
                    .set_body_string(LANDING),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn start_session_yields_token_and_captcha_ref() {
        let server = MockServer::start().await;
        mount_landing(&server).await;

        let client = test_client(&server.uri());
        let session = client.start_session().await.unwrap();
        assert_eq!(session.token, "sess42");
        assert_eq!(
            session.captcha_ref,
            format!("{}/IMINT/captcha?id=1", server.uri())
        );
    }

    #[tokio::test]
    async fn start_session_retries_once_on_missing_cookie() {
        let server = MockServer::start().await;

        // First response has the page but no session cookie.
        Mock::given(method("GET"))
            .and(path("/IMINT/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LANDING))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        mount_landing(&server).await;

        let client = test_client(&server.uri());
        let session = client.start_session().await.unwrap();
        assert_eq!(session.token, "sess42");
    }

    #[tokio::test]
    async fn start_session_fails_after_second_bad_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/IMINT/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html/>"))
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.start_session().await.unwrap_err();
        assert!(matches!(err, RailbookError::Parse(_)));
    }

    #[tokio::test]
    async fn fetch_captcha_returns_image_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/IMINT/captcha"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(&b"png-bytes"[..]))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let session = BookingSession {
            token: "sess42".into(),
            captcha_ref: format!("{}/IMINT/captcha?id=1", server.uri()),
        };
        let bytes = client.fetch_captcha(&session).await.unwrap();
        assert_eq!(bytes, b"png-bytes");
    }

    #[tokio::test]
    async fn refresh_captcha_replaces_reference_in_place() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/IMINT/;jsessionid=sess42"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<ajax-response><img src="/IMINT/captcha?id=9"/></ajax-response>"#),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let mut session = BookingSession {
            token: "sess42".into(),
            captcha_ref: format!("{}/IMINT/captcha?id=1", server.uri()),
        };
        client.refresh_captcha(&mut session).await.unwrap();
        assert_eq!(
            session.captcha_ref,
            format!("{}/IMINT/captcha?id=9", server.uri())
        );
    }

    const LISTING: &str = r#"<html><body>
<input type="radio" name="TrainQueryDataViewPanel:TrainGroup" value="radio40"
       querydeparture="10:00" queryarrival="11:54"/>
<div><div class="duration">01:54｜0823</div><div class="discount"></div></div>
</body></html>"#;

    #[tokio::test]
    async fn submit_booking_form_advances_through_redirect() {
        let server = MockServer::start().await;
        let base = server.uri();

        Mock::given(method("POST"))
            .and(path("/IMINT/;jsessionid=sess42"))
            .and(body_string_contains("selectStartStation=2"))
            .and(body_string_contains("toTimeTable=1000A"))
            .and(body_string_contains("SubmitButton=Search"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("location", format!("{base}/IMINT/?wicket:interface=:1:")),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/IMINT/"))
            .and(query_param("wicket:interface", ":1:"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
            .mount(&server)
            .await;

        let client = test_client(&base);
        let session = BookingSession {
            token: "sess42".into(),
            captcha_ref: format!("{base}/IMINT/captcha?id=1"),
        };
        let (kind, page) = client
            .submit_booking_form(&session, &trip(), "X4K9")
            .await
            .unwrap();
        assert_eq!(kind, PageKind::Advance);

        let trains = client.list_trains(&page).unwrap();
        assert_eq!(trains.len(), 1);
        assert_eq!(trains[0].train_no, "0823");
    }

    #[tokio::test]
    async fn sold_out_submission_classifies_unavailable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/IMINT/;jsessionid=sess42"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<span class="feedbackPanelERROR">很抱歉，您選擇的車次已售完</span>"#,
            ))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let session = BookingSession {
            token: "sess42".into(),
            captcha_ref: String::new(),
        };
        let (kind, _) = client
            .submit_booking_form(&session, &trip(), "X4K9")
            .await
            .unwrap();
        assert!(matches!(kind, PageKind::Unavailable(_)));
    }

    const PASSENGER_PAGE: &str = r#"<html><body>
<input type="radio" name="TicketMemberSystemInputPanel:TakerMemberSystemDataView:memberSystemRadioGroup" value="radio21"/>
<input type="radio" name="TicketMemberSystemInputPanel:TakerMemberSystemDataView:memberSystemRadioGroup" value="radio22"/>
<input type="radio" name="TicketMemberSystemInputPanel:TakerMemberSystemDataView:memberSystemRadioGroup" value="radio23"/>
</body></html>"#;

    #[tokio::test]
    async fn confirm_passenger_selects_membership_by_priority() {
        let server = MockServer::start().await;
        let base = server.uri();

        Mock::given(method("POST"))
            .and(path("/IMINT/"))
            .and(query_param("wicket:interface", ":2:BookingS3FormSP::IFormSubmitListener"))
            .and(body_string_contains("memberSystemRadioGroup=radio22"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("location", format!("{base}/IMINT/?wicket:interface=:3:")),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/IMINT/"))
            .and(query_param("wicket:interface", ":3:"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html/>"))
            .mount(&server)
            .await;

        let mut trip = trip();
        trip.loyalty_id = Some("TG123".into());

        let client = test_client(&base);
        let page = ParsedPage::new("u".into(), PASSENGER_PAGE.into());
        let (kind, _) = client.confirm_passenger(&trip, &page, false).await.unwrap();
        assert_eq!(kind, PageKind::Advance);
    }
}
