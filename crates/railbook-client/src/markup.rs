// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Markup anchor extraction for the booking site's pages.
//!
//! The remote pages are scraped against a fixed set of anchors (element
//! classes, ids, and input names). A missing anchor means the remote
//! form revision changed and surfaces as [`RailbookError::Parse`],
//! which is always fatal. All anchor knowledge stays inside this module
//! and the codec's field tables.

use std::sync::LazyLock;

use chrono::NaiveTime;
use railbook_codec::form;
use railbook_codec::SpecialFarePrompt;
use railbook_core::{BookingResult, RailbookError, TrainOption};
use regex::Regex;

static INPUT_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<input\b[^>]*>").unwrap());
static IMG_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<img\b[^>]*>").unwrap());
static ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([a-zA-Z][a-zA-Z0-9:_.-]*)="([^"]*)""#).unwrap());
static ANY_SRC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"src="([^"]+)""#).unwrap());
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static ERROR_PANEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<[a-zA-Z][^>]*class="[^"]*feedbackPanelERROR[^"]*"[^>]*>(?s:(.*?))</"#).unwrap()
});
static DURATION_DIV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<div[^>]*class="[^"]*duration[^"]*"[^>]*>(?s:(.*?))</div>"#).unwrap()
});
static DISCOUNT_DIV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<div[^>]*class="[^"]*discount[^"]*"[^>]*>(?s:(.*?))</div>"#).unwrap()
});
static SEAT_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<div[^>]*class="[^"]*seat-label[^"]*"[^>]*>(?s:(.*?))</div>"#).unwrap()
});
static INNER_DIV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<div[^>]*>(?s:(.*?))</div>").unwrap());

/// One fetched page: the final URL after redirects plus the body.
#[derive(Debug, Clone)]
pub struct ParsedPage {
    pub url: String,
    pub html: String,
}

impl ParsedPage {
    pub fn new(url: String, html: String) -> Self {
        Self { url, html }
    }

    /// The captcha challenge image reference on the landing page.
    pub fn captcha_image_src(&self) -> Result<String, RailbookError> {
        IMG_TAG
            .find_iter(&self.html)
            .map(|m| m.as_str())
            .find(|tag| {
                attr(tag, "class").is_some_and(|c| c.split_whitespace().any(|c| c == "captcha-img"))
            })
            .and_then(|tag| attr(tag, "src"))
            .ok_or_else(|| RailbookError::Parse("captcha image reference missing".into()))
    }

    /// The image reference in a challenge-refresh fragment.
    pub fn first_image_src(&self) -> Result<String, RailbookError> {
        ANY_SRC
            .captures(&self.html)
            .map(|c| c[1].to_string())
            .ok_or_else(|| RailbookError::Parse("refreshed captcha reference missing".into()))
    }

    /// Text of every error feedback panel on the page.
    pub fn error_panels(&self) -> Vec<String> {
        ERROR_PANEL
            .captures_iter(&self.html)
            .map(|c| clean_text(&c[1]))
            .filter(|t| !t.is_empty())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.html.contains(needle)
    }

    /// Whether the page still shows the train listing.
    pub fn has_train_listing(&self) -> bool {
        self.train_group_inputs().next().is_some()
    }

    /// Extracts every train row from the listing page. An empty result
    /// is a valid outcome (no availability), not a parse error.
    pub fn train_rows(&self) -> Result<Vec<TrainOption>, RailbookError> {
        let inputs: Vec<(usize, &str)> = self.train_group_inputs().collect();

        let mut trains = Vec::with_capacity(inputs.len());
        for (i, (end, tag)) in inputs.iter().enumerate() {
            let segment_end = inputs
                .get(i + 1)
                .map(|(next_end, next_tag)| next_end - next_tag.len())
                .unwrap_or(self.html.len());
            let segment = &self.html[*end..segment_end];

            let token = require_attr(tag, "value")?;
            let departure = parse_clock(&require_attr(tag, "querydeparture")?)?;
            let arrival = parse_clock(&require_attr(tag, "queryarrival")?)?;

            let duration_text = DURATION_DIV
                .captures(segment)
                .map(|c| clean_text(&c[1]))
                .ok_or_else(|| RailbookError::Parse("train duration block missing".into()))?;
            let (duration_minutes, train_no) = parse_duration_block(&duration_text)?;

            let discount = DISCOUNT_DIV
                .captures(segment)
                .map(|c| clean_text(&c[1]))
                .unwrap_or_default();

            trains.push(TrainOption {
                train_no,
                departure,
                arrival,
                duration_minutes,
                discount,
                token,
            });
        }
        Ok(trains)
    }

    /// Membership radio values in document order: guest, loyalty, tax-id.
    pub fn member_radio_values(&self) -> Result<Vec<String>, RailbookError> {
        let values: Vec<String> = INPUT_TAG
            .find_iter(&self.html)
            .map(|m| m.as_str())
            .filter(|tag| attr(tag, "name").as_deref() == Some(form::MEMBER_RADIO))
            .filter_map(|tag| attr(tag, "value"))
            .collect();
        if values.len() < 3 {
            return Err(RailbookError::Parse(format!(
                "expected 3 membership radio values, found {}",
                values.len()
            )));
        }
        Ok(values)
    }

    /// Special-fare passenger prompts the passenger page dynamically
    /// requires, in document order.
    pub fn special_fare_prompts(&self) -> Vec<SpecialFarePrompt> {
        const SPECIAL_FARE_LABELS: [&str; 2] = ["愛心票", "敬老票"];
        INPUT_TAG
            .find_iter(&self.html)
            .map(|m| m.as_str())
            .filter_map(|tag| {
                let label = attr(tag, "value")?;
                if !SPECIAL_FARE_LABELS.contains(&label.as_str()) {
                    return None;
                }
                let field = attr(tag, "name")?;
                field
                    .contains(form::SPECIAL_FARE_TYPE_MARKER)
                    .then_some(SpecialFarePrompt { field, label })
            })
            .collect()
    }

    /// Extracts the reservation record from the completion page.
    pub fn booking_result(&self) -> Result<BookingResult, RailbookError> {
        let html = &self.html;

        let reservation_no = class_text(html, "p", "pnr-code")
            .ok_or_else(|| missing("reservation number"))?;
        let payment_status = class_text(html, "p", "payment-status")
            .ok_or_else(|| missing("payment status"))?;
        let car_class = section(html, "car-type")
            .and_then(|tail| class_text(tail, "p", "info-data"))
            .ok_or_else(|| missing("car class"))?;
        let ticket_type = section(html, "ticket-type")
            .and_then(|tail| INNER_DIV.captures(tail).map(|c| clean_text(&c[1])))
            .ok_or_else(|| missing("ticket type"))?;
        let price =
            id_text(html, "span", "setTrainTotalPriceValue").ok_or_else(|| missing("price"))?;

        let card = section(html, "ticket-card").ok_or_else(|| missing("itinerary card"))?;
        let date = class_text(card, "span", "date").ok_or_else(|| missing("travel date"))?;
        let train_no =
            id_text(card, "span", "setTrainCode0").ok_or_else(|| missing("train number"))?;
        let departure_time =
            class_text(card, "p", "departure-time").ok_or_else(|| missing("departure time"))?;
        let departure_station =
            class_text(card, "p", "departure-stn").ok_or_else(|| missing("departure station"))?;
        let arrival_time =
            class_text(card, "p", "arrival-time").ok_or_else(|| missing("arrival time"))?;
        let arrival_station =
            class_text(card, "p", "arrival-stn").ok_or_else(|| missing("arrival station"))?;
        let duration =
            id_text(card, "span", "InfoEstimatedTime0").ok_or_else(|| missing("duration"))?;

        let detail = section(html, "detail").ok_or_else(|| missing("seat detail"))?;
        let seats: Vec<String> = SEAT_LABEL
            .captures_iter(detail)
            .map(|c| clean_text(&c[1]))
            .collect();
        if seats.is_empty() {
            return Err(missing("assigned seats"));
        }

        Ok(BookingResult {
            reservation_no,
            payment_status,
            car_class,
            ticket_type,
            price,
            date,
            train_no,
            duration,
            departure_time,
            departure_station,
            arrival_time,
            arrival_station,
            seats,
        })
    }

    /// Train-group inputs with their end offsets in the document.
    fn train_group_inputs(&self) -> impl Iterator<Item = (usize, &str)> {
        INPUT_TAG
            .find_iter(&self.html)
            .filter(|m| attr(m.as_str(), "name").as_deref() == Some(form::TRAIN_GROUP))
            .map(|m| (m.end(), m.as_str()))
    }
}

fn missing(what: &str) -> RailbookError {
    RailbookError::Parse(format!("{what} anchor missing from result page"))
}

/// Value of the named attribute within one tag.
fn attr(tag: &str, name: &str) -> Option<String> {
    ATTR.captures_iter(tag)
        .find(|c| &c[1] == name)
        .map(|c| c[2].to_string())
}

fn require_attr(tag: &str, name: &str) -> Result<String, RailbookError> {
    attr(tag, name)
        .ok_or_else(|| RailbookError::Parse(format!("train row attribute `{name}` missing")))
}

/// Inner text of the first `tag` element carrying `class`.
fn class_text(html: &str, tag: &str, class: &str) -> Option<String> {
    let pattern = format!(
        r#"<{tag}\b[^>]*class="[^"]*{}[^"]*"[^>]*>(?s:(.*?))</{tag}>"#,
        regex::escape(class)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(html).map(|c| clean_text(&c[1]))
}

/// Inner text of the first `tag` element carrying `id`.
fn id_text(html: &str, tag: &str, id: &str) -> Option<String> {
    let pattern = format!(
        r#"<{tag}\b[^>]*id="{}"[^>]*>(?s:(.*?))</{tag}>"#,
        regex::escape(id)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(html).map(|c| clean_text(&c[1]))
}

/// Document tail starting inside the first element carrying `class`.
fn section<'a>(html: &'a str, class: &str) -> Option<&'a str> {
    let pattern = format!(r#"<[a-zA-Z][^>]*class="[^"]*{}[^"]*"[^>]*>"#, regex::escape(class));
    let re = Regex::new(&pattern).ok()?;
    re.find(html).map(|m| &html[m.end()..])
}

/// Strips tags and collapses whitespace.
fn clean_text(fragment: &str) -> String {
    let without_tags = TAG.replace_all(fragment, " ");
    without_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_clock(text: &str) -> Result<NaiveTime, RailbookError> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M")
        .map_err(|_| RailbookError::Parse(format!("unparseable clock reading `{text}`")))
}

/// Splits a duration block ("schedule 01:54｜0803", icon words included)
/// into travel minutes and the train number.
fn parse_duration_block(text: &str) -> Result<(u32, String), RailbookError> {
    let cleaned = text.replace("schedule", "").replace("directions_railway", "");
    let mut parts = cleaned.split('｜');
    let clock = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RailbookError::Parse("train duration missing".into()))?;
    let train_no = parts
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RailbookError::Parse("train number missing from duration block".into()))?;

    let t = parse_clock(clock)?;
    use chrono::Timelike;
    Ok((t.hour() * 60 + t.minute(), train_no.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
<html><body>
<form>
<input type="radio" name="TrainQueryDataViewPanel:TrainGroup" value="radio40"
       querydeparture="08:00" queryarrival="09:54"/>
<div><div class="duration">schedule 01:54｜0803</div>
<div class="discount"></div></div>
<input type="radio" name="TrainQueryDataViewPanel:TrainGroup" value="radio41"
       querydeparture="08:25" queryarrival="10:40"/>
<div><div class="duration">schedule 02:15｜0647</div>
<div class="discount">85折</div></div>
</form>
</body></html>
"#;

    #[test]
    fn train_rows_extract_all_fields() {
        let page = ParsedPage::new("u".into(), LISTING.into());
        let trains = page.train_rows().unwrap();
        assert_eq!(trains.len(), 2);

        assert_eq!(trains[0].train_no, "0803");
        assert_eq!(trains[0].token, "radio40");
        assert_eq!(trains[0].departure, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(trains[0].arrival, NaiveTime::from_hms_opt(9, 54, 0).unwrap());
        assert_eq!(trains[0].duration_minutes, 114);
        assert_eq!(trains[0].discount, "");

        assert_eq!(trains[1].train_no, "0647");
        assert_eq!(trains[1].discount, "85折");
        assert_eq!(trains[1].duration_minutes, 135);
    }

    #[test]
    fn pages_without_listing_have_no_rows() {
        let page = ParsedPage::new("u".into(), "<html><body>done</body></html>".into());
        assert!(!page.has_train_listing());
        assert!(page.train_rows().unwrap().is_empty());
    }

    #[test]
    fn error_panels_collect_stripped_text() {
        let html = r#"
<span class="feedbackPanelERROR">  很抱歉，您選擇的車次已售完  </span>
<li class="feedbackPanelERROR">請選擇起程站</li>
"#;
        let page = ParsedPage::new("u".into(), html.into());
        assert_eq!(
            page.error_panels(),
            vec!["很抱歉，您選擇的車次已售完", "請選擇起程站"]
        );
    }

    #[test]
    fn captcha_src_requires_the_captcha_class() {
        let html = r#"<img src="/logo.png"/><img class="captcha-img" src="/IMINT/captcha?id=7"/>"#;
        let page = ParsedPage::new("u".into(), html.into());
        assert_eq!(page.captcha_image_src().unwrap(), "/IMINT/captcha?id=7");

        let bare = ParsedPage::new("u".into(), r#"<img src="/logo.png"/>"#.into());
        assert!(matches!(
            bare.captcha_image_src(),
            Err(RailbookError::Parse(_))
        ));
    }

    #[test]
    fn refresh_fragment_yields_first_src() {
        let page = ParsedPage::new(
            "u".into(),
            r#"<ajax-response><img src="/IMINT/captcha?id=8"/></ajax-response>"#.into(),
        );
        assert_eq!(page.first_image_src().unwrap(), "/IMINT/captcha?id=8");
    }

    #[test]
    fn member_radio_values_in_document_order() {
        let html = format!(
            r#"
<input type="radio" name="{n}" value="radio21"/>
<input type="radio" name="{n}" value="radio22"/>
<input type="radio" name="{n}" value="radio23"/>
<input type="text" name="{n}:memberShipNumber" value=""/>
"#,
            n = form::MEMBER_RADIO
        );
        let page = ParsedPage::new("u".into(), html);
        assert_eq!(
            page.member_radio_values().unwrap(),
            vec!["radio21", "radio22", "radio23"]
        );
    }

    #[test]
    fn too_few_member_radios_is_a_parse_error() {
        let html = format!(r#"<input name="{}" value="radio21"/>"#, form::MEMBER_RADIO);
        let page = ParsedPage::new("u".into(), html);
        assert!(matches!(
            page.member_radio_values(),
            Err(RailbookError::Parse(_))
        ));
    }

    #[test]
    fn special_fare_prompts_pair_field_and_label() {
        let html = r#"
<input name="rows:1:passengerDataView:passengerDataTypeName" value="愛心票"/>
<input name="rows:2:passengerDataView:passengerDataTypeName" value="敬老票"/>
<input name="rows:3:passengerDataView:passengerDataTypeName" value="大學生"/>
"#;
        let page = ParsedPage::new("u".into(), html.into());
        let prompts = page.special_fare_prompts();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0].label, "愛心票");
        assert_eq!(
            prompts[1].id_field(),
            "rows:2:passengerDataView:passengerDataIdNumber"
        );
    }

    const RESULT_PAGE: &str = r#"
<html><body>
<p class="pnr-code"><span>07128526</span></p>
<p class="payment-status">未付款，請於 2026/08/10 前完成付款</p>
<div class="car-type"><p class="info-title">車廂</p><p class="info-data">標準車廂</p></div>
<div class="ticket-type"><div>全票 2</div></div>
<span id="setTrainTotalPriceValue">NT$ 2,980</span>
<div class="ticket-card">
  <span class="date">2026/08/20</span>
  <span id="setTrainCode0">0803</span>
  <p class="departure-time">08:00</p>
  <p class="departure-stn">台北</p>
  <p class="arrival-time">09:54</p>
  <p class="arrival-stn">左營</p>
  <span id="InfoEstimatedTime0">01:54</span>
</div>
<div class="detail">
  <div class="seat-label">10車 5A</div>
  <div class="seat-label">10車 5B</div>
</div>
</body></html>
"#;

    #[test]
    fn booking_result_extracts_every_anchor() {
        let page = ParsedPage::new("u".into(), RESULT_PAGE.into());
        let result = page.booking_result().unwrap();
        assert_eq!(result.reservation_no, "07128526");
        assert_eq!(result.payment_status, "未付款，請於 2026/08/10 前完成付款");
        assert_eq!(result.car_class, "標準車廂");
        assert_eq!(result.ticket_type, "全票 2");
        assert_eq!(result.price, "NT$ 2,980");
        assert_eq!(result.date, "2026/08/20");
        assert_eq!(result.train_no, "0803");
        assert_eq!(result.departure_time, "08:00");
        assert_eq!(result.departure_station, "台北");
        assert_eq!(result.arrival_time, "09:54");
        assert_eq!(result.arrival_station, "左營");
        assert_eq!(result.duration, "01:54");
        assert_eq!(result.seats, vec!["10車 5A", "10車 5B"]);
    }

    #[test]
    fn missing_result_anchor_is_fatal_parse_error() {
        let truncated = RESULT_PAGE.replace(r#"<p class="pnr-code"><span>07128526</span></p>"#, "");
        let page = ParsedPage::new("u".into(), truncated);
        assert!(matches!(
            page.booking_result(),
            Err(RailbookError::Parse(_))
        ));
    }
}
