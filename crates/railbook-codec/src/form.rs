// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The wire contract of the remote booking forms.
//!
//! Every form field name the site expects lives here, keyed by the
//! form-schema revision, so a remote form change is an edit to this
//! module and nowhere else. The builders return ordered `(name, value)`
//! pairs ready for a URL-encoded POST body.

use chrono::NaiveDate;
use railbook_core::{FareClass, RailbookError, TripRequest};
use strum::{Display, EnumString};

use crate::identity::validate_national_id;
use crate::tickets::encode_tickets;
use crate::time::TimeSlot;

/// Known revisions of the remote form layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SchemaVersion {
    /// Legacy four-slot ticket panel (adult, child, disabled, senior).
    V4,
    /// Current five-slot ticket panel (adds the college slot).
    #[default]
    V5,
}

/// Versioned descriptor of the active form layout: ticket slot count and
/// canonical fare-class order. Selected once per deployment from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSchema {
    version: SchemaVersion,
}

impl FormSchema {
    pub fn new(version: SchemaVersion) -> Self {
        Self { version }
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Fare classes in slot order; one ticket-amount field per entry.
    pub fn fare_order(&self) -> &'static [FareClass] {
        match self.version {
            SchemaVersion::V4 => &[
                FareClass::Adult,
                FareClass::Child,
                FareClass::Disabled,
                FareClass::Senior,
            ],
            SchemaVersion::V5 => &[
                FareClass::Adult,
                FareClass::Child,
                FareClass::Disabled,
                FareClass::Senior,
                FareClass::College,
            ],
        }
    }

    pub fn slot_count(&self) -> usize {
        self.fare_order().len()
    }

    /// Field name of ticket slot `i`.
    pub fn ticket_field(&self, i: usize) -> String {
        format!("ticketPanel:rows:{i}:ticketAmount")
    }
}

// Step-1 search form (BookingS1Form).
pub const S1_HIDDEN: &str = "BookingS1Form:hf:0";
pub const TRIP_TYPE: &str = "tripCon:typesoftrip";
pub const CAR_CLASS: &str = "trainCon:trainRadioGroup";
pub const SEAT_PREFERENCE: &str = "seatCon:seatRadioGroup";
pub const BOOKING_METHOD: &str = "bookingMethod";
pub const START_STATION: &str = "selectStartStation";
pub const DEST_STATION: &str = "selectDestinationStation";
pub const OUTBOUND_DATE: &str = "toTimeInputField";
pub const RETURN_DATE: &str = "backTimeInputField";
pub const OUTBOUND_SLOT: &str = "toTimeTable";
pub const OUTBOUND_TRAIN_NO: &str = "toTrainIDInputField";
pub const RETURN_SLOT: &str = "backTimeTable";
pub const RETURN_TRAIN_NO: &str = "backTrainIDInputField";
pub const CAPTCHA_TEXT: &str = "homeCaptcha:securityCode";
pub const SUBMIT: &str = "SubmitButton";
pub const PORTAL_TAG: &str = "portalTag";
pub const TEEN_WINDOW_START: &str = "startTimeForTeenager";
pub const TEEN_WINDOW_END: &str = "endTimeForTeenager";
pub const TEEN_SHOWN: &str = "isShowTeenager";

/// Booking-method radio: search by time slot vs. by explicit train number.
pub const METHOD_BY_TIME: &str = "radio31";
pub const METHOD_BY_TRAIN_NO: &str = "radio33";

// Step-2 train-selection form (BookingS2Form).
pub const S2_HIDDEN: &str = "BookingS2Form:hf:0";
pub const TRAIN_GROUP: &str = "TrainQueryDataViewPanel:TrainGroup";

// Step-3 passenger form (BookingS3FormSP).
pub const S3_HIDDEN: &str = "BookingS3FormSP:hf:0";
pub const DIFF_OVER: &str = "diffOver";
pub const IS_S_PROMOTION: &str = "isSPromotion";
pub const PASSENGER_COUNT: &str = "passengerCount";
pub const IS_GO_BACK: &str = "isGoBackM";
pub const BACK_HOME: &str = "backHome";
pub const TGO_ERROR: &str = "TgoError";
pub const ID_INPUT_RADIO: &str = "idInputRadio";
pub const NATIONAL_ID: &str = "dummyId";
pub const PHONE: &str = "dummyPhone";
pub const EMAIL: &str = "email";
pub const MEMBER_RADIO: &str =
    "TicketMemberSystemInputPanel:TakerMemberSystemDataView:memberSystemRadioGroup";
pub const MEMBER_LOYALTY_NO: &str =
    "TicketMemberSystemInputPanel:TakerMemberSystemDataView:memberSystemRadioGroup:memberShipNumber";
pub const MEMBER_TAX_NO: &str =
    "TicketMemberSystemInputPanel:TakerMemberSystemDataView:memberSystemRadioGroup:GUINumber:";
pub const AGREE: &str = "agree";

/// Marker substring replaced to derive the paired id field of a
/// special-fare passenger prompt.
pub const SPECIAL_FARE_TYPE_MARKER: &str = "passengerDataTypeName";
pub const SPECIAL_FARE_ID_MARKER: &str = "passengerDataIdNumber";

/// One special-fare passenger prompt found in the passenger page markup:
/// the form expects the type field echoed back together with a national
/// id in the paired `passengerDataIdNumber` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialFarePrompt {
    /// Full field name carrying the fare-type label.
    pub field: String,
    /// Fare-type label value to echo back (as found in the markup).
    pub label: String,
}

impl SpecialFarePrompt {
    /// Field name of the paired national-id input.
    pub fn id_field(&self) -> String {
        self.field
            .replace(SPECIAL_FARE_TYPE_MARKER, SPECIAL_FARE_ID_MARKER)
    }
}

fn form_date(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

/// Builds the step-1 search form.
///
/// With an explicit train number the booking-method radio switches to
/// by-train-number and the time-slot field is left empty; the server
/// then routes straight to the passenger page after this submission.
pub fn build_booking_form(
    trip: &TripRequest,
    schema: &FormSchema,
    captcha_text: &str,
    max_tickets: u32,
) -> Result<Vec<(String, String)>, RailbookError> {
    let tokens = encode_tickets(&trip.tickets, schema, max_tickets)?;

    let (method, slot, train_no) = match trip.train_no.as_deref() {
        Some(no) => (METHOD_BY_TRAIN_NO, String::new(), no.trim().to_string()),
        None => (
            METHOD_BY_TIME,
            TimeSlot::encode(trip.departure).code().to_string(),
            String::new(),
        ),
    };

    let mut form: Vec<(String, String)> = vec![
        (S1_HIDDEN.into(), String::new()),
        (TRIP_TYPE.into(), "0".into()),
        (CAR_CLASS.into(), trip.car_class.form_value().into()),
        (SEAT_PREFERENCE.into(), trip.seat_preference.form_value().into()),
        (BOOKING_METHOD.into(), method.into()),
        (START_STATION.into(), trip.origin.form_value()),
        (DEST_STATION.into(), trip.destination.form_value()),
        (OUTBOUND_DATE.into(), form_date(trip.date)),
        (RETURN_DATE.into(), form_date(trip.date)),
        (OUTBOUND_SLOT.into(), slot),
        (OUTBOUND_TRAIN_NO.into(), train_no),
        (RETURN_SLOT.into(), String::new()),
        (RETURN_TRAIN_NO.into(), String::new()),
    ];
    for (i, token) in tokens.into_iter().enumerate() {
        form.push((schema.ticket_field(i), token));
    }
    form.extend([
        (CAPTCHA_TEXT.into(), captcha_text.to_string()),
        (SUBMIT.into(), "Search".into()),
        (PORTAL_TAG.into(), "false".into()),
        (TEEN_WINDOW_START.into(), "2023/07/01".into()),
        (TEEN_WINDOW_END.into(), "2023/08/31".into()),
        (TEEN_SHOWN.into(), "0".into()),
    ]);
    Ok(form)
}

/// Builds the step-2 form confirming one train by its selection token.
pub fn build_train_form(selection_token: &str) -> Vec<(String, String)> {
    vec![
        (S2_HIDDEN.into(), String::new()),
        (TRAIN_GROUP.into(), selection_token.to_string()),
        (SUBMIT.into(), "Confirm".into()),
    ]
}

/// Builds the step-3 passenger form.
///
/// `member_radio_value` is the markup-extracted radio value for the
/// membership mode in effect; `prompts` are the special-fare passenger
/// prompts the page dynamically requires, filled from the request's
/// companion ids in order.
pub fn build_passenger_form(
    trip: &TripRequest,
    member_radio_value: &str,
    prompts: &[SpecialFarePrompt],
) -> Result<Vec<(String, String)>, RailbookError> {
    if prompts.len() > trip.companion_ids.len() {
        return Err(RailbookError::Validation(format!(
            "passenger page asks for {} special-fare ids, request carries {}",
            prompts.len(),
            trip.companion_ids.len()
        )));
    }

    let id_radio = if validate_national_id(&trip.national_id) {
        "0"
    } else {
        "1"
    };

    let mut form: Vec<(String, String)> = vec![
        (S3_HIDDEN.into(), String::new()),
        (DIFF_OVER.into(), "1".into()),
        (IS_S_PROMOTION.into(), "1".into()),
        (PASSENGER_COUNT.into(), trip.passenger_count().to_string()),
        (IS_GO_BACK.into(), String::new()),
        (BACK_HOME.into(), String::new()),
        (TGO_ERROR.into(), "1".into()),
        (ID_INPUT_RADIO.into(), id_radio.into()),
        (NATIONAL_ID.into(), trip.national_id.clone()),
        (PHONE.into(), trip.phone.clone()),
        (EMAIL.into(), trip.email.clone()),
        (MEMBER_RADIO.into(), member_radio_value.to_string()),
        (
            MEMBER_LOYALTY_NO.into(),
            trip.loyalty_id.clone().unwrap_or_default(),
        ),
        (MEMBER_TAX_NO.into(), trip.tax_id.clone().unwrap_or_default()),
        (AGREE.into(), "on".into()),
    ];

    for (prompt, companion_id) in prompts.iter().zip(&trip.companion_ids) {
        form.push((prompt.field.clone(), prompt.label.clone()));
        form.push((prompt.id_field(), companion_id.clone()));
    }

    Ok(form)
}
