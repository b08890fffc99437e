// Search criteria: the validated trip parameters behind one availability
// lookup, plus the query-string codec used to carry them between the entry
// form and the results view.

use chrono::NaiveDate;
use thiserror::Error;
use url::form_urlencoded;

// Form defaults, also used when a hand-edited query omits the counts.
pub const DEFAULT_ROOMS: u32 = 1;
pub const DEFAULT_ADULTS: u32 = 2;
pub const DEFAULT_CHILDREN: u32 = 0;

pub const MAX_ROOMS: u32 = 4;
pub const MAX_ADULTS: u32 = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CriteriaError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid date for {field}: {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("invalid count for {field}: {value}")]
    InvalidCount { field: &'static str, value: String },

    #[error("check-out date must fall after check-in date")]
    ReversedDates,
}

/// Trip parameters for one availability search. Built once per submission
/// and immutable afterwards; a new search always builds a new instance.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    guest_name: Option<String>,
    check_in: NaiveDate,
    check_out: NaiveDate,
    rooms: u32,
    adults: u32,
    children: u32,
}

impl SearchCriteria {
    /// Validates `check_in < check_out` and clamps the counts to the
    /// ranges the booking form offers (1..=4 rooms, 1..=5 adults).
    pub fn new(
        guest_name: Option<String>,
        check_in: NaiveDate,
        check_out: NaiveDate,
        rooms: u32,
        adults: u32,
        children: u32,
    ) -> Result<Self, CriteriaError> {
        if check_in >= check_out {
            return Err(CriteriaError::ReversedDates);
        }

        Ok(Self {
            guest_name,
            check_in,
            check_out,
            rooms: rooms.clamp(1, MAX_ROOMS),
            adults: adults.clamp(1, MAX_ADULTS),
            children,
        })
    }

    pub fn guest_name(&self) -> Option<&str> {
        self.guest_name.as_deref()
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn rooms(&self) -> u32 {
        self.rooms
    }

    pub fn adults(&self) -> u32 {
        self.adults
    }

    pub fn children(&self) -> u32 {
        self.children
    }

    /// Encodes the criteria as the results-view query string:
    /// `checkIn=..&checkOut=..&rooms=..&adults=..&children=..&name=..`.
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer
            .append_pair("checkIn", &self.check_in.to_string())
            .append_pair("checkOut", &self.check_out.to_string())
            .append_pair("rooms", &self.rooms.to_string())
            .append_pair("adults", &self.adults.to_string())
            .append_pair("children", &self.children.to_string());
        if let Some(name) = &self.guest_name {
            serializer.append_pair("name", name);
        }
        serializer.finish()
    }

    /// Decodes criteria from a results-view query string. Counts arrive as
    /// text and are coerced back to integers; `children` defaults to 0 and
    /// `rooms`/`adults` to the form defaults when absent. Dates are
    /// required and must form a forward range.
    pub fn from_query(query: &str) -> Result<Self, CriteriaError> {
        let mut check_in = None;
        let mut check_out = None;
        let mut rooms = None;
        let mut adults = None;
        let mut children = None;
        let mut guest_name = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "checkIn" => check_in = Some(value.into_owned()),
                "checkOut" => check_out = Some(value.into_owned()),
                "rooms" => rooms = Some(value.into_owned()),
                "adults" => adults = Some(value.into_owned()),
                "children" => children = Some(value.into_owned()),
                "name" => guest_name = Some(value.into_owned()),
                _ => {}
            }
        }

        let check_in = parse_date("checkIn", check_in)?;
        let check_out = parse_date("checkOut", check_out)?;
        let rooms = parse_count("rooms", rooms, DEFAULT_ROOMS)?;
        let adults = parse_count("adults", adults, DEFAULT_ADULTS)?;
        let children = parse_count("children", children, DEFAULT_CHILDREN)?;

        Self::new(guest_name, check_in, check_out, rooms, adults, children)
    }
}

fn parse_date(field: &'static str, value: Option<String>) -> Result<NaiveDate, CriteriaError> {
    let value = value.filter(|v| !v.is_empty());
    let value = value.ok_or(CriteriaError::MissingField(field))?;
    value
        .parse()
        .map_err(|_| CriteriaError::InvalidDate { field, value })
}

fn parse_count(
    field: &'static str,
    value: Option<String>,
    default: u32,
) -> Result<u32, CriteriaError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| CriteriaError::InvalidCount { field, value }),
    }
}

/// A navigation command produced by the form or the results session.
/// Commands are returned as values and dispatched by the hosting shell,
/// which keeps them assertable in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    /// Open the results view carrying the encoded criteria.
    ToAvailability(SearchCriteria),
    /// Return to the entry form.
    ToHome,
}

impl Navigation {
    pub fn target(&self) -> String {
        match self {
            Navigation::ToAvailability(criteria) => {
                format!("/availability?{}", criteria.to_query())
            }
            Navigation::ToHome => "/".to_string(),
        }
    }
}
