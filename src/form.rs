// Entry-form controller. Holds the live field state, validates on submit,
// and hands a completed criteria off as a navigation command. The remote
// service is never called from here.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::criteria::{
    Navigation, SearchCriteria, DEFAULT_ADULTS, DEFAULT_CHILDREN, DEFAULT_ROOMS, MAX_ADULTS,
    MAX_ROOMS,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select check-in and check-out dates")]
    MissingDates,

    #[error("Check-out date must fall after check-in date")]
    InvalidDateRange,
}

/// Live state of the booking form on the landing page.
#[derive(Debug, Clone)]
pub struct SearchForm {
    name: String,
    check_in: Option<NaiveDate>,
    check_out: Option<NaiveDate>,
    rooms: u32,
    adults: u32,
    children: u32,
    submitting: bool,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            check_in: None,
            check_out: None,
            rooms: DEFAULT_ROOMS,
            adults: DEFAULT_ADULTS,
            children: DEFAULT_CHILDREN,
            submitting: false,
        }
    }
}

impl SearchForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_check_in(&mut self, date: Option<NaiveDate>) {
        self.check_in = date;
    }

    pub fn set_check_out(&mut self, date: Option<NaiveDate>) {
        self.check_out = date;
    }

    /// The form offers 1 to 4 rooms; out-of-range values are clamped.
    pub fn set_rooms(&mut self, rooms: u32) {
        self.rooms = rooms.clamp(1, MAX_ROOMS);
    }

    /// The form offers 1 to 5+ guests; out-of-range values are clamped.
    pub fn set_adults(&mut self, adults: u32) {
        self.adults = adults.clamp(1, MAX_ADULTS);
    }

    pub fn set_children(&mut self, children: u32) {
        self.children = children;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Validates the dates and, on success, returns exactly one navigation
    /// command carrying the encoded criteria. On failure nothing else
    /// happens; the caller surfaces the error inline.
    pub fn submit(&mut self) -> Result<Navigation, ValidationError> {
        let (check_in, check_out) = match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => (check_in, check_out),
            _ => return Err(ValidationError::MissingDates),
        };

        // Cosmetic flag for the submit button; cleared before returning
        // since no network call happens here.
        self.submitting = true;
        let criteria = SearchCriteria::new(
            Some(self.name.clone()),
            check_in,
            check_out,
            self.rooms,
            self.adults,
            self.children,
        );
        self.submitting = false;

        let criteria = criteria.map_err(|_| ValidationError::InvalidDateRange)?;
        debug!(target: "arboreal_booking::form", %check_in, %check_out, "search submitted");
        Ok(Navigation::ToAvailability(criteria))
    }
}
