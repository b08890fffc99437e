// Availability search for The Arboreal Resort's booking site: criteria
// capture and validation, the navigation query codec, the reservation
// service client, and the results-view state machine.

pub mod client;
pub mod criteria;
pub mod form;
pub mod format;
pub mod offer;
pub mod session;

// Re-export key types for convenience
pub use client::{
    AvailabilityClient, ClientConfig, ClientError, SearchBackend, DEFAULT_BASE_URL,
    FALLBACK_TRANSPORT_MESSAGE,
};
pub use criteria::{CriteriaError, Navigation, SearchCriteria};
pub use form::{SearchForm, ValidationError};
pub use offer::{RoomOffer, RoomRates, SearchEnvelope};
pub use session::{AvailabilitySession, SearchState, SessionStart, NO_ROOMS_MESSAGE};
