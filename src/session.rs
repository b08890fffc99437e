// Results-view session: decodes criteria from the incoming navigation
// target, drives the single availability lookup, and owns the result-state
// machine. One session per arrival at the results view; resubmitting a
// search always starts a fresh session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::client::SearchBackend;
use crate::criteria::{Navigation, SearchCriteria};
use crate::format;
use crate::offer::RoomOffer;

/// Shown when the service answered but reported no availability.
pub const NO_ROOMS_MESSAGE: &str = "No rooms available for the selected dates";

/// Result state of one session. Replaced wholesale on every transition,
/// never mutated field by field.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    NotStarted,
    Loading,
    Success(Vec<RoomOffer>),
    Empty,
    Error(String),
}

/// Outcome of arriving at the results view.
#[derive(Debug)]
pub enum SessionStart {
    Ready(AvailabilitySession),
    /// The navigation target carried no usable search; go back to the form.
    Redirect(Navigation),
}

pub struct AvailabilitySession {
    criteria: SearchCriteria,
    state: Mutex<SearchState>,
    started: AtomicBool,
    closed: AtomicBool,
}

impl std::fmt::Debug for AvailabilitySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilitySession")
            .field("criteria", &self.criteria)
            .field("state", &self.state())
            .finish()
    }
}

impl AvailabilitySession {
    pub fn new(criteria: SearchCriteria) -> Self {
        Self {
            criteria,
            state: Mutex::new(SearchState::NotStarted),
            started: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }
    }

    /// Session entry point. A target without decodable check-in/check-out
    /// dates redirects straight back to the entry form; the backend is
    /// never consulted in that case.
    pub fn from_query(query: &str) -> SessionStart {
        match SearchCriteria::from_query(query) {
            Ok(criteria) => SessionStart::Ready(Self::new(criteria)),
            Err(err) => {
                warn!(error = %err, "results view reached without a usable search");
                SessionStart::Redirect(Navigation::ToHome)
            }
        }
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    pub fn state(&self) -> SearchState {
        self.state.lock().unwrap().clone()
    }

    /// Performs the availability lookup. Fires at most once per session;
    /// a second call is a logged no-op. The session transitions
    /// `NotStarted -> Loading -> {Success | Empty | Error}`.
    pub async fn run(&self, backend: &dyn SearchBackend) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }
        if self.started.swap(true, Ordering::SeqCst) {
            warn!("availability lookup already started for this session");
            return;
        }

        self.replace_state(SearchState::Loading);

        let next = match backend.search(&self.criteria).await {
            Ok(envelope) if envelope.success => {
                if envelope.data.is_empty() {
                    SearchState::Empty
                } else {
                    SearchState::Success(envelope.data)
                }
            }
            Ok(_) => SearchState::Error(NO_ROOMS_MESSAGE.to_string()),
            Err(err) => SearchState::Error(err.to_string()),
        };

        self.replace_state(next);
    }

    /// Marks the session disposed. Any response still in flight is
    /// discarded rather than applied. Takes the state lock so disposal
    /// cannot interleave with a transition being applied.
    pub fn close(&self) {
        let _state = self.state.lock().unwrap();
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// The "Modify Search" action on the results view.
    pub fn modify_search(&self) -> Navigation {
        Navigation::ToHome
    }

    // Derived display values, recomputed from the immutable criteria.

    pub fn check_in_display(&self) -> String {
        format::format_date(self.criteria.check_in())
    }

    pub fn check_out_display(&self) -> String {
        format::format_date(self.criteria.check_out())
    }

    pub fn nights(&self) -> i64 {
        format::nights(self.criteria.check_in(), self.criteria.check_out())
    }

    pub fn duration_label(&self) -> String {
        format::night_label(self.nights())
    }

    pub fn guest_summary(&self) -> String {
        format::guest_summary(self.criteria.adults(), self.criteria.children())
    }

    /// Banner above the offer list, present only with results.
    pub fn results_banner(&self) -> Option<String> {
        match self.state() {
            SearchState::Success(offers) => Some(format::offer_count_summary(offers.len())),
            _ => None,
        }
    }

    // The closed check and the write happen under the same lock, so a
    // result landing after disposal can never be applied.
    fn replace_state(&self, next: SearchState) {
        let mut state = self.state.lock().unwrap();
        if self.closed.load(Ordering::SeqCst) {
            debug!("session closed, discarding state transition");
            return;
        }
        *state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::json;
    use tokio::sync::Notify;

    use crate::client::{ClientError, SearchBackend};
    use crate::offer::SearchEnvelope;

    fn criteria() -> SearchCriteria {
        SearchCriteria::new(
            None,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 4).unwrap(),
            2,
            3,
            0,
        )
        .unwrap()
    }

    fn offer(name: &str) -> RoomOffer {
        serde_json::from_value(json!({ "Room_Name": name })).unwrap()
    }

    fn envelope(success: bool, data: Vec<RoomOffer>) -> SearchEnvelope {
        SearchEnvelope {
            success,
            data,
            message: None,
        }
    }

    /// Backend scripted with a single outcome; panics if the session asks
    /// for a second lookup.
    struct ScriptedBackend {
        outcome: Mutex<Option<Result<SearchEnvelope, ClientError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn new(outcome: Result<SearchEnvelope, ClientError>) -> Self {
            Self {
                outcome: Mutex::new(Some(outcome)),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SearchBackend for ScriptedBackend {
        async fn search(
            &self,
            _criteria: &SearchCriteria,
        ) -> Result<SearchEnvelope, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome
                .lock()
                .unwrap()
                .take()
                .expect("backend queried more than once")
        }
    }

    /// Backend that holds the response until the test releases the gate.
    struct GatedBackend {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl SearchBackend for GatedBackend {
        async fn search(
            &self,
            _criteria: &SearchCriteria,
        ) -> Result<SearchEnvelope, ClientError> {
            self.gate.notified().await;
            Ok(envelope(true, vec![offer("Canopy Suite")]))
        }
    }

    #[test]
    fn test_initial_state_is_not_started() {
        let session = AvailabilitySession::new(criteria());
        assert_eq!(session.state(), SearchState::NotStarted);
        assert!(!session.is_closed());
    }

    #[test]
    fn test_missing_dates_redirect_home_immediately() {
        let start = AvailabilitySession::from_query("rooms=2&adults=2");
        match start {
            SessionStart::Redirect(nav) => assert_eq!(nav, Navigation::ToHome),
            SessionStart::Ready(_) => panic!("expected a redirect"),
        }
    }

    #[test]
    fn test_decodable_query_yields_a_ready_session() {
        let query = criteria().to_query();
        match AvailabilitySession::from_query(&query) {
            SessionStart::Ready(session) => assert_eq!(session.criteria(), &criteria()),
            SessionStart::Redirect(nav) => panic!("unexpected redirect: {:?}", nav),
        }
    }

    #[tokio::test]
    async fn test_offers_transition_to_success() {
        let session = AvailabilitySession::new(criteria());
        let backend = ScriptedBackend::new(Ok(envelope(true, vec![offer("Canopy Suite")])));

        session.run(&backend).await;

        match session.state() {
            SearchState::Success(offers) => {
                assert_eq!(offers.len(), 1);
                assert_eq!(offers[0].display_name(), "Canopy Suite");
            }
            other => panic!("unexpected state: {:?}", other),
        }
        assert_eq!(
            session.results_banner().unwrap(),
            "We found 1 exquisite accommodation for your stay"
        );
    }

    #[tokio::test]
    async fn test_zero_offers_transition_to_empty_not_error() {
        let session = AvailabilitySession::new(criteria());
        let backend = ScriptedBackend::new(Ok(envelope(true, vec![])));

        session.run(&backend).await;

        assert_eq!(session.state(), SearchState::Empty);
        assert!(session.results_banner().is_none());
    }

    #[tokio::test]
    async fn test_service_failure_uses_no_rooms_message() {
        let session = AvailabilitySession::new(criteria());
        let backend = ScriptedBackend::new(Ok(envelope(false, vec![])));

        session.run(&backend).await;

        assert_eq!(
            session.state(),
            SearchState::Error(NO_ROOMS_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_transport_failure_without_message_uses_fallback() {
        let session = AvailabilitySession::new(criteria());
        let backend =
            ScriptedBackend::new(Err(ClientError::Transport { message: None }));

        session.run(&backend).await;

        assert_eq!(
            session.state(),
            SearchState::Error(crate::client::FALLBACK_TRANSPORT_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_service_message() {
        let session = AvailabilitySession::new(criteria());
        let backend = ScriptedBackend::new(Err(ClientError::Transport {
            message: Some("Engine offline".to_string()),
        }));

        session.run(&backend).await;

        assert_eq!(
            session.state(),
            SearchState::Error("Engine offline".to_string())
        );
    }

    #[tokio::test]
    async fn test_lookup_fires_only_once_per_session() {
        let session = AvailabilitySession::new(criteria());
        let backend = ScriptedBackend::new(Ok(envelope(true, vec![])));

        session.run(&backend).await;
        session.run(&backend).await;

        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_late_response_is_discarded_after_close() {
        let session = Arc::new(AvailabilitySession::new(criteria()));
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(GatedBackend { gate: gate.clone() });

        let running = {
            let session = session.clone();
            let backend = backend.clone();
            tokio::spawn(async move { session.run(backend.as_ref()).await })
        };

        // Let the lookup reach its suspension point.
        while session.state() != SearchState::Loading {
            tokio::task::yield_now().await;
        }

        session.close();
        gate.notify_one();
        running.await.unwrap();

        // The response arrived after disposal and must not be applied.
        assert_eq!(session.state(), SearchState::Loading);
        assert!(session.is_closed());
    }

    #[test]
    fn test_transitions_after_close_are_discarded() {
        let session = AvailabilitySession::new(criteria());
        session.replace_state(SearchState::Loading);
        session.close();

        // Whatever a lingering lookup tries to apply, the state stays put.
        session.replace_state(SearchState::Empty);
        assert_eq!(session.state(), SearchState::Loading);
    }

    #[tokio::test]
    async fn test_closed_session_never_starts_a_lookup() {
        let session = AvailabilitySession::new(criteria());
        let backend = ScriptedBackend::new(Ok(envelope(true, vec![])));

        session.close();
        session.run(&backend).await;

        assert_eq!(backend.call_count(), 0);
        assert_eq!(session.state(), SearchState::NotStarted);
    }

    #[test]
    fn test_derived_display_values() {
        let session = AvailabilitySession::new(criteria());
        assert_eq!(session.check_in_display(), "1 Jun 2024");
        assert_eq!(session.check_out_display(), "4 Jun 2024");
        assert_eq!(session.nights(), 3);
        assert_eq!(session.duration_label(), "3 Nights");
        assert_eq!(session.guest_summary(), "3 Adults");
    }

    #[test]
    fn test_modify_search_returns_home() {
        let session = AvailabilitySession::new(criteria());
        assert_eq!(session.modify_search(), Navigation::ToHome);
    }
}
