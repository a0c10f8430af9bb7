use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::review::ai_search::CandidateOracle;
use crate::review::view::{ReviewState, ViewAction};
use crate::store::seed::seed_records;
use crate::store::{RecordStore, StoreError};
use crate::tasks::TaskSlots;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Current review snapshot. Replaced wholesale on every transition; the
    /// lock is never held across an `.await`.
    review: Arc<RwLock<Arc<ReviewState>>>,
    pub tasks: TaskSlots,
    /// `None` disables AI search.
    pub oracle: Option<Arc<dyn CandidateOracle>>,
    pub config: Config,
    /// Mock score generator for simulated scoring runs.
    pub rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    /// Seeds the record store from `config` and wires in the optional oracle.
    pub fn new(config: Config, oracle: Option<Arc<dyn CandidateOracle>>) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let records = seed_records(config.seed_resumes, &mut rng);
        let review = ReviewState::new(RecordStore::new(records), config.page_size);

        Self {
            review: Arc::new(RwLock::new(Arc::new(review))),
            tasks: TaskSlots::default(),
            oracle,
            config,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    pub fn snapshot(&self) -> Arc<ReviewState> {
        Arc::clone(&self.review.read())
    }

    /// Applies `action` to the current snapshot and publishes the result.
    /// On error the current snapshot stays in place.
    pub fn dispatch(&self, action: ViewAction) -> Result<Arc<ReviewState>, StoreError> {
        let mut current = self.review.write();
        let next = Arc::new(current.apply(action)?);
        *current = Arc::clone(&next);
        Ok(next)
    }
}
