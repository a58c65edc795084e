use crate::dataset::{Dataset, Item};
use crate::error::{QuizError, Result};
use crate::stats::{Direction, DirectionCounters, ItemStatistics};
use crate::store::{PersistedSession, SessionStore, STORE_VERSION};
use chrono::Local;
use tracing::{info, warn};

/// Choices made before a run starts
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub direction: Direction,
    pub requested_questions: usize,
    /// Load stored statistics and prioritise previously missed items
    pub resume: bool,
    /// Throw away a store whose length no longer matches the dataset
    pub discard_stale: bool,
    /// Zero all statistics before the run
    pub reset_statistics: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            direction: Direction::Forward,
            requested_questions: 30,
            resume: false,
            discard_stale: false,
            reset_statistics: false,
        }
    }
}

/// The dataset plus everything learned about it, owned by one run
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub items: Vec<Item>,
    pub statistics: ItemStatistics,
    pub direction: Direction,
    pub max_questions: usize,
    pub resumed: bool,
}

impl SessionState {
    /// Zeroed statistics for `dataset`
    pub fn new(dataset: &Dataset, direction: Direction, requested_questions: usize) -> Self {
        let n = dataset.len();
        Self {
            items: dataset.items().to_vec(),
            statistics: ItemStatistics::new(n),
            direction,
            max_questions: requested_questions.min(n),
            resumed: false,
        }
    }

    /// Rebuild from a stored bundle, keeping the freshly loaded items.
    ///
    /// Every stored array must match the dataset length, otherwise the
    /// index-based counters would be attached to the wrong items.
    pub fn restore(
        dataset: &Dataset,
        persisted: PersistedSession,
        direction: Direction,
        requested_questions: usize,
    ) -> Result<Self> {
        let current = dataset.len();
        let item_lengths = [persisted.items_a.len(), persisted.items_b.len()];
        if let Some(stored) = item_lengths.into_iter().find(|&len| len != current) {
            return Err(QuizError::SchemaMismatch { stored, current });
        }

        let changed = dataset
            .items()
            .iter()
            .zip(persisted.items_a.iter().zip(&persisted.items_b))
            .filter(|(item, (a, b))| item.term != **a || item.definition != **b)
            .count();
        if changed > 0 {
            warn!(
                changed,
                "stored item text differs from the dataset; keeping statistics by position"
            );
        }

        let statistics = ItemStatistics::from_parts(
            DirectionCounters {
                corrects: persisted.corrects_forward,
                incorrects: persisted.incorrects_forward,
            },
            DirectionCounters {
                corrects: persisted.corrects_reverse,
                incorrects: persisted.incorrects_reverse,
            },
            current,
        )
        .map_err(|stored| QuizError::SchemaMismatch { stored, current })?;

        Ok(Self {
            items: dataset.items().to_vec(),
            statistics,
            direction,
            max_questions: requested_questions.min(current),
            resumed: true,
        })
    }

    /// Snapshot for the store
    pub fn to_persisted(&self) -> PersistedSession {
        let (forward, reverse) = self.statistics.clone().into_parts();
        PersistedSession {
            version: STORE_VERSION,
            items_a: self.items.iter().map(|i| i.term.clone()).collect(),
            items_b: self.items.iter().map(|i| i.definition.clone()).collect(),
            corrects_forward: forward.corrects,
            incorrects_forward: forward.incorrects,
            corrects_reverse: reverse.corrects,
            incorrects_reverse: reverse.incorrects,
            max_questions: self.max_questions,
            saved_at: Some(Local::now()),
        }
    }

    pub fn persist(&self, store: &dyn SessionStore) -> Result<()> {
        store.save(&self.to_persisted())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// (prompt, expected) for an item in the active direction
    pub fn question(&self, index: usize) -> (&str, &str) {
        let item = &self.items[index];
        match self.direction {
            Direction::Forward => (item.term.as_str(), item.definition.as_str()),
            Direction::Reverse => (item.definition.as_str(), item.term.as_str()),
        }
    }
}

/// Build the state for a run from the dataset and whatever the store holds.
///
/// A length mismatch is only resolved by discarding the store when the caller
/// asked for it through [`SessionOptions::discard_stale`].
pub fn prepare(
    dataset: &Dataset,
    store: &dyn SessionStore,
    options: &SessionOptions,
) -> Result<SessionState> {
    let stored = if !options.resume {
        None
    } else {
        match store.load() {
            Err(QuizError::StoreCorrupt { reason, .. }) if options.discard_stale => {
                warn!(%reason, "discarding unreadable session store");
                store.discard()?;
                None
            }
            other => other?,
        }
    };

    let mut state = match stored {
        Some(persisted) => {
            match SessionState::restore(
                dataset,
                persisted,
                options.direction,
                options.requested_questions,
            ) {
                Ok(state) => {
                    info!("resuming previous session");
                    state
                }
                Err(QuizError::SchemaMismatch { stored, current }) if options.discard_stale => {
                    warn!(stored, current, "discarding stale session store");
                    store.discard()?;
                    SessionState::new(dataset, options.direction, options.requested_questions)
                }
                Err(e) => return Err(e),
            }
        }
        None => {
            info!("starting a new session");
            SessionState::new(dataset, options.direction, options.requested_questions)
        }
    };

    if options.reset_statistics {
        info!("statistics reset");
        state.statistics.reset();
    }
    Ok(state)
}
