//! High score record
//!
//! One integer, read once at startup and written when a finished session
//! beats it. Storage failures degrade to "no previous score" / "not saved".

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Persisted best score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub score: u64,
}

impl HighScore {
    pub fn new(score: u64) -> Self {
        Self { score }
    }

    /// Whether `score` beats the record
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.score
    }

    /// Take `score` as the new record if it beats the old one
    pub fn submit(&mut self, score: u64) -> bool {
        if self.qualifies(score) {
            self.score = score;
            true
        } else {
            false
        }
    }
}

/// Where the high score lives
pub trait ScoreStore {
    /// Read the stored record; `Ok(None)` when nothing was saved yet
    fn load(&self) -> Result<Option<HighScore>, StorageError>;

    /// Persist a new record
    fn save(&mut self, high_score: HighScore) -> Result<(), StorageError>;
}

/// Load the record, treating any failure as "no previous high score"
pub fn load_or_default(store: &dyn ScoreStore) -> HighScore {
    match store.load() {
        Ok(Some(high_score)) => {
            log::info!("Loaded high score {}", high_score.score);
            high_score
        }
        Ok(None) => {
            log::info!("No high score found, starting fresh");
            HighScore::default()
        }
        Err(e) => {
            log::warn!("High score unavailable ({e}), starting fresh");
            HighScore::default()
        }
    }
}

/// Save the record, logging and skipping on failure
pub fn save_or_skip(store: &mut dyn ScoreStore, high_score: HighScore) -> bool {
    match store.save(high_score) {
        Ok(()) => {
            log::info!("High score saved ({})", high_score.score);
            true
        }
        Err(e) => {
            log::warn!("High score not saved: {e}");
            false
        }
    }
}

/// In-process store (native runs, tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub value: Option<HighScore>,
    /// Number of successful saves
    pub writes: u32,
}

impl MemoryStore {
    pub fn with_score(score: u64) -> Self {
        Self {
            value: Some(HighScore::new(score)),
            writes: 0,
        }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<HighScore>, StorageError> {
        Ok(self.value)
    }

    fn save(&mut self, high_score: HighScore) -> Result<(), StorageError> {
        self.value = Some(high_score);
        self.writes += 1;
        Ok(())
    }
}

impl<T: ScoreStore + ?Sized> ScoreStore for std::rc::Rc<std::cell::RefCell<T>> {
    fn load(&self) -> Result<Option<HighScore>, StorageError> {
        self.borrow().load()
    }

    fn save(&mut self, high_score: HighScore) -> Result<(), StorageError> {
        self.borrow_mut().save(high_score)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{HighScore, ScoreStore};
    use crate::error::StorageError;

    /// Browser LocalStorage
    #[derive(Debug, Default, Clone, Copy)]
    pub struct LocalStorageStore;

    impl LocalStorageStore {
        /// LocalStorage key
        const STORAGE_KEY: &'static str = "slice_rush_high_score";

        fn storage() -> Result<web_sys::Storage, StorageError> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
                .ok_or(StorageError::Unavailable)
        }
    }

    impl ScoreStore for LocalStorageStore {
        fn load(&self) -> Result<Option<HighScore>, StorageError> {
            let storage = Self::storage()?;
            let json = storage
                .get_item(Self::STORAGE_KEY)
                .map_err(|e| StorageError::Read(format!("{e:?}")))?;
            match json {
                Some(json) => Ok(Some(serde_json::from_str(&json)?)),
                None => Ok(None),
            }
        }

        fn save(&mut self, high_score: HighScore) -> Result<(), StorageError> {
            let storage = Self::storage()?;
            let json = serde_json::to_string(&high_score)?;
            storage
                .set_item(Self::STORAGE_KEY, &json)
                .map_err(|e| StorageError::Write(format!("{e:?}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn load(&self) -> Result<Option<HighScore>, StorageError> {
            Err(StorageError::Read("disk on fire".into()))
        }

        fn save(&mut self, _high_score: HighScore) -> Result<(), StorageError> {
            Err(StorageError::Unavailable)
        }
    }

    #[test]
    fn test_submit_only_beats() {
        let mut hs = HighScore::new(10);
        assert!(!hs.submit(10));
        assert!(!hs.submit(3));
        assert!(hs.submit(11));
        assert_eq!(hs.score, 11);
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::default();
        assert_eq!(load_or_default(&store), HighScore::default());
        assert!(save_or_skip(&mut store, HighScore::new(42)));
        assert_eq!(load_or_default(&store).score, 42);
        assert_eq!(store.writes, 1);
    }

    #[test]
    fn test_failures_are_not_fatal() {
        let mut store = BrokenStore;
        assert_eq!(load_or_default(&store).score, 0);
        assert!(!save_or_skip(&mut store, HighScore::new(5)));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_string(&HighScore::new(7)).unwrap();
        assert_eq!(json, r#"{"score":7}"#);
        let parsed: HighScore = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.score, 7);
    }
}
