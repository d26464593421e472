use crate::error::{CacheError, Result};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Size and age limits for a [`KeyedCache`](crate::KeyedCache).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries. `None` means unbounded.
    pub capacity: Option<usize>,
    /// Entries older than this many milliseconds read as absent.
    pub max_age_ms: Option<u64>,
}

impl CacheConfig {
    /// Decoded frame bitmaps.
    pub fn frames() -> Self {
        Self {
            capacity: Some(300),
            max_age_ms: None,
        }
    }

    /// Generated thumbnails: 50 entries, 5 minutes.
    pub fn thumbnails() -> Self {
        Self {
            capacity: Some(50),
            max_age_ms: Some(5 * 60 * 1000),
        }
    }

    /// Waveform peaks never evict by count.
    pub fn waveforms() -> Self {
        Self {
            capacity: None,
            max_age_ms: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == Some(0) {
            return Err(CacheError::InvalidConfig("capacity must be at least 1".into()));
        }
        if self.max_age_ms == Some(0) {
            return Err(CacheError::InvalidConfig("max_age_ms must be at least 1".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Millisecond time source used to stamp and expire entries.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: u64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}
