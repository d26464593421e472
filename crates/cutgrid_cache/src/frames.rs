use crate::config::{CacheConfig, Clock, SystemClock};
use crate::error::Result;
use crate::keyed::{source_prefix, KeyedCache};
use std::sync::Arc;

/// Decoded frames keyed by source and timestamp (millisecond resolution).
///
/// The bitmap type is left to the decoder; the cache only stores it.
#[derive(Debug)]
pub struct FrameCache<V, C = SystemClock> {
    inner: KeyedCache<V, C>,
}

pub fn frame_key(source: &str, time_seconds: f64) -> String {
    format!(
        "{}{}",
        source_prefix(source),
        (time_seconds * 1000.0).round() as i64
    )
}

impl<V> FrameCache<V> {
    pub fn new() -> Result<Self> {
        Self::with_config(CacheConfig::frames())
    }

    pub fn with_config(config: CacheConfig) -> Result<Self> {
        Ok(Self {
            inner: KeyedCache::create(config)?,
        })
    }
}

impl<V, C: Clock> FrameCache<V, C> {
    pub fn with_clock(config: CacheConfig, clock: C) -> Result<Self> {
        Ok(Self {
            inner: KeyedCache::with_clock(config, clock)?,
        })
    }

    pub fn get(&mut self, source: &str, time_seconds: f64) -> Option<Arc<V>> {
        self.inner.get(&frame_key(source, time_seconds))
    }

    pub fn set(&mut self, source: &str, time_seconds: f64, frame: V, content_hash: &str) {
        self.inner.set(frame_key(source, time_seconds), frame, content_hash);
    }

    pub fn has(&self, source: &str, time_seconds: f64) -> bool {
        self.inner.has(&frame_key(source, time_seconds))
    }

    pub fn needs_update(&self, source: &str, time_seconds: f64, content_hash: &str) -> bool {
        self.inner
            .needs_update(&frame_key(source, time_seconds), content_hash)
    }

    /// Forget every frame decoded from `source`.
    pub fn invalidate_source(&mut self, source: &str) -> usize {
        let prefix = source_prefix(source);
        let dropped = self.inner.invalidate_where(|key| key.starts_with(&prefix));
        tracing::debug!(source, dropped, "invalidated frames");
        dropped
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn dispose(self) {
        self.inner.dispose();
    }
}
