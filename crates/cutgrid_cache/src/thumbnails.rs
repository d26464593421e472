use crate::config::{CacheConfig, Clock, SystemClock};
use crate::error::Result;
use crate::keyed::{source_prefix, KeyedCache};
use std::sync::Arc;

/// Encoded thumbnail images (e.g. data URLs), expiring after five minutes.
#[derive(Debug)]
pub struct ThumbnailCache<C = SystemClock> {
    inner: KeyedCache<String, C>,
}

pub fn thumbnail_key(source: &str, time_seconds: f64, width: u32) -> String {
    format!(
        "{}{}|{width}",
        source_prefix(source),
        (time_seconds * 1000.0).round() as i64
    )
}

impl ThumbnailCache {
    pub fn new() -> Result<Self> {
        Self::with_clock(CacheConfig::thumbnails(), SystemClock)
    }
}

impl<C: Clock> ThumbnailCache<C> {
    pub fn with_clock(config: CacheConfig, clock: C) -> Result<Self> {
        Ok(Self {
            inner: KeyedCache::with_clock(config, clock)?,
        })
    }

    pub fn get(&mut self, source: &str, time_seconds: f64, width: u32) -> Option<Arc<String>> {
        self.inner.get(&thumbnail_key(source, time_seconds, width))
    }

    pub fn set(
        &mut self,
        source: &str,
        time_seconds: f64,
        width: u32,
        encoded: impl Into<String>,
        content_hash: &str,
    ) {
        self.inner.set(
            thumbnail_key(source, time_seconds, width),
            encoded.into(),
            content_hash,
        );
    }

    pub fn has(&self, source: &str, time_seconds: f64, width: u32) -> bool {
        self.inner.has(&thumbnail_key(source, time_seconds, width))
    }

    pub fn needs_update(&self, source: &str, time_seconds: f64, width: u32, content_hash: &str) -> bool {
        self.inner
            .needs_update(&thumbnail_key(source, time_seconds, width), content_hash)
    }

    /// Drop expired thumbnails without waiting for them to be read.
    pub fn purge_expired(&mut self) -> usize {
        self.inner.purge_expired()
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
