use crate::config::{CacheConfig, Clock, SystemClock};
use crate::error::{CacheError, Result};
use crate::keyed::{source_prefix, KeyedCache};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Peak data for waveform display: pairs of (min, max) for each sample window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveformData {
    pub peaks: Vec<(f32, f32)>,
    pub sample_rate: u32,
    pub samples_per_peak: u32,
}

impl WaveformData {
    /// Build peaks from signed 16-bit mono samples.
    pub fn from_samples(samples: &[i16], sample_rate: u32, samples_per_peak: u32) -> Self {
        Self {
            peaks: compute_peaks(samples, samples_per_peak),
            sample_rate,
            samples_per_peak,
        }
    }

    /// Seconds covered by one peak.
    pub fn seconds_per_peak(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples_per_peak as f64 / self.sample_rate as f64
    }
}

const FULL_SCALE: f32 = 32768.0;

/// Min/max per window of `samples_per_peak` samples, scaled so that
/// `i16::MIN` maps to -1.0. A trailing partial window still yields a peak.
pub fn compute_peaks(samples: &[i16], samples_per_peak: u32) -> Vec<(f32, f32)> {
    samples
        .chunks(samples_per_peak.max(1) as usize)
        .map(|window| {
            let (lo, hi) = window
                .iter()
                .fold((i16::MAX, i16::MIN), |(lo, hi), &s| (lo.min(s), hi.max(s)));
            (lo as f32 / FULL_SCALE, hi as f32 / FULL_SCALE)
        })
        .collect()
}

pub fn waveform_key(url: &str, samples_per_pixel: u32) -> String {
    format!("{}{samples_per_pixel}", source_prefix(url))
}

/// Default size at which unbounded growth starts being reported.
pub const DEFAULT_SOFT_LIMIT: usize = 256;

/// Waveform peaks keyed by `(url, samples_per_pixel)`.
///
/// Entries are never evicted by count. Growth past each multiple of the soft
/// limit is logged, not capped; call [`WaveformCache::clear`] or
/// [`WaveformCache::remove_url`] when audio sources go away.
#[derive(Debug)]
pub struct WaveformCache<C = SystemClock> {
    inner: KeyedCache<WaveformData, C>,
    soft_limit: usize,
}

impl WaveformCache {
    pub fn new() -> Result<Self> {
        Self::with_clock(CacheConfig::waveforms(), SystemClock)
    }
}

impl<C: Clock> WaveformCache<C> {
    /// Fails with [`CacheError::InvalidConfig`] if `config` sets a capacity.
    pub fn with_clock(config: CacheConfig, clock: C) -> Result<Self> {
        validate_config(&config)?;
        Ok(Self {
            inner: KeyedCache::with_clock(config, clock)?,
            soft_limit: DEFAULT_SOFT_LIMIT,
        })
    }

    pub fn with_soft_limit(mut self, soft_limit: usize) -> Self {
        self.soft_limit = soft_limit.max(1);
        self
    }

    pub fn get(&mut self, url: &str, samples_per_pixel: u32) -> Option<Arc<WaveformData>> {
        self.inner.get(&waveform_key(url, samples_per_pixel))
    }

    pub fn set(&mut self, url: &str, samples_per_pixel: u32, data: WaveformData, content_hash: &str) {
        let before = self.inner.len();
        self.inner
            .set(waveform_key(url, samples_per_pixel), data, content_hash);
        let after = self.inner.len();
        if after > before && after % self.soft_limit == 0 {
            tracing::warn!(
                entries = after,
                soft_limit = self.soft_limit,
                "waveform cache keeps growing; it is never evicted by count"
            );
        }
    }

    pub fn has(&self, url: &str, samples_per_pixel: u32) -> bool {
        self.inner.has(&waveform_key(url, samples_per_pixel))
    }

    pub fn needs_update(&self, url: &str, samples_per_pixel: u32, content_hash: &str) -> bool {
        self.inner
            .needs_update(&waveform_key(url, samples_per_pixel), content_hash)
    }

    /// Drop every resolution cached for `url`.
    pub fn remove_url(&mut self, url: &str) -> usize {
        let prefix = source_prefix(url);
        self.inner.invalidate_where(|key| key.starts_with(&prefix))
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

/// Waveforms grow without a count limit; a capacity would silently evict.
pub fn validate_config(config: &CacheConfig) -> Result<()> {
    if let Some(capacity) = config.capacity {
        return Err(CacheError::InvalidConfig(format!(
            "waveform cache is never evicted by count, got capacity {capacity}"
        )));
    }
    config.validate()
}
