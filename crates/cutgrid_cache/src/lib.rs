//! Caches for derived media artifacts: decoded frames, thumbnails and
//! waveform peaks. Producing the artifacts is the caller's job.

pub mod config;
pub mod error;
pub mod frames;
pub mod hash;
pub mod keyed;
pub mod thumbnails;
pub mod waveform;

pub use config::{CacheConfig, Clock, ManualClock, SystemClock};
pub use error::{CacheError, Result};
pub use frames::FrameCache;
pub use hash::content_hash;
pub use keyed::{CacheEntry, CacheStats, KeyedCache};
pub use thumbnails::ThumbnailCache;
pub use waveform::{compute_peaks, WaveformCache, WaveformData};
