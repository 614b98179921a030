//! Startup settings, defaults and validation.
//!
//! The whole configuration is an immutable value built once in `main`,
//! validated, and passed by reference into the capture source and the
//! visualizer.  There is no file, flag or environment layer.

use std::time::Duration;

use thiserror::Error;

use crate::visualizer::ColorThresholds;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Capture sample rate in Hz.
pub const SAMPLE_RATE: u32 = 44_100;
/// Samples per delivered block.
pub const BLOCK_SIZE: u32 = 1024;
/// Capture channel count (mono only).
pub const CHANNELS: u16 = 1;
/// Leading samples of each block shown on the status line.
pub const DISPLAY_SAMPLES: usize = 20;
/// Number of blocks averaged into the reported peak / RMS.
pub const PEAK_HISTORY: usize = 10;
/// Blocks that may wait for the render thread before new ones are dropped.
pub const RENDER_QUEUE_DEPTH: usize = 2;
/// How long opening the input stream may take before giving up.
pub const OPEN_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Invalid startup parameters.  Always fatal, raised before capture begins.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("sample rate must be positive")]
    ZeroSampleRate,

    #[error("block size must be positive")]
    ZeroBlockSize,

    #[error("channel count must be 1 (got {0}); only mono capture is supported")]
    UnsupportedChannels(u16),

    #[error("peak history must hold at least one block")]
    ZeroPeakHistory,

    #[error("render queue depth must be at least 1")]
    ZeroQueueDepth,

    #[error("color threshold `{name}` must be finite and within (0, 1] (got {value})")]
    ThresholdOutOfRange { name: &'static str, value: f32 },

    #[error("color thresholds must be strictly increasing (low {low} < medium {medium} < high {high})")]
    ThresholdOrder { low: f32, medium: f32, high: f32 },
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Parameters of the capture stream.  Fixed once capture starts.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioConfig {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Samples per block handed to the visualizer.
    pub block_size: u32,
    /// Interleaved channel count; must be 1.
    pub channels: u16,
    /// Upper bound on opening the device stream.
    pub open_timeout: Duration,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            block_size: BLOCK_SIZE,
            channels: CHANNELS,
            open_timeout: OPEN_TIMEOUT,
        }
    }
}

impl AudioConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        if self.channels != 1 {
            return Err(ConfigError::UnsupportedChannels(self.channels));
        }
        Ok(())
    }

    /// Block size as a slice length.
    pub fn block_len(&self) -> usize {
        self.block_size as usize
    }

    /// Wall-clock duration of one block at the configured rate.
    pub fn block_duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(f64::from(self.block_size) / f64::from(self.sample_rate))
    }
}

// ---------------------------------------------------------------------------
// DisplayConfig
// ---------------------------------------------------------------------------

/// Status-line rendering settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    /// Number of leading samples rendered per block (capped at block length).
    pub display_samples: usize,
    /// Capacity of the peak / RMS sliding window.
    pub peak_history: usize,
    /// Depth of the handoff queue between the audio and render threads.
    pub queue_depth: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            display_samples: DISPLAY_SAMPLES,
            peak_history: PEAK_HISTORY,
            queue_depth: RENDER_QUEUE_DEPTH,
        }
    }
}

impl DisplayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.peak_history == 0 {
            return Err(ConfigError::ZeroPeakHistory);
        }
        if self.queue_depth == 0 {
            return Err(ConfigError::ZeroQueueDepth);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level configuration.
///
/// ```rust
/// use mic_visualizer::config::AppConfig;
///
/// let config = AppConfig::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.audio.sample_rate, 44_100);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Capture stream parameters.
    pub audio: AudioConfig,
    /// Status-line settings.
    pub display: DisplayConfig,
    /// Amplitude cutoffs for sample coloring.
    pub thresholds: ColorThresholds,
}

impl AppConfig {
    /// Check every section, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.audio.validate()?;
        self.display.validate()?;
        self.thresholds.validate()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
