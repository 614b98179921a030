//! Microphone capture via `cpal`.
//!
//! [`AudioCapture`] wraps the cpal host/device/stream lifecycle.  Call
//! [`CaptureSource::start`] with a [`BlockHandler`] to begin streaming
//! fixed-size [`SampleBlock`](super::SampleBlock)s.  The returned [`StreamHandle`] is a RAII
//! guard: dropping it stops the stream and releases the device.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

use super::block::{BlockAssembler, BlockHandler, StreamStatus};
use crate::config::{AudioConfig, ConfigError};

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors that can occur while setting up the audio capture.
///
/// Every variant except [`CaptureError::Config`] and
/// [`CaptureError::Panicked`] means the input device is unavailable at the
/// requested parameters.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("failed to spawn capture thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("invalid capture configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("capture thread panicked")]
    Panicked,
}

impl CaptureError {
    /// `true` for the device-unavailable family.
    pub fn is_device_unavailable(&self) -> bool {
        !matches!(self, CaptureError::Config(_) | CaptureError::Panicked)
    }
}

// ---------------------------------------------------------------------------
// CaptureSource
// ---------------------------------------------------------------------------

/// Anything that can deliver fixed-size blocks to a [`BlockHandler`].
///
/// The session value keeps capture running; dropping it stops delivery.
pub trait CaptureSource {
    type Session;

    fn start<H>(self, handler: H) -> Result<Self::Session, CaptureError>
    where
        H: BlockHandler + 'static;
}

// ---------------------------------------------------------------------------
// StreamHandle
// ---------------------------------------------------------------------------

/// RAII guard that keeps the cpal stream alive.
///
/// Dropping this value drops the `cpal::Stream`, which stops the hardware
/// stream and closes the device.
pub struct StreamHandle {
    _stream: cpal::Stream,
    device_name: String,
}

impl StreamHandle {
    /// Name of the capturing device.
    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        log::debug!("closing input stream on {}", self.device_name);
    }
}

// ---------------------------------------------------------------------------
// GapDetector
// ---------------------------------------------------------------------------

/// Flags discontinuities in the capture clock.
///
/// Each callback's capture timestamp should advance by roughly the duration
/// of the previous callback's frames.  A jump larger than 1.5x that duration
/// means the device dropped input before handing it to us.
#[derive(Debug)]
pub struct GapDetector {
    sample_rate: u32,
    expected: Option<Duration>,
}

impl GapDetector {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            expected: None,
        }
    }

    /// Record a callback of `frames` frames captured `elapsed` after the
    /// previous one.  Returns `true` when input went missing in between.
    pub fn observe(&mut self, elapsed: Option<Duration>, frames: usize) -> bool {
        let gap = match (self.expected, elapsed) {
            (Some(expected), Some(elapsed)) => elapsed > expected + expected / 2,
            _ => false,
        };
        self.expected = if self.sample_rate == 0 {
            None
        } else {
            Some(Duration::from_secs_f64(
                frames as f64 / f64::from(self.sample_rate),
            ))
        };
        gap
    }
}

// ---------------------------------------------------------------------------
// AudioCapture
// ---------------------------------------------------------------------------

/// Default input device wrapper built on top of `cpal`.
///
/// # Example
///
/// ```rust,no_run
/// use mic_visualizer::audio::{AudioCapture, CaptureSource, SampleBlock};
/// use mic_visualizer::config::AudioConfig;
///
/// let capture = AudioCapture::new(&AudioConfig::default()).unwrap();
/// let _handle = capture
///     .start(|block: SampleBlock| {
///         let _ = block.samples.len();
///     })
///     .unwrap();
/// // `_handle` keeps the stream alive; drop it to stop capturing.
/// ```
pub struct AudioCapture {
    device: cpal::Device,
    device_name: String,
    config: AudioConfig,
}

impl AudioCapture {
    /// Open the system default input device.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::Config`] for invalid parameters (checked
    /// first, before any device is touched) and [`CaptureError::NoDevice`]
    /// when the host has no input device.
    pub fn new(config: &AudioConfig) -> Result<Self, CaptureError> {
        config.validate()?;
        let host = cpal::default_host();
        log::debug!("audio host: {:?}", host.id());
        Self::from_device(host.default_input_device(), config)
    }

    /// Wrap an already-selected device.  `None` yields
    /// [`CaptureError::NoDevice`].
    pub fn from_device(
        device: Option<cpal::Device>,
        config: &AudioConfig,
    ) -> Result<Self, CaptureError> {
        config.validate()?;
        let device = device.ok_or(CaptureError::NoDevice)?;
        let device_name = device.name().unwrap_or_else(|_| "<unnamed device>".into());

        Ok(Self {
            device,
            device_name,
            config: config.clone(),
        })
    }

    /// Name reported by the device.
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Pick a fixed hardware buffer of `block_size` frames when the device
    /// advertises one for our rate/channels/format, otherwise let the backend
    /// choose and rely on [`BlockAssembler`] to re-chunk.
    fn buffer_size(&self) -> cpal::BufferSize {
        let frames = self.config.block_size;
        let rate = self.config.sample_rate;
        let channels = self.config.channels;

        let fixed_supported = match self.device.supported_input_configs() {
            Ok(mut configs) => configs.any(|c| {
                c.channels() == channels
                    && c.sample_format() == cpal::SampleFormat::F32
                    && c.min_sample_rate().0 <= rate
                    && rate <= c.max_sample_rate().0
                    && matches!(
                        c.buffer_size(),
                        cpal::SupportedBufferSize::Range { min, max }
                            if *min <= frames && frames <= *max
                    )
            }),
            Err(e) => {
                log::debug!("could not query supported input configs: {e}");
                false
            }
        };

        if fixed_supported {
            cpal::BufferSize::Fixed(frames)
        } else {
            log::debug!("fixed buffer of {frames} frames not advertised; using backend default");
            cpal::BufferSize::Default
        }
    }
}

impl CaptureSource for AudioCapture {
    type Session = StreamHandle;

    /// Start capturing and deliver blocks to `handler` on the cpal callback
    /// thread.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::BuildStream`] or [`CaptureError::PlayStream`]
    /// if the platform rejects the stream configuration or the open times
    /// out.  No block is delivered in that case.
    fn start<H>(self, handler: H) -> Result<StreamHandle, CaptureError>
    where
        H: BlockHandler + 'static,
    {
        let stream_config = cpal::StreamConfig {
            channels: self.config.channels,
            sample_rate: cpal::SampleRate(self.config.sample_rate),
            buffer_size: self.buffer_size(),
        };
        log::info!(
            "opening {} ({} Hz, {} ch, buffer {:?})",
            self.device_name,
            stream_config.sample_rate.0,
            stream_config.channels,
            stream_config.buffer_size
        );

        let channels = usize::from(self.config.channels);
        let mut assembler = BlockAssembler::new(self.config.block_len());
        let mut gaps = GapDetector::new(self.config.sample_rate);
        let mut last_capture: Option<cpal::StreamInstant> = None;
        let mut handler = handler;

        let errored = Arc::new(AtomicBool::new(false));
        let errored_cb = Arc::clone(&errored);

        let stream = self.device.build_input_stream(
            &stream_config,
            move |data: &[f32], info: &cpal::InputCallbackInfo| {
                let capture = info.timestamp().capture;
                let elapsed = last_capture.and_then(|prev| capture.duration_since(&prev));
                last_capture = Some(capture);

                if gaps.observe(elapsed, data.len() / channels) {
                    assembler.flag(StreamStatus::OVERFLOW);
                }
                if errored.swap(false, Ordering::Relaxed) {
                    assembler.flag(StreamStatus::STREAM_ERROR);
                }
                assembler.push(data, |block| handler.on_block(block));
            },
            move |err: cpal::StreamError| {
                log::warn!("cpal stream error: {err}");
                errored_cb.store(true, Ordering::Relaxed);
            },
            Some(self.config.open_timeout),
        )?;

        stream.play()?;
        Ok(StreamHandle {
            _stream: stream,
            device_name: self.device_name,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_device_is_device_unavailable() {
        let err = AudioCapture::from_device(None, &AudioConfig::default())
            .err()
            .expect("must fail without a device");
        assert!(matches!(err, CaptureError::NoDevice), "{err}");
        assert!(err.is_device_unavailable());
    }

    #[test]
    fn invalid_config_checked_before_device() {
        let cfg = AudioConfig {
            block_size: 0,
            ..AudioConfig::default()
        };
        let err = AudioCapture::from_device(None, &cfg).err().expect("must fail");
        assert!(matches!(err, CaptureError::Config(ConfigError::ZeroBlockSize)));
        assert!(!err.is_device_unavailable());
    }

    #[test]
    fn new_rejects_invalid_config() {
        let cfg = AudioConfig {
            sample_rate: 0,
            ..AudioConfig::default()
        };
        let err = AudioCapture::new(&cfg).err().expect("must fail");
        assert!(matches!(err, CaptureError::Config(ConfigError::ZeroSampleRate)));
    }

    // ---- GapDetector -------------------------------------------------------

    #[test]
    fn steady_clock_has_no_gaps() {
        let mut g = GapDetector::new(1000);
        assert!(!g.observe(None, 100));
        for _ in 0..10 {
            assert!(!g.observe(Some(Duration::from_millis(100)), 100));
        }
    }

    #[test]
    fn jitter_within_tolerance_is_ignored() {
        let mut g = GapDetector::new(1000);
        g.observe(None, 100);
        assert!(!g.observe(Some(Duration::from_millis(140)), 100));
        assert!(!g.observe(Some(Duration::from_millis(60)), 100));
    }

    #[test]
    fn skipped_callback_is_flagged() {
        let mut g = GapDetector::new(1000);
        g.observe(None, 100);
        assert!(g.observe(Some(Duration::from_millis(200)), 100));
        // Back to normal afterwards.
        assert!(!g.observe(Some(Duration::from_millis(100)), 100));
    }

    #[test]
    fn missing_timestamp_is_not_a_gap() {
        let mut g = GapDetector::new(1000);
        g.observe(None, 100);
        assert!(!g.observe(None, 100));
    }
}
