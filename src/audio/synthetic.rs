//! Generator-driven capture source.
//!
//! [`SyntheticSource`] honours the same contract as the microphone capture
//! (fixed-size blocks, strict order, dedicated delivery thread, RAII stop)
//! but fills each block from a closure.  It lets the whole pipeline run
//! without audio hardware.
//!
//! # Example
//!
//! ```rust
//! use std::sync::mpsc;
//! use mic_visualizer::audio::{sine_wave, CaptureSource, SampleBlock, SyntheticSource};
//! use mic_visualizer::config::AudioConfig;
//!
//! let config = AudioConfig { block_size: 64, ..AudioConfig::default() };
//! let (tx, rx) = mpsc::channel();
//! let session = SyntheticSource::new(&config, sine_wave(440.0, 0.5, config.sample_rate))
//!     .unwrap()
//!     .with_limit(3)
//!     .without_pacing()
//!     .start(move |block: SampleBlock| {
//!         let _ = tx.send(block.seq);
//!     })
//!     .unwrap();
//!
//! assert_eq!(session.join().unwrap(), 3);
//! assert_eq!(rx.iter().collect::<Vec<_>>(), vec![0, 1, 2]);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::block::{BlockHandler, SampleBlock};
use super::capture::{CaptureError, CaptureSource};
use crate::config::AudioConfig;

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Continuous sine tone; phase carries across blocks.
pub fn sine_wave(
    frequency: f32,
    amplitude: f32,
    sample_rate: u32,
) -> impl FnMut(u64, &mut [f32]) + Send + 'static {
    let step = std::f64::consts::TAU * f64::from(frequency) / f64::from(sample_rate.max(1));
    let mut n: u64 = 0;
    move |_seq: u64, out: &mut [f32]| {
        for s in out.iter_mut() {
            *s = ((n as f64 * step).sin() * f64::from(amplitude)) as f32;
            n += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// SyntheticSource
// ---------------------------------------------------------------------------

/// Capture source that synthesises blocks with `generator(seq, block)`.
pub struct SyntheticSource<G> {
    block_len: usize,
    generator: G,
    /// Delay between blocks; zero delivers as fast as the handler allows.
    interval: Duration,
    limit: Option<u64>,
}

impl<G> SyntheticSource<G>
where
    G: FnMut(u64, &mut [f32]) + Send + 'static,
{
    /// Create a source paced at real time (one block per block duration).
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::Config`] when `config` is invalid.
    pub fn new(config: &AudioConfig, generator: G) -> Result<Self, CaptureError> {
        config.validate()?;
        Ok(Self {
            block_len: config.block_len(),
            generator,
            interval: config.block_duration(),
            limit: None,
        })
    }

    /// Stop by itself after `blocks` blocks.
    pub fn with_limit(mut self, blocks: u64) -> Self {
        self.limit = Some(blocks);
        self
    }

    /// Deliver one block every `interval` instead of at real-time cadence.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Deliver blocks back-to-back.
    pub fn without_pacing(self) -> Self {
        self.with_interval(Duration::ZERO)
    }
}

impl<G> CaptureSource for SyntheticSource<G>
where
    G: FnMut(u64, &mut [f32]) + Send + 'static,
{
    type Session = SyntheticSession;

    fn start<H>(self, handler: H) -> Result<SyntheticSession, CaptureError>
    where
        H: BlockHandler + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let running_thread = Arc::clone(&running);
        let SyntheticSource {
            block_len,
            mut generator,
            interval,
            limit,
        } = self;
        let mut handler = handler;

        let handle = thread::Builder::new()
            .name("synthetic-capture".into())
            .spawn(move || {
                let mut seq: u64 = 0;
                let mut next_tick = Instant::now();

                while running_thread.load(Ordering::Relaxed) && limit.map_or(true, |n| seq < n) {
                    let mut samples = vec![0.0_f32; block_len];
                    generator(seq, &mut samples);
                    handler.on_block(SampleBlock::new(seq, samples));
                    seq += 1;

                    if !interval.is_zero() {
                        next_tick += interval;
                        thread::sleep(next_tick.saturating_duration_since(Instant::now()));
                    }
                }
                seq
            })?;

        Ok(SyntheticSession {
            running,
            handle: Some(handle),
        })
    }
}

// ---------------------------------------------------------------------------
// SyntheticSession
// ---------------------------------------------------------------------------

/// RAII guard for a running [`SyntheticSource`].  Dropping it stops the
/// delivery thread and waits for it to exit.
pub struct SyntheticSession {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<u64>>,
}

impl SyntheticSession {
    /// Wait for the source to finish on its own (requires a limit) and
    /// return the number of blocks delivered.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::Panicked`] if the generator or the handler
    /// panicked on the delivery thread.
    pub fn join(mut self) -> Result<u64, CaptureError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| CaptureError::Panicked),
            None => Ok(0),
        }
    }

    /// Stop delivery now and return the number of blocks delivered.
    pub fn stop(self) -> Result<u64, CaptureError> {
        self.running.store(false, Ordering::Relaxed);
        self.join()
    }
}

impl Drop for SyntheticSession {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("synthetic capture thread panicked");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
