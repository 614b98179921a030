//! Configuration module.
//!
//! Provides `AppConfig` (top-level settings), its sub-configs, the default
//! constants, and validation via `ConfigError`.

pub mod settings;

pub use settings::{
    AppConfig, AudioConfig, ConfigError, DisplayConfig, BLOCK_SIZE, CHANNELS, DISPLAY_SAMPLES,
    OPEN_TIMEOUT, PEAK_HISTORY, RENDER_QUEUE_DEPTH, SAMPLE_RATE,
};
