//! Live microphone level meter for the terminal.
//!
//! Captures mono audio from the default input device in fixed-size blocks,
//! keeps a sliding window of per-block peak and RMS amplitude, and renders
//! one color-coded status line per block, overwriting the previous one.
//!
//! # Modules
//!
//! | Module        | Role                                                    |
//! |---------------|---------------------------------------------------------|
//! | [`audio`]     | capture sources, fixed-size blocks, statistics window   |
//! | [`config`]    | startup constants, `AppConfig`, validation              |
//! | [`visualizer`]| classification, engine, styled status line              |
//! | [`render`]    | terminal / log sinks, startup banner                    |
//! | [`pipeline`]  | non-blocking handoff from the audio thread to rendering |

pub mod audio;
pub mod config;
pub mod pipeline;
pub mod render;
pub mod visualizer;
