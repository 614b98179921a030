//! Application entry point: live microphone level meter.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Build and validate [`AppConfig`].
//! 3. Print the banner to stdout, colored on interactive terminals.
//! 4. Spawn the render thread, which owns the [`Visualizer`] and its sink.
//! 5. Open the default input device and start capture into the handoff.
//! 6. Idle on a current-thread [`tokio`] runtime until Ctrl+C, or until the
//!    render thread stops on its own.
//! 7. Drop the stream (releases the device), join the render thread, report.

use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result};
use mic_visualizer::{
    audio::{AudioCapture, CaptureSource},
    config::AppConfig,
    pipeline::RenderThread,
    render::{write_banner, TerminalSink},
    visualizer::Visualizer,
};

/// How often the idle loop checks on the render thread.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// Idle loop
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stop {
    Interrupted,
    RenderExited,
}

/// Wait for Ctrl+C, polling the render thread in between.
async fn wait_for_stop(render: &RenderThread) -> io::Result<Stop> {
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut poll = tokio::time::interval(POLL_INTERVAL);

    loop {
        tokio::select! {
            res = &mut ctrl_c => {
                res?;
                return Ok(Stop::Interrupted);
            }
            _ = poll.tick() => {
                if render.is_finished() {
                    return Ok(Stop::RenderExited);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Configuration
    let config = AppConfig::default();
    config.validate().context("invalid configuration")?;

    // 3. Banner + sink
    let interactive = io::stdout().is_terminal();
    if !interactive {
        log::debug!("stdout is not a terminal; writing plain lines");
    }
    write_banner(&mut io::stdout(), &config, interactive).context("failed to write banner")?;
    let sink = TerminalSink::stdout(interactive);

    // 4. Render thread
    let visualizer = Visualizer::new(&config, sink);
    let (handoff, render) = RenderThread::spawn(visualizer, config.display.queue_depth)
        .context("failed to spawn render thread")?;

    // 5. Capture
    let stream = match AudioCapture::new(&config.audio).and_then(|c| c.start(handoff)) {
        Ok(stream) => stream,
        Err(e) => {
            if e.is_device_unavailable() {
                log::warn!("check that a microphone is connected and not in use");
            }
            return Err(e).context("audio input unavailable");
        }
    };
    log::debug!("capturing from {}", stream.device_name());

    // 6. Idle until interrupted
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;
    let stop = runtime
        .block_on(wait_for_stop(&render))
        .context("failed to listen for Ctrl+C")?;
    log::debug!("stopping: {stop:?}");

    // 7. Shutdown: closing the stream drops the handoff, which lets the
    //    render thread drain and exit.
    drop(stream);
    let summary = render.join().context("visualizer stopped")?;
    log::info!(
        "rendered {} blocks ({} flagged, {} dropped)",
        summary.rendered,
        summary.flagged,
        summary.dropped
    );

    println!("Exiting...");
    Ok(())
}
