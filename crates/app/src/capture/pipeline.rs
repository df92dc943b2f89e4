//! Startup sequence and the button poll loop.
//!
//! Setup runs in a fixed order: pins, output directory, camera. Pin
//! resolution happens first so a board without usable pins fails before
//! anything is written to disk. The loop then owns every hardware handle
//! through a [`CaptureSession`] until it returns.

use std::{
    sync::{
        Arc, Once,
        atomic::{AtomicBool, Ordering},
    },
    time::Instant,
};

use anyhow::{Context, Result};
use gpio_io::{
    DigitalInput, DigitalOutput, PinController, ResolvedPin, RppalController, resolve_input,
    resolve_output,
};
use tracing::{debug, error, info, warn};
use video_ingest::{CaptureError, FrameSource};
use vision::{ArtifactPair, ArtifactWriter};

use crate::capture::{
    clock::{Clock, SystemClock},
    config::{CaptureConfig, LoopTiming},
    session::CaptureSession,
    state::LoopState,
    telemetry,
};

/// What a single press produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum PressOutcome {
    Captured(ArtifactPair),
    AcquisitionFailed,
    PersistFailed,
}

/// Totals reported when the loop stops.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct LoopSummary {
    pub(crate) presses: u64,
    pub(crate) captures: u64,
    pub(crate) acquisition_failures: u64,
    pub(crate) persist_failures: u64,
}

/// Hardware and output handles produced by [`prepare`].
pub(crate) struct Prepared<S: FrameSource, I: DigitalInput, O: DigitalOutput> {
    pub(crate) session: CaptureSession<S, I, O>,
    pub(crate) writer: ArtifactWriter,
    pub(crate) led_pin: ResolvedPin,
    pub(crate) button_pin: ResolvedPin,
}

/// Configure hardware and run the capture loop until Ctrl+C.
///
/// Returns an error when a pin role exhausts its candidates or the camera
/// cannot be opened. Failed presses are logged and the loop keeps going, so
/// once the loop is running the only way out is an interrupt.
pub fn run(config: CaptureConfig) -> Result<()> {
    telemetry::init_metrics(config.metrics_addr)?;
    let shutdown = install_interrupt_handler();

    let mut controller = RppalController::new().context("GPIO setup failed")?;
    let Prepared {
        mut session,
        writer,
        led_pin,
        button_pin,
    } = prepare(&config, &mut controller, open_camera)?;

    let session_span = tracing::info_span!(
        "capture.session",
        camera = %config.camera_uri,
        led_pin = led_pin.physical,
        button_pin = button_pin.physical
    );
    let _session_guard = session_span.enter();

    let summary = run_capture_loop(
        &mut session,
        &writer,
        &SystemClock,
        &config.timing,
        &shutdown,
    );
    info!("Program interrupted by user");
    session.shutdown();

    info!(
        presses = summary.presses,
        captures = summary.captures,
        acquisition_failures = summary.acquisition_failures,
        persist_failures = summary.persist_failures,
        "Capture loop stopped"
    );
    Ok(())
}

/// Claim both pins, create the output directory, then open the camera.
///
/// Each step runs only if the previous one succeeded. Pins claimed before a
/// later failure are dropped on return.
pub(crate) fn prepare<P, S, F>(
    config: &CaptureConfig,
    controller: &mut P,
    open_camera: F,
) -> Result<Prepared<S, P::Input, P::Output>>
where
    P: PinController,
    S: FrameSource,
    F: FnOnce(&str) -> Result<S>,
{
    let (led, led_pin) = resolve_output(controller, &config.led).context("LED setup failed")?;
    let (button, button_pin) =
        resolve_input(controller, &config.button).context("button setup failed")?;

    let writer = ArtifactWriter::new(&config.output_dir, config.jpeg_quality);
    writer
        .ensure_output_dir()
        .context("output directory setup failed")?;

    let source = open_camera(&config.camera_uri)?;

    info!(
        "Ready to capture. Press the button on pin {}!",
        button_pin.physical
    );
    info!("LED is on pin {}", led_pin.physical);
    info!("Saving captures to {}", writer.output_dir().display());

    Ok(Prepared {
        session: CaptureSession::new(source, button, led),
        writer,
        led_pin,
        button_pin,
    })
}

#[cfg(feature = "with-opencv")]
fn open_camera(uri: &str) -> Result<Box<dyn FrameSource>> {
    let camera = video_ingest::OpenCvCamera::open(uri).map_err(|err| {
        error!("Error: Camera could not be opened.");
        anyhow::Error::new(err)
    })?;
    Ok(Box::new(camera))
}

#[cfg(not(feature = "with-opencv"))]
fn open_camera(uri: &str) -> Result<Box<dyn FrameSource>> {
    error!("Error: Camera could not be opened.");
    Err(CaptureError::Open {
        uri: uri.to_string(),
    })
    .context("camera support requires building with the `with-opencv` feature")
}

fn install_interrupt_handler() -> Arc<AtomicBool> {
    static CTRL_HANDLER: Once = Once::new();

    let shutdown = Arc::new(AtomicBool::new(false));
    let handler_shutdown = shutdown.clone();
    CTRL_HANDLER.call_once(move || {
        if let Err(err) = ctrlc::set_handler(move || {
            handler_shutdown.store(true, Ordering::SeqCst);
        }) {
            warn!("Failed to install Ctrl+C handler: {err}");
        }
    });
    shutdown
}

/// Poll the button until `shutdown` is raised.
///
/// Failed presses are logged and counted; the session is left for the caller
/// (or its `Drop`) to clean up.
pub(crate) fn run_capture_loop<S, I, O, C>(
    session: &mut CaptureSession<S, I, O>,
    writer: &ArtifactWriter,
    clock: &C,
    timing: &LoopTiming,
    shutdown: &AtomicBool,
) -> LoopSummary
where
    S: FrameSource,
    I: DigitalInput,
    O: DigitalOutput,
    C: Clock,
{
    let mut summary = LoopSummary::default();
    let mut state = LoopState::Idle;

    loop {
        if shutdown.load(Ordering::SeqCst) {
            debug!("interrupt observed in {} state", state.label());
            state = LoopState::Shutdown;
        }

        state = match state {
            LoopState::Idle => {
                if session.button.is_high() {
                    LoopState::Capturing
                } else {
                    clock.sleep(timing.poll_interval);
                    LoopState::Idle
                }
            }
            LoopState::Capturing => {
                summary.presses += 1;
                metrics::counter!("capture_presses_total").increment(1);
                match capture_press(session, writer, clock) {
                    PressOutcome::Captured(pair) => {
                        debug!(
                            "capture complete: {} / {}",
                            pair.image.display(),
                            pair.edges.display()
                        );
                        summary.captures += 1;
                        LoopState::Cooldown
                    }
                    PressOutcome::AcquisitionFailed => {
                        summary.acquisition_failures += 1;
                        LoopState::Idle
                    }
                    // The frame was taken, so the press counts as handled.
                    PressOutcome::PersistFailed => {
                        summary.persist_failures += 1;
                        LoopState::ReleaseWait
                    }
                }
            }
            LoopState::Cooldown => {
                clock.sleep(timing.cooldown);
                session.led.set_low();
                LoopState::ReleaseWait
            }
            LoopState::ReleaseWait => {
                if session.button.is_high() {
                    clock.sleep(timing.release_poll);
                    LoopState::ReleaseWait
                } else {
                    LoopState::Idle
                }
            }
            LoopState::Shutdown => return summary,
        };
    }
}

/// Handle one press: LED on, grab a frame, write both artifacts.
///
/// On any failure the LED is switched off again before returning. On success
/// the LED is left on for the cooldown.
fn capture_press<S, I, O, C>(
    session: &mut CaptureSession<S, I, O>,
    writer: &ArtifactWriter,
    clock: &C,
) -> PressOutcome
where
    S: FrameSource,
    I: DigitalInput,
    O: DigitalOutput,
    C: Clock,
{
    info!("Button Pressed! Capturing...");
    session.led.set_high();

    let acquire_start = Instant::now();
    let frame = match session.source.read_frame() {
        Ok(frame) => frame,
        Err(err) => {
            match err {
                CaptureError::NoFrame => warn!("Failed to capture frame!"),
                other => warn!("Failed to capture frame: {other}"),
            }
            metrics::counter!("capture_acquisition_failures_total").increment(1);
            session.led.set_low();
            return PressOutcome::AcquisitionFailed;
        }
    };
    metrics::histogram!("capture_stage_latency_seconds", "stage" => "acquire")
        .record(acquire_start.elapsed().as_secs_f64());

    let timestamp = clock.unix_seconds();
    let press_span = tracing::info_span!(
        "capture.press",
        timestamp,
        width = frame.width,
        height = frame.height
    );
    let _press_guard = press_span.enter();

    let persist_start = Instant::now();
    match writer.write_pair(&frame, timestamp) {
        Ok(pair) => {
            metrics::histogram!("capture_stage_latency_seconds", "stage" => "persist")
                .record(persist_start.elapsed().as_secs_f64());
            metrics::counter!("capture_artifacts_written_total").increment(2);
            PressOutcome::Captured(pair)
        }
        Err(err) => {
            error!("Failed to save capture: {:#}", anyhow::Error::new(err));
            metrics::counter!("capture_persist_failures_total").increment(1);
            session.led.set_low();
            PressOutcome::PersistFailed
        }
    }
}
