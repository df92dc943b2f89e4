use gpio_io::{DigitalInput, DigitalOutput};
use tracing::info;
use video_ingest::FrameSource;

/// Owns the camera and both pins for the lifetime of the capture loop.
///
/// `shutdown` releases the camera, drives the LED low and resets both pins.
/// It runs at most once and is also invoked from `Drop`, so every way out of
/// the loop (interrupt, error, unwind) leaves the hardware in a neutral state.
pub(crate) struct CaptureSession<S: FrameSource, I: DigitalInput, O: DigitalOutput> {
    pub(crate) source: S,
    pub(crate) button: I,
    pub(crate) led: O,
    closed: bool,
}

impl<S: FrameSource, I: DigitalInput, O: DigitalOutput> CaptureSession<S, I, O> {
    pub(crate) fn new(source: S, button: I, mut led: O) -> Self {
        led.set_low();
        Self {
            source,
            button,
            led,
            closed: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        info!("Cleaning up...");
        self.source.release();
        self.led.set_low();
        self.led.reset();
        self.button.reset();
        info!("Done.");
    }
}

impl<S: FrameSource, I: DigitalInput, O: DigitalOutput> Drop for CaptureSession<S, I, O> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
