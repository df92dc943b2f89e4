//! Scripted hardware for exercising the capture loop without a board.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use gpio_io::{DigitalInput, DigitalOutput, PinController, PinError, Pull};
use video_ingest::{CaptureError, Frame, FrameFormat, FrameSource};

use crate::capture::{clock::Clock, session::CaptureSession};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Event {
    ButtonSample { high: bool, led_high: bool },
    LedHigh,
    LedLow,
    LedReset,
    ButtonReset,
    FrameRead { ok: bool, led_high: bool },
    CameraReleased,
    PinClaimed(u8),
    Sleep(Duration),
}

type Log = Rc<RefCell<Vec<Event>>>;

pub(crate) type FakeSession = CaptureSession<FakeCamera, FakeButton, FakeLed>;

/// Shared event log plus the interrupt flag the loop watches.
pub(crate) struct Rig {
    log: Log,
    led_high: Rc<Cell<bool>>,
    button_script: Rc<RefCell<VecDeque<bool>>>,
    pub(crate) shutdown: Arc<AtomicBool>,
}

impl Rig {
    /// `button_script` is consumed one sample at a time; once it runs out the
    /// button reads low and the interrupt flag is raised.
    pub(crate) fn new(button_script: Vec<bool>) -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
            led_high: Rc::new(Cell::new(false)),
            button_script: Rc::new(RefCell::new(button_script.into())),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub(crate) fn session(&self, frames: Vec<Result<Frame, CaptureError>>) -> FakeSession {
        CaptureSession::new(self.camera(frames), self.button(), self.led())
    }

    pub(crate) fn camera(&self, frames: Vec<Result<Frame, CaptureError>>) -> FakeCamera {
        FakeCamera {
            frames: frames.into(),
            log: self.log.clone(),
            led_high: self.led_high.clone(),
        }
    }

    fn button(&self) -> FakeButton {
        FakeButton {
            script: self.button_script.clone(),
            log: self.log.clone(),
            led_high: self.led_high.clone(),
            shutdown: self.shutdown.clone(),
        }
    }

    fn led(&self) -> FakeLed {
        FakeLed {
            high: self.led_high.clone(),
            log: self.log.clone(),
        }
    }

    /// Pin controller wired to this rig; pins in `busy` refuse every claim.
    pub(crate) fn board(&self, busy: &[u8]) -> FakeBoard {
        FakeBoard {
            rig: Rig {
                log: self.log.clone(),
                led_high: self.led_high.clone(),
                button_script: self.button_script.clone(),
                shutdown: self.shutdown.clone(),
            },
            busy: busy.to_vec(),
        }
    }

    pub(crate) fn clock(&self, timestamps: Vec<i64>) -> FakeClock {
        FakeClock {
            timestamps: RefCell::new(timestamps.into()),
            last: Cell::new(0),
            log: self.log.clone(),
            shutdown: self.shutdown.clone(),
            interrupt_after_sleeps: None,
            sleeps: Cell::new(0),
        }
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.log.borrow().clone()
    }

    pub(crate) fn led_is_high(&self) -> bool {
        self.led_high.get()
    }
}

pub(crate) fn test_frame(width: i32, height: i32) -> Frame {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            let v = if x < width / 2 { 30 } else { 220 };
            data.extend_from_slice(&[v, (y * 4) as u8, 255 - v]);
        }
    }
    Frame {
        data,
        width,
        height,
        format: FrameFormat::Bgr8,
    }
}

pub(crate) struct FakeCamera {
    frames: VecDeque<Result<Frame, CaptureError>>,
    log: Log,
    led_high: Rc<Cell<bool>>,
}

impl FrameSource for FakeCamera {
    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let result = self.frames.pop_front().unwrap_or(Err(CaptureError::NoFrame));
        self.log.borrow_mut().push(Event::FrameRead {
            ok: result.is_ok(),
            led_high: self.led_high.get(),
        });
        result
    }

    fn release(&mut self) {
        self.log.borrow_mut().push(Event::CameraReleased);
    }
}

pub(crate) struct FakeButton {
    script: Rc<RefCell<VecDeque<bool>>>,
    log: Log,
    led_high: Rc<Cell<bool>>,
    shutdown: Arc<AtomicBool>,
}

impl DigitalInput for FakeButton {
    fn is_high(&self) -> bool {
        let high = match self.script.borrow_mut().pop_front() {
            Some(high) => high,
            None => {
                self.shutdown.store(true, Ordering::SeqCst);
                false
            }
        };
        self.log.borrow_mut().push(Event::ButtonSample {
            high,
            led_high: self.led_high.get(),
        });
        high
    }

    fn reset(&mut self) {
        self.log.borrow_mut().push(Event::ButtonReset);
    }
}

pub(crate) struct FakeLed {
    high: Rc<Cell<bool>>,
    log: Log,
}

impl DigitalOutput for FakeLed {
    fn set_high(&mut self) {
        self.high.set(true);
        self.log.borrow_mut().push(Event::LedHigh);
    }

    fn set_low(&mut self) {
        self.high.set(false);
        self.log.borrow_mut().push(Event::LedLow);
    }

    fn reset(&mut self) {
        self.high.set(false);
        self.log.borrow_mut().push(Event::LedReset);
    }
}

pub(crate) struct FakeBoard {
    rig: Rig,
    busy: Vec<u8>,
}

impl FakeBoard {
    fn claim(&self, physical: u8) -> Result<(), PinError> {
        if self.busy.contains(&physical) {
            return Err(PinError::Unavailable {
                pin: physical,
                reason: "in use".to_string(),
            });
        }
        self.rig.log.borrow_mut().push(Event::PinClaimed(physical));
        Ok(())
    }
}

impl PinController for FakeBoard {
    type Output = FakeLed;
    type Input = FakeButton;

    fn claim_output(&mut self, physical: u8) -> Result<FakeLed, PinError> {
        self.claim(physical)?;
        Ok(self.rig.led())
    }

    fn claim_input(&mut self, physical: u8, _pull: Pull) -> Result<FakeButton, PinError> {
        self.claim(physical)?;
        Ok(self.rig.button())
    }
}

/// Hands out scripted timestamps (repeating the last one) and logs sleeps.
pub(crate) struct FakeClock {
    timestamps: RefCell<VecDeque<i64>>,
    last: Cell<i64>,
    log: Log,
    shutdown: Arc<AtomicBool>,
    interrupt_after_sleeps: Option<usize>,
    sleeps: Cell<usize>,
}

impl FakeClock {
    /// Raise the interrupt flag during the `n`th sleep.
    pub(crate) fn interrupt_on_sleep(mut self, n: usize) -> Self {
        self.interrupt_after_sleeps = Some(n);
        self
    }
}

impl Clock for FakeClock {
    fn unix_seconds(&self) -> i64 {
        if let Some(next) = self.timestamps.borrow_mut().pop_front() {
            self.last.set(next);
        }
        self.last.get()
    }

    fn sleep(&self, duration: Duration) {
        self.log.borrow_mut().push(Event::Sleep(duration));
        let count = self.sleeps.get() + 1;
        self.sleeps.set(count);
        if self.interrupt_after_sleeps == Some(count) {
            self.shutdown.store(true, Ordering::SeqCst);
        }
    }
}
