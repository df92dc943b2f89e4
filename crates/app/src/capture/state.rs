/// States of the capture loop.
///
/// `Idle → Capturing → Cooldown → ReleaseWait → Idle`. A failed acquisition
/// goes straight from `Capturing` back to `Idle`; an interrupt or fault from
/// any state ends in `Shutdown`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum LoopState {
    Idle,
    Capturing,
    Cooldown,
    ReleaseWait,
    Shutdown,
}

impl LoopState {
    pub(crate) fn label(self) -> &'static str {
        match self {
            LoopState::Idle => "idle",
            LoopState::Capturing => "capturing",
            LoopState::Cooldown => "cooldown",
            LoopState::ReleaseWait => "release-wait",
            LoopState::Shutdown => "shutdown",
        }
    }
}
