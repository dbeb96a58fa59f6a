//! The error banner.
//!
//! # Design
//! At most one message is visible. Showing a message aborts the pending
//! auto-dismiss task and schedules a new one; clearing aborts it too. Each
//! show bumps a generation counter, and a dismiss task only clears the
//! message it was scheduled for, so a task that fires while being aborted
//! cannot wipe a newer message. Dismiss tasks hold a `Weak` reference and
//! the timer is aborted when the banner is dropped.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How long a message stays up without an explicit dismiss.
pub const ERROR_DISPLAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ErrorMessage {
    #[default]
    Empty,
    LoadFailed,
    AddFailed,
    UpdateFailed,
    DeleteFailed,
    EmptyTitle,
}

impl ErrorMessage {
    pub fn text(self) -> &'static str {
        match self {
            ErrorMessage::Empty => "",
            ErrorMessage::LoadFailed => "Unable to load todos",
            ErrorMessage::AddFailed => "Unable to add a todo",
            ErrorMessage::UpdateFailed => "Unable to update a todo",
            ErrorMessage::DeleteFailed => "Unable to delete a todo",
            ErrorMessage::EmptyTitle => "Title should not be empty",
        }
    }

    pub fn is_empty(self) -> bool {
        self == ErrorMessage::Empty
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl std::error::Error for ErrorMessage {}

#[derive(Debug, Default)]
struct BannerState {
    message: ErrorMessage,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl BannerState {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for BannerState {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

/// Shared handle to the single error slot.
#[derive(Debug, Clone)]
pub struct ErrorBanner {
    inner: Arc<Mutex<BannerState>>,
    display_for: Duration,
}

impl Default for ErrorBanner {
    fn default() -> Self {
        Self::new(ERROR_DISPLAY)
    }
}

impl ErrorBanner {
    pub fn new(display_for: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BannerState::default())),
            display_for,
        }
    }

    pub fn current(&self) -> ErrorMessage {
        self.lock().message
    }

    /// Replace the visible message and restart the dismiss window.
    ///
    /// Outside a tokio runtime the message is shown but never auto-dismissed.
    pub fn show(&self, message: ErrorMessage) {
        let mut state = self.lock();
        state.cancel_timer();
        state.generation += 1;
        state.message = message;
        debug!(%message, generation = state.generation, "showing error");

        if message.is_empty() {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let weak = Arc::downgrade(&self.inner);
                let generation = state.generation;
                let display_for = self.display_for;
                state.timer = Some(handle.spawn(dismiss_after(weak, generation, display_for)));
            }
            Err(_) => warn!("no tokio runtime, error banner will not auto-dismiss"),
        }
    }

    /// Hide the message and cancel the pending dismiss.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.cancel_timer();
        state.generation += 1;
        state.message = ErrorMessage::Empty;
    }

    pub fn has_pending_dismiss(&self) -> bool {
        self.lock().timer.is_some()
    }

    fn lock(&self) -> MutexGuard<'_, BannerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn dismiss_after(state: Weak<Mutex<BannerState>>, generation: u64, delay: Duration) {
    tokio::time::sleep(delay).await;
    let Some(state) = state.upgrade() else {
        return;
    };
    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    if state.generation == generation {
        state.message = ErrorMessage::Empty;
        // Dropping our own handle detaches it; nothing left to abort.
        state.timer = None;
    }
}
