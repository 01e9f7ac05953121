//! Top-level render guard.
//!
//! A failing render, whether it returns an error or panics, latches the
//! boundary; the static recovery screen is shown until the user reloads.

use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};

use tracing::error;

pub const FALLBACK_SCREEN: &str = "\
Wallet Connection Error

There was an error loading the wallet adapter. This might be due to:
  - Browser extension conflicts
  - Network connectivity issues
  - Wallet adapter compatibility problems

Type `reload` to try again.
";

#[derive(Debug, Default)]
pub struct ErrorBoundary {
    failure: Option<String>,
}

impl ErrorBoundary {
    pub fn render<F, E>(&mut self, child: F) -> String
    where
        F: FnOnce() -> Result<String, E>,
        E: Display,
    {
        if self.failure.is_some() {
            return FALLBACK_SCREEN.to_string();
        }
        let failure = match panic::catch_unwind(AssertUnwindSafe(child)) {
            Ok(Ok(screen)) => return screen,
            Ok(Err(e)) => e.to_string(),
            Err(payload) => payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "render panicked".to_string()),
        };
        error!(error = %failure, "Error boundary caught a render failure");
        self.failure = Some(failure);
        FALLBACK_SCREEN.to_string()
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Clear the latched failure so the next render tries the child again.
    pub fn reset(&mut self) {
        self.failure = None;
    }
}
