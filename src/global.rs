//! Process-wide options registry.
//!
//! The registry is built and loaded at most once: the first successful
//! [`get_or_init`] stores it and every later call returns the same instance.
//! A failed initialization stores nothing, so the next call tries again.
//! [`reset`] clears the stored registry and exists for tests.

use crate::error::ErrorList;
use crate::options::Options;
use std::sync::{Arc, Mutex, PoisonError};

static GLOBAL: Mutex<Option<Arc<Options<'static>>>> = Mutex::new(None);

/// Return the process-wide registry, building it with `init` on first use
///
/// `init` must declare the options and run [`Options::load`]; its error is
/// returned unchanged.
pub fn get_or_init<F>(init: F) -> Result<Arc<Options<'static>>, ErrorList>
where
    F: FnOnce() -> Result<Options<'static>, ErrorList>,
{
    let mut slot = GLOBAL.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(options) = slot.as_ref() {
        return Ok(Arc::clone(options));
    }

    let options = Arc::new(init()?);
    tracing::debug!(options = options.len(), "initialized global options");
    *slot = Some(Arc::clone(&options));
    Ok(options)
}

/// The process-wide registry, if it has been initialized
pub fn get() -> Option<Arc<Options<'static>>> {
    GLOBAL
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map(Arc::clone)
}

/// Drop the process-wide registry so the next [`get_or_init`] builds a new one
pub fn reset() {
    *GLOBAL.lock().unwrap_or_else(PoisonError::into_inner) = None;
}
