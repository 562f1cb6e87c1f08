//! Dedicated-worker execution for engine sequences
//!
//! Automation engines have single-threaded affinity: a whole
//! launch -> open -> export -> close -> quit sequence must run on one thread,
//! and engine handles cannot move to another execution context. Each bridge
//! call therefore gets its own freshly spawned worker thread, never pooled and
//! never reused; the caller blocks until the sequence completes or fails.

use crate::error::{Error, Result};

/// Run `f` to completion on a fresh, dedicated thread.
///
/// Failures inside `f` are captured on the worker and re-raised here; a panic
/// on the worker surfaces as an engine-operation error rather than unwinding
/// into the caller.
pub fn run_on_dedicated_worker<T, F>(name: &str, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let handle = std::thread::Builder::new()
        .name(format!("engine-{}", name))
        .spawn(f)?;

    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(Error::EngineOperation {
            reason: format!("engine worker '{}' panicked", name),
        }),
    }
}
