//! Process-level shutdown state.
//!
//! The first Ctrl+C raises the shutdown flag: the publisher stops issuing
//! new uploads and lets in-flight ones finish. A second Ctrl+C exits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: LazyLock<Arc<AtomicBool>> = LazyLock::new(|| Arc::new(AtomicBool::new(false)));

/// Setup the global Ctrl+C handler. Call once at program start
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        if SHUTDOWN.swap(true, Ordering::SeqCst) {
            // Second interrupt: nothing left to drain gracefully
            std::process::exit(130);
        }
        crate::log!("publish"; "interrupted, finishing in-flight uploads...");
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Shared handle to the global shutdown flag.
pub fn shutdown_flag() -> Arc<AtomicBool> {
    Arc::clone(&SHUTDOWN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_flag_is_shared() {
        let a = shutdown_flag();
        let b = shutdown_flag();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!a.load(Ordering::Relaxed));
    }
}
