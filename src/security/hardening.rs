//! Process hardening
//!
//! Best-effort protections applied once at backend setup: disabling core
//! dumps so key material cannot land in a dump file, and checking whether
//! memory locking is available to the process.
//!
//! All of these are advisory: a failure is logged, never fatal.

use tracing::{debug, warn};

/// Check if the process may lock memory (requires appropriate rlimits)
pub fn can_lock_memory() -> bool {
    #[cfg(target_os = "linux")]
    {
        use nix::sys::resource::{getrlimit, Resource};

        match getrlimit(Resource::RLIMIT_MEMLOCK) {
            Ok((soft, _hard)) => soft > 0,
            Err(_) => false,
        }
    }

    #[cfg(not(target_os = "linux"))]
    {
        true
    }
}

/// Disable core dumps for the process
pub fn disable_core_dumps() -> bool {
    #[cfg(target_os = "linux")]
    {
        use nix::sys::resource::{setrlimit, Resource};

        match setrlimit(Resource::RLIMIT_CORE, 0, 0) {
            Ok(()) => {
                debug!("Core dumps disabled");
                true
            }
            Err(e) => {
                warn!("Could not disable core dumps: {}", e);
                false
            }
        }
    }

    #[cfg(not(target_os = "linux"))]
    {
        debug!("Core dump control not supported on this platform");
        false
    }
}

/// Apply process hardening. Called once from backend setup.
pub fn setup_process_hardening(disable_dumps: bool, verify_mlock: bool) {
    if disable_dumps {
        disable_core_dumps();
    }

    if verify_mlock {
        if can_lock_memory() {
            debug!("Memory locking is available");
        } else {
            warn!("Memory locking may not be available - consider increasing RLIMIT_MEMLOCK");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_lock_memory_does_not_panic() {
        // Result depends on the environment; only the call itself is under test
        let _ = can_lock_memory();
    }

    #[test]
    fn test_setup_is_safe_to_repeat() {
        setup_process_hardening(false, true);
        setup_process_hardening(false, true);
    }
}
