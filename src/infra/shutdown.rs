// ============================================================
// Layer 6 — Ctrl-C Handling
// ============================================================
// Long runs (hundreds of trials) can be interrupted cleanly:
// the first Ctrl-C raises a shared flag, and the partition /
// evaluation loops stop at the next trial boundary with
// EvalError::Cancelled. No partial aggregate is reported.
// A second Ctrl-C exits immediately.
//
// The signal is awaited with tokio on a small helper thread so
// the rest of the program stays synchronous.
//
// Reference: tokio::signal documentation

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Exit status for a forced stop (128 + SIGINT).
const FORCED_EXIT_CODE: i32 = 130;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupt {
    /// Finish the current trial, then stop
    Graceful,
    /// Stop now
    Forced,
}

/// Record one interrupt on `flag` and decide what it means.
fn on_interrupt(flag: &AtomicBool) -> Interrupt {
    if flag.swap(true, Ordering::Relaxed) {
        Interrupt::Forced
    } else {
        Interrupt::Graceful
    }
}

/// Spawn the listener and return the flag it raises.
pub fn install_ctrl_c_flag() -> Arc<AtomicBool> {
    let flag     = Arc::new(AtomicBool::new(false));
    let listener = Arc::clone(&flag);

    let spawned = std::thread::Builder::new()
        .name("ctrl-c".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::warn!("Ctrl-C handler unavailable: {}", e);
                    return;
                }
            };

            runtime.block_on(async {
                while tokio::signal::ctrl_c().await.is_ok() {
                    match on_interrupt(&listener) {
                        Interrupt::Graceful => tracing::warn!(
                            "Interrupt received; stopping after the current trial (Ctrl-C again to exit now)"
                        ),
                        Interrupt::Forced => {
                            tracing::warn!("Second interrupt; exiting");
                            std::process::exit(FORCED_EXIT_CODE);
                        }
                    }
                }
            });
        });

    if let Err(e) = spawned {
        tracing::warn!("Could not spawn Ctrl-C listener: {}", e);
    }
    flag
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_interrupt_is_graceful_second_is_forced() {
        let flag = AtomicBool::new(false);
        assert_eq!(on_interrupt(&flag), Interrupt::Graceful);
        assert!(flag.load(Ordering::Relaxed));
        assert_eq!(on_interrupt(&flag), Interrupt::Forced);
        assert_eq!(on_interrupt(&flag), Interrupt::Forced);
    }
}
