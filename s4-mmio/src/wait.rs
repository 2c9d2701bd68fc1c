//! Wait-Until-Ready Polling
//!
//! Every hardware handshake in the boot path is "write a register, then spin
//! on a status bit". This module is the one place that spin lives.
//!
//! Firmware polls with [`PollLimit::Unbounded`]: if the hardware never
//! reports ready, the caller hangs there. Tests pass
//! [`PollLimit::Attempts`] so the same code path can be observed giving up.

use core::fmt;

/// How long a wait may poll before giving up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollLimit {
    /// Poll until the condition holds, however long that takes
    Unbounded,
    /// Evaluate the condition at most this many times
    Attempts(u32),
}

/// A bounded wait ran out of attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitTimeout {
    /// Number of times the condition was evaluated
    pub attempts: u32,
}

impl fmt::Display for WaitTimeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "condition not ready after {} polls", self.attempts)
    }
}

/// Spin until `ready` returns `true`.
///
/// Returns the number of polls it took (at least 1) or, for a bounded
/// limit, [`WaitTimeout`] once the attempts are used up. `Attempts(0)`
/// times out without evaluating the condition.
pub fn wait_until<F>(mut ready: F, limit: PollLimit) -> Result<u32, WaitTimeout>
where
    F: FnMut() -> bool,
{
    let mut polls: u32 = 0;
    loop {
        if let PollLimit::Attempts(max) = limit {
            if polls >= max {
                return Err(WaitTimeout { attempts: polls });
            }
        }
        polls = polls.saturating_add(1);
        if ready() {
            return Ok(polls);
        }
        // Hint to the CPU that we're spinning
        core::hint::spin_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn test_ready_immediately() {
        assert_eq!(wait_until(|| true, PollLimit::Unbounded), Ok(1));
        assert_eq!(wait_until(|| true, PollLimit::Attempts(1)), Ok(1));
    }

    #[test]
    fn test_ready_after_some_polls() {
        let count = Cell::new(0u32);
        let result = wait_until(
            || {
                count.set(count.get() + 1);
                count.get() == 5
            },
            PollLimit::Unbounded,
        );
        assert_eq!(result, Ok(5));
    }

    #[test]
    fn test_bounded_wait_gives_up() {
        let count = Cell::new(0u32);
        let result = wait_until(
            || {
                count.set(count.get() + 1);
                false
            },
            PollLimit::Attempts(100),
        );
        assert_eq!(result, Err(WaitTimeout { attempts: 100 }));
        assert_eq!(count.get(), 100);
    }

    #[test]
    fn test_zero_attempts_never_polls() {
        let count = Cell::new(0u32);
        let result = wait_until(
            || {
                count.set(count.get() + 1);
                true
            },
            PollLimit::Attempts(0),
        );
        assert_eq!(result, Err(WaitTimeout { attempts: 0 }));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_ready_on_last_attempt() {
        let count = Cell::new(0u32);
        let result = wait_until(
            || {
                count.set(count.get() + 1);
                count.get() == 3
            },
            PollLimit::Attempts(3),
        );
        assert_eq!(result, Ok(3));
    }
}
