//! Polling until a long-running operation settles.
//!
//! Mutating calls on long-lived infrastructure return an [`Action`](crate::Action)
//! that starts `in-progress` and eventually becomes `completed` or `errored`.
//! [`poll_until_terminal`] is the one loop that waits for that transition; the
//! caller chooses the cadence and the attempt budget through a [`PollStrategy`].

use crate::{Error, Result};
use std::future::Future;
use std::time::Duration;

/// A snapshot that may or may not be final.
pub trait Terminal {
    /// Returns `true` if no further state transition can occur.
    fn is_terminal(&self) -> bool;
}

/// How often to poll and when to give up.
///
/// `max_attempts` counts fetches, including the first one. At least one fetch is
/// always performed.
///
/// # Examples
///
/// ```
/// use ocean_client::PollStrategy;
/// use std::time::Duration;
///
/// // 2s, 2s, 2s... for up to 30 fetches
/// let fixed = PollStrategy::Fixed {
///     interval: Duration::from_secs(2),
///     max_attempts: 30,
/// };
///
/// // 1s, 2s, 4s, 8s, 8s... for up to 20 fetches
/// let backoff = PollStrategy::Backoff {
///     initial_interval: Duration::from_secs(1),
///     max_interval: Duration::from_secs(8),
///     max_attempts: 20,
/// };
///
/// assert_eq!(fixed.delay_after(1), Some(Duration::from_secs(2)));
/// assert_eq!(backoff.delay_after(3), Some(Duration::from_secs(4)));
/// assert_eq!(fixed.delay_after(30), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStrategy {
    /// Wait the same interval between fetches.
    Fixed {
        /// The delay between fetches.
        interval: Duration,
        /// The maximum number of fetches.
        max_attempts: usize,
    },

    /// Double the interval after every fetch, up to `max_interval`.
    Backoff {
        /// The delay after the first fetch.
        initial_interval: Duration,
        /// The largest delay between fetches.
        max_interval: Duration,
        /// The maximum number of fetches.
        max_attempts: usize,
    },
}

impl PollStrategy {
    /// Returns the delay to wait after the given fetch, or `None` once the
    /// attempt budget is spent.
    ///
    /// # Arguments
    ///
    /// * `attempt` - The number of fetches performed so far (1-indexed)
    pub fn delay_after(&self, attempt: usize) -> Option<Duration> {
        if attempt >= self.max_attempts() {
            return None;
        }

        match self {
            PollStrategy::Fixed { interval, .. } => Some(*interval),
            PollStrategy::Backoff {
                initial_interval,
                max_interval,
                ..
            } => {
                let multiplier = 2u64.saturating_pow(attempt.saturating_sub(1) as u32);
                let delay =
                    initial_interval.saturating_mul(multiplier.try_into().unwrap_or(u32::MAX));
                Some(delay.min(*max_interval))
            }
        }
    }

    /// Returns the maximum number of fetches.
    pub fn max_attempts(&self) -> usize {
        match self {
            PollStrategy::Fixed { max_attempts, .. } => *max_attempts,
            PollStrategy::Backoff { max_attempts, .. } => *max_attempts,
        }
    }
}

/// Calls `fetch` until it yields a terminal snapshot.
///
/// Both success and failure states count as terminal: an `errored` action ends
/// the loop with `Ok`, not with an error. Errors returned by `fetch` itself are
/// propagated immediately without another attempt.
///
/// # Errors
///
/// Returns the first error produced by `fetch`, or
/// [`Error::PollAttemptsExhausted`] if the strategy runs out of attempts.
///
/// # Examples
///
/// ```no_run
/// use ocean_client::{poll_until_terminal, ActionScope, Client, PollStrategy};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), ocean_client::Error> {
/// let client = Client::new("my-token")?;
/// let scope = ActionScope::Droplet(3164494);
/// let strategy = PollStrategy::Fixed {
///     interval: Duration::from_secs(5),
///     max_attempts: 60,
/// };
///
/// let actions = client.actions();
/// let action = poll_until_terminal(&strategy, || actions.get(&scope, 36804636)).await?;
/// println!("Action {} finished as {}", action.id, action.status);
/// # Ok(())
/// # }
/// ```
pub async fn poll_until_terminal<T, F, Fut>(strategy: &PollStrategy, mut fetch: F) -> Result<T>
where
    T: Terminal,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        let snapshot = fetch().await?;
        if snapshot.is_terminal() {
            tracing::debug!(attempt = attempt, "Polled resource reached a terminal state");
            return Ok(snapshot);
        }

        match strategy.delay_after(attempt) {
            Some(delay) => {
                tracing::debug!(
                    attempt = attempt,
                    delay_ms = delay.as_millis(),
                    "Polled resource still in progress"
                );
                tokio::time::sleep(delay).await;
            }
            None => return Err(Error::PollAttemptsExhausted { attempts: attempt }),
        }
    }
}
