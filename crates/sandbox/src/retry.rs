//! Bounded retries with exponential, jittered backoff
//!
//! Each attempt yields an explicit `Result`. Failures are classified and the
//! next step is decided by [`decide`], so the loop itself carries no policy.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use thiserror::Error;

use crate::classify::{classify, ClassifiedFailure, FailureClass};
use crate::CallFailure;

pub const MAX_ATTEMPTS: u32 = 3;
pub const BASE_DELAY: Duration = Duration::from_secs(1);
pub const MAX_JITTER: Duration = Duration::from_millis(500);

/// Delay before the attempt following `attempt` (1-based).
///
/// `BASE_DELAY * 2^(attempt-1) + uniform[0, MAX_JITTER)`
pub fn backoff_delay(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    let base = BASE_DELAY * 2u32.pow(exponent);
    let jitter = rand::thread_rng().gen_range(0.0..MAX_JITTER.as_secs_f64());
    base + Duration::from_secs_f64(jitter)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Retry(Duration),
    GiveUp,
}

/// Next step after `attempt` (1-based) failed with `class`
pub fn decide(class: FailureClass, attempt: u32) -> Decision {
    if class.is_retryable() && attempt < MAX_ATTEMPTS {
        Decision::Retry(backoff_delay(attempt))
    } else {
        Decision::GiveUp
    }
}

/// Failure surfaced once the executor stops trying
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{operation} failed after {attempts} attempt(s) [{class}]: {detail}")]
pub struct BackendFailure {
    pub operation: String,
    pub class: FailureClass,
    /// Original backend status, or 503 for connection failures
    pub status: Option<u16>,
    pub attempts: u32,
    /// True when a retryable class ran out of attempts
    pub retries_exhausted: bool,
    /// Backend's own error message from the final attempt, if it sent one
    pub message: Option<String>,
    pub detail: String,
}

impl BackendFailure {
    fn from_classified(operation: &str, attempts: u32, failure: ClassifiedFailure) -> Self {
        Self {
            operation: operation.to_string(),
            retries_exhausted: failure.class.is_retryable(),
            class: failure.class,
            status: failure.status,
            attempts,
            message: failure.message,
            detail: failure.detail,
        }
    }
}

/// Drives one backend operation through the retry policy.
///
/// Stateless; every `execute` call owns its own attempt counter, so one
/// executor is shared by all requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResilientExecutor;

impl ResilientExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Run `call` until it succeeds or the policy gives up.
    ///
    /// `call` receives the 1-based attempt index. Dropping the returned future
    /// abandons any pending wait or in-flight call.
    pub async fn execute<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, BackendFailure>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, CallFailure>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;

            let failure = match call(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(operation, attempt, "Backend call recovered after retry");
                    }
                    return Ok(value);
                }
                Err(failure) => classify(&failure),
            };

            match decide(failure.class, attempt) {
                Decision::Retry(delay) => {
                    tracing::warn!(
                        operation,
                        attempt,
                        class = %failure.class,
                        status = ?failure.status,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying backend call"
                    );
                    tokio::time::sleep(delay).await;
                }
                Decision::GiveUp => {
                    let failure = BackendFailure::from_classified(operation, attempt, failure);
                    if failure.retries_exhausted {
                        tracing::error!(
                            operation,
                            attempts = failure.attempts,
                            class = %failure.class,
                            status = ?failure.status,
                            error = %failure.detail,
                            "Backend call failed, retries exhausted"
                        );
                    } else {
                        tracing::warn!(
                            operation,
                            class = %failure.class,
                            status = ?failure.status,
                            error = %failure.detail,
                            "Backend call failed"
                        );
                    }
                    return Err(failure);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    fn status(code: u16) -> CallFailure {
        CallFailure::Status {
            status: code,
            message: format!("status {}", code),
        }
    }

    /// Replays `script` in order and records when each attempt started
    struct Scripted {
        script: Mutex<Vec<Result<&'static str, CallFailure>>>,
        started: Mutex<Vec<Instant>>,
    }

    impl Scripted {
        fn new(mut script: Vec<Result<&'static str, CallFailure>>) -> Arc<Self> {
            script.reverse();
            Arc::new(Self {
                script: Mutex::new(script),
                started: Mutex::new(Vec::new()),
            })
        }

        async fn run(self: Arc<Self>, _attempt: u32) -> Result<&'static str, CallFailure> {
            self.started.lock().unwrap().push(Instant::now());
            self.script
                .lock()
                .unwrap()
                .pop()
                .expect("script exhausted")
        }

        fn waits(&self) -> Vec<Duration> {
            let started = self.started.lock().unwrap();
            started.windows(2).map(|w| w[1] - w[0]).collect()
        }

        fn attempts(&self) -> usize {
            self.started.lock().unwrap().len()
        }
    }

    async fn execute(script: &Arc<Scripted>) -> Result<&'static str, BackendFailure> {
        ResilientExecutor::new()
            .execute("test_operation", |attempt| script.clone().run(attempt))
            .await
    }

    #[test]
    fn test_backoff_delay_bounds() {
        for _ in 0..200 {
            let first = backoff_delay(1);
            assert!(first >= Duration::from_secs(1) && first < Duration::from_millis(1500));
            let second = backoff_delay(2);
            assert!(second >= Duration::from_secs(2) && second < Duration::from_millis(2500));
        }
    }

    #[test]
    fn test_decide() {
        assert!(matches!(decide(FailureClass::ServerFault, 1), Decision::Retry(_)));
        assert!(matches!(decide(FailureClass::RateLimited, 2), Decision::Retry(_)));
        assert!(matches!(decide(FailureClass::Transient, 2), Decision::Retry(_)));
        assert_eq!(decide(FailureClass::ServerFault, 3), Decision::GiveUp);
        assert_eq!(decide(FailureClass::ClientFault, 1), Decision::GiveUp);
        assert_eq!(decide(FailureClass::Unclassified, 1), Decision::GiveUp);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_on_third_attempt() {
        let script = Scripted::new(vec![Err(status(503)), Err(status(503)), Ok("done")]);

        let result = execute(&script).await.unwrap();
        assert_eq!(result, "done");
        assert_eq!(script.attempts(), 3);

        let waits = script.waits();
        assert_eq!(waits.len(), 2);
        assert!(waits[0] >= Duration::from_secs(1) && waits[0] < Duration::from_millis(1500));
        assert!(waits[1] >= Duration::from_secs(2) && waits[1] < Duration::from_millis(2500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_server_fault_keeps_status() {
        let script = Scripted::new(vec![Err(status(503)), Err(status(503)), Err(status(503))]);

        let err = execute(&script).await.unwrap_err();
        assert_eq!(err.class, FailureClass::ServerFault);
        assert_eq!(err.status, Some(503));
        assert_eq!(err.attempts, 3);
        assert!(err.retries_exhausted);
        assert_eq!(err.operation, "test_operation");
        assert_eq!(script.attempts(), 3);
        assert_eq!(script.waits().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_fault_fails_immediately() {
        let script = Scripted::new(vec![Err(status(404))]);
        let before = Instant::now();

        let err = execute(&script).await.unwrap_err();
        assert_eq!(err.class, FailureClass::ClientFault);
        assert_eq!(err.status, Some(404));
        assert_eq!(err.attempts, 1);
        assert!(!err.retries_exhausted);
        assert_eq!(script.attempts(), 1);
        assert_eq!(Instant::now() - before, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_response_is_not_retried() {
        let script = Scripted::new(vec![Err(CallFailure::Malformed("not json".to_string()))]);

        let err = execute(&script).await.unwrap_err();
        assert_eq!(err.class, FailureClass::Unclassified);
        assert_eq!(err.status, None);
        assert_eq!(script.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connection_failure_retried_then_reported_as_503() {
        let script = Scripted::new(vec![
            Err(CallFailure::Connection("refused".to_string())),
            Err(status(429)),
            Err(CallFailure::Connection("refused".to_string())),
        ]);

        let err = execute(&script).await.unwrap_err();
        assert_eq!(err.class, FailureClass::Transient);
        assert_eq!(err.status, Some(503));
        assert_eq!(err.attempts, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_stops_at_first_terminal_failure() {
        let script = Scripted::new(vec![Err(status(502)), Err(status(400))]);

        let err = execute(&script).await.unwrap_err();
        assert_eq!(err.class, FailureClass::ClientFault);
        assert_eq!(err.status, Some(400));
        assert_eq!(err.attempts, 2);
        assert_eq!(script.waits().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_index_is_one_based() {
        let seen = Mutex::new(Vec::new());
        let result: Result<(), BackendFailure> = ResilientExecutor::new()
            .execute("indexed", |attempt| {
                seen.lock().unwrap().push(attempt);
                async move {
                    if attempt < 3 {
                        Err(status(500))
                    } else {
                        Ok(())
                    }
                }
            })
            .await;

        assert!(result.is_ok());
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }
}
