// viewsmith-core/src/infrastructure/adapters/polling.rs

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::infrastructure::error::EngineError;

/// Engine-agnostic view of an asynchronous query's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl fmt::Display for QueryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Queued => "QUEUED",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub state: QueryState,
    /// Engine-provided reason for the state, passed through untouched.
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Polls `fetch` until the query reaches a terminal state or `policy.timeout` elapses.
///
/// A timeout leaves the query running server-side: the outcome is reported as unknown.
pub async fn wait_for_completion<F, Fut>(
    query_execution_id: &str,
    policy: &PollPolicy,
    mut fetch: F,
) -> Result<(), EngineError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<StatusSnapshot, EngineError>>,
{
    let start = Instant::now();
    loop {
        let snapshot = fetch().await?;
        match snapshot.state {
            QueryState::Succeeded => return Ok(()),
            QueryState::Failed | QueryState::Cancelled => {
                return Err(EngineError::Execution {
                    query_execution_id: query_execution_id.to_string(),
                    state: snapshot.state.to_string(),
                    message: snapshot
                        .reason
                        .unwrap_or_else(|| "Unknown error".to_string()),
                });
            }
            QueryState::Queued | QueryState::Running => {}
        }

        let elapsed = start.elapsed();
        if elapsed >= policy.timeout {
            return Err(EngineError::Timeout {
                query_execution_id: query_execution_id.to_string(),
                elapsed,
            });
        }

        debug!(
            query_execution_id,
            state = %snapshot.state,
            "Query still in progress, waiting"
        );
        tokio::time::sleep(policy.interval.min(policy.timeout - elapsed)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    fn fast() -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(1),
            timeout: Duration::from_secs(5),
        }
    }

    fn script(states: Vec<StatusSnapshot>) -> Arc<Mutex<VecDeque<StatusSnapshot>>> {
        Arc::new(Mutex::new(states.into()))
    }

    fn snap(state: QueryState, reason: Option<&str>) -> StatusSnapshot {
        StatusSnapshot {
            state,
            reason: reason.map(String::from),
        }
    }

    async fn run(
        states: Arc<Mutex<VecDeque<StatusSnapshot>>>,
        policy: PollPolicy,
    ) -> Result<(), EngineError> {
        wait_for_completion("q-1", &policy, || {
            let states = states.clone();
            async move {
                let mut guard = states
                    .lock()
                    .map_err(|_| EngineError::Sdk("poisoned".into()))?;
                // Once the script runs out, the query just keeps running.
                Ok(guard
                    .pop_front()
                    .unwrap_or_else(|| snap(QueryState::Running, None)))
            }
        })
        .await
    }

    #[tokio::test]
    async fn test_succeeds_after_running() {
        let states = script(vec![
            snap(QueryState::Queued, None),
            snap(QueryState::Running, None),
            snap(QueryState::Succeeded, None),
        ]);
        assert!(run(states.clone(), fast()).await.is_ok());
        assert!(states.lock().map(|s| s.is_empty()).unwrap_or(false));
    }

    #[tokio::test]
    async fn test_failure_reason_is_verbatim() {
        let reason = "COLUMN_NOT_FOUND: line 1:80: Column 'tenant' cannot be resolved";
        let states = script(vec![
            snap(QueryState::Running, None),
            snap(QueryState::Failed, Some(reason)),
        ]);
        match run(states, fast()).await {
            Err(EngineError::Execution {
                query_execution_id,
                state,
                message,
            }) => {
                assert_eq!(query_execution_id, "q-1");
                assert_eq!(state, "FAILED");
                assert_eq!(message, reason);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancelled_without_reason() {
        let states = script(vec![snap(QueryState::Cancelled, None)]);
        match run(states, fast()).await {
            Err(EngineError::Execution { state, message, .. }) => {
                assert_eq!(state, "CANCELLED");
                assert_eq!(message, "Unknown error");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_times_out_when_never_terminal() {
        let policy = PollPolicy {
            interval: Duration::from_millis(2),
            timeout: Duration::from_millis(20),
        };
        let result = run(script(vec![]), policy).await;
        assert!(matches!(
            result,
            Err(EngineError::Timeout { ref query_execution_id, .. }) if query_execution_id == "q-1"
        ));
    }
}
