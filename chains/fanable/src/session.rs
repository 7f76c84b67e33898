//! Exchanges a signed, timestamped challenge for a bearer token.
//!
//! The service only accepts timestamps close to its own clock. A stale
//! timestamp rejection is retried with a fresh timestamp and signature;
//! every other rejection ends the attempt immediately.

use crate::client::{ApiReply, FanableClient, SessionGrant, SIGNATURE_PATH};
use crate::config::FanableConfig;
use crate::wallet::sign_message;
use core_logic::{with_retry_when, AuthError, RetryError, TASK_RESULT};
use serde::Serialize;
use std::fmt;
use tracing::info;

pub const SIGN_MESSAGE_PREFIX: &str = "Fanable Rewards ";
pub const INVALID_TIMESTAMP_CODE: &str = "INVALID_TIMESTAMP";

/// Bearer token valid for the rest of one iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
}

#[derive(Debug, Serialize)]
struct SignedChallenge {
    signature: String,
    timestamp: i64,
    address: String,
}

#[derive(Debug)]
enum AttemptError {
    StaleTimestamp,
    Fatal(AuthError),
}

impl AttemptError {
    fn is_stale_timestamp(&self) -> bool {
        matches!(self, AttemptError::StaleTimestamp)
    }
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::StaleTimestamp => write!(f, "invalid timestamp"),
            AttemptError::Fatal(e) => write!(f, "{}", e),
        }
    }
}

pub fn is_timestamp_rejection(code: Option<&str>, message: Option<&str>) -> bool {
    code == Some(INVALID_TIMESTAMP_CODE)
        || message.is_some_and(|m| m.to_lowercase().contains("timestamp"))
}

/// Wall-clock milliseconds, bumped past `previous` so attempts never reuse one.
fn next_timestamp(previous: i64) -> i64 {
    chrono::Utc::now().timestamp_millis().max(previous + 1)
}

pub struct SessionAcquirer<'a> {
    client: &'a FanableClient,
    config: &'a FanableConfig,
}

impl<'a> SessionAcquirer<'a> {
    pub fn new(client: &'a FanableClient, config: &'a FanableConfig) -> Self {
        Self { client, config }
    }

    pub async fn acquire(&self, address: &str, private_key: &str) -> Result<Session, AuthError> {
        let client = self.client;
        let address = address.to_lowercase();
        let mut last_timestamp = 0;

        let outcome = with_retry_when(
            self.config.timestamp_retry_policy(),
            "Signature",
            |attempt| {
                last_timestamp = next_timestamp(last_timestamp);
                let timestamp = last_timestamp;
                let signed = sign_message(private_key, &format!("{}{}", SIGN_MESSAGE_PREFIX, timestamp));
                let address = address.clone();

                async move {
                    if attempt > 1 {
                        info!(target: TASK_RESULT, "  Retrying signature... (attempt {})", attempt);
                    }

                    let challenge = SignedChallenge {
                        signature: signed.map_err(|e| AttemptError::Fatal(e.into()))?,
                        timestamp,
                        address,
                    };

                    let reply = client
                        .post::<_, SessionGrant>(SIGNATURE_PATH, &challenge, None)
                        .await
                        .map_err(|e| AttemptError::Fatal(e.into()))?;

                    classify(reply)
                }
            },
            AttemptError::is_stale_timestamp,
        )
        .await;

        match outcome {
            Ok(session) => Ok(session),
            Err(RetryError::Exhausted { attempts, .. }) => Err(AuthError::MaxRetries { attempts }),
            Err(RetryError::Aborted(AttemptError::Fatal(e))) => Err(e),
            Err(RetryError::Aborted(AttemptError::StaleTimestamp)) => Err(AuthError::MaxRetries {
                attempts: self.config.max_timestamp_retries,
            }),
        }
    }
}

fn classify(reply: ApiReply<SessionGrant>) -> Result<Session, AttemptError> {
    let summary = reply.summary();
    match reply {
        ApiReply::Ok(grant) => Ok(Session { token: grant.token }),
        ApiReply::Rejected { code, message, .. } => {
            if is_timestamp_rejection(code.as_deref(), message.as_deref()) {
                return Err(AttemptError::StaleTimestamp);
            }
            Err(AttemptError::Fatal(AuthError::Rejected {
                code,
                message: summary,
            }))
        }
        ApiReply::Malformed { raw, .. } => {
            Err(AttemptError::Fatal(AuthError::Malformed { body: raw }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_rejection_by_code() {
        assert!(is_timestamp_rejection(Some("INVALID_TIMESTAMP"), None));
        assert!(!is_timestamp_rejection(Some("INVALID_SIGNATURE"), None));
    }

    #[test]
    fn test_timestamp_rejection_by_message() {
        assert!(is_timestamp_rejection(None, Some("Timestamp is too old")));
        assert!(is_timestamp_rejection(Some("BAD_REQUEST"), Some("bad TIMESTAMP")));
        assert!(!is_timestamp_rejection(None, Some("Rate limit exceeded")));
        assert!(!is_timestamp_rejection(None, None));
    }

    #[test]
    fn test_next_timestamp_strictly_increases() {
        let far_future = chrono::Utc::now().timestamp_millis() + 60_000;
        assert_eq!(next_timestamp(far_future), far_future + 1);

        let now = next_timestamp(0);
        assert!(next_timestamp(now) > now);
    }

    #[test]
    fn test_classify_other_rejection_is_fatal() {
        let reply = ApiReply::Rejected {
            status: 401,
            code: Some("INVALID_SIGNATURE".to_string()),
            message: Some("Signature mismatch".to_string()),
        };
        match classify(reply) {
            Err(AttemptError::Fatal(AuthError::Rejected { code, message })) => {
                assert_eq!(code.as_deref(), Some("INVALID_SIGNATURE"));
                assert_eq!(message, "INVALID_SIGNATURE: Signature mismatch");
            }
            other => panic!("Expected fatal rejection, got {:?}", other),
        }
    }
}
