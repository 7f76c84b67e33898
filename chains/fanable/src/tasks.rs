//! Referral, social-task and wallet-details calls made with one session token.
//! Each call is isolated: a failure is reported and the next call still runs.

use crate::client::{
    ApiReply, FanableClient, Reply, TaskAck, WalletDetails, REFERRAL_PATH, SOCIAL_PATH,
    WALLET_PATH,
};
use crate::config::FanableConfig;
use core_logic::{NetworkError, TaskResult, TASK_RESULT};
use serde::Serialize;
use std::fmt;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SocialTask {
    TwitterFollow,
    FacebookFollow,
    InstagramFollow,
    /// Spelled the way the service spells it.
    #[serde(rename = "DISCROD_JOIN")]
    DiscordJoin,
    YoutubeSubscribe,
}

impl SocialTask {
    /// Submission order.
    pub const ALL: [SocialTask; 5] = [
        SocialTask::TwitterFollow,
        SocialTask::FacebookFollow,
        SocialTask::InstagramFollow,
        SocialTask::DiscordJoin,
        SocialTask::YoutubeSubscribe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SocialTask::TwitterFollow => "TWITTER_FOLLOW",
            SocialTask::FacebookFollow => "FACEBOOK_FOLLOW",
            SocialTask::InstagramFollow => "INSTAGRAM_FOLLOW",
            SocialTask::DiscordJoin => "DISCROD_JOIN",
            SocialTask::YoutubeSubscribe => "YOUTUBE_SUBSCRIBE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SocialTask::TwitterFollow => "Twitter follow",
            SocialTask::FacebookFollow => "Facebook follow",
            SocialTask::InstagramFollow => "Instagram follow",
            SocialTask::DiscordJoin => "Discord join",
            SocialTask::YoutubeSubscribe => "YouTube subscribe",
        }
    }
}

impl fmt::Display for SocialTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReferralRequest<'a> {
    referral_code: &'a str,
}

#[derive(Debug, Serialize)]
struct SocialTaskRequest<'a> {
    address: &'a str,
    #[serde(rename = "type")]
    task: SocialTask,
}

/// Per-call outcomes of one iteration's task sequence.
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub referral: TaskResult,
    pub social: Vec<(SocialTask, TaskResult)>,
    pub details: TaskResult,
    pub wallet: Option<WalletDetails>,
}

impl TaskReport {
    pub fn succeeded(&self) -> usize {
        let social = self.social.iter().filter(|(_, r)| r.success).count();
        social + usize::from(self.referral.success) + usize::from(self.details.success)
    }

    pub fn calls(&self) -> usize {
        self.social.len() + 2
    }
}

pub fn to_task_result<T: Reply>(outcome: &Result<ApiReply<T>, NetworkError>) -> TaskResult {
    match outcome {
        Ok(reply @ ApiReply::Ok(_)) => TaskResult::ok(reply.summary()),
        Ok(reply) => TaskResult::failed(reply.summary()),
        Err(e) => TaskResult::failed(e.to_string()),
    }
}

pub struct TaskExecutor<'a> {
    client: &'a FanableClient,
    config: &'a FanableConfig,
}

impl<'a> TaskExecutor<'a> {
    pub fn new(client: &'a FanableClient, config: &'a FanableConfig) -> Self {
        Self { client, config }
    }

    pub async fn submit_referral(
        &self,
        token: &str,
        referral_code: &str,
    ) -> Result<ApiReply<TaskAck>, NetworkError> {
        self.client
            .post(REFERRAL_PATH, &ReferralRequest { referral_code }, Some(token))
            .await
    }

    pub async fn submit_social_task(
        &self,
        token: &str,
        address: &str,
        task: SocialTask,
    ) -> Result<ApiReply<TaskAck>, NetworkError> {
        let request = SocialTaskRequest { address, task };
        self.client.post(SOCIAL_PATH, &request, Some(token)).await
    }

    pub async fn fetch_details(
        &self,
        token: &str,
        address: &str,
    ) -> Result<ApiReply<WalletDetails>, NetworkError> {
        self.client
            .get(&format!("{}/{}", WALLET_PATH, address), Some(token))
            .await
    }

    /// Referral, then every social task in order with pacing, then details.
    pub async fn run_all(&self, token: &str, address: &str, referral_code: &str) -> TaskReport {
        let address = address.to_lowercase();

        info!(target: TASK_RESULT, "Sending referral code: {}", referral_code);
        let referral = to_task_result(&self.submit_referral(token, referral_code).await);
        log_result("Referral", &referral);

        info!(target: TASK_RESULT, "📱 Starting social tasks");
        let mut social = Vec::with_capacity(SocialTask::ALL.len());
        for (i, task) in SocialTask::ALL.into_iter().enumerate() {
            let result = to_task_result(&self.submit_social_task(token, &address, task).await);
            log_result(
                &format!("   [{}/{}] {}", i + 1, SocialTask::ALL.len(), task.label()),
                &result,
            );
            social.push((task, result));

            tokio::time::sleep(self.config.social_task_delay()).await;
        }

        info!(target: TASK_RESULT, "Fetching wallet details...");
        let details_outcome = self.fetch_details(token, &address).await;
        let details = to_task_result(&details_outcome);
        log_result("Wallet details", &details);

        let wallet = match details_outcome {
            Ok(ApiReply::Ok(wallet)) => Some(wallet),
            _ => None,
        };

        TaskReport {
            referral,
            social,
            details,
            wallet,
        }
    }
}

fn log_result(label: &str, result: &TaskResult) {
    if result.success {
        info!(target: TASK_RESULT, "{} {}", label, result);
    } else {
        error!("{} {}", label, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_social_task_wire_names() {
        let names: Vec<String> = SocialTask::ALL
            .iter()
            .map(|t| serde_json::to_value(t).unwrap().as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "TWITTER_FOLLOW",
                "FACEBOOK_FOLLOW",
                "INSTAGRAM_FOLLOW",
                "DISCROD_JOIN",
                "YOUTUBE_SUBSCRIBE"
            ]
        );
        for task in SocialTask::ALL {
            assert_eq!(serde_json::to_value(task).unwrap(), json!(task.as_str()));
        }
    }

    #[test]
    fn test_request_bodies() {
        let referral = serde_json::to_value(ReferralRequest {
            referral_code: "ABC",
        })
        .unwrap();
        assert_eq!(referral, json!({"referralCode": "ABC"}));

        let social = serde_json::to_value(SocialTaskRequest {
            address: "0xabc",
            task: SocialTask::DiscordJoin,
        })
        .unwrap();
        assert_eq!(social, json!({"address": "0xabc", "type": "DISCROD_JOIN"}));
    }

    #[test]
    fn test_to_task_result_variants() {
        let ok: Result<ApiReply<TaskAck>, NetworkError> = Ok(ApiReply::Ok(TaskAck::default()));
        assert_eq!(to_task_result(&ok), TaskResult::ok("done"));

        let rejected: Result<ApiReply<TaskAck>, NetworkError> = Ok(ApiReply::Rejected {
            status: 401,
            code: None,
            message: Some("Unauthorized".to_string()),
        });
        assert_eq!(to_task_result(&rejected), TaskResult::failed("Unauthorized"));

        let transport: Result<ApiReply<TaskAck>, NetworkError> = Err(NetworkError::Timeout {
            timeout_ms: 30_000,
            endpoint: SOCIAL_PATH.to_string(),
        });
        assert!(!to_task_result(&transport).success);
    }
}
