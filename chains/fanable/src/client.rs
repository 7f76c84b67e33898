//! HTTP transport for the rewards API: one `reqwest` client per iteration,
//! optionally routed through a forward proxy, plus tagged reply parsing.

use crate::config::FanableConfig;
use core_logic::NetworkError;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Proxy, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

pub const SIGNATURE_PATH: &str = "/wallet/signature";
pub const REFERRAL_PATH: &str = "/wallet/referral";
pub const SOCIAL_PATH: &str = "/wallet/social";
pub const WALLET_PATH: &str = "/wallet";

const MAX_RAW_BODY_CHARS: usize = 200;

/// Header set the service expects from its own web front end.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(
        header::ACCEPT_ENCODING,
        HeaderValue::from_static("gzip, deflate, br, zstd"),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::ORIGIN,
        HeaderValue::from_static("https://points.fanable.io"),
    );
    headers.insert(
        header::REFERER,
        HeaderValue::from_static("https://points.fanable.io/"),
    );
    headers.insert(
        "sec-ch-ua",
        HeaderValue::from_static(
            "\"Microsoft Edge\";v=\"141\", \"Not?A_Brand\";v=\"8\", \"Chromium\";v=\"141\"",
        ),
    );
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
    headers.insert("sec-ch-ua-platform", HeaderValue::from_static("\"Windows\""));
    headers.insert("sec-fetch-dest", HeaderValue::from_static("empty"));
    headers.insert("sec-fetch-mode", HeaderValue::from_static("cors"));
    headers.insert("sec-fetch-site", HeaderValue::from_static("cross-site"));
    headers.insert(
        header::USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/141.0.0.0 Safari/537.36 Edg/141.0.0.0",
        ),
    );
    headers
}

pub struct FanableClient {
    http: Client,
    base_url: String,
    timeout_ms: u64,
    proxy: Option<String>,
}

impl FanableClient {
    pub fn new(config: &FanableConfig, proxy: Option<&str>) -> Result<Self, NetworkError> {
        let mut builder = Client::builder().timeout(config.request_timeout());

        builder = match proxy {
            Some(url) => builder.proxy(Proxy::all(url).map_err(|e| {
                NetworkError::InvalidProxy {
                    proxy: url.to_string(),
                    reason: e.to_string(),
                }
            })?),
            None => builder.no_proxy(),
        };

        let http = builder.build().map_err(|e| NetworkError::ClientBuild {
            reason: e.to_string(),
        })?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            timeout_ms: config.request_timeout_ms,
            proxy: proxy.map(str::to_string),
        })
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POSTs `body` as JSON with the browser header set.
    pub async fn post<B, T>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<ApiReply<T>, NetworkError>
    where
        B: Serialize + ?Sized,
        T: Reply,
    {
        let mut request = self
            .http
            .request(Method::POST, self.url(path))
            .headers(browser_headers())
            .json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        self.send(path, request).await
    }

    /// GETs `path` with only `accept: application/json` and the bearer token.
    pub async fn get<T: Reply>(
        &self,
        path: &str,
        bearer: Option<&str>,
    ) -> Result<ApiReply<T>, NetworkError> {
        let mut request = self
            .http
            .request(Method::GET, self.url(path))
            .header(header::ACCEPT, "application/json");
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        self.send(path, request).await
    }

    async fn send<T: Reply>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<ApiReply<T>, NetworkError> {
        let transport_err = |e: reqwest::Error| {
            if e.is_timeout() {
                NetworkError::Timeout {
                    timeout_ms: self.timeout_ms,
                    endpoint: endpoint.to_string(),
                }
            } else {
                NetworkError::Transport {
                    endpoint: endpoint.to_string(),
                    reason: e.to_string(),
                }
            }
        };

        let response = request.send().await.map_err(transport_err)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_err)?;
        debug!("{} -> HTTP {} ({} bytes)", endpoint, status, body.len());

        Ok(ApiReply::parse(status, &body))
    }
}

/// Payload types an endpoint can answer with.
pub trait Reply: DeserializeOwned {
    /// Whether a JSON body received with `status` carries this payload.
    fn accepts(status: StatusCode, _body: &Value) -> bool {
        status.is_success()
    }

    fn summary(&self) -> String;
}

/// Structured outcome of one API call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply<T> {
    Ok(T),
    Rejected {
        status: u16,
        code: Option<String>,
        message: Option<String>,
    },
    Malformed {
        status: u16,
        raw: String,
    },
}

impl<T: Reply> ApiReply<T> {
    pub fn parse(status: StatusCode, body: &str) -> Self {
        let value: Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(_) => {
                return ApiReply::Malformed {
                    status: status.as_u16(),
                    raw: truncate(body),
                }
            }
        };

        if T::accepts(status, &value) {
            return match serde_json::from_value::<T>(value) {
                Ok(payload) => ApiReply::Ok(payload),
                Err(_) => ApiReply::Malformed {
                    status: status.as_u16(),
                    raw: truncate(body),
                },
            };
        }

        ApiReply::Rejected {
            status: status.as_u16(),
            code: string_field(&value, "code"),
            message: string_field(&value, "message").or_else(|| string_field(&value, "error")),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            ApiReply::Ok(payload) => payload.summary(),
            ApiReply::Rejected {
                status,
                code,
                message,
            } => match (code, message) {
                (Some(code), Some(message)) => format!("{}: {}", code, message),
                (None, Some(message)) => message.clone(),
                (Some(code), None) => code.clone(),
                (None, None) => format!("HTTP {}", status),
            },
            ApiReply::Malformed { status, raw } => {
                format!("non-JSON response (HTTP {}): {}", status, raw)
            }
        }
    }
}

impl<T> ApiReply<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, ApiReply::Ok(_))
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn truncate(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_RAW_BODY_CHARS {
        return trimmed.to_string();
    }
    let head: String = trimmed.chars().take(MAX_RAW_BODY_CHARS).collect();
    format!("{}...", head)
}

/// Renders a loosely typed JSON value without quotes around strings.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Signature endpoint answer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionGrant {
    pub token: String,
}

impl Reply for SessionGrant {
    fn accepts(_status: StatusCode, body: &Value) -> bool {
        body.get("token")
            .and_then(Value::as_str)
            .is_some_and(|token| !token.is_empty())
    }

    fn summary(&self) -> String {
        "token issued".to_string()
    }
}

/// Referral and social-task answer. The service's shape varies by task.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TaskAck {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub success: Option<Value>,
    #[serde(default)]
    pub points: Option<Value>,
}

impl Reply for TaskAck {
    fn summary(&self) -> String {
        if let Some(message) = &self.message {
            return display_value(message);
        }
        if let Some(error) = &self.error {
            return display_value(error);
        }
        if let Some(status) = &self.status {
            return format!("status: {}", display_value(status));
        }
        if let Some(success) = &self.success {
            return format!("success: {}", display_value(success));
        }
        if let Some(points) = &self.points {
            return format!("points earned: {}", display_value(points));
        }
        "done".to_string()
    }
}

/// Wallet-details answer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WalletDetails {
    #[serde(default)]
    pub points: Option<Value>,
    #[serde(default, rename = "referralCount")]
    pub referral_count: Option<Value>,
}

impl Reply for WalletDetails {
    fn summary(&self) -> String {
        let unknown = || "unknown".to_string();
        format!(
            "points: {}, referrals: {}",
            self.points.as_ref().map(display_value).unwrap_or_else(unknown),
            self.referral_count
                .as_ref()
                .map(display_value)
                .unwrap_or_else(unknown)
        )
    }
}
