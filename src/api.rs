// API client module: a small blocking HTTP client that talks to the
// referral backend. Screens only see the `Backend` trait so the flow can
// run against an in-memory backend in tests.

use crate::config::Config;
use crate::error::ApiError;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Login request payload: the phone number as the user typed it. The
/// server strips everything but digits.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub phone: String,
}

/// Successful login: the normalized phone and the one-time code.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub phone: String,
    pub code: String,
}

/// Verification payload. `code` is the one echoed back by the login
/// response, `verify` is what the user typed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VerifyRequest {
    pub phone: String,
    pub code: String,
    pub verify: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VerifyResponse {
    pub token: String,
    #[serde(default)]
    pub message: String,
}

/// Referral data of the signed-in user.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferralData {
    /// The user's own referral code.
    #[serde(rename = "ref")]
    pub own_code: String,
    /// Code of the inviter, empty until one is registered.
    #[serde(default)]
    pub invited: String,
    /// Phone numbers of the users registered with `own_code`.
    #[serde(default)]
    pub users: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegisterReferralRequest {
    pub ref_code: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegisterReferralResponse {
    pub invited: String,
    #[serde(default)]
    pub message: String,
}

/// Error body returned on non-2xx answers. Business errors carry
/// `message`; authentication failures carry `detail`.
#[derive(Deserialize, Debug, Default)]
struct ErrorBody {
    message: Option<String>,
    detail: Option<String>,
}

/// Operations the backend exposes.
pub trait Backend {
    fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError>;
    fn verify(&self, req: &VerifyRequest) -> Result<VerifyResponse, ApiError>;
    fn fetch_referrals(&self, token: &str) -> Result<ReferralData, ApiError>;
    fn register_referral(
        &self,
        token: &str,
        req: &RegisterReferralRequest,
    ) -> Result<RegisterReferralResponse, ApiError>;
}

/// Blocking API client holding a reqwest client and the backend base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `config.api_url` with the configured timeout.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Transport)?;
        Ok(Self::with_client(client, &config.api_url))
    }

    fn with_client(client: Client, base_url: &str) -> Self {
        ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.base_url, path)
    }

    fn authorized(&self, req: RequestBuilder, token: &str) -> RequestBuilder {
        req.header(AUTHORIZATION, format!("Token {}", token))
    }

    fn send<T: DeserializeOwned>(&self, name: &str, req: RequestBuilder) -> Result<T, ApiError> {
        debug!(endpoint = name, "sending request");
        let res = req.send().map_err(|e| {
            warn!(endpoint = name, error = %e, "request failed");
            ApiError::Transport(e)
        })?;
        read_response(name, res)
    }
}

impl Backend for ApiClient {
    fn login(&self, req: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let builder = self.client.post(self.url("login")).json(req);
        self.send("login", builder)
    }

    fn verify(&self, req: &VerifyRequest) -> Result<VerifyResponse, ApiError> {
        let builder = self.client.post(self.url("verify")).json(req);
        self.send("verify", builder)
    }

    fn fetch_referrals(&self, token: &str) -> Result<ReferralData, ApiError> {
        let builder = self.authorized(self.client.get(self.url("data")), token);
        self.send("data", builder)
    }

    fn register_referral(
        &self,
        token: &str,
        req: &RegisterReferralRequest,
    ) -> Result<RegisterReferralResponse, ApiError> {
        let builder = self.authorized(self.client.post(self.url("data")), token).json(req);
        self.send("data", builder)
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/api/{}/", base_url.trim_end_matches('/'), path)
}

fn read_response<T: DeserializeOwned>(name: &str, res: Response) -> Result<T, ApiError> {
    let status = res.status();
    if !status.is_success() {
        // The body may be missing or not JSON at all; never fault on it.
        let body = res.text().unwrap_or_default();
        let err = error_from_body(status.as_u16(), &body);
        debug!(endpoint = name, status = status.as_u16(), "request rejected");
        return Err(err);
    }
    res.json::<T>().map_err(|e| {
        warn!(endpoint = name, error = %e, "response did not match the contract");
        ApiError::Decode(e.to_string())
    })
}

/// Turn a non-2xx status and its raw body into an `ApiError`.
pub(crate) fn error_from_body(status: u16, body: &str) -> ApiError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.detail)
        .filter(|m| !m.trim().is_empty());
    if status == 401 {
        ApiError::Unauthorized {
            message: message.unwrap_or_else(|| "Your session is no longer valid.".into()),
        }
    } else {
        ApiError::Rejected {
            status,
            message: message.unwrap_or_else(|| format!("Request failed with status {}.", status)),
        }
    }
}
