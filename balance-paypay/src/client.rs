//! PayPay mobile API client
//!
//! Speaks to the same backend the iOS app uses. Every request carries the
//! device headers the app sends; authenticated calls add a bearer token.

use async_trait::async_trait;
use balance_core::{BalanceError, BalanceResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::Rng;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::api::PayPayApi;
use crate::config::PayPayConfig;
use crate::types::{
    ApiResponse, AuthorizationPayload, BalanceInfoPayload, BalanceSnapshot, HistoryPayload,
    ParPayload, PayPayCredentials, ResponseHeader, TokenPayload, APP_API_BASE, CLIENT_ID,
    DEFAULT_APP_VERSION, IOS_VERSION, REDIRECT_URI, WEB_API_BASE,
};

/// App Store page of the PayPay iOS app, used to learn the current version
const APP_STORE_URL: &str =
    "https://apps.apple.com/jp/app/paypay-%E3%83%9A%E3%82%A4%E3%83%9A%E3%82%A4/id1435783608";

/// Language parameter every BFF call carries
const PAYPAY_LANG: (&str, &str) = ("payPayLang", "ja");

/// PayPay mobile API client
pub struct PayPayClient {
    client: Client,
    device_uuid: String,
    client_uuid: String,
    app_version: String,
    access_token: Option<String>,
    refresh_token: Option<String>,
    code_verifier: Option<String>,
}

impl PayPayClient {
    /// Create a client with freshly generated device and client ids
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .cookie_store(true)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            device_uuid: uuid::Uuid::new_v4().to_string().to_uppercase(),
            client_uuid: uuid::Uuid::new_v4().to_string().to_uppercase(),
            app_version: DEFAULT_APP_VERSION.to_string(),
            access_token: None,
            refresh_token: None,
            code_verifier: None,
        }
    }

    /// Create a client that reuses previously issued tokens and device ids
    pub fn from_config(config: &PayPayConfig) -> Self {
        let mut client = Self::new().with_access_token(config.access_token.clone());
        if let Some(device_uuid) = &config.device_uuid {
            client.device_uuid = device_uuid.clone();
        }
        if let Some(client_uuid) = &config.client_uuid {
            client.client_uuid = client_uuid.clone();
        }
        client.refresh_token = Some(config.refresh_token.clone());
        client
    }

    /// Use an existing access token instead of logging in
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    pub fn device_uuid(&self) -> &str {
        &self.device_uuid
    }

    pub fn client_uuid(&self) -> &str {
        &self.client_uuid
    }

    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    /// Check if the client holds an access token
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Look up the current iOS app version on the App Store
    ///
    /// PayPay rejects clients that report a stale version. On failure the
    /// built-in default stays in place.
    #[instrument(skip(self))]
    pub async fn detect_app_version(&mut self) -> BalanceResult<&str> {
        let response = self
            .client
            .get(APP_STORE_URL)
            .send()
            .await
            .map_err(|e| BalanceError::network(format!("Failed to fetch App Store page: {}", e)))?;

        let page = response
            .text()
            .await
            .map_err(|e| BalanceError::network(format!("Failed to read App Store page: {}", e)))?;

        let version = extract_app_version(&page)
            .ok_or_else(|| BalanceError::parse("App version not found on App Store page"))?;

        debug!("Detected PayPay app version {}", version);
        self.app_version = version;
        Ok(&self.app_version)
    }

    // ========================================================================
    // Headers
    // ========================================================================

    /// Headers the iOS app sends to the BFF
    fn app_headers(&self) -> BalanceResult<HeaderMap> {
        let user_agent = format!("PaypayApp/{} iOS{} Ktor", self.app_version, IOS_VERSION);
        let pairs = [
            ("Accept-Charset", "UTF-8"),
            ("Client-Mode", "NORMAL"),
            ("Client-OS-Release-Version", IOS_VERSION),
            ("Client-OS-Type", "IOS"),
            ("Client-OS-Version", IOS_VERSION),
            ("Client-Type", "PAYPAYAPP"),
            ("Client-UUID", self.client_uuid.as_str()),
            ("Client-Version", self.app_version.as_str()),
            ("Device-Brand-Name", "apple"),
            ("Device-Hardware-Name", "iPhone10,1"),
            ("Device-Manufacturer-Name", "apple"),
            ("Device-Name", "iPhone10,1"),
            ("Device-UUID", self.device_uuid.as_str()),
            ("Is-Emulator", "false"),
            ("Network-Status", "WIFI"),
            ("System-Locale", "ja"),
            ("Timezone", "Asia/Tokyo"),
            ("User-Agent", user_agent.as_str()),
        ];

        let mut headers = build_headers(&pairs)?;
        if let Some(token) = &self.access_token {
            headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", token))?);
        }
        Ok(headers)
    }

    /// Headers the in-app browser sends to the web portal
    fn web_headers(&self) -> BalanceResult<HeaderMap> {
        let user_agent = format!(
            "Mozilla/5.0 (iPhone; CPU iPhone OS {} like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Safari jp.pay2.app.ios/{}",
            IOS_VERSION.replace('.', "_"),
            self.app_version
        );
        let pairs = [
            ("Accept", "application/json, text/plain, */*"),
            ("Accept-Language", "ja-jp"),
            ("Client-Id", CLIENT_ID),
            ("Client-Os-Type", "IOS"),
            ("Client-Os-Version", IOS_VERSION),
            ("Client-Type", "PAYPAYAPP"),
            ("Client-Version", self.app_version.as_str()),
            ("Origin", WEB_API_BASE),
            ("User-Agent", user_agent.as_str()),
        ];
        build_headers(&pairs)
    }

    fn require_auth(&self) -> BalanceResult<&str> {
        self.access_token
            .as_deref()
            .ok_or_else(|| BalanceError::auth("PayPay login required"))
    }

    // ========================================================================
    // Login
    // ========================================================================

    /// Send phone number and password, triggering the one-time login link
    ///
    /// The provider delivers the link out-of-band (SMS). Its id is then
    /// passed to [`PayPayApi::login`].
    #[instrument(skip(self, phone, password))]
    pub async fn start_login(&mut self, phone: &str, password: &str) -> BalanceResult<()> {
        let code_verifier = generate_code_verifier();
        let challenge = code_challenge(&code_verifier);

        debug!("Pushing PayPay authorization request");
        let par_body = json!({
            "clientId": CLIENT_ID,
            "clientAppVersion": self.app_version,
            "clientOsVersion": IOS_VERSION,
            "clientOsType": "IOS",
            "codeChallenge": challenge,
            "codeChallengeMethod": "S256",
            "redirectUri": REDIRECT_URI,
            "responseType": "code",
            "scope": "REGULAR",
            "tokenVersion": "v2",
            "uiLocales": "ja",
        });
        let response = self
            .client
            .post(format!("{}/bff/v2/oauth2/par", APP_API_BASE))
            .query(&[PAYPAY_LANG])
            .headers(self.app_headers()?)
            .json(&par_body)
            .send()
            .await
            .map_err(|e| BalanceError::network(format!("Failed to start login: {}", e)))?;
        let par: ParPayload = decode(read_body(response, "authorization request").await?)?;

        let response = self
            .client
            .get(format!("{}/portal/api/v2/oauth2/par/confirm", WEB_API_BASE))
            .query(&[("client_id", CLIENT_ID), ("request_uri", par.request_uri.as_str())])
            .headers(self.web_headers()?)
            .send()
            .await
            .map_err(|e| BalanceError::network(format!("Failed to confirm login: {}", e)))?;
        read_body(response, "authorization confirm").await?;

        debug!("Signing in with password");
        let response = self
            .client
            .post(format!("{}/portal/api/v2/oauth2/sign-in/password", WEB_API_BASE))
            .headers(self.web_headers()?)
            .json(&json!({
                "username": phone,
                "password": password,
                "signInAttemptCount": 1,
            }))
            .send()
            .await
            .map_err(|e| BalanceError::network(format!("Failed to sign in: {}", e)))?;
        check_envelope(&read_body(response, "password sign-in").await?)?;

        self.code_verifier = Some(code_verifier);
        info!("PayPay sent a login link; waiting for its id");
        Ok(())
    }

    async fn exchange_code(&self, code: &str, code_verifier: &str) -> BalanceResult<TokenPayload> {
        let response = self
            .client
            .post(format!("{}/bff/v2/oauth2/token", APP_API_BASE))
            .query(&[PAYPAY_LANG])
            .headers(self.app_headers()?)
            .json(&json!({
                "clientId": CLIENT_ID,
                "redirectUri": REDIRECT_URI,
                "code": code,
                "codeVerifier": code_verifier,
            }))
            .send()
            .await
            .map_err(|e| BalanceError::network(format!("Failed to exchange code: {}", e)))?;

        decode(read_body(response, "token exchange").await?)
    }

    /// GET a BFF endpoint and return the raw body after the status check
    async fn get_app(&self, path: &str, query: &[(&str, String)]) -> BalanceResult<Value> {
        self.require_auth()?;
        let url = format!("{}{}", APP_API_BASE, path);
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[PAYPAY_LANG])
            .query(query)
            .headers(self.app_headers()?)
            .send()
            .await
            .map_err(|e| BalanceError::network(format!("Failed to fetch {}: {}", path, e)))?;

        read_body(response, path).await
    }
}

impl Default for PayPayClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PayPayApi for PayPayClient {
    #[instrument(skip(self))]
    async fn login(&mut self, login_id: &str) -> BalanceResult<PayPayCredentials> {
        let code_verifier = self
            .code_verifier
            .clone()
            .ok_or_else(|| BalanceError::auth("Login has not been started"))?;

        let response = self
            .client
            .post(format!(
                "{}/portal/api/v2/oauth2/authorization/{}",
                WEB_API_BASE, login_id
            ))
            .headers(self.web_headers()?)
            .json(&json!({}))
            .send()
            .await
            .map_err(|e| BalanceError::network(format!("Failed to authorize login: {}", e)))?;
        let authorization: AuthorizationPayload =
            decode(read_body(response, "login authorization").await?)?;

        let code = authorization_code(&authorization.redirect_uri)?;
        let tokens = self.exchange_code(&code, &code_verifier).await?;

        self.access_token = Some(tokens.access_token.clone());
        self.refresh_token = Some(tokens.refresh_token.clone());
        self.code_verifier = None;
        info!("PayPay login succeeded for device {}", self.device_uuid);

        Ok(PayPayCredentials {
            device_uuid: self.device_uuid.clone(),
            client_uuid: self.client_uuid.clone(),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }

    #[instrument(skip(self, refresh_token))]
    async fn refresh_token(&mut self, refresh_token: &str) -> BalanceResult<()> {
        self.require_auth()?;

        let response = self
            .client
            .post(format!("{}/bff/v2/oauth2/refresh", APP_API_BASE))
            .query(&[PAYPAY_LANG])
            .headers(self.app_headers()?)
            .json(&json!({
                "clientId": CLIENT_ID,
                "refreshToken": refresh_token,
                "tokenVersion": "v2",
            }))
            .send()
            .await
            .map_err(|e| BalanceError::network(format!("Failed to refresh token: {}", e)))?;

        let tokens: TokenPayload = decode(read_body(response, "token refresh").await?)?;
        self.access_token = Some(tokens.access_token);
        self.refresh_token = Some(tokens.refresh_token);
        debug!("PayPay access token refreshed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_balance(&self) -> BalanceResult<BalanceSnapshot> {
        let body = self.get_app("/bff/v2/getBalanceInfo", &[]).await?;
        let payload: BalanceInfoPayload = decode(body)?;
        Ok(payload.into())
    }

    #[instrument(skip(self))]
    async fn get_history(&self, size: u32) -> BalanceResult<Vec<Value>> {
        let query = [("offset", "0".to_string()), ("limit", size.to_string())];
        let body = self.get_app("/bff/v2/getPay2BalanceHistory", &query).await?;
        let payload: HistoryPayload = decode(body)?;
        Ok(payload.history_list)
    }

    #[instrument(skip(self))]
    async fn get_point_history(&self) -> BalanceResult<Value> {
        let query = [("offset", "0".to_string()), ("limit", "10".to_string())];
        let body = self.get_app("/bff/v2/getPointHistory", &query).await?;
        check_envelope(&body)?;
        Ok(body)
    }
}

impl std::fmt::Debug for PayPayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayPayClient")
            .field("device_uuid", &self.device_uuid)
            .field("app_version", &self.app_version)
            .field("authenticated", &self.access_token.is_some())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .finish()
    }
}

// ============================================================================
// Helpers
// ============================================================================

async fn read_body(response: Response, what: &str) -> BalanceResult<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        if status.as_u16() == 401 {
            return Err(BalanceError::auth(format!("{} rejected: {}", what, body)));
        }
        return Err(BalanceError::api(format!(
            "PayPay {} failed ({}): {}",
            what, status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| BalanceError::parse(format!("Failed to parse {} response: {}", what, e)))
}

/// Check the result code of a raw response body
fn check_envelope(body: &Value) -> BalanceResult<()> {
    let header = body
        .get("header")
        .ok_or_else(|| BalanceError::missing_field("header"))?;
    let header: ResponseHeader = serde_json::from_value(header.clone())
        .map_err(|e| BalanceError::parse(format!("Invalid response header: {}", e)))?;
    header.check()
}

/// Check the result code and decode the payload
fn decode<T: DeserializeOwned>(body: Value) -> BalanceResult<T> {
    let response: ApiResponse<T> = serde_json::from_value(body)
        .map_err(|e| BalanceError::parse(format!("Unexpected response shape: {}", e)))?;
    response.into_payload()
}

fn header_value(value: &str) -> BalanceResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| BalanceError::input(format!("Invalid header value: {}", e)))
}

fn build_headers(pairs: &[(&'static str, &str)]) -> BalanceResult<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(pairs.len() + 1);
    for (name, value) in pairs {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| BalanceError::input(format!("Invalid header name {}: {}", name, e)))?;
        headers.insert(name, header_value(value)?);
    }
    Ok(headers)
}

/// Pull the `code` query parameter out of the OAuth redirect
fn authorization_code(redirect_uri: &str) -> BalanceResult<String> {
    let parsed = url::Url::parse(redirect_uri)
        .map_err(|e| BalanceError::parse(format!("Invalid redirect URI: {}", e)))?;
    parsed
        .query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.into_owned())
        .ok_or_else(|| BalanceError::missing_field("redirectUri.code"))
}

/// Random PKCE code verifier (43 URL-safe characters)
fn generate_code_verifier() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// S256 PKCE challenge for a verifier
fn code_challenge(code_verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(code_verifier.as_bytes()))
}

/// Find the "Version x.y.z" string on the App Store page
fn extract_app_version(page: &str) -> Option<String> {
    let re = Regex::new(r"Version\s+(\d+\.\d+\.\d+)").ok()?;
    re.captures(page)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
