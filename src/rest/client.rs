//! Swyftx REST API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use crate::auth::{Credentials, Environment, Session, TokenManager};
use crate::client::executor::{EnvironmentRouter, RequestExecutor, RequestSpec};
use crate::client::query::QueryParams;
use crate::client::retry::{RateLimitPolicy, TransientRetryPolicy};
use crate::client::transport::{HttpTransport, Transport};
use crate::error::SwyftxError;
use crate::rest::endpoints;
use crate::rest::types::{
    ApiKeyInfo, Asset, Balance, BasicAssetInfo, DetailedAssetInfo, ExchangeRate,
    ExchangeRateRequest, HistoryEntry, KeyScope, LiveRates, Order, OrderPlaced,
    PlaceOrderRequest, Profile, ProfileEnvelope, UpdateOrderRequest, UserStatistics,
    WithdrawalLimit,
};

/// The Swyftx REST API client.
///
/// The client handles token exchange, environment routing, retry policy,
/// and response classification; endpoint methods are thin typed wrappers
/// over the shared [`RequestExecutor`].
///
/// # Example
///
/// ```rust,no_run
/// use swyftx_api_client::{Credentials, Environment, SwyftxClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = SwyftxClient::builder()
///         .credentials(Credentials::new("api_key"))
///         .environment(Environment::Demo)
///         .build();
///
///     let balances = client.balances().await?;
///     println!("Balances: {:?}", balances);
///     Ok(())
/// }
/// ```
pub struct SwyftxClient<T: Transport = HttpTransport> {
    executor: Arc<RequestExecutor<T>>,
    session: Session,
}

impl SwyftxClient<HttpTransport> {
    /// Create a client with default settings.
    ///
    /// This client can only access public endpoints. Use
    /// [`SwyftxClient::builder()`] to configure credentials.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> SwyftxClientBuilder {
        SwyftxClientBuilder::new()
    }
}

impl Default for SwyftxClient<HttpTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> SwyftxClient<T> {
    /// The session holding the access token and selected environment.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Get the currently selected environment.
    pub async fn environment(&self) -> Environment {
        self.session.environment().await
    }

    /// Switch the session to a different environment.
    pub async fn set_environment(&self, environment: Environment) {
        self.session.set_environment(environment).await;
    }

    /// Execute an arbitrary request spec and return the raw JSON body.
    ///
    /// Escape hatch for endpoints without a typed wrapper.
    pub async fn execute_raw(&self, spec: &RequestSpec) -> Result<Value, SwyftxError> {
        self.executor.execute(spec).await
    }

    async fn request<R>(&self, spec: RequestSpec) -> Result<R, SwyftxError>
    where
        R: serde::de::DeserializeOwned,
    {
        let body = self.executor.execute(&spec).await?;
        serde_json::from_value(body)
            .map_err(|e| SwyftxError::InvalidResponse(format!("failed to decode response: {e}")))
    }

    // ========== Authentication ==========

    /// Exchange the API key for a fresh access token.
    ///
    /// Normally unnecessary: authenticated calls obtain a token on demand.
    pub async fn refresh_access_token(&self) -> Result<(), SwyftxError> {
        self.executor.refresh_token().await
    }

    /// The cached access token, if one has been obtained.
    pub async fn access_token(&self) -> Option<String> {
        self.session.access_token_string().await
    }

    /// Invalidate the current access token server-side and drop it locally.
    pub async fn logout(&self) -> Result<(), SwyftxError> {
        let spec = RequestSpec::post(endpoints::auth::LOGOUT).authed();
        self.executor.execute(&spec).await?;
        self.session.clear_token().await;
        Ok(())
    }

    // ========== User & Account ==========

    /// Get the user profile.
    pub async fn profile(&self) -> Result<Profile, SwyftxError> {
        let envelope: ProfileEnvelope = self
            .request(RequestSpec::get(endpoints::user::PROFILE).authed())
            .await?;
        Ok(envelope.user)
    }

    /// Get all asset balances on the account.
    pub async fn balances(&self) -> Result<Vec<Balance>, SwyftxError> {
        self.request(RequestSpec::get(endpoints::user::BALANCE).authed())
            .await
    }

    /// Get aggregate trading statistics for the account.
    pub async fn statistics(&self) -> Result<UserStatistics, SwyftxError> {
        self.request(RequestSpec::get(endpoints::user::STATISTICS).authed())
            .await
    }

    /// Set the default display currency.
    pub async fn set_default_currency(&self, asset_id: u32) -> Result<(), SwyftxError> {
        let spec = RequestSpec::post(endpoints::user::CURRENCY)
            .authed()
            .body(json!({ "currency": asset_id }));
        self.executor.execute(&spec).await?;
        Ok(())
    }

    // ========== API keys ==========

    /// List API keys registered on the account.
    pub async fn api_keys(&self) -> Result<Vec<ApiKeyInfo>, SwyftxError> {
        self.request(RequestSpec::get(endpoints::user::API_KEYS).authed())
            .await
    }

    /// Get the scope granted to the current API key.
    pub async fn api_key_scope(&self) -> Result<KeyScope, SwyftxError> {
        self.request(RequestSpec::get(endpoints::user::API_KEY_SCOPE).authed())
            .await
    }

    /// Revoke a single API key by id.
    pub async fn revoke_api_key(&self, key_id: &str) -> Result<(), SwyftxError> {
        let spec = RequestSpec::post(endpoints::user::API_KEY_REVOKE)
            .authed()
            .body(json!({ "id": key_id }));
        self.executor.execute(&spec).await?;
        Ok(())
    }

    /// Revoke every API key on the account, including the current one.
    pub async fn revoke_all_api_keys(&self) -> Result<(), SwyftxError> {
        let spec = RequestSpec::post(endpoints::user::API_KEYS_REVOKE_ALL).authed();
        self.executor.execute(&spec).await?;
        Ok(())
    }

    // ========== Markets ==========

    /// List all assets known to the exchange.
    pub async fn assets(&self) -> Result<Vec<Asset>, SwyftxError> {
        self.request(RequestSpec::get(endpoints::markets::ASSETS))
            .await
    }

    /// Basic market info, for one asset or all assets.
    pub async fn basic_info(
        &self,
        asset: Option<&str>,
    ) -> Result<Vec<BasicAssetInfo>, SwyftxError> {
        self.request(RequestSpec::get(endpoints::markets::basic_info(asset)))
            .await
    }

    /// Detailed market info, for one asset or all assets.
    pub async fn detail_info(
        &self,
        asset: Option<&str>,
    ) -> Result<Vec<DetailedAssetInfo>, SwyftxError> {
        self.request(RequestSpec::get(endpoints::markets::detail_info(asset)))
            .await
    }

    /// Live buy/sell rates for all assets, denominated in the given asset.
    pub async fn live_rates(&self, denominating_asset_id: u32) -> Result<LiveRates, SwyftxError> {
        self.request(RequestSpec::get(endpoints::markets::live_rates(
            denominating_asset_id,
        )))
        .await
    }

    // ========== Orders ==========

    /// List orders, optionally filtered by asset code.
    pub async fn list_orders(&self, asset: Option<&str>) -> Result<Vec<Order>, SwyftxError> {
        let query = QueryParams::new().push_opt("assetCode", asset);
        let path = format!("{}{}", endpoints::orders::ORDERS, query.build());
        self.request(RequestSpec::get(path).authed()).await
    }

    /// Fetch one order by its UUID.
    pub async fn order(&self, order_uuid: &str) -> Result<Order, SwyftxError> {
        self.request(RequestSpec::get(endpoints::orders::by_id(order_uuid)).authed())
            .await
    }

    /// Place an order.
    ///
    /// Order placement is not idempotent, so transient transport failures
    /// are never retried automatically for this call: a timed-out POST may
    /// have been executed server-side. Callers that can tolerate duplicate
    /// placement can build their own spec with
    /// [`RequestSpec::retry_non_idempotent`] via [`execute_raw`](Self::execute_raw).
    pub async fn place_order(&self, request: &PlaceOrderRequest) -> Result<OrderPlaced, SwyftxError> {
        let spec = RequestSpec::post(endpoints::orders::ORDERS)
            .authed()
            .body(serde_json::to_value(request)?);
        self.request(spec).await
    }

    /// Update a pending order's trigger or quantity.
    pub async fn update_order(
        &self,
        order_uuid: &str,
        request: &UpdateOrderRequest,
    ) -> Result<Order, SwyftxError> {
        let spec = RequestSpec::put(endpoints::orders::order(order_uuid))
            .authed()
            .body(serde_json::to_value(request)?);
        self.request(spec).await
    }

    /// Cancel a pending order.
    pub async fn cancel_order(&self, order_uuid: &str) -> Result<(), SwyftxError> {
        let spec = RequestSpec::delete(endpoints::orders::order(order_uuid)).authed();
        self.executor.execute(&spec).await?;
        Ok(())
    }

    /// Quote the current exchange rate for a prospective order.
    pub async fn exchange_rate(
        &self,
        request: &ExchangeRateRequest,
    ) -> Result<ExchangeRate, SwyftxError> {
        let spec = RequestSpec::post(endpoints::orders::RATE)
            .authed()
            .body(serde_json::to_value(request)?);
        self.request(spec).await
    }

    // ========== History ==========

    /// All transactions, paginated via `limit`/`page`/`sortBy`.
    pub async fn transaction_history(
        &self,
        query: &QueryParams,
    ) -> Result<Vec<HistoryEntry>, SwyftxError> {
        let path = format!("{}{}", endpoints::history::ALL, query.build());
        self.request(RequestSpec::get(path).authed()).await
    }

    /// Deposit history, paginated via `limit`/`page`/`sortBy`.
    pub async fn deposit_history(
        &self,
        query: &QueryParams,
    ) -> Result<Vec<HistoryEntry>, SwyftxError> {
        let path = format!("{}{}", endpoints::history::DEPOSITS, query.build());
        self.request(RequestSpec::get(path).authed()).await
    }

    /// Withdrawal history, paginated via `limit`/`page`/`sortBy`.
    pub async fn withdrawal_history(
        &self,
        query: &QueryParams,
    ) -> Result<Vec<HistoryEntry>, SwyftxError> {
        let path = format!("{}{}", endpoints::history::WITHDRAWALS, query.build());
        self.request(RequestSpec::get(path).authed()).await
    }

    // ========== Limits ==========

    /// Remaining withdrawal limits for the account.
    pub async fn withdrawal_limits(&self) -> Result<WithdrawalLimit, SwyftxError> {
        self.request(RequestSpec::get(endpoints::limits::WITHDRAWAL).authed())
            .await
    }
}

impl<T: Transport> Clone for SwyftxClient<T> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            session: self.session.clone(),
        }
    }
}

impl<T: Transport> std::fmt::Debug for SwyftxClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwyftxClient")
            .field("has_credentials", &self.executor.has_credentials())
            .finish()
    }
}

/// Builder for [`SwyftxClient`].
pub struct SwyftxClientBuilder {
    credentials: Option<Credentials>,
    environment: Environment,
    live_url: Option<String>,
    demo_url: Option<String>,
    max_attempts: u32,
    auto_wait: bool,
    rate_limit_wait: Duration,
    cancel: Option<CancellationToken>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl SwyftxClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            credentials: None,
            environment: Environment::Live,
            live_url: None,
            demo_url: None,
            max_attempts: TransientRetryPolicy::default().max_attempts,
            auto_wait: false,
            rate_limit_wait: RateLimitPolicy::default().wait,
            cancel: None,
            timeout: Some(Duration::from_secs(30)),
            user_agent: None,
        }
    }

    /// Set the API key for authenticated endpoints.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Select the initial environment (default: live).
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Override the live base URL (useful for testing with a mock server).
    pub fn live_url(mut self, url: impl Into<String>) -> Self {
        self.live_url = Some(url.into());
        self
    }

    /// Override the demo base URL (useful for testing with a mock server).
    pub fn demo_url(mut self, url: impl Into<String>) -> Self {
        self.demo_url = Some(url.into());
        self
    }

    /// Total attempts per logical call for transient failures (default 3).
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Absorb rate-limit errors by waiting and re-issuing (default off).
    pub fn auto_wait(mut self, enabled: bool) -> Self {
        self.auto_wait = enabled;
        self
    }

    /// Fixed interval to wait when rate limited (default 5000ms).
    pub fn rate_limit_wait(mut self, wait: Duration) -> Self {
        self.rate_limit_wait = wait;
        self
    }

    /// Cancellation signal for the otherwise unbounded rate-limit backoff.
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Per-request timeout (default 30s). `None` disables the timeout.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client with the production HTTP transport.
    pub fn build(self) -> SwyftxClient<HttpTransport> {
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("swyftx-api-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("swyftx-api-client"));
        headers.insert(USER_AGENT, header_value);

        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        self.build_with_transport(HttpTransport::new(reqwest_client))
    }

    /// Build the client around a custom transport.
    ///
    /// Intended for tests that inject scripted failures.
    pub fn build_with_transport<T: Transport>(self, transport: T) -> SwyftxClient<T> {
        let router = EnvironmentRouter::new(
            self.live_url
                .unwrap_or_else(|| endpoints::LIVE_BASE_URL.to_string()),
            self.demo_url
                .unwrap_or_else(|| endpoints::DEMO_BASE_URL.to_string()),
        );

        let session = Session::new(self.environment);
        let tokens = TokenManager::new(session.clone(), self.credentials);
        let executor = RequestExecutor::new(
            transport,
            session.clone(),
            tokens,
            router,
            TransientRetryPolicy {
                max_attempts: self.max_attempts,
            },
            RateLimitPolicy {
                auto_wait: self.auto_wait,
                wait: self.rate_limit_wait,
                cancel: self.cancel.unwrap_or_default(),
            },
            self.timeout,
        );

        SwyftxClient {
            executor: Arc::new(executor),
            session,
        }
    }
}

impl Default for SwyftxClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
