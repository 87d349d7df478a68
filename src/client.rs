use crate::auth::AuthStrategy;
use crate::config::{ClientConfig, DEFAULT_USER_AGENT};
use crate::error::ApiClientError;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::multipart::Form;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

pub type ApiResult<T> = Result<T, ApiClientError>;

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    user_agent: String,
    client: ReqwestClient,
    auth_strategy: Option<Arc<dyn AuthStrategy>>, // Using Arc to allow cloning
}

impl ApiClient {
    pub fn new(base_url: &str, auth_strategy: Option<Arc<dyn AuthStrategy>>) -> Self {
        ApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            client: ReqwestClient::new(),
            auth_strategy,
        }
    }

    pub fn from_config(
        config: &ClientConfig,
        auth_strategy: Option<Arc<dyn AuthStrategy>>,
    ) -> ApiResult<Self> {
        let base_url = config.base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ApiClientError::Config("base url is empty".to_string()));
        }
        Ok(ApiClient {
            base_url: base_url.to_string(),
            user_agent: config.user_agent.clone(),
            client: ReqwestClient::new(),
            auth_strategy,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        if let Some(auth) = &self.auth_strategy {
            auth.apply_auth(request)
        } else {
            request
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Starts a request with the user agent and authorization already attached.
    /// The token is read from the auth strategy here, once per request.
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = self.url(endpoint);
        info!("Sending {} request to URL: {}", method, url);

        let request = self
            .client
            .request(method, &url)
            .header(USER_AGENT, &self.user_agent);
        self.apply_auth(request)
    }

    #[instrument(skip(self, params))]
    pub async fn get<T, Q>(&self, endpoint: &str, params: Option<&Q>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let mut request = self.request(Method::GET, endpoint);

        if let Some(params) = params {
            request = request.query(params);
            debug!("Added query parameters");
        }

        let response = self.execute(request).await?;
        let response = Self::check_status(response).await?;
        Self::decode_json(response).await
    }

    /// Sends `body` as JSON and decodes the JSON reply.
    #[instrument(skip(self, body))]
    pub async fn send_json<T, B>(&self, method: Method, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.json_request(method, endpoint, body)?;
        let response = self.execute(request).await?;
        let response = Self::check_status(response).await?;
        Self::decode_json(response).await
    }

    /// Sends `body` as JSON where only the response status matters.
    #[instrument(skip(self, body))]
    pub async fn send_json_status<B>(&self, method: Method, endpoint: &str, body: &B) -> ApiResult<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self.json_request(method, endpoint, body)?;
        let response = self.execute(request).await?;
        Self::check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self, form))]
    pub async fn send_multipart<T>(&self, method: Method, endpoint: &str, form: Form) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let request = self.request(method, endpoint).multipart(form);
        let response = self.execute(request).await?;
        let response = Self::check_status(response).await?;
        Self::decode_json(response).await
    }

    /// GETs a plain-text body. A non-success status is reported as `None`
    /// rather than an error; transport failures are still errors.
    #[instrument(skip(self, params))]
    pub async fn get_text_or_none<Q>(&self, endpoint: &str, params: Option<&Q>) -> ApiResult<Option<String>>
    where
        Q: Serialize + ?Sized,
    {
        let mut request = self.request(Method::GET, endpoint);
        if let Some(params) = params {
            request = request.query(params);
        }

        let response = self.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Request to {} returned status {}, no content", endpoint, status);
            return Ok(None);
        }
        Ok(Some(response.text().await?))
    }

    fn json_request<B>(&self, method: Method, endpoint: &str, body: &B) -> ApiResult<RequestBuilder>
    where
        B: Serialize + ?Sized,
    {
        let json_body = serde_json::to_vec(body).map_err(|e| {
            error!("Failed to serialize body: {:?}", e);
            ApiClientError::Serialize(e)
        })?;
        debug!("Serialized body: {}", String::from_utf8_lossy(&json_body));

        Ok(self
            .request(method, endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(json_body))
    }

    pub(crate) async fn execute(&self, request: RequestBuilder) -> ApiResult<Response> {
        request.send().await.map_err(|e| {
            error!("Network error while sending request: {:?}", e);
            ApiClientError::Network(e)
        })
    }

    pub(crate) async fn check_status(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response body".to_string());
        error!("Request failed with status {}: {}", status, body);
        Err(ApiClientError::HttpStatus { status, body })
    }

    pub(crate) async fn decode_json<T>(response: Response) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let body = response.text().await?;
        let deserializer = &mut serde_json::Deserializer::from_str(&body);
        serde_path_to_error::deserialize(deserializer).map_err(|err| {
            error!("Failed to parse JSON response at {}: {:?}", err.path(), err);
            ApiClientError::Decode(err)
        })
    }
}
