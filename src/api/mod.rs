pub mod models;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::Method;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::PageContext;
use crate::csrf::{self, CookieSource};

pub use models::{CustomerHit, OrderDetail, Product, QuotationDetail, QuotationSummary};

const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request url: {url}")]
    InvalidUrl { url: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub cookies: CookieSource,
    pub timeout_seconds: u64,
    pub user_agent: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            cookies: CookieSource::default(),
            timeout_seconds: 10,
            user_agent: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    context: PageContext,
    cookies: CookieSource,
}

impl ApiClient {
    pub fn new(context: PageContext, options: ClientOptions) -> Result<Self, ApiError> {
        let http = build_http_client(&options)?;
        Ok(Self {
            http,
            context,
            cookies: options.cookies,
        })
    }

    pub fn context(&self) -> &PageContext {
        &self.context
    }

    pub fn request(&self, method: Method, url: &str) -> Result<reqwest::RequestBuilder, ApiError> {
        let parsed = self
            .context
            .page_url
            .join(url)
            .map_err(|_| ApiError::InvalidUrl {
                url: url.to_string(),
            })?;
        let mut builder = self.http.request(method.clone(), parsed);
        if cfg!(not(target_arch = "wasm32")) && !self.cookies.header().is_empty() {
            builder = builder.header(reqwest::header::COOKIE, self.cookies.header());
        }
        Ok(csrf::protect(
            builder,
            &method,
            &self.context.page_url,
            url,
            &self.cookies,
        ))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.context.endpoint(path);
        let response = self
            .request(Method::GET, &url)?
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            debug!("GET {url} -> {status}");
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
            });
        }
        let body = response
            .text()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.clone(),
                source,
            })?;
        trace!("GET {url} -> {body}");
        serde_json::from_str(&body).map_err(|source| ApiError::Decode { url, source })
    }

    pub async fn quotation_details(&self, quotation_id: &str) -> Result<QuotationDetail, ApiError> {
        self.get_json(&format!(
            "enquiry/api/v1/quotation/{}/detail.json",
            segment(quotation_id)
        ))
        .await
    }

    pub async fn order_details(&self, order_id: &str) -> Result<OrderDetail, ApiError> {
        self.get_json(&format!(
            "enquiry/api/v1/order/{}/detail.json",
            segment(order_id)
        ))
        .await
    }

    pub async fn customer_emails(&self, customer_id: &str) -> Result<Vec<String>, ApiError> {
        self.get_json(&format!("customer/api/v1/emails/{}.json", segment(customer_id)))
            .await
    }

    pub async fn search_customers(&self, query: &str) -> Result<Vec<CustomerHit>, ApiError> {
        self.get_json(&format!("customer/api/v1/customers/{}.json", segment(query)))
            .await
    }
}

fn segment(value: &str) -> String {
    utf8_percent_encode(value.trim(), PATH_SEGMENT).to_string()
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http_client(options: &ClientOptions) -> Result<reqwest::Client, ApiError> {
    use std::time::Duration;

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );
    if let Some(agent) = options.user_agent.as_deref() {
        if let Ok(value) = reqwest::header::HeaderValue::from_str(agent) {
            headers.insert(reqwest::header::USER_AGENT, value);
        }
    }
    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(options.timeout_seconds.max(1)))
        .build()
        .map_err(|source| ApiError::HttpClientBuild { source })
}

// The browser owns cookies, timeouts and the user agent.
#[cfg(target_arch = "wasm32")]
fn build_http_client(_options: &ClientOptions) -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .build()
        .map_err(|source| ApiError::HttpClientBuild { source })
}
