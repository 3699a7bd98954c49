use std::time::Duration;

use reqwest::{Client, Response, RequestBuilder};
use http::Method;
use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use crate::error::{Error, Result};
use crate::config::Settings;
use tracing::{error, debug};

pub struct HttpClient {
    client: Client,
    headers: HeaderMap,
}

impl HttpClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut headers = HeaderMap::new();

        for (key, value) in settings.api.headers.iter() {
            if let (Ok(header_name), Ok(header_value)) = (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value)
            ) {
                headers.insert(header_name, header_value);
                debug!(
                    header_key = key,
                    "Adding header"
                );
            } else {
                error!(
                    header_key = key,
                    "Invalid header, skipping"
                );
            }
        }

        debug!(
            user_agent = %settings.api.user_agent,
            timeout_secs = ?settings.api.timeout_secs,
            "Creating HTTP client"
        );

        let mut builder = Client::builder().user_agent(settings.api.user_agent.clone());
        if let Some(secs) = settings.api.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            headers,
        })
    }

    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut request = self.client.request(method.clone(), url);

        for (key, value) in self.headers.iter() {
            request = request.header(key, value);
        }

        debug!(
            method = %method,
            url = url,
            "Creating request"
        );

        request
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    pub fn delete(&self, url: &str) -> RequestBuilder {
        self.request(Method::DELETE, url)
    }

    /// A request carrying `body` as JSON.
    pub fn json<T: serde::Serialize>(&self, method: Method, url: &str, body: &T) -> Result<RequestBuilder> {
        let bytes = serde_json::to_vec(body).map_err(Error::Encode)?;
        Ok(self
            .request(method, url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(bytes))
    }

    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, "Request failed before a response arrived");
            Error::from(e)
        })?;

        debug!(
            status = response.status().as_u16(),
            url = %response.url(),
            "Response received"
        );

        Ok(response)
    }
}
