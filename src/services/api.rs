use async_trait::async_trait;
use reqwest::RequestBuilder;
use url::Url;
use serde::de::DeserializeOwned;
use http::Method;
use tracing::{debug, error, warn};

use crate::clients::HttpClient;
use crate::config::Settings;
use crate::error::{Error, Failure, FailureKind, Result};
use crate::models::{ErrorBody, Supplier, SupplierPayload};
use crate::utils::SearchQuery;

pub type ApiResult<T> = std::result::Result<T, Failure>;

/// The supplier service as the form sees it: one call per button.
#[async_trait]
pub trait SupplierApi: Send + Sync {
    async fn create(&self, payload: &SupplierPayload) -> ApiResult<Supplier>;

    async fn update(&self, id: &str, payload: &SupplierPayload) -> ApiResult<Supplier>;

    async fn retrieve(&self, id: &str) -> ApiResult<Supplier>;

    async fn delete(&self, id: &str) -> ApiResult<()>;

    async fn search(&self, query: &SearchQuery) -> ApiResult<Vec<Supplier>>;

    async fn make_available(&self, id: &str) -> ApiResult<Supplier>;
}

/// [`SupplierApi`] over HTTP against `{base_url}{collection_path}`.
pub struct RestSupplierApi {
    client: HttpClient,
    collection: Url,
}

impl RestSupplierApi {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = HttpClient::new(settings)?;
        let collection = collection_url(&settings.api.base_url, &settings.api.collection_path)?;

        debug!(collection = %collection, "Supplier API ready");

        Ok(Self { client, collection })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    /// `{collection}/{id}` followed by `extra` segments, each escaped.
    pub fn item_url(&self, id: &str, extra: &[&str]) -> ApiResult<Url> {
        let mut url = self.collection.clone();
        url.path_segments_mut()
            .map_err(|_| {
                Failure::new(
                    FailureKind::Transport,
                    format!("{} cannot carry an item path", self.collection),
                )
            })?
            .pop_if_empty()
            .push(id)
            .extend(extra);
        Ok(url)
    }

    pub fn search_url(&self, query: &SearchQuery) -> Url {
        let mut url = self.collection.clone();
        query.apply_to(&mut url);
        url
    }

    async fn exchange(&self, request: RequestBuilder) -> ApiResult<Vec<u8>> {
        let response = self.client.send(request).await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let failure = Failure::from_status(status, ErrorBody::message_from(&body));
            warn!(
                status = status.as_u16(),
                message = %failure.message,
                "Supplier API returned an error"
            );
            return Err(failure);
        }

        Ok(body.to_vec())
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> ApiResult<T> {
        let body = self.exchange(request).await?;

        serde_json::from_slice(&body).map_err(|e| {
            let body_str = String::from_utf8_lossy(&body);
            error!(
                error = %e,
                body = %body_str,
                "Failed to parse {} response",
                what
            );
            Failure::new(FailureKind::Decode, e.to_string())
        })
    }

    fn json_request(&self, method: Method, url: &Url, payload: &SupplierPayload) -> ApiResult<RequestBuilder> {
        Ok(self.client.json(method, url.as_str(), payload)?)
    }
}

fn collection_url(base_url: &str, collection_path: &str) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|e| Error::InvalidUrl(format!("{base_url}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(Error::InvalidUrl(base_url.to_string()));
    }

    let path = format!(
        "{}/{}",
        url.path().trim_end_matches('/'),
        collection_path.trim_matches('/')
    );
    url.set_path(&path);
    Ok(url)
}

#[async_trait]
impl SupplierApi for RestSupplierApi {
    async fn create(&self, payload: &SupplierPayload) -> ApiResult<Supplier> {
        let request = self.json_request(Method::POST, &self.collection, payload)?;
        self.fetch(request, "create").await
    }

    async fn update(&self, id: &str, payload: &SupplierPayload) -> ApiResult<Supplier> {
        let url = self.item_url(id, &[])?;
        let request = self.json_request(Method::PUT, &url, payload)?;
        self.fetch(request, "update").await
    }

    async fn retrieve(&self, id: &str) -> ApiResult<Supplier> {
        let url = self.item_url(id, &[])?;
        self.fetch(self.client.get(url.as_str()), "retrieve").await
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        let url = self.item_url(id, &[])?;
        self.exchange(self.client.delete(url.as_str())).await?;
        Ok(())
    }

    async fn search(&self, query: &SearchQuery) -> ApiResult<Vec<Supplier>> {
        let url = self.search_url(query);
        self.fetch(self.client.get(url.as_str()), "search").await
    }

    async fn make_available(&self, id: &str) -> ApiResult<Supplier> {
        let url = self.item_url(id, &["make-available"])?;
        self.fetch(self.client.get(url.as_str()), "make-available").await
    }
}
