use crate::config::ServerDetails;
use crate::constants::API_ROOT;
use anyhow::{Context, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client, Method, StatusCode,
};
use serde::Serialize;
use tracing::debug;

/// Status and raw body of a platform response.
///
/// Non-2xx statuses are not errors at this level; callers decide which
/// statuses mean success for their operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

pub struct PlatformClient {
    base_url: String,
    client: Client,
}

impl PlatformClient {
    pub fn new(details: &ServerDetails) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &details.access_token {
            let mut hv = HeaderValue::from_str(&format!("Bearer {}", token))
                .context("access token contains invalid header characters")?;
            hv.set_sensitive(true);
            headers.insert(AUTHORIZATION, hv);
        }

        let client = Client::builder().default_headers(headers).build()?;
        Ok(PlatformClient {
            base_url: format!("{}/{}", details.url, API_ROOT),
            client,
        })
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    pub async fn get(&self, endpoint: &str) -> Result<ApiResponse> {
        self.send(Method::GET, endpoint, &[], None::<&()>).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        body: &T,
    ) -> Result<ApiResponse> {
        self.send(Method::POST, endpoint, query, Some(body)).await
    }

    pub async fn patch_json<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        body: &T,
    ) -> Result<ApiResponse> {
        self.send(Method::PATCH, endpoint, query, Some(body)).await
    }

    pub async fn delete(&self, endpoint: &str, query: &[(&str, String)]) -> Result<ApiResponse> {
        self.send(Method::DELETE, endpoint, query, None::<&()>).await
    }

    async fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&T>,
    ) -> Result<ApiResponse> {
        let url = self.endpoint_url(endpoint);
        debug!(%method, %url, ?query, "sending request");

        let mut req = self.client.request(method.clone(), url.as_str()).query(query);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req
            .send()
            .await
            .with_context(|| format!("{} {}", method, url))?;
        let status = resp.status();
        let body = resp.text().await?;
        debug!(%status, "received response");
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_joins_api_root() {
        let client = PlatformClient::new(&ServerDetails {
            url: "https://platform.example.com".into(),
            access_token: Some("token".into()),
        })
        .unwrap();
        assert_eq!(
            client.endpoint_url("/applications/app/versions/"),
            "https://platform.example.com/apptrust/api/v1/applications/app/versions/"
        );
    }
}
