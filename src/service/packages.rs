//! Binding package versions to an application.

use super::expect_status;
use crate::client::PlatformClient;
use crate::model::BindPackageRequest;
use anyhow::Result;
use reqwest::StatusCode;
use tracing::info;

#[allow(async_fn_in_trait)]
pub trait PackageService {
    async fn bind_package(&self, request: &BindPackageRequest) -> Result<()>;

    /// An empty `versions` list unbinds every version of the package.
    async fn unbind_package(&self, request: &BindPackageRequest) -> Result<()>;
}

pub struct HttpPackageService {
    client: PlatformClient,
}

impl HttpPackageService {
    pub fn new(client: PlatformClient) -> Self {
        HttpPackageService { client }
    }
}

fn bound_package_endpoint(request: &BindPackageRequest) -> String {
    format!(
        "applications/{}/packages/{}/{}",
        request.application_key, request.package_type, request.name
    )
}

fn unbind_query(request: &BindPackageRequest) -> Vec<(&'static str, String)> {
    if request.versions.is_empty() {
        Vec::new()
    } else {
        vec![("versions", request.versions.join(","))]
    }
}

impl PackageService for HttpPackageService {
    async fn bind_package(&self, request: &BindPackageRequest) -> Result<()> {
        let resp = self.client.post_json("package", &[], request).await?;
        expect_status("bind package", &resp, StatusCode::CREATED)?;
        info!("Package bound successfully.");
        Ok(())
    }

    async fn unbind_package(&self, request: &BindPackageRequest) -> Result<()> {
        let resp = self
            .client
            .delete(&bound_package_endpoint(request), &unbind_query(request))
            .await?;
        expect_status("unbind package", &resp, StatusCode::NO_CONTENT)?;
        info!("Package unbound successfully.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(versions: &[&str]) -> BindPackageRequest {
        BindPackageRequest {
            application_key: "app".into(),
            package_type: "npm".into(),
            name: "left-pad".into(),
            versions: versions.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn test_unbind_addresses_the_bound_package() {
        assert_eq!(
            bound_package_endpoint(&request(&[])),
            "applications/app/packages/npm/left-pad"
        );
    }

    #[test]
    fn test_unbind_query_only_when_versions_given() {
        assert!(unbind_query(&request(&[])).is_empty());
        assert_eq!(
            unbind_query(&request(&["1.0.0", "1.1.0"])),
            vec![("versions", "1.0.0,1.1.0".to_string())]
        );
    }
}
