//! Application version operations.

use crate::client::PlatformClient;
use crate::model::{
    CreateAppVersionRequest, PromoteAppVersionRequest, ReleaseAppVersionRequest,
    RollbackAppVersionRequest, UpdateAppVersionRequest, UpdateVersionSourcesRequest,
};
use super::{
    expect_not_client_or_server_error, expect_status, failure, print_body, sync_status,
};
use anyhow::Result;
use reqwest::StatusCode;
use tracing::info;

/// Query flags for `version-update-sources`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateSourcesOptions {
    pub sync: bool,
    pub dry_run: bool,
    pub fail_fast: bool,
}

#[allow(async_fn_in_trait)]
pub trait VersionService {
    async fn create_app_version(&self, request: &CreateAppVersionRequest, sync: bool)
        -> Result<()>;

    async fn update_app_version_sources(
        &self,
        application_key: &str,
        version: &str,
        request: &UpdateVersionSourcesRequest,
        options: UpdateSourcesOptions,
    ) -> Result<()>;

    async fn update_app_version(
        &self,
        application_key: &str,
        version: &str,
        request: &UpdateAppVersionRequest,
    ) -> Result<()>;

    async fn promote_app_version(
        &self,
        application_key: &str,
        version: &str,
        request: &PromoteAppVersionRequest,
        sync: bool,
    ) -> Result<()>;

    async fn release_app_version(
        &self,
        application_key: &str,
        version: &str,
        request: &ReleaseAppVersionRequest,
        sync: bool,
    ) -> Result<()>;

    async fn rollback_app_version(
        &self,
        application_key: &str,
        version: &str,
        request: &RollbackAppVersionRequest,
        sync: bool,
    ) -> Result<()>;

    async fn delete_app_version(&self, application_key: &str, version: &str) -> Result<()>;

    async fn ping(&self) -> Result<()>;
}

pub struct HttpVersionService {
    client: PlatformClient,
}

impl HttpVersionService {
    pub fn new(client: PlatformClient) -> Self {
        HttpVersionService { client }
    }
}

fn versions_endpoint(application_key: &str) -> String {
    format!("applications/{application_key}/versions/")
}

fn version_endpoint(application_key: &str, version: &str) -> String {
    format!("applications/{application_key}/versions/{version}")
}

fn async_query(sync: bool) -> [(&'static str, String); 1] {
    [("async", (!sync).to_string())]
}

impl VersionService for HttpVersionService {
    async fn create_app_version(
        &self,
        request: &CreateAppVersionRequest,
        sync: bool,
    ) -> Result<()> {
        let resp = self
            .client
            .post_json(
                &versions_endpoint(&request.application_key),
                &async_query(sync),
                request,
            )
            .await?;
        expect_status(
            "create app version",
            &resp,
            sync_status(sync, StatusCode::CREATED, StatusCode::ACCEPTED),
        )?;
        info!("Application version created successfully.");
        print_body(&resp);
        Ok(())
    }

    async fn update_app_version_sources(
        &self,
        application_key: &str,
        version: &str,
        request: &UpdateVersionSourcesRequest,
        options: UpdateSourcesOptions,
    ) -> Result<()> {
        let query = [
            ("async", (!options.sync).to_string()),
            ("dry_run", options.dry_run.to_string()),
            ("fail_fast", options.fail_fast.to_string()),
        ];
        let resp = self
            .client
            .patch_json(&version_endpoint(application_key, version), &query, request)
            .await?;
        expect_status(
            "update app version sources",
            &resp,
            sync_status(options.sync, StatusCode::OK, StatusCode::ACCEPTED),
        )?;
        info!("Application version sources updated successfully.");
        print_body(&resp);
        Ok(())
    }

    async fn update_app_version(
        &self,
        application_key: &str,
        version: &str,
        request: &UpdateAppVersionRequest,
    ) -> Result<()> {
        let resp = self
            .client
            .patch_json(&version_endpoint(application_key, version), &[], request)
            .await?;
        expect_status("update app version", &resp, StatusCode::OK)?;
        info!("Application version updated successfully.");
        Ok(())
    }

    async fn promote_app_version(
        &self,
        application_key: &str,
        version: &str,
        request: &PromoteAppVersionRequest,
        sync: bool,
    ) -> Result<()> {
        let endpoint = format!("{}/promote", version_endpoint(application_key, version));
        let resp = self
            .client
            .post_json(&endpoint, &async_query(sync), request)
            .await?;
        expect_not_client_or_server_error("promote app version", &resp)?;
        print_body(&resp);
        Ok(())
    }

    async fn release_app_version(
        &self,
        application_key: &str,
        version: &str,
        request: &ReleaseAppVersionRequest,
        sync: bool,
    ) -> Result<()> {
        let endpoint = format!("{}/release", version_endpoint(application_key, version));
        let resp = self
            .client
            .post_json(&endpoint, &async_query(sync), request)
            .await?;
        expect_not_client_or_server_error("release app version", &resp)?;
        print_body(&resp);
        Ok(())
    }

    async fn rollback_app_version(
        &self,
        application_key: &str,
        version: &str,
        request: &RollbackAppVersionRequest,
        sync: bool,
    ) -> Result<()> {
        let endpoint = format!("{}/rollback", version_endpoint(application_key, version));
        let resp = self
            .client
            .post_json(&endpoint, &async_query(sync), request)
            .await?;
        expect_status(
            "rollback app version",
            &resp,
            sync_status(sync, StatusCode::OK, StatusCode::ACCEPTED),
        )?;
        print_body(&resp);
        Ok(())
    }

    async fn delete_app_version(&self, application_key: &str, version: &str) -> Result<()> {
        let resp = self
            .client
            .delete(
                &version_endpoint(application_key, version),
                &[("async", "false".to_string())],
            )
            .await?;
        expect_status("delete app version", &resp, StatusCode::NO_CONTENT)?;
        info!("Application version deleted successfully.");
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let resp = self.client.get("system/ping").await?;
        if resp.status != StatusCode::OK {
            return Err(failure("ping", &resp));
        }
        print_body(&resp);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(versions_endpoint("app"), "applications/app/versions/");
        assert_eq!(version_endpoint("app", "1.0.0"), "applications/app/versions/1.0.0");
        assert_eq!(async_query(true), [("async", "false".to_string())]);
        assert_eq!(async_query(false), [("async", "true".to_string())]);
    }
}
