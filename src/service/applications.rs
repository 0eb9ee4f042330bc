//! Application create and update.

use super::{expect_status, print_body};
use crate::client::PlatformClient;
use crate::model::AppDescriptor;
use anyhow::Result;
use reqwest::StatusCode;
use tracing::info;

#[allow(async_fn_in_trait)]
pub trait ApplicationService {
    async fn create_application(&self, descriptor: &AppDescriptor) -> Result<()>;

    /// Send only the fields set on `descriptor`.
    async fn update_application(&self, descriptor: &AppDescriptor) -> Result<()>;
}

pub struct HttpApplicationService {
    client: PlatformClient,
}

impl HttpApplicationService {
    pub fn new(client: PlatformClient) -> Self {
        HttpApplicationService { client }
    }
}

const APPLICATIONS_ENDPOINT: &str = "applications";

fn application_endpoint(application_key: &str) -> String {
    format!("{APPLICATIONS_ENDPOINT}/{application_key}")
}

impl ApplicationService for HttpApplicationService {
    async fn create_application(&self, descriptor: &AppDescriptor) -> Result<()> {
        let resp = self
            .client
            .post_json(APPLICATIONS_ENDPOINT, &[], descriptor)
            .await?;
        expect_status("create application", &resp, StatusCode::CREATED)?;
        info!("Application created successfully.");
        print_body(&resp);
        Ok(())
    }

    async fn update_application(&self, descriptor: &AppDescriptor) -> Result<()> {
        let resp = self
            .client
            .patch_json(
                &application_endpoint(&descriptor.application_key),
                &[],
                descriptor,
            )
            .await?;
        expect_status("update application", &resp, StatusCode::OK)?;
        info!("Application updated successfully.");
        print_body(&resp);
        Ok(())
    }
}
