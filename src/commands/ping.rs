use crate::service::{HttpVersionService, VersionService};
use crate::GlobalOpts;
use anyhow::Result;

pub async fn execute<S: VersionService>(service: &S) -> Result<()> {
    service.ping().await
}

pub async fn run(global: &GlobalOpts) -> Result<()> {
    execute(&HttpVersionService::new(super::connect(global)?)).await
}
