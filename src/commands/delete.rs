use crate::service::{HttpVersionService, VersionService};
use crate::GlobalOpts;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// Application key
    pub application_key: String,
    /// Version to delete
    pub version: String,
}

pub async fn execute<S: VersionService>(service: &S, args: &DeleteArgs) -> Result<()> {
    service
        .delete_app_version(&args.application_key, &args.version)
        .await
}

pub async fn run(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    execute(&HttpVersionService::new(super::connect(global)?), &args).await
}
