use crate::model::RollbackAppVersionRequest;
use crate::service::{HttpVersionService, VersionService};
use crate::GlobalOpts;
use anyhow::Result;
use clap::{ArgAction, Args};

#[derive(Args, Debug, Clone)]
pub struct RollbackArgs {
    /// Application key
    pub application_key: String,
    /// Version to roll back
    pub version: String,
    /// Stage to roll the version back from
    pub from_stage: String,
    /// Wait for the operation to finish
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub sync: bool,
}

fn request(args: &RollbackArgs) -> RollbackAppVersionRequest {
    RollbackAppVersionRequest {
        from_stage: args.from_stage.clone(),
    }
}

pub async fn execute<S: VersionService>(service: &S, args: &RollbackArgs) -> Result<()> {
    service
        .rollback_app_version(&args.application_key, &args.version, &request(args), args.sync)
        .await
}

pub async fn run(args: RollbackArgs, global: &GlobalOpts) -> Result<()> {
    execute(&HttpVersionService::new(super::connect(global)?), &args).await
}
