use crate::model::UpdateVersionSourcesRequest;
use crate::service::{HttpVersionService, UpdateSourcesOptions, VersionService};
use crate::sources::{self, SourceFlags};
use crate::GlobalOpts;
use anyhow::Result;
use clap::{ArgAction, Args};

#[derive(Args, Debug, Clone)]
pub struct UpdateSourcesArgs {
    /// Application key
    pub application_key: String,
    /// Draft version to add sources to
    pub version: String,
    #[command(flatten)]
    pub sources: SourceFlags,
    /// Wait for the operation to finish
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub sync: bool,
    /// Validate the change without applying it
    #[arg(long)]
    pub dry_run: bool,
    /// Stop at the first source that cannot be added
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub fail_fast: bool,
}

impl UpdateSourcesArgs {
    fn options(&self) -> UpdateSourcesOptions {
        UpdateSourcesOptions {
            sync: self.sync,
            dry_run: self.dry_run,
            fail_fast: self.fail_fast,
        }
    }
}

pub fn build_request(args: &UpdateSourcesArgs) -> Result<UpdateVersionSourcesRequest> {
    let (add_sources, filters) = sources::resolve(&args.sources)?;
    Ok(UpdateVersionSourcesRequest {
        add_sources,
        filters,
    })
}

pub async fn send<S: VersionService>(
    service: &S,
    args: &UpdateSourcesArgs,
    request: &UpdateVersionSourcesRequest,
) -> Result<()> {
    service
        .update_app_version_sources(&args.application_key, &args.version, request, args.options())
        .await
}

pub async fn execute<S: VersionService>(service: &S, args: &UpdateSourcesArgs) -> Result<()> {
    let request = build_request(args)?;
    send(service, args, &request).await
}

pub async fn run(args: UpdateSourcesArgs, global: &GlobalOpts) -> Result<()> {
    let request = build_request(&args)?;
    let service = HttpVersionService::new(super::connect(global)?);
    send(&service, &args, &request).await
}
