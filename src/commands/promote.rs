use crate::model::{PromoteAppVersionRequest, PromotionType};
use crate::service::{HttpVersionService, VersionService};
use crate::sources::grammar::parse_list_flag;
use crate::GlobalOpts;
use anyhow::Result;
use clap::{ArgAction, Args};

#[derive(Args, Debug, Clone)]
pub struct PromoteArgs {
    /// Application key
    pub application_key: String,
    /// Version to promote
    pub version: String,
    /// Target stage
    pub stage: String,
    /// How artifacts move to the target repositories: copy or move
    #[arg(long)]
    pub promotion_type: Option<String>,
    /// Validate the promotion without performing it
    #[arg(long)]
    pub dry_run: bool,
    /// Only promote into these repositories, e.g. "repo1;repo2"
    #[arg(long)]
    pub include_repos: Option<String>,
    /// Skip these repositories, e.g. "repo1;repo2"
    #[arg(long)]
    pub exclude_repos: Option<String>,
    /// Wait for the operation to finish
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub sync: bool,
}

pub fn build_request(args: &PromoteArgs) -> Result<PromoteAppVersionRequest> {
    let mut promotion_type = PromotionType::from_flag(args.promotion_type.as_deref())?;
    if args.dry_run {
        promotion_type = PromotionType::DryRun;
    }
    Ok(PromoteAppVersionRequest {
        stage: args.stage.clone(),
        promotion_type,
        included_repository_keys: args
            .include_repos
            .as_deref()
            .map(parse_list_flag)
            .unwrap_or_default(),
        excluded_repository_keys: args
            .exclude_repos
            .as_deref()
            .map(parse_list_flag)
            .unwrap_or_default(),
    })
}

pub async fn send<S: VersionService>(
    service: &S,
    args: &PromoteArgs,
    request: &PromoteAppVersionRequest,
) -> Result<()> {
    service
        .promote_app_version(&args.application_key, &args.version, request, args.sync)
        .await
}

pub async fn execute<S: VersionService>(service: &S, args: &PromoteArgs) -> Result<()> {
    let request = build_request(args)?;
    send(service, args, &request).await
}

pub async fn run(args: PromoteArgs, global: &GlobalOpts) -> Result<()> {
    let request = build_request(&args)?;
    let service = HttpVersionService::new(super::connect(global)?);
    send(&service, &args, &request).await
}
