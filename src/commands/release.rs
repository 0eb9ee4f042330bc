use crate::model::{PromotionType, ReleaseAppVersionRequest};
use crate::service::{HttpVersionService, VersionService};
use crate::sources::grammar::{parse_list_flag, parse_map_flag};
use crate::GlobalOpts;
use anyhow::Result;
use clap::{ArgAction, Args};

#[derive(Args, Debug, Clone)]
pub struct ReleaseArgs {
    /// Application key
    pub application_key: String,
    /// Version to release
    pub version: String,
    /// How artifacts move to the release repositories: copy, move or dry_run
    #[arg(long)]
    pub promotion_type: Option<String>,
    /// Only release into these repositories, e.g. "repo1;repo2"
    #[arg(long)]
    pub include_repos: Option<String>,
    /// Skip these repositories, e.g. "repo1;repo2"
    #[arg(long)]
    pub exclude_repos: Option<String>,
    /// Properties added to every released artifact, e.g. "key1=value1;key2=value2"
    #[arg(long)]
    pub props: Option<String>,
    /// Wait for the operation to finish
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub sync: bool,
}

pub fn build_request(args: &ReleaseArgs) -> Result<ReleaseAppVersionRequest> {
    let artifact_additional_properties = match &args.props {
        Some(raw) => parse_map_flag(raw)?,
        None => Default::default(),
    };
    Ok(ReleaseAppVersionRequest {
        promotion_type: PromotionType::from_flag_with_dry_run(args.promotion_type.as_deref())?,
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
        artifact_additional_properties,
    })
}

pub async fn send<S: VersionService>(
    service: &S,
    args: &ReleaseArgs,
    request: &ReleaseAppVersionRequest,
) -> Result<()> {
    service
        .release_app_version(&args.application_key, &args.version, request, args.sync)
        .await
}

pub async fn execute<S: VersionService>(service: &S, args: &ReleaseArgs) -> Result<()> {
    let request = build_request(args)?;
    send(service, args, &request).await
}

pub async fn run(args: ReleaseArgs, global: &GlobalOpts) -> Result<()> {
    let request = build_request(&args)?;
    let service = HttpVersionService::new(super::connect(global)?);
    send(&service, &args, &request).await
}
