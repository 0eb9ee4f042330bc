use crate::model::CreateAppVersionRequest;
use crate::service::{HttpVersionService, VersionService};
use crate::sources::{self, SourceFlags};
use crate::GlobalOpts;
use anyhow::Result;
use clap::{ArgAction, Args};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Application key
    pub application_key: String,
    /// Version to create
    pub version: String,
    #[command(flatten)]
    pub sources: SourceFlags,
    /// Tag for the new version
    #[arg(long)]
    pub tag: Option<String>,
    /// Wait for the operation to finish
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub sync: bool,
}

/// Resolve sources and assemble the request body.
pub fn build_request(args: &CreateArgs) -> Result<CreateAppVersionRequest> {
    let (sources, filters) = sources::resolve(&args.sources)?;
    Ok(CreateAppVersionRequest {
        application_key: args.application_key.clone(),
        version: args.version.clone(),
        sources,
        filters,
        tag: args.tag.clone().filter(|t| !t.is_empty()),
    })
}

pub async fn send<S: VersionService>(
    service: &S,
    args: &CreateArgs,
    request: &CreateAppVersionRequest,
) -> Result<()> {
    service.create_app_version(request, args.sync).await?;
    info!(app = %args.application_key, version = %args.version, "version created");
    Ok(())
}

pub async fn execute<S: VersionService>(service: &S, args: &CreateArgs) -> Result<()> {
    let request = build_request(args)?;
    send(service, args, &request).await
}

pub async fn run(args: CreateArgs, global: &GlobalOpts) -> Result<()> {
    // Source errors surface before any connection configuration is required.
    let request = build_request(&args)?;
    let service = HttpVersionService::new(super::connect(global)?);
    send(&service, &args, &request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fake::{Call, RecordingService};
    use crate::error::SourceError;

    fn args(sources: SourceFlags) -> CreateArgs {
        CreateArgs {
            application_key: "app-key".into(),
            version: "1.0.0".into(),
            sources,
            tag: None,
            sync: true,
        }
    }

    #[tokio::test]
    async fn test_create_from_packages() {
        let service = RecordingService::default();
        let mut args = args(SourceFlags {
            packages: Some("type=npm,name=pkg,version=1.2.3,repo-key=npm-local".into()),
            ..Default::default()
        });
        args.tag = Some("release".into());
        args.sync = false;

        execute(&service, &args).await.unwrap();

        let calls = service.calls();
        let [Call::Create(request, sync)] = calls.as_slice() else {
            panic!("unexpected calls: {calls:?}");
        };
        assert!(!sync);
        assert_eq!(request.application_key, "app-key");
        assert_eq!(request.tag.as_deref(), Some("release"));
        assert_eq!(request.sources.packages[0].repository_key, "npm-local");
        assert_eq!(request.filters, None);
    }

    #[tokio::test]
    async fn test_source_errors_stop_before_the_service() {
        let service = RecordingService::default();
        let err = execute(&service, &args(SourceFlags::default()))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::NoSource)
        ));
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_service_errors_propagate() {
        let service = RecordingService::failing("failed to create app version. Status code: 409.\n");
        let err = execute(
            &service,
            &args(SourceFlags {
                artifacts: Some("path=generic-local/app.tar.gz".into()),
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Status code: 409"));
    }

    #[test]
    fn test_empty_tag_is_omitted() {
        let mut args = args(SourceFlags {
            builds: Some("name=web,id=7".into()),
            ..Default::default()
        });
        args.tag = Some(String::new());
        assert_eq!(build_request(&args).unwrap().tag, None);
    }
}
