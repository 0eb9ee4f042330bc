use super::application::{business_criticality, maturity_level, ApplicationFlags};
use crate::constants::PROJECT_FLAG;
use crate::model::AppDescriptor;
use crate::service::{ApplicationService, HttpApplicationService};
use crate::GlobalOpts;
use anyhow::{bail, Result};
use clap::Args;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct AppCreateArgs {
    /// Key of the application to create
    pub application_key: String,
    /// Project the application belongs to
    #[arg(long = PROJECT_FLAG)]
    pub project: Option<String>,
    #[command(flatten)]
    pub fields: ApplicationFlags,
}

/// Assemble the create body. The name defaults to the key and both enums
/// default to `unspecified`.
pub fn build_request(args: &AppCreateArgs) -> Result<AppDescriptor> {
    let project_key = match args.project.as_deref().map(str::trim) {
        Some(project) if !project.is_empty() => project.to_string(),
        _ => bail!("--{} is mandatory", PROJECT_FLAG),
    };
    let mut descriptor = AppDescriptor {
        application_key: args.application_key.clone(),
        application_name: Some(args.application_key.clone()),
        project_key: Some(project_key),
        business_criticality: Some(business_criticality(None)?),
        maturity_level: Some(maturity_level(None)?),
        ..Default::default()
    };
    args.fields.apply(&mut descriptor)?;
    descriptor.description = descriptor.description.filter(|d| !d.is_empty());
    descriptor.labels = descriptor.labels.filter(|l| !l.is_empty());
    descriptor.user_owners = descriptor.user_owners.filter(|o| !o.is_empty());
    descriptor.group_owners = descriptor.group_owners.filter(|o| !o.is_empty());
    Ok(descriptor)
}

pub async fn send<S: ApplicationService>(service: &S, request: &AppDescriptor) -> Result<()> {
    service.create_application(request).await?;
    info!(app = %request.application_key, "application created");
    Ok(())
}

pub async fn execute<S: ApplicationService>(service: &S, args: &AppCreateArgs) -> Result<()> {
    let request = build_request(args)?;
    send(service, &request).await
}

pub async fn run(args: AppCreateArgs, global: &GlobalOpts) -> Result<()> {
    let request = build_request(&args)?;
    let service = HttpApplicationService::new(super::connect(global)?);
    send(&service, &request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fake::{Call, RecordingService};
    use serde_json::json;

    fn args() -> AppCreateArgs {
        AppCreateArgs {
            application_key: "web-app".into(),
            project: Some("payments".into()),
            fields: ApplicationFlags::default(),
        }
    }

    #[tokio::test]
    async fn test_create_with_defaults() {
        let service = RecordingService::default();
        execute(&service, &args()).await.unwrap();

        let calls = service.calls();
        let [Call::CreateApp(descriptor)] = calls.as_slice() else {
            panic!("unexpected calls: {calls:?}");
        };
        assert_eq!(
            serde_json::to_value(descriptor).unwrap(),
            json!({
                "application_key": "web-app",
                "application_name": "web-app",
                "project_key": "payments",
                "maturity_level": "unspecified",
                "criticality": "unspecified",
            })
        );
    }

    #[test]
    fn test_create_with_every_field() {
        let args = AppCreateArgs {
            fields: ApplicationFlags {
                application_name: Some("Web App".into()),
                description: Some("storefront".into()),
                business_criticality: Some("high".into()),
                maturity_level: Some("production".into()),
                labels: Some("env=prod;team=web".into()),
                user_owners: Some("alice;bob".into()),
                group_owners: Some("dev".into()),
            },
            ..args()
        };
        let descriptor = build_request(&args).unwrap();
        assert_eq!(descriptor.application_name.as_deref(), Some("Web App"));
        assert_eq!(descriptor.description.as_deref(), Some("storefront"));
        assert_eq!(descriptor.business_criticality.as_deref(), Some("high"));
        assert_eq!(descriptor.maturity_level.as_deref(), Some("production"));
        assert_eq!(descriptor.labels.as_ref().unwrap()["team"], "web");
        assert_eq!(descriptor.user_owners, Some(vec!["alice".into(), "bob".into()]));
        assert_eq!(descriptor.group_owners, Some(vec!["dev".into()]));
    }

    #[tokio::test]
    async fn test_project_is_mandatory() {
        let service = RecordingService::default();
        for project in [None, Some(String::new())] {
            let args = AppCreateArgs { project, ..args() };
            let err = execute(&service, &args).await.unwrap_err();
            assert_eq!(err.to_string(), "--project is mandatory");
        }
        assert!(service.calls().is_empty());
    }

    #[test]
    fn test_invalid_maturity_level_is_rejected() {
        let args = AppCreateArgs {
            fields: ApplicationFlags {
                maturity_level: Some("beta".into()),
                ..Default::default()
            },
            ..args()
        };
        assert!(build_request(&args)
            .unwrap_err()
            .to_string()
            .starts_with("invalid value 'beta' for --maturity-level"));
    }
}
