use crate::model::UpdateAppVersionRequest;
use crate::service::{HttpVersionService, VersionService};
use crate::sources::grammar::{parse_list_flag, parse_properties_flag};
use crate::GlobalOpts;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Application key
    pub application_key: String,
    /// Version to update
    pub version: String,
    /// New tag; an empty value removes the current tag
    #[arg(long)]
    pub tag: Option<String>,
    /// Properties to set, e.g. "status=rc,validated;owner=team-a"
    #[arg(long)]
    pub properties: Option<String>,
    /// Property keys to delete, e.g. "old-key;legacy"
    #[arg(long)]
    pub delete_properties: Option<String>,
}

pub fn build_request(args: &UpdateArgs) -> Result<UpdateAppVersionRequest> {
    let properties = match &args.properties {
        Some(raw) => parse_properties_flag(raw)?,
        None => Default::default(),
    };
    let delete_properties = args
        .delete_properties
        .as_deref()
        .map(parse_list_flag)
        .unwrap_or_default();
    Ok(UpdateAppVersionRequest {
        tag: args.tag.clone(),
        properties,
        delete_properties,
    })
}

pub async fn send<S: VersionService>(
    service: &S,
    args: &UpdateArgs,
    request: &UpdateAppVersionRequest,
) -> Result<()> {
    service
        .update_app_version(&args.application_key, &args.version, request)
        .await
}

pub async fn execute<S: VersionService>(service: &S, args: &UpdateArgs) -> Result<()> {
    let request = build_request(args)?;
    send(service, args, &request).await
}

pub async fn run(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let request = build_request(&args)?;
    let service = HttpVersionService::new(super::connect(global)?);
    send(&service, &args, &request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fake::{Call, RecordingService};

    fn args() -> UpdateArgs {
        UpdateArgs {
            application_key: "app".into(),
            version: "1.0.0".into(),
            tag: None,
            properties: None,
            delete_properties: None,
        }
    }

    #[tokio::test]
    async fn test_update_properties_and_deletions() {
        let service = RecordingService::default();
        let args = UpdateArgs {
            tag: Some(String::new()),
            properties: Some("status=rc,validated;cleared=".into()),
            delete_properties: Some("old;legacy;".into()),
            ..args()
        };
        execute(&service, &args).await.unwrap();

        let calls = service.calls();
        let [Call::Update(_, _, request)] = calls.as_slice() else {
            panic!("unexpected calls: {calls:?}");
        };
        assert_eq!(request.tag.as_deref(), Some(""));
        assert_eq!(request.properties["status"], vec!["rc", "validated"]);
        assert!(request.properties["cleared"].is_empty());
        assert_eq!(request.delete_properties, vec!["old", "legacy"]);
    }

    #[test]
    fn test_malformed_properties_are_rejected() {
        let args = UpdateArgs {
            properties: Some("no-equals-sign".into()),
            ..args()
        };
        let err = build_request(&args).unwrap_err();
        assert!(err.to_string().starts_with("invalid property format"));
    }

    #[test]
    fn test_nothing_to_change_sends_empty_body() {
        let request = build_request(&args()).unwrap();
        assert_eq!(serde_json::to_string(&request).unwrap(), "{}");
    }
}
