use super::application::ApplicationFlags;
use crate::model::{AppDescriptor, LabelUpdates};
use crate::service::{ApplicationService, HttpApplicationService};
use crate::sources::grammar::parse_label_pairs;
use crate::GlobalOpts;
use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct AppUpdateArgs {
    /// Key of the application to update
    pub application_key: String,
    #[command(flatten)]
    pub fields: ApplicationFlags,
    /// Labels to add; a key may repeat, e.g. "env=prod;env=staging"
    #[arg(long)]
    pub add_labels: Option<String>,
    /// Labels to remove, e.g. "env=dev"
    #[arg(long)]
    pub remove_labels: Option<String>,
}

/// Only flags given on the command line end up in the body.
pub fn build_request(args: &AppUpdateArgs) -> Result<AppDescriptor> {
    let mut descriptor = AppDescriptor {
        application_key: args.application_key.clone(),
        ..Default::default()
    };
    args.fields.apply(&mut descriptor)?;

    if args.add_labels.is_some() || args.remove_labels.is_some() {
        let mut updates = LabelUpdates::default();
        if let Some(raw) = &args.add_labels {
            updates.add = parse_label_pairs(raw).context("failed to parse --add-labels")?;
        }
        if let Some(raw) = &args.remove_labels {
            updates.remove = parse_label_pairs(raw).context("failed to parse --remove-labels")?;
        }
        descriptor.label_updates = Some(updates);
    }
    Ok(descriptor)
}

pub async fn send<S: ApplicationService>(service: &S, request: &AppDescriptor) -> Result<()> {
    service.update_application(request).await?;
    info!(app = %request.application_key, "application updated");
    Ok(())
}

pub async fn execute<S: ApplicationService>(service: &S, args: &AppUpdateArgs) -> Result<()> {
    let request = build_request(args)?;
    send(service, &request).await
}

pub async fn run(args: AppUpdateArgs, global: &GlobalOpts) -> Result<()> {
    let request = build_request(&args)?;
    let service = HttpApplicationService::new(super::connect(global)?);
    send(&service, &request).await
}
