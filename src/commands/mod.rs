use crate::client::PlatformClient;
use crate::config::{load_servers_config, servers_config_path, ServerDetails};
use crate::GlobalOpts;
use anyhow::Result;
use clap::Subcommand;
use tracing::debug;

pub mod app_create;
pub mod app_update;
pub mod application;
pub mod completions;
pub mod create;
pub mod delete;
pub mod package;
pub mod ping;
pub mod promote;
pub mod release;
pub mod rollback;
pub mod server;
pub mod update;
pub mod update_sources;

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        visible_alias = "vc",
        about = "Create a new application version from packages, builds, release bundles, versions or artifacts"
    )]
    VersionCreate(create::CreateArgs),
    #[command(
        visible_alias = "vus",
        about = "Add sources to an existing draft application version"
    )]
    VersionUpdateSources(update_sources::UpdateSourcesArgs),
    #[command(
        visible_alias = "vu",
        about = "Update the tag and properties of an application version"
    )]
    VersionUpdate(update::UpdateArgs),
    #[command(visible_alias = "vp", about = "Promote an application version to a stage")]
    VersionPromote(promote::PromoteArgs),
    #[command(visible_alias = "vr", about = "Release an application version")]
    VersionRelease(release::ReleaseArgs),
    #[command(
        visible_alias = "vrb",
        about = "Roll back an application version from a stage"
    )]
    VersionRollback(rollback::RollbackArgs),
    #[command(visible_alias = "vd", about = "Delete an application version")]
    VersionDelete(delete::DeleteArgs),
    #[command(visible_alias = "ac", about = "Create a new application")]
    AppCreate(app_create::AppCreateArgs),
    #[command(
        visible_alias = "au",
        about = "Update the given fields of an existing application"
    )]
    AppUpdate(app_update::AppUpdateArgs),
    #[command(visible_alias = "pb", about = "Bind package versions to an application")]
    PackageBind(package::BindArgs),
    #[command(
        visible_alias = "pu",
        about = "Unbind package versions, or every version, from an application"
    )]
    PackageUnbind(package::UnbindArgs),
    #[command(visible_alias = "p", about = "Ping the AppTrust server")]
    Ping,
    #[command(about = "Subcommand: manage server profiles (add/list/remove)")]
    Server {
        #[command(subcommand)]
        cmd: server::ServerCommands,
    },
    #[command(about = "Emit shell completion scripts (bash/zsh/fish)")]
    Completions { shell: String },
}

pub async fn run(cmd: Commands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        Commands::VersionCreate(args) => create::run(args, global).await,
        Commands::VersionUpdateSources(args) => update_sources::run(args, global).await,
        Commands::VersionUpdate(args) => update::run(args, global).await,
        Commands::VersionPromote(args) => promote::run(args, global).await,
        Commands::VersionRelease(args) => release::run(args, global).await,
        Commands::VersionRollback(args) => rollback::run(args, global).await,
        Commands::VersionDelete(args) => delete::run(args, global).await,
        Commands::AppCreate(args) => app_create::run(args, global).await,
        Commands::AppUpdate(args) => app_update::run(args, global).await,
        Commands::PackageBind(args) => package::run_bind(args, global).await,
        Commands::PackageUnbind(args) => package::run_unbind(args, global).await,
        Commands::Ping => ping::run(global).await,
        Commands::Server { cmd } => server::run(cmd),
        Commands::Completions { shell } => completions::run(shell),
    }
}

/// Resolve connection details into an authenticated client.
pub(crate) fn connect(global: &GlobalOpts) -> Result<PlatformClient> {
    let servers = load_servers_config(&servers_config_path())?;
    let details = ServerDetails::resolve(global, &servers)?;
    debug!(url = %details.url, authenticated = details.access_token.is_some(), "connecting");
    PlatformClient::new(&details)
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory services that record every call.

    use crate::model::*;
    use crate::service::{ApplicationService, PackageService, UpdateSourcesOptions, VersionService};
    use anyhow::{bail, Result};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Create(CreateAppVersionRequest, bool),
        UpdateSources(String, String, UpdateVersionSourcesRequest, UpdateSourcesOptions),
        Update(String, String, UpdateAppVersionRequest),
        Promote(String, String, PromoteAppVersionRequest, bool),
        Release(String, String, ReleaseAppVersionRequest, bool),
        Rollback(String, String, RollbackAppVersionRequest, bool),
        Delete(String, String),
        Ping,
        CreateApp(AppDescriptor),
        UpdateApp(AppDescriptor),
        Bind(BindPackageRequest),
        Unbind(BindPackageRequest),
    }

    #[derive(Default)]
    pub struct RecordingService {
        pub calls: Mutex<Vec<Call>>,
        pub fail_with: Option<String>,
    }

    impl RecordingService {
        pub fn failing(message: &str) -> Self {
            RecordingService {
                fail_with: Some(message.to_string()),
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) -> Result<()> {
            self.calls.lock().unwrap().push(call);
            match &self.fail_with {
                Some(message) => bail!("{message}"),
                None => Ok(()),
            }
        }
    }

    impl VersionService for RecordingService {
        async fn create_app_version(
            &self,
            request: &CreateAppVersionRequest,
            sync: bool,
        ) -> Result<()> {
            self.record(Call::Create(request.clone(), sync))
        }

        async fn update_app_version_sources(
            &self,
            application_key: &str,
            version: &str,
            request: &UpdateVersionSourcesRequest,
            options: UpdateSourcesOptions,
        ) -> Result<()> {
            self.record(Call::UpdateSources(
                application_key.into(),
                version.into(),
                request.clone(),
                options,
            ))
        }

        async fn update_app_version(
            &self,
            application_key: &str,
            version: &str,
            request: &UpdateAppVersionRequest,
        ) -> Result<()> {
            self.record(Call::Update(
                application_key.into(),
                version.into(),
                request.clone(),
            ))
        }

        async fn promote_app_version(
            &self,
            application_key: &str,
            version: &str,
            request: &PromoteAppVersionRequest,
            sync: bool,
        ) -> Result<()> {
            self.record(Call::Promote(
                application_key.into(),
                version.into(),
                request.clone(),
                sync,
            ))
        }

        async fn release_app_version(
            &self,
            application_key: &str,
            version: &str,
            request: &ReleaseAppVersionRequest,
            sync: bool,
        ) -> Result<()> {
            self.record(Call::Release(
                application_key.into(),
                version.into(),
                request.clone(),
                sync,
            ))
        }

        async fn rollback_app_version(
            &self,
            application_key: &str,
            version: &str,
            request: &RollbackAppVersionRequest,
            sync: bool,
        ) -> Result<()> {
            self.record(Call::Rollback(
                application_key.into(),
                version.into(),
                request.clone(),
                sync,
            ))
        }

        async fn delete_app_version(&self, application_key: &str, version: &str) -> Result<()> {
            self.record(Call::Delete(application_key.into(), version.into()))
        }

        async fn ping(&self) -> Result<()> {
            self.record(Call::Ping)
        }
    }

    impl ApplicationService for RecordingService {
        async fn create_application(&self, descriptor: &AppDescriptor) -> Result<()> {
            self.record(Call::CreateApp(descriptor.clone()))
        }

        async fn update_application(&self, descriptor: &AppDescriptor) -> Result<()> {
            self.record(Call::UpdateApp(descriptor.clone()))
        }
    }

    impl PackageService for RecordingService {
        async fn bind_package(&self, request: &BindPackageRequest) -> Result<()> {
            self.record(Call::Bind(request.clone()))
        }

        async fn unbind_package(&self, request: &BindPackageRequest) -> Result<()> {
            self.record(Call::Unbind(request.clone()))
        }
    }
}
