//! `package-bind` and `package-unbind`.

use crate::model::BindPackageRequest;
use crate::service::{HttpPackageService, PackageService};
use crate::sources::grammar::parse_comma_list;
use crate::GlobalOpts;
use anyhow::{bail, Result};
use clap::Args;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct BindArgs {
    /// Application to bind the package to
    pub application_key: String,
    /// Package type, e.g. npm, docker, maven, generic
    pub package_type: String,
    /// Package name
    pub package_name: String,
    /// Comma-separated versions, e.g. "1.0.0,1.1.0"
    pub package_versions: String,
}

#[derive(Args, Debug, Clone)]
pub struct UnbindArgs {
    /// Application to unbind the package from
    pub application_key: String,
    /// Package type, e.g. npm, docker, maven, generic
    pub package_type: String,
    /// Package name
    pub package_name: String,
    /// Comma-separated versions; every version when omitted
    pub package_versions: Option<String>,
}

fn request(
    application_key: &str,
    package_type: &str,
    name: &str,
    versions: Option<&str>,
) -> BindPackageRequest {
    BindPackageRequest {
        application_key: application_key.to_string(),
        package_type: package_type.to_string(),
        name: name.to_string(),
        versions: versions.map(parse_comma_list).unwrap_or_default(),
    }
}

pub fn build_bind_request(args: &BindArgs) -> Result<BindPackageRequest> {
    let request = request(
        &args.application_key,
        &args.package_type,
        &args.package_name,
        Some(args.package_versions.as_str()),
    );
    if request.versions.is_empty() {
        bail!("at least one package version is required to bind");
    }
    Ok(request)
}

pub fn build_unbind_request(args: &UnbindArgs) -> BindPackageRequest {
    request(
        &args.application_key,
        &args.package_type,
        &args.package_name,
        args.package_versions.as_deref(),
    )
}

pub async fn send_bind<S: PackageService>(service: &S, request: &BindPackageRequest) -> Result<()> {
    service.bind_package(request).await?;
    info!(app = %request.application_key, package = %request.name, "package bound");
    Ok(())
}

pub async fn send_unbind<S: PackageService>(service: &S, request: &BindPackageRequest) -> Result<()> {
    service.unbind_package(request).await?;
    info!(app = %request.application_key, package = %request.name, "package unbound");
    Ok(())
}

pub async fn bind<S: PackageService>(service: &S, args: &BindArgs) -> Result<()> {
    let request = build_bind_request(args)?;
    send_bind(service, &request).await
}

pub async fn unbind<S: PackageService>(service: &S, args: &UnbindArgs) -> Result<()> {
    send_unbind(service, &build_unbind_request(args)).await
}

pub async fn run_bind(args: BindArgs, global: &GlobalOpts) -> Result<()> {
    let request = build_bind_request(&args)?;
    let service = HttpPackageService::new(super::connect(global)?);
    send_bind(&service, &request).await
}

pub async fn run_unbind(args: UnbindArgs, global: &GlobalOpts) -> Result<()> {
    let request = build_unbind_request(&args);
    let service = HttpPackageService::new(super::connect(global)?);
    send_unbind(&service, &request).await
}
