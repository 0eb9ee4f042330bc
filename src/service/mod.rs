//! Platform operations behind the commands.
//!
//! Each service trait is the seam between the commands and the network:
//! commands build a request and hand it to a service, the HTTP
//! implementations turn it into a call and translate the response status.

use crate::client::ApiResponse;
use anyhow::Result;
use reqwest::StatusCode;

pub mod applications;
pub mod packages;
pub mod versions;

pub use applications::{ApplicationService, HttpApplicationService};
pub use packages::{HttpPackageService, PackageService};
pub use versions::{HttpVersionService, UpdateSourcesOptions, VersionService};

/// The status a sync/async pair of calls must answer with.
pub(crate) fn sync_status(sync: bool, sync_code: StatusCode, async_code: StatusCode) -> StatusCode {
    if sync {
        sync_code
    } else {
        async_code
    }
}

pub(crate) fn failure(operation: &str, resp: &ApiResponse) -> anyhow::Error {
    anyhow::anyhow!(
        "failed to {}. Status code: {}.\n{}",
        operation,
        resp.status.as_u16(),
        resp.body
    )
}

/// Accept exactly `expected`.
pub(crate) fn expect_status(operation: &str, resp: &ApiResponse, expected: StatusCode) -> Result<()> {
    if resp.status != expected {
        return Err(failure(operation, resp));
    }
    Ok(())
}

/// Accept anything below 400.
pub(crate) fn expect_not_client_or_server_error(operation: &str, resp: &ApiResponse) -> Result<()> {
    if resp.status.is_client_error() || resp.status.is_server_error() {
        return Err(failure(operation, resp));
    }
    Ok(())
}

pub(crate) fn print_body(resp: &ApiResponse) {
    if !resp.body.trim().is_empty() {
        println!("{}", resp.body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> ApiResponse {
        ApiResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_sync_status_selection() {
        assert_eq!(
            sync_status(true, StatusCode::CREATED, StatusCode::ACCEPTED),
            StatusCode::CREATED
        );
        assert_eq!(
            sync_status(false, StatusCode::CREATED, StatusCode::ACCEPTED),
            StatusCode::ACCEPTED
        );
    }

    #[test]
    fn test_expect_status_reports_code_and_body() {
        assert!(expect_status("create app version", &response(201, ""), StatusCode::CREATED).is_ok());

        let err = expect_status(
            "create app version",
            &response(409, "{\"message\":\"exists\"}"),
            StatusCode::CREATED,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to create app version. Status code: 409.\n{\"message\":\"exists\"}"
        );
    }

    #[test]
    fn test_async_status_is_strict() {
        // a sync answer to an async request is still a failure
        let expected = sync_status(false, StatusCode::OK, StatusCode::ACCEPTED);
        assert!(expect_status("rollback app version", &response(200, ""), expected).is_err());
    }

    #[test]
    fn test_below_400_is_accepted_for_promote_and_release() {
        for status in [200, 202, 204, 302] {
            assert!(expect_not_client_or_server_error("promote app version", &response(status, "")).is_ok());
        }
        for status in [400, 404, 500] {
            let err = expect_not_client_or_server_error("release app version", &response(status, "boom"))
                .unwrap_err();
            assert!(err.to_string().starts_with("failed to release app version. Status code:"));
        }
    }

    #[test]
    fn test_bind_failures_name_the_operation() {
        for status in [400, 401, 404, 500] {
            let err = expect_status("bind package", &response(status, ""), StatusCode::CREATED)
                .unwrap_err();
            assert!(err
                .to_string()
                .starts_with(&format!("failed to bind package. Status code: {status}")));
        }
    }
}
