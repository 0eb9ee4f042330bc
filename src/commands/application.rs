//! Flags shared by `app-create` and `app-update`.

use crate::constants::{BUSINESS_CRITICALITY_FLAG, MATURITY_LEVEL_FLAG};
use crate::model::{AppDescriptor, BUSINESS_CRITICALITY_VALUES, MATURITY_LEVEL_VALUES};
use crate::sources::grammar::{parse_enum_flag, parse_list_flag, parse_map_flag};
use anyhow::{Context, Result};
use clap::Args;

const UNSPECIFIED: &str = "unspecified";

#[derive(Args, Debug, Clone, Default)]
pub struct ApplicationFlags {
    /// Display name of the application
    #[arg(long)]
    pub application_name: Option<String>,
    /// Free-text description
    #[arg(long = "desc")]
    pub description: Option<String>,
    /// One of unspecified, low, medium, high, critical
    #[arg(long = BUSINESS_CRITICALITY_FLAG)]
    pub business_criticality: Option<String>,
    /// One of unspecified, experimental, production, end_of_life
    #[arg(long = MATURITY_LEVEL_FLAG)]
    pub maturity_level: Option<String>,
    /// Labels, e.g. "env=prod;team=web"
    #[arg(long)]
    pub labels: Option<String>,
    /// Owning users, e.g. "alice;bob"
    #[arg(long)]
    pub user_owners: Option<String>,
    /// Owning groups, e.g. "dev;ops"
    #[arg(long)]
    pub group_owners: Option<String>,
}

pub(crate) fn business_criticality(value: Option<&str>) -> Result<String> {
    parse_enum_flag(
        BUSINESS_CRITICALITY_FLAG,
        value,
        UNSPECIFIED,
        &BUSINESS_CRITICALITY_VALUES,
    )
    .map(str::to_string)
}

pub(crate) fn maturity_level(value: Option<&str>) -> Result<String> {
    parse_enum_flag(MATURITY_LEVEL_FLAG, value, UNSPECIFIED, &MATURITY_LEVEL_VALUES)
        .map(str::to_string)
}

impl ApplicationFlags {
    /// Copy every given flag onto `descriptor`; absent flags leave it untouched.
    pub(crate) fn apply(&self, descriptor: &mut AppDescriptor) -> Result<()> {
        if let Some(name) = self.application_name.as_ref().filter(|n| !n.is_empty()) {
            descriptor.application_name = Some(name.clone());
        }
        if let Some(description) = &self.description {
            descriptor.description = Some(description.clone());
        }
        if let Some(value) = &self.business_criticality {
            descriptor.business_criticality = Some(business_criticality(Some(value))?);
        }
        if let Some(value) = &self.maturity_level {
            descriptor.maturity_level = Some(maturity_level(Some(value))?);
        }
        if let Some(raw) = &self.labels {
            let labels = parse_map_flag(raw).context("failed to parse --labels")?;
            descriptor.labels = Some(labels);
        }
        if let Some(raw) = &self.user_owners {
            descriptor.user_owners = Some(parse_list_flag(raw));
        }
        if let Some(raw) = &self.group_owners {
            descriptor.group_owners = Some(parse_list_flag(raw));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_flags_leave_descriptor_untouched() {
        let mut descriptor = AppDescriptor {
            application_key: "app".into(),
            ..Default::default()
        };
        ApplicationFlags::default().apply(&mut descriptor).unwrap();
        assert_eq!(
            serde_json::to_value(&descriptor).unwrap(),
            serde_json::json!({"application_key": "app"})
        );
    }

    #[test]
    fn test_enum_flags_are_checked() {
        assert_eq!(business_criticality(None).unwrap(), "unspecified");
        assert_eq!(maturity_level(Some("end_of_life")).unwrap(), "end_of_life");
        assert_eq!(
            business_criticality(Some("urgent")).unwrap_err().to_string(),
            "invalid value 'urgent' for --business-criticality: must be one of unspecified, low, medium, high, critical"
        );
    }

    #[test]
    fn test_malformed_labels_name_the_flag() {
        let flags = ApplicationFlags {
            labels: Some("env=prod;broken".into()),
            ..Default::default()
        };
        let err = flags.apply(&mut AppDescriptor::default()).unwrap_err();
        assert_eq!(err.to_string(), "failed to parse --labels");
        assert!(format!("{err:#}").contains("invalid key-value pair: 'broken'"));
    }
}
