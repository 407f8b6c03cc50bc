use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(TenantId);
id_newtype!(PropertyId);
id_newtype!(EventId);
id_newtype!(EvidenceId);

/// Simulated persona attached to every outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoRole {
    #[default]
    Exec,
    Am,
}

impl DemoRole {
    pub const ALL: [DemoRole; 2] = [DemoRole::Exec, DemoRole::Am];

    /// Wire value sent in the role header.
    pub fn as_str(self) -> &'static str {
        match self {
            DemoRole::Exec => "exec",
            DemoRole::Am => "am",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DemoRole::Exec => "Head of Assets",
            DemoRole::Am => "Asset Manager",
        }
    }
}

impl fmt::Display for DemoRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl std::str::FromStr for DemoRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exec" => Ok(DemoRole::Exec),
            "am" => Ok(DemoRole::Am),
            other => Err(UnknownVariant {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
    Critical,
    Watch,
    Stable,
    Improving,
}

impl TenantStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TenantStatus::Critical => "critical",
            TenantStatus::Watch => "watch",
            TenantStatus::Stable => "stable",
            TenantStatus::Improving => "improving",
        }
    }
}

impl fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for TenantStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(TenantStatus::Critical),
            "watch" => Ok(TenantStatus::Watch),
            "stable" => Ok(TenantStatus::Stable),
            "improving" => Ok(TenantStatus::Improving),
            other => Err(UnknownVariant {
                kind: "tenant status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Public,
    Private,
}

/// Source classification shared by events and evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    SecFiling,
    News,
    PressRelease,
    CourtFiling,
    CreditReport,
}

pub type EventType = SourceType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelType {
    Property,
    Tenant,
    Priority,
    Cluster,
}

impl PanelType {
    pub fn as_str(self) -> &'static str {
        match self {
            PanelType::Property => "property",
            PanelType::Tenant => "tenant",
            PanelType::Priority => "priority",
            PanelType::Cluster => "cluster",
        }
    }
}

impl fmt::Display for PanelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitoringStatus {
    #[default]
    Active,
    Paused,
    Scanning,
}

impl fmt::Display for MonitoringStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            MonitoringStatus::Active => "active",
            MonitoringStatus::Paused => "paused",
            MonitoringStatus::Scanning => "scanning",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanFrequency {
    Continuous,
    #[default]
    Hourly,
    Daily,
    Weekly,
}

impl ScanFrequency {
    pub fn label(self) -> &'static str {
        match self {
            ScanFrequency::Continuous => "Continuous",
            ScanFrequency::Hourly => "Hourly",
            ScanFrequency::Daily => "Daily",
            ScanFrequency::Weekly => "Weekly",
        }
    }
}

impl std::str::FromStr for ScanFrequency {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continuous" => Ok(ScanFrequency::Continuous),
            "hourly" => Ok(ScanFrequency::Hourly),
            "daily" => Ok(ScanFrequency::Daily),
            "weekly" => Ok(ScanFrequency::Weekly),
            other => Err(UnknownVariant {
                kind: "scan frequency",
                value: other.to_string(),
            }),
        }
    }
}
