//! Compute models shared by the client and its tests.

use chrono::{DateTime, Utc};
use nimbus_core::id::{BackupId, InstanceId};
use nimbus_core::pagination::Meta;
use nimbus_core::query::QueryParams;
use serde::{Deserialize, Serialize};

/// A virtual machine instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instance {
    /// Instance identifier.
    pub id: InstanceId,
    /// Human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Region the instance runs in.
    pub region: String,
    /// Plan identifier the instance was provisioned with.
    pub plan: String,
    /// Lifecycle status (`pending`, `active`, `stopped`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// RAM in MiB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram: Option<u64>,
    /// Number of virtual CPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcpu_count: Option<u32>,
    /// Operating system name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    /// Primary IPv4 address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_ip: Option<String>,
    /// Provisioning timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
    /// Arbitrary tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Payload for creating an instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateInstanceRequest {
    /// Target region.
    pub region: String,
    /// Plan identifier.
    pub plan: String,
    /// Optional label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Operating system identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_id: Option<u32>,
    /// Enable automatic backups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backups: Option<bool>,
    /// Tags to attach.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Payload for updating an instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UpdateInstanceRequest {
    /// New label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// New plan (resize).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    /// Replacement tag set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Filter and pagination parameters for instance listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceListParams {
    /// Page size.
    pub per_page: Option<u32>,
    /// Opaque pagination cursor.
    pub cursor: Option<String>,
    /// Restrict to a region.
    pub region: Option<String>,
    /// Restrict to a label.
    pub label: Option<String>,
}

impl InstanceListParams {
    /// Assemble the query parameters for this filter.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("region", self.region.as_deref());
        params.push_opt("label", self.label.as_deref());
        params.push_pagination(self.per_page, self.cursor.as_deref());
        params
    }
}

/// A stored instance backup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Backup {
    /// Backup identifier.
    pub id: BackupId,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Lifecycle status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<DateTime<Utc>>,
}

/// Filter and pagination parameters for backup listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackupListParams {
    /// Page size.
    pub per_page: Option<u32>,
    /// Opaque pagination cursor.
    pub cursor: Option<String>,
    /// Restrict to backups of one instance.
    pub instance_id: Option<InstanceId>,
}

impl BackupListParams {
    /// Assemble the query parameters for this filter.
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("instance_id", self.instance_id);
        params.push_pagination(self.per_page, self.cursor.as_deref());
        params
    }
}

/// An operating system offered by the legacy catalog endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperatingSystem {
    /// Numeric OS identifier.
    #[serde(alias = "OSID")]
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Architecture (`x64`, `arm64`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    /// OS family (`debian`, `windows`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

/// A provisioning plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Plan identifier (e.g. `vc2-1c-1gb`).
    pub id: String,
    /// Number of virtual CPUs.
    pub vcpu_count: u32,
    /// RAM in MiB.
    pub ram: u64,
    /// Disk in GiB.
    pub disk: u64,
    /// Monthly bandwidth allowance in GiB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<u64>,
    /// Monthly cost in USD.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_cost: Option<f64>,
    /// Regions offering this plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
}

/// Wire envelope for instance listings.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct InstancesEnvelope {
    #[serde(default)]
    pub instances: Vec<Instance>,
    pub meta: Meta,
}

/// Wire envelope for a single instance.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct InstanceEnvelope {
    pub instance: Instance,
}

/// Wire envelope for backup listings.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BackupsEnvelope {
    #[serde(default)]
    pub backups: Vec<Backup>,
    pub meta: Meta,
}

/// Wire envelope for plan listings.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PlansEnvelope {
    #[serde(default)]
    pub plans: Vec<Plan>,
    pub meta: Meta,
}
