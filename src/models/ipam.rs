use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical IPAM status values
pub mod ipam_status {
    pub const ACTIVE: &str = "active";
    pub const RESERVED: &str = "reserved";
    pub const DEPRECATED: &str = "deprecated";
}

/// An inclusive VLAN ID range. Serialized as a `[start, end]` pair to match
/// the `vid_ranges` JSON column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u16, u16)", into = "(u16, u16)")]
pub struct VidRange {
    pub start: u16,
    pub end: u16,
}

impl VidRange {
    pub fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }
}

impl From<(u16, u16)> for VidRange {
    fn from((start, end): (u16, u16)) -> Self {
        Self { start, end }
    }
}

impl From<VidRange> for (u16, u16) {
    fn from(r: VidRange) -> Self {
        (r.start, r.end)
    }
}

/// VlanRole classifies the function of a VLAN or prefix (e.g. "storage").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VlanRole {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVlanRoleRequest {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// VlanGroup is an allocation domain: a named pool of permitted VID ranges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VlanGroup {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub vid_ranges: Vec<VidRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_count: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateVlanGroupRequest {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub vid_ranges: Vec<VidRange>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vlan {
    pub id: i64,
    pub name: String,
    pub vid: u16,
    pub group_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vni: Option<i64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Internal creation input for a VLAN; only the provisioning pipeline
/// writes VLANs, there is no public create endpoint.
#[derive(Debug, Clone)]
pub struct NewVlan {
    pub name: String,
    pub vid: u16,
    pub group_id: i64,
    pub tenant_id: Option<i64>,
    pub role_id: Option<i64>,
    pub description: String,
    pub vni: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prefix {
    pub id: i64,
    pub prefix: String,
    pub network_int: i64,
    pub broadcast_int: i64,
    pub prefix_length: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Internal creation input for a prefix.
#[derive(Debug, Clone)]
pub struct NewPrefix {
    pub cidr: String,
    pub vlan_id: Option<i64>,
    pub tenant_id: Option<i64>,
    pub role_id: Option<i64>,
    pub status: String,
    pub description: String,
}
