use serde::{Deserialize, Serialize};

/// How the VLAN ID for a provisioning run is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationMode {
    Auto,
    Manual,
}

impl Default for AllocationMode {
    fn default() -> Self {
        AllocationMode::Auto
    }
}

/// Input for a provisioning run.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionRequest {
    pub group_id: i64,
    pub l2vpn_id: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mode: AllocationMode,
    #[serde(default)]
    pub manual_vid: Option<u16>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub role_id: Option<i64>,
}

/// Structured result of a successful provisioning run.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionReport {
    pub vlan_id: i64,
    pub vlan_name: String,
    pub vid: u16,
    pub vni: i64,
    pub group: String,
    pub l2vpn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// true when the prefix was created by this run, false when an existing
    /// prefix was reassigned. Absent when no prefix was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_created: Option<bool>,
    pub log: Vec<String>,
}
