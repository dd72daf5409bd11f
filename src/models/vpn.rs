use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// L2vpn is a layer-2 overlay domain. `identifier` is the stable,
/// externally-assigned integer that prefixes every VNI minted for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct L2vpn {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub identifier: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_count: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateL2vpnRequest {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub identifier: i64,
    #[serde(default)]
    pub tenant_id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

/// L2vpnTermination links a VLAN into its overlay domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct L2vpnTermination {
    pub id: i64,
    pub l2vpn_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l2vpn_name: Option<String>,
    pub vlan_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
