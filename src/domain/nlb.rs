//! NLB record and request types.
//!
//! The record is the canonical internal representation of one load balancer,
//! whether it was provisioned fresh through a provider driver or adopted from
//! an already-existing provider-side resource.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::{Error, Result};

/// Lifecycle status of an NLB record.
///
/// Transitions: `Creating -> Active | Failed`; `Active -> Deleting ->
/// (removed)`. `Failed` is terminal until an explicit force-delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum NlbStatus {
    Creating,
    Active,
    Failed,
    Deleting,
}

impl NlbStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NlbStatus::Creating => "Creating",
            NlbStatus::Active => "Active",
            NlbStatus::Failed => "Failed",
            NlbStatus::Deleting => "Deleting",
        }
    }

    /// Parse a status stored as text.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "Creating" => Ok(NlbStatus::Creating),
            "Active" => Ok(NlbStatus::Active),
            "Failed" => Ok(NlbStatus::Failed),
            "Deleting" => Ok(NlbStatus::Deleting),
            other => Err(Error::internal(format!("unknown NLB status '{}'", other))),
        }
    }
}

impl fmt::Display for NlbStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical internal representation of one network load balancer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NlbRecord {
    /// Isolation boundary; resource identifiers are unique only within it
    pub namespace: String,
    /// Resource identifier, unique within the namespace
    pub id: String,
    /// Named credential/provider/region binding used to reach the provider
    pub connection_name: String,
    /// Provider-native resource identifier, opaque to the controller.
    /// Immutable once set.
    #[serde(rename = "cspNLBId")]
    pub csp_nlb_id: Option<String>,
    /// Descriptive name
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Arbitrary string metadata, matchable by the filter engine
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub status: NlbStatus,
    pub created_at: DateTime<Utc>,
}

impl NlbRecord {
    /// Look up a named field for filtering. Well-known fields resolve by
    /// wire name; anything else falls through to the metadata map. Returns
    /// `None` when the field does not exist on this record.
    pub fn field(&self, key: &str) -> Option<&str> {
        match key {
            "id" => Some(&self.id),
            "name" => Some(&self.name),
            "namespace" => Some(&self.namespace),
            "connectionName" => Some(&self.connection_name),
            "cspNLBId" => self.csp_nlb_id.as_deref(),
            "status" => Some(self.status.as_str()),
            "description" => self.description.as_deref(),
            other => self.metadata.get(other).map(String::as_str),
        }
    }
}

/// Selects the provisioning path for a create call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreateOption {
    /// Provision a new load balancer through the provider driver
    #[default]
    Provision,
    /// Adopt an already-existing provider-side resource
    Register,
}

impl CreateOption {
    /// Parse the `option` query parameter; empty selects the provision path.
    pub fn parse(option: &str) -> Result<Self> {
        match option {
            "" => Ok(CreateOption::Provision),
            "register" => Ok(CreateOption::Register),
            other => Err(Error::validation_field(
                format!("unsupported option '{}', expected 'register' or empty", other),
                "option",
            )),
        }
    }
}

/// Request body for creating or registering an NLB.
///
/// The `name` doubles as the resource identifier within the namespace; the
/// register path additionally requires `cspNLBId` so the existing resource
/// can be looked up on the provider side.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNlbRequest {
    #[validate(length(min = 1, max = 128, message = "name must be 1-128 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "connectionName must not be empty"))]
    pub connection_name: String,
    #[serde(rename = "cspNLBId", default, skip_serializing_if = "Option::is_none")]
    pub csp_nlb_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CreateNlbRequest {
    /// Validate the request for the given provisioning path.
    pub fn validate_for(&self, option: CreateOption) -> Result<()> {
        Validate::validate(self)?;

        if option == CreateOption::Register {
            match self.csp_nlb_id.as_deref() {
                Some(id) if !id.is_empty() => {}
                _ => {
                    return Err(Error::validation_field(
                        "cspNLBId is required when registering an existing NLB",
                        "cspNLBId",
                    ))
                }
            }
        }

        Ok(())
    }
}

/// Per-item failure inside a bulk delete.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkDeleteFailure {
    pub id: String,
    /// Machine-readable error kind (`provider_teardown_failed`, ...)
    pub kind: String,
    pub message: String,
}

/// Outcome of a `DeleteAll` over a namespace.
///
/// The three lists are disjoint: `deleted` holds clean removals, `orphaned`
/// holds identifiers removed from the store despite a failed provider
/// teardown (force only; the provider-side resource may survive), `failed`
/// holds identifiers still present along with their per-item error kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteOutcome {
    pub deleted: Vec<String>,
    pub orphaned: Vec<String>,
    pub failed: Vec<BulkDeleteFailure>,
}

impl BulkDeleteOutcome {
    /// Total number of records removed from the store.
    pub fn removed_count(&self) -> usize {
        self.deleted.len() + self.orphaned.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> NlbRecord {
        NlbRecord {
            namespace: "ns01".into(),
            id: "nlb-01".into(),
            connection_name: "aws-ap-northeast-2".into(),
            csp_nlb_id: Some("arn:aws:elb/net/nlb-01".into()),
            name: "nlb-01".into(),
            description: None,
            metadata: HashMap::from([("vpc".to_string(), "vpc-1".to_string())]),
            status: NlbStatus::Active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_field_lookup_well_known() {
        let r = record();
        assert_eq!(r.field("id"), Some("nlb-01"));
        assert_eq!(r.field("connectionName"), Some("aws-ap-northeast-2"));
        assert_eq!(r.field("status"), Some("Active"));
        assert_eq!(r.field("cspNLBId"), Some("arn:aws:elb/net/nlb-01"));
    }

    #[test]
    fn test_field_lookup_metadata_and_missing() {
        let r = record();
        assert_eq!(r.field("vpc"), Some("vpc-1"));
        assert_eq!(r.field("subnet"), None);
        assert_eq!(r.field("description"), None);
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [NlbStatus::Creating, NlbStatus::Active, NlbStatus::Failed, NlbStatus::Deleting]
        {
            assert_eq!(NlbStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(NlbStatus::parse("Unknown").is_err());
    }

    #[test]
    fn test_create_option_parse() {
        assert_eq!(CreateOption::parse("").unwrap(), CreateOption::Provision);
        assert_eq!(CreateOption::parse("register").unwrap(), CreateOption::Register);
        assert!(CreateOption::parse("adopt").is_err());
    }

    #[test]
    fn test_register_requires_csp_id() {
        let req = CreateNlbRequest {
            name: "nlb-01".into(),
            connection_name: "aws-ap-northeast-2".into(),
            csp_nlb_id: None,
            description: None,
            metadata: HashMap::new(),
        };

        assert!(req.validate_for(CreateOption::Provision).is_ok());
        assert!(req.validate_for(CreateOption::Register).is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        let req = CreateNlbRequest {
            name: String::new(),
            connection_name: "aws-ap-northeast-2".into(),
            csp_nlb_id: None,
            description: None,
            metadata: HashMap::new(),
        };

        assert!(req.validate_for(CreateOption::Provision).is_err());
    }

    #[test]
    fn test_record_serializes_original_wire_names() {
        let value = serde_json::to_value(record()).unwrap();
        assert!(value.get("connectionName").is_some());
        assert!(value.get("cspNLBId").is_some());
        assert!(value.get("createdAt").is_some());
    }
}
