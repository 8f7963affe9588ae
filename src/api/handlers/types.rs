//! Request and response DTOs for the NLB endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::NlbRecord;

/// Query parameters for the create endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CreateQuery {
    /// `register` adopts an existing provider-side resource instead of
    /// provisioning a new one
    #[serde(default)]
    pub option: String,
}

/// Query parameters for the collection GET endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// `id` returns identifiers only, unfiltered
    #[serde(default)]
    pub option: String,
    #[serde(default)]
    pub filter_key: String,
    #[serde(default)]
    pub filter_val: String,
}

/// Query parameters for the single-resource DELETE endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DeleteQuery {
    /// Remove the record even if the provider-side teardown fails
    #[serde(default)]
    pub force: bool,
}

/// Query parameters for the collection DELETE endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DeleteAllQuery {
    #[serde(default)]
    pub force: bool,
    /// Delete resources whose identifier contains this substring only
    #[serde(default, rename = "match")]
    pub match_substring: String,
}

/// Collection response wrapping the record list.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NlbListResponse {
    pub nlb: Vec<NlbRecord>,
}

/// Identifier-only collection response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IdListResponse {
    #[serde(rename = "idList")]
    pub id_list: Vec<String>,
}

/// Simple message response for single deletions.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
