//! OpenAPI documentation for the flotilla API.

use utoipa::OpenApi;

use crate::api::handlers::{health, nlb, types};
use crate::domain;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "flotilla",
        description = "Namespaced control plane for network load balancers across cloud providers"
    ),
    paths(
        nlb::create_nlb_handler,
        nlb::get_nlb_handler,
        nlb::list_nlbs_handler,
        nlb::delete_nlb_handler,
        nlb::delete_all_nlbs_handler,
        health::health_handler,
    ),
    components(schemas(
        domain::NlbRecord,
        domain::NlbStatus,
        domain::CreateNlbRequest,
        domain::BulkDeleteOutcome,
        domain::BulkDeleteFailure,
        types::NlbListResponse,
        types::IdListResponse,
        types::MessageResponse,
        health::HealthResponse,
    )),
    tags(
        (name = "NLB management", description = "Lifecycle operations for NLB resources"),
        (name = "Health", description = "Control plane health")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("/ns/{namespace}/nlb"));
        assert!(json.contains("NlbRecord"));
    }
}
