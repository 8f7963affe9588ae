//! Domain types for the flotilla control plane.

mod nlb;

pub use nlb::{
    BulkDeleteFailure, BulkDeleteOutcome, CreateNlbRequest, CreateOption, NlbRecord, NlbStatus,
};
