//! HTTP handlers for the flotilla API.

pub mod health;
pub mod nlb;
pub mod types;

pub use health::health_handler;
pub use nlb::{
    create_nlb_handler, delete_all_nlbs_handler, delete_nlb_handler, get_nlb_handler,
    list_nlbs_handler,
};
