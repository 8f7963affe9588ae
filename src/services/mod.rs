//! Business logic services for the flotilla control plane.

pub mod filter;
mod nlb_service;

pub use nlb_service::NlbService;
