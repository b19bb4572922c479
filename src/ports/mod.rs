//! Port traits between the domain and its collaborators.

pub mod catalog_port;
pub mod config_port;
pub mod price_port;
pub mod report_port;
