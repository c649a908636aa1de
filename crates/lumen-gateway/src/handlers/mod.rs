//! Gateway request handlers

pub mod data;
pub mod funds;
pub mod service;
pub mod upload;

pub use data::*;
pub use funds::*;
pub use service::*;
pub use upload::*;
