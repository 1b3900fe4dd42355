//! Cloud DB for MySQL catalog API

mod api;
mod model;

pub use api::V2Api;
pub use model::*;
