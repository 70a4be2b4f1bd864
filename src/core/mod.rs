//! Core building blocks: the canonical model, identifier utilities and the
//! runtime contract every generated client honors.

pub mod contract;
pub mod model;
pub mod utils;

pub use model::*;
