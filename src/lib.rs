//! clientforge: turn API documentation into client libraries.
//!
//! Documentation in one of three dialects (OpenAPI/Swagger, Postman
//! collections, free-form HTML) is normalized into one canonical model, which
//! then drives generation of a complete client project for each supported
//! target language.
//!
//! ```no_run
//! use clientforge::{InputFormat, Target, generate, parse};
//!
//! let raw = std::fs::read_to_string("openapi.json")?;
//! let api = parse(InputFormat::OpenApi, &raw)?;
//! let files = generate(&api, Target::Python)?;
//! for (path, _text) in &files {
//!     println!("{path}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![deny(unsafe_code)]

pub mod application;
pub mod core;
pub mod generation;
pub mod infrastructure;
pub mod normalization;

pub use crate::core::ApiDescription;
pub use generation::{ArtifactMap, GenerationError, Target};
pub use infrastructure::generation::generate;
pub use normalization::{InputFormat, ParseError, parse};
