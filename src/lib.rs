//! Metadata module synthesis for compiled unit graphs
//!
//! This crate assembles the distributable module graph out of the output
//! units produced by independent compiler backends:
//! - `Module`: the closed set of module variants and the import graph
//! - `create_csource_metadata_module`: generated function-registry source
//! - `create_metadata_module`: top-level synthesis over a unit list

mod codegen;
mod device;
mod error;
mod module;
mod registry;
mod synthesis;
mod target;
mod tensor;

pub use codegen::*;
pub use device::*;
pub use error::*;
pub use module::*;
pub use registry::*;
pub use synthesis::*;
pub use target::*;
pub use tensor::*;
