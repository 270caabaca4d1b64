//! Device source modules
//!
//! A device source module wraps a backend-emitted blob (PTX, MSL, ...)
//! together with per-function launch metadata. It supports limited save
//! without cross compilation: the metadata sidecar goes next to the
//! primary artifact so the runtime loader can rebuild launch configs.

use crate::module::{Module, ModulePayload};
use crate::tensor::DType;
use std::collections::HashMap;

/// Per-function launch metadata carried by device modules
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub arg_types: Vec<DType>,
    pub launch_param_tags: Vec<String>,
}

/// Create a device source module from an emitted blob.
///
/// `fmt` is the declared save format (e.g. "ptx", "msl"); `type_key`
/// identifies the producing backend.
pub fn create_device_source_module(
    data: Vec<u8>,
    fmt: impl Into<String>,
    func_info: HashMap<String, FunctionInfo>,
    type_key: impl Into<String>,
) -> Module {
    Module::from_payload(ModulePayload::DeviceSource {
        data,
        fmt: fmt.into(),
        func_info,
        type_key: type_key.into(),
    })
}
