//! Module variants and the import graph
//!
//! A `Module` is one node of the distributable module graph: a payload
//! (one of a closed set of variants) plus the modules it imports. A
//! parent exclusively owns its imported children, so the whole graph is
//! dropped together and cycles cannot be formed.
//!
//! Capability introspection is explicit: `symbol`, `const_vars` and
//! `func_names` return `None` on variants that do not carry the
//! corresponding metadata, and callers branch on presence rather than
//! on dynamic function lookup.

use crate::codegen::GeneratedSource;
use crate::device::FunctionInfo;
use crate::error::{MetaError, MetaResult};
use crate::synthesis::SymbolMetadata;
use crate::tensor::Tensor;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Payload of one module graph node
#[derive(Debug)]
pub(crate) enum ModulePayload {
    /// Opaque source text, only for viewing
    Source { code: String, fmt: String },
    /// C source text with symbol/constant/function metadata
    CSource {
        code: String,
        fmt: String,
        symbol: String,
        const_vars: Vec<String>,
        func_names: Vec<String>,
    },
    /// Generated function-registry source aggregating other units
    CSourceMetadata { source: GeneratedSource },
    /// Backend-emitted device blob with launch metadata
    DeviceSource {
        data: Vec<u8>,
        fmt: String,
        func_info: HashMap<String, FunctionInfo>,
        type_key: String,
    },
    /// Unit produced by an out-of-crate backend runtime, introspectable
    /// through its declared capability set
    Extern {
        type_key: String,
        symbol: Option<String>,
        const_vars: Option<Vec<String>>,
        func_names: Option<Vec<String>>,
    },
    /// Binary metadata wrapper carrying initialization parameters and
    /// the aggregated symbol map
    Metadata {
        params: HashMap<String, Tensor>,
        sym_metadata: SymbolMetadata,
    },
}

/// One node of the module graph
#[derive(Debug)]
pub struct Module {
    payload: ModulePayload,
    imports: Vec<Module>,
}

impl Module {
    pub(crate) fn from_payload(payload: ModulePayload) -> Self {
        Self {
            payload,
            imports: Vec::new(),
        }
    }

    /// Type tag of this module variant
    pub fn type_key(&self) -> &str {
        match &self.payload {
            ModulePayload::Source { .. } => "source",
            ModulePayload::CSource { .. } | ModulePayload::CSourceMetadata { .. } => "c",
            ModulePayload::DeviceSource { type_key, .. } => type_key,
            ModulePayload::Extern { type_key, .. } => type_key,
            ModulePayload::Metadata { .. } => "metadata",
        }
    }

    /// True for units that can be linked directly into a shared or
    /// native binary without a separate runtime loader step
    pub fn is_dso_exportable(&self) -> bool {
        matches!(self.type_key(), "llvm" | "c")
    }

    /// Externally visible symbol this unit registers itself under
    pub fn symbol(&self) -> Option<&str> {
        match &self.payload {
            ModulePayload::CSource { symbol, .. } => Some(symbol),
            ModulePayload::Extern { symbol, .. } => symbol.as_deref(),
            _ => None,
        }
    }

    /// Constant variable names this unit requires at load time
    pub fn const_vars(&self) -> Option<&[String]> {
        match &self.payload {
            ModulePayload::CSource { const_vars, .. } => Some(const_vars),
            ModulePayload::Extern { const_vars, .. } => const_vars.as_deref(),
            _ => None,
        }
    }

    /// Function names this unit contributes to the registry.
    ///
    /// The generated metadata module exposes none: its names are already
    /// consumed by the registry text, so re-aggregating it gathers
    /// nothing.
    pub fn func_names(&self) -> Option<&[String]> {
        match &self.payload {
            ModulePayload::CSource { func_names, .. } => Some(func_names),
            ModulePayload::Extern { func_names, .. } => func_names.as_deref(),
            _ => None,
        }
    }

    /// Import a module, taking ownership of it
    pub fn import(&mut self, module: Module) {
        self.imports.push(module);
    }

    /// Imported children, in import order
    pub fn imports(&self) -> &[Module] {
        &self.imports
    }

    /// Source text of this module, if it carries any
    pub fn source(&self) -> Option<&str> {
        match &self.payload {
            ModulePayload::Source { code, .. } | ModulePayload::CSource { code, .. } => Some(code),
            ModulePayload::CSourceMetadata { source, .. } => Some(source.code()),
            ModulePayload::DeviceSource { data, .. } => std::str::from_utf8(data).ok(),
            ModulePayload::Extern { .. } | ModulePayload::Metadata { .. } => None,
        }
    }

    /// Initialization parameters carried by a metadata wrapper
    pub fn params(&self) -> Option<&HashMap<String, Tensor>> {
        match &self.payload {
            ModulePayload::Metadata { params, .. } => Some(params),
            _ => None,
        }
    }

    /// Aggregated symbol metadata carried by a metadata wrapper
    pub fn sym_metadata(&self) -> Option<&SymbolMetadata> {
        match &self.payload {
            ModulePayload::Metadata { sym_metadata, .. } => Some(sym_metadata),
            _ => None,
        }
    }

    /// Execute a function of this module.
    ///
    /// This crate only assembles modules; every variant here either
    /// carries source/metadata (rebuild with the declared format's
    /// runtime support to execute) or defers execution to the runtime
    /// loader.
    pub fn execute(&self, _inputs: &[(&str, &Tensor)]) -> MetaResult<HashMap<String, Tensor>> {
        match &self.payload {
            ModulePayload::Source { fmt, .. } | ModulePayload::DeviceSource { fmt, .. } => {
                Err(MetaError::NonExecutableModule { fmt: fmt.clone() })
            },
            ModulePayload::CSourceMetadata { source, .. } => Err(MetaError::NonExecutableModule {
                fmt: source.fmt().to_string(),
            }),
            _ => Err(MetaError::UnsupportedOperation(format!(
                "module[{}] defers execution to the runtime loader",
                self.type_key()
            ))),
        }
    }

    /// Save the primary artifact of this module to `path`.
    ///
    /// `format` overrides the format derived from the path extension;
    /// pass "" to use the extension. A format that does not match the
    /// module's declared format fails without writing anything. Device
    /// modules write their metadata sidecar before the primary blob.
    pub fn save_to_file(&self, path: impl AsRef<Path>, format: &str) -> MetaResult<()> {
        let path = path.as_ref();
        let fmt = file_format(path, format);
        match &self.payload {
            ModulePayload::CSource { code, fmt: declared, .. } => {
                check_format(declared, &fmt)?;
                write_source(path, code)
            },
            ModulePayload::CSourceMetadata { source, .. } => {
                check_format(source.fmt(), &fmt)?;
                write_source(path, source.code())
            },
            ModulePayload::DeviceSource {
                data,
                fmt: declared,
                func_info,
                ..
            } => {
                check_format(declared, &fmt)?;
                let meta = serde_json::to_string_pretty(func_info)
                    .map_err(|e| MetaError::SerializationFailed(format!("Failed to serialize function info: {}", e)))?;
                std::fs::write(meta_file_path(path), meta)
                    .map_err(|e| MetaError::IoError(format!("Failed to write metadata file: {}", e)))?;
                std::fs::write(path, data).map_err(|e| MetaError::IoError(format!("Failed to write artifact: {}", e)))
            },
            _ => Err(MetaError::UnsupportedOperation(format!(
                "module[{}] does not support save_to_file",
                self.type_key()
            ))),
        }
    }

    /// Serialize this module for embedding into a binary stream:
    /// format tag, function-info map, payload, in that order.
    pub fn save_to_binary(&self) -> MetaResult<Vec<u8>> {
        match &self.payload {
            ModulePayload::DeviceSource {
                data,
                fmt,
                func_info,
                ..
            } => postcard::to_allocvec(&(fmt, func_info, data))
                .map_err(|e| MetaError::SerializationFailed(format!("Failed to serialize device module: {}", e))),
            _ => Err(MetaError::UnsupportedOperation(format!(
                "module[{}] does not support save_to_binary",
                self.type_key()
            ))),
        }
    }
}

/// Wrap arbitrary opaque source text
pub fn create_source_module(code: impl Into<String>, fmt: impl Into<String>) -> Module {
    Module::from_payload(ModulePayload::Source {
        code: code.into(),
        fmt: fmt.into(),
    })
}

/// Wrap C source text with introspectable symbol/constant/function metadata
pub fn create_csource_module(
    code: impl Into<String>,
    fmt: impl Into<String>,
    func_names: Vec<String>,
    symbol: impl Into<String>,
    const_vars: Vec<String>,
) -> Module {
    Module::from_payload(ModulePayload::CSource {
        code: code.into(),
        fmt: fmt.into(),
        symbol: symbol.into(),
        const_vars,
        func_names,
    })
}

/// Wrap a unit produced by an out-of-crate backend, declaring its
/// capability set explicitly
pub fn create_extern_module(
    type_key: impl Into<String>,
    symbol: Option<String>,
    const_vars: Option<Vec<String>>,
    func_names: Option<Vec<String>>,
) -> Module {
    Module::from_payload(ModulePayload::Extern {
        type_key: type_key.into(),
        symbol,
        const_vars,
        func_names,
    })
}

fn check_format(declared: &str, requested: &str) -> MetaResult<()> {
    if declared == requested {
        Ok(())
    } else {
        Err(MetaError::UnsupportedSaveFormat {
            expected: declared.to_string(),
            got: requested.to_string(),
        })
    }
}

fn write_source(path: &Path, code: &str) -> MetaResult<()> {
    if code.is_empty() {
        return Err(MetaError::InvalidArgument("cannot save empty source module".to_string()));
    }
    std::fs::write(path, code).map_err(|e| MetaError::IoError(format!("Failed to write source file: {}", e)))
}

/// Resolve the save format: explicit format string, or the path's
/// extension when none is given
fn file_format(path: &Path, format: &str) -> String {
    if !format.is_empty() {
        format.to_string()
    } else {
        path.extension().and_then(|e| e.to_str()).unwrap_or("").to_string()
    }
}

/// Sidecar metadata path next to the primary artifact
pub fn meta_file_path(path: &Path) -> PathBuf {
    path.with_extension("meta.json")
}
