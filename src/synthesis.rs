//! Metadata module synthesis
//!
//! Top-level assembly of the distributable module graph: classify the
//! compiled units, aggregate their symbol/constant metadata, generate
//! the registry source, and wrap everything into one returned module.

use crate::codegen::create_csource_metadata_module;
use crate::error::{MetaError, MetaResult};
use crate::module::{Module, ModulePayload};
use crate::target::TargetConfig;
use crate::tensor::Tensor;
use std::collections::HashMap;

/// Aggregated per-unit symbol metadata, in insertion order.
///
/// Symbols are unique across the whole aggregation; a duplicate insert
/// fails and the synthesis that triggered it must be aborted.
#[derive(Debug, Clone, Default)]
pub struct SymbolMetadata {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl SymbolMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `symbol` with its required constant variable names
    pub fn insert(&mut self, symbol: impl Into<String>, const_vars: Vec<String>) -> MetaResult<()> {
        let symbol = symbol.into();
        if self.index.contains_key(&symbol) {
            return Err(MetaError::DuplicatedSymbol(symbol));
        }
        self.index.insert(symbol.clone(), self.entries.len());
        self.entries.push((symbol, const_vars));
        Ok(())
    }

    /// Constant variable names recorded for `symbol`
    pub fn get(&self, symbol: &str) -> Option<&[String]> {
        self.index.get(symbol).map(|&i| self.entries[i].1.as_slice())
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(s, v)| (s.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Create the metadata module wrapper for a list of compiled units.
///
/// Units exposing both a symbol and a constant variable list feed the
/// symbol aggregation. A unit rides in the generated c-source metadata
/// module when it has no constants to load and can be linked directly;
/// serialized constant loading is only needed when constants are
/// present and required at initialization, or when the unit is not
/// DSO-exportable, in which case it is wrapped behind the binary
/// metadata module instead.
///
/// Returns the binary metadata wrapper when any unit required it, the
/// bare c-source metadata module otherwise.
pub fn create_metadata_module(
    params: HashMap<String, Tensor>,
    modules: Vec<Module>,
    target: &TargetConfig,
) -> MetaResult<Module> {
    let mut csource_modules = Vec::new();
    let mut binary_modules = Vec::new();
    let mut sym_metadata = SymbolMetadata::new();

    for module in modules {
        let capabilities = module
            .symbol()
            .map(|s| s.to_string())
            .zip(module.const_vars().map(|v| v.to_vec()));
        match capabilities {
            Some((symbol, const_vars)) => {
                log::trace!("unit [{}] registers symbol '{}'", module.type_key(), symbol);
                let needs_binary = !const_vars.is_empty() || !module.is_dso_exportable();
                sym_metadata.insert(symbol, const_vars)?;
                if needs_binary {
                    binary_modules.push(module);
                } else {
                    csource_modules.push(module);
                }
            },
            None => csource_modules.push(module),
        }
    }
    log::debug!(
        "classified units: {} source-embeddable, {} binary-required",
        csource_modules.len(),
        binary_modules.len()
    );

    let c_meta_module = create_csource_metadata_module(csource_modules, target)?;
    if !binary_modules.is_empty() {
        let mut wrapper = Module::from_payload(ModulePayload::Metadata { params, sym_metadata });
        wrapper.import(c_meta_module);
        for module in binary_modules {
            wrapper.import(module);
        }
        return Ok(wrapper);
    }
    Ok(c_meta_module)
}
