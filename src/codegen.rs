//! Generated function-registry source
//!
//! For system-library targets the final artifact must expose a
//! statically discoverable entry point instead of relying on dynamic
//! symbol resolution. The generated C text declares every registered
//! function, lays them out in a pointer table, and emits a module
//! record whose address `MMSystemLibEntryPoint` returns. The runtime
//! loader resolves a name to a pointer by its position in the packed
//! name string.

use crate::error::MetaResult;
use crate::module::{Module, ModulePayload};
use crate::registry::{generate_func_registry_names, str_escape};
use crate::target::TargetConfig;

/// Source text generated once at module construction, immutable after
#[derive(Debug, Clone)]
pub struct GeneratedSource {
    code: String,
}

impl GeneratedSource {
    pub(crate) fn new(func_names: &[String], target: &TargetConfig) -> MetaResult<Self> {
        let mut code = String::new();
        if target.system_lib() && !func_names.is_empty() {
            emit_func_registry(&mut code, func_names)?;
            emit_system_lib(&mut code);
        }
        // Terminating empty statement keeps the text valid C even when
        // nothing was generated.
        code.push(';');
        Ok(Self { code })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn fmt(&self) -> &str {
        "cc"
    }
}

fn emit_func_registry(code: &mut String, func_names: &[String]) -> MetaResult<()> {
    code.push_str("#include <metamodule/runtime/c_module.h>\n");
    for name in func_names {
        code.push_str(&format!(
            "extern \"C\" MM_DLL int32_t {}(MMValue* args, int* type_code, int num_args, \
             MMValue* out_value, int* out_type_code);\n",
            name
        ));
    }
    code.push_str("static MMBackendPackedCFunc _mm_func_array[] = {\n");
    for name in func_names {
        code.push_str(&format!("    (MMBackendPackedCFunc){},\n", name));
    }
    code.push_str("};\n");
    let registry = generate_func_registry_names(func_names)?;
    code.push_str("static const MMFuncRegistry _mm_func_registry = {\n");
    code.push_str(&format!("    \"{}\",\n", str_escape(&registry)));
    code.push_str("    _mm_func_array,\n");
    code.push_str("};\n");
    Ok(())
}

fn emit_system_lib(code: &mut String) {
    code.push_str("static const MMModule _mm_system_lib = {\n");
    code.push_str("    &_mm_func_registry,\n");
    code.push_str("};\n");
    code.push_str("const MMModule* MMSystemLibEntryPoint(void) {\n");
    code.push_str("    return &_mm_system_lib;\n");
    code.push_str("}\n");
}

/// Build the registry-bearing aggregate module.
///
/// Function names are gathered from every unit exposing them, in unit
/// order; the generated glue text only references the functions, so
/// every input unit is imported to keep its own artifacts reachable.
pub fn create_csource_metadata_module(modules: Vec<Module>, target: &TargetConfig) -> MetaResult<Module> {
    let mut func_names = Vec::new();
    for module in &modules {
        if let Some(names) = module.func_names() {
            func_names.extend(names.iter().cloned());
        }
    }
    let source = GeneratedSource::new(&func_names, target)?;
    let mut metadata_module = Module::from_payload(ModulePayload::CSourceMetadata { source });
    for module in modules {
        metadata_module.import(module);
    }
    Ok(metadata_module)
}
