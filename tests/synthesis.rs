//! End-to-end synthesis scenarios over the public API

use metamodule::*;
use std::collections::HashMap;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_all_dso_units_yield_bare_csource_metadata_module() {
    let u1 = create_csource_module("int add;", "cc", names(&["run_add"]), "add", vec![]);
    let u2 = create_csource_module("int mul;", "cc", names(&["run_mul"]), "mul", vec![]);
    let target = TargetConfig::new("c").with_system_lib(true);

    let result = create_metadata_module(HashMap::new(), vec![u1, u2], &target).unwrap();

    assert_eq!(result.type_key(), "c");
    assert!(result.sym_metadata().is_none());
    assert_eq!(result.imports().len(), 2);
    assert_eq!(result.imports()[0].symbol(), Some("add"));
    assert_eq!(result.imports()[1].symbol(), Some("mul"));
}

#[test]
fn test_const_vars_route_unit_behind_binary_wrapper() {
    let u1 = create_csource_module("int add;", "cc", vec![], "add", vec![]);
    let u2 = create_csource_module("int mul;", "cc", vec![], "mul", names(&["w0", "w1"]));
    let mut params = HashMap::new();
    params.insert("w0".to_string(), Tensor::from_f32s(&[1.0, 2.0], vec![2]).unwrap());
    params.insert("w1".to_string(), Tensor::from_f32s(&[3.0], vec![1]).unwrap());
    let target = TargetConfig::new("c");

    let result = create_metadata_module(params, vec![u1, u2], &target).unwrap();

    assert_eq!(result.type_key(), "metadata");
    let meta = result.sym_metadata().unwrap();
    assert_eq!(meta.len(), 2);
    assert_eq!(meta.get("add"), Some(&[][..]));
    assert_eq!(meta.get("mul"), Some(&names(&["w0", "w1"])[..]));
    assert_eq!(result.params().unwrap().len(), 2);

    // generated module first, then the binary-required units in order
    assert_eq!(result.imports().len(), 2);
    assert_eq!(result.imports()[0].type_key(), "c");
    assert_eq!(result.imports()[1].symbol(), Some("mul"));
    // the dso-exportable unit rides inside the generated module
    assert_eq!(result.imports()[0].imports().len(), 1);
    assert_eq!(result.imports()[0].imports()[0].symbol(), Some("add"));
}

#[test]
fn test_duplicated_symbol_is_fatal() {
    let u1 = create_csource_module("a", "cc", vec![], "add", vec![]);
    let u2 = create_csource_module("b", "cc", vec![], "add", vec![]);

    let err = create_metadata_module(HashMap::new(), vec![u1, u2], &TargetConfig::new("c")).unwrap_err();
    assert_eq!(err, MetaError::DuplicatedSymbol("add".to_string()));
}

#[test]
fn test_system_lib_registry_text() {
    let u1 = create_csource_module("x", "cc", names(&["run0", "run1"]), "add", vec![]);
    let target = TargetConfig::new("c").with_system_lib(true);

    let result = create_metadata_module(HashMap::new(), vec![u1], &target).unwrap();
    let code = result.source().unwrap();

    assert_eq!(code.matches("extern \"C\"").count(), 2);
    assert!(code.find("int32_t run0(").unwrap() < code.find("int32_t run1(").unwrap());
    assert!(code.find("(MMBackendPackedCFunc)run0,").unwrap() < code.find("(MMBackendPackedCFunc)run1,").unwrap());

    // the embedded registry string decodes back to the name list
    let blob = generate_func_registry_names(&names(&["run0", "run1"])).unwrap();
    assert!(code.contains(&format!("\"{}\"", str_escape(&blob))));
    assert_eq!(parse_func_registry_names(&blob).unwrap(), names(&["run0", "run1"]));
}

#[test]
fn test_single_dso_unit_scenario() {
    let u1 = create_csource_module("int add;", "cc", names(&["run_add"]), "add", vec![]);
    let target = TargetConfig::new("c").with_system_lib(true);

    let result = create_metadata_module(HashMap::new(), vec![u1], &target).unwrap();

    assert_eq!(result.type_key(), "c");
    assert!(result.source().unwrap().contains("run_add"));
    assert_eq!(result.imports().len(), 1);
    assert_eq!(result.imports()[0].symbol(), Some("add"));
}

#[test]
fn test_wrapper_and_generated_module_are_not_executable() {
    let u1 = create_csource_module("x", "cc", vec![], "add", names(&["w0"]));
    let target = TargetConfig::new("c");
    let result = create_metadata_module(HashMap::new(), vec![u1], &target).unwrap();

    // the generated c-source metadata child refuses execution outright
    let generated = &result.imports()[0];
    assert!(matches!(
        generated.execute(&[]),
        Err(MetaError::NonExecutableModule { .. })
    ));
}
