//! Target configuration for module synthesis

/// Target configuration consumed by the synthesis entry points.
///
/// Only the pieces the metadata path reads are kept here: the target
/// name and the system-library flag. A target with `system-lib` set
/// must expose a statically discoverable entry point instead of
/// relying on dynamic symbol resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    name: String,
    system_lib: bool,
}

impl TargetConfig {
    /// Create a target configuration with the given name (e.g. "c", "llvm")
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_lib: false,
        }
    }

    pub fn with_system_lib(mut self, system_lib: bool) -> Self {
        self.system_lib = system_lib;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn system_lib(&self) -> bool {
        self.system_lib
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_lib_flag() {
        let target = TargetConfig::new("c");
        assert!(!target.system_lib());
        let target = target.with_system_lib(true);
        assert!(target.system_lib());
        assert_eq!(target.name(), "c");
    }
}
