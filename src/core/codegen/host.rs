//! Host module conventions probed by the generated bootstrap.
//!
//! The artifact exposes the initialized runtime through the first convention
//! available when it is loaded. The order of `HOST_CONVENTIONS` is the probe
//! order; the last entry has no probe and always applies.

use enum_dispatch::enum_dispatch;

use super::js_single_quoted;

/// One way of publishing the runtime instance.
#[enum_dispatch]
pub trait Convention {
    /// Load-time condition selecting this convention, or `None` for the fallback.
    fn probe(&self) -> Option<&'static str>;

    /// Statements publishing the instance, without indentation.
    fn expose(&self, module_name: &str) -> Vec<String>;
}

/// `modules.define(...)` style module registry.
#[derive(Debug, Clone, Copy)]
pub struct ModuleRegistry;

impl Convention for ModuleRegistry {
    fn probe(&self) -> Option<&'static str> {
        Some("typeof modules !== 'undefined'")
    }

    fn expose(&self, module_name: &str) -> Vec<String> {
        vec![
            format!(
                "modules.define({}, function (provide, i18n) {{",
                js_single_quoted(module_name)
            ),
            "    provide(initKeyset(i18n));".to_string(),
            "});".to_string(),
        ]
    }
}

/// CommonJS `module.exports`.
#[derive(Debug, Clone, Copy)]
pub struct ModuleExports;

impl Convention for ModuleExports {
    fn probe(&self) -> Option<&'static str> {
        Some("typeof module !== 'undefined'")
    }

    fn expose(&self, _module_name: &str) -> Vec<String> {
        vec!["module.exports = function() {return initKeyset();};".to_string()]
    }
}

/// Browser global object.
#[derive(Debug, Clone, Copy)]
pub struct GlobalObject;

impl Convention for GlobalObject {
    fn probe(&self) -> Option<&'static str> {
        Some("typeof window !== 'undefined'")
    }

    fn expose(&self, _module_name: &str) -> Vec<String> {
        vec!["window.i18n = initKeyset();".to_string()]
    }
}

/// Bare global variable.
#[derive(Debug, Clone, Copy)]
pub struct BareGlobal;

impl Convention for BareGlobal {
    fn probe(&self) -> Option<&'static str> {
        None
    }

    fn expose(&self, _module_name: &str) -> Vec<String> {
        vec!["i18n = initKeyset();".to_string()]
    }
}

#[enum_dispatch(Convention)]
#[derive(Debug, Clone, Copy)]
pub enum HostConvention {
    ModuleRegistry,
    ModuleExports,
    GlobalObject,
    BareGlobal,
}

pub const HOST_CONVENTIONS: [HostConvention; 4] = [
    HostConvention::ModuleRegistry(ModuleRegistry),
    HostConvention::ModuleExports(ModuleExports),
    HostConvention::GlobalObject(GlobalObject),
    HostConvention::BareGlobal(BareGlobal),
];

/// Render the `if / else if / else` dispatcher over `conventions`.
pub fn render_dispatcher(conventions: &[HostConvention], module_name: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, convention) in conventions.iter().enumerate() {
        let opener = match (i, convention.probe()) {
            (0, Some(probe)) => format!("if ({}) {{", probe),
            (_, Some(probe)) => format!("}} else if ({}) {{", probe),
            (0, None) => "{".to_string(),
            (_, None) => "} else {".to_string(),
        };
        lines.push(opener);
        lines.extend(
            convention
                .expose(module_name)
                .into_iter()
                .map(|line| format!("    {}", line)),
        );
        if convention.probe().is_none() {
            break;
        }
    }
    if !lines.is_empty() {
        lines.push("}".to_string());
    }
    lines
}
