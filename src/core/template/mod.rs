//! Template compaction.
//!
//! Each keyset value is a small template. Compaction turns it into a
//! JavaScript expression that is embedded verbatim in the artifact:
//!
//! - `See you` → `"See you"`
//! - `Hi {name}!` → `function(params) { return "Hi " + params.name + "!"; }`
//!
//! Function calls inside substitutions are resolved by the registered
//! layers, in registration order.

pub mod layer;
pub mod parser;

pub use layer::{I18nLayer, Layer};
pub use parser::{Arg, ParamPath, Part, Subst, parse_template};

use crate::{core::codegen::js_string, error::TemplateError};

/// Template compactor. Holds only immutable layers, so one instance can be
/// shared across threads.
#[derive(Default)]
pub struct Compactor {
    layers: Vec<Box<dyn Layer>>,
}

impl Compactor {
    /// A compactor without function layers: only text and parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// A compactor with the localization layer.
    pub fn localized() -> Self {
        Self::new().with_layer(I18nLayer)
    }

    pub fn with_layer(mut self, layer: impl Layer + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|layer| layer.name()).collect()
    }

    /// Compile one template into a JavaScript expression.
    pub fn compact(&self, template: &str) -> Result<String, TemplateError> {
        let parts = parse_template(template)?;

        if parts.iter().all(|part| matches!(part, Part::Text(_))) {
            let text: String = parts
                .into_iter()
                .filter_map(|part| match part {
                    Part::Text(t) => Some(t),
                    Part::Subst(_) => None,
                })
                .collect();
            return Ok(js_string(&text));
        }

        let mut operands = Vec::with_capacity(parts.len() + 1);
        if !matches!(parts.first(), Some(Part::Text(_))) {
            operands.push("\"\"".to_string());
        }
        for part in &parts {
            operands.push(match part {
                Part::Text(text) => js_string(text),
                Part::Subst(Subst::Param(path)) => path.to_js(),
                Part::Subst(Subst::Call { name, args, offset }) => {
                    self.compile_call(name, args, *offset)?
                }
            });
        }

        Ok(format!(
            "function(params) {{ return {}; }}",
            operands.join(" + ")
        ))
    }

    fn compile_call(&self, name: &str, args: &[Arg], offset: usize) -> Result<String, TemplateError> {
        let args: Vec<String> = args
            .iter()
            .map(|arg| match arg {
                Arg::Param(path) => path.to_js(),
                Arg::Str(s) => js_string(s),
                Arg::Num(n) => n.clone(),
            })
            .collect();

        self.layers
            .iter()
            .find_map(|layer| layer.call(name, &args))
            .unwrap_or_else(|| Err(format!("Unknown function `{}`", name)))
            .map_err(|message| TemplateError::new(message, offset))
    }
}
