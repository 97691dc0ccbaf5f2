//! Artifact generation.
//!
//! Layout of a language artifact:
//!
//! ```text
//! (function(){                              ┐
//! function initKeyset(i18n) {               │ prologue
//! if (!i18n || typeof i18n !== "function") {│
//! i18n = <runtime class source>             │
//! }                                         ┘
//!
//! i18n.add('farewell', {                    ┐
//!     "msg": "See you"                      │ body, keysets sorted by name
//! });                                       ┘
//! i18n.setLanguage('en');                   ┐
//! return i18n;                              │ epilogue with the host
//! }                                         │ dispatcher
//! if (typeof modules !== 'undefined') { ... ┘
//! ```
//!
//! The `all` artifact has an empty prologue and epilogue.

pub mod host;

use crate::core::keyset::{CompiledKeyset, Lang};

pub use host::{Convention, HOST_CONVENTIONS, HostConvention, render_dispatcher};

pub const DEFAULT_MODULE_NAME: &str = "y-i18n";

#[derive(Debug, Clone)]
pub struct CodegenOptions {
    /// Name registered with the module-registry host convention.
    pub module_name: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            module_name: DEFAULT_MODULE_NAME.to_string(),
        }
    }
}

/// Build the artifact text.
///
/// `keysets` must already be sorted by name; `class_source` is the runtime
/// class expression injected by the prologue.
pub fn generate(
    lang: &Lang,
    class_source: &str,
    keysets: &[CompiledKeyset],
    options: &CodegenOptions,
) -> String {
    format!(
        "{}\n{}\n{}",
        prologue(lang, class_source),
        body(keysets),
        epilogue(lang, options)
    )
}

fn prologue(lang: &Lang, class_source: &str) -> String {
    if lang.is_all() {
        return String::new();
    }
    format!(
        "(function(){{\nfunction initKeyset(i18n) {{\n\
         if (!i18n || typeof i18n !== \"function\") {{\n\
         i18n = {}\n}}\n\n",
        class_source
    )
}

fn body(keysets: &[CompiledKeyset]) -> String {
    keysets
        .iter()
        .map(render_keyset)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_keyset(keyset: &CompiledKeyset) -> String {
    let mut lines = Vec::with_capacity(keyset.entries.len() + 2);
    lines.push(format!("i18n.add({}, {{", js_single_quoted(&keyset.name)));
    let last = keyset.entries.len().saturating_sub(1);
    for (i, (key, expr)) in keyset.entries.iter().enumerate() {
        let separator = if i == last { "" } else { "," };
        lines.push(format!("    {}: {}{}", js_string(key), expr, separator));
    }
    lines.push("});".to_string());
    lines.join("\n")
}

fn epilogue(lang: &Lang, options: &CodegenOptions) -> String {
    if lang.is_all() {
        return String::new();
    }
    let mut lines = vec![
        format!("i18n.setLanguage({});", js_single_quoted(lang.as_str())),
        "return i18n;".to_string(),
        "}".to_string(),
    ];
    lines.extend(render_dispatcher(&HOST_CONVENTIONS, &options.module_name));
    lines.push("})();".to_string());
    lines.join("\n")
}

/// Double-quoted JavaScript string literal (JSON escaping).
///
/// JSON allows raw U+2028 and U+2029, older JavaScript engines do not.
pub fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string())
        .to_string()
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

/// Single-quoted JavaScript string literal.
pub fn js_single_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
