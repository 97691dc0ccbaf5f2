//! Function layers for the compactor.
//!
//! A layer turns a call substitution such as `{plural count "a" "b" "c"}`
//! into a JavaScript expression. Arguments arrive already compiled.

/// Provider of template functions.
pub trait Layer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Compile a call to `function`.
    ///
    /// Returns `None` when this layer does not provide `function`, and
    /// `Some(Err(message))` when it does but the call is invalid.
    fn call(&self, function: &str, args: &[String]) -> Option<Result<String, String>>;
}

/// Localization functions backed by the runtime class.
///
/// - `plural count one some many [none]` → `i18n.plural(...)`
/// - `i18n keyset key` → `i18n(keyset, key, params)`, a reference to another key
#[derive(Debug, Clone, Copy, Default)]
pub struct I18nLayer;

impl Layer for I18nLayer {
    fn name(&self) -> &'static str {
        "i18n"
    }

    fn call(&self, function: &str, args: &[String]) -> Option<Result<String, String>> {
        match function {
            "plural" => Some(if matches!(args.len(), 4 | 5) {
                Ok(format!("i18n.plural({})", args.join(", ")))
            } else {
                Err(format!(
                    "`plural` expects a count and 3 or 4 forms, got {} argument(s)",
                    args.len()
                ))
            }),
            "i18n" => Some(if args.len() == 2 {
                Ok(format!("i18n({}, {}, params)", args[0], args[1]))
            } else {
                Err(format!(
                    "`i18n` expects a keyset and a key, got {} argument(s)",
                    args.len()
                ))
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_plural() {
        let result = I18nLayer.call("plural", &args(&["params.n", "\"a\"", "\"b\"", "\"c\""]));
        assert_eq!(
            result,
            Some(Ok("i18n.plural(params.n, \"a\", \"b\", \"c\")".to_string()))
        );
        assert!(matches!(
            I18nLayer.call("plural", &args(&["params.n"])),
            Some(Err(_))
        ));
    }

    #[test]
    fn test_key_reference() {
        assert_eq!(
            I18nLayer.call("i18n", &args(&["\"common\"", "\"ok\""])),
            Some(Ok("i18n(\"common\", \"ok\", params)".to_string()))
        );
    }

    #[test]
    fn test_unknown_function_is_not_handled() {
        assert_eq!(I18nLayer.call("upper", &args(&["params.x"])), None);
    }
}
