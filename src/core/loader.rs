//! Keyset module loader.
//!
//! Keyset files are small JavaScript modules that export an object of
//! keysets. They are parsed with swc and evaluated statically; nothing is
//! executed. Supported shapes:
//!
//! ```js
//! module.exports = { greeting: { hello: "Hi {name}!" } };
//! export default { greeting: { hello: "Hi {name}!" } };
//! exports.greeting = { hello: "Hi {name}!" };
//! ```

use std::{path::Path, sync::Arc};

use swc_common::{FileName, GLOBALS, Globals, SourceMap, Span, Spanned};
use swc_ecma_ast::{
    ArrowExpr, AssignExpr, AssignOp, AssignTarget, BinaryOp, Class, ExportDefaultExpr, Expr,
    Function, Lit, MemberExpr, MemberProp, ObjectLit, Prop, PropName, PropOrSpread,
    SimpleAssignTarget,
};
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax};
use swc_ecma_visit::{Visit, VisitWith};

use crate::{
    adapter::BuildHost,
    core::keyset::{Keyset, KeysetCollection},
    error::LoadError,
};

/// Load one keyset module through the build host.
///
/// The caller is responsible for invalidating the host's cached copy first.
pub fn load(host: &dyn BuildHost, path: &Path) -> Result<KeysetCollection, LoadError> {
    let source = host.read_module(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_keysets(&source, path)
}

/// Parse keyset module source and evaluate its exported object.
pub fn parse_keysets(code: &str, path: &Path) -> Result<KeysetCollection, LoadError> {
    GLOBALS.set(&Globals::new(), || {
        let source_map = Arc::new(SourceMap::default());
        let source_file = source_map.new_source_file(
            FileName::Real(path.to_path_buf()).into(),
            code.to_string(),
        );

        let syntax = Syntax::Es(EsSyntax::default());
        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);

        let parse_error = |e: swc_ecma_parser::error::Error| {
            let loc = source_map.lookup_char_pos(e.span().lo);
            LoadError::Parse {
                path: path.to_path_buf(),
                message: format!("line {}: {}", loc.line, e.kind().msg()),
            }
        };

        let module = parser.parse_module().map_err(parse_error)?;
        if let Some(e) = parser.take_errors().into_iter().next() {
            return Err(parse_error(e));
        }

        let mut collector = ExportsCollector::new(path, &source_map);
        module.visit_with(&mut collector);
        collector.finish()
    })
}

enum ExportTarget {
    /// `module.exports = ...`
    Whole,
    /// `exports.name = ...` or `module.exports.name = ...`
    Keyset(String),
}

/// Walks module-level code and evaluates assignments to the module exports.
///
/// Function and class bodies are skipped: only statements that run when the
/// module is first evaluated can define its exports.
struct ExportsCollector<'a> {
    path: &'a Path,
    source_map: &'a SourceMap,
    exports: Option<KeysetCollection>,
    error: Option<LoadError>,
}

impl<'a> ExportsCollector<'a> {
    fn new(path: &'a Path, source_map: &'a SourceMap) -> Self {
        Self {
            path,
            source_map,
            exports: None,
            error: None,
        }
    }

    fn finish(self) -> Result<KeysetCollection, LoadError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        self.exports.ok_or_else(|| LoadError::NoExports {
            path: self.path.to_path_buf(),
        })
    }

    fn record<T>(&mut self, result: Result<T, LoadError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.error.get_or_insert(err);
                None
            }
        }
    }

    fn assign_all(&mut self, expr: &Expr) {
        let result = self.eval_collection(expr);
        if let Some(collection) = self.record(result) {
            self.exports = Some(collection);
        }
    }

    fn assign_keyset(&mut self, name: String, expr: &Expr) {
        let result = self.eval_keyset(expr);
        if let Some(keyset) = self.record(result) {
            self.exports.get_or_insert_default().insert(name, keyset);
        }
    }

    fn eval_collection(&self, expr: &Expr) -> Result<KeysetCollection, LoadError> {
        let obj = self.expect_object(expr, "an object of keysets")?;
        let mut collection = KeysetCollection::new();
        for prop in &obj.props {
            let (name, value) = self.key_value(prop)?;
            collection.insert(name, self.eval_keyset(value)?);
        }
        Ok(collection)
    }

    fn eval_keyset(&self, expr: &Expr) -> Result<Keyset, LoadError> {
        let obj = self.expect_object(expr, "a keyset object")?;
        let mut keyset = Keyset::new();
        for prop in &obj.props {
            let (key, value) = self.key_value(prop)?;
            keyset.insert(key, self.eval_string(value)?);
        }
        Ok(keyset)
    }

    fn eval_string(&self, expr: &Expr) -> Result<String, LoadError> {
        match unwrap_paren(expr) {
            Expr::Lit(Lit::Str(s)) => s
                .value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| self.unsupported(s.span, "string is not valid UTF-8")),
            Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
                .quasis
                .first()
                .and_then(|q| q.cooked.as_ref())
                .and_then(|cooked| cooked.as_str())
                .map(str::to_string)
                .ok_or_else(|| self.unsupported(tpl.span, "invalid template literal")),
            Expr::Tpl(tpl) => Err(self.unsupported(
                tpl.span,
                "template literals with substitutions are not supported",
            )),
            Expr::Bin(bin) if bin.op == BinaryOp::Add => {
                let mut value = self.eval_string(&bin.left)?;
                value.push_str(&self.eval_string(&bin.right)?);
                Ok(value)
            }
            other => Err(self.unsupported(other.span(), "expected a string value")),
        }
    }

    fn expect_object<'e>(&self, expr: &'e Expr, what: &str) -> Result<&'e ObjectLit, LoadError> {
        match unwrap_paren(expr) {
            Expr::Object(obj) => Ok(obj),
            other => Err(self.unsupported(other.span(), &format!("expected {}", what))),
        }
    }

    fn key_value<'e>(&self, prop: &'e PropOrSpread) -> Result<(String, &'e Expr), LoadError> {
        match prop {
            PropOrSpread::Spread(spread) => Err(self.unsupported(
                spread.dot3_token,
                "spread properties are not supported",
            )),
            PropOrSpread::Prop(prop) => match &**prop {
                Prop::KeyValue(kv) => {
                    let key = self.prop_name(&kv.key)?;
                    Ok((key, &kv.value))
                }
                other => Err(self.unsupported(
                    other.span(),
                    "only `key: value` properties are supported",
                )),
            },
        }
    }

    fn prop_name(&self, name: &PropName) -> Result<String, LoadError> {
        match name {
            PropName::Ident(ident) => Ok(ident.sym.to_string()),
            PropName::Str(s) => s
                .value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| self.unsupported(s.span, "property name is not valid UTF-8")),
            PropName::Num(n) => Ok(format_number(n.value)),
            other => Err(self.unsupported(other.span(), "computed property names are not supported")),
        }
    }

    fn unsupported(&self, span: Span, message: &str) -> LoadError {
        LoadError::Unsupported {
            path: self.path.to_path_buf(),
            line: self.source_map.lookup_char_pos(span.lo).line,
            message: message.to_string(),
        }
    }
}

impl Visit for ExportsCollector<'_> {
    fn visit_export_default_expr(&mut self, node: &ExportDefaultExpr) {
        if self.error.is_none() {
            self.assign_all(&node.expr);
        }
    }

    fn visit_assign_expr(&mut self, node: &AssignExpr) {
        if self.error.is_some() {
            return;
        }
        if node.op != AssignOp::Assign {
            node.visit_children_with(self);
            return;
        }
        match export_target(&node.left) {
            Some(ExportTarget::Whole) => self.assign_all(&node.right),
            Some(ExportTarget::Keyset(name)) => self.assign_keyset(name, &node.right),
            None => node.visit_children_with(self),
        }
    }

    fn visit_function(&mut self, _node: &Function) {}

    fn visit_arrow_expr(&mut self, _node: &ArrowExpr) {}

    fn visit_class(&mut self, _node: &Class) {}
}

fn export_target(target: &AssignTarget) -> Option<ExportTarget> {
    let AssignTarget::Simple(SimpleAssignTarget::Member(member)) = target else {
        return None;
    };
    let prop = member_prop_name(&member.prop)?;
    match &*member.obj {
        Expr::Ident(obj) if obj.sym.as_str() == "module" && prop == "exports" => {
            Some(ExportTarget::Whole)
        }
        Expr::Ident(obj) if obj.sym.as_str() == "exports" => Some(ExportTarget::Keyset(prop)),
        Expr::Member(inner) if is_module_exports(inner) => Some(ExportTarget::Keyset(prop)),
        _ => None,
    }
}

fn is_module_exports(member: &MemberExpr) -> bool {
    matches!(&*member.obj, Expr::Ident(obj) if obj.sym.as_str() == "module")
        && member_prop_name(&member.prop).as_deref() == Some("exports")
}

fn member_prop_name(prop: &MemberProp) -> Option<String> {
    match prop {
        MemberProp::Ident(ident) => Some(ident.sym.to_string()),
        MemberProp::Computed(computed) => match &*computed.expr {
            Expr::Lit(Lit::Str(s)) => s.value.as_str().map(str::to_string),
            _ => None,
        },
        _ => None,
    }
}

fn unwrap_paren(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_paren(&paren.expr),
        _ => expr,
    }
}

/// Render a numeric property name the way JavaScript stringifies it.
fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
