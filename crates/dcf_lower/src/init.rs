//! Field-initializer builders.
//!
//! Field members are stripped from the class body and reinstalled through
//! statements. The strategy is the (static, private, mode) triple; the
//! eight combinations are an explicit sum type so the dispatch is total by
//! construction, with no fall-through case to defend against.

use swc_ecma_ast as ast;

use dcf_support::ast_util::{
    assign_member, call, computed_member, descriptor, expr_stmt, ident, ident_expr, member,
    new_expr, str_lit, this_expr, var_stmt, void_zero,
};
use dcf_support::Helper;

use crate::names::{PrivateNameEntry, PrivateNamesMap};
use crate::this_ref;
use crate::{LowerCtx, Mode};

/// Statements produced by lowering one class's fields.
#[derive(Debug, Default)]
pub struct LoweredFields {
    /// Backing-storage declarations; splice before the class definition.
    pub decls: Vec<ast::Stmt>,
    /// Static installs; splice after the class definition.
    pub static_inits: Vec<ast::Stmt>,
    /// Per-instance installs; splice into the constructor after `super()`.
    pub instance_inits: Vec<ast::Stmt>,
}

/// Which field a declared key belongs to: an ordinary property name, or a
/// resolved private entry.
enum FieldKey {
    Public(ast::PropName),
    Private(PrivateNameEntry),
}

/// The eight installation strategies, keyed by (static, private, mode).
enum FieldKind {
    InstancePublicSpec(ast::PropName),
    InstancePublicLoose(ast::PropName),
    InstancePrivateSpec(PrivateNameEntry),
    InstancePrivateLoose(PrivateNameEntry),
    StaticPublicSpec(ast::PropName),
    StaticPublicLoose(ast::PropName),
    StaticPrivateSpec(PrivateNameEntry),
    StaticPrivateLoose(PrivateNameEntry),
}

impl FieldKind {
    fn select(is_static: bool, key: FieldKey, mode: Mode) -> FieldKind {
        match (is_static, key, mode) {
            (false, FieldKey::Public(k), Mode::Spec) => FieldKind::InstancePublicSpec(k),
            (false, FieldKey::Public(k), Mode::Loose) => FieldKind::InstancePublicLoose(k),
            (false, FieldKey::Private(e), Mode::Spec) => FieldKind::InstancePrivateSpec(e),
            (false, FieldKey::Private(e), Mode::Loose) => FieldKind::InstancePrivateLoose(e),
            (true, FieldKey::Public(k), Mode::Spec) => FieldKind::StaticPublicSpec(k),
            (true, FieldKey::Public(k), Mode::Loose) => FieldKind::StaticPublicLoose(k),
            (true, FieldKey::Private(e), Mode::Spec) => FieldKind::StaticPrivateSpec(e),
            (true, FieldKey::Private(e), Mode::Loose) => FieldKind::StaticPrivateLoose(e),
        }
    }
}

/// Strip field declarations from the class body and build their initializer
/// statements. Use-site rewriting must already have run: initializer values
/// are carried over verbatim.
pub(crate) fn extract_field_inits(
    class: &mut ast::Class,
    class_ref: &ast::Ident,
    names: &PrivateNamesMap,
    cx: &mut LowerCtx<'_>,
) -> LoweredFields {
    let mut out = LoweredFields::default();
    let members = std::mem::take(&mut class.body);

    for class_member in members {
        match class_member {
            ast::ClassMember::ClassProp(prop) => {
                if prop.declare || prop.is_abstract {
                    // Type-level declarations erase without a trace.
                    continue;
                }
                let is_static = prop.is_static;
                let value = init_value(prop.value, is_static, class_ref);
                let kind = FieldKind::select(is_static, FieldKey::Public(prop.key), cx.mode);
                push_field_init(&mut out, kind, value, class_ref, cx);
            }
            ast::ClassMember::PrivateProp(prop) => {
                let name = prop.key.name.to_string();
                // The walker only dispatches names it confirmed in the map;
                // the same guard applies here.
                let Some(entry) = names.get(&name) else {
                    class.body.push(ast::ClassMember::PrivateProp(prop));
                    continue;
                };
                let entry = entry.clone();
                let is_static = prop.is_static;
                let value = init_value(prop.value, is_static, class_ref);
                let kind = FieldKind::select(is_static, FieldKey::Private(entry), cx.mode);
                push_field_init(&mut out, kind, value, class_ref, cx);
            }
            other => class.body.push(other),
        }
    }

    out
}

fn init_value(
    value: Option<Box<ast::Expr>>,
    is_static: bool,
    class_ref: &ast::Ident,
) -> ast::Expr {
    let mut value = value.map(|v| *v).unwrap_or_else(void_zero);
    if is_static {
        // A static value's `this` is the class under construction; the
        // statement runs at module level, so point it at the class binding.
        this_ref::replace_this(&mut value, class_ref);
    }
    value
}

fn push_field_init(
    out: &mut LoweredFields,
    kind: FieldKind,
    value: ast::Expr,
    class_ref: &ast::Ident,
    cx: &mut LowerCtx<'_>,
) {
    match kind {
        FieldKind::InstancePublicSpec(key) => {
            let stmt = define_property_stmt(cx, this_expr(), key, value);
            out.instance_inits.push(stmt);
        }
        FieldKind::InstancePublicLoose(key) => {
            let target = prop_key_member(this_expr(), key);
            out.instance_inits
                .push(expr_stmt(assign_member(target, ast::AssignOp::Assign, value)));
        }
        FieldKind::InstancePrivateSpec(entry) => {
            out.decls.push(var_stmt(
                entry.internal_id.clone(),
                Some(new_expr(ident_expr(ident("WeakMap")), vec![])),
            ));
            let store = call(
                ast::Expr::Member(member(ident_expr(entry.internal_id.clone()), "set")),
                vec![this_expr(), descriptor(value)],
            );
            out.instance_inits.push(expr_stmt(store));
        }
        FieldKind::InstancePrivateLoose(entry) => {
            out.decls.push(loose_key_decl(cx, &entry));
            out.instance_inits
                .push(masked_define_stmt(this_expr(), &entry, value));
        }
        FieldKind::StaticPublicSpec(key) => {
            let stmt = define_property_stmt(cx, ident_expr(class_ref.clone()), key, value);
            out.static_inits.push(stmt);
        }
        FieldKind::StaticPublicLoose(key) => {
            let target = prop_key_member(ident_expr(class_ref.clone()), key);
            out.static_inits
                .push(expr_stmt(assign_member(target, ast::AssignOp::Assign, value)));
        }
        FieldKind::StaticPrivateSpec(entry) => {
            // Statics are not per-instance: the descriptor binding itself is
            // the storage, no shared map involved.
            out.static_inits
                .push(var_stmt(entry.internal_id.clone(), Some(descriptor(value))));
        }
        FieldKind::StaticPrivateLoose(entry) => {
            out.decls.push(loose_key_decl(cx, &entry));
            out.static_inits
                .push(masked_define_stmt(ident_expr(class_ref.clone()), &entry, value));
        }
    }
}

/// `_defineProperty(<target>, <key>, <value>);`
fn define_property_stmt(
    cx: &mut LowerCtx<'_>,
    target: ast::Expr,
    key: ast::PropName,
    value: ast::Expr,
) -> ast::Stmt {
    let helper = cx.helpers.reference(Helper::DefineProperty);
    expr_stmt(call(
        ident_expr(helper),
        vec![target, prop_key_expr(key), value],
    ))
}

/// `var _x = _classPrivateFieldLooseKey("x");`
fn loose_key_decl(cx: &mut LowerCtx<'_>, entry: &PrivateNameEntry) -> ast::Stmt {
    let helper = cx.helpers.reference(Helper::ClassPrivateFieldLooseKey);
    var_stmt(
        entry.internal_id.clone(),
        Some(call(ident_expr(helper), vec![str_lit(&entry.name)])),
    )
}

/// `Object.defineProperty(<target>, _x, { writable: true, value: <value> });`
///
/// Enumerable and configurable default to false, which is exactly the
/// masked-key install: invisible to enumeration, not reconfigurable, but
/// writable like a field.
fn masked_define_stmt(target: ast::Expr, entry: &PrivateNameEntry, value: ast::Expr) -> ast::Stmt {
    let define = ast::Expr::Member(member(ident_expr(ident("Object")), "defineProperty"));
    expr_stmt(call(
        define,
        vec![
            target,
            ident_expr(entry.internal_id.clone()),
            descriptor(value),
        ],
    ))
}

/// A declared key as a value expression (helper-call argument position).
fn prop_key_expr(key: ast::PropName) -> ast::Expr {
    match key {
        ast::PropName::Ident(i) => str_lit(&i.sym),
        ast::PropName::Str(s) => ast::Expr::Lit(ast::Lit::Str(s)),
        ast::PropName::Num(n) => ast::Expr::Lit(ast::Lit::Num(n)),
        ast::PropName::BigInt(b) => ast::Expr::Lit(ast::Lit::BigInt(b)),
        ast::PropName::Computed(c) => *c.expr,
    }
}

/// A declared key as an assignment target on `target`.
fn prop_key_member(target: ast::Expr, key: ast::PropName) -> ast::MemberExpr {
    match key {
        ast::PropName::Ident(i) => ast::MemberExpr {
            span: swc_common::DUMMY_SP,
            obj: Box::new(target),
            prop: ast::MemberProp::Ident(i),
        },
        other => computed_member(target, prop_key_expr(other)),
    }
}
