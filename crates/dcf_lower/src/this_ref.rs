//! `this` replacement for static field values.
//!
//! A static initializer's `this` is the class under construction. The
//! lowered install statement runs at module level, so `this` is rewritten
//! to the class binding, without crossing into anything that binds its own
//! `this` (functions, methods, accessors). Arrow bodies are descended, as
//! are the heritage clause and computed keys of nested classes, which all
//! evaluate in the outer environment.

use swc_ecma_ast as ast;
use swc_ecma_visit::{VisitMut, VisitMutWith};

use dcf_support::ast_util::ident_expr;

pub(crate) fn replace_this(value: &mut ast::Expr, class_ref: &ast::Ident) {
    let mut replacer = ThisReplacer { class_ref };
    value.visit_mut_with(&mut replacer);
}

struct ThisReplacer<'a> {
    class_ref: &'a ast::Ident,
}

impl VisitMut for ThisReplacer<'_> {
    fn visit_mut_expr(&mut self, expr: &mut ast::Expr) {
        if matches!(expr, ast::Expr::This(_)) {
            *expr = ident_expr(self.class_ref.clone());
            return;
        }
        expr.visit_mut_children_with(self);
    }

    // Function-like nodes bind their own `this`.
    fn visit_mut_function(&mut self, _: &mut ast::Function) {}
    fn visit_mut_constructor(&mut self, _: &mut ast::Constructor) {}
    fn visit_mut_getter_prop(&mut self, _: &mut ast::GetterProp) {}
    fn visit_mut_setter_prop(&mut self, _: &mut ast::SetterProp) {}

    fn visit_mut_class(&mut self, class: &mut ast::Class) {
        // Body `this` belongs to the nested class; its heritage expression
        // and computed member keys still see ours.
        if let Some(super_class) = &mut class.super_class {
            super_class.visit_mut_with(self);
        }
        for member in &mut class.body {
            let key = match member {
                ast::ClassMember::Method(m) => Some(&mut m.key),
                ast::ClassMember::ClassProp(p) => Some(&mut p.key),
                _ => None,
            };
            if let Some(ast::PropName::Computed(computed)) = key {
                computed.expr.visit_mut_with(self);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcf_support::ast_util::ident;
    use dcf_support::parse_module;
    use swc_ecma_ast::{ModuleItem, Stmt};
    use swc_ecma_visit::{Visit, VisitWith};

    #[derive(Default)]
    struct ThisCounter {
        count: usize,
    }

    impl Visit for ThisCounter {
        fn visit_this_expr(&mut self, _: &swc_ecma_ast::ThisExpr) {
            self.count += 1;
        }
    }

    fn first_expr(source: &str) -> ast::Expr {
        let parsed = parse_module(source, "test.js", None).unwrap();
        for item in parsed.module.body {
            if let ModuleItem::Stmt(Stmt::Expr(stmt)) = item {
                return *stmt.expr;
            }
        }
        panic!("no expression statement");
    }

    fn remaining_this(source: &str) -> usize {
        let mut expr = first_expr(source);
        replace_this(&mut expr, &ident("Klass"));
        let mut counter = ThisCounter::default();
        expr.visit_with(&mut counter);
        counter.count
    }

    #[test]
    fn top_level_and_arrow_this_are_replaced() {
        assert_eq!(remaining_this("this.x + (() => this.y)()"), 0);
    }

    #[test]
    fn function_this_is_preserved() {
        assert_eq!(remaining_this("(function () { return this; })"), 1);
        assert_eq!(remaining_this("({ m() { return this; } })"), 1);
    }
}
