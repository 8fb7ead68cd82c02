//! Call-expression optimisation for lowered member invocations.
//!
//! Rewriting `obj.#m(args)` produces a callee (the accessor-get result)
//! that has lost its receiver. Reattach it:
//!
//! `get(...)` + `obj` + `(a, b)`   → `get(...).call(obj, a, b)`
//! `get(...)` + `obj` + `(...xs)`  → `get(...).apply(obj, [...xs])`
//!
//! `super`-relative receivers never reach this point: a private name cannot
//! be accessed through `super`, so the callee's receiver is always an
//! ordinary expression.

use swc_common::DUMMY_SP;
use swc_ecma_ast as ast;

use crate::ast_util::{arg, call_with_args, member};

/// Combine an accessor-call result with its original receiver and argument
/// list into a correctly `this`-bound invocation.
pub fn optimise_call(
    callee: ast::Expr,
    this_arg: ast::Expr,
    args: Vec<ast::ExprOrSpread>,
) -> ast::Expr {
    let has_spread = args.iter().any(|a| a.spread.is_some());

    if has_spread {
        // `.call` cannot spread; route through `.apply` with an array.
        let array = ast::Expr::Array(ast::ArrayLit {
            span: DUMMY_SP,
            elems: args.into_iter().map(Some).collect(),
        });
        call_with_args(
            ast::Expr::Member(member(callee, "apply")),
            vec![arg(this_arg), arg(array)],
        )
    } else {
        let mut call_args = vec![arg(this_arg)];
        call_args.extend(args);
        call_with_args(ast::Expr::Member(member(callee, "call")), call_args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast_util::{ident, ident_expr};

    fn spread(expr: ast::Expr) -> ast::ExprOrSpread {
        ast::ExprOrSpread {
            spread: Some(DUMMY_SP),
            expr: Box::new(expr),
        }
    }

    #[test]
    fn plain_args_use_call() {
        let out = optimise_call(
            ident_expr(ident("getter")),
            ident_expr(ident("recv")),
            vec![arg(ident_expr(ident("a")))],
        );
        let ast::Expr::Call(call) = out else {
            panic!("expected a call expression");
        };
        let ast::Callee::Expr(callee) = &call.callee else {
            panic!("expected an expression callee");
        };
        let ast::Expr::Member(m) = &**callee else {
            panic!("expected a member callee");
        };
        let ast::MemberProp::Ident(prop) = &m.prop else {
            panic!("expected an identifier property");
        };
        assert_eq!(&*prop.sym, "call");
        assert_eq!(call.args.len(), 2);
    }

    #[test]
    fn spread_args_use_apply() {
        let out = optimise_call(
            ident_expr(ident("getter")),
            ident_expr(ident("recv")),
            vec![spread(ident_expr(ident("xs")))],
        );
        let ast::Expr::Call(call) = out else {
            panic!("expected a call expression");
        };
        let ast::Callee::Expr(callee) = &call.callee else {
            panic!("expected an expression callee");
        };
        let ast::Expr::Member(m) = &**callee else {
            panic!("expected a member callee");
        };
        let ast::MemberProp::Ident(prop) = &m.prop else {
            panic!("expected an identifier property");
        };
        assert_eq!(&*prop.sym, "apply");
        assert_eq!(call.args.len(), 2);
        assert!(matches!(&*call.args[1].expr, ast::Expr::Array(_)));
    }
}
