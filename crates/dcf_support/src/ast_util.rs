//! Constructors for the AST shapes the lowering pass emits.
//!
//! Every generated node is built here so the construction details live in
//! one place. Spans are `DUMMY_SP` throughout: generated code has no source
//! position of its own.

use swc_common::DUMMY_SP;
use swc_ecma_ast as ast;

pub fn ident(sym: &str) -> ast::Ident {
    ast::Ident::new_no_ctxt(sym.into(), DUMMY_SP)
}

pub fn ident_expr(id: ast::Ident) -> ast::Expr {
    ast::Expr::Ident(id)
}

pub fn ident_name(sym: &str) -> ast::IdentName {
    ast::IdentName {
        span: DUMMY_SP,
        sym: sym.into(),
    }
}

pub fn this_expr() -> ast::Expr {
    ast::Expr::This(ast::ThisExpr { span: DUMMY_SP })
}

pub fn str_lit(value: &str) -> ast::Expr {
    ast::Expr::Lit(ast::Lit::Str(ast::Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: None,
    }))
}

pub fn num_lit(value: f64) -> ast::Expr {
    ast::Expr::Lit(ast::Lit::Num(ast::Number {
        span: DUMMY_SP,
        value,
        raw: None,
    }))
}

pub fn bool_lit(value: bool) -> ast::Expr {
    ast::Expr::Lit(ast::Lit::Bool(ast::Bool {
        span: DUMMY_SP,
        value,
    }))
}

/// `void 0` — the canonical "no initializer" value.
pub fn void_zero() -> ast::Expr {
    ast::Expr::Unary(ast::UnaryExpr {
        span: DUMMY_SP,
        op: ast::UnaryOp::Void,
        arg: Box::new(num_lit(0.0)),
    })
}

/// `obj.prop` with a plain identifier property.
pub fn member(obj: ast::Expr, prop: &str) -> ast::MemberExpr {
    ast::MemberExpr {
        span: DUMMY_SP,
        obj: Box::new(obj),
        prop: ast::MemberProp::Ident(ident_name(prop)),
    }
}

/// `obj[key]`.
pub fn computed_member(obj: ast::Expr, key: ast::Expr) -> ast::MemberExpr {
    ast::MemberExpr {
        span: DUMMY_SP,
        obj: Box::new(obj),
        prop: ast::MemberProp::Computed(ast::ComputedPropName {
            span: DUMMY_SP,
            expr: Box::new(key),
        }),
    }
}

pub fn arg(expr: ast::Expr) -> ast::ExprOrSpread {
    ast::ExprOrSpread {
        spread: None,
        expr: Box::new(expr),
    }
}

/// `callee(args)` with plain (non-spread) arguments.
pub fn call(callee: ast::Expr, args: Vec<ast::Expr>) -> ast::Expr {
    call_with_args(callee, args.into_iter().map(arg).collect())
}

pub fn call_with_args(callee: ast::Expr, args: Vec<ast::ExprOrSpread>) -> ast::Expr {
    ast::Expr::Call(ast::CallExpr {
        span: DUMMY_SP,
        callee: ast::Callee::Expr(Box::new(callee)),
        args,
        type_args: None,
        ..Default::default()
    })
}

/// `new callee(args)`.
pub fn new_expr(callee: ast::Expr, args: Vec<ast::Expr>) -> ast::Expr {
    ast::Expr::New(ast::NewExpr {
        span: DUMMY_SP,
        callee: Box::new(callee),
        args: Some(args.into_iter().map(arg).collect()),
        type_args: None,
        ..Default::default()
    })
}

/// `target = value` as an expression, with an identifier target.
pub fn assign_ident(target: ast::Ident, value: ast::Expr) -> ast::Expr {
    ast::Expr::Assign(ast::AssignExpr {
        span: DUMMY_SP,
        op: ast::AssignOp::Assign,
        left: ast::AssignTarget::Simple(ast::SimpleAssignTarget::Ident(target.into())),
        right: Box::new(value),
    })
}

/// `target op value` with a member-expression target (`=`, `+=`, …).
pub fn assign_member(target: ast::MemberExpr, op: ast::AssignOp, value: ast::Expr) -> ast::Expr {
    ast::Expr::Assign(ast::AssignExpr {
        span: DUMMY_SP,
        op,
        left: ast::AssignTarget::Simple(ast::SimpleAssignTarget::Member(target)),
        right: Box::new(value),
    })
}

pub fn bin(left: ast::Expr, op: ast::BinaryOp, right: ast::Expr) -> ast::Expr {
    ast::Expr::Bin(ast::BinExpr {
        span: DUMMY_SP,
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// `+expr` — numeric coercion for update-operator lowering.
pub fn unary_plus(expr: ast::Expr) -> ast::Expr {
    ast::Expr::Unary(ast::UnaryExpr {
        span: DUMMY_SP,
        op: ast::UnaryOp::Plus,
        arg: Box::new(expr),
    })
}

pub fn seq(exprs: Vec<ast::Expr>) -> ast::Expr {
    ast::Expr::Seq(ast::SeqExpr {
        span: DUMMY_SP,
        exprs: exprs.into_iter().map(Box::new).collect(),
    })
}

/// `{ key: value, … }` with plain identifier keys.
pub fn object_lit(props: Vec<(&str, ast::Expr)>) -> ast::Expr {
    ast::Expr::Object(ast::ObjectLit {
        span: DUMMY_SP,
        props: props
            .into_iter()
            .map(|(key, value)| {
                ast::PropOrSpread::Prop(Box::new(ast::Prop::KeyValue(ast::KeyValueProp {
                    key: ast::PropName::Ident(ident_name(key)),
                    value: Box::new(value),
                })))
            })
            .collect(),
    })
}

/// `{ writable: true, value: <value> }` — the private-field descriptor shape.
pub fn descriptor(value: ast::Expr) -> ast::Expr {
    object_lit(vec![("writable", bool_lit(true)), ("value", value)])
}

pub fn expr_stmt(expr: ast::Expr) -> ast::Stmt {
    ast::Stmt::Expr(ast::ExprStmt {
        span: DUMMY_SP,
        expr: Box::new(expr),
    })
}

/// `var name = init;`
pub fn var_stmt(name: ast::Ident, init: Option<ast::Expr>) -> ast::Stmt {
    var_decl_stmt(vec![declarator(name, init)])
}

/// `var a, b, c;` — uninitialized scratch declarations.
pub fn var_stmt_multi(names: Vec<ast::Ident>) -> ast::Stmt {
    var_decl_stmt(names.into_iter().map(|n| declarator(n, None)).collect())
}

fn declarator(name: ast::Ident, init: Option<ast::Expr>) -> ast::VarDeclarator {
    ast::VarDeclarator {
        span: DUMMY_SP,
        name: ast::Pat::Ident(name.into()),
        init: init.map(Box::new),
        definite: false,
    }
}

fn var_decl_stmt(decls: Vec<ast::VarDeclarator>) -> ast::Stmt {
    ast::Stmt::Decl(ast::Decl::Var(Box::new(ast::VarDecl {
        span: DUMMY_SP,
        ctxt: Default::default(),
        kind: ast::VarDeclKind::Var,
        declare: false,
        decls,
    })))
}
