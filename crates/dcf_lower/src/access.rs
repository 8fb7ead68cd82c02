//! Access-lowering strategies for private-name use-sites.
//!
//! The walker classifies each use syntactically (read, write, update, call)
//! and hands it to the active mode's strategy. Spec mode routes through the
//! brand-checking runtime helpers and memoises side-effecting receivers so
//! they evaluate exactly once; loose mode rewrites the member expression in
//! place into an ordinary indexable property access, which every syntactic
//! position can keep using directly.

use swc_ecma_ast as ast;

use dcf_support::ast_util::{
    assign_ident, assign_member, bin, call, computed_member, ident_expr, num_lit, seq, unary_plus,
};
use dcf_support::{optimise_call, Helper, HelperRegistry, IdentArena};

use crate::names::PrivateNameEntry;
use crate::Mode;

/// Per-rewrite services threaded from the walker.
pub(crate) struct AccessCtx<'a> {
    pub class_ref: &'a ast::Ident,
    pub arena: &'a mut IdentArena,
    pub helpers: &'a mut HelperRegistry,
    /// Scratch identifiers to declare at the head of the nearest function.
    pub temps: &'a mut Vec<ast::Ident>,
}

/// One private access, detached from the tree: the receiver expression and
/// the resolved entry for the name behind it.
pub(crate) trait AccessStrategy {
    /// `obj.#x` in read position.
    fn read(&self, cx: &mut AccessCtx<'_>, entry: &PrivateNameEntry, obj: ast::Expr) -> ast::Expr;

    /// `obj.#x op rhs` for every assignment operator.
    fn write(
        &self,
        cx: &mut AccessCtx<'_>,
        entry: &PrivateNameEntry,
        obj: ast::Expr,
        op: ast::AssignOp,
        rhs: ast::Expr,
    ) -> ast::Expr;

    /// `obj.#x++` / `--obj.#x`.
    fn update(
        &self,
        cx: &mut AccessCtx<'_>,
        entry: &PrivateNameEntry,
        obj: ast::Expr,
        op: ast::UpdateOp,
        prefix: bool,
    ) -> ast::Expr;

    /// `obj.#x(args)`.
    fn call(
        &self,
        cx: &mut AccessCtx<'_>,
        entry: &PrivateNameEntry,
        obj: ast::Expr,
        args: Vec<ast::ExprOrSpread>,
    ) -> ast::Expr;
}

pub(crate) fn strategy_for(mode: Mode) -> &'static dyn AccessStrategy {
    match mode {
        Mode::Spec => &SpecAccess,
        Mode::Loose => &LooseAccess,
    }
}

/// A receiver expression prepared for a fixed number of reads.
///
/// Trivial receivers (`this`, bare identifiers) are cloned per read. Anything
/// else gets a scratch binding: the first read yields `_t = <obj>`, later
/// reads yield `_t`, so the original expression evaluates exactly once and
/// every generated access shares the same value.
enum Memoised {
    Plain {
        expr: ast::Expr,
        remaining: usize,
    },
    Temp {
        ident: ast::Ident,
        init: Option<Box<ast::Expr>>,
        remaining: usize,
    },
}

impl Memoised {
    fn new(cx: &mut AccessCtx<'_>, obj: ast::Expr, uses: usize) -> Memoised {
        match obj {
            ast::Expr::This(_) | ast::Expr::Ident(_) => Memoised::Plain {
                expr: obj,
                remaining: uses,
            },
            other => {
                let ident = cx.arena.fresh(&temp_base(&other));
                cx.temps.push(ident.clone());
                Memoised::Temp {
                    ident,
                    init: Some(Box::new(other)),
                    remaining: uses,
                }
            }
        }
    }

    fn receiver(&mut self) -> ast::Expr {
        match self {
            Memoised::Plain { expr, remaining } => {
                debug_assert!(*remaining > 0, "receiver read past its declared use count");
                *remaining = remaining.saturating_sub(1);
                expr.clone()
            }
            Memoised::Temp {
                ident,
                init,
                remaining,
            } => {
                debug_assert!(*remaining > 0, "receiver read past its declared use count");
                *remaining = remaining.saturating_sub(1);
                match init.take() {
                    Some(original) => assign_ident(ident.clone(), *original),
                    None => ident_expr(ident.clone()),
                }
            }
        }
    }
}

/// Name the scratch binding after the receiver where that reads well.
fn temp_base(expr: &ast::Expr) -> String {
    match expr {
        ast::Expr::Ident(i) => i.sym.to_string(),
        ast::Expr::Call(c) => {
            if let ast::Callee::Expr(callee) = &c.callee {
                if let ast::Expr::Ident(i) = &**callee {
                    return i.sym.to_string();
                }
            }
            "obj".to_string()
        }
        _ => "obj".to_string(),
    }
}

enum WriteKind {
    Plain,
    Arith(ast::BinaryOp),
    Logical(ast::BinaryOp),
}

fn classify_assign_op(op: ast::AssignOp) -> WriteKind {
    use ast::AssignOp::*;
    use ast::BinaryOp;
    match op {
        Assign => WriteKind::Plain,
        AddAssign => WriteKind::Arith(BinaryOp::Add),
        SubAssign => WriteKind::Arith(BinaryOp::Sub),
        MulAssign => WriteKind::Arith(BinaryOp::Mul),
        DivAssign => WriteKind::Arith(BinaryOp::Div),
        ModAssign => WriteKind::Arith(BinaryOp::Mod),
        LShiftAssign => WriteKind::Arith(BinaryOp::LShift),
        RShiftAssign => WriteKind::Arith(BinaryOp::RShift),
        ZeroFillRShiftAssign => WriteKind::Arith(BinaryOp::ZeroFillRShift),
        BitOrAssign => WriteKind::Arith(BinaryOp::BitOr),
        BitXorAssign => WriteKind::Arith(BinaryOp::BitXor),
        BitAndAssign => WriteKind::Arith(BinaryOp::BitAnd),
        ExpAssign => WriteKind::Arith(BinaryOp::Exp),
        AndAssign => WriteKind::Logical(BinaryOp::LogicalAnd),
        OrAssign => WriteKind::Logical(BinaryOp::LogicalOr),
        NullishAssign => WriteKind::Logical(BinaryOp::NullishCoalescing),
    }
}

/// Full-semantics strategy: every access goes through a runtime helper that
/// brand-checks the receiver before touching the hidden storage.
struct SpecAccess;

fn spec_get(cx: &mut AccessCtx<'_>, entry: &PrivateNameEntry, receiver: ast::Expr) -> ast::Expr {
    if entry.is_static {
        let helper = cx.helpers.reference(Helper::ClassStaticPrivateFieldSpecGet);
        call(
            ident_expr(helper),
            vec![
                receiver,
                ident_expr(cx.class_ref.clone()),
                ident_expr(entry.internal_id.clone()),
            ],
        )
    } else {
        let helper = cx.helpers.reference(Helper::ClassPrivateFieldGet);
        call(
            ident_expr(helper),
            vec![receiver, ident_expr(entry.internal_id.clone())],
        )
    }
}

fn spec_set(
    cx: &mut AccessCtx<'_>,
    entry: &PrivateNameEntry,
    receiver: ast::Expr,
    value: ast::Expr,
) -> ast::Expr {
    if entry.is_static {
        let helper = cx.helpers.reference(Helper::ClassStaticPrivateFieldSpecSet);
        call(
            ident_expr(helper),
            vec![
                receiver,
                ident_expr(cx.class_ref.clone()),
                ident_expr(entry.internal_id.clone()),
                value,
            ],
        )
    } else {
        let helper = cx.helpers.reference(Helper::ClassPrivateFieldSet);
        call(
            ident_expr(helper),
            vec![receiver, ident_expr(entry.internal_id.clone()), value],
        )
    }
}

impl AccessStrategy for SpecAccess {
    fn read(&self, cx: &mut AccessCtx<'_>, entry: &PrivateNameEntry, obj: ast::Expr) -> ast::Expr {
        spec_get(cx, entry, obj)
    }

    fn write(
        &self,
        cx: &mut AccessCtx<'_>,
        entry: &PrivateNameEntry,
        obj: ast::Expr,
        op: ast::AssignOp,
        rhs: ast::Expr,
    ) -> ast::Expr {
        match classify_assign_op(op) {
            WriteKind::Plain => spec_set(cx, entry, obj, rhs),
            WriteKind::Arith(bin_op) => {
                // set(<m>, get(<r>) op rhs): the set receiver carries the
                // one-time evaluation and is the first argument, so the
                // original left-to-right order survives the rewrite.
                let mut memo = Memoised::new(cx, obj, 2);
                let set_recv = memo.receiver();
                let get_recv = memo.receiver();
                let old = spec_get(cx, entry, get_recv);
                spec_set(cx, entry, set_recv, bin(old, bin_op, rhs))
            }
            WriteKind::Logical(bin_op) => {
                // get(<m>) op set(<r>, rhs): the rhs and the store only
                // evaluate when the operator's short-circuit lets them.
                let mut memo = Memoised::new(cx, obj, 2);
                let get_recv = memo.receiver();
                let set_recv = memo.receiver();
                let old = spec_get(cx, entry, get_recv);
                let store = spec_set(cx, entry, set_recv, rhs);
                bin(old, bin_op, store)
            }
        }
    }

    fn update(
        &self,
        cx: &mut AccessCtx<'_>,
        entry: &PrivateNameEntry,
        obj: ast::Expr,
        op: ast::UpdateOp,
        prefix: bool,
    ) -> ast::Expr {
        let bin_op = match op {
            ast::UpdateOp::PlusPlus => ast::BinaryOp::Add,
            ast::UpdateOp::MinusMinus => ast::BinaryOp::Sub,
        };
        let mut memo = Memoised::new(cx, obj, 2);
        let set_recv = memo.receiver();
        let get_recv = memo.receiver();
        if prefix {
            let old = unary_plus(spec_get(cx, entry, get_recv));
            spec_set(cx, entry, set_recv, bin(old, bin_op, num_lit(1.0)))
        } else {
            // The expression's value is the coerced old value; capture it
            // before the store and yield it from a sequence.
            let old_ident = cx.arena.fresh("old");
            cx.temps.push(old_ident.clone());
            let capture = assign_ident(old_ident.clone(), unary_plus(spec_get(cx, entry, get_recv)));
            let store = spec_set(cx, entry, set_recv, bin(capture, bin_op, num_lit(1.0)));
            seq(vec![store, ident_expr(old_ident)])
        }
    }

    fn call(
        &self,
        cx: &mut AccessCtx<'_>,
        entry: &PrivateNameEntry,
        obj: ast::Expr,
        args: Vec<ast::ExprOrSpread>,
    ) -> ast::Expr {
        // The get needs one read and the bound call one more; the get's
        // receiver is evaluated first, so it carries the initialization.
        let mut memo = Memoised::new(cx, obj, 2);
        let get_recv = memo.receiver();
        let this_arg = memo.receiver();
        let callee = spec_get(cx, entry, get_recv);
        optimise_call(callee, this_arg, args)
    }
}

/// Direct-property strategy: one rewrite shape for every position.
///
/// `obj.#x` becomes `_classPrivateFieldLooseBase(obj, _x)[_x]`, an ordinary
/// member expression, so assignment operators, updates, and calls keep their
/// original surrounding node and their native evaluation semantics (the
/// receiver occurs once, inside the base call).
struct LooseAccess;

fn loose_member(
    cx: &mut AccessCtx<'_>,
    entry: &PrivateNameEntry,
    obj: ast::Expr,
) -> ast::MemberExpr {
    let helper = cx.helpers.reference(Helper::ClassPrivateFieldLooseBase);
    let base = call(
        ident_expr(helper),
        vec![obj, ident_expr(entry.internal_id.clone())],
    );
    computed_member(base, ident_expr(entry.internal_id.clone()))
}

impl AccessStrategy for LooseAccess {
    fn read(&self, cx: &mut AccessCtx<'_>, entry: &PrivateNameEntry, obj: ast::Expr) -> ast::Expr {
        ast::Expr::Member(loose_member(cx, entry, obj))
    }

    fn write(
        &self,
        cx: &mut AccessCtx<'_>,
        entry: &PrivateNameEntry,
        obj: ast::Expr,
        op: ast::AssignOp,
        rhs: ast::Expr,
    ) -> ast::Expr {
        assign_member(loose_member(cx, entry, obj), op, rhs)
    }

    fn update(
        &self,
        cx: &mut AccessCtx<'_>,
        entry: &PrivateNameEntry,
        obj: ast::Expr,
        op: ast::UpdateOp,
        prefix: bool,
    ) -> ast::Expr {
        ast::Expr::Update(ast::UpdateExpr {
            span: swc_common::DUMMY_SP,
            op,
            prefix,
            arg: Box::new(ast::Expr::Member(loose_member(cx, entry, obj))),
        })
    }

    fn call(
        &self,
        cx: &mut AccessCtx<'_>,
        entry: &PrivateNameEntry,
        obj: ast::Expr,
        args: Vec<ast::ExprOrSpread>,
    ) -> ast::Expr {
        // The member callee keeps the base object as `this` natively.
        dcf_support::ast_util::call_with_args(
            ast::Expr::Member(loose_member(cx, entry, obj)),
            args,
        )
    }
}
