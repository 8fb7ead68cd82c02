//! Scoped reference walker: finds every use of a private name in the
//! class's lexical extent and dispatches it to the active mode's strategy.
//!
//! Shadowing: a nested class that redeclares a private name masks that name
//! for its whole extent, including computed keys and heritage clauses,
//! which evaluate under the inner class's private environment. Masked
//! references are left for the later pass that lowers the inner class with
//! its own map; non-colliding outer names are still rewritten everywhere
//! inside the nested class.

use swc_ecma_ast as ast;
use swc_ecma_visit::{VisitMut, VisitMutWith};

use dcf_support::ast_util::var_stmt_multi;

use crate::access::{strategy_for, AccessCtx};
use crate::names::{PrivateNameEntry, PrivateNamesMap};
use crate::{LowerCtx, Mode};

/// Rewrite every private-name use-site in `class`'s extent.
///
/// Receiver temporaries are declared at the head of the function they occur
/// in; temporaries created outside any function (heritage, computed keys,
/// field values) are returned for the caller to declare at module level.
pub(crate) fn rewrite_private_uses(
    class: &mut ast::Class,
    names: &PrivateNamesMap,
    class_ref: &ast::Ident,
    cx: &mut LowerCtx<'_>,
) -> Vec<ast::Ident> {
    if names.is_empty() {
        return Vec::new();
    }
    let mut walker = PrivateAccessRewriter {
        names,
        class_ref,
        mode: cx.mode,
        arena: &mut *cx.arena,
        helpers: &mut *cx.helpers,
        masked: Vec::new(),
        scopes: vec![Vec::new()],
    };
    // Children, not the class node itself: the visitor's class handling is
    // for *nested* classes only.
    class.visit_mut_children_with(&mut walker);
    walker.scopes.pop().unwrap_or_default()
}

struct PrivateAccessRewriter<'a> {
    names: &'a PrivateNamesMap,
    class_ref: &'a ast::Ident,
    mode: Mode,
    arena: &'a mut dcf_support::IdentArena,
    helpers: &'a mut dcf_support::HelperRegistry,
    /// Names hidden by redeclarations in enclosing nested classes.
    masked: Vec<String>,
    /// Pending scratch declarations, one list per enclosing function scope;
    /// the outermost list collects class-level temporaries.
    scopes: Vec<Vec<ast::Ident>>,
}

impl PrivateAccessRewriter<'_> {
    /// The entry for a member property, if it is a live private name.
    fn resolve(&self, prop: &ast::MemberProp) -> Option<PrivateNameEntry> {
        let ast::MemberProp::PrivateName(p) = prop else {
            return None;
        };
        let name: &str = &p.name;
        if self.masked.iter().any(|m| m == name) {
            return None;
        }
        self.names.get(name).cloned()
    }

    /// Classify a private use-site and build its replacement.
    ///
    /// Returns `None` when the expression is not a private access (or the
    /// name is masked); the caller then descends normally.
    fn lower_use(&mut self, expr: &mut ast::Expr) -> Option<ast::Expr> {
        match expr {
            // Plain read: any member position not claimed below.
            ast::Expr::Member(member) => {
                let entry = self.resolve(&member.prop)?;
                let obj = *std::mem::take(&mut member.obj);
                let strategy = strategy_for(self.mode);
                let mut cx = AccessCtx {
                    class_ref: self.class_ref,
                    arena: &mut *self.arena,
                    helpers: &mut *self.helpers,
                    temps: self.scopes.last_mut()?,
                };
                Some(strategy.read(&mut cx, &entry, obj))
            }
            // `obj.#x op= rhs` with a simple member target.
            ast::Expr::Assign(assign) => {
                let ast::AssignTarget::Simple(ast::SimpleAssignTarget::Member(member)) =
                    &mut assign.left
                else {
                    return None;
                };
                let entry = self.resolve(&member.prop)?;
                let obj = *std::mem::take(&mut member.obj);
                let rhs = *std::mem::take(&mut assign.right);
                let op = assign.op;
                let strategy = strategy_for(self.mode);
                let mut cx = AccessCtx {
                    class_ref: self.class_ref,
                    arena: &mut *self.arena,
                    helpers: &mut *self.helpers,
                    temps: self.scopes.last_mut()?,
                };
                Some(strategy.write(&mut cx, &entry, obj, op, rhs))
            }
            // `obj.#x++` / `--obj.#x`.
            ast::Expr::Update(update) => {
                let ast::Expr::Member(member) = &mut *update.arg else {
                    return None;
                };
                let entry = self.resolve(&member.prop)?;
                let obj = *std::mem::take(&mut member.obj);
                let (op, prefix) = (update.op, update.prefix);
                let strategy = strategy_for(self.mode);
                let mut cx = AccessCtx {
                    class_ref: self.class_ref,
                    arena: &mut *self.arena,
                    helpers: &mut *self.helpers,
                    temps: self.scopes.last_mut()?,
                };
                Some(strategy.update(&mut cx, &entry, obj, op, prefix))
            }
            // `obj.#m(args)`.
            ast::Expr::Call(call) => {
                let ast::Callee::Expr(callee) = &mut call.callee else {
                    return None;
                };
                let ast::Expr::Member(member) = &mut **callee else {
                    return None;
                };
                let entry = self.resolve(&member.prop)?;
                let obj = *std::mem::take(&mut member.obj);
                let args = std::mem::take(&mut call.args);
                let strategy = strategy_for(self.mode);
                let mut cx = AccessCtx {
                    class_ref: self.class_ref,
                    arena: &mut *self.arena,
                    helpers: &mut *self.helpers,
                    temps: self.scopes.last_mut()?,
                };
                Some(strategy.call(&mut cx, &entry, obj, args))
            }
            _ => None,
        }
    }

    fn enter_scope(&mut self) {
        self.scopes.push(Vec::new());
    }

    fn exit_scope(&mut self) -> Vec<ast::Ident> {
        self.scopes.pop().unwrap_or_default()
    }

    /// Hand temporaries that found no function body back to the parent scope.
    fn bubble_up(&mut self, temps: Vec<ast::Ident>) {
        if let Some(parent) = self.scopes.last_mut() {
            parent.extend(temps);
        }
    }
}

impl VisitMut for PrivateAccessRewriter<'_> {
    fn visit_mut_expr(&mut self, expr: &mut ast::Expr) {
        if let Some(replacement) = self.lower_use(expr) {
            *expr = replacement;
        }
        // The replacement's root is never itself a private access, so
        // visiting children after substitution rewrites the receiver and
        // argument subtrees exactly once and cannot loop.
        expr.visit_mut_children_with(self);
    }

    fn visit_mut_function(&mut self, function: &mut ast::Function) {
        self.enter_scope();
        function.visit_mut_children_with(self);
        let temps = self.exit_scope();
        if temps.is_empty() {
            return;
        }
        match &mut function.body {
            Some(body) => body.stmts.insert(0, var_stmt_multi(temps)),
            None => self.bubble_up(temps),
        }
    }

    fn visit_mut_constructor(&mut self, ctor: &mut ast::Constructor) {
        self.enter_scope();
        ctor.visit_mut_children_with(self);
        let temps = self.exit_scope();
        if temps.is_empty() {
            return;
        }
        match &mut ctor.body {
            Some(body) => body.stmts.insert(0, var_stmt_multi(temps)),
            None => self.bubble_up(temps),
        }
    }

    fn visit_mut_arrow_expr(&mut self, arrow: &mut ast::ArrowExpr) {
        // Only block-bodied arrows can host `var` declarations; temporaries
        // in expression-bodied arrows bubble to the enclosing function.
        if !matches!(&*arrow.body, ast::BlockStmtOrExpr::BlockStmt(_)) {
            arrow.visit_mut_children_with(self);
            return;
        }
        self.enter_scope();
        arrow.visit_mut_children_with(self);
        let temps = self.exit_scope();
        if temps.is_empty() {
            return;
        }
        if let ast::BlockStmtOrExpr::BlockStmt(body) = &mut *arrow.body {
            body.stmts.insert(0, var_stmt_multi(temps));
        }
    }

    fn visit_mut_static_block(&mut self, block: &mut ast::StaticBlock) {
        self.enter_scope();
        block.visit_mut_children_with(self);
        let temps = self.exit_scope();
        if !temps.is_empty() {
            block.body.stmts.insert(0, var_stmt_multi(temps));
        }
    }

    fn visit_mut_class(&mut self, class: &mut ast::Class) {
        // A nested class: mask the names it redeclares for its extent.
        let mut newly_masked = Vec::new();
        for member in &class.body {
            let name = match member {
                ast::ClassMember::PrivateProp(prop) => prop.key.name.to_string(),
                ast::ClassMember::PrivateMethod(method) => method.key.name.to_string(),
                _ => continue,
            };
            if self.names.contains(&name)
                && !self.masked.contains(&name)
                && !newly_masked.contains(&name)
            {
                newly_masked.push(name);
            }
        }
        let count = newly_masked.len();
        self.masked.append(&mut newly_masked);
        class.visit_mut_children_with(self);
        self.masked.truncate(self.masked.len() - count);
    }
}
