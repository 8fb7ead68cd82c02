//! Module-level driver.
//!
//! Walks a module, lowers every class declaration it finds, and splices the
//! results: backing-storage declarations before the class, static installs
//! after it, instance installs into the constructor (synthesizing one when
//! the class has none), and the runtime-helper prelude once at the top of
//! the module.
//!
//! Classes are processed outermost-first; a nested class is picked up by
//! the statement walk of the surrounding (already lowered) body and gets
//! its own name map, so shadowed names resolve to the innermost declaring
//! class.

use anyhow::Result;
use swc_common::{sync::Lrc, SourceMap, DUMMY_SP};
use swc_ecma_ast as ast;
use swc_ecma_visit::{VisitMut, VisitMutWith};

use dcf_support::ast_util::{expr_stmt, ident_expr, ident_name};
use dcf_support::{HelperRegistry, IdentArena};

use crate::init::LoweredFields;
use crate::names::build_private_names_map;
use crate::{lower_class, LowerCtx, Mode};

/// Lower every class declaration in the module.
pub fn lower_module(module: &mut ast::Module, mode: Mode, source_map: &Lrc<SourceMap>) -> Result<()> {
    let mut lowerer = ModuleLowerer {
        mode,
        arena: IdentArena::from_module(module),
        helpers: HelperRegistry::new(),
    };
    module.visit_mut_with(&mut lowerer);

    if !lowerer.helpers.is_empty() {
        let prelude = lowerer.helpers.prelude(source_map)?;
        module
            .body
            .splice(0..0, prelude.into_iter().map(ast::ModuleItem::Stmt));
    }
    Ok(())
}

struct ModuleLowerer {
    mode: Mode,
    arena: IdentArena,
    helpers: HelperRegistry,
}

impl ModuleLowerer {
    /// Lower one class in place. Returns the statements to splice around
    /// the class; instance installs are spliced into the constructor here.
    fn lower_named_class(
        &mut self,
        class: &mut ast::Class,
        class_ref: &ast::Ident,
    ) -> (Vec<ast::Stmt>, Vec<ast::Stmt>) {
        let names = build_private_names_map(class, &mut self.arena);
        let mut cx = LowerCtx {
            mode: self.mode,
            arena: &mut self.arena,
            helpers: &mut self.helpers,
        };
        let LoweredFields {
            decls,
            static_inits,
            instance_inits,
        } = lower_class(class, class_ref, &names, &mut cx);

        if !instance_inits.is_empty() {
            splice_instance_inits(class, instance_inits, &mut self.arena);
        }
        (decls, static_inits)
    }

    fn lower_class_decl(&mut self, decl: &mut ast::ClassDecl) -> (Vec<ast::Stmt>, Vec<ast::Stmt>) {
        let class_ref = decl.ident.clone();
        self.lower_named_class(&mut decl.class, &class_ref)
    }
}

impl VisitMut for ModuleLowerer {
    fn visit_mut_module_items(&mut self, items: &mut Vec<ast::ModuleItem>) {
        let old = std::mem::take(items);
        for mut item in old {
            let expansion = match &mut item {
                ast::ModuleItem::Stmt(ast::Stmt::Decl(ast::Decl::Class(decl))) => {
                    Some(self.lower_class_decl(decl))
                }
                ast::ModuleItem::ModuleDecl(ast::ModuleDecl::ExportDecl(export)) => {
                    if let ast::Decl::Class(decl) = &mut export.decl {
                        Some(self.lower_class_decl(decl))
                    } else {
                        None
                    }
                }
                ast::ModuleItem::ModuleDecl(ast::ModuleDecl::ExportDefaultDecl(export)) => {
                    if let ast::DefaultDecl::Class(class_expr) = &mut export.decl {
                        // An anonymous default class gets a binding so its
                        // storage and statics have something to refer to.
                        if class_expr.ident.is_none() && class_has_fields(&class_expr.class) {
                            class_expr.ident = Some(self.arena.fresh("default"));
                        }
                        class_expr
                            .ident
                            .clone()
                            .map(|name| self.lower_named_class(&mut class_expr.class, &name))
                    } else {
                        None
                    }
                }
                _ => None,
            };

            match expansion {
                Some((decls, static_inits)) => {
                    item.visit_mut_children_with(self);
                    items.extend(decls.into_iter().map(ast::ModuleItem::Stmt));
                    items.push(item);
                    for mut stmt in static_inits {
                        stmt.visit_mut_children_with(self);
                        items.push(ast::ModuleItem::Stmt(stmt));
                    }
                }
                None => {
                    item.visit_mut_children_with(self);
                    items.push(item);
                }
            }
        }
    }

    fn visit_mut_stmts(&mut self, stmts: &mut Vec<ast::Stmt>) {
        let old = std::mem::take(stmts);
        for mut stmt in old {
            if let ast::Stmt::Decl(ast::Decl::Class(decl)) = &mut stmt {
                let (decls, static_inits) = self.lower_class_decl(decl);
                stmt.visit_mut_children_with(self);
                stmts.extend(decls);
                stmts.push(stmt);
                for mut static_stmt in static_inits {
                    static_stmt.visit_mut_children_with(self);
                    stmts.push(static_stmt);
                }
            } else {
                stmt.visit_mut_children_with(self);
                stmts.push(stmt);
            }
        }
    }
}

fn class_has_fields(class: &ast::Class) -> bool {
    class.body.iter().any(|member| {
        matches!(
            member,
            ast::ClassMember::ClassProp(_) | ast::ClassMember::PrivateProp(_)
        )
    })
}

/// Put instance installs into the constructor, after any top-level
/// `super()` statement; synthesize a forwarding constructor when absent.
fn splice_instance_inits(class: &mut ast::Class, inits: Vec<ast::Stmt>, arena: &mut IdentArena) {
    for member in &mut class.body {
        if let ast::ClassMember::Constructor(ctor) = member {
            if let Some(body) = &mut ctor.body {
                let pos = body
                    .stmts
                    .iter()
                    .position(is_bare_super_call)
                    .map(|i| i + 1)
                    .unwrap_or(0);
                body.stmts.splice(pos..pos, inits);
            }
            return;
        }
    }

    let ctor = make_constructor(class.super_class.is_some(), inits, arena);
    class.body.insert(0, ast::ClassMember::Constructor(ctor));
}

fn is_bare_super_call(stmt: &ast::Stmt) -> bool {
    let ast::Stmt::Expr(stmt) = stmt else {
        return false;
    };
    let ast::Expr::Call(call) = &*stmt.expr else {
        return false;
    };
    matches!(call.callee, ast::Callee::Super(_))
}

fn make_constructor(
    has_super: bool,
    inits: Vec<ast::Stmt>,
    arena: &mut IdentArena,
) -> ast::Constructor {
    let mut params = Vec::new();
    let mut stmts = Vec::new();

    if has_super {
        let args_ident = arena.fresh("args");
        params.push(ast::ParamOrTsParamProp::Param(ast::Param {
            span: DUMMY_SP,
            decorators: vec![],
            pat: ast::Pat::Rest(ast::RestPat {
                span: DUMMY_SP,
                dot3_token: DUMMY_SP,
                arg: Box::new(ast::Pat::Ident(args_ident.clone().into())),
                type_ann: None,
            }),
        }));
        stmts.push(expr_stmt(ast::Expr::Call(ast::CallExpr {
            span: DUMMY_SP,
            callee: ast::Callee::Super(ast::Super { span: DUMMY_SP }),
            args: vec![ast::ExprOrSpread {
                spread: Some(DUMMY_SP),
                expr: Box::new(ident_expr(args_ident)),
            }],
            type_args: None,
            ..Default::default()
        })));
    }
    stmts.extend(inits);

    ast::Constructor {
        span: DUMMY_SP,
        ctxt: Default::default(),
        key: ast::PropName::Ident(ident_name("constructor")),
        params,
        body: Some(ast::BlockStmt {
            span: DUMMY_SP,
            ctxt: Default::default(),
            stmts,
        }),
        accessibility: None,
        is_optional: false,
    }
}
