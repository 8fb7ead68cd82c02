//! Fresh-identifier allocation.
//!
//! The lowering pass binds generated names (`_x`, `_obj`, …) in scopes it
//! does not own, so every allocation must avoid every identifier already
//! visible in the module. The arena records that visible set once up front
//! and hands out deterministic `_name`, `_name2`, `_name3`, … candidates.

use std::collections::HashSet;

use swc_common::DUMMY_SP;
use swc_ecma_ast::{Ident, Module};
use swc_ecma_visit::{Visit, VisitWith};

/// Allocator for collision-free identifiers, scoped to one module lowering.
#[derive(Debug, Default)]
pub struct IdentArena {
    taken: HashSet<String>,
}

impl IdentArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the arena with every identifier that occurs in the module.
    ///
    /// Deliberately coarse: any mention of a name anywhere (binding or
    /// reference) reserves it. Scope-precise tracking would admit shorter
    /// generated names but never changes correctness.
    pub fn from_module(module: &Module) -> Self {
        let mut collector = BindingCollector::default();
        module.visit_with(&mut collector);
        Self {
            taken: collector.names,
        }
    }

    /// Mark a name as unavailable without allocating it.
    pub fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_string());
    }

    /// Allocate a fresh identifier derived from `base`.
    ///
    /// Candidates are `_base`, `_base2`, `_base3`, and so on; the first one
    /// not in the taken set wins and is recorded so later calls never reuse
    /// it.
    pub fn fresh(&mut self, base: &str) -> Ident {
        let base = base.trim_start_matches('_');
        let base = if base.is_empty() { "tmp" } else { base };

        let mut candidate = format!("_{base}");
        let mut n = 1usize;
        while self.taken.contains(&candidate) {
            n += 1;
            candidate = format!("_{base}{n}");
        }
        self.taken.insert(candidate.clone());
        Ident::new_no_ctxt(candidate.into(), DUMMY_SP)
    }
}

#[derive(Default)]
struct BindingCollector {
    names: HashSet<String>,
}

impl Visit for BindingCollector {
    fn visit_ident(&mut self, n: &Ident) {
        self.names.insert(n.sym.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_names_are_deterministic_and_distinct() {
        let mut arena = IdentArena::new();
        assert_eq!(&*arena.fresh("x").sym, "_x");
        assert_eq!(&*arena.fresh("x").sym, "_x2");
        assert_eq!(&*arena.fresh("x").sym, "_x3");
        assert_eq!(&*arena.fresh("y").sym, "_y");
    }

    #[test]
    fn reserved_names_are_skipped() {
        let mut arena = IdentArena::new();
        arena.reserve("_count");
        assert_eq!(&*arena.fresh("count").sym, "_count2");
    }

    #[test]
    fn visible_bindings_block_allocation() {
        let parsed =
            crate::parse_module("var _x = 1; function _x2() {}", "test.js", None).unwrap();
        let mut arena = IdentArena::from_module(&parsed.module);
        assert_eq!(&*arena.fresh("x").sym, "_x3");
    }

    #[test]
    fn leading_underscores_collapse() {
        let mut arena = IdentArena::new();
        assert_eq!(&*arena.fresh("_obj").sym, "_obj");
        assert_eq!(&*arena.fresh("").sym, "_tmp");
    }
}
