//! The private-name table for one class.

use std::collections::HashMap;

use swc_ecma_ast::{Class, ClassMember, Ident};

use dcf_support::IdentArena;

/// One declared private name in a class's own body.
#[derive(Debug, Clone)]
pub struct PrivateNameEntry {
    /// Source identifier text, without the `#` sigil.
    pub name: String,
    /// The fresh binding the lowering routes storage through: a WeakMap (or
    /// descriptor) reference in spec mode, a masking key in loose mode.
    pub internal_id: Ident,
    /// Fixed at declaration time; selects the initializer strategy and the
    /// receiver the access helpers check against.
    pub is_static: bool,
}

/// Private name → entry, for exactly one class's own declarations.
///
/// Built once per class, read-only afterwards, discarded when the class's
/// rewrites and initializers have been emitted.
#[derive(Debug, Default)]
pub struct PrivateNamesMap {
    entries: HashMap<String, PrivateNameEntry>,
}

impl PrivateNamesMap {
    pub fn get(&self, name: &str) -> Option<&PrivateNameEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scan a class's member declarations and allocate the private-name table.
///
/// Entries are created in declaration order, so internal identifier names
/// are deterministic for a given input. Non-private members are ignored;
/// private methods are not lowered by this pass and stay out of the table.
pub fn build_private_names_map(class: &Class, arena: &mut IdentArena) -> PrivateNamesMap {
    let mut map = PrivateNamesMap::default();
    for member in &class.body {
        let ClassMember::PrivateProp(prop) = member else {
            continue;
        };
        let name = prop.key.name.to_string();
        if map.contains(&name) {
            // A duplicate declaration is a syntax error upstream; keep the
            // first entry rather than reallocating.
            continue;
        }
        let internal_id = arena.fresh(&name);
        map.entries.insert(
            name.clone(),
            PrivateNameEntry {
                name,
                internal_id,
                is_static: prop.is_static,
            },
        );
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcf_support::parse_module;
    use swc_ecma_ast::{Decl, ModuleItem, Stmt};

    fn first_class(source: &str) -> Class {
        let parsed = parse_module(source, "test.js", None).unwrap();
        for item in parsed.module.body {
            if let ModuleItem::Stmt(Stmt::Decl(Decl::Class(decl))) = item {
                return *decl.class;
            }
        }
        panic!("no class declaration in source");
    }

    #[test]
    fn one_entry_per_declared_private_name() {
        let class = first_class("class A { #x = 1; #y; z = 3; m() {} static #s = 4; }");
        let mut arena = IdentArena::new();
        let map = build_private_names_map(&class, &mut arena);

        assert_eq!(map.len(), 3);
        assert!(map.contains("x"));
        assert!(map.contains("y"));
        assert!(map.contains("s"));
        assert!(!map.contains("z"));
        assert!(!map.get("x").unwrap().is_static);
        assert!(map.get("s").unwrap().is_static);
    }

    #[test]
    fn internal_ids_are_unique_across_classes_sharing_names() {
        let a = first_class("class A { #x = 1; }");
        let b = first_class("class B { #x = 2; }");
        let mut arena = IdentArena::new();
        let map_a = build_private_names_map(&a, &mut arena);
        let map_b = build_private_names_map(&b, &mut arena);

        let id_a = &map_a.get("x").unwrap().internal_id;
        let id_b = &map_b.get("x").unwrap().internal_id;
        assert_ne!(id_a.sym, id_b.sym);
    }
}
