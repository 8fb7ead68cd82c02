//! Class-fields desugaring pass.
//!
//! Rewrites class field declarations and private-name accesses into
//! constructs expressible without the class-fields feature.
//!
//! Spec mode (full access-control semantics through runtime helpers):
//!
//! - `this.#x` → `_classPrivateFieldGet(this, _x)`
//! - `this.#x = v` → `_classPrivateFieldSet(this, _x, v)`
//! - `o().#x += 1` → `_classPrivateFieldSet(_o = o(), _x, _classPrivateFieldGet(_o, _x) + 1)`
//! - `this.#m(a)` → `_classPrivateFieldGet(this, _m).call(this, a)`
//!
//! Loose mode (direct property access through a masking key):
//!
//! - `this.#x` → `_classPrivateFieldLooseBase(this, _x)[_x]`
//!
//! Field declarations are removed from the class body and reinstalled
//! through initializer statements: instance initializers run in the
//! constructor, static initializers after the class definition, and
//! backing-storage declarations (WeakMaps, masking keys) before it.

mod access;
mod init;
mod names;
mod this_ref;
mod walker;

pub mod driver;

use serde::{Deserialize, Serialize};
use swc_ecma_ast::{Class, Ident};

use dcf_support::{ast_util, HelperRegistry, IdentArena};

pub use driver::lower_module;
pub use init::LoweredFields;
pub use names::{build_private_names_map, PrivateNameEntry, PrivateNamesMap};

/// Lowering strategy for private names and field installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Indistinguishable from native semantics: opaque per-instance (or
    /// per-class) storage reachable only through brand-checking helpers.
    #[default]
    Spec,
    /// Masked-key properties on the instance itself: simpler and faster
    /// output, weaker guarantees.
    Loose,
}

/// Services the pass borrows from its invoker for one class lowering.
pub struct LowerCtx<'a> {
    pub mode: Mode,
    pub arena: &'a mut IdentArena,
    pub helpers: &'a mut HelperRegistry,
}

/// Lower one class: rewrite every private-name use-site in its lexical
/// extent and strip its field declarations into initializer statements.
///
/// `class_ref` is the expression statics are installed on and checked
/// against. The returned statement lists are the caller's to splice:
/// `decls` before the class, `static_inits` after it, `instance_inits`
/// into the constructor after any `super()` call.
///
/// The names map must have been built from this same class's body; the
/// walker only ever dispatches names it finds live in that map.
pub fn lower_class(
    class: &mut Class,
    class_ref: &Ident,
    names: &PrivateNamesMap,
    cx: &mut LowerCtx<'_>,
) -> LoweredFields {
    let orphan_temps = walker::rewrite_private_uses(class, names, class_ref, cx);
    let mut lowered = init::extract_field_inits(class, class_ref, names, cx);
    if !orphan_temps.is_empty() {
        // Receiver temporaries created outside any function scope live in
        // the module-level declaration list.
        lowered.decls.push(ast_util::var_stmt_multi(orphan_temps));
    }
    lowered
}
