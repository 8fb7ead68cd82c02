//! Host-compiler services consumed by the class-fields lowering pass.
//!
//! The pass itself (in `dcf_lower`) is a pure tree rewrite; everything it
//! needs from the surrounding toolchain lives here:
//!
//! - [`parse_module`] / [`emit_module`] — thin adapters over the standard
//!   SWC parser and printer
//! - [`IdentArena`] — fresh, collision-free identifier allocation
//! - [`HelperRegistry`] — deduplicated injection of runtime helpers
//! - [`optimise_call`] — `(callee)(args)` into a correctly `this`-bound call
//! - [`ast_util`] — node constructors for the handful of shapes the pass emits

pub mod arena;
pub mod ast_util;
pub mod call_opt;
pub mod emit;
pub mod helpers;
pub mod parse;

pub use arena::IdentArena;
pub use call_opt::optimise_call;
pub use emit::emit_module;
pub use helpers::{Helper, HelperRegistry};
pub use parse::{parse_module, ParsedModule};
