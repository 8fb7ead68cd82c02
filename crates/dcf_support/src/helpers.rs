//! Runtime helper injection.
//!
//! Lowered output leans on a small library of runtime functions
//! (`_classPrivateFieldGet`, `_defineProperty`, …). The registry hands the
//! pass a stable reference for each logical helper and remembers which ones
//! were used; the driver then asks for the prelude: each used helper's
//! definition, parsed from its canonical source, emitted exactly once at
//! the top of the module.

use anyhow::Result;
use swc_common::{sync::Lrc, FileName, SourceMap, DUMMY_SP};
use swc_ecma_ast::{EsVersion, Ident, Stmt};
use swc_ecma_parser::{EsSyntax, Syntax};

/// Logical names of the runtime helpers the lowering can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Helper {
    ClassPrivateFieldGet,
    ClassPrivateFieldSet,
    ClassStaticPrivateFieldSpecGet,
    ClassStaticPrivateFieldSpecSet,
    ClassPrivateFieldLooseKey,
    ClassPrivateFieldLooseBase,
    DefineProperty,
}

impl Helper {
    /// The identifier the generated code calls.
    pub fn ident_name(self) -> &'static str {
        match self {
            Helper::ClassPrivateFieldGet => "_classPrivateFieldGet",
            Helper::ClassPrivateFieldSet => "_classPrivateFieldSet",
            Helper::ClassStaticPrivateFieldSpecGet => "_classStaticPrivateFieldSpecGet",
            Helper::ClassStaticPrivateFieldSpecSet => "_classStaticPrivateFieldSpecSet",
            Helper::ClassPrivateFieldLooseKey => "_classPrivateFieldLooseKey",
            Helper::ClassPrivateFieldLooseBase => "_classPrivateFieldLooseBase",
            Helper::DefineProperty => "_defineProperty",
        }
    }

    /// Canonical JavaScript source of the helper.
    fn source(self) -> &'static str {
        match self {
            Helper::ClassPrivateFieldGet => {
                r#"function _classPrivateFieldGet(receiver, privateMap) {
    if (!privateMap.has(receiver)) {
        throw new TypeError("attempted to get private field on non-instance");
    }
    return privateMap.get(receiver).value;
}"#
            }
            Helper::ClassPrivateFieldSet => {
                r#"function _classPrivateFieldSet(receiver, privateMap, value) {
    if (!privateMap.has(receiver)) {
        throw new TypeError("attempted to set private field on non-instance");
    }
    var descriptor = privateMap.get(receiver);
    if (!descriptor.writable) {
        throw new TypeError("attempted to set read only private field");
    }
    descriptor.value = value;
    return value;
}"#
            }
            Helper::ClassStaticPrivateFieldSpecGet => {
                r#"function _classStaticPrivateFieldSpecGet(receiver, classConstructor, descriptor) {
    if (receiver !== classConstructor) {
        throw new TypeError("Private static access of wrong provenance");
    }
    return descriptor.value;
}"#
            }
            Helper::ClassStaticPrivateFieldSpecSet => {
                r#"function _classStaticPrivateFieldSpecSet(receiver, classConstructor, descriptor, value) {
    if (receiver !== classConstructor) {
        throw new TypeError("Private static access of wrong provenance");
    }
    if (!descriptor.writable) {
        throw new TypeError("attempted to set read only private field");
    }
    descriptor.value = value;
    return value;
}"#
            }
            Helper::ClassPrivateFieldLooseKey => {
                r#"var _classPrivateFieldLooseId = 0;
function _classPrivateFieldLooseKey(name) {
    return "__private_" + _classPrivateFieldLooseId++ + "_" + name;
}"#
            }
            Helper::ClassPrivateFieldLooseBase => {
                r#"function _classPrivateFieldLooseBase(receiver, privateKey) {
    if (!Object.prototype.hasOwnProperty.call(receiver, privateKey)) {
        throw new TypeError("attempted to use private field on non-instance");
    }
    return receiver;
}"#
            }
            Helper::DefineProperty => {
                r#"function _defineProperty(obj, key, value) {
    if (key in obj) {
        Object.defineProperty(obj, key, {
            value: value,
            enumerable: true,
            configurable: true,
            writable: true
        });
    } else {
        obj[key] = value;
    }
    return obj;
}"#
            }
        }
    }
}

/// Tracks which helpers a module lowering referenced.
#[derive(Debug, Default)]
pub struct HelperRegistry {
    used: Vec<Helper>,
}

impl HelperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a use of `helper` and return an identifier referring to it.
    ///
    /// Repeated references are deduplicated; prelude order is first-use
    /// order, so output is deterministic for a given input.
    pub fn reference(&mut self, helper: Helper) -> Ident {
        if !self.used.contains(&helper) {
            self.used.push(helper);
        }
        Ident::new_no_ctxt(helper.ident_name().into(), DUMMY_SP)
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// Definitions of every referenced helper, each emitted once.
    ///
    /// Sources are parsed through the host source map so the statements can
    /// be spliced straight into the module being lowered.
    pub fn prelude(&self, source_map: &Lrc<SourceMap>) -> Result<Vec<Stmt>> {
        let mut stmts = Vec::new();
        for helper in &self.used {
            let name = helper.ident_name();
            let source_file = source_map.new_source_file(
                Lrc::new(FileName::Custom(format!("<helper:{name}>"))),
                helper.source().to_string(),
            );
            let script = swc_ecma_parser::parse_file_as_script(
                &source_file,
                Syntax::Es(EsSyntax::default()),
                EsVersion::latest(),
                None,
                &mut vec![],
            )
            .map_err(|e| anyhow::anyhow!("failed to parse runtime helper {name}: {e:?}"))?;
            stmts.extend(script.body);
        }
        Ok(stmts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_are_deduplicated_in_first_use_order() {
        let mut registry = HelperRegistry::new();
        let get = registry.reference(Helper::ClassPrivateFieldGet);
        registry.reference(Helper::ClassPrivateFieldSet);
        registry.reference(Helper::ClassPrivateFieldGet);

        assert_eq!(&*get.sym, "_classPrivateFieldGet");
        assert_eq!(
            registry.used,
            vec![Helper::ClassPrivateFieldGet, Helper::ClassPrivateFieldSet]
        );
    }

    #[test]
    fn prelude_parses_every_helper() {
        let mut registry = HelperRegistry::new();
        for helper in [
            Helper::ClassPrivateFieldGet,
            Helper::ClassPrivateFieldSet,
            Helper::ClassStaticPrivateFieldSpecGet,
            Helper::ClassStaticPrivateFieldSpecSet,
            Helper::ClassPrivateFieldLooseKey,
            Helper::ClassPrivateFieldLooseBase,
            Helper::DefineProperty,
        ] {
            registry.reference(helper);
        }
        let source_map: Lrc<SourceMap> = Default::default();
        let stmts = registry.prelude(&source_map).unwrap();
        // LooseKey expands to two statements (counter + function).
        assert_eq!(stmts.len(), 8);
    }
}
