use anyhow::{Context, Result};
use swc_common::{source_map::DefaultSourceMapGenConfig, sync::Lrc, SourceMap};
use swc_ecma_codegen::{text_writer::JsWriter, Emitter, Node};

/// Print a module back to source text.
pub fn emit_module(module: &swc_ecma_ast::Module, source_map: Lrc<SourceMap>) -> Result<String> {
    let (code, _) = emit_module_with_source_map(module, source_map, false)?;
    Ok(code)
}

/// Print a module, optionally also building a JSON source map.
pub fn emit_module_with_source_map(
    module: &swc_ecma_ast::Module,
    source_map: Lrc<SourceMap>,
    build_map: bool,
) -> Result<(String, Option<String>)> {
    let mut buf = Vec::new();
    let mut srcmap_buf = if build_map { Some(vec![]) } else { None };
    {
        let writer = JsWriter::new(source_map.clone(), "\n", &mut buf, srcmap_buf.as_mut());
        let mut emitter = Emitter {
            cfg: swc_ecma_codegen::Config::default()
                .with_target(swc_ecma_ast::EsVersion::latest()),
            cm: source_map.clone(),
            comments: None,
            wr: writer,
        };
        module.emit_with(&mut emitter)?;
    }

    let code = String::from_utf8(buf)?;

    let map_json = match srcmap_buf {
        Some(srcmap_data) => {
            let srcmap =
                source_map.build_source_map(&srcmap_data, None, DefaultSourceMapGenConfig);
            let mut out = vec![];
            srcmap
                .to_writer(&mut out)
                .context("failed to serialize source map")?;
            Some(String::from_utf8(out)?)
        }
        None => None,
    };

    Ok((code, map_json))
}
