use anyhow::Result;
use swc_common::{
    comments::SingleThreadedComments, errors::Handler, sync::Lrc, FileName, SourceMap,
};
use swc_ecma_ast::EsVersion;
use swc_ecma_parser::{EsSyntax, Syntax, TsSyntax};

/// Result of parsing one source file.
pub struct ParsedModule {
    pub module: swc_ecma_ast::Module,
    pub comments: SingleThreadedComments,
    pub source_map: Lrc<SourceMap>,
}

/// Parse a JavaScript/TypeScript source string with the standard SWC parser.
///
/// Syntax is picked from the file extension (`.ts`/`.tsx` parse as
/// TypeScript, everything else as plain ECMAScript); `tsx` forces TSX/JSX
/// when the caller knows better than the extension.
pub fn parse_module(source: &str, filename: &str, tsx: Option<bool>) -> Result<ParsedModule> {
    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Custom(filename.to_string())),
        source.to_string(),
    );

    let comments = SingleThreadedComments::default();

    let handler =
        Handler::with_emitter_writer(Box::new(std::io::stderr()), Some(source_map.clone()));

    let is_tsx = tsx.unwrap_or_else(|| filename.ends_with(".tsx"));
    let is_ts = is_tsx || filename.ends_with(".ts");

    let syntax = if is_ts {
        Syntax::Typescript(TsSyntax {
            tsx: is_tsx,
            decorators: true,
            ..Default::default()
        })
    } else {
        Syntax::Es(EsSyntax {
            jsx: is_tsx,
            ..Default::default()
        })
    };

    let module = swc_ecma_parser::parse_file_as_module(
        &source_file,
        syntax,
        EsVersion::latest(),
        Some(&comments),
        &mut vec![],
    )
    .map_err(|e| {
        e.into_diagnostic(&handler).emit();
        anyhow::anyhow!("failed to parse {filename}")
    })?;

    Ok(ParsedModule {
        module,
        comments,
        source_map,
    })
}
