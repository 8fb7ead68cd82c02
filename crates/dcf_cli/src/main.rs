use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dcf_lower::{lower_module, Mode};
use dcf_support::emit::emit_module_with_source_map;
use dcf_support::parse_module;

#[derive(Parser)]
#[command(name = "dcf", about = "declassify — compile class fields away")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, lower class fields, and emit standard JavaScript.
    Lower {
        /// Input .js/.ts/.tsx file.
        input: PathBuf,
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Use the loose (masked-key property) lowering.
        #[arg(long)]
        loose: bool,
        /// Treat the file as TSX.
        #[arg(long)]
        tsx: bool,
        /// Generate a source map.
        #[arg(long)]
        source_map: bool,
    },
    /// Parse the file and report any syntax errors.
    Check {
        input: PathBuf,
        #[arg(long)]
        tsx: bool,
    },
    /// Parse and dump the AST as JSON.
    Parse {
        input: PathBuf,
        #[arg(long)]
        ast: bool,
        #[arg(long)]
        tsx: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Lower {
            input,
            output,
            loose,
            tsx,
            source_map,
        } => {
            let source = std::fs::read_to_string(&input)?;
            let filename = input.display().to_string();

            let tsx_opt = if tsx { Some(true) } else { None };
            let parsed = parse_module(&source, &filename, tsx_opt)?;
            let mut module = parsed.module;

            let mode = if loose { Mode::Loose } else { Mode::Spec };
            lower_module(&mut module, mode, &parsed.source_map)?;

            let (output_str, map_json) =
                emit_module_with_source_map(&module, parsed.source_map, source_map)?;

            match &output {
                Some(path) => std::fs::write(path, &output_str)?,
                None => print!("{output_str}"),
            }

            if let Some(map_json) = map_json {
                let map_path = match &output {
                    Some(path) => format!("{}.map", path.display()),
                    None => format!("{filename}.map"),
                };
                std::fs::write(&map_path, &map_json)?;
                eprintln!("Source map written to {map_path}");
            }
        }
        Commands::Check { input, tsx } => {
            let source = std::fs::read_to_string(&input)?;
            let filename = input.display().to_string();

            let tsx_opt = if tsx { Some(true) } else { None };
            parse_module(&source, &filename, tsx_opt)?;
            eprintln!("OK: {filename}");
        }
        Commands::Parse { input, ast, tsx } => {
            let source = std::fs::read_to_string(&input)?;
            let filename = input.display().to_string();

            let tsx_opt = if tsx { Some(true) } else { None };
            let parsed = parse_module(&source, &filename, tsx_opt)?;

            if ast {
                let json = serde_json::to_string_pretty(&parsed.module)?;
                println!("{json}");
            } else {
                println!("{:#?}", parsed.module);
            }
        }
    }

    Ok(())
}
