use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use sdlc::compiler::{self, Compiler, CompilerOptions};
use sdlc::errors::pretty;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// SDL Shader Compiler: translates SDL shader sources to GLSL and CUDA
#[derive(Parser)]
#[command(name = "sdlc", author, version, about, long_about = None)]
struct Cli {
    /// Input SDL source file
    input: PathBuf,

    /// Target languages (glsl, cuda), comma separated
    #[arg(short, long, value_delimiter = ',')]
    target: Vec<String>,

    /// Output file base path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Add an include search path
    #[arg(short = 'I', long = "include")]
    include: Vec<PathBuf>,

    /// Define a preprocessor macro
    #[arg(short = 'D', long = "define")]
    define: Vec<String>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print generated code instead of writing files
    #[arg(long)]
    stdout: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Blank and unknown names are skipped; `resolve_targets` warns on unknown ones.
    let (targets, _) = compiler::resolve_targets(&cli.target);

    let options = CompilerOptions {
        input: cli.input,
        targets,
        output: cli.output,
        include_paths: cli.include,
        defines: cli.define,
    };
    debug!(?options, "compiler options");

    let label = options.input.display().to_string();
    let source = compiler::read_source(&options)
        .with_context(|| format!("failed to compile '{}'", label))?;

    let mut compiler = Compiler::from_options(&options);
    let compilation = match compiler.compile_source(&source) {
        Ok(compilation) => compilation,
        Err(err) => {
            for rendered in pretty::format_compile_error(&label, &source, &err) {
                eprintln!("{}\n", rendered);
            }
            bail!("compilation of '{}' failed", label);
        }
    };

    if cli.stdout {
        for output in &compilation.outputs {
            if compilation.outputs.len() > 1 {
                println!("// ===== {} =====", output.target);
            }
            print!("{}", output.code);
        }
        return Ok(());
    }

    let written = compiler::write_outputs(&options, &compilation)
        .context("failed to write generated code")?;
    for path in written {
        println!("Generated {}", path.display());
    }

    Ok(())
}
