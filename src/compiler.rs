//! Pipeline driver: source text in, one generated text per target out.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::codegen::{Backend, CudaGenerator, GlslGenerator};
use crate::lexer;
use crate::parser::ast::Program;
use crate::parser::{ParseError, Parser};
use crate::semantic::{Resolver, SemanticError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Glsl,
    Cuda,
}

impl Target {
    pub fn extension(self) -> &'static str {
        match self {
            Target::Glsl => "glsl",
            Target::Cuda => "cu",
        }
    }

    /// Appended to the output stem when several targets share one base path.
    pub fn suffix(self) -> &'static str {
        match self {
            Target::Glsl => "_glsl",
            Target::Cuda => "_cuda",
        }
    }

    fn backend(self) -> Box<dyn Backend> {
        match self {
            Target::Glsl => Box::new(GlslGenerator::new()),
            Target::Cuda => Box::new(CudaGenerator::new()),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Glsl => write!(f, "GLSL"),
            Target::Cuda => write!(f, "CUDA"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown target '{0}'")]
pub struct UnknownTarget(pub String);

impl FromStr for Target {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "glsl" => Ok(Target::Glsl),
            "cuda" => Ok(Target::Cuda),
            _ => Err(UnknownTarget(s.to_string())),
        }
    }
}

/// Maps target names to targets in first-seen order. Blank names are
/// skipped, unknown ones are returned separately, and an empty result falls
/// back to GLSL.
pub fn resolve_targets(names: &[String]) -> (Vec<Target>, Vec<String>) {
    let mut targets = Vec::new();
    let mut unknown = Vec::new();

    for name in names.iter().filter(|name| !name.trim().is_empty()) {
        match name.parse::<Target>() {
            Ok(target) => {
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }
            Err(err) => {
                warn!(%err, "ignoring target");
                unknown.push(name.clone());
            }
        }
    }

    if targets.is_empty() {
        targets.push(Target::Glsl);
    }
    (targets, unknown)
}

/// Derives where `target`'s output goes. The base is the explicit output path
/// or the input with its last extension removed; `multiple` adds the target
/// suffix so outputs don't collide. The extension is always appended.
pub fn output_path(input: &Path, output: Option<&Path>, target: Target, multiple: bool) -> PathBuf {
    let mut base = match output {
        Some(path) => path.as_os_str().to_os_string(),
        None => input.with_extension("").into_os_string(),
    };
    if multiple {
        base.push(target.suffix());
    }
    base.push(".");
    base.push(target.extension());
    PathBuf::from(base)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    pub input: PathBuf,
    pub targets: Vec<Target>,
    pub output: Option<PathBuf>,
    pub include_paths: Vec<PathBuf>,
    pub defines: Vec<String>,
}

impl CompilerOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            targets: vec![Target::Glsl],
            output: None,
            include_paths: Vec::new(),
            defines: Vec::new(),
        }
    }

    pub fn output_for(&self, target: Target) -> PathBuf {
        output_path(
            &self.input,
            self.output.as_deref(),
            target,
            self.targets.len() > 1,
        )
    }
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("cannot access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse program ({} error(s))", .0.len())]
    Parse(Vec<ParseError>),
    #[error("semantic analysis failed ({} error(s))", .0.len())]
    Semantic(Vec<SemanticError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedOutput {
    pub target: Target,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    pub program: Program,
    pub outputs: Vec<GeneratedOutput>,
}

impl Compilation {
    pub fn output(&self, target: Target) -> Option<&str> {
        self.outputs
            .iter()
            .find(|output| output.target == target)
            .map(|output| output.code.as_str())
    }
}

pub struct Compiler {
    targets: Vec<Target>,
    resolver: Option<Box<dyn Resolver>>,
}

impl Compiler {
    pub fn new(targets: Vec<Target>) -> Self {
        Self {
            targets,
            resolver: None,
        }
    }

    pub fn with_resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Lexes, parses, optionally resolves, then generates every target in
    /// order. Any parse error fails the whole compilation.
    pub fn compile_source(&mut self, source: &str) -> Result<Compilation, CompileError> {
        let tokens = lexer::tokenize(source);
        info!(count = tokens.len(), "generated tokens");

        let outcome = Parser::new(tokens).parse();
        if !outcome.errors.is_empty() {
            return Err(CompileError::Parse(outcome.errors));
        }
        let mut program = outcome.program;
        info!(count = program.declarations.len(), "parsed declarations");

        if let Some(resolver) = self.resolver.as_mut() {
            let errors = resolver.resolve(&mut program);
            if !errors.is_empty() {
                return Err(CompileError::Semantic(errors));
            }
        }

        let mut outputs = Vec::with_capacity(self.targets.len());
        for &target in &self.targets {
            let mut backend = target.backend();
            let code = backend.generate(&program);
            info!(backend = %target, characters = code.len(), "generated output");
            outputs.push(GeneratedOutput { target, code });
        }

        Ok(Compilation { program, outputs })
    }

    pub fn from_options(options: &CompilerOptions) -> Self {
        Self::new(options.targets.clone())
    }

    /// Reads `options.input` and compiles it. `options.targets` replaces the
    /// compiler's target list.
    pub fn compile(&mut self, options: &CompilerOptions) -> Result<Compilation, CompileError> {
        let source = read_source(options)?;
        self.targets = options.targets.clone();
        self.compile_source(&source)
    }
}

/// Reads the input named by `options`. Callers that render diagnostics keep
/// this text and pass it to [`Compiler::compile_source`].
pub fn read_source(options: &CompilerOptions) -> Result<String, CompileError> {
    let source = fs::read_to_string(&options.input).map_err(|source| CompileError::Io {
        path: options.input.clone(),
        source,
    })?;
    info!(
        characters = source.len(),
        path = %options.input.display(),
        "read input"
    );
    if !options.include_paths.is_empty() || !options.defines.is_empty() {
        debug!(
            include_paths = ?options.include_paths,
            defines = ?options.defines,
            "preprocessor options are not applied"
        );
    }
    Ok(source)
}

/// Writes every generated output to its derived path and returns the paths
/// in target order.
pub fn write_outputs(
    options: &CompilerOptions,
    compilation: &Compilation,
) -> Result<Vec<PathBuf>, CompileError> {
    let multiple = compilation.outputs.len() > 1;
    let mut written = Vec::with_capacity(compilation.outputs.len());

    for output in &compilation.outputs {
        let path = output_path(
            &options.input,
            options.output.as_deref(),
            output.target,
            multiple,
        );
        fs::write(&path, &output.code).map_err(|source| CompileError::Io {
            path: path.clone(),
            source,
        })?;
        info!(backend = %output.target, path = %path.display(), "wrote output");
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_names_are_case_insensitive() {
        assert_eq!("GLSL".parse::<Target>(), Ok(Target::Glsl));
        assert_eq!("Cuda".parse::<Target>(), Ok(Target::Cuda));
        assert!("metal".parse::<Target>().is_err());
    }

    #[test]
    fn output_path_strips_only_last_extension() {
        let path = output_path(Path::new("dir/a.b.sdl"), None, Target::Cuda, false);
        assert_eq!(path, PathBuf::from("dir/a.b.cu"));
    }

    #[test]
    fn explicit_output_still_gets_extension() {
        let path = output_path(
            Path::new("in.sdl"),
            Some(Path::new("out")),
            Target::Glsl,
            true,
        );
        assert_eq!(path, PathBuf::from("out_glsl.glsl"));
    }
}
