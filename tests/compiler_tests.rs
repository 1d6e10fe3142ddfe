use std::fs;
use std::path::{Path, PathBuf};

use sdlc::compiler::{
    output_path, read_source, resolve_targets, write_outputs, CompileError, Compiler,
    CompilerOptions, Target,
};
use sdlc::errors::pretty;
use sdlc::parser::ast::{ExprKind, Program, Stmt};
use sdlc::semantic::{Resolver, SemanticError, SymbolTable};

const SHADER: &str = "shader glow : fragment {
    uniform float strength;
    out vec4 color;
    color = vec4(strength);
}
";

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[test]
fn resolves_targets_in_order_without_duplicates() {
    let (targets, unknown) = resolve_targets(&names(&["cuda", "GLSL", "cuda"]));
    assert_eq!(targets, vec![Target::Cuda, Target::Glsl]);
    assert!(unknown.is_empty());
}

#[test]
fn unknown_targets_are_dropped_and_default_is_glsl() {
    let (targets, unknown) = resolve_targets(&names(&["metal", "spirv"]));
    assert_eq!(targets, vec![Target::Glsl]);
    assert_eq!(unknown, names(&["metal", "spirv"]));

    let (targets, _) = resolve_targets(&[]);
    assert_eq!(targets, vec![Target::Glsl]);
}

#[test]
fn blank_target_names_are_skipped_without_being_unknown() {
    let (targets, unknown) = resolve_targets(&names(&["glsl", "", " ", "cuda"]));
    assert_eq!(targets, vec![Target::Glsl, Target::Cuda]);
    assert!(unknown.is_empty());
}

#[test]
fn output_names_for_single_and_multiple_targets() {
    let input = Path::new("shaders/glow.sdl");
    assert_eq!(
        output_path(input, None, Target::Glsl, false),
        PathBuf::from("shaders/glow.glsl")
    );
    assert_eq!(
        output_path(input, None, Target::Cuda, true),
        PathBuf::from("shaders/glow_cuda.cu")
    );
    assert_eq!(
        output_path(input, Some(Path::new("build/out")), Target::Cuda, false),
        PathBuf::from("build/out.cu")
    );
}

#[test]
fn compiles_source_for_every_target() {
    let mut compiler = Compiler::new(vec![Target::Glsl, Target::Cuda]);
    let compilation = compiler.compile_source(SHADER).expect("compile should succeed");

    assert_eq!(compilation.outputs.len(), 2);
    assert_eq!(compilation.outputs[0].target, Target::Glsl);
    let glsl = compilation.output(Target::Glsl).expect("glsl output");
    let cuda = compilation.output(Target::Cuda).expect("cuda output");
    assert!(glsl.contains("uniform float strength;"));
    assert!(cuda.contains("__constant__ float strength;"));
    assert!(cuda.contains("__global__ void glow_kernel(float* pixels, int width, int height) {"));
}

#[test]
fn parse_errors_fail_the_compilation() {
    let mut compiler = Compiler::new(vec![Target::Glsl]);
    match compiler.compile_source("float x = ;\nint y = ;") {
        Err(CompileError::Parse(errors)) => {
            assert_eq!(errors.len(), 2);
            assert_eq!(errors[1].line, 2);
        }
        other => panic!("expected parse failure, got {:?}", other),
    }
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let options = CompilerOptions::new(dir.path().join("missing.sdl"));
    match Compiler::from_options(&options).compile(&options) {
        Err(CompileError::Io { path, .. }) => assert_eq!(path, options.input),
        other => panic!("expected io error, got {:?}", other),
    }
}

#[test]
fn diagnostics_render_against_the_text_read_once() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("broken.sdl");
    fs::write(&input, "float ok = 1.0;\nfloat bad = ;\n").expect("write input");

    let options = CompilerOptions::new(&input);
    let source = read_source(&options).expect("read input");
    fs::remove_file(&input).expect("remove input");

    let err = Compiler::from_options(&options)
        .compile_source(&source)
        .expect_err("parse should fail");
    let rendered = pretty::format_compile_error("broken.sdl", &source, &err);
    assert_eq!(rendered.len(), 1);
    assert!(rendered[0].starts_with("error: Expected expression\n--> broken.sdl:2:13"));
    assert!(rendered[0].ends_with("float bad = ;\n            ^"));
}

#[test]
fn compiles_file_and_writes_suffixed_outputs() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("glow.sdl");
    fs::write(&input, SHADER).expect("write input");

    let mut options = CompilerOptions::new(&input);
    options.targets = vec![Target::Glsl, Target::Cuda];
    let compilation = Compiler::from_options(&options)
        .compile(&options)
        .expect("compile should succeed");
    let written = write_outputs(&options, &compilation).expect("write outputs");

    assert_eq!(
        written,
        vec![dir.path().join("glow_glsl.glsl"), dir.path().join("glow_cuda.cu")]
    );
    let glsl = fs::read_to_string(&written[0]).expect("read glsl");
    assert!(glsl.starts_with("#version 330 core"));
    let cuda = fs::read_to_string(&written[1]).expect("read cuda");
    assert!(cuda.starts_with("#include <cuda_runtime.h>"));
    assert_eq!(options.output_for(Target::Cuda), written[1]);
}

#[test]
fn explicit_output_path_gets_extension() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = dir.path().join("glow.sdl");
    fs::write(&input, SHADER).expect("write input");

    let mut options = CompilerOptions::new(&input);
    options.output = Some(dir.path().join("result"));
    let compilation = Compiler::from_options(&options)
        .compile(&options)
        .expect("compile should succeed");
    let written = write_outputs(&options, &compilation).expect("write outputs");
    assert_eq!(written, vec![dir.path().join("result.glsl")]);
}

/// Flags identifiers assigned inside shaders that no declaration introduced.
struct UndeclaredAssignments;

impl Resolver for UndeclaredAssignments {
    fn resolve(&mut self, program: &mut Program) -> Vec<SemanticError> {
        let mut errors = Vec::new();
        let mut symbols = SymbolTable::new();
        for declaration in &program.declarations {
            let Stmt::Shader(shader) = declaration else {
                continue;
            };
            symbols.enter_scope();
            for member in &shader.body {
                match member {
                    Stmt::Variable(var) => {
                        symbols.define(var.name.clone(), var.ty.clone());
                    }
                    Stmt::Assign { target, .. } => {
                        if let ExprKind::Identifier(name) = &target.kind {
                            if symbols.lookup(name).is_none() {
                                errors.push(SemanticError::new(format!(
                                    "assignment to undeclared '{}'",
                                    name
                                )));
                            }
                        }
                    }
                    _ => {}
                }
            }
            symbols.exit_scope();
        }
        errors
    }
}

#[test]
fn installed_resolver_runs_before_generation() {
    let mut compiler = Compiler::new(vec![Target::Glsl]).with_resolver(UndeclaredAssignments);
    assert!(compiler.compile_source(SHADER).is_ok());

    match compiler.compile_source("shader s : fragment { color = vec4(1.0); }") {
        Err(CompileError::Semantic(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].message, "assignment to undeclared 'color'");
        }
        other => panic!("expected semantic failure, got {:?}", other),
    }
}
