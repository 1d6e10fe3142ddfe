use pretty_assertions::assert_eq;
use sdlc::codegen::{Backend, CudaGenerator, GlslGenerator};
use sdlc::parser::ast::{BinaryOp, Expr, Program, Qualifier, Stmt};
use sdlc::parser::parse;

const WAVE: &str = "uniform float time;
shader wave : vertex {
    in vec3 position;
    out vec4 color;
    float amp = sin(time) * 0.5;
    if (amp > 0.0) {
        color = vec4(position, 1.0);
    } else {
        color = vec4(0.0);
    }
}
";

fn program(source: &str) -> Program {
    let outcome = parse(source);
    assert!(outcome.is_ok(), "unexpected errors: {:?}", outcome.errors);
    outcome.program
}

fn sum_program() -> Program {
    Program {
        declarations: vec![Stmt::Expr(Expr::binary(
            Expr::identifier("a"),
            BinaryOp::Add,
            Expr::identifier("b"),
        ))],
    }
}

#[test]
fn glsl_starts_with_version_directive() {
    let out = GlslGenerator::new().generate(&program("float x;"));
    assert!(out.starts_with("#version 330 core\n"));
}

#[test]
fn cuda_starts_with_runtime_includes() {
    let out = CudaGenerator::new().generate(&program("float x;"));
    assert!(out.starts_with("#include <cuda_runtime.h>\n#include <device_launch_parameters.h>\n"));
}

#[test]
fn glsl_parenthesizes_binary_and_cuda_does_not() {
    let program = sum_program();
    let glsl = GlslGenerator::new().generate(&program);
    let cuda = CudaGenerator::new().generate(&program);
    assert!(glsl.ends_with("(a + b);\n"), "{}", glsl);
    assert!(cuda.ends_with("\na + b;\n"), "{}", cuda);
}

#[test]
fn qualifier_mappings() {
    let glsl = GlslGenerator::new();
    let cuda = CudaGenerator::new();
    assert_eq!(glsl.qualifier(Qualifier::Uniform), "uniform");
    assert_eq!(cuda.qualifier(Qualifier::Uniform), "__constant__");
    assert_eq!(glsl.qualifier(Qualifier::In), "in");
    assert_eq!(cuda.qualifier(Qualifier::In), "");
    assert_eq!(glsl.qualifier(Qualifier::Out), "out");
    assert_eq!(cuda.qualifier(Qualifier::Out), "");
    assert_eq!(cuda.qualifier(Qualifier::Const), "const");
}

#[test]
fn glsl_vertex_shader() {
    let out = GlslGenerator::new().generate(&program(WAVE));
    let expected = "#version 330 core

uniform float time;
// Shader: wave
in vec3 position;
out vec4 color;
float amp = (sin(time) * 0.5);
if ((amp > 0.0)) {
    color = vec4(position, 1.0);
} else {
    color = vec4(0.0);
}
";
    assert_eq!(out, expected);
}

#[test]
fn cuda_vertex_kernel() {
    let out = CudaGenerator::new().generate(&program(WAVE));
    let expected = "#include <cuda_runtime.h>
#include <device_launch_parameters.h>

__constant__ float time;
// CUDA Kernel: wave
__global__ void wave_kernel(float* vertices, float* output, int numVertices) {
    float3 position;
    float4 color;
    float amp = sin(time) * 0.5;
    if (amp > 0.0) {
        color = make_float4(position, 1.0);
    } else {
        color = make_float4(0.0);
    }
}

";
    assert_eq!(out, expected);
}

#[test]
fn cuda_compute_kernel_has_thread_indexing() {
    let out = CudaGenerator::new().generate(&program(
        "shader blur : compute { float v = input[idx]; output[idx] = v; }",
    ));
    let expected = "#include <cuda_runtime.h>
#include <device_launch_parameters.h>

// CUDA Kernel: blur
__global__ void blur_kernel(float* input, float* output, int width, int height) {
    // Thread indexing
    int idx = blockIdx.x * blockDim.x + threadIdx.x;
    int idy = blockIdx.y * blockDim.y + threadIdx.y;

    float v = input[idx];
    output[idx] = v;
}

";
    assert_eq!(out, expected);
}

#[test]
fn cuda_fragment_kernel_parameters() {
    let out = CudaGenerator::new().generate(&program("shader tint : fragment { }"));
    assert!(out.contains("__global__ void tint_kernel(float* pixels, int width, int height) {\n}\n"));
}

#[test]
fn cuda_emits_if_and_return() {
    let out = CudaGenerator::new().generate(&program(
        "float clamp01(float x) { if (x < 0.0) { return 0.0; } return x; }",
    ));
    let expected = "__device__ float clamp01(float x) {
    if (x < 0.0) {
        return 0.0;
    }
    return x;
}
";
    assert!(out.contains(expected), "{}", out);
}

#[test]
fn cuda_kernel_keeps_early_and_final_return() {
    let out = CudaGenerator::new().generate(&program(
        "shader s : compute { if (idx > 4) { return; } output[idx] = input[idx]; return; }",
    ));
    let expected = "__global__ void s_kernel(float* input, float* output, int width, int height) {
    // Thread indexing
    int idx = blockIdx.x * blockDim.x + threadIdx.x;
    int idy = blockIdx.y * blockDim.y + threadIdx.y;

    if (idx > 4) {
        return;
    }
    output[idx] = input[idx];
    return;
}
";
    assert!(out.contains(expected), "{}", out);
}

#[test]
fn cuda_hoists_device_functions_out_of_kernels() {
    let out = CudaGenerator::new().generate(&program(
        "shader s : fragment { float half(float x) { return x * 0.5; } float y = half(1.0); }",
    ));
    let function = out.find("__device__ float half(float x) {").expect("device function");
    let kernel = out.find("__global__ void s_kernel(").expect("kernel");
    assert!(function < kernel, "{}", out);
    assert!(out.contains("    float y = half(1.0);\n"), "{}", out);
}

#[test]
fn loops_in_both_backends() {
    let source = "void f() { float sum = 0.0; for (int i = 0; i < 4; i = i + 1) { sum = sum + 1.0; } while (sum > 1.0) sum = sum / 2.0; }";
    let glsl = GlslGenerator::new().generate(&program(source));
    assert!(
        glsl.contains("    for (int i = 0; (i < 4); i = (i + 1)) {\n        sum = (sum + 1.0);\n    }\n"),
        "{}",
        glsl
    );
    assert!(
        glsl.contains("    while ((sum > 1.0)) {\n        sum = (sum / 2.0);\n    }\n"),
        "{}",
        glsl
    );

    let cuda = CudaGenerator::new().generate(&program(source));
    assert!(
        cuda.contains("    for (int i = 0; i < 4; i = i + 1) {\n        sum = sum + 1.0;\n    }\n"),
        "{}",
        cuda
    );
}

#[test]
fn nested_block_keeps_braces() {
    let out = GlslGenerator::new().generate(&program("void f() { { float t = 1.0; } }"));
    assert!(out.contains("void f() {\n    {\n        float t = 1.0;\n    }\n}\n"), "{}", out);
}

#[test]
fn generator_can_be_reused() {
    let program = program("float x = 1.0;");
    let mut generator = GlslGenerator::new();
    let first = generator.generate(&program);
    let second = generator.generate(&program);
    assert_eq!(first, second);
}
