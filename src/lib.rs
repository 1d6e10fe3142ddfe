//! SDL shader compiler: lexes and parses SDL shader sources and emits GLSL
//! and CUDA from the same syntax tree.

pub mod codegen;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod parser;
pub mod semantic;
