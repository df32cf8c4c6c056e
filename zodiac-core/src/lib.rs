pub mod codegen;
pub mod error;
pub mod graph;
pub mod parse;
pub mod schema;
