//! Generates Zod validators and TypeScript types from OpenAPI schemas.

use std::path::Path;

use miette::IntoDiagnostic;
use zodiac_core::{codegen::write_to_disk, error::Warning};

mod aggregate;
mod config;
mod emit;
mod graph;
mod index_module;
mod naming;
mod plan;
mod schema;
mod types;
mod validator;


pub use aggregate::*;
pub use config::*;
pub use emit::{TsProperty, TsType};
pub use graph::*;
pub use index_module::*;
pub use naming::*;
pub use plan::*;
pub use schema::{CodegenSchemaModule, TsCode};
pub use types::compile_type;
pub use validator::compile_validator;

/// Writes Zod schemas to disk, laid out according to `config`.
///
/// Returns the warnings found while generating the schemas.
pub fn write_schemas_to_disk(
    output: &Path,
    graph: &CodegenGraph<'_>,
    config: &CodegenConfig,
) -> miette::Result<Vec<Warning>> {
    let plan = assemble(graph, config).into_diagnostic()?;
    write_plan_to_disk(output, plan)
}

/// Writes every file in an emission plan to disk, and returns
/// the plan's warnings.
pub fn write_plan_to_disk(output: &Path, plan: EmissionPlan) -> miette::Result<Vec<Warning>> {
    for file in plan.files {
        write_to_disk(output, file)?;
    }
    Ok(plan.warnings)
}
