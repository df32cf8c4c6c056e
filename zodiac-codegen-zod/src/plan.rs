use zodiac_core::error::{CyclicDependency, Warning};

use super::{
    aggregate::CodegenAggregateModule,
    config::{CodegenConfig, EmitMode},
    graph::CodegenGraph,
    index_module::CodegenIndexModule,
    schema::{CodegenSchemaModule, TsCode},
};

/// The files to write for one run, and the warnings found
/// while building them.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EmissionPlan {
    pub files: Vec<TsCode>,
    pub warnings: Vec<Warning>,
}

/// Builds the emission plan for every schema in a graph.
///
/// [`EmitMode::Aggregated`] fails with [`CyclicDependency`] if any
/// schema is part of a reference cycle. [`EmitMode::PerSchema`]
/// never fails: recursive schemas are emitted with `z.lazy`.
pub fn assemble(
    graph: &CodegenGraph<'_>,
    config: &CodegenConfig,
) -> Result<EmissionPlan, CyclicDependency> {
    let files = match config.mode {
        EmitMode::Aggregated => {
            let order = graph.emission_order()?;
            vec![CodegenAggregateModule::new(graph, config, order).into_code()]
        }
        EmitMode::PerSchema => graph
            .schemas()
            .map(|(name, node)| CodegenSchemaModule::new(graph, config, name, node).into_code())
            .chain(std::iter::once(CodegenIndexModule::new(graph).into()))
            .collect(),
    };
    tracing::debug!(files = files.len(), mode = ?config.mode, "assembled emission plan");
    Ok(EmissionPlan {
        files,
        warnings: graph.warnings().to_vec(),
    })
}
