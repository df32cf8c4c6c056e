use std::fmt::{self, Display};

#[derive(Debug, thiserror::Error)]
pub enum SerdeError {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    YamlWithPath(#[from] serde_path_to_error::Error<serde_yaml::Error>),
}

/// A strict emission order can't be built, because a schema
/// transitively depends on itself.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("cyclic dependency detected at schema `{name}`")]
pub struct CyclicDependency {
    /// The schema that was reached again while still being visited.
    pub name: String,
}

/// A non-fatal problem found while compiling a schema map.
///
/// Warnings never stop a run; they're collected and handed back
/// to the caller alongside the generated code.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Warning {
    /// A schema references a name that isn't in the schema map.
    /// The reference is treated as a leaf with no dependencies.
    MissingReference { from: String, to: String },
}

impl Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingReference { from, to } => {
                write!(f, "schema `{from}` references unknown schema `{to}`")
            }
        }
    }
}
