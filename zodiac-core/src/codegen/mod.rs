use std::path::Path;

use miette::{Context, IntoDiagnostic};

/// Writes a generated file to `output`, creating any missing
/// parent directories.
pub fn write_to_disk(output: &Path, code: impl IntoCode) -> miette::Result<()> {
    let code = code.into_code();
    let path = output.join(code.path());
    let string = code.into_string()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .into_diagnostic()
            .with_context(|| format!("Failed to create directory `{}`", parent.display()))?;
    }
    std::fs::write(&path, string)
        .into_diagnostic()
        .with_context(|| format!("Failed to write `{}`", path.display()))?;
    tracing::debug!(path = %path.display(), "wrote generated file");
    Ok(())
}

/// A generated source file.
pub trait Code {
    /// The file's path, relative to the output directory.
    fn path(&self) -> &str;

    /// Renders the file's contents.
    fn into_string(self) -> miette::Result<String>;
}

impl<P: AsRef<str>> Code for (P, String) {
    fn path(&self) -> &str {
        self.0.as_ref()
    }

    fn into_string(self) -> miette::Result<String> {
        Ok(self.1)
    }
}

pub trait IntoCode {
    type Code: Code;

    fn into_code(self) -> Self::Code;
}

impl<T: Code> IntoCode for T {
    type Code = T;

    fn into_code(self) -> Self::Code {
        self
    }
}
