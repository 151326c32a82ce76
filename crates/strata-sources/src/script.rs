//! Executable configuration definitions (unsafe, opt-in)
//!
//! A script file is run by an external interpreter that must print the
//! resulting settings as JSON on stdout. Running a script executes arbitrary
//! code, so scripts are ignored unless a [`ScriptOptions`] is supplied.

use std::path::Path;
use std::process::Command;

use strata_core::Value;

use crate::{Error, Result};

/// Prints `module.exports` of the file passed as the first argument as JSON
const NODE_HARNESS: &str = "process.stdout.write(JSON.stringify(require(process.argv[1])))";

/// How to evaluate script configuration files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOptions {
    /// File extension (without the dot) that marks a script file
    pub extension: String,
    /// Interpreter to run
    pub program: String,
    /// Arguments placed before the absolute script path
    pub args: Vec<String>,
}

impl Default for ScriptOptions {
    /// Legacy JavaScript definitions evaluated with `node`
    fn default() -> Self {
        Self {
            extension: "js".to_string(),
            program: "node".to_string(),
            args: vec!["-e".to_string(), NODE_HARNESS.to_string()],
        }
    }
}

impl ScriptOptions {
    /// Use `program` with `args` for files ending in `.extension`
    pub fn new(
        extension: impl Into<String>,
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            extension: extension.into(),
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches_extension(&self, extension: &str) -> bool {
        extension.eq_ignore_ascii_case(&self.extension)
    }

    /// Run the interpreter on `path` and decode its stdout as JSON
    pub fn evaluate(&self, path: &Path) -> Result<Value> {
        let script_error = |message: String| Error::Script {
            path: path.to_path_buf(),
            message,
        };

        let absolute = path.canonicalize().map_err(|e| Error::io(path, e))?;
        tracing::debug!(path = %absolute.display(), program = %self.program, "Evaluating script config");

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(&absolute)
            .output()
            .map_err(|e| script_error(format!("could not run {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(script_error(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        serde_json::from_slice::<serde_json::Value>(&output.stdout)
            .map(Value::from)
            .map_err(|e| script_error(format!("output is not valid JSON: {e}")))
    }
}
