//! Public entry points: run R expressions, scripts and function calls.
//!
//! Every operation resolves `Rscript` afresh, builds one command line, runs it
//! in its own subprocess and parses stdout. Nothing is shared between calls,
//! so concurrent callers simply get concurrent R processes with no limit.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    config::Config,
    error::{BridgeError, Result},
    locator::EngineLocator,
    parser::{parse, ParsedOutput},
    platform::Platform,
    process::{ExecutionResult, Executor, ShellExecutor},
    synth::{build_call, Params},
};

#[derive(Debug, Clone)]
pub struct RBridge<E = ShellExecutor> {
    locator: EngineLocator,
    executor: E,
}

impl RBridge<ShellExecutor> {
    /// Host platform, default discovery, real subprocesses.
    pub fn new() -> Self {
        Self::with_executor(EngineLocator::new(Platform::current()), ShellExecutor)
    }

    pub fn from_config(cfg: &Config) -> Self {
        let locator = EngineLocator::new(cfg.platform())
            .with_override(cfg.r_path())
            .with_windows_root(cfg.windows_root());
        Self::with_executor(locator, ShellExecutor)
    }
}

impl Default for RBridge<ShellExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Executor> RBridge<E> {
    pub fn with_executor(locator: EngineLocator, executor: E) -> Self {
        Self { locator, executor }
    }

    pub fn platform(&self) -> Platform {
        self.locator.platform
    }

    pub fn locate(&self) -> Result<PathBuf> {
        self.locator.locate()
    }

    /// Run `expr` with `Rscript -e`, blocking until R exits.
    pub fn execute_command(&self, expr: &str) -> Result<ParsedOutput> {
        let command = self.expression_command(expr)?;
        self.finish(self.executor.run_sync(&command))
    }

    pub async fn execute_command_async(&self, expr: &str) -> Result<ParsedOutput> {
        let command = self.expression_command(expr)?;
        self.finish(self.executor.run_async(&command).await)
    }

    pub fn execute_script(&self, path: impl AsRef<Path>) -> Result<ParsedOutput> {
        let command = self.script_command(path.as_ref())?;
        self.finish(self.executor.run_sync(&command))
    }

    pub async fn execute_script_async(&self, path: impl AsRef<Path>) -> Result<ParsedOutput> {
        let command = self.script_command(path.as_ref())?;
        self.finish(self.executor.run_async(&command).await)
    }

    /// Source `file` and print the result of `function(params)`.
    pub fn call_method(
        &self,
        file: impl AsRef<Path>,
        function: &str,
        params: &Params,
    ) -> Result<ParsedOutput> {
        let expr = sourced_call(file.as_ref(), function, params)?;
        self.execute_command(&expr)
    }

    pub async fn call_method_async(
        &self,
        file: impl AsRef<Path>,
        function: &str,
        params: &Params,
    ) -> Result<ParsedOutput> {
        let expr = sourced_call(file.as_ref(), function, params)?;
        self.execute_command_async(&expr).await
    }

    /// Print the result of a function available without sourcing anything,
    /// e.g. `mean` or `stats::sd`.
    pub fn call_standard_method(&self, function: &str, params: &Params) -> Result<ParsedOutput> {
        let expr = format!("print({})", build_call(function, params)?);
        self.execute_command(&expr)
    }

    pub async fn call_standard_method_async(
        &self,
        function: &str,
        params: &Params,
    ) -> Result<ParsedOutput> {
        let expr = format!("print({})", build_call(function, params)?);
        self.execute_command_async(&expr).await
    }

    fn expression_command(&self, expr: &str) -> Result<String> {
        let runner = self.locator.locate()?;
        Ok(format!("\"{}\" -e \"{}\"", runner.display(), expr))
    }

    fn script_command(&self, path: &Path) -> Result<String> {
        if path.as_os_str().is_empty() {
            return Err(BridgeError::validation("script path is required"));
        }
        if !path.exists() {
            return Err(BridgeError::ScriptNotFound {
                path: path.to_path_buf(),
            });
        }
        let runner = self.locator.locate()?;
        Ok(format!("\"{}\" \"{}\"", runner.display(), path.display()))
    }

    fn finish(&self, result: ExecutionResult) -> Result<ParsedOutput> {
        match result {
            ExecutionResult::Output { stdout, .. } if !stdout.is_empty() => {
                let parsed = parse(&stdout, self.platform());
                debug!(values = parsed.len(), "parsed R output");
                Ok(parsed)
            }
            ExecutionResult::Output { stderr, .. } => {
                warn!("R produced no output");
                Err(BridgeError::script_execution(stderr.trim_end()))
            }
            ExecutionResult::Failure(diagnostic) => {
                warn!(%diagnostic, "R execution failed");
                Err(BridgeError::script_execution(diagnostic))
            }
        }
    }
}

/// `source('<file>'); print(<call>)`, with backslashes turned into `/` so the
/// path stays a valid R string literal.
fn sourced_call(file: &Path, function: &str, params: &Params) -> Result<String> {
    let file = file.to_string_lossy();
    if file.trim().is_empty() {
        return Err(BridgeError::validation("source file is required"));
    }
    let call = build_call(function, params)?;
    Ok(format!(
        "source('{}'); print({})",
        file.replace('\\', "/"),
        call
    ))
}
