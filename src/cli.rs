use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "rbridge", about = "Run R expressions and functions through Rscript", version)]
pub struct Cli {
    /// Directory containing Rscript; on Windows, the R installation root to scan.
    #[arg(long = "r-path", global = true, value_name = "DIR")]
    pub r_path: Option<PathBuf>,

    /// Platform classification to use instead of the host's (win|lin|mac).
    #[arg(long, global = true)]
    pub os: Option<String>,

    /// Print the parsed result as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose logging to stderr.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Evaluate an R expression.
    Eval {
        #[arg(value_name = "EXPR")]
        expr: String,
        /// Run on the async executor.
        #[arg(long = "async")]
        run_async: bool,
    },
    /// Run an R script file.
    Script {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long = "async")]
        run_async: bool,
    },
    /// Call an R function, optionally defined in a sourced file.
    Call {
        #[arg(value_name = "FUNCTION")]
        function: String,
        /// R file to source before calling.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Arguments as JSON: an array for positional, an object for named.
        #[arg(long, default_value = "[]")]
        args: String,
        #[arg(long = "async")]
        run_async: bool,
    },
    /// Print the resolved Rscript path.
    Locate,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
