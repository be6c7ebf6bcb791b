//! Call R from Rust through `Rscript`.
//!
//! ```no_run
//! use rbridge::{Params, RBridge};
//!
//! let r = RBridge::new();
//! let out = r.call_standard_method("mean", &Params::named([("x", vec![1, 2, 3])]))?;
//! println!("{:?}", out.values());
//! # Ok::<(), rbridge::BridgeError>(())
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod locator;
pub mod parser;
pub mod platform;
pub mod process;
pub mod synth;

pub use bridge::RBridge;
pub use config::Config;
pub use error::{BridgeError, Result};
pub use locator::EngineLocator;
pub use parser::{parse, ParsedOutput, ParsedValue};
pub use platform::Platform;
pub use process::{ExecutionResult, Executor, ShellExecutor};
pub use synth::{build_call, CallExpression, ParamValue, Params};
