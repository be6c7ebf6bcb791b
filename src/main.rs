mod cli;
mod printer;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

use cli::Command;
use printer::{JsonPrinter, TextPrinter};
use rbridge::{Config, ParsedOutput, Params, RBridge};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // CLI flags override file and environment config
    let mut cfg = Config::load();
    if let Some(dir) = &args.r_path {
        cfg.set("RBRIDGE_R_PATH", dir.to_string_lossy());
    }
    if let Some(os) = &args.os {
        cfg.set("RBRIDGE_OS", os.as_str());
    }

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(cfg.log_filter()).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let bridge = RBridge::from_config(&cfg);

    let output = match args.command {
        Command::Locate => {
            let path = bridge.locate()?;
            println!("{}", path.display());
            return Ok(());
        }
        Command::Eval { expr, run_async } => {
            if run_async {
                bridge.execute_command_async(&expr).await?
            } else {
                bridge.execute_command(&expr)?
            }
        }
        Command::Script { file, run_async } => {
            if run_async {
                bridge.execute_script_async(&file).await?
            } else {
                bridge.execute_script(&file)?
            }
        }
        Command::Call {
            function,
            file,
            args: raw_args,
            run_async,
        } => {
            let json: serde_json::Value = serde_json::from_str(&raw_args)
                .with_context(|| format!("invalid --args json: {}", raw_args))?;
            let params = Params::from_json(json)?;
            call(&bridge, &function, file.as_deref(), &params, run_async).await?
        }
    };

    if args.json {
        JsonPrinter.print(&output)?;
    } else {
        TextPrinter {
            color: std::io::stdout().is_terminal(),
        }
        .print(&output)?;
    }
    Ok(())
}

async fn call(
    bridge: &RBridge,
    function: &str,
    file: Option<&std::path::Path>,
    params: &Params,
    run_async: bool,
) -> rbridge::Result<ParsedOutput> {
    match (file, run_async) {
        (Some(f), true) => bridge.call_method_async(f, function, params).await,
        (Some(f), false) => bridge.call_method(f, function, params),
        (None, true) => bridge.call_standard_method_async(function, params).await,
        (None, false) => bridge.call_standard_method(function, params),
    }
}
