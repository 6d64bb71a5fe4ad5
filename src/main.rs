use anyhow::Context;
use argh::FromArgs;
use mini_shell::{Config, Interpreter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(FromArgs)]
/// A small interactive shell with pipes, quoting and variables.
struct Args {
    #[argh(option, short = 'c')]
    /// run a single command line and exit
    command: Option<String>,

    #[argh(option)]
    /// configuration file to use instead of the discovered one
    config: Option<PathBuf>,
}

fn init_logging(default_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}

fn run(args: Args) -> anyhow::Result<i32> {
    let config = Config::load(args.config.as_deref())?;
    init_logging(&config.logging.level);

    let mut sh = Interpreter::with_config(&config).context("can't set up the shell")?;
    match args.command {
        Some(line) => {
            let ok = sh.eval_print(&line);
            Ok(match sh.env() {
                env if env.should_exit => env.exit_code,
                _ if ok => 0,
                _ => 1,
            })
        }
        None => sh.repl(&config),
    }
}

fn main() {
    let args: Args = argh::from_env();
    let code = match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            1
        }
    };
    std::process::exit(code);
}
