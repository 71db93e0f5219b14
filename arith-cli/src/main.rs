use std::fs;
use std::io::{self, Read, Write};

use anyhow::{Context, Result};
use arith_core::{EvalError, compile, evaluate};
use clap::Parser;

/// Evaluate arithmetic expressions built from `+ - * /`, parentheses and
/// non-negative decimal numbers.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Expression to evaluate instead of reading --input or stdin
    #[arg(short, long, value_name = "EXPRESSION", conflicts_with = "input")]
    expr: Option<String>,

    /// File with one expression per line (defaults to stdin)
    #[arg(short, long, value_name = "PATH")]
    input: Option<String>,

    #[arg(long, help = "Print the postfix (RPN) form instead of the value")]
    postfix: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    execute(cli)
}

fn execute(cli: Cli) -> Result<()> {
    let expressions = match cli.expr {
        Some(expr) => vec![expr],
        None => {
            let source = match &cli.input {
                Some(path) => fs::read_to_string(path)
                    .with_context(|| format!("failed to read input file {path}"))?,
                None => {
                    let mut buffer = String::new();
                    io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            source
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect()
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for expression in &expressions {
        let line = render(expression, cli.postfix)
            .map_err(|err| anyhow::anyhow!("{} ({})", err, classify(&err)))
            .with_context(|| format!("failed to evaluate {expression:?}"))?;
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn render(expression: &str, postfix: bool) -> Result<String, EvalError> {
    if postfix {
        compile(expression).map(|postfix| postfix.to_string())
    } else {
        evaluate(expression).map(|value| value.to_string())
    }
}

fn classify(err: &EvalError) -> &'static str {
    if err.is_malformed_input() {
        "client fault"
    } else {
        match err {
            EvalError::DivisionByZero => "semantic fault",
            _ => "internal fault",
        }
    }
}
