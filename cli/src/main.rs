use bumpalo::Bump;
use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result, WrapErr, miette};
use statexpr::{
    Backend, CompilationOptions, CompiledFormula, Engine, EngineOptions, Registry,
    register_math_extras, render_error,
};
use std::io::BufRead;
use tracing::debug;

/// statexpr - Evaluate single-input arithmetic formulas
#[derive(Parser, Debug)]
#[command(name = "statexpr")]
#[command(about = "Compile a formula and evaluate it for each input", long_about = None)]
struct Args {
    /// Formula to compile, e.g. "Max(In; 0) * 2"
    formula: String,

    /// Input value (repeatable). If none is given, inputs are read from
    /// stdin, one per line.
    #[arg(short, long = "input", allow_negative_numbers = true)]
    inputs: Vec<f64>,

    /// Execution backend
    #[arg(long, value_enum, default_value_t = BackendArg::Tree)]
    backend: BackendArg,

    /// Enable Clamp, Pow, Floor, Ceil, Round and Sqrt
    #[arg(long)]
    extras: bool,

    /// Print the parsed expression tree (for debugging)
    #[arg(long)]
    debug_parse: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendArg {
    Tree,
    Bytecode,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Tree => Backend::Tree,
            BackendArg::Bytecode => Backend::Bytecode,
        }
    }
}

fn build_registry(extras: bool) -> Result<Registry> {
    let mut registry = Registry::builtin();
    if extras {
        register_math_extras(&mut registry).into_diagnostic()?;
    }
    Ok(registry)
}

fn print_result(input: f64, formula: &CompiledFormula<'_>) {
    println!("{} -> {}", input, formula.call(input));
}

/// Read one input per line; blank lines are skipped and `,` is accepted as
/// the decimal separator.
fn evaluate_stdin(formula: &CompiledFormula<'_>) -> Result<()> {
    let stdin = std::io::stdin();
    for (index, line) in stdin.lock().lines().enumerate() {
        let line = line.into_diagnostic().wrap_err("Failed to read stdin")?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let input: f64 = text
            .replace(',', ".")
            .parse()
            .map_err(|_| miette!("line {}: '{}' is not a number", index + 1, text))?;
        print_result(input, formula);
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG to control the log level, WARN if not set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let registry = build_registry(args.extras)?;
    let arena = Bump::new();
    let engine = match Engine::with_registry(&arena, &registry, EngineOptions::default()) {
        Ok(engine) => engine,
        Err(e) => {
            render_error(&e);
            std::process::exit(1);
        }
    };
    let options = CompilationOptions {
        backend: args.backend.into(),
    };

    let formula = match engine.compile_with(&options, &args.formula) {
        Ok(formula) => formula,
        Err(e) => {
            render_error(&e);
            std::process::exit(1);
        }
    };
    debug!(formula = formula.source(), backend = ?formula.backend(), "ready");

    if args.debug_parse {
        println!("=== Parsed Tree ===");
        println!("{}", formula.root());
        if !formula.root().depends_on_input() {
            println!("(constant: the input is never read)");
        }
        if let Some(code) = formula.code() {
            println!("{:?}", code);
        }
        println!();
    }

    if args.inputs.is_empty() {
        evaluate_stdin(&formula)?;
    } else {
        for &input in &args.inputs {
            print_result(input, &formula);
        }
    }

    Ok(())
}
