use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

use cruxc::compiler::{CompilationPipeline, CompilationState, CompileOptions, EmitKind};

#[derive(Parser)]
#[command(name = "cruxc")]
#[command(author, version, about = "The Crux language compiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a Crux source file to x86-64 assembly
    Compile {
        /// The source file to compile
        input: PathBuf,

        /// Output file (defaults to the input with a .s or .ir extension)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// What to emit
        #[arg(long = "emit", value_enum, default_value = "asm")]
        emit: EmitKind,

        /// Dump the AST to stdout as JSON
        #[arg(long)]
        dump_ast: bool,

        /// Dump tokens to stdout
        #[arg(long)]
        dump_tokens: bool,
    },

    /// Compile, link against the runtime library and run a Crux source file
    Run {
        /// The source file to run
        input: PathBuf,

        /// Path to the runtime static library (defaults to libcruxc.a next to this binary)
        #[arg(long)]
        runtime: Option<PathBuf>,
    },

    /// Check a Crux source file for errors without generating code
    Check {
        /// The source file to check
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logger before parsing CLI args
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbose flag
    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let result = match cli.command {
        Commands::Compile {
            input,
            output,
            emit,
            dump_ast,
            dump_tokens,
        } => compile(&input, output, emit, dump_ast, dump_tokens, cli.verbose),
        Commands::Run { input, runtime } => run(&input, runtime, cli.verbose),
        Commands::Check { input } => check(&input),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

/// パイプラインを実行し、失敗したら診断を出力してエラーにする
fn build(
    input: &Path,
    options: CompileOptions,
    dump_ast: bool,
    dump_tokens: bool,
) -> Result<cruxc::compiler::CompilationArtifact> {
    let state = CompilationState::new(input)?;
    let mut pipeline = CompilationPipeline::new(state, options);
    let artifact = pipeline.run()?;

    if dump_tokens {
        println!("{}", "=== Tokens ===".blue().bold());
        for (i, token) in pipeline.tokens().iter().enumerate() {
            println!(
                "{:4}: {:?} @ {}:{}",
                i, token.token, token.position.line, token.position.column
            );
        }
        println!();
    }

    if dump_ast {
        if let Some(ast) = pipeline.ast() {
            println!("{}", "=== AST ===".blue().bold());
            println!("{}", serde_json::to_string_pretty(ast)?);
            println!();
        }
    }

    match artifact {
        Some(artifact) => Ok(artifact),
        None => {
            pipeline.report_errors()?;
            anyhow::bail!(
                "could not compile {} due to {} previous error(s)",
                input.display(),
                pipeline.state().error_count()
            )
        }
    }
}

fn compile(
    input: &Path,
    output: Option<PathBuf>,
    emit: EmitKind,
    dump_ast: bool,
    dump_tokens: bool,
    verbose: bool,
) -> Result<()> {
    if verbose {
        println!("{}: Compiling {:?}", "info".blue().bold(), input);
    }

    let options = CompileOptions { emit, verbose };
    let artifact = build(input, options, dump_ast, dump_tokens)?;

    let output = output.unwrap_or_else(|| input.with_extension(emit.extension()));
    fs::write(&output, &artifact.output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{}: Wrote {}",
        "success".green().bold(),
        output.display()
    );
    Ok(())
}

fn run(input: &Path, runtime: Option<PathBuf>, verbose: bool) -> Result<()> {
    log::info!("Running {:?}", input);

    let options = CompileOptions {
        emit: EmitKind::Asm,
        verbose,
    };
    let artifact = build(input, options, false, false)?;

    let runtime = match runtime {
        Some(path) => path,
        None => default_runtime_path()?,
    };
    if !runtime.exists() {
        anyhow::bail!(
            "runtime library {} not found (build the crate first or pass --runtime)",
            runtime.display()
        );
    }

    let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
    let asm_path = temp_dir.path().join("program.s");
    let exe_path = temp_dir.path().join("program");
    fs::write(&asm_path, &artifact.output)?;

    log::debug!("Linking {:?} with {:?}", asm_path, runtime);
    let status = Command::new("cc")
        .arg(&asm_path)
        .arg(&runtime)
        .args(["-lpthread", "-ldl", "-lm", "-o"])
        .arg(&exe_path)
        .status()
        .context("Failed to run the system C compiler")?;
    if !status.success() {
        anyhow::bail!("Linking failed");
    }

    log::debug!("Executing {:?}", exe_path);
    let status = Command::new(&exe_path)
        .status()
        .context("Failed to execute compiled program")?;

    if !status.success() {
        if let Some(code) = status.code() {
            std::process::exit(code);
        } else {
            anyhow::bail!("Program terminated by signal");
        }
    }

    Ok(())
}

fn default_runtime_path() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the cruxc binary")?;
    let dir = exe
        .parent()
        .context("cruxc binary has no parent directory")?;
    Ok(dir.join("libcruxc.a"))
}

fn check(input: &Path) -> Result<()> {
    log::info!("Checking {:?}", input);

    let state = CompilationState::new(input)?;
    let mut pipeline = CompilationPipeline::new(state, CompileOptions::default());
    pipeline.tokenize();
    if !pipeline.state().has_errors() {
        pipeline.parse();
    }
    if pipeline.ast().is_some() {
        pipeline.type_check();
    }

    if pipeline.state().has_errors() {
        pipeline.report_errors()?;
        anyhow::bail!("{} error(s) found", pipeline.state().error_count());
    }

    println!("{}: No errors found", "success".green().bold());
    Ok(())
}
