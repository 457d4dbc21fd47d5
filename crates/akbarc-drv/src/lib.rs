//! akbarc-drv - Compiler driver.
//!
//! Thin glue around the pipeline crates: reads a source file, runs
//! lex → parse → analyze → lower → optimize → emit, and writes the
//! resulting `.cpp` next to the input (or wherever `-o` points).
//! Intermediate dumps are available with `--emit tokens|ast|ir`, and
//! `--build`/`--run` hand the emitted file to the system C++ compiler.
//!
//! The pipeline itself holds no resources and is fully deterministic;
//! everything effectful (file I/O, subprocesses) lives here.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use anyhow::{bail, Context};
use thiserror::Error;

/// What the driver should produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Emit {
    /// Token stream, one per line.
    Tokens,
    /// Parsed AST, debug form.
    Ast,
    /// Optimized IR, one instruction per line.
    Ir,
    /// The C++ translation unit (default).
    #[default]
    Cpp,
}

impl FromStr for Emit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tokens" => Ok(Emit::Tokens),
            "ast" => Ok(Emit::Ast),
            "ir" => Ok(Emit::Ir),
            "cpp" => Ok(Emit::Cpp),
            other => bail!("unknown emit kind `{}` (expected tokens, ast, ir or cpp)", other),
        }
    }
}

impl fmt::Display for Emit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Emit::Tokens => "tokens",
            Emit::Ast => "ast",
            Emit::Ir => "ir",
            Emit::Cpp => "cpp",
        };
        write!(f, "{}", name)
    }
}

/// One driver invocation's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Source file to compile.
    pub input: PathBuf,

    /// Output path; defaults to the input with a `.cpp` extension.
    pub output: Option<PathBuf>,

    /// What to produce.
    pub emit: Emit,

    /// Invoke the system C++ compiler on the emitted file.
    pub build: bool,

    /// Build, then execute the binary with inherited stdio.
    pub run: bool,

    /// Trace pipeline stages on stderr.
    pub verbose: bool,
}

pub const USAGE: &str =
    "usage: akbarc <source-file> [-o <path>] [--emit tokens|ast|ir|cpp] [--build] [--run] [--verbose]";

/// Parses command-line arguments (without the program name).
pub fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Config> {
    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut emit = Emit::default();
    let mut build = false;
    let mut run = false;
    let mut verbose = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" => {
                let Some(path) = args.next() else {
                    bail!("`-o` needs a path\n{}", USAGE);
                };
                output = Some(PathBuf::from(path));
            },
            "--emit" => {
                let Some(kind) = args.next() else {
                    bail!("`--emit` needs a kind\n{}", USAGE);
                };
                emit = kind.parse()?;
            },
            "--build" => build = true,
            "--run" => run = true,
            "--verbose" => verbose = true,
            "-h" | "--help" => bail!("{}", USAGE),
            other if other.starts_with('-') => {
                bail!("unknown option `{}`\n{}", other, USAGE);
            },
            _ => {
                if input.is_some() {
                    bail!("more than one source file\n{}", USAGE);
                }
                input = Some(PathBuf::from(arg));
            },
        }
    }

    let Some(input) = input else {
        bail!("missing source file\n{}", USAGE);
    };
    Ok(Config {
        input,
        output,
        emit,
        build,
        run,
        verbose,
    })
}

/// A failure in any pipeline stage. Stage errors already render in the
/// `<stage> error at line L, column C: <message>` shape, so the wrapper
/// is transparent.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] akbarc_lex::LexError),

    #[error(transparent)]
    Parse(#[from] akbarc_par::ParseError),

    #[error(transparent)]
    Semantic(#[from] akbarc_sem::SemanticErrors),
}

/// Runs the whole pipeline on source text and returns the emitted C++.
pub fn compile_source(source: &str) -> Result<String, CompileError> {
    let tokens = akbarc_lex::lex(source)?;
    let program = akbarc_par::parse(tokens)?;
    akbarc_sem::analyze(&program)?;
    let ir = akbarc_ir::optimize(akbarc_ir::lower(&program));
    Ok(akbarc_gen::emit(&ir))
}

/// Executes one driver invocation.
pub fn run(config: &Config) -> anyhow::Result<()> {
    let source = fs::read_to_string(&config.input)
        .with_context(|| format!("cannot read `{}`", config.input.display()))?;

    if config.verbose {
        eprintln!("compiling `{}`", config.input.display());
    }

    match config.emit {
        Emit::Tokens => {
            let tokens = akbarc_lex::lex(&source).map_err(CompileError::from)?;
            for token in tokens {
                println!("{:?}", token.kind);
            }
            Ok(())
        },
        Emit::Ast => {
            let tokens = akbarc_lex::lex(&source).map_err(CompileError::from)?;
            let program = akbarc_par::parse(tokens).map_err(CompileError::from)?;
            println!("{:#?}", program);
            Ok(())
        },
        Emit::Ir => {
            let tokens = akbarc_lex::lex(&source).map_err(CompileError::from)?;
            let program = akbarc_par::parse(tokens).map_err(CompileError::from)?;
            akbarc_sem::analyze(&program).map_err(CompileError::from)?;
            let ir = akbarc_ir::optimize(akbarc_ir::lower(&program));
            for instr in &ir {
                println!("{}", instr);
            }
            Ok(())
        },
        Emit::Cpp => {
            let cpp = compile_source(&source)?;
            let cpp_path = config
                .output
                .clone()
                .unwrap_or_else(|| config.input.with_extension("cpp"));
            fs::write(&cpp_path, cpp)
                .with_context(|| format!("cannot write `{}`", cpp_path.display()))?;
            if config.verbose {
                eprintln!("wrote `{}`", cpp_path.display());
            }
            if config.build || config.run {
                let binary = build_binary(config, &cpp_path)?;
                if config.run {
                    run_binary(&binary)?;
                }
            }
            Ok(())
        },
    }
}

/// Hands the emitted file to the system C++ compiler (`$CXX` or `c++`).
fn build_binary(config: &Config, cpp_path: &Path) -> anyhow::Result<PathBuf> {
    let binary = cpp_path.with_extension("");
    let compiler = std::env::var("CXX").unwrap_or_else(|_| "c++".to_string());

    if config.verbose {
        eprintln!("building `{}` with {}", binary.display(), compiler);
    }
    let status = Command::new(&compiler)
        .arg("-std=c++11")
        .arg("-o")
        .arg(&binary)
        .arg(cpp_path)
        .status()
        .with_context(|| format!("cannot invoke `{}`", compiler))?;
    if !status.success() {
        bail!("`{}` failed with {}", compiler, status);
    }
    Ok(binary)
}

fn run_binary(binary: &Path) -> anyhow::Result<()> {
    let status = Command::new(binary)
        .status()
        .with_context(|| format!("cannot execute `{}`", binary.display()))?;
    if !status.success() {
        bail!("`{}` exited with {}", binary.display(), status);
    }
    Ok(())
}
