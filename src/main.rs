//! PyitLang runner
//!
//! Reads a program from `-e`, a file, or stdin, runs it once and prints the
//! resulting log.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use pyitlang::{InputSource, Interpreter, NoInput, Report, ScriptedInput, StdinInput};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "pyit", version, about = "Run a PyitLang program")]
struct Cli {
    /// Program file (stdin when neither this nor --eval is given)
    file: Option<PathBuf>,

    /// Program text given inline
    #[arg(short, long, value_name = "SOURCE", conflicts_with = "file")]
    eval: Option<String>,

    /// Answer for getString; repeat for several. Unanswered requests get no input.
    #[arg(long = "answer", value_name = "TEXT")]
    answers: Vec<String>,

    /// List diagnostics on stderr and exit with status 1 if there were any
    #[arg(long)]
    diagnostics: bool,

    /// More log output (-v debug, -vv trace). RUST_LOG overrides this.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {}: {source}", .path.display())]
    ReadFile { path: PathBuf, source: io::Error },

    #[error("cannot read program from stdin: {0}")]
    ReadStdin(#[source] io::Error),

    #[error("cannot write output: {0}")]
    WriteOutput(#[source] io::Error),
}

/// Where the program text came from
enum Program {
    Inline(String),
    File(PathBuf, String),
    Stdin(String),
}

impl Program {
    fn load(cli: &Cli) -> Result<Self, CliError> {
        if let Some(source) = &cli.eval {
            return Ok(Program::Inline(source.clone()));
        }
        if let Some(path) = &cli.file {
            let source = fs::read_to_string(path).map_err(|source| CliError::ReadFile {
                path: path.clone(),
                source,
            })?;
            return Ok(Program::File(path.clone(), source));
        }
        let mut source = String::new();
        io::stdin().read_to_string(&mut source).map_err(CliError::ReadStdin)?;
        Ok(Program::Stdin(source))
    }

    fn source(&self) -> &str {
        match self {
            Program::Inline(source) | Program::File(_, source) | Program::Stdin(source) => source,
        }
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(true).with_level(true))
        .with(filter)
        .init();
}

/// Which input source `getString` talks to
#[derive(Debug, PartialEq)]
enum InputKind {
    Scripted(Vec<String>),
    Terminal,
    Unavailable,
}

impl InputKind {
    /// Scripted answers win; otherwise read the terminal, unless stdin already
    /// held the program.
    fn select(cli: &Cli, program: &Program) -> Self {
        if !cli.answers.is_empty() {
            return InputKind::Scripted(cli.answers.clone());
        }
        match program {
            Program::Stdin(_) => InputKind::Unavailable,
            _ => InputKind::Terminal,
        }
    }

    fn into_source(self) -> Box<dyn InputSource> {
        match self {
            InputKind::Scripted(answers) => Box::new(ScriptedInput::new(answers)),
            InputKind::Terminal => Box::new(StdinInput::new(io::stdin().lock(), io::stderr())),
            InputKind::Unavailable => Box::new(NoInput),
        }
    }
}

/// Process status: 1 only when `--diagnostics` is set and the run was not clean
fn exit_status(cli: &Cli, report: &Report) -> u8 {
    if cli.diagnostics && !report.is_clean() {
        1
    } else {
        0
    }
}

fn write_diagnostics(out: &mut impl Write, report: &Report) -> io::Result<()> {
    for diagnostic in &report.diagnostics {
        writeln!(out, "pyit: {:?}: {}", diagnostic.kind(), diagnostic)?;
    }
    writeln!(
        out,
        "pyit: {} diagnostic(s) in {} statement(s)",
        report.diagnostics.len(),
        report.statements
    )
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let program = Program::load(&cli)?;
    if let Program::File(path, _) = &program {
        info!(path = %path.display(), "loaded program");
    }

    let input = InputKind::select(&cli, &program);
    debug!(?input, "input source");
    let mut interpreter = Interpreter::with_input(input.into_source());
    let report = interpreter.run(program.source());
    debug!(statements = report.statements, clean = report.is_clean(), "run complete");

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(report.output.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(CliError::WriteOutput)?;

    if cli.diagnostics {
        write_diagnostics(&mut io::stderr().lock(), &report).map_err(CliError::WriteOutput)?;
    }
    Ok(ExitCode::from(exit_status(&cli, &report)))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("pyit: {}", err);
            ExitCode::FAILURE
        }
    }
}
