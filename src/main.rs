// llcalc: LL(1) parser generator and step-through calculator interpreter

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::debug;

use llcalc::grammar::knowledge::Knowledge;
use llcalc::grammar::table::ParseTable;
use llcalc::grammar::{builtin, Grammar};
use llcalc::interpreter::{Interpreter, RunConfig};
use llcalc::parser::{self, ParseTree};
use llcalc::ui::App;

/// LL(1) parser generator with a table-driven calculator interpreter.
#[derive(Parser)]
#[command(name = "llcalc", version, about)]
struct Cli {
    /// Grammar to build the parse table from: `calculator`, `extended` or a
    /// path to a JSON grammar file.
    #[arg(short, long, global = true, default_value = "extended")]
    grammar: String,

    /// Reject grammars whose predict sets overlap instead of resolving by
    /// alternative order.
    #[arg(long, global = true)]
    strict: bool,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program and print its output.
    Run(RunArgs),
    /// Print the concrete parse tree of a program.
    Parse(DumpArgs),
    /// Print the lowered program.
    Ast(DumpArgs),
    /// Print nullable/FIRST/FOLLOW and the prediction table of the grammar.
    Table {
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Run a program, then step through its history in a terminal UI.
    Tui(TuiArgs),
}

#[derive(Args)]
struct InputArgs {
    /// Program input as a single string of whitespace-separated words.
    #[arg(long, conflicts_with = "input_file")]
    input: Option<String>,

    /// Read program input from a file.
    #[arg(long)]
    input_file: Option<PathBuf>,
}

#[derive(Args)]
struct RunArgs {
    /// Program source file.
    file: PathBuf,

    #[command(flatten)]
    input: InputArgs,

    /// Stop with a runtime error after this many steps.
    #[arg(long)]
    max_steps: Option<u64>,
}

#[derive(Args)]
struct DumpArgs {
    /// Program source file.
    file: PathBuf,

    /// Emit JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct TuiArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Snapshot history budget in megabytes.
    #[arg(long, default_value_t = 256)]
    snapshot_limit_mb: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let grammar = load_grammar(&cli.grammar)?;
    let table = if cli.strict {
        ParseTable::build_strict(&grammar)?
    } else {
        ParseTable::from_grammar(&grammar)
    };
    debug!(
        nonterminals = grammar.rules().len(),
        terminals = grammar.terminals().len(),
        "parse table ready"
    );

    match cli.command {
        Commands::Run(args) => {
            let source = read_source(&args.file)?;
            let input = read_input(&args.input)?;
            let program = compile(&table, &source)?;
            let config = RunConfig {
                snapshot_limit: None,
                max_steps: args.max_steps,
            };
            let run = Interpreter::new(config).run(&program, &input);
            print!("{}", run.render());
        }

        Commands::Parse(args) => {
            let source = read_source(&args.file)?;
            let tree = parser::parse(&table, &source);
            if tree.is_error() {
                std::process::exit(1);
            }
            emit(&tree, args.json)?;
        }

        Commands::Ast(args) => {
            let source = read_source(&args.file)?;
            let program = compile(&table, &source)?;
            emit(&program, args.json)?;
        }

        Commands::Table { json } => {
            let knowledge = Knowledge::compute(&grammar);
            if json {
                let dump = serde_json::json!({ "knowledge": knowledge, "table": table });
                println!("{}", serde_json::to_string_pretty(&dump)?);
            } else {
                print_knowledge(&knowledge);
                println!();
                print!("{}", table);
                for conflict in table.conflicts() {
                    println!("conflict: {}", conflict);
                }
            }
        }

        Commands::Tui(args) => run_tui(&table, args)?,
    }

    Ok(())
}

/// Logs go to stderr, except for the TUI, where they would corrupt the
/// screen and are written to `llcalc.log` instead.
fn init_tracing(cli: &Cli) {
    let default = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    if matches!(cli.command, Commands::Tui(_)) {
        if !cli.verbose && std::env::var("RUST_LOG").is_err() {
            return;
        }
        if let Ok(log_file) = fs::File::create("llcalc.log") {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(log_file)
                .with_ansi(false)
                .init();
        }
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_grammar(name: &str) -> Result<Grammar> {
    if let Some(grammar) = builtin::by_name(name) {
        return Ok(grammar);
    }
    let text = fs::read_to_string(name)
        .with_context(|| format!("'{}' is neither a built-in grammar nor a readable file", name))?;
    Grammar::from_json(&text).with_context(|| format!("loading grammar {}", name))
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_input(args: &InputArgs) -> Result<String> {
    match (&args.input, &args.input_file) {
        (Some(words), _) => Ok(words.clone()),
        (None, Some(path)) => read_source(path),
        (None, None) => Ok(String::new()),
    }
}

/// Parses and lowers, reporting a syntax error the way `parse` does.
fn compile(table: &ParseTable, source: &str) -> Result<parser::ast::Program> {
    match llcalc::compile(table, source) {
        Ok(program) => Ok(program),
        Err(llcalc::CompileError::Syntax(e)) => {
            eprintln!("{}", e);
            // The error tree still lowers to a program, which fails at run time
            Ok(parser::lower(&ParseTree::Error)?)
        }
        Err(e) => bail!(e),
    }
}

fn emit<T: serde::Serialize + std::fmt::Display>(value: &T, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", value);
    }
    Ok(())
}

fn print_knowledge(knowledge: &Knowledge) {
    let width = knowledge
        .entries()
        .iter()
        .map(|(nt, _)| nt.len())
        .max()
        .unwrap_or(0);
    println!("fixed point after {} passes", knowledge.passes());
    for (nt, k) in knowledge.entries() {
        let first: Vec<&str> = k.first.iter().map(String::as_str).collect();
        let follow: Vec<&str> = k.follow.iter().map(String::as_str).collect();
        println!(
            "{:width$}  nullable={:<5}  first={{{}}}  follow={{{}}}",
            nt,
            k.nullable,
            first.join(" "),
            follow.join(" "),
            width = width
        );
    }
}

fn run_tui(table: &ParseTable, args: TuiArgs) -> Result<()> {
    let source = read_source(&args.run.file)?;
    let input = read_input(&args.run.input)?;

    eprintln!("Parsing {}...", args.run.file.display());
    let program = compile(table, &source)?;
    eprintln!(
        "Parsed successfully. Found {} statements.",
        program.statement_count()
    );

    let config = RunConfig {
        snapshot_limit: Some(args.snapshot_limit_mb * 1024 * 1024),
        max_steps: args.run.max_steps,
    };
    eprintln!("Executing program...");
    let run = Interpreter::new(config).run(&program, &input);
    let Some(history) = run.history else {
        bail!("no execution history was recorded");
    };
    eprintln!("Total snapshots: {}", history.len());

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&program, history);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("terminal UI failed")
}
