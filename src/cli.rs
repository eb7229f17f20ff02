use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::{
    buffer::Buffer,
    char_index_range::CharIndexRange,
    command::{CommandArgs, CommandContext, CommandOutcome, CommandRegistry},
    config::AppConfig,
    engine::Engine,
    picker::LineChooser,
};

#[derive(Parser)]
#[command(author, version, about = "Swap paired delimiters in text", long_about = None)]
struct Cli {
    /// Config file (.json, .yaml or .toml), layered over `.delim-swap/config.*`
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the index and label of every charset
    List,
    /// Print the names of the registered commands
    Commands,
    /// Run a command over a file, or over stdin when no path is given
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// One of the names printed by `commands`
    command: String,

    /// Source charset index, for `swap_chars_from_to`
    #[arg(long)]
    from: Option<usize>,

    /// Target charset index, for `swap_chars_from_to`
    #[arg(long)]
    to: Option<usize>,

    /// Restrict the swap to this char range; may be repeated
    #[arg(long = "select", value_name = "START..END")]
    selections: Vec<CharIndexRange>,

    /// Write the result back to PATH instead of stdout
    #[arg(long, requires = "path")]
    in_place: bool,

    path: Option<PathBuf>,
}

pub fn cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_from_current_directory(cli.config.as_deref())?;
    config.init_logging()?;
    let engine = config.engine()?;
    let registry = CommandRegistry::default();

    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();
    match cli.command {
        Commands::List => list(&engine, &mut stdout),
        Commands::Commands => {
            for name in registry.names() {
                writeln!(stdout, "{name}")?;
            }
            Ok(())
        }
        Commands::Run(args) => run(
            &engine,
            &registry,
            args,
            std::io::stdin().lock(),
            &mut stdout,
            std::io::stderr(),
        ),
    }
}

fn list(engine: &Engine, output: &mut impl Write) -> anyhow::Result<()> {
    for (index, label) in engine.list_charsets() {
        writeln!(output, "{index}\t{label}")?;
    }
    Ok(())
}

fn run(
    engine: &Engine,
    registry: &CommandRegistry,
    args: RunArgs,
    mut input: impl BufRead,
    output: &mut impl Write,
    prompt_output: impl Write,
) -> anyhow::Result<()> {
    let mut buffer = match &args.path {
        Some(path) => Buffer::from_path(path)?,
        None if args.command == "swap_chars" => {
            return Err(anyhow::anyhow!(
                "swap_chars reads its choices from stdin, so the text must come from a PATH"
            ))
        }
        None => {
            let mut text = String::new();
            input
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Buffer::new(&text)
        }
    };
    buffer.set_selections(args.selections)?;

    let mut chooser = LineChooser::new(input, prompt_output);
    let outcome = registry.run(
        &args.command,
        &mut CommandContext {
            engine,
            buffer: &mut buffer,
            chooser: &mut chooser,
            args: CommandArgs {
                from: args.from,
                to: args.to,
            },
        },
    )?;
    if let CommandOutcome::Applied {
        transformation,
        regions,
        changed,
    } = &outcome
    {
        log::info!("{transformation}: changed {changed} of {regions} region(s)");
    }

    if args.in_place {
        if matches!(outcome, CommandOutcome::Applied { changed, .. } if changed > 0) {
            buffer.save()?;
        }
    } else {
        write!(output, "{}", buffer.content())?;
        output.flush()?;
    }
    Ok(())
}
