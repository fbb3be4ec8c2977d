//! Koe CLI - ask Gemini a question, optionally hear the answer.
//!
//! ```bash
//! export GEMINI_API_KEY=...
//! koe ask "Detail the history of the given song." "Bohemian Rhapsody"
//! koe generate "Write a haiku about autumn"
//! koe speak "Explain simply." "Explain photosynthesis"   # also writes out.wav
//! ```

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use koe::prelude::*;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Koe - one-shot Gemini text generation and speech synthesis
#[derive(Parser)]
#[command(name = "koe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate text for a prompt, steered by a system instruction
    Ask(InstructedArgs),

    /// Generate text for a prompt without a system instruction
    Generate(PromptArgs),

    /// Generate text, print it, and synthesize it into out.wav
    Speak(InstructedArgs),
}

/// Arguments for commands taking an instruction and a prompt
#[derive(Args)]
struct InstructedArgs {
    /// System instruction steering the model
    instruction: Option<String>,

    /// Prompt text; when empty or missing nothing is sent
    prompt: Option<String>,
}

/// Arguments for commands taking only a prompt
#[derive(Args)]
struct PromptArgs {
    /// Prompt text; when empty or missing nothing is sent
    prompt: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli.command)) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with the given verbosity level.
///
/// Logs go to stderr so stdout carries only the generated text.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "koe_cli={level},koe={level},{}",
            if verbosity >= 2 { "info" } else { "error" }
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .init();
}

/// Main async entry point. Returns the text to print.
async fn run(command: Commands) -> Result<String> {
    match command {
        Commands::Ask(args) => cmd_ask(args.instruction.as_deref(), args.prompt.as_deref()).await,
        Commands::Generate(args) => cmd_ask(None, args.prompt.as_deref()).await,
        Commands::Speak(args) => {
            cmd_speak(args.instruction.as_deref(), args.prompt.as_deref()).await
        }
    }
}

/// Generate text.
async fn cmd_ask(instruction: Option<&str>, prompt: Option<&str>) -> Result<String> {
    let prompt = prompt.unwrap_or_default();
    if prompt.is_empty() {
        return Ok(String::new());
    }

    let gemini = Gemini::from_env()?;
    ask(&gemini, instruction, prompt).await
}

/// Generate text and write its spoken form to [`OUTPUT_FILE`].
async fn cmd_speak(instruction: Option<&str>, prompt: Option<&str>) -> Result<String> {
    let prompt = prompt.unwrap_or_default();
    if prompt.is_empty() {
        return Ok(String::new());
    }

    let gemini = Gemini::from_env()?;
    let Some(speech) = speak(&gemini, instruction, prompt).await? else {
        return Ok(String::new());
    };

    write_wav(OUTPUT_FILE, WavSpec::GEMINI_TTS, &speech.audio.data)?;
    tracing::info!(
        path = OUTPUT_FILE,
        bytes = speech.audio.data.len(),
        "saved speech"
    );

    Ok(speech.text)
}
