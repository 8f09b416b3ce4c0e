//! voicebatch main entry point
//!
//! Startup order:
//! 1. Load configuration (it names the license file and layout)
//! 2. Validate the license, exiting after a grace period on failure
//! 3. Run the selected command

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process;
use std::thread;
use voicebatch::batch::{read_records, BatchMessenger, MessageMode, OutputLayout};
use voicebatch::config::Config;
use voicebatch::license::{LicenseGate, LicenseFailure};
use voicebatch::message::GeminiGenerator;
use voicebatch::platform::SystemMachineId;
use voicebatch::speech::{create_synth, VoiceConfig};
use voicebatch::VoiceBatchError;

/// Exit status for configuration and startup failures
const EXIT_STARTUP: i32 = 1;

#[derive(Parser, Debug)]
#[command(name = "voicebatch", version, about = "Batch text-to-speech for contact lists")]
struct Cli {
    /// Configuration file (.json, .yaml or .yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write debug logs to voicebatch.log
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create one audio file per contact in the input list (default)
    Batch {
        /// Message source; defaults to the useAiTemplate setting
        #[arg(short, long, value_enum)]
        mode: Option<Mode>,

        /// Topic for AI-generated messages; prompted for when omitted
        #[arg(short, long)]
        topic: Option<String>,
    },
    /// Convert a single text to one audio file
    Speak {
        /// Text to speak; defaults to the `text` setting
        #[arg(short, long)]
        text: Option<String>,
    },
    /// Validate the license and exit
    CheckLicense,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Generated by the text provider
    Ai,
    /// Filled into manualMessage
    Human,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logger
    if cli.debug {
        // Debug mode: write to voicebatch.log file
        use std::fs::OpenOptions;
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open("voicebatch.log")
        {
            Ok(log_file) => {
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Debug)
                    .target(env_logger::Target::Pipe(Box::new(log_file)))
                    .init();
            }
            Err(e) => {
                eprintln!("Warning: Failed to open voicebatch.log for debug logging: {}", e);
                eprintln!("Continuing without file logging...");
                env_logger::Builder::new()
                    .filter_level(log::LevelFilter::Warn)
                    .init();
            }
        }

        info!(
            "voicebatch version {} starting (debug mode, logging to voicebatch.log)",
            voicebatch::VERSION
        );
    } else {
        // Normal mode: warnings and errors to stderr unless RUST_LOG says otherwise
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Warn)
            .parse_default_env()
            .init();
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Fatal error: {}", e);
            eprintln!("{}", e);
            process::exit(EXIT_STARTUP);
        }
    };

    match config.path() {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("No configuration file found, using defaults"),
    }

    if let Err(failure) = check_license(&config) {
        error!("License check failed: {}", failure.error);
        println!("{}", failure);
        let _ = io::stdout().flush();
        thread::sleep(failure.grace);
        process::exit(failure.exit_code);
    }

    let result = match cli.command.unwrap_or(Command::Batch {
        mode: None,
        topic: None,
    }) {
        Command::Batch { mode, topic } => run_batch(&config, mode, topic),
        Command::Speak { text } => run_speak(&config, text),
        Command::CheckLicense => Ok(()),
    };

    if let Err(e) = result {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(EXIT_STARTUP);
    }
}

/// Validate the license for this machine
fn check_license(config: &Config) -> Result<(), LicenseFailure> {
    let gate = LicenseGate::new(config.license.format, Box::new(SystemMachineId::new()));
    let record = gate.enforce(&config.license_path(), &config.support_contact)?;
    println!(
        "License valid. Valid from: {} to: {}",
        record.valid_from, record.valid_until
    );
    Ok(())
}

fn run_batch(config: &Config, mode: Option<Mode>, topic: Option<String>) -> anyhow::Result<()> {
    let use_ai = match mode {
        Some(mode) => mode == Mode::Ai,
        None => config.use_ai_template,
    };

    // Everything that would fail identically for every record is checked here
    let mode = if use_ai {
        let topic = match topic {
            Some(topic) => topic,
            None => prompt_line("Enter the topic for the short audio message: ")?,
        };
        let topic = topic.trim().to_string();
        if topic.is_empty() {
            bail!("Topic missing");
        }
        MessageMode::AiGenerated { topic }
    } else {
        MessageMode::TemplateFilled(config.manual_template()?)
    };

    let input_path = config.input_list_path()?;
    let records = read_records(&input_path)
        .with_context(|| format!("reading contact list {}", input_path.display()))?;

    let layout = OutputLayout::new(config.audio_dir(), config.text_dir());
    layout
        .prepare(mode.is_ai())
        .context("creating output directories")?;

    let mut synth = create_synth(&config.speech)?;
    let voice = VoiceConfig::from(&config.speech);

    let generator = if mode.is_ai() {
        Some(GeminiGenerator::new(
            config.api_key.expose(),
            &config.llm_model,
            &config.llm_base_url,
            config.llm_timeout(),
        )?)
    } else {
        None
    };

    let mut messenger =
        BatchMessenger::new(synth.as_mut(), voice, layout).with_delay(config.record_delay());
    if let Some(generator) = generator.as_ref() {
        messenger = messenger.with_generator(generator);
    }

    let report = messenger.run(&records, &mode);
    println!("\nDone. {}", report);
    if report.failures() > 0 {
        println!(
            "{} record(s) failed; see the messages above for details.",
            report.failures()
        );
    }
    Ok(())
}

fn run_speak(config: &Config, text: Option<String>) -> anyhow::Result<()> {
    let text = text
        .or_else(|| config.text.clone())
        .ok_or_else(|| VoiceBatchError::Config("text missing in configuration".to_string()))?;

    let mut synth = create_synth(&config.speech)?;
    let voice = VoiceConfig::from(&config.speech);

    println!("Generating audio... Please wait...");
    let path = voicebatch::speak::speak_to_file(synth.as_mut(), &voice, &text, &config.audio_dir())?;
    println!("Audio saved at: {}", path.display());
    Ok(())
}

/// Read one line from stdin, showing a prompt when interactive
fn prompt_line(prompt: &str) -> anyhow::Result<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        print!("{}", prompt);
        io::stdout().flush()?;
    }
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
