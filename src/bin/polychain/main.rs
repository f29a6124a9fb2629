//! polychain - polyphonic synthesizer driven by text commands on stdin
//!
//! Run with: cargo run -- --voices 8
//!
//! Then type commands such as `note_on -n 60 -c 0`, `control_change -c 0
//! -n 74 -v 40` or `exit`.

mod input;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use tracing::Level;

use polychain::{graph::Chain, io::CpalSink, Engine, SynthConfig};

#[derive(Parser)]
#[command(name = "polychain")]
#[command(about = "Polyphonic synthesizer controlled by text commands on stdin", long_about = None)]
struct Cli {
    /// Output sample rate in Hz
    #[arg(short, long, default_value_t = polychain::DEFAULT_SAMPLE_RATE)]
    sample_rate: u32,

    /// Samples rendered per chunk
    #[arg(short, long, default_value_t = polychain::DEFAULT_FRAMES_PER_CHUNK)]
    frames_per_chunk: usize,

    /// Polyphony limit
    #[arg(short, long, default_value_t = 4)]
    voices: usize,

    /// Most verbose level that is logged (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = SynthConfig {
        sample_rate: cli.sample_rate,
        frames_per_chunk: cli.frames_per_chunk,
        num_voices: cli.voices,
        ..SynthConfig::default()
    };

    let prototype = Chain::default_patch(config.sample_rate_hz(), config.frames_per_chunk)
        .wrap_err("failed to build the voice patch")?;
    let engine = Engine::new(config, &prototype, CpalSink::new(config.sample_rate))
        .wrap_err("invalid engine configuration")?;

    let commands = input::spawn_stdin_reader().wrap_err("failed to start the stdin reader")?;

    // The reader thread stays blocked on stdin after an exit; it ends with
    // the process.
    engine.run(commands).wrap_err("engine stopped with an error")?;
    Ok(())
}
