//! Terminal simulator for the lockpad combination lock.
//!
//! Keys are typed on stdin (`0`-`9`, `A`-`D`, `*`, `#`; anything else is
//! ignored), the 2x40 display is redrawn on stdout and the LED and buzzer
//! pins report through the log on stderr. Closing stdin disconnects the
//! keypad, which halts the lock.
//!
//! ```text
//! RUST_LOG=debug lockpad lock.json --leds 2
//! ```

mod keypad;
mod pin;
mod terminal;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use lockpad_firmware::{LockConfig, LockController, Peripherals};
use lockpad_hardware::GpioFeedback;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::keypad::StdinKeypad;
use crate::pin::TracingPin;
use crate::terminal::TerminalDisplay;

#[derive(Parser, Debug)]
#[command(author, version, about = "Keypad combination lock simulator")]
struct Cli {
    /// Optional JSON configuration file. Built-in defaults apply when omitted.
    config: Option<PathBuf>,

    /// Number of simulated LEDs in the feedback bank.
    #[arg(long, default_value_t = 4)]
    leds: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => LockConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => LockConfig::default(),
    };
    info!(
        "Starting simulator with {} LEDs, capacity {}",
        cli.leds, config.capacity
    );

    let leds = (0..cli.leds).map(TracingPin::led).collect();
    let feedback = GpioFeedback::new(leds, TracingPin::buzzer())
        .with_flash_period(config.timings.flash_period())?
        .with_buzz_half_period(config.timings.buzz_half_period())?;
    let (display, renderer) = TerminalDisplay::spawn();
    let io = Peripherals::new(StdinKeypad::stdin(), display, feedback);

    let outcome = async {
        let mut lock = LockController::boot(io, config).await?;
        info!(
            "Lock ready, {}/{} codes stored",
            lock.store().len(),
            lock.config().capacity
        );
        lock.run().await
    }
    .await;

    // The display sender is gone now; let the renderer draw the last frame.
    let _ = renderer.await;
    outcome.context("lock halted")
}
