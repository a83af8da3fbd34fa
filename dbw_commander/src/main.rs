//! # DBW Joystick Commander
//!
//! Arbitrates game-controller input into safety-governed actuation
//! commands on the vehicle command bus. This binary wires the commander
//! core to the in-process simulation backends and drives it at the
//! configured tick cadence; real device and transport integrations plug
//! in through the same `InputDevice` / `CommandBus` seams.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use dbw_commander::commander::Commander;
use dbw_commander::config::{CommanderConfig, load_config};
use dbw_commander::sim::{SimBus, SimInputDevice};

/// DBW Joystick Commander — safety-governed control arbitration
#[derive(Parser, Debug)]
#[command(name = "dbw_commander")]
#[command(version)]
#[command(about = "Joystick command arbiter for a drive-by-wire retrofit kit")]
struct Args {
    /// Path to the commander configuration TOML.
    #[arg(default_value = "config/commander.toml")]
    config: PathBuf,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("DBW Commander v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("DBW Commander shutdown complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = if args.config.exists() {
        load_config(&args.config)?
    } else {
        warn!(
            "config {} not found, using built-in defaults",
            args.config.display()
        );
        CommanderConfig::default()
    };
    info!(
        "Config OK: tick_interval={}ms, bus_channel={}",
        config.session.tick_interval_ms, config.session.bus_channel,
    );

    let tick_interval = Duration::from_millis(config.session.tick_interval_ms);

    let (device, _device_handle) = SimInputDevice::new();
    let (bus, _bus_handle) = SimBus::new();
    let mut commander = Commander::new(device, bus, config);

    commander.init()?;

    // Graceful shutdown on SIGINT.
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    info!("entering control loop");
    let mut ticks: u64 = 0;
    let mut tick_errors: u64 = 0;

    while running.load(Ordering::SeqCst) {
        let tick_start = Instant::now();

        if let Err(e) = commander.tick() {
            // Recoverable by design: report and retry next period.
            tick_errors += 1;
            warn!("tick failed: {e}");
        }
        ticks += 1;

        if let Some(remaining) = tick_interval.checked_sub(tick_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    let telemetry = commander.telemetry().snapshot();
    info!(
        ticks,
        tick_errors,
        steering_wheel_angle = telemetry.steering_wheel_angle,
        brake_pressure = telemetry.brake_pressure,
        "control loop exited"
    );

    commander.close();
    Ok(())
}

fn setup_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if args.verbose { "debug" } else { "info" })
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if args.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
