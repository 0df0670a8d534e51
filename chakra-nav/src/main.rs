//! ChakraNav - reactive obstacle avoidance on the chakra-sim robot
//!
//! Usage:
//!
//! ```text
//! chakra-nav [config.toml] [--seed <n>] [--duration <secs>]
//! chakra-nav --config <config.toml>
//! ```
//!
//! Without a path, `chakra.toml` in the working directory is used if present.

use chakra_nav::{ControlLoop, NavConfig, NavError, ReportSink, Result, SimPlatform};
use chakra_sim::Simulator;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

fn main() -> Result<()> {
    // Initialize logging; the simulator's `log` records come through too
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("chakra_nav=info,chakra_sim=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = std::env::args().collect();
    let mut config = load_config(&args)?;

    if let Some(seed) = arg_value(&args, "--seed") {
        config.simulation.random_seed = seed
            .parse()
            .map_err(|_| NavError::Config(format!("Invalid --seed value: {}", seed)))?;
        info!("Using random seed: {}", config.simulation.random_seed);
    }
    if let Some(duration) = arg_value(&args, "--duration") {
        config.simulation.duration_secs = duration
            .parse()
            .map_err(|_| NavError::Config(format!("Invalid --duration value: {}", duration)))?;
        info!("Using duration: {}s", config.simulation.duration_secs);
    }
    config.validate()?;

    info!("ChakraNav v{}", env!("CARGO_PKG_VERSION"));

    // Ctrl-C ends the run at the next cycle boundary
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        flag.store(true, Ordering::Relaxed);
    })
    .map_err(|e| NavError::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    let sim = Simulator::new(config.simulation.clone())?.with_shutdown_flag(shutdown);
    let mut control = ControlLoop::new(SimPlatform::new(sim), &config)?;
    control.run();

    let contact_steps = control.platform().simulator().contact_steps();
    if contact_steps > 0 {
        warn!("Body was in contact with obstacles for {} steps", contact_steps);
    }

    let metrics = control.finish();
    ReportSink::new(config.report.clone()).emit(&metrics);

    info!("ChakraNav finished");
    Ok(())
}

/// Resolve configuration from arguments, `chakra.toml`, or defaults.
fn load_config(args: &[String]) -> Result<NavConfig> {
    if args.len() > 1 && !args[1].starts_with('-') {
        let path = Path::new(&args[1]);
        info!("Loading configuration from {:?}", path);
        return NavConfig::load(path);
    }

    if let Some(path) = arg_value(args, "--config").or_else(|| arg_value(args, "-c")) {
        info!("Loading configuration from {}", path);
        return NavConfig::load(Path::new(path));
    }

    if Path::new("chakra.toml").exists() {
        info!("Loading configuration from chakra.toml");
        NavConfig::load(Path::new("chakra.toml"))
    } else {
        info!("Using default configuration");
        Ok(NavConfig::default())
    }
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}
