//! Scripted drive through the default arena, printing the proximity ring
//!
//! Test sequence:
//! 1. Drive forward until the front sensors light up
//! 2. Rotate in place for two seconds
//! 3. Stop
//!
//! ```sh
//! RUST_LOG=debug cargo run -p chakra-sim --example drive_demo
//! ```

use chakra_sim::{SimulationConfig, Simulator, StepResult, Wheel};

const TIME_STEP: f32 = 0.064;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("=== ChakraSim drive demo ===");
    let mut sim = Simulator::new(SimulationConfig::default())?;

    // === 1. Forward until something is close ahead ===
    log::info!("1. Driving forward...");
    sim.set_wheel_velocity(Wheel::Left, 3.0);
    sim.set_wheel_velocity(Wheel::Right, 3.0);
    while sim.step(TIME_STEP) == StepResult::Continue {
        let front = sim.proximity_value(0).max(sim.proximity_value(7));
        if front > 80.0 {
            let (x, y, theta) = sim.pose();
            log::info!(
                "   obstacle ahead at t={:.2}s, pose ({:.3}, {:.3}, {:.0}°)",
                sim.time(),
                x,
                y,
                theta.to_degrees()
            );
            break;
        }
    }

    // === 2. Rotate in place ===
    log::info!("2. Rotating...");
    sim.set_wheel_velocity(Wheel::Left, 2.0);
    sim.set_wheel_velocity(Wheel::Right, -2.0);
    let stop_at = sim.time() + 2.0;
    while sim.time() < stop_at && sim.step(TIME_STEP) == StepResult::Continue {
        let ring: Vec<String> = (0..8)
            .map(|i| format!("{:6.1}", sim.proximity_value(i)))
            .collect();
        log::debug!("   [{}]", ring.join(" "));
    }

    // === 3. Stop ===
    sim.set_wheel_velocity(Wheel::Left, 0.0);
    sim.set_wheel_velocity(Wheel::Right, 0.0);
    let (x, y, theta) = sim.pose();
    log::info!(
        "3. Stopped at ({:.3}, {:.3}, {:.0}°) after {:.2}s, {} contact steps",
        x,
        y,
        theta.to_degrees(),
        sim.time(),
        sim.contact_steps()
    );

    Ok(())
}
