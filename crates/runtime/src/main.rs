#![deny(clippy::all, clippy::pedantic)]
//! # Sprocket Runtime
//!
//! Headless driver for the gear-pin collision pipeline. Spins a gear with
//! part of a track chain wrapped around it, runs the collision pass every
//! step, and feeds the contacts through a stand-in penalty solver so the
//! warm-start cache is exercised end to end.

mod scenario;
mod solver;

use anyhow::Result;
use clap::Parser;
use sprocket::{CollisionConfig, GearPinCollision, GearPinGeometry};
use tracing_subscriber::EnvFilter;

use crate::scenario::TrackScene;
use crate::solver::PenaltySolver;

#[derive(Parser, Debug)]
#[command(about = "Run the gear-pin collision pipeline on a kinematic track scene")]
struct Args {
    /// Number of simulation steps
    #[arg(long, default_value_t = 200)]
    steps: usize,
    /// Step size in seconds
    #[arg(long, default_value_t = 0.001)]
    dt: f64,
    /// Gear angular velocity in rad/s
    #[arg(long, default_value_t = 2.0)]
    omega: f64,
    /// Total number of track shoes
    #[arg(long, default_value_t = 60)]
    shoes: usize,
    /// Shoes seated on the gear
    #[arg(long, default_value_t = 5)]
    wrapped: usize,
    /// How far each seated pin sinks into its seat, in meters
    #[arg(long, default_value_t = 0.001)]
    penetration: f64,
    /// Persistent contact cache capacity
    #[arg(long, default_value_t = 1000)]
    cache_capacity: usize,
    /// Penalty stiffness of the stand-in solver, N/m
    #[arg(long, default_value_t = 1.0e6)]
    stiffness: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    tracing::info!("Initializing gear-pin collision...");
    let geometry = GearPinGeometry::default();
    let mut scene = TrackScene::new(
        geometry.clone(),
        args.shoes,
        args.wrapped,
        args.penetration,
        args.omega,
    );
    let config = CollisionConfig {
        cache_capacity: args.cache_capacity,
        ..CollisionConfig::default()
    };
    let mut collision = GearPinCollision::new(scene.gear(), scene.shoes(), geometry, config)?;
    let mut solver = PenaltySolver::new(args.stiffness, 0.5);

    tracing::info!(
        "Starting simulation loop for {} steps with dt = {}...",
        args.steps,
        args.dt
    );
    #[allow(clippy::cast_precision_loss)]
    for i in 0..args.steps {
        scene.set_time(i as f64 * args.dt);
        let report = collision.perform_collision(scene.bodies(), &mut solver);
        let peak_force = solver.solve(&mut collision);

        if (i + 1) % 50 == 0 {
            tracing::info!(
                "Simulation step {} complete. Contacts: {}, engaged shoes: {}, \
                 peak normal force: {:.1} N",
                i + 1,
                report.contacts,
                report.engaged_shoes,
                peak_force
            );
        }
    }

    tracing::info!("Simulation loop finished after {} steps.", args.steps);
    tracing::info!(
        "Total contacts: {}, cached shoes: {}, first shoe seated for {} steps",
        collision.total_contacts(),
        collision.cache().len(),
        if collision.shoes().is_empty() {
            0
        } else {
            collision.persistent_contact_steps(0)
        }
    );

    Ok(())
}
