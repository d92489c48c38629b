//! Drying of a 2 cm slab (half-thickness 1 cm)
//!
//! M0 = 0.4, M_eq = 0.05, D = 1e-10 m²/s, h = 1e-7 m/s (Bi = 10)
//!
//! Runs the reference simulation, reports the drying curve at a few
//! instants, the moisture at three depths, the tail regression and the
//! diffusivity recovered from it. Then sweeps the mass-transfer
//! coefficient.
//!
//! ```bash
//! RUST_LOG=debug cargo run --example drying_curve
//! ```

use drying_rs::prelude::*;
use drying_rs::sweep::run_sweep_with;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // ====== Reference run ======

    let config = SimulationConfig::new(0.4, 0.05, 1e-10, 0.01, 21, 500, 1e-7)?;
    let mut model = DryingModel::new(config, SolverOptions::default())?;
    model.simulate()?;

    let curve = model.drying_curve()?;
    let hours = curve.time_hours();
    let average = curve.average_moisture();
    let ratio = curve.moisture_ratio();

    for n in (0..hours.len()).step_by(50) {
        log::info!(
            "t = {:8.1} h   M_av = {:.4}   MR = {:.4}",
            hours[n],
            average[n],
            ratio[n]
        );
    }

    // ====== Point cuts ======

    let fractions = [0.0, 0.5, 1.0];
    let cuts = model.cuts(&fractions)?;
    let sample = 40;
    for (fraction, cut) in fractions.iter().zip(&cuts) {
        log::info!("x = {fraction:.1} L: M(t = {:.1} h) = {:.4}", hours[sample], cut[sample]);
    }

    // ====== Validation ======

    let validation = model.validate_model()?;
    log::info!(
        "ln MR tail: slope = {:.4e} 1/s, intercept = {:.4}, r² = {:.6} ({} points)",
        validation.slope(),
        validation.intercept(),
        validation.r_squared(),
        validation.fit().n
    );
    log::info!(
        "effective diffusivity: {:.4e} m²/s (input {:.4e})",
        model.effective_diffusivity()?,
        config.diffusivity()
    );

    // ====== Mass-transfer sweep ======

    let configs = [2e-8, 1e-7, 5e-7, 2.5e-6]
        .iter()
        .map(|&h| config.with_mass_transfer(h))
        .collect::<DryingResult<Vec<_>>>()?;

    let slopes = run_sweep_with(&configs, SolverOptions::default(), |simulation| {
        analyze(&simulation).map(|analysis| analysis.validation.slope())
    });

    for (config, slope) in configs.iter().zip(slopes) {
        match slope {
            Ok(slope) => log::info!("Bi = {:7.3}: tail slope {slope:.4e} 1/s", config.biot_number()),
            Err(error) => log::warn!("Bi = {:7.3}: {error}", config.biot_number()),
        }
    }

    Ok(())
}
