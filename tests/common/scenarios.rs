//! Configurations shared by the integration tests

use drying_rs::physics::SimulationConfig;

/// Reference slab: M0=0.4, M_eq=0.05, D=1e-10 m²/s, L=1 cm, 21 points,
/// 500 steps, h=1e-7 m/s (Bi = 10)
///
/// 21 points is the coarsest grid on which this slab's average decays
/// without ringing at alpha = 10.
pub fn reference_config() -> SimulationConfig {
    SimulationConfig::new(0.4, 0.05, 1e-10, 0.01, 21, 500, 1e-7).unwrap()
}

/// Thinner, faster-diffusing slab on a finer grid (Bi = 0.125)
///
/// Monotone decay here relies on the 31-point grid.
pub fn fine_config() -> SimulationConfig {
    SimulationConfig::new(0.6, 0.1, 2e-9, 0.005, 31, 300, 5e-8).unwrap()
}

/// Starts at equilibrium with a sealed surface
pub fn equilibrium_config() -> SimulationConfig {
    SimulationConfig::new(0.05, 0.05, 1e-10, 0.01, 21, 200, 0.0).unwrap()
}

/// Above equilibrium but with a sealed surface (h = 0)
pub fn sealed_config() -> SimulationConfig {
    SimulationConfig::new(0.4, 0.05, 1e-10, 0.01, 21, 200, 0.0).unwrap()
}
