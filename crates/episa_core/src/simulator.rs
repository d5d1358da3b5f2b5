//! Simulation settings and the simulator capability interface.
//!
//! The numerical integration itself lives in the simulator implementations;
//! this module only carries their configuration and selects one by tag.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SimulatorError;

/// Seed of the integration noise when none is given
pub const NOISE_SEED: u64 = 42;

/// Available simulator implementations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulatorKind {
    #[default]
    Tvb,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub simulator: SimulatorKind,
    pub integration_step: f64,
    pub simulated_period: f64,
    pub scale_time: f64,
    pub integrator_type: String,
    pub noise_preconfig: Option<String>,
    pub noise_type: String,
    pub noise_ntau: f64,
    pub noise_seed: u64,
    pub noise_intensity: f64,
    pub monitors_preconfig: Option<String>,
    pub monitor_type: String,
    pub monitor_sampling_period: f64,
    pub monitor_expressions: Vec<String>,
    pub variables_names: Vec<String>,
    pub initial_conditions: Vec<f64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            simulator: SimulatorKind::default(),
            integration_step: 0.01220703125,
            simulated_period: 5000.0,
            scale_time: 1.0,
            integrator_type: String::new(),
            noise_preconfig: None,
            noise_type: String::new(),
            noise_ntau: 0.0,
            noise_seed: NOISE_SEED,
            noise_intensity: 1e-6,
            monitors_preconfig: None,
            monitor_type: String::new(),
            monitor_sampling_period: 0.9765625,
            monitor_expressions: Vec::new(),
            variables_names: Vec::new(),
            initial_conditions: Vec::new(),
        }
    }
}

impl fmt::Display for SimulationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opt = |value: &Option<String>| value.clone().unwrap_or_else(|| "None".to_string());
        writeln!(f, "SimulationSettings {{")?;
        writeln!(f, "  01. integration_step: {}", self.integration_step)?;
        writeln!(f, "  02. simulated_period: {}", self.simulated_period)?;
        writeln!(f, "  03. scale_time: {}", self.scale_time)?;
        writeln!(f, "  04. integrator_type: {}", self.integrator_type)?;
        writeln!(f, "  05. noise_preconfig: {}", opt(&self.noise_preconfig))?;
        writeln!(f, "  06. noise_type: {}", self.noise_type)?;
        writeln!(f, "  07. noise_ntau: {}", self.noise_ntau)?;
        writeln!(f, "  08. noise_seed: {}", self.noise_seed)?;
        writeln!(f, "  09. noise_intensity: {}", self.noise_intensity)?;
        writeln!(f, "  10. monitors_preconfig: {}", opt(&self.monitors_preconfig))?;
        writeln!(f, "  11. monitor_type: {}", self.monitor_type)?;
        writeln!(f, "  12. monitor_sampling_period: {}", self.monitor_sampling_period)?;
        writeln!(f, "  13. monitor_expressions: {:?}", self.monitor_expressions)?;
        writeln!(f, "  14. variables_names: {:?}", self.variables_names)?;
        writeln!(f, "  15. initial_conditions: {:?}", self.initial_conditions)?;
        writeln!(f, "  16. simulator: {:?}", self.simulator)?;
        write!(f, "}}")
    }
}

/// A simulation engine. Implementations decide what a hypothesis, a head
/// model and a simulation result are.
pub trait Simulator {
    type Hypothesis;
    type Head;
    type Output;

    /// Run one simulation of `hypothesis` on `head`
    fn launch_simulation(
        &self,
        hypothesis: &Self::Hypothesis,
        head: &Self::Head,
    ) -> Result<Self::Output, SimulatorError>;

    /// Run a parameter search exploration around `hypothesis`
    fn launch_pse(
        &self,
        hypothesis: &Self::Hypothesis,
        head: &Self::Head,
    ) -> Result<Vec<Self::Output>, SimulatorError>;
}

/// Object-safe simulator over fixed hypothesis, head and output types
pub type DynSimulator<H, G, O> = dyn Simulator<Hypothesis = H, Head = G, Output = O> + Send + Sync;

/// Simulator implementations by tag
pub struct SimulatorRegistry<H, G, O> {
    simulators: HashMap<SimulatorKind, Box<DynSimulator<H, G, O>>>,
}

impl<H, G, O> Default for SimulatorRegistry<H, G, O> {
    fn default() -> Self {
        Self {
            simulators: HashMap::new(),
        }
    }
}

impl<H, G, O> SimulatorRegistry<H, G, O> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `simulator` under `kind`, returning any implementation it replaces
    pub fn register(
        &mut self,
        kind: SimulatorKind,
        simulator: Box<DynSimulator<H, G, O>>,
    ) -> Option<Box<DynSimulator<H, G, O>>> {
        tracing::debug!(?kind, "registering simulator");
        self.simulators.insert(kind, simulator)
    }

    pub fn get(&self, kind: SimulatorKind) -> Result<&DynSimulator<H, G, O>, SimulatorError> {
        self.simulators
            .get(&kind)
            .map(|simulator| &**simulator)
            .ok_or(SimulatorError::NotRegistered(kind))
    }

    /// The implementation the settings ask for
    pub fn select(
        &self,
        settings: &SimulationSettings,
    ) -> Result<&DynSimulator<H, G, O>, SimulatorError> {
        self.get(settings.simulator)
    }

    #[must_use]
    pub fn contains(&self, kind: SimulatorKind) -> bool {
        self.simulators.contains_key(&kind)
    }
}

impl<H, G, O> fmt::Debug for SimulatorRegistry<H, G, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatorRegistry")
            .field("kinds", &self.simulators.keys().collect::<Vec<_>>())
            .finish()
    }
}
