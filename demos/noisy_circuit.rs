//! Example: the same GHZ circuit with and without noise.
//! Shows how attenuation and depolarizing noise drain probability mass and
//! how strict mode on the simulator reports it.

use qsim::{CircuitBuilder, Gate, NoiseModel, QsimError, Simulator, SimulatorConfig, StateVector, validation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn ghz(builder: CircuitBuilder) -> Result<CircuitBuilder, QsimError> {
    Ok(builder
        .add_gate(Gate::Hadamard { target: 0 })
        .add_gate(Gate::cnot(0, 1)?)
        .add_gate(Gate::cnot(1, 2)?))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "qsim=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("--- qsim Example: GHZ State With Noise ---");

    let clean = ghz(CircuitBuilder::new(3))?.build()?;
    let noisy = ghz(CircuitBuilder::new(3))?
        .add_noise_model(NoiseModel::attenuation(0.05)?)
        .add_noise_model(NoiseModel::depolarizing(0.1)?)
        .build()?;

    let mut simulator = Simulator::with_config(SimulatorConfig {
        seed: Some(7),
        check_normalization: true,
        ..Default::default()
    });

    let mut state = StateVector::zero(3)?;
    simulator.execute(&clean, &mut state)?;
    println!("\nClean circuit:\n{}", clean);
    println!("Clean state:\n{}", state);

    let mut state = StateVector::zero(3)?;
    simulator.execute(&noisy, &mut state)?;
    println!("Noisy circuit:\n{}", noisy);
    println!("Noisy state:\n{}", state);
    println!("Total probability after noise: {:.4}", validation::total_probability(&state));

    match state.normalize() {
        Ok(()) => println!("Renormalized state:\n{}", state),
        Err(e) => println!("Noise removed every amplitude: {}", e),
    }
    Ok(())
}
