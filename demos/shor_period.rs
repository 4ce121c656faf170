//! Example: Shor period finding for N = 15.
//! Runs the quantum skeleton with a fresh random base until the classical
//! reduction yields a non-trivial factor pair.

use qsim::{ShorsAlgorithm, factors_from_period, find_period};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const NUMBER_TO_FACTOR: u64 = 15;
const MAX_ATTEMPTS: usize = 50;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "qsim=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("--- qsim Example: Shor Period Finding (N = {}) ---", NUMBER_TO_FACTOR);

    // Worked example: 2 has order 4 modulo 15, so with 4 qubits the phase
    // peaks sit at multiples of 16/4.
    for measured in [4, 8, 12] {
        println!("find_period({}, 4) = {}", measured, find_period(measured, 4)?);
    }

    let mut rng = StdRng::seed_from_u64(2024);
    let mut shor = ShorsAlgorithm::new(NUMBER_TO_FACTOR)?;
    println!("\nUsing {} qubits", shor.number_of_qubits());

    for attempt in 1..=MAX_ATTEMPTS {
        shor.initialize_with_rng(&mut rng)?;
        let period = shor.execute_with_rng(&mut rng)?;
        let Some(base) = shor.base() else { continue };
        println!("Attempt {}: base {} -> candidate period {}", attempt, base, period);

        if let Some((p, q)) = factors_from_period(NUMBER_TO_FACTOR, base, period) {
            println!("\nCircuit:\n{}", shor.circuit());
            println!("Success! {} = {} x {}", NUMBER_TO_FACTOR, p, q);
            return Ok(());
        }
    }
    println!("No factors found after {} attempts", MAX_ATTEMPTS);
    Ok(())
}
