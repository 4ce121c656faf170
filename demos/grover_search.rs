//! Example: Grover's search over 3 qubits (8 states), looking for |101>.
//! Builds the Hadamard layer and the oracle + diffusion iterations step by
//! step, prints the amplitudes, then samples the result.

use qsim::{GroverOracle, GroverSearch, Simulator, StateVector};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "qsim=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("--- qsim Example: Grover's Search (3 qubits - Find |101>) ---");
    let marked = 0b101;

    let mut search = GroverSearch::new(3, GroverOracle::mark_one(marked))?;
    search.initialize()?;

    // Optimal iterations for N=8 states is floor((π/4)√8) = 2.
    let iterations = search.optimal_iterations();
    for _ in 0..iterations {
        search.add_grover_iteration()?;
    }
    println!("\nGrover circuit ({} iteration(s)):\n{}", iterations, search.circuit());

    let mut state = StateVector::zero(3)?;
    search.execute(&mut state)?;
    println!("Final state:\n{}", state);

    let mut simulator = Simulator::with_seed(42);
    let result = simulator.run(search.circuit(), &StateVector::zero(3)?, 1_000)?;
    println!("{}", result);

    println!("Analysis:");
    println!("- Marked state |{:03b}> has probability {:.4}", marked, state.probability(marked)?);
    if let Some((index, count)) = result.most_frequent() {
        println!("- Most frequent outcome |{:03b}> ({} of {} shots)", index, count, result.shots());
    }
    Ok(())
}
