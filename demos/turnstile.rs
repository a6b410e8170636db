//! Turnstile
//!
//! This example builds a coin-operated turnstile with the fluent builder and
//! reads every step together with its transition error.
//!
//! Key concepts:
//! - `state_enum!` for named states
//! - `event_table` for table-driven transitions
//! - `run_detailed` for per-event errors
//! - Halting on a final state
//!
//! Run with: cargo run --example turnstile

use lockstep::builder::{event_table, self_loop, StateMachineBuilder};
use lockstep::core::Event;
use lockstep::state_enum;
use lockstep::RunConfig;
use tokio::sync::mpsc;

state_enum! {
    enum Turnstile {
        Locked,
        Unlocked,
        Jammed,
        Retired,
    }
    final: [Retired]
    error: [Jammed]
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "lockstep=debug".to_string()))
        .init();

    println!("=== Turnstile ===\n");

    let built = StateMachineBuilder::new()
        .initial(Turnstile::Locked)
        .states([Turnstile::Locked, Turnstile::Unlocked, Turnstile::Jammed])
        .final_state(Turnstile::Retired)
        .transition(
            Turnstile::Locked,
            event_table(
                [("coin", Turnstile::Unlocked), ("push", Turnstile::Locked), ("retire", Turnstile::Retired)],
                Turnstile::Jammed,
            ),
        )
        .transition(
            Turnstile::Unlocked,
            event_table(
                [("coin", Turnstile::Unlocked), ("push", Turnstile::Locked)],
                Turnstile::Jammed,
            ),
        )
        .transition(
            Turnstile::Jammed,
            event_table([("repair", Turnstile::Locked)], Turnstile::Jammed),
        )
        .transition(Turnstile::Retired, self_loop(Turnstile::Retired))
        .config(RunConfig::default().halt_on_final(true))
        .build();

    let mut machine = match built {
        Ok(machine) => machine,
        Err(error) => {
            eprintln!("invalid turnstile: {error}");
            return;
        }
    };

    let (events, rx) = mpsc::channel(1);
    let mut steps = match machine.run_detailed(rx) {
        Ok(steps) => steps,
        Err(error) => {
            eprintln!("cannot run: {error}");
            return;
        }
    };

    for event in ["coin", "push", "kick", "push", "repair", "coin", "push", "retire", "coin"] {
        if events.send(Event(event)).await.is_err() {
            println!("{event:>8} -> (turnstile no longer listening)");
            break;
        }
        let Some(step) = steps.recv().await else {
            println!("{event:>8} -> (turnstile stopped)");
            break;
        };
        match step.error {
            None => println!("{event:>8} -> {:?}", step.state),
            Some(error) => println!("{event:>8} -> {:?} ({error})", step.state),
        }
    }
    drop(events);

    println!("\nRun ended: {:?}", machine.wait().await);
    println!("\n=== Example Complete ===");
}
