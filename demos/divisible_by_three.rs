//! Divisible by Three
//!
//! This example feeds decimal digits into a three-state machine whose state
//! is the remainder, modulo 3, of the number read so far.
//!
//! Key concepts:
//! - Integer states with `StateId`
//! - One transition function per state
//! - Lock-step event/state exchange over channels
//! - Trace records emitted through `tracing`
//!
//! Run with: RUST_LOG=lockstep=info cargo run --example divisible_by_three

use lockstep::core::{Event, State, StateId};
use lockstep::engine::{StateMachine, TransitionResult};
use tokio::sync::mpsc;

const Q0: StateId = StateId::new(1);
const Q1: StateId = StateId::new(2);
const Q2: StateId = StateId::new(3);

fn digit(r: u32) -> impl Fn(&Event<char>) -> TransitionResult<StateId> + Send + Sync {
    move |event: &Event<char>| match event.payload().to_digit(10) {
        Some(d) => TransitionResult::to(StateId::new((r * 10 + d) % 3 + 1)),
        None => TransitionResult::unrecognized(StateId::ERROR, event),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "lockstep=info".to_string()))
        .init();

    println!("=== Divisible by Three ===\n");

    for input in ["243", "3715", "34", "12x"] {
        let mut machine: StateMachine<StateId, char> = StateMachine::new();
        for (r, state) in [Q0, Q1, Q2].into_iter().enumerate() {
            machine.add_state(state);
            machine.on(state, digit(r as u32));
        }
        machine.set_initial_state(Q0);
        machine.set_trace(true);

        let (events, rx) = mpsc::channel(1);
        let mut states = match machine.run(rx) {
            Ok(states) => states,
            Err(error) => {
                eprintln!("cannot run: {error}");
                return;
            }
        };

        let mut last = Q0;
        for c in input.chars() {
            if events.send(Event(c)).await.is_err() {
                break;
            }
            let Some(state) = states.recv().await else {
                break;
            };
            last = state;
            if let Some(error) = machine.last_error() {
                println!("  {input}: stopping at '{c}': {error}");
                break;
            }
        }
        drop(events);

        let verdict = if last == Q0 { "divisible" } else { "not divisible" };
        println!("{input:>6} -> {:<6} {verdict}", last.name());
    }

    println!("\n=== Example Complete ===");
}
