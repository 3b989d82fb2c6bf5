#[macro_use(debug, info, warn)]
extern crate tracing;

pub mod automaton;
pub mod dfa;
pub mod loader;
pub mod minimize;
pub mod nfa;
pub mod pipeline;
pub mod state;
pub mod transitions;

pub mod c_interface;
#[cfg(feature = "python")]
pub mod python_interface;

#[cfg(test)]
mod testing;
