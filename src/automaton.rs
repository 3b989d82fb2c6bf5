use std::collections::BTreeSet;

use crate::dfa::Dfa;
use crate::nfa::Nfa;
use crate::state::Label;
use crate::state::State;
use crate::state::Symbol;

/// An automaton of either kind.
#[derive(Debug, Clone)]
pub enum Automaton {
	Nfa(Nfa),
	Dfa(Dfa),
}

/// Construction-time validation failures.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AutomatonError {
	EmptyStateSet,
	EpsilonInAlphabet,
	UnknownStartState(State),
	UnknownFinalState(State),
	UnknownOrigin(State),
	UnknownSymbol {
		origin: State,
		symbol: Symbol,
	},
	UnknownDestination {
		origin: State,
		label: Label,
		destination: State,
	},
	/// A DFA must have exactly one transition per `(state, symbol)`.
	MissingTransition {
		state: State,
		symbol: Symbol,
	},
}

impl Automaton {
	pub fn is_deterministic(&self) -> bool {
		matches!(self, Self::Dfa(_))
	}

	pub fn states(&self) -> &BTreeSet<State> {
		match self {
			Self::Nfa(nfa) => nfa.states(),
			Self::Dfa(dfa) => dfa.states(),
		}
	}

	pub fn alphabet(&self) -> &BTreeSet<Symbol> {
		match self {
			Self::Nfa(nfa) => nfa.alphabet(),
			Self::Dfa(dfa) => dfa.alphabet(),
		}
	}

	pub fn start(&self) -> &State {
		match self {
			Self::Nfa(nfa) => nfa.start(),
			Self::Dfa(dfa) => dfa.start(),
		}
	}

	pub fn finals(&self) -> &BTreeSet<State> {
		match self {
			Self::Nfa(nfa) => nfa.finals(),
			Self::Dfa(dfa) => dfa.finals(),
		}
	}

	/// Runs the whole conversion pipeline; see [`crate::pipeline::minimal_dfa`].
	pub fn minimize(&self) -> Dfa {
		crate::pipeline::minimal_dfa(self)
	}
}

impl From<Nfa> for Automaton {
	fn from(nfa: Nfa) -> Self {
		Self::Nfa(nfa)
	}
}

impl From<Dfa> for Automaton {
	fn from(dfa: Dfa) -> Self {
		Self::Dfa(dfa)
	}
}

impl std::fmt::Display for Automaton {
	fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Nfa(nfa) => std::fmt::Display::fmt(nfa, fmt),
			Self::Dfa(dfa) => std::fmt::Display::fmt(dfa, fmt),
		}
	}
}

impl std::fmt::Display for AutomatonError {
	fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::EmptyStateSet => fmt.write_str("the state set is empty"),
			Self::EpsilonInAlphabet => write!(
				fmt,
				"the alphabet contains the reserved epsilon marker '{}'",
				crate::state::EPSILON_MARKER
			),
			Self::UnknownStartState(state) => write!(fmt, "start state '{state}' is not a state"),
			Self::UnknownFinalState(state) => write!(fmt, "accepting state '{state}' is not a state"),
			Self::UnknownOrigin(state) => write!(fmt, "transition origin '{state}' is not a state"),
			Self::UnknownSymbol { origin, symbol } => {
				write!(fmt, "symbol '{symbol}' on a transition from '{origin}' is not in the alphabet")
			},
			Self::UnknownDestination {
				origin,
				label,
				destination,
			} => write!(fmt, "destination '{destination}' of δ({origin}, {label}) is not a state"),
			Self::MissingTransition { state, symbol } => {
				write!(fmt, "transition function is incomplete: no δ({state}, {symbol})")
			},
		}
	}
}

impl std::error::Error for AutomatonError {}

/// The checks both automaton kinds share: `Q` non-empty, `Σ` free of the
/// epsilon marker, `q0 ∈ Q` and `F ⊆ Q`.
pub(crate) fn validate_common(
	states: &BTreeSet<State>,
	alphabet: &BTreeSet<Symbol>,
	start: &State,
	finals: &BTreeSet<State>,
) -> Result<(), AutomatonError> {
	if states.is_empty() {
		return Err(AutomatonError::EmptyStateSet);
	}
	if alphabet.iter().any(Symbol::is_epsilon_marker) {
		return Err(AutomatonError::EpsilonInAlphabet);
	}
	if !states.contains(start) {
		return Err(AutomatonError::UnknownStartState(start.clone()));
	}
	if let Some(state) = finals.iter().find(|state| !states.contains(*state)) {
		return Err(AutomatonError::UnknownFinalState(state.clone()));
	}
	Ok(())
}

#[cfg(test)]
mod test {
	use super::*;

	fn set<T: From<&'static str> + Ord>(items: &[&'static str]) -> BTreeSet<T> {
		items.iter().map(|&item| T::from(item)).collect::<BTreeSet<_>>()
	}

	#[test]
	fn common_checks() {
		let states: BTreeSet<State> = set(&["a", "b"]);
		let alphabet: BTreeSet<Symbol> = set(&["0"]);
		assert_eq!(validate_common(&states, &alphabet, &"a".into(), &set(&["b"])), Ok(()));
		assert_eq!(
			validate_common(&BTreeSet::new(), &alphabet, &"a".into(), &BTreeSet::new()),
			Err(AutomatonError::EmptyStateSet)
		);
		assert_eq!(
			validate_common(&states, &set(&["0", "&"]), &"a".into(), &BTreeSet::new()),
			Err(AutomatonError::EpsilonInAlphabet)
		);
		assert_eq!(
			validate_common(&states, &alphabet, &"c".into(), &BTreeSet::new()),
			Err(AutomatonError::UnknownStartState("c".into()))
		);
		assert_eq!(
			validate_common(&states, &alphabet, &"a".into(), &set(&["b", "z"])),
			Err(AutomatonError::UnknownFinalState("z".into()))
		);
	}

	#[test]
	fn messages() {
		let err: AutomatonError = AutomatonError::MissingTransition {
			state: "a".into(),
			symbol: "1".into(),
		};
		assert_eq!(err.to_string(), "transition function is incomplete: no δ(a, 1)");
	}
}
