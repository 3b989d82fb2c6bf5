use std::collections::BTreeSet;

use crate::automaton::AutomatonError;
use crate::automaton::validate_common;
use crate::state::Label;
use crate::state::State;
use crate::state::Symbol;
use crate::transitions::NfaTransitions;

/// A non-deterministic automaton, possibly with epsilon transitions.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Nfa {
	states: BTreeSet<State>,
	alphabet: BTreeSet<Symbol>,
	transitions: NfaTransitions,
	start: State,
	finals: BTreeSet<State>,
}

impl Nfa {
	pub fn new(
		states: BTreeSet<State>,
		alphabet: BTreeSet<Symbol>,
		transitions: NfaTransitions,
		start: State,
		finals: BTreeSet<State>,
	) -> Result<Self, AutomatonError> {
		let nfa: Self = Self {
			states,
			alphabet,
			transitions,
			start,
			finals,
		};
		nfa.validate()?;
		Ok(nfa)
	}

	fn validate(&self) -> Result<(), AutomatonError> {
		validate_common(&self.states, &self.alphabet, &self.start, &self.finals)?;

		for (origin, label, destinations) in self.transitions.iter() {
			if !self.states.contains(origin) {
				return Err(AutomatonError::UnknownOrigin(origin.clone()));
			}
			if let Label::Symbol(symbol) = label {
				if !self.alphabet.contains(symbol) {
					return Err(AutomatonError::UnknownSymbol {
						origin: origin.clone(),
						symbol: symbol.clone(),
					});
				}
			}
			if let Some(destination) = destinations.iter().find(|state| !self.states.contains(*state)) {
				return Err(AutomatonError::UnknownDestination {
					origin: origin.clone(),
					label: label.clone(),
					destination: destination.clone(),
				});
			}
		}

		Ok(())
	}

	pub fn states(&self) -> &BTreeSet<State> {
		&self.states
	}

	pub fn alphabet(&self) -> &BTreeSet<Symbol> {
		&self.alphabet
	}

	pub fn transitions(&self) -> &NfaTransitions {
		&self.transitions
	}

	pub fn start(&self) -> &State {
		&self.start
	}

	pub fn finals(&self) -> &BTreeSet<State> {
		&self.finals
	}

	pub fn has_epsilon_transitions(&self) -> bool {
		self.transitions.has_epsilon()
	}

	/// States reachable from `state` through zero or more epsilon transitions,
	/// `state` itself included.
	pub fn epsilon_closure(&self, state: &State) -> BTreeSet<State> {
		let mut closure: BTreeSet<State> = BTreeSet::from([state.clone()]);
		let mut stack: Vec<&State> = vec![state];

		while let Some(current) = stack.pop() {
			let Some(targets) = self.transitions.epsilon_targets(current) else {
				continue;
			};
			for target in targets.iter() {
				if closure.insert(target.clone()) {
					stack.push(target);
				}
			}
		}

		closure
	}

	/// Union of [`Self::epsilon_closure`] over every member of `states`.
	pub fn epsilon_closure_of_set<'a, I>(&self, states: I) -> BTreeSet<State>
	where
		I: IntoIterator<Item = &'a State>,
	{
		let mut closure: BTreeSet<State> = BTreeSet::new();
		for state in states {
			if closure.contains(state) {
				// Everything it reaches is already in.
				continue;
			}
			closure.append(&mut self.epsilon_closure(state));
		}
		closure
	}

	/// Rewrites the automaton so it has no epsilon transitions but accepts the same language.
	///
	/// `Q`, `Σ` and `q0` are kept; a state becomes accepting iff its closure reaches
	/// an accepting state, and `δ'(s, a) = closure(⋃ δ(t, a) for t ∈ closure(s))`.
	pub fn without_epsilon(&self) -> Nfa {
		let mut transitions: NfaTransitions = NfaTransitions::new();
		let mut finals: BTreeSet<State> = BTreeSet::new();

		for origin in self.states.iter() {
			let closure: BTreeSet<State> = self.epsilon_closure(origin);
			debug!("closure({origin}) = {closure:?}");

			if !closure.is_disjoint(&self.finals) {
				finals.insert(origin.clone());
			}

			for symbol in self.alphabet.iter() {
				let label: Label = Label::Symbol(symbol.clone());
				let moved: BTreeSet<&State> = closure
					.iter()
					.filter_map(|state| self.transitions.get(state, &label))
					.flatten()
					.collect::<BTreeSet<_>>();
				for destination in self.epsilon_closure_of_set(moved) {
					transitions.insert(origin.clone(), label.clone(), destination);
				}
			}
		}

		info!(
			"removed epsilon transitions; accepting states {} -> {}",
			self.finals.len(),
			finals.len()
		);

		Nfa {
			states: self.states.clone(),
			alphabet: self.alphabet.clone(),
			transitions,
			start: self.start.clone(),
			finals,
		}
	}
}

impl std::fmt::Display for Nfa {
	fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use crate::state::write_set;

		writeln!(fmt, "M = (Q, Σ, δ, q0, F)")?;
		fmt.write_str("Q = ")?;
		write_set(fmt, self.states.iter())?;
		fmt.write_str("\nΣ = ")?;
		write_set(fmt, self.alphabet.iter())?;
		writeln!(fmt, "\nq0 = {}", self.start)?;
		fmt.write_str("F = ")?;
		write_set(fmt, self.finals.iter())?;
		writeln!(fmt, "\nε = '{}'", crate::state::EPSILON_MARKER)?;
		writeln!(fmt, "δ =")?;
		write!(fmt, "{}", self.transitions)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::testing::nfa;
	use crate::testing::set;
	use crate::testing::words;

	/// `q0 -ε-> q1 -ε-> q2`, `q2 -a-> q3 (final)`, `q3 -ε-> q0`, `q4` isolated.
	fn chain() -> Nfa {
		nfa(
			&["q0", "q1", "q2", "q3", "q4"],
			&["a", "b"],
			&[
				("q0", "&", "q1"),
				("q1", "&", "q2"),
				("q2", "a", "q3"),
				("q3", "&", "q0"),
				("q4", "b", "q4"),
			],
			"q0",
			&["q3"],
		)
	}

	#[test]
	fn closure_is_reflexive() {
		let nfa: Nfa = chain();
		for state in nfa.states().iter() {
			assert!(nfa.epsilon_closure(state).contains(state));
		}
		assert_eq!(nfa.epsilon_closure(&"q4".into()), set(&["q4"]));
	}

	#[test]
	fn closure_follows_chains_and_cycles() {
		let nfa: Nfa = chain();
		assert_eq!(nfa.epsilon_closure(&"q0".into()), set(&["q0", "q1", "q2"]));
		assert_eq!(nfa.epsilon_closure(&"q3".into()), set(&["q0", "q1", "q2", "q3"]));
	}

	#[test]
	fn closure_of_set_is_idempotent() {
		let nfa: Nfa = chain();
		let seeds: Vec<BTreeSet<State>> = vec![set(&[]), set(&["q1"]), set(&["q3", "q4"]), set(&["q2", "q0"])];
		for seed in seeds.iter() {
			let once: BTreeSet<State> = nfa.epsilon_closure_of_set(seed);
			let twice: BTreeSet<State> = nfa.epsilon_closure_of_set(&once);
			assert_eq!(once, twice);
			assert!(seed.is_subset(&once));
		}
	}

	#[test]
	fn elimination_rewrites_finals_and_edges() {
		let nfa: Nfa = nfa(
			&["q0", "q1", "q2"],
			&["a"],
			&[("q0", "&", "q1"), ("q1", "a", "q2"), ("q2", "&", "q1")],
			"q0",
			&["q1"],
		);
		assert!(nfa.has_epsilon_transitions());

		let eliminated: Nfa = nfa.without_epsilon();
		assert!(!eliminated.has_epsilon_transitions());
		assert_eq!(eliminated.states(), nfa.states());
		assert_eq!(eliminated.alphabet(), nfa.alphabet());
		assert_eq!(eliminated.start(), nfa.start());
		assert_eq!(eliminated.finals(), &set(&["q0", "q1", "q2"]));

		let a: Label = Label::from_token("a");
		assert_eq!(eliminated.transitions().get(&"q0".into(), &a), Some(&set(&["q1", "q2"])));
		assert_eq!(eliminated.transitions().get(&"q2".into(), &a), Some(&set(&["q1", "q2"])));
	}

	#[test]
	fn elimination_preserves_language() {
		let nfa: Nfa = chain();
		let eliminated: Nfa = nfa.without_epsilon();
		for word in words(nfa.alphabet(), 6) {
			assert_eq!(nfa.accepts(&word), eliminated.accepts(&word), "word {word:?}");
		}
	}

	#[test]
	fn elimination_is_identity_without_epsilon() {
		let nfa: Nfa = nfa(
			&["p", "q"],
			&["a"],
			&[("p", "a", "p"), ("p", "a", "q")],
			"p",
			&["q"],
		);
		assert!(!nfa.has_epsilon_transitions());
		assert_eq!(nfa.without_epsilon(), nfa);
	}

	#[test]
	fn validation() {
		let states: BTreeSet<State> = set(&["p", "q"]);
		let alphabet: BTreeSet<Symbol> = ["a"].into_iter().map(Symbol::from).collect::<BTreeSet<_>>();

		let mut transitions: NfaTransitions = NfaTransitions::new();
		transitions.insert("p".into(), Label::from_token("b"), "q".into());
		assert_eq!(
			Nfa::new(states.clone(), alphabet.clone(), transitions, "p".into(), set(&[])).unwrap_err(),
			AutomatonError::UnknownSymbol {
				origin: "p".into(),
				symbol: "b".into(),
			}
		);

		let mut transitions: NfaTransitions = NfaTransitions::new();
		transitions.insert("p".into(), Label::Epsilon, "r".into());
		assert_eq!(
			Nfa::new(states.clone(), alphabet.clone(), transitions, "p".into(), set(&[])).unwrap_err(),
			AutomatonError::UnknownDestination {
				origin: "p".into(),
				label: Label::Epsilon,
				destination: "r".into(),
			}
		);

		let mut transitions: NfaTransitions = NfaTransitions::new();
		transitions.insert("x".into(), Label::from_token("a"), "q".into());
		assert_eq!(
			Nfa::new(states, alphabet, transitions, "p".into(), set(&[])).unwrap_err(),
			AutomatonError::UnknownOrigin("x".into())
		);
	}

	#[test]
	fn rendering() {
		let nfa: Nfa = nfa(&["p", "q"], &["a"], &[("p", "&", "q"), ("p", "a", "p")], "p", &["q"]);
		assert_eq!(
			nfa.to_string(),
			"M = (Q, Σ, δ, q0, F)\nQ = {p, q}\nΣ = {a}\nq0 = p\nF = {q}\nε = '&'\nδ =\n  δ(p, ε) = {q}\n  δ(p, a) = {p}\n"
		);
	}
}
