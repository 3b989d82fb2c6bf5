//! Builders and language checks shared by the unit tests.

use std::collections::BTreeSet;

use crate::dfa::Dfa;
use crate::nfa::Nfa;
use crate::state::Label;
use crate::state::State;
use crate::state::Symbol;
use crate::transitions::DfaTransitions;
use crate::transitions::NfaTransitions;

pub fn set(states: &[&str]) -> BTreeSet<State> {
	states.iter().map(|&state| State::from(state)).collect::<BTreeSet<_>>()
}

fn alphabet(symbols: &[&str]) -> BTreeSet<Symbol> {
	symbols.iter().map(|&symbol| Symbol::from(symbol)).collect::<BTreeSet<_>>()
}

pub fn nfa(states: &[&str], symbols: &[&str], edges: &[(&str, &str, &str)], start: &str, finals: &[&str]) -> Nfa {
	let mut transitions: NfaTransitions = NfaTransitions::new();
	for &(origin, label, destination) in edges.iter() {
		transitions.insert(origin.into(), Label::from_token(label), destination.into());
	}
	Nfa::new(set(states), alphabet(symbols), transitions, start.into(), set(finals)).unwrap()
}

pub fn dfa(states: &[&str], symbols: &[&str], edges: &[(&str, &str, &str)], start: &str, finals: &[&str]) -> Dfa {
	let mut transitions: DfaTransitions = DfaTransitions::new();
	for &(origin, symbol, destination) in edges.iter() {
		assert!(transitions.insert(origin.into(), symbol.into(), destination.into()).is_none());
	}
	Dfa::new(set(states), alphabet(symbols), transitions, start.into(), set(finals)).unwrap()
}

/// Every word over `alphabet` of length at most `max_len`, shortest first.
pub fn words(alphabet: &BTreeSet<Symbol>, max_len: usize) -> Vec<Vec<Symbol>> {
	let mut all: Vec<Vec<Symbol>> = vec![Vec::new()];
	let mut frontier: Vec<Vec<Symbol>> = vec![Vec::new()];
	for _ in 0..max_len {
		let mut next: Vec<Vec<Symbol>> = Vec::new();
		for word in frontier.iter() {
			for symbol in alphabet.iter() {
				let mut longer: Vec<Symbol> = word.clone();
				longer.push(symbol.clone());
				next.push(longer);
			}
		}
		all.extend(next.iter().cloned());
		frontier = next;
	}
	all
}

/// Asserts both automata agree on every word up to `max_len` over `dfa`'s alphabet.
pub fn assert_same_language(nfa: &Nfa, dfa: &Dfa, max_len: usize) {
	for word in words(dfa.alphabet(), max_len) {
		assert_eq!(nfa.accepts(&word), dfa.accepts(&word), "disagree on {word:?}");
	}
}

pub fn assert_equivalent(lhs: &Dfa, rhs: &Dfa, max_len: usize) {
	for word in words(lhs.alphabet(), max_len) {
		assert_eq!(lhs.accepts(&word), rhs.accepts(&word), "disagree on {word:?}");
	}
}

impl Nfa {
	/// Set-of-states simulation, epsilon moves included.
	pub fn accepts(&self, word: &[Symbol]) -> bool {
		let mut current: BTreeSet<State> = self.epsilon_closure(self.start());
		for symbol in word.iter() {
			let label: Label = Label::Symbol(symbol.clone());
			let moved: BTreeSet<&State> = current
				.iter()
				.filter_map(|state| self.transitions().get(state, &label))
				.flatten()
				.collect::<BTreeSet<_>>();
			current = self.epsilon_closure_of_set(moved);
		}
		!current.is_disjoint(self.finals())
	}
}
