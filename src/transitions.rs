use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::state::Label;
use crate::state::State;
use crate::state::Symbol;

/// `(state, symbol-or-epsilon) -> {states}`. A missing entry means no transition.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct NfaTransitions {
	map: BTreeMap<State, BTreeMap<Label, BTreeSet<State>>>,
}

/// `(state, symbol) -> state`.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct DfaTransitions {
	map: BTreeMap<State, BTreeMap<Symbol, State>>,
}

impl NfaTransitions {
	pub fn new() -> Self {
		Self { map: BTreeMap::new() }
	}

	pub fn insert(&mut self, origin: State, label: Label, destination: State) {
		self.map
			.entry(origin)
			.or_default()
			.entry(label)
			.or_default()
			.insert(destination);
	}

	/// Destinations of `(origin, label)`; `None` iff there are none.
	pub fn get(&self, origin: &State, label: &Label) -> Option<&BTreeSet<State>> {
		self.map.get(origin)?.get(label)
	}

	pub fn epsilon_targets(&self, origin: &State) -> Option<&BTreeSet<State>> {
		self.get(origin, &Label::Epsilon)
	}

	pub fn has_epsilon(&self) -> bool {
		self.map.values().any(|by_label| by_label.contains_key(&Label::Epsilon))
	}

	/// No epsilon entry and at most one destination per `(origin, symbol)`.
	pub fn is_deterministic(&self) -> bool {
		self.map.values().all(|by_label| {
			by_label
				.iter()
				.all(|(label, destinations)| !label.is_epsilon() && destinations.len() <= 1)
		})
	}

	pub fn iter(&self) -> impl Iterator<Item = (&State, &Label, &BTreeSet<State>)> + '_ {
		self.map.iter().flat_map(|(origin, by_label)| {
			by_label
				.iter()
				.map(move |(label, destinations)| (origin, label, destinations))
		})
	}

	/// Collapses a deterministic relation; `None` if any entry is epsilon or has several targets.
	pub fn to_deterministic(&self) -> Option<DfaTransitions> {
		let mut transitions: DfaTransitions = DfaTransitions::new();
		for (origin, label, destinations) in self.iter() {
			let symbol: &Symbol = label.symbol()?;
			if destinations.len() != 1 {
				return None;
			}
			let destination: &State = destinations.first()?;
			transitions.insert(origin.clone(), symbol.clone(), destination.clone());
		}
		Some(transitions)
	}
}

impl DfaTransitions {
	pub fn new() -> Self {
		Self { map: BTreeMap::new() }
	}

	/// Returns the destination previously stored for `(origin, symbol)`, if any.
	pub fn insert(&mut self, origin: State, symbol: Symbol, destination: State) -> Option<State> {
		self.map.entry(origin).or_default().insert(symbol, destination)
	}

	pub fn get(&self, origin: &State, symbol: &Symbol) -> Option<&State> {
		self.map.get(origin)?.get(symbol)
	}

	pub fn from_state(&self, origin: &State) -> Option<&BTreeMap<Symbol, State>> {
		self.map.get(origin)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&State, &Symbol, &State)> + '_ {
		self.map.iter().flat_map(|(origin, by_symbol)| {
			by_symbol
				.iter()
				.map(move |(symbol, destination)| (origin, symbol, destination))
		})
	}

	pub fn len(&self) -> usize {
		self.map.values().map(BTreeMap::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl std::fmt::Display for NfaTransitions {
	fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for (origin, label, destinations) in self.iter() {
			write!(fmt, "  δ({origin}, {label}) = ")?;
			crate::state::write_set(fmt, destinations.iter())?;
			writeln!(fmt)?;
		}
		Ok(())
	}
}

impl std::fmt::Display for DfaTransitions {
	fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for (origin, symbol, destination) in self.iter() {
			writeln!(fmt, "  δ({origin}, {symbol}) = {destination}")?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn nfa_relation() {
		let mut transitions: NfaTransitions = NfaTransitions::new();
		transitions.insert("p".into(), Label::from_token("a"), "q".into());
		transitions.insert("p".into(), Label::from_token("a"), "r".into());
		transitions.insert("p".into(), Label::from_token("a"), "q".into());
		assert!(!transitions.has_epsilon());
		assert!(!transitions.is_deterministic());
		assert_eq!(transitions.get(&"p".into(), &Label::from_token("a")).map(BTreeSet::len), Some(2));
		assert!(transitions.get(&"q".into(), &Label::from_token("a")).is_none());
		assert!(transitions.to_deterministic().is_none());

		transitions.insert("q".into(), Label::Epsilon, "p".into());
		assert!(transitions.has_epsilon());
		assert_eq!(
			transitions.epsilon_targets(&"q".into()),
			Some(&BTreeSet::from([State::from("p")]))
		);
	}

	#[test]
	fn deterministic_collapse() {
		let mut transitions: NfaTransitions = NfaTransitions::new();
		transitions.insert("p".into(), Label::from_token("a"), "q".into());
		transitions.insert("q".into(), Label::from_token("a"), "q".into());
		assert!(transitions.is_deterministic());
		let dfa: DfaTransitions = transitions.to_deterministic().unwrap();
		assert_eq!(dfa.len(), 2);
		assert_eq!(dfa.get(&"p".into(), &"a".into()), Some(&State::from("q")));
		assert_eq!(dfa.to_string(), "  δ(p, a) = q\n  δ(q, a) = q\n");
	}
}
