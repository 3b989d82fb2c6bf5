use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::automaton::AutomatonError;
use crate::automaton::validate_common;
use crate::nfa::Nfa;
use crate::state::Label;
use crate::state::State;
use crate::state::StateSet;
use crate::state::Symbol;
use crate::transitions::DfaTransitions;

/// Name of the non-accepting state that absorbs every missing transition
/// during determinization.
pub const SINK_STATE: &str = "Q_ERR";

/// A deterministic automaton with a total transition function.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Dfa {
	states: BTreeSet<State>,
	alphabet: BTreeSet<Symbol>,
	transitions: DfaTransitions,
	start: State,
	finals: BTreeSet<State>,
}

/// Super-states discovered so far during subset construction.
struct Powerset<'nfa> {
	nfa: &'nfa Nfa,
	/// Discovery order; index `i` is named `Q{i}`.
	discovered: Vec<StateSet>,
	names: BTreeMap<StateSet, State>,
	finals: BTreeSet<State>,
}

impl Dfa {
	pub fn new(
		states: BTreeSet<State>,
		alphabet: BTreeSet<Symbol>,
		transitions: DfaTransitions,
		start: State,
		finals: BTreeSet<State>,
	) -> Result<Self, AutomatonError> {
		let dfa: Self = Self {
			states,
			alphabet,
			transitions,
			start,
			finals,
		};
		dfa.validate()?;
		Ok(dfa)
	}

	/// For stage outputs, which are well-formed by construction.
	pub(crate) fn from_parts(
		states: BTreeSet<State>,
		alphabet: BTreeSet<Symbol>,
		transitions: DfaTransitions,
		start: State,
		finals: BTreeSet<State>,
	) -> Self {
		let dfa: Self = Self {
			states,
			alphabet,
			transitions,
			start,
			finals,
		};
		debug_assert_eq!(dfa.validate(), Ok(()));
		dfa
	}

	fn validate(&self) -> Result<(), AutomatonError> {
		validate_common(&self.states, &self.alphabet, &self.start, &self.finals)?;

		for (origin, symbol, destination) in self.transitions.iter() {
			if !self.states.contains(origin) {
				return Err(AutomatonError::UnknownOrigin(origin.clone()));
			}
			if !self.alphabet.contains(symbol) {
				return Err(AutomatonError::UnknownSymbol {
					origin: origin.clone(),
					symbol: symbol.clone(),
				});
			}
			if !self.states.contains(destination) {
				return Err(AutomatonError::UnknownDestination {
					origin: origin.clone(),
					label: Label::Symbol(symbol.clone()),
					destination: destination.clone(),
				});
			}
		}

		for state in self.states.iter() {
			for symbol in self.alphabet.iter() {
				if self.transitions.get(state, symbol).is_none() {
					return Err(AutomatonError::MissingTransition {
						state: state.clone(),
						symbol: symbol.clone(),
					});
				}
			}
		}

		Ok(())
	}

	pub fn states(&self) -> &BTreeSet<State> {
		&self.states
	}

	pub fn state_count(&self) -> usize {
		self.states.len()
	}

	pub fn alphabet(&self) -> &BTreeSet<Symbol> {
		&self.alphabet
	}

	pub fn transitions(&self) -> &DfaTransitions {
		&self.transitions
	}

	pub fn start(&self) -> &State {
		&self.start
	}

	pub fn finals(&self) -> &BTreeSet<State> {
		&self.finals
	}

	pub fn is_final(&self, state: &State) -> bool {
		self.finals.contains(state)
	}

	/// `δ(state, symbol)`; total over `Q × Σ`.
	pub fn next(&self, state: &State, symbol: &Symbol) -> &State {
		match self.transitions.get(state, symbol) {
			Some(destination) => destination,
			None => panic!("δ({state}, {symbol}) is undefined in a validated DFA"),
		}
	}

	/// Runs the automaton over `word`; a symbol outside the alphabet rejects.
	pub fn accepts<I>(&self, word: I) -> bool
	where
		I: IntoIterator,
		I::Item: AsRef<str>,
	{
		let mut current: &State = &self.start;
		for symbol in word {
			let symbol: &str = symbol.as_ref();
			let Some(next) = self
				.transitions
				.from_state(current)
				.and_then(|by_symbol| by_symbol.get(symbol))
			else {
				debug!("symbol {symbol:?} is not in the alphabet");
				return false;
			};
			current = next;
		}
		self.finals.contains(current)
	}

	/// Like [`Self::accepts`], reading one symbol per character when every symbol is a
	/// single character and whitespace-separated symbols otherwise.
	pub fn accepts_text(&self, text: &str) -> bool {
		if self.alphabet.iter().all(|symbol| symbol.as_str().chars().count() == 1) {
			self.accepts(text.chars().map(String::from))
		} else {
			self.accepts(text.split_whitespace())
		}
	}
}

impl Dfa {
	/// Subset construction over an epsilon-free automaton.
	///
	/// Super-states are explored breadth-first from `{q0}`. An empty move goes to
	/// [`SINK_STATE`], which is added (looping on every symbol) only if some move needed it,
	/// so the result is always total.
	///
	/// # Panics
	///
	/// If `nfa` still has epsilon transitions.
	pub fn determinization(nfa: &Nfa) -> Self {
		assert!(
			!nfa.has_epsilon_transitions(),
			"determinization requires an automaton without epsilon transitions"
		);

		let mut powerset: Powerset<'_> = Powerset {
			nfa,
			discovered: Vec::new(),
			names: BTreeMap::new(),
			finals: BTreeSet::new(),
		};
		let sink: State = State::new(SINK_STATE);
		let mut needs_sink: bool = false;
		let mut transitions: DfaTransitions = DfaTransitions::new();

		let start: State = powerset.intern(StateSet::singleton(nfa.start().clone()));

		// `powerset.discovered` grows inside the loop.
		let mut i: usize = 0;
		while i < powerset.discovered.len() {
			let current: StateSet = powerset.discovered[i].clone();
			let origin: State = powerset.names[&current].clone();

			for symbol in nfa.alphabet().iter() {
				let next: StateSet = powerset.step(&current, symbol);
				let destination: State = if next.is_empty() {
					needs_sink = true;
					sink.clone()
				} else {
					powerset.intern(next)
				};
				transitions.insert(origin.clone(), symbol.clone(), destination);
			}

			i += 1;
		}

		let mut states: BTreeSet<State> = powerset.names.into_values().collect::<BTreeSet<_>>();
		if needs_sink {
			debug!("adding sink state {sink}");
			for symbol in nfa.alphabet().iter() {
				transitions.insert(sink.clone(), symbol.clone(), sink.clone());
			}
			states.insert(sink);
		}

		info!(
			"determinized {} states into {} states{}",
			nfa.states().len(),
			states.len(),
			if needs_sink { " (sink included)" } else { "" }
		);

		Self::from_parts(states, nfa.alphabet().clone(), transitions, start, powerset.finals)
	}
}

impl Powerset<'_> {
	/// Names `set`, enqueuing it the first time it is seen.
	fn intern(&mut self, set: StateSet) -> State {
		if let Some(name) = self.names.get(&set) {
			return name.clone();
		}

		let name: State = State::new(format!("Q{}", self.discovered.len()));
		debug!("super-state {name} = {set}");
		if set.intersects(self.nfa.finals()) {
			self.finals.insert(name.clone());
		}
		self.names.insert(set.clone(), name.clone());
		self.discovered.push(set);
		name
	}

	/// Union of `δ(t, symbol)` over `t ∈ set`.
	fn step(&self, set: &StateSet, symbol: &Symbol) -> StateSet {
		let label: Label = Label::Symbol(symbol.clone());
		set.iter()
			.filter_map(|state| self.nfa.transitions().get(state, &label))
			.flatten()
			.cloned()
			.collect::<StateSet>()
	}
}

impl std::fmt::Display for Dfa {
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
		writeln!(fmt, "\nδ =")?;
		write!(fmt, "{}", self.transitions)
	}
}
