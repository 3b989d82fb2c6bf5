use std::borrow::Cow;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::VecDeque;

use crate::dfa::Dfa;
use crate::state::State;
use crate::state::Symbol;
use crate::transitions::DfaTransitions;

/// Which unordered pairs of distinct states are known to be distinguishable.
///
/// Only the strict lower triangle is stored, so `(p, q)` and `(q, p)` share a cell.
#[derive(Debug)]
struct PairTable {
	marked: Vec<bool>,
}

impl PairTable {
	fn new(size: usize) -> Self {
		Self {
			marked: vec![false; size * size.saturating_sub(1) / 2],
		}
	}

	fn cell(p: usize, q: usize) -> usize {
		assert_ne!(p, q, "a state is never distinguishable from itself");
		let (low, high): (usize, usize) = if p < q { (p, q) } else { (q, p) };
		high * (high - 1) / 2 + low
	}

	fn is_marked(&self, p: usize, q: usize) -> bool {
		self.marked[Self::cell(p, q)]
	}

	fn mark(&mut self, p: usize, q: usize) {
		self.marked[Self::cell(p, q)] = true;
	}
}

impl Dfa {
	/// States reachable from the start state.
	pub fn reachable_states(&self) -> BTreeSet<State> {
		let mut reachable: BTreeSet<State> = BTreeSet::from([self.start().clone()]);
		let mut queue: VecDeque<&State> = VecDeque::from([self.start()]);

		while let Some(state) = queue.pop_front() {
			for symbol in self.alphabet().iter() {
				let destination: &State = self.next(state, symbol);
				if reachable.insert(destination.clone()) {
					queue.push_back(destination);
				}
			}
		}

		reachable
	}

	/// Drops the states the start state cannot reach, along with their transitions.
	pub fn without_unreachable_states(&self) -> Cow<'_, Dfa> {
		let reachable: BTreeSet<State> = self.reachable_states();
		if reachable.len() == self.state_count() {
			debug!("every state is reachable");
			return Cow::Borrowed(self);
		}

		debug!(
			"removing unreachable states {:?}",
			self.states().difference(&reachable).collect::<Vec<_>>()
		);

		let mut transitions: DfaTransitions = DfaTransitions::new();
		for (origin, symbol, destination) in self.transitions().iter() {
			if reachable.contains(origin) {
				transitions.insert(origin.clone(), symbol.clone(), destination.clone());
			}
		}
		let finals: BTreeSet<State> = self.finals().intersection(&reachable).cloned().collect::<BTreeSet<_>>();

		Cow::Owned(Dfa::from_parts(
			reachable,
			self.alphabet().clone(),
			transitions,
			self.start().clone(),
			finals,
		))
	}

	/// The equivalent DFA with the fewest states, all of them reachable.
	///
	/// Unreachable states are pruned first; the rest are merged by table filling:
	/// a pair is distinguishable if exactly one side accepts, or if some symbol leads
	/// to a distinguishable pair, iterated until a full pass marks nothing new.
	/// When no two states merge, the (pruned) input is returned with its names intact;
	/// otherwise classes are named `M0`, `M1`, ... in order of their smallest member.
	pub fn minimize(&self) -> Dfa {
		let pruned: Cow<'_, Dfa> = self.without_unreachable_states();

		if pruned.state_count() <= 1 {
			debug!("trivially minimal");
			return pruned.into_owned();
		}

		match Self::quotient(&pruned) {
			Some(minimized) => minimized,
			None => pruned.into_owned(),
		}
	}

	/// Merges indistinguishable states; `None` if no two states merge.
	fn quotient(dfa: &Dfa) -> Option<Dfa> {
		let order: Vec<&State> = dfa.states().iter().collect::<Vec<_>>();
		let index: BTreeMap<&State, usize> = order.iter().enumerate().map(|(i, &state)| (state, i)).collect();
		let symbols: Vec<&Symbol> = dfa.alphabet().iter().collect::<Vec<_>>();
		let delta: Vec<Vec<usize>> = order
			.iter()
			.map(|&state| {
				symbols
					.iter()
					.map(|&symbol| index[dfa.next(state, symbol)])
					.collect::<Vec<_>>()
			})
			.collect::<Vec<_>>();
		let accepting: Vec<bool> = order.iter().map(|&state| dfa.is_final(state)).collect::<Vec<_>>();

		let table: PairTable = Self::fill_table(&delta, &accepting);
		let classes: Vec<Vec<usize>> = Self::classes(&table, order.len());

		if classes.len() == order.len() {
			info!("already minimal with {} states", order.len());
			return None;
		}

		let mut class_of: Vec<usize> = vec![0; order.len()];
		for (c, members) in classes.iter().enumerate() {
			for &member in members.iter() {
				class_of[member] = c;
			}
		}
		let names: Vec<State> = (0..classes.len())
			.map(|c| State::new(format!("M{c}")))
			.collect::<Vec<_>>();

		let mut transitions: DfaTransitions = DfaTransitions::new();
		let mut finals: BTreeSet<State> = BTreeSet::new();
		for (c, members) in classes.iter().enumerate() {
			debug!(
				"{} = {:?}",
				names[c],
				members.iter().map(|&member| order[member]).collect::<Vec<_>>()
			);

			if members.iter().any(|&member| accepting[member]) {
				finals.insert(names[c].clone());
			}

			let representative: usize = members[0];
			for (k, &symbol) in symbols.iter().enumerate() {
				let destination: usize = class_of[delta[representative][k]];
				assert!(
					members.iter().all(|&member| class_of[delta[member][k]] == destination),
					"members of {} disagree on {symbol}",
					names[c]
				);
				transitions.insert(names[c].clone(), symbol.clone(), names[destination].clone());
			}
		}

		info!("minimized {} states into {}", order.len(), classes.len());

		let start: State = names[class_of[index[dfa.start()]]].clone();
		Some(Dfa::from_parts(
			names.into_iter().collect::<BTreeSet<_>>(),
			dfa.alphabet().clone(),
			transitions,
			start,
			finals,
		))
	}

	fn fill_table(delta: &[Vec<usize>], accepting: &[bool]) -> PairTable {
		let size: usize = delta.len();
		let mut table: PairTable = PairTable::new(size);

		for q in 1..size {
			for p in 0..q {
				if accepting[p] != accepting[q] {
					table.mark(p, q);
				}
			}
		}

		let mut round: usize = 0;
		loop {
			round += 1;
			let mut newly_marked: usize = 0;
			for q in 1..size {
				for p in 0..q {
					if table.is_marked(p, q) {
						continue;
					}
					let distinguishable: bool = std::iter::zip(delta[p].iter(), delta[q].iter())
						.any(|(&p_next, &q_next)| p_next != q_next && table.is_marked(p_next, q_next));
					if distinguishable {
						table.mark(p, q);
						newly_marked += 1;
					}
				}
			}
			debug!("refinement round {round} marked {newly_marked} pairs");
			if newly_marked == 0 {
				break;
			}
		}

		table
	}

	/// Groups states whose pair was never marked; each class is listed smallest member first.
	fn classes(table: &PairTable, size: usize) -> Vec<Vec<usize>> {
		let mut assigned: Vec<bool> = vec![false; size];
		let mut classes: Vec<Vec<usize>> = Vec::new();

		for p in 0..size {
			if assigned[p] {
				continue;
			}
			assigned[p] = true;
			let mut members: Vec<usize> = vec![p];
			for q in (p + 1)..size {
				if !assigned[q] && !table.is_marked(p, q) {
					assigned[q] = true;
					members.push(q);
				}
			}
			classes.push(members);
		}

		classes
	}
}
