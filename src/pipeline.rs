use crate::automaton::Automaton;
use crate::dfa::Dfa;
use crate::nfa::Nfa;

/// Boundaries at which a [`StageObserver`] is notified.
#[derive(Debug, Clone, Copy, Eq, Ord, PartialEq, PartialOrd)]
pub enum Stage {
	Input,
	EpsilonEliminated,
	Determinized,
	Minimized,
}

/// Receives every intermediate automaton the pipeline produces.
///
/// Stages that are skipped (e.g. epsilon elimination for an epsilon-free input) are not reported.
pub trait StageObserver {
	fn on_nfa(&mut self, _stage: Stage, _nfa: &Nfa) {}

	fn on_dfa(&mut self, _stage: Stage, _dfa: &Dfa) {}
}

/// Silent.
impl StageObserver for () {}

/// Logs a summary of each stage at `INFO` and the full automaton at `DEBUG`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl StageObserver for TracingObserver {
	fn on_nfa(&mut self, stage: Stage, nfa: &Nfa) {
		info!(
			"{stage}: NFA with {} states{}",
			nfa.states().len(),
			if nfa.has_epsilon_transitions() { ", epsilon transitions" } else { "" }
		);
		debug!("{stage}:\n{nfa}");
	}

	fn on_dfa(&mut self, stage: Stage, dfa: &Dfa) {
		info!("{stage}: DFA with {} states", dfa.state_count());
		debug!("{stage}:\n{dfa}");
	}
}

/// The minimal DFA recognizing the same language as `automaton`.
pub fn minimal_dfa(automaton: &Automaton) -> Dfa {
	minimal_dfa_with(automaton, &mut ())
}

/// Like [`minimal_dfa`], reporting each stage to `observer`.
///
/// A DFA goes straight to minimization. An NFA has its epsilon transitions removed
/// (if it has any), is determinized, then minimized; minimization relies on the
/// totality only determinization provides, so this order is fixed.
pub fn minimal_dfa_with<O>(automaton: &Automaton, observer: &mut O) -> Dfa
where
	O: StageObserver + ?Sized,
{
	let minimized: Dfa = match automaton {
		Automaton::Dfa(dfa) => {
			observer.on_dfa(Stage::Input, dfa);
			dfa.minimize()
		},
		Automaton::Nfa(nfa) => {
			observer.on_nfa(Stage::Input, nfa);
			let determinized: Dfa = if nfa.has_epsilon_transitions() {
				let eliminated: Nfa = nfa.without_epsilon();
				observer.on_nfa(Stage::EpsilonEliminated, &eliminated);
				Dfa::determinization(&eliminated)
			} else {
				Dfa::determinization(nfa)
			};
			observer.on_dfa(Stage::Determinized, &determinized);
			determinized.minimize()
		},
	};
	observer.on_dfa(Stage::Minimized, &minimized);
	minimized
}

impl std::fmt::Display for Stage {
	fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		fmt.write_str(match self {
			Self::Input => "input",
			Self::EpsilonEliminated => "epsilon eliminated",
			Self::Determinized => "determinized",
			Self::Minimized => "minimized",
		})
	}
}
