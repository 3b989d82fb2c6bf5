use std::process::ExitCode;
use std::str::FromStr;

use fa_mechanic::automaton::Automaton;
use fa_mechanic::dfa::Dfa;
use fa_mechanic::loader::load_automaton;
use fa_mechanic::nfa::Nfa;
use fa_mechanic::pipeline::Stage;
use fa_mechanic::pipeline::StageObserver;
use fa_mechanic::pipeline::minimal_dfa_with;
use tracing::Level;

const LOG_LEVEL_VARIABLE: &str = "FA_MECHANIC_LOG";

/// Prints every stage to stdout.
struct Printer;

impl StageObserver for Printer {
	fn on_nfa(&mut self, stage: Stage, nfa: &Nfa) {
		println!("== {stage} ==\n{nfa}");
	}

	fn on_dfa(&mut self, stage: Stage, dfa: &Dfa) {
		println!("== {stage} ==\n{dfa}");
	}
}

fn main() -> ExitCode {
	let level: Level = std::env::var(LOG_LEVEL_VARIABLE)
		.ok()
		.and_then(|level| Level::from_str(&level).ok())
		.unwrap_or(Level::INFO);
	tracing_subscriber::fmt()
		.with_max_level(level)
		.with_writer(std::io::stderr)
		.init();

	let mut args = std::env::args().skip(1);
	let Some(path) = args.next() else {
		eprintln!("usage: fa-mechanic <automaton-file> [word ...]");
		return ExitCode::FAILURE;
	};

	let automaton: Automaton = match load_automaton(&path) {
		Ok(automaton) => automaton,
		Err(err) => {
			eprintln!("{path}: {err}");
			return ExitCode::FAILURE;
		},
	};

	let minimal: Dfa = minimal_dfa_with(&automaton, &mut Printer);
	for word in args {
		let verdict: &str = if minimal.accepts_text(&word) { "accept" } else { "reject" };
		println!("{word:?}: {verdict}");
	}
	ExitCode::SUCCESS
}
