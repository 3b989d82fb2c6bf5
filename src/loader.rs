//! Reads automata from the sectioned text format.
//!
//! ```text
//! # comment
//! [ESTADOS]
//! q0
//! q1
//! [ALFABETO]
//! a
//! [INICIAL]
//! q0
//! [FINAIS]
//! q1
//! [TRANSICOES]
//! q0 a q1
//! q1 & q0
//! ```
//!
//! Every non-blank line under a section is one entry, except under `[TRANSICOES]` where
//! a line is `origin label destination` and `&` labels an epsilon transition.
//! Sections may appear in any order, and repeat.

use std::collections::BTreeSet;
use std::path::Path;

use nom::IResult;
use nom::Parser;

use crate::automaton::Automaton;
use crate::automaton::AutomatonError;
use crate::dfa::Dfa;
use crate::nfa::Nfa;
use crate::state::Label;
use crate::state::State;
use crate::state::Symbol;
use crate::transitions::NfaTransitions;

#[derive(Debug)]
pub enum LoadError {
	Io(std::io::Error),
	MultipleStartStates { line: usize },
	TransitionArity { line: usize, found: usize },
	MissingStartState,
	Invalid(AutomatonError),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Section {
	States,
	Alphabet,
	Start,
	Finals,
	Transitions,
	Unknown,
}

#[derive(Debug, Default)]
struct Description {
	states: BTreeSet<State>,
	alphabet: BTreeSet<Symbol>,
	start: Option<State>,
	finals: BTreeSet<State>,
	transitions: NfaTransitions,
}

type ParsingResult<'a, T> = IResult<&'a str, T>;

pub fn load_automaton<P>(path: P) -> Result<Automaton, LoadError>
where
	P: AsRef<Path>,
{
	let path: &Path = path.as_ref();
	info!("reading automaton from {}", path.display());
	let text: String = std::fs::read_to_string(path)?;
	parse_automaton(&text)
}

/// Parses a description and classifies it.
///
/// The result is an [`Automaton::Dfa`] only when no transition is labelled `&` and no
/// (origin, symbol) pair has more than one destination. A deterministic description must
/// then also be total.
///
/// Symbols used by transitions join the alphabet; the start state and final states join
/// the state set.
pub fn parse_automaton(text: &str) -> Result<Automaton, LoadError> {
	let mut description: Description = Description::default();
	let mut section: Option<Section> = None;

	for (index, raw_line) in text.lines().enumerate() {
		let line_number: usize = index + 1;
		let line: &str = raw_line.trim();
		if line.is_empty() || line.starts_with('#') {
			continue;
		}

		if let Ok((_, name)) = parse_header(line) {
			let next: Section = Section::from_name(name);
			if Section::Unknown == next {
				warn!("line {line_number}: ignoring unknown section [{name}]");
			}
			section = Some(next);
			continue;
		}

		match section {
			None => warn!("line {line_number}: ignoring {line:?} outside of any section"),
			Some(Section::Unknown) => (),
			Some(Section::States) => {
				description.states.insert(State::new(line));
			},
			Some(Section::Alphabet) => {
				description.alphabet.insert(Symbol::new(line));
			},
			Some(Section::Start) => {
				if description.start.is_some() {
					return Err(LoadError::MultipleStartStates { line: line_number });
				}
				description.start = Some(State::new(line));
			},
			Some(Section::Finals) => {
				description.finals.insert(State::new(line));
			},
			Some(Section::Transitions) => {
				let tokens: Vec<&str> = match parse_tokens(line) {
					Ok((_, tokens)) => tokens,
					// Only a blank line has no tokens, and blank lines were skipped above.
					Err(_) => {
						return Err(LoadError::TransitionArity {
							line: line_number,
							found: 0,
						});
					},
				};
				let [origin, label, destination] = tokens[..] else {
					return Err(LoadError::TransitionArity {
						line: line_number,
						found: tokens.len(),
					});
				};
				let label: Label = Label::from_token(label);
				if let Some(symbol) = label.symbol() {
					description.alphabet.insert(symbol.clone());
				}
				description
					.transitions
					.insert(State::new(origin), label, State::new(destination));
			},
		}
	}

	description.build()
}

impl Description {
	fn build(self) -> Result<Automaton, LoadError> {
		let Self {
			mut states,
			alphabet,
			start,
			finals,
			transitions,
		} = self;
		let start: State = start.ok_or(LoadError::MissingStartState)?;
		states.extend(finals.iter().cloned());
		states.insert(start.clone());

		let automaton: Automaton = match transitions.to_deterministic() {
			Some(deterministic) => Dfa::new(states, alphabet, deterministic, start, finals)?.into(),
			None => Nfa::new(states, alphabet, transitions, start, finals)?.into(),
		};
		debug!(
			"loaded {} with {} states over {} symbols",
			if automaton.is_deterministic() { "DFA" } else { "NFA" },
			automaton.states().len(),
			automaton.alphabet().len()
		);
		Ok(automaton)
	}
}

impl Section {
	fn from_name(name: &str) -> Self {
		match name {
			"ESTADOS" => Self::States,
			"ALFABETO" => Self::Alphabet,
			"INICIAL" => Self::Start,
			"FINAIS" => Self::Finals,
			"TRANSICOES" => Self::Transitions,
			_ => Self::Unknown,
		}
	}
}

/// `[NAME]`, where the name runs up to the line's final `]` and may itself contain `]`.
fn parse_header(line: &str) -> ParsingResult<'_, &str> {
	use nom::character::complete::char;
	use nom::combinator::map_opt;
	use nom::combinator::rest;
	use nom::sequence::preceded;

	map_opt(preceded(char('['), rest), |name: &str| name.strip_suffix(']')).parse(line)
}

fn parse_tokens(line: &str) -> ParsingResult<'_, Vec<&str>> {
	use nom::bytes::complete::take_till1;
	use nom::character::complete::multispace0;
	use nom::combinator::all_consuming;
	use nom::multi::many1;
	use nom::sequence::preceded;
	use nom::sequence::terminated;

	all_consuming(terminated(
		many1(preceded(multispace0, take_till1(|c: char| c.is_whitespace()))),
		multispace0,
	))
	.parse(line)
}

impl From<std::io::Error> for LoadError {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<AutomatonError> for LoadError {
	fn from(err: AutomatonError) -> Self {
		Self::Invalid(err)
	}
}

impl std::fmt::Display for LoadError {
	fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Io(err) => write!(fmt, "cannot read automaton: {err}"),
			Self::MultipleStartStates { line } => {
				write!(fmt, "line {line}: more than one start state")
			},
			Self::TransitionArity { line, found } => write!(
				fmt,
				"line {line}: a transition is `origin label destination`, found {found} token(s)"
			),
			Self::MissingStartState => fmt.write_str("no start state given"),
			Self::Invalid(err) => write!(fmt, "invalid automaton: {err}"),
		}
	}
}

impl std::error::Error for LoadError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Io(err) => Some(err),
			Self::Invalid(err) => Some(err),
			_ => None,
		}
	}
}
