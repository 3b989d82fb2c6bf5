use std::borrow::Borrow;
use std::collections::BTreeSet;

/// Reserved marker for a transition that consumes no input.
pub const EPSILON_MARKER: &str = "&";

#[derive(Debug, Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct State(String);

#[derive(Debug, Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Symbol(String);

/// What a non-deterministic transition is labelled with.
#[derive(Debug, Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Label {
	Epsilon,
	Symbol(Symbol),
}

/// Canonical key for a set of states.
///
/// Members are kept sorted and deduplicated, so two sets with the same members
/// compare and hash equal no matter the order they were collected in.
#[derive(Debug, Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StateSet(Vec<State>);

impl State {
	pub fn new<LikeString>(name: LikeString) -> Self
	where
		LikeString: Into<String>,
	{
		Self(name.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Symbol {
	pub fn new<LikeString>(name: LikeString) -> Self
	where
		LikeString: Into<String>,
	{
		Self(name.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn is_epsilon_marker(&self) -> bool {
		self.0 == EPSILON_MARKER
	}
}

impl Label {
	/// Reads a transition token, mapping the reserved marker to [`Label::Epsilon`].
	pub fn from_token(token: &str) -> Self {
		if token == EPSILON_MARKER {
			Self::Epsilon
		} else {
			Self::Symbol(Symbol::new(token))
		}
	}

	pub fn is_epsilon(&self) -> bool {
		matches!(self, Self::Epsilon)
	}

	pub fn symbol(&self) -> Option<&Symbol> {
		match self {
			Self::Epsilon => None,
			Self::Symbol(symbol) => Some(symbol),
		}
	}
}

impl StateSet {
	pub fn singleton(state: State) -> Self {
		Self(vec![state])
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn contains(&self, state: &State) -> bool {
		self.0.binary_search(state).is_ok()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, State> {
		self.0.iter()
	}

	pub fn intersects(&self, other: &BTreeSet<State>) -> bool {
		self.0.iter().any(|state| other.contains(state))
	}
}

impl FromIterator<State> for StateSet {
	fn from_iter<I: IntoIterator<Item = State>>(iter: I) -> Self {
		let mut states: Vec<State> = iter.into_iter().collect::<Vec<_>>();
		states.sort_unstable();
		states.dedup();
		Self(states)
	}
}

impl From<BTreeSet<State>> for StateSet {
	fn from(states: BTreeSet<State>) -> Self {
		// Already sorted and unique.
		Self(states.into_iter().collect::<Vec<_>>())
	}
}

impl<'a> IntoIterator for &'a StateSet {
	type Item = &'a State;
	type IntoIter = std::slice::Iter<'a, State>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}

impl Borrow<str> for State {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl Borrow<str> for Symbol {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for Symbol {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl From<&str> for State {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

impl From<&str> for Symbol {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

impl std::fmt::Display for State {
	fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		fmt.write_str(&self.0)
	}
}

impl std::fmt::Display for Symbol {
	fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		fmt.write_str(&self.0)
	}
}

impl std::fmt::Display for Label {
	fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Epsilon => fmt.write_str("ε"),
			Self::Symbol(symbol) => fmt.write_str(symbol.as_str()),
		}
	}
}

impl std::fmt::Display for StateSet {
	fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write_set(fmt, self.0.iter())
	}
}

/// Writes `{a, b, c}`.
pub(crate) fn write_set<'a, T, I>(fmt: &mut std::fmt::Formatter<'_>, items: I) -> std::fmt::Result
where
	T: std::fmt::Display + 'a,
	I: Iterator<Item = &'a T>,
{
	fmt.write_str("{")?;
	for (i, item) in items.enumerate() {
		if i > 0 {
			fmt.write_str(", ")?;
		}
		write!(fmt, "{item}")?;
	}
	fmt.write_str("}")
}
