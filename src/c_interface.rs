use std::ffi::c_char;
use std::marker::PhantomData;
use std::str::Utf8Error;

use crate::automaton::Automaton;
use crate::dfa::Dfa;
use crate::loader::parse_automaton;

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CSlice<'lifetime, T> {
	pointer: *const T,
	length: usize,
	_lifetime: PhantomData<&'lifetime [T]>,
}

pub type CStringView<'lifetime> = CSlice<'lifetime, c_char>;

/// Returns null if `text` is not UTF-8 or does not describe a valid automaton.
#[unsafe(no_mangle)]
unsafe extern "C" fn fa_mechanic_automaton_parse(text: CStringView<'_>) -> Option<Box<Automaton>> {
	let text: &str = match text.as_utf8() {
		Ok(text) => text,
		Err(err) => {
			warn!("automaton text is not UTF-8: {err}");
			return None;
		},
	};
	match parse_automaton(text) {
		Ok(automaton) => Some(Box::new(automaton)),
		Err(err) => {
			warn!("{err}");
			None
		},
	}
}

#[unsafe(no_mangle)]
unsafe extern "C" fn fa_mechanic_automaton_delete(automaton: Box<Automaton>) {
	std::mem::drop(automaton);
}

#[unsafe(no_mangle)]
unsafe extern "C" fn fa_mechanic_automaton_is_deterministic(automaton: &Automaton) -> bool {
	automaton.is_deterministic()
}

#[unsafe(no_mangle)]
unsafe extern "C" fn fa_mechanic_automaton_minimize(automaton: &Automaton) -> Box<Dfa> {
	Box::new(automaton.minimize())
}

#[unsafe(no_mangle)]
unsafe extern "C" fn fa_mechanic_dfa_delete(dfa: Box<Dfa>) {
	std::mem::drop(dfa);
}

#[unsafe(no_mangle)]
unsafe extern "C" fn fa_mechanic_dfa_state_count(dfa: &Dfa) -> usize {
	dfa.state_count()
}

/// Non-UTF-8 input is rejected.
#[unsafe(no_mangle)]
unsafe extern "C" fn fa_mechanic_dfa_accepts_text(dfa: &Dfa, text: CStringView<'_>) -> bool {
	match text.as_utf8() {
		Ok(text) => dfa.accepts_text(text),
		Err(_) => false,
	}
}

impl<'lifetime> CStringView<'lifetime> {
	pub fn from_utf8(utf8: &'lifetime str) -> Self {
		Self {
			pointer: utf8.as_bytes().as_ptr().cast::<c_char>(),
			length: utf8.as_bytes().len(),
			_lifetime: PhantomData,
		}
	}

	pub fn from_bytes(bytes: &'lifetime [u8]) -> Self {
		Self {
			pointer: bytes.as_ptr().cast::<c_char>(),
			length: bytes.len(),
			_lifetime: PhantomData,
		}
	}

	pub fn as_utf8(&self) -> Result<&'lifetime str, Utf8Error> {
		let bytes: &[u8] = unsafe { std::slice::from_raw_parts(self.pointer.cast::<u8>(), self.length) };
		str::from_utf8(bytes)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	const REDUNDANT: &str = include_str!("../samples/redundant.txt");

	#[test]
	fn basic() {
		let input: CStringView<'_> = CStringView::from_utf8(REDUNDANT);

		unsafe {
			let automaton: Box<Automaton> = fa_mechanic_automaton_parse(input).unwrap();
			assert!(fa_mechanic_automaton_is_deterministic(&automaton));

			let dfa: Box<Dfa> = fa_mechanic_automaton_minimize(&automaton);
			fa_mechanic_automaton_delete(automaton);

			assert_eq!(fa_mechanic_dfa_state_count(&dfa), 3);
			assert!(fa_mechanic_dfa_accepts_text(&dfa, CStringView::from_utf8("001")));
			assert!(fa_mechanic_dfa_accepts_text(&dfa, CStringView::from_utf8("10")));
			assert!(!fa_mechanic_dfa_accepts_text(&dfa, CStringView::from_utf8("11")));
			assert!(!fa_mechanic_dfa_accepts_text(&dfa, CStringView::from_utf8("0")));
			assert!(!fa_mechanic_dfa_accepts_text(&dfa, CStringView::from_bytes(b"1\xff")));
			fa_mechanic_dfa_delete(dfa);
		}
	}

	#[test]
	fn invalid_input_is_null() {
		unsafe {
			assert!(fa_mechanic_automaton_parse(CStringView::from_utf8("[ESTADOS]\nq0\n")).is_none());
			assert!(fa_mechanic_automaton_parse(CStringView::from_bytes(b"[INICIAL]\n\xfe\n")).is_none());
		}
	}
}
