use pyo3::exceptions::PyRuntimeError;
use pyo3::exceptions::PyUnicodeEncodeError;
use pyo3::prelude::*;
use pyo3::types::PyBytes;
use pyo3::types::PyString;

use crate::automaton::Automaton;
use crate::dfa::Dfa;
use crate::loader::LoadError;
use crate::loader::load_automaton;
use crate::loader::parse_automaton;
use crate::pipeline::TracingObserver;
use crate::pipeline::minimal_dfa_with;

pyo3::create_exception!(famech, FaMechException, PyRuntimeError);
pyo3::create_exception!(famech, FaMechInvalidAutomaton, FaMechException);

#[pyclass(name = "Automaton")]
#[derive(Debug)]
struct PyAutomaton {
	automaton: Automaton,
}

#[pyclass(name = "MinimalDfa")]
#[derive(Debug)]
struct PyMinimalDfa {
	dfa: Dfa,
}

#[pymethods]
impl PyAutomaton {
	/// Accepts `str` or UTF-8 `bytes`.
	#[staticmethod]
	fn from_text(text: &Bound<'_, PyAny>) -> PyResult<Self> {
		let Some(utf8) = python_unicode_or_bytes_as_str(text)? else {
			return Err(FaMechException::new_err("Expected str or bytes"));
		};
		let automaton: Automaton = parse_automaton(utf8).map_err(load_error_to_py)?;
		Ok(Self { automaton })
	}

	#[staticmethod]
	fn from_file(path: &str) -> PyResult<Self> {
		let automaton: Automaton = load_automaton(path).map_err(load_error_to_py)?;
		Ok(Self { automaton })
	}

	fn is_deterministic(&self) -> bool {
		self.automaton.is_deterministic()
	}

	fn minimize(&self) -> PyMinimalDfa {
		PyMinimalDfa {
			dfa: minimal_dfa_with(&self.automaton, &mut TracingObserver),
		}
	}

	fn __str__(&self) -> String {
		self.automaton.to_string()
	}
}

#[pymethods]
impl PyMinimalDfa {
	fn accepts(&self, word: Vec<String>) -> bool {
		self.dfa.accepts(word)
	}

	fn accepts_text(&self, text: &str) -> bool {
		self.dfa.accepts_text(text)
	}

	#[getter]
	fn states(&self) -> Vec<String> {
		self.dfa.states().iter().map(ToString::to_string).collect::<Vec<_>>()
	}

	#[getter]
	fn start(&self) -> String {
		self.dfa.start().to_string()
	}

	#[getter]
	fn finals(&self) -> Vec<String> {
		self.dfa.finals().iter().map(ToString::to_string).collect::<Vec<_>>()
	}

	fn __str__(&self) -> String {
		self.dfa.to_string()
	}
}

fn load_error_to_py(err: LoadError) -> PyErr {
	match err {
		LoadError::Io(..) => FaMechException::new_err(err.to_string()),
		_ => FaMechInvalidAutomaton::new_err(err.to_string()),
	}
}

fn python_unicode_or_bytes_as_str<'a>(input: &'a Bound<'_, PyAny>) -> PyResult<Option<&'a str>> {
	if let Ok(unicode) = input.cast::<PyString>() {
		Ok(Some(unicode.to_str()?))
	} else if let Ok(bytes) = input.cast::<PyBytes>() {
		match str::from_utf8(bytes.as_bytes()) {
			Ok(utf8) => Ok(Some(utf8)),
			Err(err) => Err(PyUnicodeEncodeError::new_err(err.to_string())),
		}
	} else {
		Ok(None)
	}
}

#[pymodule]
mod famech {
	use pyo3::prelude::*;

	#[pymodule_export]
	use super::PyAutomaton;
	#[pymodule_export]
	use super::PyMinimalDfa;

	#[pymodule_init]
	fn init(module: &Bound<'_, PyModule>) -> PyResult<()> {
		let py: Python<'_> = module.py();
		module.add("FaMechException", py.get_type::<super::FaMechException>())?;
		module.add("FaMechInvalidAutomaton", py.get_type::<super::FaMechInvalidAutomaton>())?;
		Ok(())
	}
}
