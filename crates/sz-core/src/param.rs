use std::fmt;
use std::path::PathBuf;

use crate::error::TransitionError;

/// What kind of value a parameter takes, with its constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    /// An integer within `[min, max]` inclusive.
    Int {
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },
    /// A real number within `[min, max]` inclusive.
    Real {
        /// Smallest accepted value.
        min: f64,
        /// Largest accepted value.
        max: f64,
    },
    /// One line of text, taken verbatim.
    Text,
    /// Text obtained by editing a file in an external editor.
    FileEdit {
        /// The file to edit. Created with `placeholder` if it does not exist.
        path: PathBuf,
        /// Seed content for a file that does not exist yet.
        placeholder: String,
    },
}

/// A named parameter of an operator.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    /// Name shown in the prompt.
    pub name: String,
    /// Kind and constraints.
    pub kind: ParamKind,
}

impl ParamDescriptor {
    /// An integer parameter bounded to `[min, max]`.
    pub fn int(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Int { min, max },
        }
    }

    /// A real parameter bounded to `[min, max]`.
    pub fn real(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Real { min, max },
        }
    }

    /// A free-text parameter.
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Text,
        }
    }

    /// A parameter filled by editing `path` in the external editor.
    pub fn file_edit(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        placeholder: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::FileEdit {
                path: path.into(),
                placeholder: placeholder.into(),
            },
        }
    }

    /// Whether this parameter is filled through the external editor.
    pub fn is_file_edit(&self) -> bool {
        matches!(self.kind, ParamKind::FileEdit { .. })
    }
}

/// Produces the parameter list of an operator.
///
/// A computed source is evaluated against the current state every time the
/// operator is invoked, which lets bounds depend on the state.
pub enum ParameterSource<S> {
    /// A fixed list, known without a state.
    Fixed(Vec<ParamDescriptor>),
    /// A list computed from the current state.
    Computed(Box<dyn Fn(&S) -> Vec<ParamDescriptor>>),
}

impl<S> ParameterSource<S> {
    /// Resolve the parameter list for `state`.
    pub fn resolve(&self, state: &S) -> Vec<ParamDescriptor> {
        match self {
            Self::Fixed(list) => list.clone(),
            Self::Computed(f) => f(state),
        }
    }

    /// Whether a fixed list contains an externally-edited parameter.
    ///
    /// Computed lists cannot be inspected without a state and report `false`.
    pub fn has_file_edit(&self) -> bool {
        match self {
            Self::Fixed(list) => list.iter().any(ParamDescriptor::is_file_edit),
            Self::Computed(_) => false,
        }
    }

    /// Whether the operator takes no parameters for certain.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Fixed(list) if list.is_empty())
    }
}

impl<S> Default for ParameterSource<S> {
    fn default() -> Self {
        Self::Fixed(Vec::new())
    }
}

impl<S> fmt::Debug for ParameterSource<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(list) => f.debug_tuple("Fixed").field(list).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// A collected argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// From an integer parameter.
    Int(i64),
    /// From a real parameter.
    Real(f64),
    /// From a text or externally-edited parameter.
    Text(String),
}

impl Arg {
    /// The integer value, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The real value; integers widen.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            Self::Text(_) => None,
        }
    }

    /// The text value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

/// Fetch integer argument `index`, or fail the transition.
pub fn int_arg(args: &[Arg], index: usize) -> Result<i64, TransitionError> {
    args.get(index)
        .and_then(Arg::as_int)
        .ok_or_else(|| TransitionError::bad_argument(index, "an integer"))
}

/// Fetch real argument `index`, or fail the transition.
pub fn real_arg(args: &[Arg], index: usize) -> Result<f64, TransitionError> {
    args.get(index)
        .and_then(Arg::as_real)
        .ok_or_else(|| TransitionError::bad_argument(index, "a number"))
}

/// Fetch text argument `index`, or fail the transition.
pub fn text_arg(args: &[Arg], index: usize) -> Result<&str, TransitionError> {
    args.get(index)
        .and_then(Arg::as_text)
        .ok_or_else(|| TransitionError::bad_argument(index, "text"))
}
