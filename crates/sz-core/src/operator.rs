use std::fmt;

use crate::error::TransitionError;
use crate::param::{Arg, ParamDescriptor, ParameterSource};
use crate::role::RoleId;

type Precondition<S> = Box<dyn Fn(&S) -> bool>;
type Transition<S> = Box<dyn Fn(&S, &[Arg]) -> Result<S, TransitionError>>;

/// An operator's display name: fixed, or computed from the current state.
pub enum OperatorName<S> {
    /// A fixed label.
    Fixed(String),
    /// A label that depends on the state it is shown in.
    Computed(Box<dyn Fn(&S) -> String>),
}

impl<S> OperatorName<S> {
    /// Render the name for `state`.
    pub fn render(&self, state: &S) -> String {
        match self {
            Self::Fixed(name) => name.clone(),
            Self::Computed(f) => f(state),
        }
    }
}

/// A named, optionally role-restricted, optionally parameterized move.
pub struct Operator<S> {
    name: OperatorName<S>,
    description: Option<String>,
    role: Option<RoleId>,
    precondition: Precondition<S>,
    params: ParameterSource<S>,
    transition: Transition<S>,
}

impl<S: 'static> Operator<S> {
    /// Create an always-applicable operator with a fallible transition that
    /// receives the collected arguments.
    pub fn new(
        name: impl Into<String>,
        transition: impl Fn(&S, &[Arg]) -> Result<S, TransitionError> + 'static,
    ) -> Self {
        Self {
            name: OperatorName::Fixed(name.into()),
            description: None,
            role: None,
            precondition: Box::new(|_| true),
            params: ParameterSource::default(),
            transition: Box::new(transition),
        }
    }

    /// Create an operator without parameters whose transition cannot fail.
    pub fn step(name: impl Into<String>, transition: impl Fn(&S) -> S + 'static) -> Self {
        Self::new(name, move |s, _| Ok(transition(s)))
    }

    /// Set the precondition.
    pub fn when(mut self, precondition: impl Fn(&S) -> bool + 'static) -> Self {
        self.precondition = Box::new(precondition);
        self
    }

    /// Restrict the operator to one role.
    pub fn for_role(mut self, role: RoleId) -> Self {
        self.role = Some(role);
        self
    }

    /// Attach a fixed parameter list.
    pub fn with_params(mut self, params: Vec<ParamDescriptor>) -> Self {
        self.params = ParameterSource::Fixed(params);
        self
    }

    /// Attach a parameter list computed from the current state.
    pub fn with_computed_params(
        mut self,
        params: impl Fn(&S) -> Vec<ParamDescriptor> + 'static,
    ) -> Self {
        self.params = ParameterSource::Computed(Box::new(params));
        self
    }

    /// Replace the fixed name with one computed from the current state.
    pub fn with_dynamic_name(mut self, name: impl Fn(&S) -> String + 'static) -> Self {
        self.name = OperatorName::Computed(Box::new(name));
        self
    }

    /// Attach a longer description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl<S> Operator<S> {
    /// Display name in `state`.
    pub fn name(&self, state: &S) -> String {
        self.name.render(state)
    }

    /// Optional longer description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The role this operator is restricted to, if any.
    pub fn role(&self) -> Option<RoleId> {
        self.role
    }

    /// Whether the formulation's precondition holds in `state`.
    ///
    /// Role filtering is the engine's job and is not applied here.
    pub fn is_enabled(&self, state: &S) -> bool {
        (self.precondition)(state)
    }

    /// The parameter source.
    pub fn params(&self) -> &ParameterSource<S> {
        &self.params
    }

    /// Apply the operator to `state` with collected `args`.
    pub fn apply(&self, state: &S, args: &[Arg]) -> Result<S, TransitionError> {
        (self.transition)(state, args)
    }
}

impl<S> fmt::Debug for Operator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match &self.name {
            OperatorName::Fixed(name) => name.as_str(),
            OperatorName::Computed(_) => "<computed>",
        };
        f.debug_struct("Operator")
            .field("name", &name)
            .field("role", &self.role)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// The operators of a problem instance.
///
/// An operator's index in the set is its identity for the session.
pub struct OperatorSet<S> {
    operators: Vec<Operator<S>>,
}

impl<S> OperatorSet<S> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            operators: Vec::new(),
        }
    }

    /// Append an operator, returning its index.
    pub fn push(&mut self, op: Operator<S>) -> usize {
        self.operators.push(op);
        self.operators.len() - 1
    }

    /// Operator at `index`.
    pub fn get(&self, index: usize) -> Option<&Operator<S>> {
        self.operators.get(index)
    }

    /// Iterate with indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Operator<S>)> {
        self.operators.iter().enumerate()
    }

    /// Number of operators.
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Whether any operator has a fixed externally-edited parameter.
    pub fn has_file_edit_params(&self) -> bool {
        self.operators.iter().any(|op| op.params.has_file_edit())
    }
}

impl<S> Default for OperatorSet<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> FromIterator<Operator<S>> for OperatorSet<S> {
    fn from_iter<I: IntoIterator<Item = Operator<S>>>(iter: I) -> Self {
        Self {
            operators: iter.into_iter().collect(),
        }
    }
}

impl<S> fmt::Debug for OperatorSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.operators).finish()
    }
}
