use std::fmt;

use sz_core::{
    Arg, Formulation, Metadata, Operator, ParamDescriptor, Problem, ProblemConfig, State,
    SzResult, TransitionError, int_arg,
};

/// The target total.
pub const TARGET: u32 = 10;
/// The most that can be added in one move.
pub const MAX_STEP: u32 = 3;

/// The running total.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tally {
    /// Sum so far.
    pub total: u32,
}

impl Tally {
    /// How much may be added in one move from here.
    pub fn room(&self) -> u32 {
        MAX_STEP.min(TARGET.saturating_sub(self.total))
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total: {} of {TARGET}", self.total)
    }
}

impl State for Tally {
    fn is_goal(&self) -> bool {
        self.total == TARGET
    }

    fn goal_message(&self) -> String {
        format!("You counted to {TARGET}!")
    }
}

/// A tutorial formulation whose parameter bounds shrink as the total grows.
pub struct CountToTen {
    metadata: Metadata,
}

impl Default for CountToTen {
    fn default() -> Self {
        Self::new()
    }
}

impl CountToTen {
    /// Create the formulation.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::new("Count to Ten")
                .with_version("1.0")
                .with_description(
                    "Add between one and three to a running total until it reaches exactly ten. \
                     The largest allowed step shrinks near the end.",
                ),
        }
    }
}

fn add(tally: &Tally, args: &[Arg]) -> Result<Tally, TransitionError> {
    let amount = int_arg(args, 0)?;
    let amount = u32::try_from(amount)
        .ok()
        .filter(|a| (1..=tally.room()).contains(a))
        .ok_or_else(|| TransitionError::new(format!("cannot add {amount} to {}", tally.total)))?;
    Ok(Tally {
        total: tally.total + amount,
    })
}

impl Formulation for CountToTen {
    type State = Tally;

    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn initialize(&self, _: &ProblemConfig) -> SzResult<Problem<Tally>> {
        let ops = [
            Operator::new("Add", add)
                .with_dynamic_name(|t: &Tally| format!("Add to {}", t.total))
                .with_computed_params(|t: &Tally| {
                    vec![ParamDescriptor::int("amount", 1, i64::from(t.room()))]
                })
                .when(|t: &Tally| t.total < TARGET)
                .describe(format!(
                    "Add 1 to {MAX_STEP} to the running total, without passing {TARGET}."
                )),
            Operator::step("Start over", |_: &Tally| Tally { total: 0 })
                .when(|t: &Tally| t.total > 0),
        ];
        Ok(Problem::new(Tally { total: 0 }, ops.into_iter().collect()))
    }
}
