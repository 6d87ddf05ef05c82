use crate::Error;
use countdown_encoding::{Action, Constants, Fresh, Snapshot, State, Transition};
use log::{debug, info};
use z3::{
	ast::{Bool, BV},
	Model, Optimize, SatResult, Solver,
};

/// Initial state plus a growing chain of transitions.
pub struct Unrolling<'ctx, 'constants> {
	constants: &'constants Constants<'ctx>,
	actions: Vec<Action>,
	pub fresh: Fresh,
	pub initial: Bool<'ctx>,
	pub states: Vec<State<'ctx>>,
	pub transitions: Vec<Transition<'ctx>>,
}

impl<'ctx, 'constants> Unrolling<'ctx, 'constants> {
	pub fn new(constants: &'constants Constants<'ctx>) -> Self {
		let initial_state = State::new(constants, 0);

		Self {
			constants,
			actions: constants.actions(),
			fresh: Fresh::new(),
			initial: initial_state.initial(),
			states: vec![initial_state],
			transitions: Vec::new(),
		}
	}

	/// Number of transitions
	pub fn depth(&self) -> usize {
		self.transitions.len()
	}

	pub fn last_state(&self) -> &State<'ctx> {
		&self.states[self.states.len() - 1]
	}

	/// Add one state and the transition leading to it
	pub fn unroll(&mut self) -> &Transition<'ctx> {
		let next = State::new(self.constants, self.states.len());
		let transition = Transition::new(
			self.constants,
			&mut self.fresh,
			&self.states[self.states.len() - 1],
			&next,
			&self.actions,
		);

		self.states.push(next);
		self.transitions.push(transition);
		&self.transitions[self.transitions.len() - 1]
	}

	/// Everything asserted about the unrolling so far
	pub fn formulas(&self) -> impl Iterator<Item = &Bool<'ctx>> {
		std::iter::once(&self.initial).chain(self.transitions.iter().map(|t| &t.formula))
	}

	fn solution(&self, model: Model<'ctx>, distance: Option<u64>) -> Solution<'ctx> {
		Solution {
			model,
			states: self.states.clone(),
			transitions: self.transitions.clone(),
			distance,
		}
	}
}

/// A satisfying execution found by a search.
pub struct Solution<'ctx> {
	pub model: Model<'ctx>,
	pub states: Vec<State<'ctx>>,
	pub transitions: Vec<Transition<'ctx>>,
	/// Distance to the target, approximate search only
	pub distance: Option<u64>,
}

impl<'ctx> Solution<'ctx> {
	pub fn actions(&self) -> Vec<Action> {
		self.transitions
			.iter()
			.filter_map(|t| t.fired(&self.model))
			.collect()
	}

	pub fn snapshots(&self) -> Vec<Snapshot> {
		self.states.iter().map(|s| s.decode(&self.model)).collect()
	}

	/// The single value on the final stack
	pub fn result(&self) -> Option<u64> {
		let last = self.states.last()?.decode(&self.model);
		match last.stack[..] {
			[value] => Some(value),
			_ => None,
		}
	}
}

/// Hard constraints on the final state and a criterion to minimize under them
pub struct SoftGoal<'ctx> {
	pub hard: Bool<'ctx>,
	pub criterion: BV<'ctx>,
}

/// Solver scope that is left again when dropped
struct Checkpoint<'a, 'ctx> {
	solver: &'a Solver<'ctx>,
}

impl<'a, 'ctx> Checkpoint<'a, 'ctx> {
	fn enter(solver: &'a Solver<'ctx>) -> Self {
		solver.push();
		Self { solver }
	}
}

impl Drop for Checkpoint<'_, '_> {
	fn drop(&mut self) {
		self.solver.pop(1);
	}
}

/// Bounded model checking.
///
/// Unrolls up to `bound` transitions and returns the first, and therefore shortest, execution
/// whose last state satisfies `final_predicate`. `Ok(None)` if there is none within the bound.
pub fn bmc<'ctx, F>(
	constants: &Constants<'ctx>,
	final_predicate: F,
	bound: usize,
) -> Result<Option<Solution<'ctx>>, Error>
where
	F: Fn(&State<'ctx>) -> Bool<'ctx>,
{
	let solver = Solver::new(constants.ctx);
	let mut unrolling = Unrolling::new(constants);
	solver.assert(&unrolling.initial);

	for step in 0..bound {
		debug!("step {}/{}", step + 1, bound);

		let transition = unrolling.unroll();
		solver.assert(&transition.formula);

		let _checkpoint = Checkpoint::enter(&solver);
		solver.assert(&final_predicate(unrolling.last_state()));

		match solver.check() {
			SatResult::Sat => {
				info!("solution with {} transitions", unrolling.depth());
				let model = solver
					.get_model()
					.ok_or_else(|| Error::Unknown("no model for a satisfiable query".into()))?;
				return Ok(Some(unrolling.solution(model, None)));
			}
			SatResult::Unsat => debug!("unsat"),
			SatResult::Unknown => {
				let reason = solver
					.get_reason_unknown()
					.unwrap_or_else(|| "unknown".into());
				return Err(Error::Unknown(reason));
			}
		}
	}

	Ok(None)
}

/// Bounded model checking with approximation.
///
/// For every depth up to `bound` the criterion of `goal` is minimized on its own. The solution
/// with the smallest criterion over all depths is kept, the search stops early at 0.
pub fn bmc_approx<'ctx, F>(
	constants: &Constants<'ctx>,
	mut goal: F,
	bound: usize,
) -> Result<Option<Solution<'ctx>>, Error>
where
	F: FnMut(&State<'ctx>, &mut Fresh) -> SoftGoal<'ctx>,
{
	let mut unrolling = Unrolling::new(constants);
	let mut best: Option<Solution<'ctx>> = None;

	for step in 0..bound {
		debug!("step {}/{}", step + 1, bound);

		unrolling.unroll();

		let optimize = Optimize::new(constants.ctx);
		for formula in unrolling.formulas() {
			optimize.assert(formula);
		}

		let last = unrolling.states.len() - 1;
		let SoftGoal { hard, criterion } = goal(&unrolling.states[last], &mut unrolling.fresh);
		optimize.assert(&hard);
		optimize.minimize(&criterion);

		match optimize.check(&[]) {
			SatResult::Sat => {
				let model = optimize
					.get_model()
					.ok_or_else(|| Error::Unknown("no model for a satisfiable query".into()))?;
				let score = model
					.eval(&criterion, true)
					.and_then(|c| c.as_u64())
					.ok_or_else(|| Error::Unknown("criterion has no value".into()))?;
				debug!("sat, score {}", score);

				let improves = best
					.as_ref()
					.and_then(|b| b.distance)
					.map_or(true, |distance| score < distance);
				if improves {
					info!(
						"score {} with {} transitions",
						score,
						unrolling.depth()
					);
					best = Some(unrolling.solution(model, Some(score)));
				}

				if score == 0 {
					break;
				}
			}
			SatResult::Unsat => debug!("unsat"),
			SatResult::Unknown => {
				let reason = optimize
					.get_reason_unknown()
					.unwrap_or_else(|| "unknown".into());
				return Err(Error::Unknown(reason));
			}
		}
	}

	Ok(best)
}
