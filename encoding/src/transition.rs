use crate::{Action, Constants, Fresh, State};
use z3::{ast::Bool, Model};

#[derive(Clone, Debug)]
/// One step of an unrolling.
pub struct Transition<'ctx> {
	/// Exactly one action is selected and the selected action relates the two states
	pub formula: Bool<'ctx>,
	/// Per action: whether it was the one taken
	pub selectors: Vec<(Action, Bool<'ctx>)>,
}

impl<'ctx> Transition<'ctx> {
	pub fn new(
		constants: &Constants<'ctx>,
		fresh: &mut Fresh,
		pre: &State<'ctx>,
		post: &State<'ctx>,
		actions: &[Action],
	) -> Self {
		let ctx = constants.ctx;

		let selectors: Vec<_> = actions
			.iter()
			.map(|action| {
				let name = fresh.name(&format!("{}_{}", action, pre.step));
				(*action, Bool::new_const(ctx, name))
			})
			.collect();

		let mut conditions: Vec<_> = selectors
			.iter()
			.map(|(action, selected)| selected.implies(&action.encode(constants, fresh, pre, post)))
			.collect();

		let any: Vec<_> = selectors.iter().map(|(_, selected)| selected).collect();
		let weighted: Vec<_> = any.iter().map(|selected| (*selected, 1)).collect();
		conditions.push(Bool::or(ctx, &any));
		conditions.push(Bool::pb_le(ctx, &weighted, 1));

		let conditions: Vec<_> = conditions.iter().collect();
		Self {
			formula: Bool::and(ctx, &conditions),
			selectors,
		}
	}

	/// The action taken in `model`
	pub fn fired(&self, model: &Model<'ctx>) -> Option<Action> {
		self.selectors
			.iter()
			.find(|(_, selected)| {
				model
					.eval(selected, true)
					.and_then(|b| b.as_bool())
					.unwrap_or(false)
			})
			.map(|(action, _)| *action)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{OverflowPolicy, Snapshot};
	use z3::{
		ast::{Ast, Int},
		Config, Context, SatResult, Solver,
	};

	#[test]
	fn exactly_one_action() {
		let ctx = Context::new(&Config::new());
		let solver = Solver::new(&ctx);
		let constants = Constants::new(&ctx, &[3, 4], 8, OverflowPolicy::Forbid).unwrap();
		let mut fresh = Fresh::new();

		let pre = State::new(&constants, 0);
		let post = State::new(&constants, 1);
		let transition = Transition::new(&constants, &mut fresh, &pre, &post, &constants.actions());

		solver.assert(&pre.initial());
		solver.assert(&transition.formula);

		// two selectors at once are impossible
		solver.push();
		solver.assert(&transition.selectors[4].1);
		solver.assert(&transition.selectors[5].1);
		assert_eq!(solver.check(), SatResult::Unsat);
		solver.pop(1);

		// nothing selected is impossible
		solver.push();
		for (_, selected) in &transition.selectors {
			solver.assert(&selected.not());
		}
		assert_eq!(solver.check(), SatResult::Unsat);
		solver.pop(1);

		assert_eq!(solver.check(), SatResult::Sat);
		let model = solver.get_model().unwrap();

		// only pushes are possible on an empty stack
		match transition.fired(&model) {
			Some(Action::Push(n)) => {
				assert_eq!(post.decode(&model).stack, vec![constants.numbers[n]]);
			}
			other => panic!("unexpected action {:?}", other),
		}
	}

	#[test]
	fn fired_action_explains_step() {
		let ctx = Context::new(&Config::new());
		let solver = Solver::new(&ctx);
		let constants = Constants::new(&ctx, &[3, 4], 8, OverflowPolicy::Forbid).unwrap();
		let mut fresh = Fresh::new();

		let pre = State::new(&constants, 0);
		let post = State::new(&constants, 1);
		let transition = Transition::new(&constants, &mut fresh, &pre, &post, &constants.actions());

		// [3, 4] -> [12]
		solver.assert(&pre.index._eq(&Int::from_u64(&ctx, 2)));
		solver.assert(&pre.top(2)._eq(&constants.word(3)));
		solver.assert(&pre.top(1)._eq(&constants.word(4)));
		solver.assert(&pre.used[0]);
		solver.assert(&pre.used[1]);
		solver.assert(&post.index._eq(&Int::from_u64(&ctx, 1)));
		solver.assert(&post.top(1)._eq(&constants.word(12)));
		solver.assert(&transition.formula);

		assert_eq!(solver.check(), SatResult::Sat);
		let model = solver.get_model().unwrap();

		assert_eq!(transition.fired(&model), Some(Action::Mul));
		assert_eq!(
			post.decode(&model),
			Snapshot {
				stack: vec![12],
				used: vec![true, true],
			}
		);
	}
}
