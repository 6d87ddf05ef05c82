use crate::Constants;
use std::fmt::Write;
use z3::{
	ast::{Array, Ast, Bool, Int, BV},
	Context, Model, Sort,
};

#[derive(Clone)]
/// Symbolic state of the machine after `step` actions.
pub struct State<'ctx> {
	pub ctx: &'ctx Context,
	pub step: usize,
	/// Number of occupied stack slots, slots at or above it are don't-care
	pub index: Int<'ctx>,
	/// Slot position -> word
	pub stack: Array<'ctx>,
	/// Whether the n-th number was pushed already
	pub used: Vec<Bool<'ctx>>,
}

impl<'ctx> State<'ctx> {
	pub fn new(constants: &Constants<'ctx>, step: usize) -> Self {
		let ctx = constants.ctx;

		let index = Int::new_const(ctx, format!("index_{}", step));
		let stack = Array::new_const(
			ctx,
			format!("stack_{}", step),
			&Sort::int(ctx),
			&Sort::bitvector(ctx, constants.width),
		);
		let used = (0..constants.numbers.len())
			.map(|n| Bool::new_const(ctx, format!("used_{}_{}", step, n)))
			.collect();

		Self {
			ctx,
			step,
			index,
			stack,
			used,
		}
	}

	/// Empty stack, nothing used
	pub fn initial(&self) -> Bool<'ctx> {
		let mut conditions = vec![self.index._eq(&Int::from_u64(self.ctx, 0))];
		conditions.extend(self.used.iter().map(Bool::not));

		let conditions: Vec<_> = conditions.iter().collect();
		Bool::and(self.ctx, &conditions)
	}

	pub fn slot(&self, position: &Int<'ctx>) -> BV<'ctx> {
		self.stack
			.select(position)
			.as_bv()
			.expect("stack slots are words")
	}

	/// The `n`-th value from the top, `top(1)` is the topmost one
	pub fn top(&self, n: u64) -> BV<'ctx> {
		self.slot(&self.below_index(n))
	}

	/// `index - n`
	pub fn below_index(&self, n: u64) -> Int<'ctx> {
		Int::sub(self.ctx, &[&self.index, &Int::from_u64(self.ctx, n)])
	}

	/// All used flags carry over to `next`, except the one at `except`
	pub fn used_preserved(&self, next: &State<'ctx>, except: Option<usize>) -> Bool<'ctx> {
		let preserved: Vec<_> = self
			.used
			.iter()
			.zip(&next.used)
			.enumerate()
			.filter(|(n, _)| Some(*n) != except)
			.map(|(_, (pre, post))| pre._eq(post))
			.collect();

		let preserved: Vec<_> = preserved.iter().collect();
		Bool::and(self.ctx, &preserved)
	}

	pub fn decode(&self, model: &Model<'ctx>) -> Snapshot {
		let index = model
			.eval(&self.index, true)
			.and_then(|i| i.as_u64())
			.expect("stack index is a natural number");

		let stack = (0..index)
			.map(|position| {
				let slot = self.slot(&Int::from_u64(self.ctx, position));
				model
					.eval(&slot, true)
					.and_then(|v| v.as_u64())
					.expect("stack slot has a value")
			})
			.collect();

		let used = self
			.used
			.iter()
			.map(|u| {
				model
					.eval(u, true)
					.and_then(|v| v.as_bool())
					.expect("used flag has a value")
			})
			.collect();

		Snapshot { stack, used }
	}
}

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
/// Concrete state of the machine
pub struct Snapshot {
	/// Occupied slots, bottom first
	pub stack: Vec<u64>,
	pub used: Vec<bool>,
}

impl Snapshot {
	pub fn render(&self, numbers: &[u64]) -> String {
		let stack: Vec<_> = self.stack.iter().map(u64::to_string).collect();

		let mut out = format!("Stack : [{}]\nNumbers :", stack.join(", "));
		for (number, used) in numbers.iter().zip(&self.used) {
			let mark = if *used { '☑' } else { '☐' };
			write!(out, " {} {}", mark, number).expect("writing to a string");
		}
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::OverflowPolicy;
	use z3::{Config, SatResult, Solver};

	#[test]
	fn initial_state() {
		let ctx = Context::new(&Config::new());
		let solver = Solver::new(&ctx);
		let constants = Constants::new(&ctx, &[3, 4], 8, OverflowPolicy::Forbid).unwrap();

		let state = State::new(&constants, 0);
		solver.assert(&state.initial());

		assert_eq!(solver.check(), SatResult::Sat);
		let model = solver.get_model().unwrap();

		assert_eq!(
			state.decode(&model),
			Snapshot {
				stack: vec![],
				used: vec![false, false],
			}
		);
	}

	#[test]
	fn states_do_not_alias() {
		let ctx = Context::new(&Config::new());
		let solver = Solver::new(&ctx);
		let constants = Constants::new(&ctx, &[3], 8, OverflowPolicy::Forbid).unwrap();

		let first = State::new(&constants, 0);
		let second = State::new(&constants, 1);

		solver.assert(&first.index._eq(&Int::from_u64(&ctx, 0)));
		solver.assert(&second.index._eq(&Int::from_u64(&ctx, 1)));
		solver.assert(&first.used[0]);
		solver.assert(&second.used[0].not());

		assert_eq!(solver.check(), SatResult::Sat);
	}

	#[test]
	fn decode_occupied_slots() {
		let ctx = Context::new(&Config::new());
		let solver = Solver::new(&ctx);
		let constants = Constants::new(&ctx, &[5, 6, 7], 8, OverflowPolicy::Forbid).unwrap();

		let state = State::new(&constants, 2);
		solver.assert(&state.index._eq(&Int::from_u64(&ctx, 2)));
		solver.assert(&state.top(2)._eq(&constants.word(6)));
		solver.assert(&state.top(1)._eq(&constants.word(5)));
		solver.assert(&state.used[0]);
		solver.assert(&state.used[1]);
		solver.assert(&state.used[2].not());

		assert_eq!(solver.check(), SatResult::Sat);
		let model = solver.get_model().unwrap();

		assert_eq!(
			state.decode(&model),
			Snapshot {
				stack: vec![6, 5],
				used: vec![true, true, false],
			}
		);
	}

	#[test]
	fn render() {
		let snapshot = Snapshot {
			stack: vec![8, 10],
			used: vec![true, true, false],
		};

		assert_eq!(
			snapshot.render(&[8, 10, 2]),
			"Stack : [8, 10]\nNumbers : ☑ 8 ☑ 10 ☐ 2"
		);
		assert_eq!(
			Snapshot::default().render(&[]),
			"Stack : []\nNumbers :"
		);
	}
}
