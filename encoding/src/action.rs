use crate::{Constants, Fresh, OverflowPolicy, State};
use log::trace;
use std::fmt;
use z3::ast::{Ast, Bool, Int, BV};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
/// A single step of the machine.
///
/// Binary actions take the topmost value as their left operand and the value below as their
/// right operand, so `Sub` computes `top - second` and `Div` computes `top / second`.
pub enum Action {
	/// Push the n-th number
	Push(usize),
	Add,
	Sub,
	Mul,
	Div,
}

impl Action {
	/// All actions for a machine with `n_numbers` numbers
	pub fn all(n_numbers: usize) -> impl Iterator<Item = Action> {
		use Action::*;

		[Add, Sub, Mul, Div]
			.iter()
			.cloned()
			.chain((0..n_numbers).map(Push))
	}

	/// How many values the action takes off the stack and puts back on it
	pub fn stack_pop_push_count(&self) -> (usize, usize) {
		match self {
			Action::Push(_) => (0, 1),
			Action::Add | Action::Sub | Action::Mul | Action::Div => (2, 1),
		}
	}

	/// Formula that holds iff `post` results from taking this action in `pre`.
	///
	/// `fresh` names the auxiliary variables some actions need.
	pub fn encode<'ctx>(
		&self,
		constants: &Constants<'ctx>,
		fresh: &mut Fresh,
		pre: &State<'ctx>,
		post: &State<'ctx>,
	) -> Bool<'ctx> {
		trace!("encoding {} at step {}", self, pre.step);

		match self {
			Action::Push(n) => push(constants, *n, pre, post),
			_ => binary(constants, *self, fresh, pre, post),
		}
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Action::Push(n) => write!(f, "push_{}", n),
			Action::Add => write!(f, "add"),
			Action::Sub => write!(f, "sub"),
			Action::Mul => write!(f, "mult"),
			Action::Div => write!(f, "div"),
		}
	}
}

fn push<'ctx>(
	constants: &Constants<'ctx>,
	n: usize,
	pre: &State<'ctx>,
	post: &State<'ctx>,
) -> Bool<'ctx> {
	let ctx = constants.ctx;

	let (number, flag) = match (constants.words.get(n), pre.used.get(n)) {
		(Some(number), Some(flag)) => (number, flag),
		// no such number, the action is never possible
		_ => return Bool::from_bool(ctx, false),
	};

	let not_used = flag.not();
	let now_used = post.used[n].clone();
	let others_preserved = pre.used_preserved(post, Some(n));

	let index_incremented = post
		.index
		._eq(&Int::add(ctx, &[&pre.index, &Int::from_u64(ctx, 1)]));
	let stack_set = post
		.stack
		._eq(&pre.stack.store(&pre.index, number));

	Bool::and(
		ctx,
		&[
			&not_used,
			&now_used,
			&others_preserved,
			&index_incremented,
			&stack_set,
		],
	)
}

fn binary<'ctx>(
	constants: &Constants<'ctx>,
	action: Action,
	fresh: &mut Fresh,
	pre: &State<'ctx>,
	post: &State<'ctx>,
) -> Bool<'ctx> {
	let ctx = constants.ctx;
	let forbid_overflow = constants.overflow == OverflowPolicy::Forbid;

	let top = pre.top(1);
	let second = pre.top(2);

	let (guard, result): (Bool<'ctx>, BV<'ctx>) = match action {
		Action::Add => {
			let guard = if forbid_overflow {
				top.bvadd_no_overflow(&second, false)
			} else {
				Bool::from_bool(ctx, true)
			};
			(guard, top.bvadd(&second))
		}
		// unsigned words, bvsub would wrap around
		Action::Sub => (top.bvuge(&second), top.bvsub(&second)),
		Action::Mul => {
			let guard = if forbid_overflow {
				top.bvmul_no_overflow(&second, false)
			} else {
				Bool::from_bool(ctx, true)
			};
			(guard, top.bvmul(&second))
		}
		Action::Div => {
			// exact division only: quotient * second == top
			// the product must not overflow, otherwise the quotient is not unique modulo 2^width
			let quotient = BV::new_const(ctx, fresh.name("quotient"), constants.width);
			let product = quotient.bvmul(&second);

			let guard = Bool::and(
				ctx,
				&[
					&second._eq(&constants.word(0)).not(),
					&quotient.bvmul_no_overflow(&second, false),
					&product._eq(&top),
				],
			);
			(guard, quotient)
		}
		Action::Push(_) => unreachable!(),
	};

	let (pops, pushes) = action.stack_pop_push_count();
	let enough_operands = pre.index.ge(&Int::from_u64(ctx, pops as u64));
	let index_set = post
		.index
		._eq(&pre.below_index((pops - pushes) as u64));
	let stack_set = post
		.stack
		._eq(&pre.stack.store(&pre.below_index(pops as u64), &result));
	let used_preserved = pre.used_preserved(post, None);

	Bool::and(
		ctx,
		&[
			&enough_operands,
			&index_set,
			&guard,
			&stack_set,
			&used_preserved,
		],
	)
}
