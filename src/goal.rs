use crate::bmc::SoftGoal;
use countdown_encoding::{Constants, Fresh, State};
use z3::ast::{Ast, Bool, Int, BV};

/// Exactly `target` is left on the stack
pub fn reaches<'ctx>(constants: &Constants<'ctx>, state: &State<'ctx>, target: u64) -> Bool<'ctx> {
	let ctx = constants.ctx;

	Bool::and(
		ctx,
		&[
			&state.index._eq(&Int::from_u64(ctx, 1)),
			&state.slot(&Int::from_u64(ctx, 0))._eq(&constants.word(target)),
		],
	)
}

/// A single value is left on the stack, as close to `target` as possible
pub fn closest<'ctx>(
	constants: &Constants<'ctx>,
	fresh: &mut Fresh,
	state: &State<'ctx>,
	target: u64,
) -> SoftGoal<'ctx> {
	let ctx = constants.ctx;

	let value = state.slot(&Int::from_u64(ctx, 0));
	let target = constants.word(target);
	let distance = BV::new_const(ctx, fresh.name("distance"), constants.width);

	// words are unsigned, the difference is taken in the direction that cannot wrap
	let difference = value
		.bvuge(&target)
		.ite(&value.bvsub(&target), &target.bvsub(&value));

	SoftGoal {
		hard: Bool::and(
			ctx,
			&[
				&state.index._eq(&Int::from_u64(ctx, 1)),
				&distance._eq(&difference),
			],
		),
		criterion: distance,
	}
}
