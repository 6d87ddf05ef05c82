use crate::{check_width, check_word, Action, ConfigError, OverflowPolicy};
use z3::{ast::BV, Context};

/// Encoded values and settings that are shared by every step of an unrolling.
pub struct Constants<'ctx> {
	pub ctx: &'ctx Context,
	/// The numbers that may be pushed, identified by their position
	pub numbers: Vec<u64>,
	/// Bit width of a stack word
	pub width: u32,
	pub overflow: OverflowPolicy,
	/// `numbers` encoded as words
	pub words: Vec<BV<'ctx>>,
}

impl<'ctx> Constants<'ctx> {
	/// Fails if a number does not fit the width
	pub fn new(
		ctx: &'ctx Context,
		numbers: &[u64],
		width: u32,
		overflow: OverflowPolicy,
	) -> Result<Self, ConfigError> {
		check_width(width)?;
		for number in numbers {
			check_word("number", *number, width)?;
		}

		let words = numbers
			.iter()
			.map(|n| BV::from_u64(ctx, *n, width))
			.collect();

		Ok(Self {
			ctx,
			numbers: numbers.to_vec(),
			width,
			overflow,
			words,
		})
	}

	/// A word literal of the configured width
	pub fn word(&self, value: u64) -> BV<'ctx> {
		BV::from_u64(self.ctx, value, self.width)
	}

	/// Every action the machine can take
	pub fn actions(&self) -> Vec<Action> {
		Action::all(self.numbers.len()).collect()
	}
}
