use countdown_encoding::{check_width, check_word, Constants};
use log::info;
use rayon::prelude::*;
use z3::{Config, Context};

mod bmc;
mod error;
mod goal;
mod reference;
mod trace;

pub use crate::{
	bmc::{bmc, bmc_approx, SoftGoal, Solution, Unrolling},
	error::Error,
	goal::{closest, reaches},
	reference::{brute_force_closest, brute_force_exact},
	trace::Trace,
};
pub use countdown_encoding::{Action, ConfigError, Fault, Machine, OverflowPolicy, Snapshot};

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
/// A puzzle: reach `target` using each of `numbers` at most once
pub struct Game {
	pub numbers: Vec<u64>,
	pub target: u64,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Mode {
	/// Only executions that end in the target
	Exact,
	/// The execution that ends closest to the target
	Approximate,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SolveOptions {
	pub mode: Mode,
	pub overflow: OverflowPolicy,
	/// Bit width of a stack word, 1 to 64
	pub width: u32,
}

impl Default for SolveOptions {
	fn default() -> Self {
		Self {
			mode: Mode::Exact,
			overflow: OverflowPolicy::Forbid,
			width: 32,
		}
	}
}

/// Maximum number of transitions of any useful execution with `n_numbers` numbers.
///
/// Every action decreases `2 * unused numbers + stack size` by one. It starts at
/// `2 * n_numbers` and is at least 1 when a single value is left.
pub fn recurrence_diameter(n_numbers: usize) -> usize {
	(2 * n_numbers).saturating_sub(1)
}

/// Check that the game can be encoded on `width` bits
pub fn validate(game: &Game, width: u32) -> Result<(), Error> {
	check_width(width)?;
	for number in &game.numbers {
		check_word("number", *number, width)?;
	}
	check_word("target", game.target, width)?;

	Ok(())
}

/// Solve `game`.
///
/// `Ok(None)` if the exact search found nothing within the recurrence diameter, or if there
/// is nothing to compute with at all.
pub fn solve(game: &Game, options: SolveOptions) -> Result<Option<Trace>, Error> {
	validate(game, options.width)?;

	let config = Config::new();
	let ctx = Context::new(&config);
	let constants = Constants::new(&ctx, &game.numbers, options.width, options.overflow)?;
	let bound = recurrence_diameter(game.numbers.len());

	info!(
		"solving {:?} -> {} ({:?}, {} bits, bound {})",
		game.numbers, game.target, options.mode, options.width, bound
	);

	let solution = match options.mode {
		Mode::Exact => bmc(&constants, |state| reaches(&constants, state, game.target), bound)?,
		Mode::Approximate => bmc_approx(
			&constants,
			|state, fresh| closest(&constants, fresh, state, game.target),
			bound,
		)?,
	};

	Ok(solution.map(|solution| Trace {
		numbers: game.numbers.clone(),
		width: options.width,
		overflow: options.overflow,
		states: solution.snapshots(),
		actions: solution.actions(),
		distance: solution.distance,
	}))
}

/// Solve independent games in parallel, each with its own solver
pub fn solve_all(games: &[Game], options: SolveOptions) -> Vec<Result<Option<Trace>, Error>> {
	games.par_iter().map(|game| solve(game, options)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use Action::*;

	fn game(numbers: &[u64], target: u64) -> Game {
		Game {
			numbers: numbers.to_vec(),
			target,
		}
	}

	fn exact(width: u32, overflow: OverflowPolicy) -> SolveOptions {
		SolveOptions {
			mode: Mode::Exact,
			overflow,
			width,
		}
	}

	fn approximate(width: u32) -> SolveOptions {
		SolveOptions {
			mode: Mode::Approximate,
			overflow: OverflowPolicy::Forbid,
			width,
		}
	}

	#[test]
	fn recurrence_diameter_test() {
		assert_eq!(recurrence_diameter(0), 0);
		assert_eq!(recurrence_diameter(1), 1);
		assert_eq!(recurrence_diameter(4), 7);
		assert_eq!(recurrence_diameter(6), 11);
	}

	#[test]
	fn validate_test() {
		assert_eq!(validate(&game(&[8, 10], 899), 14), Ok(()));
		assert_eq!(validate(&game(&[], 0), 1), Ok(()));
		assert_eq!(validate(&game(&[1], 1), 0), Err(Error::InvalidWidth(0)));
		assert_eq!(validate(&game(&[1], 1), 65), Err(Error::InvalidWidth(65)));
		assert_eq!(
			validate(&game(&[8, 200], 5), 7),
			Err(Error::NotRepresentable {
				what: "number",
				value: 200,
				width: 7,
			})
		);
		assert_eq!(
			validate(&game(&[8, 10], 899), 8),
			Err(Error::NotRepresentable {
				what: "target",
				value: 899,
				width: 8,
			})
		);
	}

	#[test]
	fn solve_rejects_before_search() {
		let res = solve(&game(&[10, 20, 30, 40], 119), exact(6, OverflowPolicy::Forbid));
		assert!(matches!(res, Err(Error::NotRepresentable { value: 119, .. })));
	}

	#[test]
	fn solve_four_ones() {
		let trace = solve(&game(&[1, 1, 1, 1], 4), exact(8, OverflowPolicy::Forbid))
			.unwrap()
			.unwrap();

		assert_eq!(trace.actions.len(), 7);
		assert_eq!(
			trace.actions.iter().filter(|a| matches!(a, Push(_))).count(),
			4
		);
		assert_eq!(trace.actions.iter().filter(|a| **a == Add).count(), 3);
		assert_eq!(trace.states.len(), 8);
		assert_eq!(trace.result(), Some(4));
	}

	#[test]
	fn solve_no_solution() {
		let res = solve(&game(&[2, 3], 7), exact(8, OverflowPolicy::Forbid)).unwrap();
		assert_eq!(res, None);
	}

	#[test]
	fn solve_empty() {
		assert_eq!(solve(&game(&[], 0), SolveOptions::default()), Ok(None));
		assert_eq!(solve(&game(&[], 0), approximate(8)), Ok(None));
	}

	#[test]
	fn solve_overflow_policy() {
		let forbidden = solve(&game(&[100, 3], 44), exact(8, OverflowPolicy::Forbid)).unwrap();
		assert_eq!(forbidden, None);

		let wrapped = solve(&game(&[100, 3], 44), exact(8, OverflowPolicy::Wrap))
			.unwrap()
			.unwrap();
		assert_eq!(wrapped.result(), Some(44));
		assert_eq!(wrapped.replay().unwrap().result(), Some(44));
	}

	#[test]
	fn solve_approximate() {
		let trace = solve(&game(&[100, 3], 44), approximate(8))
			.unwrap()
			.unwrap();

		assert_eq!(trace.distance, Some(41));
		assert_eq!(trace.result(), Some(3));
	}

	#[test]
	fn solve_all_keeps_order() {
		let games = vec![game(&[3, 4], 12), game(&[2, 3], 7), game(&[5], 5)];
		let results = solve_all(&games, exact(8, OverflowPolicy::Forbid));

		assert_eq!(results.len(), 3);
		assert_eq!(results[0].as_ref().unwrap().as_ref().unwrap().result(), Some(12));
		assert_eq!(results[1], Ok(None));
		assert_eq!(results[2].as_ref().unwrap().as_ref().unwrap().actions, vec![Push(0)]);
	}
}
