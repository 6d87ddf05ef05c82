//! Exhaustive search on the concrete machine, for cross-checking small games.

use crate::{recurrence_diameter, Game};
use countdown_encoding::{Action, Machine, OverflowPolicy};

/// Some action sequence that leaves exactly the target on the stack
pub fn brute_force_exact(game: &Game, overflow: OverflowPolicy, width: u32) -> Option<Vec<Action>> {
	let mut found = None;
	explore(game, overflow, width, &mut |machine: &Machine, path: &[Action]| {
		if machine.result() == Some(game.target) {
			found = Some(path.to_vec());
			true
		} else {
			false
		}
	});
	found
}

/// Smallest distance to the target of any single value the machine can compute
pub fn brute_force_closest(game: &Game, overflow: OverflowPolicy, width: u32) -> Option<u64> {
	let mut best: Option<u64> = None;
	explore(game, overflow, width, &mut |machine: &Machine, _: &[Action]| {
		if let Some(value) = machine.result() {
			let distance = if value >= game.target {
				value - game.target
			} else {
				game.target - value
			};
			best = Some(best.map_or(distance, |b| b.min(distance)));
		}
		best == Some(0)
	});
	best
}

/// Visit every state reachable within the recurrence diameter until `visit` returns true
fn explore<F>(game: &Game, overflow: OverflowPolicy, width: u32, visit: &mut F)
where
	F: FnMut(&Machine, &[Action]) -> bool,
{
	let machine = Machine::new(&game.numbers, width, overflow);
	let actions: Vec<_> = Action::all(game.numbers.len()).collect();
	let mut path = Vec::new();

	explore_from(
		&machine,
		&actions,
		&mut path,
		recurrence_diameter(game.numbers.len()),
		visit,
	);
}

fn explore_from<F>(
	machine: &Machine,
	actions: &[Action],
	path: &mut Vec<Action>,
	remaining: usize,
	visit: &mut F,
) -> bool
where
	F: FnMut(&Machine, &[Action]) -> bool,
{
	if visit(machine, path) {
		return true;
	}
	if remaining == 0 {
		return false;
	}

	for action in actions {
		let mut next = machine.clone();
		if next.step(*action).is_err() {
			continue;
		}

		path.push(*action);
		let done = explore_from(&next, actions, path, remaining - 1, visit);
		path.pop();

		if done {
			return true;
		}
	}
	false
}
