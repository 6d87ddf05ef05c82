use countdown_encoding::{Action, Fault, Machine, OverflowPolicy, Snapshot};
use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq)]
/// Decoded execution of the machine, independent of any solver.
pub struct Trace {
	pub numbers: Vec<u64>,
	pub width: u32,
	pub overflow: OverflowPolicy,
	/// One more state than actions, starting with the empty stack
	pub states: Vec<Snapshot>,
	pub actions: Vec<Action>,
	/// Distance to the target, approximate search only
	pub distance: Option<u64>,
}

impl Trace {
	/// The single value on the final stack
	pub fn result(&self) -> Option<u64> {
		match self.states.last()?.stack[..] {
			[value] => Some(value),
			_ => None,
		}
	}

	/// Run the actions on a concrete machine
	pub fn replay(&self) -> Result<Machine, Fault> {
		let mut machine = Machine::new(&self.numbers, self.width, self.overflow);
		machine.run(&self.actions)?;
		Ok(machine)
	}
}

impl fmt::Display for Trace {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self.result() {
			Some(result) => writeln!(f, "Result {}", result)?,
			None => writeln!(f, "Result -")?,
		}
		if let Some(distance) = self.distance {
			writeln!(f, "Distance {}", distance)?;
		}

		write!(f, "Actions :")?;
		for action in &self.actions {
			match action {
				Action::Push(n) => write!(f, " {}({})", action, self.numbers[*n])?,
				_ => write!(f, " {}", action)?,
			}
		}
		writeln!(f)?;

		for (i, state) in self.states.iter().enumerate() {
			writeln!(f, "{}", "―".repeat(50))?;
			writeln!(f, "State {}", i)?;
			writeln!(f, "{}", state.render(&self.numbers))?;
		}
		Ok(())
	}
}
