use crate::{max_value, Action, OverflowPolicy, Snapshot};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
/// Why an action cannot be taken
pub enum Fault {
	#[error("not enough values on the stack")]
	StackUnderflow,
	#[error("number {0} was already used")]
	AlreadyUsed(usize),
	#[error("there is no number {0}")]
	NoSuchNumber(usize),
	#[error("result does not fit the word width")]
	Overflow,
	#[error("subtraction would be negative")]
	Underflow,
	#[error("division by zero")]
	DivisionByZero,
	#[error("division has a remainder")]
	InexactDivision,
}

#[derive(Clone, Debug, Eq, PartialEq)]
/// Concrete interpreter of the stack machine.
///
/// Words are unsigned and `width` bits wide, with the same preconditions as the encoding.
pub struct Machine {
	pub numbers: Vec<u64>,
	pub width: u32,
	pub overflow: OverflowPolicy,
	pub stack: Vec<u64>,
	pub used: Vec<bool>,
}

impl Machine {
	pub fn new(numbers: &[u64], width: u32, overflow: OverflowPolicy) -> Self {
		Self {
			numbers: numbers.to_vec(),
			width,
			overflow,
			stack: Vec::new(),
			used: vec![false; numbers.len()],
		}
	}

	/// Take `action`, the machine is left unchanged on a fault
	pub fn step(&mut self, action: Action) -> Result<(), Fault> {
		let (pops, _) = action.stack_pop_push_count();
		let len = self.stack.len();
		if len < pops {
			return Err(Fault::StackUnderflow);
		}

		if let Action::Push(n) = action {
			let value = *self.numbers.get(n).ok_or(Fault::NoSuchNumber(n))?;
			if self.used[n] {
				return Err(Fault::AlreadyUsed(n));
			}
			self.used[n] = true;
			self.stack.push(value);
			return Ok(());
		}

		let top = self.stack[len - 1];
		let second = self.stack[len - 2];

		let result = self.apply(action, top, second)?;
		self.stack.truncate(len - pops);
		self.stack.push(result);
		Ok(())
	}

	fn apply(&self, action: Action, top: u64, second: u64) -> Result<u64, Fault> {
		let max = max_value(self.width);
		let wrap = self.overflow == OverflowPolicy::Wrap;

		match action {
			Action::Add => match top.checked_add(second) {
				Some(sum) if sum <= max => Ok(sum),
				_ if wrap => Ok(top.wrapping_add(second) & max),
				_ => Err(Fault::Overflow),
			},
			Action::Sub => top.checked_sub(second).ok_or(Fault::Underflow),
			Action::Mul => match top.checked_mul(second) {
				Some(product) if product <= max => Ok(product),
				_ if wrap => Ok(top.wrapping_mul(second) & max),
				_ => Err(Fault::Overflow),
			},
			Action::Div => {
				if second == 0 {
					Err(Fault::DivisionByZero)
				} else if top % second != 0 {
					Err(Fault::InexactDivision)
				} else {
					Ok(top / second)
				}
			}
			Action::Push(_) => unreachable!(),
		}
	}

	pub fn run(&mut self, actions: &[Action]) -> Result<(), Fault> {
		for action in actions {
			self.step(*action)?;
		}
		Ok(())
	}

	/// The value computed so far, if exactly one is on the stack
	pub fn result(&self) -> Option<u64> {
		match self.stack[..] {
			[value] => Some(value),
			_ => None,
		}
	}

	pub fn snapshot(&self) -> Snapshot {
		Snapshot {
			stack: self.stack.clone(),
			used: self.used.clone(),
		}
	}
}
