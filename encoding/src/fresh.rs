/// Source of unique names for auxiliary variables.
///
/// Names are only unique per `Fresh`, so one instance has to be threaded through everything
/// that is asserted into the same solver.
#[derive(Clone, Debug, Default)]
pub struct Fresh {
	next: usize,
}

impl Fresh {
	pub fn new() -> Self {
		Self::default()
	}

	/// A name starting with `prefix` that was never returned before
	pub fn name(&mut self, prefix: &str) -> String {
		let name = format!("{}#{}", prefix, self.next);
		self.next += 1;
		name
	}
}
