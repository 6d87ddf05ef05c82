use countdown::{solve, Game, Mode, OverflowPolicy, SolveOptions};
use criterion::black_box;
use serde_json::json;
use std::time::{Duration, Instant};

fn main() {
	let results_path = "bench_results.json";
	let mut results: serde_json::Value = std::fs::File::open(results_path)
		.ok()
		.and_then(|f| serde_json::from_reader(f).ok())
		.unwrap_or_else(|| json!({}));

	for bench_name in &["numbers", "width"] {
		let bench = match *bench_name {
			"numbers" => numbers,
			"width" => width,
			_ => unreachable!(),
		};

		for mode in &[Mode::Exact, Mode::Approximate] {
			let mode_name = match mode {
				Mode::Exact => "exact",
				Mode::Approximate => "approximate",
			};

			for n in 1..=8 {
				eprint!("({}, {}, {}): ", bench_name, mode_name, n);

				let diff = bench(*mode, n);

				let secs = diff.as_secs();
				let millis = diff.subsec_millis();
				if secs > 0 {
					eprint!("{}s ", secs);
				}
				eprintln!("{}ms", millis);

				results[*bench_name][mode_name][format!("{}", n)] =
					json!(diff.as_millis() as usize);
			}
		}
	}

	serde_json::to_writer(
		std::fs::File::create(results_path).expect("could not create results file"),
		&results,
	)
	.expect("could not write results");
}

fn time(game: &Game, options: SolveOptions) -> Duration {
	let start = Instant::now();
	let res = solve(black_box(game), options);
	let diff = Instant::now() - start;

	if let Err(e) = res {
		eprint!("{} ", e);
	}
	diff
}

/// `n` ones, the target needs all of them
fn numbers(mode: Mode, n: usize) -> Duration {
	let game = Game {
		numbers: vec![1; n],
		target: n as u64,
	};

	time(
		&game,
		SolveOptions {
			mode,
			overflow: OverflowPolicy::Forbid,
			width: 8,
		},
	)
}

/// A fixed game on words of `4 * n` bits
fn width(mode: Mode, n: usize) -> Duration {
	let game = Game {
		numbers: vec![8, 10, 2, 1],
		target: 11,
	};

	time(
		&game,
		SolveOptions {
			mode,
			overflow: OverflowPolicy::Forbid,
			width: 4 * n as u32,
		},
	)
}
