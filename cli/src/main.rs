#![allow(dangerous_implicit_autorefs)] // triggered by clap 2 `crate_authors!` on newer rustc

use clap::{crate_authors, crate_description, crate_version, App, Arg, ArgMatches};
use countdown::{Game, Mode, OverflowPolicy, SolveOptions, Trace};
use log::LevelFilter;
use std::{
	io::{stdin, Read},
	process::exit,
	str::FromStr,
};

fn main() {
	let args = App::new("countdown")
		.version(crate_version!())
		.author(crate_authors!("\n"))
		.about(crate_description!())
		.arg(
			Arg::with_name("STDIN")
				.long("stdin")
				.help("Read games from stdin, one `target: numbers...` per line")
				.conflicts_with_all(&["NUMBERS", "TARGET"]),
		)
		.arg(
			Arg::with_name("NUMBERS")
				.help("Numbers that may be used at most once each")
				.multiple(true)
				.required_unless("STDIN")
				.index(1),
		)
		.arg(
			Arg::with_name("TARGET")
				.short("t")
				.long("target")
				.value_name("N")
				.help("Number to reach")
				.takes_value(true)
				.required_unless("STDIN"),
		)
		.arg(
			Arg::with_name("APPROX")
				.long("approx")
				.help("Find the closest result if the target cannot be reached"),
		)
		.arg(
			Arg::with_name("ALLOW_OVERFLOW")
				.long("allow-overflow")
				.help("Let additions and multiplications wrap around"),
		)
		.arg(
			Arg::with_name("BITS")
				.short("b")
				.long("bits")
				.value_name("SIZE")
				.help("Bit width of a stack word")
				.number_of_values(1)
				.default_value("32"),
		)
		.arg(
			Arg::with_name("VERBOSE")
				.short("v")
				.long("verbose")
				.multiple(true)
				.help("Log the search, repeat for more detail"),
		)
		.get_matches();

	let mut logger = env_logger::Builder::from_default_env();
	match args.occurrences_of("VERBOSE") {
		0 => &mut logger,
		1 => logger.filter_level(LevelFilter::Info),
		2 => logger.filter_level(LevelFilter::Debug),
		_ => logger.filter_level(LevelFilter::Trace),
	}
	.init();

	exit(match rmain(args) {
		Ok(()) => 0,
		Err(e) => {
			eprintln!("{}", e);
			1
		}
	})
}

fn rmain(args: ArgMatches) -> Result<(), String> {
	let options = SolveOptions {
		mode: if args.is_present("APPROX") {
			Mode::Approximate
		} else {
			Mode::Exact
		},
		overflow: if args.is_present("ALLOW_OVERFLOW") {
			OverflowPolicy::Wrap
		} else {
			OverflowPolicy::Forbid
		},
		width: u32::from_str(args.value_of("BITS").unwrap())
			.map_err(|_| "Could not parse BITS as a size")?,
	};

	if args.is_present("STDIN") {
		let mut input = String::new();
		stdin()
			.read_to_string(&mut input)
			.map_err(|e| format!("Could not read stdin: {}", e))?;

		let games = input
			.lines()
			.filter(|line| !line.trim().is_empty())
			.map(parse_game)
			.collect::<Result<Vec<_>, _>>()?;

		let results = countdown::solve_all(&games, options);
		let mut failed = 0;
		for (game, result) in games.iter().zip(results) {
			println!("{} from {:?}", game.target, game.numbers);
			match result {
				Ok(result) => print_result(&result),
				Err(e) => {
					eprintln!("{} from {:?}: {}", game.target, game.numbers, e);
					failed += 1;
				}
			}
		}

		if failed > 0 {
			return Err(format!("{} of {} games failed", failed, games.len()));
		}
	} else {
		let numbers = args
			.values_of("NUMBERS")
			.unwrap()
			.map(parse_number)
			.collect::<Result<Vec<_>, _>>()?;
		let target = parse_number(args.value_of("TARGET").unwrap())?;

		let game = Game { numbers, target };
		let result = countdown::solve(&game, options).map_err(|e| e.to_string())?;
		print_result(&result);
	}

	Ok(())
}

fn parse_number(s: &str) -> Result<u64, String> {
	u64::from_str(s.trim()).map_err(|_| format!("Could not parse {:?} as a number", s))
}

/// `target: n1 n2 ...`
fn parse_game(line: &str) -> Result<Game, String> {
	let mut parts = line.splitn(2, ':');
	let target = parse_number(parts.next().unwrap_or(""))?;
	let numbers = parts
		.next()
		.ok_or_else(|| format!("Missing ':' in {:?}", line))?
		.split_whitespace()
		.map(parse_number)
		.collect::<Result<Vec<_>, _>>()?;

	Ok(Game { numbers, target })
}

fn print_result(result: &Option<Trace>) {
	match result {
		Some(trace) => print!("{}", trace),
		None => println!("No solution"),
	}
}
