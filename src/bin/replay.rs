// Re-runs a decision log through the current engine
//
// Usage:
//   cargo run --bin replay -- <log_file> (--all | --turns 3,8 | --validate 3:up|left,8:down)
//                                       [--verbose] [--config Snake.toml]

use std::env;
use std::process;

use pathrace_snake::config::Config;
use pathrace_snake::replay::{self, ReplayEngine};
use pathrace_snake::types::Direction;

const USAGE: &str = "\
Decision log replay

USAGE:
  replay <log_file> <MODE> [OPTIONS]

MODES:
  --all                     Replay every logged turn
  --turns <T1,T2,...>       Replay the listed turns
  --validate <T:M|M,...>    Check logged moves, e.g. 5:up,10:left|right

OPTIONS:
  --verbose                 Log every replayed turn
  --config <path>           Snake.toml to take the time budget from (default: Snake.toml)
  --help                    Show this message";

enum Mode {
    All,
    Turns(Vec<i32>),
    Validate(Vec<(i32, Vec<Direction>)>),
}

struct Args {
    log_file: String,
    mode: Mode,
    config_path: String,
    verbose: bool,
}

fn parse_turn(s: &str) -> Result<i32, String> {
    s.trim()
        .parse()
        .map_err(|e| format!("bad turn number '{}': {}", s, e))
}

fn parse_expected(s: &str) -> Result<(i32, Vec<Direction>), String> {
    let (turn, moves) = s
        .split_once(':')
        .ok_or_else(|| format!("bad expectation '{}', want turn:move", s))?;
    let moves = moves
        .split('|')
        .map(|m| Direction::parse(m.trim()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((parse_turn(turn)?, moves))
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut rest = args.iter().skip(1);
    let log_file = rest.next().ok_or("missing log file")?.clone();

    let mut mode = None;
    let mut config_path = "Snake.toml".to_string();
    let mut verbose = false;

    while let Some(arg) = rest.next() {
        let mut value = || {
            rest.next()
                .cloned()
                .ok_or_else(|| format!("{} needs a value", arg))
        };
        match arg.as_str() {
            "--all" => mode = Some(Mode::All),
            "--turns" => {
                let turns = value()?
                    .split(',')
                    .map(parse_turn)
                    .collect::<Result<Vec<_>, _>>()?;
                mode = Some(Mode::Turns(turns));
            }
            "--validate" => {
                let expected = value()?
                    .split(',')
                    .map(parse_expected)
                    .collect::<Result<Vec<_>, _>>()?;
                mode = Some(Mode::Validate(expected));
            }
            "--config" => config_path = value()?,
            "--verbose" => verbose = true,
            other => return Err(format!("unknown option '{}'", other)),
        }
    }

    let mode = mode.ok_or("choose one of --all, --turns or --validate")?;
    Ok(Args {
        log_file,
        mode,
        config_path,
        verbose,
    })
}

fn fail(message: String) -> ! {
    eprintln!("error: {}", message);
    process::exit(1);
}

fn main() {
    env_logger::init();

    let raw: Vec<String> = env::args().collect();
    if raw.iter().any(|a| a == "--help") {
        eprintln!("{}", USAGE);
        return;
    }
    let args = match parse_args(&raw) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}\n", USAGE);
            fail(e)
        }
    };

    let config = Config::from_file(&args.config_path).unwrap_or_else(|e| {
        log::warn!("{}; using built-in timing", e);
        Config::default_hardcoded()
    });

    let entries = replay::read_log(&args.log_file)
        .unwrap_or_else(|e| fail(format!("log file: {}", e)));
    if entries.is_empty() {
        fail(format!("{} has no entries", args.log_file));
    }
    println!("{}: {} entries", args.log_file, entries.len());

    let engine = ReplayEngine::new(config, args.verbose);
    match args.mode {
        Mode::All => engine.print_report(&engine.replay_all(&entries)),
        Mode::Turns(turns) => match engine.replay_selected(&entries, &turns) {
            Ok(results) => engine.print_report(&results),
            Err(e) => fail(e),
        },
        Mode::Validate(expected) => match replay::check_expected(&entries, &expected) {
            Ok(()) => println!("{} expectation(s) hold", expected.len()),
            Err(e) => fail(format!("validation: {}", e)),
        },
    }
}
