use std::time::Duration;

use rand::Rng;
use sudoku_core::Board;
use sudoku_gen::{GenerateConfig, classify_difficulty, estimate_difficulty, generate};
use sudoku_solver::{Resolution, Solver};

#[cfg(feature = "telemetry-subscriber")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sudoku_solver=info,sudoku_gen=info,sudoku_cli=info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(not(feature = "telemetry-subscriber"))]
fn init_tracing() {}

fn usage() -> &'static str {
    "sudoku-cli\n\
\n\
USAGE:\n\
  sudoku-cli solve --n <N> --cells <CELLS>\n\
  sudoku-cli generate --n <N> [--seed <S>] [--difficulty <D>] [--timeout-ms <T>]\n\
  sudoku-cli rate --n <N> --cells <CELLS> [--samples <K>] [--seed <S>]\n\
\n\
CELLS is the row-major board: a digit string with 0 or . for empty cells\n\
(boards with side up to 9), or a comma/space-separated list of values.\n\
\n\
EXAMPLES:\n\
  sudoku-cli solve --n 2 --cells 1234341221434321\n\
  sudoku-cli generate --n 3 --seed 7 --difficulty 0.6\n\
  sudoku-cli rate --n 3 --cells <81 digits> --samples 10\n"
}

fn parse_arg_value(args: &[String], i: &mut usize) -> Result<String, String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| "missing value".to_string())
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err}\n\n{}", usage());
        std::process::exit(2);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        return Err("missing command".to_string());
    }

    let cmd = args[1].as_str();
    let mut n: Option<u8> = None;
    let mut cells: Option<String> = None;
    let mut seed: Option<u64> = None;
    let mut difficulty: f64 = 0.5;
    let mut timeout_ms: u64 = 0;
    let mut samples: u32 = 10;

    let mut i = 2usize;
    while i < args.len() {
        match args[i].as_str() {
            "--n" | "-n" => {
                let v = parse_arg_value(&args, &mut i)?;
                n = Some(v.parse::<u8>().map_err(|_| "invalid --n".to_string())?);
            }
            "--cells" | "-c" => {
                cells = Some(parse_arg_value(&args, &mut i)?);
            }
            "--seed" => {
                let v = parse_arg_value(&args, &mut i)?;
                seed = Some(v.parse::<u64>().map_err(|_| "invalid --seed".to_string())?);
            }
            "--difficulty" => {
                let v = parse_arg_value(&args, &mut i)?;
                difficulty = v
                    .parse::<f64>()
                    .map_err(|_| "invalid --difficulty".to_string())?;
            }
            "--timeout-ms" => {
                let v = parse_arg_value(&args, &mut i)?;
                timeout_ms = v
                    .parse::<u64>()
                    .map_err(|_| "invalid --timeout-ms".to_string())?;
            }
            "--samples" => {
                let v = parse_arg_value(&args, &mut i)?;
                samples = v
                    .parse::<u32>()
                    .map_err(|_| "invalid --samples".to_string())?;
            }
            "--help" | "-h" => {
                println!("{}", usage());
                return Ok(());
            }
            other => {
                return Err(format!("unknown arg: {other}"));
            }
        }
        i += 1;
    }

    let Some(n) = n else {
        return Err("missing required flag: --n".to_string());
    };

    match cmd {
        "solve" => {
            let Some(cells) = cells else {
                return Err("'solve' requires --cells".to_string());
            };
            let mut board = parse_board(n, &cells)?;
            let mut solver = Solver::new(n).map_err(|e| e.to_string())?;
            match solver.solve(&mut board).map_err(|e| e.to_string())? {
                Resolution::Invalid => println!("invalid"),
                Resolution::Complete => {
                    println!("unique");
                    print_board(&board);
                }
                Resolution::Multiple => {
                    println!("multiple (showing one completion)");
                    print_board(&board);
                }
            }
            let stats = solver.stats();
            println!(
                "forward={} backtrack={}",
                stats.forward_steps, stats.backtrack_steps
            );
        }
        "generate" => {
            let seed = seed.unwrap_or_else(|| rand::rng().random());
            let config = GenerateConfig {
                difficulty,
                timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
                ..GenerateConfig::new(n, seed)
            };
            let g = generate(&config).map_err(|e| e.to_string())?;
            println!("seed={seed} hints={}", g.hint_count);
            print_board(&g.board);
        }
        "rate" => {
            let Some(cells) = cells else {
                return Err("'rate' requires --cells".to_string());
            };
            let board = parse_board(n, &cells)?;
            let seed = seed.unwrap_or_else(|| rand::rng().random());
            let report =
                estimate_difficulty(&board, samples, seed).map_err(|e| e.to_string())?;
            println!(
                "samples={} tier={:?}",
                report.samples,
                classify_difficulty(&report)
            );
            println!(
                "forward: min={} max={} mean={}",
                report.forward.min, report.forward.max, report.forward.mean
            );
            println!(
                "backtrack: min={} max={} mean={}",
                report.backtrack.min, report.backtrack.max, report.backtrack.mean
            );
        }
        _ => {
            return Err(format!("unknown command: {cmd}"));
        }
    }

    Ok(())
}

fn parse_board(n: u8, text: &str) -> Result<Board, String> {
    let side = n as usize * n as usize;
    let cells: Vec<u8> = if text.contains([',', ' ']) {
        text.split([',', ' '])
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<u8>().map_err(|_| format!("bad cell: {part}")))
            .collect::<Result<_, _>>()?
    } else if side <= 9 {
        text.chars()
            .map(|ch| match ch {
                '.' => Ok(0),
                '0'..='9' => Ok(ch as u8 - b'0'),
                _ => Err(format!("bad cell: {ch}")),
            })
            .collect::<Result<_, _>>()?
    } else {
        return Err("boards with side > 9 must be passed as a cell list".to_string());
    };
    Board::from_cells(n, cells).map_err(|e| e.to_string())
}

fn print_board(board: &Board) {
    let side = board.side();
    for row in 0..side {
        let line = board.cells()[row * side..(row + 1) * side]
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_digit_strings() {
        let board = parse_board(2, "1234341221434321").unwrap();
        assert_eq!(board.get(0), 1);
        assert_eq!(board.get(15), 1);
        assert_eq!(board.hint_count(), 16);
    }

    #[test]
    fn parses_dots_as_empty() {
        let board = parse_board(2, "1.3.....2....32.").unwrap();
        assert_eq!(board.hint_count(), 5);
    }

    #[test]
    fn parses_cell_lists() {
        let board = parse_board(2, "1,2,3,4,3,4,1,2,2,1,4,3,4,3,2,1").unwrap();
        assert_eq!(board.hint_count(), 16);
    }

    #[test]
    fn rejects_malformed_boards() {
        assert!(parse_board(2, "123").is_err());
        assert!(parse_board(2, "abcdefghijklmnop").is_err());
        // symbol 9 is out of range on a 4x4 board
        assert!(parse_board(2, "9234341221434321").is_err());
    }
}
