use std::path::Path;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use gridwalk::constants::{DEFAULT_GRID_SIZE, DEFAULT_SEED, DEFAULT_TRIAL_COUNT};
use gridwalk::simulation::{
    run_simulation, run_simulation_sequential, trace_trial, Summary, TrialOutcome, TrialRecord,
};
use gridwalk::SimulationConfig;

const USAGE: &str =
    "Usage: gridwalk-simulate [--grid N] [--trials T] [--seed S] [--random-seed] [--trace] [--sequential] [--output DIR]";

struct Args {
    config: SimulationConfig,
    trace: bool,
    sequential: bool,
    output: Option<String>,
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> T {
    let Some(raw) = value else {
        eprintln!("Missing value for {}", flag);
        std::process::exit(1);
    };
    raw.parse().unwrap_or_else(|_| {
        eprintln!("Invalid {} value: {}", flag, raw);
        std::process::exit(1);
    })
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut grid_size = DEFAULT_GRID_SIZE;
    let mut trial_count = DEFAULT_TRIAL_COUNT;
    let mut random_seed = Some(DEFAULT_SEED);
    let mut trace = false;
    let mut sequential = false;
    let mut output: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--grid" => {
                i += 1;
                grid_size = parse_value("--grid", args.get(i));
            }
            "--trials" => {
                i += 1;
                trial_count = parse_value("--trials", args.get(i));
            }
            "--seed" => {
                i += 1;
                random_seed = Some(parse_value("--seed", args.get(i)));
            }
            "--random-seed" => {
                random_seed = None;
            }
            "--trace" => {
                trace = true;
            }
            "--sequential" => {
                sequential = true;
            }
            "--output" => {
                i += 1;
                output = Some(parse_value("--output", args.get(i)));
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                println!();
                println!("Options:");
                println!(
                    "  --grid N         Grid side length, N >= 2 (default: {})",
                    DEFAULT_GRID_SIZE
                );
                println!(
                    "  --trials T       Number of trials (default: {})",
                    DEFAULT_TRIAL_COUNT
                );
                println!("  --seed S         RNG seed (default: {})", DEFAULT_SEED);
                println!("  --random-seed    Draw a fresh seed (printed for reproduction)");
                println!("  --trace          Also print one recorded trial, frame by frame");
                println!("  --sequential     Single stream on one thread instead of rayon");
                println!("                   (same seed gives different counts than parallel)");
                println!("  --output DIR     Write summary.json (and trial.json) to DIR");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("{}", USAGE);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    Args {
        config: SimulationConfig {
            grid_size,
            trial_count,
            random_seed,
        },
        trace,
        sequential,
        output,
    }
}

fn print_trace(record: &TrialRecord) {
    println!("Single trial ({}×{} grid):", record.grid_size, record.grid_size);
    for f in &record.frames {
        println!(
            "  Step {:>3}  You: ({}, {})  Friend: ({}, {})  Distance: {}",
            f.tick, f.you.row, f.you.col, f.friend.row, f.friend.col, f.distance
        );
    }
    match record.outcome {
        TrialOutcome::Met { point, tick } => println!(
            "  Meeting at {} ({}, {}) after {} steps",
            point.label(),
            point.position.row,
            point.position.col,
            tick
        ),
        TrialOutcome::NoMeeting => println!("  No meeting after {} steps", record.ticks()),
    }
    println!();
}

fn print_summary(summary: &Summary) {
    println!("Results:");
    println!(
        "  Meetings:            {} out of {}",
        summary.meetings, summary.trials
    );
    println!("  Empirical rate:      {:.4}", summary.meeting_rate);
    println!(
        "  Exact rate:          {:.4}  (C(2N-2, N-1) / 4^(N-1))",
        summary.exact_meeting_probability
    );
    println!(
        "  1/N baseline:        1/{} = {:.4}",
        summary.grid_size, summary.theoretical_point_probability
    );
    println!();
    println!(
        "  {:<6} {:<12} {:>9} {:>9} {:>9} {:>9} {:>8}",
        "Point", "Coordinates", "Count", "Empirical", "Exact", "1/N dev", "Share"
    );
    for p in &summary.points {
        println!(
            "  {:<6} {:<12} {:>9} {:>9.4} {:>9.4} {:>+9.4} {:>7.1}%",
            p.label,
            format!("({}, {})", p.position.row, p.position.col),
            p.count,
            p.empirical,
            p.exact,
            p.empirical - p.theoretical,
            p.share_of_meetings * 100.0
        );
    }
    println!();
    println!(
        "  Mean |dev| vs 1/N:   {:.4}  (max {:.4})",
        summary.mean_absolute_deviation, summary.max_absolute_deviation
    );
    println!("  Mean |dev| vs exact: {:.4}", summary.mean_exact_deviation);
}

fn write_json<T: serde::Serialize>(value: &T, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

fn main() {
    gridwalk::env_config::init_logging();
    let Args {
        config,
        trace,
        sequential,
        output,
    } = parse_args();

    if let Err(err) = config.validate() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }

    let num_threads = if sequential {
        1
    } else {
        gridwalk::env_config::init_rayon_threads()
    };

    println!(
        "Grid Meeting Simulation ({}×{} grid, {} trials, {} threads)",
        config.grid_size, config.grid_size, config.trial_count, num_threads
    );

    let result = if sequential {
        run_simulation_sequential(&config)
    } else {
        run_simulation(&config)
    };
    let report = match result {
        Ok(report) => report,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };

    let per_trial_ns = report.elapsed.as_secs_f64() * 1e9 / config.trial_count as f64;
    println!("  Seed:        {} ({})", report.seed, report.mode);
    println!(
        "  Elapsed:     {:.1} ms",
        report.elapsed.as_secs_f64() * 1000.0
    );
    println!("  Per trial:   {:.1} ns", per_trial_ns);
    println!();

    let trial = if trace {
        // Separate stream so the batch stays reproducible on its own.
        let mut rng = SmallRng::seed_from_u64(report.seed.wrapping_add(1));
        match trace_trial(config.grid_size, &mut rng) {
            Ok(record) => {
                print_trace(&record);
                Some(record)
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                std::process::exit(1);
            }
        }
    } else {
        None
    };

    print_summary(&report.summary);

    if let Some(ref dir) = output {
        let summary_path = Path::new(dir).join("summary.json");
        if let Err(err) = write_json(&report, &summary_path) {
            eprintln!("Failed to write {}: {}", summary_path.display(), err);
            std::process::exit(1);
        }
        println!();
        println!("  Summary:     {}", summary_path.display());

        if let Some(ref record) = trial {
            let trial_path = Path::new(dir).join("trial.json");
            if let Err(err) = write_json(record, &trial_path) {
                eprintln!("Failed to write {}: {}", trial_path.display(), err);
                std::process::exit(1);
            }
            println!("  Trial:       {}", trial_path.display());
        }
    }
}
