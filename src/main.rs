use bugfix_timing::cli::{log_filter, Args, Command};
use bugfix_timing::config::{TrackerConfig, DATA_FILE_ENV};
use bugfix_timing::distribution::day_distribution;
use bugfix_timing::report;
use bugfix_timing::timestamp::{now_local, parse_user_time};
use bugfix_timing::{seed, Tracker};
use chrono::NaiveDateTime;
use clap::{CommandFactory, Parser};
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(verbose: u8) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter(verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn resolve_time(at: Option<&str>) -> Result<NaiveDateTime, Box<dyn std::error::Error>> {
    let now = now_local();
    match at {
        Some(raw) => Ok(parse_user_time(raw, now.date())?),
        None => Ok(now),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    // Commands that never touch the data file.
    match &args.command {
        Command::Completions { shell } => {
            let mut cmd = Args::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut std::io::stdout());
            return Ok(());
        }
        Command::Check { at } => {
            let ts = resolve_time(at.as_deref())?;
            println!("{}", report::format_time_analysis(&ts));
            return Ok(());
        }
        Command::Distribution { json } => {
            let dist = day_distribution();
            if *json {
                println!("{}", serde_json::to_string_pretty(dist)?);
            } else {
                print!("{}", report::format_distribution(dist));
            }
            return Ok(());
        }
        _ => {}
    }

    let config = TrackerConfig::resolve(
        args.config.as_deref(),
        std::env::var(DATA_FILE_ENV).ok(),
        args.data_file.clone(),
    )?;
    let mut tracker = Tracker::load(&config.data_file);

    match args.command {
        Command::Log(log) => {
            let ts = resolve_time(log.at.as_deref())?;
            let attempt = tracker.add_at(log.successful(), log.description, ts);
            print!("{}", report::format_logged(&attempt));
            if let Some(err) = tracker.last_save_error() {
                eprintln!("{} {}", "[warning] attempt not saved:".bright_red(), err);
            }
            println!();
            print!("{}", report::format_statistics(&tracker.statistics()));
        }
        Command::Stats { json } => {
            let stats = tracker.statistics();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", report::format_statistics(&stats));
            }
        }
        Command::Recent { limit, pattern } => {
            let limit = limit.unwrap_or(config.recent_limit);
            let recent = match pattern {
                Some(p) => tracker.recent_matching(limit, p),
                None => tracker.recent(limit),
            };
            if recent.is_empty() {
                println!("No attempts recorded in {}", tracker.path().display());
            }
            for attempt in recent {
                println!("{}", report::format_attempt_line(attempt));
            }
        }
        Command::Seed => {
            for attempt in seed::seed(&mut tracker) {
                println!("{}", report::format_attempt_line(&attempt));
            }
            if let Some(err) = tracker.last_save_error() {
                eprintln!("{} {}", "[warning] sample data not saved:".bright_red(), err);
            }
            println!();
            print!("{}", report::format_statistics(&tracker.statistics()));
        }
        Command::Completions { .. } | Command::Check { .. } | Command::Distribution { .. } => {}
    }

    Ok(())
}
