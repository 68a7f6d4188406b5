use dice_notation::roll::{error_message, format, FormatOptions};
use dice_notation::Limits;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn limits_from_env() -> Limits {
    match std::env::var("DICE_MAX_DICE").ok().and_then(|s| s.parse().ok()) {
        Some(max) => Limits::max_dice(max),
        None => Limits::unbounded(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let limits = limits_from_env();
    let options = FormatOptions::default();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    print!("> ");
    io::stdout().flush()?;
    while let Some(Ok(line)) = lines.next() {
        if !line.trim().is_empty() {
            match dice_notation::evaluate_with_limits(&line, rand::thread_rng(), limits) {
                Ok(result) => println!("{}", format(&result, &options)),
                Err(why) => eprintln!("{}", error_message(why)),
            }
        }
        print!("> ");
        io::stdout().flush()?;
    }
    Ok(())
}
