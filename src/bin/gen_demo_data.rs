use std::path::PathBuf;

use anyhow::Result;

use physical_terminal::demo_data;

const DEFAULT_SEED: u64 = 2025;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let out = parse_out_arg().unwrap_or_else(|| PathBuf::from("data"));
    let seed = parse_seed_arg().unwrap_or(DEFAULT_SEED);

    let written = demo_data::write_demo_leagues(&out, seed)?;
    println!("Demo data written (seed {seed})");
    for path in written {
        println!(" - {}", path.display());
    }
    Ok(())
}

fn parse_out_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--out=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--out" {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    None
}

fn parse_seed_arg() -> Option<u64> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix("--seed=") {
            return raw.trim().parse().ok();
        }
        if arg == "--seed" {
            return args.get(idx + 1).and_then(|raw| raw.trim().parse().ok());
        }
    }
    None
}
