use std::path::PathBuf;

use clap::Parser;

use traj_nojump::config::RunConfig;
use traj_nojump::executor::Executor;
use traj_nojump::io::{frames_to_json, read_frames_json, write_frames_json};
use traj_nojump::nojump::NoJumpTransform;
use traj_nojump::TrajResult;

#[derive(Parser)]
#[command(
    name = "traj-nojump",
    version,
    about = "Remove periodic-boundary jumps from a wrapped trajectory"
)]
struct Cli {
    /// Frames document (JSON) with wrapped positions and per-frame boxes.
    #[arg(short, long)]
    input: PathBuf,
    /// Run configuration (JSON or YAML).
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Output path; prints to stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(long)]
    no_check_continuity: bool,
    #[arg(long)]
    stride: Option<usize>,
    #[arg(long)]
    deny_warnings: bool,
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(err) = run_cli() {
        return Err(err.to_string());
    }
    Ok(())
}

fn run_cli() -> TrajResult<()> {
    let cli = Cli::parse();
    let mut cfg = match &cli.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if cli.no_check_continuity {
        cfg.nojump.check_continuity = false;
    }
    if let Some(stride) = cli.stride {
        cfg.nojump.stride = stride;
    }
    cfg.deny_warnings |= cli.deny_warnings;
    cfg.validate()?;

    let mut traj = read_frames_json(&cli.input)?;
    let mut exec = Executor::with_transform(NoJumpTransform::from_config(cfg.nojump)?)
        .with_deny_warnings(cfg.deny_warnings);
    let out = exec.run_selection(&mut traj, &cfg.selection())?;
    if out.has_warnings() {
        log::debug!("{} continuity warnings in this run", out.warnings.len());
    }
    match cli.output {
        Some(path) => write_frames_json(&path, &out.frames)?,
        None => println!("{}", frames_to_json(&out.frames)?),
    }
    Ok(())
}
