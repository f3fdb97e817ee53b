#![forbid(unsafe_code)]

//! `duet`: drives a deterministic demo engine through the two-worker frame
//! loop, one stdout line per presented frame.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use duet_loop::{
    EngineError, FrameLoop, LoopConfig, LoopControl, PresentBackend, PresentError, Presentation,
    QuitSource, SharedQuitFlag, Simulation,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "duet",
    about = "Two-worker frame loop runner (simulation + presentation) with a demo engine",
    group(
        ArgGroup::new("stop")
            .required(true)
            .args(["max_frames", "max_ms"])
    )
)]
struct Args {
    /// Stop after simulating at most N frames.
    #[arg(long)]
    max_frames: Option<u64>,

    /// Stop after running for at most N milliseconds of host time.
    #[arg(long)]
    max_ms: Option<u64>,

    /// Target frame interval in milliseconds (0 disables pacing).
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Suppress per-frame output; only the run summary is printed.
    #[arg(long)]
    quiet: bool,
}

/// One presented frame of the demo: a triangle wave sampled per tick.
#[derive(Debug)]
struct DemoFrame {
    seq: u64,
    amplitude: u32,
}

/// Deterministic demo simulation. The tick counter is the only state; every
/// frame is derived from it, so runs with the same bounds are identical.
struct DemoSimulation {
    ticks: u64,
    max_frames: Option<u64>,
}

impl Simulation for DemoSimulation {
    type Frame = DemoFrame;

    fn startup(&mut self) -> Result<(), EngineError> {
        self.ticks = 0;
        Ok(())
    }

    fn step(&mut self) -> Result<(DemoFrame, LoopControl), EngineError> {
        self.ticks += 1;
        let phase = (self.ticks % 32) as u32;
        let amplitude = if phase < 16 { phase } else { 31 - phase };
        let control = match self.max_frames {
            Some(max) if self.ticks >= max => LoopControl::Break,
            _ => LoopControl::Continue,
        };
        Ok((
            DemoFrame {
                seq: self.ticks,
                amplitude,
            },
            control,
        ))
    }
}

/// Writes one line per frame to stdout. The matching backend's buffer swap
/// is the stdout flush, so a frame only becomes visible after its swap.
struct ConsolePresenter {
    out: io::Stdout,
    quiet: bool,
}

impl Presentation for ConsolePresenter {
    type Frame = DemoFrame;

    fn present(&mut self, frame: DemoFrame) -> Result<(), EngineError> {
        if self.quiet {
            return Ok(());
        }
        let bar = "#".repeat(frame.amplitude as usize);
        writeln!(self.out, "frame {:>5} |{:<15}|", frame.seq, bar)
            .map_err(|err| EngineError::msg(format!("stdout write failed: {err}")))
    }
}

struct FlushBackend {
    out: io::Stdout,
}

impl PresentBackend for FlushBackend {
    fn swap_buffers(&mut self) -> Result<(), PresentError> {
        self.out
            .flush()
            .map_err(|err| PresentError::msg(format!("stdout flush failed: {err}")))
    }
}

/// Stop inputs that arrive from outside the engine: Ctrl-C and the optional
/// wall-clock deadline.
struct CliQuit {
    interrupted: SharedQuitFlag,
    deadline: Option<Instant>,
}

impl QuitSource for CliQuit {
    fn quit_requested(&mut self) -> bool {
        if self.interrupted.is_requested() {
            return true;
        }
        matches!(self.deadline, Some(deadline) if Instant::now() >= deadline)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let interrupted = SharedQuitFlag::new();
    let handler_flag = interrupted.clone();
    ctrlc::set_handler(move || handler_flag.request_quit())
        .context("failed to install Ctrl-C handler")?;

    let quit = CliQuit {
        interrupted,
        deadline: args
            .max_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms)),
    };
    let config = LoopConfig {
        frame_interval: Duration::from_millis(args.frame_ms),
    };
    debug!(?config, "starting frame loop");

    let summary = FrameLoop::new(
        DemoSimulation {
            ticks: 0,
            max_frames: args.max_frames,
        },
        ConsolePresenter {
            out: io::stdout(),
            quiet: args.quiet,
        },
        FlushBackend { out: io::stdout() },
        quit,
        config,
    )
    .run()?;

    eprintln!(
        "presented {} of {} simulated frames in {} ms",
        summary.frames_presented,
        summary.frames_simulated,
        summary.wall_time.as_millis()
    );
    Ok(())
}
