use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
    thread,
};

use anyhow::{Context, Result, bail};
use crossbeam_channel::unbounded;
use pinch_gestures::{
    GestureConfig,
    pipeline::{FrameProcessor, FrameReport, start_evaluator},
    replay,
};

const USAGE: &str = "\
usage: pinch-gestures [--threshold <PX>] [--no-mirror] [FILE]

Reads landmark frames from FILE, or streams them from stdin when no FILE is
given, and prints finger states and pinch gestures per frame.

  --threshold <PX>  pinch distance in pixels (default 40, env PINCH_THRESHOLD_PX)
  --no-mirror       frames were not flipped horizontally (env PINCH_MIRRORED)";

struct Options {
    config: GestureConfig,
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let Some(options) = parse_args(std::env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    match options.input {
        Some(path) => replay_file(&path, options.config),
        None => stream_stdin(options.config),
    }
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<Option<Options>> {
    let mut config = GestureConfig::from_env();
    let mut input = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--no-mirror" => config.mirrored = false,
            "--threshold" => {
                let raw = args.next().context("--threshold needs a value")?;
                config.pinch_threshold_px = raw
                    .parse()
                    .with_context(|| format!("invalid --threshold {raw:?}"))?;
            }
            flag if flag.starts_with('-') => bail!("unknown option {flag}\n\n{USAGE}"),
            path => {
                if input.replace(PathBuf::from(path)).is_some() {
                    bail!("only one input file may be given");
                }
            }
        }
    }

    Ok(Some(Options { config, input }))
}

fn replay_file(path: &Path, config: GestureConfig) -> Result<()> {
    let processor = FrameProcessor::new(config).context("invalid gesture configuration")?;
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let frames = replay::read_frames(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))?;

    log::info!("replaying {} frames from {}", frames.len(), path.display());

    for (idx, frame) in frames.iter().enumerate() {
        print_report(&processor.process(frame), idx + 1);
    }
    Ok(())
}

fn stream_stdin(config: GestureConfig) -> Result<()> {
    let (frame_tx, frame_rx) = unbounded();
    let (report_tx, report_rx) = unbounded();
    let evaluator = start_evaluator(config, frame_rx, report_tx)
        .context("invalid gesture configuration")?;

    let reader = thread::spawn(move || {
        let stdin = io::stdin();
        replay::stream_frames(stdin.lock(), |frame| frame_tx.send(frame).is_ok())
    });

    for (idx, report) in report_rx.iter().enumerate() {
        print_report(&report, idx + 1);
    }

    let delivered = match reader.join() {
        Ok(result) => result.context("failed to read frames from stdin")?,
        Err(_) => bail!("stdin reader thread panicked"),
    };
    if evaluator.join().is_err() {
        bail!("gesture evaluator thread panicked");
    }

    log::info!("read {delivered} frames from stdin");
    Ok(())
}

/// Prints one report. Lines are tagged with the input line of the frame,
/// or `fallback_no` when the frame did not come from a replay source.
fn print_report(report: &FrameReport, fallback_no: usize) {
    for line in report_lines(report) {
        println!("[{}] {line}", report.source_line.unwrap_or(fallback_no));
    }
}

fn report_lines(report: &FrameReport) -> Vec<String> {
    if !report.has_hands() {
        return Vec::new();
    }

    let mut lines = report.summary_lines();
    lines.push(format!("Total fingers = {}", report.total_fingers()));

    if let Some(evaluation) = &report.evaluation {
        if !evaluation.event.is_none() {
            lines.push(report.display_text());
        }
        if let Some(second) = &evaluation.second_hand_pinch_samples {
            let distances: Vec<String> = second
                .iter()
                .map(|sample| format!("{:.1}", sample.distance))
                .collect();
            lines.push(format!("second hand thumb to tips: {}px", distances.join(", ")));
        }
        if let Some(cross) = &evaluation.cross_hand {
            lines.push(format!(
                "thumbs {:.1}px, index tips {:.1}px apart",
                cross.thumbs.distance, cross.index_tips.distance
            ));
        }
    }
    lines
}
