use std::thread;

use crossbeam_channel::{Receiver, Sender};

use super::frame::{DetectedFrame, FrameProcessor, FrameReport};
use crate::{config::GestureConfig, error::Result};

/// Runs the frame processor on its own thread. Frames that arrive while a
/// previous one is being processed are skipped in favour of the newest.
/// The thread ends once the frame sender is dropped or the report receiver
/// goes away. An invalid `config` is reported before any thread starts.
pub fn start_evaluator(
    config: GestureConfig,
    frame_rx: Receiver<DetectedFrame>,
    report_tx: Sender<FrameReport>,
) -> Result<thread::JoinHandle<()>> {
    let processor = FrameProcessor::new(config)?;
    log::info!(
        "starting gesture evaluator (pinch threshold {:.1}px, mirrored: {})",
        config.pinch_threshold_px,
        config.mirrored
    );

    Ok(thread::spawn(move || {
        run_worker_loop(processor, frame_rx, report_tx);
        log::info!("gesture evaluator stopped");
    }))
}

fn run_worker_loop(
    processor: FrameProcessor,
    frame_rx: Receiver<DetectedFrame>,
    report_tx: Sender<FrameReport>,
) {
    while let Some(frame) = recv_latest_frame(&frame_rx) {
        let report = processor.process(&frame);
        if report_tx.send(report).is_err() {
            log::debug!("report receiver dropped, shutting down evaluator");
            break;
        }
    }
}

fn recv_latest_frame(frame_rx: &Receiver<DetectedFrame>) -> Option<DetectedFrame> {
    let mut frame = frame_rx.recv().ok()?;
    let mut skipped = 0usize;
    while let Ok(newer) = frame_rx.try_recv() {
        frame = newer;
        skipped += 1;
    }
    if skipped > 0 {
        log::debug!("skipped {skipped} stale frames");
    }
    Some(frame)
}
