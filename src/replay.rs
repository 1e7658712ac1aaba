//! Line-based landmark text format used to replay detector output.
//!
//! One line per frame. Hands are separated by `|`; each hand is a
//! handedness tag (`L`, `R`, `Left` or `Right`) followed by 21 `x,y` pairs.
//! An empty line is a frame without hands, `#` starts a comment line.
//!
//! ```text
//! # two hands
//! R 200,400 160,380 ... 270,210 | L 410,400 ... 330,210
//!
//! L 200,400 160,380 ... 270,210
//! ```

use std::io::BufRead;

use thiserror::Error;

use crate::{
    error::HandPoseError,
    pipeline::DetectedFrame,
    types::{Handedness, LandmarkSet, Point2D},
};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("line {line}: unknown handedness {tag:?} (expected L or R)")]
    Handedness { line: usize, tag: String },
    #[error("line {line}: malformed point {token:?} (expected x,y)")]
    Point { line: usize, token: String },
    #[error("line {line}: {source}")]
    Landmarks {
        line: usize,
        #[source]
        source: HandPoseError,
    },
    #[error("failed to read replay input")]
    Io(#[from] std::io::Error),
}

/// Parses one frame line. `line` is the 1-based line number, kept on the
/// frame and used in errors.
pub fn parse_frame_line(text: &str, line: usize) -> Result<DetectedFrame, ReplayError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(DetectedFrame::new(Vec::new()).with_source_line(line));
    }

    let hands = trimmed
        .split('|')
        .map(|hand| parse_hand(hand, line))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DetectedFrame::new(hands).with_source_line(line))
}

fn parse_hand(text: &str, line: usize) -> Result<LandmarkSet, ReplayError> {
    let mut tokens = text.split_whitespace();
    let tag = tokens.next().unwrap_or_default();
    let handedness = parse_handedness(tag).ok_or_else(|| ReplayError::Handedness {
        line,
        tag: tag.to_string(),
    })?;

    let points = tokens
        .map(|token| {
            parse_point(token).ok_or_else(|| ReplayError::Point {
                line,
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    LandmarkSet::from_points(&points, handedness)
        .map_err(|source| ReplayError::Landmarks { line, source })
}

fn parse_handedness(tag: &str) -> Option<Handedness> {
    match tag.to_ascii_lowercase().as_str() {
        "l" | "left" => Some(Handedness::Left),
        "r" | "right" => Some(Handedness::Right),
        _ => None,
    }
}

fn parse_point(token: &str) -> Option<Point2D> {
    let (x, y) = token.split_once(',')?;
    Some(Point2D {
        x: x.trim().parse().ok()?,
        y: y.trim().parse().ok()?,
    })
}

fn is_comment(text: &str) -> bool {
    text.trim_start().starts_with('#')
}

/// Reads every frame of a replay source. Comment lines produce no frame.
pub fn read_frames<R: BufRead>(reader: R) -> Result<Vec<DetectedFrame>, ReplayError> {
    let mut frames = Vec::new();
    for (idx, text) in reader.lines().enumerate() {
        let text = text?;
        if is_comment(&text) {
            continue;
        }
        frames.push(parse_frame_line(&text, idx + 1)?);
    }
    Ok(frames)
}

/// Streams frames into `on_frame` as lines arrive. Bad lines are logged and
/// skipped so a live source keeps going; read errors end the stream.
pub fn stream_frames<R, F>(reader: R, mut on_frame: F) -> Result<usize, ReplayError>
where
    R: BufRead,
    F: FnMut(DetectedFrame) -> bool,
{
    let mut delivered = 0;
    for (idx, text) in reader.lines().enumerate() {
        let text = text?;
        if is_comment(&text) {
            continue;
        }
        match parse_frame_line(&text, idx + 1) {
            Ok(frame) => {
                delivered += 1;
                if !on_frame(frame) {
                    break;
                }
            }
            Err(err) => log::warn!("skipping frame: {err}"),
        }
    }
    Ok(delivered)
}
