use std::time::Instant;

use crate::{
    config::GestureConfig,
    error::Result,
    gesture::{GestureEngine, GestureEvaluation},
    types::{FingerStateVector, HandBounds, Handedness, LandmarkSet},
};

/// Hands beyond this are ignored; the detector runs with two hands max.
pub const MAX_HANDS: usize = 2;

/// Detector output for one frame.
#[derive(Clone, Debug)]
pub struct DetectedFrame {
    pub hands: Vec<LandmarkSet>,
    pub timestamp: Instant,
    /// 1-based input line the frame was read from, for replayed input.
    pub source_line: Option<usize>,
}

impl DetectedFrame {
    pub fn new(hands: Vec<LandmarkSet>) -> Self {
        Self {
            hands,
            timestamp: Instant::now(),
            source_line: None,
        }
    }

    pub fn with_source_line(mut self, line: usize) -> Self {
        self.source_line = Some(line);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HandReport {
    pub handedness: Handedness,
    pub fingers: FingerStateVector,
    pub bounds: HandBounds,
}

impl HandReport {
    pub fn summary(&self) -> String {
        let center = self.bounds.center();
        format!(
            "{} Hand, Center = ({}, {}), Fingers = {:?}",
            self.handedness.label(),
            center.x,
            center.y,
            self.fingers.as_bits()
        )
    }
}

#[derive(Clone, Debug)]
pub struct FrameReport {
    pub timestamp: Instant,
    pub source_line: Option<usize>,
    pub hands: Vec<HandReport>,
    /// `None` when the frame had no hands.
    pub evaluation: Option<GestureEvaluation>,
}

impl FrameReport {
    pub fn has_hands(&self) -> bool {
        !self.hands.is_empty()
    }

    pub fn summary_lines(&self) -> Vec<String> {
        self.hands.iter().map(HandReport::summary).collect()
    }

    /// Extended fingers of the first hand, 0 without hands.
    pub fn total_fingers(&self) -> usize {
        self.hands
            .first()
            .map_or(0, |hand| hand.fingers.extended_count())
    }

    pub fn display_text(&self) -> String {
        match &self.evaluation {
            Some(evaluation) => format!(
                "{}{}",
                evaluation.event.emoji(),
                evaluation.event.display_name()
            ),
            None => "no hand detected".to_string(),
        }
    }
}

pub struct FrameProcessor {
    engine: GestureEngine,
}

impl FrameProcessor {
    pub fn new(config: GestureConfig) -> Result<Self> {
        Ok(Self {
            engine: GestureEngine::new(config)?,
        })
    }

    pub fn config(&self) -> &GestureConfig {
        self.engine.config()
    }

    pub fn process(&self, frame: &DetectedFrame) -> FrameReport {
        if frame.hands.len() > MAX_HANDS {
            log::debug!(
                "ignoring {} hands beyond the first {MAX_HANDS}",
                frame.hands.len() - MAX_HANDS
            );
        }
        let hands = &frame.hands[..frame.hands.len().min(MAX_HANDS)];

        let reports = hands
            .iter()
            .map(|hand| HandReport {
                handedness: hand.handedness(),
                fingers: self.engine.classify(hand),
                bounds: hand.bounds(),
            })
            .collect();

        let evaluation = hands
            .first()
            .map(|first| self.engine.evaluate_hands(first, hands.get(1)));

        FrameReport {
            timestamp: frame.timestamp,
            source_line: frame.source_line,
            hands: reports,
            evaluation,
        }
    }
}

impl Default for FrameProcessor {
    fn default() -> Self {
        Self {
            engine: GestureEngine::default(),
        }
    }
}
