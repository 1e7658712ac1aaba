use std::env;

use crate::{
    error::{HandPoseError, Result},
    types::{THUMB_TIP, TIP_IDS, WRIST},
};

pub const DEFAULT_PINCH_THRESHOLD_PX: f32 = 40.0;

const THRESHOLD_ENV: &str = "PINCH_THRESHOLD_PX";
const MIRRORED_ENV: &str = "PINCH_MIRRORED";

/// Tunables of the classifier and rule engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Maximum thumb-to-fingertip distance, in pixels, that counts as a
    /// pinch. Calibrated for a 640x480 webcam at arm's length; it does not
    /// scale with hand size.
    pub pinch_threshold_px: f32,
    /// The frame was flipped horizontally before detection (selfie view).
    /// Decides which direction of the thumb tip counts as extended.
    pub mirrored: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_threshold_px: DEFAULT_PINCH_THRESHOLD_PX,
            mirrored: true,
        }
    }
}

impl GestureConfig {
    pub fn with_threshold(mut self, pinch_threshold_px: f32) -> Self {
        self.pinch_threshold_px = pinch_threshold_px;
        self
    }

    pub fn with_mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.pinch_threshold_px.is_finite() || self.pinch_threshold_px < 0.0 {
            return Err(HandPoseError::InvalidThreshold(self.pinch_threshold_px));
        }
        Ok(())
    }

    /// Defaults overridden by `PINCH_THRESHOLD_PX` and `PINCH_MIRRORED`.
    /// Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(THRESHOLD_ENV) {
            match raw.trim().parse::<f32>() {
                Ok(value) => config.pinch_threshold_px = value,
                Err(err) => log::warn!("ignoring {THRESHOLD_ENV}={raw:?}: {err}"),
            }
        }

        if let Some(raw) = lookup(MIRRORED_ENV) {
            match parse_flag(&raw) {
                Some(value) => config.mirrored = value,
                None => log::warn!("ignoring {MIRRORED_ENV}={raw:?}: expected true/false"),
            }
        }

        config
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Marker sizes and colours for whatever draws the overlay. BGR order,
/// as the capture side hands frames over in BGR.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderStyle {
    pub landmark_radius: i32,
    pub distance_marker_radius: i32,
    pub font_scale: f32,
    pub font_thickness: i32,
    pub line_thickness: i32,
    pub wrist_color: [u8; 3],
    pub thumb_tip_color: [u8; 3],
    pub fingertip_color: [u8; 3],
    pub joint_color: [u8; 3],
    pub distance_color: [u8; 3],
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            landmark_radius: 10,
            distance_marker_radius: 5,
            font_scale: 1.5,
            font_thickness: 2,
            line_thickness: 3,
            wrist_color: [0, 0, 255],
            thumb_tip_color: [255, 0, 0],
            fingertip_color: [0, 255, 0],
            joint_color: [255, 255, 255],
            distance_color: [255, 0, 255],
        }
    }
}

impl RenderStyle {
    /// Marker colour for landmark `index`: wrist, thumb tip, the other four
    /// fingertips, then every remaining joint.
    pub fn landmark_color(&self, index: usize) -> [u8; 3] {
        match index {
            WRIST => self.wrist_color,
            THUMB_TIP => self.thumb_tip_color,
            tip if TIP_IDS.contains(&tip) => self.fingertip_color,
            _ => self.joint_color,
        }
    }
}
