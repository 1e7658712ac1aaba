use crate::error::{HandPoseError, Result};

pub const NUM_LANDMARKS: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Fingertips in output order: thumb, index, middle, ring, pinky.
pub const TIP_IDS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// Pixel coordinates inside the frame the landmarks were detected in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point2D {
    pub x: i32,
    pub y: i32,
}

impl Point2D {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point2D {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn label(&self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
        }
    }
}

/// One detected hand for one frame. The landmark order is the fixed
/// anatomical numbering (see the index constants in this module).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LandmarkSet {
    points: [Point2D; NUM_LANDMARKS],
    handedness: Handedness,
}

impl LandmarkSet {
    pub fn new(points: [Point2D; NUM_LANDMARKS], handedness: Handedness) -> Self {
        Self { points, handedness }
    }

    /// Builds a set from detector output, rejecting anything that is not
    /// exactly 21 points.
    pub fn from_points(points: &[Point2D], handedness: Handedness) -> Result<Self> {
        let points: [Point2D; NUM_LANDMARKS] =
            points
                .try_into()
                .map_err(|_| HandPoseError::InvalidLandmarkCount { got: points.len() })?;
        Ok(Self { points, handedness })
    }

    pub fn points(&self) -> &[Point2D; NUM_LANDMARKS] {
        &self.points
    }

    pub fn point(&self, index: usize) -> Point2D {
        self.points[index]
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    pub fn bounds(&self) -> HandBounds {
        HandBounds::enclosing(&self.points)
    }
}

/// Axis-aligned box around all landmarks of a hand. The extents are
/// unsigned so any pair of `i32` coordinates fits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl HandBounds {
    fn enclosing(points: &[Point2D]) -> Self {
        let (min_x, max_x, min_y, max_y) = points.iter().fold(
            (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
            |acc, p| (acc.0.min(p.x), acc.1.max(p.x), acc.2.min(p.y), acc.3.max(p.y)),
        );

        Self {
            x: min_x,
            y: min_y,
            width: max_x.abs_diff(min_x),
            height: max_y.abs_diff(min_y),
        }
    }

    /// Box center, rounded down on both axes.
    pub fn center(&self) -> Point2D {
        Point2D {
            x: offset_by_half(self.x, self.width),
            y: offset_by_half(self.y, self.height),
        }
    }
}

fn offset_by_half(origin: i32, extent: u32) -> i32 {
    // Stays between origin and origin + extent, both valid i32 values.
    (origin as i64 + (extent / 2) as i64) as i32
}

/// Extended (`true`) or curled (`false`) per finger: thumb, index, middle,
/// ring, pinky.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerStateVector(pub [bool; 5]);

impl FingerStateVector {
    pub fn thumb(&self) -> bool {
        self.0[0]
    }

    pub fn index(&self) -> bool {
        self.0[1]
    }

    pub fn middle(&self) -> bool {
        self.0[2]
    }

    pub fn ring(&self) -> bool {
        self.0[3]
    }

    pub fn pinky(&self) -> bool {
        self.0[4]
    }

    pub fn extended_count(&self) -> usize {
        self.0.iter().filter(|extended| **extended).count()
    }

    pub fn as_bits(&self) -> [u8; 5] {
        self.0.map(u8::from)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureEvent {
    #[default]
    None,
    ThumbIndexPinch,
    ThumbMiddlePinch,
    ThumbRingPinch,
    ThumbPinkyPinch,
}

impl GestureEvent {
    pub fn is_none(&self) -> bool {
        matches!(self, GestureEvent::None)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            GestureEvent::None => "no gesture",
            GestureEvent::ThumbIndexPinch => "thumb + index",
            GestureEvent::ThumbMiddlePinch => "thumb + middle",
            GestureEvent::ThumbRingPinch => "thumb + ring",
            GestureEvent::ThumbPinkyPinch => "thumb + pinky",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            GestureEvent::None => "⋯ ",
            GestureEvent::ThumbIndexPinch => "🤏 ",
            GestureEvent::ThumbMiddlePinch => "👌 ",
            GestureEvent::ThumbRingPinch => "🤞 ",
            GestureEvent::ThumbPinkyPinch => "🤙 ",
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_hand(handedness: Handedness) -> LandmarkSet {
    // Open palm facing the camera, fingers pointing up, image y growing down.
    let points = [
        (200, 400), // wrist
        (160, 380),
        (130, 350),
        (110, 320),
        (90, 290), // thumb tip
        (170, 280),
        (165, 230),
        (162, 200),
        (160, 170), // index tip
        (200, 270),
        (200, 215),
        (200, 180),
        (200, 145), // middle tip
        (230, 280),
        (233, 230),
        (235, 200),
        (237, 170), // ring tip
        (260, 295),
        (265, 260),
        (268, 235),
        (270, 210), // pinky tip
    ]
    .map(Point2D::from);
    LandmarkSet::new(points, handedness)
}
