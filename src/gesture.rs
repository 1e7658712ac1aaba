use crate::{
    config::GestureConfig,
    distance::{DistanceSample, cross_hand_distance, landmark_distance},
    error::{HandPoseError, Result},
    types::{
        FingerStateVector, GestureEvent, Handedness, INDEX_TIP, LandmarkSet, MIDDLE_TIP,
        PINKY_TIP, Point2D, RING_TIP, THUMB_IP, THUMB_TIP, TIP_IDS,
    },
};

/// Fingertip paired with the thumb tip, in priority order.
const PINCH_RULES: [(usize, GestureEvent); 4] = [
    (INDEX_TIP, GestureEvent::ThumbIndexPinch),
    (MIDDLE_TIP, GestureEvent::ThumbMiddlePinch),
    (RING_TIP, GestureEvent::ThumbRingPinch),
    (PINKY_TIP, GestureEvent::ThumbPinkyPinch),
];

/// Extended/curled state of every finger of `hand`.
///
/// The thumb compares the tip against the IP joint on the x axis. With
/// `mirrored` frames (flipped before detection) it is extended when the tip
/// is left of the joint, otherwise when it is right of it. Handedness is
/// not consulted, so only one hand reads correctly for a given orientation.
///
/// The other four fingers are extended when the tip is strictly above
/// (smaller y) the joint two places down the same finger.
pub fn classify(hand: &LandmarkSet, mirrored: bool) -> FingerStateVector {
    let points = hand.points();
    FingerStateVector([
        classify_thumb(points[THUMB_TIP], points[THUMB_IP], mirrored),
        classify_finger(points, TIP_IDS[1]),
        classify_finger(points, TIP_IDS[2]),
        classify_finger(points, TIP_IDS[3]),
        classify_finger(points, TIP_IDS[4]),
    ])
}

/// [`classify`] for raw detector output that has not been checked yet.
pub fn classify_points(points: &[Point2D], mirrored: bool) -> Result<FingerStateVector> {
    let hand = LandmarkSet::from_points(points, Handedness::Right)?;
    Ok(classify(&hand, mirrored))
}

fn classify_thumb(tip: Point2D, ip: Point2D, mirrored: bool) -> bool {
    if mirrored { tip.x < ip.x } else { tip.x > ip.x }
}

fn classify_finger(points: &[Point2D], tip: usize) -> bool {
    points[tip].y < points[tip - 2].y
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrossHandDistances {
    pub thumbs: DistanceSample,
    pub index_tips: DistanceSample,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GestureEvaluation {
    pub event: GestureEvent,
    /// Thumb tip to index, middle, ring and pinky tips of the first hand.
    pub pinch_samples: [DistanceSample; 4],
    /// The same samples for the second hand, when there is one. Display
    /// only; the second hand never produces an event.
    pub second_hand_pinch_samples: Option<[DistanceSample; 4]>,
    /// Only present with a second hand; never used to pick the event.
    pub cross_hand: Option<CrossHandDistances>,
}

pub struct GestureEngine {
    config: GestureConfig,
}

impl GestureEngine {
    /// Fails with [`HandPoseError::InvalidThreshold`] for a threshold that is
    /// negative or not finite.
    pub fn new(config: GestureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn classify(&self, hand: &LandmarkSet) -> FingerStateVector {
        classify(hand, self.config.mirrored)
    }

    pub fn evaluate(
        &self,
        hand1: Option<&LandmarkSet>,
        hand2: Option<&LandmarkSet>,
    ) -> Result<GestureEvaluation> {
        let hand1 = hand1.ok_or(HandPoseError::NoHandDetected)?;
        Ok(self.evaluate_hands(hand1, hand2))
    }

    /// [`Self::evaluate`] once the caller has established a first hand.
    pub fn evaluate_hands(
        &self,
        hand1: &LandmarkSet,
        hand2: Option<&LandmarkSet>,
    ) -> GestureEvaluation {
        let pinch_samples = thumb_pinch_samples(hand1);
        let event = self.first_match(&pinch_samples);
        let second_hand_pinch_samples = hand2.map(thumb_pinch_samples);

        let cross_hand = hand2.map(|hand2| CrossHandDistances {
            thumbs: cross_hand_distance(hand1, hand2, THUMB_TIP),
            index_tips: cross_hand_distance(hand1, hand2, INDEX_TIP),
        });

        if !event.is_none() {
            log::debug!(
                "{} hand: {}",
                hand1.handedness().label(),
                event.display_name()
            );
        }

        GestureEvaluation {
            event,
            pinch_samples,
            second_hand_pinch_samples,
            cross_hand,
        }
    }

    /// Pinch rules only, for callers that do not need the distance samples.
    pub fn event_for(&self, hand: &LandmarkSet) -> GestureEvent {
        self.first_match(&thumb_pinch_samples(hand))
    }

    fn first_match(&self, samples: &[DistanceSample; 4]) -> GestureEvent {
        samples
            .iter()
            .zip(PINCH_RULES.iter())
            .find(|(sample, _)| self.is_pinched(sample))
            .map(|(_, (_, event))| *event)
            .unwrap_or_default()
    }

    fn is_pinched(&self, sample: &DistanceSample) -> bool {
        sample.distance <= self.config.pinch_threshold_px
    }
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self {
            config: GestureConfig::default(),
        }
    }
}

fn thumb_pinch_samples(hand: &LandmarkSet) -> [DistanceSample; 4] {
    PINCH_RULES.map(|(tip, _)| landmark_distance(hand, THUMB_TIP, tip))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{INDEX_PIP, NUM_LANDMARKS, sample_hand};

    fn with_points(hand: &LandmarkSet, updates: &[(usize, (i32, i32))]) -> LandmarkSet {
        let mut points = *hand.points();
        for &(idx, p) in updates {
            points[idx] = Point2D::from(p);
        }
        LandmarkSet::new(points, hand.handedness())
    }

    #[test]
    fn open_hand_is_fully_extended() {
        let hand = sample_hand(Handedness::Right);
        assert_eq!(classify(&hand, true), FingerStateVector([true; 5]));
    }

    #[test]
    fn thumb_rule_flips_with_mirroring() {
        let hand = sample_hand(Handedness::Right);
        assert!(classify(&hand, true).thumb());
        assert!(!classify(&hand, false).thumb());

        let crossed = with_points(&hand, &[(THUMB_TIP, (130, 290))]);
        assert!(!classify(&crossed, true).thumb());
        assert!(classify(&crossed, false).thumb());
    }

    #[test]
    fn thumb_tip_level_with_joint_is_curled_either_way() {
        let hand = sample_hand(Handedness::Left);
        let level = with_points(&hand, &[(THUMB_TIP, (110, 290))]);
        assert!(!classify(&level, true).thumb());
        assert!(!classify(&level, false).thumb());
    }

    #[test]
    fn curled_fingers_have_tips_below_their_joints() {
        let hand = sample_hand(Handedness::Right);
        let fist = with_points(
            &hand,
            &[
                (INDEX_TIP, (165, 260)),
                (MIDDLE_TIP, (200, 250)),
                (RING_TIP, (233, 260)),
                (PINKY_TIP, (265, 280)),
            ],
        );
        assert_eq!(
            classify(&fist, true),
            FingerStateVector([true, false, false, false, false])
        );
        assert_eq!(classify(&fist, true).extended_count(), 1);
    }

    #[test]
    fn tip_level_with_joint_is_curled() {
        let hand = sample_hand(Handedness::Right);
        let pip_y = hand.point(INDEX_PIP).y;
        let level = with_points(&hand, &[(INDEX_TIP, (160, pip_y))]);
        assert!(!classify(&level, true).index());

        let one_above = with_points(&hand, &[(INDEX_TIP, (160, pip_y - 1))]);
        assert!(classify(&one_above, true).index());
    }

    #[test]
    fn classify_points_checks_length() {
        let hand = sample_hand(Handedness::Right);
        let fingers = classify_points(hand.points(), true).unwrap();
        assert_eq!(fingers.0.len(), 5);
        assert_eq!(fingers, classify(&hand, true));

        let short = &hand.points()[..NUM_LANDMARKS - 1];
        assert_eq!(
            classify_points(short, true),
            Err(HandPoseError::InvalidLandmarkCount { got: 20 })
        );
        let long = vec![Point2D::default(); NUM_LANDMARKS + 1];
        assert_eq!(
            classify_points(&long, true),
            Err(HandPoseError::InvalidLandmarkCount { got: 22 })
        );
    }

    #[test]
    fn close_thumb_and_index_pinch() {
        let hand = with_points(
            &sample_hand(Handedness::Right),
            &[(THUMB_TIP, (100, 200)), (INDEX_TIP, (110, 205))],
        );
        let engine = GestureEngine::default();
        let evaluation = engine.evaluate(Some(&hand), None).unwrap();
        assert_eq!(evaluation.event, GestureEvent::ThumbIndexPinch);
        assert!((evaluation.pinch_samples[0].distance - 11.18).abs() < 0.01);
        assert_eq!(engine.event_for(&hand), GestureEvent::ThumbIndexPinch);
    }

    #[test]
    fn far_apart_tips_give_no_gesture() {
        let hand = with_points(
            &sample_hand(Handedness::Right),
            &[
                (THUMB_TIP, (100, 200)),
                (INDEX_TIP, (300, 400)),
                (MIDDLE_TIP, (320, 60)),
                (RING_TIP, (400, 150)),
                (PINKY_TIP, (450, 300)),
            ],
        );
        let engine = GestureEngine::default();
        let evaluation = engine.evaluate(Some(&hand), None).unwrap();
        assert_eq!(evaluation.event, GestureEvent::None);
        assert!(evaluation.pinch_samples.iter().all(|s| s.distance > 40.0));
        assert!(evaluation.cross_hand.is_none());
    }

    #[test]
    fn earlier_rule_wins() {
        let hand = with_points(
            &sample_hand(Handedness::Right),
            &[
                (THUMB_TIP, (200, 200)),
                (INDEX_TIP, (220, 200)),
                (MIDDLE_TIP, (205, 205)),
            ],
        );
        let evaluation = GestureEngine::default().evaluate(Some(&hand), None).unwrap();
        assert!(evaluation.pinch_samples[1].distance < evaluation.pinch_samples[0].distance);
        assert_eq!(evaluation.event, GestureEvent::ThumbIndexPinch);
    }

    #[test]
    fn each_rule_is_reachable() {
        let base = with_points(&sample_hand(Handedness::Right), &[(THUMB_TIP, (600, 600))]);
        let engine = GestureEngine::default();
        for (tip, expected) in PINCH_RULES {
            let hand = with_points(&base, &[(tip, (610, 590))]);
            assert_eq!(engine.event_for(&hand), expected);
            assert_eq!(
                engine.evaluate(Some(&hand), None).unwrap().event,
                expected
            );
        }
    }

    #[test]
    fn threshold_is_inclusive_and_configurable() {
        let hand = with_points(
            &sample_hand(Handedness::Right),
            &[(THUMB_TIP, (0, 0)), (INDEX_TIP, (0, 40))],
        );
        assert_eq!(
            GestureEngine::default().event_for(&hand),
            GestureEvent::ThumbIndexPinch
        );

        let strict = GestureEngine::new(GestureConfig::default().with_threshold(39.5)).unwrap();
        assert_eq!(strict.event_for(&hand), GestureEvent::None);

        let touching = GestureEngine::new(GestureConfig::default().with_threshold(0.0)).unwrap();
        let same_spot = with_points(&hand, &[(INDEX_TIP, (0, 0))]);
        assert_eq!(touching.event_for(&same_spot), GestureEvent::ThumbIndexPinch);
    }

    #[test]
    fn engine_rejects_unusable_thresholds() {
        for bad in [f32::NAN, f32::INFINITY, -0.5] {
            let result = GestureEngine::new(GestureConfig::default().with_threshold(bad));
            assert!(matches!(result, Err(HandPoseError::InvalidThreshold(_))));
        }
        let engine = GestureEngine::new(GestureConfig::default().with_threshold(12.0)).unwrap();
        assert_eq!(engine.config().pinch_threshold_px, 12.0);
    }

    #[test]
    fn event_for_agrees_with_evaluate() {
        let engine = GestureEngine::default();
        let base = sample_hand(Handedness::Right);
        let hands = [
            base.clone(),
            with_points(&base, &[(THUMB_TIP, (235, 195))]),
            with_points(&base, &[(THUMB_TIP, (268, 215))]),
            with_points(&base, &[(THUMB_TIP, (5, 5)), (INDEX_TIP, (5, 5)), (PINKY_TIP, (5, 5))]),
        ];
        for hand in &hands {
            assert_eq!(
                engine.event_for(hand),
                engine.evaluate(Some(hand), None).unwrap().event
            );
        }
    }

    #[test]
    fn missing_first_hand_is_an_error() {
        let engine = GestureEngine::default();
        assert_eq!(
            engine.evaluate(None, None),
            Err(HandPoseError::NoHandDetected)
        );
        let hand = sample_hand(Handedness::Left);
        assert_eq!(
            engine.evaluate(None, Some(&hand)),
            Err(HandPoseError::NoHandDetected)
        );
    }

    #[test]
    fn second_hand_adds_observability_only() {
        let engine = GestureEngine::default();
        let hand1 = with_points(
            &sample_hand(Handedness::Right),
            &[(THUMB_TIP, (100, 200)), (INDEX_TIP, (110, 205))],
        );
        // Second hand thumb right next to the first hand's thumb.
        let hand2 = with_points(
            &sample_hand(Handedness::Left),
            &[(THUMB_TIP, (103, 204)), (INDEX_TIP, (400, 205))],
        );

        let alone = engine.evaluate(Some(&hand1), None).unwrap();
        let paired = engine.evaluate(Some(&hand1), Some(&hand2)).unwrap();

        assert_eq!(alone.event, paired.event);
        assert_eq!(alone.pinch_samples, paired.pinch_samples);
        assert!(alone.second_hand_pinch_samples.is_none());
        assert_eq!(engine.classify(&hand1), classify(&hand1, true));

        let cross = paired.cross_hand.unwrap();
        assert_eq!(cross.thumbs.distance, 5.0);
        assert_eq!(cross.thumbs.midpoint, Point2D::new(101, 202));
        assert_eq!(cross.index_tips.distance, 290.0);
    }

    #[test]
    fn cross_hand_closeness_never_fires_an_event() {
        let engine = GestureEngine::default();
        let hand1 = sample_hand(Handedness::Right);
        let hand2 = sample_hand(Handedness::Left);
        let evaluation = engine.evaluate(Some(&hand1), Some(&hand2)).unwrap();
        assert_eq!(evaluation.cross_hand.unwrap().thumbs.distance, 0.0);
        assert_eq!(evaluation.event, engine.event_for(&hand1));
    }

    #[test]
    fn second_hand_pinch_is_measured_but_not_reported() {
        let engine = GestureEngine::default();
        let hand1 = sample_hand(Handedness::Right);
        let hand2 = with_points(
            &sample_hand(Handedness::Left),
            &[(THUMB_TIP, (400, 200)), (RING_TIP, (403, 204))],
        );

        let evaluation = engine.evaluate(Some(&hand1), Some(&hand2)).unwrap();
        assert_eq!(evaluation.event, GestureEvent::None);
        assert_eq!(engine.event_for(&hand2), GestureEvent::ThumbRingPinch);

        let second = evaluation.second_hand_pinch_samples.unwrap();
        assert_eq!(second[2].point_a, Point2D::new(400, 200));
        assert_eq!(second[2].point_b, hand2.point(RING_TIP));
        assert_eq!(second[2].distance, 5.0);
        assert!(second[0].distance > 40.0);
    }
}
