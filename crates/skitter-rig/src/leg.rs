//! Inverse-kinematics legs and their gait state machine
//!
//! A leg binds to a chain of segments ending in a foot. Every tick the chain
//! is solved so the foot approaches its goal, then the gait decides whether
//! the foot stays planted or swings toward a new stride goal.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use crate::angle::wrap_angle;
use crate::error::{Result, RigError};
use crate::node::{NodeRef, SegmentId};
use crate::rng::GaitRng;
use crate::skeleton::Skeleton;

/// Gait phase of a single leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GaitPhase {
    /// Foot holds its goal
    #[default]
    Planted,
    /// Foot is travelling toward a new stride goal
    Swinging,
}

/// Stride radius as a fraction of the initial hip-to-foot distance
pub const REACH_FACTOR: f32 = 0.9;

/// Foot drift from its goal that lifts a planted leg
pub const PLANT_TOLERANCE: f32 = 1.0;

/// Squared forwardness change below which a swinging foot has landed
pub const LANDING_THRESHOLD: f32 = 1.0;

/// One IK-driven leg bound to a suffix of the skeleton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegSystem {
    chain: Vec<SegmentId>,
    hip: NodeRef,
    foot: SegmentId,
    speed: f32,
    goal: Vec2,
    phase: GaitPhase,
    forwardness: f32,
    reach: f32,
    swing: f32,
    swing_offset: f32,
}

impl LegSystem {
    /// Bind a leg to `foot` and up to `length` of its ancestors.
    ///
    /// The chain stops early when the root body is reached. `heading` is the
    /// creature's orientation, used to fix the natural stride direction.
    pub fn new(
        skeleton: &Skeleton,
        foot: SegmentId,
        length: usize,
        speed: f32,
        heading: f32,
    ) -> Result<Self> {
        let foot_pos = skeleton
            .segment(foot)
            .ok_or(RigError::UnknownSegment(foot))?
            .position;

        let mut chain = Vec::with_capacity(length.max(1));
        let mut node = NodeRef::Segment(foot);
        for _ in 0..length.max(1) {
            let NodeRef::Segment(id) = node else {
                break;
            };
            chain.push(id);
            node = skeleton.seg(id).parent;
        }
        chain.reverse();

        let hip = skeleton.seg(chain[0]).parent;
        let (hip_pos, hip_abs) = skeleton.pose_of(hip);
        let to_foot = foot_pos - hip_pos;

        let relative = wrap_angle(heading - to_foot.y.atan2(to_foot.x));
        let side = if relative < 0.0 { 1.0 } else { -1.0 };

        log::debug!(
            "Leg on {} bound {} of {} requested links to {}",
            foot,
            chain.len(),
            length,
            hip
        );

        Ok(Self {
            chain,
            hip,
            foot,
            speed,
            goal: foot_pos,
            phase: GaitPhase::Planted,
            forwardness: 0.0,
            reach: REACH_FACTOR * to_foot.length(),
            swing: -relative + side * FRAC_PI_2,
            swing_offset: heading - hip_abs,
        })
    }

    /// Chain segments from hip side to foot
    pub fn chain(&self) -> &[SegmentId] {
        &self.chain
    }

    pub fn hip(&self) -> NodeRef {
        self.hip
    }

    pub fn foot(&self) -> SegmentId {
        self.foot
    }

    pub fn goal(&self) -> Vec2 {
        self.goal
    }

    pub fn phase(&self) -> GaitPhase {
        self.phase
    }

    pub fn forwardness(&self) -> f32 {
        self.forwardness
    }

    pub fn reach(&self) -> f32 {
        self.reach
    }

    /// Stride speed: how far the foot advances toward its goal per tick
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_planted(&self) -> bool {
        self.phase == GaitPhase::Planted
    }

    /// Solve the chain so the foot moves up to `speed` toward `target`.
    ///
    /// A single backward pass places every joint on the straight line toward
    /// the previously placed one, then a forward pass rederives angles and
    /// re-poses side branches (toes) that are not part of the chain.
    ///
    /// # Panics
    /// If `skeleton` is not the one this leg was bound to.
    pub fn move_to(&self, skeleton: &mut Skeleton, target: Vec2) {
        skeleton.update_relative(self.chain[0], true, true);

        let foot_pos = skeleton.seg(self.foot).position;
        let mut anchor = target;
        let mut len = (target.distance(foot_pos) - self.speed).max(0.0);

        for &id in self.chain.iter().rev() {
            let seg = skeleton.seg_mut(id);
            let away = seg.position - anchor;
            seg.position = anchor + Vec2::from_angle(away.y.atan2(away.x)) * len;
            anchor = seg.position;
            len = seg.size;
        }

        for &id in &self.chain {
            let (parent_pos, parent_abs) = skeleton.parent_pose(id);
            let seg = skeleton.seg_mut(id);
            let offset = seg.position - parent_pos;
            seg.abs_angle = offset.y.atan2(offset.x);
            seg.rel_angle = seg.abs_angle - parent_abs;

            for i in 0..skeleton.seg(id).children.len() {
                let child = skeleton.seg(id).children[i];
                if !self.chain.contains(&child) {
                    skeleton.update_relative(child, true, false);
                }
            }
        }
    }

    /// Solve toward the current goal, then advance the gait
    ///
    /// # Panics
    /// If `skeleton` is not the one this leg was bound to.
    pub fn update<R: GaitRng + ?Sized>(&mut self, skeleton: &mut Skeleton, rng: &mut R) {
        self.move_to(skeleton, self.goal);

        let foot = skeleton.seg(self.foot).position;
        let (hip_pos, hip_abs) = skeleton.pose_of(self.hip);

        match self.phase {
            GaitPhase::Planted => {
                if foot.distance(self.goal) > PLANT_TOLERANCE {
                    let heading = self.swing + hip_abs + self.swing_offset;
                    let stride = hip_pos + Vec2::from_angle(heading) * self.reach;
                    let jitter = Vec2::new(rng.jitter(), rng.jitter()) * self.reach / 2.0;

                    self.phase = GaitPhase::Swinging;
                    self.goal = stride + jitter;
                    log::trace!("{} lifted, new goal {:?}", self.foot, self.goal);
                }
            }
            GaitPhase::Swinging => {
                let to_foot = foot - hip_pos;
                let theta = to_foot.y.atan2(to_foot.x) - hip_abs;
                let forwardness = to_foot.length() * theta.cos();
                let delta = self.forwardness - forwardness;
                self.forwardness = forwardness;

                if delta * delta < LANDING_THRESHOLD {
                    self.phase = GaitPhase::Planted;
                    self.goal = foot;
                    log::trace!("{} landed at {:?}", self.foot, foot);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::SegmentSpec;
    use rand::SeedableRng;
    use rand::rngs::mock::StepRng;
    use rand_xoshiro::Xoshiro256StarStar;
    use std::f32::consts::PI;

    const EPS: f32 = 1e-3;

    /// Jitter source that always yields 0
    fn no_jitter() -> StepRng {
        StepRng::new(0x8000_0000, 0)
    }

    fn straight_chain(count: usize, size: f32) -> (Skeleton, Vec<SegmentId>) {
        let mut skeleton = Skeleton::new(Vec2::ZERO, 0.0);
        let mut ids = Vec::new();
        let mut parent = NodeRef::Root;
        for _ in 0..count {
            let id = skeleton
                .add_segment(parent, SegmentSpec::new(size, 0.0, 2.0 * PI, 1.0))
                .unwrap();
            ids.push(id);
            parent = id.into();
        }
        (skeleton, ids)
    }

    #[test]
    fn test_chain_collection() {
        let (skeleton, ids) = straight_chain(4, 5.0);
        let leg = LegSystem::new(&skeleton, ids[3], 2, 1.0, 0.0).unwrap();
        assert_eq!(leg.chain(), &[ids[2], ids[3]]);
        assert_eq!(leg.hip(), NodeRef::Segment(ids[1]));
        assert_eq!(leg.goal(), skeleton.segment(ids[3]).unwrap().position);
        assert_eq!(leg.phase(), GaitPhase::Planted);
        assert_eq!(leg.forwardness(), 0.0);
    }

    #[test]
    fn test_chain_clamped_at_root() {
        let (skeleton, ids) = straight_chain(2, 5.0);
        let leg = LegSystem::new(&skeleton, ids[1], 10, 1.0, 0.0).unwrap();
        assert_eq!(leg.chain(), &[ids[0], ids[1]]);
        assert_eq!(leg.hip(), NodeRef::Root);

        let leg = LegSystem::new(&skeleton, ids[1], 0, 1.0, 0.0).unwrap();
        assert_eq!(leg.chain(), &[ids[1]]);
    }

    #[test]
    fn test_unknown_foot() {
        let (skeleton, _) = straight_chain(1, 5.0);
        let ghost = SegmentId::from_index(99);
        assert_eq!(
            LegSystem::new(&skeleton, ghost, 2, 1.0, 0.0).unwrap_err(),
            RigError::UnknownSegment(ghost)
        );
    }

    #[test]
    fn test_reach_and_swing_setup() {
        let (skeleton, ids) = straight_chain(2, 5.0);
        // Foot straight ahead of the hip, creature facing along +y
        let leg = LegSystem::new(&skeleton, ids[1], 2, 1.0, PI / 2.0).unwrap();
        assert!((leg.reach() - 9.0).abs() < EPS);
        // relative = PI/2 >= 0, so swing = -PI/2 - PI/2
        assert!((leg.swing + PI).abs() < EPS);
        assert!((leg.swing_offset - PI / 2.0).abs() < EPS);
    }

    #[test]
    fn test_straight_chain_full_extension() {
        let (mut skeleton, ids) = straight_chain(3, 10.0);
        let leg = LegSystem::new(&skeleton, ids[2], 3, 5.0, 0.0).unwrap();

        leg.move_to(&mut skeleton, Vec2::new(30.0, 0.0));

        for (i, &id) in ids.iter().enumerate() {
            let seg = skeleton.segment(id).unwrap();
            let expected = Vec2::new(10.0 * (i + 1) as f32, 0.0);
            assert!(
                (seg.position - expected).length() < EPS,
                "joint {} at {:?}",
                i,
                seg.position
            );
            assert!(seg.abs_angle.abs() < EPS);
            assert!(seg.rel_angle.abs() < EPS);
        }
    }

    #[test]
    fn test_move_to_keeps_inner_link_lengths() {
        let (mut skeleton, ids) = straight_chain(3, 10.0);
        let leg = LegSystem::new(&skeleton, ids[2], 3, 2.0, 0.0).unwrap();

        leg.move_to(&mut skeleton, Vec2::new(12.0, 15.0));

        for &id in &ids[1..] {
            let (anchor, _) = skeleton.parent_pose(id);
            let seg = skeleton.segment(id).unwrap();
            assert!((seg.position.distance(anchor) - seg.size).abs() < EPS);
        }
    }

    #[test]
    fn test_move_to_advances_foot_by_speed() {
        let (mut skeleton, ids) = straight_chain(2, 10.0);
        let leg = LegSystem::new(&skeleton, ids[1], 2, 3.0, 0.0).unwrap();
        let target = Vec2::new(20.0, 10.0);
        let before = skeleton.segment(ids[1]).unwrap().position.distance(target);

        leg.move_to(&mut skeleton, target);

        let after = skeleton.segment(ids[1]).unwrap().position.distance(target);
        assert!((before - after - 3.0).abs() < EPS);
    }

    #[test]
    fn test_move_to_reposes_side_branches() {
        let (mut skeleton, ids) = straight_chain(2, 10.0);
        let toe = skeleton
            .add_segment(ids[1], SegmentSpec::new(2.0, 0.5, 0.1, 4.0))
            .unwrap();
        let leg = LegSystem::new(&skeleton, ids[1], 2, 4.0, 0.0).unwrap();
        assert_eq!(leg.chain(), &[ids[0], ids[1]]);

        leg.move_to(&mut skeleton, Vec2::new(5.0, 12.0));

        let foot = skeleton.segment(ids[1]).unwrap();
        let toe = skeleton.segment(toe).unwrap();
        assert!((toe.position.distance(foot.position) - 2.0).abs() < EPS);
        assert!((toe.abs_angle - (foot.abs_angle + 0.5)).abs() < EPS);
    }

    #[test]
    fn test_planted_within_tolerance_keeps_goal() {
        let (mut skeleton, ids) = straight_chain(2, 10.0);
        let mut leg = LegSystem::new(&skeleton, ids[1], 2, 2.0, 0.0).unwrap();
        let goal = leg.goal();
        let mut rng = no_jitter();

        for _ in 0..10 {
            leg.update(&mut skeleton, &mut rng);
            assert_eq!(leg.phase(), GaitPhase::Planted);
            assert_eq!(leg.goal(), goal);
        }
    }

    #[test]
    fn test_lift_goal_envelope() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(12345);

        for _ in 0..200 {
            let (mut skeleton, ids) = straight_chain(2, 5.0);
            let mut leg = LegSystem::new(&skeleton, ids[1], 2, 0.0, 0.0).unwrap();
            leg.reach = 10.0;
            leg.swing = 0.0;
            leg.swing_offset = 0.0;
            // Goal far from the foot: the stationary foot is out of tolerance
            leg.goal = Vec2::new(40.0, 40.0);

            leg.update(&mut skeleton, &mut rng);

            assert_eq!(leg.phase(), GaitPhase::Swinging);
            let goal = leg.goal();
            assert!(goal.x >= 5.0 - EPS && goal.x <= 15.0 + EPS, "goal {:?}", goal);
            assert!(goal.y >= -5.0 - EPS && goal.y <= 5.0 + EPS, "goal {:?}", goal);
        }
    }

    #[test]
    fn test_lift_without_jitter_hits_stride_point() {
        let (mut skeleton, ids) = straight_chain(2, 5.0);
        let mut leg = LegSystem::new(&skeleton, ids[1], 2, 0.0, 0.0).unwrap();
        leg.reach = 10.0;
        leg.swing = PI / 2.0;
        leg.swing_offset = 0.0;
        leg.goal = Vec2::new(-30.0, 0.0);

        leg.update(&mut skeleton, &mut no_jitter());

        assert!((leg.goal() - Vec2::new(0.0, 10.0)).length() < EPS);
    }

    #[test]
    fn test_full_step_cycle_lands_on_foot() {
        let (mut skeleton, ids) = straight_chain(3, 10.0);
        let mut leg = LegSystem::new(&skeleton, ids[2], 3, 2.0, 0.0).unwrap();
        let mut rng = no_jitter();

        // Drag the body so the planted foot drifts out of tolerance
        skeleton.root_mut().position = Vec2::new(6.0, 0.0);
        leg.update(&mut skeleton, &mut rng);
        assert_eq!(leg.phase(), GaitPhase::Swinging);

        let mut landed = false;
        for _ in 0..500 {
            leg.update(&mut skeleton, &mut rng);
            if leg.is_planted() {
                landed = true;
                break;
            }
        }

        assert!(landed, "leg never landed");
        assert_eq!(leg.goal(), skeleton.segment(ids[2]).unwrap().position);
    }
}
