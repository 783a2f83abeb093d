//! Root locomotion controller
//!
//! The creature's body integrates forward and rotational speed toward a
//! pointer, then cascades the new pose through the passive chains and every
//! leg. Body pose is always finalised before any chain or leg reads it.

use glam::Vec2;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::angle::wrap_angle;
use crate::draw::{Canvas, draw_head};
use crate::error::Result;
use crate::leg::LegSystem;
use crate::node::{NodeRef, SegmentId};
use crate::rng::GaitRng;
use crate::segment::SegmentSpec;
use crate::skeleton::Skeleton;

/// Locomotion tuning for the root body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Locomotion {
    /// Forward speed gained per tick while far from the pointer
    pub forward_accel: f32,
    /// Subtracted from forward speed before moving (floored at 0)
    pub forward_friction: f32,
    /// Fraction of forward speed lost per tick
    pub forward_resistance: f32,
    /// Pointer distance below which the body stops pushing
    pub forward_threshold: f32,
    /// Rotational speed gained per tick while misaligned
    pub turn_accel: f32,
    /// Rotational speed bled off per tick (snaps to 0 inside one step)
    pub turn_friction: f32,
    /// Fraction of rotational speed lost per tick
    pub turn_resistance: f32,
    /// Heading error below which the body stops turning
    pub turn_threshold: f32,
}

impl Locomotion {
    /// Lizard preset for a given body scale
    pub fn lizard(scale: f32) -> Self {
        Self {
            forward_accel: scale * 10.0,
            forward_friction: scale * 2.0,
            forward_resistance: 0.5,
            forward_threshold: 16.0,
            turn_accel: 0.5,
            turn_friction: 0.085,
            turn_resistance: 0.5,
            turn_threshold: 0.3,
        }
    }
}

impl Default for Locomotion {
    fn default() -> Self {
        Self::lizard(4.0)
    }
}

/// Per-tick input snapshot
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameInput {
    /// Point the creature heads for, in world coordinates
    pub pointer: Vec2,
}

/// A creature: root body, skeleton and legs
#[derive(Debug, Clone)]
pub struct Creature<R = Xoshiro256StarStar> {
    skeleton: Skeleton,
    legs: Vec<LegSystem>,
    locomotion: Locomotion,
    forward_speed: f32,
    speed: f32,
    turn_speed: f32,
    rng: R,
}

impl Creature {
    /// Create a creature seeded from OS entropy
    pub fn new(position: Vec2, angle: f32, locomotion: Locomotion) -> Self {
        Self::with_rng(position, angle, locomotion, Xoshiro256StarStar::from_entropy())
    }

    /// Create a creature with deterministic gait jitter
    pub fn seeded(position: Vec2, angle: f32, locomotion: Locomotion, seed: u64) -> Self {
        Self::with_rng(
            position,
            angle,
            locomotion,
            Xoshiro256StarStar::seed_from_u64(seed),
        )
    }
}

impl<R: GaitRng> Creature<R> {
    /// Create a creature with an explicit jitter source
    pub fn with_rng(position: Vec2, angle: f32, locomotion: Locomotion, rng: R) -> Self {
        Self {
            skeleton: Skeleton::new(position, angle),
            legs: Vec::new(),
            locomotion,
            forward_speed: 0.0,
            speed: 0.0,
            turn_speed: 0.0,
            rng,
        }
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn legs(&self) -> &[LegSystem] {
        &self.legs
    }

    pub fn locomotion(&self) -> &Locomotion {
        &self.locomotion
    }

    pub fn position(&self) -> Vec2 {
        self.skeleton.root().position
    }

    /// Travel heading (radians)
    pub fn heading(&self) -> f32 {
        self.skeleton.root().abs_angle
    }

    /// Distance moved during the last tick
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Heading change during the last tick
    pub fn turn_speed(&self) -> f32 {
        self.turn_speed
    }

    /// Attach a segment to the body or to another segment
    pub fn add_segment(
        &mut self,
        parent: impl Into<NodeRef>,
        spec: SegmentSpec,
    ) -> Result<SegmentId> {
        self.skeleton.add_segment(parent, spec)
    }

    /// Register a leg ending at `foot`; returns its index
    pub fn add_leg(&mut self, foot: SegmentId, length: usize, speed: f32) -> Result<usize> {
        let leg = LegSystem::new(&self.skeleton, foot, length, speed, self.heading())?;
        self.legs.push(leg);
        Ok(self.legs.len() - 1)
    }

    /// Fraction of legs currently planted (1 for a legless creature)
    pub fn planted_fraction(&self) -> f32 {
        if self.legs.is_empty() {
            return 1.0;
        }
        let planted = self.legs.iter().filter(|leg| leg.is_planted()).count();
        planted as f32 / self.legs.len() as f32
    }

    /// Run one tick from an input snapshot
    pub fn tick(&mut self, input: &FrameInput) {
        self.follow(input.pointer);
    }

    /// Run one simulation tick heading for `target`
    pub fn follow(&mut self, target: Vec2) {
        let loco = self.locomotion;
        let planted = self.planted_fraction();
        let (position, heading) = (self.position(), self.heading());
        let to_target = target - position;
        let distance = to_target.length();
        let desired = to_target.y.atan2(to_target.x);
        let far = distance > loco.forward_threshold;

        // Legs only push while grounded
        if far {
            self.forward_speed += loco.forward_accel * planted;
        }
        self.forward_speed *= 1.0 - loco.forward_resistance;
        self.speed = (self.forward_speed - loco.forward_friction).max(0.0);

        let error = wrap_angle(heading - desired);
        if error.abs() > loco.turn_threshold && far {
            self.turn_speed -= loco.turn_accel * if error > 0.0 { 1.0 } else { -1.0 };
        }
        self.turn_speed *= 1.0 - loco.turn_resistance;
        if self.turn_speed.abs() > loco.turn_friction {
            self.turn_speed -= loco.turn_friction * self.turn_speed.signum();
        } else {
            self.turn_speed = 0.0;
        }

        let root = self.skeleton.root_mut();
        root.abs_angle = wrap_angle(root.abs_angle + self.turn_speed);
        root.position += Vec2::from_angle(root.abs_angle) * self.speed;

        // The skeleton is authored facing away from the travel direction
        root.abs_angle += PI;
        self.skeleton.follow_all();
        for leg in &mut self.legs {
            leg.update(&mut self.skeleton, &mut self.rng);
        }
        self.skeleton.root_mut().abs_angle -= PI;
    }

    /// Emit the head indicator and every segment to a canvas
    pub fn draw(&self, canvas: &mut impl Canvas) {
        draw_head(canvas, self.skeleton.root());
        self.skeleton.draw(canvas);
    }
}
