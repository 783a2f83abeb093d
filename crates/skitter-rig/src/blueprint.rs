//! Lizard assembly
//!
//! Builds the reference creature: a neck and tail of whiskered vertebrae,
//! a ribbed torso per leg pair, and IK legs with four toes each.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};

use crate::body::{Creature, Locomotion};
use crate::error::Result;
use crate::node::{NodeRef, SegmentId};
use crate::rng::GaitRng;
use crate::segment::SegmentSpec;

const NECK_VERTEBRAE: usize = 6;
const TORSO_VERTEBRAE: usize = 6;
const RIB_LINKS: usize = 3;
const TOES: usize = 4;
const LEG_CHAIN: usize = 3;

/// Shape parameters for a lizard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LizardBlueprint {
    /// Overall size before dividing by the square root of the leg pairs
    pub size: f32,
    /// Number of leg pairs (at least 1)
    pub legs: usize,
    /// Number of tail vertebrae (at least 1)
    pub tail: usize,
}

impl Default for LizardBlueprint {
    fn default() -> Self {
        Self {
            size: 8.0,
            legs: 4,
            tail: 12,
        }
    }
}

impl LizardBlueprint {
    pub fn new(size: f32, legs: usize, tail: usize) -> Self {
        Self { size, legs, tail }
    }

    pub fn leg_pairs(&self) -> usize {
        self.legs.max(1)
    }

    pub fn tail_length(&self) -> usize {
        self.tail.max(1)
    }

    /// Per-link scale; more leg pairs make a longer, thinner lizard
    pub fn scale(&self) -> f32 {
        self.size / (self.leg_pairs() as f32).sqrt()
    }

    pub fn locomotion(&self) -> Locomotion {
        Locomotion::lizard(self.scale())
    }

    /// Total segments [`assemble`](Self::assemble) will create
    pub fn segment_count(&self) -> usize {
        let vertebra = 1 + 2 * (1 + RIB_LINKS);
        let leg = 3 + TOES;
        let torso = (self.leg_pairs() - 1) * TORSO_VERTEBRAE * vertebra;
        NECK_VERTEBRAE * vertebra + torso + self.leg_pairs() * 2 * leg + self.tail_length() * vertebra
    }

    /// Build a seeded lizard facing +x at `position`
    pub fn build(&self, position: Vec2, seed: u64) -> Result<Creature> {
        self.assemble(Creature::seeded(position, 0.0, self.locomotion(), seed))
    }

    /// Attach the lizard skeleton and legs to a bare creature
    pub fn assemble<R: GaitRng>(&self, mut creature: Creature<R>) -> Result<Creature<R>> {
        let s = self.scale();
        let tail = self.tail_length();
        let mut spine = NodeRef::Root;

        for _ in 0..NECK_VERTEBRAE {
            let vertebra =
                creature.add_segment(spine, SegmentSpec::new(s * 4.0, 0.0, PI * 2.0 / 3.0, 1.1))?;
            spine = vertebra.into();
            for side in [-1.0, 1.0] {
                add_rib(
                    &mut creature,
                    vertebra,
                    SegmentSpec::new(s * 3.0, side, 0.1, 2.0),
                    SegmentSpec::new(s * 0.1, -side * 0.1, 0.1, 2.0),
                )?;
            }
        }

        for pair in 0..self.leg_pairs() {
            if pair > 0 {
                for _ in 0..TORSO_VERTEBRAE {
                    let vertebra =
                        creature.add_segment(spine, SegmentSpec::new(s * 4.0, 0.0, 1.571, 1.5))?;
                    spine = vertebra.into();
                    for side in [-1.0, 1.0] {
                        add_rib(
                            &mut creature,
                            vertebra,
                            SegmentSpec::new(s * 3.0, side * 1.571, 0.1, 1.5),
                            SegmentSpec::new(s * 3.0, -side * 0.3, 0.1, 2.0),
                        )?;
                    }
                }
            }

            for side in [-1.0, 1.0] {
                let shoulder =
                    creature.add_segment(spine, SegmentSpec::new(s * 12.0, side * 0.785, 0.0, 8.0))?;
                let upper =
                    creature.add_segment(shoulder, SegmentSpec::new(s * 16.0, -side * 0.785, 6.28, 1.0))?;
                let lower =
                    creature.add_segment(upper, SegmentSpec::new(s * 16.0, side * FRAC_PI_2, PI, 2.0))?;
                for toe in 0..TOES {
                    let spread = (toe as f32 / 3.0 - 0.5) * 1.571;
                    creature.add_segment(lower, SegmentSpec::new(s * 4.0, spread, 0.1, 4.0))?;
                }
                creature.add_leg(lower, LEG_CHAIN, s * 12.0)?;
            }
        }

        for i in 0..tail {
            let vertebra =
                creature.add_segment(spine, SegmentSpec::new(s * 4.0, 0.0, PI * 2.0 / 3.0, 1.1))?;
            spine = vertebra.into();
            let taper = s * 3.0 * (tail - i) as f32 / tail as f32;
            for side in [-1.0, 1.0] {
                add_rib(
                    &mut creature,
                    vertebra,
                    SegmentSpec::new(s * 3.0, side, 0.1, 2.0),
                    SegmentSpec::new(taper, -side * 0.1, 0.1, 2.0),
                )?;
            }
        }

        log::debug!(
            "Assembled lizard: {} segments, {} legs, scale {:.2}",
            creature.skeleton().len(),
            creature.legs().len(),
            s
        );
        Ok(creature)
    }
}

/// A rib: one base link followed by a short run of identical links
fn add_rib<R: GaitRng>(
    creature: &mut Creature<R>,
    vertebra: SegmentId,
    base: SegmentSpec,
    link: SegmentSpec,
) -> Result<()> {
    let mut node = creature.add_segment(vertebra, base)?;
    for _ in 0..RIB_LINKS {
        node = creature.add_segment(node, link)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    #[test]
    fn test_default_lizard_shape() {
        let blueprint = LizardBlueprint::default();
        assert_eq!(blueprint.scale(), 4.0);
        assert_eq!(blueprint.segment_count(), 380);

        let lizard = blueprint.build(Vec2::new(400.0, 300.0), 7).unwrap();
        assert_eq!(lizard.skeleton().len(), 380);
        assert_eq!(lizard.legs().len(), 8);
        assert!(lizard.skeleton().validate().is_ok());
    }

    #[test]
    fn test_legs_are_three_links_off_the_spine() {
        let lizard = LizardBlueprint::default().build(Vec2::ZERO, 1).unwrap();
        for leg in lizard.legs() {
            assert_eq!(leg.chain().len(), 3);
            let hip = lizard.skeleton().node(leg.hip()).unwrap();
            assert!(hip.as_segment().is_some());
            // Four toes hang off the foot
            let foot = lizard.skeleton().segment(leg.foot()).unwrap();
            assert_eq!(foot.children().len(), TOES);
            assert!(leg.reach() > 0.0);
        }
    }

    #[test]
    fn test_minimal_lizard_clamps_counts() {
        let blueprint = LizardBlueprint::new(5.0, 0, 0);
        assert_eq!(blueprint.leg_pairs(), 1);
        assert_eq!(blueprint.tail_length(), 1);

        let lizard = blueprint.build(Vec2::ZERO, 3).unwrap();
        assert_eq!(lizard.skeleton().len(), blueprint.segment_count());
        assert_eq!(lizard.legs().len(), 2);
        assert_eq!(lizard.locomotion().forward_accel, 50.0);
    }

    #[test]
    fn test_blueprint_from_ron() {
        let blueprint: LizardBlueprint = ron::from_str("(size: 6.0, legs: 2)").unwrap();
        assert_eq!(blueprint.size, 6.0);
        assert_eq!(blueprint.legs, 2);
        assert_eq!(blueprint.tail, 12);
    }
}
