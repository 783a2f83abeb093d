//! Scripted pointer paths standing in for live mouse input

use anyhow::Result;
use glam::Vec2;
use skitter_rig::FrameInput;

use crate::config::{PathKind, RunConfig};

/// Source of per-tick pointer positions
#[derive(Debug, Clone, PartialEq)]
pub enum PointerPath {
    /// Circle around `centre`, advancing `angular_speed` radians per tick
    Orbit {
        centre: Vec2,
        radius: f32,
        angular_speed: f32,
    },
    /// Visit points in order, looping; advance once the creature arrives.
    /// With no points the pointer sits on the creature.
    Waypoints {
        points: Vec<Vec2>,
        arrive_radius: f32,
        current: usize,
    },
    /// Hold still at one point
    Fixed(Vec2),
}

impl PointerPath {
    pub fn from_config(run: &RunConfig) -> Result<Self> {
        let path = match run.path {
            PathKind::Orbit => PointerPath::Orbit {
                centre: Vec2::from(run.start),
                radius: run.orbit_radius,
                angular_speed: run.orbit_speed,
            },
            PathKind::Waypoints => {
                if run.waypoints.is_empty() {
                    anyhow::bail!("Waypoint path needs at least one waypoint");
                }
                PointerPath::Waypoints {
                    points: run.waypoints.iter().copied().map(Vec2::from).collect(),
                    arrive_radius: run.arrive_radius,
                    current: 0,
                }
            }
            PathKind::Fixed => PointerPath::Fixed(Vec2::from(run.fixed)),
        };
        Ok(path)
    }

    /// Pointer snapshot for `tick`, given where the creature currently is
    pub fn input(&mut self, tick: u64, creature: Vec2) -> FrameInput {
        let pointer = match self {
            PointerPath::Orbit {
                centre,
                radius,
                angular_speed,
            } => *centre + Vec2::from_angle(tick as f32 * *angular_speed) * *radius,
            PointerPath::Waypoints { points, .. } if points.is_empty() => creature,
            PointerPath::Waypoints {
                points,
                arrive_radius,
                current,
            } => {
                *current %= points.len();
                if creature.distance(points[*current]) <= *arrive_radius {
                    *current = (*current + 1) % points.len();
                    log::debug!("Waypoint reached, heading for #{}", current);
                }
                points[*current]
            }
            PointerPath::Fixed(point) => *point,
        };
        FrameInput { pointer }
    }
}
