//! Fixed-tick driver for a single lizard chasing a scripted pointer

use anyhow::Result;
use glam::Vec2;
use skitter_rig::{Creature, GaitPhase};

use super::path::PointerPath;
use crate::config::SimConfig;

/// Aggregate measurements over a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub ticks: u64,
    /// Sum of per-tick root displacement
    pub distance: f32,
    planted_sum: f32,
    /// Swinging -> Planted transitions, per leg
    pub landings: Vec<u32>,
    /// Root-to-pointer distance after the last tick
    pub final_pointer_distance: f32,
}

impl RunStats {
    fn new(legs: usize) -> Self {
        Self {
            landings: vec![0; legs],
            ..Default::default()
        }
    }

    pub fn mean_planted_fraction(&self) -> f32 {
        if self.ticks == 0 {
            return 0.0;
        }
        self.planted_sum / self.ticks as f32
    }

    pub fn total_landings(&self) -> u32 {
        self.landings.iter().sum()
    }
}

pub struct Runner {
    creature: Creature,
    path: PointerPath,
    pointer: Vec2,
    tick: u64,
    stats: RunStats,
}

impl Runner {
    pub fn new(creature: Creature, path: PointerPath) -> Self {
        let pointer = creature.position();
        let stats = RunStats::new(creature.legs().len());
        Self {
            creature,
            path,
            pointer,
            tick: 0,
            stats,
        }
    }

    /// Build the lizard and pointer path described by `config`
    pub fn from_config(config: &SimConfig) -> Result<Self> {
        let start = Vec2::from(config.run.start);
        let creature = Creature::seeded(start, 0.0, config.locomotion(), config.run.seed);
        let creature = config.lizard.assemble(creature)?;
        let path = PointerPath::from_config(&config.run)?;

        log::info!(
            "Spawned lizard: {} segments, {} legs, seed {}, path {}",
            creature.skeleton().len(),
            creature.legs().len(),
            config.run.seed,
            config.run.path
        );

        Ok(Self::new(creature, path))
    }

    /// Advance one tick
    pub fn step(&mut self) {
        let before = self.creature.position();
        let phases: Vec<GaitPhase> = self.creature.legs().iter().map(|leg| leg.phase()).collect();

        let input = self.path.input(self.tick, before);
        self.pointer = input.pointer;
        self.creature.tick(&input);
        self.tick += 1;

        let after = self.creature.position();
        self.stats.ticks = self.tick;
        self.stats.distance += after.distance(before);
        self.stats.planted_sum += self.creature.planted_fraction();
        for (i, (leg, was)) in self.creature.legs().iter().zip(phases).enumerate() {
            if was == GaitPhase::Swinging && leg.phase() == GaitPhase::Planted {
                self.stats.landings[i] += 1;
            }
        }
        self.stats.final_pointer_distance = after.distance(self.pointer);
    }

    /// Advance `ticks` ticks, calling `observe` after each one
    pub fn run(&mut self, ticks: u64, mut observe: impl FnMut(&Runner)) -> &RunStats {
        for _ in 0..ticks {
            self.step();
            observe(self);
        }
        &self.stats
    }

    pub fn creature(&self) -> &Creature {
        &self.creature
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn log_summary(&self) {
        let stats = &self.stats;
        let root = self.creature.skeleton().root();
        log::info!("Run finished after {} ticks", stats.ticks);
        log::info!(
            "  position ({:.1}, {:.1}), heading {:.2} rad",
            root.position.x,
            root.position.y,
            root.abs_angle
        );
        log::info!("  distance travelled: {:.1}", stats.distance);
        log::info!("  mean planted fraction: {:.2}", stats.mean_planted_fraction());
        log::info!("  landings per leg: {:?}", stats.landings);
        log::info!("  final pointer distance: {:.1}", stats.final_pointer_distance);
    }
}
