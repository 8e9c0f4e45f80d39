//! Relocation policy: where the target goes next. Pure functions over a
//! [`Bounds`] and a [`RandomSource`]; no page access here.

use crate::config::GameConfig;
use crate::random::RandomSource;
use crate::surface::{Layout, Point};

/// Inclusive upper limits for the target's top-left corner. Lower limits are 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// An area smaller than the target collapses to a zero range rather than a
    /// negative one.
    pub fn from_layout(layout: &Layout) -> Self {
        Self {
            max_x: (layout.area.width - layout.target.width).max(0.0),
            max_y: (layout.area.height - layout.target.height).max(0.0),
        }
    }

    pub fn clamp(&self, p: Point) -> Point {
        Point::new(p.x.clamp(0.0, self.max_x), p.y.clamp(0.0, self.max_y))
    }

    pub fn contains(&self, p: Point) -> bool {
        (0.0..=self.max_x).contains(&p.x) && (0.0..=self.max_y).contains(&p.y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.max_x / 2.0, self.max_y / 2.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    Teleport,
    /// Random walk step; value is the tier index (0 slow, 1 medium, 2 fast).
    Step(usize),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Relocation {
    pub kind: MoveKind,
    pub position: Point,
    /// New scale when the rescale roll hit.
    pub scale: Option<f64>,
}

/// Draw order: teleport roll, then (x, y) or (tier, dx, dy), then rescale roll
/// and factor.
pub fn relocate(
    rng: &mut impl RandomSource,
    config: &GameConfig,
    current: Point,
    bounds: Bounds,
) -> Relocation {
    let (kind, raw) = if rng.chance(config.teleport_chance) {
        let x = rng.next_unit() * bounds.max_x;
        let y = rng.next_unit() * bounds.max_y;
        (MoveKind::Teleport, Point::new(x, y))
    } else {
        let tier = pick_tier(rng.next_unit(), config);
        let span = config.tiers[tier].span;
        let dx = (rng.next_unit() - 0.5) * span;
        let dy = (rng.next_unit() - 0.5) * span;
        (MoveKind::Step(tier), Point::new(current.x + dx, current.y + dy))
    };

    let scale = if rng.chance(config.rescale_chance) {
        Some(config.min_scale + rng.next_unit() * (config.max_scale - config.min_scale))
    } else {
        None
    };

    Relocation { kind, position: bounds.clamp(raw), scale }
}

fn pick_tier(roll: f64, config: &GameConfig) -> usize {
    let mut acc = 0.0;
    for (i, tier) in config.tiers.iter().enumerate() {
        acc += tier.weight;
        if roll < acc {
            return i;
        }
    }
    config.tiers.len() - 1
}

/// Push the target a fraction of the pointer->target vector further away.
pub fn evade(config: &GameConfig, target: Point, pointer: Point, bounds: Bounds) -> Point {
    let dx = target.x - pointer.x;
    let dy = target.y - pointer.y;
    bounds.clamp(Point::new(
        target.x + dx * config.avoid_factor,
        target.y + dy * config.avoid_factor,
    ))
}
