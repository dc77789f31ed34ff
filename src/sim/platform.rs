//! Per-type platform behaviour
//!
//! Platforms advance once per tick after the physics step: conveyor belts
//! scroll their animation, patrol platforms move and bounce off the play edges.

use super::state::{Platform, PlatformKind};
use crate::consts::{CONVEYOR_SEGMENT_WIDTH, CONVEYOR_SPEED, PLAY_WIDTH};

impl Platform {
    /// Horizontal displacement applied per frame to a character standing here
    pub fn carry(&self) -> f32 {
        match self.kind {
            PlatformKind::Conveyor { direction, .. } => CONVEYOR_SPEED * direction,
            PlatformKind::Patrol {
                direction, speed, ..
            } => speed * direction,
            PlatformKind::Static | PlatformKind::Slippery => 0.0,
        }
    }

    /// Advance this platform's own motion by one frame
    pub fn advance(&mut self) {
        match &mut self.kind {
            PlatformKind::Conveyor { offset, .. } => {
                *offset = (*offset + CONVEYOR_SPEED) % (CONVEYOR_SEGMENT_WIDTH * 2.0);
            }
            PlatformKind::Patrol {
                direction, speed, ..
            } => {
                let max_x = PLAY_WIDTH - self.width;
                let mut x = self.pos.x + *speed * *direction;
                if x <= 0.0 {
                    x = 0.0;
                    *direction = 1.0;
                } else if x >= max_x {
                    x = max_x;
                    *direction = -1.0;
                }
                self.pos.x = x;
            }
            PlatformKind::Static | PlatformKind::Slippery => {}
        }
    }
}

/// Advance every platform in list order
pub fn advance_platforms(platforms: &mut [Platform]) {
    for platform in platforms {
        platform.advance();
    }
}
