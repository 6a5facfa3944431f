//! Common component types used across benchmarks.
//!
//! These components are designed to be representative of real game components
//! in terms of size and access patterns.

use rusty_pool::Component;

// =============================================================================
// Transform Components
// =============================================================================

/// 3D position component (12 bytes).
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// 3D velocity component (12 bytes).
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

// =============================================================================
// Game Entity Components
// =============================================================================

/// Health component for damageable entities.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

/// Team/faction identifier.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Team {
    pub id: u32,
}

// =============================================================================
// Particle System Components
// =============================================================================

/// A Particle marker
#[derive(Component, Clone)]
pub struct Particle;

/// Particle lifetime tracking.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Lifetime {
    pub remaining: f32,
    pub total: f32,
}

/// Marks a particle whose lifetime ran out.
#[derive(Component, Clone, Copy, Debug)]
pub struct Expired;

// =============================================================================
// Group Churn Components
// =============================================================================

// Marker components toggled on and off to drive group transitions
macro_rules! define_marker_components {
    ($($name:ident),*) => {
        $(
            #[derive(Component, Clone, Copy, Debug, Default)]
            pub struct $name;
        )*
    };
}

define_marker_components!(
    MarkerA, MarkerB, MarkerC, MarkerD, MarkerE, MarkerF, MarkerG, MarkerH
);

/// Number of marker component types.
pub const MARKER_COUNT: usize = 8;

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn document_component_sizes() {
        assert_eq!(size_of::<Position>(), 12);
        assert_eq!(size_of::<Velocity>(), 12);
        assert_eq!(size_of::<Health>(), 8);
        assert_eq!(size_of::<Team>(), 4);
        assert_eq!(size_of::<Lifetime>(), 8);

        // Marker components (ZST)
        assert_eq!(size_of::<Particle>(), 0);
        assert_eq!(size_of::<MarkerA>(), 0);
    }
}
