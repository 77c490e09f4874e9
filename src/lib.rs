//! Grid tile levels with a two-ended wall portal.
//!
//! * [`world`]: geometry core (hitboxes, facings, edges, portals) and the
//!   level container that owns the portal pair.
//! * [`data`]: level description parsing and tile texture loading.
//! * [`renderer`]: CPU frame-buffer painter behind a small trait.
//! * [`sim`]: fixed-rate body movement that drives portal traversal.

pub mod data;
pub mod renderer;
pub mod sim;
pub mod world;
