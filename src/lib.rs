//! Special-relativity spacetime diagrams.
//!
//! Events and travellers are stored in one rest frame; the [`relativity`]
//! module converts them to and from any observer frame moving below the speed
//! of light.

pub mod config;
pub mod error;
pub mod export;
pub mod objects;
pub mod relativity;
pub mod render;
pub mod spacetime;
pub mod store;
pub mod tui;

pub use error::{RelativityError, StoreError};
pub use objects::ObjectList;
pub use relativity::{LorentzTransform, ObserverFrame, SpeedOfLight};
pub use spacetime::{SpacetimeEntity, SpacetimeEvent, SpacetimeTraveller};
