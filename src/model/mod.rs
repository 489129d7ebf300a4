//! Token sheet model types.
//!
//! This module defines the intermediate representation that bridges token
//! resolution and rendering: resolved tokens, their flat placements, and the
//! paginated pages a renderer consumes.

mod page;
mod sheet;
mod token;

pub use page::{Page, PageFormat, PlacedToken};
pub use sheet::{Metadata, TokenSheet};
pub use token::{expand_tokens, Placement, Token, TokenImage};
