//! Terminal rendering of the search overlay.
//!
//! ```text
//! AppState → layout → UIViewModel → components → ANSI output
//! ```
//!
//! - [`layout`]: Panel placement and the regions pointer events test against
//! - [`viewmodel`]: Renderable snapshot types
//! - [`renderer`]: Top-level rendering coordinator
//! - [`components`]: Input box, suggestion surface and footer renderers
//! - [`helpers`]: Cursor positioning, truncation and match highlighting
//! - [`theme`]: Color schemes and ANSI escape generation

pub mod components;
pub mod helpers;
pub mod layout;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::render;
pub use theme::Theme;
pub use viewmodel::{DisplayItem, FooterInfo, SearchBarInfo, SurfaceInfo, UIViewModel};
