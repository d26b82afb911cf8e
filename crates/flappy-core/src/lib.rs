//! Game-domain types shared by the detection pipeline and the frontend:
//! bounding-box geometry, the per-session state machine, and the digit
//! glyph catalog used by score recognition.

pub mod bbox;
pub mod glyph;
pub mod session;

pub use bbox::BBox;
pub use glyph::{DigitTemplate, GlyphPattern, DIGIT_TEMPLATES, MATCH_BAR};
pub use session::SessionState;
