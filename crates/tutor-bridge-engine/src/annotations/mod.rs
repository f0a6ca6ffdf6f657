/*!
 * # Annotations Module
 *
 * Highlighted sub-ranges over the live document and everything that keeps
 * them meaningful while the text changes.
 *
 * - **`highlight`**: `Highlight`, its id and the unvalidated `HighlightCandidate`
 * - **`store`**: the set of known highlights, the active id and the accepted set
 * - **`overlap`**: priority ordering and overlap flags for rendering
 * - **`remap`**: mapping stored ranges through an applied `Change`
 * - **`interaction`**: click timing and the outcome of a click
 * - **`engine`**: `AnnotationEngine`, composing all of the above around one `Document`
 *
 * Offsets are UTF-16 code units, like everywhere in the engine.
 */

pub mod command;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod interaction;
pub mod overlap;
pub mod remap;
pub mod store;

pub use command::{CommandReport, HighlightCommand};
pub use engine::{AnnotationCallbacks, AnnotationEngine, EngineOptions};
pub use error::AnnotationError;
pub use highlight::{Highlight, HighlightCandidate, HighlightId, InvalidHighlight, kinds};
pub use interaction::{ClickOutcome, ClickTracker};
pub use overlap::{KindPriority, RenderedHighlight};
pub use remap::{RemapReport, remap_highlights};
pub use store::{HighlightStore, ValidationReport};
