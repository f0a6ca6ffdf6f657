/*!
 * # Editing Core Module
 *
 * The position model every other part of the engine is built on.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: xi-rope Buffer
 * - The entire document is stored in a single **`xi_rope::Rope`** buffer
 * - Offsets exposed to callers are **UTF-16 code units**, the unit the browser
 *   editor reports; conversion to rope bytes happens at this boundary only
 *
 * ### 2. Edit-Based Mutation
 * - All mutations are represented as **Edits** (`Edit` enum) that compile to **Deltas**
 * - Applying an edit yields a **Change**: the delta plus the rope before and after,
 *   which is what the annotation remapper consumes
 *
 * ### 3. Change Reporting
 * - A **Patch** summarises an applied change for listeners (changed ranges, version)
 *
 * ## Module Structure
 *
 * - **`document`**: Core `Document` type with xi-rope buffer and offset conversion
 * - **`edit`**: `Edit` enum and delta compilation
 * - **`change`**: `Change` and offset mapping through a delta
 * - **`patch`**: Edit result metadata including changed ranges
 *
 * ## Usage Pattern
 *
 * ```rust
 * use tutor_bridge_engine::editing::*;
 *
 * let mut doc = Document::from_text("The cat sat.");
 * let change = doc.apply(&Edit::Insert { at: 4, text: "big ".to_string() }).unwrap();
 *
 * assert_eq!(doc.text(), "The big cat sat.");
 * assert_eq!(change.map_offset(8, Assoc::After), 12);
 * ```
 */

pub mod change;
pub mod document;
pub mod edit;
pub mod patch;

pub use change::{Assoc, Change};
pub use document::{Document, DocumentError};
pub use edit::Edit;
pub use patch::Patch;
