//! Listener surfaces of the vocab list.
//!
//! Dependents are attached to one vocab element and represent values built
//! against its argument structure (cells and data values). Observers watch
//! the list as a whole.

use shapa_primitives::DbId;

use crate::change::VocabChange;
use crate::element::VocabElement;

/// Handle returned when a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerKey(pub(crate) u64);

/// A value whose shape follows one vocab element.
pub trait VocabDependent {
	/// Vetoes a pending replacement. Runs before anything is committed.
	fn check_change(&self, _change: &VocabChange) -> Result<(), String> {
		Ok(())
	}

	/// Follows a committed replacement.
	fn apply_change(&mut self, change: &VocabChange);

	/// Whether the dependent still references the element's arguments.
	/// Removal of the element fails while any dependent does.
	fn holds_references(&self) -> bool {
		true
	}

	/// The element was removed. Only called on dependents that released
	/// their references.
	fn on_deleted(&mut self, _id: DbId) {}
}

/// Watches insertions, replacements and removals on a vocab list.
pub trait VocabListObserver {
	fn element_inserted(&mut self, _ve: &VocabElement) {}
	fn element_changed(&mut self, _change: &VocabChange) {}
	fn element_deleted(&mut self, _id: DbId) {}
}
