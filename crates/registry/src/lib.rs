//! Vocabulary management for a time-aligned observational coding database.
//!
//! A [`Database`] owns an [`IdentityIndex`] and a [`VocabList`]. The list
//! holds predicate and matrix [`VocabElement`]s, each an ordered list of
//! typed [`FormalArg`]s, and keeps every one of them registered in the index
//! under a stable, never reused [`DbId`].
//!
//! Registered elements are edited by checking out a copy, changing it and
//! handing it back to [`VocabList::replace_vocab_element`], which reconciles
//! the index and reports a [`VocabChange`] to dependents and observers.

pub mod change;
pub mod config;
pub mod db;
pub mod element;
pub mod error;
pub mod farg;
pub mod index;
pub mod list;
pub mod listeners;

pub use change::{ArgListDiff, FargDelta, VocabChange};
pub use config::{ConfigError, DatabaseConfig};
pub use db::{Database, Resolved};
pub use element::{MatrixType, VeKind, VocabElement};
pub use error::{NameKind, Result, SystemError};
pub use farg::{ArgValue, DEFAULT_FARG_NAME, FargKind, FargType, FormalArg};
pub use index::{ArgRole, IdentityIndex, IndexEntry, Indexed};
pub use list::VocabList;
pub use listeners::{ListenerKey, VocabDependent, VocabListObserver};
pub use shapa_primitives::{DbId, DbTag, TimeStamp};
