//! The database facade: one identity index and one vocab list under a
//! shared tag.


use shapa_primitives::{DbId, DbTag, TimeStamp};
use tracing::debug;

use crate::config::{ConfigError, DatabaseConfig};
use crate::element::VocabElement;
use crate::error::{Result, SystemError};
use crate::farg::FormalArg;
use crate::index::{IdentityIndex, IndexEntry};
use crate::list::VocabList;
use crate::listeners::{ListenerKey, VocabDependent, VocabListObserver};

/// What an index ID resolves to.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
	VocabElement(&'a VocabElement),
	FormalArg(&'a FormalArg),
}

impl Resolved<'_> {
	pub fn to_db_string(&self) -> String {
		match self {
			Self::VocabElement(ve) => ve.to_db_string(),
			Self::FormalArg(fa) => fa.to_db_string(),
		}
	}
}

impl std::fmt::Display for Resolved<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::VocabElement(ve) => write!(f, "{ve}"),
			Self::FormalArg(fa) => write!(f, "{fa}"),
		}
	}
}

/// A vocabulary database.
#[derive(Debug)]
pub struct Database {
	tag: DbTag,
	config: DatabaseConfig,
	idx: IdentityIndex,
	vl: VocabList,
}

impl Default for Database {
	fn default() -> Self {
		Self::new()
	}
}

impl Database {
	pub fn new() -> Self {
		Self::build(DatabaseConfig::default())
	}

	pub fn with_config(config: DatabaseConfig) -> Result<Self, ConfigError> {
		config.validate()?;
		Ok(Self::build(config))
	}

	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		DatabaseConfig::from_toml_str(input).map(Self::build)
	}

	fn build(config: DatabaseConfig) -> Self {
		let tag = DbTag::fresh();
		debug!(domain = "vocab", db = tag.get(), name = %config.name, "database created");
		Self {
			tag,
			idx: IdentityIndex::new(tag),
			vl: VocabList::new(tag),
			config,
		}
	}

	pub fn tag(&self) -> DbTag {
		self.tag
	}

	pub fn config(&self) -> &DatabaseConfig {
		&self.config
	}

	pub fn ticks_per_second(&self) -> u32 {
		self.config.ticks_per_second
	}

	/// A time stamp at the database's tick rate.
	pub fn time_stamp(&self, ticks: u64) -> Result<TimeStamp> {
		Ok(TimeStamp::new(self.config.ticks_per_second, ticks)?)
	}

	pub fn index(&self) -> &IdentityIndex {
		&self.idx
	}

	pub fn vocab(&self) -> &VocabList {
		&self.vl
	}

	/// Attaches a dependent to element `id`; see [`VocabList::attach_dependent`].
	pub fn attach_dependent(
		&mut self,
		id: DbId,
		dependent: Box<dyn VocabDependent>,
	) -> Result<ListenerKey> {
		self.vl.attach_dependent(id, dependent)
	}

	pub fn detach_dependent(&mut self, id: DbId, key: ListenerKey) -> Result<Box<dyn VocabDependent>> {
		self.vl.detach_dependent(id, key)
	}

	pub fn add_observer(&mut self, observer: Box<dyn VocabListObserver>) -> ListenerKey {
		self.vl.add_observer(observer)
	}

	pub fn remove_observer(&mut self, key: ListenerKey) -> Option<Box<dyn VocabListObserver>> {
		self.vl.remove_observer(key)
	}

	pub fn add_element(&mut self, ve: VocabElement) -> Result<DbId> {
		self.vl.add_element(&mut self.idx, ve)
	}

	pub fn replace_vocab_element(&mut self, ve: VocabElement) -> Result<()> {
		self.vl.replace_vocab_element(&mut self.idx, ve)
	}

	pub fn remove_vocab_element(&mut self, id: DbId) -> Result<VocabElement> {
		self.vl.remove_vocab_element(&mut self.idx, id)
	}

	pub fn modify<F>(&mut self, id: DbId, edit: F) -> Result<()>
	where
		F: FnOnce(&mut VocabElement) -> Result<()>,
	{
		self.vl.modify(&mut self.idx, id, edit)
	}

	pub fn checkout(&self, id: DbId) -> Result<VocabElement> {
		self.vl.checkout(id)
	}

	/// Resolves an index ID to the live entity.
	pub fn resolve(&self, id: DbId) -> Result<Resolved<'_>> {
		match *self.idx.lookup(id)? {
			IndexEntry::VocabElement { .. } => {
				self.vl.get_vocab_element(id).map(Resolved::VocabElement)
			}
			IndexEntry::FormalArg { owner, .. } => self
				.vl
				.find_arg(owner, id)
				.map(Resolved::FormalArg)
				.ok_or(SystemError::IndexInconsistent {
					id,
					detail: "index entry has no owner in the list",
				}),
		}
	}

	/// `((DBIndex) (index_contents: (...)))`, newest ID first.
	pub fn index_to_string(&self) -> Result<String> {
		let items = self.render_index(|r| r.to_string())?;
		Ok(format!("((DBIndex) (index_contents: ({})))", items.join(", ")))
	}

	/// `((DBIndex) (nextID: N) (index_size: M) (index_contents: (...)))`.
	pub fn index_to_db_string(&self) -> Result<String> {
		let items = self.render_index(|r| r.to_db_string())?;
		Ok(format!(
			"((DBIndex) (nextID: {}) (index_size: {}) (index_contents: ({})))",
			self.idx.next_id(),
			self.idx.len(),
			items.join(", ")
		))
	}

	/// Verifies that the index and the vocab list describe the same entities.
	pub fn check_consistency(&self) -> Result<()> {
		self.vl.verify(&self.idx)
	}

	fn render_index(&self, render: impl Fn(&Resolved<'_>) -> String) -> Result<Vec<String>> {
		self.idx
			.ids()
			.into_iter()
			.rev()
			.map(|id| self.resolve(id).map(|r| render(&r)))
			.collect()
	}
}
