//! Leaf value types shared by the vocabulary database: identities, time
//! stamps and the name grammars used by vocabulary elements and their
//! formal arguments.

/// Numeric identities and database tags.
pub mod id;
/// Name grammars for predicates, columns, formal arguments and nominals.
pub mod names;
/// Tick-based time stamps.
pub mod timestamp;

pub use id::{DbId, DbTag};
pub use names::{
	is_graphic, is_valid_farg_name, is_valid_nominal, is_valid_pred_name, is_valid_svar_name,
};
pub use timestamp::{TimeStamp, TimeStampError};
