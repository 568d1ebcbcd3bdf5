use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use shapa_primitives::{DbId, DbTag};

use super::*;
use crate::change::VocabChange;
use crate::element::MatrixType;
use crate::index::Indexed;

fn setup() -> (IdentityIndex, VocabList) {
	let db = DbTag::fresh();
	(IdentityIndex::new(db), VocabList::new(db))
}

fn untyped(db: DbTag, name: &str) -> FormalArg {
	FormalArg::untyped(db, name).unwrap()
}

/// Adds `m0(<val>)` of type MATRIX and `p0(<alpha>)`.
fn populate(idx: &mut IdentityIndex, vl: &mut VocabList) -> (DbId, DbId) {
	let db = vl.db();
	let m0 = VocabElement::matrix_with(db, "m0", MatrixType::Matrix, [untyped(db, "<val>")]).unwrap();
	let p0 = VocabElement::predicate_with(db, "p0", [untyped(db, "<alpha>")]).unwrap();
	(vl.add_element(idx, m0).unwrap(), vl.add_element(idx, p0).unwrap())
}

type Log = Rc<RefCell<Vec<String>>>;

struct Recorder {
	log: Log,
	holds: bool,
	veto: Option<String>,
}

impl Recorder {
	fn boxed(log: &Log, holds: bool, veto: Option<&str>) -> Box<Self> {
		Box::new(Self {
			log: Rc::clone(log),
			holds,
			veto: veto.map(str::to_owned),
		})
	}
}

impl VocabDependent for Recorder {
	fn check_change(&self, _change: &VocabChange) -> std::result::Result<(), String> {
		match &self.veto {
			Some(reason) => Err(reason.clone()),
			None => Ok(()),
		}
	}

	fn apply_change(&mut self, change: &VocabChange) {
		self.log
			.borrow_mut()
			.push(format!("apply {} -> {}", change.old_name, change.new_name));
	}

	fn holds_references(&self) -> bool {
		self.holds
	}

	fn on_deleted(&mut self, id: DbId) {
		self.log.borrow_mut().push(format!("deleted {id}"));
	}
}

struct Watcher(Log);

impl VocabListObserver for Watcher {
	fn element_inserted(&mut self, ve: &VocabElement) {
		self.0.borrow_mut().push(format!("inserted {}", ve.name()));
	}

	fn element_changed(&mut self, change: &VocabChange) {
		self.0.borrow_mut().push(format!("changed {}", change.id));
	}

	fn element_deleted(&mut self, id: DbId) {
		self.0.borrow_mut().push(format!("deleted {id}"));
	}
}

/// The element takes the first ID, then its arguments, then the column
/// predicate arguments.
#[test]
fn test_add_assigns_ids_in_order() {
	let (mut idx, mut vl) = setup();
	let (m0, p0) = populate(&mut idx, &mut vl);
	assert_eq!(m0, DbId::new(1));
	assert_eq!(p0, DbId::new(7));
	assert_eq!(idx.next_id(), DbId::new(9));

	let m = vl.get_vocab_element(m0).unwrap();
	assert_eq!(
		m.to_db_string(),
		"((MatrixVocabElement: 1 m0) (system: false) (type: MATRIX) (varLen: false) \
		 (fArgList: ((UnTypedFormalArg 2 <val>)))"
	);
	let cp_ids: Vec<u64> = m.cp_args().unwrap().iter().map(|fa| fa.id().get()).collect();
	assert_eq!(cp_ids, vec![3, 4, 5, 6]);
	assert!(m.all_args().all(|fa| fa.owner() == m0));
	vl.verify(&idx).unwrap();
}

/// Registering the same element twice fails, as does reusing a name.
#[test]
fn test_add_twice_rejected() {
	let (mut idx, mut vl) = setup();
	let (_, p0) = populate(&mut idx, &mut vl);
	let again = vl.checkout(p0).unwrap();
	assert_eq!(vl.add_element(&mut idx, again.clone()), Err(SystemError::AlreadyRegistered(p0)));

	let same_name = again.copy();
	assert_eq!(
		vl.add_element(&mut idx, same_name),
		Err(SystemError::NameInUse("p0".into()))
	);

	// Predicates and matrices share one namespace.
	let clash = VocabElement::matrix(vl.db(), "p0").unwrap();
	assert_eq!(vl.add_element(&mut idx, clash), Err(SystemError::NameInUse("p0".into())));
	assert_eq!(vl.len(), 2);
}

/// Elements and indexes of other databases are rejected.
#[test]
fn test_add_foreign_rejected() {
	let (mut idx, mut vl) = setup();
	let stranger = VocabElement::predicate(DbTag::fresh(), "p").unwrap();
	assert_eq!(vl.add_element(&mut idx, stranger), Err(SystemError::ForeignDatabase));

	let mut other_idx = IdentityIndex::new(DbTag::fresh());
	let local = VocabElement::predicate(vl.db(), "p").unwrap();
	assert_eq!(vl.add_element(&mut other_idx, local), Err(SystemError::ForeignDatabase));
	assert!(idx.is_empty() && other_idx.is_empty() && vl.is_empty());
}

/// An empty predicate is a legal list member.
#[test]
fn test_empty_predicate_allowed() {
	let (mut idx, mut vl) = setup();
	let p2 = VocabElement::predicate(vl.db(), "p2").unwrap();
	let id = vl.add_element(&mut idx, p2).unwrap();
	assert_eq!(vl.get_vocab_element(id).unwrap().to_string(), "p2()");
}

/// Lookups by ID and by name, with kind checks.
#[test]
fn test_lookups() {
	let (mut idx, mut vl) = setup();
	let (m0, p0) = populate(&mut idx, &mut vl);

	assert_eq!(vl.get_vocab_element(p0).unwrap().to_string(), "p0(<alpha>)");
	assert_eq!(vl.get_vocab_element_by_name("m0").unwrap().id(), m0);
	assert_eq!(vl.get_matrix_vocab_element_by_name("m0").unwrap().id(), m0);
	assert_eq!(vl.get_predicate_vocab_element(p0).unwrap().name(), "p0");
	assert_eq!(
		vl.get_matrix_vocab_element(p0).map(drop),
		Err(SystemError::KindMismatch {
			expected: VeKind::Matrix,
			found: VeKind::Predicate
		})
	);
	assert!(vl.get_predicate_vocab_element_by_name("m0").is_err());

	assert_eq!(vl.get_vocab_element(DbId::INVALID).map(drop), Err(SystemError::InvalidId));
	assert_eq!(
		vl.get_vocab_element(DbId::new(2)).map(drop),
		Err(SystemError::UnknownElement(DbId::new(2)))
	);
	assert_eq!(
		vl.get_vocab_element_by_name("nope").map(drop),
		Err(SystemError::UnknownName("nope".into()))
	);
	assert!(matches!(
		vl.get_vocab_element_by_name(""),
		Err(SystemError::InvalidName { kind: NameKind::Lookup, .. })
	));
}

/// Kind-specific membership answers false for the other kind, but malformed
/// input is still an error.
#[test]
fn test_membership() {
	let (mut idx, mut vl) = setup();
	let (m0, p0) = populate(&mut idx, &mut vl);

	assert_eq!(vl.in_vocab_list(m0), Ok(true));
	assert_eq!(vl.in_vocab_list(DbId::new(99)), Ok(false));
	assert_eq!(vl.in_vocab_list(DbId::INVALID), Err(SystemError::InvalidId));
	assert_eq!(vl.matrix_in_vocab_list(m0), Ok(true));
	assert_eq!(vl.matrix_in_vocab_list(p0), Ok(false));
	assert_eq!(vl.pred_in_vocab_list(p0), Ok(true));
	assert_eq!(vl.pred_in_vocab_list(m0), Ok(false));

	assert_eq!(vl.in_vocab_list_by_name("p0"), Ok(true));
	assert_eq!(vl.in_vocab_list_by_name("q"), Ok(false));
	assert_eq!(vl.matrix_in_vocab_list_by_name("p0"), Ok(false));
	assert_eq!(vl.pred_in_vocab_list_by_name("p0"), Ok(true));
	assert!(vl.pred_in_vocab_list_by_name("(bad)").is_err());
	assert!(vl.in_vocab_list_by_name("").is_err());
}

/// Replacement keeps carried IDs, registers new arguments and drops removed
/// ones.
#[test]
fn test_replace_preserves_identity() {
	let (mut idx, mut vl) = setup();
	let (m0, _) = populate(&mut idx, &mut vl);

	let mut edited = vl.checkout(m0).unwrap();
	edited.rename_formal_arg(0, "<value>").unwrap();
	edited.append_formal_arg(untyped(vl.db(), "<extra>")).unwrap();
	vl.replace_vocab_element(&mut idx, edited.clone()).unwrap();

	let current = vl.get_vocab_element(m0).unwrap();
	assert_eq!(current.to_string(), "m0(<value>, <extra>)");
	assert_eq!(current.fargs()[0].id(), DbId::new(2));
	assert_eq!(current.fargs()[1].id(), DbId::new(9));
	assert_eq!(current.cp_args().unwrap()[3].id(), DbId::new(6));
	assert_eq!(current.cp_args().unwrap()[4].id(), DbId::new(10));
	assert_eq!(current.to_cp_string(), "m0(<ord>, <onset>, <offset>, <value>, <extra>)");
	vl.verify(&idx).unwrap();

	let mut shrunk = vl.checkout(m0).unwrap();
	shrunk.delete_formal_arg(0).unwrap();
	vl.replace_vocab_element(&mut idx, shrunk).unwrap();
	assert_eq!(idx.contains(DbId::new(2)), Ok(false));
	assert_eq!(idx.contains(DbId::new(6)), Ok(false));
	assert_eq!(vl.get_vocab_element(m0).unwrap().to_string(), "m0(<extra>)");
	vl.verify(&idx).unwrap();
}

/// The stored element reads back exactly as handed in once new IDs are
/// filled in.
#[test]
fn test_replace_round_trip() {
	let (mut idx, mut vl) = setup();
	let (_, p0) = populate(&mut idx, &mut vl);
	let mut edited = vl.checkout(p0).unwrap();
	edited.set_var_len(true).unwrap();
	let expected = edited.to_db_string();
	vl.replace_vocab_element(&mut idx, edited).unwrap();
	assert_eq!(vl.get_vocab_element(p0).unwrap().to_db_string(), expected);
}

/// A predicate cannot replace a matrix; the list stays as it was.
#[test]
fn test_replace_across_kinds_rejected() {
	let (mut idx, mut vl) = setup();
	let (m0, _) = populate(&mut idx, &mut vl);
	let before = vl.to_db_string();

	let mut impostor = VocabElement::predicate_with(vl.db(), "m0", [untyped(vl.db(), "<val>")]).unwrap();
	impostor.assign_id(m0);
	impostor.propagate_id();
	assert_eq!(
		vl.replace_vocab_element(&mut idx, impostor),
		Err(SystemError::KindMismatch {
			expected: VeKind::Matrix,
			found: VeKind::Predicate
		})
	);
	assert_eq!(vl.to_db_string(), before);
	vl.verify(&idx).unwrap();
}

/// Replacement errors for missing IDs, borrowed arguments and renames onto
/// taken names.
#[test]
fn test_replace_errors() {
	let (mut idx, mut vl) = setup();
	let (m0, p0) = populate(&mut idx, &mut vl);
	let db = vl.db();

	let detached = VocabElement::predicate(db, "p9").unwrap();
	assert_eq!(vl.replace_vocab_element(&mut idx, detached), Err(SystemError::InvalidId));

	let mut borrowed = vl.checkout(p0).unwrap();
	let alpha = borrowed.fargs()[0].id();
	let stolen = vl.checkout(m0).unwrap().copy_formal_arg(0).unwrap();
	let val = stolen.id();
	borrowed.append_formal_arg(stolen).unwrap();
	assert_eq!(
		vl.replace_vocab_element(&mut idx, borrowed),
		Err(SystemError::ForeignFormalArg(val))
	);

	let mut renamed = vl.checkout(p0).unwrap();
	renamed.set_name("m0").unwrap();
	assert_eq!(
		vl.replace_vocab_element(&mut idx, renamed),
		Err(SystemError::NameInUse("m0".into()))
	);
	assert_eq!(vl.get_vocab_element(p0).unwrap().fargs()[0].id(), alpha);
	vl.verify(&idx).unwrap();
}

/// Renaming moves the name lookup.
#[test]
fn test_rename_element() {
	let (mut idx, mut vl) = setup();
	let (_, p0) = populate(&mut idx, &mut vl);
	vl.modify(&mut idx, p0, |ve| ve.set_name("q0")).unwrap();
	assert_eq!(vl.in_vocab_list_by_name("p0"), Ok(false));
	assert_eq!(vl.get_vocab_element_by_name("q0").unwrap().id(), p0);
	vl.verify(&idx).unwrap();
}

/// Removal deregisters the element and every argument it held.
#[test]
fn test_remove_is_total() {
	let (mut idx, mut vl) = setup();
	let (m0, p0) = populate(&mut idx, &mut vl);
	let removed = vl.remove_vocab_element(&mut idx, m0).unwrap();

	assert_eq!(removed.name(), "m0");
	assert_eq!(vl.in_vocab_list(m0), Ok(false));
	assert_eq!(vl.in_vocab_list_by_name("m0"), Ok(false));
	assert!(vl.matrices().is_empty());
	for fa in removed.all_args() {
		assert_eq!(idx.contains(fa.id()), Ok(false));
	}
	assert_eq!(idx.ids(), vec![p0, DbId::new(8)]);
	assert_eq!(
		vl.remove_vocab_element(&mut idx, m0).map(drop),
		Err(SystemError::UnknownElement(m0))
	);
	vl.verify(&idx).unwrap();
}

/// Snapshots are copies in ascending ID order.
#[test]
fn test_partitions() {
	let (mut idx, mut vl) = setup();
	assert!(vl.preds().is_empty() && vl.matrices().is_empty());
	let (m0, p0) = populate(&mut idx, &mut vl);
	let p1 = vl
		.add_element(&mut idx, VocabElement::predicate(vl.db(), "p1").unwrap())
		.unwrap();

	let preds: Vec<DbId> = vl.preds().iter().map(VocabElement::id).collect();
	let matrices: Vec<DbId> = vl.matrices().iter().map(VocabElement::id).collect();
	assert_eq!(preds, vec![p0, p1]);
	assert_eq!(matrices, vec![m0]);

	let mut snapshot = vl.preds();
	snapshot[0].set_name("changed").unwrap();
	assert_eq!(vl.get_vocab_element(p0).unwrap().name(), "p0");
}

/// String forms list the elements in ID order.
#[test]
fn test_string_forms() {
	let (mut idx, mut vl) = setup();
	assert_eq!(vl.to_string(), "((VocabList) (vl_contents: ()))");
	assert_eq!(vl.to_db_string(), "((VocabList) (vl_size: 0) (vl_contents: ()))");

	populate(&mut idx, &mut vl);
	assert_eq!(vl.to_string(), "((VocabList) (vl_contents: (m0(<val>), p0(<alpha>))))");
	assert_eq!(
		vl.to_db_string(),
		"((VocabList) (vl_size: 2) (vl_contents: (\
		 ((MatrixVocabElement: 1 m0) (system: false) (type: MATRIX) (varLen: false) \
		 (fArgList: ((UnTypedFormalArg 2 <val>))), \
		 ((PredicateVocabElement: 7 p0) (system: false) (varLen: false) \
		 (fArgList: ((UnTypedFormalArg 8 <alpha>))))))"
	);
}

/// Dependents can veto a change, follow committed ones, and block removal
/// while they hold references.
#[test]
fn test_dependents() {
	let (mut idx, mut vl) = setup();
	let (_, p0) = populate(&mut idx, &mut vl);
	let log = Log::default();

	let key = vl
		.attach_dependent(p0, Recorder::boxed(&log, true, None))
		.unwrap();
	vl.modify(&mut idx, p0, |ve| ve.set_name("p1")).unwrap();
	assert_eq!(*log.borrow(), vec!["apply p0 -> p1".to_owned()]);

	assert_eq!(
		vl.remove_vocab_element(&mut idx, p0).map(drop),
		Err(SystemError::StillReferenced(p0))
	);

	let veto = vl
		.attach_dependent(p0, Recorder::boxed(&log, false, Some("cells disagree")))
		.unwrap();
	assert_eq!(
		vl.modify(&mut idx, p0, |ve| ve.set_var_len(true)),
		Err(SystemError::DependentRejected {
			id: p0,
			reason: "cells disagree".into()
		})
	);
	assert!(!vl.get_vocab_element(p0).unwrap().is_var_len());

	vl.detach_dependent(p0, veto).unwrap();
	vl.detach_dependent(p0, key).unwrap();
	assert_eq!(
		vl.detach_dependent(p0, key).map(drop),
		Err(SystemError::UnknownListener(key.0))
	);

	vl.attach_dependent(p0, Recorder::boxed(&log, false, None))
		.unwrap();
	vl.remove_vocab_element(&mut idx, p0).unwrap();
	assert_eq!(log.borrow().last(), Some(&format!("deleted {p0}")));
	assert!(vl.attach_dependent(p0, Recorder::boxed(&log, false, None)).is_err());
}

/// Observers see every insertion, replacement and removal.
#[test]
fn test_observers() {
	let (mut idx, mut vl) = setup();
	let log = Log::default();
	let key = vl.add_observer(Box::new(Watcher(Rc::clone(&log))));

	let (m0, p0) = populate(&mut idx, &mut vl);
	vl.modify(&mut idx, p0, |ve| ve.set_var_len(true)).unwrap();
	vl.remove_vocab_element(&mut idx, m0).unwrap();
	assert_eq!(
		*log.borrow(),
		vec![
			"inserted m0".to_owned(),
			"inserted p0".to_owned(),
			format!("changed {p0}"),
			format!("deleted {m0}"),
		]
	);

	assert!(vl.remove_observer(key).is_some());
	assert!(vl.remove_observer(key).is_none());
	vl.modify(&mut idx, p0, |ve| ve.set_var_len(false)).unwrap();
	assert_eq!(log.borrow().len(), 4);
}

/// System elements cannot be edited through the list.
#[test]
fn test_system_element_edits_rejected() {
	let (mut idx, mut vl) = setup();
	let mut sys = VocabElement::predicate_with(vl.db(), "sys", [untyped(vl.db(), "<a>")]).unwrap();
	sys.set_system().unwrap();
	let id = vl.add_element(&mut idx, sys).unwrap();
	assert_eq!(
		vl.modify(&mut idx, id, |ve| ve.set_name("other")),
		Err(SystemError::SystemElement("sys".into()))
	);
}

/// Tampering with the index is caught by the consistency check.
#[test]
fn test_verify_detects_tampering() {
	let (mut idx, mut vl) = setup();
	let (m0, _) = populate(&mut idx, &mut vl);
	idx.deregister(DbId::new(4)).unwrap();
	assert!(matches!(
		vl.verify(&idx),
		Err(SystemError::IndexInconsistent { .. })
	));
	assert!(matches!(
		vl.remove_vocab_element(&mut idx, m0),
		Err(SystemError::IndexInconsistent { .. })
	));
	assert_eq!(vl.in_vocab_list(m0), Ok(true));
}

/// A predicate approved by another element's predicate argument cannot be
/// removed until the approval is withdrawn.
#[test]
fn test_remove_approved_predicate_rejected() {
	let (mut idx, mut vl) = setup();
	let db = vl.db();
	let p0 = vl
		.add_element(&mut idx, VocabElement::predicate_with(db, "p0", [untyped(db, "<a>")]).unwrap())
		.unwrap();

	let mut fa = FormalArg::predicate(db, "<p>").unwrap();
	fa.set_sub_range(true).unwrap();
	fa.add_approved_pred(p0, &vl).unwrap();
	let p1 = vl
		.add_element(&mut idx, VocabElement::predicate_with(db, "p1", [fa]).unwrap())
		.unwrap();

	assert_eq!(
		vl.remove_vocab_element(&mut idx, p0).map(drop),
		Err(SystemError::StillReferenced(p0))
	);
	assert_eq!(vl.pred_in_vocab_list(p0), Ok(true));
	vl.verify(&idx).unwrap();

	let mut edited = vl.checkout(p1).unwrap();
	edited
		.update_formal_arg(0, |fa| fa.remove_approved_pred(p0, &vl))
		.unwrap();
	vl.replace_vocab_element(&mut idx, edited).unwrap();
	vl.remove_vocab_element(&mut idx, p0).unwrap();
	assert_eq!(
		vl.get_vocab_element(p1).unwrap().fargs()[0].to_db_string(),
		"(PredFormalArg 4 <p> true ())"
	);
	vl.verify(&idx).unwrap();
}

/// Approvals of predicates that have left the list are refused on add and
/// on replace; a predicate approving itself is still removable.
#[test]
fn test_stale_approvals_rejected() {
	let (mut idx, mut vl) = setup();
	let (_, p0) = populate(&mut idx, &mut vl);
	let db = vl.db();

	let mut stale = FormalArg::predicate(db, "<p>").unwrap();
	stale.set_sub_range(true).unwrap();
	stale.add_approved_pred(p0, &vl).unwrap();
	vl.remove_vocab_element(&mut idx, p0).unwrap();

	let before = idx.ids();
	let p1 = VocabElement::predicate_with(db, "p1", [stale.clone()]).unwrap();
	assert_eq!(vl.add_element(&mut idx, p1), Err(SystemError::UnknownElement(p0)));
	assert_eq!(idx.ids(), before);
	assert_eq!(vl.in_vocab_list_by_name("p1"), Ok(false));

	let mut open = FormalArg::predicate(db, "<q>").unwrap();
	open.set_sub_range(true).unwrap();
	let p2 = vl
		.add_element(&mut idx, VocabElement::predicate_with(db, "p2", [open]).unwrap())
		.unwrap();

	let mut edited = vl.checkout(p2).unwrap();
	edited.replace_formal_arg(stale, 0).unwrap();
	assert_eq!(
		vl.replace_vocab_element(&mut idx, edited),
		Err(SystemError::UnknownElement(p0))
	);
	assert_eq!(vl.get_vocab_element(p2).unwrap().fargs()[0].name(), "<q>");

	let mut edited = vl.checkout(p2).unwrap();
	edited
		.update_formal_arg(0, |fa| fa.add_approved_pred(p2, &vl))
		.unwrap();
	vl.replace_vocab_element(&mut idx, edited).unwrap();
	vl.verify(&idx).unwrap();
	vl.remove_vocab_element(&mut idx, p2).unwrap();
	vl.verify(&idx).unwrap();
}

/// A stale approval planted behind the list's back fails the consistency
/// check.
#[test]
fn test_verify_detects_stale_approval() {
	let (mut idx, mut vl) = setup();
	let (_, p0) = populate(&mut idx, &mut vl);
	let db = vl.db();

	let mut fa = FormalArg::predicate(db, "<p>").unwrap();
	fa.set_sub_range(true).unwrap();
	let p1 = vl
		.add_element(&mut idx, VocabElement::predicate_with(db, "p1", [fa]).unwrap())
		.unwrap();
	let planted = vl
		.elements
		.get_mut(&p1)
		.and_then(|ve| ve.all_args_mut().next())
		.unwrap();
	planted.pred_set_mut().unwrap().insert(DbId::new(99));
	assert!(matches!(
		vl.verify(&idx),
		Err(SystemError::IndexInconsistent { .. })
	));
	assert_eq!(vl.in_vocab_list(p0), Ok(true));
}

mod props {
	use std::collections::BTreeSet;

	use proptest::prelude::*;

	use super::*;

	proptest! {
		/// Random sequences of adds, edits and removals keep the list and
		/// index in a bijection, and never hand out an ID twice.
		#[test]
		fn prop_index_bijection(ops in proptest::collection::vec((0u8..4, 0usize..16, 0usize..3), 1..40)) {
			let (mut idx, mut vl) = setup();
			let db = vl.db();
			let mut seen = BTreeSet::new();
			let mut retired = BTreeSet::new();

			for (step, (op, pick, width)) in ops.into_iter().enumerate() {
				let ids = vl.ids();
				let target = (!ids.is_empty()).then(|| ids[pick % ids.len()]);
				let args = (0..width).map(|i| untyped(db, &format!("<a{i}>")));
				let _ = match (op, target) {
					(0, _) | (_, None) => {
						let ve = VocabElement::predicate_with(db, &format!("p{step}"), args).unwrap();
						vl.add_element(&mut idx, ve).map(drop)
					}
					(1, _) => {
						let ve = VocabElement::matrix_with(db, &format!("m{step}"), MatrixType::Matrix, args)
							.unwrap();
						vl.add_element(&mut idx, ve).map(drop)
					}
					(2, Some(id)) => vl.remove_vocab_element(&mut idx, id).map(drop),
					(_, Some(id)) => vl.modify(&mut idx, id, |ve| {
						if ve.num_formal_args() > 0 && pick % 2 == 0 {
							ve.delete_formal_arg(0).map(drop)
						} else {
							ve.append_formal_arg(untyped(ve.db(), &format!("<s{step}>")))
						}
					}),
				};

				prop_assert!(vl.verify(&idx).is_ok());
				let current: BTreeSet<DbId> = idx.ids().into_iter().collect();
				prop_assert!(current.is_disjoint(&retired));
				retired.extend(seen.difference(&current).copied());
				seen.extend(current);
			}
		}
	}
}
