#![allow(dead_code)]

use shapa_primitives::{DbId, DbTag};

use super::*;
use crate::element::MatrixType;
use crate::index::Indexed;

fn arg(db: DbTag, name: &str) -> FormalArg {
	FormalArg::untyped(db, name).unwrap()
}

/// List, index and counter, as seen from outside.
fn fingerprint(vl: &VocabList, idx: &IdentityIndex) -> (String, Vec<DbId>, DbId) {
	(vl.to_db_string(), idx.ids(), idx.next_id())
}

/// Invariant: The index holds exactly the elements and arguments of the list,
/// each under its own ID, through adds, edits and removals.
pub(crate) fn inv_index_bijection() {
	let db = DbTag::fresh();
	let mut idx = IdentityIndex::new(db);
	let mut vl = VocabList::new(db);

	let mut ids = Vec::new();
	for i in 0..4 {
		let m = VocabElement::matrix_with(
			db,
			&format!("m{i}"),
			MatrixType::Matrix,
			[arg(db, "<a>"), arg(db, "<b>")],
		)
		.unwrap();
		ids.push(vl.add_element(&mut idx, m).unwrap());
		let p = VocabElement::predicate_with(db, &format!("p{i}"), [arg(db, "<x>")]).unwrap();
		ids.push(vl.add_element(&mut idx, p).unwrap());
	}
	vl.verify(&idx).unwrap();

	vl.modify(&mut idx, ids[0], |ve| {
		ve.delete_formal_arg(1)?;
		ve.append_formal_arg(FormalArg::integer(ve.db(), "<c>")?)
	})
	.unwrap();
	vl.modify(&mut idx, ids[1], |ve| ve.insert_formal_arg(arg(ve.db(), "<w>"), 0))
		.unwrap();
	vl.remove_vocab_element(&mut idx, ids[2]).unwrap();
	vl.verify(&idx).unwrap();

	for id in vl.ids() {
		let ve = vl.get_vocab_element(id).unwrap();
		assert_eq!(ve.id(), id);
		assert!(idx.holds(ve));
		for fa in ve.all_args() {
			assert!(idx.holds(fa), "{} of {} not held", fa.name(), ve.name());
			assert_eq!(idx.lookup(fa.id()).unwrap().owner(), Some(id));
		}
	}
}

#[cfg_attr(test, test)]
pub(crate) fn test_index_bijection() {
	inv_index_bijection()
}

/// Invariant: No two elements share a name, whatever their kinds, and the
/// name lookup agrees with each element.
pub(crate) fn inv_names_unique() {
	let db = DbTag::fresh();
	let mut idx = IdentityIndex::new(db);
	let mut vl = VocabList::new(db);

	let p = vl
		.add_element(&mut idx, VocabElement::predicate(db, "shared").unwrap())
		.unwrap();
	let m = vl
		.add_element(&mut idx, VocabElement::matrix(db, "other").unwrap())
		.unwrap();

	assert!(vl.add_element(&mut idx, VocabElement::matrix(db, "shared").unwrap()).is_err());
	assert!(vl.modify(&mut idx, m, |ve| ve.set_name("shared")).is_err());
	// Names are case sensitive.
	vl.add_element(&mut idx, VocabElement::predicate(db, "Shared").unwrap())
		.unwrap();

	vl.modify(&mut idx, p, |ve| ve.set_name("renamed")).unwrap();
	vl.modify(&mut idx, m, |ve| ve.set_name("shared")).unwrap();

	let mut names: Vec<String> = vl
		.ids()
		.into_iter()
		.map(|id| vl.get_vocab_element(id).unwrap().name().to_owned())
		.collect();
	for name in &names {
		assert_eq!(vl.get_vocab_element_by_name(name).unwrap().name(), name.as_str());
	}
	let total = names.len();
	names.sort();
	names.dedup();
	assert_eq!(names.len(), total);
	vl.verify(&idx).unwrap();
}

#[cfg_attr(test, test)]
pub(crate) fn test_names_unique() {
	inv_names_unique()
}

/// Invariant: An operation that fails changes neither the list nor the index,
/// and consumes no IDs.
pub(crate) fn inv_failed_ops_leave_no_trace() {
	let db = DbTag::fresh();
	let mut idx = IdentityIndex::new(db);
	let mut vl = VocabList::new(db);
	let m0 = VocabElement::matrix_with(db, "m0", MatrixType::Matrix, [arg(db, "<val>")]).unwrap();
	let m0 = vl.add_element(&mut idx, m0).unwrap();
	let p0 = VocabElement::predicate_with(db, "p0", [arg(db, "<alpha>")]).unwrap();
	let p0 = vl.add_element(&mut idx, p0).unwrap();
	let before = fingerprint(&vl, &idx);

	let dup = VocabElement::predicate_with(db, "p0", [arg(db, "<beta>")]).unwrap();
	assert!(vl.add_element(&mut idx, dup).is_err());

	let mut cross = VocabElement::predicate(db, "m0").unwrap();
	cross.assign_id(m0);
	assert!(vl.replace_vocab_element(&mut idx, cross).is_err());

	let mut foreign = vl.checkout(p0).unwrap();
	let stolen = vl.checkout(m0).unwrap().copy_formal_arg(0).unwrap();
	foreign.append_formal_arg(stolen).unwrap();
	assert!(vl.replace_vocab_element(&mut idx, foreign).is_err());

	// The closure fails after a successful edit; nothing is replaced.
	assert!(vl
		.modify(&mut idx, p0, |ve| {
			ve.append_formal_arg(arg(ve.db(), "<gamma>"))?;
			ve.append_formal_arg(arg(ve.db(), "<gamma>"))
		})
		.is_err());

	assert!(vl.remove_vocab_element(&mut idx, DbId::INVALID).is_err());
	assert!(vl.remove_vocab_element(&mut idx, DbId::new(2)).is_err());

	assert_eq!(fingerprint(&vl, &idx), before);
	vl.verify(&idx).unwrap();
}

#[cfg_attr(test, test)]
pub(crate) fn test_failed_ops_leave_no_trace() {
	inv_failed_ops_leave_no_trace()
}

/// Invariant: Every approved predicate ID held by any argument names a
/// predicate in the list, so approved predicates cannot be removed.
pub(crate) fn inv_approvals_live() {
	let db = DbTag::fresh();
	let mut idx = IdentityIndex::new(db);
	let mut vl = VocabList::new(db);

	let p0 = vl
		.add_element(&mut idx, VocabElement::predicate_with(db, "p0", [arg(db, "<a>")]).unwrap())
		.unwrap();
	let mut fa = FormalArg::predicate(db, "<p>").unwrap();
	fa.set_sub_range(true).unwrap();
	fa.add_approved_pred(p0, &vl).unwrap();
	let m0 = VocabElement::matrix_with(db, "m0", MatrixType::Matrix, [fa]).unwrap();
	let m0 = vl.add_element(&mut idx, m0).unwrap();

	let before = fingerprint(&vl, &idx);
	assert_eq!(
		vl.remove_vocab_element(&mut idx, p0).map(drop),
		Err(SystemError::StillReferenced(p0))
	);
	assert_eq!(fingerprint(&vl, &idx), before);

	for id in vl.ids() {
		for fa in vl.get_vocab_element(id).unwrap().all_args() {
			for pred in fa.approved_preds().into_iter().flatten() {
				assert_eq!(vl.pred_in_vocab_list(pred), Ok(true));
			}
		}
	}

	vl.remove_vocab_element(&mut idx, m0).unwrap();
	vl.remove_vocab_element(&mut idx, p0).unwrap();
	vl.verify(&idx).unwrap();
}

#[cfg_attr(test, test)]
pub(crate) fn test_approvals_live() {
	inv_approvals_live()
}
