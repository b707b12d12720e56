//! Correlator: match a member to its doc comment by signature fragments.
//!
//! The match is a conjunction of substring tests against the entry's
//! signature: the type name, the member name, and one clause per parameter
//! type in declared order. Clause order does not matter, and a parameter
//! type that occurs twice yields two identical clauses, which a single
//! occurrence in the signature satisfies.

use crate::docs::{DocEntry, DocIndex};
use crate::model::{MemberDescriptor, TypeDescriptor};
use tracing::debug;

/// Build the fragments every matching signature must contain.
pub fn match_clauses<'a>(
    type_name: &'a str,
    member_name: &'a str,
    parameter_types: &[&'a str],
) -> Vec<&'a str> {
    let mut clauses = Vec::with_capacity(parameter_types.len() + 2);
    clauses.push(type_name);
    clauses.push(member_name);
    clauses.extend_from_slice(parameter_types);
    clauses
}

/// Resolve the doc entry for one member. `None` means the member is
/// undocumented, which is not an error.
///
/// When several entries match, the first in load order wins and the
/// ambiguity is logged.
pub fn correlate<'d>(
    index: &'d DocIndex,
    type_name: &str,
    member_name: &str,
    parameter_types: &[&str],
) -> Option<&'d DocEntry> {
    let clauses = match_clauses(type_name, member_name, parameter_types);
    let mut matches = index.find_members(&clauses);
    let first = matches.next()?;
    let rest = matches.count();
    if rest > 0 {
        debug!(
            member = %format!("{}.{}", type_name, member_name),
            candidates = rest + 1,
            chosen = %first.signature,
            "ambiguous doc comment match"
        );
    }
    Some(first)
}

/// Convenience wrapper over [`correlate`] for a model member.
pub fn correlate_member<'d>(
    index: &'d DocIndex,
    ty: &TypeDescriptor,
    member: &MemberDescriptor,
) -> Option<&'d DocEntry> {
    correlate(index, &ty.name, &member.name, &member.parameter_types())
}
