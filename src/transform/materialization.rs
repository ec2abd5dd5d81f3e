use crate::member::Member;
use oxigraph::model::{NamedNodeRef, NamedOrBlankNode, Quad, Term};

/// Reframes the statements of a version-specific member under its version identifier.
///
/// Only the timestamp statement of the member is re-subjected; every other statement keeps its
/// original subject. When the version identifier is a literal it cannot be a subject and the
/// timestamp statement is copied unchanged.
pub fn materialize(member: &Member, version: &Term, timestamp_path: NamedNodeRef<'_>) -> Vec<Quad> {
    let version_subject: Option<NamedOrBlankNode> = match version {
        Term::NamedNode(node) => Some(node.clone().into()),
        Term::BlankNode(node) => Some(node.clone().into()),
        _ => None,
    };

    member
        .quads
        .iter()
        .map(|quad| match &version_subject {
            Some(subject)
                if quad.subject == member.id && quad.predicate.as_ref() == timestamp_path =>
            {
                Quad::new(
                    subject.clone(),
                    quad.predicate.clone(),
                    quad.object.clone(),
                    quad.graph_name.clone(),
                )
            }
            _ => quad.clone(),
        })
        .collect()
}
