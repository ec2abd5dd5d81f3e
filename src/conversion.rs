//! Conversions between RDF text, stores and member streams.

use crate::error::{ExtractorError, Result};
use crate::member::{Member, MemberItem};
use crate::vocab::tree;
use oxigraph::io::{RdfFormat, RdfParser, RdfSerializer};
use oxigraph::model::{GraphName, NamedNode, NamedOrBlankNodeRef, Quad, Term};
use oxigraph::store::Store;
use std::collections::HashSet;
use std::vec;

/// Parse RDF text of the given format into a new in-memory store
pub fn string_to_store(text: &str, format: RdfFormat, base_iri: Option<&str>) -> Result<Store> {
    let mut parser = RdfParser::from_format(format);
    if let Some(base) = base_iri {
        parser = parser
            .with_base_iri(base)
            .map_err(|e| ExtractorError::invalid_iri(base, e))?;
    }
    let store = Store::new()?;
    store.load_from_reader(parser, text.as_bytes())?;
    Ok(store)
}

pub fn turtle_to_store(text: &str, base_iri: Option<&str>) -> Result<Store> {
    string_to_store(text, RdfFormat::Turtle, base_iri)
}

/// Serialize quads as text of the given format
pub fn quads_to_string<'a>(
    quads: impl IntoIterator<Item = &'a Quad>,
    format: RdfFormat,
) -> Result<String> {
    let mut serializer = RdfSerializer::from_format(format).for_writer(Vec::new());
    for quad in quads {
        serializer.serialize_quad(quad)?;
    }
    let bytes = serializer.finish()?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Serialize the whole store as N-Quads
pub fn store_to_string(store: &Store) -> Result<String> {
    let quads = store.iter().collect::<std::result::Result<Vec<_>, _>>()?;
    quads_to_string(&quads, RdfFormat::NQuads)
}

/// Lazy member stream over a store.
///
/// Every object of a `tree:member` statement is a member. Its statements are the quads having it
/// as subject, plus the statements of the blank nodes it references (transitively).
/// Members are visited in the lexical order of their identifiers.
pub struct StoreMemberStream {
    store: Store,
    members: vec::IntoIter<Term>,
}

impl Iterator for StoreMemberStream {
    type Item = Result<MemberItem>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.members.next()?;
        let subject: Option<NamedOrBlankNodeRef<'_>> = match &id {
            Term::NamedNode(node) => Some(node.as_ref().into()),
            Term::BlankNode(node) => Some(node.as_ref().into()),
            _ => None,
        };
        let quads = match subject {
            Some(subject) => match describe(&self.store, subject) {
                Ok(quads) => quads,
                Err(e) => return Some(Err(e)),
            },
            None => Vec::new(),
        };
        Some(Ok(MemberItem::from_parts(Some(id), quads)))
    }
}

pub fn store_as_member_stream(store: &Store) -> Result<StoreMemberStream> {
    let mut members: Vec<Term> = Vec::new();
    let mut seen = HashSet::new();
    for quad in store.quads_for_pattern(None, Some(tree::MEMBER), None, None) {
        let quad = quad?;
        if seen.insert(quad.object.clone()) {
            members.push(quad.object);
        }
    }
    members.sort_by_cached_key(|term| term.to_string());

    Ok(StoreMemberStream {
        store: store.clone(),
        members: members.into_iter(),
    })
}

// Statements about `root`, followed through blank node objects.
fn describe(store: &Store, root: NamedOrBlankNodeRef<'_>) -> Result<Vec<Quad>> {
    let mut quads = Vec::new();
    let mut visited = HashSet::new();
    let mut queue = vec![root.into_owned()];

    while let Some(subject) = queue.pop() {
        if !visited.insert(subject.clone()) {
            continue;
        }
        for quad in store.quads_for_pattern(Some(subject.as_ref()), None, None, None) {
            let quad = quad?;
            if let Term::BlankNode(node) = &quad.object {
                queue.push(node.clone().into());
            }
            quads.push(quad);
        }
    }
    Ok(quads)
}

/// Drain a member stream into a new store, optionally linking every member to a collection
pub fn member_stream_to_store<I>(members: I, collection_identifier: Option<&str>) -> Result<Store>
where
    I: IntoIterator<Item = Result<Member>>,
{
    let collection = collection_identifier
        .map(|iri| NamedNode::new(iri).map_err(|e| ExtractorError::invalid_iri(iri, e)))
        .transpose()?;

    let store = Store::new()?;
    for member in members {
        let member = member?;
        for quad in &member.quads {
            store.insert(quad)?;
        }
        if let Some(collection) = &collection {
            let link = Quad::new(
                collection.clone(),
                tree::MEMBER.into_owned(),
                member.id.clone(),
                GraphName::DefaultGraph,
            );
            store.insert(&link)?;
        }
    }
    Ok(store)
}

/// Drain a member stream into a list
pub fn member_stream_to_list<I>(members: I) -> Result<Vec<Member>>
where
    I: IntoIterator<Item = Result<Member>>,
{
    members.into_iter().collect()
}
