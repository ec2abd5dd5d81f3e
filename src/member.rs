use oxigraph::model::{NamedNodeRef, NamedOrBlankNode, Quad, Term};

// One entry of an event stream: a root identifier plus the statements about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: NamedOrBlankNode,
    pub quads: Vec<Quad>,
}

impl Member {
    pub fn new(id: impl Into<NamedOrBlankNode>, quads: Vec<Quad>) -> Self {
        Self {
            id: id.into(),
            quads,
        }
    }

    /// The lexical value of the root identifier (IRI or blank node id)
    pub fn id_value(&self) -> &str {
        match &self.id {
            NamedOrBlankNode::NamedNode(node) => node.as_str(),
            NamedOrBlankNode::BlankNode(node) => node.as_str(),
        }
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Distinct objects of the statements `<id> <predicate> ?o`, in statement order
    pub fn objects_of(&self, predicate: NamedNodeRef<'_>) -> Vec<&Term> {
        let mut objects: Vec<&Term> = Vec::new();
        for quad in &self.quads {
            if quad.subject == self.id
                && quad.predicate.as_ref() == predicate
                && !objects.contains(&&quad.object)
            {
                objects.push(&quad.object);
            }
        }
        objects
    }
}

/// An item travelling through the member stream.
///
/// Sources tag every item up front, so stream stages never have to inspect
/// the shape of what they receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberItem {
    Member(Member),
    Malformed(String),
}

impl MemberItem {
    /// Builds an item from a candidate root term and its statements.
    ///
    /// Well-formed means: the root is an IRI or blank node and there is at least one statement.
    pub fn from_parts(id: Option<Term>, quads: Vec<Quad>) -> Self {
        let id = match id {
            Some(Term::NamedNode(node)) => NamedOrBlankNode::from(node),
            Some(Term::BlankNode(node)) => NamedOrBlankNode::from(node),
            Some(other) => {
                return MemberItem::Malformed(format!("member root is not a resource: {other}"));
            }
            None => return MemberItem::Malformed("member without root identifier".to_string()),
        };
        Member::new(id, quads).into()
    }

    pub fn is_member(&self) -> bool {
        matches!(self, MemberItem::Member(_))
    }
}

impl From<Member> for MemberItem {
    fn from(member: Member) -> Self {
        if member.quads.is_empty() {
            MemberItem::Malformed(format!("member {} has no statements", member.id))
        } else {
            MemberItem::Member(member)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::{GraphName, Literal, NamedNode};

    fn title_quad(subject: &str, title: &str) -> Quad {
        Quad::new(
            NamedNode::new(subject).unwrap(),
            NamedNode::new("http://purl.org/dc/terms/title").unwrap(),
            Literal::new_simple_literal(title),
            GraphName::DefaultGraph,
        )
    }

    #[test]
    fn test_member_objects() {
        let id = NamedNode::new("http://example.org/resource1v0").unwrap();
        let member = Member::new(
            id.clone(),
            vec![
                title_quad("http://example.org/resource1v0", "first"),
                title_quad("http://example.org/other", "not about the member"),
                title_quad("http://example.org/resource1v0", "first"),
            ],
        );

        let title = NamedNodeRef::new("http://purl.org/dc/terms/title").unwrap();
        let objects = member.objects_of(title);
        assert_eq!(objects.len(), 1);
        assert_eq!(member.len(), 3);
        assert_eq!(member.id_value(), "http://example.org/resource1v0");
    }

    #[test]
    fn test_well_formed_item() {
        let id = NamedNode::new("http://example.org/resource1v0").unwrap();
        let item = MemberItem::from_parts(
            Some(Term::NamedNode(id)),
            vec![title_quad("http://example.org/resource1v0", "first")],
        );
        assert!(item.is_member());
    }

    #[test]
    fn test_malformed_items() {
        let quads = vec![title_quad("http://example.org/a", "a")];
        assert!(!MemberItem::from_parts(None, quads).is_member());
        assert!(
            !MemberItem::from_parts(
                Some(Term::Literal(Literal::new_simple_literal("not a member"))),
                vec![title_quad("http://example.org/a", "a")]
            )
            .is_member()
        );

        let empty = Member::new(NamedNode::new("http://example.org/a").unwrap(), Vec::new());
        assert!(!MemberItem::from(empty).is_member());
    }
}
