//! Terms used by Linked Data Event Streams and their extractions.

pub use oxigraph::model::vocab::{rdf, xsd};

pub mod ldes {
    use oxigraph::model::NamedNodeRef;

    pub const EVENT_STREAM: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("https://w3id.org/ldes#EventStream");
    pub const VERSION_OF_PATH: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("https://w3id.org/ldes#versionOfPath");
    pub const TIMESTAMP_PATH: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("https://w3id.org/ldes#timestampPath");
}

pub mod tree {
    use oxigraph::model::NamedNodeRef;

    pub const COLLECTION: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("https://w3id.org/tree#Collection");
    pub const MEMBER: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("https://w3id.org/tree#member");
}

pub mod dct {
    use oxigraph::model::NamedNodeRef;

    pub const IS_VERSION_OF: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/isVersionOf");
    pub const ISSUED: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/issued");
    pub const CREATED: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/created");
    pub const TITLE: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/title");
}
