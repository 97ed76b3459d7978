use super::{Id, Kind, Object, RevObject};

/// Leaf content. The canonical form of a blob is its raw bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RevBlob {
    id: Id,
    content: Vec<u8>,
}

impl RevBlob {
    /// Create a blob. The ID is computed from the content.
    pub fn new(content: Vec<u8>) -> RevBlob {
        let id = super::hash_object(Kind::Blob, &content);
        RevBlob { id, content }
    }

    /// Replace the declared ID, as a peer would when sending the blob.
    pub fn with_declared_id(mut self, id: Id) -> RevBlob {
        self.id = id;
        self
    }

    /// Return the raw content.
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

impl RevObject for RevBlob {
    fn id(&self) -> &Id {
        &self.id
    }

    fn kind(&self) -> Kind {
        Kind::Blob
    }

    fn to_object(&self) -> Object {
        Object::new(Kind::Blob, self.content.clone())
    }
}
