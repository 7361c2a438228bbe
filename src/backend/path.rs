use std::fmt;

/// Slash-separated path of a collection, e.g. `usuarios/abc123/injuries`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(String);

/// Slash-separated path of a single document, e.g. `usuarios/abc123`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath(String);

impl CollectionPath {
    pub fn root(name: &str) -> Self {
        Self(name.trim_matches('/').to_string())
    }

    pub fn doc(&self, id: &str) -> DocumentPath {
        DocumentPath(format!("{}/{}", self.0, id.trim_matches('/')))
    }

    /// Last path segment, the collection id used by structured queries
    pub fn collection_id(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Owning document for subcollections, `None` for top-level collections
    pub fn parent(&self) -> Option<DocumentPath> {
        self.0
            .rsplit_once('/')
            .map(|(parent, _)| DocumentPath(parent.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl DocumentPath {
    pub fn collection(&self, name: &str) -> CollectionPath {
        CollectionPath(format!("{}/{}", self.0, name.trim_matches('/')))
    }

    pub fn id(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subcollection_paths() {
        let users = CollectionPath::root("usuarios");
        let student = users.doc("s1");
        let injuries = student.collection("injuries");

        assert_eq!(student.as_str(), "usuarios/s1");
        assert_eq!(student.id(), "s1");
        assert_eq!(injuries.as_str(), "usuarios/s1/injuries");
        assert_eq!(injuries.collection_id(), "injuries");
        assert_eq!(injuries.parent(), Some(student));
        assert_eq!(users.parent(), None);
    }
}
