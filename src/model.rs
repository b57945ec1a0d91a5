use serde::Serialize;

/// The `(text, annotation, source)` triple that decides whether two highlights
/// are the same record. The surrogate row id plays no part in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub text: String,
    pub annotation: Option<String>,
    pub source: Option<String>,
}

impl Identity {
    pub fn new(text: String, annotation: Option<String>, source: Option<String>) -> Self {
        Self {
            text,
            annotation,
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    #[serde(skip)]
    pub(crate) id: i64,
    pub text: String,
    pub annotation: Option<String>,
    pub source: Option<String>,
}

impl Highlight {
    pub fn identity(&self) -> Identity {
        Identity {
            text: self.text.clone(),
            annotation: self.annotation.clone(),
            source: self.source.clone(),
        }
    }

    pub fn into_identity(self) -> Identity {
        Identity {
            text: self.text,
            annotation: self.annotation,
            source: self.source,
        }
    }
}
