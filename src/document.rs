use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub type DocId = u64;

/// Kind of record, used by collaborators to post-filter results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    #[default]
    Policy,
    Onboarding,
}

impl std::str::FromStr for DocumentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "policy" => Ok(Self::Policy),
            "onboarding" => Ok(Self::Onboarding),
            other => Err(Error::Config(format!("unknown document type '{other}'"))),
        }
    }
}

/// Document represents a searchable policy or onboarding record.
///
/// Owned by whoever supplies the document set; the index only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, alias = "documentType")]
    pub document_type: DocumentType,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_active", alias = "is_active", alias = "isActive")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Document {
    pub fn new(id: DocId, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            content: content.into(),
            category: String::new(),
            document_type: DocumentType::default(),
            tags: Vec::new(),
            active: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_type(mut self, document_type: DocumentType) -> Self {
        self.document_type = document_type;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Tags joined into one space-separated string for indexing
    pub fn tags_text(&self) -> String {
        self.tags.join(" ")
    }
}

/// Load a document set from a JSON array on disk
pub fn load_documents<P: AsRef<Path>>(path: P) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_defaults_and_aliases() {
        let json = r#"[
            {"id": 1, "name": "Password Policy", "isActive": false, "documentType": "onboarding"},
            {"id": 2, "name": "VPN Guide", "tags": ["vpn", "setup"]}
        ]"#;
        let docs: Vec<Document> = serde_json::from_str(json).unwrap();

        assert!(!docs[0].active);
        assert_eq!(docs[0].document_type, DocumentType::Onboarding);
        assert_eq!(docs[0].description, None);
        assert!(docs[1].active);
        assert_eq!(docs[1].tags_text(), "vpn setup");
    }

    #[test]
    fn test_document_type_from_str() {
        assert_eq!("Policy".parse::<DocumentType>().unwrap(), DocumentType::Policy);
        assert!("memo".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_documents("/nonexistent/documents.json").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
