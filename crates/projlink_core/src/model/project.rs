//! Project entry domain model.
//!
//! # Responsibility
//! - Define the canonical record for one project or web-app link.
//! - Normalize and validate user-provided fields before the store accepts them.
//!
//! # Invariants
//! - `id` is assigned once at creation and never changes.
//! - `title` and `url` are non-empty after trimming for every accepted entry.
//! - `tags` never contain empty tokens; order and case are preserved.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for one project entry.
///
/// Persisted as plain text so ids written by older blobs stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ProjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Two-valued classification of an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// Source project (repository, library, experiment).
    #[default]
    Project,
    /// Deployed web application.
    Webapp,
}

impl ProjectKind {
    pub const ALL: [ProjectKind; 2] = [ProjectKind::Project, ProjectKind::Webapp];

    /// Wire name used in the persisted blob.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Webapp => "webapp",
        }
    }

    /// Human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::Webapp => "Web App",
        }
    }
}

impl Display for ProjectKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical persisted record for one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    /// Serialized as `type` to match the persisted blob schema.
    #[serde(rename = "type", default)]
    pub kind: ProjectKind,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ProjectEntry {
    /// Builds an entry from an id and already-normalized fields.
    pub fn from_fields(id: ProjectId, fields: ProjectFields) -> Self {
        Self {
            id,
            title: fields.title,
            description: fields.description,
            url: fields.url,
            kind: fields.kind,
            tags: fields.tags,
        }
    }

    /// Returns the mutable part of this entry, e.g. to pre-fill an edit form.
    pub fn fields(&self) -> ProjectFields {
        ProjectFields {
            title: self.title.clone(),
            description: self.description.clone(),
            url: self.url.clone(),
            kind: self.kind,
            tags: self.tags.clone(),
        }
    }

    /// Checks the invariants the store relies on for persisted entries.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::check(&self.title, &self.url)
    }
}

/// Everything about an entry except its id.
///
/// Input to create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFields {
    pub title: String,
    pub description: String,
    pub url: String,
    pub kind: ProjectKind,
    pub tags: Vec<String>,
}

impl ProjectFields {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_kind(mut self, kind: ProjectKind) -> Self {
        self.kind = kind;
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

    /// Trims text fields and drops blank tags.
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            url: self.url.trim().to_string(),
            kind: self.kind,
            tags: normalize_tags(&self.tags),
        }
    }

    /// Normalizes then validates; returns the fields the store will keep.
    pub fn into_validated(self) -> Result<Self, ValidationError> {
        let normalized = self.normalized();
        ValidationError::check(&normalized.title, &normalized.url)?;
        Ok(normalized)
    }
}

/// Field the store refuses to accept empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Title,
    Url,
}

impl RequiredField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Url => "url",
        }
    }
}

/// Missing required field(s) on create/update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub missing: Vec<RequiredField>,
}

impl ValidationError {
    fn check(title: &str, url: &str) -> Result<(), Self> {
        let mut missing = Vec::new();
        if title.trim().is_empty() {
            missing.push(RequiredField::Title);
        }
        if url.trim().is_empty() {
            missing.push(RequiredField::Url);
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Self { missing })
        }
    }

    pub fn is_missing(&self, field: RequiredField) -> bool {
        self.missing.contains(&field)
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.missing.iter().map(|field| field.as_str()).collect();
        write!(f, "missing required field(s): {}", names.join(", "))
    }
}

impl Error for ValidationError {}

/// Trims tags and drops empty tokens, keeping order and case.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses the comma-separated tags text typed into the entry form.
pub fn parse_tags_input(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Formats tags back into form text for editing.
pub fn format_tags_input(tags: &[String]) -> String {
    tags.join(", ")
}
