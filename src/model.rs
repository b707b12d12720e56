//! Metadata model for the types being documented: built once, never mutated.

use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};

/// Property accessors compiled from `get_X` / `set_X` pairs.
static RE_ACCESSOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(get|set)_").unwrap());

/// Every type to document, plus the name of the assembly that declares them.
#[derive(Debug, Default, Deserialize)]
pub struct MetadataModel {
    /// Names the output root directory.
    pub assembly: String,
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    #[serde(default)]
    pub members: Vec<MemberDescriptor>,
    /// Declaring file, relative to the source root. When absent the file is
    /// located by matching its stem against `name`.
    #[serde(default)]
    pub source_file: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct MemberDescriptor {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    pub return_type: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub is_static: bool,
    /// Type that declares the member. `None` means the owning type.
    #[serde(default)]
    pub declaring_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    NonPublic,
}

impl MetadataModel {
    /// Read a model serialized as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read metadata model {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("invalid metadata model {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

impl TypeDescriptor {
    /// Instance members declared directly on this type with the given
    /// visibility, excluding property accessors, in model order.
    pub fn documented_members(
        &self,
        visibility: Visibility,
    ) -> impl Iterator<Item = &MemberDescriptor> + '_ {
        self.members.iter().filter(move |m| {
            m.visibility == visibility
                && !m.is_static
                && m.is_declared_on(&self.name)
                && m.is_documentable()
        })
    }
}

impl MemberDescriptor {
    /// Accessors (`get_*` / `set_*`) belong to properties, not to the member list.
    pub fn is_documentable(&self) -> bool {
        !RE_ACCESSOR.is_match(&self.name)
    }

    pub fn is_declared_on(&self, type_name: &str) -> bool {
        self.declaring_type.as_deref().unwrap_or(type_name) == type_name
    }

    /// Parameter type names in declared order.
    pub fn parameter_types(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.type_name.as_str()).collect()
    }
}
