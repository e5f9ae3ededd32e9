use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{MapError, Result};

pub const DEFAULT_STAGE_COLOR: &str = "#E1E4E8";

/// Presentation config for one journey stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StageMetadata {
  pub color: String,
  #[serde(default)]
  pub actions: Vec<String>,
  #[serde(default)]
  pub touchpoints: Vec<String>,
}

impl StageMetadata {
  fn fallback() -> Self {
    Self {
      color: DEFAULT_STAGE_COLOR.to_string(),
      actions: Vec::new(),
      touchpoints: Vec::new(),
    }
  }
}

/// Stage name to metadata. Built once at startup and only read afterwards.
#[derive(Debug, Clone)]
pub struct MetadataTable {
  entries: HashMap<String, StageMetadata>,
  fallback: StageMetadata,
}

impl Default for MetadataTable {
  fn default() -> Self {
    Self::from_entries(HashMap::new())
  }
}

impl MetadataTable {
  pub fn from_entries(entries: HashMap<String, StageMetadata>) -> Self {
    Self {
      entries,
      fallback: StageMetadata::fallback(),
    }
  }

  /// Returns the entry for `name`, or the grey default with no actions.
  pub fn lookup(&self, name: &str) -> &StageMetadata {
    self.entries.get(name).unwrap_or(&self.fallback)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Entries sorted by stage name.
  pub fn entries(&self) -> Vec<(&str, &StageMetadata)> {
    let mut entries: Vec<_> = self
      .entries
      .iter()
      .map(|(name, meta)| (name.as_str(), meta))
      .collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
  }

  pub fn load(path: &Path) -> Result<Self> {
    if !path.exists() {
      return Err(MapError::ConfigNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let entries: HashMap<String, StageMetadata> = serde_yaml::from_str(&content)?;
    info!(
      "loaded metadata for {} stage(s) from {}",
      entries.len(),
      path.display()
    );
    Ok(Self::from_entries(entries))
  }

  pub fn builtin() -> Self {
    let entries = BUILTIN
      .iter()
      .map(|(name, color, actions)| {
        (
          name.to_string(),
          StageMetadata {
            color: color.to_string(),
            actions: actions.iter().map(|a| a.to_string()).collect(),
            touchpoints: Vec::new(),
          },
        )
      })
      .collect();
    Self::from_entries(entries)
  }
}

type BuiltinEntry = (&'static str, &'static str, &'static [&'static str]);

const BUILTIN: &[BuiltinEntry] = &[
  (
    "Discovery",
    "#CDF4D3",
    &[
      "Attend Events",
      "Participate in Hackathons",
      "Consume Stacks/Hiro content",
    ],
  ),
  (
    "Research: Stacks & Hiro",
    "#C6FAF6",
    &[
      "Peruse Stacks / Hiro websites",
      "Consume Stacks/Hiro content",
      "Investigate specific Stacks use cases",
    ],
  ),
  (
    "Evaluate: The Stacks Ecosystem",
    "#C6FAF6",
    &[
      "Explore OSS Repositories",
      "Trial Live Applications on Mainnet",
      "Investigate specific Stacks use cases",
    ],
  ),
  (
    "Evaluate: Tooling & Resources",
    "#C6FAF6",
    &[
      "Peruse Stacks / Hiro Docs",
      "Investigate Available Tools & Resources",
      "Evaluate the maturity of the developer experience",
    ],
  ),
  (
    "Learn: Examples & Guides",
    "#C2E5FF",
    &[
      "Tinker with Examples",
      "Tinker with OSS Smart Contracts in Explorer Sandbox",
      "Experiment w/ Clarity in Clarity Playground",
      "Write basic contract functions",
      "Call/test contract functions",
      "Complete Tutorials",
    ],
  ),
  (
    "Experiment: Test Project",
    "#C2E5FF",
    &[
      "Setup a basic developer environment",
      "Configure boilerplate",
      "Clone an example project / recipe / template",
      "Modify or author a basic smart contract",
      "Build and integrate with a basic front-end",
      "Test basic contract functions",
      "Deploy project to test the deployment experience",
    ],
  ),
  (
    "Build: Project Planning",
    "#DCCCFF",
    &[
      "Define and design project architecture",
      "Identify necessary dependencies",
      "Identify available primitives and ready-to-use components",
    ],
  ),
  (
    "Build: Setup & Configuration",
    "#DCCCFF",
    &[
      "Setup and configure Hiro development environment",
      "Setup and configure essential tools and services",
      "Create new project repository",
      "Seek support when troubleshooting",
    ],
  ),
  (
    "Build: Core Development",
    "#DCCCFF",
    &[
      "Refine project architecture",
      "Author Smart Contracts",
      "Build application front-ends",
      "Write tests",
      "Begin integrating with Hiro tools and services",
      "Seek support when troubleshooting",
    ],
  ),
  (
    "Build: Validate & Iterate",
    "#DCCCFF",
    &[
      "Test and Validate Smart Contracts",
      "Deploy to Test Environments",
      "Conduct contract security audits",
      "Simulate transactions",
      "Stress and load testing",
      "Diagnose and troubleshoot",
      "User Testing",
    ],
  ),
  (
    "Build: Launch & Monitor",
    "#DCCCFF",
    &[
      "Final reviews and audits",
      "Deploy to Mainnet",
      "Monitor contract functionality",
      "Monitor API and service usage",
      "Monitor performance",
      "Diagnose and troubleshoot",
    ],
  ),
  (
    "Market & Generate Support",
    "#FFC7C2",
    &[
      "Initial marketing across social channels",
      "Initial fundraising",
    ],
  ),
  (
    "Scale & Grow",
    "#FFE0C2",
    &[
      "Hiring and increasing team headcount",
      "Predict infrastructure costs",
      "Simulate increased load / traffic",
      "Collaborative Development",
      "Continued monitoring of contract and application security, performance, and usage.",
    ],
  ),
];

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;
  use tempfile::NamedTempFile;

  #[test]
  fn test_builtin_table() {
    let table = MetadataTable::builtin();
    assert_eq!(table.len(), 13);

    let discovery = table.lookup("Discovery");
    assert_eq!(discovery.color, "#CDF4D3");
    assert_eq!(discovery.actions.len(), 3);
    assert!(discovery.touchpoints.is_empty());
  }

  #[test]
  fn test_missing_stage_falls_back_to_default() {
    let table = MetadataTable::builtin();
    let meta = table.lookup("Somewhere Else");
    assert_eq!(meta.color, DEFAULT_STAGE_COLOR);
    assert!(meta.actions.is_empty());
    assert!(meta.touchpoints.is_empty());
  }

  #[test]
  fn test_lookup_is_case_sensitive() {
    let table = MetadataTable::builtin();
    assert_eq!(table.lookup("discovery").color, DEFAULT_STAGE_COLOR);
  }

  #[test]
  fn test_entries_are_sorted() {
    let table = MetadataTable::builtin();
    let names: Vec<&str> = table.entries().into_iter().map(|(n, _)| n).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
  }

  #[test]
  fn test_load_from_yaml() {
    let mut tmp = NamedTempFile::new().unwrap();
    writeln!(
      tmp,
      r##"
Discovery:
  color: "#000000"
  actions: [Read the blog]
  touchpoints: [Blog, Social]
Build:
  color: "#FFFFFF"
"##
    )
    .unwrap();

    let table = MetadataTable::load(tmp.path()).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.lookup("Discovery").touchpoints, vec!["Blog", "Social"]);
    assert!(table.lookup("Build").actions.is_empty());
  }

  #[test]
  fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = MetadataTable::load(&dir.path().join("stages.yaml")).unwrap_err();
    assert!(matches!(err, MapError::ConfigNotFound(_)));
  }
}
