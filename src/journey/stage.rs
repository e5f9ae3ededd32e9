use serde::Serialize;

use crate::github::types::{Issue, StageOption};
use crate::journey::metadata::StageMetadata;

/// One column of the experience map.
#[derive(Debug, Clone, Serialize)]
pub struct Stage {
  pub title: String,
  pub description: String,
  pub color: String,
  pub actions: Vec<String>,
  pub touchpoints: Vec<String>,
  pub issues: Vec<Issue>,
}

impl Stage {
  pub fn new(option: &StageOption, metadata: &StageMetadata) -> Self {
    let mut stage = Self {
      title: option.name.clone(),
      description: option.description.clone().unwrap_or_default(),
      color: metadata.color.clone(),
      actions: metadata.actions.clone(),
      touchpoints: Vec::new(),
      issues: Vec::new(),
    };
    for touchpoint in &metadata.touchpoints {
      stage.add_touchpoint(touchpoint);
    }
    stage
  }

  /// Keeps first-seen order and ignores names already present.
  pub fn add_touchpoint(&mut self, name: &str) {
    if !self.touchpoints.iter().any(|t| t == name) {
      self.touchpoints.push(name.to_string());
    }
  }

  pub fn push_issue(&mut self, issue: Issue) {
    for label in issue.label_names() {
      self.add_touchpoint(label);
    }
    self.issues.push(issue);
  }
}
