use crate::github::types::Issue;
use crate::journey::stage::Stage;

/// Active tag selection. Empty means everything is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
  active: Vec<String>,
}

impl TagFilter {
  /// Toggles each tag in turn, so a tag given twice ends up inactive.
  pub fn new<I, S>(tags: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut filter = Self::default();
    for tag in tags {
      filter.toggle(tag.as_ref());
    }
    filter
  }

  /// Adds the tag, or removes it if it is already active.
  pub fn toggle(&mut self, tag: &str) {
    if let Some(pos) = self.active.iter().position(|t| t == tag) {
      self.active.remove(pos);
    } else {
      self.active.push(tag.to_string());
    }
  }

  pub fn is_active(&self, tag: &str) -> bool {
    self.active.iter().any(|t| t == tag)
  }

  pub fn active(&self) -> &[String] {
    &self.active
  }

  pub fn is_empty(&self) -> bool {
    self.active.is_empty()
  }

  pub fn matches(&self, issue: &Issue) -> bool {
    self.is_empty() || self.active.iter().any(|t| issue.has_label(t))
  }

  /// Copies of `stages` holding only matching issues. Stages are never dropped.
  pub fn apply(&self, stages: &[Stage]) -> Vec<Stage> {
    stages
      .iter()
      .map(|stage| Stage {
        issues: stage
          .issues
          .iter()
          .filter(|i| self.matches(i))
          .cloned()
          .collect(),
        ..stage.clone()
      })
      .collect()
  }
}
