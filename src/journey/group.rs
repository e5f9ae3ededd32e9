use tracing::{debug, info, warn};

use crate::github::types::{FieldValue, Issue, StageField, StageOption};
use crate::journey::metadata::MetadataTable;
use crate::journey::stage::Stage;

pub const STAGE_FIELD_NAME: &str = "Developer Journey Stage";
pub const CATEGORY_FIELD_NAME: &str = "Category";
/// Option id of "Pain Point" in the `Category` field of the reference project.
pub const DEFAULT_PAIN_POINT_OPTION_ID: &str = "5d4c3b7e";

/// Which project fields drive classification and which category counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationPolicy {
  pub stage_field: String,
  pub category_field: String,
  pub pain_point_option_id: String,
}

impl Default for ClassificationPolicy {
  fn default() -> Self {
    Self::with_pain_point(DEFAULT_PAIN_POINT_OPTION_ID)
  }
}

impl ClassificationPolicy {
  pub fn with_pain_point(option_id: &str) -> Self {
    Self {
      stage_field: STAGE_FIELD_NAME.to_string(),
      category_field: CATEGORY_FIELD_NAME.to_string(),
      pain_point_option_id: option_id.to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
  NoProjectItem,
  NoFieldValues,
  NoCategory,
  NotPainPoint,
  NoStageValue,
  UnknownStageOption(String),
}

impl std::fmt::Display for SkipReason {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      SkipReason::NoProjectItem => write!(f, "no project item"),
      SkipReason::NoFieldValues => write!(f, "no field values"),
      SkipReason::NoCategory => write!(f, "no category"),
      SkipReason::NotPainPoint => write!(f, "category is not a pain point"),
      SkipReason::NoStageValue => write!(f, "no journey stage"),
      SkipReason::UnknownStageOption(id) => write!(f, "unknown stage option {id}"),
    }
  }
}

/// What happened to one input issue. `Ok` holds the stage index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueOutcome {
  pub number: u64,
  pub result: Result<usize, SkipReason>,
}

#[derive(Debug, Clone, Default)]
pub struct Grouping {
  pub stages: Vec<Stage>,
  pub outcomes: Vec<IssueOutcome>,
}

impl Grouping {
  pub fn skipped(&self) -> impl Iterator<Item = (u64, &SkipReason)> {
    self
      .outcomes
      .iter()
      .filter_map(|o| o.result.as_ref().err().map(|r| (o.number, r)))
  }

  pub fn classified(&self) -> usize {
    self.outcomes.iter().filter(|o| o.result.is_ok()).count()
  }
}

fn find_value<'a>(values: &'a [&'a FieldValue], field: &str) -> Option<&'a FieldValue> {
  values.iter().copied().find(|v| v.field_name() == Some(field))
}

/// Decides which stage, if any, an issue belongs to.
pub fn classify_issue(
  issue: &Issue,
  options: &[StageOption],
  policy: &ClassificationPolicy,
) -> Result<usize, SkipReason> {
  let item = issue
    .project_items
    .as_ref()
    .and_then(|items| items.first())
    .ok_or(SkipReason::NoProjectItem)?;

  let values: Vec<&FieldValue> = item
    .field_values
    .as_ref()
    .map(|c| c.iter().collect())
    .unwrap_or_default();
  if values.is_empty() {
    return Err(SkipReason::NoFieldValues);
  }

  let category = find_value(&values, &policy.category_field).ok_or(SkipReason::NoCategory)?;
  if category.option_id() != Some(policy.pain_point_option_id.as_str()) {
    return Err(SkipReason::NotPainPoint);
  }

  let option_id = find_value(&values, &policy.stage_field)
    .and_then(FieldValue::option_id)
    .ok_or(SkipReason::NoStageValue)?;

  options
    .iter()
    .position(|o| o.id == option_id)
    .ok_or_else(|| SkipReason::UnknownStageOption(option_id.to_string()))
}

/// Buckets pain-point issues into one stage per option of the stage field.
/// Stages follow option order and exist even when nothing lands in them.
pub fn group_issues_by_stage(
  issues: Vec<Issue>,
  stage_field: Option<&StageField>,
  metadata: &MetadataTable,
  policy: &ClassificationPolicy,
) -> Grouping {
  let options = stage_field.map(StageField::options).unwrap_or_default();
  if options.is_empty() {
    warn!("no stage field options found in GitHub project");
    return Grouping::default();
  }

  let mut stages: Vec<Stage> = options
    .iter()
    .map(|option| Stage::new(option, metadata.lookup(&option.name)))
    .collect();

  let mut outcomes = Vec::with_capacity(issues.len());
  for issue in issues {
    let result = classify_issue(&issue, options, policy);
    let number = issue.number;
    match &result {
      Ok(index) => stages[*index].push_issue(issue),
      Err(reason) => debug!("skipping issue {issue}: {reason}"),
    }
    outcomes.push(IssueOutcome { number, result });
  }

  let grouping = Grouping { stages, outcomes };
  info!(
    "grouped {} issue(s) into {} stage(s), {} skipped",
    grouping.classified(),
    grouping.stages.len(),
    grouping.skipped().count()
  );
  grouping
}
