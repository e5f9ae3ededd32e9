use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::error::{MapError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLResponse<T> {
  pub data: Option<T>,
  #[serde(default)]
  pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLError {
  pub message: String,
}

impl<T> GraphQLResponse<T> {
  /// Fails with the first error message when the `errors` array is populated.
  pub fn check_errors(&self) -> Result<()> {
    match self.errors.as_deref() {
      Some([first, ..]) => Err(MapError::Graphql(first.message.clone())),
      _ => Ok(()),
    }
  }
}

/// GitHub connection wrapper. Both the list and its entries may be null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Connection<T> {
  pub nodes: Option<Vec<Option<T>>>,
}

impl<T> Connection<T> {
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.nodes.iter().flatten().flatten()
  }

  /// The entry at index 0. A null first entry counts as absent, later
  /// entries are not consulted.
  pub fn first(&self) -> Option<&T> {
    self.nodes.as_ref()?.first()?.as_ref()
  }
}

fn flatten_nodes<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  let connection: Option<Connection<T>> = Option::deserialize(deserializer)?;
  Ok(
    connection
      .and_then(|c| c.nodes)
      .unwrap_or_default()
      .into_iter()
      .flatten()
      .collect(),
  )
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectData {
  pub organization: Option<Organization>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
  pub project_v2: Option<ProjectV2>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectV2 {
  #[serde(default, deserialize_with = "flatten_nodes")]
  pub fields: Vec<StageField>,
  /// Kept undecoded so one malformed item cannot fail the whole response.
  #[serde(default, deserialize_with = "flatten_nodes")]
  pub items: Vec<serde_json::Value>,
}

/// A project field definition. Fields that match none of the query fragments
/// come back as `{}`, hence the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StageField {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub data_type: Option<String>,
  #[serde(default)]
  pub options: Option<Vec<StageOption>>,
}

impl StageField {
  pub fn options(&self) -> &[StageOption] {
    self.options.as_deref().unwrap_or_default()
  }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageOption {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueState {
  Open,
  Closed,
}

impl std::fmt::Display for IssueState {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      IssueState::Open => write!(f, "OPEN"),
      IssueState::Closed => write!(f, "CLOSED"),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Label {
  pub name: String,
  #[serde(default)]
  pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
  pub number: u64,
  pub title: String,
  pub url: String,
  pub state: IssueState,
  #[serde(default)]
  pub body: Option<String>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default, deserialize_with = "flatten_nodes")]
  pub labels: Vec<Label>,
  #[serde(default, skip_serializing)]
  pub project_items: Option<Connection<ProjectItem>>,
}

impl Issue {
  pub fn label_names(&self) -> impl Iterator<Item = &str> {
    self.labels.iter().map(|l| l.name.as_str())
  }

  pub fn has_label(&self, name: &str) -> bool {
    self.label_names().any(|l| l == name)
  }
}

impl std::fmt::Display for Issue {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "#{}: {}", self.number, self.title)
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItem {
  #[serde(default)]
  pub field_values: Option<Connection<FieldValue>>,
}

/// A project item's value for one custom field, keyed by the field's data type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawFieldValue")]
pub enum FieldValue {
  Text { field: String, text: Option<String> },
  SingleSelect { field: String, option_id: Option<String> },
  Number { field: String, number: Option<f64> },
  Date { field: String, date: Option<String> },
  Iteration { field: String, iteration_id: Option<String> },
  /// Value of a field type the query does not select (labels, assignees...).
  Unsupported,
}

impl FieldValue {
  pub fn field_name(&self) -> Option<&str> {
    match self {
      FieldValue::Text { field, .. }
      | FieldValue::SingleSelect { field, .. }
      | FieldValue::Number { field, .. }
      | FieldValue::Date { field, .. }
      | FieldValue::Iteration { field, .. } => Some(field),
      FieldValue::Unsupported => None,
    }
  }

  pub fn option_id(&self) -> Option<&str> {
    match self {
      FieldValue::SingleSelect { option_id, .. } => option_id.as_deref(),
      _ => None,
    }
  }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFieldValue {
  #[serde(default)]
  field: Option<RawField>,
  #[serde(default)]
  text: Option<String>,
  #[serde(default)]
  option_id: Option<String>,
  #[serde(default)]
  number: Option<f64>,
  #[serde(default)]
  date: Option<String>,
  #[serde(default)]
  iteration_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawField {
  #[serde(default)]
  name: Option<String>,
  #[serde(default)]
  data_type: Option<String>,
}

impl From<RawFieldValue> for FieldValue {
  fn from(raw: RawFieldValue) -> Self {
    let Some(RawField {
      name: Some(field),
      data_type,
    }) = raw.field
    else {
      return FieldValue::Unsupported;
    };

    match data_type.as_deref() {
      Some("SINGLE_SELECT") => FieldValue::SingleSelect {
        field,
        option_id: raw.option_id,
      },
      Some("NUMBER") => FieldValue::Number {
        field,
        number: raw.number,
      },
      Some("DATE") => FieldValue::Date {
        field,
        date: raw.date,
      },
      Some("ITERATION") => FieldValue::Iteration {
        field,
        iteration_id: raw.iteration_id,
      },
      Some(_) if raw.text.is_some() => FieldValue::Text {
        field,
        text: raw.text,
      },
      _ => {
        if raw.option_id.is_some() {
          FieldValue::SingleSelect {
            field,
            option_id: raw.option_id,
          }
        } else if raw.number.is_some() {
          FieldValue::Number {
            field,
            number: raw.number,
          }
        } else if raw.date.is_some() {
          FieldValue::Date {
            field,
            date: raw.date,
          }
        } else if raw.iteration_id.is_some() {
          FieldValue::Iteration {
            field,
            iteration_id: raw.iteration_id,
          }
        } else {
          FieldValue::Text {
            field,
            text: raw.text,
          }
        }
      }
    }
  }
}

/// Issues plus field definitions pulled from one project response.
#[derive(Debug, Clone, Default)]
pub struct ProjectSnapshot {
  pub fields: Vec<StageField>,
  pub issues: Vec<Issue>,
  /// Items whose content was present but did not decode as an issue.
  pub rejected: usize,
}

impl ProjectSnapshot {
  pub fn from_response(
    response: GraphQLResponse<ProjectData>,
    owner: &str,
    number: u32,
  ) -> Result<Self> {
    response.check_errors()?;

    let project = response
      .data
      .and_then(|d| d.organization)
      .and_then(|o| o.project_v2)
      .ok_or_else(|| MapError::ProjectNotFound {
        owner: owner.to_string(),
        number,
      })?;

    let (issues, rejected) = decode_issues(&project.items);
    Ok(Self {
      fields: project.fields,
      issues,
      rejected,
    })
  }

  pub fn field(&self, name: &str) -> Option<&StageField> {
    self.fields.iter().find(|f| f.name == name)
  }
}

/// Decodes each item's `content` independently. Null content and non-issue
/// content (drafts, pull requests) are dropped; anything else that fails to
/// decode is logged and counted.
pub fn decode_issues(items: &[serde_json::Value]) -> (Vec<Issue>, usize) {
  let mut issues = Vec::new();
  let mut rejected = 0;

  for (index, item) in items.iter().enumerate() {
    let content = match item.get("content") {
      None | Some(serde_json::Value::Null) => {
        debug!("item {index}: no content");
        continue;
      }
      Some(serde_json::Value::Object(map)) if map.is_empty() => {
        debug!("item {index}: content is not an issue");
        continue;
      }
      Some(content) => content,
    };

    match Issue::deserialize(content) {
      Ok(issue) => issues.push(issue),
      Err(e) => {
        warn!("item {index}: skipping malformed issue: {e}");
        rejected += 1;
      }
    }
  }

  (issues, rejected)
}
