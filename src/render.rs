use crate::journey::filter::TagFilter;
use crate::journey::stage::Stage;
use crate::journey::touchpoint;

pub const NO_STAGES: &str = "No stages found. Please check your GitHub project configuration.";

/// Plain-text experience map, one block per stage.
pub fn render_stages(stages: &[Stage], filter: &TagFilter) -> String {
  if stages.is_empty() {
    return format!("{NO_STAGES}\n");
  }

  let mut lines = Vec::new();
  if !filter.is_empty() {
    lines.push(format!("Filtering by: {}", filter.active().join(", ")));
    lines.push(String::new());
  }

  for stage in filter.apply(stages) {
    lines.extend(stage_lines(&stage, filter));
  }

  let mut out = lines.join("\n");
  out.push('\n');
  out
}

fn stage_lines(stage: &Stage, filter: &TagFilter) -> Vec<String> {
  let mut lines = vec![format!("== {} == [{}]", stage.title, stage.color)];
  if !stage.description.is_empty() {
    lines.push(stage.description.clone());
  }

  if !stage.actions.is_empty() {
    lines.push("Actions:".to_string());
    lines.extend(stage.actions.iter().map(|action| format!("  - {action}")));
  }

  if !stage.touchpoints.is_empty() {
    lines.push("Touchpoints:".to_string());
    lines.extend(stage.touchpoints.iter().map(|name| {
      let marker = if filter.is_active(name) { "*" } else { " " };
      format!(" {marker}[{}] {name}", touchpoint::icon_for(name))
    }));
  }

  lines.push(format!("Pain points: {}", stage.issues.len()));
  lines.extend(
    stage
      .issues
      .iter()
      .map(|issue| format!("  #{} [{}] {}", issue.number, issue.state, issue.title)),
  );
  lines.push(String::new());
  lines
}
