use serde::Serialize;

/// Project fields and items for one organization project. Page sizes are
/// fixed; truncation beyond them is not detected.
pub const PROJECT_QUERY: &str = r#"
  query($owner: String!, $projectNumber: Int!) {
    organization(login: $owner) {
      projectV2(number: $projectNumber) {
        fields(first: 20) {
          nodes {
            ... on ProjectV2Field {
              name
              dataType
            }
            ... on ProjectV2SingleSelectField {
              name
              dataType
              options {
                id
                name
                description
              }
            }
          }
        }
        items(first: 100) {
          nodes {
            content {
              ... on Issue {
                number
                title
                url
                body
                state
                createdAt
                labels(first: 10) {
                  nodes {
                    name
                    color
                  }
                }
                projectItems(first: 1) {
                  nodes {
                    fieldValues(first: 10) {
                      nodes {
                        ... on ProjectV2ItemFieldTextValue {
                          field {
                            ... on ProjectV2Field {
                              name
                              dataType
                            }
                          }
                          text
                        }
                        ... on ProjectV2ItemFieldSingleSelectValue {
                          field {
                            ... on ProjectV2SingleSelectField {
                              name
                              dataType
                              options {
                                id
                                name
                              }
                            }
                          }
                          optionId
                        }
                        ... on ProjectV2ItemFieldNumberValue {
                          field {
                            ... on ProjectV2Field {
                              name
                              dataType
                            }
                          }
                          number
                        }
                        ... on ProjectV2ItemFieldDateValue {
                          field {
                            ... on ProjectV2Field {
                              name
                              dataType
                            }
                          }
                          date
                        }
                        ... on ProjectV2ItemFieldIterationValue {
                          field {
                            ... on ProjectV2Field {
                              name
                              dataType
                            }
                          }
                          iterationId
                        }
                      }
                    }
                  }
                }
              }
            }
          }
        }
      }
    }
  }
"#;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectVariables<'a> {
  pub owner: &'a str,
  pub project_number: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphQLPayload<'a> {
  pub query: &'static str,
  pub variables: ProjectVariables<'a>,
}

impl<'a> GraphQLPayload<'a> {
  pub fn project(owner: &'a str, project_number: u32) -> Self {
    Self {
      query: PROJECT_QUERY,
      variables: ProjectVariables {
        owner,
        project_number,
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_payload_shape() {
    let payload = serde_json::to_value(GraphQLPayload::project("acme", 3)).unwrap();
    assert_eq!(payload["variables"]["owner"], "acme");
    assert_eq!(payload["variables"]["projectNumber"], 3);
    assert!(payload["query"].as_str().unwrap().contains("projectV2"));
  }

  #[test]
  fn test_query_page_sizes() {
    for fragment in [
      "fields(first: 20)",
      "items(first: 100)",
      "labels(first: 10)",
      "projectItems(first: 1)",
      "fieldValues(first: 10)",
    ] {
      assert!(PROJECT_QUERY.contains(fragment), "missing {fragment}");
    }
  }
}
