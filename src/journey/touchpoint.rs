pub const DEFAULT_ICON: &str = "question";

/// Touchpoint name to icon name, in match priority order.
const ICONS: &[(&str, &str)] = &[
  // social & community
  ("Social", "twitter-logo"),
  ("Events & Hackathons", "users"),
  ("Blog", "newspaper"),
  ("Community", "users"),
  ("Support", "lifebuoy"),
  // docs & resources
  ("Docs", "book-open"),
  ("Hiro.so", "globe"),
  ("Stacks.co", "globe"),
  ("Platform", "app-window"),
  ("Templates", "puzzle-piece"),
  ("Primitives", "puzzle-piece"),
  ("Examples & Guides", "map-trifold"),
  // dev tools
  ("Clarinet", "terminal"),
  ("Clarity", "file-js"),
  ("VSCode Extension", "code"),
  ("Stacks JS", "file-js"),
  ("Stacks Connect", "puzzle-piece"),
  ("APIs", "database"),
  ("Chainhooks", "bell"),
  // testing & deployment
  ("Clarity Playground", "test-tube"),
  ("Explorer", "magnifying-glass"),
  ("Explorer Sandbox", "test-tube"),
  ("Testnet", "bug"),
  ("Devnet", "bug"),
  ("Faucet", "drop"),
  ("Security", "shield"),
  ("Simnet", "test-tube"),
  ("Simulation", "test-tube"),
  // monitoring
  ("Contract Monitoring", "eye"),
  ("Usage & Analytics", "chart-bar"),
];

/// Exact name first, then the first table key contained in the name
/// (case-insensitive), then [`DEFAULT_ICON`].
pub fn icon_for(touchpoint: &str) -> &'static str {
  if let Some((_, icon)) = ICONS.iter().find(|(key, _)| *key == touchpoint) {
    return *icon;
  }

  let lowered = touchpoint.to_lowercase();
  ICONS
    .iter()
    .find(|(key, _)| lowered.contains(&key.to_lowercase()))
    .map(|(_, icon)| *icon)
    .unwrap_or(DEFAULT_ICON)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_exact_match() {
    assert_eq!(icon_for("Clarinet"), "terminal");
    assert_eq!(icon_for("Explorer Sandbox"), "test-tube");
  }

  #[test]
  fn test_exact_match_beats_earlier_partial() {
    // "Clarity" would match "Clarity Playground" partially
    assert_eq!(icon_for("Clarity Playground"), "test-tube");
  }

  #[test]
  fn test_partial_match_is_case_insensitive() {
    assert_eq!(icon_for("hiro docs portal"), "book-open");
    assert_eq!(icon_for("Public TESTNET faucet"), "bug");
  }

  #[test]
  fn test_unknown_touchpoint_gets_default() {
    assert_eq!(icon_for("Carrier pigeon"), DEFAULT_ICON);
    assert_eq!(icon_for(""), DEFAULT_ICON);
  }
}
