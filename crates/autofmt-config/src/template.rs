use std::collections::BTreeMap;

use autofmt_core::{MAX_ARGS, RuleRegistry, Synthesizer};
use serde::Deserialize;

use crate::types::Separator;

/// Template synthesis settings from the `[template]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Character placed between slots.
    pub separator: Separator,
    /// Slot bound for runtime synthesis, at most `MAX_ARGS`.
    pub max_args: usize,
    /// Fragment overrides keyed by type name, e.g. `Point = "struct:{}"`.
    pub rules: BTreeMap<String, String>,
    /// Types rendered with numbered placeholders.
    pub positional: Vec<String>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            separator: Separator::default(),
            max_args: MAX_ARGS,
            rules: BTreeMap::new(),
            positional: Vec::new(),
        }
    }
}

impl TemplateConfig {
    /// Build the rule registry described by `rules` and `positional`.
    pub fn registry(&self) -> anyhow::Result<RuleRegistry> {
        let mut registry = RuleRegistry::new();
        for (type_name, fragment) in &self.rules {
            registry
                .register(type_name.as_str(), fragment.as_str())
                .map_err(|e| anyhow::anyhow!("template.rules.{type_name}: {e}"))?;
        }
        for type_name in &self.positional {
            registry
                .register_positional(type_name.as_str())
                .map_err(|e| anyhow::anyhow!("template.positional: {e}"))?;
        }
        Ok(registry)
    }

    /// Runtime synthesizer with this section's rules and bound.
    pub fn synthesizer(&self) -> anyhow::Result<Synthesizer> {
        let rules = self.registry()?.freeze();
        Synthesizer::new(rules)
            .with_max_args(self.max_args)
            .map_err(|e| anyhow::anyhow!("template.max_args: {e}"))
    }
}
