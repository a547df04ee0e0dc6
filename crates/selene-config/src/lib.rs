use selene::aspects::{AspectDefinition, AspectSettings};
use selene::EvaluatorConfig;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct SeleneSettings {
    pub evaluator: EvaluatorConfig,
    pub aspect_settings: AspectSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EvaluatorToml {
    #[serde(default)]
    time_step_days: Option<f64>,
    #[serde(default)]
    orb_filter_deg: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct AspectToml {
    name: String,
    degrees: f64,
    #[serde(default)]
    orb: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ScanToml {
    #[serde(default)]
    include_objects: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    evaluator: EvaluatorToml,
    #[serde(default)]
    aspects: Vec<AspectToml>,
    #[serde(default)]
    scan: ScanToml,
}

/// Try common relative paths for `configs/selene.toml`, from the workspace
/// root or from a crate directory.
pub fn read_selene_toml_text() -> anyhow::Result<String> {
    let paths = ["configs/selene.toml", "../../configs/selene.toml"];
    for p in &paths {
        if let Ok(c) = fs::read_to_string(p) {
            return Ok(c);
        }
    }
    anyhow::bail!("Could not load selene.toml from {:?}", paths);
}

/// Parse settings text. Missing keys fall back to the evaluator defaults and
/// an empty `[[aspects]]` list means the five major aspects.
pub fn parse_settings(text: &str) -> anyhow::Result<SeleneSettings> {
    let root: RootConfigToml = toml::from_str(text)
        .map_err(|e| anyhow::anyhow!("Failed to parse selene.toml: {e}"))?;

    let defaults = EvaluatorConfig::default();
    let evaluator = EvaluatorConfig::new(
        root.evaluator.time_step_days.unwrap_or(defaults.time_step_days),
        root.evaluator.orb_filter_deg.unwrap_or(defaults.orb_filter_deg),
    )
    .map_err(|e| anyhow::anyhow!("Invalid [evaluator] settings: {e}"))?;

    let mut aspects = Vec::with_capacity(root.aspects.len());
    let mut orb_settings = HashMap::new();
    for entry in root.aspects {
        if let Some(orb) = entry.orb {
            if !orb.is_finite() || !(0.0..=180.0).contains(&orb) {
                anyhow::bail!("aspects.{}: orb must be within [0, 180], got {orb}", entry.name);
            }
            orb_settings.insert(entry.name.clone(), orb);
        }
        let aspect = AspectDefinition::new(entry.name, entry.degrees)?;
        if aspects.iter().any(|a: &AspectDefinition| a.name == aspect.name) {
            anyhow::bail!("Duplicate aspect in selene.toml: {}", aspect.name);
        }
        aspects.push(aspect);
    }
    if aspects.is_empty() {
        aspects = AspectDefinition::majors();
    }

    Ok(SeleneSettings {
        evaluator,
        aspect_settings: AspectSettings {
            aspects,
            orb_settings,
            include_objects: root.scan.include_objects,
        },
    })
}

pub fn load_settings() -> anyhow::Result<SeleneSettings> {
    parse_settings(&read_selene_toml_text()?)
}

pub fn load_settings_from(path: &Path) -> anyhow::Result<SeleneSettings> {
    let text = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    parse_settings(&text)
}
