//! Chart payloads handed to the rendering collaborator.

use serde::{Deserialize, Serialize};

use drugsim_common::TestResult;

use crate::randomizer::Randomizer;

const EFFICACY_COLOR: &str = "rgba(54, 162, 235, 0.6)";
const TOXICITY_COLOR: &str = "rgba(255, 99, 132, 0.6)";
const SEVERITY_COLOR: &str = "rgba(255, 159, 64, 0.4)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Radar,
}

/// `{labels, values, colors}` in the shape the charting library consumes.
/// All values are on a 0-100 scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartData {
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
}

/// Efficacy vs. toxicity.
pub fn outcome_bar_chart(result: &TestResult) -> ChartData {
    ChartData {
        kind: ChartKind::Bar,
        title: "Efficacy vs. Toxicity (%)".to_string(),
        labels: vec!["Efficacy".to_string(), "Toxicity".to_string()],
        values: vec![result.efficacy.value(), result.toxicity.value()],
        colors: vec![EFFICACY_COLOR.to_string(), TOXICITY_COLOR.to_string()],
    }
}

/// One axis per side effect. The severities are drawn for display only.
pub fn side_effect_radar_chart(result: &TestResult, rng: &mut Randomizer) -> ChartData {
    let values = result
        .side_effects
        .iter()
        .map(|_| rng.severity() as f64)
        .collect();

    ChartData {
        kind: ChartKind::Radar,
        title: "Side-effect severity".to_string(),
        labels: result.side_effects.clone(),
        values,
        colors: vec![SEVERITY_COLOR.to_string()],
    }
}
