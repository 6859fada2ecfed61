//! Wizard controller: sequences create → review → test for one session.
//!
//! Enhanced variant phases: `Input → Reviewing → Testing`.
//! Basic variant phases:    `Input → Tested`.
//!
//! The controller owns all session state and writes every visible outcome to
//! a [`WizardView`].

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use drugsim_common::{Drug, Result, SimError, TestResult, Variant};
use drugsim_model::ModelPhase;

use crate::charts::{outcome_bar_chart, side_effect_radar_chart, ChartData};
use crate::generator::DrugGenerator;
use crate::prediction::Predictor;
use crate::randomizer::Randomizer;

/// Message shown when the prediction collaborator fails.
pub const PREDICTION_FAILED: &str = "Prediction failed. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardPhase {
    Input,
    Reviewing,
    Testing,
    Tested,
}

impl fmt::Display for WizardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WizardPhase::Input => "input",
            WizardPhase::Reviewing => "reviewing",
            WizardPhase::Testing => "testing",
            WizardPhase::Tested => "tested",
        };
        f.write_str(s)
    }
}

/// Discrete user actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "molecule", rename_all = "snake_case")]
pub enum WizardEvent {
    Create(String),
    Proceed,
    Test,
}

/// Output port the controller renders through.
pub trait WizardView: Send {
    fn warn(&mut self, message: &str);
    fn show_drug(&mut self, drug: &Drug);
    fn show_result(&mut self, result: &TestResult);
    fn show_charts(&mut self, charts: &[ChartData]);
    fn set_busy(&mut self, busy: bool);
    fn fail(&mut self, message: &str);
}

/// Serializable picture of the controller.
#[derive(Debug, Clone, Serialize)]
pub struct WizardSnapshot {
    pub variant: Variant,
    pub phase: WizardPhase,
    pub drug: Option<Drug>,
    pub result: Option<TestResult>,
    pub busy: bool,
    pub model_phase: Option<ModelPhase>,
    pub predictor: String,
    pub can_create: bool,
    pub can_proceed: bool,
    pub can_test: bool,
}

pub struct WizardController {
    variant: Variant,
    generator: DrugGenerator,
    predictor: Box<dyn Predictor>,
    rng: Randomizer,
    phase: WizardPhase,
    drug: Option<Drug>,
    result: Option<TestResult>,
    busy: bool,
}

impl WizardController {
    pub fn new(variant: Variant, predictor: Box<dyn Predictor>, rng: Randomizer) -> Self {
        Self {
            variant,
            generator: DrugGenerator::new(variant),
            predictor,
            rng,
            phase: WizardPhase::Input,
            drug: None,
            result: None,
            busy: false,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase
    }

    pub fn drug(&self) -> Option<&Drug> {
        self.drug.as_ref()
    }

    pub fn result(&self) -> Option<&TestResult> {
        self.result.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn model_phase(&self) -> Option<ModelPhase> {
        self.predictor.model_phase()
    }

    pub fn training_runs(&self) -> usize {
        self.predictor.training_runs()
    }

    pub fn can_create(&self) -> bool {
        match self.variant {
            Variant::Basic => matches!(self.phase, WizardPhase::Input | WizardPhase::Tested),
            Variant::Enhanced => matches!(self.phase, WizardPhase::Input | WizardPhase::Reviewing),
        }
    }

    pub fn can_proceed(&self) -> bool {
        self.variant == Variant::Enhanced
            && self.phase == WizardPhase::Reviewing
            && self.drug.is_some()
    }

    pub fn can_test(&self) -> bool {
        let step_ok = match self.variant {
            Variant::Basic => true,
            Variant::Enhanced => self.phase == WizardPhase::Testing,
        };
        step_ok && self.drug.is_some()
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            variant: self.variant,
            phase: self.phase,
            drug: self.drug.clone(),
            result: self.result.clone(),
            busy: self.busy,
            model_phase: self.predictor.model_phase(),
            predictor: self.predictor.name().to_string(),
            can_create: self.can_create(),
            can_proceed: self.can_proceed(),
            can_test: self.can_test(),
        }
    }

    /// Dispatch one event. Guard failures are reported to `view` as warnings
    /// and returned without touching state.
    pub async fn handle(&mut self, event: WizardEvent, view: &mut dyn WizardView) -> Result<()> {
        match event {
            WizardEvent::Create(input) => self.create(&input, view).map(|_| ()),
            WizardEvent::Proceed => self.proceed(view),
            WizardEvent::Test => self.test(view).await.map(|_| ()),
        }
    }

    pub fn create(&mut self, input: &str, view: &mut dyn WizardView) -> Result<&Drug> {
        if !self.can_create() {
            return Err(self.reject(view, self.invalid("create")));
        }
        let input = input.trim();
        if input.is_empty() {
            return Err(self.reject(view, SimError::EmptyInput));
        }

        let drug = self.generator.create_drug(&mut self.rng, input)?;
        info!("Created {} ({})", drug.name, drug.structure);
        view.show_drug(&drug);

        self.result = None;
        if self.phase == WizardPhase::Input && self.variant == Variant::Enhanced {
            self.phase = WizardPhase::Reviewing;
        }
        Ok(&*self.drug.insert(drug))
    }

    pub fn proceed(&mut self, view: &mut dyn WizardView) -> Result<()> {
        if self.drug.is_none() {
            return Err(self.reject(view, SimError::MissingDrug));
        }
        if !self.can_proceed() {
            return Err(self.reject(view, self.invalid("proceed")));
        }
        debug!("Proceeding to testing step");
        self.phase = WizardPhase::Testing;
        Ok(())
    }

    /// Run the predictor against the current drug. This is the only step
    /// that awaits.
    pub async fn test(&mut self, view: &mut dyn WizardView) -> Result<&TestResult> {
        let drug = match self.drug.clone() {
            Some(drug) => drug,
            None => return Err(self.reject(view, SimError::MissingDrug)),
        };
        if !self.can_test() {
            return Err(self.reject(view, self.invalid("test")));
        }

        self.busy = true;
        view.set_busy(true);
        let outcome = self.predictor.predict(&drug, &mut self.rng).await;
        self.busy = false;
        view.set_busy(false);

        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!("Prediction via {} failed: {}", self.predictor.name(), e);
                view.fail(PREDICTION_FAILED);
                return Err(e);
            }
        };

        info!(
            "Tested {}: efficacy {}% toxicity {}%",
            drug.name, result.efficacy, result.toxicity
        );
        view.show_result(&result);
        view.show_charts(&self.charts_for(&result));

        if self.variant == Variant::Basic {
            self.phase = WizardPhase::Tested;
        }
        Ok(&*self.result.insert(result))
    }

    fn charts_for(&mut self, result: &TestResult) -> Vec<ChartData> {
        let mut charts = vec![outcome_bar_chart(result)];
        if self.variant == Variant::Enhanced {
            charts.push(side_effect_radar_chart(result, &mut self.rng));
        }
        charts
    }

    fn invalid(&self, action: &'static str) -> SimError {
        SimError::InvalidTransition {
            action,
            phase: self.phase.to_string(),
        }
    }

    fn reject(&self, view: &mut dyn WizardView, err: SimError) -> SimError {
        warn!("Rejected wizard action in {} step: {}", self.phase, err);
        view.warn(&err.to_string());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use drugsim_common::{FixedDecimal, SIDE_EFFECT_VOCABULARY};
    use drugsim_model::ModelConfig;
    use regex::Regex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::prediction::{ModelPredictor, RandomPredictor};

    #[derive(Default)]
    struct RecordingView {
        warnings: Vec<String>,
        failures: Vec<String>,
        drugs: Vec<String>,
        results: usize,
        charts: Vec<usize>,
        busy_log: Vec<bool>,
    }

    impl WizardView for RecordingView {
        fn warn(&mut self, message: &str) { self.warnings.push(message.to_string()); }
        fn show_drug(&mut self, drug: &Drug) { self.drugs.push(drug.name.clone()); }
        fn show_result(&mut self, _result: &TestResult) { self.results += 1; }
        fn show_charts(&mut self, charts: &[ChartData]) { self.charts.push(charts.len()); }
        fn set_busy(&mut self, busy: bool) { self.busy_log.push(busy); }
        fn fail(&mut self, message: &str) { self.failures.push(message.to_string()); }
    }

    /// Counts calls; optionally fails every call.
    struct CountingPredictor {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl Predictor for CountingPredictor {
        fn name(&self) -> &str { "counting" }

        async fn predict(&mut self, drug: &Drug, _rng: &mut Randomizer) -> Result<TestResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SimError::CollaboratorFailure("model exploded".into()));
            }
            Ok(TestResult {
                drug_id: drug.id,
                efficacy: FixedDecimal::new(50.0, 1),
                toxicity: FixedDecimal::new(10.0, 1),
                side_effects: drug.side_effects.clone(),
                tested_at: chrono::Utc::now(),
            })
        }
    }

    fn counting(variant: Variant, fail: bool) -> (WizardController, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let predictor = CountingPredictor { calls: Arc::clone(&calls), fail };
        let ctl = WizardController::new(variant, Box::new(predictor), Randomizer::new(Some(1)));
        (ctl, calls)
    }

    #[tokio::test]
    async fn test_test_before_create_is_a_no_op() {
        for variant in [Variant::Basic, Variant::Enhanced] {
            let (mut ctl, calls) = counting(variant, false);
            let mut view = RecordingView::default();

            let err = ctl.test(&mut view).await.unwrap_err();
            assert!(matches!(err, SimError::MissingDrug));
            assert_eq!(calls.load(Ordering::SeqCst), 0);
            assert_eq!(ctl.phase(), WizardPhase::Input);
            assert!(ctl.drug().is_none() && ctl.result().is_none());
            assert!(view.busy_log.is_empty());
            assert_eq!(view.warnings.len(), 1);
        }
    }

    #[tokio::test]
    async fn test_blank_input_warns_and_keeps_state() {
        let (mut ctl, _) = counting(Variant::Enhanced, false);
        let mut view = RecordingView::default();

        let err = ctl.create("   \t ", &mut view).unwrap_err();
        assert!(matches!(err, SimError::EmptyInput));
        assert_eq!(view.warnings, vec!["Please enter a molecule description"]);
        assert_eq!(ctl.phase(), WizardPhase::Input);
        assert!(ctl.drug().is_none());
    }

    #[tokio::test]
    async fn test_input_is_trimmed_before_generation() {
        let (mut ctl, _) = counting(Variant::Basic, false);
        let mut view = RecordingView::default();
        let drug = ctl.create("  caffeine \n", &mut view).unwrap();
        assert_eq!(drug.structure, "eniaffac-mol");
    }

    #[tokio::test]
    async fn test_caffeine_end_to_end_basic() {
        let mut ctl = WizardController::new(
            Variant::Basic,
            Box::new(RandomPredictor::new()),
            Randomizer::new(Some(2024)),
        );
        let mut view = RecordingView::default();

        let drug = ctl.create("caffeine", &mut view).unwrap().clone();
        assert_eq!(drug.structure, "eniaffac-mol");
        assert!(Regex::new(r"^FX-[A-Z0-9]{5}$").unwrap().is_match(&drug.name));
        assert!(ctl.can_test());

        let result = ctl.test(&mut view).await.unwrap().clone();
        let decimal = Regex::new(r"^\d{1,3}\.\d$").unwrap();
        for value in [&result.efficacy, &result.toxicity] {
            assert!(decimal.is_match(&value.to_string()), "bad decimal {}", value);
            assert!((0.0..=100.0).contains(&value.value()));
        }
        assert_eq!(result.side_effects.len(), 2);
        assert_ne!(result.side_effects[0], result.side_effects[1]);
        assert!(result
            .side_effects
            .iter()
            .all(|s| SIDE_EFFECT_VOCABULARY.contains(&s.as_str())));

        assert_eq!(ctl.phase(), WizardPhase::Tested);
        assert_eq!(view.busy_log, vec![true, false]);
        assert_eq!(view.charts, vec![1]);
    }

    #[tokio::test]
    async fn test_enhanced_phases_are_linear() {
        let (mut ctl, calls) = counting(Variant::Enhanced, false);
        let mut view = RecordingView::default();

        assert!(ctl.proceed(&mut view).is_err());
        ctl.create("aspirin", &mut view).unwrap();
        assert_eq!(ctl.phase(), WizardPhase::Reviewing);

        // Test is not offered while reviewing.
        let err = ctl.test(&mut view).await.unwrap_err();
        assert!(matches!(err, SimError::InvalidTransition { action: "test", .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // Regenerating while reviewing keeps the step.
        ctl.create("ibuprofen", &mut view).unwrap();
        assert_eq!(ctl.phase(), WizardPhase::Reviewing);
        assert_eq!(view.drugs.len(), 2);

        ctl.proceed(&mut view).unwrap();
        assert_eq!(ctl.phase(), WizardPhase::Testing);
        assert!(ctl.create("late", &mut view).is_err());

        ctl.test(&mut view).await.unwrap();
        ctl.test(&mut view).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(ctl.phase(), WizardPhase::Testing);
        assert_eq!(view.charts, vec![2, 2]);
    }

    #[tokio::test]
    async fn test_new_drug_clears_stale_result() {
        let (mut ctl, _) = counting(Variant::Basic, false);
        let mut view = RecordingView::default();
        ctl.create("one", &mut view).unwrap();
        ctl.test(&mut view).await.unwrap();
        assert!(ctl.result().is_some());

        ctl.create("two", &mut view).unwrap();
        assert!(ctl.result().is_none());
        assert_eq!(ctl.phase(), WizardPhase::Tested);
    }

    #[tokio::test]
    async fn test_collaborator_failure_propagates_and_clears_busy() {
        let (mut ctl, calls) = counting(Variant::Basic, true);
        let mut view = RecordingView::default();
        ctl.create("caffeine", &mut view).unwrap();

        let err = ctl.test(&mut view).await.unwrap_err();
        assert!(matches!(err, SimError::CollaboratorFailure(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!ctl.is_busy());
        assert_eq!(view.busy_log, vec![true, false]);
        assert_eq!(view.failures, vec![PREDICTION_FAILED]);
        assert!(ctl.result().is_none());
        assert_eq!(ctl.phase(), WizardPhase::Input);
    }

    #[tokio::test]
    async fn test_enhanced_model_trains_once_across_two_tests() {
        let config = ModelConfig::default().with_epochs(2).with_samples(16).with_seed(3);
        let mut ctl = WizardController::new(
            Variant::Enhanced,
            Box::new(ModelPredictor::new(config)),
            Randomizer::new(Some(3)),
        );
        let mut view = RecordingView::default();
        assert_eq!(ctl.model_phase(), Some(ModelPhase::Unloaded));

        ctl.handle(WizardEvent::Create("caffeine".into()), &mut view).await.unwrap();
        ctl.handle(WizardEvent::Proceed, &mut view).await.unwrap();
        ctl.handle(WizardEvent::Test, &mut view).await.unwrap();
        assert_eq!(ctl.model_phase(), Some(ModelPhase::Ready));
        ctl.handle(WizardEvent::Test, &mut view).await.unwrap();

        assert_eq!(ctl.training_runs(), 1);
        let drug = ctl.drug().unwrap();
        assert_eq!(ctl.result().unwrap().side_effects, drug.side_effects);
    }

    #[test]
    fn test_snapshot_flags_follow_phase() {
        let (ctl, _) = counting(Variant::Enhanced, false);
        let snap = ctl.snapshot();
        assert!(snap.can_create && !snap.can_proceed && !snap.can_test);
        assert_eq!(snap.phase, WizardPhase::Input);
        assert_eq!(snap.predictor, "counting");
    }

    #[test]
    fn test_event_wire_format() {
        let ev: WizardEvent =
            serde_json::from_str(r#"{ "action": "create", "molecule": "caffeine" }"#).unwrap();
        assert_eq!(ev, WizardEvent::Create("caffeine".into()));
        let ev: WizardEvent = serde_json::from_str(r#"{ "action": "test" }"#).unwrap();
        assert_eq!(ev, WizardEvent::Test);
    }
}
