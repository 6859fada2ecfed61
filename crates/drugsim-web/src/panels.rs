//! Browser-side rendering of the wizard: records what the controller shows so
//! the next page load or API reply can present it.

use serde::Serialize;

use drugsim_common::{Drug, TestResult};
use drugsim_molecules::charts::ChartData;
use drugsim_molecules::wizard::WizardView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Text panel, property list and chart panels for one session.
///
/// Busy state is not recorded here; see [`crate::session::Session::mark_busy`].
#[derive(Debug, Default, Clone, Serialize)]
pub struct Panels {
    pub drug: Option<Drug>,
    pub result: Option<TestResult>,
    pub charts: Vec<ChartData>,
    notices: Vec<Notice>,
}

impl Panels {
    /// Notices are shown once, then dropped.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl WizardView for Panels {
    fn warn(&mut self, message: &str) {
        self.notices.push(Notice { level: NoticeLevel::Warning, message: message.to_string() });
    }

    fn show_drug(&mut self, drug: &Drug) {
        self.drug = Some(drug.clone());
        self.result = None;
        self.charts.clear();
    }

    fn show_result(&mut self, result: &TestResult) {
        self.result = Some(result.clone());
    }

    fn show_charts(&mut self, charts: &[ChartData]) {
        self.charts = charts.to_vec();
    }

    fn set_busy(&mut self, _busy: bool) {}

    fn fail(&mut self, message: &str) {
        self.notices.push(Notice { level: NoticeLevel::Error, message: message.to_string() });
    }
}
