//! Overall statistics of a run

use crate::model::Status;
use crate::plugins::{Plugin, PluginData};
use crate::report::model::{AllureTestCase, Time};
use serde::Serialize;
use std::collections::BTreeMap;

pub const NAME: &str = "summary";
pub const FILE_NAME: &str = "report.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportStatistic {
    pub total: usize,
    pub statuses: BTreeMap<String, usize>,
    pub time: Time,
}

#[derive(Debug, Default)]
pub struct SummaryPlugin {
    statistic: ReportStatistic,
    start: Option<u64>,
    stop: Option<u64>,
}

impl SummaryPlugin {
    pub fn new() -> Self {
        let mut plugin = SummaryPlugin::default();
        for status in Status::ALL {
            plugin.statistic.statuses.insert(status.to_string(), 0);
        }
        plugin
    }

    pub fn statistic(&self) -> ReportStatistic {
        let mut statistic = self.statistic.clone();
        statistic.time = Time::new(self.start.unwrap_or(0), self.stop.unwrap_or(0));
        statistic
    }
}

impl Plugin for SummaryPlugin {
    fn name(&self) -> &str {
        NAME
    }

    fn process(&mut self, test_case: &AllureTestCase) {
        self.statistic.total += 1;
        *self
            .statistic
            .statuses
            .entry(test_case.status.to_string())
            .or_insert(0) += 1;

        self.start = Some(self.start.map_or(test_case.time.start, |s| s.min(test_case.time.start)));
        self.stop = Some(self.stop.map_or(test_case.time.stop, |s| s.max(test_case.time.stop)));
    }

    fn data(&self) -> Vec<PluginData> {
        PluginData::serialize(FILE_NAME, &self.statistic())
            .into_iter()
            .collect()
    }
}
