//! Daily study-activity log backing the consistency streak.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One logged study day. `count` is the number of sessions that day.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StudyLog {
    pub date: NaiveDate,
    pub count: u32,
}

#[derive(Clone, Debug, Default)]
pub struct ActivityLog {
    pub entries: Vec<StudyLog>,
}

impl ActivityLog {
    /// Records one study session on `date`, bumping the existing entry if
    /// the day is already present.
    pub fn record(&mut self, date: NaiveDate) {
        match self.entries.iter_mut().find(|e| e.date == date) {
            Some(entry) => entry.count += 1,
            None => self.entries.push(StudyLog { date, count: 1 }),
        }
    }

    /// Number of consecutive study days ending at `today`.
    ///
    /// A day with no entry yet today does not break the streak as long as
    /// yesterday was logged; when neither today nor yesterday has an entry
    /// the streak is 0.
    pub fn streak(&self, today: NaiveDate) -> u32 {
        if self.entries.is_empty() {
            return 0;
        }

        let dates: BTreeSet<NaiveDate> = self.entries.iter().map(|e| e.date).collect();
        let yesterday = today - Duration::days(1);

        if !dates.contains(&today) && !dates.contains(&yesterday) {
            return 0;
        }

        let mut current = if dates.contains(&today) { today } else { yesterday };
        let mut streak = 0;
        while dates.contains(&current) {
            streak += 1;
            match current.pred_opt() {
                Some(prev) => current = prev,
                None => break,
            }
        }
        streak
    }
}
