//! Per-status task counts.

use super::TaskStatus;
use serde::{Deserialize, Serialize};

/// Number of tasks in each status. Every status is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusCounts {
    /// Tasks in [`TaskStatus::Todo`].
    pub todo: u64,
    /// Tasks in [`TaskStatus::Doing`].
    pub doing: u64,
    /// Tasks in [`TaskStatus::Done`].
    pub done: u64,
}

impl StatusCounts {
    /// Builds dense counts from grouped `(status, count)` rows.
    ///
    /// Statuses missing from `groups` count as zero; repeated statuses are
    /// summed.
    ///
    /// # Examples
    ///
    /// ```
    /// use taskflow::tracker::domain::{StatusCounts, TaskStatus};
    ///
    /// let counts = StatusCounts::from_groups([(TaskStatus::Done, 2)]);
    /// assert_eq!(counts, StatusCounts { todo: 0, doing: 0, done: 2 });
    /// ```
    #[must_use]
    pub fn from_groups(groups: impl IntoIterator<Item = (TaskStatus, u64)>) -> Self {
        groups
            .into_iter()
            .fold(Self::default(), |mut counts, (status, count)| {
                let slot = counts.slot(status);
                *slot = slot.saturating_add(count);
                counts
            })
    }

    /// Returns the count for `status`.
    #[must_use]
    pub const fn get(&self, status: TaskStatus) -> u64 {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::Doing => self.doing,
            TaskStatus::Done => self.done,
        }
    }

    /// Returns the total across all statuses.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.todo
            .saturating_add(self.doing)
            .saturating_add(self.done)
    }

    const fn slot(&mut self, status: TaskStatus) -> &mut u64 {
        match status {
            TaskStatus::Todo => &mut self.todo,
            TaskStatus::Doing => &mut self.doing,
            TaskStatus::Done => &mut self.done,
        }
    }
}
