use chrono::{DateTime, Utc};

use crate::domain::errors::DomainError;

/// The time span a shift covers
///
/// # Invariants
/// - `start` is strictly before `stop`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    start: DateTime<Utc>,
    stop: DateTime<Utc>,
}

impl ShiftWindow {
    /// Creates a window, rejecting empty and reversed spans
    ///
    /// # Example
    /// ```
    /// use chrono::{Duration, Utc};
    /// use shiftdesk_api::domain::shift::ShiftWindow;
    ///
    /// let start = Utc::now();
    /// assert!(ShiftWindow::new(start, start + Duration::hours(8)).is_ok());
    /// assert!(ShiftWindow::new(start, start).is_err());
    /// ```
    pub fn new(start: DateTime<Utc>, stop: DateTime<Utc>) -> Result<Self, DomainError> {
        if start >= stop {
            return Err(DomainError::invalid_range(start, stop));
        }
        Ok(Self { start, stop })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn stop(&self) -> DateTime<Utc> {
        self.stop
    }

    /// True when the whole window lies inside `[from, to]`.
    ///
    /// Partial overlap does not count.
    pub fn is_contained_in(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        self.start >= from && self.stop <= to
    }
}
