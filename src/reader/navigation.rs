use std::time::{Duration, Instant};
use tracing::debug;

/// Current page index within a paginated lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageCursor {
    current: usize,
    count: usize,
}

impl PageCursor {
    pub fn new(count: usize) -> Self {
        PageCursor { current: 0, count }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn can_go_next(&self) -> bool {
        self.current + 1 < self.count
    }

    pub fn can_go_previous(&self) -> bool {
        self.current > 0
    }

    pub fn next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn go_to(&mut self, index: usize) {
        self.current = index.min(self.count.saturating_sub(1));
    }

    /// Adopts a new page count, pulling the current index back into range.
    pub fn clamp_to(&mut self, count: usize) {
        self.count = count;
        self.current = self.current.min(count.saturating_sub(1));
    }

    /// Fill of the progress bar, in `[0, 1]`.
    pub fn progress_fraction(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        (self.current + 1) as f32 / self.count as f32
    }

    pub fn page_for_fraction(&self, fraction: f32) -> usize {
        page_for_fraction(fraction, self.count)
    }
}

/// Page under a horizontal position on the progress bar.
pub fn page_for_fraction(fraction: f32, count: usize) -> usize {
    if count == 0 || !fraction.is_finite() {
        return 0;
    }
    let page = (fraction * count as f32).floor();
    if page <= 0.0 {
        0
    } else {
        (page as usize).min(count - 1)
    }
}

/// Single-shot timer hiding the page controls after a quiet period.
///
/// Activity shows the controls and pushes the deadline out; once the deadline
/// passes they hide until the next activity.
#[derive(Debug, Clone)]
pub struct InactivityTimer {
    hide_after: Duration,
    deadline: Option<Instant>,
    visible: bool,
}

impl InactivityTimer {
    pub fn new(hide_after: Duration) -> Self {
        InactivityTimer { hide_after, deadline: None, visible: false }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn activity(&mut self, now: Instant) {
        if !self.visible {
            debug!("navigation controls shown");
        }
        self.visible = true;
        self.deadline = Some(now + self.hide_after);
    }

    /// Fires the timer if its deadline has passed. Returns whether the
    /// controls are visible afterwards.
    pub fn poll(&mut self, now: Instant) -> bool {
        if let Some(deadline) = self.deadline {
            if now >= deadline {
                self.deadline = None;
                self.visible = false;
                debug!("navigation controls hidden");
            }
        }
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Time until the pending hide, if one is armed.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// Drops the pending deadline without changing visibility.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_saturates_at_both_ends() {
        let mut cursor = PageCursor::new(3);
        assert!(!cursor.previous());
        assert!(cursor.next());
        assert!(cursor.next());
        assert!(!cursor.next());
        assert_eq!(cursor.current(), 2);
        assert!(!cursor.can_go_next());
        assert!(cursor.can_go_previous());
    }

    #[test]
    fn clamp_after_repagination() {
        let mut cursor = PageCursor::new(10);
        cursor.go_to(8);
        cursor.clamp_to(4);
        assert_eq!(cursor.current(), 3);
        cursor.clamp_to(0);
        assert_eq!(cursor.current(), 0);
        assert_eq!(cursor.progress_fraction(), 0.0);
        cursor.clamp_to(20);
        assert_eq!(cursor.current(), 0);
    }

    #[test]
    fn progress_and_fraction_jumps() {
        let mut cursor = PageCursor::new(4);
        assert_eq!(cursor.progress_fraction(), 0.25);
        cursor.go_to(3);
        assert_eq!(cursor.progress_fraction(), 1.0);

        assert_eq!(page_for_fraction(0.0, 4), 0);
        assert_eq!(page_for_fraction(0.49, 4), 1);
        assert_eq!(page_for_fraction(0.5, 4), 2);
        assert_eq!(page_for_fraction(1.0, 4), 3);
        assert_eq!(page_for_fraction(-0.3, 4), 0);
        assert_eq!(page_for_fraction(7.0, 4), 3);
        assert_eq!(page_for_fraction(f32::NAN, 4), 0);
        assert_eq!(page_for_fraction(0.5, 0), 0);
    }

    #[test]
    fn timer_hides_after_quiet_period_and_rearms() {
        let start = Instant::now();
        let mut timer = InactivityTimer::from_millis(2500);
        assert!(!timer.poll(start));

        timer.activity(start);
        assert!(timer.poll(start + Duration::from_millis(2000)));
        timer.activity(start + Duration::from_millis(2000));
        assert!(timer.poll(start + Duration::from_millis(4000)));
        assert!(!timer.poll(start + Duration::from_millis(4500)));
        assert_eq!(timer.remaining(start), None);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let start = Instant::now();
        let mut timer = InactivityTimer::from_millis(100);
        timer.activity(start);
        timer.cancel();
        assert!(timer.poll(start + Duration::from_secs(10)));
    }
}
