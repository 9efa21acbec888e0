use crate::error::CoreError;
use crate::timer::{LapRecord, Timer, TimerId, TimerState};

pub const DEFAULT_MAX_TIMERS: usize = 99;
pub const MAX_NAME_LEN: usize = 32;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
}

/// What happens when moving past either end of the list.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Navigation {
    #[default]
    Clamp,
    Wrap,
}

/// Ordered set of timers plus the keyboard focus.
pub struct TimerCollection {
    timers: Vec<Timer>,
    selected: Option<usize>,
    next_id: u64,
    max_timers: usize,
    navigation: Navigation,
}

impl Default for TimerCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerCollection {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_TIMERS, Navigation::Clamp)
    }

    pub fn with_limits(max_timers: usize, navigation: Navigation) -> Self {
        Self {
            timers: Vec::new(),
            selected: None,
            next_id: 1,
            max_timers: max_timers.max(1),
            navigation,
        }
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Timer> {
        self.timers.iter()
    }

    pub fn get(&self, id: TimerId) -> Option<&Timer> {
        self.timers.iter().find(|t| t.id() == id)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Timer> {
        self.selected.and_then(|i| self.timers.get(i))
    }

    pub fn selected_mut(&mut self) -> Result<&mut Timer, CoreError> {
        self.selected
            .and_then(|i| self.timers.get_mut(i))
            .ok_or(CoreError::NoSelection)
    }

    /// Appends an idle timer and focuses it.
    ///
    /// Blank names fall back to "Timer N", N being the creation counter.
    pub fn create_timer(&mut self, name: Option<&str>) -> Result<TimerId, CoreError> {
        if self.timers.len() >= self.max_timers {
            return Err(CoreError::CollectionFull { max: self.max_timers });
        }
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(n) => n.chars().take(MAX_NAME_LEN).collect(),
            None => format!("Timer {}", id.get()),
        };
        self.timers.push(Timer::new(id, name));
        self.selected = Some(self.timers.len() - 1);
        Ok(id)
    }

    /// Removes the focused timer; focus moves to its successor, or to the
    /// new last timer when the tail was removed.
    pub fn delete_selected(&mut self) -> Result<Timer, CoreError> {
        let index = self.selected.ok_or(CoreError::NoSelection)?;
        let removed = self.timers.remove(index);
        self.selected = match self.timers.len() {
            0 => None,
            len => Some(index.min(len - 1)),
        };
        Ok(removed)
    }

    /// Moves focus one step. Returns the new selected index.
    pub fn navigate(&mut self, direction: Direction) -> Result<usize, CoreError> {
        let current = self.selected.ok_or(CoreError::NoSelection)?;
        let last = self.timers.len() - 1;
        let next = match (direction, self.navigation) {
            (Direction::Up, Navigation::Clamp) => current.saturating_sub(1),
            (Direction::Down, Navigation::Clamp) => (current + 1).min(last),
            (Direction::Up, Navigation::Wrap) => {
                if current == 0 {
                    last
                } else {
                    current - 1
                }
            }
            (Direction::Down, Navigation::Wrap) => {
                if current == last {
                    0
                } else {
                    current + 1
                }
            }
        };
        self.selected = Some(next);
        Ok(next)
    }

    pub fn any_running(&self) -> bool {
        self.timers.iter().any(Timer::is_running)
    }

    /// Pauses every running timer. Returns how many were paused.
    pub fn pause_all(&mut self, now_ms: u64) -> usize {
        self.timers
            .iter_mut()
            .filter_map(|t| t.pause(now_ms).ok())
            .count()
    }

    /// Read-only view of every timer at `now_ms`, in display order.
    pub fn snapshot(&self, now_ms: u64) -> Snapshot<'_> {
        Snapshot {
            taken_at_ms: now_ms,
            selected: self.selected,
            timers: self
                .timers
                .iter()
                .map(|t| TimerView {
                    id: t.id(),
                    name: t.name(),
                    state: t.state(),
                    elapsed_ms: t.elapsed_ms(now_ms),
                    laps: t.laps(),
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Snapshot<'a> {
    pub taken_at_ms: u64,
    pub selected: Option<usize>,
    pub timers: Vec<TimerView<'a>>,
}

#[derive(Clone, Copy, Debug)]
pub struct TimerView<'a> {
    pub id: TimerId,
    pub name: &'a str,
    pub state: TimerState,
    pub elapsed_ms: u64,
    pub laps: &'a [LapRecord],
}

impl Snapshot<'_> {
    pub fn selected_timer(&self) -> Option<&TimerView<'_>> {
        self.selected.and_then(|i| self.timers.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_timers(n: usize) -> TimerCollection {
        let mut c = TimerCollection::new();
        for _ in 0..n {
            c.create_timer(None).unwrap();
        }
        c
    }

    fn names(c: &TimerCollection) -> Vec<&str> {
        c.iter().map(Timer::name).collect()
    }

    #[test]
    fn test_create_selects_new_timer() {
        let mut c = TimerCollection::new();
        assert!(c.selected().is_none());
        let a = c.create_timer(None).unwrap();
        assert_eq!(c.selected().unwrap().id(), a);
        let b = c.create_timer(Some("  build  ")).unwrap();
        assert_eq!(c.selected_index(), Some(1));
        assert_eq!(c.get(b).unwrap().name(), "build");
        assert_eq!(c.get(a).unwrap().state(), TimerState::Idle);
    }

    #[test]
    fn test_default_names_follow_creation_order() {
        let mut c = with_timers(3);
        c.navigate(Direction::Up).unwrap();
        c.delete_selected().unwrap();
        c.create_timer(Some("")).unwrap();
        assert_eq!(names(&c), ["Timer 1", "Timer 3", "Timer 4"]);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut c = with_timers(2);
        let removed = c.delete_selected().unwrap().id();
        let fresh = c.create_timer(None).unwrap();
        assert_ne!(removed, fresh);
    }

    #[test]
    fn test_long_names_are_truncated() {
        let mut c = TimerCollection::new();
        let id = c.create_timer(Some(&"x".repeat(80))).unwrap();
        assert_eq!(c.get(id).unwrap().name().len(), MAX_NAME_LEN);
    }

    #[test]
    fn test_create_respects_cap() {
        let mut c = TimerCollection::with_limits(2, Navigation::Clamp);
        c.create_timer(None).unwrap();
        c.create_timer(None).unwrap();
        assert_eq!(c.create_timer(None), Err(CoreError::CollectionFull { max: 2 }));
        assert_eq!(c.len(), 2);
        assert_eq!(c.selected_index(), Some(1));
    }

    #[test]
    fn test_delete_middle_selects_successor() {
        let mut c = with_timers(3);
        c.navigate(Direction::Up).unwrap();
        assert_eq!(c.selected_index(), Some(1));
        c.delete_selected().unwrap();
        assert_eq!(c.selected_index(), Some(1));
        assert_eq!(c.selected().unwrap().name(), "Timer 3");
    }

    #[test]
    fn test_delete_last_selects_new_last() {
        let mut c = with_timers(3);
        c.delete_selected().unwrap();
        assert_eq!(c.selected_index(), Some(1));
        assert_eq!(c.selected().unwrap().name(), "Timer 2");
    }

    #[test]
    fn test_delete_only_timer_empties() {
        let mut c = with_timers(1);
        c.delete_selected().unwrap();
        assert!(c.is_empty());
        assert!(c.selected().is_none());
        assert!(matches!(c.delete_selected(), Err(CoreError::NoSelection)));
    }

    #[test]
    fn test_navigate_clamped() {
        let mut c = with_timers(3);
        assert_eq!(c.navigate(Direction::Down).unwrap(), 2);
        assert_eq!(c.navigate(Direction::Up).unwrap(), 1);
        assert_eq!(c.navigate(Direction::Up).unwrap(), 0);
        assert_eq!(c.navigate(Direction::Up).unwrap(), 0);
    }

    #[test]
    fn test_navigate_wraps() {
        let mut c = TimerCollection::with_limits(10, Navigation::Wrap);
        for _ in 0..3 {
            c.create_timer(None).unwrap();
        }
        assert_eq!(c.navigate(Direction::Down).unwrap(), 0);
        assert_eq!(c.navigate(Direction::Up).unwrap(), 2);
    }

    #[test]
    fn test_navigate_small_collections() {
        let mut c = TimerCollection::new();
        assert_eq!(c.navigate(Direction::Down), Err(CoreError::NoSelection));
        c.create_timer(None).unwrap();
        assert_eq!(c.navigate(Direction::Down).unwrap(), 0);
        assert_eq!(c.navigate(Direction::Up).unwrap(), 0);
    }

    #[test]
    fn test_pause_all() {
        let mut c = with_timers(3);
        c.selected_mut().unwrap().start(0);
        c.navigate(Direction::Up).unwrap();
        c.selected_mut().unwrap().start(0);
        assert!(c.any_running());
        assert_eq!(c.pause_all(100), 2);
        assert!(!c.any_running());
    }

    #[test]
    fn test_snapshot_reads_live_elapsed() {
        let mut c = with_timers(2);
        c.selected_mut().unwrap().start(1000);
        let snap = c.snapshot(1750);
        assert_eq!(snap.timers.len(), 2);
        assert_eq!(snap.timers[0].elapsed_ms, 0);
        assert_eq!(snap.timers[1].elapsed_ms, 750);
        assert_eq!(snap.timers[1].state, TimerState::Running);
        assert_eq!(snap.selected_timer().unwrap().name, "Timer 2");
        assert_eq!(snap.taken_at_ms, 1750);
    }
}
