use timer_core::{
    dispatch, Action, Clock, CoreError, Direction, Flow, Key, ManualClock, TimerCollection,
    TimerState,
};

fn press(timers: &mut TimerCollection, clock: &ManualClock, key: Key) -> Result<Flow, CoreError> {
    let action = Action::from_key(key).expect("mapped key");
    dispatch(timers, action, clock.now_ms())
}

fn elapsed(timers: &TimerCollection, clock: &ManualClock) -> u64 {
    timers.selected().unwrap().elapsed_ms(clock.now_ms())
}

#[test]
fn lap_pause_resume_scenario() {
    let clock = ManualClock::new(10_000);
    let mut timers = TimerCollection::new();

    press(&mut timers, &clock, Key::Char('n')).unwrap();
    assert_eq!(timers.selected().unwrap().state(), TimerState::Idle);
    assert_eq!(elapsed(&timers, &clock), 0);

    press(&mut timers, &clock, Key::Space).unwrap();
    clock.advance(1000);
    press(&mut timers, &clock, Key::Char('l')).unwrap();

    let laps = timers.selected().unwrap().laps().to_vec();
    assert_eq!(laps.len(), 1);
    assert_eq!(laps[0].split_ms, 1000);
    assert_eq!(laps[0].cumulative_ms, 1000);
    assert_eq!(laps[0].recorded_at_ms, 11_000);

    press(&mut timers, &clock, Key::Space).unwrap();
    clock.advance(500);
    assert_eq!(elapsed(&timers, &clock), 1000);

    press(&mut timers, &clock, Key::Space).unwrap();
    clock.advance(500);
    assert_eq!(elapsed(&timers, &clock), 1500);
}

#[test]
fn delete_down_to_empty_scenario() {
    let clock = ManualClock::new(0);
    let mut timers = TimerCollection::new();

    press(&mut timers, &clock, Key::Char('n')).unwrap();
    press(&mut timers, &clock, Key::Char('n')).unwrap();
    assert_eq!(timers.selected_index(), Some(1));

    press(&mut timers, &clock, Key::Char('d')).unwrap();
    assert_eq!(timers.len(), 1);
    assert_eq!(timers.selected().unwrap().name(), "Timer 1");

    press(&mut timers, &clock, Key::Char('d')).unwrap();
    assert!(timers.is_empty());
    assert!(timers.selected().is_none());
    assert_eq!(
        press(&mut timers, &clock, Key::Char('d')),
        Err(CoreError::NoSelection)
    );
}

#[test]
fn timers_run_independently() {
    let clock = ManualClock::new(0);
    let mut timers = TimerCollection::new();
    for _ in 0..3 {
        timers.create_timer(None).unwrap();
    }

    // Start the last and the first, leave the middle idle.
    press(&mut timers, &clock, Key::Space).unwrap();
    clock.advance(300);
    timers.navigate(Direction::Up).unwrap();
    timers.navigate(Direction::Up).unwrap();
    press(&mut timers, &clock, Key::Space).unwrap();
    clock.advance(200);

    let snap = timers.snapshot(clock.now_ms());
    let elapsed: Vec<u64> = snap.timers.iter().map(|t| t.elapsed_ms).collect();
    assert_eq!(elapsed, [200, 0, 500]);
    assert_eq!(snap.selected, Some(0));
}

#[test]
fn splits_always_sum_to_cumulative() {
    let clock = ManualClock::new(0);
    let mut timers = TimerCollection::new();
    timers.create_timer(None).unwrap();
    press(&mut timers, &clock, Key::Space).unwrap();

    for step in 1..=40u64 {
        clock.advance(step * 17 % 311 + 1);
        if step % 7 == 0 {
            // Pause, let time pass, resume.
            press(&mut timers, &clock, Key::Space).unwrap();
            clock.advance(1234);
            press(&mut timers, &clock, Key::Space).unwrap();
        }
        let now = clock.now_ms();
        press(&mut timers, &clock, Key::Char('l')).unwrap();

        let timer = timers.selected().unwrap();
        let laps = timer.laps();
        let sum: u64 = laps.iter().map(|l| l.split_ms).sum();
        let last = laps.last().unwrap();
        assert_eq!(last.index as usize, laps.len());
        assert_eq!(sum, last.cumulative_ms);
        assert_eq!(last.cumulative_ms, timer.elapsed_ms(now));
    }
}

#[test]
fn reset_clears_everything() {
    let clock = ManualClock::new(0);
    let mut timers = TimerCollection::new();
    timers.create_timer(None).unwrap();
    press(&mut timers, &clock, Key::Space).unwrap();
    clock.advance(800);
    press(&mut timers, &clock, Key::Char('l')).unwrap();
    press(&mut timers, &clock, Key::Char('R')).unwrap();

    clock.advance(800);
    let timer = timers.selected().unwrap();
    assert_eq!(timer.state(), TimerState::Idle);
    assert_eq!(timer.elapsed_ms(clock.now_ms()), 0);
    assert!(timer.laps().is_empty());
}
