//! End-to-end widget runs over a scripted terminal.
//!
//! Each test opens a session through [`Prompter::run_with`], plays a key
//! script and checks both the committed value and that the terminal was
//! handed back exactly once.

use std::cell::RefCell;

use spark_prompt::session::scripted::ScriptedTerminal;
use spark_prompt::{Event, Input, KeyEvent, Outcome, Prompter, Select};

// =============================================================================
// HELPERS
// =============================================================================

const WEEKDAYS: [&str; 7] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

fn terminal() -> ScriptedTerminal {
    ScriptedTerminal::new(80)
}

fn assert_restored(term: &ScriptedTerminal) {
    assert_eq!(term.enter_count(), 1);
    assert_eq!(term.restore_count(), 1);
    assert!(!term.is_raw());
}

// =============================================================================
// INPUT
// =============================================================================

#[test]
fn ping_pong() {
    let term = terminal();
    term.type_text("pong");
    term.push(KeyEvent::Enter);

    let outcome = Prompter::new().run_with(term.clone(), &mut Input::new("ping?")).unwrap();

    assert_eq!(outcome, Outcome::Committed("pong".to_string()));
    assert!(term.output_string().contains("ping?"));
    assert_restored(&term);
}

#[test]
fn callback_fills_info_slot() {
    let term = terminal();
    term.type_text("pong");
    term.push(KeyEvent::Enter);

    let mut input = Input::new("ping?").on_event(|event, info| {
        if let Event::Insert { len, .. } = event {
            info.set(format!("{len} chars"));
        }
    });
    let outcome = Prompter::new().run_with(term.clone(), &mut input).unwrap();

    assert_eq!(outcome.committed().as_deref(), Some("pong"));
    assert!(term.output_string().contains("4 chars"));
}

#[test]
fn multi_line_finishes_on_empty_line() {
    let term = terminal();
    term.type_text("first");
    term.push(KeyEvent::Enter);
    term.type_text("second");
    term.push_all([KeyEvent::Enter, KeyEvent::Enter]);

    let mut input = Input::new("notes:").multiline(true);
    let outcome = Prompter::new().run_with(term.clone(), &mut input).unwrap();

    assert_eq!(outcome, Outcome::Committed("first\nsecond".to_string()));
    assert_restored(&term);
}

#[test]
fn concealed_value_never_reaches_terminal() {
    let term = terminal();
    term.type_text("hunter2");
    term.push(KeyEvent::Enter);

    let mut input = Input::new("password:").conceal(true);
    let outcome = Prompter::new().run_with(term.clone(), &mut input).unwrap();

    assert_eq!(outcome.committed().as_deref(), Some("hunter2"));
    assert!(!term.output_string().contains("hunter2"));
}

#[test]
fn interrupt_cancels_and_clears() {
    let term = terminal();
    term.type_text("half");
    term.push(KeyEvent::Interrupt);

    let outcome = Prompter::new().run_with(term.clone(), &mut Input::new("name?")).unwrap();

    assert!(outcome.is_cancelled());
    assert_restored(&term);
    assert_eq!(term.remaining(), 0);
}

// =============================================================================
// SELECT
// =============================================================================

#[test]
fn weekday_picks_survive_filtering() {
    let term = terminal();
    // "tu" leaves Tuesday and Saturday; pick Tuesday.
    term.type_text("tu");
    term.push(KeyEvent::Right);
    term.push(KeyEvent::Escape);
    // Focus stays on Tuesday once the filter is gone; Wednesday is next.
    term.push_all([KeyEvent::Down, KeyEvent::Right]);
    term.type_text("fri");
    term.push(KeyEvent::Right);
    term.push_all([KeyEvent::Backspace, KeyEvent::Backspace, KeyEvent::Backspace]);
    // Pick and unpick Sunday.
    term.type_text("sun");
    term.push_all([KeyEvent::Right, KeyEvent::Left, KeyEvent::Escape, KeyEvent::Enter]);

    let mut select = Select::new("days:", WEEKDAYS).multi(true).limit(4);
    let outcome = Prompter::new().run_with(term.clone(), &mut select).unwrap();

    assert_eq!(outcome, Outcome::Committed(vec![1, 2, 4]));
    assert_eq!(select.options().filter_text(), "");
    assert_restored(&term);
}

#[test]
fn colors_filter_focus_and_picks() {
    let term = terminal();
    term.push(KeyEvent::Right);
    term.push_all([KeyEvent::Down, KeyEvent::Down, KeyEvent::Right]);
    term.type_text("g");
    term.push(KeyEvent::Enter);

    let seen = RefCell::new(Vec::new());
    let mut select = Select::new("colors:", ["red", "green", "blue"])
        .multi(true)
        .on_event(|event, _| seen.borrow_mut().push(event.clone()));
    let outcome = Prompter::new().run_with(term.clone(), &mut select).unwrap();

    assert_eq!(outcome, Outcome::Committed(vec![0, 2]));
    assert_eq!(select.options().view(), &[1]);
    assert_eq!(select.options().focused(), Some(1));
    drop(select);

    let seen = seen.into_inner();
    assert!(seen.contains(&Event::Filter { text: "g".to_string() }));
    assert_eq!(seen.last(), Some(&Event::Submit));
}

#[test]
fn single_select_commits_focus() {
    let term = terminal();
    term.type_text("re");
    term.push(KeyEvent::Enter);

    let mut select = Select::new("color:", ["red", "green", "blue"]).index(2);
    let outcome = Prompter::new().run_with(term.clone(), &mut select).unwrap();

    // "re" keeps red and green; blue drops out so focus resets to red.
    assert_eq!(outcome, Outcome::Committed(vec![0]));
    assert_restored(&term);
}

#[test]
fn rejected_check_rings_bell_and_waits() {
    let term = terminal();
    term.push_all([KeyEvent::Enter, KeyEvent::Down, KeyEvent::Enter]);

    let mut select = Select::new("color:", ["red", "green", "blue"]).check(|value| value != [0]);
    let outcome = Prompter::new().run_with(term.clone(), &mut select).unwrap();

    assert_eq!(outcome, Outcome::Committed(vec![1]));
    assert!(term.output().contains(&0x07));
}
