use std::time::Duration;
use tracing::info;

/// Simulated input events the replay emits into the external terminal. The
/// production sink drives the OS cursor and keyboard; tests record the calls.
/// There is deliberately no error channel: a lost event is unobservable.
pub trait InputSink {
    fn focus(&mut self, x: i32, y: i32);
    fn type_text(&mut self, text: &str);
    fn submit(&mut self);
}

/// Injectable time source so tests replay without real waiting.
pub trait Clock {
    fn sleep(&mut self, duration: Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Fixed pacing for the blind replay. The entry coordinate assumes the
/// external application sits at its agreed window position.
#[derive(Debug, Clone)]
pub struct ReplayPacing {
    pub entry: (i32, i32),
    pub lead_in: Duration,
    pub settle: Duration,
    pub confirm_gap: Duration,
}

impl Default for ReplayPacing {
    fn default() -> Self {
        ReplayPacing {
            entry: (222, 330),
            lead_in: Duration::from_secs(2),
            settle: Duration::from_millis(1020),
            confirm_gap: Duration::from_millis(500),
        }
    }
}

/// Replay article numbers into the external application, one entry cycle
/// each: focus the entry field, wait for it to settle, type the number,
/// submit, wait, submit again, wait. The queue is consumed; blank entries are
/// dropped without emitting events. Best-effort only — no acknowledgment, no
/// verification, no retry. Returns how many articles were emitted.
pub fn replay(
    queue: Vec<String>,
    sink: &mut impl InputSink,
    clock: &mut impl Clock,
    pacing: &ReplayPacing,
) -> usize {
    let total = queue.len();
    let mut sent = 0usize;
    clock.sleep(pacing.lead_in);
    for article in queue {
        let article = article.trim();
        if article.is_empty() {
            continue;
        }
        let (x, y) = pacing.entry;
        sink.focus(x, y);
        clock.sleep(pacing.settle);
        sink.type_text(article);
        sink.submit();
        clock.sleep(pacing.confirm_gap);
        sink.submit();
        clock.sleep(pacing.confirm_gap);
        sent += 1;
    }
    info!(total, sent, "replay finished");
    sent
}

/// OS-level sink backed by enigo. Focusing double-clicks the entry field,
/// matching how the terminal expects to be targeted.
#[cfg(feature = "tauri")]
pub struct EnigoSink {
    enigo: enigo::Enigo,
}

#[cfg(feature = "tauri")]
impl EnigoSink {
    pub fn new() -> std::result::Result<Self, String> {
        let enigo = enigo::Enigo::new(&enigo::Settings::default()).map_err(|e| e.to_string())?;
        Ok(EnigoSink { enigo })
    }
}

#[cfg(feature = "tauri")]
impl InputSink for EnigoSink {
    fn focus(&mut self, x: i32, y: i32) {
        use enigo::{Button, Coordinate, Direction, Mouse};
        let _ = self.enigo.move_mouse(x, y, Coordinate::Abs);
        let _ = self.enigo.button(Button::Left, Direction::Click);
        let _ = self.enigo.button(Button::Left, Direction::Click);
    }

    fn type_text(&mut self, text: &str) {
        use enigo::Keyboard;
        let _ = self.enigo.text(text);
    }

    fn submit(&mut self) {
        use enigo::{Direction, Key, Keyboard};
        let _ = self.enigo.key(Key::Return, Direction::Click);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<String>,
    }

    impl InputSink for RecordingSink {
        fn focus(&mut self, x: i32, y: i32) {
            self.events.push(format!("focus {},{}", x, y));
        }
        fn type_text(&mut self, text: &str) {
            self.events.push(format!("type {}", text));
        }
        fn submit(&mut self) {
            self.events.push("submit".to_string());
        }
    }

    #[derive(Default)]
    struct TestClock {
        slept: Vec<Duration>,
    }

    impl Clock for TestClock {
        fn sleep(&mut self, duration: Duration) {
            self.slept.push(duration);
        }
    }

    #[test]
    fn replays_each_article_once_in_order() {
        let mut sink = RecordingSink::default();
        let mut clock = TestClock::default();
        let pacing = ReplayPacing::default();

        let sent = replay(
            vec!["1001".to_string(), "1002".to_string()],
            &mut sink,
            &mut clock,
            &pacing,
        );

        assert_eq!(sent, 2);
        assert_eq!(
            sink.events,
            vec![
                "focus 222,330",
                "type 1001",
                "submit",
                "submit",
                "focus 222,330",
                "type 1002",
                "submit",
                "submit",
            ]
        );
        // lead-in plus settle and two confirm gaps per article
        assert_eq!(clock.slept.len(), 1 + 2 * 3);
        assert_eq!(clock.slept[0], pacing.lead_in);
        assert_eq!(clock.slept[1], pacing.settle);
    }

    #[test]
    fn blank_entries_are_consumed_without_events() {
        let mut sink = RecordingSink::default();
        let mut clock = TestClock::default();

        let sent = replay(
            vec!["".to_string(), "   ".to_string(), "1001".to_string()],
            &mut sink,
            &mut clock,
            &ReplayPacing::default(),
        );

        assert_eq!(sent, 1);
        assert_eq!(sink.events.len(), 4);
    }

    #[test]
    fn empty_queue_only_pays_the_lead_in() {
        let mut sink = RecordingSink::default();
        let mut clock = TestClock::default();

        let sent = replay(Vec::new(), &mut sink, &mut clock, &ReplayPacing::default());

        assert_eq!(sent, 0);
        assert!(sink.events.is_empty());
        assert_eq!(clock.slept.len(), 1);
    }
}
