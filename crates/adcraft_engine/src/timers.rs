use std::time::Duration;

use adcraft_core::{Msg, Ticket};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, DropGuard};

/// A repeating timer that posts a message to the session inbox.
///
/// The first tick fires one full period after arming. Dropping the line
/// cancels it.
#[derive(Debug)]
pub struct TimerLine {
    _guard: DropGuard,
}

impl TimerLine {
    pub fn spawn<F>(period: Duration, inbox: UnboundedSender<Msg>, make_msg: F) -> Self
    where
        F: Fn() -> Msg + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    () = cancelled.cancelled() => break,
                    _ = interval.tick() => {
                        if inbox.send(make_msg()).is_err() {
                            break;
                        }
                    }
                }
            }
        });
        Self {
            _guard: token.drop_guard(),
        }
    }
}

/// The poll and narration timer lines of one session.
#[derive(Debug, Default)]
pub struct TimerLines {
    poll: Option<TimerLine>,
    narration: Option<TimerLine>,
}

impl TimerLines {
    /// Arms both lines for `ticket`, dropping any previous ones first.
    pub fn arm(
        &mut self,
        ticket: Ticket,
        poll_interval: Duration,
        narration_interval: Duration,
        inbox: &UnboundedSender<Msg>,
    ) {
        self.disarm();
        self.poll = Some(TimerLine::spawn(poll_interval, inbox.clone(), move || {
            Msg::PollTick { ticket }
        }));
        self.narration = Some(TimerLine::spawn(
            narration_interval,
            inbox.clone(),
            move || Msg::NarrationTick { ticket },
        ));
    }

    /// Idempotent; clears whichever lines are armed.
    pub fn disarm(&mut self) {
        self.poll = None;
        self.narration = None;
    }

    pub fn is_armed(&self) -> bool {
        self.poll.is_some() || self.narration.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn line_ticks_every_period_until_dropped() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ticket = Ticket::default();
        let line = TimerLine::spawn(Duration::from_millis(100), tx, move || Msg::PollTick {
            ticket,
        });

        time::sleep(Duration::from_millis(350)).await;
        let mut ticks = 0;
        while rx.try_recv().is_ok() {
            ticks += 1;
        }
        assert_eq!(ticks, 3);

        drop(line);
        time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_stops_both_lines() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut lines = TimerLines::default();
        lines.arm(
            Ticket::default(),
            Duration::from_millis(100),
            Duration::from_millis(50),
            &tx,
        );
        assert!(lines.is_armed());

        time::sleep(Duration::from_millis(120)).await;
        lines.disarm();
        lines.disarm();
        assert!(!lines.is_armed());
        while rx.try_recv().is_ok() {}

        time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }
}
