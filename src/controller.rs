//! Session playback state machine.
//!
//! The controller composes a [`DurationClock`] and a [`StepSequencer`] over a
//! loaded [`Session`]. Every step change stops the countdown; expiry raises
//! an alert but never advances on its own.

use std::time::{Duration, Instant};

use crate::alert::CompletionAlert;
use crate::audio::{AudioCue, Silent, Tone};
use crate::clock::DurationClock;
use crate::error::PlaybackError;
use crate::runtime::IntervalTimer;
use crate::sequencer::StepSequencer;
use crate::session::{Session, Step};
use crate::util::format_clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum PlaybackStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

/// User and timer events accepted by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    /// Start when stopped, pause when running
    Toggle,
    Reset,
    Tick,
    Next,
    Previous,
    Select(usize),
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TickOutcome {
    Ignored,
    Counted,
    Expired,
}

/// Read-only view of the playback state handed to renderers
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub status: PlaybackStatus,
    pub current_step_index: usize,
    pub step_count: usize,
    pub remaining_seconds: u32,
    /// `remaining_seconds` as `mm:ss`
    pub remaining: String,
    pub running: bool,
    pub completed: bool,
    pub progress_fraction: f64,
    pub step_fraction: f64,
    pub alert_pending: bool,
}

pub struct SessionController {
    session: Session,
    clock: DurationClock,
    sequencer: StepSequencer,
    status: PlaybackStatus,
    timer: IntervalTimer,
    alert: CompletionAlert,
    cue: Box<dyn AudioCue>,
}

impl SessionController {
    pub fn new(session: Session) -> Result<Self, PlaybackError> {
        let first = session.step(0).ok_or(PlaybackError::EmptySession)?;
        let clock = DurationClock::new(first.duration_seconds())?;
        let sequencer = StepSequencer::new(session.len())?;

        tracing::debug!(
            "loaded session '{}' with {} steps",
            session.title,
            session.len()
        );

        Ok(Self {
            session,
            clock,
            sequencer,
            status: PlaybackStatus::Idle,
            timer: IntervalTimer::default(),
            alert: CompletionAlert::default(),
            cue: Box::new(Silent),
        })
    }

    pub fn with_audio(mut self, cue: Box<dyn AudioCue>) -> Self {
        self.cue = cue;
        self
    }

    pub fn with_alert_delay(mut self, delay: Duration) -> Self {
        self.alert = CompletionAlert::new(delay);
        self
    }

    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.timer = IntervalTimer::new(period);
        self
    }

    pub fn start(&mut self) -> Result<(), PlaybackError> {
        if self.status == PlaybackStatus::Completed {
            return Err(PlaybackError::SessionCompleted);
        }

        self.alert.clear();
        self.clock.start();
        if self.clock.is_running() {
            self.status = PlaybackStatus::Running;
            self.timer.arm(Instant::now());
            tracing::debug!("started step {}", self.sequencer.current_index());
        }
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.status == PlaybackStatus::Running {
            self.clock.pause();
            self.timer.disarm();
            self.status = PlaybackStatus::Paused;
            tracing::debug!("paused at {}s", self.clock.remaining_seconds());
        }
    }

    /// Restores the current step's full duration. A completed session stays
    /// completed; only `restart` leaves that state.
    pub fn reset(&mut self) -> Result<(), PlaybackError> {
        let index = self.sequencer.current_index();
        self.clock.reset(self.duration_of(index))?;
        self.timer.disarm();
        self.alert.clear();
        if self.status != PlaybackStatus::Completed {
            self.status = PlaybackStatus::Paused;
        }
        Ok(())
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.status != PlaybackStatus::Running {
            return TickOutcome::Ignored;
        }

        match self.clock.tick() {
            Some(_expired) => {
                self.status = PlaybackStatus::Paused;
                self.timer.disarm();
                self.alert.raise(Instant::now());
                tracing::info!(
                    "step {} finished",
                    self.sequencer.current_index() + 1
                );
                if let Err(e) = self.cue.play(&Tone::COMPLETION) {
                    tracing::debug!("audio cue unavailable: {}", e);
                }
                TickOutcome::Expired
            }
            None => TickOutcome::Counted,
        }
    }

    pub fn next(&mut self) -> Result<(), PlaybackError> {
        let index = self.sequencer.current_index();
        if index + 1 < self.session.len() {
            self.clock.reset(self.duration_of(index + 1))?;
            self.sequencer.advance();
            self.status = PlaybackStatus::Paused;
        } else {
            self.sequencer.advance();
            self.clock.pause();
            self.status = PlaybackStatus::Completed;
            tracing::info!("session '{}' completed", self.session.title);
        }
        self.timer.disarm();
        self.alert.clear();
        Ok(())
    }

    /// No-op on the first step
    pub fn previous(&mut self) -> Result<(), PlaybackError> {
        let index = self.sequencer.current_index();
        if index == 0 {
            return Ok(());
        }

        self.clock.reset(self.duration_of(index - 1))?;
        self.sequencer.retreat();
        self.timer.disarm();
        self.alert.clear();
        self.status = PlaybackStatus::Paused;
        Ok(())
    }

    /// Jumps to step `index`; refused while the countdown runs so an
    /// in-flight countdown is never lost silently.
    pub fn select_step(&mut self, index: usize) -> Result<(), PlaybackError> {
        if self.clock.is_running() {
            return Err(PlaybackError::ClockRunning);
        }
        let len = self.session.len();
        if index >= len {
            return Err(PlaybackError::IndexOutOfRange { index, len });
        }

        self.clock.reset(self.duration_of(index))?;
        self.sequencer.jump_to(index)?;
        self.timer.disarm();
        self.alert.clear();
        self.status = PlaybackStatus::Paused;
        Ok(())
    }

    pub fn restart(&mut self) -> Result<(), PlaybackError> {
        self.clock.reset(self.duration_of(0))?;
        self.sequencer.jump_to(0)?;
        self.timer.disarm();
        self.alert.clear();
        self.status = PlaybackStatus::Idle;
        tracing::debug!("restarted session '{}'", self.session.title);
        Ok(())
    }

    /// Applies one command and returns the resulting snapshot. Rejected
    /// commands leave the state unchanged.
    pub fn apply(&mut self, command: Command) -> Result<Snapshot, PlaybackError> {
        let result = match command {
            Command::Start => self.start(),
            Command::Pause => {
                self.pause();
                Ok(())
            }
            Command::Toggle => {
                if self.is_running() {
                    self.pause();
                    Ok(())
                } else {
                    self.start()
                }
            }
            Command::Reset => self.reset(),
            Command::Tick => {
                self.tick();
                Ok(())
            }
            Command::Next => self.next(),
            Command::Previous => self.previous(),
            Command::Select(index) => self.select_step(index),
            Command::Restart => self.restart(),
        };

        if let Err(ref e) = result {
            tracing::warn!("rejected {:?}: {}", command, e);
        }
        result.map(|_| self.snapshot())
    }

    /// Applies every countdown tick that fell due by `now`. Returns the most
    /// significant outcome among them.
    pub fn advance_time(&mut self, now: Instant) -> TickOutcome {
        let due = self.timer.take_due(now);
        (0..due)
            .map(|_| self.tick())
            .max()
            .unwrap_or(TickOutcome::Ignored)
    }

    /// Time left until the next countdown tick, if the timer is armed
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.timer.time_until_due(now)
    }

    /// Drops the completion alert once its display time is over
    pub fn update_alert(&mut self, now: Instant) -> bool {
        self.alert.update(now)
    }

    pub fn snapshot(&self) -> Snapshot {
        let remaining_seconds = self.clock.remaining_seconds();
        Snapshot {
            status: self.status,
            current_step_index: self.sequencer.current_index(),
            step_count: self.session.len(),
            remaining_seconds,
            remaining: format_clock(remaining_seconds),
            running: self.clock.is_running(),
            completed: self.sequencer.is_completed(),
            progress_fraction: self.sequencer.progress(remaining_seconds),
            step_fraction: self.clock.elapsed_fraction(),
            alert_pending: self.alert.is_pending(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_step(&self) -> &Step {
        &self.session.steps()[self.sequencer.current_index()]
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn is_completed(&self) -> bool {
        self.sequencer.is_completed()
    }

    pub fn is_timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn current_index(&self) -> usize {
        self.sequencer.current_index()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.clock.remaining_seconds()
    }

    fn duration_of(&self, index: usize) -> u32 {
        self.session
            .step(index)
            .map(Step::duration_seconds)
            .unwrap_or_default()
    }
}
