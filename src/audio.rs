use std::io::{self, Write};

/// Parameters of a synthesized cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_ms: u64,
    pub gain: f32,
}

impl Tone {
    /// Played once per expired countdown
    pub const COMPLETION: Tone = Tone {
        frequency_hz: 800.0,
        duration_ms: 1000,
        gain: 0.3,
    };
}

/// Best-effort sound output. Callers ignore failures.
pub trait AudioCue {
    fn play(&mut self, tone: &Tone) -> io::Result<()>;
}

/// Rings the terminal bell; the tone parameters are ignored
#[derive(Debug, Default)]
pub struct TerminalBell;

impl AudioCue for TerminalBell {
    fn play(&mut self, _tone: &Tone) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(b"\x07")?;
        stdout.flush()
    }
}

#[derive(Debug, Default)]
pub struct Silent;

impl AudioCue for Silent {
    fn play(&mut self, _tone: &Tone) -> io::Result<()> {
        Ok(())
    }
}

pub fn cue_for(sound: bool) -> Box<dyn AudioCue> {
    if sound {
        Box::new(TerminalBell)
    } else {
        Box::new(Silent)
    }
}
