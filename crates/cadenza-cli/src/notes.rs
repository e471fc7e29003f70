//! Note lists for offline rendering.
//!
//! A note is written `NOTE[:START[:LENGTH[:VELOCITY]]]`, where `NOTE` is a
//! MIDI number (`60`) or a name (`C4`, `F#3`, `Bb2`; C4 = 60), `START` and
//! `LENGTH` are seconds, and `VELOCITY` is 1..=127.

/// Start time when none is given, in seconds.
pub const DEFAULT_START_SECS: f32 = 0.0;
/// Length when none is given, in seconds.
pub const DEFAULT_LENGTH_SECS: f32 = 1.0;
/// Velocity when none is given.
pub const DEFAULT_VELOCITY: u8 = 100;

/// One note to render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteSpec {
    /// MIDI note number.
    pub note: u8,
    /// Note-on time in seconds.
    pub start_secs: f32,
    /// Held time in seconds before note-off.
    pub length_secs: f32,
    /// MIDI velocity.
    pub velocity: u8,
}

impl NoteSpec {
    /// Note-off time in seconds.
    pub fn end_secs(&self) -> f32 {
        self.start_secs + self.length_secs
    }
}

/// A note event at a sample position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEvent {
    /// Start `note` with `velocity`.
    On {
        /// MIDI note number.
        note: u8,
        /// MIDI velocity.
        velocity: u8,
    },
    /// Release `note` with a tail.
    Off {
        /// MIDI note number.
        note: u8,
    },
}

/// Parse a note name or number.
pub fn parse_note_name(text: &str) -> Result<u8, String> {
    let text = text.trim();
    if let Ok(number) = text.parse::<u8>() {
        return if number <= 127 {
            Ok(number)
        } else {
            Err(format!("MIDI note {number} is above 127"))
        };
    }

    let mut chars = text.chars();
    let letter = chars
        .next()
        .ok_or_else(|| String::from("empty note"))?
        .to_ascii_uppercase();
    let pitch_class: i32 = match letter {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return Err(format!("invalid note name '{text}'")),
    };

    let rest = chars.as_str();
    let (accidental, octave) = match rest.chars().next() {
        Some('#') => (1, &rest[1..]),
        Some('b') => (-1, &rest[1..]),
        _ => (0, rest),
    };
    let octave: i32 = octave
        .parse()
        .map_err(|_| format!("invalid octave in note '{text}'"))?;

    let midi = (octave + 1) * 12 + pitch_class + accidental;
    u8::try_from(midi)
        .ok()
        .filter(|n| *n <= 127)
        .ok_or_else(|| format!("note '{text}' is outside the MIDI range"))
}

/// Parse `NOTE[:START[:LENGTH[:VELOCITY]]]`. Usable as a clap value parser.
pub fn parse_note_spec(text: &str) -> Result<NoteSpec, String> {
    let mut fields = text.split(':');
    let note = parse_note_name(fields.next().unwrap_or_default())?;

    let start_secs = match fields.next() {
        Some(f) => parse_secs(f, "start")?,
        None => DEFAULT_START_SECS,
    };
    let length_secs = match fields.next() {
        Some(f) => parse_secs(f, "length")?,
        None => DEFAULT_LENGTH_SECS,
    };
    if length_secs <= 0.0 {
        return Err(format!("note length must be positive in '{text}'"));
    }
    let velocity = match fields.next() {
        Some(f) => f
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|v| (1..=127).contains(v))
            .ok_or_else(|| format!("velocity must be 1..=127 in '{text}'"))?,
        None => DEFAULT_VELOCITY,
    };
    if fields.next().is_some() {
        return Err(format!("too many fields in '{text}'"));
    }

    Ok(NoteSpec {
        note,
        start_secs,
        length_secs,
        velocity,
    })
}

fn parse_secs(text: &str, what: &str) -> Result<f32, String> {
    let secs: f32 = text
        .trim()
        .parse()
        .map_err(|_| format!("invalid {what} time '{text}'"))?;
    if secs.is_finite() && secs >= 0.0 {
        Ok(secs)
    } else {
        Err(format!("{what} time must be a non-negative number, got '{text}'"))
    }
}

/// Turn notes into sample-positioned events, sorted by position.
///
/// Every note sounds for at least one sample. At equal positions note-offs
/// come before note-ons, so a note can be re-struck the moment it ends.
/// When notes of the same pitch overlap, each note-on re-strikes the pitch
/// and only the last of them to end sends the note-off.
pub fn schedule(notes: &[NoteSpec], sample_rate: u32) -> Vec<(usize, NoteEvent)> {
    let to_samples = |secs: f32| (f64::from(secs) * f64::from(sample_rate)).round() as usize;
    let mut events: Vec<(usize, NoteEvent)> = notes
        .iter()
        .flat_map(|n| {
            let on = to_samples(n.start_secs);
            let off = to_samples(n.end_secs()).max(on + 1);
            [
                (
                    on,
                    NoteEvent::On {
                        note: n.note,
                        velocity: n.velocity,
                    },
                ),
                (off, NoteEvent::Off { note: n.note }),
            ]
        })
        .collect();
    events.sort_by_key(|(pos, event)| (*pos, matches!(event, NoteEvent::On { .. })));

    let mut held = [0u32; 256];
    events.retain(|(_, event)| match *event {
        NoteEvent::On { note, .. } => {
            held[usize::from(note)] += 1;
            true
        }
        NoteEvent::Off { note } => {
            let count = &mut held[usize::from(note)];
            *count = count.saturating_sub(1);
            *count == 0
        }
    });
    events
}
