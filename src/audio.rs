use log::warn;
use rodio::source::SineWave;
use rodio::{OutputStream, OutputStreamBuilder, Sink, Source};
use std::time::Duration;

// ── Sounds ──────────────────────────────────────────────────────────────────

/// Short synthesized cues. Absent when the machine has no output device.
pub struct Audio {
    stream: OutputStream,
}

impl Audio {
    pub fn open() -> Option<Self> {
        match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => Some(Self { stream }),
            Err(err) => {
                warn!("audio disabled: {err}");
                None
            }
        }
    }

    /// Plays `(frequency Hz, duration ms)` notes back to back, in the
    /// background.
    fn play(&self, notes: &[(f32, u64)], gain: f32) {
        let sink = Sink::connect_new(self.stream.mixer());
        for &(freq, ms) in notes {
            sink.append(
                SineWave::new(freq)
                    .take_duration(Duration::from_millis(ms))
                    .amplify(gain),
            );
        }
        sink.detach();
    }

    pub fn ascend(&self) {
        self.play(&[(520.0, 40), (660.0, 40)], 0.08);
    }

    pub fn score(&self) {
        self.play(&[(880.0, 60), (1320.0, 90)], 0.1);
    }

    // Falling pitch, 400Hz down to 80Hz over half a second.
    pub fn crash(&self) {
        self.play(&[(400.0, 100), (260.0, 100), (170.0, 100), (110.0, 100), (80.0, 100)], 0.15);
    }
}
