// Direction Oracle - Chooses down or up stroke for each note
// Close notes alternate, a note exactly one beat later keeps the direction,
// and a longer silence restarts on a down-stroke

use super::stroke::Stroke;

#[derive(Debug, Clone)]
pub struct DirectionOracle {
    beat_length: f64,
    last_tick: f64,
    up: bool,
}

impl DirectionOracle {
    /// Start a pass. The first note always lands more than a beat after
    /// the virtual previous note at `-4 * beat_length` unless it starts
    /// well before tick 0.
    pub fn new(beat_length: f64) -> Self {
        DirectionOracle {
            beat_length,
            last_tick: -4.0 * beat_length,
            up: false,
        }
    }

    /// Direction for a note starting at `tick`; returns the stroke and the
    /// delta from the previous note
    pub fn next(&mut self, tick: i64) -> (Stroke, f64) {
        let dt = tick as f64 - self.last_tick;

        if dt > self.beat_length {
            self.up = false;
        } else if dt < self.beat_length {
            self.up = !self.up;
        }

        self.last_tick = tick as f64;
        (self.current(), dt)
    }

    /// Direction chosen for the most recent note
    pub fn current(&self) -> Stroke {
        if self.up {
            Stroke::Up
        } else {
            Stroke::Down
        }
    }
}
