//! Beat clock queries
//!
//! Converts engine-reported tempo and beatgrid values into normalized track
//! positions. Positions are expressed as a fraction of the whole track
//! (0.0 = start, 1.0 = end), matching the engine's `playposition`.

/// Beat clock cannot be derived from the engine's current values
///
/// Happens when no track is loaded or the track has no beatgrid yet
/// (BPM or duration zero). The slicer refuses to start and retries on the
/// next play-state change.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("beat clock unavailable (bpm={bpm}, duration={duration}s, samples={samples})")]
pub struct ClockUnavailable {
    pub bpm: f64,
    pub duration: f64,
    pub samples: i64,
}

/// Normalized track distance covered by one beat
///
/// `(60 / bpm) / duration_secs`. Both inputs must be finite and positive.
pub fn position_per_beat(bpm: f64, duration_secs: f64) -> Result<f64, ClockUnavailable> {
    let unavailable = ClockUnavailable {
        bpm,
        duration: duration_secs,
        samples: 0,
    };
    if !(bpm.is_finite() && duration_secs.is_finite()) || bpm <= 0.0 || duration_secs <= 0.0 {
        return Err(unavailable);
    }
    let per_beat = (60.0 / bpm) / duration_secs;
    if per_beat.is_finite() && per_beat > 0.0 {
        Ok(per_beat)
    } else {
        Err(unavailable)
    }
}

/// Normalized position of the detected beat closest to the playhead
pub fn nearest_beat_anchor(closest_beat_sample: i64, total_samples: i64) -> Result<f64, ClockUnavailable> {
    if total_samples <= 0 {
        return Err(ClockUnavailable {
            bpm: 0.0,
            duration: 0.0,
            samples: total_samples,
        });
    }
    Ok((closest_beat_sample as f64 / total_samples as f64).clamp(0.0, 1.0))
}

/// Playhead location expressed in beats from an anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatPosition {
    /// Whole beats elapsed since the anchor (negative before it)
    pub beat: i64,
    /// Fraction of the current beat elapsed (0.0 <= progress < 1.0)
    pub progress: f64,
}

/// Locate `position` on the beat grid that starts at `anchor`
pub fn beat_at(position: f64, anchor: f64, position_per_beat: f64) -> BeatPosition {
    let beats = (position - anchor) / position_per_beat;
    let beat = beats.floor();
    BeatPosition {
        beat: beat as i64,
        progress: beats - beat,
    }
}
