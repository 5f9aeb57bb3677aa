use std::time::Duration;

use crate::capture::source::{CancelToken, CaptureSource, Pacer};
use crate::composition::model::SessionContext;
use crate::foundation::core::PhotoId;
use crate::foundation::error::{StripError, StripResult};
use crate::photo::model::Photo;

/// Length of one countdown tick.
pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// Multi-shot capture settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureSequence {
    /// Number of shots.
    pub count: u32,
    /// Pause after each shot except the last.
    pub interval: Duration,
    /// Countdown seconds before each shot.
    pub countdown: u32,
}

impl Default for CaptureSequence {
    fn default() -> Self {
        Self {
            count: 4,
            interval: Duration::from_millis(500),
            countdown: 3,
        }
    }
}

/// Progress of a capture sequence. Shots are numbered from 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Countdown for `shot` begins.
    CountdownStarted {
        /// Shot number.
        shot: u32,
        /// Countdown length.
        seconds: u32,
    },
    /// One countdown second, emitted before waiting it out.
    CountdownTick {
        /// Shot number.
        shot: u32,
        /// Seconds left including this one.
        remaining: u32,
    },
    /// A frame was captured.
    Captured {
        /// Shot number.
        shot: u32,
        /// Id of the new photo.
        photo: PhotoId,
    },
    /// The sequence stopped before `shot`.
    Cancelled {
        /// First shot not taken.
        shot: u32,
    },
    /// The source failed to deliver `shot`; the sequence stops there.
    Failed {
        /// Shot that failed.
        shot: u32,
    },
}

/// Photos captured by a sequence.
#[derive(Debug)]
pub struct CaptureOutcome {
    /// Captured photos in shot order.
    pub photos: Vec<Photo>,
    /// True when the sequence was cancelled before completing.
    pub cancelled: bool,
    /// Source error that ended the sequence early, if any.
    pub failure: Option<StripError>,
}

impl CaptureOutcome {
    /// True when every requested shot was taken.
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.failure.is_none()
    }
}

/// Run a countdown-then-capture loop for `seq.count` shots.
///
/// Shot N's capture always completes before shot N+1's countdown starts. Cancellation is checked
/// between shots. A source error stops the sequence and is reported in
/// [`CaptureOutcome::failure`]; in both cases photos captured earlier are returned intact.
#[tracing::instrument(skip(source, pacer, session, cancel, on_event), fields(session = %session.session()))]
pub fn capture_sequence<S, P>(
    source: &mut S,
    pacer: &mut P,
    seq: &CaptureSequence,
    session: &SessionContext,
    cancel: &CancelToken,
    mut on_event: impl FnMut(&CaptureEvent),
) -> StripResult<CaptureOutcome>
where
    S: CaptureSource + ?Sized,
    P: Pacer + ?Sized,
{
    if seq.count == 0 {
        return Err(StripError::validation("capture count must be > 0"));
    }
    let mut photos = Vec::with_capacity(seq.count as usize);
    for shot in 1..=seq.count {
        if cancel.is_cancelled() {
            tracing::info!(shot, captured = photos.len(), "capture cancelled");
            on_event(&CaptureEvent::Cancelled { shot });
            return Ok(CaptureOutcome {
                photos,
                cancelled: true,
                failure: None,
            });
        }

        on_event(&CaptureEvent::CountdownStarted {
            shot,
            seconds: seq.countdown,
        });
        for remaining in (1..=seq.countdown).rev() {
            on_event(&CaptureEvent::CountdownTick { shot, remaining });
            pacer.wait(COUNTDOWN_TICK);
        }

        let bitmap = match source.capture() {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(shot, captured = photos.len(), error = %e, "capture failed");
                on_event(&CaptureEvent::Failed { shot });
                return Ok(CaptureOutcome {
                    photos,
                    cancelled: false,
                    failure: Some(e),
                });
            }
        };
        let photo = Photo::captured(
            session.next_photo_id(),
            session.session().clone(),
            bitmap,
            chrono::Utc::now(),
        );
        tracing::debug!(shot, photo = %photo.id(), "captured");
        on_event(&CaptureEvent::Captured {
            shot,
            photo: photo.id().clone(),
        });
        photos.push(photo);

        if shot < seq.count {
            pacer.wait(seq.interval);
        }
    }
    Ok(CaptureOutcome {
        photos,
        cancelled: false,
        failure: None,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/capture/sequence.rs"]
mod tests;
