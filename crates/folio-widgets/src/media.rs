//! Background video playback policy.

use folio_core::{Component, Delivery, ElementId, Event, ListenKind, Listener, SharedHost};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

/// What the media slot shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaState {
    /// Video playing
    Playing,
    /// Video paused (out of view or paused by the user)
    Paused,
    /// Video failed; static fallback shown for good
    Fallback,
}

/// Message emitted when the media state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaChanged {
    /// New state
    pub state: MediaState,
}

struct Mounted {
    visibility: Listener,
    errors: Listener,
}

/// Plays a video only while it is in view and not paused by the user. Any
/// load or play failure switches to the fallback permanently.
pub struct MediaPlayback {
    host: SharedHost,
    element: ElementId,
    wants_play: bool,
    in_view: bool,
    failed: bool,
    state: MediaState,
    mounted: Option<Mounted>,
}

impl MediaPlayback {
    /// Create for a video element. Starts paused and wanting to play.
    pub fn new(host: &SharedHost, element: ElementId) -> Self {
        Self {
            host: SharedHost::clone(host),
            element,
            wants_play: true,
            in_view: false,
            failed: false,
            state: MediaState::Paused,
            mounted: None,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> MediaState {
        self.state
    }

    /// Whether the user wants the video playing.
    #[must_use]
    pub const fn wants_play(&self) -> bool {
        self.wants_play
    }

    /// Whether the static fallback is shown.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.failed
    }

    /// Whether the video should be playing right now.
    #[must_use]
    pub const fn should_play(&self) -> bool {
        !self.failed && self.in_view && self.wants_play
    }

    /// Watch visibility and errors of the video element.
    pub fn mount(&mut self) {
        self.mounted = Some(Mounted {
            visibility: Listener::on_element(&self.host, self.element, ListenKind::Visibility),
            errors: Listener::on_element(&self.host, self.element, ListenKind::MediaError),
        });
        self.sync();
    }

    /// Play/pause button.
    pub fn toggle(&mut self) -> Option<MediaChanged> {
        self.wants_play = !self.wants_play;
        self.sync()
    }

    /// Record whether the video is in view.
    pub fn set_in_view(&mut self, in_view: bool) -> Option<MediaChanged> {
        self.in_view = in_view;
        self.sync()
    }

    /// Record a load failure.
    pub fn on_error(&mut self) -> Option<MediaChanged> {
        self.fail()
    }

    fn fail(&mut self) -> Option<MediaChanged> {
        if self.failed {
            return None;
        }
        self.failed = true;
        self.mounted = None;
        tracing::debug!(element = %self.element, "media failed, showing fallback");
        self.transition(MediaState::Fallback)
    }

    fn sync(&mut self) -> Option<MediaChanged> {
        if self.failed {
            return None;
        }
        if self.should_play() {
            if !self.host.play_media(self.element) {
                return self.fail();
            }
            self.transition(MediaState::Playing)
        } else {
            self.host.pause_media(self.element);
            self.transition(MediaState::Paused)
        }
    }

    fn transition(&mut self, state: MediaState) -> Option<MediaChanged> {
        if self.state == state {
            return None;
        }
        self.state = state;
        Some(MediaChanged { state })
    }
}

impl Component for MediaPlayback {
    fn handle(&mut self, delivery: &Delivery) -> Option<Box<dyn Any>> {
        let Delivery::Event { listener, event } = delivery else {
            return None;
        };
        let mounted = self.mounted.as_ref()?;
        let changed = if *listener == mounted.visibility.id() {
            match event {
                Event::Intersect { intersecting, .. } => self.set_in_view(*intersecting),
                _ => None,
            }
        } else if *listener == mounted.errors.id() {
            self.on_error()
        } else {
            None
        };
        changed.map(|c| Box::new(c) as Box<dyn Any>)
    }
}

impl fmt::Debug for MediaPlayback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaPlayback")
            .field("element", &self.element)
            .field("wants_play", &self.wants_play)
            .field("in_view", &self.in_view)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_test::{messages_of, Harness, MediaCall, NodeKind};

    #[test]
    fn test_state_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MediaState::Fallback).unwrap(), "\"fallback\"");
        let state: MediaState = serde_json::from_str("\"playing\"").unwrap();
        assert_eq!(state, MediaState::Playing);
    }

    fn setup() -> (Harness, ElementId) {
        let harness = Harness::new();
        let video = harness.document().create(None, NodeKind::Video);
        (harness, video)
    }

    #[test]
    fn test_plays_only_in_view() {
        let (harness, video) = setup();
        let mut media = MediaPlayback::new(&harness.host(), video);
        media.mount();
        assert_eq!(media.state(), MediaState::Paused);

        let messages = harness.intersect(video, 0.5, &mut [&mut media]);
        assert_eq!(
            messages_of::<MediaChanged>(&messages),
            vec![&MediaChanged {
                state: MediaState::Playing
            }]
        );
        harness.intersect(video, 0.0, &mut [&mut media]);
        assert_eq!(media.state(), MediaState::Paused);
        assert_eq!(
            harness.document().media_calls(),
            vec![
                MediaCall::Pause(video),
                MediaCall::Play(video),
                MediaCall::Pause(video)
            ]
        );
    }

    #[test]
    fn test_user_pause_wins() {
        let (harness, video) = setup();
        let mut media = MediaPlayback::new(&harness.host(), video);
        media.set_in_view(true);
        assert_eq!(
            media.toggle(),
            Some(MediaChanged {
                state: MediaState::Paused
            })
        );
        assert!(!media.should_play());
        media.toggle();
        assert_eq!(media.state(), MediaState::Playing);
    }

    #[test]
    fn test_play_rejection_falls_back() {
        let (harness, video) = setup();
        harness.document().reject_play(video);
        let mut media = MediaPlayback::new(&harness.host(), video);
        assert_eq!(
            media.set_in_view(true),
            Some(MediaChanged {
                state: MediaState::Fallback
            })
        );
        assert!(media.is_fallback());
    }

    #[test]
    fn test_error_is_permanent() {
        let (harness, video) = setup();
        let mut media = MediaPlayback::new(&harness.host(), video);
        media.mount();
        harness.media_error(video, &mut [&mut media]);
        assert_eq!(media.state(), MediaState::Fallback);
        assert_eq!(harness.document().listener_count(), 0);

        media.set_in_view(true);
        media.toggle();
        assert_eq!(media.state(), MediaState::Fallback);
        assert!(!media.should_play());
    }
}
