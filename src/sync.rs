//! Collaboration bridge: realtime payloads, echo suppression and autosave.
//!
//! DESIGN
//! ======
//! Every local scene change is broadcast as the *full* element list tagged
//! with the whiteboard id; there are no deltas. A remote update for the same
//! whiteboard from another sender replaces the local scene wholesale, so the
//! conflict policy is last-writer-wins at whole-scene granularity. Installing
//! a remote scene goes through the same commit path as a local edit, so a
//! one-shot guard swallows the broadcast that replacement would otherwise
//! echo back.
//!
//! Local changes are also saved to the document store after a quiet period
//! (2 s by default). The engine is single-threaded and clockless: callers
//! pass `now_ms` in and poll for due work.
//!
//! ERROR HANDLING
//! ==============
//! Payloads for another whiteboard, self-echoes, and undecodable messages are
//! dropped before any mutation. A failed save is logged and re-armed for the
//! next debounce window unless a newer save has already been scheduled.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::camera::Point;
use crate::config::CanvasConfig;
use crate::doc::Element;
use crate::error::{CanvasError, ErrorCode};

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Full-scene update, sent on every local change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneUpdate {
    pub whiteboard_id: String,
    pub elements: Vec<Element>,
    /// Filled in by the relay on delivery; absent on outgoing messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
}

/// Cursor position in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorPos {
    pub x: f64,
    pub y: f64,
}

/// Ephemeral pointer position of one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorUpdate {
    pub whiteboard_id: String,
    /// Filled in by the relay on delivery; absent on outgoing messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub user_name: String,
    pub cursor: CursorPos,
}

/// One live participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: String,
    pub name: String,
}

/// Participant roster, sent by the relay whenever someone joins or leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    pub whiteboard_id: String,
    pub collaborators: Vec<Participant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub whiteboard_id: String,
    pub user_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub whiteboard_id: String,
}

/// A message on the per-whiteboard realtime channel.
///
/// Encoded as `{"event": "<name>", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ChannelMessage {
    WhiteboardJoin(JoinRequest),
    WhiteboardLeave(LeaveRequest),
    WhiteboardUpdate(SceneUpdate),
    WhiteboardCursor(CursorUpdate),
    WhiteboardCollaborators(Roster),
}

impl ChannelMessage {
    /// The whiteboard this message belongs to.
    #[must_use]
    pub fn whiteboard_id(&self) -> &str {
        match self {
            Self::WhiteboardJoin(m) => &m.whiteboard_id,
            Self::WhiteboardLeave(m) => &m.whiteboard_id,
            Self::WhiteboardUpdate(m) => &m.whiteboard_id,
            Self::WhiteboardCursor(m) => &m.whiteboard_id,
            Self::WhiteboardCollaborators(m) => &m.whiteboard_id,
        }
    }

    /// Encode as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::MalformedPayload`] if an element holds a
    /// non-finite number.
    pub fn to_json(&self) -> Result<String, CanvasError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::MalformedPayload`] for anything that is not a
    /// well-formed channel message.
    pub fn from_json(text: &str) -> Result<Self, CanvasError> {
        Ok(serde_json::from_str(text)?)
    }
}

// =============================================================================
// LOCAL STATE
// =============================================================================

/// The user this client is acting as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalUser {
    pub id: String,
    pub name: String,
}

/// A remote participant's pointer, drawn on top of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCursor {
    pub x: f64,
    pub y: f64,
    pub name: String,
    pub color: String,
}

/// Stable per-user cursor color derived from the first character of the id.
#[must_use]
pub fn cursor_color(user_id: &str) -> String {
    let code = user_id.chars().next().map_or(0, u32::from);
    format!("hsl({}, 70%, 60%)", (code * 40) % 360)
}

/// A document-store write the host should perform.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub whiteboard_id: String,
    pub elements: Vec<Element>,
}

/// Trailing-edge debounce for autosave. Only the latest scene is kept.
#[derive(Debug, Clone)]
pub struct SaveDebounce {
    delay_ms: f64,
    due_at: Option<f64>,
    pending: Option<Vec<Element>>,
}

impl SaveDebounce {
    #[must_use]
    pub fn new(delay_ms: f64) -> Self {
        Self { delay_ms, due_at: None, pending: None }
    }

    /// Replace any pending save with `elements`, due `delay_ms` from `now_ms`.
    pub fn schedule(&mut self, elements: Vec<Element>, now_ms: f64) {
        self.pending = Some(elements);
        self.due_at = Some(now_ms + self.delay_ms);
    }

    /// Take the pending save if its quiet period has elapsed.
    pub fn poll(&mut self, now_ms: f64) -> Option<Vec<Element>> {
        match self.due_at {
            Some(due) if now_ms >= due => self.flush(),
            _ => None,
        }
    }

    /// Take the pending save regardless of the deadline.
    pub fn flush(&mut self) -> Option<Vec<Element>> {
        self.due_at = None;
        self.pending.take()
    }

    /// Whether a save is waiting.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending save, if any.
    #[must_use]
    pub fn due_at(&self) -> Option<f64> {
        self.due_at
    }
}

/// Leading-edge rate limit for cursor broadcasts.
#[derive(Debug, Clone)]
pub struct CursorThrottle {
    interval_ms: f64,
    last_sent_ms: Option<f64>,
}

impl CursorThrottle {
    #[must_use]
    pub fn new(interval_ms: f64) -> Self {
        Self { interval_ms, last_sent_ms: None }
    }

    /// Whether a send at `now_ms` is allowed; records it if so.
    pub fn try_acquire(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_sent_ms {
            if now_ms - last < self.interval_ms {
                return false;
            }
        }
        self.last_sent_ms = Some(now_ms);
        true
    }
}

/// Per-session synchronization state.
#[derive(Debug, Clone)]
pub struct CollabBridge {
    whiteboard_id: String,
    user: LocalUser,
    suppress_next_broadcast: bool,
    save: SaveDebounce,
    cursor_throttle: CursorThrottle,
    cursors: BTreeMap<String, RemoteCursor>,
    participants: Vec<Participant>,
}

impl CollabBridge {
    #[must_use]
    pub fn new(whiteboard_id: impl Into<String>, user: LocalUser, config: &CanvasConfig) -> Self {
        Self {
            whiteboard_id: whiteboard_id.into(),
            user,
            suppress_next_broadcast: false,
            save: SaveDebounce::new(config.save_debounce_ms),
            cursor_throttle: CursorThrottle::new(config.cursor_throttle_ms),
            cursors: BTreeMap::new(),
            participants: Vec::new(),
        }
    }

    #[must_use]
    pub fn whiteboard_id(&self) -> &str {
        &self.whiteboard_id
    }

    #[must_use]
    pub fn user(&self) -> &LocalUser {
        &self.user
    }

    /// Message announcing this client on the channel.
    #[must_use]
    pub fn join_message(&self) -> ChannelMessage {
        ChannelMessage::WhiteboardJoin(JoinRequest {
            whiteboard_id: self.whiteboard_id.clone(),
            user_name: self.user.name.clone(),
        })
    }

    /// Message withdrawing this client from the channel.
    #[must_use]
    pub fn leave_message(&self) -> ChannelMessage {
        ChannelMessage::WhiteboardLeave(LeaveRequest { whiteboard_id: self.whiteboard_id.clone() })
    }

    /// Record that the scene now holds `elements`.
    ///
    /// Returns the broadcast to emit and schedules an autosave, unless this
    /// change is the installation of a remote scene, in which case the guard
    /// is consumed and nothing is sent or saved.
    pub fn scene_changed(&mut self, elements: &[Element], now_ms: f64) -> Option<ChannelMessage> {
        if self.suppress_next_broadcast {
            self.suppress_next_broadcast = false;
            return None;
        }
        self.save.schedule(elements.to_vec(), now_ms);
        Some(ChannelMessage::WhiteboardUpdate(SceneUpdate {
            whiteboard_id: self.whiteboard_id.clone(),
            elements: elements.to_vec(),
            sender_id: None,
        }))
    }

    /// Decide whether a remote scene should replace `current`.
    ///
    /// Returns the list to install and arms the echo guard, or `None` when the
    /// update targets another whiteboard, comes from this user, or would not
    /// change anything.
    pub fn accept_remote_scene(&mut self, update: SceneUpdate, current: &[Element]) -> Option<Vec<Element>> {
        if update.whiteboard_id != self.whiteboard_id {
            debug!(whiteboard_id = %update.whiteboard_id, "ignoring scene update for another whiteboard");
            return None;
        }
        if update.sender_id.as_deref() == Some(self.user.id.as_str()) {
            debug!("ignoring echo of local scene update");
            return None;
        }
        if update.elements == current {
            return None;
        }
        self.suppress_next_broadcast = true;
        Some(update.elements)
    }

    /// Outgoing cursor broadcast for a pointer at `world`, rate limited.
    pub fn cursor_moved(&mut self, world: Point, now_ms: f64) -> Option<ChannelMessage> {
        if !self.cursor_throttle.try_acquire(now_ms) {
            return None;
        }
        Some(ChannelMessage::WhiteboardCursor(CursorUpdate {
            whiteboard_id: self.whiteboard_id.clone(),
            user_id: None,
            user_name: self.user.name.clone(),
            cursor: CursorPos { x: world.x, y: world.y },
        }))
    }

    /// Apply a remote cursor update. Returns whether anything visible changed.
    pub fn apply_cursor(&mut self, update: CursorUpdate) -> bool {
        if update.whiteboard_id != self.whiteboard_id {
            return false;
        }
        let Some(user_id) = update.user_id else {
            return false;
        };
        if user_id == self.user.id {
            return false;
        }
        let cursor = RemoteCursor {
            x: update.cursor.x,
            y: update.cursor.y,
            name: update.user_name,
            color: cursor_color(&user_id),
        };
        self.cursors.insert(user_id, cursor);
        true
    }

    /// Replace the roster and drop cursors of anyone who left.
    pub fn apply_roster(&mut self, roster: Roster) -> bool {
        if roster.whiteboard_id != self.whiteboard_id {
            return false;
        }
        self.participants = roster
            .collaborators
            .into_iter()
            .filter(|p| p.user_id != self.user.id)
            .collect();
        let present = &self.participants;
        self.cursors
            .retain(|user_id, _| present.iter().any(|p| &p.user_id == user_id));
        true
    }

    /// The autosave that has come due, if any.
    pub fn poll_save(&mut self, now_ms: f64) -> Option<SaveRequest> {
        let elements = self.save.poll(now_ms)?;
        Some(self.save_request(elements))
    }

    /// The pending autosave regardless of its deadline.
    pub fn flush_save(&mut self) -> Option<SaveRequest> {
        let elements = self.save.flush()?;
        Some(self.save_request(elements))
    }

    /// Log a failed save and re-arm it for the next debounce window.
    ///
    /// A save scheduled after the failed one already carries newer content,
    /// so in that case the failed payload is dropped.
    pub fn save_failed(&mut self, request: SaveRequest, error: &CanvasError, now_ms: f64) {
        warn!(
            whiteboard_id = %request.whiteboard_id,
            code = error.error_code(),
            retryable = error.retryable(),
            %error,
            "autosave failed"
        );
        if request.whiteboard_id != self.whiteboard_id || self.save.is_pending() {
            return;
        }
        self.save.schedule(request.elements, now_ms);
    }

    #[must_use]
    pub fn save_pending(&self) -> bool {
        self.save.is_pending()
    }

    #[must_use]
    pub fn cursors(&self) -> &BTreeMap<String, RemoteCursor> {
        &self.cursors
    }

    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    fn save_request(&self, elements: Vec<Element>) -> SaveRequest {
        SaveRequest { whiteboard_id: self.whiteboard_id.clone(), elements }
    }
}
