use serde_json::json;

use super::*;
use crate::doc::{Brush, Shape};

fn user(id: &str, name: &str) -> LocalUser {
    LocalUser { id: id.into(), name: name.into() }
}

fn bridge() -> CollabBridge {
    CollabBridge::new("wb1", user("u1", "Ada"), &CanvasConfig::default())
}

fn line(x: f64) -> Element {
    Element::new(&Brush { color: "#fff".into(), stroke_width: 2.0 }, Shape::Line { x, y: 0.0, w: 10.0, h: 10.0 })
}

fn remote_update(elements: Vec<Element>, sender: &str) -> SceneUpdate {
    SceneUpdate { whiteboard_id: "wb1".into(), elements, sender_id: Some(sender.into()) }
}

fn cursor_from(user_id: Option<&str>, x: f64) -> CursorUpdate {
    CursorUpdate {
        whiteboard_id: "wb1".into(),
        user_id: user_id.map(Into::into),
        user_name: "Bob".into(),
        cursor: CursorPos { x, y: 0.0 },
    }
}

// =============================================================
// Wire format
// =============================================================

#[test]
fn update_encodes_event_and_camel_case_data() {
    let msg = ChannelMessage::WhiteboardUpdate(SceneUpdate {
        whiteboard_id: "wb1".into(),
        elements: Vec::new(),
        sender_id: None,
    });
    let v: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
    assert_eq!(v, json!({ "event": "whiteboard-update", "data": { "whiteboardId": "wb1", "elements": [] } }));
}

#[test]
fn cursor_decodes_from_relay_shape() {
    let msg = ChannelMessage::from_json(
        r#"{"event":"whiteboard-cursor","data":{"whiteboardId":"wb1","userId":"u2","userName":"Bob","cursor":{"x":5,"y":6}}}"#,
    )
    .unwrap();
    assert_eq!(msg, ChannelMessage::WhiteboardCursor(CursorUpdate {
        whiteboard_id: "wb1".into(),
        user_id: Some("u2".into()),
        user_name: "Bob".into(),
        cursor: CursorPos { x: 5.0, y: 6.0 },
    }));
    assert_eq!(msg.whiteboard_id(), "wb1");
}

#[test]
fn roster_decodes() {
    let msg = ChannelMessage::from_json(
        r#"{"event":"whiteboard-collaborators","data":{"whiteboardId":"wb1","collaborators":[{"userId":"u2","name":"Bob"}]}}"#,
    )
    .unwrap();
    let ChannelMessage::WhiteboardCollaborators(roster) = msg else { panic!("expected roster") };
    assert_eq!(roster.collaborators, vec![Participant { user_id: "u2".into(), name: "Bob".into() }]);
}

#[test]
fn malformed_messages_are_errors() {
    assert!(ChannelMessage::from_json("not json").is_err());
    assert!(ChannelMessage::from_json(r#"{"event":"whiteboard-dance","data":{}}"#).is_err());
    assert!(ChannelMessage::from_json(r#"{"event":"whiteboard-update","data":{"elements":[]}}"#).is_err());
}

#[test]
fn join_and_leave_messages() {
    let b = bridge();
    assert_eq!(b.join_message(), ChannelMessage::WhiteboardJoin(JoinRequest {
        whiteboard_id: "wb1".into(),
        user_name: "Ada".into(),
    }));
    let v: serde_json::Value = serde_json::from_str(&b.leave_message().to_json().unwrap()).unwrap();
    assert_eq!(v, json!({ "event": "whiteboard-leave", "data": { "whiteboardId": "wb1" } }));
}

// =============================================================
// Cursor color
// =============================================================

#[test]
fn cursor_color_from_first_char() {
    // 'a' = 97, 97 * 40 % 360 = 280
    assert_eq!(cursor_color("abc"), "hsl(280, 70%, 60%)");
    assert_eq!(cursor_color(""), "hsl(0, 70%, 60%)");
    assert_eq!(cursor_color("abc"), cursor_color("axe"));
}

// =============================================================
// Debounce / throttle
// =============================================================

#[test]
fn debounce_keeps_latest_and_waits_for_quiet_period() {
    let mut d = SaveDebounce::new(2000.0);
    d.schedule(vec![line(1.0)], 0.0);
    d.schedule(vec![line(2.0)], 1500.0);
    assert_eq!(d.due_at(), Some(3500.0));
    assert_eq!(d.poll(3000.0), None);
    let saved = d.poll(3500.0).unwrap();
    assert_eq!(saved[0].anchor().x.to_bits(), 2.0f64.to_bits());
    assert!(!d.is_pending());
    assert_eq!(d.poll(10_000.0), None);
}

#[test]
fn debounce_flush_ignores_deadline() {
    let mut d = SaveDebounce::new(2000.0);
    d.schedule(Vec::new(), 0.0);
    assert_eq!(d.flush(), Some(Vec::new()));
    assert_eq!(d.flush(), None);
}

#[test]
fn throttle_allows_one_per_interval() {
    let mut t = CursorThrottle::new(50.0);
    assert!(t.try_acquire(0.0));
    assert!(!t.try_acquire(10.0));
    assert!(!t.try_acquire(49.9));
    assert!(t.try_acquire(50.0));
    assert!(!t.try_acquire(60.0));
}

// =============================================================
// Scene changes and echo guard
// =============================================================

#[test]
fn local_change_broadcasts_full_scene_and_schedules_save() {
    let mut b = bridge();
    let elements = vec![line(0.0), line(5.0)];
    let msg = b.scene_changed(&elements, 100.0).unwrap();
    let ChannelMessage::WhiteboardUpdate(update) = msg else { panic!("expected update") };
    assert_eq!(update.elements, elements);
    assert_eq!(update.whiteboard_id, "wb1");
    assert!(b.save_pending());
    assert_eq!(b.poll_save(2099.0), None);
    assert_eq!(b.poll_save(2100.0), Some(SaveRequest { whiteboard_id: "wb1".into(), elements }));
}

#[test]
fn remote_scene_arms_one_shot_guard() {
    let mut b = bridge();
    let incoming = vec![line(7.0)];
    let accepted = b.accept_remote_scene(remote_update(incoming.clone(), "u2"), &[]).unwrap();
    assert_eq!(accepted, incoming);

    // The install is swallowed, without a save.
    assert_eq!(b.scene_changed(&incoming, 0.0), None);
    assert!(!b.save_pending());

    // The guard is one-shot.
    assert!(b.scene_changed(&incoming, 0.0).is_some());
}

#[test]
fn remote_scene_for_other_whiteboard_is_ignored() {
    let mut b = bridge();
    let mut update = remote_update(vec![line(1.0)], "u2");
    update.whiteboard_id = "wb2".into();
    assert_eq!(b.accept_remote_scene(update, &[]), None);
    assert!(b.scene_changed(&[], 0.0).is_some());
}

#[test]
fn own_echo_is_ignored() {
    let mut b = bridge();
    assert_eq!(b.accept_remote_scene(remote_update(vec![line(1.0)], "u1"), &[]), None);
}

#[test]
fn identical_scene_is_ignored_without_arming_guard() {
    let mut b = bridge();
    let current = vec![line(1.0)];
    assert_eq!(b.accept_remote_scene(remote_update(current.clone(), "u2"), &current), None);
    assert!(b.scene_changed(&current, 0.0).is_some());
}

#[test]
fn update_without_sender_is_accepted() {
    let mut b = bridge();
    let update = SceneUpdate { whiteboard_id: "wb1".into(), elements: vec![line(1.0)], sender_id: None };
    assert!(b.accept_remote_scene(update, &[]).is_some());
}

// =============================================================
// Cursors and roster
// =============================================================

#[test]
fn cursor_broadcast_is_throttled() {
    let mut b = bridge();
    let first = b.cursor_moved(Point::new(1.0, 2.0), 0.0).unwrap();
    assert_eq!(first, ChannelMessage::WhiteboardCursor(CursorUpdate {
        whiteboard_id: "wb1".into(),
        user_id: None,
        user_name: "Ada".into(),
        cursor: CursorPos { x: 1.0, y: 2.0 },
    }));
    assert_eq!(b.cursor_moved(Point::new(3.0, 4.0), 20.0), None);
    assert!(b.cursor_moved(Point::new(3.0, 4.0), 50.0).is_some());
}

#[test]
fn remote_cursor_is_tracked_by_user() {
    let mut b = bridge();
    assert!(b.apply_cursor(cursor_from(Some("u2"), 10.0)));
    assert!(b.apply_cursor(cursor_from(Some("u2"), 20.0)));
    assert_eq!(b.cursors().len(), 1);
    let c = &b.cursors()["u2"];
    assert_eq!(c.x.to_bits(), 20.0f64.to_bits());
    assert_eq!(c.name, "Bob");
    assert_eq!(c.color, cursor_color("u2"));
}

#[test]
fn self_anonymous_and_foreign_cursors_are_ignored() {
    let mut b = bridge();
    assert!(!b.apply_cursor(cursor_from(Some("u1"), 1.0)));
    assert!(!b.apply_cursor(cursor_from(None, 1.0)));
    let mut other = cursor_from(Some("u2"), 1.0);
    other.whiteboard_id = "wb2".into();
    assert!(!b.apply_cursor(other));
    assert!(b.cursors().is_empty());
}

#[test]
fn roster_excludes_self_and_prunes_cursors() {
    let mut b = bridge();
    b.apply_cursor(cursor_from(Some("u2"), 1.0));
    b.apply_cursor(cursor_from(Some("u3"), 1.0));

    let roster = Roster {
        whiteboard_id: "wb1".into(),
        collaborators: vec![
            Participant { user_id: "u1".into(), name: "Ada".into() },
            Participant { user_id: "u2".into(), name: "Bob".into() },
        ],
    };
    assert!(b.apply_roster(roster));
    assert_eq!(b.participants(), &[Participant { user_id: "u2".into(), name: "Bob".into() }]);
    assert!(b.cursors().contains_key("u2"));
    assert!(!b.cursors().contains_key("u3"));
}

// =============================================================
// Save failures
// =============================================================

#[test]
fn failed_save_is_rearmed() {
    let mut b = bridge();
    b.scene_changed(&[line(1.0)], 0.0);
    let request = b.poll_save(2000.0).unwrap();

    let err = CanvasError::StoreStatus { status: 500, url: "u".into() };
    b.save_failed(request.clone(), &err, 2500.0);
    assert!(b.save_pending());
    assert_eq!(b.poll_save(4000.0), None);
    assert_eq!(b.poll_save(4500.0), Some(request));
}

#[test]
fn failed_save_superseded_by_newer_change() {
    let mut b = bridge();
    b.scene_changed(&[line(1.0)], 0.0);
    let stale = b.poll_save(2000.0).unwrap();
    let newer = vec![line(2.0)];
    b.scene_changed(&newer, 2100.0);

    b.save_failed(stale, &CanvasError::Render("x".into()), 2200.0);
    assert_eq!(b.flush_save().unwrap().elements, newer);
}
