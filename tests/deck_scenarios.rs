//! End-to-end gesture scenarios against the public library API.

use std::time::Duration;

use swipedeck::config::{DeckConfig, MotionConfig};
use swipedeck::deck::{DeckEvent, Phase, RenderSet, SwipeDeck};
use swipedeck::geometry::{Vec2, Viewport};
use swipedeck::gesture::GestureOutcome;
use swipedeck::profile::{Profile, ProfileSet};

const VIEWPORT: Viewport = Viewport::new(390.0, 844.0);

fn deck() -> SwipeDeck {
    SwipeDeck::new(ProfileSet::builtin(), VIEWPORT)
}

fn drag(deck: &mut SwipeDeck, dx: f64, dy: f64) {
    assert!(deck.on_drag_start());
    assert!(deck.on_drag_move(dx / 2.0, dy / 2.0));
    assert!(deck.on_drag_move(dx, dy));
    deck.on_drag_end(dx, dy).expect("release while dragging");
}

#[test]
fn accepted_card_leaves_and_next_moves_up() {
    let mut deck = deck();
    drag(&mut deck, 150.0, 20.0);

    assert_eq!(
        deck.phase(),
        Phase::Resolving {
            outcome: GestureOutcome::Accept
        }
    );
    assert_eq!(deck.animation_target(), Some(Vec2::new(490.0, 20.0)));

    let event = deck.settle();
    assert_eq!(
        event,
        Some(DeckEvent::Dismissed {
            id: 1,
            outcome: GestureOutcome::Accept
        })
    );
    assert_eq!(deck.cursor(), 2);
    assert_eq!(deck.offset(), Vec2::ZERO);
    let set = deck.render_set();
    assert_eq!(
        set,
        RenderSet {
            active: Some(2),
            next: Some(3)
        }
    );
    assert!(!set.contains(1));
}

#[test]
fn short_drag_springs_back() {
    let mut deck = deck();
    drag(&mut deck, -50.0, 0.0);
    assert_eq!(deck.animation_target(), Some(Vec2::ZERO));

    // Watch the card travel back through the frames.
    let mut frames = 0;
    let mut event = None;
    while event.is_none() {
        event = deck.tick(Duration::from_millis(16));
        frames += 1;
        assert!(frames < 10_000, "cancel spring never settled");
    }
    assert_eq!(event, Some(DeckEvent::Restored { id: 1 }));
    assert_eq!(deck.cursor(), 1);
    assert_eq!(deck.offset(), Vec2::ZERO);
    assert_eq!(deck.stats().cancelled, 1);
}

#[test]
fn threshold_boundary_is_exclusive() {
    for (dx, outcome) in [
        (121.0, GestureOutcome::Accept),
        (-121.0, GestureOutcome::Reject),
        (100.0, GestureOutcome::Cancel),
        (120.0, GestureOutcome::Cancel),
        (-120.0, GestureOutcome::Cancel),
    ] {
        let mut deck = deck();
        assert!(deck.on_drag_start());
        let release = deck.on_drag_end(dx, 0.0).unwrap();
        assert_eq!(release.outcome, outcome, "dx = {}", dx);
    }
}

#[test]
fn exhausted_stack_is_empty_and_inert() {
    let mut deck = deck();
    for outcome in [
        GestureOutcome::Accept,
        GestureOutcome::Reject,
        GestureOutcome::Reject,
        GestureOutcome::Accept,
    ] {
        deck.swipe(outcome).unwrap();
        deck.settle().unwrap();
    }

    assert_eq!(deck.cursor(), 5);
    assert!(deck.is_exhausted());
    assert!(deck.render_set().is_empty());
    let frame = deck.frame();
    assert!(frame.active.is_none() && frame.next.is_none());

    assert!(!deck.on_drag_start());
    assert!(!deck.on_drag_move(300.0, 0.0));
    assert!(deck.on_drag_end(300.0, 0.0).is_none());
    assert!(deck.swipe(GestureOutcome::Accept).is_none());
    assert_eq!(deck.cursor(), 5);
    assert_eq!(deck.stats().accepted, 2);
    assert_eq!(deck.stats().rejected, 2);
}

#[test]
fn last_card_has_no_next() {
    let mut deck = deck();
    for _ in 0..3 {
        deck.swipe(GestureOutcome::Accept).unwrap();
        deck.settle();
    }
    assert_eq!(
        deck.render_set(),
        RenderSet {
            active: Some(4),
            next: None
        }
    );
}

#[test]
fn drags_ignored_while_resolving() {
    let mut deck = deck();
    drag(&mut deck, 200.0, 0.0);
    deck.tick(Duration::from_millis(16));
    let offset = deck.offset();

    assert!(!deck.on_drag_start());
    assert!(!deck.on_drag_move(-300.0, 0.0));
    assert!(deck.on_drag_end(-300.0, 0.0).is_none());
    assert_eq!(deck.offset(), offset);

    deck.settle();
    assert_eq!(deck.cursor(), 2);
}

#[test]
fn presentation_follows_drag() {
    let mut deck = deck();
    deck.on_drag_start();
    deck.on_drag_move(VIEWPORT.half_width(), 0.0);
    let p = deck.presentation();
    assert!((p.rotation_deg - 10.0).abs() < 1e-9);
    assert!((p.accept_opacity - 1.0).abs() < 1e-9);
    assert!(p.reject_opacity.abs() < 1e-9);
    assert!((p.next_scale - 1.0).abs() < 1e-9);
    assert!((p.next_opacity - 1.0).abs() < 1e-9);

    deck.on_drag_move(0.0, 0.0);
    let p = deck.presentation();
    assert!((p.next_scale - 0.8).abs() < 1e-9);
    assert!(p.next_opacity.abs() < 1e-9);
}

#[test]
fn custom_profiles_and_snap_motion() {
    let config = DeckConfig {
        motion: MotionConfig {
            animate: false,
            ..MotionConfig::default()
        },
        profiles: vec![
            Profile::new(20, "a.png").with_name("Ada"),
            Profile::new(21, "b.png"),
        ],
        ..DeckConfig::default()
    };
    let mut deck = SwipeDeck::from_config(&config, VIEWPORT).unwrap();
    assert_eq!(deck.cursor(), 20);

    deck.swipe(GestureOutcome::Reject).unwrap();
    assert_eq!(
        deck.tick(Duration::from_millis(1)),
        Some(DeckEvent::Dismissed {
            id: 20,
            outcome: GestureOutcome::Reject
        })
    );
    assert_eq!(
        deck.render_set(),
        RenderSet {
            active: Some(21),
            next: None
        }
    );
}
