//! Invariants checked over families of polygons and random edit sequences.

use std::f64::consts::TAU;

use proptest::prelude::*;

use crate::config::EditorConfig;
use crate::constants::{DEFAULT_MIN_AREA, WHOLE_SHAPE_HANDLE};
use crate::editor::{EditOutcome, KeyState, Polygon2d, PolygonState};
use crate::geometry::{IntersectionTest, Vector2D, is_simple};
use crate::keybindings::EditorKey;
use crate::model::{Label, LabelType, PathPoint, PointKind, Polygon, controls_paired};

fn regular(n: usize, radius: f64) -> Vec<(f64, f64)> {
    (0..n)
        .map(|i| {
            let angle = TAU * i as f64 / n as f64;
            (100.0 + radius * angle.cos(), 100.0 + radius * angle.sin())
        })
        .collect()
}

/// Star with alternating outer and inner radius; simple but concave.
fn star(spikes: usize, outer: f64, inner: f64) -> Vec<(f64, f64)> {
    (0..spikes * 2)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let angle = TAU * i as f64 / (spikes * 2) as f64;
            (100.0 + radius * angle.cos(), 100.0 + radius * angle.sin())
        })
        .collect()
}

fn ring(vertices: &[(f64, f64)]) -> Vec<Vector2D> {
    vertices.iter().map(|&p| p.into()).collect()
}

fn editor_for(vertices: &[(f64, f64)]) -> Polygon2d {
    let label = Label::new(0, LabelType::Polygon2d);
    let mut editor = Polygon2d::from_shape(
        &label,
        0,
        &Polygon::from_vertices(vertices),
        EditorConfig::default(),
    );
    editor.set_selected(true);
    editor
}

/// Every midpoint bisects its neighbouring vertices within `tolerance` and
/// bezier controls come in adjacent pairs between two vertices.
fn helpers_hold(points: &[PathPoint], tolerance: f64) -> bool {
    let n = points.len();
    if n == 0 || points[0].kind != PointKind::Vertex {
        return false;
    }
    let mut i = 0;
    while i < n {
        match points[i].kind {
            PointKind::Vertex => i += 1,
            PointKind::Midpoint => {
                let prev = points[(i + n - 1) % n];
                let next = points[(i + 1) % n];
                if !prev.is_vertex() || !next.is_vertex() {
                    return false;
                }
                let expected = prev.position().midpoint(&next.position());
                if points[i].position().distance_to(&expected) > tolerance {
                    return false;
                }
                i += 1;
            }
            PointKind::BezierControl => {
                let paired = i + 1 < n && points[i + 1].kind == PointKind::BezierControl;
                if !paired || !points[i - 1].is_vertex() || !points[(i + 2) % n].is_vertex() {
                    return false;
                }
                i += 2;
            }
        }
    }
    true
}

fn assert_helper_invariants(points: &[PathPoint]) {
    assert!(helpers_hold(points, 0.0), "helper points out of place: {:?}", points);
}

#[test]
fn test_convex_polygons_are_simple() {
    for n in 3..=24 {
        let vertices = regular(n, 50.0);
        assert!(
            is_simple(&ring(&vertices), IntersectionTest::Orientation),
            "regular {}-gon",
            n
        );
        assert!(Polygon::from_vertices(&vertices).is_valid(1e-4, IntersectionTest::Orientation));
    }
}

#[test]
fn test_star_polygons_are_simple() {
    for spikes in 3..=12 {
        for inner in [5.0, 20.0, 40.0] {
            let vertices = star(spikes, 50.0, inner);
            assert!(
                is_simple(&ring(&vertices), IntersectionTest::Orientation),
                "star with {} spikes, inner radius {}",
                spikes,
                inner
            );
        }
    }
}

#[test]
fn test_pentagram_order_is_not_simple() {
    for n in [5, 7, 9, 11] {
        let points = regular(n, 50.0);
        // Visit every second vertex to trace a star polygon whose edges cross
        let crossed: Vec<_> = (0..n).map(|i| points[(i * 2) % n]).collect();
        assert!(!is_simple(&ring(&crossed), IntersectionTest::Orientation));
    }
}

#[test]
fn test_loaded_editor_has_midpoints() {
    for n in 3..=12 {
        let editor = editor_for(&regular(n, 50.0));
        assert_eq!(editor.points().len(), n * 2);
        assert_helper_invariants(editor.points());
        assert_eq!(editor.to_polygon(), Polygon::from_vertices(&regular(n, 50.0)));
    }
}

#[test]
fn test_reshape_keeps_midpoints() {
    let keys = KeyState::new();
    for n in 4..=10 {
        let vertices = regular(n, 60.0);
        for vertex in 0..n {
            let mut editor = editor_for(&vertices);
            let (x, y) = vertices[vertex];
            let handle = vertex * 2 + 1;
            editor.pointer_down(Vector2D::new(x, y), Some(handle), &keys).unwrap();
            // Pull the vertex outward so the polygon stays simple
            let target = Vector2D::new(100.0 + (x - 100.0) * 1.2, 100.0 + (y - 100.0) * 1.2);
            editor.pointer_move(target).unwrap();
            assert_helper_invariants(editor.points());
            let outcome = editor.pointer_up(target, false).unwrap();
            assert!(matches!(outcome, EditOutcome::Commit(_)));
            assert_eq!(editor.points()[vertex * 2].position(), target);
        }
    }
}

#[test]
fn test_split_every_midpoint() {
    let keys = KeyState::new();
    let mut editor = editor_for(&regular(6, 50.0));
    // Split each original edge once, walking backwards so earlier indices hold
    for edge in (0..6).rev() {
        let handle = edge * 2 + 2;
        let position = editor.points()[handle - 1].position();
        editor.pointer_down(position, Some(handle), &keys).unwrap();
        assert_eq!(editor.state(), PolygonState::Reshape);
        editor.pointer_up(position, false).unwrap();
        assert_helper_invariants(editor.points());
    }
    assert_eq!(editor.vertex_count(), 12);
}

#[test]
fn test_curve_pairs_survive_edits() {
    let mut keys = KeyState::new();
    let mut editor = editor_for(&regular(5, 50.0));
    keys.press(EditorKey::Curve);
    for edge in (0..5).rev().step_by(2) {
        let handle = edge * 2 + 2;
        let position = editor.points()[handle - 1].position();
        editor.pointer_down(position, Some(handle), &keys).unwrap();
        editor.pointer_up(position, false).unwrap();
        assert_helper_invariants(editor.points());
    }
    let controls = editor
        .points()
        .iter()
        .filter(|p| p.kind == PointKind::BezierControl)
        .count();
    assert_eq!(controls, 6);

    keys.release(EditorKey::Curve);
    keys.press(EditorKey::DeleteVertex);
    let position = editor.points()[0].position();
    editor.pointer_down(position, Some(1), &keys).unwrap();
    editor.pointer_up(position, false).unwrap();
    assert_eq!(editor.vertex_count(), 4);
    assert_helper_invariants(editor.points());
}

#[test]
fn test_move_is_idempotent() {
    let keys = KeyState::new();
    for n in 3..=8 {
        let vertices = regular(n, 40.0);
        let mut editor = editor_for(&vertices);
        let before = editor.points().to_vec();
        let start = Vector2D::new(100.0, 100.0);
        editor.pointer_down(start, Some(0), &keys).unwrap();
        for step in 1..=10 {
            let offset = step as f64 * 3.0;
            editor.pointer_move(Vector2D::new(100.0 + offset, 100.0 - offset)).unwrap();
        }
        editor.pointer_move(start).unwrap();
        assert_eq!(editor.points(), &before[..]);
        editor.pointer_move(Vector2D::new(110.0, 90.0)).unwrap();
        editor.pointer_move(Vector2D::new(110.0, 90.0)).unwrap();
        let first = editor.points()[0].position();
        assert_eq!(
            first,
            before[0].position() + Vector2D::new(10.0, -10.0)
        );
    }
}

// ============================================================================
// Random rings and edit sequences
// ============================================================================

/// Star-shaped rings around (100, 100): one vertex per angular sector, so
/// consecutive vertices are less than half a turn apart and the ring is simple.
fn simple_ring() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0.25f64..0.75, 10.0f64..80.0), 3..16).prop_map(|polar| {
        let n = polar.len() as f64;
        polar
            .iter()
            .enumerate()
            .map(|(i, &(fraction, radius))| {
                let angle = TAU * (i as f64 + fraction) / n;
                (100.0 + radius * angle.cos(), 100.0 + radius * angle.sin())
            })
            .collect()
    })
}

#[derive(Debug, Clone)]
enum Edit {
    Reshape { pick: usize, dx: f64, dy: f64 },
    Split { pick: usize },
    Curve { pick: usize },
    Move { dx: f64, dy: f64 },
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0usize..64, -20.0f64..20.0, -20.0f64..20.0)
            .prop_map(|(pick, dx, dy)| Edit::Reshape { pick, dx, dy }),
        (0usize..64).prop_map(|pick| Edit::Split { pick }),
        (0usize..64).prop_map(|pick| Edit::Curve { pick }),
        (-50.0f64..50.0, -50.0f64..50.0).prop_map(|(dx, dy)| Edit::Move { dx, dy }),
    ]
}

/// Press, drag and release for one edit. `pick` wraps around the point list.
fn apply_edit(editor: &mut Polygon2d, edit: &Edit) -> EditOutcome {
    let mut keys = KeyState::new();
    let points = editor.points();
    let (handle, from, to) = match *edit {
        Edit::Reshape { pick, dx, dy } => {
            let index = pick % points.len();
            let from = points[index].position();
            (index + 1, from, from + Vector2D::new(dx, dy))
        }
        Edit::Split { pick } => {
            let midpoints: Vec<usize> = points
                .iter()
                .enumerate()
                .filter(|(_, p)| p.kind == PointKind::Midpoint)
                .map(|(i, _)| i)
                .collect();
            if midpoints.is_empty() {
                return EditOutcome::Unchanged;
            }
            let index = midpoints[pick % midpoints.len()];
            let at = points[index].position();
            (index + 1, at, at)
        }
        Edit::Curve { pick } => {
            keys.press(EditorKey::Curve);
            let index = pick % points.len();
            let at = points[index].position();
            (index + 1, at, at)
        }
        Edit::Move { dx, dy } => {
            let from = points[0].position();
            (WHOLE_SHAPE_HANDLE, from, from + Vector2D::new(dx, dy))
        }
    };
    editor.pointer_down(from, Some(handle), &keys).unwrap();
    editor.pointer_move(to).unwrap();
    editor.pointer_up(to, false).unwrap()
}

proptest! {
    #[test]
    fn test_random_rings_are_valid(vertices in simple_ring()) {
        prop_assert!(is_simple(&ring(&vertices), IntersectionTest::Orientation));
        let polygon = Polygon::from_vertices(&vertices);
        prop_assert!(polygon.is_valid(DEFAULT_MIN_AREA, IntersectionTest::Orientation));

        let editor = editor_for(&vertices);
        prop_assert!(helpers_hold(editor.points(), 0.0));
        prop_assert_eq!(editor.to_polygon(), polygon);
    }

    #[test]
    fn test_edit_sequences_commit_only_valid_polygons(
        vertices in simple_ring(),
        edits in prop::collection::vec(edit(), 1..24),
    ) {
        let mut editor = editor_for(&vertices);
        for edit in &edits {
            let before = editor.points().to_vec();
            let outcome = apply_edit(&mut editor, edit);
            prop_assert_eq!(editor.state(), PolygonState::Closed);

            match outcome {
                EditOutcome::Commit(_) => {
                    let committed = editor.to_polygon();
                    prop_assert!(editor.is_valid());
                    let ring = committed.vertex_ring();
                    prop_assert!(is_simple(&ring, IntersectionTest::Orientation));
                    prop_assert!(controls_paired(&committed.points));
                    if let Edit::Move { dx, dy } = *edit {
                        let delta = Vector2D::new(dx, dy);
                        for (moved, original) in editor.points().iter().zip(&before) {
                            let expected = original.position() + delta;
                            prop_assert!(moved.position().distance_to(&expected) < 1e-9);
                        }
                    }
                }
                EditOutcome::RolledBack => prop_assert_eq!(editor.points(), &before[..]),
                EditOutcome::Unchanged | EditOutcome::Discarded => {}
            }
            prop_assert!(
                helpers_hold(editor.points(), 1e-9),
                "after {:?}: {:?}",
                edit,
                editor.points()
            );
        }
    }
}
