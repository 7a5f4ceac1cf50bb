use drawing_canvas::{DrawingSurface, PointerEvent};
use egui::{Color32, Pos2};

fn draw(surface: &mut DrawingSurface, points: &[(f32, f32)]) {
    let mut iter = points.iter();
    let &(x, y) = iter.next().unwrap();
    surface.handle_event(PointerEvent::Down(Pos2::new(x, y)));
    for &(x, y) in iter {
        surface.handle_event(PointerEvent::Move(Pos2::new(x, y)));
    }
    surface.handle_event(PointerEvent::Up);
}

#[test]
fn test_brush_scenario_with_undo_redo() {
    let mut surface = DrawingSurface::new();
    surface.set_brush_size(20.0).unwrap();
    surface.set_brush_color(Color32::BLACK);

    draw(&mut surface, &[(0.0, 0.0), (10.0, 10.0)]);
    draw(&mut surface, &[(5.0, 5.0), (15.0, 15.0)]);

    let strokes: Vec<_> = surface.active_strokes().cloned().collect();
    assert_eq!(strokes.len(), 2);
    assert_eq!(strokes[0].points()[0], Pos2::new(0.0, 0.0));
    assert_eq!(strokes[1].points()[0], Pos2::new(5.0, 5.0));
    assert!(strokes.iter().all(|s| s.size() == 20.0 && s.color() == Color32::BLACK));

    assert!(surface.undo());
    assert_eq!(surface.active_strokes().count(), 1);
    assert!(surface.can_redo());

    assert!(surface.redo());
    assert_eq!(surface.active_strokes().cloned().collect::<Vec<_>>(), strokes);
    assert!(!surface.can_redo());
}

#[test]
fn test_cancelled_gesture_leaves_history_unchanged() {
    let mut surface = DrawingSurface::new();
    draw(&mut surface, &[(1.0, 1.0), (2.0, 2.0)]);

    surface.handle_event(PointerEvent::Down(Pos2::new(0.0, 0.0)));
    surface.handle_event(PointerEvent::Move(Pos2::new(1.0, 0.0)));
    surface.handle_event(PointerEvent::Move(Pos2::new(2.0, 0.0)));
    surface.handle_event(PointerEvent::Move(Pos2::new(3.0, 0.0)));
    assert!(surface.is_drawing());
    surface.handle_event(PointerEvent::Cancel);

    assert!(!surface.is_drawing());
    assert_eq!(surface.active_strokes().count(), 1);
    assert!(surface.render().in_progress.is_none());
}

#[test]
fn test_tap_commits_a_dot() {
    let mut surface = DrawingSurface::new();
    surface.handle_event(PointerEvent::Down(Pos2::new(7.0, 7.0)));
    surface.handle_event(PointerEvent::Up);

    let stroke = surface.active_strokes().next().unwrap();
    assert!(stroke.is_dot());
    assert!(surface.can_undo());
}

#[test]
fn test_brush_changes_do_not_alter_committed_strokes() {
    let mut surface = DrawingSurface::new();
    surface.set_brush_size(10.0).unwrap();
    surface.set_brush_color(Color32::RED);
    draw(&mut surface, &[(0.0, 0.0), (5.0, 5.0)]);

    surface.set_brush_size(30.0).unwrap();
    surface.set_brush_color(Color32::BLUE);
    draw(&mut surface, &[(1.0, 1.0), (6.0, 6.0)]);

    let strokes: Vec<_> = surface.active_strokes().collect();
    assert_eq!((strokes[0].size(), strokes[0].color()), (10.0, Color32::RED));
    assert_eq!((strokes[1].size(), strokes[1].color()), (30.0, Color32::BLUE));
}

#[test]
fn test_invalid_brush_size_is_rejected() {
    let mut surface = DrawingSurface::new();
    let before = surface.brush();
    assert!(surface.set_brush_size(0.0).unwrap_err().is_invalid_argument());
    assert!(surface.set_brush_size(-4.0).is_err());
    assert_eq!(surface.brush(), before);
}

#[test]
fn test_render_paints_in_progress_stroke_last() {
    let mut surface = DrawingSurface::new();
    surface.set_brush_color(Color32::RED);
    draw(&mut surface, &[(0.0, 0.0), (5.0, 0.0)]);

    surface.set_brush_color(Color32::GREEN);
    surface.handle_event(PointerEvent::Down(Pos2::new(1.0, 1.0)));
    surface.handle_event(PointerEvent::Move(Pos2::new(2.0, 2.0)));

    let composition = surface.render();
    let colors: Vec<_> = composition.layers().map(|s| s.color()).collect();
    assert_eq!(colors, vec![Color32::RED, Color32::GREEN]);

    // Exports only ever see committed strokes
    assert_eq!(surface.committed_composition().layers().count(), 1);
}

#[test]
fn test_availability_tracks_every_operation() {
    let mut surface = DrawingSurface::new();
    let check = |surface: &DrawingSurface| {
        let availability = surface.availability();
        assert_eq!(availability.can_undo, surface.history().len() > 0);
        assert_eq!(availability.can_redo, surface.history().redo_len() > 0);
    };

    check(&surface);
    draw(&mut surface, &[(0.0, 0.0), (1.0, 1.0)]);
    check(&surface);
    surface.undo();
    check(&surface);
    surface.redo();
    check(&surface);
    surface.undo();
    draw(&mut surface, &[(3.0, 3.0)]);
    check(&surface);
    assert!(!surface.redo());
}
