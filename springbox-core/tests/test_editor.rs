//! Sandbox editor behaviour driven through commands

use glam::Vec2;
use springbox_core::tests::test_helpers::{right_click_point, sandbox};
use springbox_core::{Command, DrawingObstacle, Mode, Parameter, SelectionCategory, World};
use std::time::Duration;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn click(world: &mut World, editor: &mut springbox_core::Editor, pos: Vec2, ctrl: bool, at: u64) {
    editor.handle(world, Command::LeftPressed { pos, ctrl, at: ms(at) });
    editor.handle(world, Command::LeftReleased { at: ms(at + 50) });
}

#[test]
fn test_right_click_adds_point_with_editor_defaults() {
    let (mut world, mut editor) = sandbox();
    editor.handle(&mut world, Command::RightClick { pos: Vec2::new(100.0, 120.0) });

    assert_eq!(world.point_count(), 1);
    let (_, p) = world.mass_points().next().unwrap();
    assert_eq!(p.position, Vec2::new(100.0, 120.0));
    assert_eq!(p.mass, editor.config().mass);
    assert_eq!(p.radius, editor.config().point_radius);
}

#[test]
fn test_click_selects_then_second_point_connects() {
    let (mut world, mut editor) = sandbox();
    let a = right_click_point(&mut world, &mut editor, Vec2::new(100.0, 100.0));
    let b = right_click_point(&mut world, &mut editor, Vec2::new(200.0, 100.0));

    click(&mut world, &mut editor, Vec2::new(102.0, 101.0), false, 0);
    assert_eq!(world.selected_mass_points(), vec![a]);

    click(&mut world, &mut editor, Vec2::new(199.0, 100.0), false, 1_000);
    let s = world.spring_between(a, b).expect("points should be connected");
    assert_eq!(world.spring(s).unwrap().rest_length, editor.config().rest_length);
    assert_eq!(world.spring(s).unwrap().stiffness, editor.config().stiffness);
    assert_eq!(world.selection_category(), SelectionCategory::None);
}

#[test]
fn test_connecting_twice_creates_no_duplicate() {
    let (mut world, mut editor) = sandbox();
    let a = Vec2::new(100.0, 100.0);
    let b = Vec2::new(200.0, 100.0);
    right_click_point(&mut world, &mut editor, a);
    right_click_point(&mut world, &mut editor, b);

    for round in 0..3 {
        click(&mut world, &mut editor, a, false, round * 1_000);
        click(&mut world, &mut editor, b, false, round * 1_000 + 500);
    }
    assert_eq!(world.spring_count(), 1);
}

#[test]
fn test_clicking_sole_selection_deselects() {
    let (mut world, mut editor) = sandbox();
    let pos = Vec2::new(300.0, 300.0);
    right_click_point(&mut world, &mut editor, pos);

    click(&mut world, &mut editor, pos, false, 0);
    assert_eq!(world.selection_category(), SelectionCategory::MassPoints);
    click(&mut world, &mut editor, pos, false, 500);
    assert_eq!(world.selection_category(), SelectionCategory::None);
}

#[test]
fn test_ctrl_click_multi_select_then_connect_all() {
    let (mut world, mut editor) = sandbox();
    let a = right_click_point(&mut world, &mut editor, Vec2::new(100.0, 100.0));
    let b = right_click_point(&mut world, &mut editor, Vec2::new(200.0, 100.0));
    let c = right_click_point(&mut world, &mut editor, Vec2::new(150.0, 200.0));

    click(&mut world, &mut editor, Vec2::new(100.0, 100.0), true, 0);
    click(&mut world, &mut editor, Vec2::new(200.0, 100.0), true, 500);
    let mut selected = world.selected_mass_points();
    selected.sort();
    let mut expected = vec![a, b];
    expected.sort();
    assert_eq!(selected, expected);

    click(&mut world, &mut editor, Vec2::new(150.0, 200.0), false, 1_000);
    assert!(world.spring_between(a, c).is_some());
    assert!(world.spring_between(b, c).is_some());
    assert!(world.spring_between(a, b).is_none());
    assert_eq!(world.spring_count(), 2);
}

#[test]
fn test_spring_click_toggles_exclusive_selection() {
    let (mut world, mut editor) = sandbox();
    let a = right_click_point(&mut world, &mut editor, Vec2::new(100.0, 100.0));
    right_click_point(&mut world, &mut editor, Vec2::new(300.0, 100.0));
    click(&mut world, &mut editor, Vec2::new(100.0, 100.0), false, 0);
    click(&mut world, &mut editor, Vec2::new(300.0, 100.0), false, 500);
    let spring = world.springs().next().map(|(k, _)| k).unwrap();

    // Select a point, then click the spring midpoint: point selection goes away
    click(&mut world, &mut editor, Vec2::new(100.0, 100.0), false, 1_000);
    assert_eq!(world.selected_mass_points(), vec![a]);
    click(&mut world, &mut editor, Vec2::new(200.0, 102.0), false, 1_500);
    assert_eq!(world.selected_springs(), vec![spring]);
    assert!(world.selected_mass_points().is_empty());

    click(&mut world, &mut editor, Vec2::new(200.0, 102.0), false, 2_000);
    assert!(world.selected_springs().is_empty());
}

#[test]
fn test_click_on_empty_space_clears_selection() {
    let (mut world, mut editor) = sandbox();
    let pos = Vec2::new(100.0, 100.0);
    right_click_point(&mut world, &mut editor, pos);
    click(&mut world, &mut editor, pos, false, 0);

    click(&mut world, &mut editor, Vec2::new(500.0, 500.0), false, 500);
    assert_eq!(world.selection_category(), SelectionCategory::None);
    assert_eq!(world.spring_count(), 0);
}

#[test]
fn test_delete_selected_points_cascades() {
    let (mut world, mut editor) = sandbox();
    let hub = Vec2::new(400.0, 300.0);
    right_click_point(&mut world, &mut editor, hub);
    let others = [
        Vec2::new(300.0, 200.0),
        Vec2::new(500.0, 200.0),
        Vec2::new(400.0, 450.0),
    ];
    for (i, &p) in others.iter().enumerate() {
        right_click_point(&mut world, &mut editor, p);
        click(&mut world, &mut editor, hub, false, i as u64 * 1_000);
        click(&mut world, &mut editor, p, false, i as u64 * 1_000 + 500);
    }
    assert_eq!(world.spring_count(), 3);

    click(&mut world, &mut editor, hub, false, 10_000);
    editor.handle(&mut world, Command::Delete);

    assert_eq!(world.point_count(), 3);
    assert_eq!(world.spring_count(), 0);
}

#[test]
fn test_delete_selected_springs_keeps_points() {
    let (mut world, mut editor) = sandbox();
    right_click_point(&mut world, &mut editor, Vec2::new(100.0, 100.0));
    right_click_point(&mut world, &mut editor, Vec2::new(300.0, 100.0));
    click(&mut world, &mut editor, Vec2::new(100.0, 100.0), false, 0);
    click(&mut world, &mut editor, Vec2::new(300.0, 100.0), false, 500);

    click(&mut world, &mut editor, Vec2::new(200.0, 100.0), false, 1_000);
    editor.handle(&mut world, Command::Delete);
    assert_eq!(world.spring_count(), 0);
    assert_eq!(world.point_count(), 2);
}

#[test]
fn test_delete_with_nothing_selected_is_noop() {
    let (mut world, mut editor) = sandbox();
    right_click_point(&mut world, &mut editor, Vec2::new(100.0, 100.0));
    editor.handle(&mut world, Command::Delete);
    assert_eq!(world.point_count(), 1);
}

#[test]
fn test_draw_obstacle_closes_near_first_vertex() {
    let (mut world, mut editor) = sandbox();
    editor.handle(&mut world, Command::ToggleMode);
    assert_eq!(editor.mode(), Mode::Obstacle);

    click(&mut world, &mut editor, Vec2::new(100.0, 400.0), false, 0);
    click(&mut world, &mut editor, Vec2::new(300.0, 400.0), false, 500);
    click(&mut world, &mut editor, Vec2::new(200.0, 500.0), false, 1_000);
    assert_eq!(editor.pending_vertices().len(), 3);

    // Within the close radius of the first vertex
    click(&mut world, &mut editor, Vec2::new(104.0, 403.0), false, 1_500);
    assert_eq!(world.obstacle_count(), 1);
    assert_eq!(editor.drawing(), &DrawingObstacle::Idle);
    let (_, obstacle) = world.obstacles().next().unwrap();
    assert_eq!(obstacle.vertices().len(), 3);
}

#[test]
fn test_right_click_finalizes_polygon() {
    let (mut world, mut editor) = sandbox();
    editor.set_mode(&mut world, Mode::Obstacle);
    for (i, v) in [
        Vec2::new(100.0, 100.0),
        Vec2::new(200.0, 100.0),
        Vec2::new(250.0, 200.0),
        Vec2::new(120.0, 220.0),
    ]
    .into_iter()
    .enumerate()
    {
        click(&mut world, &mut editor, v, false, i as u64 * 500);
    }

    editor.handle(&mut world, Command::RightClick { pos: Vec2::new(700.0, 500.0) });
    assert_eq!(world.obstacle_count(), 1);
    assert!(!editor.is_drawing());
    let (_, obstacle) = world.obstacles().next().unwrap();
    assert_eq!(obstacle.vertices().len(), 4);
}

#[test]
fn test_finalize_with_two_vertices_keeps_drawing() {
    let (mut world, mut editor) = sandbox();
    editor.set_mode(&mut world, Mode::Obstacle);
    click(&mut world, &mut editor, Vec2::new(100.0, 100.0), false, 0);
    click(&mut world, &mut editor, Vec2::new(200.0, 100.0), false, 500);

    editor.handle(&mut world, Command::RightClick { pos: Vec2::ZERO });
    assert_eq!(world.obstacle_count(), 0);
    assert!(editor.is_drawing());
    assert_eq!(editor.pending_vertices().len(), 2);
}

#[test]
fn test_duplicate_vertex_is_skipped() {
    let (mut world, mut editor) = sandbox();
    editor.set_mode(&mut world, Mode::Obstacle);
    click(&mut world, &mut editor, Vec2::new(100.0, 100.0), false, 0);
    click(&mut world, &mut editor, Vec2::new(200.0, 100.0), false, 500);
    click(&mut world, &mut editor, Vec2::new(200.0, 100.0), false, 1_000);
    assert_eq!(editor.pending_vertices().len(), 2);
}

#[test]
fn test_escape_cancels_drawing() {
    let (mut world, mut editor) = sandbox();
    editor.set_mode(&mut world, Mode::Obstacle);
    click(&mut world, &mut editor, Vec2::new(100.0, 100.0), false, 0);
    click(&mut world, &mut editor, Vec2::new(200.0, 100.0), false, 500);
    click(&mut world, &mut editor, Vec2::new(150.0, 200.0), false, 1_000);

    editor.handle(&mut world, Command::Escape);
    assert!(!editor.is_drawing());
    assert!(editor.pending_vertices().is_empty());
    assert_eq!(world.obstacle_count(), 0);
}

#[test]
fn test_obstacle_select_and_delete() {
    let (mut world, mut editor) = sandbox();
    let o = world
        .add_obstacle(vec![
            Vec2::new(100.0, 100.0),
            Vec2::new(200.0, 100.0),
            Vec2::new(150.0, 200.0),
        ])
        .unwrap();
    editor.set_mode(&mut world, Mode::Obstacle);

    click(&mut world, &mut editor, Vec2::new(150.0, 130.0), false, 0);
    assert_eq!(world.selected_obstacles(), vec![o]);
    assert!(!editor.is_drawing());

    editor.handle(&mut world, Command::Delete);
    assert_eq!(world.obstacle_count(), 0);
}

#[test]
fn test_mode_toggle_clears_other_selection() {
    let (mut world, mut editor) = sandbox();
    let pos = Vec2::new(100.0, 100.0);
    right_click_point(&mut world, &mut editor, pos);
    click(&mut world, &mut editor, pos, false, 0);
    assert_eq!(world.selection_category(), SelectionCategory::MassPoints);

    editor.handle(&mut world, Command::ToggleMode);
    assert_eq!(world.selection_category(), SelectionCategory::None);

    click(&mut world, &mut editor, Vec2::new(500.0, 500.0), false, 1_000);
    assert!(editor.is_drawing());
    editor.handle(&mut world, Command::ToggleMode);
    assert_eq!(editor.mode(), Mode::Physics);
    assert!(!editor.is_drawing());
}

#[test]
fn test_long_press_and_move_drags_point() {
    let (mut world, mut editor) = sandbox();
    let start = Vec2::new(100.0, 100.0);
    let p = right_click_point(&mut world, &mut editor, start);
    world.mass_point_mut(p).unwrap().velocity = Vec2::new(40.0, 40.0);

    editor.handle(&mut world, Command::LeftPressed { pos: start, ctrl: false, at: ms(0) });
    // Motion before the threshold is not yet a drag
    editor.handle(&mut world, Command::PointerMoved { pos: Vec2::new(110.0, 100.0), at: ms(100) });
    assert!(!editor.is_dragging());
    assert_eq!(world.mass_point(p).unwrap().position, start);

    editor.handle(&mut world, Command::PointerMoved { pos: Vec2::new(150.0, 130.0), at: ms(300) });
    assert!(editor.is_dragging());
    editor.handle(&mut world, Command::PointerMoved { pos: Vec2::new(160.0, 140.0), at: ms(320) });

    let dragged = world.mass_point(p).unwrap();
    assert_eq!(dragged.position, Vec2::new(160.0, 140.0));
    assert_eq!(dragged.velocity, Vec2::ZERO);

    editor.handle(&mut world, Command::LeftReleased { at: ms(400) });
    assert!(!editor.is_dragging());
    // A drag is never also a click
    assert_eq!(world.spring_count(), 0);
}

#[test]
fn test_drag_moves_whole_selection_rigidly() {
    let (mut world, mut editor) = sandbox();
    let a = right_click_point(&mut world, &mut editor, Vec2::new(100.0, 100.0));
    let b = right_click_point(&mut world, &mut editor, Vec2::new(200.0, 150.0));
    click(&mut world, &mut editor, Vec2::new(100.0, 100.0), true, 0);
    click(&mut world, &mut editor, Vec2::new(200.0, 150.0), true, 500);

    editor.handle(&mut world, Command::LeftPressed { pos: Vec2::new(400.0, 400.0), ctrl: false, at: ms(1_000) });
    editor.handle(&mut world, Command::PointerMoved { pos: Vec2::new(430.0, 380.0), at: ms(1_300) });
    editor.handle(&mut world, Command::LeftReleased { at: ms(1_400) });

    assert_eq!(world.mass_point(a).unwrap().position, Vec2::new(130.0, 80.0));
    assert_eq!(world.mass_point(b).unwrap().position, Vec2::new(230.0, 130.0));
}

#[test]
fn test_set_parameter_updates_selection_and_defaults() {
    let (mut world, mut editor) = sandbox();
    let pos = Vec2::new(100.0, 100.0);
    let p = right_click_point(&mut world, &mut editor, pos);
    click(&mut world, &mut editor, pos, false, 0);

    editor.handle(&mut world, Command::SetParameter(Parameter::Mass, 42.0));
    assert_eq!(world.mass_point(p).unwrap().mass, 42.0);
    assert_eq!(editor.parameter_value(&world, Parameter::Mass), 42.0);

    editor.handle(&mut world, Command::SetParameter(Parameter::Mass, -3.0));
    assert_eq!(world.mass_point(p).unwrap().mass, 42.0);

    editor.handle(&mut world, Command::SetParameter(Parameter::Stiffness, 250.0));
    assert_eq!(editor.config().stiffness, 250.0);
    editor.handle(&mut world, Command::SetParameter(Parameter::RestLength, 0.0));
    assert_eq!(editor.config().rest_length, 50.0);
}

#[test]
fn test_set_parameter_on_selected_spring() {
    let (mut world, mut editor) = sandbox();
    right_click_point(&mut world, &mut editor, Vec2::new(100.0, 100.0));
    right_click_point(&mut world, &mut editor, Vec2::new(300.0, 100.0));
    click(&mut world, &mut editor, Vec2::new(100.0, 100.0), false, 0);
    click(&mut world, &mut editor, Vec2::new(300.0, 100.0), false, 500);
    click(&mut world, &mut editor, Vec2::new(200.0, 100.0), false, 1_000);
    let (s, _) = world.springs().next().unwrap();

    editor.handle(&mut world, Command::SetParameter(Parameter::RestLength, 120.0));
    editor.handle(&mut world, Command::SetParameter(Parameter::Damping, 3.5));
    let spring = world.spring(s).unwrap();
    assert_eq!(spring.rest_length, 120.0);
    assert_eq!(spring.damping, 3.5);
    assert_eq!(editor.parameter_value(&world, Parameter::RestLength), 120.0);
}

#[test]
fn test_pause_step_and_gravity_commands() {
    let (mut world, mut editor) = sandbox();
    editor.handle(&mut world, Command::TogglePause);
    assert!(world.is_paused());
    editor.handle(&mut world, Command::SingleStep);
    assert!(world.single_step_requested());
    editor.handle(&mut world, Command::ToggleGravity);
    assert!(!world.gravity_enabled());
}

#[test]
fn test_toggle_pin_on_selection() {
    let (mut world, mut editor) = sandbox();
    let pos = Vec2::new(100.0, 100.0);
    let p = right_click_point(&mut world, &mut editor, pos);
    click(&mut world, &mut editor, pos, false, 0);

    editor.handle(&mut world, Command::TogglePin);
    assert!(world.mass_point(p).unwrap().pinned);
    for _ in 0..30 {
        world.update(1.0 / 60.0);
    }
    assert_eq!(world.mass_point(p).unwrap().position, pos);
}

#[test]
fn test_reset_empties_world_and_scratch_state() {
    let (mut world, mut editor) = sandbox();
    right_click_point(&mut world, &mut editor, Vec2::new(100.0, 100.0));
    editor.set_mode(&mut world, Mode::Obstacle);
    click(&mut world, &mut editor, Vec2::new(500.0, 500.0), false, 0);
    assert!(editor.is_drawing());

    editor.handle(&mut world, Command::Reset);
    assert_eq!(world.point_count(), 0);
    assert!(!editor.is_drawing());
}

#[test]
fn test_held_drag_keeps_points_under_cursor() {
    let (mut world, mut editor) = sandbox();
    let p = right_click_point(&mut world, &mut editor, Vec2::new(100.0, 100.0));

    editor.handle(&mut world, Command::LeftPressed { pos: Vec2::new(100.0, 100.0), ctrl: false, at: ms(0) });
    editor.handle(&mut world, Command::PointerMoved { pos: Vec2::new(150.0, 100.0), at: ms(300) });
    assert!(editor.is_dragging());

    // A second of frames with the cursor held still
    for _ in 0..60 {
        world.update(1.0 / 60.0);
    }
    let held = world.mass_point(p).unwrap();
    assert_eq!(held.position, Vec2::new(150.0, 100.0));
    assert_eq!(held.velocity, Vec2::ZERO);

    editor.handle(&mut world, Command::LeftReleased { at: ms(1_400) });
    assert!(!world.mass_point(p).unwrap().pinned);
    for _ in 0..10 {
        world.update(1.0 / 60.0);
    }
    assert!(world.mass_point(p).unwrap().position.y > 100.0, "released point should fall again");
}

#[test]
fn test_drag_restores_existing_pin() {
    let (mut world, mut editor) = sandbox();
    let pos = Vec2::new(100.0, 100.0);
    let p = right_click_point(&mut world, &mut editor, pos);
    world.mass_point_mut(p).unwrap().pinned = true;

    editor.handle(&mut world, Command::LeftPressed { pos, ctrl: false, at: ms(0) });
    editor.handle(&mut world, Command::PointerMoved { pos: Vec2::new(120.0, 130.0), at: ms(300) });
    editor.handle(&mut world, Command::LeftReleased { at: ms(400) });

    let point = world.mass_point(p).unwrap();
    assert!(point.pinned);
    assert_eq!(point.position, Vec2::new(120.0, 130.0));
}

#[test]
fn test_pin_toggled_mid_drag_applies_after_release() {
    let (mut world, mut editor) = sandbox();
    let pos = Vec2::new(100.0, 100.0);
    let p = right_click_point(&mut world, &mut editor, pos);

    editor.handle(&mut world, Command::LeftPressed { pos, ctrl: false, at: ms(0) });
    editor.handle(&mut world, Command::PointerMoved { pos: Vec2::new(110.0, 100.0), at: ms(300) });
    editor.handle(&mut world, Command::TogglePin);
    // Still held by the drag
    assert!(world.mass_point(p).unwrap().pinned);

    editor.handle(&mut world, Command::LeftReleased { at: ms(400) });
    assert!(world.mass_point(p).unwrap().pinned);
}

#[test]
fn test_deleting_dragged_points_ends_drag() {
    let (mut world, mut editor) = sandbox();
    let pos = Vec2::new(100.0, 100.0);
    right_click_point(&mut world, &mut editor, pos);

    editor.handle(&mut world, Command::LeftPressed { pos, ctrl: false, at: ms(0) });
    editor.handle(&mut world, Command::PointerMoved { pos: Vec2::new(110.0, 100.0), at: ms(300) });
    editor.handle(&mut world, Command::Delete);

    assert!(!editor.is_dragging());
    assert_eq!(world.point_count(), 0);
}
