//! Interactive window for springbox
//!
//! Three scenes share one eframe app: a menu, the prebuilt demo simulation,
//! and the sandbox editor. Scene code never switches scenes itself; it returns
//! a [`SceneRequest`] which the app applies once the frame is drawn.

use eframe::egui;
use egui::{Color32, Pos2, Rect, Sense, Shape, Stroke};
use springbox_core::{
    build_world, Command, Editor, EditorConfig, Mode, Parameter, PhysicsConfig, Scene, Vec2,
    World,
};
use std::time::Duration;

pub const SIDE_PANEL_WIDTH: f32 = 220.0;

const BACKGROUND: Color32 = Color32::from_rgb(24, 26, 30);
const POINT: Color32 = Color32::from_rgb(120, 190, 255);
const SPRING: Color32 = Color32::from_rgb(170, 170, 170);
const OBSTACLE: Color32 = Color32::from_rgb(230, 160, 60);
const SELECTED: Color32 = Color32::from_rgb(255, 80, 80);
const PENDING: Color32 = Color32::from_rgb(120, 230, 120);

/// Scene switch asked for by the UI of the current scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneRequest {
    Menu,
    Simulation,
    Sandbox,
}

enum ActiveScene {
    Menu,
    Simulation(World),
    Sandbox { world: World, editor: Editor },
}

pub struct SandboxApp {
    physics: PhysicsConfig,
    editor_config: EditorConfig,
    scene: ActiveScene,
    last_error: Option<String>,
}

impl SandboxApp {
    pub fn new(
        physics: PhysicsConfig,
        editor_config: EditorConfig,
        start: SceneRequest,
        _cc: &eframe::CreationContext<'_>,
    ) -> Self {
        let mut app = Self {
            physics,
            editor_config,
            scene: ActiveScene::Menu,
            last_error: None,
        };
        app.switch_to(start);
        app
    }

    fn switch_to(&mut self, request: SceneRequest) {
        log::info!("switching to {request:?} scene");
        self.scene = match request {
            SceneRequest::Menu => ActiveScene::Menu,
            SceneRequest::Simulation => match build_world(Scene::Demo, self.physics.clone()) {
                Ok(world) => {
                    self.last_error = None;
                    ActiveScene::Simulation(world)
                }
                Err(e) => {
                    log::error!("failed to build demo scene: {e}");
                    self.last_error = Some(e.to_string());
                    ActiveScene::Menu
                }
            },
            SceneRequest::Sandbox => ActiveScene::Sandbox {
                world: World::new(self.physics.clone()),
                editor: Editor::new(self.editor_config.clone()),
            },
        };
    }
}

impl eframe::App for SandboxApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let request = match &mut self.scene {
            ActiveScene::Menu => menu_ui(ctx, self.last_error.as_deref()),
            ActiveScene::Simulation(world) => simulation_ui(ctx, world),
            ActiveScene::Sandbox { world, editor } => sandbox_ui(ctx, world, editor),
        };

        if let Some(request) = request {
            self.switch_to(request);
        }

        // Request repaint for animation
        if !matches!(self.scene, ActiveScene::Menu) {
            ctx.request_repaint();
        }
    }
}

fn menu_ui(ctx: &egui::Context, error: Option<&str>) -> Option<SceneRequest> {
    let mut request = None;
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.3);
            ui.heading("Springbox");
            ui.add_space(24.0);
            if ui.button("Simulation").clicked() {
                request = Some(SceneRequest::Simulation);
            }
            ui.add_space(8.0);
            if ui.button("Sandbox").clicked() {
                request = Some(SceneRequest::Sandbox);
            }
            if let Some(error) = error {
                ui.add_space(16.0);
                ui.label(egui::RichText::new(format!("Error: {error}")).color(Color32::RED));
            }
        });
    });
    request
}

fn simulation_ui(ctx: &egui::Context, world: &mut World) -> Option<SceneRequest> {
    let mut request = None;

    egui::TopBottomPanel::top("simulation_controls").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("Menu").clicked() {
                request = Some(SceneRequest::Menu);
            }
            if ui.button(if world.is_paused() { "Play" } else { "Pause" }).clicked() {
                world.toggle_pause();
            }
            if ui.button("Step").clicked() {
                world.request_single_step();
            }
            if ui.button("Restart").clicked() {
                request = Some(SceneRequest::Simulation);
            }
            ui.separator();
            ui.label(format!(
                "KE {:.1}  PE {:.1}",
                world.kinetic_energy(),
                world.potential_energy()
            ));
        });
    });

    let (escape, space, right, gravity, restart, dt) = ctx.input(|i| {
        (
            i.key_pressed(egui::Key::Escape),
            i.key_pressed(egui::Key::Space),
            i.key_pressed(egui::Key::ArrowRight),
            i.key_pressed(egui::Key::G),
            i.key_pressed(egui::Key::R),
            i.stable_dt,
        )
    });
    if escape {
        request = Some(SceneRequest::Menu);
    }
    if restart {
        request = Some(SceneRequest::Simulation);
    }
    if space {
        world.toggle_pause();
    }
    if right {
        world.request_single_step();
    }
    if gravity {
        world.toggle_gravity();
    }

    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::hover());
            let rect = response.rect;
            world.set_bounds(Vec2::new(rect.width(), rect.height()));
            world.update(dt);
            paint_world(&painter, rect, world);
        });

    request
}

fn sandbox_ui(ctx: &egui::Context, world: &mut World, editor: &mut Editor) -> Option<SceneRequest> {
    let mut request = None;
    let mut commands = Vec::new();

    egui::SidePanel::left("sandbox_panel")
        .exact_width(SIDE_PANEL_WIDTH)
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading("Sandbox");
            ui.label(match editor.mode() {
                Mode::Physics => "Mode: physics",
                Mode::Obstacle => "Mode: obstacle",
            });
            ui.separator();

            for (parameter, label, range) in [
                (Parameter::Mass, "Mass", 1.0..=1000.0),
                (Parameter::Stiffness, "Stiffness", 0.0..=1000.0),
                (Parameter::RestLength, "Rest length", 1.0..=500.0),
                (Parameter::Damping, "Damping", 0.0..=100.0),
            ] {
                let mut value = editor.parameter_value(world, parameter);
                if ui
                    .add(egui::Slider::new(&mut value, range).text(label))
                    .changed()
                {
                    commands.push(Command::SetParameter(parameter, value));
                }
            }
            ui.separator();

            ui.horizontal(|ui| {
                if ui.button(if world.is_paused() { "Play" } else { "Pause" }).clicked() {
                    commands.push(Command::TogglePause);
                }
                if ui.button("Step").clicked() {
                    commands.push(Command::SingleStep);
                }
            });
            ui.horizontal(|ui| {
                if ui.button("Mode").clicked() {
                    commands.push(Command::ToggleMode);
                }
                if ui.button("Pin").clicked() {
                    commands.push(Command::TogglePin);
                }
                if ui.button("Reset").clicked() {
                    commands.push(Command::Reset);
                }
            });
            let mut gravity = world.gravity_enabled();
            if ui.checkbox(&mut gravity, "Gravity").changed() {
                commands.push(Command::ToggleGravity);
            }
            if ui.button("Menu").clicked() {
                request = Some(SceneRequest::Menu);
            }
            ui.separator();

            ui.label(format!(
                "{} points, {} springs, {} obstacles",
                world.point_count(),
                world.spring_count(),
                world.obstacle_count()
            ));
            ui.label(format!("KE {:.1}  PE {:.1}", world.kinetic_energy(), world.potential_energy()));
            ui.separator();
            ui.small("Right click: add point / finish polygon");
            ui.small("Click: select, connect, draw");
            ui.small("Ctrl+click: multi-select");
            ui.small("Hold and move: drag");
            ui.small("Tab mode, Space pause, Right step");
            ui.small("Del delete, Esc cancel, P pin");
            ui.small("R reset, G gravity");
        });

    let typing = ctx.wants_keyboard_input();
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
            let rect = response.rect;

            commands.extend(canvas_commands(ctx, rect, typing));
            for command in commands.drain(..) {
                editor.handle(world, command);
            }

            world.set_bounds(Vec2::new(rect.width(), rect.height()));
            let dt = ctx.input(|i| i.stable_dt);
            world.update(dt);

            paint_world(&painter, rect, world);
            paint_pending(&painter, rect, editor.pending_vertices());
        });

    request
}

/// Translate this frame's raw events into editor commands.
///
/// Presses outside the canvas are left to the panels; releases are always
/// forwarded so a drag that leaves the canvas still ends.
fn canvas_commands(ctx: &egui::Context, rect: Rect, typing: bool) -> Vec<Command> {
    ctx.input(|i| {
        let at = Duration::from_secs_f64(i.time.max(0.0));
        let mut commands = Vec::new();
        for event in &i.events {
            match event {
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    modifiers,
                } => match (*button, *pressed) {
                    (egui::PointerButton::Primary, true) if rect.contains(*pos) => {
                        commands.push(Command::LeftPressed {
                            pos: to_world(rect, *pos),
                            ctrl: modifiers.ctrl || modifiers.command,
                            at,
                        });
                    }
                    (egui::PointerButton::Primary, false) => {
                        commands.push(Command::LeftReleased { at });
                    }
                    (egui::PointerButton::Secondary, true) if rect.contains(*pos) => {
                        commands.push(Command::RightClick {
                            pos: to_world(rect, *pos),
                        });
                    }
                    _ => {}
                },
                egui::Event::PointerMoved(pos) => {
                    commands.push(Command::PointerMoved {
                        pos: to_world(rect, *pos),
                        at,
                    });
                }
                egui::Event::Key {
                    key,
                    pressed: true,
                    repeat: false,
                    ..
                } if !typing => {
                    if let Some(command) = key_command(*key) {
                        commands.push(command);
                    }
                }
                _ => {}
            }
        }
        commands
    })
}

fn key_command(key: egui::Key) -> Option<Command> {
    let command = match key {
        egui::Key::Escape => Command::Escape,
        egui::Key::Delete | egui::Key::Backspace => Command::Delete,
        egui::Key::Tab => Command::ToggleMode,
        egui::Key::Space => Command::TogglePause,
        egui::Key::ArrowRight => Command::SingleStep,
        egui::Key::R => Command::Reset,
        egui::Key::G => Command::ToggleGravity,
        egui::Key::P => Command::TogglePin,
        _ => return None,
    };
    Some(command)
}

fn to_world(rect: Rect, pos: Pos2) -> Vec2 {
    Vec2::new(pos.x - rect.min.x, pos.y - rect.min.y)
}

fn to_screen(rect: Rect, v: Vec2) -> Pos2 {
    rect.min + egui::vec2(v.x, v.y)
}

fn paint_world(painter: &egui::Painter, rect: Rect, world: &World) {
    painter.rect_filled(rect, 0.0, BACKGROUND);

    for (_, obstacle) in world.obstacles() {
        let points: Vec<Pos2> = obstacle
            .vertices()
            .iter()
            .map(|v| to_screen(rect, *v))
            .collect();
        let color = if obstacle.selected { SELECTED } else { OBSTACLE };
        painter.add(Shape::closed_line(points, Stroke::new(2.0, color)));
    }

    for (_, spring, a, b) in world.spring_segments() {
        let stroke = if spring.selected {
            Stroke::new(3.0, SELECTED)
        } else {
            Stroke::new(1.5, SPRING)
        };
        painter.line_segment([to_screen(rect, a), to_screen(rect, b)], stroke);
    }

    for (_, point) in world.mass_points() {
        let center = to_screen(rect, point.position);
        let color = if point.selected { SELECTED } else { POINT };
        painter.circle_filled(center, point.radius, color);
        if point.pinned {
            painter.circle_stroke(center, point.radius + 2.0, Stroke::new(1.0, Color32::WHITE));
        }
    }
}

fn paint_pending(painter: &egui::Painter, rect: Rect, vertices: &[Vec2]) {
    let stroke = Stroke::new(1.5, PENDING);
    for pair in vertices.windows(2) {
        painter.line_segment([to_screen(rect, pair[0]), to_screen(rect, pair[1])], stroke);
    }
    for v in vertices {
        painter.circle_filled(to_screen(rect, *v), 3.0, PENDING);
    }
}
