mod app;

use app::{SandboxApp, SceneRequest};
use clap::{Args, Parser, Subcommand, ValueEnum};
use eframe::egui;
use springbox_core::config::DEFAULT_GRAVITY;
use springbox_core::{build_world, run_headless, EditorConfig, PhysicsConfig, Scene, Vec2};

#[derive(Parser)]
#[command(name = "springbox")]
#[command(about = "Springbox - an interactive mass-spring soft body sandbox", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive window
    Run {
        /// Scene shown at startup
        #[arg(long, value_enum, default_value_t = StartScene::Menu)]
        scene: StartScene,
        #[command(flatten)]
        physics: PhysicsArgs,
        #[command(flatten)]
        editor: EditorArgs,
    },
    /// Step a scene without a window and print the final state
    Simulate {
        #[arg(long, value_enum, default_value_t = HeadlessScene::Demo)]
        scene: HeadlessScene,
        /// Number of fixed steps to run
        #[arg(long, default_value_t = 600)]
        steps: usize,
        /// Step length in seconds
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,
        #[command(flatten)]
        physics: PhysicsArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StartScene {
    Menu,
    Simulation,
    Sandbox,
}

#[derive(Clone, Copy, ValueEnum)]
enum HeadlessScene {
    Empty,
    Demo,
}

#[derive(Args)]
struct PhysicsArgs {
    /// Window width in pixels
    #[arg(long, default_value_t = 800.0)]
    width: f32,
    /// Window height in pixels
    #[arg(long, default_value_t = 600.0)]
    height: f32,
    /// Downward gravity in pixels per second squared
    #[arg(long, default_value_t = DEFAULT_GRAVITY)]
    gravity: f32,
    /// Largest step length a single frame may take
    #[arg(long, default_value_t = 1.0 / 15.0)]
    max_dt: f32,
    /// Velocity scale after an obstacle bounce
    #[arg(long, default_value_t = 1.0)]
    bounciness: f32,
    /// Let mass points collide with each other
    #[arg(long)]
    point_collisions: bool,
}

impl PhysicsArgs {
    fn to_config(&self) -> Result<PhysicsConfig, Box<dyn std::error::Error>> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(format!("window size must be positive, got {}x{}", self.width, self.height).into());
        }
        if !(self.max_dt.is_finite() && self.max_dt > 0.0) {
            return Err(format!("--max-dt must be positive, got {}", self.max_dt).into());
        }
        Ok(PhysicsConfig::new()
            .with_bounds(Vec2::new(self.width, self.height))
            .with_gravity(Vec2::new(0.0, self.gravity))
            .with_max_dt(self.max_dt)
            .with_bounciness(self.bounciness)
            .with_point_collisions(self.point_collisions))
    }
}

#[derive(Args)]
struct EditorArgs {
    /// Mass of newly created points
    #[arg(long, default_value_t = 100.0)]
    mass: f32,
    /// Stiffness of newly created springs
    #[arg(long, default_value_t = 100.0)]
    stiffness: f32,
    /// Damping of newly created springs
    #[arg(long, default_value_t = 10.0)]
    damping: f32,
    /// Rest length of newly created springs
    #[arg(long, default_value_t = 50.0)]
    rest_length: f32,
}

impl EditorArgs {
    fn to_config(&self) -> Result<EditorConfig, Box<dyn std::error::Error>> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(format!("--mass must be positive, got {}", self.mass).into());
        }
        if !(self.rest_length.is_finite() && self.rest_length > 0.0) {
            return Err(format!("--rest-length must be positive, got {}", self.rest_length).into());
        }
        if self.stiffness < 0.0 || self.damping < 0.0 {
            return Err("--stiffness and --damping must not be negative".into());
        }
        Ok(EditorConfig::new()
            .with_mass(self.mass)
            .with_stiffness(self.stiffness)
            .with_damping(self.damping)
            .with_rest_length(self.rest_length))
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            scene,
            physics,
            editor,
        } => run_window(scene, &physics, &editor),
        Commands::Simulate {
            scene,
            steps,
            dt,
            physics,
        } => run_simulation(scene, steps, dt, &physics),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_window(
    scene: StartScene,
    physics: &PhysicsArgs,
    editor: &EditorArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let physics = physics.to_config()?;
    let editor = editor.to_config()?;
    let start = match scene {
        StartScene::Menu => SceneRequest::Menu,
        StartScene::Simulation => SceneRequest::Simulation,
        StartScene::Sandbox => SceneRequest::Sandbox,
    };

    // The side panel takes part of the window; the canvas gets the rest
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([physics.bounds.x + app::SIDE_PANEL_WIDTH, physics.bounds.y + 40.0])
            .with_title("Springbox"),
        ..Default::default()
    };

    eframe::run_native(
        "Springbox",
        options,
        Box::new(move |cc| Ok(Box::new(SandboxApp::new(physics, editor, start, cc)))),
    )?;
    Ok(())
}

fn run_simulation(
    scene: HeadlessScene,
    steps: usize,
    dt: f32,
    physics: &PhysicsArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(format!("--dt must be positive, got {dt}").into());
    }
    let scene = match scene {
        HeadlessScene::Empty => Scene::Empty,
        HeadlessScene::Demo => Scene::Demo,
    };
    let mut world = build_world(scene, physics.to_config()?)?;
    let report = run_headless(&mut world, steps, dt);

    println!("steps = {}", report.steps);
    match report.centroid {
        Some(c) => println!("centroid = ({:.3}, {:.3})", c.x, c.y),
        None => println!("centroid = none"),
    }
    println!("kinetic_energy = {:.3}", report.kinetic_energy);
    println!("potential_energy = {:.3}", report.potential_energy);
    for (i, p) in report.positions.iter().enumerate() {
        println!("point[{i}] = ({:.3}, {:.3})", p.x, p.y);
    }

    Ok(())
}
