use std::path::{Path, PathBuf};

use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_egui::{egui, EguiContexts, EguiPlugin, EguiPrimaryContextPass};

use crate::configuration::config::WindowConfig;
use crate::persistence::scene::TextSceneFile;
use crate::simulation::engine::SimulationController;
use crate::simulation::params::{MAX_SPEED, MIN_SPEED};
use crate::visualization::timer::TimerScheduler;
use crate::visualization::viewport::FrameRenderer;

/// Controller wired to the Bevy frame loop and to text scene files
pub type ViewerController = SimulationController<FrameRenderer, TimerScheduler, TextSceneFile>;

/// The single simulation owned by the app; every system reaches it through `ResMut`
#[derive(Resource)]
pub struct Simulation(pub ViewerController);

#[derive(Component)]
struct BodyIndex(pub usize);

/// Text fields and status line of the bottom control bar
#[derive(Resource)]
struct ControlPanel {
    scene_path: String,
    time_step: String,
    speed: u32,
    status: String,
    initial_scene: Option<PathBuf>,
}

const MIN_SCREEN_RADIUS: f32 = 1.0;
// keeps a long frame from stalling the window
const MAX_TICKS_PER_FRAME: u64 = 100;

pub fn run_2d(controller: ViewerController, window: WindowConfig, scene: Option<PathBuf>) {
    println!("run_2d: starting Bevy 2D viewer with {}x{} canvas", window.width, window.height);

    let panel = ControlPanel {
        scene_path: scene
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        time_step: controller.parameters().time_step().to_string(),
        speed: controller.parameters().speed(),
        status: String::new(),
        initial_scene: scene,
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Solar system".into(),
                resolution: WindowResolution::new(window.width, window.height),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(Simulation(controller))
        .insert_resource(panel)
        .add_systems(Startup, (setup_camera, load_initial_scene))
        .add_systems(EguiPrimaryContextPass, ui_controls)
        .add_systems(Update, (drive_ticks, respawn_bodies, sync_transforms).chain())
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn load_initial_scene(mut sim: ResMut<Simulation>, mut panel: ResMut<ControlPanel>) {
    let Some(path) = panel.initial_scene.take() else {
        return;
    };
    panel.status = load_report(&mut sim.0, &path);
}

/// Load `path` into the controller and describe the result for the status line
fn load_report(controller: &mut ViewerController, path: &Path) -> String {
    match controller.load(path) {
        Ok(warnings) if warnings.is_empty() => {
            format!("{} bodies loaded", controller.bodies().len())
        }
        Ok(warnings) => format!(
            "{} bodies loaded, {} lines skipped (first: {})",
            controller.bodies().len(),
            warnings.len(),
            warnings[0]
        ),
        Err(e) => {
            error!("cannot load {}: {e}", path.display());
            format!("load failed: {e}")
        }
    }
}

/// Fires every pending tick whose delay elapsed during the last frame
fn drive_ticks(time: Res<Time>, mut sim: ResMut<Simulation>, mut panel: ResMut<ControlPanel>) {
    if let Err(e) = sim.0.advance_frame(time.delta(), MAX_TICKS_PER_FRAME) {
        panel.status = format!("simulation stopped: {e}");
    }
}

/// Rebuild one circle per body after the scene was replaced
fn respawn_bodies(
    mut commands: Commands,
    mut sim: ResMut<Simulation>,
    existing: Query<Entity, With<BodyIndex>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    if !sim.0.renderer_mut().take_respawn() {
        return;
    }

    for entity in &existing {
        commands.entity(entity).despawn();
    }

    let viewport = sim.0.renderer().viewport;
    for (i, body) in sim.0.bodies().iter().enumerate() {
        let pos = viewport.to_screen(body.x);
        let radius_screen = (body.radius as f32).max(MIN_SCREEN_RADIUS);

        commands.spawn((
            Mesh2d(meshes.add(Circle::new(radius_screen))),
            MeshMaterial2d(materials.add(ColorMaterial::from(body_color(&body.color)))),
            Transform::from_xyz(pos.x, pos.y, 0.0),
            BodyIndex(i),
        ));
    }
}

fn sync_transforms(
    mut sim: ResMut<Simulation>,
    mut query: Query<(&BodyIndex, &mut Transform, &mut Visibility)>,
) {
    if !sim.0.renderer_mut().take_dirty() {
        return;
    }

    let viewport = sim.0.renderer().viewport;
    for (BodyIndex(i), mut transform, mut visibility) in &mut query {
        if let Some(b) = sim.0.bodies().get(*i) {
            let pos = viewport.to_screen(b.x);
            transform.translation.x = pos.x;
            transform.translation.y = pos.y;

            *visibility = if viewport.is_off_screen(b.x, b.radius) {
                Visibility::Hidden
            } else {
                Visibility::Inherited
            };
        }
    }
}

fn ui_controls(
    mut contexts: EguiContexts,
    mut sim: ResMut<Simulation>,
    mut panel: ResMut<ControlPanel>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let label = if sim.0.is_running() { "Pause" } else { "Start" };
            if ui.button(label).clicked() {
                if sim.0.is_running() {
                    sim.0.stop();
                } else if let Err(e) = sim.0.start() {
                    panel.status = format!("simulation stopped: {e}");
                }
            }

            ui.label("time step");
            let entry = ui.add(egui::TextEdit::singleline(&mut panel.time_step).desired_width(70.0));
            if entry.lost_focus() {
                let current = sim.0.parameters().time_step();
                match panel.time_step.trim().parse::<f64>() {
                    Ok(dt) => match sim.0.set_time_step(dt) {
                        Ok(()) => panel.status.clear(),
                        Err(e) => {
                            panel.status = e.to_string();
                            panel.time_step = current.to_string();
                        }
                    },
                    Err(_) => {
                        panel.status = format!("'{}' is not a number", panel.time_step.trim());
                        panel.time_step = current.to_string();
                    }
                }
            }

            if ui
                .add(egui::Slider::new(&mut panel.speed, MIN_SPEED..=MAX_SPEED).text("speed"))
                .changed()
            {
                sim.0.set_speed(panel.speed);
            }

            ui.separator();
            ui.add(egui::TextEdit::singleline(&mut panel.scene_path).desired_width(180.0));
            if ui.button("Open file...").clicked() {
                let path = PathBuf::from(panel.scene_path.trim());
                panel.status = load_report(&mut sim.0, &path);
            }
            if ui.button("Save to file...").clicked() {
                let path = PathBuf::from(panel.scene_path.trim());
                panel.status = match sim.0.save(&path) {
                    Ok(()) => format!("saved {} bodies", sim.0.bodies().len()),
                    Err(e) => format!("save failed: {e}"),
                };
            }

            ui.separator();
            ui.label(sim.0.renderer().time_label());
        });

        if !panel.status.is_empty() {
            ui.label(panel.status.as_str());
        }
    });
}

/// Named colors used by scene files, or `#rrggbb`; anything else draws white
fn body_color(name: &str) -> Color {
    match name.to_ascii_lowercase().as_str() {
        "red" => Color::srgb(1.0, 0.0, 0.0),
        "orange" => Color::srgb(1.0, 0.65, 0.0),
        "yellow" => Color::srgb(1.0, 1.0, 0.0),
        "green" => Color::srgb(0.0, 0.8, 0.0),
        "cyan" => Color::srgb(0.0, 1.0, 1.0),
        "blue" => Color::srgb(0.2, 0.4, 1.0),
        "purple" | "magenta" => Color::srgb(0.8, 0.0, 0.8),
        "brown" => Color::srgb(0.6, 0.4, 0.2),
        "gray" | "grey" => Color::srgb(0.5, 0.5, 0.5),
        "white" => Color::WHITE,
        _ if name.starts_with('#') => Srgba::hex(name).map(Color::from).unwrap_or(Color::WHITE),
        _ => Color::WHITE,
    }
}
