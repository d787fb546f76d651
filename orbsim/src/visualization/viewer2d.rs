use bevy::math::primitives::Circle;
use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};

use crate::configuration::config::ScenarioConfig;
use crate::simulation::energy::{EnergyReport, EnergySink};
use crate::simulation::simulator::Simulator;

#[derive(Component)]
struct BodyIndex(pub usize);

#[derive(Component)]
struct EnergyText;

/// Half-width of the displayed scene in metres
pub const EXTENT: f64 = 1.0e7;
/// Display radii used when the scenario does not give one (metres)
pub const DEFAULT_RADII: [f64; 2] = [7.0e5, 3.0e5];

const HALF_SCREEN: f32 = 320.0;
const SCALE: f32 = HALF_SCREEN / EXTENT as f32; // pixels per metre
const FONT_SIZE: f32 = 18.0;

/// Energy reports received by the viewer, newest last
#[derive(Resource, Default)]
pub struct EnergyLog {
    pub reports: Vec<EnergyReport>,
}

impl EnergySink for EnergyLog {
    fn report(&mut self, report: &EnergyReport) {
        info!("{report} (t = {} s)", report.elapsed_time);
        self.reports.push(*report);
    }
}

#[derive(Resource)]
struct DisplayRadii([f64; 2]);

/// Per-body display radius, falling back to [`DEFAULT_RADII`]
pub fn display_radii(cfg: &ScenarioConfig) -> [f64; 2] {
    let mut radii = DEFAULT_RADII;
    for (r, body) in radii.iter_mut().zip(&cfg.bodies) {
        if let Some(radius) = body.radius {
            *r = radius;
        }
    }
    radii
}

fn body_color(i: usize) -> Color {
    match i {
        0 => Color::srgb(1.0, 0.0, 0.0),
        _ => Color::srgb(1.0, 0.65, 0.0),
    }
}

pub fn run_2d(simulator: Simulator, radii: [f64; 2]) -> AppExit {
    println!(
        "run_2d: starting Bevy 2D viewer for {} ticks of {} s",
        simulator.parameters().iteration_count, simulator.parameters().time_step
    );

    App::new()
        .insert_resource(simulator)
        .insert_resource(DisplayRadii(radii))
        .init_resource::<EnergyLog>()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "orbsim".into(),
                ..default()
            }),
            ..default()
        }))
        .add_systems(Startup, (setup_bodies_system, setup_overlay_system))
        .add_systems(Update, (physics_step_system, sync_transforms_system, energy_text_system).chain())
        .run()
}

fn setup_bodies_system(
    mut commands: Commands,
    simulator: Res<Simulator>,
    radii: Res<DisplayRadii>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    commands.spawn(Camera2dBundle::default());

    for (i, body) in simulator.bodies().iter().enumerate() {
        let radius_screen = (radii.0[i] as f32 * SCALE).max(1.0);
        let x = body.x.x as f32 * SCALE;
        let y = body.x.y as f32 * SCALE;

        commands.spawn((
            MaterialMesh2dBundle {
                mesh: Mesh2dHandle(meshes.add(Circle::new(radius_screen))),
                material: materials.add(ColorMaterial::from(body_color(i))),
                transform: Transform::from_xyz(x, y, i as f32),
                ..default()
            },
            BodyIndex(i),
        ));
    }
}

fn setup_overlay_system(mut commands: Commands, simulator: Res<Simulator>) {
    let style = |color: Color| TextStyle {
        font_size: FONT_SIZE,
        color,
        ..default()
    };
    let anchored = |top: Option<f32>, left: Option<f32>, right: Option<f32>, bottom: Option<f32>| Style {
        position_type: PositionType::Absolute,
        top: top.map_or(Val::Auto, Val::Px),
        left: left.map_or(Val::Auto, Val::Px),
        right: right.map_or(Val::Auto, Val::Px),
        bottom: bottom.map_or(Val::Auto, Val::Px),
        ..default()
    };

    commands.spawn((
        TextBundle::from_section("", style(Color::WHITE)).with_style(anchored(Some(10.0), Some(10.0), None, None)),
        EnergyText,
    ));

    // Legend
    let sections = simulator
        .bodies()
        .iter()
        .enumerate()
        .map(|(i, b)| TextSection::new(format!("- {}\n", b.name), style(body_color(i))));
    commands.spawn(TextBundle::from_sections(sections).with_style(anchored(Some(10.0), None, Some(10.0), None)));

    // Axis captions
    let grey = Color::srgb(0.7, 0.7, 0.7);
    commands.spawn(
        TextBundle::from_section(format!("X-Coordinate (+/-{:e} m)", EXTENT), style(grey))
            .with_style(anchored(None, None, Some(10.0), Some(10.0))),
    );
    commands.spawn(
        TextBundle::from_section(format!("Y-Coordinate (+/-{:e} m)", EXTENT), style(grey))
            .with_style(anchored(None, Some(10.0), None, Some(10.0))),
    );
}

fn physics_step_system(mut simulator: ResMut<Simulator>, mut log: ResMut<EnergyLog>, mut exit: EventWriter<AppExit>) {
    if simulator.is_finished() {
        return;
    }

    match simulator.step(&mut *log) {
        Ok(_) if simulator.is_finished() => info!("run complete after {} ticks", simulator.tick()),
        Ok(_) => {}
        Err(err) => {
            error!("simulation aborted: {err}");
            exit.send(AppExit::error());
        }
    }
}

fn sync_transforms_system(simulator: Res<Simulator>, mut query: Query<(&BodyIndex, &mut Transform)>) {
    let positions = simulator.positions();
    for (BodyIndex(i), mut transform) in &mut query {
        if let Some(x) = positions.get(*i) {
            transform.translation.x = (x.x as f32) * SCALE;
            transform.translation.y = (x.y as f32) * SCALE;
        }
    }
}

fn energy_text_system(simulator: Res<Simulator>, log: Res<EnergyLog>, mut query: Query<&mut Text, With<EnergyText>>) {
    let latest = log.reports.last().map_or_else(String::new, |r| format!("{r} at t = {} s", r.elapsed_time));
    for mut text in &mut query {
        text.sections[0].value = format!(
            "tick {}/{}\n{}",
            simulator.tick(),
            simulator.parameters().iteration_count,
            latest
        );
    }
}
