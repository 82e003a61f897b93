pub mod simulation;
pub mod persistence;
pub mod configuration;
pub mod visualization;

pub use simulation::states::{Body, BodyKind, System, NVec2};
pub use simulation::errors::SimError;
pub use simulation::params::{Parameters, GRAVITATIONAL_CONSTANT};
pub use simulation::forces::{ForceTerm, ForceSet, NewtonianGravity, compute_forces};
pub use simulation::integrator::{step, recalculate};
pub use simulation::engine::{SimulationController, Renderer, RunState, TickOutcome};
pub use simulation::scheduler::{Scheduler, ManualScheduler};

pub use persistence::scene::{read_scene, write_scene, LoadedScene, SceneError, SceneStore, TextSceneFile, UnknownKindWarning};

pub use configuration::config::{SimulatorConfig, ParametersConfig, WindowConfig};

pub use visualization::viewport::{Viewport, FrameRenderer, time_label};
pub use visualization::timer::TimerScheduler;
pub use visualization::solarsim_vis2d::{run_2d, Simulation, ViewerController};
