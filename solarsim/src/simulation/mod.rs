pub mod states;
pub mod params;
pub mod errors;
pub mod engine;
pub mod forces;
pub mod integrator;
pub mod scheduler;
