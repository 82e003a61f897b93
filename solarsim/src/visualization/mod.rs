pub mod viewport;
pub mod timer;
pub mod solarsim_vis2d;
