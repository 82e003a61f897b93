//! Physical -> screen mapping and the frame state read by the 2D viewer
//!
//! Screen coordinates are Bevy 2D world units: origin at the window centre,
//! y pointing up, one unit per logical pixel.

use bevy::log::{info, warn};
use bevy::math::Vec2;

use crate::simulation::engine::Renderer;
use crate::simulation::errors::SimError;
use crate::simulation::states::{NVec2, System};

/// Fraction of the smaller window side the outermost body is placed at
const FILL_FRACTION: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64, // window width in pixels
    pub height: f64, // window height in pixels
    pub scale_factor: f64, // pixels per metre
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: f64::from(width),
            height: f64::from(height),
            scale_factor: 1.0,
        }
    }

    /// Fit the scene so its outermost body sits at 40% of the smaller
    /// window side. A scene whose extent is zero keeps the current scale.
    pub fn fit(&mut self, system: &System) -> Result<f64, SimError> {
        let extent = system.extent()?;
        if extent > 0.0 {
            self.scale_factor = FILL_FRACTION * self.width.min(self.height) / extent;
        }
        Ok(self.scale_factor)
    }

    pub fn to_screen(&self, p: NVec2) -> Vec2 {
        Vec2::new((p.x * self.scale_factor) as f32, (p.y * self.scale_factor) as f32)
    }

    /// True when a disc of `radius` pixels at `p` lies fully outside the window
    pub fn is_off_screen(&self, p: NVec2, radius: f64) -> bool {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        let x = p.x * self.scale_factor;
        let y = p.y * self.scale_factor;
        x + radius < -half_w || x - radius > half_w || y + radius < -half_h || y - radius > half_h
    }
}

pub fn time_label(t: f64) -> String {
    format!("{t:.1} seconds gone")
}

/// Renderer used by the viewer. Records what changed since the last frame;
/// the Bevy systems consume the flags and move the sprites.
#[derive(Debug, Clone)]
pub struct FrameRenderer {
    pub viewport: Viewport,
    time_label: String,
    respawn: bool, // body list replaced
    dirty: bool, // positions changed
}

impl FrameRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            time_label: time_label(0.0),
            respawn: false,
            dirty: false,
        }
    }

    pub fn time_label(&self) -> &str {
        &self.time_label
    }

    pub fn take_respawn(&mut self) -> bool {
        std::mem::take(&mut self.respawn)
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl Renderer for FrameRenderer {
    fn scene_loaded(&mut self, system: &System) {
        match self.viewport.fit(system) {
            Ok(scale) => info!("Scale factor: {scale}"),
            Err(e) => warn!("{e}, keeping scale factor {}", self.viewport.scale_factor),
        }
        self.time_label = time_label(system.t);
        self.respawn = true;
        self.dirty = true;
    }

    fn redraw(&mut self, system: &System) {
        self.time_label = time_label(system.t);
        self.dirty = true;
    }
}
