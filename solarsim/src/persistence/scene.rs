//! Plain text scene files.
//!
//! One body per line, whitespace separated:
//!
//! ```text
//! # kind   radius color  mass      x       y   vx   vy
//! Star     30     yellow 1.989e30  0       0   0    0
//! Planet   5      blue   5.974e24  1.496e11 0  0    29783
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. The kind is matched
//! case-insensitively. A line with an unknown kind is dropped with a warning,
//! while a malformed number or a missing field fails the whole file.

use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use bevy::log::{info, warn};

use crate::simulation::errors::SimError;
use crate::simulation::states::{Body, BodyKind, NVec2};

/// Number of fields on a data line
const FIELD_COUNT: usize = 8;

#[derive(Debug)]
pub enum SceneError {
    Io(io::Error),
    /// Missing field or malformed number, `line` is 1-based
    Parse { line: usize, message: String },
    /// Well-formed line describing an impossible body
    InvalidBody { line: usize, source: SimError },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Io(e) => write!(f, "scene file i/o failed: {e}"),
            SceneError::Parse { line, message } => write!(f, "line {line}: {message}"),
            SceneError::InvalidBody { line, source } => write!(f, "line {line}: {source}"),
        }
    }
}

impl Error for SceneError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SceneError::Io(e) => Some(e),
            SceneError::Parse { .. } => None,
            SceneError::InvalidBody { source, .. } => Some(source),
        }
    }
}

impl From<io::Error> for SceneError {
    fn from(e: io::Error) -> Self {
        SceneError::Io(e)
    }
}

/// Recoverable diagnostic: a data line whose kind is not Star or Planet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKindWarning {
    pub line: usize,
    pub token: String,
}

impl fmt::Display for UnknownKindWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: unknown space object '{}', skipped", self.line, self.token)
    }
}

/// Result of reading a scene: the bodies plus any skipped lines
#[derive(Debug, Clone, Default)]
pub struct LoadedScene {
    pub bodies: Vec<Body>,
    pub warnings: Vec<UnknownKindWarning>,
}

enum Line {
    Body(Body),
    Unknown(String),
}

fn parse_number(token: Option<&str>, name: &str, line: usize) -> Result<f64, SceneError> {
    let token = token.ok_or_else(|| SceneError::Parse {
        line,
        message: format!("missing field '{name}', expected {FIELD_COUNT} fields"),
    })?;
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SceneError::Parse {
            line,
            message: format!("field '{name}' is not a finite number: '{token}'"),
        }),
    }
}

fn parse_line(text: &str, line: usize) -> Result<Line, SceneError> {
    let mut words = text.split_whitespace();

    // callers never pass blank lines
    let kind_token = words.next().unwrap_or_default();
    let kind = match kind_token.parse::<BodyKind>() {
        Ok(kind) => kind,
        Err(token) => return Ok(Line::Unknown(token)),
    };

    let radius = parse_number(words.next(), "radius", line)?;
    let color = words.next().ok_or_else(|| SceneError::Parse {
        line,
        message: format!("missing field 'color', expected {FIELD_COUNT} fields"),
    })?;
    let m = parse_number(words.next(), "mass", line)?;
    let x = parse_number(words.next(), "x", line)?;
    let y = parse_number(words.next(), "y", line)?;
    let vx = parse_number(words.next(), "vx", line)?;
    let vy = parse_number(words.next(), "vy", line)?;

    let body = Body::new(kind, radius, color, m, NVec2::new(x, y), NVec2::new(vx, vy))
        .map_err(|source| SceneError::InvalidBody { line, source })?;
    Ok(Line::Body(body))
}

/// Read a whole scene. Stops at the first malformed line; nothing partial
/// is returned in that case.
pub fn read_scene<R: BufRead>(reader: R) -> Result<LoadedScene, SceneError> {
    let mut scene = LoadedScene::default();

    for (index, text) in reader.lines().enumerate() {
        let text = text?;
        let line = index + 1;
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_line(trimmed, line)? {
            Line::Body(body) => scene.bodies.push(body),
            Line::Unknown(token) => {
                let warning = UnknownKindWarning { line, token };
                warn!("{warning}");
                scene.warnings.push(warning);
            }
        }
    }

    Ok(scene)
}

/// Write one line per body. Floats use the shortest form that reads back
/// to the same value.
pub fn write_scene<W: Write>(mut writer: W, bodies: &[Body]) -> io::Result<()> {
    for b in bodies {
        writeln!(
            writer,
            "{} {} {} {} {} {} {} {}",
            b.kind, b.radius, b.color, b.m, b.x.x, b.x.y, b.v.x, b.v.y
        )?;
    }
    writer.flush()
}

/// Where scenes are loaded from and saved to
pub trait SceneStore {
    fn load(&self, path: &Path) -> Result<LoadedScene, SceneError>;
    fn save(&self, path: &Path, bodies: &[Body]) -> Result<(), SceneError>;
}

/// Scene store backed by text files on disk
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSceneFile;

impl SceneStore for TextSceneFile {
    fn load(&self, path: &Path) -> Result<LoadedScene, SceneError> {
        let file = File::open(path)?;
        let scene = read_scene(BufReader::new(file))?;
        info!(
            "loaded {} bodies from {} ({} skipped)",
            scene.bodies.len(),
            path.display(),
            scene.warnings.len()
        );
        Ok(scene)
    }

    fn save(&self, path: &Path, bodies: &[Body]) -> Result<(), SceneError> {
        let file = File::create(path)?;
        write_scene(BufWriter::new(file), bodies)?;
        info!("saved {} bodies to {}", bodies.len(), path.display());
        Ok(())
    }
}
