//! Contract between the simulation and the rendering collaborator.
//!
//! The core never touches pixels. During a draw pass it hands the renderer,
//! through the [`Canvas`] trait, a camera-relative offset and a [`Shape`] for
//! every entity that survived culling, plus menu widgets and text. The
//! renderer owns everything else, including the [`LabelCache`] of island
//! names, which is keyed by island id rather than stored on the island.
//!
//! [`DrawList`] is a recording canvas used by the headless driver, the
//! benchmarks and the tests.

use std::collections::HashMap;

use glam::Vec2;

use crate::config::{Color, Palette};
use crate::entity::boat::Boat;
use crate::entity::names::display_name;
use crate::entity::obstacle::Island;
use crate::entity::{EntityId, EntityTag, WorldObject};
use crate::menu::{Button, Rect};
use crate::wind::Wind;

// =============================================================================
// Shapes
// =============================================================================

/// One blob of a pre-rendered cloud, relative to the cloud centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Puff {
    /// Offset from the cloud centre
    pub offset: Vec2,
    /// Puff radius
    pub radius: f32,
    /// Puff opacity
    pub alpha: u8,
}

/// What to draw at an entity's offset.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape<'a> {
    /// Filled circle (islands, rocks, wakes)
    Circle {
        /// Radius in pixels
        radius: f32,
        /// Fill colour
        color: Color,
    },
    /// Boat hull: a triangle pointing along a compass heading
    Hull {
        /// Distance from centre to bow
        size: f32,
        /// Compass heading in degrees
        heading: f32,
        /// Fill colour
        color: Color,
    },
    /// Cloud made of overlapping translucent circles
    Puffs {
        /// The blobs, fixed at cloud creation
        puffs: &'a [Puff],
        /// Base colour, alpha comes from each puff
        color: Color,
    },
    /// Two wing strokes meeting at the centre
    Gull {
        /// Wing length
        span: f32,
        /// Current flap deflection in degrees
        flap_angle: f32,
        /// Stroke colour
        color: Color,
    },
}

/// Vertices of a hull of `size` pointing along compass `heading`, relative
/// to its centre: bow, port quarter, starboard quarter.
#[must_use]
pub fn hull_vertices(size: f32, heading: f32) -> [Vec2; 3] {
    let rotation = Vec2::from_angle(heading.to_radians());
    [
        Vec2::new(0.0, -size),
        Vec2::new(-size / 2.0, size / 2.0),
        Vec2::new(size / 2.0, size / 2.0),
    ]
    .map(|v| rotation.rotate(v))
}

/// Tips of the left and right wing relative to the gull centre.
#[must_use]
pub fn wing_tips(span: f32, flap_angle: f32) -> (Vec2, Vec2) {
    let rad = (30.0 + flap_angle).to_radians();
    let (dx, dy) = (span * rad.cos(), span * rad.sin());
    (Vec2::new(-dx, -dy), Vec2::new(dx, -dy))
}

// =============================================================================
// Canvas
// =============================================================================

/// Island name badge shown while docked.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Display text
    pub text: String,
    /// Text colour
    pub foreground: Color,
    /// Badge colour
    pub background: Color,
}

/// Drawing surface implemented by the rendering collaborator.
///
/// Only [`Canvas::draw`] is required; widget and text hooks default to
/// no-ops so a minimal renderer can ignore them.
pub trait Canvas {
    /// Fills the whole frame.
    fn clear(&mut self, _color: Color) {}

    /// Draws an entity shape centred at a camera-relative offset.
    fn draw(&mut self, tag: EntityTag, offset: Vec2, shape: &Shape<'_>);

    /// Draws a pre-rendered label centred horizontally on `at.x`, top edge
    /// at `at.y`.
    fn draw_label(&mut self, _at: Vec2, _label: &Label) {}

    /// Draws a menu button.
    fn draw_button(&mut self, _button: &Button, _color: Color) {}

    /// Draws a line of text with its top-left corner at `at`.
    fn draw_text(&mut self, _at: Vec2, _text: &str) {}

    /// Draws the wind rose centred at `center`.
    fn draw_wind_rose(&mut self, _center: Vec2, _size: f32, _rose: &WindRose) {}
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Frame clear
    Clear(Color),
    /// Entity shape
    Entity {
        /// Kind of entity drawn
        tag: EntityTag,
        /// Camera-relative offset
        offset: Vec2,
    },
    /// Island label
    Label {
        /// Top-left corner
        at: Vec2,
        /// Label text
        text: String,
    },
    /// Menu button
    Button {
        /// Button caption
        label: &'static str,
        /// Screen rectangle
        rect: Rect,
    },
    /// Text line
    Text {
        /// Top-left corner
        at: Vec2,
        /// Text content
        text: String,
    },
    /// Wind rose widget
    WindRose {
        /// Widget centre
        center: Vec2,
        /// Widget data
        rose: WindRose,
    },
}

/// Canvas that records every call instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands in call order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of entity shapes of a kind.
    #[must_use]
    pub fn count(&self, tag: EntityTag) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Entity { tag: t, .. } if *t == tag))
            .count()
    }

    /// Captions of every recorded button.
    #[must_use]
    pub fn buttons(&self) -> Vec<&'static str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Button { label, .. } => Some(*label),
                _ => None,
            })
            .collect()
    }

    /// Every recorded text line and label.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } | DrawCommand::Label { text, .. } => {
                    Some(text.as_str())
                }
                _ => None,
            })
            .collect()
    }

    /// Number of recorded commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drops all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for DrawList {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw(&mut self, tag: EntityTag, offset: Vec2, _shape: &Shape<'_>) {
        self.commands.push(DrawCommand::Entity { tag, offset });
    }

    fn draw_label(&mut self, at: Vec2, label: &Label) {
        self.commands.push(DrawCommand::Label {
            at,
            text: label.text.clone(),
        });
    }

    fn draw_button(&mut self, button: &Button, _color: Color) {
        self.commands.push(DrawCommand::Button {
            label: button.label,
            rect: button.rect,
        });
    }

    fn draw_text(&mut self, at: Vec2, text: &str) {
        self.commands.push(DrawCommand::Text {
            at,
            text: text.to_owned(),
        });
    }

    fn draw_wind_rose(&mut self, center: Vec2, _size: f32, rose: &WindRose) {
        self.commands.push(DrawCommand::WindRose {
            center,
            rose: *rose,
        });
    }
}

// =============================================================================
// Label cache
// =============================================================================

/// Renderer-side cache of island name labels, keyed by island id.
#[derive(Debug, Clone, Default)]
pub struct LabelCache {
    labels: HashMap<EntityId, Label>,
}

impl LabelCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the label of an island, building it on first use.
    pub fn get_or_render(&mut self, island: &Island, palette: &Palette) -> &Label {
        self.labels.entry(island.id()).or_insert_with(|| Label {
            text: display_name(island.name()),
            foreground: palette.white,
            background: palette.blue,
        })
    }

    /// True if a label for the island is cached.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.labels.contains_key(&id)
    }

    /// Drops one label.
    pub fn invalidate(&mut self, id: EntityId) {
        self.labels.remove(&id);
    }

    /// Drops every label.
    pub fn clear(&mut self) {
        self.labels.clear();
    }

    /// Number of cached labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// =============================================================================
// HUD data
// =============================================================================

/// Text lines of the boat status panel.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn hud_lines(boat: &Boat) -> Vec<String> {
    let position = boat.position();
    vec![
        format!(
            "Position: ({}, {})",
            (position.x / 1000.0).ceil() as i32,
            (position.y / 1000.0).ceil() as i32
        ),
        format!("Direction: {}°", boat.orientation() as i32),
        format!("Speed: {:.1}", boat.speed() * 3.0),
        format!("Sail: {}°", boat.sail() as i32),
        format!("Rudder: {}°", boat.rudder() as i32),
        format!("Reef: {:.2}", boat.reef()),
    ]
}

/// Top-left corner of the first HUD line; later lines step down by
/// [`HUD_LINE_SPACING`].
pub const HUD_ORIGIN: Vec2 = Vec2::new(10.0, 10.0);

/// Vertical distance between HUD lines.
pub const HUD_LINE_SPACING: f32 = 20.0;

/// Screen position of the wind rose centre.
pub const WIND_ROSE_CENTER: Vec2 = Vec2::new(200.0, 150.0);

/// Radius of the wind rose.
pub const WIND_ROSE_SIZE: f32 = 30.0;

/// Data for the wind rose widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindRose {
    /// Compass direction the arrow points to
    pub direction: f32,
    /// Speed figure shown beside the rose
    pub display_speed: i32,
}

impl WindRose {
    /// Builds the widget data from the current wind.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_wind(wind: &Wind) -> Self {
        Self {
            direction: wind.direction(),
            display_speed: (wind.speed() * 1.5).round() as i32,
        }
    }

    /// Arrow tip relative to the rose centre for a rose of `size`.
    #[must_use]
    pub fn arrow_tip(&self, size: f32) -> Vec2 {
        crate::math::compass_forward(self.direction) * size * 1.5
    }
}
