//! Menu widgets, layouts and texts.
//!
//! Layouts are computed from the screen size so the same buttons work at
//! any resolution. Buttons carry the [`MenuAction`] they trigger; the
//! session maps actions to state transitions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::ScreenSize;

/// Title shown on the main menu.
pub const TITLE: &str = "POLYSAIL";

/// Credits screen text.
pub const CREDITS_TEXT: &str =
    "Designed and Developed by: Mytraya\n \nMade in Pygame\n \nSoundtrack created in Udio";

/// How-to-play screen text.
pub const HOW_TO_PLAY_TEXT: &str = "- Hold the left (or press Q) or right side (or press E)\n\
of the sail pad to trim the sails\n\
\n\
- Hold either side of the rudder pad to control the rudder (A and D)\n\
\n\
- Hold the left side of the reef pad (or press W) to unreef the sails,\n\
hold the right side (or press S) to reef them again\n\
\n\
- Dock at an island to bring up the menu\n\
\n\
- Seagulls can give away island and rock locations.";

/// Axis-aligned screen rectangle. Left and top edges are inside, right and
/// bottom edges are outside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True if the point is inside.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Horizontal centre.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Top-left corner.
    #[must_use]
    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// What a button does when clicked.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Generate a fresh world and start sailing
    NewGame,
    /// Restore the saved world
    LoadGame,
    /// Toggle the how-to-play screen
    HowToPlay,
    /// Toggle the credits screen
    Credits,
    /// Back to the main menu
    MainMenu,
    /// Leave the island (dock menu)
    SetSail,
    /// Write the world to disk (dock menu)
    Save,
    /// Quit or step back one level
    Exit,
}

/// Clickable menu button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Button {
    /// Caption
    pub label: &'static str,
    /// Action triggered on click
    pub action: MenuAction,
    /// Screen area
    pub rect: Rect,
}

impl Button {
    /// True if a click at `point` hits the button.
    #[must_use]
    pub fn is_clicked(&self, point: Vec2) -> bool {
        self.rect.contains(point)
    }
}

/// Returns the action of the first button hit by a click, if any.
#[must_use]
pub fn hit_test(buttons: &[Button], click: Vec2) -> Option<MenuAction> {
    buttons.iter().find(|b| b.is_clicked(click)).map(|b| b.action)
}

fn menu_cell(screen: ScreenSize) -> (f32, f32) {
    ((screen.width / 10.0).floor(), (screen.height / 20.0).floor())
}

/// The five stacked main-menu buttons.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn main_menu_buttons(screen: ScreenSize) -> Vec<Button> {
    let (cell_w, cell_h) = menu_cell(screen);
    [
        ("New Game", MenuAction::NewGame),
        ("Load Game", MenuAction::LoadGame),
        ("How to Play", MenuAction::HowToPlay),
        ("Credits", MenuAction::Credits),
        ("Exit", MenuAction::Exit),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (label, action))| Button {
        label,
        action,
        rect: Rect::new(
            (screen.width / 2.0).floor() - cell_w,
            (screen.height / 2.0).floor() + i as f32 * cell_h,
            cell_w * 2.0,
            (cell_h / 2.0).floor(),
        ),
    })
    .collect()
}

/// The single "Main Menu" button of the credits and how-to-play screens.
#[must_use]
pub fn info_screen_buttons(screen: ScreenSize) -> Vec<Button> {
    let (cell_w, cell_h) = menu_cell(screen);
    vec![Button {
        label: "Main Menu",
        action: MenuAction::MainMenu,
        rect: Rect::new(
            (screen.width / 2.0).floor() - cell_w,
            (screen.height / 1.2).floor(),
            cell_w * 2.0,
            (cell_h / 2.0).floor(),
        ),
    }]
}

/// Buttons shown while docked.
#[must_use]
pub fn dock_buttons(screen: ScreenSize) -> Vec<Button> {
    let width = (screen.width / 5.0).floor();
    let height = (screen.height / 35.0).floor();
    let row = (screen.height / 2.0).floor() + (screen.height / 5.0).floor();
    let right = (screen.width / 1.5).floor();
    vec![
        Button {
            label: "Set Sail",
            action: MenuAction::SetSail,
            rect: Rect::new((screen.width / 2.0).floor() - 100.0, row, width, height),
        },
        Button {
            label: "Save",
            action: MenuAction::Save,
            rect: Rect::new(right, row, width, height),
        },
        Button {
            label: "Exit",
            action: MenuAction::Exit,
            rect: Rect::new(
                right,
                (screen.height / 2.0).floor() + (screen.height / 4.0).floor(),
                width,
                height,
            ),
        },
    ]
}
