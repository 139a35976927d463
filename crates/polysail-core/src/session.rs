//! Top-level game session: screens, menus and the frame loop.
//!
//! A [`Session`] is what the platform layer drives. Each frame it receives
//! an [`InputSnapshot`], the millisecond clock and the frame delta, and a
//! [`Canvas`] to draw into. Screen changes go through [`transition`], a
//! pure function of the current [`GameState`] and a [`MenuAction`]:
//!
//! ```text
//!            NewGame / LoadGame
//! MainMenu ─────────────────────▶ Playing
//!    ▲  │                            │
//!    │  │ HowToPlay / Credits        │ Exit
//!    │  ▼                            │
//!  HowToPlay / Credits ◀─────────────┘ (back to MainMenu)
//!    │
//!    └── Exit from MainMenu ─▶ Exit
//! ```
//!
//! Escape behaves like the Exit button: one level back, quitting from the
//! main menu.

use std::path::{Path, PathBuf};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::config::SimConfig;
use crate::input::{ControlPads, InputSnapshot};
use crate::menu::{
    dock_buttons, hit_test, info_screen_buttons, main_menu_buttons, Button, MenuAction,
    CREDITS_TEXT, HOW_TO_PLAY_TEXT, TITLE,
};
use crate::persistence::{PersistenceError, SaveData};
use crate::playlist::{Playlist, DEFAULT_TRACKS};
use crate::render::{
    hud_lines, Canvas, LabelCache, WindRose, HUD_LINE_SPACING, HUD_ORIGIN, WIND_ROSE_CENTER,
    WIND_ROSE_SIZE,
};
use crate::resolver::{Contact, SimEvent};
use crate::world::{DrawStats, MenuBackdrop, World};

/// Line height used for menu text blocks.
const MENU_LINE_SPACING: f32 = 30.0;

/// Gap between a control pad and its caption.
const PAD_CAPTION_GAP: f32 = 20.0;

/// Screen the session is showing.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Title screen with the main buttons
    #[default]
    MainMenu,
    /// Sailing (or docked) in a world
    Playing,
    /// Instructions screen
    HowToPlay,
    /// Credits screen
    Credits,
    /// The session has ended
    Exit,
}

/// Next state after `action` in `state`.
///
/// Save and Set Sail never change the screen. Load failures are handled by
/// the session, which falls back to the main menu.
#[must_use]
pub fn transition(state: GameState, action: MenuAction) -> GameState {
    match (state, action) {
        (GameState::Exit, _) => GameState::Exit,
        (_, MenuAction::NewGame | MenuAction::LoadGame) => GameState::Playing,
        (GameState::HowToPlay, MenuAction::HowToPlay)
        | (GameState::Credits, MenuAction::Credits)
        | (_, MenuAction::MainMenu) => GameState::MainMenu,
        (_, MenuAction::HowToPlay) => GameState::HowToPlay,
        (_, MenuAction::Credits) => GameState::Credits,
        (GameState::MainMenu, MenuAction::Exit) => GameState::Exit,
        (_, MenuAction::Exit) => GameState::MainMenu,
        (state, MenuAction::SetSail | MenuAction::Save) => state,
    }
}

/// Summary of one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// State after the frame
    pub state: GameState,
    /// Culling counts of the draw pass
    pub draw: DrawStats,
    /// Contact resolved this frame, if any
    pub contact: Option<Contact>,
    /// Events the world recorded this frame
    pub events: Vec<SimEvent>,
}

/// A running game: current screen, world, music and renderer caches.
#[derive(Debug, Clone)]
pub struct Session {
    config: SimConfig,
    state: GameState,
    world: Option<World>,
    backdrop: MenuBackdrop,
    playlist: Playlist,
    pads: ControlPads,
    labels: LabelCache,
    save_path: PathBuf,
    rng: ChaCha8Rng,
    escape_held: bool,
    now_ms: u64,
}

impl Session {
    /// Starts at the main menu.
    ///
    /// `seed` drives the menu backdrop, the playlist order and the seeds of
    /// every world generated by this session.
    #[must_use]
    pub fn new(config: SimConfig, seed: u64, save_path: impl Into<PathBuf>) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let backdrop = MenuBackdrop::new(&config, rng.gen());
        let playlist = Playlist::shuffled(DEFAULT_TRACKS, &mut rng);
        let pads = ControlPads::for_screen(config.screen);
        Self {
            config,
            state: GameState::MainMenu,
            world: None,
            backdrop,
            playlist,
            pads,
            labels: LabelCache::new(),
            save_path: save_path.into(),
            rng,
            escape_held: false,
            now_ms: 0,
        }
    }

    /// Current screen.
    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// False once the player has quit.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state != GameState::Exit
    }

    /// The world being played, if any.
    #[must_use]
    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    /// Mutable access to the world being played.
    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Where Save writes and Load Game reads.
    #[must_use]
    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    /// Island labels rendered so far.
    #[must_use]
    pub fn labels(&self) -> &LabelCache {
        &self.labels
    }

    /// Track that should be playing.
    #[must_use]
    pub fn current_track(&self) -> Option<&str> {
        self.playlist.current()
    }

    /// Called by the audio collaborator when a track finishes; returns the
    /// next one.
    pub fn on_track_end(&mut self) -> Option<&str> {
        self.playlist.advance()
    }

    /// Buttons clickable on the current screen.
    #[must_use]
    pub fn buttons(&self) -> Vec<Button> {
        let screen = self.config.screen;
        match self.state {
            GameState::MainMenu => main_menu_buttons(screen),
            GameState::HowToPlay | GameState::Credits => info_screen_buttons(screen),
            GameState::Playing if self.is_docked() => dock_buttons(screen),
            GameState::Playing | GameState::Exit => Vec::new(),
        }
    }

    fn is_docked(&self) -> bool {
        self.world.as_ref().is_some_and(|w| w.boat().is_docked())
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Performs a menu action and returns the resulting state.
    ///
    /// [`MenuAction::Save`] only writes while the boat is docked.
    pub fn dispatch(&mut self, action: MenuAction) -> GameState {
        match action {
            MenuAction::NewGame => self.new_game(),
            MenuAction::LoadGame => self.load_game(),
            MenuAction::SetSail => {
                if let Some(world) = self.world.as_mut() {
                    world.release_boat();
                }
            }
            MenuAction::Save if !self.is_docked() => {
                debug!("save ignored while under sail");
            }
            MenuAction::Save => {
                if let Err(error) = self.save() {
                    warn!(%error, path = %self.save_path.display(), "save failed");
                }
            }
            MenuAction::HowToPlay | MenuAction::Credits | MenuAction::MainMenu | MenuAction::Exit => {
                self.set_state(transition(self.state, action));
            }
        }
        self.state
    }

    fn set_state(&mut self, next: GameState) {
        if next == self.state {
            return;
        }
        info!(from = ?self.state, to = ?next, "state changed");
        if self.state == GameState::Playing {
            self.world = None;
            self.labels.clear();
        }
        self.state = next;
    }

    fn new_game(&mut self) {
        let seed: u64 = self.rng.gen();
        self.labels.clear();
        self.world = Some(World::generate(&self.config, seed));
        self.state = transition(self.state, MenuAction::NewGame);
        info!(seed, "new game");
    }

    fn load_game(&mut self) {
        let seed: u64 = self.rng.gen();
        let loaded = SaveData::load_from(&self.save_path)
            .and_then(|save| World::from_save(&self.config, save, seed, self.now_ms));
        match loaded {
            Ok(world) => {
                self.labels.clear();
                self.world = Some(world);
                self.state = transition(self.state, MenuAction::LoadGame);
            }
            Err(error) => {
                warn!(%error, path = %self.save_path.display(), "load failed, back to main menu");
                self.world = None;
                self.state = GameState::MainMenu;
            }
        }
    }

    /// Writes the current world to the save path.
    ///
    /// Does nothing outside a game.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`SaveData::save_to`].
    pub fn save(&self) -> Result<(), PersistenceError> {
        match &self.world {
            Some(world) => world.snapshot().save_to(&self.save_path),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Frame loop
    // =========================================================================

    /// Runs one frame: menu input, simulation step, then drawing.
    pub fn frame<C: Canvas + ?Sized>(
        &mut self,
        input: &InputSnapshot,
        now_ms: u64,
        dt: f32,
        canvas: &mut C,
    ) -> FrameReport {
        self.now_ms = now_ms;

        let escape = input.escape();
        if escape && !self.escape_held {
            self.dispatch(MenuAction::Exit);
        }
        self.escape_held = escape;

        if let Some(click) = input.click {
            if let Some(action) = hit_test(&self.buttons(), click) {
                self.dispatch(action);
            }
        }

        let mut report = FrameReport {
            state: self.state,
            ..FrameReport::default()
        };
        if !self.is_running() {
            return report;
        }

        canvas.clear(self.config.palette.blue);
        match self.state {
            GameState::Playing => {
                if let Some(world) = self.world.as_mut() {
                    self.pads.apply(input, world.boat_mut());
                    report.contact = world.tick(now_ms, dt);
                    report.events = world.take_events();
                }
                report.draw = self.draw_game(canvas);
            }
            GameState::MainMenu | GameState::HowToPlay | GameState::Credits => {
                self.backdrop.tick(now_ms);
                report.draw = self.backdrop.draw(canvas, &self.config.palette);
                self.draw_menu(canvas);
            }
            GameState::Exit => {}
        }
        report
    }

    #[allow(clippy::cast_precision_loss)]
    fn draw_menu<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let screen = self.config.screen;
        let text = match self.state {
            GameState::MainMenu => TITLE,
            GameState::HowToPlay => HOW_TO_PLAY_TEXT,
            GameState::Credits => CREDITS_TEXT,
            GameState::Playing | GameState::Exit => return,
        };
        for (i, line) in text.lines().enumerate() {
            let at = Vec2::new(screen.width * 0.1, screen.height * 0.1 + i as f32 * MENU_LINE_SPACING);
            canvas.draw_text(at, line);
        }
        for button in self.buttons() {
            canvas.draw_button(&button, self.config.palette.white);
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn draw_game<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> DrawStats {
        let buttons = self.buttons();
        let Some(world) = self.world.as_mut() else {
            return DrawStats::default();
        };
        let palette = &self.config.palette;
        let screen = self.config.screen;

        let stats = world.draw(canvas, palette);

        for (i, line) in hud_lines(world.boat()).iter().enumerate() {
            canvas.draw_text(HUD_ORIGIN + Vec2::new(0.0, i as f32 * HUD_LINE_SPACING), line);
        }
        canvas.draw_wind_rose(WIND_ROSE_CENTER, WIND_ROSE_SIZE, &WindRose::from_wind(world.wind()));

        if let Some(island) = world.docked_island() {
            if let Some(first) = buttons.first() {
                let at = Vec2::new(screen.width / 2.0, first.rect.y - screen.height / 2.0);
                canvas.draw_label(at, self.labels.get_or_render(island, palette));
            }
            for button in &buttons {
                canvas.draw_button(button, palette.white);
            }
        } else {
            for (caption, rect) in self.pads.labelled() {
                canvas.draw_text(Vec2::new(rect.x, rect.y - PAD_CAPTION_GAP), caption);
            }
        }
        stats
    }
}
