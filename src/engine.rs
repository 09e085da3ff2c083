use tiny_skia::Pixmap;
use tracing::{debug, warn};

use crate::config::SurfaceConfig;
use crate::consts::EMPTY_SNAPSHOT;
use crate::input::{InputState, PointerSource};
use crate::raster::{Ink, Raster};
use crate::render::{self, Scene};
use crate::snapshot::{self, SnapshotError};
use crate::stroke::StrokeHistory;
use crate::viewport::{DisplayRect, Point};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A stroke finished or the surface was cleared. `""` means no signature.
    SnapshotChanged(String),
    /// The backing buffer changed and should be presented.
    RenderNeeded,
    /// Cancel the browser's default gesture for the current event.
    PreventDefault,
}

/// A pending decode of an initial snapshot.
///
/// Issued by [`SurfaceCore::set_initial_value`]; the host decodes the value
/// off the input path and hands the result back through
/// [`SurfaceCore::complete_decode`]. Each ticket carries the generation it
/// was issued at, so results that arrive late or out of order are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeTicket {
    generation: u64,
    value: String,
}

impl DecodeTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The snapshot being decoded.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Decode the ticket's snapshot.
    ///
    /// # Errors
    ///
    /// Propagates [`snapshot::decode`] errors.
    pub fn decode(&self) -> Result<Pixmap, SnapshotError> {
        snapshot::decode(&self.value)
    }
}

/// Core surface state: all logic that doesn't depend on a browser canvas.
///
/// Separated from the browser binding so it can be tested natively. The
/// input handlers are the only writers of drawing state; [`render::draw`] is
/// the only reader.
pub struct SurfaceCore {
    config: SurfaceConfig,
    ink: Ink,
    raster: Option<Raster>,
    history: StrokeHistory,
    input: InputState,
    background: Option<Pixmap>,
    /// Last snapshot rendered or emitted; an identical initial value is a no-op.
    last_value: Option<String>,
    /// Generation of the most recent decode request.
    generation: u64,
}

impl Default for SurfaceCore {
    fn default() -> Self {
        Self::new(SurfaceConfig::default())
    }
}

impl SurfaceCore {
    /// Create a surface with an empty history and no background.
    ///
    /// An unusable ink falls back to the default ink. A buffer that cannot be
    /// allocated leaves the surface without one: painting and encoding then do
    /// nothing.
    #[must_use]
    pub fn new(config: SurfaceConfig) -> Self {
        let ink = Ink::from_style(&config.ink).unwrap_or_else(|e| {
            warn!(error = %e, "invalid ink style; using default ink");
            Ink::default()
        });
        let raster = Raster::new(config.width, config.height);
        if raster.is_none() {
            warn!(width = config.width, height = config.height, "backing buffer unavailable; drawing disabled");
        }
        Self {
            config,
            ink,
            raster,
            history: StrokeHistory::new(),
            input: InputState::default(),
            background: None,
            last_value: None,
            generation: 0,
        }
    }

    // --- Initial value ---

    /// Show a previously saved snapshot.
    ///
    /// Values equal to the one already rendered (or last emitted) are
    /// ignored. A different value supersedes the current signature: the
    /// buffer and stroke history are wiped, and for a non-empty value a
    /// [`DecodeTicket`] is returned for the host to decode asynchronously.
    pub fn set_initial_value(&mut self, value: &str) -> Option<DecodeTicket> {
        if self.last_value.as_deref() == Some(value) {
            return None;
        }
        self.last_value = Some(value.to_owned());
        self.generation += 1;
        self.history.clear();
        self.background = None;
        self.repaint();

        if !snapshot::is_present(value) {
            return None;
        }
        debug!(generation = self.generation, "initial snapshot decode requested");
        Some(DecodeTicket { generation: self.generation, value: value.to_owned() })
    }

    /// Apply a finished decode.
    ///
    /// The image becomes the background only if the ticket is still the
    /// latest request and nothing has been drawn since it was issued.
    /// Anything else, including decode failures, is dropped silently.
    pub fn complete_decode(&mut self, ticket: &DecodeTicket, result: Result<Pixmap, SnapshotError>) -> Vec<Action> {
        if ticket.generation != self.generation {
            debug!(ticket = ticket.generation, latest = self.generation, "dropping superseded decode");
            return Vec::new();
        }
        let image = match result {
            Ok(image) => image,
            Err(e) => {
                warn!(error = %e, "initial snapshot could not be decoded");
                return Vec::new();
            }
        };
        if !self.history.is_empty() || self.input.is_drawing() {
            debug!("ink drawn before decode finished; keeping ink");
            return Vec::new();
        }

        self.background = Some(image);
        self.repaint();
        vec![Action::RenderNeeded]
    }

    /// [`SurfaceCore::set_initial_value`] followed by an immediate decode.
    pub fn load_initial_value(&mut self, value: &str) -> Vec<Action> {
        let Some(ticket) = self.set_initial_value(value) else {
            return vec![Action::RenderNeeded];
        };
        let result = ticket.decode();
        let mut actions = self.complete_decode(&ticket, result);
        if actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Input events ---

    /// Pointer pressed inside the canvas: start a stroke.
    pub fn on_pointer_down(&mut self, client: Point, display: DisplayRect, source: PointerSource) -> Vec<Action> {
        let at = self.to_buffer(client, display);
        self.input.begin(at);
        prevent_default_for(source)
    }

    /// Pointer moved: extend the stroke and repaint. Ignored when idle.
    pub fn on_pointer_move(&mut self, client: Point, display: DisplayRect, source: PointerSource) -> Vec<Action> {
        let at = self.to_buffer(client, display);
        if !self.input.extend(at) {
            return Vec::new();
        }
        self.repaint();
        let mut actions = vec![Action::RenderNeeded];
        actions.extend(prevent_default_for(source));
        actions
    }

    /// Pointer released: commit the stroke and emit a snapshot.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.finish_stroke()
    }

    /// Pointer left the canvas: same as release.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.finish_stroke()
    }

    fn finish_stroke(&mut self) -> Vec<Action> {
        let Some(points) = self.input.finish() else {
            return Vec::new();
        };
        let committed = self.history.commit(points);
        self.repaint();

        let mut actions = vec![Action::RenderNeeded];
        if !committed {
            // The picture is unchanged, so the reported value must be too.
            debug!("tap without movement; nothing committed");
            return actions;
        }
        if let Some(snapshot) = self.encode() {
            self.last_value = Some(snapshot.clone());
            actions.push(Action::SnapshotChanged(snapshot));
        }
        actions
    }

    // --- Clear ---

    /// Wipe ink, background and any pending decode; emit the empty snapshot.
    pub fn clear(&mut self) -> Vec<Action> {
        if let Some(raster) = self.raster.as_mut() {
            raster.clear();
        }
        self.history.clear();
        self.input.reset();
        self.background = None;
        self.generation += 1;
        self.last_value = Some(EMPTY_SNAPSHOT.to_owned());
        vec![Action::RenderNeeded, Action::SnapshotChanged(EMPTY_SNAPSHOT.to_owned())]
    }

    // --- Render ---

    /// Repaint the whole buffer from the current state.
    pub fn repaint(&mut self) {
        let Some(raster) = self.raster.as_mut() else {
            return;
        };
        let scene = Scene {
            history: &self.history,
            in_progress: self.input.points(),
            background: self.background.as_ref(),
        };
        render::draw(raster, &scene, &self.ink);
    }

    /// Encode the buffer as it is now. `""` when there is no buffer.
    #[must_use]
    pub fn snapshot(&self) -> String {
        self.encode().unwrap_or_default()
    }

    fn encode(&self) -> Option<String> {
        let raster = self.raster.as_ref()?;
        match snapshot::encode(raster.pixmap()) {
            Ok(encoded) => Some(encoded),
            Err(e) => {
                warn!(error = %e, "snapshot encoding failed");
                None
            }
        }
    }

    fn to_buffer(&self, client: Point, display: DisplayRect) -> Point {
        display.client_to_buffer(client, self.config.width, self.config.height)
    }

    // --- Queries ---

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.input.is_drawing()
    }

    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn history(&self) -> &StrokeHistory {
        &self.history
    }

    /// Samples of the stroke being drawn.
    #[must_use]
    pub fn in_progress(&self) -> &[Point] {
        self.input.points()
    }

    #[must_use]
    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    /// The backing buffer, `None` if it could not be allocated.
    #[must_use]
    pub fn raster(&self) -> Option<&Raster> {
        self.raster.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Host styling token, passed through untouched.
    #[must_use]
    pub fn accent(&self) -> Option<&str> {
        self.config.accent.as_deref()
    }
}

fn prevent_default_for(source: PointerSource) -> Vec<Action> {
    if source.suppresses_scroll() {
        vec![Action::PreventDefault]
    } else {
        Vec::new()
    }
}

/// Callback receiving every emitted snapshot.
pub type SaveCallback = Box<dyn FnMut(&str)>;

/// The signature surface: wraps [`SurfaceCore`] and reports snapshots to the
/// surrounding form through a callback.
pub struct Surface {
    pub core: SurfaceCore,
    on_save: SaveCallback,
}

impl Surface {
    /// Create a surface that reports snapshots to `on_save`.
    #[must_use]
    pub fn new(config: SurfaceConfig, on_save: impl FnMut(&str) + 'static) -> Self {
        Self { core: SurfaceCore::new(config), on_save: Box::new(on_save) }
    }

    /// Create a surface and start showing `initial`, decoding it right away.
    #[must_use]
    pub fn with_initial_value(config: SurfaceConfig, initial: &str, on_save: impl FnMut(&str) + 'static) -> Self {
        let mut surface = Self::new(config, on_save);
        surface.core.load_initial_value(initial);
        surface
    }

    fn dispatch(&mut self, actions: Vec<Action>) -> Vec<Action> {
        for action in &actions {
            if let Action::SnapshotChanged(snapshot) = action {
                (self.on_save)(snapshot);
            }
        }
        actions
    }

    // --- Delegated initial value ---

    pub fn set_initial_value(&mut self, value: &str) -> Option<DecodeTicket> {
        self.core.set_initial_value(value)
    }

    pub fn complete_decode(&mut self, ticket: &DecodeTicket, result: Result<Pixmap, SnapshotError>) -> Vec<Action> {
        self.core.complete_decode(ticket, result)
    }

    pub fn load_initial_value(&mut self, value: &str) -> Vec<Action> {
        self.core.load_initial_value(value)
    }

    // --- Delegated input events ---

    pub fn on_pointer_down(&mut self, client: Point, display: DisplayRect, source: PointerSource) -> Vec<Action> {
        self.core.on_pointer_down(client, display, source)
    }

    pub fn on_pointer_move(&mut self, client: Point, display: DisplayRect, source: PointerSource) -> Vec<Action> {
        self.core.on_pointer_move(client, display, source)
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        let actions = self.core.on_pointer_up();
        self.dispatch(actions)
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        let actions = self.core.on_pointer_leave();
        self.dispatch(actions)
    }

    pub fn clear(&mut self) -> Vec<Action> {
        let actions = self.core.clear();
        self.dispatch(actions)
    }

    // --- Delegated render / queries ---

    pub fn repaint(&mut self) {
        self.core.repaint();
    }

    #[must_use]
    pub fn snapshot(&self) -> String {
        self.core.snapshot()
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.core.is_drawing()
    }

    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.core.stroke_count()
    }
}
