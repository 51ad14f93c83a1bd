pub mod render;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A point in image-pixel or screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The user-selected rectangle marking image content to be redacted, in
/// image-pixel coordinates.
///
/// Always normalized: `(x, y)` is the top-left corner regardless of drag
/// direction, and `width`/`height` are non-negative. A zero-area rectangle is
/// a legal selection and means "no redaction requested"; it is forwarded to
/// the caller unchanged, never silently dropped.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectionRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SelectionRect {
    /// Normalizes two drag endpoints into a well-formed rectangle: the origin
    /// is the component-wise minimum and the extent the absolute difference,
    /// so the result is the same for every drag direction.
    pub fn from_corners(start: Point, end: Point) -> Self {
        Self {
            x: start.x.min(end.x),
            y: start.y.min(end.y),
            width: (end.x - start.x).abs(),
            height: (end.y - start.y).abs(),
        }
    }

    /// Whether the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

/// The loading state of the selector's image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    /// No image yet; pointer input is ignored.
    Loading,
    /// Image decoded; the selector accepts pointer input.
    Ready,
    /// Decode failed; the selector stays inert and the UI should show an
    /// error indicator.
    Failed,
}

/// Callback receiving the finalized selection (`None` after a clear).
pub type SelectionListener = Box<dyn FnMut(Option<SelectionRect>) + Send>;

/// Interactive rectangle-selection tool over a raster image.
///
/// The rendering surface is sized exactly to the image's natural pixel
/// dimensions; when the host displays it at a different size (responsive
/// scaling), screen coordinates are mapped back through the per-axis scale
/// factor on every pointer event. Until the image has decoded the selector is
/// inert: coordinate math against an undecoded image would be meaningless.
pub struct RegionSelector {
    image: Option<RgbaImage>,
    load_state: LoadState,
    display_size: Option<(f32, f32)>,
    drag_start: Option<Point>,
    dragging: bool,
    selection: Option<SelectionRect>,
    surface: Option<RgbaImage>,
    listener: Option<SelectionListener>,
}

impl Default for RegionSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionSelector {
    /// Creates an inert selector with no image.
    pub fn new() -> Self {
        Self {
            image: None,
            load_state: LoadState::Loading,
            display_size: None,
            drag_start: None,
            dragging: false,
            selection: None,
            surface: None,
            listener: None,
        }
    }

    /// Registers the callback that receives finalized selections.
    pub fn on_selection(&mut self, listener: SelectionListener) {
        self.listener = Some(listener);
    }

    /// Decodes the fetched image bytes and makes the selector interactive.
    ///
    /// On decode failure the selector transitions to [`LoadState::Failed`]
    /// and stays inert indefinitely.
    ///
    /// # Arguments
    ///
    /// * `bytes` - The raw image file content.
    ///
    /// # Returns
    ///
    /// A `Result` containing the image's natural pixel dimensions.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(u32, u32)> {
        match image::load_from_memory(bytes) {
            Ok(decoded) => {
                let rgba = decoded.to_rgba8();
                let dimensions = rgba.dimensions();
                tracing::debug!("🖼️ Selector image decoded: {}x{}", dimensions.0, dimensions.1);
                self.surface = Some(rgba.clone());
                self.image = Some(rgba);
                self.load_state = LoadState::Ready;
                Ok(dimensions)
            }
            Err(e) => {
                tracing::error!("❌ Selector image decode failed: {}", e);
                self.load_state = LoadState::Failed;
                Err(AppError::Image(e))
            }
        }
    }

    /// Loads an already-decoded image directly.
    pub fn load_image(&mut self, rgba: RgbaImage) {
        self.surface = Some(rgba.clone());
        self.image = Some(rgba);
        self.load_state = LoadState::Ready;
    }

    /// The loading state of the selector's image.
    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// The image's natural pixel dimensions, once decoded.
    pub fn natural_size(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|img| img.dimensions())
    }

    /// Records the on-screen size the image is displayed at, for pointer
    /// mapping. Unset means the image is displayed at its natural size.
    pub fn set_display_size(&mut self, width: f32, height: f32) {
        self.display_size = Some((width, height));
    }

    /// Whether a drag is currently in progress.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// The current finalized selection, if any.
    pub fn selection(&self) -> Option<SelectionRect> {
        self.selection
    }

    /// The rendered surface (base image plus any overlay) for the host to
    /// present.
    pub fn surface(&self) -> Option<&RgbaImage> {
        self.surface.as_ref()
    }

    /// Maps a screen-space position (relative to the displayed image's
    /// top-left corner) to image-pixel coordinates.
    pub fn to_image_coords(&self, screen: Point) -> Option<Point> {
        let (natural_w, natural_h) = self.natural_size()?;
        let (display_w, display_h) = self
            .display_size
            .unwrap_or((natural_w as f32, natural_h as f32));

        Some(Point {
            x: screen.x * (natural_w as f32 / display_w),
            y: screen.y * (natural_h as f32 / display_h),
        })
    }

    /// Begins a drag at the given screen position.
    ///
    /// Ignored while the image is not loaded.
    pub fn pointer_down(&mut self, screen: Point) {
        if self.load_state != LoadState::Ready {
            tracing::debug!("⚠️ pointer_down ignored - image not loaded");
            return;
        }

        let Some(pos) = self.to_image_coords(screen) else {
            return;
        };

        self.drag_start = Some(pos);
        self.dragging = true;
    }

    /// Updates the candidate rectangle while dragging and re-renders the
    /// surface: base image, then outline and semi-transparent fill.
    pub fn pointer_move(&mut self, screen: Point) {
        if !self.dragging || self.load_state != LoadState::Ready {
            return;
        }

        let (Some(start), Some(pos)) = (self.drag_start, self.to_image_coords(screen)) else {
            return;
        };

        self.redraw(Some(SelectionRect::from_corners(start, pos)));
    }

    /// Finalizes the drag at the given screen position.
    ///
    /// The rectangle is computed from the event's own coordinates - never
    /// from a previously stored cursor position - so the finalized selection
    /// always reflects the true pointer position at the moment of release.
    /// Degenerate (zero-area) rectangles are reported unchanged.
    ///
    /// # Returns
    ///
    /// The finalized rectangle, or `None` if no drag was in progress.
    pub fn pointer_up(&mut self, screen: Point) -> Option<SelectionRect> {
        if self.load_state != LoadState::Ready || !self.dragging {
            return None;
        }

        let start = self.drag_start?;
        let end = self.to_image_coords(screen)?;

        self.dragging = false;

        let rect = SelectionRect::from_corners(start, end);
        tracing::debug!(
            "✂️ Selection finalized: x={} y={} {}x{}",
            rect.x,
            rect.y,
            rect.width,
            rect.height
        );

        self.selection = Some(rect);
        self.redraw(Some(rect));
        self.notify(Some(rect));

        Some(rect)
    }

    /// Handles the pointer leaving the surface.
    ///
    /// Leaving mid-drag finalizes the selection at the exit position rather
    /// than discarding it, so the user does not lose a mostly-complete drag.
    pub fn pointer_leave(&mut self, screen: Point) -> Option<SelectionRect> {
        if self.dragging {
            tracing::debug!("🚪 Pointer left surface mid-drag - finalizing");
            self.pointer_up(screen)
        } else {
            None
        }
    }

    /// Discards the current selection, reports `None` to the caller and
    /// redraws the plain image with no overlay.
    pub fn clear(&mut self) {
        tracing::debug!("🔄 Clearing selection");
        self.selection = None;
        self.drag_start = None;
        self.dragging = false;
        self.redraw(None);
        self.notify(None);
    }

    fn redraw(&mut self, rect: Option<SelectionRect>) {
        if let Some(ref base) = self.image {
            self.surface = Some(match rect {
                Some(rect) => render::render_overlay(base, &rect),
                None => base.clone(),
            });
        }
    }

    fn notify(&mut self, rect: Option<SelectionRect>) {
        if let Some(ref mut listener) = self.listener {
            listener(rect);
        }
    }
}
