//! Browser DOM helpers

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use super::HudSink;
use crate::error::ConfigError;
use crate::sim::Playfield;

/// Element ids the page provides
pub mod ids {
    pub const CONTAINER: &str = "game-container";
    pub const CANVAS: &str = "game-canvas";
    pub const SCORE: &str = "score";
    pub const LIVES: &str = "lives";
    pub const FPS: &str = "fps";
    pub const OVERLAY: &str = "game-overlay";
    pub const OVERLAY_MESSAGE: &str = "overlay-message";
    pub const EDITOR: &str = "code-editor";
    pub const ERROR_PANEL: &str = "error-panel";
}

/// HUD and overlay rendered into the page
pub struct DomHud {
    document: Document,
}

impl DomHud {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    pub fn set_fps(&self, fps: u32) {
        self.set_text(ids::FPS, &fps.to_string());
    }

    /// Show a rejected config in the editor's error panel
    pub fn show_error(&self, error: &ConfigError) {
        self.set_text(ids::ERROR_PANEL, &format!("{}\n{}", error, error.hint()));
        if let Some(el) = self.document.get_element_by_id(ids::ERROR_PANEL) {
            let _ = el.set_attribute("class", "visible");
        }
    }

    pub fn clear_error(&self) {
        self.set_text(ids::ERROR_PANEL, "");
        if let Some(el) = self.document.get_element_by_id(ids::ERROR_PANEL) {
            let _ = el.set_attribute("class", "hidden");
        }
    }
}

impl HudSink for DomHud {
    fn set_hud(&mut self, score: u64, lives: u32) {
        self.set_text(ids::SCORE, &score.to_string());
        self.set_text(ids::LIVES, &lives.to_string());
    }

    fn show_overlay(&mut self, _won: bool, message: &str) {
        self.set_text(ids::OVERLAY_MESSAGE, message);
        if let Some(el) = self.document.get_element_by_id(ids::OVERLAY) {
            let _ = el.set_attribute("class", "");
        }
    }

    fn hide_overlay(&mut self) {
        if let Some(el) = self.document.get_element_by_id(ids::OVERLAY) {
            let _ = el.set_attribute("class", "hidden");
        }
    }
}

/// Playfield for the current container size
pub fn measure_playfield(document: &Document) -> Playfield {
    match document.get_element_by_id(ids::CONTAINER) {
        Some(container) => Playfield::from_container(
            container.client_width() as f32,
            container.client_height() as f32,
        ),
        None => {
            log::warn!("#{} not found, using an empty playfield", ids::CONTAINER);
            Playfield::new(0.0, 0.0)
        }
    }
}

/// Find the game canvas and its 2D context
pub fn canvas_context(
    document: &Document,
) -> Option<(HtmlCanvasElement, CanvasRenderingContext2d)> {
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(ids::CANVAS)?
        .dyn_into()
        .ok()?;
    let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
    Some((canvas, ctx))
}

/// Match the canvas backing store to the playfield
pub fn size_canvas(canvas: &HtmlCanvasElement, playfield: &Playfield) {
    canvas.set_width(playfield.width as u32);
    canvas.set_height(playfield.height as u32);
}
