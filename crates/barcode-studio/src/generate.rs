//! Generate orchestrator.
//!
//! One call: resolve text and credential, fetch the rendered image,
//! build the container, place it on the page. The function returns a
//! plain result; mapping that result onto UI traffic is the session
//! dispatcher's job, which keeps this path directly callable from
//! tests.

use chrono::{DateTime, Utc};
use studio_canvas::{CanvasDocument, NodeId, Paint, ScaleMode, TextStyle, raster};
use zebra_client::{BarcodeFormat, RenderPayload, ZebraError};

use crate::config::{API_KEY_SETTING, FALLBACK_API_KEY, ImportMode};
use crate::session::Session;

pub const FRAME_WIDTH: f32 = 512.0;
pub const FRAME_HEIGHT: f32 = 640.0;
/// Inset of the graphic from the frame edges.
const GRAPHIC_INSET: f32 = 20.0;
/// Caption baseline offset from the frame bottom.
const CAPTION_BOTTOM_OFFSET: f32 = 128.0;
/// Vertical position of the format label in the 1-D layout.
const FORMAT_LABEL_Y: f32 = 124.0;
/// Export scale used in raster import mode.
const RASTER_SCALE: f32 = 2.0;

const CAPTION_STYLE: (f32, f32) = (36.0, 48.0);
const FORMAT_LABEL_STYLE: (f32, f32) = (48.0, 58.0);

/// A single generate invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// Percent-encoded text; `None` means "use the selection".
    pub text: Option<String>,
    pub format: BarcodeFormat,
}

/// What a successful invocation produced.
#[derive(Debug, Clone)]
pub struct Placement {
    pub frame: NodeId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Why an invocation failed.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// No text in the request and no usable selection. Reported as a
    /// silent UI state, never as a notice.
    #[error("no text selected")]
    NoTextSelected,

    #[error(transparent)]
    Service(#[from] ZebraError),

    #[error(transparent)]
    Canvas(#[from] studio_canvas::CanvasError),

    #[error(transparent)]
    Db(#[from] studio_db::DbError),
}

impl GenerateError {
    /// The toast message for this failure.
    ///
    /// Service failures carry their classified wording; anything else
    /// surfaces its own message, falling back to the generic one when
    /// there is nothing to show.
    pub fn user_message(&self) -> String {
        match self {
            Self::NoTextSelected => String::new(),
            Self::Service(e) => e.user_message().to_string(),
            other => {
                let msg = other.to_string();
                if msg.is_empty() {
                    zebra_client::GENERIC_FAILURE.to_string()
                } else {
                    msg
                }
            }
        }
    }
}

impl<C: CanvasDocument> Session<C> {
    /// Run one generate call end to end.
    ///
    /// Failures before the render response leave the canvas untouched;
    /// a failure during node construction can leave a partial
    /// container behind, matching the host-plugin behavior this core
    /// replaces.
    pub async fn generate(&mut self, req: GenerateRequest) -> Result<Placement, GenerateError> {
        let encoded = self.resolve_text(req.text)?;
        let key = self.resolve_api_key()?;

        let payload = self.client.render(&encoded, req.format, &key).await?;

        let decoded = urlencoding::decode(&encoded)
            .map(|cow| cow.into_owned())
            .unwrap_or_else(|_| encoded.clone());

        let graphic = self.import_graphic(payload)?;
        let frame = self.build_container(&decoded, req.format, graphic)?;
        self.place(frame)?;

        let name = self.canvas.name(frame).unwrap_or_default();
        tracing::info!(%frame, name, "Placed container");
        Ok(Placement {
            frame,
            name,
            created_at: Utc::now(),
        })
    }

    /// Step 1: request text verbatim, else a single selected text node.
    ///
    /// Non-empty request text never consults the selection, even when
    /// one exists. An empty string counts as absent text, not as text.
    fn resolve_text(&self, text: Option<String>) -> Result<String, GenerateError> {
        if let Some(text) = text.filter(|t| !t.is_empty()) {
            return Ok(text);
        }
        let selection = self.canvas.selection();
        let [only] = selection[..] else {
            return Err(GenerateError::NoTextSelected);
        };
        match self.canvas.text_characters(only) {
            Some(characters) => Ok(urlencoding::encode(&characters).into_owned()),
            None => Err(GenerateError::NoTextSelected),
        }
    }

    /// Step 2: stored key if present and non-empty, else the bundled one.
    fn resolve_api_key(&self) -> Result<String, GenerateError> {
        let stored = self.db.get_setting(API_KEY_SETTING)?;
        Ok(stored
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| FALLBACK_API_KEY.to_string()))
    }

    /// Step 5: turn the render payload into a drawable node.
    fn import_graphic(&mut self, payload: RenderPayload) -> Result<NodeId, GenerateError> {
        match (payload, self.config.import_mode) {
            (RenderPayload::Markup(svg), ImportMode::Vector) => {
                Ok(self.canvas.create_vector_from_markup(&svg)?)
            }
            (RenderPayload::Markup(svg), ImportMode::Raster) => {
                // Rasterize through an intermediate vector node, then
                // discard it; only the image-filled rectangle survives.
                let vector = self.canvas.create_vector_from_markup(&svg)?;
                let png = self.canvas.export_png(vector, RASTER_SCALE)?;
                let size = self.canvas.size(vector);
                self.canvas.remove(vector)?;
                let (w, h) = size.unwrap_or((studio_canvas::markup::DEFAULT_WIDTH, studio_canvas::markup::DEFAULT_HEIGHT));
                self.image_rectangle(png, w, h)
            }
            (RenderPayload::Bytes(bytes), _) => {
                let (w, h) = raster::image_dimensions(&bytes)?;
                self.image_rectangle(bytes, w as f32, h as f32)
            }
        }
    }

    fn image_rectangle(&mut self, bytes: Vec<u8>, width: f32, height: f32) -> Result<NodeId, GenerateError> {
        let hash = self.canvas.register_image(bytes)?;
        let rect = self.canvas.create_rectangle();
        self.canvas.resize(rect, width, height)?;
        self.canvas.set_fills(
            rect,
            vec![Paint::Image {
                hash,
                scale_mode: ScaleMode::Fit,
            }],
        )?;
        Ok(rect)
    }

    /// Step 6: the 512x640 container with caption, graphic, and (for
    /// 1-D formats) the format label. Labels are appended before the
    /// graphic so append order fixes draw order.
    fn build_container(
        &mut self,
        decoded: &str,
        format: BarcodeFormat,
        graphic: NodeId,
    ) -> Result<NodeId, GenerateError> {
        let frame = self.canvas.create_frame();
        self.canvas
            .set_name(frame, &format!("{} - {}", format.display_name(), decoded))?;
        self.canvas.resize(frame, FRAME_WIDTH, FRAME_HEIGHT)?;

        let (font, line) = CAPTION_STYLE;
        let caption = self.canvas.create_text();
        self.canvas
            .set_text_style(caption, TextStyle::caption(font, line))?;
        self.canvas.set_characters(caption, decoded)?;
        let (cw, ch) = self.canvas.size(caption).unwrap_or_default();
        self.canvas.set_position(
            caption,
            FRAME_WIDTH / 2.0 - cw / 2.0,
            FRAME_HEIGHT - CAPTION_BOTTOM_OFFSET + ch,
        )?;
        self.canvas.append_child(frame, caption)?;

        if format.is_qr() {
            // Square graphic, inset from the top-left corner.
            self.canvas
                .set_position(graphic, GRAPHIC_INSET, GRAPHIC_INSET)?;
            self.canvas.resize(
                graphic,
                FRAME_WIDTH - 2.0 * GRAPHIC_INSET,
                FRAME_WIDTH - 2.0 * GRAPHIC_INSET,
            )?;
        } else {
            // Full-width strip, vertically centered at natural height,
            // with a second label naming the symbology.
            let (_, gh) = self.canvas.size(graphic).unwrap_or_default();
            self.canvas
                .set_position(graphic, GRAPHIC_INSET, FRAME_HEIGHT / 2.0 - gh / 2.0)?;
            self.canvas
                .resize(graphic, FRAME_WIDTH - 2.0 * GRAPHIC_INSET, gh)?;

            let (font, line) = FORMAT_LABEL_STYLE;
            let label = self.canvas.create_text();
            self.canvas
                .set_text_style(label, TextStyle::caption(font, line))?;
            self.canvas.set_characters(label, &format.display_name())?;
            let (lw, _) = self.canvas.size(label).unwrap_or_default();
            self.canvas
                .set_position(label, FRAME_WIDTH / 2.0 - lw / 2.0, FORMAT_LABEL_Y)?;
            self.canvas.append_child(frame, label)?;
        }

        self.canvas.append_child(frame, graphic)?;
        Ok(frame)
    }

    /// Step 7: append to the page and line up after the last container
    /// this session placed. The explicit reference survives unrelated
    /// frames appearing on the page; a deleted predecessor simply
    /// leaves the new container at its default origin.
    fn place(&mut self, frame: NodeId) -> Result<(), GenerateError> {
        self.canvas.append_to_page(frame)?;

        if let Some(prev) = self.last_placed.filter(|p| self.canvas.exists(*p)) {
            if let (Some((px, py)), Some((pw, _))) =
                (self.canvas.position(prev), self.canvas.size(prev))
            {
                self.canvas
                    .set_position(frame, px + pw + self.config.container_gap, py)?;
            }
        }

        self.last_placed = Some(frame);
        Ok(())
    }
}
