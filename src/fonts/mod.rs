//! Font registration, measurement and glyph shaping.
//!
//! [`FontBook`] stands in for the font-loading service: a family is *pending* from the moment
//! its load starts until [`FontBook::register`] (or [`FontBook::fail`]) resolves it. Layout
//! never waits for a font. Families that are pending or unknown fall back to the default face
//! when one is registered, then to the system fallback face (see
//! [`FontBook::load_system_fallback`]), and to fixed-advance metrics otherwise. Fallbacks are
//! logged once per family and never fail a measurement; drawing text without any face does.

use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::foundation::core::Rgba8;
use crate::foundation::error::{SlideError, SlideResult};

/// Advance of one character, as a fraction of the font size, when no face is usable.
pub const DEFAULT_FALLBACK_ADVANCE_EM: f64 = 0.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Loading state of a font family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontStatus {
    /// Registered and usable for measuring and drawing.
    Ready,
    /// Registration has started but not resolved yet.
    Pending,
    /// Never registered, or registration failed.
    Unavailable,
}

/// Font parameters for one measurement or shaping call, in target pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontRequest<'a> {
    /// Requested family.
    pub family: &'a str,
    /// Numeric weight.
    pub weight: u16,
    /// Font size in pixels.
    pub font_px: f64,
    /// Extra advance per character in pixels.
    pub letter_spacing_px: f64,
}

#[derive(Clone)]
struct LoadedFace {
    parley_family: String,
    font: vello_cpu::peniko::FontData,
}

/// One shaped line ready to be filled with `vello_cpu`.
#[derive(Clone)]
pub(crate) struct ShapedLine {
    pub(crate) font: vello_cpu::peniko::FontData,
    pub(crate) font_size: f32,
    pub(crate) color: Rgba8,
    /// Glyph origins relative to the line's top-left corner.
    pub(crate) glyphs: Vec<vello_cpu::Glyph>,
    pub(crate) width: f64,
    /// Distance from the top of the line box to the middle of the em box.
    pub(crate) middle_y: f64,
}

/// Registry of usable font families plus the Parley contexts used to shape them.
pub struct FontBook {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    faces: HashMap<String, LoadedFace>,
    pending: BTreeSet<String>,
    default_family: Option<String>,
    system_fallback: Option<LoadedFace>,
    fallback_advance_em: f64,
    warned: HashSet<String>,
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl FontBook {
    /// Empty book using [`DEFAULT_FALLBACK_ADVANCE_EM`].
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: HashMap::new(),
            pending: BTreeSet::new(),
            default_family: None,
            system_fallback: None,
            fallback_advance_em: DEFAULT_FALLBACK_ADVANCE_EM,
            warned: HashSet::new(),
        }
    }

    /// Override the fixed advance used when no face is usable.
    pub fn with_fallback_advance_em(mut self, em: f64) -> Self {
        if em.is_finite() && em > 0.0 {
            self.fallback_advance_em = em;
        }
        self
    }

    /// Record that `family` has started loading.
    pub fn mark_pending(&mut self, family: &str) {
        let key = family_key(family);
        if !self.faces.contains_key(&key) {
            tracing::debug!(family, "font pending");
            self.pending.insert(key);
        }
    }

    /// Resolve `family` with the given font file bytes.
    ///
    /// The first family registered becomes the default face for fallbacks.
    #[tracing::instrument(skip(self, bytes), fields(byte_len = bytes.len()))]
    pub fn register(&mut self, family: &str, bytes: Vec<u8>) -> SlideResult<()> {
        let key = family_key(family);
        if key.is_empty() {
            return Err(SlideError::validation("font family must be non-empty"));
        }

        let face = match self.load_face(bytes, 0) {
            Ok(face) => face,
            Err(err) => {
                self.pending.remove(&key);
                return Err(err);
            }
        };
        self.faces.insert(key.clone(), face);
        self.pending.remove(&key);
        self.warned.remove(&key);
        if self.default_family.is_none() {
            self.default_family = Some(key);
        }
        tracing::debug!(family, "font registered");
        Ok(())
    }

    /// Load a sans-serif face from the fonts installed on this machine and use it when no
    /// registered family can draw a request. Returns `false` when none was found.
    ///
    /// Registered families and the default family always take precedence.
    #[tracing::instrument(skip(self))]
    pub fn load_system_fallback(&mut self) -> bool {
        use usvg::fontdb;

        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        let id = db
            .query(&fontdb::Query {
                families: &[fontdb::Family::SansSerif],
                ..fontdb::Query::default()
            })
            .or_else(|| db.faces().find(|f| f.index == 0).map(|f| f.id));
        let Some((bytes, index)) =
            id.and_then(|id| db.with_face_data(id, |data, index| (data.to_vec(), index)))
        else {
            tracing::warn!(faces = db.len(), "no system font face found");
            return false;
        };

        match self.load_face(bytes, index) {
            Ok(face) => {
                tracing::debug!(family = %face.parley_family, "system fallback face loaded");
                self.system_fallback = Some(face);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "system font face is unusable");
                false
            }
        }
    }

    fn load_face(&mut self, bytes: Vec<u8>, index: u32) -> SlideResult<LoadedFace> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .iter()
            .find(|(_, fonts)| fonts.iter().any(|f| f.index() == index))
            .or_else(|| families.first())
            .map(|(id, _)| *id)
            .ok_or_else(|| SlideError::asset("no font faces found in font data"))?;
        let parley_family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SlideError::asset("registered font family has no name"))?
            .to_string();

        Ok(LoadedFace {
            parley_family,
            font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), index),
        })
    }

    /// Resolve a pending family as failed; it will keep using fallback metrics.
    pub fn fail(&mut self, family: &str) {
        let key = family_key(family);
        if self.pending.remove(&key) {
            tracing::warn!(family, "font failed to load; fallback metrics stay in effect");
        }
    }

    /// Choose which registered family serves as the fallback face.
    pub fn set_default_family(&mut self, family: &str) -> SlideResult<()> {
        let key = family_key(family);
        if !self.faces.contains_key(&key) {
            return Err(SlideError::validation(format!(
                "default font family '{family}' is not registered"
            )));
        }
        self.default_family = Some(key);
        Ok(())
    }

    /// Loading state of `family`.
    pub fn status(&self, family: &str) -> FontStatus {
        let key = family_key(family);
        if self.faces.contains_key(&key) {
            FontStatus::Ready
        } else if self.pending.contains(&key) {
            FontStatus::Pending
        } else {
            FontStatus::Unavailable
        }
    }

    /// Return `true` when text in `family` can be drawn, directly or through a fallback face.
    pub fn can_draw(&self, family: &str) -> bool {
        self.faces.contains_key(&family_key(family))
            || self
                .default_family
                .as_ref()
                .is_some_and(|d| self.faces.contains_key(d))
            || self.system_fallback.is_some()
    }

    /// The subset of `families` still pending, deduplicated and sorted.
    pub fn pending_among<'a>(&self, families: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut out = BTreeSet::new();
        for f in families {
            if self.status(f) == FontStatus::Pending {
                out.insert(f.trim().to_owned());
            }
        }
        out.into_iter().collect()
    }

    /// Advance width of `text` on one line.
    pub fn measure(&mut self, req: &FontRequest<'_>, text: &str) -> f64 {
        match self.resolve(req.family) {
            Some(face) => {
                let layout = self.build_layout(&face, req, text, TextBrushRgba8::default());
                f64::from(layout.width())
            }
            None => self.fallback_width(req, text),
        }
    }

    fn fallback_width(&self, req: &FontRequest<'_>, text: &str) -> f64 {
        let n = text.chars().count() as f64;
        n * (self.fallback_advance_em * req.font_px + req.letter_spacing_px)
    }

    /// Shape `text` as a single line. Returns `None` when [`FontBook::can_draw`] is `false`.
    pub(crate) fn shape_line(
        &mut self,
        req: &FontRequest<'_>,
        text: &str,
        color: Rgba8,
    ) -> Option<ShapedLine> {
        let face = self.resolve(req.family)?;
        let layout = self.build_layout(&face, req, text, color.into());

        let mut glyphs = Vec::new();
        let mut font_size = req.font_px as f32;
        let mut brush = TextBrushRgba8::from(color);
        let mut middle_y = req.font_px / 2.0;
        for (i, line) in layout.lines().enumerate() {
            if i == 0 {
                let m = line.metrics();
                middle_y = f64::from(m.baseline) + f64::from(m.descent - m.ascent) / 2.0;
            }
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                font_size = run.run().font_size();
                brush = run.style().brush;
                glyphs.extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }

        Some(ShapedLine {
            font: face.font,
            font_size,
            color: Rgba8::rgba(brush.r, brush.g, brush.b, brush.a),
            glyphs,
            width: f64::from(layout.width()),
            middle_y,
        })
    }

    fn resolve(&mut self, family: &str) -> Option<LoadedFace> {
        let key = family_key(family);
        if let Some(face) = self.faces.get(&key) {
            return Some(face.clone());
        }

        let fallback = self
            .default_family
            .as_ref()
            .and_then(|d| self.faces.get(d))
            .or(self.system_fallback.as_ref())
            .cloned();
        if self.warned.insert(key) {
            match (&fallback, self.pending.contains(&family_key(family))) {
                (Some(_), true) => {
                    tracing::warn!(family, "font still loading; measuring with default face")
                }
                (Some(_), false) => {
                    tracing::warn!(family, "font unavailable; measuring with default face")
                }
                (None, _) => tracing::warn!(
                    family,
                    advance_em = self.fallback_advance_em,
                    "no font face available; using fixed-advance metrics"
                ),
            }
        }
        fallback
    }

    fn build_layout(
        &mut self,
        face: &LoadedFace,
        req: &FontRequest<'_>,
        text: &str,
        brush: TextBrushRgba8,
    ) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(face.parley_family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(req.font_px as f32));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(req.weight)),
        ));
        builder.push_default(parley::style::StyleProperty::LetterSpacing(
            req.letter_spacing_px as f32,
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("families", &self.faces.keys().collect::<BTreeSet<_>>())
            .field("pending", &self.pending)
            .field("default_family", &self.default_family)
            .field(
                "system_fallback",
                &self.system_fallback.as_ref().map(|f| &f.parley_family),
            )
            .field("fallback_advance_em", &self.fallback_advance_em)
            .finish()
    }
}

fn family_key(family: &str) -> String {
    family.trim().to_lowercase()
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/fixtures.rs"]
pub(crate) mod fixtures;

#[cfg(test)]
#[path = "../../tests/unit/fonts/book.rs"]
mod tests;
