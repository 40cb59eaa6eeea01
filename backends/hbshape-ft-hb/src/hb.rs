//! HarfBuzz objects owned by a shaper
//!
//! The shaping font is created over the FreeType face through HarfBuzz's
//! FreeType integration, so HarfBuzz reads advances from the face at the size
//! FreeType was given. The text buffer lives for one shaping call.

#![allow(unsafe_code)]

use std::os::raw::c_int;
use std::ptr::{self, NonNull};
use std::slice;

use harfbuzz_sys::{
    hb_buffer_add_utf8, hb_buffer_allocation_successful, hb_buffer_create, hb_buffer_destroy,
    hb_buffer_get_glyph_infos, hb_buffer_get_glyph_positions, hb_buffer_guess_segment_properties,
    hb_buffer_t, hb_face_get_glyph_count, hb_font_destroy, hb_font_get_face, hb_font_t,
    hb_ft_font_create_referenced, hb_glyph_info_t, hb_glyph_position_t, hb_shape,
};

use hbshape_core::error::{HbShapeError, Result, ShapingError};

use crate::engine::{Engine, FontFace};

/// A HarfBuzz font drawing its glyph metrics from a FreeType face
///
/// Holds a reference on the face; dropping it releases that reference under
/// the engine lock.
pub(crate) struct ShapingFont {
    engine: &'static Engine,
    raw: NonNull<hb_font_t>,
}

impl ShapingFont {
    /// Wrap `face` at its current char size
    pub(crate) fn from_face(face: &FontFace) -> Result<Self> {
        // SAFETY: the face is live; HarfBuzz takes its own reference on it.
        let raw = unsafe { hb_ft_font_create_referenced(face.raw()) };
        let raw = NonNull::new(raw).ok_or_else(|| {
            HbShapeError::ShapingFontCreation("engine returned no font".to_string())
        })?;
        let font = Self {
            engine: face.engine(),
            raw,
        };

        if font.glyph_count() == 0 {
            return Err(HbShapeError::ShapingFontCreation(
                "face has no glyphs the shaping engine can read".to_string(),
            ));
        }
        Ok(font)
    }

    pub(crate) fn glyph_count(&self) -> u32 {
        // SAFETY: the font and its face stay alive as long as `self`.
        unsafe { hb_face_get_glyph_count(hb_font_get_face(self.raw.as_ptr())) }
    }
}

impl Drop for ShapingFont {
    fn drop(&mut self) {
        // Releasing the font may release the FreeType face with it.
        let _guard = self.engine.lock();
        // SAFETY: `raw` is never used after this point.
        unsafe { hb_font_destroy(self.raw.as_ptr()) };
    }
}

/// One run of UTF-8 text, shaped in place
pub(crate) struct TextBuffer {
    raw: NonNull<hb_buffer_t>,
}

impl TextBuffer {
    /// Fill a fresh buffer with `text` and guess script, direction and
    /// language for it
    pub(crate) fn new(text: &str) -> std::result::Result<Self, ShapingError> {
        let len = c_int::try_from(text.len()).map_err(|_| ShapingError::TextTooLong {
            len: text.len(),
            max: c_int::MAX as usize,
        })?;

        // SAFETY: `hb_buffer_create` never returns null; on allocation
        // failure it returns the inert empty buffer, which is safe to use
        // and destroy.
        let raw = NonNull::new(unsafe { hb_buffer_create() })
            .ok_or_else(|| ShapingError::Backend("engine returned no buffer".to_string()))?;
        let buffer = Self { raw };

        // SAFETY: `text` is valid UTF-8 of `len` bytes and is copied by
        // HarfBuzz before the call returns.
        unsafe {
            hb_buffer_add_utf8(raw.as_ptr(), text.as_ptr().cast(), len, 0, len);
            hb_buffer_guess_segment_properties(raw.as_ptr());
        }
        Ok(buffer)
    }

    /// Shape with no feature overrides
    pub(crate) fn shape(&mut self, font: &ShapingFont) {
        // SAFETY: both objects are live and owned by this thread.
        unsafe { hb_shape(font.raw.as_ptr(), self.raw.as_ptr(), ptr::null(), 0) };
    }

    /// Whether every allocation the buffer needed so far succeeded
    pub(crate) fn allocation_successful(&self) -> bool {
        // SAFETY: the buffer is live.
        unsafe { hb_buffer_allocation_successful(self.raw.as_ptr()) != 0 }
    }

    pub(crate) fn glyph_infos(&self) -> &[hb_glyph_info_t] {
        let mut len = 0;
        // SAFETY: the returned array is owned by the buffer and stays valid
        // until it is modified, which needs `&mut self`.
        unsafe {
            let infos = hb_buffer_get_glyph_infos(self.raw.as_ptr(), &mut len);
            raw_slice(infos, len)
        }
    }

    pub(crate) fn glyph_positions(&self) -> &[hb_glyph_position_t] {
        let mut len = 0;
        // SAFETY: as for `glyph_infos`.
        unsafe {
            let positions = hb_buffer_get_glyph_positions(self.raw.as_ptr(), &mut len);
            raw_slice(positions, len)
        }
    }
}

impl Drop for TextBuffer {
    fn drop(&mut self) {
        // SAFETY: `raw` is never used after this point.
        unsafe { hb_buffer_destroy(self.raw.as_ptr()) };
    }
}

/// # Safety
///
/// `ptr` must be null or point at `len` initialized values that outlive `'a`.
unsafe fn raw_slice<'a, T>(ptr: *const T, len: u32) -> &'a [T] {
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        slice::from_raw_parts(ptr, len as usize)
    }
}

/// Reject a shaping pass that failed inside the engine
///
/// HarfBuzz does not report errors from `hb_shape`; an allocation failure
/// leaves the buffer empty and flagged.
pub(crate) fn check_shaped(
    text_len: usize,
    allocation_successful: bool,
    glyphs: usize,
    positions: usize,
) -> std::result::Result<(), ShapingError> {
    if !allocation_successful {
        return Err(ShapingError::Backend(
            "engine could not allocate the glyph buffer".to_string(),
        ));
    }
    if text_len > 0 && glyphs == 0 {
        return Err(ShapingError::Backend(format!(
            "{text_len} bytes of text shaped into no glyphs"
        )));
    }
    if glyphs != positions {
        return Err(ShapingError::Backend(format!(
            "engine returned {glyphs} glyphs but {positions} positions"
        )));
    }
    Ok(())
}
