//! The process-wide FreeType library
//!
//! FreeType wants one `FT_Library` per process, and every call that creates
//! or destroys a face on it has to be serialized. The library is brought up
//! on first use and the outcome is stored: a failed initialization is handed
//! back to every later caller instead of being forgotten.

#![allow(unsafe_code)]

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr;
use std::sync::OnceLock;

use freetype::freetype::{
    FT_Done_Face, FT_Face, FT_FaceRec_, FT_F26Dot6, FT_Init_FreeType, FT_Library, FT_Long,
    FT_New_Face, FT_New_Memory_Face, FT_Set_Char_Size, FT_Size_Metrics,
};
use freetype::FT_Error;
use parking_lot::{Mutex, MutexGuard};

use hbshape_core::error::{EngineInitError, HbShapeError, Result};

static ENGINE: OnceLock<std::result::Result<Engine, EngineInitError>> = OnceLock::new();

/// `FT_Err_Cannot_Open_Resource`
const CANNOT_OPEN_RESOURCE: FT_Error = 0x01;

/// Owner of the FreeType library handle
pub struct Engine {
    library: Mutex<LibraryHandle>,
}

pub(crate) struct LibraryHandle(FT_Library);

// SAFETY: `FT_Library` is a plain heap handle with no thread affinity. It is
// only reachable through the `Mutex` in `Engine`, so at most one thread
// touches it at a time.
unsafe impl Send for LibraryHandle {}

impl Engine {
    fn init() -> std::result::Result<Self, EngineInitError> {
        let mut library: FT_Library = ptr::null_mut();
        // SAFETY: `library` is a valid out-pointer for the new handle.
        let err = unsafe { FT_Init_FreeType(&mut library) };
        if !freetype::succeeded(err) {
            let err = init_error(err);
            log::warn!("FreeType library failed to initialize: {err}");
            return Err(err);
        }

        log::debug!("FreeType library initialized");
        Ok(Self {
            library: Mutex::new(LibraryHandle(library)),
        })
    }

    /// Hold the library lock
    pub(crate) fn lock(&self) -> MutexGuard<'_, LibraryHandle> {
        self.library.lock()
    }

    /// Open a face from a file on disk
    pub fn open_file(&'static self, path: &Path, face_index: u32) -> Result<FontFace> {
        let path = CString::new(path.as_os_str().as_bytes()).map_err(|_| HbShapeError::FontLoad {
            code: CANNOT_OPEN_RESOURCE,
            message: "font path contains a NUL byte".to_string(),
        })?;

        let mut face: FT_Face = ptr::null_mut();
        let guard = self.lock();
        // SAFETY: the library is held under its lock, `path` is NUL-terminated
        // and outlives the call, `face` is a valid out-pointer.
        let err = unsafe {
            FT_New_Face(guard.0, path.as_ptr(), face_index_arg(face_index), &mut face)
        };
        drop(guard);

        if !freetype::succeeded(err) {
            return Err(load_error(err));
        }
        Ok(FontFace::new(self, face, None))
    }

    /// Open a face from bytes; the face keeps the buffer alive until it is
    /// released
    pub fn open_memory(&'static self, bytes: Vec<u8>, face_index: u32) -> Result<FontFace> {
        let bytes = bytes.into_boxed_slice();
        let len = FT_Long::try_from(bytes.len()).map_err(|_| HbShapeError::FontLoad {
            code: CANNOT_OPEN_RESOURCE,
            message: format!("font buffer of {} bytes is too large", bytes.len()),
        })?;

        let mut face: FT_Face = ptr::null_mut();
        let guard = self.lock();
        // SAFETY: the library is held under its lock. FreeType reads `bytes`
        // in place; the box moves into the returned `FontFace` and is freed
        // only after `FT_Done_Face`.
        let err = unsafe {
            FT_New_Memory_Face(guard.0, bytes.as_ptr(), len, face_index_arg(face_index), &mut face)
        };
        drop(guard);

        if !freetype::succeeded(err) {
            return Err(load_error(err));
        }
        Ok(FontFace::new(self, face, Some(bytes)))
    }
}

/// Get the engine, initializing it on first call
pub fn engine() -> std::result::Result<&'static Engine, EngineInitError> {
    resolve(&ENGINE, Engine::init)
}

/// Outcome of the one-time library initialization
///
/// Triggers initialization if nothing has asked for the engine yet.
pub fn engine_status() -> std::result::Result<(), EngineInitError> {
    engine().map(|_| ())
}

fn resolve<T>(
    slot: &'static OnceLock<std::result::Result<T, EngineInitError>>,
    init: impl FnOnce() -> std::result::Result<T, EngineInitError>,
) -> std::result::Result<&'static T, EngineInitError> {
    slot.get_or_init(init).as_ref().map_err(Clone::clone)
}

fn face_index_arg(face_index: u32) -> FT_Long {
    FT_Long::try_from(face_index).unwrap_or(FT_Long::MAX)
}

/// Description of a FreeType status code, after `fterrdef.h`
pub fn error_message(code: FT_Error) -> &'static str {
    match code {
        0x00 => "no error",
        0x01 => "cannot open resource",
        0x02 => "unknown file format",
        0x03 => "broken file",
        0x04 => "invalid FreeType version",
        0x05 => "module version is too low",
        0x06 => "invalid argument",
        0x07 => "unimplemented feature",
        0x08 => "broken table",
        0x09 => "broken offset within table",
        0x0A => "array allocation size too large",
        0x0B => "missing module",
        0x0C => "missing property",
        0x10 => "invalid glyph index",
        0x11 => "invalid character code",
        0x12 => "unsupported glyph image format",
        0x13 => "cannot render this glyph format",
        0x14 => "invalid outline",
        0x15 => "invalid composite glyph",
        0x16 => "too many hints",
        0x17 => "invalid pixel size",
        0x20 => "invalid object handle",
        0x21 => "invalid library handle",
        0x22 => "invalid module handle",
        0x23 => "invalid face handle",
        0x24 => "invalid size handle",
        0x25 => "invalid glyph slot handle",
        0x26 => "invalid charmap handle",
        0x27 => "invalid cache manager handle",
        0x28 => "invalid stream handle",
        0x30 => "too many modules",
        0x31 => "too many extensions",
        0x40 => "out of memory",
        0x41 => "unlisted object",
        0x51 => "cannot open stream",
        0x52 => "invalid stream seek",
        0x53 => "invalid stream skip",
        0x54 => "invalid stream read",
        0x55 => "invalid stream operation",
        0x56 => "invalid frame operation",
        0x57 => "nested frame access",
        0x58 => "invalid frame read",
        _ => "unknown error",
    }
}

fn init_error(code: FT_Error) -> EngineInitError {
    EngineInitError {
        code,
        message: error_message(code).to_string(),
    }
}

fn load_error(code: FT_Error) -> HbShapeError {
    HbShapeError::FontLoad {
        code,
        message: error_message(code).to_string(),
    }
}

/// A FreeType face that returns itself to the library under the engine lock
///
/// Faces are not thread-safe; the raw handle keeps this type on the thread
/// that opened it.
pub struct FontFace {
    engine: &'static Engine,
    raw: FT_Face,
    // Font program for memory faces; must outlive `raw`.
    _bytes: Option<Box<[u8]>>,
}

impl FontFace {
    fn new(engine: &'static Engine, raw: FT_Face, bytes: Option<Box<[u8]>>) -> Self {
        Self {
            engine,
            raw,
            _bytes: bytes,
        }
    }

    pub(crate) fn engine(&self) -> &'static Engine {
        self.engine
    }

    /// The raw face handle, valid for as long as `self`
    pub fn raw(&self) -> FT_Face {
        self.raw
    }

    fn rec(&self) -> &FT_FaceRec_ {
        // SAFETY: `raw` came from a successful `FT_New_*Face` and is only
        // released in `Drop`.
        unsafe { &*self.raw }
    }

    /// Set the nominal size in 26.6 units at FreeType's default resolution
    pub fn set_char_size(&self, char_size: FT_F26Dot6) -> Result<()> {
        // SAFETY: the face is live and owned by this thread.
        let err = unsafe { FT_Set_Char_Size(self.raw, char_size, char_size, 0, 0) };
        if freetype::succeeded(err) {
            Ok(())
        } else {
            Err(HbShapeError::CharSize {
                code: err,
                message: error_message(err).to_string(),
            })
        }
    }

    /// Metrics of the active size, if one has been set
    pub fn size_metrics(&self) -> Option<FT_Size_Metrics> {
        let size = self.rec().size;
        if size.is_null() {
            return None;
        }
        // SAFETY: a non-null `size` is owned by the live face.
        Some(unsafe { (*size).metrics })
    }

    pub fn units_per_em(&self) -> u16 {
        self.rec().units_per_EM
    }

    pub fn num_glyphs(&self) -> u32 {
        u32::try_from(self.rec().num_glyphs).unwrap_or(0)
    }

    pub fn family_name(&self) -> Option<String> {
        c_name(self.rec().family_name)
    }

    pub fn style_name(&self) -> Option<String> {
        c_name(self.rec().style_name)
    }
}

fn c_name(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: FreeType names are NUL-terminated and live as long as the face.
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

impl Drop for FontFace {
    fn drop(&mut self) {
        let _guard = self.engine.lock();
        // SAFETY: `raw` is never touched again after this point; the font
        // bytes are released after the face.
        let err = unsafe { FT_Done_Face(self.raw) };
        if !freetype::succeeded(err) {
            log::warn!("Releasing face failed: {}", error_message(err));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_engine_initializes_once() {
        let first = engine().map(|e| e as *const Engine);
        let second = engine().map(|e| e as *const Engine);
        assert_eq!(first, second);
        assert!(engine_status().is_ok());
    }

    #[test]
    fn test_failed_init_is_kept_and_returned() {
        static SLOT: OnceLock<std::result::Result<u8, EngineInitError>> = OnceLock::new();
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        let failing = || {
            CALLS.fetch_add(1, Ordering::SeqCst);
            Err(init_error(0x40))
        };

        for _ in 0..3 {
            let err = resolve(&SLOT, failing).unwrap_err();
            assert_eq!(err.code, 0x40);
            assert_eq!(err.message, "out of memory");
        }
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(error_message(0x02), "unknown file format");
        assert_eq!(error_message(0x17), "invalid pixel size");
        assert_eq!(error_message(0x7F), "unknown error");
    }

    #[test]
    fn test_memory_face_rejects_garbage() {
        let engine = engine().unwrap();
        let err = engine.open_memory(vec![0u8; 100], 0).err().unwrap();
        assert!(matches!(err, HbShapeError::FontLoad { code, .. } if code != 0));
    }

    #[test]
    fn test_missing_file_reports_status() {
        let engine = engine().unwrap();
        let err = engine
            .open_file(Path::new("/nonexistent/hbshape/font.ttf"), 0)
            .err()
            .unwrap();
        assert!(matches!(err, HbShapeError::FontLoad { code, .. } if code != 0));
    }

    #[test]
    fn test_nul_in_path_is_a_load_error() {
        let engine = engine().unwrap();
        let err = engine.open_file(Path::new("bad\0name.ttf"), 0).err().unwrap();
        assert!(matches!(err, HbShapeError::FontLoad { code: CANNOT_OPEN_RESOURCE, .. }));
    }
}
