// This file is part of the syzygy-bridge library.
// Copyright (C) 2017-2018 Niklas Fiekas <niklas.fiekas@backscattering.de>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

use std::ffi::{CString, OsStr};

use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::{
    codec::{self, PackedResult},
    engine::NativeEngine,
    errors::{SyzygyError, SyzygyResult},
    fathom::{self, Fathom, Locator},
    position::TbPosition,
    types::{DtzProbe, LoadState, Wdl},
};

/// Supported size after a failed [`Session::load()`].
pub const LOAD_FAILED: i32 = -1;

/// Access to tablebases through a native engine.
///
/// The engine is bound when the session is created, and tablebase files are
/// loaded at most once with [`Session::load()`]. Availability checks are
/// lock-free and can be used on every node of a search.
///
/// The native engine keeps its tables in process-wide state. Use
/// [`Session::open()`], which hands out the same session on every call.
#[derive(Debug)]
pub struct Session<E = &'static Fathom> {
    engine: Option<E>,
    supported: OnceCell<i32>,
}

static SESSION: OnceCell<Session> = OnceCell::new();

impl Session {
    /// The process-wide session, using the process-wide Fathom binding, see
    /// [`fathom::bind()`].
    ///
    /// Every call returns the same session, so tablebases are loaded at
    /// most once per process. If Fathom cannot be bound, the session is
    /// unbound and tablebases are never available.
    pub fn open() -> &'static Session {
        Session::shared(&SESSION, fathom::bind)
    }
}

impl Session<Fathom> {
    /// Creates a session with a Fathom library from the given locations.
    ///
    /// The session is independent of [`Session::open()`]. Loading the same
    /// library through both would initialize its tables twice.
    pub fn open_with(locator: &Locator) -> Session<Fathom> {
        match Fathom::locate(locator) {
            Ok(fathom) => Session::with_engine(fathom),
            Err(err) => {
                warn!(%err, "unable to bind fathom, tablebases unavailable");
                Session::unbound()
            }
        }
    }
}

impl<E: NativeEngine> Session<E> {
    fn shared(
        cell: &'static OnceCell<Session<E>>,
        bind: impl FnOnce() -> Option<E>,
    ) -> &'static Session<E> {
        cell.get_or_init(|| Session {
            engine: bind(),
            supported: OnceCell::new(),
        })
    }

    /// Creates an independent session around an already bound engine.
    pub fn with_engine(engine: E) -> Session<E> {
        Session {
            engine: Some(engine),
            supported: OnceCell::new(),
        }
    }

    /// Creates a session without an engine.
    pub fn unbound() -> Session<E> {
        Session {
            engine: None,
            supported: OnceCell::new(),
        }
    }

    /// Loads tablebase files from `path`.
    ///
    /// `path` is handed to the engine as is. Fathom accepts a list of
    /// directories separated by `:` (`;` on Windows).
    ///
    /// Returns the largest number of pieces supported by the loaded tables,
    /// or [`LOAD_FAILED`].
    ///
    /// Only the first call does any work, even if it fails. Later calls
    /// return the same value. Concurrent first calls block until the
    /// winning call has finished.
    pub fn load<P: AsRef<OsStr>>(&self, path: P) -> i32 {
        let path = path.as_ref();
        info!(path = %path.to_string_lossy(), "loading syzygy tablebases");

        let mut initialized = false;
        let size = *self.supported.get_or_init(|| {
            initialized = true;
            self.init(path)
        });

        if !initialized {
            if size == LOAD_FAILED {
                warn!("syzygy tablebases failed to load before, not retrying");
            } else {
                warn!(size, "syzygy tablebases are already loaded");
            }
        }

        size
    }

    fn init(&self, path: &OsStr) -> i32 {
        let Some(engine) = &self.engine else {
            warn!("fathom is not bound, cannot load syzygy tablebases");
            return LOAD_FAILED;
        };

        let Ok(c_path) = CString::new(path.as_encoded_bytes()) else {
            warn!(path = %path.to_string_lossy(), "tablebase path contains a nul byte");
            return LOAD_FAILED;
        };

        if engine.init(&c_path) {
            let largest = engine.largest();
            info!(largest, "loaded syzygy tablebases");
            i32::try_from(largest).unwrap_or(i32::MAX)
        } else {
            warn!(path = %path.to_string_lossy(), "unable to load syzygy tablebases");
            LOAD_FAILED
        }
    }

    /// Whether the native engine is bound, regardless of whether any
    /// tablebase files are loaded.
    #[inline]
    pub fn is_lib_loaded(&self) -> bool {
        self.engine.is_some()
    }

    /// `0` before loading, [`LOAD_FAILED`] after a failed load, otherwise
    /// the largest number of pieces supported by the loaded tables.
    #[inline]
    pub fn supported_size(&self) -> i32 {
        self.supported.get().copied().unwrap_or(0)
    }

    /// Same as [`Session::supported_size()`], as a [`LoadState`].
    pub fn state(&self) -> LoadState {
        LoadState::from_supported_size(self.supported_size())
    }

    /// Whether positions with `pieces` pieces (including kings) can be
    /// probed.
    #[inline]
    pub fn is_available(&self, pieces: usize) -> bool {
        self.is_lib_loaded()
            && usize::try_from(self.supported_size()).is_ok_and(|supported| pieces <= supported)
    }

    fn engine_for(&self, pos: &TbPosition) -> SyzygyResult<&E> {
        let engine = self.engine.as_ref().ok_or(SyzygyError::Unbound)?;

        let supported = self.supported_size();
        if supported <= 0 {
            return Err(SyzygyError::NotLoaded);
        }

        let pieces = pos.piece_count();
        if !self.is_available(pieces) {
            return Err(SyzygyError::TooManyPieces { pieces, supported });
        }

        Ok(engine)
    }

    /// Probes the raw WDL result. The halfmove clock is ignored.
    ///
    /// # Errors
    ///
    /// Errors if the session cannot probe a position of this size.
    pub fn probe_wdl_raw(&self, pos: &TbPosition) -> SyzygyResult<PackedResult> {
        let engine = self.engine_for(pos)?;
        Ok(PackedResult(engine.probe_wdl(&codec::pack(pos))))
    }

    /// Probes the raw packed DTZ result.
    ///
    /// # Errors
    ///
    /// Errors if the session cannot probe a position of this size.
    pub fn probe_dtz_raw(&self, pos: &TbPosition) -> SyzygyResult<PackedResult> {
        let engine = self.engine_for(pos)?;
        Ok(PackedResult(engine.probe_root(&codec::pack(pos))))
    }

    /// Probes the [`Wdl`] value of a position, assuming the 50-move counter
    /// was just reset.
    ///
    /// # Errors
    ///
    /// See [`SyzygyError`] for possible error conditions.
    pub fn probe_wdl(&self, pos: &TbPosition) -> SyzygyResult<Wdl> {
        Ok(self.probe_wdl_raw(pos)?.decode_wdl()?)
    }

    /// Probes the best move, its outcome and the distance to zeroing.
    ///
    /// # Errors
    ///
    /// See [`SyzygyError`] for possible error conditions.
    pub fn probe_dtz(&self, pos: &TbPosition) -> SyzygyResult<DtzProbe> {
        Ok(self.probe_dtz_raw(pos)?.decode_dtz()?)
    }
}
