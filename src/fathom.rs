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

//! Binding to a shared build of [Fathom](https://github.com/jdart1/Fathom).
//!
//! The library must export `tb_init`, `TB_LARGEST`, `tb_probe_wdl_impl`
//! and `tb_probe_root_impl`, which is the case for a plain build of
//! `tbprobe.c`, e.g.
//!
//! ```text
//! gcc -std=gnu99 -O2 -DTB_USE_ATOMIC -fPIC -shared -o libfathom.so tbprobe.c
//! ```

use std::{
    env,
    ffi::{c_char, c_uint, CStr, OsStr, OsString},
    path::{Path, PathBuf},
    ptr,
};

use libloading::Library;
use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::{codec::ProbeArgs, engine::NativeEngine, errors::BindError};

type InitFn = unsafe extern "C" fn(path: *const c_char) -> bool;

type ProbeWdlFn = unsafe extern "C" fn(
    white: u64,
    black: u64,
    kings: u64,
    queens: u64,
    rooks: u64,
    bishops: u64,
    knights: u64,
    pawns: u64,
    ep: c_uint,
    turn: bool,
) -> c_uint;

type ProbeRootFn = unsafe extern "C" fn(
    white: u64,
    black: u64,
    kings: u64,
    queens: u64,
    rooks: u64,
    bishops: u64,
    knights: u64,
    pawns: u64,
    rule50: c_uint,
    ep: c_uint,
    turn: bool,
    results: *mut c_uint,
) -> c_uint;

/// Where to look for the Fathom library.
///
/// Candidates are tried in order: each configured directory, then the bare
/// library name, which leaves the search to the platform loader.
#[derive(Debug, Clone)]
pub struct Locator {
    name: OsString,
    dirs: Vec<PathBuf>,
    system: bool,
}

impl Default for Locator {
    /// Looks next to the current executable, then in its `resources`
    /// subdirectory, then on the system search path.
    fn default() -> Locator {
        let mut locator = Locator::new();
        if let Some(dir) = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_owned))
        {
            locator = locator.dir(&dir).dir(dir.join("resources"));
        }
        locator
    }
}

impl Locator {
    /// A locator for the platform specific file name of `fathom` (e.g.
    /// `libfathom.so`), searching only the system search path.
    pub fn new() -> Locator {
        Locator {
            name: libloading::library_filename("fathom"),
            dirs: Vec::new(),
            system: true,
        }
    }

    /// Overrides the library file name.
    pub fn library_name<S: AsRef<OsStr>>(mut self, name: S) -> Locator {
        self.name = name.as_ref().to_owned();
        self
    }

    /// Appends a directory to search.
    pub fn dir<P: AsRef<Path>>(mut self, dir: P) -> Locator {
        self.dirs.push(dir.as_ref().to_owned());
        self
    }

    /// Whether to finally hand the bare library name to the platform loader.
    pub fn system_search_path(mut self, system: bool) -> Locator {
        self.system = system;
        self
    }

    pub fn name(&self) -> &OsStr {
        &self.name
    }

    /// All candidate paths, in priority order.
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut candidates: Vec<PathBuf> = self.dirs.iter().map(|dir| dir.join(&self.name)).collect();
        if self.system {
            candidates.push(PathBuf::from(&self.name));
        }
        candidates
    }
}

/// A bound Fathom library.
#[derive(Debug)]
pub struct Fathom {
    path: PathBuf,
    init: InitFn,
    probe_wdl: ProbeWdlFn,
    probe_root: ProbeRootFn,
    largest: *const c_uint,
    // Declared last, so that it is dropped after everything pointing into it.
    _library: Library,
}

// SAFETY: The function pointers and `largest` point into `_library`, which
// lives as long as `self`. Fathom itself is safe to probe from multiple
// threads, and `Session` serializes `init`.
unsafe impl Send for Fathom {}
unsafe impl Sync for Fathom {}

fn resolve<T: Copy>(library: &Library, path: &Path, symbol: &'static str) -> Result<T, BindError> {
    // SAFETY: The caller picks `T` to match the exported symbol.
    unsafe { library.get::<T>(symbol.as_bytes()) }
        .map(|s| *s)
        .map_err(|error| BindError::Symbol {
            path: path.to_owned(),
            symbol,
            error,
        })
}

impl Fathom {
    /// Loads the library at `path` and resolves all required symbols.
    ///
    /// # Errors
    ///
    /// Errors if the library cannot be loaded or lacks a symbol.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Fathom, BindError> {
        let path = path.as_ref();

        // SAFETY: Loading Fathom runs no initialization routines with
        // preconditions.
        let library = unsafe { Library::new(path) }.map_err(|error| BindError::Library {
            path: path.to_owned(),
            error,
        })?;

        Ok(Fathom {
            path: path.to_owned(),
            init: resolve(&library, path, "tb_init")?,
            probe_wdl: resolve(&library, path, "tb_probe_wdl_impl")?,
            probe_root: resolve(&library, path, "tb_probe_root_impl")?,
            largest: resolve(&library, path, "TB_LARGEST")?,
            _library: library,
        })
    }

    /// Tries each candidate of `locator`, returning the first library that
    /// binds.
    ///
    /// # Errors
    ///
    /// Errors with [`BindError::NotFound`] if no candidate binds.
    pub fn locate(locator: &Locator) -> Result<Fathom, BindError> {
        let mut attempts = Vec::new();

        for candidate in locator.candidates() {
            // Only bare names are resolved by the platform loader.
            if candidate.components().count() > 1 && !candidate.exists() {
                debug!(path = %candidate.display(), "fathom not found");
                continue;
            }

            debug!(path = %candidate.display(), "trying to bind fathom");
            match Fathom::open(&candidate) {
                Ok(fathom) => {
                    info!(path = %candidate.display(), "bound fathom");
                    return Ok(fathom);
                }
                Err(BindError::Library { path, error } | BindError::Symbol { path, error, .. }) => {
                    debug!(path = %path.display(), %error, "unable to bind fathom");
                    attempts.push((path, error));
                }
                Err(err) => return Err(err),
            }
        }

        Err(BindError::NotFound {
            name: locator.name().to_owned(),
            attempts,
        })
    }

    /// The path the library was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NativeEngine for Fathom {
    fn init(&self, path: &CStr) -> bool {
        // SAFETY: `path` is a valid C string for the duration of the call.
        unsafe { (self.init)(path.as_ptr()) }
    }

    fn largest(&self) -> u32 {
        // SAFETY: Points to a global of the loaded library.
        unsafe { ptr::read_volatile(self.largest) }
    }

    fn probe_wdl(&self, args: &ProbeArgs) -> u32 {
        // SAFETY: Only called after a successful init.
        unsafe {
            (self.probe_wdl)(
                args.white,
                args.black,
                args.kings,
                args.queens,
                args.rooks,
                args.bishops,
                args.knights,
                args.pawns,
                args.ep,
                args.turn,
            )
        }
    }

    fn probe_root(&self, args: &ProbeArgs) -> u32 {
        // SAFETY: Only called after a successful init. Fathom accepts a null
        // results buffer.
        unsafe {
            (self.probe_root)(
                args.white,
                args.black,
                args.kings,
                args.queens,
                args.rooks,
                args.bishops,
                args.knights,
                args.pawns,
                args.rule50,
                args.ep,
                args.turn,
                ptr::null_mut(),
            )
        }
    }
}

static FATHOM: OnceCell<Option<Fathom>> = OnceCell::new();

/// Binds Fathom from the default [`Locator`] locations.
///
/// Binding is attempted only on the first call. The outcome, success or
/// failure, is kept for the lifetime of the process.
pub fn bind() -> Option<&'static Fathom> {
    FATHOM
        .get_or_init(|| match Fathom::locate(&Locator::default()) {
            Ok(fathom) => Some(fathom),
            Err(err) => {
                warn!(%err, "unable to bind fathom, tablebases unavailable");
                None
            }
        })
        .as_ref()
}
