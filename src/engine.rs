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

//! Trait to provide a custom probing engine.

use std::ffi::CStr;

use crate::codec::ProbeArgs;

/// A native tablebase probing engine.
///
/// A [`Session`](crate::Session) calls [`NativeEngine::init()`] at most once
/// and only probes after it succeeded. Implementations may rely on that.
pub trait NativeEngine: Send + Sync {
    /// Initializes the engine with tablebase files from `path`.
    ///
    /// Returns `false` on failure.
    fn init(&self, path: &CStr) -> bool;

    /// The largest number of pieces covered by the loaded tables. Only
    /// meaningful after a successful [`NativeEngine::init()`].
    fn largest(&self) -> u32;

    /// Probes the WDL table. Returns the outcome ordinal or the engine's
    /// failure sentinel.
    ///
    /// [`ProbeArgs::rule50`] is ignored.
    fn probe_wdl(&self, args: &ProbeArgs) -> u32;

    /// Probes the DTZ table at the root. Returns a packed result.
    fn probe_root(&self, args: &ProbeArgs) -> u32;
}

impl<T: NativeEngine + ?Sized> NativeEngine for &T {
    fn init(&self, path: &CStr) -> bool {
        (**self).init(path)
    }

    fn largest(&self) -> u32 {
        (**self).largest()
    }

    fn probe_wdl(&self, args: &ProbeArgs) -> u32 {
        (**self).probe_wdl(args)
    }

    fn probe_root(&self, args: &ProbeArgs) -> u32 {
        (**self).probe_root(args)
    }
}
