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

use std::{error::Error, ffi::OsString, fmt, path::PathBuf};

use crate::{codec::PackedResult, types::Metric};

pub type SyzygyResult<T> = Result<T, SyzygyError>;

/// Error when probing through a [`Session`](crate::Session).
#[derive(Debug)]
pub enum SyzygyError {
    /// The native engine is not bound, so nothing can be probed.
    Unbound,
    /// No tablebase files are loaded, either because
    /// [`Session::load()`](crate::Session::load) was never called or
    /// because it failed.
    NotLoaded,
    /// Position has castling rights, but Syzygy tables do not contain
    /// positions with castling rights.
    Castling,
    /// Position has more pieces than the loaded tables support.
    TooManyPieces {
        #[allow(missing_docs)]
        pieces: usize,
        #[allow(missing_docs)]
        supported: i32,
    },
    /// The native engine could not produce a result.
    ProbeFailed(ProbeFailure),
}

impl fmt::Display for SyzygyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyzygyError::Unbound => f.write_str("tablebase engine is not bound"),
            SyzygyError::NotLoaded => f.write_str("no tablebases loaded"),
            SyzygyError::Castling => write!(
                f,
                "syzygy tables do not contain position with castling rights"
            ),
            SyzygyError::TooManyPieces { pieces, supported } => write!(
                f,
                "too many pieces: {pieces} (tables support up to {supported})"
            ),
            SyzygyError::ProbeFailed(failure) => write!(f, "probe failed: {failure}"),
        }
    }
}

impl Error for SyzygyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SyzygyError::ProbeFailed(failure) => Some(failure),
            _ => None,
        }
    }
}

impl From<ProbeFailure> for SyzygyError {
    fn from(failure: ProbeFailure) -> SyzygyError {
        SyzygyError::ProbeFailed(failure)
    }
}

/// The native engine returned a value that is not a valid result, usually
/// its failure sentinel for positions outside of the loaded tables.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProbeFailure {
    pub metric: Metric,
    pub raw: PackedResult,
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.raw.is_failed() {
            write!(f, "{} probe returned the failure sentinel", self.metric)
        } else {
            write!(f, "{} probe returned invalid result {:#010x}", self.metric, self.raw.raw())
        }
    }
}

impl Error for ProbeFailure {}

/// Error when binding the native engine.
#[derive(Debug)]
pub enum BindError {
    /// The library could not be loaded from any candidate location.
    NotFound {
        #[allow(missing_docs)]
        name: OsString,
        #[allow(missing_docs)]
        attempts: Vec<(PathBuf, libloading::Error)>,
    },
    /// The library at `path` could not be loaded.
    Library {
        #[allow(missing_docs)]
        path: PathBuf,
        #[allow(missing_docs)]
        error: libloading::Error,
    },
    /// The library was loaded, but does not export a required symbol.
    Symbol {
        #[allow(missing_docs)]
        path: PathBuf,
        #[allow(missing_docs)]
        symbol: &'static str,
        #[allow(missing_docs)]
        error: libloading::Error,
    },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::NotFound { name, attempts } => {
                write!(f, "unable to load {}", name.to_string_lossy())?;
                for (path, error) in attempts {
                    write!(f, "; {}: {}", path.display(), error)?;
                }
                Ok(())
            }
            BindError::Library { path, error } => {
                write!(f, "unable to load {}: {}", path.display(), error)
            }
            BindError::Symbol {
                path,
                symbol,
                error,
            } => write!(f, "{} does not export {}: {}", path.display(), symbol, error),
        }
    }
}

impl Error for BindError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BindError::NotFound { attempts, .. } => attempts
                .last()
                .map(|(_, error)| error as &(dyn Error + 'static)),
            BindError::Library { error, .. } | BindError::Symbol { error, .. } => Some(error),
        }
    }
}
