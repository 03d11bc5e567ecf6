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

//! Probe Syzygy tablebases through the native
//! [Fathom](https://github.com/jdart1/Fathom) library.
//!
//! Fathom is bound at runtime. If it cannot be found, tablebases are simply
//! unavailable.
//!
//! # Example
//!
//! ```no_run
//! use shakmaty::{fen::Fen, CastlingMode, Chess};
//! use syzygy_bridge::{Session, TbPosition, Wdl};
//!
//! let session = Session::open();
//! session.load("tables/regular");
//!
//! let pos: Chess = "8/8/8/8/8/8/4k3/KR6 w - - 0 1"
//!     .parse::<Fen>()?
//!     .into_position(CastlingMode::Standard)?;
//! let pos = TbPosition::from_position(&pos)?;
//!
//! if session.is_available(pos.piece_count()) {
//!     assert_eq!(session.probe_wdl(&pos)?, Wdl::Win);
//!     let probe = session.probe_dtz(&pos)?;
//!     assert_eq!(probe.dtz, 19);
//! }
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

#![doc(html_root_url = "https://docs.rs/syzygy-bridge/0.1.0")]
#![warn(missing_debug_implementations)]
#![cfg_attr(docs_rs, feature(doc_auto_cfg))]

mod errors;
mod position;
mod session;
mod types;

pub mod codec;
pub mod engine;
pub mod fathom;

pub use codec::{PackedResult, ProbeArgs};
pub use engine::NativeEngine;
pub use errors::{BindError, ProbeFailure, SyzygyError, SyzygyResult};
pub use fathom::{Fathom, Locator};
pub use position::TbPosition;
pub use session::{Session, LOAD_FAILED};
pub use types::{DtzProbe, LoadState, Metric, Wdl};
