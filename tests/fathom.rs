//! Probes a real Fathom build. Requires `FATHOM_LIBRARY` (path to the shared
//! library) and `SYZYGY_PATH` (a directory with exactly the 3-piece tables).

use std::env;

use shakmaty::{Bitboard, Color, Square};
use syzygy_bridge::{Fathom, LoadState, Session, TbPosition, Wdl};

fn krk() -> TbPosition {
    TbPosition {
        white: Bitboard(3),
        black: Bitboard(4096),
        kings: Bitboard(4097),
        queens: Bitboard(0),
        rooks: Bitboard(2),
        bishops: Bitboard(0),
        knights: Bitboard(0),
        pawns: Bitboard(0),
        ep: None,
        turn: Color::White,
        halfmoves: 0,
    }
}

#[test]
#[ignore = "requires a Fathom build and 3-piece tables"]
fn test_krk() {
    let library = env::var_os("FATHOM_LIBRARY").expect("FATHOM_LIBRARY");
    let tables = env::var_os("SYZYGY_PATH").expect("SYZYGY_PATH");

    let session = Session::with_engine(Fathom::open(library).expect("bind fathom"));
    assert!(session.is_lib_loaded());

    assert_eq!(session.load(&tables), 3);
    assert_eq!(session.load(&tables), 3);
    assert_eq!(session.state(), LoadState::Loaded(3));

    assert!(session.is_available(3));
    assert!(!session.is_available(4));

    assert_eq!(session.probe_wdl(&krk()).expect("probe wdl"), Wdl::Win);

    let raw = session.probe_dtz_raw(&krk()).expect("probe dtz");
    assert_eq!(raw.raw(), 19924244);

    let probe = raw.decode_dtz().expect("valid result");
    assert_eq!(probe.wdl, Wdl::Win);
    assert_eq!(probe.from, Square::B1);
    assert_eq!(probe.to, Square::B3);
    assert_eq!(probe.promotion, None);
    assert_eq!(probe.dtz, 19);
}
