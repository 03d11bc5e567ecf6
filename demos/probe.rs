use std::{error::Error, path::PathBuf};

use clap::Parser;
use shakmaty::{fen::Fen, CastlingMode, Chess};
use syzygy_bridge::{Fathom, Locator, Session, TbPosition};

#[derive(Debug, Parser)]
struct Opt {
    /// Path to the Fathom shared library. Searched in the default
    /// locations if omitted.
    #[arg(long)]
    library: Option<PathBuf>,
    /// Tablebase directories, separated like PATH
    #[arg(long)]
    path: String,
    /// The position to probe
    fen: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let opt = Opt::parse();

    let session = match opt.library {
        Some(library) => {
            let fathom = Fathom::open(library)?;
            println!("library: {}", fathom.path().display());
            Session::with_engine(fathom)
        }
        None => Session::open_with(&Locator::default()),
    };
    if !session.is_lib_loaded() {
        return Err("fathom not found".into());
    }

    let pieces = session.load(&opt.path);
    println!("supported pieces: {pieces}");

    let chess: Chess = opt
        .fen
        .parse::<Fen>()?
        .into_position(CastlingMode::Standard)?;
    let pos = TbPosition::from_position(&chess)?;

    if !session.is_available(pos.piece_count()) {
        return Err(format!("no tables for {} pieces", pos.piece_count()).into());
    }

    let wdl = session.probe_wdl(&pos)?;
    let probe = session.probe_dtz(&pos)?;

    println!("wdl: {wdl:?}");
    println!("dtz: {}", probe.dtz);
    match probe.to_move(&chess) {
        Some(m) => println!(
            "best move: {}{}{} ({:?})",
            probe.from,
            probe.to,
            probe.promotion.map_or(String::new(), |role| role.char().to_string()),
            m.role()
        ),
        None if probe.is_terminal() => println!("best move: (none, game over)"),
        None => println!("best move: {}{} (not legal here)", probe.from, probe.to),
    }

    Ok(())
}
