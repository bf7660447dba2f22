//! File I/O for saving and loading solved boards.
//!
//! Binary format for `solutions.bin` (little endian):
//! - u32: board count
//! - repeat per board:
//!   - u32: lattice side
//!   - side^3 x u16: piece identifier per cell in x-major order (0 = empty)

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;

use crate::grid::{cell_count, format_board, Board};
use crate::pieces::PieceId;

pub const SOLUTIONS_BIN: &str = "solutions.bin";
pub const SOLUTIONS_TXT: &str = "solutions.txt";

/// Upper bounds on capacity reserved before the data is actually read.
const MAX_PREALLOC_BOARDS: usize = 1024;
const MAX_PREALLOC_CELLS: usize = 1 << 16;

/// Saves boards into `dir` in both binary and text form.
pub fn save(dir: &Path, boards: &[Board]) -> std::io::Result<()> {
    save_text(dir, boards)?;
    save_binary(dir, boards)?;
    debug!("saved {} boards to {}", boards.len(), dir.display());
    Ok(())
}

/// Saves boards in human-readable layered form.
fn save_text(dir: &Path, boards: &[Board]) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(dir.join(SOLUTIONS_TXT))?);
    writeln!(file, "Found {} solutions:\n", boards.len())?;
    for (i, board) in boards.iter().enumerate() {
        writeln!(file, "Solution {}:", i + 1)?;
        write!(file, "{}", format_board(board))?;
        writeln!(file)?;
    }
    file.flush()
}

/// Saves boards in compact binary form for fast loading.
fn save_binary(dir: &Path, boards: &[Board]) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(dir.join(SOLUTIONS_BIN))?);

    file.write_all(&(boards.len() as u32).to_le_bytes())?;
    for board in boards {
        file.write_all(&(board.size() as u32).to_le_bytes())?;
        for &id in board.raw_cells() {
            file.write_all(&id.to_le_bytes())?;
        }
    }

    file.flush()
}

/// Loads all boards from `dir`.
///
/// Returns `None` if the file is missing, truncated or declares a lattice
/// side whose cell count overflows.
pub fn load_all(dir: &Path) -> Option<Vec<Board>> {
    let mut file = BufReader::new(File::open(dir.join(SOLUTIONS_BIN)).ok()?);
    let mut u32_buffer = [0u8; 4];

    file.read_exact(&mut u32_buffer).ok()?;
    let board_count = u32::from_le_bytes(u32_buffer) as usize;

    // counts come from the file, so they never size an allocation directly
    let mut boards = Vec::with_capacity(board_count.min(MAX_PREALLOC_BOARDS));
    for _ in 0..board_count {
        file.read_exact(&mut u32_buffer).ok()?;
        let size = u32::from_le_bytes(u32_buffer) as usize;
        let cells_len = cell_count(size)?;

        let mut cells = Vec::with_capacity(cells_len.min(MAX_PREALLOC_CELLS));
        let mut id_buffer = [0u8; 2];
        for _ in 0..cells_len {
            file.read_exact(&mut id_buffer).ok()?;
            cells.push(PieceId::from_le_bytes(id_buffer));
        }
        boards.push(Board::from_cells(size, cells)?);
    }

    Some(boards)
}

/// Returns the number of saved boards without loading them.
pub fn count(dir: &Path) -> Option<usize> {
    let mut file = File::open(dir.join(SOLUTIONS_BIN)).ok()?;
    let mut u32_buffer = [0u8; 4];
    file.read_exact(&mut u32_buffer).ok()?;
    Some(u32::from_le_bytes(u32_buffer) as usize)
}
