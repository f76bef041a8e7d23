use std::{collections::VecDeque, io};

use crossterm::{
    cursor::{self, MoveToNextLine},
    style::Print,
    terminal, QueueableCommand,
};
use tetwist_engine::{Command, Game, Shape, TileTypeID};

use crate::keybinds_presets::{fmt_keybinds, Keybinds};

const PREVIEW_SIZE: usize = 4;

pub fn tile_str(tile: TileTypeID) -> &'static str {
    match tile.get() {
        1 => "OO",
        2 => "II",
        3 => "SS",
        4 => "ZZ",
        5 => "TT",
        6 => "LL",
        7 => "JJ",
        _ => "WW",
    }
}

/// The grid with the falling shape drawn in, one string per row.
pub fn board_lines(game: &Game) -> Vec<String> {
    let grid = game.grid();
    let mut rows = (0..grid.rows())
        .map(|row| {
            (0..grid.columns())
                .map(|column| grid.get(column, row).map_or(" .", |cell| tile_str(cell.tile)))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    if let Some(shape) = game.falling_shape() {
        for cell in shape.cells() {
            if let Some((column, row)) = grid.slot(cell.column, cell.row) {
                rows[row][column] = tile_str(cell.tile);
            }
        }
    }
    rows.into_iter().map(|row| row.concat()).collect()
}

/// The next shape, drawn relative to its anchor into a small box.
pub fn preview_lines(shape: Option<&Shape>) -> Vec<String> {
    let mut rows = [["  "; PREVIEW_SIZE]; PREVIEW_SIZE];
    if let Some(shape) = shape {
        for cell in shape.cells() {
            let column = usize::try_from(cell.column - shape.column()).ok();
            let row = usize::try_from(cell.row - shape.row()).ok();
            if let (Some(column), Some(row)) = (column, row) {
                if column < PREVIEW_SIZE && row < PREVIEW_SIZE {
                    rows[row][column] = tile_str(cell.tile);
                }
            }
        }
    }
    rows.iter().map(|row| row.concat()).collect()
}

fn side_panel(game: &Game, keybinds: &Keybinds, debug_log: &VecDeque<String>) -> Vec<String> {
    let mut panel = vec!["Next:".to_owned()];
    panel.extend(preview_lines(game.next_shape()).into_iter().map(|l| format!(" {l}")));
    panel.push(String::new());
    panel.push(format!("Score: {}", game.score()));
    panel.push(format!("Level: {}", game.level()));
    panel.push(format!("Lines: {}", game.lines_cleared()));
    panel.push(format!("Seed:  {}", game.seed()));
    panel.push(String::new());
    for (label, command) in [
        ("move left", Command::MoveLeft),
        ("move right", Command::MoveRight),
        ("rotate cw", Command::RotateClockwise),
        ("rotate ccw", Command::RotateCounterClockwise),
        ("fall", Command::Fall),
        ("drop", Command::Drop),
    ] {
        panel.push(format!("{:<10} {}", label, fmt_keybinds(command, keybinds)));
    }
    panel.push("forfeit    Ctrl+D".to_owned());
    panel.push("quit       Esc".to_owned());
    if !debug_log.is_empty() {
        panel.push(String::new());
        panel.extend(debug_log.iter().map(|msg| format!("> {msg}")));
    }
    panel
}

pub fn render(
    term: &mut impl io::Write,
    game: &Game,
    keybinds: &Keybinds,
    debug_log: &VecDeque<String>,
) -> io::Result<()> {
    let border = format!("   +{}+", "--".repeat(game.grid().columns()));
    let panel = side_panel(game, keybinds, debug_log);
    let mut panel_lines = panel.iter();

    term.queue(cursor::MoveTo(0, 0))?
        .queue(terminal::Clear(terminal::ClearType::FromCursorDown))?;
    term.queue(Print(&border))?.queue(MoveToNextLine(1))?;
    for (idx, line) in board_lines(game).into_iter().enumerate() {
        let side = panel_lines.next().map_or("", String::as_str);
        term.queue(Print(format!("{idx:02} |{line}|  {side}")))?
            .queue(MoveToNextLine(1))?;
    }
    term.queue(Print(&border))?.queue(MoveToNextLine(1))?;
    for side in panel_lines {
        term.queue(Print(format!("{:w$}{side}", "", w = border.len() + 2)))?
            .queue(MoveToNextLine(1))?;
    }
    term.flush()
}
