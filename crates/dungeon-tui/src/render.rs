use crate::app::{App, Mode};
use crate::glyphs::GlyphPolicy;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use dungeon_core::Position;
use std::io;

/// Terminal columns per grid cell: the glyph plus a gap
const CELL: u16 = 3;
/// Columns taken by the row target on the left
const LABEL: u16 = 4;

/// A count as a terminal offset, pinned at the edge of the coordinate range.
fn offset(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Columns and lines the framed grid takes, labels and count rows included.
fn grid_extent(n_rows: usize, n_cols: usize) -> (u16, u16) {
    let width = offset(n_cols)
        .saturating_mul(CELL)
        .saturating_add(2 * LABEL);
    let height = offset(n_rows).saturating_add(2);
    (width, height)
}

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, _term_height) = terminal::size()?;

    execute!(
        stdout,
        Hide,
        SetBackgroundColor(app.theme.bg),
        Clear(ClearType::All)
    )?;

    let (grid_width, grid_height) = grid_extent(app.session.n_rows(), app.session.n_cols());

    // Center the grid horizontally, leave room for info panel
    let total_width = grid_width.saturating_add(25);
    let start_x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let start_y = 2;

    render_grid(stdout, app, start_x, start_y)?;

    let info_x = start_x.saturating_add(grid_width).saturating_add(3);
    render_info_panel(stdout, app, info_x, start_y)?;

    let controls_y = (start_y + 1).saturating_add(grid_height.max(10));
    render_controls(stdout, app, start_x, controls_y)?;

    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, term_width)?;
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn render_grid(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let session = &app.session;
    let counts = session.count_walls();

    // Layout, targets outside and current wall counts inside the frame:
    //       1  0  2
    //    1  -  .  .   1
    //    0  .  .  .   0
    //       1  0  0
    execute!(stdout, MoveTo(x + LABEL, y))?;
    for target in session.col_targets() {
        execute!(
            stdout,
            SetForegroundColor(theme.border),
            Print(format!("{:<3}", target))
        )?;
    }

    for (row, target) in session.row_targets().iter().enumerate() {
        let cell_y = (y + 1).saturating_add(offset(row));
        execute!(
            stdout,
            MoveTo(x, cell_y),
            SetBackgroundColor(theme.bg),
            SetForegroundColor(theme.border),
            Print(format!("{:>3} ", target))
        )?;

        for col in 0..session.n_cols() {
            render_cell(stdout, app, Position::new(row, col))?;
        }

        let found = counts.rows[row];
        let color = if found == *target { theme.success } else { theme.error };
        execute!(
            stdout,
            SetBackgroundColor(theme.bg),
            SetForegroundColor(color),
            Print(format!(" {}", found))
        )?;
    }

    let counts_y = (y + 1).saturating_add(offset(session.n_rows()));
    execute!(stdout, MoveTo(x + LABEL, counts_y))?;
    for (found, target) in counts.cols.iter().zip(session.col_targets()) {
        let color = if found == target { theme.success } else { theme.error };
        execute!(
            stdout,
            SetForegroundColor(color),
            Print(format!("{:<3}", found))
        )?;
    }

    Ok(())
}

fn render_cell(stdout: &mut io::Stdout, app: &App, pos: Position) -> io::Result<()> {
    let theme = &app.theme;
    let Some(tile) = app.session.tile(pos) else {
        return Ok(());
    };

    let failed_here = app
        .verdict
        .as_ref()
        .and_then(|v| v.failure.as_ref())
        .and_then(|f| f.position())
        == Some(pos);
    let bg = if pos == app.cursor {
        theme.selected_bg
    } else {
        theme.bg
    };
    let fg = if failed_here {
        theme.error
    } else {
        theme.tile(tile.kind())
    };

    let glyph = GlyphPolicy::pad(tile.display_with(&app.glyphs));
    execute!(
        stdout,
        SetBackgroundColor(bg),
        SetForegroundColor(fg),
        Print(glyph),
        SetBackgroundColor(theme.bg),
        Print(" ")
    )?;

    Ok(())
}

fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let session = &app.session;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    // Title
    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.key),
        Print("═══ DUNGEON ═══")
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 2),
        SetForegroundColor(theme.fg),
        Print(session.name())
    )?;

    let mode = match session.mode() {
        Mode::Solving => "Solving",
        Mode::Authoring => "Authoring",
    };
    execute!(
        stdout,
        MoveTo(x, y + 4),
        SetForegroundColor(theme.info),
        Print(format!("Mode: {:>9}", mode))
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 5),
        SetForegroundColor(theme.info),
        Print(format!(
            "Size: {:>9}",
            format!("{}x{}", session.n_rows(), session.n_cols())
        ))
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 6),
        SetForegroundColor(theme.info),
        Print(format!("Rules: {:>8}", format!("{:?}", app.validator.rules())))
    )?;

    if let Some(verdict) = &app.verdict {
        let (color, label) = if verdict.solved {
            (theme.success, "Solved")
        } else {
            (theme.error, "Not solved")
        };
        execute!(
            stdout,
            MoveTo(x, y + 8),
            SetForegroundColor(color),
            Print(label)
        )?;
        for (i, check) in verdict.unchecked.iter().enumerate() {
            execute!(
                stdout,
                MoveTo(x, (y + 9).saturating_add(offset(i))),
                SetForegroundColor(theme.info),
                Print(format!("unchecked: {}", check))
            )?;
        }
    }

    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let controls: &[(&str, &str)] = match app.session.mode() {
        Mode::Solving => &[
            ("hjkl/Arrows", "Move"),
            ("Space", "Wall"),
            ("x", "Mark"),
            ("U", "Clear marks"),
            ("u", "Reset"),
            ("c", "Check"),
            ("s", "Save"),
            ("t", "Theme"),
            ("Tab", "Author"),
            ("q", "Quit"),
        ],
        Mode::Authoring => &[
            ("Arrows", "Move"),
            ("any key", "Place glyph"),
            ("Del", "Floor"),
            ("^Arrows", "Resize"),
            ("^R", "Recount"),
            ("^K", "Check"),
            ("^S", "Save"),
            ("Tab", "Solve"),
            ("^Q", "Quit"),
        ],
    };

    // Display in columns of 4 items
    for (i, (key, desc)) in controls.iter().enumerate() {
        let col = i / 4;
        let row = i % 4;
        let cx = x.saturating_add(offset(col).saturating_mul(24));
        let cy = y.saturating_add(offset(row));

        execute!(
            stdout,
            MoveTo(cx, cy),
            SetForegroundColor(theme.key),
            Print(format!("{:>11}", key)),
            SetForegroundColor(theme.info),
            Print(format!(" {}", desc))
        )?;
    }

    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    term_width: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let padded = format!("  {}  ", msg);
    let x = term_width.saturating_sub(offset(padded.chars().count())) / 2;

    execute!(
        stdout,
        MoveTo(x, 0),
        SetForegroundColor(theme.fg),
        SetBackgroundColor(theme.selected_bg),
        Print(&padded)
    )?;

    Ok(())
}
