/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// The renderer only ever sees a `ViewModel`; it knows nothing about
/// transitions or the clock.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::board::{COLUMNS, ROWS};
use crate::domain::direction::Direction;
use crate::domain::geometry::Vec2;
use crate::error::Result;
use crate::sim::state::Mode;
use crate::sim::view::ViewModel;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: [u8; 4],
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool,    // occupies 2 terminal columns
    cont: bool,    // right half of a wide char (skip render)
}

impl Cell {
    const BASE_BG: Color = Color::Rgb { r: 87, g: 138, b: 52 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0, 0, 0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    const WIDE_CONT: Cell = Cell {
        ch: [0; 4],
        ch_len: 0,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: true,
    };

    /// Sentinel used to invalidate the back buffer so every position is diff'd.
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        cell.ch_len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.fg = fg;
        cell.bg = bg;
        cell
    }

    fn from_char_wide(c: char, bg: Color) -> Self {
        let mut cell = Self::from_char(c, Color::White, bg);
        cell.wide = true;
        cell
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or("?")
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Wide char at (x, y) plus its continuation cell.
    fn set_wide(&mut self, x: usize, y: usize, c: char, bg: Color) {
        if x + 1 < self.width {
            self.set(x, y, Cell::from_char_wide(c, bg));
            self.set(x + 1, y, Cell::WIDE_CONT);
        }
    }

    /// Write a string at (x, y). Each char occupies 1 column.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::from_char(ch, fg, bg));
        }
    }
}

// ── Layout ──

/// Each board cell is 2 terminal columns, which roughly squares it up
/// and leaves room for half-cell horizontal motion.
const CELL_W: usize = 2;

const BOARD_W: usize = COLUMNS as usize * CELL_W;
const BOARD_H: usize = ROWS as usize;

const HUD_ROW: usize = 0;
const BOARD_ROW: usize = 2;
const HELP_ROW: usize = BOARD_ROW + BOARD_H + 1;
/// Board row of the idle banner, clear of the starting snake.
const BANNER_Y: usize = 11;

// ── Palette ──

const LIGHT_CHECKER: Color = Color::Rgb { r: 170, g: 215, b: 81 };
const DARK_CHECKER: Color = Color::Rgb { r: 162, g: 209, b: 73 };
const SNAKE: Color = Color::Rgb { r: 78, g: 124, b: 246 };
const SNAKE_DARK: Color = Color::Rgb { r: 31, g: 71, b: 194 };
const APPLE_GLOW: Color = Color::Rgb { r: 231, g: 71, b: 29 };
const HUD_BG: Color = Color::Rgb { r: 74, g: 117, b: 44 };
const MODAL_BG: Color = Color::Rgb { r: 31, g: 71, b: 194 };

/// Frames per half-period of the apple pulse.
const APPLE_PULSE_FRAMES: u32 = 20;

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_mode: Option<Mode>,
    frame: u32,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_mode: None,
            frame: 0,
        }
    }

    pub fn init(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);
        Ok(())
    }

    pub fn cleanup(&mut self) -> Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn render(&mut self, view: &ViewModel, show_help: bool) -> Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Mode change → full repaint for a clean transition
        if self.last_mode != Some(view.mode) {
            self.back.cells.fill(Cell::INVALID);
            self.last_mode = Some(view.mode);
        }

        self.frame = self.frame.wrapping_add(1);
        self.compose(view, show_help);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        self.back.cells.fill(Cell::INVALID);
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    /// Left edge of the board, centred when the terminal is wide enough.
    fn board_left(&self) -> usize {
        self.front.width.saturating_sub(BOARD_W) / 2
    }

    fn compose(&mut self, v: &ViewModel, show_help: bool) {
        self.front.clear();
        self.compose_hud(v);
        self.compose_board();
        self.compose_apple(v);
        self.compose_snake(v);

        match v.mode {
            Mode::Idle => self.compose_banner("Arrows / WASD to start", SNAKE_DARK),
            Mode::GameOver => self.compose_game_over(v),
            Mode::Play => {}
        }

        if show_help && HELP_ROW < self.front.height {
            let help = "Arrows/WASD: Turn   Enter/R: Play again   Esc/Q: Quit";
            self.front.put_str(self.board_left(), HELP_ROW, help, Color::Rgb{r:220,g:235,b:200}, Cell::BASE_BG);
        }
    }

    fn compose_hud(&mut self, v: &ViewModel) {
        let left = self.board_left();
        for x in left..left + BOARD_W {
            self.front.set(x, HUD_ROW, Cell::from_char(' ', Color::White, HUD_BG));
        }
        self.front.set_wide(left + 1, HUD_ROW, '🍎', HUD_BG);
        self.front.put_str(left + 4, HUD_ROW, &v.score.to_string(), Color::White, HUD_BG);
        self.front.set_wide(left + 12, HUD_ROW, '🏆', HUD_BG);
        self.front.put_str(left + 15, HUD_ROW, &v.high_score.to_string(), Color::White, HUD_BG);
        // Heading the next step will take
        self.front.set(left + BOARD_W - 2, HUD_ROW, Cell::from_char(heading_arrow(v.direction), Color::White, HUD_BG));
    }

    fn compose_board(&mut self) {
        let left = self.board_left();
        for gy in 0..BOARD_H {
            for gx in 0..COLUMNS as usize {
                let bg = if (gx + gy) % 2 == 0 { LIGHT_CHECKER } else { DARK_CHECKER };
                let col = left + gx * CELL_W;
                self.front.set(col, BOARD_ROW + gy, Cell::from_char(' ', Color::White, bg));
                self.front.set(col + 1, BOARD_ROW + gy, Cell::from_char(' ', Color::White, bg));
            }
        }
    }

    fn compose_apple(&mut self, v: &ViewModel) {
        let (col, row) = match self.to_screen(v.apple.as_vec2()) {
            Some(p) => p,
            None => return,
        };
        let pulse = v.mode == Mode::Play && (self.frame / APPLE_PULSE_FRAMES) % 2 == 0;
        let bg = if pulse { APPLE_GLOW } else { self.front.get(col, row).bg };
        self.front.set_wide(col, row, '🍎', bg);
    }

    fn compose_snake(&mut self, v: &ViewModel) {
        let n = v.snake_positions.len();

        // Body: everything between the interpolated head and tail end
        for &p in &v.snake_positions[1..n - 1] {
            self.paint_segment(p);
        }
        self.paint_segment(v.snake_positions[n - 1]);

        // Head last so it sits on top of the neck
        if let Some((col, row)) = self.to_screen(v.head()) {
            let [a, b] = head_glyphs(v.head_degrees, v.mouth_open);
            self.front.set(col, row, Cell::from_char(a, Color::White, SNAKE_DARK));
            self.front.set(col + 1, row, Cell::from_char(b, Color::White, SNAKE_DARK));
        }
    }

    fn paint_segment(&mut self, p: Vec2) {
        if let Some((col, row)) = self.to_screen(p) {
            self.front.set(col, row, Cell::from_char(' ', Color::White, SNAKE));
            self.front.set(col + 1, row, Cell::from_char(' ', Color::White, SNAKE));
        }
    }

    /// Board position (possibly fractional) → terminal column/row of its
    /// left half. Horizontal positions snap to half cells, vertical to
    /// whole rows. None if any part would fall off the board.
    fn to_screen(&self, p: Vec2) -> Option<(usize, usize)> {
        let col = (p.0 * CELL_W as f32).round();
        let row = p.1.round();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col + CELL_W > BOARD_W || row >= BOARD_H {
            return None;
        }
        Some((self.board_left() + col, BOARD_ROW + row))
    }

    fn compose_banner(&mut self, text: &str, bg: Color) {
        let width = text.chars().count() + 4;
        let left = self.board_left() + BOARD_W.saturating_sub(width) / 2;
        let row = BOARD_ROW + BANNER_Y;
        for x in left..left + width {
            self.front.set(x, row, Cell::from_char(' ', Color::White, bg));
        }
        self.front.put_str(left + 2, row, text, Color::White, bg);
    }

    fn compose_game_over(&mut self, v: &ViewModel) {
        let lines = [
            String::new(),
            "↻ Play Again?".to_string(),
            String::new(),
            format!("Score {}   Best {}", v.score, v.high_score),
            "Enter / Space / R".to_string(),
            String::new(),
        ];
        let width = 24.min(BOARD_W);
        let left = self.board_left() + (BOARD_W - width) / 2;
        let top = BOARD_ROW + (BOARD_H - lines.len()) / 2;

        for (i, line) in lines.iter().enumerate() {
            for x in left..left + width {
                self.front.set(x, top + i, Cell::from_char(' ', Color::White, MODAL_BG));
            }
            let pad = width.saturating_sub(line.chars().count()) / 2;
            self.front.put_str(left + pad, top + i, line, Color::White, MODAL_BG);
        }
    }
}

fn heading_arrow(dir: Direction) -> char {
    match dir {
        Direction::North => '↑',
        Direction::South => '↓',
        Direction::West => '←',
        Direction::East => '→',
    }
}

/// Two head characters for a heading given in degrees (0 = East,
/// 90 = South). The first pair element is the left column.
fn head_glyphs(degrees: f32, mouth_open: bool) -> [char; 2] {
    let quadrant = ((degrees / 90.0).round() as i32).rem_euclid(4);
    match (quadrant, mouth_open) {
        (0, false) => ['•', '▸'],
        (0, true)  => ['•', '<'],
        (1, false) => ['•', '▾'],
        (1, true)  => ['•', '^'],
        (2, false) => ['◂', '•'],
        (2, true)  => ['>', '•'],
        (_, false) => ['•', '▴'],
        (_, true)  => ['•', 'v'],
    }
}
