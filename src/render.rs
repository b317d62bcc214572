use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use pocketpet::character::LifeStage;
use pocketpet::clock::Millis;
use pocketpet::menu::{FeedChoice, MenuItem};
use pocketpet::minigame::{RoundResult, ROUNDS};
use pocketpet::model::{Attention, DeathCause, PetState, MAX_DISCIPLINE, MAX_HAPPY, MAX_HUNGER};
use pocketpet::session::{Screen, Session, StartChoice};
use std::io::{self, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    pub(crate) fn clear(&mut self, bg: Color) {
        for c in &mut self.cells {
            *c = Cell {
                bg,
                ..Cell::default()
            };
        }
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Reallocates both buffers and wipes the screen after a resize, so the
    /// next diff starts from a known blank state.
    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<()> {
        let (cols, rows) = terminal::size()?;
        if (cols, rows) != (self.cols, self.rows) {
            self.cols = cols;
            self.rows = rows;
            self.prev = CellBuffer::new(cols, rows);
            self.cur = CellBuffer::new(cols, rows);
            queue!(self.out, ResetColor, Clear(ClearType::All))?;
        }
        Ok(())
    }

    /// Writes only the cells that changed since the last frame.
    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut pen: Option<(Color, Color)> = None;
        let changed = self
            .cur
            .cells
            .iter()
            .zip(&self.prev.cells)
            .enumerate()
            .filter(|(_, (now, before))| now != before);
        for (i, (c, _)) in changed {
            let x = (i % self.cols as usize) as u16;
            let y = (i / self.cols as usize) as u16;
            queue!(self.out, cursor::MoveTo(x, y))?;
            if pen != Some((c.fg, c.bg)) {
                queue!(self.out, SetForegroundColor(c.fg), SetBackgroundColor(c.bg))?;
                pen = Some((c.fg, c.bg));
            }
            queue!(self.out, Print(c.ch))?;
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }

    /// Terminal bell; the only sound a plain terminal can make.
    pub(crate) fn bell(&mut self) -> anyhow::Result<()> {
        queue!(self.out, Print('\x07'))?;
        self.out.flush()?;
        Ok(())
    }
}

/// Foreground palette; collapses to white when colour is off.
#[derive(Clone, Copy)]
pub(crate) struct Palette {
    color: bool,
}

impl Palette {
    pub(crate) fn new(color: bool) -> Self {
        Self { color }
    }

    fn pick(self, c: Color) -> Color {
        if self.color {
            c
        } else {
            Color::White
        }
    }

    fn text(self) -> Color {
        Color::White
    }
    fn accent(self) -> Color {
        self.pick(Color::Yellow)
    }
    fn alert(self) -> Color {
        self.pick(Color::Red)
    }
    fn good(self) -> Color {
        self.pick(Color::Green)
    }
    fn dim(self) -> Color {
        self.pick(Color::DarkGrey)
    }
}

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(xx, y, Cell { ch, fg, bg });
    }
}

fn draw_centered(buf: &mut CellBuffer, y: u16, s: &str, fg: Color) {
    let len = s.chars().count() as u16;
    let x = buf.w.saturating_sub(len) / 2;
    draw_text(buf, x, y, s, fg, Color::Black);
}

fn hearts(value: u8, max: u8) -> String {
    (0..max).map(|i| if i < value { '♥' } else { '♡' }).collect()
}

fn bar(value01: f32, width: usize) -> String {
    let v = value01.clamp(0.0, 1.0);
    let fill = (v * width as f32 + 0.5) as usize;
    let mut s = String::new();
    s.push('[');
    for i in 0..width {
        s.push(if i < fill { '█' } else { ' ' });
    }
    s.push(']');
    s
}

pub(crate) fn draw_box(buf: &mut CellBuffer, title: &str, body: &str, fg: Color) {
    let bw = 44.min(buf.w.saturating_sub(4));
    let bh = 14.min(buf.h.saturating_sub(4));
    if bw < 4 || bh < 4 {
        return;
    }
    let x0 = (buf.w - bw) / 2;
    let y0 = (buf.h - bh) / 2;
    let edge = |ch| Cell {
        ch,
        fg,
        bg: Color::Black,
    };

    for x in x0..x0 + bw {
        buf.set(x, y0, edge('─'));
        buf.set(x, y0 + bh - 1, edge('─'));
    }
    for y in y0..y0 + bh {
        buf.set(x0, y, edge('│'));
        buf.set(x0 + bw - 1, y, edge('│'));
    }
    buf.set(x0, y0, edge('┌'));
    buf.set(x0 + bw - 1, y0, edge('┐'));
    buf.set(x0, y0 + bh - 1, edge('└'));
    buf.set(x0 + bw - 1, y0 + bh - 1, edge('┘'));

    draw_text(buf, x0 + 2, y0 + 1, title, fg, Color::Black);
    let mut yy = y0 + 3;
    for line in body.lines() {
        if yy >= y0 + bh - 1 {
            break;
        }
        draw_text(buf, x0 + 2, yy, line, Color::White, Color::Black);
        yy += 1;
    }
}

fn sprite(stage: LifeStage, asleep: bool) -> &'static [&'static str] {
    if asleep {
        return &["  z Z   ", " (-.-)  ", " (   )  "];
    }
    match stage {
        LifeStage::Egg => &["  .--.  ", " /    \\ ", "|  ..  |", " \\____/ "],
        LifeStage::Baby => &["  (o.o) "],
        LifeStage::Child => &[" (o.o)  ", " /| |\\  "],
        LifeStage::Teen => &["  /\\_/\\  ", " ( o.o ) ", "  > ^ <  "],
        LifeStage::Adult => &["  /\\_/\\   ", " ( O.O )  ", " /|   |\\  ", "  |___|   "],
        LifeStage::Dead => &["   .-.   ", "  (x x)  ", "  /   \\  ", "  ~~~~~  "],
    }
}

fn draw_pet(buf: &mut CellBuffer, pet: &PetState, cy: u16, pal: Palette) {
    let fg = if pet.sick { pal.alert() } else { pal.text() };
    let lines = sprite(pet.stage, pet.asleep);
    for (i, line) in lines.iter().enumerate() {
        draw_centered(buf, cy + i as u16, line, fg);
    }
    let below = cy + lines.len() as u16;
    if pet.poop_count > 0 {
        let piles = "~@ ".repeat(pet.poop_count as usize);
        draw_centered(buf, below + 1, piles.trim_end(), pal.dim());
    }
    if pet.attention != Attention::None && pet.attention != Attention::Sleep {
        draw_centered(buf, cy.saturating_sub(2), "!", pal.alert());
    }
}

fn footer(buf: &mut CellBuffer, s: &str, pal: Palette) {
    draw_text(buf, 1, buf.h.saturating_sub(1), s, pal.dim(), Color::Black);
}

/// Draws whatever screen the session is on.
pub(crate) fn draw_session(buf: &mut CellBuffer, session: &Session, now: Millis, pal: Palette) {
    buf.clear(Color::Black);
    let mid = buf.h / 2;
    match session.screen() {
        Screen::Title => {
            draw_centered(buf, mid.saturating_sub(2), "P O C K E T   P E T", pal.accent());
            draw_centered(buf, mid + 1, "press any button", pal.text());
            footer(buf, "a/← left  space/↵ center  d/→ right  q quit", pal);
        }
        Screen::NewOrContinue => {
            let (new, cont) = match session.start_choice() {
                StartChoice::New => ("> New game", "  Continue"),
                StartChoice::Continue => ("  New game", "> Continue"),
            };
            draw_centered(buf, mid.saturating_sub(1), new, pal.text());
            draw_centered(buf, mid + 1, cont, pal.text());
            footer(buf, "left/right choose  center confirm", pal);
        }
        Screen::EggHatching => {
            draw_pet(buf, session.pet(), mid.saturating_sub(3), pal);
            let p = session.hatch_progress(now);
            draw_centered(buf, mid + 3, &bar(p, 20), pal.accent());
            draw_centered(buf, mid + 4, "something is moving...", pal.dim());
        }
        Screen::Gameplay | Screen::Sleeping => {
            draw_status_line(buf, session, pal);
            draw_pet(buf, session.pet(), mid.saturating_sub(2), pal);
            if session.screen() == Screen::Sleeping {
                let light = if session.pet().light_off {
                    "lights off"
                } else {
                    "lights on, center to turn off"
                };
                draw_centered(buf, buf.h.saturating_sub(3), light, pal.dim());
            } else {
                draw_menu_strip(buf, session, pal);
            }
        }
        Screen::FeedMenu => {
            draw_status_line(buf, session, pal);
            let cursor = session.menu().sub_cursor();
            let body: Vec<String> = FeedChoice::ALL
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    let mark = if i == cursor { '>' } else { ' ' };
                    format!("{mark} {}", c.label())
                })
                .collect();
            draw_box(buf, "Feed", &body.join("\n"), pal.accent());
        }
        Screen::Minigame => draw_minigame(buf, session, pal),
        Screen::Evolution => {
            let v = session.evolution_view(now);
            let (name, fg) = if v.progress < 0.5 {
                (v.from.name, pal.dim())
            } else {
                (v.to.name, pal.accent())
            };
            draw_centered(buf, mid.saturating_sub(2), "evolving!", pal.text());
            draw_centered(buf, mid, name, fg);
            draw_centered(buf, mid + 2, &bar(v.progress, 20), pal.accent());
            if v.progress >= 1.0 {
                draw_centered(buf, mid + 4, &format!("{} -> {}", v.from.name, v.to.name), pal.good());
            }
        }
        Screen::StatScreen => {
            let pet = session.pet();
            let def = session.character();
            let body = format!(
                "Stage      {:?}\nAge        {}h\nWeight     {}g\nHunger     {}\nHappy      {}\nDiscipline {}\nMistakes   {} (total {})\nSick       {}",
                pet.stage,
                pet.age,
                pet.weight,
                hearts(pet.hunger, MAX_HUNGER),
                hearts(pet.happiness, MAX_HAPPY),
                bar(f32::from(pet.discipline) / f32::from(MAX_DISCIPLINE), 10),
                pet.care_mistakes,
                pet.total_care_mistakes,
                if pet.sick { "yes" } else { "no" },
            );
            draw_box(buf, def.name, &body, pal.accent());
        }
        Screen::DeathScreen => {
            let pet = session.pet();
            let why = match pet.death_cause {
                DeathCause::Neglect => "starved",
                DeathCause::Sickness => "illness",
                DeathCause::OldAge => "old age",
            };
            draw_pet(buf, pet, mid.saturating_sub(4), pal);
            draw_centered(buf, mid + 2, &format!("passed away at {}h ({why})", pet.total_age), pal.text());
            draw_centered(buf, mid + 4, "press any button", pal.dim());
        }
    }
}

fn draw_status_line(buf: &mut CellBuffer, session: &Session, pal: Palette) {
    let pet = session.pet();
    let line = format!(
        "{}  age {}h  {}g  hunger {}  happy {}",
        session.character().name,
        pet.age,
        pet.weight,
        hearts(pet.hunger, MAX_HUNGER),
        hearts(pet.happiness, MAX_HAPPY)
    );
    draw_text(buf, 1, 0, &line, pal.text(), Color::Black);
    if pet.sick {
        draw_text(buf, 1, 1, "sick", pal.alert(), Color::Black);
    }
}

fn draw_menu_strip(buf: &mut CellBuffer, session: &Session, pal: Palette) {
    let y = buf.h.saturating_sub(2);
    let mut x = 1u16;
    for (i, item) in MenuItem::ALL.iter().enumerate() {
        let label = item.label();
        let fg = if i == session.menu().cursor() {
            pal.accent()
        } else {
            pal.dim()
        };
        let text = if i == session.menu().cursor() {
            format!("[{label}]")
        } else {
            format!(" {label} ")
        };
        draw_text(buf, x, y, &text, fg, Color::Black);
        x = x.saturating_add(text.chars().count() as u16 + 1);
    }
}

fn draw_minigame(buf: &mut CellBuffer, session: &Session, pal: Palette) {
    let game = session.minigame();
    let mid = buf.h / 2;
    let round = game.round().min(ROUNDS);
    draw_centered(buf, 1, &format!("round {round}/{ROUNDS}   wins {}", game.wins()), pal.text());
    draw_centered(buf, mid.saturating_sub(1), &format!("{}", game.current_number()), pal.accent());
    match game.revealed_number() {
        Some(n) => {
            let (verdict, fg) = match game.last_result() {
                RoundResult::Correct => ("right!", pal.good()),
                RoundResult::Wrong => ("wrong", pal.alert()),
                RoundResult::Pending => ("", pal.text()),
            };
            draw_centered(buf, mid + 1, &format!("next was {n}: {verdict}"), fg);
        }
        None => draw_centered(buf, mid + 1, "higher or lower?", pal.text()),
    }
    footer(buf, "left higher  right lower  center quit", pal);
}
