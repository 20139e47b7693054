//! Crossterm backend that paints one kitty-protocol image after each frame.
//!
//! Ratatui only knows about cells, so the Info screen records where the artwork
//! goes in a shared slot and this backend emits the escape sequence once the
//! cell diff has been flushed.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use crossterm::{cursor::MoveTo, queue, style::Print};
use ratatui::backend::{Backend, ClearType, CrosstermBackend, WindowSize};
use ratatui::buffer::Cell;
use ratatui::layout::{Position, Size};

const DELETE_ALL_IMAGES: &str = "\x1b_Ga=d,d=a\x1b\\";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub x: u16,
    pub y: u16,
    pub sequence: String,
}

#[derive(Default, Debug, Clone)]
pub struct ArtworkSlot {
    placement: Option<Placement>,
}

impl ArtworkSlot {
    pub fn place(&mut self, x: u16, y: u16, sequence: String) {
        self.placement = Some(Placement { x, y, sequence });
    }

    pub fn clear(&mut self) {
        self.placement = None;
    }

    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }
}

static SLOT: OnceLock<Arc<Mutex<ArtworkSlot>>> = OnceLock::new();

pub fn artwork_slot() -> Arc<Mutex<ArtworkSlot>> {
    SLOT.get_or_init(|| Arc::new(Mutex::new(ArtworkSlot::default())))
        .clone()
}

// The slot is always replaced whole, so a poisoned lock still holds a usable value.
fn lock(slot: &Mutex<ArtworkSlot>) -> MutexGuard<'_, ArtworkSlot> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn place_artwork(x: u16, y: u16, sequence: String) {
    let slot = artwork_slot();
    lock(&slot).place(x, y, sequence);
}

pub fn clear_artwork() {
    let slot = artwork_slot();
    lock(&slot).clear();
}

#[derive(Debug, Clone)]
pub struct ArtworkBackend<W: Write> {
    inner: CrosstermBackend<W>,
    slot: Arc<Mutex<ArtworkSlot>>,
    shown: Option<Placement>,
}

impl<W: Write> ArtworkBackend<W> {
    pub fn new(writer: W, slot: Arc<Mutex<ArtworkSlot>>) -> Self {
        Self {
            inner: CrosstermBackend::new(writer),
            slot,
            shown: None,
        }
    }
}

impl<W: Write> Backend for ArtworkBackend<W> {
    fn draw<'a, I>(&mut self, content: I) -> io::Result<()>
    where
        I: Iterator<Item = (u16, u16, &'a Cell)>,
    {
        self.inner.draw(content)?;
        let wanted = lock(&self.slot).placement().cloned();
        if self.shown.is_some() {
            queue!(self.inner, Print(DELETE_ALL_IMAGES))?;
        }
        if let Some(placement) = &wanted {
            queue!(
                self.inner,
                MoveTo(placement.x, placement.y),
                Print(&placement.sequence)
            )?;
        }
        self.shown = wanted;
        Ok(())
    }

    fn append_lines(&mut self, n: u16) -> io::Result<()> {
        self.inner.append_lines(n)
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        self.inner.hide_cursor()
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        self.inner.show_cursor()
    }

    fn get_cursor_position(&mut self) -> io::Result<Position> {
        self.inner.get_cursor_position()
    }

    fn set_cursor_position<P: Into<Position>>(&mut self, position: P) -> io::Result<()> {
        self.inner.set_cursor_position(position)
    }

    fn clear(&mut self) -> io::Result<()> {
        self.inner.clear()
    }

    fn clear_region(&mut self, clear_type: ClearType) -> io::Result<()> {
        self.inner.clear_region(clear_type)
    }

    fn size(&self) -> io::Result<Size> {
        self.inner.size()
    }

    fn window_size(&mut self) -> io::Result<WindowSize> {
        self.inner.window_size()
    }

    fn flush(&mut self) -> io::Result<()> {
        Backend::flush(&mut self.inner)
    }
}

impl<W: Write> Write for ArtworkBackend<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(&mut self.inner)
    }
}
