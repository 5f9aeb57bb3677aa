use std::sync::mpsc::{Receiver, Sender, channel};

use crate::foundation::core::{Point, StickerId};
use crate::foundation::error::{StripError, StripResult};
use crate::sticker::model::{Sticker, draw_order};

/// Distance moved per arrow-key press.
pub const NUDGE_STEP: f64 = 5.0;
/// Edge length of a freshly added sticker.
pub const DEFAULT_STICKER_SIZE: f64 = 80.0;
/// Top-left corner of a freshly added sticker.
pub const DEFAULT_STICKER_POS: (f64, f64) = (20.0, 20.0);

/// Parameters for a new sticker. Unset fields take the board defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewSticker {
    /// Image reference.
    pub src: String,
    /// Display name.
    pub name: String,
    /// Left edge.
    pub x: Option<f64>,
    /// Top edge.
    pub y: Option<f64>,
    /// Width.
    pub width: Option<f64>,
    /// Height.
    pub height: Option<f64>,
    /// Rotation in degrees.
    pub rotation_deg: Option<f64>,
    /// Explicit z-index; defaults to `count + 1`.
    pub z_index: Option<i32>,
}

impl NewSticker {
    /// Sticker from an image reference with default placement.
    pub fn new(src: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Place the top-left corner.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Set the size.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set the rotation.
    pub fn rotated(mut self, deg: f64) -> Self {
        self.rotation_deg = Some(deg);
        self
    }

    /// Set an explicit z-index.
    pub fn z(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }
}

/// Partial update from a property editor. `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StickerPatch {
    /// New display name.
    pub name: Option<String>,
    /// New left edge.
    pub x: Option<f64>,
    /// New top edge.
    pub y: Option<f64>,
    /// New width.
    pub width: Option<f64>,
    /// New height.
    pub height: Option<f64>,
    /// New rotation.
    pub rotation_deg: Option<f64>,
    /// New z-index.
    pub z_index: Option<i32>,
}

/// Keys the board reacts to while a sticker is selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StickerKey {
    /// Move up by [`NUDGE_STEP`].
    ArrowUp,
    /// Move down by [`NUDGE_STEP`].
    ArrowDown,
    /// Move left by [`NUDGE_STEP`].
    ArrowLeft,
    /// Move right by [`NUDGE_STEP`].
    ArrowRight,
    /// Remove the selected sticker.
    Delete,
    /// Remove the selected sticker.
    Backspace,
}

/// A single edit. Every mutation of a board can be expressed as one of these, which is what
/// lets concurrent producers funnel edits through a [`StickerMailbox`].
#[derive(Clone, Debug, PartialEq)]
pub enum StickerCommand {
    /// Add a sticker.
    Add(NewSticker),
    /// Remove a sticker.
    Remove(StickerId),
    /// Patch a sticker.
    Update(StickerId, StickerPatch),
    /// Change or clear the selection.
    Select(Option<StickerId>),
    /// Start dragging a sticker from a pointer position.
    BeginDrag(StickerId, Point),
    /// Pointer moved during a drag.
    DragTo(Point),
    /// Pointer released.
    EndDrag,
    /// Keyboard input.
    Key(StickerKey),
    /// Raise a sticker above all others.
    BringToFront(StickerId),
}

#[derive(Clone, Debug, PartialEq)]
struct DragState {
    id: StickerId,
    last: Point,
}

/// Editable sticker collection shared by a whole strip.
#[derive(Clone, Debug, Default)]
pub struct StickerBoard {
    stickers: Vec<Sticker>,
    selected: Option<StickerId>,
    drag: Option<DragState>,
    next_seq: u64,
}

impl StickerBoard {
    /// Empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Board seeded with existing stickers (e.g. loaded from a stored record).
    pub fn from_stickers(stickers: Vec<Sticker>) -> StripResult<Self> {
        let mut seen = std::collections::HashSet::new();
        for s in &stickers {
            s.validate()?;
            if !seen.insert(s.id.clone()) {
                return Err(StripError::validation(format!(
                    "duplicate sticker id '{}'",
                    s.id
                )));
            }
        }
        let next_seq = stickers.len() as u64;
        Ok(Self {
            stickers,
            selected: None,
            drag: None,
            next_seq,
        })
    }

    /// Add a sticker with default placement on top of the others.
    pub fn add(&mut self, src: impl Into<String>, name: impl Into<String>) -> StripResult<StickerId> {
        self.add_with(NewSticker::new(src, name))
    }

    /// Add a sticker with explicit parameters.
    pub fn add_with(&mut self, new: NewSticker) -> StripResult<StickerId> {
        let id = self.mint_id();
        let sticker = Sticker {
            id: id.clone(),
            src: new.src,
            name: new.name,
            x: new.x.unwrap_or(DEFAULT_STICKER_POS.0),
            y: new.y.unwrap_or(DEFAULT_STICKER_POS.1),
            width: new.width.unwrap_or(DEFAULT_STICKER_SIZE),
            height: new.height.unwrap_or(DEFAULT_STICKER_SIZE),
            rotation_deg: new.rotation_deg.unwrap_or(0.0),
            z_index: new
                .z_index
                .unwrap_or_else(|| i32::try_from(self.stickers.len() + 1).unwrap_or(i32::MAX)),
        };
        sticker.validate()?;
        tracing::debug!(id = %sticker.id, z = sticker.z_index, "sticker added");
        self.stickers.push(sticker);
        Ok(id)
    }

    fn mint_id(&mut self) -> StickerId {
        loop {
            self.next_seq += 1;
            let id = StickerId::from_seq(self.next_seq);
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    /// Remove a sticker, clearing selection and drag state that referenced it.
    pub fn remove(&mut self, id: &StickerId) -> Option<Sticker> {
        let pos = self.stickers.iter().position(|s| &s.id == id)?;
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        if self.drag.as_ref().is_some_and(|d| &d.id == id) {
            self.drag = None;
        }
        Some(self.stickers.remove(pos))
    }

    /// Apply a property patch. The result must still be a valid sticker.
    pub fn update(&mut self, id: &StickerId, patch: StickerPatch) -> StripResult<()> {
        let s = self.get_mut(id)?;
        let mut next = s.clone();
        if let Some(v) = patch.name {
            next.name = v;
        }
        if let Some(v) = patch.x {
            next.x = v;
        }
        if let Some(v) = patch.y {
            next.y = v;
        }
        if let Some(v) = patch.width {
            next.width = v;
        }
        if let Some(v) = patch.height {
            next.height = v;
        }
        if let Some(v) = patch.rotation_deg {
            next.rotation_deg = v;
        }
        if let Some(v) = patch.z_index {
            next.z_index = v;
        }
        next.validate()?;
        *s = next;
        Ok(())
    }

    /// Look up a sticker.
    pub fn get(&self, id: &StickerId) -> Option<&Sticker> {
        self.stickers.iter().find(|s| &s.id == id)
    }

    fn get_mut(&mut self, id: &StickerId) -> StripResult<&mut Sticker> {
        self.stickers
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| StripError::validation(format!("unknown sticker '{id}'")))
    }

    /// Stickers in insertion order.
    pub fn list(&self) -> &[Sticker] {
        &self.stickers
    }

    /// Number of stickers.
    pub fn len(&self) -> usize {
        self.stickers.len()
    }

    /// True when the board is empty.
    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }

    /// Stickers in draw order (ascending z-index, stable).
    pub fn draw_order(&self) -> Vec<&Sticker> {
        draw_order(&self.stickers)
    }

    /// Select a sticker for keyboard edits.
    pub fn select(&mut self, id: &StickerId) -> StripResult<()> {
        if self.get(id).is_none() {
            return Err(StripError::validation(format!("unknown sticker '{id}'")));
        }
        self.selected = Some(id.clone());
        Ok(())
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Currently selected sticker id.
    pub fn selected(&self) -> Option<&StickerId> {
        self.selected.as_ref()
    }

    /// Start a drag; the dragged sticker becomes selected.
    pub fn begin_drag(&mut self, id: &StickerId, pointer: Point) -> StripResult<()> {
        self.select(id)?;
        self.drag = Some(DragState {
            id: id.clone(),
            last: pointer,
        });
        Ok(())
    }

    /// Move the dragged sticker by the pointer delta since the previous event.
    ///
    /// Positions are not clamped to the canvas. Returns `false` when no drag is active.
    pub fn drag_to(&mut self, pointer: Point) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        let delta = pointer - drag.last;
        drag.last = pointer;
        let id = drag.id.clone();
        match self.stickers.iter_mut().find(|s| s.id == id) {
            Some(s) => {
                s.x += delta.x;
                s.y += delta.y;
                true
            }
            None => {
                self.drag = None;
                false
            }
        }
    }

    /// Finish the current drag.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Handle a key press against the selected sticker. Returns whether anything changed.
    pub fn handle_key(&mut self, key: StickerKey) -> bool {
        let Some(id) = self.selected.clone() else {
            return false;
        };
        let (dx, dy) = match key {
            StickerKey::ArrowUp => (0.0, -NUDGE_STEP),
            StickerKey::ArrowDown => (0.0, NUDGE_STEP),
            StickerKey::ArrowLeft => (-NUDGE_STEP, 0.0),
            StickerKey::ArrowRight => (NUDGE_STEP, 0.0),
            StickerKey::Delete | StickerKey::Backspace => {
                let removed = self.remove(&id).is_some();
                self.selected = None;
                return removed;
            }
        };
        match self.stickers.iter_mut().find(|s| s.id == id) {
            Some(s) => {
                s.x += dx;
                s.y += dy;
                true
            }
            None => false,
        }
    }

    /// Raise a sticker above every other one.
    pub fn bring_to_front(&mut self, id: &StickerId) -> StripResult<()> {
        let top = self.stickers.iter().map(|s| s.z_index).max().unwrap_or(0);
        let s = self.get_mut(id)?;
        if s.z_index < top || top == i32::MIN {
            s.z_index = top.saturating_add(1);
        }
        Ok(())
    }

    /// Apply one command.
    pub fn apply(&mut self, cmd: StickerCommand) -> StripResult<()> {
        match cmd {
            StickerCommand::Add(new) => self.add_with(new).map(|_| ()),
            StickerCommand::Remove(id) => {
                self.remove(&id);
                Ok(())
            }
            StickerCommand::Update(id, patch) => self.update(&id, patch),
            StickerCommand::Select(Some(id)) => self.select(&id),
            StickerCommand::Select(None) => {
                self.clear_selection();
                Ok(())
            }
            StickerCommand::BeginDrag(id, p) => self.begin_drag(&id, p),
            StickerCommand::DragTo(p) => {
                self.drag_to(p);
                Ok(())
            }
            StickerCommand::EndDrag => {
                self.end_drag();
                Ok(())
            }
            StickerCommand::Key(k) => {
                self.handle_key(k);
                Ok(())
            }
            StickerCommand::BringToFront(id) => self.bring_to_front(&id),
        }
    }

    /// Apply every queued command in arrival order. Failed commands are logged and skipped.
    ///
    /// Returns the number of commands applied successfully.
    pub fn drain(&mut self, mailbox: &StickerMailbox) -> usize {
        let mut applied = 0;
        while let Ok(cmd) = mailbox.rx.try_recv() {
            match self.apply(cmd) {
                Ok(()) => applied += 1,
                Err(e) => tracing::warn!(error = %e, "sticker command rejected"),
            }
        }
        applied
    }

    /// Snapshot of the stickers for a composition or photo record.
    pub fn to_vec(&self) -> Vec<Sticker> {
        self.stickers.clone()
    }
}

/// Single-consumer queue serializing sticker edits from any number of producers.
#[derive(Debug)]
pub struct StickerMailbox {
    tx: Sender<StickerCommand>,
    rx: Receiver<StickerCommand>,
}

impl StickerMailbox {
    /// New empty mailbox.
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self { tx, rx }
    }

    /// Producer handle; clone freely across threads.
    pub fn sender(&self) -> Sender<StickerCommand> {
        self.tx.clone()
    }
}

impl Default for StickerMailbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sticker/board.rs"]
mod tests;
