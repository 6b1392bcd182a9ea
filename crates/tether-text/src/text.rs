use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tether::{global, ObjectId};

use crate::Tracked;

/// A growable string that reports every mutation to the engine.
///
/// Positions are counted in characters. Handing out a [`Cursor`] or
/// [`CharRef`] records a content dependency, so any later mutation of the
/// text voids them; the text itself stays valid throughout.
pub struct Text {
    buf: Rc<RefCell<String>>,
    tag: Tracked,
}

impl Text {
    /// An empty text.
    pub fn new() -> Self {
        Text {
            buf: Rc::new(RefCell::new(String::new())),
            tag: Tracked::new(),
        }
    }

    /// The engine-facing id of this text.
    pub fn id(&self) -> ObjectId {
        self.tag.id()
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.buf.borrow().chars().count()
    }

    /// Is the text empty?
    pub fn is_empty(&self) -> bool {
        self.buf.borrow().is_empty()
    }

    /// Character at `index`, bounds-checked the quiet way.
    pub fn get(&self, index: usize) -> Option<char> {
        let buf = self.buf.borrow();
        buf.chars().nth(index)
    }

    /// Append a character.
    pub fn push(&mut self, ch: char) {
        self.touch();
        self.buf.borrow_mut().push(ch);
    }

    /// Append a string slice.
    pub fn push_str(&mut self, s: &str) {
        self.touch();
        self.buf.borrow_mut().push_str(s);
    }

    /// Drop all contents.
    pub fn clear(&mut self) {
        self.touch();
        self.buf.borrow_mut().clear();
    }

    /// Shorten to `len` characters. Longer requests are no-ops.
    pub fn truncate(&mut self, len: usize) {
        self.touch();
        let mut buf = self.buf.borrow_mut();
        if let Some((byte, _)) = buf.char_indices().nth(len) {
            buf.truncate(byte);
        }
    }

    /// Remove and return the character at `index`.
    pub fn remove(&mut self, index: usize) -> Option<char> {
        global::assert_spatial(index < self.len());
        self.touch();
        let mut buf = self.buf.borrow_mut();
        let (byte, ch) = buf.char_indices().nth(index)?;
        buf.remove(byte);
        Some(ch)
    }

    /// Exchange contents with another text. Both sides count as modified.
    pub fn swap(&mut self, other: &mut Text) {
        self.touch();
        other.touch();
        std::mem::swap(
            &mut *self.buf.borrow_mut(),
            &mut *other.buf.borrow_mut(),
        );
    }

    /// A cursor at the first character.
    pub fn cursor(&self) -> Cursor {
        let tag = Tracked::new();
        global::add_content_dependency(tag.id(), self.tag.id());
        Cursor {
            buf: Rc::downgrade(&self.buf),
            pos: 0,
            limit: self.len(),
            tag,
        }
    }

    /// A checked reference to the character at `index`.
    pub fn char_at(&self, index: usize) -> CharRef {
        global::assert_spatial(index < self.len());
        let tag = Tracked::new();
        global::add_content_dependency(tag.id(), self.tag.id());
        CharRef {
            buf: Rc::downgrade(&self.buf),
            pos: index,
            tag,
        }
    }

    /// Remove the character under `cursor`, returning a fresh cursor at
    /// the same position.
    ///
    /// The given cursor is validated first and, like every other live
    /// cursor, is voided by the mutation itself.
    pub fn remove_at(&mut self, cursor: &Cursor) -> Cursor {
        global::validate(cursor.tag.id());
        global::assert_spatial(cursor.pos <= self.len());
        self.touch();
        {
            let mut buf = self.buf.borrow_mut();
            if let Some((byte, _)) = buf.char_indices().nth(cursor.pos) {
                buf.remove(byte);
            }
        }
        let len = self.len();
        let tag = Tracked::new();
        global::add_content_dependency(tag.id(), self.tag.id());
        Cursor {
            buf: Rc::downgrade(&self.buf),
            pos: cursor.pos.min(len),
            limit: len,
            tag,
        }
    }

    fn touch(&self) {
        global::mark_modified(self.tag.id());
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text {
            buf: Rc::new(RefCell::new(s.to_owned())),
            tag: Tracked::new(),
        }
    }
}

impl Clone for Text {
    /// A deep copy with its own identity and no inherited dependencies.
    fn clone(&self) -> Self {
        Text {
            buf: Rc::new(RefCell::new(self.buf.borrow().clone())),
            tag: Tracked::new(),
        }
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf.borrow())
    }
}

/// A position in a [`Text`], voided by any mutation of the text.
pub struct Cursor {
    buf: Weak<RefCell<String>>,
    pos: usize,
    limit: usize,
    tag: Tracked,
}

impl Cursor {
    /// Current position in characters from the start.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Has the cursor reached the end it was created with?
    pub fn at_end(&self) -> bool {
        self.pos >= self.limit
    }

    /// Step one character forward.
    pub fn advance(&mut self) {
        global::assert_spatial(self.pos < self.limit);
        self.pos += 1;
    }

    /// Step `count` characters forward.
    pub fn step(&mut self, count: usize) {
        global::assert_spatial(self.pos + count <= self.limit);
        self.pos += count;
    }

    /// Character under the cursor.
    pub fn get(&self) -> Option<char> {
        global::assert_spatial(self.pos < self.limit);
        global::validate(self.tag.id());
        let buf = self.buf.upgrade()?;
        let ch = buf.borrow().chars().nth(self.pos);
        ch
    }
}

impl Clone for Cursor {
    /// The copy watches the same text: content dependencies travel with it.
    fn clone(&self) -> Self {
        let tag = Tracked::new();
        global::propagate_content(tag.id(), self.tag.id());
        Cursor {
            buf: self.buf.clone(),
            pos: self.pos,
            limit: self.limit,
            tag,
        }
    }
}

/// A checked reference to one character of a [`Text`].
pub struct CharRef {
    buf: Weak<RefCell<String>>,
    pos: usize,
    tag: Tracked,
}

impl CharRef {
    /// The referenced character.
    pub fn get(&self) -> Option<char> {
        global::validate(self.tag.id());
        let buf = self.buf.upgrade()?;
        let ch = buf.borrow().chars().nth(self.pos);
        ch
    }
}

impl Clone for CharRef {
    fn clone(&self) -> Self {
        let tag = Tracked::new();
        global::propagate_content(tag.id(), self.tag.id());
        CharRef {
            buf: self.buf.clone(),
            pos: self.pos,
            tag,
        }
    }
}
