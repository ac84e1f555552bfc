//! Input form shown while a new node is being described.
//!
//! The form has two single-line fields: the title and an optional path to an
//! image file to upload as the node's avatar.

/// A single-line text field with a character cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    text: String,
    cursor: usize,
}

impl TextField {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, ch: char) {
        let byte = self.byte_offset(self.cursor);
        self.text.insert(byte, ch);
        self.cursor += 1;
    }

    /// Deletes the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let byte = self.byte_offset(self.cursor);
        self.text.remove(byte);
    }

    /// Deletes the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let byte = self.byte_offset(self.cursor);
            self.text.remove(byte);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}

/// Which field of the form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidebarField {
    #[default]
    Title,
    AvatarPath,
}

/// The create-node form.
///
/// # Example
///
/// ```
/// use treequill::editor::sidebar::{SidebarForm, SidebarField};
///
/// let mut form = SidebarForm::default();
/// for ch in "Leaf".chars() {
///     form.insert(ch);
/// }
/// form.next_field();
/// assert_eq!(form.focus(), SidebarField::AvatarPath);
/// assert_eq!(form.title().text(), "Leaf");
/// assert!(form.avatar_path().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SidebarForm {
    title: TextField,
    avatar: TextField,
    focus: SidebarField,
}

impl SidebarForm {
    pub fn title(&self) -> &TextField {
        &self.title
    }

    pub fn avatar(&self) -> &TextField {
        &self.avatar
    }

    pub fn focus(&self) -> SidebarField {
        self.focus
    }

    /// The avatar path, if one was typed.
    pub fn avatar_path(&self) -> Option<std::path::PathBuf> {
        let path = self.avatar.text().trim();
        if path.is_empty() {
            None
        } else {
            Some(std::path::PathBuf::from(path))
        }
    }

    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            SidebarField::Title => &mut self.title,
            SidebarField::AvatarPath => &mut self.avatar,
        }
    }

    pub fn insert(&mut self, ch: char) {
        self.focused_mut().insert(ch);
    }

    pub fn next_field(&mut self) {
        self.focus = match self.focus {
            SidebarField::Title => SidebarField::AvatarPath,
            SidebarField::AvatarPath => SidebarField::Title,
        };
    }

    /// Empties both fields and focuses the title.
    pub fn reset(&mut self) {
        self.title.clear();
        self.avatar.clear();
        self.focus = SidebarField::Title;
    }
}
