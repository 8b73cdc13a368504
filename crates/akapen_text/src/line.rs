//! Position-tracked source lines.
//!
//! A [`Line`] keeps every character of one physical input line together
//! with its original offset. Markup is removed by *erasing* characters: an
//! erased character no longer contributes to the surviving text, but its
//! offset stays addressable, so positions reported later always refer to
//! the unmodified source.
//!
//! # Example
//!
//! ```rust,ignore
//! use akapen_text::{EraseStyle, Line};
//!
//! let mut line = Line::new("This is **bold** text.", 1);
//! line.erase_enclosure("**", "**", EraseStyle::Markers);
//!
//! assert_eq!(line.surviving_text(), "This is bold text.");
//! assert_eq!(line.offset(10), 10);
//! ```

use std::fmt;

/// How [`Line::erase_enclosure`] treats a matched span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseStyle {
    /// Erase only the opening and closing delimiters.
    Markers,
    /// Erase the delimiters and the enclosed text.
    All,
    /// Erase the delimiters and tag the enclosed text as inline markup.
    ///
    /// A span only matches when the opening delimiter starts at a word
    /// boundary, the closing one ends at a word boundary, and the enclosed
    /// text neither is empty nor starts with whitespace.
    InlineMarkup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    value: char,
    offset: usize,
    valid: bool,
    escaped: bool,
    inline_markup: bool,
}

/// One physical source line with per-character bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    line_no: usize,
    cells: Vec<Cell>,
    erased: bool,
    section_level: usize,
    list_level: usize,
    list_start: bool,
    in_block: bool,
    links: Vec<(usize, String)>,
}

const OPEN_BOUNDARY: &str = "-:/'\"<([{";
const CLOSE_BOUNDARY: &str = "-.,:;!?\\/'\")]}>";

impl Line {
    /// Creates a line from raw text and its 1-indexed line number.
    ///
    /// A backslash escapes the following character: the backslash itself
    /// is dropped and the character is flagged as escaped, so markup
    /// recognizers skip it. Trailing whitespace is removed.
    pub fn new(text: &str, line_no: usize) -> Self {
        let mut cells: Vec<Cell> = Vec::with_capacity(text.len());
        let mut chars = text.chars().enumerate();

        while let Some((offset, value)) = chars.next() {
            if value == '\\'
                && let Some((next_offset, next)) = chars.next()
            {
                cells.push(Cell::new(next, next_offset, true));
                continue;
            }
            cells.push(Cell::new(value, offset, false));
        }

        while cells.last().is_some_and(|c| c.value.is_whitespace()) {
            cells.pop();
        }

        Self {
            line_no,
            cells,
            erased: false,
            section_level: 0,
            list_level: 0,
            list_start: false,
            in_block: false,
            links: Vec::new(),
        }
    }

    /// Creates a line without backslash escape handling.
    ///
    /// Used for formats where a backslash is ordinary text.
    pub fn raw(text: &str, line_no: usize) -> Self {
        let mut cells: Vec<Cell> = text
            .chars()
            .enumerate()
            .map(|(offset, value)| Cell::new(value, offset, false))
            .collect();
        while cells.last().is_some_and(|c| c.value.is_whitespace()) {
            cells.pop();
        }
        Self {
            cells,
            ..Self::new("", line_no)
        }
    }

    /// Returns the 1-indexed line number.
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Returns the number of characters, erased ones included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if no character survives, or only whitespace does.
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|c| !c.valid || c.value.is_whitespace())
    }

    /// Returns true if the whole line was erased with [`Line::erase_all`].
    pub fn is_erased(&self) -> bool {
        self.erased
    }

    /// Returns the character at `index` if it is visible to markup
    /// recognition, i.e. neither erased nor escaped.
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.cells
            .get(index)
            .filter(|c| c.valid && !c.escaped)
            .map(|c| c.value)
    }

    /// Returns the character at `index` regardless of its state.
    pub fn raw_char_at(&self, index: usize) -> Option<char> {
        self.cells.get(index).map(|c| c.value)
    }

    /// Returns true if the character at `index` has not been erased.
    pub fn is_valid(&self, index: usize) -> bool {
        self.cells.get(index).is_some_and(|c| c.valid)
    }

    /// Returns true if the character at `index` was backslash-escaped.
    pub fn is_escaped(&self, index: usize) -> bool {
        self.cells.get(index).is_some_and(|c| c.escaped)
    }

    /// Returns true if the character at `index` lies in an inline markup span.
    pub fn is_inline_markup(&self, index: usize) -> bool {
        self.cells.get(index).is_some_and(|c| c.inline_markup)
    }

    /// Returns the original offset of the character at `index`.
    ///
    /// Past the end, returns one past the last original offset.
    pub fn offset(&self, index: usize) -> usize {
        match self.cells.get(index) {
            Some(cell) => cell.offset,
            None => self.cells.last().map_or(0, |c| c.offset + 1),
        }
    }

    /// Returns every character, erased ones included.
    pub fn text(&self) -> String {
        self.cells.iter().map(|c| c.value).collect()
    }

    /// Returns the characters that have not been erased.
    pub fn surviving_text(&self) -> String {
        self.cells
            .iter()
            .filter(|c| c.valid)
            .map(|c| c.value)
            .collect()
    }

    /// Returns how many surviving characters precede `index`.
    pub fn surviving_before(&self, index: usize) -> usize {
        self.cells.iter().take(index).filter(|c| c.valid).count()
    }

    /// Iterates over surviving characters with their original offsets.
    pub fn surviving_chars(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.cells
            .iter()
            .filter(|c| c.valid)
            .map(|c| (c.value, c.offset))
    }

    /// Returns true if `pattern` matches visible characters at `index`.
    pub fn matches_at(&self, index: usize, pattern: &str) -> bool {
        let mut position = index;
        for expected in pattern.chars() {
            if self.char_at(position) != Some(expected) {
                return false;
            }
            position += 1;
        }
        true
    }

    /// Returns true if the line starts with `prefix`.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.matches_at(0, prefix)
    }

    /// Returns the index of the first match of `pattern` at or after `from`.
    pub fn find(&self, pattern: &str, from: usize) -> Option<usize> {
        if pattern.is_empty() {
            return None;
        }
        (from..self.cells.len()).find(|&i| self.matches_at(i, pattern))
    }

    /// Returns the number of leading whitespace characters.
    pub fn indentation(&self) -> usize {
        self.cells
            .iter()
            .take_while(|c| c.valid && c.value.is_whitespace())
            .count()
    }

    /// Returns true if the line is non-empty and every character is `value`.
    pub fn consists_of(&self, value: char) -> bool {
        !self.cells.is_empty() && (0..self.cells.len()).all(|i| self.char_at(i) == Some(value))
    }

    /// Erases `length` characters starting at `start`.
    pub fn erase(&mut self, start: usize, length: usize) {
        let end = start.saturating_add(length).min(self.cells.len());
        for cell in self.cells.iter_mut().take(end).skip(start) {
            cell.valid = false;
        }
    }

    /// Marks `length` characters from `start` as literal text.
    ///
    /// Protected characters stay in the surviving text but are hidden from
    /// markup recognition, like backslash-escaped ones.
    pub fn protect(&mut self, start: usize, length: usize) {
        let end = start.saturating_add(length).min(self.cells.len());
        for cell in self.cells.iter_mut().take(end).skip(start) {
            cell.escaped = true;
        }
    }

    /// Erases the whole line.
    pub fn erase_all(&mut self) {
        self.erase(0, self.cells.len());
        self.erased = true;
    }

    /// Erases every occurrence of `segment`.
    pub fn erase_segment(&mut self, segment: &str) {
        let length = segment.chars().count();
        let mut from = 0;
        while let Some(start) = self.find(segment, from) {
            self.erase(start, length);
            from = start + length;
        }
    }

    /// Erases consecutive characters from `start` while `predicate` holds.
    ///
    /// Returns the number of erased characters.
    pub fn erase_while(&mut self, start: usize, predicate: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while let Some(value) = self.char_at(start + count) {
            if !predicate(value) {
                break;
            }
            count += 1;
        }
        self.erase(start, count);
        count
    }

    /// Erases spans enclosed by `open` and `close`.
    ///
    /// Each pass takes the first `open` at or after the previous match and
    /// the next `close` after it; passes repeat until no pair remains. An
    /// `open` without a matching `close` ends the scan and leaves the line
    /// untouched from there on. Returns the number of spans handled.
    pub fn erase_enclosure(&mut self, open: &str, close: &str, style: EraseStyle) -> usize {
        let open_len = open.chars().count();
        let close_len = close.chars().count();
        if open_len == 0 || close_len == 0 {
            return 0;
        }

        let mut handled = 0;
        let mut from = 0;
        while let Some(start) = self.find(open, from) {
            let content_start = start + open_len;
            let Some(end) = self.find(close, content_start) else {
                break;
            };

            if style == EraseStyle::InlineMarkup
                && !self.is_markup_span(start, content_start, end, end + close_len)
            {
                from = start + 1;
                continue;
            }

            match style {
                EraseStyle::Markers => {
                    self.erase(start, open_len);
                    self.erase(end, close_len);
                }
                EraseStyle::All => self.erase(start, end + close_len - start),
                EraseStyle::InlineMarkup => {
                    self.erase(start, open_len);
                    self.erase(end, close_len);
                    for cell in &mut self.cells[content_start..end] {
                        cell.inline_markup = true;
                    }
                }
            }

            handled += 1;
            from = end + close_len;
        }
        handled
    }

    fn is_markup_span(&self, start: usize, content_start: usize, end: usize, after: usize) -> bool {
        let opens = start == 0
            || self
                .raw_char_at(start - 1)
                .is_some_and(|c| c.is_whitespace() || OPEN_BOUNDARY.contains(c));
        let closes = self
            .raw_char_at(after)
            .is_none_or(|c| c.is_whitespace() || CLOSE_BOUNDARY.contains(c));
        let content = content_start < end
            && self
                .raw_char_at(content_start)
                .is_some_and(|c| !c.is_whitespace());
        opens && closes && content
    }

    /// Records a link target anchored at character `index`.
    pub fn add_link(&mut self, index: usize, url: impl Into<String>) {
        self.links.push((index, url.into()));
    }

    /// Returns recorded links with their anchor indices.
    pub fn links(&self) -> &[(usize, String)] {
        &self.links
    }

    /// Returns the header level (0 when the line is not a header).
    pub fn section_level(&self) -> usize {
        self.section_level
    }

    /// Sets the header level.
    pub fn set_section_level(&mut self, level: usize) {
        self.section_level = level;
    }

    /// Returns the list nesting level (0 outside lists).
    pub fn list_level(&self) -> usize {
        self.list_level
    }

    /// Sets the list nesting level.
    pub fn set_list_level(&mut self, level: usize) {
        self.list_level = level;
    }

    /// Returns true if the line opens a new list item.
    pub fn is_list_start(&self) -> bool {
        self.list_start
    }

    /// Marks the line as opening a new list item.
    pub fn set_list_start(&mut self, list_start: bool) {
        self.list_start = list_start;
    }

    /// Returns true if the line lies inside a block (code, table, comment).
    pub fn in_block(&self) -> bool {
        self.in_block
    }

    /// Marks the line as lying inside a block.
    pub fn set_in_block(&mut self, in_block: bool) {
        self.in_block = in_block;
    }
}

impl Cell {
    fn new(value: char, offset: usize, escaped: bool) -> Self {
        Self {
            value,
            offset,
            valid: true,
            escaped,
            inline_markup: false,
        }
    }
}

impl fmt::Display for Line {
    /// Renders the line with its classification, for debug traces.
    ///
    /// Flags: `X` erased, `[` in a block, `S<n>` header level,
    /// `L<n>` list level, `*` list start.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let erased = if self.erased { "X" } else { " " };
        let block = if self.in_block { "[" } else { " " };
        let start = if self.list_start { "*" } else { " " };
        write!(
            f,
            "{}{}S{}L{}{} {:>4}: ",
            erased, block, self.section_level, self.list_level, start, self.line_no
        )?;
        for cell in &self.cells {
            if cell.valid {
                write!(f, "{}", cell.value)?;
            } else {
                write!(f, "\u{2591}")?;
            }
        }
        Ok(())
    }
}
