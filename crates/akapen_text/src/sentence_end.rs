//! Sentence boundary detection.

/// Finds the end of the first complete sentence in a text buffer.
///
/// A boundary is an end-of-sentence symbol (optionally followed by a right
/// quotation mark) that is not part of a whitelisted abbreviation. Runs of
/// symbols such as `...` or `?!` are absorbed and the index of the last
/// one is returned. ASCII terminators only count when followed by
/// whitespace or the end of the buffer, so `ver.1.0` is not split; other
/// terminators such as `。` always count.
///
/// Indices count characters, not bytes. The detector holds no per-call
/// state and can be shared between threads.
///
/// # Example
///
/// ```rust,ignore
/// use akapen_text::EndOfSentenceDetector;
///
/// let detector = EndOfSentenceDetector::new(["."], ["Mr."]);
/// assert_eq!(detector.find_sentence_end("He is Mr. United States."), Some(23));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndOfSentenceDetector {
    end_symbols: Vec<Vec<char>>,
    right_quotations: Vec<char>,
    whitelist: Vec<Vec<char>>,
}

impl EndOfSentenceDetector {
    /// Creates a detector from end-of-sentence symbols and abbreviations.
    pub fn new<S, W>(end_symbols: S, whitelist: W) -> Self
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        W: IntoIterator,
        W::Item: AsRef<str>,
    {
        Self {
            end_symbols: to_patterns(end_symbols),
            right_quotations: Vec::new(),
            whitelist: to_patterns(whitelist),
        }
    }

    /// Sets the closing quotation marks that may follow a terminator.
    pub fn with_right_quotations(mut self, quotations: impl IntoIterator<Item = char>) -> Self {
        self.right_quotations = quotations.into_iter().collect();
        self
    }

    /// Returns the index of the last character of the first sentence
    /// terminator in `text`, or `None` when the text holds no complete
    /// sentence.
    pub fn find_sentence_end(&self, text: &str) -> Option<usize> {
        self.find_sentence_end_from(text, 0)
    }

    /// Like [`find_sentence_end`](Self::find_sentence_end), starting the
    /// scan at character index `start`.
    pub fn find_sentence_end_from(&self, text: &str, start: usize) -> Option<usize> {
        let chars: Vec<char> = text.chars().collect();
        let protected = self.whitelisted_positions(&chars);
        self.scan(&chars, &protected, start)
    }

    /// Returns the end index of every sentence in `text`, in order.
    ///
    /// Text after the last returned index holds no complete sentence.
    pub fn find_all_sentence_ends(&self, text: &str) -> Vec<usize> {
        let chars: Vec<char> = text.chars().collect();
        let protected = self.whitelisted_positions(&chars);

        let mut ends = Vec::new();
        let mut start = 0;
        while let Some(end) = self.scan(&chars, &protected, start) {
            ends.push(end);
            start = end + 1;
        }
        ends
    }

    fn scan(&self, chars: &[char], protected: &[bool], start: usize) -> Option<usize> {
        let mut index = start;
        while index < chars.len() {
            let Some(length) = self.terminator_at(chars, index) else {
                index += 1;
                continue;
            };

            let mut end = index + length;
            if protected[index..end].iter().any(|p| *p) {
                index = end;
                continue;
            }

            while end < chars.len()
                && let Some(next) = self.terminator_at(chars, end)
            {
                end += next;
            }

            let followed_by_text = chars.get(end).is_some_and(|c| !c.is_whitespace());
            if chars[index].is_ascii() && followed_by_text {
                index = end;
                continue;
            }

            return Some(end - 1);
        }
        None
    }

    /// Returns the length of the terminator starting at `index`, including
    /// a trailing right quotation mark.
    fn terminator_at(&self, chars: &[char], index: usize) -> Option<usize> {
        let symbol = self
            .end_symbols
            .iter()
            .filter(|s| chars[index..].starts_with(s))
            .map(Vec::len)
            .max()?;

        let quoted = chars
            .get(index + symbol)
            .is_some_and(|c| self.right_quotations.contains(c));
        Some(if quoted { symbol + 1 } else { symbol })
    }

    /// Marks characters covered by a whitelisted word that starts at the
    /// beginning of the text or after whitespace.
    fn whitelisted_positions(&self, chars: &[char]) -> Vec<bool> {
        let mut protected = vec![false; chars.len()];
        for word in self.whitelist.iter().filter(|w| !w.is_empty()) {
            for start in 0..chars.len() {
                let at_boundary = start == 0 || chars[start - 1].is_whitespace();
                if at_boundary && chars[start..].starts_with(word) {
                    for p in &mut protected[start..start + word.len()] {
                        *p = true;
                    }
                }
            }
        }
        protected
    }
}

fn to_patterns<I>(items: I) -> Vec<Vec<char>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().chars().collect::<Vec<_>>())
        .filter(|p| !p.is_empty())
        .collect()
}
