// ---- Selection ----

/// Byte range of the editor selection. `start <= end` always holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn cursor(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn is_cursor(self) -> bool {
        self.start == self.end
    }

    /// Clamp to `text` and move each end down onto a char boundary.
    pub fn clamp_to(self, text: &str) -> Self {
        Self::new(
            floor_char_boundary(text, self.start),
            floor_char_boundary(text, self.end),
        )
    }
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

// ---- Insertion ----

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Insertion {
    pub content: String,
    /// Covers the originally selected text at its new position, without the
    /// inserted tokens.
    pub selection: Selection,
}

/// Markup about to be wrapped around a selection. Built per toolbar click and
/// consumed immediately.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingInsertion<'a> {
    pub selection: Selection,
    pub before: &'a str,
    pub after: &'a str,
}

impl PendingInsertion<'_> {
    pub fn apply(self, content: &str) -> Insertion {
        let selection = self.selection.clamp_to(content);
        let selected = &content[selection.start..selection.end];

        let mut next = String::with_capacity(content.len() + self.before.len() + self.after.len());
        next.push_str(&content[..selection.start]);
        next.push_str(self.before);
        next.push_str(selected);
        next.push_str(self.after);
        next.push_str(&content[selection.end..]);

        let start = selection.start + self.before.len();
        Insertion {
            content: next,
            selection: Selection::new(start, start + selected.len()),
        }
    }
}

/// Replace the selected range with `before + selected + after`.
pub fn insert(content: &str, selection: Selection, before: &str, after: &str) -> Insertion {
    PendingInsertion {
        selection,
        before,
        after,
    }
    .apply(content)
}

// ---- Toolbar ----

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolbarAction {
    Bold,
    Italic,
    Heading1,
    Heading2,
    Heading3,
    Link,
    Image,
    Code,
    List,
    Quote,
    Comment,
    CodeBlock,
    TaskList,
}

impl ToolbarAction {
    pub fn all() -> &'static [ToolbarAction] {
        &[
            ToolbarAction::Bold,
            ToolbarAction::Italic,
            ToolbarAction::Heading1,
            ToolbarAction::Heading2,
            ToolbarAction::Heading3,
            ToolbarAction::Link,
            ToolbarAction::Image,
            ToolbarAction::Code,
            ToolbarAction::List,
            ToolbarAction::Quote,
            ToolbarAction::Comment,
            ToolbarAction::CodeBlock,
            ToolbarAction::TaskList,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToolbarAction::Bold => "Bold",
            ToolbarAction::Italic => "Italic",
            ToolbarAction::Heading1 => "Heading 1",
            ToolbarAction::Heading2 => "Heading 2",
            ToolbarAction::Heading3 => "Heading 3",
            ToolbarAction::Link => "Link",
            ToolbarAction::Image => "Image",
            ToolbarAction::Code => "Code",
            ToolbarAction::List => "List",
            ToolbarAction::Quote => "Quote",
            ToolbarAction::Comment => "Comment",
            ToolbarAction::CodeBlock => "Code Block",
            ToolbarAction::TaskList => "Task List",
        }
    }

    /// Tokens placed before and after the selection.
    pub fn tokens(&self) -> (&'static str, &'static str) {
        match self {
            ToolbarAction::Bold => ("**", "**"),
            ToolbarAction::Italic => ("*", "*"),
            ToolbarAction::Heading1 => ("# ", ""),
            ToolbarAction::Heading2 => ("## ", ""),
            ToolbarAction::Heading3 => ("### ", ""),
            ToolbarAction::Link => ("[", "](url)"),
            ToolbarAction::Image => ("![", "](url)"),
            ToolbarAction::Code => ("`", "`"),
            ToolbarAction::List => ("- ", ""),
            ToolbarAction::Quote => ("> ", ""),
            ToolbarAction::Comment => ("<!-- ", " -->"),
            ToolbarAction::CodeBlock => ("```\n", "\n```"),
            ToolbarAction::TaskList => ("- [ ] ", ""),
        }
    }

    pub fn pending(&self, selection: Selection) -> PendingInsertion<'static> {
        let (before, after) = self.tokens();
        PendingInsertion {
            selection,
            before,
            after,
        }
    }
}
