use std::fmt::{self, Display, Write};

///
/// PathSegment
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PathSegment {
    Field(&'static str),
    Index(usize),
}

impl From<&'static str> for PathSegment {
    fn from(s: &'static str) -> Self {
        Self::Field(s)
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

///
/// FieldPath
///
/// Position of a traversal inside a message tree.
/// Renders as `a.b[2].c`, the same dotted form field masks use.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    pub fn push(&mut self, seg: impl Into<PathSegment>) {
        self.segments.push(seg.into());
    }

    pub fn pop(&mut self) {
        self.segments.pop();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn render(&self) -> String {
        render_path(&self.segments)
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn render_path(path: &[PathSegment]) -> String {
    let mut out = String::new();

    for (i, seg) in path.iter().enumerate() {
        match seg {
            PathSegment::Field(s) => {
                if i > 0 {
                    out.push('.');
                }
                out.push_str(s);
            }
            PathSegment::Index(index) => {
                let _ = write!(out, "[{index}]");
            }
        }
    }

    out
}

///
/// TESTS
///
