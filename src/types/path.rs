use std::fmt;

/// A dotted/bracketed chain identifying a nested location within the
/// context, e.g. `users[0].profile.name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    /// The root name, resolved against the context layers.
    pub root: String,
    /// Remaining segments, traversed in order.
    pub segments: Vec<Segment>,
}

/// One step of a [`Path`] after the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A `.name` map key lookup.
    Key(String),
    /// A `[n]` list index lookup.
    Index(usize),
}

impl Path {
    /// A path consisting of a bare root name.
    #[must_use]
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            root: name.into(),
            segments: Vec::new(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for segment in &self.segments {
            match segment {
                Segment::Key(name) => write!(f, ".{name}")?,
                Segment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}
