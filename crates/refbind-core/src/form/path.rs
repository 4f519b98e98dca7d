use std::fmt;

///
/// PathSegment
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(s: &str) -> Self {
        Self::Field(s.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

///
/// FormPath
///
/// Address of a node inside the form value tree.
/// Parsed from dotted notation (`certifications.2.references`), where purely
/// numeric segments are array indices. Rendered with bracketed indices.
///

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct FormPath {
    segments: Vec<PathSegment>,
}

impl FormPath {
    /// The empty path addresses the whole form value.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parse a dotted path. Empty segments are ignored.
    #[must_use]
    pub fn parse(dotted: &str) -> Self {
        let segments = dotted
            .split('.')
            .filter(|s| !s.is_empty())
            .map(|s| match s.parse::<usize>() {
                Ok(index) => PathSegment::Index(index),
                Err(_) => PathSegment::Field(s.to_string()),
            })
            .collect();

        Self { segments }
    }

    #[must_use]
    pub fn field(mut self, name: &str) -> Self {
        self.segments.push(PathSegment::from(name));
        self
    }

    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(PathSegment::Index(index));
        self
    }

    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Split into the parent path and the final segment.
    #[must_use]
    pub fn split_last(&self) -> Option<(Self, &PathSegment)> {
        let (last, parent) = self.segments.split_last()?;

        Some((
            Self {
                segments: parent.to_vec(),
            },
            last,
        ))
    }
}

impl fmt::Display for FormPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }

        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                PathSegment::Field(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }

        Ok(())
    }
}

///
/// TESTS
///
