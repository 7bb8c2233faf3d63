use alloc::borrow::Cow;
use core::fmt;

use crate::compile::Direction;

// -----------------------------------------------------------------------------
// MappingMode

/// Which directions a mapping takes part in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MappingMode {
    #[default]
    ReadWrite,
    /// Read from instances only; never written from the external source.
    ReadOnly,
    /// Written into instances only; never read out.
    WriteOnly,
}

impl MappingMode {
    /// Returns `true` if this mode includes `direction`.
    #[inline]
    pub const fn allows(self, direction: Direction) -> bool {
        match (self, direction) {
            (Self::ReadWrite, _) => true,
            (Self::ReadOnly, Direction::Get) => true,
            (Self::WriteOnly, Direction::Set) => true,
            _ => false,
        }
    }
}

impl fmt::Display for MappingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ReadWrite => "read-write",
            Self::ReadOnly => "read-only",
            Self::WriteOnly => "write-only",
        })
    }
}

// -----------------------------------------------------------------------------
// MappingTag

/// Per-kind mapping metadata of a member.
///
/// # Examples
///
/// ```
/// use mk_access::mapping::{MappingMode, MappingTag};
///
/// let tag = MappingTag::named("created_at")
///     .with_mode(MappingMode::ReadOnly)
///     .with_index(4);
///
/// assert_eq!(tag.name(), Some("created_at"));
/// assert_eq!(tag.index(), Some(4));
/// assert!(!tag.is_required());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MappingTag {
    name: Option<Cow<'static, str>>,
    mode: MappingMode,
    index: Option<usize>,
    required: bool,
}

impl MappingTag {
    /// Creates a read-write tag that keeps the member's name.
    #[inline]
    pub const fn new() -> Self {
        Self {
            name: None,
            mode: MappingMode::ReadWrite,
            index: None,
            required: false,
        }
    }

    /// Creates a read-write tag with an external name.
    #[inline]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new().with_name(name)
    }

    #[inline]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[inline]
    pub fn with_mode(mut self, mode: MappingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets a positional index, for formats addressed by position (cells, fields).
    #[inline]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Marks the mapping as required by the external format.
    #[inline]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Returns the declared external name.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub(crate) fn name_cow(&self) -> Option<&Cow<'static, str>> {
        self.name.as_ref()
    }

    #[inline]
    pub const fn mode(&self) -> MappingMode {
        self.mode
    }

    #[inline]
    pub const fn index(&self) -> Option<usize> {
        self.index
    }

    #[inline]
    pub const fn is_required(&self) -> bool {
        self.required
    }
}
