use std::fmt;

/// A map position, carried on diagnostics so failures can be traced back to
/// the tile that triggered them without re-deriving it from a log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagPos {
    pub x: i32,
    pub y: i32,
}

impl fmt::Display for DiagPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four error kinds named by the generator's error handling design.
///
/// `LackOfSpace` is the only kind a caller is expected to recover from (by
/// retrying generation with a different seed); the rest indicate a
/// malformed template, a missing catalog entry, or a broken invariant and
/// are treated as fatal.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("zone {zone_id}: placement exhausted possible tiles near {pos} (seed {seed})")]
    LackOfSpace {
        zone_id: u32,
        pos: DiagPos,
        seed: u32,
    },

    #[error("template invalid: {reason}")]
    TemplateInvalid { reason: String },

    #[error("catalog missing entry: {kind} '{id}'")]
    CatalogMissing { kind: &'static str, id: String },

    #[error("internal invariant violated in zone {zone_id}: {reason}")]
    Internal { zone_id: u32, reason: String },
}

impl GenError {
    pub fn lack_of_space(zone_id: u32, pos: (i32, i32), seed: u32) -> Self {
        GenError::LackOfSpace {
            zone_id,
            pos: DiagPos { x: pos.0, y: pos.1 },
            seed,
        }
    }

    pub fn internal(zone_id: u32, reason: impl Into<String>) -> Self {
        GenError::Internal {
            zone_id,
            reason: reason.into(),
        }
    }

    pub fn template_invalid(reason: impl Into<String>) -> Self {
        GenError::TemplateInvalid {
            reason: reason.into(),
        }
    }

    pub fn catalog_missing(kind: &'static str, id: impl Into<String>) -> Self {
        GenError::CatalogMissing {
            kind,
            id: id.into(),
        }
    }

    /// `true` for the one kind a driver may retry with a fresh seed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenError::LackOfSpace { .. })
    }
}

pub type GenResult<T> = Result<T, GenError>;
