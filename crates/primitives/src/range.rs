/// A position in the linear document, measured in characters (not bytes).
///
/// This is the coordinate space of the transcript buffer and the position map.
pub type CharIdx = usize;

/// A length in the document, measured in characters (not bytes).
pub type CharLen = usize;
