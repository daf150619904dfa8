use std::fmt;

/// Handle to a geometry held by an [`AssetServer`](crate::AssetServer).
///
/// Handles are slot indices and only meaningful for the server that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryHandle {
    slot: usize,
}

impl GeometryHandle {
    pub(crate) fn new(slot: usize) -> Self {
        Self { slot }
    }

    /// Slot index inside the issuing server.
    pub fn slot(self) -> usize {
        self.slot
    }
}

impl fmt::Display for GeometryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "geometry#{}", self.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_compare_by_slot() {
        assert_eq!(GeometryHandle::new(3), GeometryHandle::new(3));
        assert!(GeometryHandle::new(1) < GeometryHandle::new(2));
        assert_eq!(GeometryHandle::new(7).slot(), 7);
        assert_eq!(GeometryHandle::new(7).to_string(), "geometry#7");
    }
}
