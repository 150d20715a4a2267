/// What a sprite must recompute before its vertices are valid again.
///
/// The variants are ordered by cost and marking only ever moves upward:
/// a pending rebuild absorbs any translation requested in the same frame,
/// because the rebuild places corners from the absolute position anyway.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Staleness {
    /// Vertices match the current properties.
    #[default]
    Clean,
    /// Only the position moved; vertices can be shifted by the pending delta.
    Translate,
    /// Scale, pivot or angle changed; every corner is recomputed.
    Rebuild,
}

impl Staleness {
    #[inline]
    pub fn is_clean(self) -> bool {
        self == Staleness::Clean
    }

    #[inline]
    pub(crate) fn mark_translate(&mut self) {
        *self = (*self).max(Staleness::Translate);
    }

    #[inline]
    pub(crate) fn mark_rebuild(&mut self) {
        *self = Staleness::Rebuild;
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        *self = Staleness::Clean;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_never_downgrades_rebuild() {
        let mut s = Staleness::Rebuild;
        s.mark_translate();
        assert_eq!(s, Staleness::Rebuild);
    }

    #[test]
    fn rebuild_absorbs_translate() {
        let mut s = Staleness::Clean;
        s.mark_translate();
        assert_eq!(s, Staleness::Translate);
        s.mark_rebuild();
        assert_eq!(s, Staleness::Rebuild);
        s.clear();
        assert!(s.is_clean());
    }
}
