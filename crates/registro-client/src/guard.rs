//! Client-side injection heuristic.
//!
//! This is a literal, case-insensitive substring scan. It deters casual
//! pasting of markup and nothing more; the server does not rely on it.

/// Marker checked when no other is configured.
pub const DEFAULT_MARKER: &str = "<script";

#[derive(Debug, Clone)]
pub struct InjectionGuard {
    markers: Vec<String>,
}

impl Default for InjectionGuard {
    fn default() -> Self {
        Self::new([DEFAULT_MARKER])
    }
}

impl InjectionGuard {
    /// Guard against each of `markers`. Empty markers are ignored.
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let markers = markers
            .into_iter()
            .map(|m| m.as_ref().to_lowercase())
            .filter(|m| !m.is_empty())
            .collect();
        Self { markers }
    }

    /// Whether `input` contains any marker, ignoring case.
    pub fn is_suspicious(&self, input: &str) -> bool {
        if self.markers.is_empty() {
            return false;
        }
        let input = input.to_lowercase();
        self.markers.iter().any(|m| input.contains(m.as_str()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn detects_marker_in_any_case() {
        let guard = InjectionGuard::default();
        assert!(guard.is_suspicious("hola <SCRIPT>alert(1)</script>"));
        assert!(guard.is_suspicious("<ScRiPt"));
        assert!(!guard.is_suspicious("script sin corchete"));
        assert!(!guard.is_suspicious("<scrip t>"));
    }

    #[test]
    fn custom_markers_replace_the_default() {
        let guard = InjectionGuard::new(["<iframe", ""]);
        assert!(guard.is_suspicious("<IFRAME src=x>"));
        assert!(!guard.is_suspicious("<script>"));
        assert!(!InjectionGuard::new(Vec::<String>::new()).is_suspicious("<script>"));
    }
}
