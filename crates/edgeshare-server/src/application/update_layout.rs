//! Builds the screen topology from a configuration description.
//!
//! [`build_layout`] turns the `[[screens]]` and `[[links]]` tables of the
//! config file into a validated [`ScreenLayout`].  Every inconsistency is
//! reported here, before the orchestrator starts, so a bad layout is never
//! discovered mid-session.
//!
//! Links are one-directional: `desk right -> laptop` does not imply
//! `laptop left -> desk`.  Configure both directions to move back and forth.

use edgeshare_core::{Edge, LayoutError, Link, ScreenLayout};
use thiserror::Error;

/// Error type for layout construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UpdateLayoutError {
    #[error("layout validation failed: {0}")]
    ValidationFailed(#[from] LayoutError),

    /// Two links leave the same screen through the same edge.
    #[error("screen {from:?} has more than one link on its {edge} edge")]
    ConflictingLink { from: String, edge: Edge },
}

/// Builds a [`ScreenLayout`] rooted at `primary`.
///
/// # Errors
///
/// - [`UpdateLayoutError::ValidationFailed`] for duplicate screen names, links
///   to unknown screens and self links.
/// - [`UpdateLayoutError::ConflictingLink`] when one edge is linked twice.
pub fn build_layout(
    primary: &str,
    screens: impl IntoIterator<Item = String>,
    links: impl IntoIterator<Item = Link>,
) -> Result<ScreenLayout, UpdateLayoutError> {
    let mut layout = ScreenLayout::new(primary);
    for name in screens {
        layout.add_screen(name)?;
    }

    for link in links {
        if layout.neighbor(&link.from, link.edge).is_some() {
            return Err(UpdateLayoutError::ConflictingLink {
                from: link.from,
                edge: link.edge,
            });
        }
        layout.set_link(link)?;
    }

    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(from: &str, edge: Edge, to: &str) -> Link {
        Link {
            from: from.to_string(),
            edge,
            to: to.to_string(),
        }
    }

    #[test]
    fn test_build_layout_with_two_way_link() {
        let layout = build_layout(
            "desk",
            vec!["laptop".to_string()],
            vec![
                link("desk", Edge::Right, "laptop"),
                link("laptop", Edge::Left, "desk"),
            ],
        )
        .unwrap();

        assert_eq!(layout.neighbor("desk", Edge::Right), Some("laptop"));
        assert_eq!(layout.neighbor("laptop", Edge::Left), Some("desk"));
        assert_eq!(layout.neighbor("desk", Edge::Left), None);
    }

    #[test]
    fn test_build_layout_empty_produces_primary_only() {
        let layout = build_layout("desk", Vec::new(), Vec::new()).unwrap();
        assert_eq!(layout.screens().collect::<Vec<_>>(), vec!["desk"]);
    }

    #[test]
    fn test_build_layout_rejects_duplicate_screen() {
        let result = build_layout("desk", vec!["desk".to_string()], Vec::new());
        assert_eq!(
            result.unwrap_err(),
            UpdateLayoutError::ValidationFailed(LayoutError::DuplicateScreen("desk".to_string()))
        );
    }

    #[test]
    fn test_build_layout_rejects_link_to_unknown_screen() {
        let result = build_layout("desk", Vec::new(), vec![link("desk", Edge::Top, "ghost")]);
        assert_eq!(
            result.unwrap_err(),
            UpdateLayoutError::ValidationFailed(LayoutError::UnknownScreen("ghost".to_string()))
        );
    }

    #[test]
    fn test_build_layout_rejects_same_edge_twice() {
        let result = build_layout(
            "desk",
            vec!["a".to_string(), "b".to_string()],
            vec![link("desk", Edge::Right, "a"), link("desk", Edge::Right, "b")],
        );
        assert_eq!(
            result.unwrap_err(),
            UpdateLayoutError::ConflictingLink {
                from: "desk".to_string(),
                edge: Edge::Right,
            }
        );
    }
}
