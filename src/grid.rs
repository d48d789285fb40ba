//! The icon grid: tiles, their click bindings and the current selection.

use crate::icon::{Icon, MarkupSummary};

/// Text shown when a render has no icons.
pub const NO_RESULTS: &str = "No icons found";

/// One rendered icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub name: String,
    pub summary: MarkupSummary,
    pub placeholder: bool,
}

impl Tile {
    fn from_icon(icon: &Icon) -> Self {
        Self {
            name: icon.name.clone(),
            summary: MarkupSummary::of(&icon.content),
            placeholder: icon.is_placeholder(),
        }
    }

    /// One-line description of the markup, e.g. `24x24 · 3 shapes`.
    #[must_use]
    pub fn caption(&self) -> String {
        if self.placeholder {
            return "?".to_string();
        }
        let shapes = match self.summary.shapes {
            1 => "1 shape".to_string(),
            n => format!("{n} shapes"),
        };
        match self.summary.dimensions() {
            Some(dims) => format!("{dims} \u{b7} {shapes}"),
            None => shapes,
        }
    }
}

/// What activating a tile does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileAction {
    /// Copy the icon name to the clipboard.
    CopyName(String),
}

/// What the grid area currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridContent {
    Tiles(Vec<Tile>),
    NoResults,
    Error(String),
}

/// The grid container.
///
/// Every render replaces the content and rebuilds the tile bindings from
/// scratch; nothing carries over from the previous render except a clamped
/// selection.
#[derive(Debug, Clone)]
pub struct Grid {
    content: GridContent,
    bindings: Vec<TileAction>,
    selected: usize,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            content: GridContent::NoResults,
            bindings: Vec::new(),
            selected: 0,
        }
    }

    /// Replaces the grid with one tile per icon.
    pub fn render(&mut self, icons: &[Icon]) {
        if icons.is_empty() {
            self.content = GridContent::NoResults;
        } else {
            self.content = GridContent::Tiles(icons.iter().map(Tile::from_icon).collect());
        }
        self.bind();
    }

    /// Replaces the grid with an inline error.
    pub fn render_error(&mut self, message: impl Into<String>) {
        self.content = GridContent::Error(message.into());
        self.bind();
    }

    fn bind(&mut self) {
        self.bindings = self
            .tiles()
            .iter()
            .map(|tile| TileAction::CopyName(tile.name.clone()))
            .collect();
        self.selected = self.selected.min(self.bindings.len().saturating_sub(1));
    }

    #[must_use]
    pub const fn content(&self) -> &GridContent {
        &self.content
    }

    /// Tiles currently shown; empty for the placeholder and error states.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        match &self.content {
            GridContent::Tiles(tiles) => tiles.as_slice(),
            GridContent::NoResults | GridContent::Error(_) => &[],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Action bound to the tile at `index`.
    #[must_use]
    pub fn activate(&self, index: usize) -> Option<TileAction> {
        self.bindings.get(index).cloned()
    }

    /// Action bound to the selected tile.
    #[must_use]
    pub fn activate_selected(&self) -> Option<TileAction> {
        self.activate(self.selected)
    }

    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    /// Moves the selection by `dx` columns and `dy` rows in a grid
    /// `columns` wide, stopping at the edges.
    pub fn move_selection(&mut self, dx: isize, dy: isize, columns: usize) {
        if self.bindings.is_empty() {
            return;
        }
        let to_isize = |n: usize| isize::try_from(n).unwrap_or(isize::MAX);
        let last = to_isize(self.bindings.len() - 1);
        let current = to_isize(self.selected);
        let target = current
            .saturating_add(dx)
            .saturating_add(dy.saturating_mul(to_isize(columns.max(1))));

        // Vertical moves past the first or last row keep the selection.
        let target = if dy != 0 && !(0..=last).contains(&target) {
            current
        } else {
            target.clamp(0, last)
        };
        self.selected = usize::try_from(target).unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::PLACEHOLDER_MARKUP;

    fn icons(n: usize) -> Vec<Icon> {
        (0..n)
            .map(|i| Icon::new(format!("icon-{i}"), r#"<svg viewBox="0 0 24 24"><path/></svg>"#))
            .collect()
    }

    #[test]
    fn render_builds_tiles_and_bindings() {
        let mut grid = Grid::new();
        grid.render(&icons(3));
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.tiles()[1].name, "icon-1");
        assert_eq!(
            grid.activate(2),
            Some(TileAction::CopyName("icon-2".to_string()))
        );
        assert_eq!(grid.activate(3), None);
    }

    #[test]
    fn empty_render_shows_no_results() {
        let mut grid = Grid::new();
        grid.render(&icons(2));
        grid.render(&[]);
        assert_eq!(grid.content(), &GridContent::NoResults);
        assert!(grid.is_empty());
        assert_eq!(grid.activate(0), None);
    }

    #[test]
    fn rerender_drops_old_bindings() {
        let mut grid = Grid::new();
        grid.render(&icons(5));
        grid.render(&[Icon::new("only", "<svg/>")]);
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.activate(4), None);
        assert_eq!(
            grid.activate_selected(),
            Some(TileAction::CopyName("only".to_string()))
        );
    }

    #[test]
    fn error_replaces_tiles() {
        let mut grid = Grid::new();
        grid.render(&icons(2));
        grid.render_error("Error loading icons: offline");
        assert_eq!(
            grid.content(),
            &GridContent::Error("Error loading icons: offline".to_string())
        );
        assert!(grid.tiles().is_empty());
        assert_eq!(grid.activate_selected(), None);
    }

    #[test]
    fn selection_moves_and_clamps() {
        let mut grid = Grid::new();
        grid.render(&icons(10));

        grid.move_selection(1, 0, 4);
        assert_eq!(grid.selected(), 1);
        grid.move_selection(0, 1, 4);
        assert_eq!(grid.selected(), 5);
        grid.move_selection(0, 1, 4);
        assert_eq!(grid.selected(), 9);
        grid.move_selection(0, 1, 4);
        assert_eq!(grid.selected(), 9);
        grid.move_selection(0, -1, 4);
        assert_eq!(grid.selected(), 5);
        grid.move_selection(0, -2, 4);
        assert_eq!(grid.selected(), 5);
        grid.move_selection(-9, 0, 4);
        assert_eq!(grid.selected(), 0);
    }

    #[test]
    fn selection_clamped_after_shrinking_render() {
        let mut grid = Grid::new();
        grid.render(&icons(10));
        grid.move_selection(8, 0, 4);
        grid.render(&icons(3));
        assert_eq!(grid.selected(), 2);
    }

    #[test]
    fn tile_caption() {
        let mut grid = Grid::new();
        grid.render(&[
            Icon::new("a", r#"<svg viewBox="0 0 24 24"><path/></svg>"#),
            Icon::new("b", "<svg><path/><path/></svg>"),
            Icon::new("c", PLACEHOLDER_MARKUP),
        ]);
        let tiles = grid.tiles();
        assert_eq!(tiles[0].caption(), "24x24 \u{b7} 1 shape");
        assert_eq!(tiles[1].caption(), "2 shapes");
        assert_eq!(tiles[2].caption(), "?");
    }
}
