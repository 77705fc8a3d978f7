//! Desktop icon selection set and box-select geometry.

use crate::desktop_icons::IconId;

/// Axis-aligned rectangle in desktop pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn from_origin(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    /// Inclusive point containment.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// `true` when the rectangles touch or intersect.
pub fn check_overlap(a: &Bounds, b: &Bounds) -> bool {
    !(b.right < a.left || b.left > a.right || b.bottom < a.top || b.top > a.bottom)
}

/// Receives selected-marker updates so the visual state tracks the set exactly.
pub trait SelectionSurface {
    fn set_selected(&mut self, id: &IconId, selected: bool);
}

/// Ordered set of selected icons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionManager {
    selected: Vec<IconId>,
}

impl SelectionManager {
    pub fn add(&mut self, surface: &mut impl SelectionSurface, id: &IconId) {
        if !self.has(id) {
            self.selected.push(id.clone());
        }
        surface.set_selected(id, true);
    }

    pub fn remove(&mut self, surface: &mut impl SelectionSurface, id: &IconId) {
        self.selected.retain(|selected| selected != id);
        surface.set_selected(id, false);
    }

    pub fn toggle(&mut self, surface: &mut impl SelectionSurface, id: &IconId) {
        if self.has(id) {
            self.remove(surface, id);
        } else {
            self.add(surface, id);
        }
    }

    pub fn clear(&mut self, surface: &mut impl SelectionSurface) {
        for id in self.selected.drain(..) {
            surface.set_selected(&id, false);
        }
    }

    pub fn has(&self, id: &IconId) -> bool {
        self.selected.contains(id)
    }

    /// Selected icons in selection order.
    pub fn to_array(&self) -> Vec<IconId> {
        self.selected.clone()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Drops `id` from the set without touching the surface (the icon no longer exists).
    pub(crate) fn forget(&mut self, id: &IconId) {
        self.selected.retain(|selected| selected != id);
    }
}

/// Rubber-band rectangle anchored at the pointer-down position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSelection {
    origin: (f64, f64),
    current: (f64, f64),
}

impl BoxSelection {
    pub fn start(x: f64, y: f64) -> Self {
        Self {
            origin: (x, y),
            current: (x, y),
        }
    }

    pub fn update(&mut self, x: f64, y: f64) {
        self.current = (x, y);
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            left: self.origin.0.min(self.current.0),
            top: self.origin.1.min(self.current.1),
            right: self.origin.0.max(self.current.0),
            bottom: self.origin.1.max(self.current.1),
        }
    }

    /// Recomputes membership: every icon overlapping the box is selected, every other is not.
    pub fn apply<'a>(
        &self,
        selection: &mut SelectionManager,
        surface: &mut impl SelectionSurface,
        icons: impl IntoIterator<Item = (&'a IconId, Bounds)>,
    ) {
        let area = self.bounds();
        for (id, bounds) in icons {
            if check_overlap(&area, &bounds) {
                selection.add(surface, id);
            } else {
                selection.remove(surface, id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct Markers(BTreeMap<IconId, bool>);

    impl SelectionSurface for Markers {
        fn set_selected(&mut self, id: &IconId, selected: bool) {
            self.0.insert(id.clone(), selected);
        }
    }

    fn id(name: &str) -> IconId {
        IconId::new(name)
    }

    #[test]
    fn markers_track_the_set() {
        let mut selection = SelectionManager::default();
        let mut markers = Markers::default();

        selection.add(&mut markers, &id("a"));
        selection.add(&mut markers, &id("b"));
        selection.add(&mut markers, &id("a"));
        selection.toggle(&mut markers, &id("b"));

        assert_eq!(selection.to_array(), vec![id("a")]);
        assert_eq!(markers.0.get(&id("b")), Some(&false));
        assert_eq!(markers.0.get(&id("a")), Some(&true));

        selection.clear(&mut markers);
        assert!(selection.is_empty());
        assert!(markers.0.values().all(|selected| !selected));
    }

    #[test]
    fn overlap_is_inclusive_at_edges() {
        let a = Bounds::from_origin(0.0, 0.0, 10.0, 10.0);
        assert!(check_overlap(&a, &Bounds::from_origin(10.0, 10.0, 5.0, 5.0)));
        assert!(!check_overlap(&a, &Bounds::from_origin(10.5, 0.0, 5.0, 5.0)));
        assert!(check_overlap(&a, &Bounds::from_origin(-5.0, -5.0, 30.0, 30.0)));
    }

    #[test]
    fn box_selection_recomputes_membership_on_every_update() {
        let mut selection = SelectionManager::default();
        let mut markers = Markers::default();
        let icons = [
            (id("near"), Bounds::from_origin(10.0, 10.0, 80.0, 100.0)),
            (id("far"), Bounds::from_origin(400.0, 10.0, 80.0, 100.0)),
        ];

        let mut rubber_band = BoxSelection::start(500.0, 200.0);
        rubber_band.update(300.0, 50.0);
        rubber_band.apply(
            &mut selection,
            &mut markers,
            icons.iter().map(|(id, b)| (id, *b)),
        );
        assert_eq!(selection.to_array(), vec![id("far")]);

        rubber_band.update(0.0, 0.0);
        rubber_band.apply(
            &mut selection,
            &mut markers,
            icons.iter().map(|(id, b)| (id, *b)),
        );
        assert_eq!(selection.to_array(), vec![id("far"), id("near")]);

        rubber_band.update(450.0, 100.0);
        rubber_band.apply(
            &mut selection,
            &mut markers,
            icons.iter().map(|(id, b)| (id, *b)),
        );
        assert_eq!(selection.to_array(), vec![id("far")]);
    }
}
