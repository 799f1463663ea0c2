//! Dependency pickers: selectable units where some units require another unit
//! to be selected first, and pairs of units that together produce an outcome.

use std::collections::HashMap;

use thiserror::Error;

use super::geometry::{Connector, GeometryProvider};
use super::input::Region;
use crate::deck::frontmatter::WidgetSpec;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("duplicate unit `{0}`")]
    DuplicateUnit(String),
    #[error("unit `{unit}` requires unknown unit `{requires}`")]
    UnknownPrerequisite { unit: String, requires: String },
    #[error("unit `{0}` requires itself")]
    SelfPrerequisite(String),
    #[error("prerequisites of `{0}` form a cycle")]
    Cycle(String),
    #[error("pair refers to unknown unit `{0}`")]
    UnknownPairUnit(String),
    #[error("pair `{0}` joins a unit with itself")]
    DegeneratePair(String),
}

#[derive(Debug, Clone)]
pub struct Unit {
    pub id: String,
    pub label: String,
    pub requires: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Pair {
    pub units: [usize; 2],
    pub outcome: String,
}

/// Units and their prerequisite edges (unit → the unit it requires).
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    units: Vec<Unit>,
    pairs: Vec<Pair>,
}

impl DependencyGraph {
    pub fn from_spec(spec: &WidgetSpec) -> Result<Self, GraphError> {
        let mut index = HashMap::new();
        for (i, unit) in spec.units.iter().enumerate() {
            if index.insert(unit.id.as_str(), i).is_some() {
                return Err(GraphError::DuplicateUnit(unit.id.clone()));
            }
        }

        let mut units = Vec::with_capacity(spec.units.len());
        for unit in &spec.units {
            let requires = match &unit.requires {
                None => None,
                Some(req) if *req == unit.id => {
                    return Err(GraphError::SelfPrerequisite(unit.id.clone()));
                }
                Some(req) => Some(*index.get(req.as_str()).ok_or_else(|| {
                    GraphError::UnknownPrerequisite {
                        unit: unit.id.clone(),
                        requires: req.clone(),
                    }
                })?),
            };
            units.push(Unit {
                id: unit.id.clone(),
                label: unit.label.clone(),
                requires,
            });
        }

        let mut pairs = Vec::with_capacity(spec.pairs.len());
        for pair in &spec.pairs {
            let lookup = |id: &String| {
                index
                    .get(id.as_str())
                    .copied()
                    .ok_or_else(|| GraphError::UnknownPairUnit(id.clone()))
            };
            let a = lookup(&pair.units[0])?;
            let b = lookup(&pair.units[1])?;
            if a == b {
                return Err(GraphError::DegeneratePair(pair.units[0].clone()));
            }
            pairs.push(Pair {
                units: [a, b],
                outcome: pair.outcome.clone(),
            });
        }

        let graph = Self { units, pairs };
        graph.check_acyclic()?;
        Ok(graph)
    }

    fn check_acyclic(&self) -> Result<(), GraphError> {
        for start in 0..self.units.len() {
            let mut steps = 0;
            let mut cursor = self.units[start].requires;
            while let Some(next) = cursor {
                steps += 1;
                if next == start || steps > self.units.len() {
                    return Err(GraphError::Cycle(self.units[start].id.clone()));
                }
                cursor = self.units[next].requires;
            }
        }
        Ok(())
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn unit(&self, unit: usize) -> Option<&Unit> {
        self.units.get(unit)
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.units.iter().position(|u| u.id == id)
    }

    pub fn prerequisite(&self, unit: usize) -> Option<usize> {
        self.units.get(unit).and_then(|u| u.requires)
    }

    /// Units that directly require `unit`.
    pub fn dependents(&self, unit: usize) -> impl Iterator<Item = usize> + '_ {
        self.units
            .iter()
            .enumerate()
            .filter(move |(_, u)| u.requires == Some(unit))
            .map(|(i, _)| i)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Prerequisite not selected; nothing changed.
    Rejected { missing: usize },
    Selected,
    /// Unit cleared, along with the listed dependents.
    Deselected { cascaded: Vec<usize> },
    /// Index outside the widget.
    Ignored,
}

#[derive(Debug, Clone, Default)]
struct PairState {
    complete: bool,
    connector: Option<Connector>,
}

/// One dependency picker on one slide.
#[derive(Debug, Clone)]
pub struct DependencyWidget {
    index: usize,
    graph: DependencyGraph,
    selected: Vec<bool>,
    pairs: Vec<PairState>,
}

impl DependencyWidget {
    /// `index` is the widget's position in the deck, used to name its regions.
    pub fn new(index: usize, graph: DependencyGraph) -> Self {
        let selected = vec![false; graph.unit_count()];
        let pairs = vec![PairState::default(); graph.pair_count()];
        Self {
            index,
            graph,
            selected,
            pairs,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn region(&self, unit: usize) -> Region {
        Region::Unit {
            widget: self.index,
            unit,
        }
    }

    pub fn is_selected(&self, unit: usize) -> bool {
        self.selected.get(unit).copied().unwrap_or(false)
    }

    /// A unit can be chosen when it has no prerequisite or the prerequisite is selected.
    pub fn is_available(&self, unit: usize) -> bool {
        self.graph
            .prerequisite(unit)
            .is_none_or(|p| self.is_selected(p))
    }

    pub fn is_pristine(&self) -> bool {
        !self.selected.iter().any(|&s| s) && self.pairs.iter().all(|p| !p.complete)
    }

    pub fn is_complete(&self, pair: usize) -> bool {
        self.pairs.get(pair).is_some_and(|p| p.complete)
    }

    /// Connector of a complete pair, once its geometry is known.
    pub fn connector(&self, pair: usize) -> Option<Connector> {
        self.pairs
            .get(pair)
            .filter(|p| p.complete)
            .and_then(|p| p.connector)
    }

    /// Outcomes of the complete pairs.
    pub fn outcomes(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph
            .pairs()
            .iter()
            .zip(&self.pairs)
            .filter(|(_, state)| state.complete)
            .map(|(pair, _)| pair.outcome.as_str())
    }

    pub fn click(&mut self, unit: usize, geometry: &dyn GeometryProvider) -> ClickOutcome {
        if unit >= self.selected.len() {
            return ClickOutcome::Ignored;
        }
        if let Some(missing) = self.graph.prerequisite(unit) {
            if !self.selected[missing] {
                return ClickOutcome::Rejected { missing };
            }
        }

        let outcome = if self.selected[unit] {
            self.selected[unit] = false;
            ClickOutcome::Deselected {
                cascaded: self.cascade_from(unit),
            }
        } else {
            self.selected[unit] = true;
            ClickOutcome::Selected
        };

        self.update_pairs(geometry);
        outcome
    }

    /// Clear every selected unit that depends, directly or through other
    /// units, on the cleared unit `root`.
    fn cascade_from(&mut self, root: usize) -> Vec<usize> {
        let mut cleared = Vec::new();
        let mut stack = vec![root];
        while let Some(unit) = stack.pop() {
            let dependents: Vec<usize> = self.graph.dependents(unit).collect();
            for dep in dependents {
                if self.selected[dep] {
                    self.selected[dep] = false;
                    cleared.push(dep);
                    stack.push(dep);
                }
            }
        }
        cleared
    }

    fn update_pairs(&mut self, geometry: &dyn GeometryProvider) {
        for (i, pair) in self.graph.pairs.iter().enumerate() {
            let [a, b] = pair.units;
            let complete = self.selected[a] && self.selected[b];
            let state = &mut self.pairs[i];
            match (state.complete, complete) {
                (false, true) => {
                    state.complete = true;
                    state.connector = measure(self.index, pair, geometry);
                }
                (true, false) => *state = PairState::default(),
                _ => {}
            }
        }
    }

    /// Fix connectors of complete pairs whose regions were not laid out when
    /// they completed. Connectors already fixed are left alone.
    pub fn fill_missing_connectors(&mut self, geometry: &dyn GeometryProvider) {
        for (i, pair) in self.graph.pairs.iter().enumerate() {
            let state = &mut self.pairs[i];
            if state.complete && state.connector.is_none() {
                state.connector = measure(self.index, pair, geometry);
            }
        }
    }

    pub fn reset(&mut self) {
        self.selected.fill(false);
        self.pairs.fill(PairState::default());
    }
}

fn measure(widget: usize, pair: &Pair, geometry: &dyn GeometryProvider) -> Option<Connector> {
    let [a, b] = pair.units;
    let ra = geometry.region(Region::Unit { widget, unit: a })?;
    let rb = geometry.region(Region::Unit { widget, unit: b })?;
    Connector::between(ra, rb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::frontmatter::{PairSpec, UnitSpec};
    use crate::presenter::geometry::NoGeometry;
    use eframe::egui::{Rect, pos2, vec2};
    use proptest::prelude::*;
    use std::cell::Cell;

    fn unit(id: &str, requires: Option<&str>) -> UnitSpec {
        UnitSpec {
            id: id.to_string(),
            label: id.to_uppercase(),
            requires: requires.map(str::to_string),
        }
    }

    fn pair(a: &str, b: &str) -> PairSpec {
        PairSpec {
            units: [a.to_string(), b.to_string()],
            outcome: format!("{a}+{b}"),
        }
    }

    fn spec(units: Vec<UnitSpec>, pairs: Vec<PairSpec>) -> WidgetSpec {
        WidgetSpec {
            id: "w".to_string(),
            title: None,
            units,
            pairs,
        }
    }

    /// first → second, third → fourth
    fn four_flags() -> DependencyWidget {
        let graph = DependencyGraph::from_spec(&spec(
            vec![
                unit("first", None),
                unit("second", Some("first")),
                unit("third", None),
                unit("fourth", Some("third")),
            ],
            vec![pair("first", "second"), pair("third", "fourth")],
        ))
        .unwrap();
        DependencyWidget::new(0, graph)
    }

    /// Lays the units of widget 0 out in a row, 100px wide with 50px gaps.
    struct Row {
        calls: Cell<usize>,
    }

    impl Row {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
            }
        }
    }

    impl GeometryProvider for Row {
        fn region(&self, region: Region) -> Option<Rect> {
            self.calls.set(self.calls.get() + 1);
            match region {
                Region::Unit { widget: 0, unit } => Some(Rect::from_min_size(
                    pos2(unit as f32 * 150.0, 0.0),
                    vec2(100.0, 40.0),
                )),
                _ => None,
            }
        }
    }

    const FIRST: usize = 0;
    const SECOND: usize = 1;
    const THIRD: usize = 2;
    const FOURTH: usize = 3;

    #[test]
    fn test_graph_rejects_unknown_prerequisite() {
        let err = DependencyGraph::from_spec(&spec(vec![unit("a", Some("x"))], vec![]))
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::UnknownPrerequisite {
                unit: "a".to_string(),
                requires: "x".to_string()
            }
        );
    }

    #[test]
    fn test_graph_rejects_self_and_cycles() {
        assert!(matches!(
            DependencyGraph::from_spec(&spec(vec![unit("a", Some("a"))], vec![])),
            Err(GraphError::SelfPrerequisite(_))
        ));
        assert!(matches!(
            DependencyGraph::from_spec(&spec(
                vec![unit("a", Some("b")), unit("b", Some("a"))],
                vec![]
            )),
            Err(GraphError::Cycle(_))
        ));
    }

    #[test]
    fn test_graph_rejects_bad_pairs() {
        assert!(matches!(
            DependencyGraph::from_spec(&spec(vec![unit("a", None)], vec![pair("a", "z")])),
            Err(GraphError::UnknownPairUnit(_))
        ));
        assert!(matches!(
            DependencyGraph::from_spec(&spec(vec![unit("a", None)], vec![pair("a", "a")])),
            Err(GraphError::DegeneratePair(_))
        ));
        assert!(matches!(
            DependencyGraph::from_spec(&spec(vec![unit("a", None), unit("a", None)], vec![])),
            Err(GraphError::DuplicateUnit(_))
        ));
    }

    #[test]
    fn test_dependents() {
        let w = four_flags();
        assert_eq!(w.graph().dependents(FIRST).collect::<Vec<_>>(), vec![SECOND]);
        assert_eq!(w.graph().dependents(SECOND).count(), 0);
        assert_eq!(w.graph().position("fourth"), Some(FOURTH));
    }

    #[test]
    fn test_dependent_before_prerequisite_is_rejected() {
        let mut w = four_flags();
        assert_eq!(
            w.click(SECOND, &NoGeometry),
            ClickOutcome::Rejected { missing: FIRST }
        );
        assert!(!w.is_selected(SECOND));
        assert!(!w.is_available(SECOND));
        assert!(w.is_pristine());
    }

    #[test]
    fn test_completing_a_pair_shows_connector() {
        let mut w = four_flags();
        let geo = Row::new();
        assert_eq!(w.click(FIRST, &geo), ClickOutcome::Selected);
        assert!(w.is_available(SECOND));
        assert_eq!(w.click(SECOND, &geo), ClickOutcome::Selected);
        assert!(w.is_complete(0));
        let c = w.connector(0).unwrap();
        assert_eq!(c.from, pos2(100.0, 20.0));
        assert_eq!(c.to, pos2(150.0, 20.0));
        assert_eq!(w.outcomes().collect::<Vec<_>>(), vec!["first+second"]);
        assert!(!w.is_complete(1));
    }

    #[test]
    fn test_deselecting_prerequisite_cascades_and_hides() {
        let mut w = four_flags();
        let geo = Row::new();
        w.click(FIRST, &geo);
        w.click(SECOND, &geo);
        assert_eq!(
            w.click(FIRST, &geo),
            ClickOutcome::Deselected {
                cascaded: vec![SECOND]
            }
        );
        assert!(!w.is_selected(SECOND));
        assert!(!w.is_complete(0));
        assert!(w.connector(0).is_none());
        assert_eq!(w.outcomes().count(), 0);
    }

    #[test]
    fn test_deselecting_dependent_keeps_prerequisite() {
        let mut w = four_flags();
        w.click(THIRD, &NoGeometry);
        w.click(FOURTH, &NoGeometry);
        assert_eq!(
            w.click(FOURTH, &NoGeometry),
            ClickOutcome::Deselected { cascaded: vec![] }
        );
        assert!(w.is_selected(THIRD));
        assert!(!w.is_complete(1));
    }

    #[test]
    fn test_connector_is_computed_once() {
        let mut w = four_flags();
        let geo = Row::new();
        w.click(FIRST, &geo);
        w.click(SECOND, &geo);
        let after_complete = geo.calls.get();
        let fixed = w.connector(0);

        // Toggling the other pair must not re-measure the first one.
        w.click(THIRD, &geo);
        w.fill_missing_connectors(&geo);
        assert_eq!(w.connector(0), fixed);
        assert_eq!(geo.calls.get(), after_complete);
    }

    #[test]
    fn test_missing_geometry_is_filled_later() {
        let mut w = four_flags();
        w.click(FIRST, &NoGeometry);
        w.click(SECOND, &NoGeometry);
        assert!(w.is_complete(0));
        assert!(w.connector(0).is_none());
        w.fill_missing_connectors(&Row::new());
        assert!(w.connector(0).is_some());
    }

    #[test]
    fn test_reset_returns_to_first_visit_state() {
        let mut w = four_flags();
        let geo = Row::new();
        for u in [FIRST, SECOND, THIRD, FOURTH] {
            w.click(u, &geo);
        }
        w.reset();
        assert!(w.is_pristine());
        assert!(w.connector(0).is_none());
        assert!(w.connector(1).is_none());
        w.reset();
        assert!(w.is_pristine());
    }

    #[test]
    fn test_cascade_through_longer_chains() {
        let graph = DependencyGraph::from_spec(&spec(
            vec![unit("a", None), unit("b", Some("a")), unit("c", Some("b"))],
            vec![],
        ))
        .unwrap();
        let mut w = DependencyWidget::new(0, graph);
        w.click(0, &NoGeometry);
        w.click(1, &NoGeometry);
        w.click(2, &NoGeometry);
        match w.click(0, &NoGeometry) {
            ClickOutcome::Deselected { mut cascaded } => {
                cascaded.sort_unstable();
                assert_eq!(cascaded, vec![1, 2]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(w.is_pristine());
    }

    #[test]
    fn test_out_of_range_click() {
        let mut w = four_flags();
        assert_eq!(w.click(42, &NoGeometry), ClickOutcome::Ignored);
    }

    proptest! {
        /// No click sequence selects a unit whose prerequisite is unselected,
        /// and a pair is complete exactly when both of its units are selected.
        #[test]
        fn selection_respects_prerequisites(clicks in prop::collection::vec(0usize..4, 0..40)) {
            let mut w = four_flags();
            let geo = Row::new();
            for u in clicks {
                w.click(u, &geo);
                for unit in 0..4 {
                    if w.is_selected(unit) {
                        prop_assert!(w.is_available(unit));
                    }
                }
                for (p, pair) in w.graph().pairs().iter().enumerate() {
                    let both = w.is_selected(pair.units[0]) && w.is_selected(pair.units[1]);
                    prop_assert_eq!(w.is_complete(p), both);
                    prop_assert_eq!(w.connector(p).is_some(), both);
                }
            }
        }

        /// Clearing a prerequisite always clears its dependents.
        #[test]
        fn deselect_cascades(clicks in prop::collection::vec(0usize..4, 0..20)) {
            let mut w = four_flags();
            for u in clicks {
                w.click(u, &NoGeometry);
            }
            for root in [FIRST, THIRD] {
                if w.is_selected(root) {
                    w.click(root, &NoGeometry);
                    for dep in w.graph().dependents(root).collect::<Vec<_>>() {
                        prop_assert!(!w.is_selected(dep));
                    }
                }
            }
        }

        /// Reset after any history matches a fresh widget.
        #[test]
        fn reset_is_complete(clicks in prop::collection::vec(0usize..4, 0..20)) {
            let mut w = four_flags();
            for u in clicks {
                w.click(u, &Row::new());
            }
            w.reset();
            prop_assert!(w.is_pristine());
            for p in 0..2 {
                prop_assert!(w.connector(p).is_none());
            }
        }
    }
}
