//! The validated, immutable set of cells a run operates on.
//!
//! [`Landscape`] flattens [`CellRecord`]s into dense arrays indexed by
//! position (ascending [`CellId`]). Every per-cell structure in the
//! engine is a `Vec` aligned with these positions, so lookups during
//! stepping are plain indexing.

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::cell::{AttributeValue, CellRecord, ConversionState, ModelCellState};
use crate::error::CoreError;
use crate::id::CellId;

/// Immutable input view of every cell in a study area.
#[derive(Clone, Debug)]
pub struct Landscape {
    ids: Vec<CellId>,
    positions: HashMap<CellId, usize>,
    predictor_names: IndexMap<String, usize>,
    /// Row-major `cell × predictor` matrix.
    predictors: Vec<f64>,
    attributes: Vec<IndexMap<String, AttributeValue>>,
    initial: Vec<ConversionState>,
    model_states: Vec<Option<ModelCellState>>,
}

impl Landscape {
    /// Build a landscape from collaborator records.
    ///
    /// Records are reordered by ascending id. Every record must carry
    /// the same predictor names as the first one, and every predictor
    /// value must be finite.
    pub fn new(mut records: Vec<CellRecord>) -> Result<Self, CoreError> {
        if records.is_empty() {
            return Err(CoreError::EmptyLandscape);
        }
        records.sort_by_key(|r| r.id);

        let predictor_names: IndexMap<String, usize> = records[0]
            .predictors
            .keys()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        let width = predictor_names.len();

        let mut ids = Vec::with_capacity(records.len());
        let mut positions = HashMap::with_capacity(records.len());
        let mut predictors = Vec::with_capacity(records.len() * width);
        let mut attributes = Vec::with_capacity(records.len());
        let mut initial = Vec::with_capacity(records.len());
        let mut model_states = Vec::with_capacity(records.len());

        for (pos, record) in records.into_iter().enumerate() {
            if positions.insert(record.id, pos).is_some() {
                return Err(CoreError::DuplicateCell { id: record.id });
            }
            if record.predictors.len() != width {
                let missing = predictor_names
                    .keys()
                    .find(|n| !record.predictors.contains_key(*n))
                    .or_else(|| record.predictors.keys().find(|n| !predictor_names.contains_key(*n)))
                    .cloned()
                    .unwrap_or_default();
                return Err(CoreError::InconsistentPredictors {
                    id: record.id,
                    predictor: missing,
                });
            }
            for name in predictor_names.keys() {
                let value = *record.predictors.get(name).ok_or_else(|| {
                    CoreError::InconsistentPredictors {
                        id: record.id,
                        predictor: name.clone(),
                    }
                })?;
                if !value.is_finite() {
                    return Err(CoreError::NonFinitePredictor {
                        id: record.id,
                        predictor: name.clone(),
                    });
                }
                predictors.push(value);
            }
            ids.push(record.id);
            initial.push(record.initial_state());
            model_states.push(record.model_state);
            attributes.push(record.attributes);
        }

        Ok(Self {
            ids,
            positions,
            predictor_names,
            predictors,
            attributes,
            initial,
            model_states,
        })
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always returns `false`: construction rejects empty landscapes.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Cell identifiers in position order (ascending).
    pub fn ids(&self) -> &[CellId] {
        &self.ids
    }

    /// Identifier of the cell at `pos`.
    pub fn id(&self, pos: usize) -> CellId {
        self.ids[pos]
    }

    /// Position of a cell, if it belongs to this landscape.
    pub fn position(&self, id: CellId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Position of a cell, or `CoreError::UnknownCell`.
    pub fn require_position(&self, id: CellId) -> Result<usize, CoreError> {
        self.position(id).ok_or(CoreError::UnknownCell { id })
    }

    /// Predictor names carried by every cell, in column order.
    pub fn predictor_names(&self) -> impl Iterator<Item = &str> {
        self.predictor_names.keys().map(String::as_str)
    }

    /// Column index of a predictor.
    pub fn predictor_column(&self, name: &str) -> Option<usize> {
        self.predictor_names.get(name).copied()
    }

    /// Number of predictor columns.
    pub fn predictor_count(&self) -> usize {
        self.predictor_names.len()
    }

    /// Normalized predictor row of the cell at `pos`.
    pub fn predictor_row(&self, pos: usize) -> &[f64] {
        let width = self.predictor_names.len();
        &self.predictors[pos * width..(pos + 1) * width]
    }

    /// Raw attribute of the cell at `pos`.
    pub fn attribute(&self, pos: usize, name: &str) -> Option<AttributeValue> {
        self.attributes[pos].get(name).copied()
    }

    /// State of the cell at `pos` before the run.
    pub fn initial_state(&self, pos: usize) -> ConversionState {
        self.initial[pos]
    }

    /// Initial states of every cell in position order.
    pub fn initial_states(&self) -> &[ConversionState] {
        &self.initial
    }

    /// Fitted-model classification of the cell at `pos`.
    pub fn model_state(&self, pos: usize) -> Option<ModelCellState> {
        self.model_states[pos]
    }

    /// Number of cells holding a facility before the run.
    pub fn existing_count(&self) -> usize {
        self.initial.iter().filter(|s| s.is_converted()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, existing: bool, wind: f64) -> CellRecord {
        CellRecord::new(CellId(id), existing)
            .with_predictor("Avg_Wind", wind)
            .with_predictor("Near_Roads", -wind)
    }

    #[test]
    fn records_are_sorted_by_id() {
        let l = Landscape::new(vec![record(5, false, 0.5), record(2, true, 0.2)]).unwrap();
        assert_eq!(l.ids(), &[CellId(2), CellId(5)]);
        assert_eq!(l.position(CellId(5)), Some(1));
        assert_eq!(l.predictor_row(0), &[0.2, -0.2]);
        assert_eq!(l.existing_count(), 1);
        assert_eq!(l.initial_state(0), ConversionState::ExistingPriorToRun);
    }

    #[test]
    fn duplicate_ids_rejected() {
        match Landscape::new(vec![record(1, false, 0.0), record(1, false, 1.0)]) {
            Err(CoreError::DuplicateCell { id }) => assert_eq!(id, CellId(1)),
            other => panic!("expected DuplicateCell, got {other:?}"),
        }
    }

    #[test]
    fn empty_landscape_rejected() {
        assert!(matches!(
            Landscape::new(vec![]),
            Err(CoreError::EmptyLandscape)
        ));
    }

    #[test]
    fn inconsistent_predictors_rejected() {
        let odd = CellRecord::new(CellId(9), false).with_predictor("Avg_Wind", 1.0);
        match Landscape::new(vec![record(1, false, 0.0), odd]) {
            Err(CoreError::InconsistentPredictors { id, predictor }) => {
                assert_eq!(id, CellId(9));
                assert_eq!(predictor, "Near_Roads");
            }
            other => panic!("expected InconsistentPredictors, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_predictor_rejected() {
        let bad = record(3, false, f64::NAN);
        assert!(matches!(
            Landscape::new(vec![bad]),
            Err(CoreError::NonFinitePredictor { .. })
        ));
    }

    #[test]
    fn unknown_cell_lookup() {
        let l = Landscape::new(vec![record(1, false, 0.0)]).unwrap();
        assert_eq!(
            l.require_position(CellId(7)),
            Err(CoreError::UnknownCell { id: CellId(7) })
        );
    }
}
