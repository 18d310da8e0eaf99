use crate::train::Train;
use railbook_store::{JsonStore, StoreError};

/// Owns the persisted set of trains.
///
/// The whole catalog is loaded once at construction; `upsert` is the only
/// mutation path and rewrites the backing file after every change. Lookups
/// are linear scans, which is fine at the scale of one JSON file.
pub struct TrainCatalog {
    store: JsonStore<Train>,
    trains: Vec<Train>,
}

impl TrainCatalog {
    pub fn open(store: JsonStore<Train>) -> Result<Self, StoreError> {
        let trains = store.load()?;
        tracing::info!(trains = trains.len(), "train catalog loaded");
        Ok(Self { store, trains })
    }

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    /// Every train serving `source` strictly upstream of `destination`,
    /// in catalog insertion order. Unknown stations simply produce an
    /// empty result.
    pub fn search(&self, source: &str, destination: &str) -> Vec<&Train> {
        self.trains
            .iter()
            .filter(|train| train.serves_route(source, destination))
            .collect()
    }

    /// Case-insensitive exact match on train identifier; first match wins.
    pub fn find_by_id(&self, train_id: &str) -> Option<&Train> {
        self.trains.iter().find(|train| train.matches_id(train_id))
    }

    /// Replace the train with a matching identifier, or append it, then
    /// persist the full catalog.
    pub fn upsert(&mut self, train: Train) -> Result<(), StoreError> {
        match self.trains.iter().position(|t| t.matches_id(&train.train_id)) {
            Some(index) => self.trains[index] = train,
            None => self.trains.push(train),
        }
        self.store.save(&self.trains)
    }
}
