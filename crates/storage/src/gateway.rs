//! Typed persistence gateways over the document store.
//!
//! Two logical collections exist: `estimations` for prediction outcomes and
//! `training_data` for ground-truth contributions. The training collection
//! is never read by the prediction path.

use chrono::{DateTime, Utc};

use records::{EstimationRecord, RecordId, Result, TrainingSample};

use crate::documents::{Collection, Document, DocumentStore};

/// Collection holding persisted estimation outcomes
pub const ESTIMATIONS: &str = "estimations";
/// Collection holding ground-truth training contributions
pub const TRAINING_DATA: &str = "training_data";

impl Document for EstimationRecord {
    const KIND: &'static str = "estimation";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn set_created_at(&mut self, at: DateTime<Utc>) {
        self.created_at = Some(at);
    }
}

impl Document for TrainingSample {
    const KIND: &'static str = "training sample";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn set_created_at(&mut self, at: DateTime<Utc>) {
        self.created_at = Some(at);
    }
}

/// Gateway for the `estimations` collection.
#[derive(Debug, Clone)]
pub struct EstimationRepo {
    collection: Collection<EstimationRecord>,
}

impl EstimationRepo {
    pub fn new(store: &DocumentStore) -> Self {
        Self {
            collection: store.collection(ESTIMATIONS),
        }
    }

    pub fn insert(&self, record: EstimationRecord) -> Result<EstimationRecord> {
        self.collection.insert(record)
    }

    pub fn get(&self, id: &str) -> Result<EstimationRecord> {
        self.collection.get(id)
    }

    pub fn list(&self, limit: i64, offset: usize) -> Result<Vec<EstimationRecord>> {
        self.collection.list(limit, offset)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.collection.delete(id)
    }
}

/// Gateway for the `training_data` collection.
#[derive(Debug, Clone)]
pub struct TrainingRepo {
    collection: Collection<TrainingSample>,
}

impl TrainingRepo {
    pub fn new(store: &DocumentStore) -> Self {
        Self {
            collection: store.collection(TRAINING_DATA),
        }
    }

    pub fn insert(&self, sample: TrainingSample) -> Result<TrainingSample> {
        self.collection.insert(sample)
    }

    pub fn list(&self, limit: i64) -> Result<Vec<TrainingSample>> {
        self.collection.list(limit, 0)
    }

    /// Every sample, newest first, for training collaborators.
    pub fn export(&self) -> Result<Vec<TrainingSample>> {
        self.collection.list(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store(tag: &str) -> (std::path::PathBuf, DocumentStore) {
        let root =
            std::env::temp_dir().join(format!("gateway-{}-{}", tag, Uuid::new_v4().simple()));
        (root.clone(), DocumentStore::new(root))
    }

    #[test]
    fn test_collections_are_distinct() {
        let (root, store) = temp_store("distinct");
        let estimations = EstimationRepo::new(&store);
        let training = TrainingRepo::new(&store);

        estimations
            .insert(EstimationRecord::new(175.0, 68.0, None, vec![]))
            .unwrap();
        training
            .insert(TrainingSample::new(175.0, 70.5, "f.jpg", "s.jpg"))
            .unwrap();

        assert_eq!(estimations.list(0, 0).unwrap().len(), 1);
        assert_eq!(training.export().unwrap().len(), 1);
        assert!(root.join(ESTIMATIONS).is_dir());
        assert!(root.join(TRAINING_DATA).is_dir());

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_training_sample_round_trip() {
        let (root, store) = temp_store("training");
        let training = TrainingRepo::new(&store);

        let inserted = training
            .insert(TrainingSample::new(182.0, 81.3, "front.png", "side.png"))
            .unwrap();
        assert!(!inserted.id.is_empty());

        let listed = training.list(10).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].actual_weight, 81.3);
        assert_eq!(listed[0].front_image_path, "front.png");

        std::fs::remove_dir_all(&root).unwrap();
    }
}
