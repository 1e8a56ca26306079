use crate::error::AppError;
use crate::meals::repo_types::{MealId, MealRecord};

/// Ordered in-memory meal log, newest first.
#[derive(Debug, Default, Clone)]
pub struct MealStore {
    meals: Vec<MealRecord>,
}

impl MealStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the front. Rejects a duplicate id and leaves the log as it was.
    pub fn add(&mut self, record: MealRecord) -> Result<(), AppError> {
        if self.position(record.id).is_some() {
            return Err(AppError::IdCollision(record.id));
        }
        self.meals.insert(0, record);
        Ok(())
    }

    /// Replace the editable fields of the meal with `record.id`.
    /// Never inserts.
    pub fn update(&mut self, record: &MealRecord) -> Result<MealRecord, AppError> {
        let idx = self
            .position(record.id)
            .ok_or(AppError::NotFound(record.id))?;
        let updated = self.meals[idx].with_fields_of(record);
        self.meals[idx] = updated.clone();
        Ok(updated)
    }

    /// Idempotent; returns the removed record if there was one.
    pub fn remove(&mut self, id: MealId) -> Option<MealRecord> {
        self.position(id).map(|idx| self.meals.remove(idx))
    }

    pub fn get(&self, id: MealId) -> Option<MealRecord> {
        self.meals.iter().find(|m| m.id == id).cloned()
    }

    /// Owned snapshot in display order.
    pub fn list(&self) -> Vec<MealRecord> {
        self.meals.clone()
    }

    pub fn len(&self) -> usize {
        self.meals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }

    fn position(&self, id: MealId) -> Option<usize> {
        self.meals.iter().position(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisResult;
    use crate::nutrition::{aggregate, DailyTotals};
    use time::macros::datetime;
    use uuid::Uuid;

    fn meal(id: u128, calories: u32, protein: u32, carbs: u32, fats: u32) -> MealRecord {
        MealRecord::from_analysis(
            MealId(Uuid::from_u128(id)),
            format!("meals/{id}.jpg"),
            AnalysisResult {
                name: format!("meal {id}"),
                calories,
                protein,
                carbs,
                fats,
                confidence: 90,
            },
            datetime!(2026-10-16 12:30 UTC),
        )
    }

    fn id(n: u128) -> MealId {
        MealId(Uuid::from_u128(n))
    }

    #[test]
    fn add_inserts_newest_first() {
        let mut store = MealStore::new();
        store.add(meal(1, 485, 32, 48, 14)).unwrap();
        store.add(meal(2, 420, 28, 15, 26)).unwrap();
        let ids: Vec<_> = store.list().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![id(2), id(1)]);
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let mut store = MealStore::new();
        store.add(meal(1, 485, 32, 48, 14)).unwrap();
        let err = store.add(meal(1, 1, 1, 1, 1)).unwrap_err();
        assert!(matches!(err, AppError::IdCollision(x) if x == id(1)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].calories, 485);
    }

    #[test]
    fn update_missing_is_not_found_and_changes_nothing() {
        let mut store = MealStore::new();
        store.add(meal(1, 485, 32, 48, 14)).unwrap();
        let before = store.list();
        let err = store.update(&meal(9, 1, 1, 1, 1)).unwrap_err();
        assert!(matches!(err, AppError::NotFound(x) if x == id(9)));
        assert_eq!(store.list(), before);
    }

    #[test]
    fn remove_is_idempotent() {
        let mut store = MealStore::new();
        store.add(meal(1, 485, 32, 48, 14)).unwrap();
        store.add(meal(2, 420, 28, 15, 26)).unwrap();
        assert!(store.remove(id(1)).is_some());
        let once = store.list();
        assert!(store.remove(id(1)).is_none());
        assert_eq!(store.list(), once);
        assert!(store.remove(id(42)).is_none());
        assert_eq!(store.list(), once);
    }

    #[test]
    fn list_is_a_detached_snapshot() {
        let mut store = MealStore::new();
        store.add(meal(1, 485, 32, 48, 14)).unwrap();
        let mut snapshot = store.list();
        snapshot[0].calories = 0;
        store.remove(id(1));
        assert_eq!(snapshot.len(), 1);
        assert!(store.is_empty());
        assert_eq!(store.get(id(1)), None);
    }

    #[test]
    fn totals_follow_add_update_remove() {
        let mut store = MealStore::new();
        store.add(meal(1, 485, 32, 48, 14)).unwrap();
        store.add(meal(2, 420, 28, 15, 26)).unwrap();
        assert_eq!(
            aggregate(&store.list()),
            DailyTotals { calories: 905, protein: 60, carbs: 63, fats: 40 }
        );

        let mut edit = store.get(id(1)).unwrap();
        edit.calories = 500;
        store.update(&edit).unwrap();
        assert_eq!(
            aggregate(&store.list()),
            DailyTotals { calories: 920, protein: 60, carbs: 63, fats: 40 }
        );

        store.remove(id(1));
        let remaining = store.list();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, id(2));
        assert_eq!(
            aggregate(&remaining),
            DailyTotals { calories: 420, protein: 28, carbs: 15, fats: 26 }
        );
    }

    #[test]
    fn random_operation_sequences_match_a_shadow_log() {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        let mut store = MealStore::new();
        // Newest first, maintained independently of the store.
        let mut shadow: Vec<MealRecord> = Vec::new();
        for _ in 0..500 {
            let n = rng.gen_range(0..20u128);
            let candidate = meal(n, rng.gen(), rng.gen(), rng.gen(), rng.gen());
            let known = shadow.iter().position(|m| m.id == id(n));
            match rng.gen_range(0..3) {
                0 => {
                    let res = store.add(candidate.clone());
                    assert_eq!(res.is_ok(), known.is_none());
                    if known.is_none() {
                        shadow.insert(0, candidate);
                    }
                }
                1 => {
                    let res = store.update(&candidate);
                    assert_eq!(res.is_ok(), known.is_some());
                    if let Some(i) = known {
                        shadow[i].name = candidate.name.clone();
                        shadow[i].calories = candidate.calories;
                        shadow[i].protein = candidate.protein;
                        shadow[i].carbs = candidate.carbs;
                        shadow[i].fats = candidate.fats;
                    }
                }
                _ => {
                    let removed = store.remove(id(n));
                    assert_eq!(removed.is_some(), known.is_some());
                    if let Some(i) = known {
                        shadow.remove(i);
                    }
                }
            }

            assert_eq!(store.list(), shadow);
            let expected = shadow.iter().fold(DailyTotals::default(), |t, m| DailyTotals {
                calories: t.calories + u64::from(m.calories),
                protein: t.protein + u64::from(m.protein),
                carbs: t.carbs + u64::from(m.carbs),
                fats: t.fats + u64::from(m.fats),
            });
            assert_eq!(aggregate(&store.list()), expected);
        }
    }
}
