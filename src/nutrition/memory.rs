//! In-memory store implementations for tests and local runs.
//!
//! State sits behind `std::sync::RwLock`; a poisoned lock surfaces as `StoreError::Database`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::ports::{MealLogStore, NewMealLog, PreferencesStore, StoreError};
use super::records::{MealRecord, NutrientTotals};
use super::targets::UserPreferences;

fn poisoned() -> StoreError {
    StoreError::Database("in-memory store lock poisoned".into())
}

pub struct InMemoryMealLogStore {
    next_id: AtomicI64,
    records: RwLock<Vec<MealRecord>>,
}

impl InMemoryMealLogStore {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<MealRecord>) -> Self {
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        Self {
            next_id: AtomicI64::new(next_id),
            records: RwLock::new(records),
        }
    }
}

impl Default for InMemoryMealLogStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MealLogStore for InMemoryMealLogStore {
    async fn fetch_meal_records(
        &self,
        user_id: Uuid,
        start: Option<OffsetDateTime>,
        end: Option<OffsetDateTime>,
    ) -> Result<Vec<MealRecord>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        let mut out: Vec<MealRecord> = records
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter(|r| start.map_or(true, |s| r.date >= s))
            .filter(|r| end.map_or(true, |e| r.date <= e))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(out)
    }

    async fn insert_meal_log(
        &self,
        user_id: Uuid,
        meal: NewMealLog,
    ) -> Result<MealRecord, StoreError> {
        let totals = NutrientTotals::from_foods(&meal.foods);
        let record = MealRecord {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            user_id,
            date: meal.date,
            meal_type: meal.meal_type,
            foods: meal.foods,
            total_calories: Some(totals.calories),
            total_protein: Some(totals.protein),
            total_carbs: Some(totals.carbs),
            total_fat: Some(totals.fat),
        };
        self.records
            .write()
            .map_err(|_| poisoned())?
            .push(record.clone());
        Ok(record)
    }
}

#[derive(Default)]
pub struct InMemoryPreferencesStore {
    entries: RwLock<HashMap<Uuid, UserPreferences>>,
}

impl InMemoryPreferencesStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferencesStore for InMemoryPreferencesStore {
    async fn fetch_preferences(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UserPreferences>, StoreError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(&user_id).cloned())
    }

    async fn save_preferences(
        &self,
        user_id: Uuid,
        preferences: &UserPreferences,
    ) -> Result<(), StoreError> {
        self.entries
            .write()
            .map_err(|_| poisoned())?
            .insert(user_id, preferences.clone());
        Ok(())
    }
}

/// A store whose every call fails, for exercising error paths.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

impl UnavailableStore {
    fn error() -> StoreError {
        StoreError::Database("store unavailable".into())
    }
}

#[async_trait]
impl MealLogStore for UnavailableStore {
    async fn fetch_meal_records(
        &self,
        _user_id: Uuid,
        _start: Option<OffsetDateTime>,
        _end: Option<OffsetDateTime>,
    ) -> Result<Vec<MealRecord>, StoreError> {
        Err(Self::error())
    }

    async fn insert_meal_log(
        &self,
        _user_id: Uuid,
        _meal: NewMealLog,
    ) -> Result<MealRecord, StoreError> {
        Err(Self::error())
    }
}

#[async_trait]
impl PreferencesStore for UnavailableStore {
    async fn fetch_preferences(
        &self,
        _user_id: Uuid,
    ) -> Result<Option<UserPreferences>, StoreError> {
        Err(Self::error())
    }

    async fn save_preferences(
        &self,
        _user_id: Uuid,
        _preferences: &UserPreferences,
    ) -> Result<(), StoreError> {
        Err(Self::error())
    }
}
