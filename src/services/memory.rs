use crate::core::filters::{ProfileFilter, SortOrder};
use crate::models::{NewProfile, Profile};
use tokio::sync::RwLock;

/// Profile table held in process memory
///
/// Applies the same predicate and ordering as the SQL path, with plain
/// `filter` and `sort` calls.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryTable>,
}

#[derive(Debug, Default)]
struct MemoryTable {
    rows: Vec<Profile>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create_profile(&self, profile: NewProfile) -> Profile {
        let mut table = self.inner.write().await;
        table.next_id += 1;
        let created = profile.into_profile(table.next_id, chrono::Utc::now());
        table.rows.push(created.clone());
        created
    }

    pub async fn list_profiles(&self) -> Vec<Profile> {
        self.filtered_profiles(&ProfileFilter::default(), SortOrder::Newest)
            .await
    }

    pub async fn filtered_profiles(&self, filter: &ProfileFilter, sort: SortOrder) -> Vec<Profile> {
        let table = self.inner.read().await;
        let mut profiles: Vec<Profile> = table
            .rows
            .iter()
            .filter(|profile| filter.matches(profile))
            .cloned()
            .collect();
        drop(table);

        profiles.sort_by(|a, b| sort.compare(a, b));
        profiles
    }

    pub async fn get_profile(&self, id: i64) -> Option<Profile> {
        let table = self.inner.read().await;
        table.rows.iter().find(|p| p.id == id).cloned()
    }

    pub async fn count_profiles(&self) -> i64 {
        self.inner.read().await.rows.len() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_profile(age: i32, location: &str) -> NewProfile {
        NewProfile {
            username: "someone".to_string(),
            age,
            gender: "Female".to_string(),
            location: location.to_string(),
            willing_to_relocate: true,
            wants_kids: false,
            age_range_min: age - 2,
            age_range_max: age + 5,
            marital_status: "Single".to_string(),
            marriage_timeline: "Within 6 months".to_string(),
            bio: String::new(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let store = MemoryStore::new();
        let first = store.create_profile(new_profile(25, "Chicago, USA")).await;
        let second = store.create_profile(new_profile(26, "Houston, USA")).await;
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.count_profiles().await, 2);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = MemoryStore::new();
        for age in [25, 26, 27] {
            store.create_profile(new_profile(age, "Chicago, USA")).await;
        }
        let ids: Vec<i64> = store.list_profiles().await.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_filtered_and_sorted() {
        let store = MemoryStore::new();
        store.create_profile(new_profile(31, "Toronto, Canada")).await;
        store.create_profile(new_profile(24, "Dubai, UAE")).await;
        store.create_profile(new_profile(28, "Montreal, Canada")).await;

        let filter = ProfileFilter {
            location: Some("canada".to_string()),
            ..Default::default()
        };
        let ages: Vec<i32> = store
            .filtered_profiles(&filter, SortOrder::AgeAsc)
            .await
            .iter()
            .map(|p| p.age)
            .collect();
        assert_eq!(ages, vec![28, 31]);
    }

    #[tokio::test]
    async fn test_get_missing_profile() {
        let store = MemoryStore::new();
        assert!(store.get_profile(99).await.is_none());
    }
}
