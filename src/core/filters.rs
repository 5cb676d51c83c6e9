use crate::models::{ListingQuery, Profile};
use sqlx::{Postgres, QueryBuilder};
use std::cmp::Ordering;

/// Typed listing predicate built from the listing query string
///
/// Every present condition must hold. An empty filter matches every profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFilter {
    /// Case-insensitive substring of `location`
    pub location: Option<String>,
    /// Visitor age that must fall inside the profile's preferred range
    pub user_age: Option<i32>,
    pub marital_statuses: Vec<String>,
    pub gender: Option<String>,
    pub relocate: Option<bool>,
    pub marriage_timeline: Option<String>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub wants_kids: Option<bool>,
}

/// Listing order selected by the `sort` parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    AgeAsc,
    AgeDesc,
}

impl SortOrder {
    /// Parse the `sort` parameter; unknown values fall back to newest first
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("oldest") => SortOrder::Oldest,
            Some("age-asc") => SortOrder::AgeAsc,
            Some("age-desc") => SortOrder::AgeDesc,
            _ => SortOrder::Newest,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::AgeAsc => "age-asc",
            SortOrder::AgeDesc => "age-desc",
        }
    }

    /// `ORDER BY` body; ties break on `id` in the primary direction
    pub fn sql(&self) -> &'static str {
        match self {
            SortOrder::Newest => "created_at DESC, id DESC",
            SortOrder::Oldest => "created_at ASC, id ASC",
            SortOrder::AgeAsc => "age ASC, id ASC",
            SortOrder::AgeDesc => "age DESC, id DESC",
        }
    }

    /// In-memory counterpart of [`SortOrder::sql`]
    pub fn compare(&self, a: &Profile, b: &Profile) -> Ordering {
        match self {
            SortOrder::Newest => b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)),
            SortOrder::Oldest => a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)),
            SortOrder::AgeAsc => a.age.cmp(&b.age).then_with(|| a.id.cmp(&b.id)),
            SortOrder::AgeDesc => b.age.cmp(&a.age).then_with(|| b.id.cmp(&a.id)),
        }
    }
}

impl ProfileFilter {
    pub fn is_empty(&self) -> bool {
        *self == ProfileFilter::default()
    }

    /// Check a profile against every present condition
    #[inline]
    pub fn matches(&self, profile: &Profile) -> bool {
        if let Some(location) = &self.location {
            let needle = location.to_lowercase();
            if !profile.location.to_lowercase().contains(&needle) {
                return false;
            }
        }

        if let Some(gender) = &self.gender {
            if profile.gender != *gender {
                return false;
            }
        }

        if !self.marital_statuses.is_empty()
            && !self.marital_statuses.contains(&profile.marital_status) {
            return false;
        }

        if let Some(relocate) = self.relocate {
            if profile.willing_to_relocate != relocate {
                return false;
            }
        }

        if let Some(timeline) = &self.marriage_timeline {
            if profile.marriage_timeline != *timeline {
                return false;
            }
        }

        if let Some(user_age) = self.user_age {
            if !profile.accepts_age(user_age) {
                return false;
            }
        }

        if let Some(min_age) = self.min_age {
            if profile.age < min_age {
                return false;
            }
        }

        if let Some(max_age) = self.max_age {
            if profile.age > max_age {
                return false;
            }
        }

        if let Some(wants_kids) = self.wants_kids {
            if profile.wants_kids != wants_kids {
                return false;
            }
        }

        true
    }

    /// Append ` AND ...` conditions for every present field
    ///
    /// The builder must already hold a `WHERE` clause, e.g. `WHERE TRUE`.
    pub fn push_sql<'args>(&self, qb: &mut QueryBuilder<'args, Postgres>) {
        if let Some(location) = &self.location {
            qb.push(" AND location ILIKE ")
                .push_bind(format!("%{}%", escape_like(location)));
        }

        if let Some(gender) = &self.gender {
            qb.push(" AND gender = ").push_bind(gender.clone());
        }

        if !self.marital_statuses.is_empty() {
            qb.push(" AND marital_status = ANY(")
                .push_bind(self.marital_statuses.clone())
                .push(")");
        }

        if let Some(relocate) = self.relocate {
            qb.push(" AND willing_to_relocate = ").push_bind(relocate);
        }

        if let Some(timeline) = &self.marriage_timeline {
            qb.push(" AND marriage_timeline = ").push_bind(timeline.clone());
        }

        if let Some(user_age) = self.user_age {
            qb.push(" AND age_range_min <= ")
                .push_bind(user_age)
                .push(" AND age_range_max >= ")
                .push_bind(user_age);
        }

        if let Some(min_age) = self.min_age {
            qb.push(" AND age >= ").push_bind(min_age);
        }

        if let Some(max_age) = self.max_age {
            qb.push(" AND age <= ").push_bind(max_age);
        }

        if let Some(wants_kids) = self.wants_kids {
            qb.push(" AND wants_kids = ").push_bind(wants_kids);
        }
    }
}

impl From<&ListingQuery> for ProfileFilter {
    fn from(query: &ListingQuery) -> Self {
        Self {
            location: non_empty(query.location.as_deref()),
            user_age: positive_number(query.user_age.as_deref()),
            marital_statuses: query
                .marital_status
                .as_deref()
                .map(|value| {
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|status| !status.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            gender: non_empty(query.gender.as_deref()),
            relocate: flag(query.relocate.as_deref()),
            marriage_timeline: non_empty(query.marriage_timeline.as_deref()),
            min_age: positive_number(query.min_age.as_deref()),
            max_age: positive_number(query.max_age.as_deref()),
            wants_kids: flag(query.kids.as_deref()),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Zero and unparsable numbers count as absent
fn positive_number(value: Option<&str>) -> Option<i32> {
    value
        .and_then(|v| v.trim().parse::<i32>().ok())
        .filter(|n| *n != 0)
}

fn flag(value: Option<&str>) -> Option<bool> {
    match value.map(str::trim) {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

/// Escape LIKE metacharacters so user input matches literally
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
