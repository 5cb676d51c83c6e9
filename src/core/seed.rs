//! Demo profile generator used by the `seed` binary and the benchmarks.

use crate::models::{NewProfile, GENDERS, MARRIAGE_TIMELINES};
use rand::seq::SliceRandom;
use rand::Rng;

const CITIES: &[&str] = &[
    "London, UK",
    "Birmingham, UK",
    "Manchester, UK",
    "Toronto, Canada",
    "Vancouver, Canada",
    "Montreal, Canada",
    "New York, USA",
    "San Francisco, USA",
    "Chicago, USA",
    "Houston, USA",
    "Dubai, UAE",
    "Abu Dhabi, UAE",
    "Sydney, Australia",
    "Melbourne, Australia",
    "Singapore",
    "Kuala Lumpur, Malaysia",
];

const PROFESSIONS: &[&str] = &[
    "Software Engineer",
    "Doctor",
    "Teacher",
    "Architect",
    "Lawyer",
    "Accountant",
    "Pharmacist",
    "Dentist",
    "Data Scientist",
    "Product Manager",
    "UX Designer",
    "Consultant",
];

const HOBBIES: &[&str] = &[
    "reading",
    "hiking",
    "photography",
    "cooking",
    "traveling",
    "swimming",
    "gardening",
    "calligraphy",
    "volunteering",
    "cycling",
    "chess",
    "learning languages",
];

const USERNAME_PREFIXES: &[&str] = &["muslim", "halal", "modest", "practicing", "deen"];
const USERNAME_SUFFIXES: &[&str] = &["seeker", "soul", "heart", "minded", "professional"];

// Seeded profiles are never listed as married.
const SEED_MARITAL_STATUSES: &[&str] = &["Single", "Divorced", "Widowed"];

fn pick<R: Rng>(options: &[&'static str], rng: &mut R) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}

/// Generate `count` valid profiles
pub fn generate_profiles<R: Rng>(count: usize, rng: &mut R) -> Vec<NewProfile> {
    (0..count).map(|index| generate_profile(index, rng)).collect()
}

fn generate_profile<R: Rng>(index: usize, rng: &mut R) -> NewProfile {
    let age = rng.gen_range(23..35);
    let profession = pick(PROFESSIONS, rng);

    let username = format!(
        "{}_{}_{}{}",
        pick(USERNAME_PREFIXES, rng),
        profession.to_lowercase().replace(' ', ""),
        pick(USERNAME_SUFFIXES, rng),
        index
    );

    let mut hobbies = HOBBIES.to_vec();
    hobbies.shuffle(rng);
    let hobbies = hobbies[..3].join(", ");

    let bio = format!(
        "<p>{} who takes faith and family seriously. Outside of work I enjoy {}. \
         I am looking for someone with shared values who wants to build a calm, \
         kind and practicing household together.</p>",
        profession, hobbies
    );

    NewProfile {
        username,
        age,
        gender: pick(GENDERS, rng).to_string(),
        location: pick(CITIES, rng).to_string(),
        willing_to_relocate: rng.gen_bool(0.5),
        wants_kids: rng.gen_bool(0.7),
        age_range_min: age - 2,
        age_range_max: age + 5,
        marital_status: pick(SEED_MARITAL_STATUSES, rng).to_string(),
        marriage_timeline: pick(MARRIAGE_TIMELINES, rng).to_string(),
        bio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sanitize::visible_text_len;
    use crate::models::requests::MIN_BIO_CHARS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_profiles_are_valid() {
        let mut rng = StdRng::seed_from_u64(42);
        let profiles = generate_profiles(50, &mut rng);

        assert_eq!(profiles.len(), 50);
        for profile in &profiles {
            assert!((23..35).contains(&profile.age));
            assert_eq!(profile.age_range_min, profile.age - 2);
            assert_eq!(profile.age_range_max, profile.age + 5);
            assert!(visible_text_len(&profile.bio) >= MIN_BIO_CHARS);
        }
    }

    #[test]
    fn test_pick_draws_from_options() {
        let mut rng = StdRng::seed_from_u64(9);
        let picked: std::collections::HashSet<&str> =
            (0..200).map(|_| pick(CITIES, &mut rng)).collect();

        assert!(picked.iter().all(|city| CITIES.contains(city)));
        assert!(picked.len() > 1);
        assert_eq!(pick(&[], &mut rng), "");
    }

    #[test]
    fn test_usernames_are_unique_by_index() {
        let mut rng = StdRng::seed_from_u64(1);
        let profiles = generate_profiles(3, &mut rng);
        assert!(profiles[0].username.ends_with('0'));
        assert!(profiles[2].username.ends_with('2'));
    }
}
