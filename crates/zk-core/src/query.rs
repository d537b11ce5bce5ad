//! # Query Filter
//!
//! Exact-match narrowing of the animal list. Every criterion that is present
//! must hold; traits compose with AND, so an animal survives only if it
//! carries every requested trait.

use crate::Animal;

/// Query string key for trait filters.
pub const KEY_PERSONALITY_TRAITS: &str = "personalityTraits";
pub const KEY_DIET: &str = "diet";
pub const KEY_SPECIES: &str = "species";
pub const KEY_NAME: &str = "name";

/// Suffix form encoders append for list values (`personalityTraits[]=a`).
const LIST_SUFFIX: &str = "[]";

/// Filter criteria for [`filter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    /// Every listed trait must be present on a surviving animal.
    pub personality_traits: Vec<String>,
    pub diet: Option<String>,
    pub species: Option<String>,
    pub name: Option<String>,
    /// A scalar field was given as a list, which no animal can equal.
    pub matches_nothing: bool,
}

/// Occurrences of one scalar key within a query string.
#[derive(Default)]
struct ScalarParam {
    values: Vec<String>,
    listed: bool,
}

impl ScalarParam {
    fn push(&mut self, value: String, listed: bool) {
        self.values.push(value);
        self.listed |= listed;
    }

    /// `Err` when the key arrived as a list (repeated, or in `key[]` form).
    fn resolve(mut self) -> Result<Option<String>, ()> {
        if self.listed || self.values.len() > 1 {
            return Err(());
        }
        Ok(self.values.pop().filter(|v| !v.is_empty()))
    }
}

impl Criteria {
    /// Build criteria from decoded query-string pairs.
    ///
    /// Unrecognized keys are skipped and `key[]` is read as `key`. A single
    /// empty scalar value counts as absent, as does a lone empty
    /// `personalityTraits` value. A scalar key that arrives as a list
    /// (repeated, or in `key[]` form) sets [`Criteria::matches_nothing`].
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut criteria = Criteria::default();
        let mut traits_listed = false;
        let mut diet = ScalarParam::default();
        let mut species = ScalarParam::default();
        let mut name = ScalarParam::default();

        for (key, value) in pairs {
            let value = value.into();
            let raw = key.as_ref();
            let (key, listed) = match raw.strip_suffix(LIST_SUFFIX) {
                Some(stripped) => (stripped, true),
                None => (raw, false),
            };
            match key {
                KEY_PERSONALITY_TRAITS => {
                    criteria.personality_traits.push(value);
                    traits_listed |= listed;
                }
                KEY_DIET => diet.push(value, listed),
                KEY_SPECIES => species.push(value, listed),
                KEY_NAME => name.push(value, listed),
                _ => {}
            }
        }

        if !traits_listed
            && criteria.personality_traits.len() == 1
            && criteria.personality_traits[0].is_empty()
        {
            criteria.personality_traits.clear();
        }

        for (slot, param) in [
            (&mut criteria.diet, diet),
            (&mut criteria.species, species),
            (&mut criteria.name, name),
        ] {
            match param.resolve() {
                Ok(value) => *slot = value,
                Err(()) => criteria.matches_nothing = true,
            }
        }
        criteria
    }

    /// True when no criterion is set and [`filter`] returns its input as-is.
    pub fn is_empty(&self) -> bool {
        !self.matches_nothing
            && self.personality_traits.is_empty()
            && self.diet.is_none()
            && self.species.is_none()
            && self.name.is_none()
    }

    /// Whether a single animal satisfies every present criterion.
    pub fn matches(&self, animal: &Animal) -> bool {
        !self.matches_nothing
            && self.personality_traits.iter().all(|t| animal.has_trait(t))
            && field_matches(&self.diet, &animal.diet)
            && field_matches(&self.species, &animal.species)
            && field_matches(&self.name, &animal.name)
    }

    /// Encode back into query-string pairs, traits first in request order.
    ///
    /// [`Criteria::matches_nothing`] has no single-value encoding and is not
    /// carried over.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> = self
            .personality_traits
            .iter()
            .map(|t| (KEY_PERSONALITY_TRAITS, t.clone()))
            .collect();
        for (key, value) in [
            (KEY_DIET, &self.diet),
            (KEY_SPECIES, &self.species),
            (KEY_NAME, &self.name),
        ] {
            if let Some(v) = value {
                pairs.push((key, v.clone()));
            }
        }
        pairs
    }
}

fn field_matches(wanted: &Option<String>, actual: &str) -> bool {
    match wanted {
        Some(w) => w == actual,
        None => true,
    }
}

/// Narrow `animals` to those matching `criteria`, preserving order.
pub fn filter(criteria: &Criteria, animals: &[Animal]) -> Vec<Animal> {
    if criteria.is_empty() {
        return animals.to_vec();
    }
    animals
        .iter()
        .filter(|a| criteria.matches(a))
        .cloned()
        .collect()
}

/// First animal whose id equals `id`. Duplicates resolve to the earliest.
pub fn find_by_id<'a>(id: &str, animals: &'a [Animal]) -> Option<&'a Animal> {
    animals.iter().find(|a| a.id == id)
}
