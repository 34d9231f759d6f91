//! Province name normalisation and reconciliation against boundary names.
//!
//! Dataset names and boundary names disagree on case, accents and official
//! spellings ("Orense" vs "Ourense"). Matching runs in three stages: exact
//! match on the normalised form, a hand-curated alias table for the known
//! alternate spellings, and a fuzzy fallback that only exists to flag alias
//! candidates that should be pinned in the table.

use std::collections::BTreeMap;

use log::warn;
use strsim::normalized_levenshtein;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use super::GeoFeature;

/// Minimum similarity for the fuzzy fallback to accept a candidate.
pub const FUZZY_THRESHOLD: f64 = 0.7;

/// Known alternate province spellings, normalised, mapped to the normalised
/// spellings other sources use for the same province. A spelling may carry
/// several candidate targets; they are tried in order. The province
/// vocabulary is closed, so unmatched names should end up here rather than
/// rely on fuzzy matching.
const PROVINCE_ALIASES: &[(&str, &str)] = &[
    ("a coruna", "la coruna"),
    ("alava", "araba alava"),
    ("alava", "arabaalava"),
    ("araba", "alava"),
    ("arabaalava", "alava"),
    ("asturias", "principado de asturias"),
    ("baleares", "illes balears"),
    ("bizkaia", "vizcaya"),
    ("comunidad foral de navarra", "navarra"),
    ("coruna", "a coruna"),
    ("gerona", "girona"),
    ("gipuzkoa", "guipuzcoa"),
    ("girona", "gerona"),
    ("guipuzcoa", "gipuzkoa"),
    ("illes balears", "baleares"),
    ("islas baleares", "illes balears"),
    ("la coruna", "a coruna"),
    ("lerida", "lleida"),
    ("lleida", "lerida"),
    ("murcia", "region de murcia"),
    ("navarra", "comunidad foral de navarra"),
    ("orense", "ourense"),
    ("ourense", "orense"),
    ("principado de asturias", "asturias"),
    ("region de murcia", "murcia"),
    ("vizcaya", "bizkaia"),
];

/// Normalises a name for comparison: trim and lowercase, strip accents
/// (NFKD, drop combining marks), drop the "provincia de " prefix wherever
/// it occurs, strip punctuation, collapse whitespace. Idempotent.
pub fn normalize(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    if lowered.is_empty() {
        return String::new();
    }
    let unaccented: String = lowered.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    let stripped = unaccented.replace("provincia de ", "");
    let cleaned: String = stripped
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, PartialEq)]
/// How one province name was resolved.
pub enum MatchOutcome {
    /// Exact match on the normalised name.
    Exact(String),
    /// Resolved through the static alias table.
    Alias(String),
    /// Accepted by the fuzzy fallback with the given similarity.
    Fuzzy(String, f64),
    Unmatched,
}

impl MatchOutcome {
    /// The matched boundary display name, if any.
    pub fn geo_name(&self) -> Option<&str> {
        match self {
            MatchOutcome::Exact(name) | MatchOutcome::Alias(name) => Some(name),
            MatchOutcome::Fuzzy(name, _) => Some(name),
            MatchOutcome::Unmatched => None,
        }
    }
}

#[derive(Debug, Default)]
/// Mapping from dataset province names to boundary display names, rebuilt
/// in full on every map render.
pub struct NameMapping {
    /// One entry per input province, in input order.
    pub outcomes: Vec<(String, MatchOutcome)>,
    /// Provinces with no confident match, in input order.
    pub unmatched: Vec<String>,
}

impl NameMapping {
    pub fn geo_name(&self, province: &str) -> Option<&str> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == province)
            .and_then(|(_, outcome)| outcome.geo_name())
    }

    pub fn matched_count(&self) -> usize {
        self.outcomes.len() - self.unmatched.len()
    }
}

/// Reconciles dataset province names against boundary features.
///
/// An empty feature set and unmatched provinces are reported, not fatal;
/// the caller decides whether an empty result is usable.
pub fn match_names(provinces: &[&str], features: &[GeoFeature]) -> NameMapping {
    if features.is_empty() {
        warn!("boundary feature set is empty; no province can be matched");
    }
    let lookup = build_lookup(features);

    let mut mapping = NameMapping::default();
    for &province in provinces {
        let outcome = match_one(province, &lookup);
        if outcome == MatchOutcome::Unmatched {
            mapping.unmatched.push(province.to_string());
        }
        mapping.outcomes.push((province.to_string(), outcome));
    }

    if !mapping.unmatched.is_empty() {
        let examples: Vec<&str> = mapping
            .unmatched
            .iter()
            .take(6)
            .map(String::as_str)
            .collect();
        warn!(
            "could not confidently match {} provinces against boundary names; examples: {:?}",
            mapping.unmatched.len(),
            examples
        );
    }

    mapping
}

/// Normalised boundary name -> display name. When two features normalise to
/// the same key the first one wins and the collision is logged.
fn build_lookup(features: &[GeoFeature]) -> BTreeMap<String, String> {
    let mut lookup = BTreeMap::new();
    for feature in features {
        if feature.normalized.is_empty() {
            continue;
        }
        if let Some(existing) = lookup.get(&feature.normalized) {
            if existing != &feature.display_name {
                warn!(
                    "boundary names `{}` and `{}` both normalise to `{}`; keeping the first",
                    existing, feature.display_name, feature.normalized
                );
            }
            continue;
        }
        lookup.insert(feature.normalized.clone(), feature.display_name.clone());
    }
    lookup
}

fn match_one(province: &str, lookup: &BTreeMap<String, String>) -> MatchOutcome {
    let key = normalize(province);
    if let Some(display) = lookup.get(&key) {
        return MatchOutcome::Exact(display.clone());
    }

    for alias_key in alias_candidates(&key) {
        if let Some(display) = lookup.get(alias_key) {
            return MatchOutcome::Alias(display.clone());
        }
    }

    let mut best: Option<(&str, f64)> = None;
    for (candidate, display) in lookup {
        let score = normalized_levenshtein(&key, candidate);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((display.as_str(), score));
        }
    }
    match best {
        Some((display, score)) if score >= FUZZY_THRESHOLD => {
            warn!(
                "fuzzy-matched `{}` to `{}` (similarity {:.2}); consider pinning this \
                 spelling in the alias table",
                province, display, score
            );
            MatchOutcome::Fuzzy(display.to_string(), score)
        }
        _ => MatchOutcome::Unmatched,
    }
}

fn alias_candidates(key: &str) -> impl Iterator<Item = &'static str> + '_ {
    PROVINCE_ALIASES
        .iter()
        .filter(move |(from, _)| *from == key)
        .map(|(_, to)| *to)
}

// -- Tests -------------------------------------------------------------------
