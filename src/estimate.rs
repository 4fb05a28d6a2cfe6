//! Completion-time heuristic built on the playtime service's median playtime.

const DEFAULT_RATIO: f64 = 2.5;

/// First matching genre wins.
const GENRE_RATIOS: [(&[&str], f64); 7] = [
    (&["rpg", "role-playing"], 5.0),
    (&["strategy"], 3.0),
    (&["adventure"], 2.5),
    (&["action"], 2.2),
    (&["indie"], 1.8),
    (&["platformer"], 1.5),
    (&["roguelike"], 2.5),
];

const LONG_TAGS: [&str; 5] = [
    "open world",
    "sandbox",
    "crafting",
    "exploration",
    "base building",
];
const LONG_TAG_FACTOR: f64 = 3.5;

const TENSE_TAGS: [&str; 2] = ["survival", "horror"];
const TENSE_TAG_FACTOR: f64 = 1.2;

const SIMULATION_FLOOR: f64 = 3.5;
const MANAGEMENT_TAGS: [&str; 3] = ["automation", "factory", "management"];
const MANAGEMENT_FLOOR: f64 = 4.0;

/// Halves go to the even tenth, so `61.25` becomes `61.2`.
fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

fn contains_any(haystack: &[String], needles: &[&str]) -> bool {
    haystack.iter().any(|item| needles.contains(&item.as_str()))
}

/// Estimated hours to finish, or `None` without a positive playtime.
pub fn estimate_duration(playtime: Option<u64>, genres: &[String], tags: &[String]) -> Option<f64> {
    let playtime = match playtime {
        Some(playtime) if playtime > 0 => playtime as f64,
        _ => return None,
    };

    if playtime <= 2.0 {
        return Some(round_tenth(playtime * 1.2));
    } else if playtime <= 3.0 {
        return Some(round_tenth(playtime * 1.5));
    } else if playtime <= 5.0 {
        return Some(round_tenth(playtime * 2.0));
    }

    let genres: Vec<String> = genres.iter().map(|g| g.to_lowercase()).collect();
    let tags: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();

    let mut ratio = GENRE_RATIOS
        .iter()
        .find(|(names, _)| contains_any(&genres, names))
        .map(|(_, ratio)| *ratio)
        .unwrap_or(DEFAULT_RATIO);

    if contains_any(&tags, &LONG_TAGS) {
        ratio *= LONG_TAG_FACTOR;
    } else if contains_any(&tags, &TENSE_TAGS) {
        ratio *= TENSE_TAG_FACTOR;
    }

    if contains_any(&genres, &["simulation"]) {
        ratio = ratio.max(SIMULATION_FLOOR);
    }

    if contains_any(&tags, &MANAGEMENT_TAGS) {
        ratio = ratio.max(MANAGEMENT_FLOOR);
    }

    Some(round_tenth(playtime * ratio))
}
