//! # Recombination Resolver
//!
//! When a site ionizes it needs a nearby vacancy to give its electron
//! to. This module finds one: shuffle every currently-vacant site,
//! scan in that random order for the first one within the ionizing
//! site's travel radius, and repopulate it. Shuffling first rather
//! than scanning in index order means ties among several reachable
//! vacancies are not biased toward lower indices.

use rand::Rng;

use crate::site::{ReState, SiteTable};

/// Attempts to recombine the electron freed by ionizing site `source`
/// into a nearby vacancy. Returns `true` if a reachable vacancy was
/// found and repopulated, `false` if the electron was lost (no vacant
/// site within `travel_radius`, or no vacant site at all).
pub fn recombine(
    table: &mut SiteTable,
    source: usize,
    travel_radius: f64,
    rng: &mut impl Rng,
) -> bool {
    let mut vacant: Vec<usize> = table.vacant_indices().into_iter().filter(|&i| i != source).collect();
    if vacant.is_empty() {
        return false;
    }

    use rand::seq::SliceRandom;
    vacant.shuffle(rng);

    let (sx, sy) = table.position(source);
    let r2 = travel_radius * travel_radius;

    for target in vacant {
        let (tx, ty) = table.position(target);
        let dx = tx - sx;
        let dy = ty - sy;
        if dx * dx + dy * dy <= r2 {
            table.set_populated(target, true);
            if table.is_re(target) {
                table.set_re_state(target, ReState::Excited);
            }
            return true;
        }
    }
    false
}
