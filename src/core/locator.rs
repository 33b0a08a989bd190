use crate::core::distance::distance_between;
use crate::models::{Coordinates, Restaurant};

/// An active restaurant and its distance from the user
#[derive(Debug, Clone, Copy)]
pub struct NearestMatch<'a> {
    pub restaurant: &'a Restaurant,
    pub distance_km: f64,
}

/// Find the active restaurant closest to the user
///
/// Linear scan; on equal distances the first restaurant in input order wins.
/// Returns `None` when no active restaurant exists.
pub fn find_nearest<'a>(user: &Coordinates, restaurants: &'a [Restaurant]) -> Option<NearestMatch<'a>> {
    let mut nearest: Option<NearestMatch<'a>> = None;

    for restaurant in restaurants.iter().filter(|r| r.is_active) {
        let distance_km = distance_between(user, &restaurant.coordinates());
        match nearest {
            Some(best) if distance_km >= best.distance_km => {}
            _ => {
                nearest = Some(NearestMatch {
                    restaurant,
                    distance_km,
                })
            }
        }
    }

    nearest
}

/// Attribute a location ping to a restaurant
///
/// Picks the nearest active restaurant whose POI radius contains the ping.
pub fn attribute_visit<'a>(user: &Coordinates, restaurants: &'a [Restaurant]) -> Option<NearestMatch<'a>> {
    restaurants
        .iter()
        .filter(|r| r.is_active)
        .map(|restaurant| NearestMatch {
            restaurant,
            distance_km: distance_between(user, &restaurant.coordinates()),
        })
        .filter(|m| m.distance_km <= m.restaurant.poi_radius_km)
        .fold(None, |best: Option<NearestMatch<'a>>, m| match best {
            Some(b) if b.distance_km <= m.distance_km => Some(b),
            _ => Some(m),
        })
}
