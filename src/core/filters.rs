use crate::models::{Destination, LocationPolicy};

/// State restriction requested by a query, if any
///
/// Blank states and the wildcard both mean "every state".
#[inline]
pub fn requested_state<'a>(state: Option<&'a str>, policy: &LocationPolicy) -> Option<&'a str> {
    state.filter(|s| !s.is_empty() && *s != policy.any_state)
}

/// Check if a destination passes the coarse location filter
///
/// A query for the home country keeps only its rows (optionally one state);
/// any other location keeps everything outside the home country.
#[inline]
pub fn matches_location(
    destination: &Destination,
    location: &str,
    state: Option<&str>,
    policy: &LocationPolicy,
) -> bool {
    if location == policy.home_country {
        if destination.country != policy.home_country {
            return false;
        }
        match requested_state(state, policy) {
            Some(state) => destination.state == state,
            None => true,
        }
    } else {
        destination.country != policy.home_country
    }
}

/// Sorted distinct states, optionally restricted to one country
pub fn distinct_states<'a, I>(destinations: I, country: Option<&str>) -> Vec<String>
where
    I: IntoIterator<Item = &'a Destination>,
{
    let country = country.filter(|c| !c.is_empty());
    let mut states: Vec<String> = destinations
        .into_iter()
        .filter(|d| country.map_or(true, |c| d.country == c))
        .map(|d| d.state.clone())
        .collect();
    states.sort();
    states.dedup();
    states
}
