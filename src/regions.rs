//! Static state-code lookup for NPS administrative regions

/// Map a two-letter state/territory code to its NPS region name.
pub fn region_for_state(code: &str) -> Option<&'static str> {
    let region = match code {
        "AK" => "Alaska",
        "AZ" | "CO" | "MT" | "NM" | "OK" | "TX" | "UT" | "WY" => "Intermountain",
        "AR" | "IA" | "IL" | "IN" | "KS" | "MI" | "MN" | "MO" | "ND" | "NE" | "OH" | "SD"
        | "WI" => "Midwest",
        "DC" => "National Capital",
        "CT" | "DE" | "MA" | "MD" | "ME" | "NH" | "NJ" | "NY" | "PA" | "RI" | "VA" | "VT"
        | "WV" => "Northeast",
        "AS" | "CA" | "GU" | "HI" | "ID" | "MP" | "NV" | "OR" | "WA" => "Pacific West",
        "AL" | "FL" | "GA" | "KY" | "LA" | "MS" | "NC" | "PR" | "SC" | "TN" | "VI" => "Southeast",
        _ => return None,
    };
    Some(region)
}

/// Region for a park's comma-separated `states` field ("CA,NV" -> Pacific
/// West). Multi-state parks take the region of their first listed state.
pub fn region_for_states(states: &str) -> Option<&'static str> {
    states
        .split(',')
        .map(str::trim)
        .find(|s| !s.is_empty())
        .and_then(region_for_state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_state_lookup() {
        assert_eq!(region_for_state("AK"), Some("Alaska"));
        assert_eq!(region_for_state("DC"), Some("National Capital"));
        assert_eq!(region_for_state("FL"), Some("Southeast"));
        assert_eq!(region_for_state("XX"), None);
    }

    #[test]
    fn multi_state_park_uses_first_state() {
        assert_eq!(region_for_states("CA,NV"), Some("Pacific West"));
        assert_eq!(region_for_states("TN, NC"), Some("Southeast"));
    }

    #[test]
    fn empty_states_field() {
        assert_eq!(region_for_states(""), None);
        assert_eq!(region_for_states(" , "), None);
    }
}
