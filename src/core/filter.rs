use crate::core::collation;
use crate::domain::model::{Company, FilterState, GeoPoint, SortOption};
use std::cmp::Ordering;

fn contains_ci(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|value| value.to_lowercase().contains(needle))
}

fn matches_search(company: &Company, needle: &str) -> bool {
    needle.is_empty()
        || contains_ci(Some(&company.name), needle)
        || contains_ci(company.description.as_deref(), needle)
        || contains_ci(company.address.as_deref(), needle)
}

fn matches_specializations(company: &Company, state: &FilterState) -> bool {
    state.selected_specialization_ids.is_empty()
        || state
            .selected_specialization_ids
            .iter()
            .any(|id| company.has_specialization(id))
}

fn matches_city(company: &Company, state: &FilterState) -> bool {
    match &state.selected_city {
        Some(city) => company.city.as_deref() == Some(city.as_str()),
        None => true,
    }
}

/// True when `company` passes every predicate implied by `state`.
pub fn matches(company: &Company, state: &FilterState) -> bool {
    let needle = state.search_query.to_lowercase();
    matches_search(company, &needle) && matches_specializations(company, state) && matches_city(company, state)
}

fn by_distance(origin: &GeoPoint) -> impl Fn(&Company, &Company) -> Ordering + '_ {
    move |a, b| match (a.location(), b.location()) {
        (Some(pa), Some(pb)) => origin
            .distance_km(&pa)
            .partial_cmp(&origin.distance_km(&pb))
            .unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filter and sort a snapshot of companies.
///
/// Predicates are AND-combined; all sorts are stable. `Nearest` without an
/// origin leaves the filtered order untouched.
pub fn apply(records: &[Company], state: &FilterState) -> Vec<Company> {
    let needle = state.search_query.to_lowercase();

    let mut result: Vec<Company> = records
        .iter()
        .filter(|c| matches_search(c, &needle))
        .filter(|c| matches_specializations(c, state))
        .filter(|c| matches_city(c, state))
        .cloned()
        .collect();

    match state.sort_by {
        SortOption::Alphabetical => result.sort_by(|a, b| collation::compare(&a.name, &b.name)),
        SortOption::Newest => result.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOption::Nearest => match &state.origin {
            Some(origin) => result.sort_by(by_distance(origin)),
            None => {
                tracing::debug!("nearest sort requested without an origin, keeping input order");
            }
        },
    }

    tracing::debug!(input = records.len(), output = result.len(), sort = ?state.sort_by, "applied filter");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Specialization;
    use chrono::{Duration, TimeZone, Utc};

    fn spec(id: &str) -> Specialization {
        Specialization {
            id: id.to_string(),
            name: id.to_uppercase(),
            icon: "☁️".to_string(),
            color: "#3B82F6".to_string(),
        }
    }

    fn company(id: &str, name: &str, age_days: i64) -> Company {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        Company {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            address: None,
            city: None,
            latitude: None,
            longitude: None,
            website: None,
            email: None,
            phone: None,
            specializations: vec![],
            created_at: base - Duration::days(age_days),
            updated_at: base,
        }
    }

    fn names(records: &[Company]) -> Vec<&str> {
        records.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_alphabetical_and_newest_scenario() {
        let records = vec![company("1", "Zeta GmbH", 10), company("2", "Alpha AG", 1)];

        let alpha = apply(&records, &FilterState::default());
        assert_eq!(names(&alpha), vec!["Alpha AG", "Zeta GmbH"]);

        let newest = apply(&records, &FilterState::default().with_sort(SortOption::Newest));
        assert_eq!(names(&newest), vec!["Alpha AG", "Zeta GmbH"]);
    }

    #[test]
    fn test_empty_input() {
        let state = FilterState::default().with_search("x").with_specialization("cloud");
        assert!(apply(&[], &state).is_empty());
    }

    #[test]
    fn test_search_checks_description_and_address() {
        let mut a = company("1", "Nord Consulting", 0);
        a.description = Some("Cloud-Migration für den Mittelstand".to_string());
        let mut b = company("2", "Süd Beratung", 0);
        b.address = Some("Vahrenwalder Straße 7, Hannover".to_string());
        let c = company("3", "West Partner", 0);
        let records = vec![a, b, c];

        let hits = apply(&records, &FilterState::default().with_search("CLOUD"));
        assert_eq!(names(&hits), vec!["Nord Consulting"]);

        let hits = apply(&records, &FilterState::default().with_search("hannover"));
        assert_eq!(names(&hits), vec!["Süd Beratung"]);

        let hits = apply(&records, &FilterState::default().with_search(""));
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_specialization_intersection() {
        let mut a = company("1", "A", 0);
        a.specializations = vec![spec("cloud"), spec("security")];
        let mut b = company("2", "B", 0);
        b.specializations = vec![spec("erp")];
        let c = company("3", "C", 0);
        let records = vec![a, b, c];

        let state = FilterState::default().with_specialization("security").with_specialization("erp");
        assert_eq!(names(&apply(&records, &state)), vec!["A", "B"]);

        let state = FilterState::default().with_specialization("ai");
        assert!(apply(&records, &state).is_empty());
    }

    #[test]
    fn test_city_is_exact_and_case_sensitive() {
        let mut a = company("1", "A", 0);
        a.city = Some("Hannover".to_string());
        let mut b = company("2", "B", 0);
        b.city = Some("hannover".to_string());
        let c = company("3", "C", 0);
        let records = vec![a, b, c];

        let state = FilterState::default().with_city(Some("Hannover".to_string()));
        assert_eq!(names(&apply(&records, &state)), vec!["A"]);
    }

    #[test]
    fn test_alphabetical_is_stable_for_equal_names() {
        let records = vec![
            company("first", "Same Name", 0),
            company("x", "Another", 0),
            company("second", "Same Name", 0),
        ];
        let out = apply(&records, &FilterState::default());
        let ids: Vec<&str> = out.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "first", "second"]);
    }

    #[test]
    fn test_newest_ties_keep_input_order() {
        let records = vec![company("a", "A", 3), company("b", "B", 3), company("c", "C", 1)];
        let out = apply(&records, &FilterState::default().with_sort(SortOption::Newest));
        let ids: Vec<&str> = out.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_nearest_without_origin_keeps_order() {
        let records = vec![company("1", "Zeta", 0), company("2", "Alpha", 0)];
        let out = apply(&records, &FilterState::default().with_sort(SortOption::Nearest));
        assert_eq!(names(&out), vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn test_nearest_with_origin_sorts_by_distance() {
        let mut oldenburg = company("1", "Oldenburg IT", 0);
        oldenburg.latitude = Some(53.1435);
        oldenburg.longitude = Some(8.2146);
        let nowhere = company("2", "Ohne Standort", 0);
        let mut hannover = company("3", "Hannover Digital", 0);
        hannover.latitude = Some(52.3759);
        hannover.longitude = Some(9.732);
        let records = vec![oldenburg, nowhere, hannover];

        let state = FilterState::default()
            .with_sort(SortOption::Nearest)
            .with_origin(Some(GeoPoint::new(52.37, 9.73)));
        let out = apply(&records, &state);
        assert_eq!(names(&out), vec!["Hannover Digital", "Oldenburg IT", "Ohne Standort"]);
    }

    #[test]
    fn test_apply_is_idempotent_and_sound() {
        let mut records = Vec::new();
        for (i, name) in ["Delta", "alpha", "Charlie", "bravo", "Alpha"].iter().enumerate() {
            let mut c = company(&i.to_string(), name, i as i64);
            c.city = Some(if i % 2 == 0 { "Hannover" } else { "Celle" }.to_string());
            c.description = Some(format!("{} consulting", name));
            records.push(c);
        }

        for sort in [SortOption::Alphabetical, SortOption::Newest, SortOption::Nearest] {
            let state = FilterState::default()
                .with_sort(sort)
                .with_search("a")
                .with_city(Some("Hannover".to_string()));
            let once = apply(&records, &state);
            assert!(once.iter().all(|c| matches(c, &state)));
            let expected = records.iter().filter(|c| matches(c, &state)).count();
            assert_eq!(once.len(), expected);
            assert_eq!(apply(&once, &state), once);
        }
    }

    #[test]
    fn test_input_is_not_mutated() {
        let records = vec![company("1", "Zeta", 0), company("2", "Alpha", 0)];
        let snapshot = records.clone();
        let _ = apply(&records, &FilterState::default());
        assert_eq!(records, snapshot);
    }
}
