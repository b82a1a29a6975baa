// Unit tests for the tourist recommender

use tourist_recommender::core::{
    encoding::{encode_field, LabelEncoder, EncodeError},
    filters::{matches_location, distinct_states},
    neighbors::{DistanceMetric, NeighborIndex, NeighborParams},
    scaler::StandardScaler,
};
use tourist_recommender::models::{Destination, LocationPolicy, Recommendation};
use std::collections::BTreeMap;

fn create_destination(name: &str, country: &str, state: &str) -> Destination {
    Destination {
        name: name.to_string(),
        country: country.to_string(),
        state: state.to_string(),
        source_city: "Bengaluru".to_string(),
        climate: "Temperate".to_string(),
        budget_level: "Low".to_string(),
        avg_cost_inr: 12000.0,
        popularity_score: 65.0,
        avg_temp_c: 18.0,
        rating: 4.1,
        safety_index: 8.2,
        accessibility: "Moderate".to_string(),
        transport_cost_inr: 800.0,
        activities: "Coffee Estates".to_string(),
    }
}

#[test]
fn test_encoder_codes_follow_class_order() {
    let encoder = LabelEncoder::new(vec![
        "Difficult".to_string(),
        "Easy".to_string(),
        "Moderate".to_string(),
    ])
    .unwrap();

    assert_eq!(encoder.encode("Accessibility", "Difficult"), Ok(0));
    assert_eq!(encoder.encode("Accessibility", "Moderate"), Ok(2));
    assert_eq!(encoder.classes().len(), 3);
}

#[test]
fn test_encode_field_reports_allowed_values() {
    let mut encoders = BTreeMap::new();
    encoders.insert(
        "BudgetLevel".to_string(),
        LabelEncoder::new(vec!["High".to_string(), "Low".to_string()]).unwrap(),
    );

    match encode_field(&encoders, "BudgetLevel", "Luxury") {
        Err(EncodeError::UnknownCategory { allowed, .. }) => {
            assert_eq!(allowed, vec!["High", "Low"]);
        }
        other => panic!("unexpected result: {:?}", other),
    }

    assert!(matches!(
        encode_field(&encoders, "Climate", "Tropical"),
        Err(EncodeError::MissingEncoder(_))
    ));
}

#[test]
fn test_scaler_applies_training_parameters() {
    let scaler = StandardScaler::new(vec![50000.0, 4.0], vec![25000.0, 0.5]).unwrap();
    let scaled = scaler.transform(&[75000.0, 3.0]).unwrap();

    assert!((scaled[0] - 1.0).abs() < 1e-12);
    assert!((scaled[1] + 2.0).abs() < 1e-12);
}

#[test]
fn test_index_returns_closest_first() {
    let points = vec![vec![10.0], vec![1.0], vec![4.0], vec![2.0]];
    let index = NeighborIndex::fit(points, 3, DistanceMetric::Euclidean).unwrap();

    let order: Vec<usize> = index.kneighbors(&[0.0]).unwrap().iter().map(|n| n.index).collect();
    assert_eq!(order, vec![1, 3, 2]);
}

#[test]
fn test_index_manhattan_metric_changes_ranking() {
    // From the origin, (3, 3) is nearer by Euclidean distance and (0, 5) by Manhattan
    let points = vec![vec![3.0, 3.0], vec![0.0, 5.0]];

    let euclidean = NeighborIndex::fit(points.clone(), 1, DistanceMetric::Euclidean).unwrap();
    assert_eq!(euclidean.kneighbors(&[0.0, 0.0]).unwrap()[0].index, 0);

    let manhattan = NeighborIndex::fit(points, 1, DistanceMetric::Manhattan).unwrap();
    assert_eq!(manhattan.kneighbors(&[0.0, 0.0]).unwrap()[0].index, 1);
}

#[test]
fn test_default_params_are_euclidean() {
    let params = NeighborParams::default();
    assert_eq!(params.distance_metric(), Ok(DistanceMetric::Euclidean));
}

#[test]
fn test_location_filter_with_custom_home_country() {
    let policy = LocationPolicy {
        home_country: "Nepal".to_string(),
        any_state: "All".to_string(),
    };
    let pokhara = create_destination("Pokhara", "Nepal", "Gandaki");
    let goa = create_destination("Goa", "India", "Goa");

    assert!(matches_location(&pokhara, "Nepal", Some("All"), &policy));
    assert!(!matches_location(&goa, "Nepal", None, &policy));
    assert!(matches_location(&goa, "India", None, &policy));
}

#[test]
fn test_distinct_states_sorted_and_unique() {
    let destinations = vec![
        create_destination("Coorg", "India", "Karnataka"),
        create_destination("Hampi", "India", "Karnataka"),
        create_destination("Ooty", "India", "Tamil Nadu"),
        create_destination("Alleppey", "India", "Kerala"),
    ];

    assert_eq!(
        distinct_states(&destinations, Some("India")),
        vec!["Karnataka", "Kerala", "Tamil Nadu"]
    );
}

#[test]
fn test_recommendation_projection() {
    let destination = create_destination("Coorg", "India", "Karnataka");
    let recommendation = Recommendation::from(&destination);

    assert_eq!(recommendation.destination, "Coorg");
    assert_eq!(recommendation.state, "Karnataka");
    assert_eq!(recommendation.avg_cost_inr, 12000.0);

    let json = serde_json::to_value(&recommendation).unwrap();
    let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys.len(), 11);
    assert!(json.get("PopularityScore").is_none());
    assert_eq!(json["SourceCity"], "Bengaluru");
}
