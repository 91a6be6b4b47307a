// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use route_demand_core::feed::FeedParser;
use route_demand_core::{rank_routes, CountryFilter, RouteFrequency, RouteNetwork, NULL_SENTINEL};

const AIRPORTS: &str = "\
3361,\"Sydney Kingsford Smith International Airport\",\"Sydney\",\"Australia\",\"SYD\",\"YSSY\",-33.94609832763672,151.177001953125,21,10,\"O\",\"Australia/Sydney\",\"airport\",\"OurAirports\"
3339,\"Melbourne International Airport\",\"Melbourne\",\"Australia\",\"MEL\",\"YMML\",-37.673301696777344,144.84300231933594,434,10,\"O\",\"Australia/Melbourne\",\"airport\",\"OurAirports\"
3320,\"Brisbane International Airport\",\"Brisbane\",\"Australia\",\"BNE\",\"YBBN\",-27.384199142456055,153.11700439453125,13,10,\"O\",\"Australia/Brisbane\",\"airport\",\"OurAirports\"
507,\"London Heathrow Airport\",\"London\",\"United Kingdom\",\"LHR\",\"EGLL\",51.4706,-0.461941,83,0,\"E\",\"Europe/London\",\"airport\",\"OurAirports\"
1382,\"Charles de Gaulle International Airport\",\"Paris\",\"France\",\"CDG\",\"LFPG\",49.012798,2.55,392,1,\"E\",\"Europe/Paris\",\"airport\",\"OurAirports\"
";

const ROUTES: &str = "\
QF,4178,SYD,3361,MEL,3339,,0,738
VA,5351,SYD,3361,MEL,3339,,0,73H
JQ,2805,SYD,3361,MEL,3339,Y,0,320
QF,4178,SYD,3361,BNE,3320,,0,738
BA,1355,LHR,507,CDG,1382,,0,319
AF,137,CDG,1382,LHR,507,,0,318
XX,1,\\N,\\N,MEL,3339,,0,738
XX,1,SYD,3361,\\N,\\N,,0,738
XX,1,ABC,\\N,XYZ,\\N,,1,CR2
";

fn parsed() -> (Vec<route_demand_core::Airport>, Vec<route_demand_core::Route>) {
    let airports = FeedParser::parse_airports_str(AIRPORTS).unwrap().rows;
    let routes = FeedParser::parse_routes_str(ROUTES).unwrap().rows;
    (airports, routes)
}

#[test]
fn test_one_row_per_eligible_route_with_canonical_id() {
    let (airports, routes) = parsed();
    let network = RouteNetwork::build(&airports, &routes);

    let eligible: Vec<_> = routes
        .iter()
        .filter(|r| r.source_iata != NULL_SENTINEL && r.dest_iata != NULL_SENTINEL)
        .collect();
    assert_eq!(network.len(), eligible.len());

    for (row, raw) in network.routes.iter().zip(eligible) {
        assert_eq!(&row.route, raw);
        assert_eq!(row.route_id, format!("{}-{}", raw.source_iata, raw.dest_iata));
    }
}

#[test]
fn test_sentinel_routes_never_appear() {
    let (airports, routes) = parsed();
    let network = RouteNetwork::build(&airports, &routes);

    assert!(network
        .routes
        .iter()
        .all(|r| r.route.source_iata != NULL_SENTINEL && r.route.dest_iata != NULL_SENTINEL));
}

#[test]
fn test_unmatched_endpoints_are_kept_as_none() {
    let (airports, routes) = parsed();
    let network = RouteNetwork::build(&airports, &routes);

    let orphan = network.first_route("ABC-XYZ").unwrap();
    assert!(orphan.source.is_none());
    assert!(orphan.dest.is_none());
    assert_eq!(orphan.route.stop_count(), Some(1));
}

#[test]
fn test_counts_sum_to_filtered_rows() {
    let (airports, routes) = parsed();
    let network = RouteNetwork::build(&airports, &routes);

    for filter in [
        CountryFilter::All,
        CountryFilter::Country("Australia".into()),
        CountryFilter::Country("France".into()),
        CountryFilter::Country("Atlantis".into()),
    ] {
        let expected = network
            .routes
            .iter()
            .filter(|r| filter.matches(r.source_country()))
            .count();
        let ranking = rank_routes(&network, &filter);
        assert_eq!(ranking.total(), expected, "filter {}", filter);
        assert!(ranking
            .records
            .windows(2)
            .all(|w| w[0].count >= w[1].count));
    }
}

#[test]
fn test_end_to_end_australia() {
    let (airports, routes) = parsed();
    let network = RouteNetwork::build(&airports, &routes);
    let ranking = rank_routes(&network, &"Australia".parse().unwrap());

    assert_eq!(
        ranking.records,
        vec![
            RouteFrequency {
                route_id: "SYD-MEL".to_string(),
                count: 3
            },
            RouteFrequency {
                route_id: "SYD-BNE".to_string(),
                count: 1
            },
        ]
    );
}

#[test]
fn test_ties_keep_first_seen_order() {
    let (airports, routes) = parsed();
    let network = RouteNetwork::build(&airports, &routes);
    let ranking = rank_routes(&network, &CountryFilter::All);

    let singles: Vec<_> = ranking
        .records
        .iter()
        .filter(|r| r.count == 1)
        .map(|r| r.route_id.as_str())
        .collect();
    assert_eq!(singles, vec!["SYD-BNE", "LHR-CDG", "CDG-LHR", "ABC-XYZ"]);
}

#[test]
fn test_source_countries_for_filter_control() {
    let (airports, routes) = parsed();
    let network = RouteNetwork::build(&airports, &routes);
    assert_eq!(
        network.source_countries(),
        vec!["Australia", "France", "United Kingdom"]
    );
}
