use super::*;
use assert_float_eq::*;
use std::env;
use std::fs;

fn raw(
    game_id: Option<&str>,
    home_odds: &str,
    away_odds: &str,
    model_prob_home: &str,
    market_prob_home: Option<&str>,
    home_win: &str,
) -> RawGame {
    let field = |value: &str| Some(value.to_string()).filter(|value| !value.is_empty());
    RawGame {
        game_id: game_id.map(ToString::to_string),
        home_odds: field(home_odds),
        away_odds: field(away_odds),
        model_prob_home: field(model_prob_home),
        market_prob_home: market_prob_home.and_then(field),
        home_win: field(home_win),
    }
}

#[test]
fn edges_are_computed_independently() {
    let game = GameOdds::new("g1", -150.0, 130.0, 0.70, 0.58, true).unwrap();
    let edges = game.edges();
    assert_float_absolute_eq!(0.12, edges.home, 1e-12);
    assert_float_absolute_eq!(-0.12, edges.away, 1e-12);
}

#[test]
fn view_restates_each_side() {
    let game = GameOdds::new("g1", -150.0, 130.0, 0.70, 0.58, false).unwrap();
    let home = game.view(Side::Home);
    assert_eq!(Side::Home, home.side);
    assert_eq!(0.70, home.model_prob);
    assert_eq!(0.58, home.market_prob);
    assert_eq!(-150.0, home.odds.value());

    let away = game.view(Side::Away);
    assert_eq!(Side::Away, away.side);
    assert_float_absolute_eq!(0.30, away.model_prob, 1e-12);
    assert_float_absolute_eq!(0.42, away.market_prob, 1e-12);
    assert_eq!(130.0, away.odds.value());
    assert_eq!(Side::Away, game.winner());
}

#[test]
fn side_display_and_opposite() {
    assert_eq!("home", Side::Home.to_string());
    assert_eq!("away", Side::Away.to_string());
    assert_eq!(Side::Away, Side::Home.opposite());
    assert_eq!("\"away\"", serde_json::to_string(&Side::Away).unwrap());
}

#[test]
fn new_rejects_bad_inputs() {
    assert_eq!(
        Err(InvalidGame::InvalidOdds {
            field: "home_odds",
            source: OddsError::ZeroOdds
        }),
        GameOdds::new("g", 0.0, 130.0, 0.5, 0.5, true)
    );
    assert_eq!(
        Err(InvalidGame::ProbabilityOutOfRange {
            field: "model_prob_home",
            value: 1.2
        }),
        GameOdds::new("g", -150.0, 130.0, 1.2, 0.5, true)
    );
    assert!(GameOdds::new("g", -150.0, 130.0, 0.5, f64::NAN, true).is_err());
}

#[test]
fn validate_complete_record() {
    let game = raw(Some("2023020001"), "-150", "+130", "0.70", Some("0.58"), "1")
        .validate(7)
        .unwrap();
    assert_eq!(GameId::from("2023020001"), game.game_id);
    assert_eq!(-150.0, game.home_odds.value());
    assert_eq!(130.0, game.away_odds.value());
    assert_eq!(0.70, game.model_prob_home);
    assert_eq!(0.58, game.market_prob_home);
    assert!(game.home_win);
}

#[test]
fn validate_defaults_game_id_to_row() {
    let game = raw(None, "-110", "-110", "0.5", Some("0.5"), "0")
        .validate(3)
        .unwrap();
    assert_eq!(GameId::from(3), game.game_id);
    assert!(!game.home_win);
}

#[test]
fn validate_derives_missing_market_prob() {
    let game = raw(None, "-150", "130", "0.70", None, "true")
        .validate(0)
        .unwrap();
    assert_float_absolute_eq!(0.5798319, game.market_prob_home, 1e-7);
}

#[test]
fn validate_reports_reason() {
    assert_eq!(
        Err(InvalidGame::MissingField("away_odds")),
        raw(None, "-150", "", "0.7", Some("0.58"), "1").validate(0)
    );
    assert_eq!(
        Err(InvalidGame::NotNumeric {
            field: "model_prob_home",
            value: "high".to_string()
        }),
        raw(None, "-150", "130", "high", Some("0.58"), "1").validate(0)
    );
    assert_eq!(
        Err(InvalidGame::InvalidOutcome("2".to_string())),
        raw(None, "-150", "130", "0.7", Some("0.58"), "2").validate(0)
    );
    assert_eq!(
        "home_odds: american odds of zero are not a valid quote",
        raw(None, "0", "130", "0.7", Some("0.58"), "1")
            .validate(0)
            .unwrap_err()
            .to_string()
    );
}

#[test]
fn load_skips_malformed_rows() {
    let rows = vec![
        raw(Some("a"), "-150", "130", "0.70", Some("0.58"), "1"),
        raw(Some("b"), "-150", "130", "", Some("0.58"), "1"),
        raw(Some("c"), "120", "-140", "0.40", Some("0.45"), "0"),
    ];
    let set = load_games(rows).unwrap();
    assert_eq!(
        vec![GameId::from("a"), GameId::from("c")],
        set.games.iter().map(|game| game.game_id.clone()).collect::<Vec<_>>()
    );
    assert_eq!(
        vec![Rejected {
            row: 1,
            reason: InvalidGame::MissingField("model_prob_home")
        }],
        set.rejected
    );
}

#[test]
fn load_fails_when_every_row_is_malformed() {
    let rows = vec![
        raw(None, "0", "130", "0.70", Some("0.58"), "1"),
        raw(None, "-150", "130", "0.70", Some("0.58"), "maybe"),
    ];
    let err = load_games(rows).unwrap_err();
    assert_eq!(
        "all 2 games were rejected, the first at row 0: home_odds: american odds of zero are not a valid quote",
        err.to_string()
    );
}

#[test]
fn load_empty_is_not_an_error() {
    let set = load_games(Vec::<RawGame>::new()).unwrap();
    assert!(set.games.is_empty());
    assert!(set.rejected.is_empty());
}

#[test]
fn read_csv_with_optional_columns() {
    let path = env::temp_dir().join(format!("puckcast-games-{}.csv", std::process::id()));
    fs::write(
        &path,
        "home_odds,away_odds,model_prob_home,home_win\n-150,+130,0.70,1\n\n110,-130,0.40,zero\n-120,100,0.55,0\n",
    )
    .unwrap();
    let set = read_csv(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(2, set.games.len());
    assert_eq!(GameId::from(0), set.games[0].game_id);
    assert_float_absolute_eq!(0.5798319, set.games[0].market_prob_home, 1e-7);
    assert_eq!(GameId::from(2), set.games[1].game_id);
    assert_eq!(1, set.rejected.len());
    assert_eq!(1, set.rejected[0].row);
}

#[test]
fn read_csv_header_only() {
    let path = env::temp_dir().join(format!("puckcast-header-{}.csv", std::process::id()));
    fs::write(&path, "home_odds,away_odds,model_prob_home,home_win\n").unwrap();
    let set = read_csv(&path).unwrap();
    fs::remove_file(&path).unwrap();
    assert!(set.games.is_empty());
    assert!(set.rejected.is_empty());
}

#[test]
fn read_csv_missing_column() {
    let path = env::temp_dir().join(format!("puckcast-columns-{}.csv", std::process::id()));
    fs::write(&path, "home_odds,away_odds,home_win\n-150,130,1\n").unwrap();
    let err = read_csv(&path).unwrap_err();
    fs::remove_file(&path).unwrap();
    assert_eq!("missing column 'model_prob_home'", err.to_string());
}

#[test]
fn read_sample_games() {
    let set = read_csv(concat!(env!("CARGO_MANIFEST_DIR"), "/../data/sample_games.csv")).unwrap();
    assert_eq!(60, set.games.len());
    assert!(set.rejected.is_empty());
    assert_eq!(GameId::from("2023020001"), set.games[0].game_id);
    for game in &set.games {
        let edges = game.edges();
        assert_float_absolute_eq!(0.0, edges.home + edges.away, 1e-12);
    }
}
