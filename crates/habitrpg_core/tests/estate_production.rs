use habitrpg_core::db::open_db_in_memory;
use habitrpg_core::{
    Building, EngineError, EstateService, PlayerService, ProgressionConfig, ServiceError, DAY_MS,
};
use rusqlite::Connection;
use uuid::Uuid;

const T0: i64 = 1_760_000_000_000;

fn register(conn: &Connection) -> Uuid {
    PlayerService::new(conn, ProgressionConfig::default())
        .register(Uuid::new_v4())
        .unwrap()
        .estate
        .id
}

#[test]
fn produce_runs_once_per_day() {
    let conn = open_db_in_memory().unwrap();
    let estates = EstateService::new(&conn, ProgressionConfig::default());
    let id = register(&conn);

    let first = estates.produce(id, T0).unwrap();
    assert_eq!((first.wood, first.iron, first.stone), (1, 1, 1));
    assert_eq!(first.last_production_at, Some(T0));

    let err = estates.produce(id, T0 + 60 * 60 * 1000).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Engine(EngineError::ProductionAlreadyDone { next_available_at })
            if next_available_at == T0 + DAY_MS
    ));
    assert_eq!(estates.estate(id).unwrap(), first);

    let second = estates.produce(id, T0 + DAY_MS).unwrap();
    assert_eq!((second.wood, second.iron, second.stone), (2, 2, 2));
}

#[test]
fn production_applies_percentage_bonus_with_truncation() {
    let conn = open_db_in_memory().unwrap();
    let estates = EstateService::new(&conn, ProgressionConfig::default());
    let id = register(&conn);
    estates.set_building_level(id, Building::Sawmill, 3).unwrap();
    estates.set_building_level(id, Building::IronMine, 2).unwrap();
    estates.set_building_level(id, Building::Quarry, 4).unwrap();
    conn.execute(
        "UPDATE estates SET bonus_wood = 10, bonus_iron = 0, bonus_stone = 50 WHERE uuid = ?1;",
        [id.to_string()],
    )
    .unwrap();

    let produced = estates.produce(id, T0).unwrap();
    assert_eq!(produced.wood, 3);
    assert_eq!(produced.iron, 2);
    assert_eq!(produced.stone, 6);
}

#[test]
fn negative_bonus_never_removes_stock() {
    let conn = open_db_in_memory().unwrap();
    let estates = EstateService::new(&conn, ProgressionConfig::default());
    let id = register(&conn);
    conn.execute(
        "UPDATE estates SET wood = 7, bonus_wood = -150 WHERE uuid = ?1;",
        [id.to_string()],
    )
    .unwrap();

    let produced = estates.produce(id, T0).unwrap();
    assert_eq!(produced.wood, 7);
    assert_eq!(produced.iron, 1);
}

#[test]
fn batch_isolates_estates_already_produced() {
    let conn = open_db_in_memory().unwrap();
    let estates = EstateService::new(&conn, ProgressionConfig::default());
    let early = register(&conn);
    let fresh = register(&conn);
    estates.produce(early, T0).unwrap();

    let report = estates.run_daily_production_batch(T0 + 1_000).unwrap();
    assert_eq!(report.len(), 2);
    assert!(matches!(
        report[&early],
        Err(ServiceError::Engine(EngineError::ProductionAlreadyDone { .. }))
    ));
    let fresh_estate = report[&fresh].as_ref().unwrap();
    assert_eq!(fresh_estate.wood, 1);
    assert_eq!(fresh_estate.last_production_at, Some(T0 + 1_000));

    assert_eq!(estates.estate(early).unwrap().wood, 1);
    let ids: Vec<Uuid> = report.keys().copied().collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[test]
fn batch_on_empty_store_reports_nothing() {
    let conn = open_db_in_memory().unwrap();
    let estates = EstateService::new(&conn, ProgressionConfig::default());

    assert!(estates.run_daily_production_batch(T0).unwrap().is_empty());
}

#[test]
fn building_changes_recompute_bonuses() {
    let conn = open_db_in_memory().unwrap();
    let estates = EstateService::new(&conn, ProgressionConfig::default());
    let id = register(&conn);

    estates.set_building_level(id, Building::House, 4).unwrap();
    let estate = estates
        .set_building_level(id, Building::HealingPool, 2)
        .unwrap();
    assert_eq!(estate.bonus_hp, 40);
    let estate = estates
        .set_building_level(id, Building::TrainingBuddy, 3)
        .unwrap();
    assert_eq!(estate.bonus_exp, 6);

    let again = estates.recompute_bonuses(id).unwrap();
    assert_eq!(again, estate);
    assert_eq!(estates.recompute_bonuses(id).unwrap(), again);
}

#[test]
fn building_level_outside_range_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let estates = EstateService::new(&conn, ProgressionConfig::default());
    let id = register(&conn);

    for level in [0, 11] {
        let err = estates
            .set_building_level(id, Building::Sawmill, level)
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Engine(EngineError::BuildingLevelOutOfRange {
                building: Building::Sawmill,
                ..
            })
        ));
    }
    assert_eq!(estates.estate(id).unwrap().sawmill, 1);
}

#[test]
fn unknown_estate_is_reported() {
    let conn = open_db_in_memory().unwrap();
    let estates = EstateService::new(&conn, ProgressionConfig::default());
    let missing = Uuid::new_v4();

    let err = estates.produce(missing, T0).unwrap_err();
    assert!(matches!(err, ServiceError::EstateNotFound(id) if id == missing));
    assert!(matches!(
        estates.estate_of(Uuid::new_v4()).unwrap_err(),
        ServiceError::ActorNotRegistered(_)
    ));
}

#[test]
fn batch_skips_estate_with_undecodable_id() {
    let conn = open_db_in_memory().unwrap();
    let estates = EstateService::new(&conn, ProgressionConfig::default());
    let good = register(&conn);
    conn.execute(
        "INSERT INTO estates (uuid, user_uuid, house, sawmill, quarry, iron_mine, healing_pool, training_buddy)
         VALUES ('legacy-7', ?1, 1, 1, 1, 1, 0, 0);",
        [Uuid::new_v4().to_string()],
    )
    .unwrap();

    let report = estates.run_daily_production_batch(T0).unwrap();
    assert_eq!(report.len(), 1);
    assert!(report[&good].is_ok());
    assert_eq!(estates.estate(good).unwrap().wood, 1);
}

#[test]
fn batch_records_corrupt_estate_and_produces_the_rest() {
    let conn = open_db_in_memory().unwrap();
    let estates = EstateService::new(&conn, ProgressionConfig::default());
    let first = register(&conn);
    let corrupt = register(&conn);
    let last = register(&conn);
    conn.execute(
        "UPDATE estates SET user_uuid = 'not-a-uuid' WHERE uuid = ?1;",
        [corrupt.to_string()],
    )
    .unwrap();

    let report = estates.run_daily_production_batch(T0).unwrap();
    assert_eq!(report.len(), 3);
    let err = report[&corrupt].as_ref().unwrap_err();
    assert!(matches!(err, ServiceError::Repo(_)));
    assert!(!err.is_user_facing());
    for id in [first, last] {
        assert_eq!(report[&id].as_ref().unwrap().wood, 1);
        assert_eq!(estates.estate(id).unwrap().last_production_at, Some(T0));
    }
}
