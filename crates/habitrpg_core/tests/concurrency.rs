use habitrpg_core::db::open_db;
use habitrpg_core::{
    EngineError, EstateService, PlayerService, ProgressionConfig, ServiceError, StatAllocation,
    DAY_MS,
};
use std::thread;
use uuid::Uuid;

const T0: i64 = 1_760_000_000_000;

#[test]
fn concurrent_exp_grants_lose_no_update() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("habitrpg.db");
    let character_id = {
        let conn = open_db(&path).unwrap();
        PlayerService::new(&conn, ProgressionConfig::default())
            .register(Uuid::new_v4())
            .unwrap()
            .character
            .id
    };

    let workers: Vec<_> = (0..2)
        .map(|_| {
            let path = path.clone();
            thread::spawn(move || {
                let conn = open_db(&path).unwrap();
                let players = PlayerService::new(&conn, ProgressionConfig::default());
                for _ in 0..20 {
                    players.gain_exp(character_id, 10).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let conn = open_db(&path).unwrap();
    let character = PlayerService::new(&conn, ProgressionConfig::default())
        .character(character_id)
        .unwrap();
    // 400 exp: 100 for level 2, 200 for level 3, 100 banked.
    assert_eq!(character.current_level, 3);
    assert_eq!(character.current_exp, 100);
}

#[test]
fn concurrent_production_credits_each_estate_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("habitrpg.db");
    let estate_id = {
        let conn = open_db(&path).unwrap();
        PlayerService::new(&conn, ProgressionConfig::default())
            .register(Uuid::new_v4())
            .unwrap()
            .estate
            .id
    };

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let path = path.clone();
            thread::spawn(move || {
                let conn = open_db(&path).unwrap();
                EstateService::new(&conn, ProgressionConfig::default())
                    .produce(estate_id, T0)
                    .is_ok()
            })
        })
        .collect();
    let successes = workers
        .into_iter()
        .map(|worker| worker.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(successes, 1);

    let conn = open_db(&path).unwrap();
    let estates = EstateService::new(&conn, ProgressionConfig::default());
    let estate = estates.estate(estate_id).unwrap();
    assert_eq!(estate.wood, 1);
    assert!(estates.produce(estate_id, T0 + DAY_MS).is_ok());
}

#[test]
fn allocation_racing_level_ups_never_spends_unearned_points() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("habitrpg.db");
    let config = ProgressionConfig {
        stat_points_per_level: 1,
        ..ProgressionConfig::default()
    };
    let character_id = {
        let conn = open_db(&path).unwrap();
        PlayerService::new(&conn, config.clone())
            .register(Uuid::new_v4())
            .unwrap()
            .character
            .id
    };

    let granter = {
        let (path, config) = (path.clone(), config.clone());
        thread::spawn(move || {
            let conn = open_db(&path).unwrap();
            let players = PlayerService::new(&conn, config);
            for _ in 0..50 {
                players.gain_exp(character_id, 90).unwrap();
            }
        })
    };
    let allocator = {
        let (path, config) = (path.clone(), config.clone());
        thread::spawn(move || {
            let conn = open_db(&path).unwrap();
            let players = PlayerService::new(&conn, config);
            let one_vigor = StatAllocation {
                vigor: 1,
                ..StatAllocation::default()
            };
            let mut spent = 0u32;
            for _ in 0..400 {
                match players.allocate_stats(character_id, &one_vigor) {
                    Ok(_) => spent += 1,
                    Err(ServiceError::Engine(EngineError::InsufficientPoints { .. })) => {}
                    Err(other) => panic!("unexpected allocation failure: {other}"),
                }
            }
            spent
        })
    };
    granter.join().unwrap();
    let spent = allocator.join().unwrap();

    let conn = open_db(&path).unwrap();
    let character = PlayerService::new(&conn, config.clone())
        .character(character_id)
        .unwrap();
    // 4500 exp is exactly 100 + 200 + ... + 900: level 10, nine points earned.
    assert_eq!(character.current_level, 10);
    assert_eq!(character.current_exp, 0);
    assert_eq!(character.vigor, spent);
    assert_eq!(character.vigor + character.unallocated_stat_points, 9);
    assert_eq!(
        character.max_hp,
        10 + 9 * config.level_up_max_hp + spent * config.hp_per_vigor
    );
}
