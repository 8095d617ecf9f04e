use rand::rngs::StdRng;
use rand::SeedableRng;

use werewolf_server::{
    models::{config::ServerConfig, error::GameError, game::GamePhase, role::RoleCapability},
    services::game_service,
    utils::test_setup::setup_test_env,
};

fn humans(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("Player{}", i)).collect()
}

#[test]
fn test_start_game_deals_default_deck() {
    setup_test_env();
    let config = ServerConfig {
        human_players: 3,
        ai_players: 5,
        ..ServerConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(9);
    let game = game_service::start_game(&config, humans(3), &mut rng).unwrap();

    assert_eq!(game.participants.len(), 8);
    assert_eq!(game.phase, GamePhase::Waiting);
    assert_eq!(game.day_count, 1);
    assert!(game.sheriff.is_none());
    assert_eq!(game.participants.iter().filter(|p| p.is_wolf()).count(), 2);
    assert!(game.participants[..3].iter().all(|p| !p.is_automated));
    assert!(game.participants[3..].iter().all(|p| p.is_automated));
    assert!(game.participants.iter().all(|p| p.alive && !p.is_sheriff));
}

#[test]
fn test_start_game_uses_configured_roles() {
    setup_test_env();
    let config = ServerConfig {
        human_players: 2,
        ai_players: 2,
        roles: Some(vec![
            "Werewolf".into(),
            "hunter".into(),
            "villager".into(),
            "villager".into(),
        ]),
        ..ServerConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(2);
    let game = game_service::start_game(&config, humans(2), &mut rng).unwrap();

    let roles: Vec<&RoleCapability> = game.participants.iter().map(|p| &p.role).collect();
    assert_eq!(roles.iter().filter(|r| r.is_wolf()).count(), 1);
    assert_eq!(
        roles.iter().filter(|r| ***r == RoleCapability::Hunter).count(),
        1
    );
}

#[test]
fn test_start_game_rejects_bad_decks() {
    setup_test_env();
    let mut rng = StdRng::seed_from_u64(0);
    let short = ServerConfig {
        human_players: 2,
        ai_players: 1,
        roles: Some(vec!["wolf".into(), "seer".into()]),
        ..ServerConfig::default()
    };
    assert_eq!(
        game_service::start_game(&short, humans(2), &mut rng).unwrap_err(),
        GameError::RoleCountMismatch {
            roles: 2,
            players: 3
        }
    );

    let unknown = ServerConfig {
        human_players: 1,
        ai_players: 0,
        roles: Some(vec!["bodyguard".into()]),
        ..ServerConfig::default()
    };
    assert_eq!(
        game_service::start_game(&unknown, humans(1), &mut rng).unwrap_err(),
        GameError::UnknownRole("bodyguard".into())
    );
}

#[test]
fn test_same_seed_same_deal() {
    setup_test_env();
    let config = ServerConfig {
        human_players: 0,
        ai_players: 8,
        ..ServerConfig::default()
    };
    let deal = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        game_service::start_game(&config, vec![], &mut rng)
            .unwrap()
            .participants
            .into_iter()
            .map(|p| (p.name, p.role))
            .collect::<Vec<_>>()
    };
    assert_eq!(deal(5), deal(5));
}
