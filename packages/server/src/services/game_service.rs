use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::models::{
    config::ServerConfig,
    error::GameError,
    game::GameState,
    player::Participant,
    role::RoleCapability,
};

const BOT_NAMES: &[&str] = &["Stephanie", "Wendy", "Elmy", "Sham", "Jeffry", "Kelly"];

/// Two wolves from five seats up, one below, then a seer, a witch and villagers.
/// Tables smaller than the special roles lose the surplus after shuffling.
pub fn default_deck(players: usize) -> Vec<RoleCapability> {
    let wolves = if players >= 5 { 2 } else { 1 };
    let mut deck = vec![RoleCapability::Wolf; wolves];
    deck.push(RoleCapability::Seer);
    deck.push(RoleCapability::witch());
    while deck.len() < players {
        deck.push(RoleCapability::Villager);
    }
    deck
}

pub fn deck_from_names(names: &[String]) -> Result<Vec<RoleCapability>, GameError> {
    names.iter().map(|n| RoleCapability::from_name(n)).collect()
}

pub fn bot_names(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match BOT_NAMES.get(i) {
            Some(name) => name.to_string(),
            None => format!("Bot-{}", i + 1),
        })
        .collect()
}

/// Seats humans first, then bots, and deals one role to each.
pub fn allocate_roles<R: Rng + ?Sized>(
    humans: Vec<String>,
    bots: Vec<String>,
    deck: Option<Vec<RoleCapability>>,
    rng: &mut R,
) -> Result<GameState, GameError> {
    let players = humans.len() + bots.len();
    if players == 0 {
        return Err(GameError::EmptyRoster);
    }

    let mut deck = match deck {
        Some(deck) if deck.len() != players => {
            return Err(GameError::RoleCountMismatch {
                roles: deck.len(),
                players,
            })
        }
        Some(deck) => deck,
        None => default_deck(players),
    };
    deck.shuffle(rng);

    let seats = humans
        .into_iter()
        .map(|name| (name, false))
        .chain(bots.into_iter().map(|name| (name, true)));

    let mut game = GameState::new();
    for ((name, automated), role) in seats.zip(deck) {
        game.add_participant(Participant::new(name, role, automated))?;
    }

    info!(
        "dealt roles for session {}: {} wolves among {} players",
        game.session_id,
        game.participants.iter().filter(|p| p.is_wolf()).count(),
        players
    );
    Ok(game)
}

/// Builds the session for the connected humans using the configured deck and bot count.
pub fn start_game<R: Rng + ?Sized>(
    config: &ServerConfig,
    humans: Vec<String>,
    rng: &mut R,
) -> Result<GameState, GameError> {
    let deck = config
        .roles
        .as_deref()
        .map(deck_from_names)
        .transpose()?;
    allocate_roles(humans, bot_names(config.ai_players), deck, rng)
}
