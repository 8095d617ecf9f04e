#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GameError {
    #[error("unknown role: {0}")]
    UnknownRole(String),
    #[error("participant name already taken: {0}")]
    DuplicateName(String),
    #[error("participant not found: {0}")]
    UnknownParticipant(String),
    #[error("cannot start a game without participants")]
    EmptyRoster,
    #[error("role deck has {roles} roles for {players} participants")]
    RoleCountMismatch { roles: usize, players: usize },
}
