use structopt::StructOpt;

use super::config::ServerConfig;

#[derive(Debug, StructOpt)]
#[structopt(name = "werewolf-server", about = "Hosts one werewolf game session.")]
pub struct Opt {
    /// address to listen on for player connections
    #[structopt(long)]
    pub host: Option<String>,
    /// port for player connections
    #[structopt(long)]
    pub port: Option<u16>,
    /// port for the status API, 0 to disable
    #[structopt(long)]
    pub http_port: Option<u16>,
    /// number of human players to wait for
    #[structopt(long)]
    pub humans: Option<usize>,
    /// number of computer-controlled players
    #[structopt(long)]
    pub bots: Option<usize>,
    /// comma-separated role deck, e.g. wolf,wolf,seer,witch,villager
    #[structopt(long)]
    pub roles: Option<String>,
    /// let dead hunters take someone with them
    #[structopt(long)]
    pub hunter: bool,
    /// seed for role allocation and automated decisions
    #[structopt(long)]
    pub seed: Option<u64>,
}

impl Opt {
    pub fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(http_port) = self.http_port {
            config.http_port = http_port;
        }
        if let Some(humans) = self.humans {
            config.human_players = humans;
        }
        if let Some(bots) = self.bots {
            config.ai_players = bots;
        }
        if let Some(roles) = self.roles {
            config.roles = Some(roles.split(',').map(|r| r.trim().to_string()).collect());
        }
        if self.hunter {
            config.hunter_enabled = true;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config
    }
}
