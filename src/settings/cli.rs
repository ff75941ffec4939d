use super::Parser;
use clap::Subcommand;

/// Command-line client for the donor platform API.
#[derive(Parser, Debug)]
#[command(name = "donorlink", version)]
pub struct Cli {
    /// Settings file (defaults to settings/dev.toml or settings/release.toml).
    #[arg(long)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// GET a path under /v1, e.g. `/cases`.
    Get { path: String },
    /// DELETE a path under /v1.
    Delete { path: String },
    /// POST a JSON body.
    Post {
        path: String,
        #[arg(long)]
        body: Option<String>,
    },
    /// PUT a JSON body.
    Put {
        path: String,
        #[arg(long)]
        body: Option<String>,
    },
    /// PATCH a JSON body.
    Patch {
        path: String,
        #[arg(long)]
        body: Option<String>,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "DONORLINK_PASSWORD")]
        password: String,
    },
    Logout,
    /// Force a session refresh.
    Refresh,
    /// Show the stored user and the auth mode the next request will use.
    Whoami,
}
