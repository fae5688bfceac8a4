use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "vn-player")]
#[command(about = "Visual novel script player")]
pub(crate) struct Cli {
    /// Log engine activity to stderr.
    #[arg(long, global = true)]
    pub(crate) verbose: bool,
    /// JSON file with engine options (camelCase keys).
    #[arg(long = "config", global = true)]
    pub(crate) config: Option<String>,
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    Agent(AgentArgs),
    Tui(TuiArgs),
}

#[derive(Debug, Args)]
pub(crate) struct AgentArgs {
    #[command(subcommand)]
    pub(crate) command: AgentCommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum AgentCommand {
    Start(StartArgs),
    Choose(ChooseArgs),
}

#[derive(Debug, Args)]
pub(crate) struct StartArgs {
    #[arg(long = "scripts-dir")]
    pub(crate) scripts_dir: String,
    #[arg(long = "entry-script")]
    pub(crate) entry_script: Option<String>,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct ChooseArgs {
    #[arg(long = "state-in")]
    pub(crate) state_in: String,
    #[arg(long = "choice")]
    pub(crate) choice: usize,
    #[arg(long = "state-out")]
    pub(crate) state_out: String,
}

#[derive(Debug, Args)]
pub(crate) struct TuiArgs {
    #[arg(long = "scripts-dir")]
    pub(crate) scripts_dir: String,
    #[arg(long = "entry-script")]
    pub(crate) entry_script: Option<String>,
    #[arg(long = "state-file")]
    pub(crate) state_file: Option<String>,
}
