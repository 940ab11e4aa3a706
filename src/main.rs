use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use noscrubs::{cli, config, error, logging, style, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Directory the TSV files are written to
    #[clap(long)]
    output_dir: Option<PathBuf>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    style::enable_terminal_colors();

    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }
    logging::init_logging();

    let args = Cli::parse();

    if let Some(Command::Completions(opt)) = args.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let settings = match config::Settings::from_env(args.output_dir) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Cannot load configuration. Err: {}", e);
            return;
        }
    };

    if let Err(e) = cli::run(&settings).await {
        tracing::debug!(error = ?e, "session aborted");
        error!(
            "An unexpected error has occurred. {}\nPlease contact {} and include the following error message:\n{}",
            e.user_message(&settings.contact),
            settings.contact,
            e
        );
    }
}
