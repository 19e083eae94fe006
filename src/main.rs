use chaffvault::cli::{Cli, Commands};
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => chaffvault::cli::commands::init::execute(&cli),
        Commands::Add {
            ref name,
            ref kind,
            ref fields,
            chaff,
        } => chaffvault::cli::commands::add::execute(&cli, name, kind, fields, chaff),
        Commands::Show { ref id, raw } => chaffvault::cli::commands::show::execute(&cli, id, raw),
        Commands::List => chaffvault::cli::commands::list::execute(&cli),
        Commands::Edit {
            ref id,
            ref name,
            ref kind,
            ref fields,
        } => chaffvault::cli::commands::edit::execute(
            &cli,
            id,
            name.as_deref(),
            kind.as_deref(),
            fields,
        ),
        Commands::Delete { ref id, force } => {
            chaffvault::cli::commands::delete::execute(&cli, id, force)
        }
        Commands::Export { ref output } => {
            chaffvault::cli::commands::export_cmd::execute(&cli, output.as_deref())
        }
        Commands::Import { ref file } => {
            chaffvault::cli::commands::import_cmd::execute(&cli, file)
        }
        Commands::Audit { last, offset } => {
            chaffvault::cli::commands::audit_cmd::execute(&cli, last, offset)
        }
    };

    if let Err(e) = result {
        chaffvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
