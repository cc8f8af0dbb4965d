use clap::{CommandFactory, Parser};
use linthook::orchestrator::Orchestrator;
use linthook::script::HookKind;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "linthook",
    about = "Install git hooks that run your build wrapper's lint and format tasks",
    version
)]
struct Cli {
    /// Project directory holding linthook.toml and the build wrapper (default: current directory)
    #[arg(short, long, default_value = ".", global = true)]
    dir: PathBuf,

    /// Log decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Install or update the managed hook block
    Install {
        /// Hook to install (repeatable; defaults to the configured kinds)
        #[arg(long = "hook", value_enum)]
        hooks: Vec<HookKind>,
        /// Show the changes as a diff without writing anything
        #[arg(long)]
        dry_run: bool,
        /// Literal command to place in the block instead of the generated script
        #[arg(long)]
        command: Option<String>,
    },
    /// Remove the managed hook block, keeping any other hook content
    Uninstall {
        /// Hook to uninstall (repeatable; defaults to the configured kinds)
        #[arg(long = "hook", value_enum)]
        hooks: Vec<HookKind>,
    },
    /// Show whether each hook is installed and current
    Status {
        /// Hook to inspect (repeatable; defaults to the configured kinds)
        #[arg(long = "hook", value_enum)]
        hooks: Vec<HookKind>,
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a shell completion script
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    linthook::logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Install {
            hooks,
            dry_run,
            command,
        } => {
            let orch = Orchestrator::new(&cli.dir)?.with_command(command);
            let report = orch.install(&hooks, dry_run)?;
            let root = &orch.layout().work_tree;

            if dry_run {
                if report.previews.is_empty() {
                    println!("Dry run: all hooks up to date.");
                }
                for (path, preview) in &report.previews {
                    println!("Would write {}:", display(path, root));
                    print!("{preview}");
                }
            } else {
                for path in &report.created {
                    println!("  + {}", display(path, root));
                }
                for path in &report.updated {
                    println!("  ~ {}", display(path, root));
                }
                for path in &report.up_to_date {
                    println!("  = {} (up to date)", display(path, root));
                }
            }
        }
        Commands::Uninstall { hooks } => {
            let orch = Orchestrator::new(&cli.dir)?;
            let report = orch.uninstall(&hooks)?;
            let root = &orch.layout().work_tree;

            for path in &report.removed {
                println!("  ~ {} (block removed)", display(path, root));
            }
            for path in &report.deleted {
                println!("  - {}", display(path, root));
            }
            for path in &report.not_installed {
                println!("  . {} (not installed)", display(path, root));
            }
        }
        Commands::Status { hooks, json } => {
            let orch = Orchestrator::new(&cli.dir)?;
            let statuses = orch.status(&hooks)?;

            if json {
                println!("{}", linthook::status::render_json(&statuses)?);
            } else {
                let color = linthook::status::use_color();
                linthook::status::print_status(&statuses, &orch.layout().work_tree, color);
            }

            if linthook::status::needs_attention(&statuses) {
                std::process::exit(1);
            }
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "linthook", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn display(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rest) => rest.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}
