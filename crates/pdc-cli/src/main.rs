mod config;
mod edit;
mod export_cmd;
mod generate_cmd;
mod plan_cmds;
mod store;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use pdc_core::catalog::Level;
use pdc_core::config::GeminiConfig;

use edit::{BlockField, PlanField, StudentField};

#[derive(Parser)]
#[command(
    name = "pdc",
    about = "Curricular development plan (PDC) editor with AI-assisted fill-in"
)]
struct Cli {
    /// Generation API key (overrides GEMINI_API_KEY and the config file)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a pdc config file (pass the generation key with --api-key)
    Init {
        /// Model name
        #[arg(long, default_value = GeminiConfig::DEFAULT_MODEL)]
        model: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// List education levels, school years and their knowledge areas
    Levels,
    /// Create a new plan file
    New {
        /// Path of the plan file to create
        file: PathBuf,
        /// Education level (Inicial, Primaria, Secundaria)
        #[arg(long)]
        level: Option<Level>,
        /// Overwrite an existing plan file
        #[arg(long)]
        force: bool,
    },
    /// Print a plan
    Show {
        /// Plan file
        file: PathBuf,
    },
    /// Set a plan-level field (an empty value clears optional fields)
    Set {
        /// Plan file
        file: PathBuf,
        #[arg(value_enum)]
        field: PlanField,
        /// New value; several words are joined with spaces
        value: Vec<String>,
    },
    /// Edit or remove a knowledge-area block
    Block {
        /// Plan file
        file: PathBuf,
        /// Area name of the block (case-insensitive)
        area: String,
        #[command(subcommand)]
        action: BlockAction,
    },
    /// Manage significant-adaptation rows
    Student {
        #[command(subcommand)]
        command: StudentCommands,
    },
    /// Fill blocks and student rows with generated content
    Generate {
        /// Plan file
        file: PathBuf,
        /// Only this knowledge area (repeatable)
        #[arg(long = "area")]
        areas: Vec<String>,
        /// Only this student row, numbered from 1 (repeatable)
        #[arg(long = "student")]
        students: Vec<usize>,
    },
    /// Export a plan as a Word document
    Export {
        /// Plan file
        file: PathBuf,
        /// Output path (defaults to Plan_Desarrollo_Curricular.docx next to the plan)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum BlockAction {
    /// Set one field of the block
    Set {
        #[arg(value_enum)]
        field: BlockField,
        /// New value; several words are joined with spaces
        value: Vec<String>,
    },
    /// Remove the block
    Remove,
}

#[derive(Subcommand)]
pub enum StudentCommands {
    /// Append a row labelled "Estudiante N"
    Add {
        /// Plan file
        file: PathBuf,
    },
    /// Remove a row
    Remove {
        /// Plan file
        file: PathBuf,
        /// Row number, from 1
        index: usize,
    },
    /// Set one field of a row
    Set {
        /// Plan file
        file: PathBuf,
        /// Row number, from 1
        index: usize,
        #[arg(value_enum)]
        field: StudentField,
        /// New value; several words are joined with spaces
        value: Vec<String>,
    },
}

/// Execute the `pdc init` command: write config file.
fn cmd_init(api_key: Option<String>, model: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        gemini: config::GeminiSection {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: Some(model.to_owned()),
            base_url: None,
        },
    };
    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  gemini.model = {model}");
    if cfg.gemini.api_key.is_some() {
        println!("  gemini.api_key = (set)");
    } else {
        println!("  gemini.api_key = (unset; export GEMINI_API_KEY before generating)");
    }
    println!();
    println!("Next: run `pdc new plan.toml --level Primaria` to start a plan.");

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { model, force } => {
            cmd_init(cli.api_key, &model, force)?;
        }
        Commands::Levels => plan_cmds::run_levels(),
        Commands::New { file, level, force } => {
            plan_cmds::run_new(&file, level, force)?;
        }
        Commands::Show { file } => {
            plan_cmds::run_show(&file)?;
        }
        Commands::Set { file, field, value } => {
            plan_cmds::run_set(&file, field, &value)?;
        }
        Commands::Block { file, area, action } => match action {
            BlockAction::Set { field, value } => {
                plan_cmds::run_block(&file, &area, Some(field), &value)?;
            }
            BlockAction::Remove => {
                plan_cmds::run_block(&file, &area, None, &[])?;
            }
        },
        Commands::Student { command } => {
            plan_cmds::run_student_command(command)?;
        }
        Commands::Generate {
            file,
            areas,
            students,
        } => {
            let selection = generate_cmd::Selection { areas, students };
            generate_cmd::run_generate(&file, selection, cli.api_key.as_deref()).await?;
        }
        Commands::Export { file, output } => {
            export_cmd::run_export(&file, output).await?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pdc", &mut std::io::stdout());
        }
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn block_and_student_arguments_parse() {
        let cli = Cli::try_parse_from([
            "pdc", "block", "plan.toml", "Matemática", "set", "week1", "Números", "naturales",
        ])
        .unwrap();
        match cli.command {
            Commands::Block {
                area,
                action: BlockAction::Set { field, value },
                ..
            } => {
                assert_eq!(area, "Matemática");
                assert_eq!(field, BlockField::Week1);
                assert_eq!(value, vec!["Números", "naturales"]);
            }
            _ => panic!("expected block set"),
        }

        let cli = Cli::try_parse_from([
            "pdc", "generate", "plan.toml", "--area", "Matemática", "--student", "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate { areas, students, .. } => {
                assert_eq!(areas, vec!["Matemática"]);
                assert_eq!(students, vec![2]);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn level_flag_uses_catalog_parser() {
        let cli = Cli::try_parse_from(["pdc", "new", "plan.toml", "--level", "secundaria"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::New {
                level: Some(Level::Secundaria),
                ..
            }
        ));
        assert!(Cli::try_parse_from(["pdc", "new", "plan.toml", "--level", "terciaria"]).is_err());
    }
}
