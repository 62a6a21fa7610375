use anyhow::{anyhow, bail, Context, Result};
use tracing::level_filters::LevelFilter;

use shooter_recipes::client::{HttpBackend, ShooterController, DEFAULT_API_URL};
use shooter_recipes::logging::init_logging;
use shooter_recipes::presentation::{
    render_ingredients, render_list, render_shooter, ShooterForm, SortOrder,
};

const ENV_API: &str = "SHOOTERS_API";

#[derive(Debug, Default, PartialEq, Eq)]
struct ShooterArgs {
    nom: Option<String>,
    nombre: Option<String>,
    /// `(name, dosage)` pairs; giving any replaces all lines
    ingredients: Vec<(String, String)>,
    /// "-" clears
    note: Option<String>,
    /// "-" clears
    couleur: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    List { sort: SortOrder },
    Add(ShooterArgs),
    Edit { id: String, args: ShooterArgs },
    Delete { id: String },
    Ingredients,
    IngredientAdd { name: String },
    IngredientRemove { name: String },
}

#[derive(Debug, PartialEq, Eq)]
struct CliConfig {
    api: String,
    /// `None` asks for the usage text
    command: Option<Command>,
}

fn print_help() {
    eprintln!("Shooter recipes client");
    eprintln!();
    eprintln!("Usage: shooters [--api <URL>] <COMMAND>");
    eprintln!("  --api <URL>   Server base URL (default {DEFAULT_API_URL}, env {ENV_API})");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  list [--sort date-desc|date-asc|note-desc|note-asc]");
    eprintln!("  add --nom <NAME> [--nombre <N>] --ingredient <NAME=ML>... [--note <1-10>] [--couleur <COLOUR>]");
    eprintln!("  edit <ID> [--nom ..] [--nombre ..] [--ingredient ..] [--note <1-10|->] [--couleur <COLOUR|->]");
    eprintln!("  delete <ID>");
    eprintln!("  ingredients");
    eprintln!("  ingredient-add <NAME>");
    eprintln!("  ingredient-rm <NAME>");
}

fn parse_args_from<I>(args: I, env_api: Option<String>) -> Result<CliConfig>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter().peekable();
    let mut api = env_api.unwrap_or_else(|| DEFAULT_API_URL.to_string());

    while let Some(arg) = args.peek() {
        match arg.as_str() {
            "--api" => {
                args.next();
                api = args.next().ok_or_else(|| anyhow!("missing value for --api"))?;
            }
            "--help" | "-h" => {
                return Ok(CliConfig { api, command: None })
            }
            _ => break,
        }
    }

    let Some(name) = args.next() else {
        return Ok(CliConfig { api, command: None });
    };
    let mut rest = args;

    let command = match name.as_str() {
        "list" => {
            let mut sort = SortOrder::default();
            while let Some(arg) = rest.next() {
                match arg.as_str() {
                    "--sort" => {
                        let value = rest.next().ok_or_else(|| anyhow!("missing value for --sort"))?;
                        sort = value.parse().map_err(|e: String| anyhow!(e))?;
                    }
                    _ => bail!("unknown argument for list: {arg}"),
                }
            }
            Command::List { sort }
        }
        "add" => Command::Add(parse_shooter_args(rest)?),
        "edit" => {
            let id = positional(&mut rest, &name, "ID")?;
            Command::Edit {
                id,
                args: parse_shooter_args(rest)?,
            }
        }
        "delete" => Command::Delete {
            id: positional(&mut rest, &name, "ID")?,
        },
        "ingredients" => Command::Ingredients,
        "ingredient-add" => Command::IngredientAdd {
            name: positional(&mut rest, &name, "NAME")?.trim().to_string(),
        },
        "ingredient-rm" => Command::IngredientRemove {
            name: positional(&mut rest, &name, "NAME")?,
        },
        "help" => return Ok(CliConfig { api, command: None }),
        other => bail!("unknown command: {other}"),
    };
    Ok(CliConfig {
        api,
        command: Some(command),
    })
}

fn positional<I>(args: &mut I, command: &str, what: &str) -> Result<String>
where
    I: Iterator<Item = String>,
{
    args.next()
        .ok_or_else(|| anyhow!("{command} needs <{what}>"))
}

fn parse_shooter_args<I>(mut args: I) -> Result<ShooterArgs>
where
    I: Iterator<Item = String>,
{
    let mut parsed = ShooterArgs::default();
    while let Some(arg) = args.next() {
        let mut value = || args.next().ok_or_else(|| anyhow!("missing value for {arg}"));
        match arg.as_str() {
            "--nom" => parsed.nom = Some(value()?),
            "--nombre" => parsed.nombre = Some(value()?),
            "--note" => parsed.note = Some(value()?),
            "--couleur" => parsed.couleur = Some(value()?),
            "--ingredient" => {
                let raw = value()?;
                let (name, dosage) = match raw.rsplit_once('=') {
                    Some((name, dosage)) => (name.trim().to_string(), dosage.to_string()),
                    None => (raw.trim().to_string(), String::new()),
                };
                parsed.ingredients.push((name, dosage));
            }
            _ => bail!("unknown argument: {arg}"),
        }
    }
    Ok(parsed)
}

/// Apply command-line values on top of `form`. Ingredients must be in `vocabulary`.
fn fill_form(form: &mut ShooterForm, args: ShooterArgs, vocabulary: &[String]) -> Result<()> {
    if let Some(nom) = args.nom {
        form.nom = nom;
    }
    if let Some(nombre) = args.nombre {
        form.set_nombre(&nombre);
    }
    if !args.ingredients.is_empty() {
        form.lines.clear();
        for (name, dosage) in args.ingredients {
            if !vocabulary.contains(&name) {
                bail!("Ingrédient inconnu: {name} (voir `shooters ingredients`)");
            }
            if form.add_line(&name) {
                form.set_dosage(form.lines.len() - 1, &dosage)?;
            }
        }
    }
    match args.note.as_deref() {
        Some("-") => form.set_note("")?,
        Some(note) => form.set_note(note)?,
        None => {}
    }
    match args.couleur.as_deref() {
        Some("-") => form.select_color(None)?,
        Some(couleur) => form.select_color(Some(couleur))?,
        None => {}
    }
    Ok(())
}

async fn run(api: &str, command: Command) -> Result<()> {
    let backend = HttpBackend::new(api)?;
    let mut controller = ShooterController::new(backend);
    controller
        .init()
        .await
        .with_context(|| format!("Failed to reach {api}"))?;

    match command {
        Command::List { sort } => print!("{}", render_list(controller.shooters(), sort)),
        Command::Add(args) => {
            let mut form = ShooterForm::default();
            fill_form(&mut form, args, controller.ingredients())?;
            let input = form.validate()?;
            let created = controller.submit_shooter(input).await?;
            print!("{}", render_shooter(created));
        }
        Command::Edit { id, args } => {
            let mut form = ShooterForm::load(controller.begin_edit(&id)?);
            fill_form(&mut form, args, controller.ingredients())?;
            let input = form.validate()?;
            let updated = controller.submit_shooter(input).await?;
            print!("{}", render_shooter(updated));
        }
        Command::Delete { id } => {
            controller.remove_shooter(&id).await?;
            println!("Supprimé: {id}");
        }
        Command::Ingredients => print!("{}", render_ingredients(controller.ingredients())),
        Command::IngredientAdd { name } => {
            let added = controller.submit_ingredient(&name).await?;
            println!("Ajouté: {added}");
        }
        Command::IngredientRemove { name } => {
            controller.remove_ingredient(&name).await?;
            println!("Supprimé: {name}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = parse_args_from(std::env::args().skip(1), std::env::var(ENV_API).ok())?;
    let Some(command) = config.command else {
        print_help();
        return Ok(());
    };
    let _log_guard = init_logging(None, LevelFilter::WARN)?;
    run(&config.api, command).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(list: &[&str]) -> Result<CliConfig> {
        parse_args_from(list.iter().map(|s| s.to_string()), None)
    }

    #[test]
    fn api_defaults_and_overrides() {
        assert_eq!(parse(&["ingredients"]).unwrap().api, DEFAULT_API_URL);
        let config = parse_args_from(
            ["--api", "http://box:9000", "ingredients"].map(String::from),
            Some("http://env:1".to_string()),
        )
        .unwrap();
        assert_eq!(config.api, "http://box:9000");
        let config =
            parse_args_from(["ingredients".to_string()], Some("http://env:1".to_string())).unwrap();
        assert_eq!(config.api, "http://env:1");
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            parse(&["list", "--sort", "note-asc"]).unwrap().command,
            Some(Command::List {
                sort: SortOrder::NoteAsc
            })
        );
        assert_eq!(
            parse(&["ingredient-add", "  Vodka "]).unwrap().command,
            Some(Command::IngredientAdd {
                name: "Vodka".into()
            })
        );
        assert!(parse(&["delete"]).is_err());
        assert!(parse(&["frobnicate"]).is_err());
        assert!(parse(&["list", "--sort", "alpha"]).is_err());
    }

    #[test]
    fn help_needs_no_command() {
        assert_eq!(parse(&[]).unwrap().command, None);
        assert_eq!(parse(&["help"]).unwrap().command, None);
        let config = parse(&["--api", "http://box:9000", "-h", "list"]).unwrap();
        assert_eq!(config.command, None);
        assert_eq!(config.api, "http://box:9000");
    }

    #[test]
    fn parses_shooter_flags() {
        let config = parse(&[
            "edit",
            "abc",
            "--nom",
            "B52",
            "--ingredient",
            "Baileys=10",
            "--ingredient",
            "Get27",
            "--note",
            "-",
        ])
        .unwrap();
        let Some(Command::Edit { id, args }) = config.command else {
            panic!("expected edit");
        };
        assert_eq!(id, "abc");
        assert_eq!(args.nom.as_deref(), Some("B52"));
        assert_eq!(
            args.ingredients,
            vec![
                ("Baileys".to_string(), "10".to_string()),
                ("Get27".to_string(), String::new())
            ]
        );
        assert_eq!(args.note.as_deref(), Some("-"));
    }

    #[test]
    fn fill_form_checks_vocabulary() {
        let vocabulary = vec!["Baileys".to_string(), "Get27".to_string()];
        let mut form = ShooterForm::default();
        let args = ShooterArgs {
            nom: Some("B52".into()),
            ingredients: vec![
                ("Baileys".into(), "10".into()),
                ("Baileys".into(), "99".into()),
                ("Get27".into(), "x".into()),
            ],
            couleur: Some("or".into()),
            ..Default::default()
        };
        fill_form(&mut form, args, &vocabulary).unwrap();
        let input = form.validate().unwrap();
        assert_eq!(input.nombre, 1);
        assert_eq!(input.ingredients.len(), 2);
        assert_eq!(input.ingredients[0].dosage, 10);
        assert_eq!(input.ingredients[1].dosage, 0);
        assert_eq!(input.couleur.as_deref(), Some("Or"));

        let args = ShooterArgs {
            ingredients: vec![("Rhum".into(), "10".into())],
            ..Default::default()
        };
        assert!(fill_form(&mut form, args, &vocabulary).is_err());
    }
}
