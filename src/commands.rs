use std::path::PathBuf;

use devhub_server_app::{
    Application,
    domain::event::EventDraft,
    workflow::events::{
        EventView,
        create::{CreateEventError, CreateEventUseCase},
        get::{GetEventError, GetEventUseCase},
        list::{ListEventsError, ListEventsUseCase},
        update::{UpdateEventError, UpdateEventUseCase},
    },
};
use thiserror::Error;

pub const USAGE: &str = "Usage: devhub-server <command>

Commands:
  import <file.json>            create every event in a JSON array of drafts
  list                          list events by date and time
  show <slug>                   print one event as JSON
  edit <slug> <field> <value>   change one field of an event";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Import(PathBuf),
    List,
    Show(String),
    Edit {
        slug: String,
        field: String,
        value: String,
    },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{}", USAGE)]
    Usage,
    #[error("cannot read {0}: {1}")]
    Read(PathBuf, std::io::Error),
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("{failed} of {total} events could not be imported")]
    PartialImport { failed: usize, total: usize },
    #[error(transparent)]
    Create(#[from] CreateEventError),
    #[error(transparent)]
    Update(#[from] UpdateEventError),
    #[error(transparent)]
    Get(#[from] GetEventError),
    #[error(transparent)]
    List(#[from] ListEventsError),
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self, CommandError> {
        let args = args.iter().map(String::as_str).collect::<Vec<_>>();
        match args.as_slice() {
            ["import", path] => Ok(Command::Import(PathBuf::from(path))),
            ["list"] => Ok(Command::List),
            ["show", slug] => Ok(Command::Show(slug.to_string())),
            ["edit", slug, field, value] => Ok(Command::Edit {
                slug: slug.to_string(),
                field: field.to_string(),
                value: value.to_string(),
            }),
            _ => Err(CommandError::Usage),
        }
    }
}

/// Sets one draft field from its command line form. List fields take
/// comma-separated items.
fn set_field(draft: &mut EventDraft, field: &str, value: &str) -> Result<(), CommandError> {
    let slot = match field {
        "title" => &mut draft.title,
        "description" => &mut draft.description,
        "overview" => &mut draft.overview,
        "image" => &mut draft.image,
        "venue" => &mut draft.venue,
        "location" => &mut draft.location,
        "date" => &mut draft.date,
        "time" => &mut draft.time,
        "mode" => &mut draft.mode,
        "audience" => &mut draft.audience,
        "organizer" => &mut draft.organizer,
        "agenda" | "tags" => {
            let items = value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect();
            if field == "agenda" {
                draft.agenda = items;
            } else {
                draft.tags = items;
            }
            return Ok(());
        }
        other => return Err(CommandError::UnknownField(other.to_string())),
    };
    *slot = value.to_string();
    Ok(())
}

fn summary(view: &EventView) -> String {
    format!(
        "{} {}  {:<8} {}  ({})",
        view.date,
        view.time,
        view.mode.as_str(),
        view.title,
        view.slug
    )
}

pub async fn run(app: &Application, command: Command) -> Result<(), CommandError> {
    match command {
        Command::Import(path) => {
            let raw = std::fs::read_to_string(&path).map_err(|e| CommandError::Read(path, e))?;
            let drafts: Vec<EventDraft> = serde_json::from_str(&raw)?;
            let total = drafts.len();
            let mut failed = 0;
            for (index, draft) in drafts.into_iter().enumerate() {
                match app.event_create_use_case.create_event(draft).await {
                    Ok(view) => println!("created {}", view.slug),
                    Err(e) => {
                        log::error!("Event #{} rejected: {}", index + 1, e);
                        failed += 1;
                    }
                }
            }
            log::info!("Imported {} of {} events", total - failed, total);
            if failed > 0 {
                return Err(CommandError::PartialImport { failed, total });
            }
            Ok(())
        }
        Command::List => {
            for view in app.event_list_use_case.list_events().await? {
                println!("{}", summary(&view));
            }
            Ok(())
        }
        Command::Show(slug) => {
            let view = app.event_get_use_case.get_event(&slug).await?;
            println!("{}", serde_json::to_string_pretty(&view)?);
            Ok(())
        }
        Command::Edit { slug, field, value } => {
            let current = app.event_get_use_case.get_event(&slug).await?;
            let mut draft = EventDraft::from(&current);
            set_field(&mut draft, &field, &value)?;
            let updated = app
                .event_update_use_case
                .update_event(current.id, draft)
                .await?;
            println!("{}", summary(&updated));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use devhub_persistence_sqlite::{
        connect_in_memory, create_schema, events::SqliteEventRepository,
    };
    use devhub_server_app::build_application;

    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    async fn application() -> Application {
        let pool = connect_in_memory().await.expect("open in-memory database");
        create_schema(&pool).await.expect("create schema");
        build_application(Arc::new(SqliteEventRepository::new(pool)))
    }

    fn import_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.json", name, std::process::id()));
        std::fs::write(&path, contents).expect("write import file");
        path
    }

    const DRAFTS: &str = r#"[
        {
            "title": "Rust Berlin!",
            "description": "Talks, pizza and pairing.",
            "overview": "Monthly meetup.",
            "image": "/images/event2.png",
            "venue": "Community Hall",
            "location": "Berlin, Germany",
            "date": "2025-11-07",
            "time": "6:30 PM",
            "mode": "offline",
            "audience": "Rustaceans",
            "agenda": ["Talks", "Pairing"],
            "organizer": "Rust Berlin",
            "tags": ["rust"]
        },
        {
            "title": "Broken",
            "mode": "virtual"
        }
    ]"#;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse(&args("list")).ok(), Some(Command::List));
        assert_eq!(
            Command::parse(&args("show rust-berlin")).ok(),
            Some(Command::Show("rust-berlin".to_string()))
        );
        assert_eq!(
            Command::parse(&args("edit rust-berlin time 19:00")).ok(),
            Some(Command::Edit {
                slug: "rust-berlin".to_string(),
                field: "time".to_string(),
                value: "19:00".to_string(),
            })
        );
        assert!(matches!(
            Command::parse(&args("show")),
            Err(CommandError::Usage)
        ));
        assert!(matches!(Command::parse(&[]), Err(CommandError::Usage)));
    }

    #[test]
    fn test_set_field() {
        let mut draft = EventDraft::default();
        set_field(&mut draft, "venue", "Community Hall").expect("known field");
        set_field(&mut draft, "tags", "rust, meetup,,").expect("known field");
        assert_eq!(draft.venue, "Community Hall");
        assert_eq!(draft.tags, vec!["rust", "meetup"]);
        assert!(matches!(
            set_field(&mut draft, "slug", "custom"),
            Err(CommandError::UnknownField(ref f)) if f == "slug"
        ));
    }

    #[tokio::test]
    async fn test_import_keeps_valid_events() {
        let app = application().await;
        let path = import_file("devhub-import", DRAFTS);

        let result = run(&app, Command::Import(path.clone())).await;
        std::fs::remove_file(&path).ok();
        assert!(matches!(
            result,
            Err(CommandError::PartialImport { failed: 1, total: 2 })
        ));

        let listed = app.event_list_use_case.list_events().await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].slug, "rust-berlin");
        assert_eq!(listed[0].time, "18:30");
    }

    #[tokio::test]
    async fn test_edit_renormalizes_field() {
        let app = application().await;
        let path = import_file("devhub-edit", DRAFTS);
        run(&app, Command::Import(path.clone())).await.ok();
        std::fs::remove_file(&path).ok();

        run(
            &app,
            Command::Edit {
                slug: "rust-berlin".to_string(),
                field: "title".to_string(),
                value: "Rust Berlin Winter Edition".to_string(),
            },
        )
        .await
        .expect("edit title");

        let renamed = app
            .event_get_use_case
            .get_event("rust-berlin-winter-edition")
            .await
            .expect("renamed event");
        assert_eq!(renamed.time, "18:30");

        let err = run(
            &app,
            Command::Edit {
                slug: "rust-berlin-winter-edition".to_string(),
                field: "date".to_string(),
                value: "sometime soon".to_string(),
            },
        )
        .await
        .expect_err("bad date");
        assert!(matches!(err, CommandError::Update(UpdateEventError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_show_unknown_event() {
        let app = application().await;
        let err = run(&app, Command::Show("nothing-here".to_string()))
            .await
            .expect_err("missing event");
        assert!(matches!(err, CommandError::Get(GetEventError::NotFound)));
    }
}
