use st_cli::{
    ai::AiCommands, context::ContextCommands, output::Output, task::TaskCommands, Cli, Commands,
    Parser,
};
use st_client_api::ClientApi;
use st_rest_api_contract::{PriorityFilter, SourceType, TaskFilter, TaskStatus};
use st_rest_client_mock::MockClient;

#[test]
fn test_cli_parsing_task_list_filters() {
    let args = vec![
        "st",
        "task",
        "list",
        "--status",
        "in_progress",
        "--priority",
        "high",
        "--ai-suggested",
        "true",
        "--search",
        "report",
    ];

    let cli = Cli::try_parse_from(args).unwrap();
    match cli.command {
        Commands::Task {
            subcommand: TaskCommands::List(list),
        } => {
            assert_eq!(
                list.filter(),
                TaskFilter {
                    status: Some(TaskStatus::InProgress),
                    category: None,
                    priority: Some(PriorityFilter::High),
                    ai_suggested: Some(true),
                    search: Some("report".into()),
                }
            );
        }
        _ => panic!("expected task list"),
    }
}

#[test]
fn test_cli_parsing_task_create() {
    let args = vec![
        "st",
        "task",
        "create",
        "Buy groceries",
        "--category",
        "Personal",
        "--priority",
        "5",
        "--deadline",
        "2025-01-10",
    ];

    let cli = Cli::try_parse_from(args).unwrap();
    match cli.command {
        Commands::Task {
            subcommand: TaskCommands::Create(create),
        } => {
            let request = create.request();
            assert_eq!(request.title, "Buy groceries");
            assert_eq!(request.category_name.as_deref(), Some("Personal"));
            assert_eq!(request.priority_score, Some(5));
            assert!(request.deadline.is_some());
            assert!(request.description.is_none());
        }
        _ => panic!("expected task create"),
    }
}

#[test]
fn test_cli_rejects_out_of_range_priority() {
    let args = vec!["st", "task", "create", "Too urgent", "--priority", "11"];
    assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn test_cli_rejects_unknown_status() {
    let args = vec!["st", "task", "list", "--status", "done"];
    assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn test_cli_parsing_context_add() {
    let args = vec![
        "st",
        "context",
        "add",
        "Meeting with team tomorrow at 2 PM",
        "--source",
        "whatsapp",
    ];

    let cli = Cli::try_parse_from(args).unwrap();
    match cli.command {
        Commands::Context {
            subcommand: ContextCommands::Add(add),
        } => {
            let request = add.request().unwrap();
            assert_eq!(request.source_type, SourceType::Whatsapp);
            assert_eq!(request.content, "Meeting with team tomorrow at 2 PM");
        }
        _ => panic!("expected context add"),
    }
}

#[test]
fn test_cli_parsing_ai_prioritize_requires_ids() {
    assert!(Cli::try_parse_from(vec!["st", "ai", "prioritize"]).is_err());

    let cli = Cli::try_parse_from(vec!["st", "ai", "prioritize", "3", "1", "2"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Ai {
            subcommand: AiCommands::Prioritize { ref task_ids }
        } if task_ids == &vec![3, 1, 2]
    ));
}

#[test]
fn test_cli_global_flags_after_subcommand() {
    let args = vec![
        "st",
        "categories",
        "--base-url",
        "http://example.com/api",
        "--token",
        "abc",
        "--json",
    ];

    let cli = Cli::try_parse_from(args).unwrap();
    assert!(matches!(cli.command, Commands::Categories));
    assert_eq!(cli.backend.base_url, "http://example.com/api");
    assert_eq!(cli.backend.token.as_deref(), Some("abc"));
    assert!(cli.json);
}

#[test]
fn test_cli_invalid_command() {
    let args = vec!["st", "invalid-command"];
    assert!(Cli::try_parse_from(args).is_err());
}

#[tokio::test]
async fn test_commands_run_against_mock_backend() {
    let api = MockClient::with_demo_data();
    let out = Output::new(true);

    let create = Cli::try_parse_from(vec!["st", "task", "create", "Write tests", "-p", "7"])
        .unwrap();
    create.command.run(&api, &out).await.unwrap();

    let tasks = api.list_tasks(&TaskFilter::default()).await.unwrap();
    let created = tasks
        .results
        .iter()
        .find(|task| task.title == "Write tests")
        .expect("created task is listed");
    assert_eq!(created.priority_score, 7);

    let id = created.id.to_string();
    let update = Cli::try_parse_from(vec![
        "st",
        "task",
        "update",
        id.as_str(),
        "--status",
        "in_progress",
    ])
    .unwrap();
    update.command.run(&api, &out).await.unwrap();
    let updated = api.get_task(created.id).await.unwrap();
    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(updated.title, "Write tests");

    let delete = Cli::try_parse_from(vec!["st", "task", "delete", id.as_str()]).unwrap();
    delete.command.run(&api, &out).await.unwrap();
    assert!(api.get_task(created.id).await.is_err());
}

#[tokio::test]
async fn test_missing_task_surfaces_as_error() {
    let api = MockClient::with_demo_data();
    let out = Output::new(false);

    let toggle = Cli::try_parse_from(vec!["st", "task", "toggle", "999"]).unwrap();
    assert!(toggle.command.run(&api, &out).await.is_err());
}

#[test]
fn test_context_add_reads_content_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, b"Dentist appointment on Friday").unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let cli = Cli::try_parse_from(vec!["st", "context", "add", "--file", path.as_str()]).unwrap();
    match cli.command {
        Commands::Context {
            subcommand: ContextCommands::Add(add),
        } => {
            let request = add.request().unwrap();
            assert_eq!(request.content, "Dentist appointment on Friday");
            assert_eq!(request.source_type, SourceType::Notes);
        }
        _ => panic!("expected context add"),
    }
}
