use clap::{value_parser, Arg, ArgAction, Command};

fn yes_arg() -> Arg {
    Arg::new("yes")
        .long("yes")
        .short('y')
        .help("Skip the confirmation prompt")
        .action(ArgAction::SetTrue)
}

fn project_arg() -> Arg {
    Arg::new("project")
        .long("project")
        .short('p')
        .value_name("PROJECT_ID")
        .help("Project ID (defaults to the configured default project)")
        .value_parser(value_parser!(u64))
}

fn id_arg(value_name: &'static str, help: &'static str) -> Arg {
    Arg::new("id")
        .value_name(value_name)
        .help(help)
        .required(true)
        .index(1)
        .value_parser(value_parser!(u64))
}

fn status_arg() -> Arg {
    Arg::new("status")
        .long("status")
        .value_name("STATUS")
        .help("To Do, In Progress or Done (also: todo, progress, done)")
}

fn priority_arg() -> Arg {
    Arg::new("priority")
        .long("priority")
        .value_name("PRIORITY")
        .help("Low, Medium or High")
}

fn assignee_arg() -> Arg {
    Arg::new("assignee")
        .long("assignee")
        .value_name("USER_ID")
        .help("Assignee user ID")
        .value_parser(value_parser!(u64))
}

fn auth_command() -> Command {
    Command::new("auth")
        .about("Log in, sign up and manage the CLI configuration")
        .subcommand_required(true)
        .subcommand(
            Command::new("login")
                .about("Log in and store the session")
                .arg(Arg::new("email").long("email").value_name("EMAIL").help("Account email"))
                .arg(
                    Arg::new("password")
                        .long("password")
                        .value_name("PASSWORD")
                        .help("Account password (prompted when omitted)"),
                ),
        )
        .subcommand(
            Command::new("signup")
                .about("Create an account and log in")
                .arg(Arg::new("username").long("username").value_name("USERNAME").help("Username"))
                .arg(Arg::new("email").long("email").value_name("EMAIL").help("Account email"))
                .arg(
                    Arg::new("password")
                        .long("password")
                        .value_name("PASSWORD")
                        .help("Password, at least 6 characters (prompted when omitted)"),
                ),
        )
        .subcommand(Command::new("logout").about("Forget the stored session"))
        .subcommand(Command::new("whoami").about("Show the logged-in user"))
        .subcommand(
            Command::new("config")
                .about("Show or change CLI settings")
                .arg(
                    Arg::new("api-url")
                        .long("api-url")
                        .value_name("URL")
                        .help("Base URL of the tracker API"),
                )
                .arg(
                    Arg::new("default-project")
                        .long("default-project")
                        .value_name("PROJECT_ID")
                        .help("Project used when --project is omitted")
                        .value_parser(value_parser!(u64)),
                ),
        )
}

fn projects_command() -> Command {
    Command::new("projects")
        .about("Manage projects")
        .subcommand(
            Command::new("list").about("List your projects").arg(
                Arg::new("json")
                    .long("json")
                    .help("Output as JSON")
                    .action(ArgAction::SetTrue),
            ),
        )
        .subcommand(
            Command::new("show")
                .about("Show a project")
                .arg(id_arg("PROJECT_ID", "Project ID")),
        )
        .subcommand(
            Command::new("create")
                .about("Create a project")
                .arg(
                    Arg::new("name")
                        .long("name")
                        .short('n')
                        .value_name("NAME")
                        .help("Project name (at least 3 characters)")
                        .required(true),
                )
                .arg(
                    Arg::new("description")
                        .long("description")
                        .short('d')
                        .value_name("TEXT")
                        .help("Project description"),
                ),
        )
        .subcommand(
            Command::new("update")
                .about("Update a project")
                .arg(id_arg("PROJECT_ID", "Project ID"))
                .arg(Arg::new("name").long("name").short('n').value_name("NAME").help("New name"))
                .arg(
                    Arg::new("description")
                        .long("description")
                        .short('d')
                        .value_name("TEXT")
                        .help("New description"),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a project")
                .arg(id_arg("PROJECT_ID", "Project ID"))
                .arg(yes_arg()),
        )
}

fn issues_command() -> Command {
    Command::new("issues")
        .about("Manage issues")
        .subcommand_required(true)
        .subcommand(
            Command::new("list")
                .about("List a project's issues")
                .arg(project_arg())
                .arg(status_arg().help("Only show issues with this status"))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .value_name("FORMAT")
                        .help("Output format")
                        .value_parser(["simple", "table", "json", "board"])
                        .default_value("simple"),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Show an issue")
                .arg(id_arg("ISSUE_ID", "Issue ID")),
        )
        .subcommand(
            Command::new("create")
                .about("Create an issue")
                .arg(project_arg())
                .arg(
                    Arg::new("title")
                        .long("title")
                        .short('t')
                        .value_name("TITLE")
                        .help("Issue title (at least 3 characters)")
                        .required(true),
                )
                .arg(
                    Arg::new("description")
                        .long("description")
                        .short('d')
                        .value_name("TEXT")
                        .help("Issue description"),
                )
                .arg(status_arg())
                .arg(priority_arg())
                .arg(assignee_arg()),
        )
        .subcommand(
            Command::new("update")
                .about("Update an issue")
                .arg(id_arg("ISSUE_ID", "Issue ID"))
                .arg(Arg::new("title").long("title").short('t').value_name("TITLE").help("New title"))
                .arg(
                    Arg::new("description")
                        .long("description")
                        .short('d')
                        .value_name("TEXT")
                        .help("New description"),
                )
                .arg(status_arg())
                .arg(priority_arg())
                .arg(assignee_arg()),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete an issue")
                .arg(id_arg("ISSUE_ID", "Issue ID"))
                .arg(yes_arg()),
        )
        .subcommand(
            Command::new("move")
                .about("Move an issue to another status lane")
                .arg(id_arg("ISSUE_ID", "Issue ID"))
                .arg(
                    Arg::new("status")
                        .value_name("STATUS")
                        .help("Target status: To Do, In Progress or Done")
                        .required(true)
                        .index(2),
                ),
        )
}

fn board_command() -> Command {
    Command::new("board")
        .about("Open the interactive kanban board for a project")
        .arg(
            Arg::new("project")
                .value_name("PROJECT_ID")
                .help("Project ID (defaults to the configured default project)")
                .index(1)
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("print")
                .long("print")
                .help("Print the board once instead of opening the interactive view")
                .action(ArgAction::SetTrue),
        )
}

pub fn build_cli() -> Command {
    Command::new("kanban")
        .about("Kanban CLI - manage projects and move issues across the board")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(auth_command())
        .subcommand(projects_command())
        .subcommand(issues_command())
        .subcommand(board_command())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_parse_issue_move() {
        let matches = build_cli()
            .try_get_matches_from(["kanban", "issues", "move", "12", "in progress"])
            .unwrap();
        let (_, issues) = matches.subcommand().unwrap();
        let (name, sub) = issues.subcommand().unwrap();

        assert_eq!(name, "move");
        assert_eq!(sub.get_one::<u64>("id"), Some(&12));
        assert_eq!(sub.get_one::<String>("status").map(String::as_str), Some("in progress"));
    }

    #[test]
    fn test_parse_board_with_project() {
        let matches = build_cli()
            .try_get_matches_from(["kanban", "board", "3", "--print"])
            .unwrap();
        let (_, board) = matches.subcommand().unwrap();

        assert_eq!(board.get_one::<u64>("project"), Some(&3));
        assert!(board.get_flag("print"));
    }

    #[test]
    fn test_rejects_non_numeric_issue_id() {
        let result = build_cli().try_get_matches_from(["kanban", "issues", "show", "ABC-1"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_format_defaults_to_simple() {
        let matches = build_cli()
            .try_get_matches_from(["kanban", "issues", "list", "--project", "2"])
            .unwrap();
        let (_, issues) = matches.subcommand().unwrap();
        let (_, list) = issues.subcommand().unwrap();

        assert_eq!(list.get_one::<String>("format").map(String::as_str), Some("simple"));
        assert_eq!(list.get_one::<u64>("project"), Some(&2));
    }
}
