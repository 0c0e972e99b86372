use clap::ArgMatches;
use colored::*;
use dialoguer::{Input, Password};

use crate::cli_context::CliContext;
use crate::config::{load_config, save_config};
use crate::error::{ErrorContext, KanbanResult};
use crate::models::{LoginData, SignupData};
use crate::store::{AuthStore, Session};

pub async fn handle_auth(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    handle_auth_impl(matches)
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
}

async fn handle_auth_impl(matches: &ArgMatches) -> KanbanResult<()> {
    match matches.subcommand() {
        Some(("login", sub)) => login(sub).await,
        Some(("signup", sub)) => signup(sub).await,
        Some(("logout", _)) => logout(),
        Some(("whoami", _)) => whoami().await,
        Some(("config", sub)) => configure(sub),
        _ => {
            println!("Usage: kanban auth <login|signup|logout|whoami|config>");
            Ok(())
        }
    }
}

fn arg_or_prompt(matches: &ArgMatches, name: &str, prompt: &str) -> KanbanResult<String> {
    if let Some(value) = matches.get_one::<String>(name) {
        return Ok(value.clone());
    }
    Input::<String>::new()
        .with_prompt(prompt)
        .interact_text()
        .with_context(|| format!("Failed to read {}", name))
}

fn password_or_prompt(matches: &ArgMatches) -> KanbanResult<String> {
    if let Some(value) = matches.get_one::<String>("password") {
        return Ok(value.clone());
    }
    Password::new()
        .with_prompt("Password")
        .interact()
        .context("Failed to read password")
}

async fn login(matches: &ArgMatches) -> KanbanResult<()> {
    let data = LoginData {
        email: arg_or_prompt(matches, "email", "Email")?,
        password: password_or_prompt(matches)?,
    };

    let mut context = CliContext::load()?;
    let client = context.anonymous_client()?;
    let mut store = AuthStore::new(client, context.storage().clone());

    match store.login(data).await {
        Ok(user) => {
            if let Some(token) = store.token() {
                context.set_session(&Session {
                    access_token: token.to_string(),
                    user: user.clone(),
                })?;
            }
            println!("{} Logged in as {} ({})", "✅".green(), user.username.bold(), user.email);
            Ok(())
        }
        Err(e) => {
            if let Some(message) = store.error() {
                println!("{} {}", "❌".red(), message);
            }
            Err(e)
        }
    }
}

async fn signup(matches: &ArgMatches) -> KanbanResult<()> {
    let data = SignupData {
        username: arg_or_prompt(matches, "username", "Username")?,
        email: arg_or_prompt(matches, "email", "Email")?,
        password: password_or_prompt(matches)?,
    };

    let mut context = CliContext::load()?;
    let client = context.anonymous_client()?;
    let mut store = AuthStore::new(client, context.storage().clone());

    match store.signup(data).await {
        Ok(user) => {
            if let Some(token) = store.token() {
                context.set_session(&Session {
                    access_token: token.to_string(),
                    user: user.clone(),
                })?;
            }
            println!("{} Account created. Logged in as {}", "✅".green(), user.username.bold());
            Ok(())
        }
        Err(e) => {
            if let Some(message) = store.error() {
                println!("{} {}", "❌".red(), message);
            }
            Err(e)
        }
    }
}

fn logout() -> KanbanResult<()> {
    let mut context = CliContext::load()?;
    if !context.has_token() {
        println!("{}", "Not logged in.".dimmed());
        return Ok(());
    }
    context.clear_session()?;
    println!("{} Logged out", "✅".green());
    Ok(())
}

async fn whoami() -> KanbanResult<()> {
    let mut context = CliContext::load()?;
    let client = context.authenticated_client()?;
    let mut store = AuthStore::new(client, context.storage().clone());

    if !store.check_auth().await? {
        println!("{} Session is no longer valid. Run 'kanban auth login'.", "❌".red());
        return Ok(());
    }

    if let Some(user) = store.user() {
        println!("{}: {}", "Username".dimmed(), user.username.bold());
        println!("{}: {}", "Email".dimmed(), user.email);
        println!("{}: {}", "User ID".dimmed(), user.id);
    }
    println!("{}: {}", "API".dimmed(), context.api_url().cyan());
    Ok(())
}

fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn configure(matches: &ArgMatches) -> KanbanResult<()> {
    let mut config = load_config();
    let mut changed = false;

    if let Some(url) = matches.get_one::<String>("api-url") {
        config.api_url = Some(url.trim_end_matches('/').to_string());
        changed = true;
    }
    if let Some(project_id) = matches.get_one::<u64>("default-project") {
        config.default_project_id = Some(*project_id);
        changed = true;
    }

    if changed {
        save_config(&config)?;
        println!("{} Configuration saved", "✅".green());
        return Ok(());
    }

    println!(
        "{}: {}",
        "API URL".dimmed(),
        config.api_url.as_deref().unwrap_or("(default)")
    );
    println!(
        "{}: {}",
        "Token".dimmed(),
        config
            .access_token
            .as_deref()
            .map(mask_token)
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!(
        "{}: {}",
        "Default project".dimmed(),
        config
            .default_project_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("short"), "*****");
        assert_eq!(mask_token("eyJhbGciOiJIUzI1NiJ9.payload"), "eyJhbG...load");
    }
}
