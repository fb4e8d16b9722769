use std::fs::File;
use std::sync::Arc;

use askbox::api::HttpGateway;
use askbox::core::config::{self, ResolvedConfig};
use askbox::core::{Action, NavigationController, Page};
use askbox::view::{Document, FormId};
use clap::{Parser, Subcommand};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "askbox", about = "Browse and post questions on a Q&A API")]
struct Args {
    /// API base URL, e.g. http://localhost:3000/api/v1
    #[arg(long)]
    base_url: Option<String>,

    /// Sign in with the configured credentials before running the command
    #[arg(long)]
    login: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the question index
    List,
    /// Show one question with its answers
    Show { id: String },
    /// Post a new question
    Ask {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
    },
    /// Change a question's title and/or body
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
    },
    /// Create a session
    Login {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to askbox.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("askbox.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config()?;
    let resolved = config::resolve(&file_config, args.base_url.as_deref());
    log::info!("askbox starting against {}", resolved.base_url);

    let gateway = Arc::new(HttpGateway::new(resolved.base_url.clone())?);
    let mut ctl = NavigationController::new(Document::standard(), gateway, resolved.race_policy)?;

    if args.login && !matches!(args.command, Command::Login { .. }) {
        sign_in(&mut ctl, &resolved, None, None).await?;
    }

    match args.command {
        Command::List => ctl.navigate(Page::QuestionIndex)?,
        Command::Show { id } => ctl.dispatch(Action::QuestionLinkClicked { data_id: id })?,
        Command::Ask { title, body } => {
            ctl.navigate(Page::QuestionNew)?;
            let doc = ctl.document_mut();
            doc.set_field(FormId::NewQuestion, "title", &title)?;
            doc.set_field(FormId::NewQuestion, "body", &body)?;
            ctl.dispatch(Action::NewQuestionSubmitted)?;
        }
        Command::Edit { id, title, body } => {
            ctl.dispatch(Action::EditLinkClicked { data_id: id })?;
            ctl.settle().await?;
            if ctl.app().active_page() == Page::QuestionEdit {
                let doc = ctl.document_mut();
                if let Some(title) = title {
                    doc.set_field(FormId::EditQuestion, "title", &title)?;
                }
                if let Some(body) = body {
                    doc.set_field(FormId::EditQuestion, "body", &body)?;
                }
                ctl.dispatch(Action::EditQuestionSubmitted)?;
            }
        }
        Command::Login { email, password } => {
            sign_in(&mut ctl, &resolved, email, password).await?;
        }
    }
    ctl.settle().await?;

    println!("{}", ctl.visible_html()?);
    if let Some(notice) = &ctl.app().notice {
        return Err(notice.message.clone().into());
    }
    Ok(())
}

/// Fills the login form (flags first, then config) and submits it.
async fn sign_in(
    ctl: &mut NavigationController,
    config: &ResolvedConfig,
    email: Option<String>,
    password: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let email = email
        .or_else(|| config.email.clone())
        .ok_or("no email given (use --email, ASKBOX_EMAIL or [session] email)")?;
    let password = password
        .or_else(|| config.password.clone())
        .ok_or("no password given (use --password, ASKBOX_PASSWORD or [session] password)")?;

    ctl.navigate(Page::SessionNew)?;
    let doc = ctl.document_mut();
    doc.set_field(FormId::Login, "email", &email)?;
    doc.set_field(FormId::Login, "password", &password)?;
    ctl.dispatch(Action::LoginSubmitted)?;
    ctl.settle().await?;
    Ok(())
}
