//! CLI front — a thin driver over the stores, one subcommand per user
//! action. Interactive niceties (type-ahead, dialogs) live in the real UI;
//! this exists to exercise the client end-to-end against a live backend.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use client::admin::AdminStore;
use client::applications::{
    calendar, filter_and_sort, ApplicationFilter, ApplicationStore, SortField, SortOrder,
};
use client::auth::AuthStore;
use client::bookmarks::BookmarkStore;
use client::cv::upload::UploadStore;
use client::cv::CvStore;
use client::http::ApiClient;
use client::jobs::search::SearchHistory;
use client::jobs::{JobStore, SEARCH_PAGE_SIZE};
use client::models::{ApplicationEdit, NotificationType, APPLY_STATUS_OPTIONS};
use client::notifications::NotificationStore;
use client::Config;

#[derive(Parser)]
#[command(name = "client", about = "Jobscope service client", version)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Install an access token obtained from the sign-in flow
    Login { token: String },
    /// Sign out and wipe local state
    Logout,
    /// Delete the account
    Withdraw,
    /// Search job postings
    Search {
        keyword: String,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = SEARCH_PAGE_SIZE)]
        size: u32,
    },
    /// Show or edit the local search history
    History {
        /// Remove one entry instead of listing
        #[arg(long)]
        remove: Option<String>,
    },
    /// Bookmarked jobs
    #[command(subcommand)]
    Bookmarks(BookmarkCommand),
    /// Tracked applications
    #[command(subcommand)]
    Apply(ApplyCommand),
    /// In-app notifications
    #[command(subcommand)]
    Notifications(NotificationCommand),
    /// Uploaded CVs
    #[command(subcommand)]
    Cv(CvCommand),
    /// Admin dashboard reads
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand)]
enum BookmarkCommand {
    List,
    Add { job_id: i64 },
    Remove { job_id: i64 },
}

#[derive(Subcommand)]
enum ApplyCommand {
    List(ApplyListArgs),
    Add { job_id: i64 },
    Edit {
        job_id: i64,
        #[arg(long)]
        status: String,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        due: Option<String>,
    },
    Remove { job_id: i64 },
    /// Due-dated applications as calendar events
    Calendar,
}

#[derive(Args)]
struct ApplyListArgs {
    #[arg(long)]
    query: Option<String>,
    /// Repeatable status filter
    #[arg(long)]
    status: Vec<String>,
    #[arg(long, value_enum, default_value = "due")]
    sort: SortFieldArg,
    #[arg(long, value_enum, default_value = "desc")]
    order: SortOrderArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortFieldArg {
    Company,
    Title,
    Due,
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortOrderArg {
    Asc,
    Desc,
}

#[derive(Subcommand)]
enum NotificationCommand {
    List {
        #[arg(long, value_enum, default_value = "cv-match")]
        kind: KindArg,
        #[arg(long)]
        unread: bool,
    },
    Read { id: i64 },
    Delete { id: i64 },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    CvMatch,
    ApplyDue,
}

#[derive(Subcommand)]
enum CvCommand {
    List,
    /// Summarize a CV (defaults to the most recently uploaded)
    Summary {
        #[arg(long)]
        id: Option<i64>,
    },
    Upload {
        path: std::path::PathBuf,
        /// Object name; defaults to the file name
        #[arg(long)]
        name: Option<String>,
    },
    Delete { id: i64 },
    DeleteAll,
    Rename { old: String, new: String },
    DownloadUrl { name: String },
}

#[derive(Subcommand)]
enum AdminCommand {
    Plan,
    Status,
}

pub async fn run(cli: Cli, config: Config, client: ApiClient) -> Result<()> {
    match cli.command {
        Command::Login { token } => {
            AuthStore::new(client).set_tokens(Some(token));
            println!("signed in");
        }
        Command::Logout => {
            AuthStore::new(client).logout().await?;
            println!("signed out");
        }
        Command::Withdraw => {
            AuthStore::new(client).withdraw().await?;
            println!("account deleted");
        }
        Command::Search {
            keyword,
            page,
            size,
        } => {
            let jobs = JobStore::new(client).search(&keyword, page, size).await?;
            SearchHistory::new(&config.state_dir).record(&keyword)?;
            for job in &jobs {
                println!(
                    "#{:<6} {:<24} {}",
                    job.id,
                    job.company_name,
                    job.title
                );
            }
            println!("{} result(s)", jobs.len());
        }
        Command::History { remove } => {
            let history = SearchHistory::new(&config.state_dir);
            match remove {
                Some(query) => {
                    history.remove(&query)?;
                    println!("removed '{query}'");
                }
                None => {
                    for entry in history.entries() {
                        println!("{entry}");
                    }
                }
            }
        }
        Command::Bookmarks(command) => run_bookmarks(command, client).await?,
        Command::Apply(command) => run_apply(command, client).await?,
        Command::Notifications(command) => run_notifications(command, client).await?,
        Command::Cv(command) => run_cv(command, client).await?,
        Command::Admin(command) => run_admin(command, client).await?,
    }
    Ok(())
}

async fn run_bookmarks(command: BookmarkCommand, client: ApiClient) -> Result<()> {
    let store = BookmarkStore::new(client.clone());
    match command {
        BookmarkCommand::List => {
            for job in store.fetch().await? {
                println!("#{:<6} {:<24} {}", job.id, job.company_name, job.title);
            }
        }
        BookmarkCommand::Add { job_id } => {
            let jobs = JobStore::new(client).batch(&[job_id]).await?;
            let job = jobs
                .first()
                .with_context(|| format!("job {job_id} not found"))?;
            store.add(job).await?;
            println!("bookmarked #{job_id}");
        }
        BookmarkCommand::Remove { job_id } => {
            store.remove(job_id).await?;
            println!("removed bookmark #{job_id}");
        }
    }
    Ok(())
}

async fn run_apply(command: ApplyCommand, client: ApiClient) -> Result<()> {
    let store = ApplicationStore::new(client);
    match command {
        ApplyCommand::List(args) => {
            let applications = store.fetch().await?;
            let filter = ApplicationFilter {
                query: args.query,
                statuses: args.status,
                sort_field: match args.sort {
                    SortFieldArg::Company => SortField::CompanyName,
                    SortFieldArg::Title => SortField::JobTitle,
                    SortFieldArg::Due => SortField::ApplyDueDate,
                    SortFieldArg::Status => SortField::ApplyStatus,
                },
                sort_order: match args.order {
                    SortOrderArg::Asc => SortOrder::Asc,
                    SortOrderArg::Desc => SortOrder::Desc,
                },
            };
            for app in filter_and_sort(&applications, &filter) {
                println!(
                    "#{:<6} {:<24} {:<28} {:<16} due {}",
                    app.job_id,
                    app.company_name,
                    app.job_title,
                    app.apply_status,
                    app.apply_due_date.as_deref().unwrap_or("-")
                );
            }
        }
        ApplyCommand::Add { job_id } => {
            store.apply(job_id).await?;
            println!("tracking application for #{job_id}");
        }
        ApplyCommand::Edit {
            job_id,
            status,
            note,
            due,
        } => {
            if !APPLY_STATUS_OPTIONS.contains(&status.as_str()) {
                anyhow::bail!(
                    "unknown status '{status}' (expected one of {})",
                    APPLY_STATUS_OPTIONS.join(", ")
                );
            }
            store
                .edit(
                    job_id,
                    &ApplicationEdit {
                        apply_status: status,
                        note,
                        apply_due_date: due,
                    },
                )
                .await?;
            println!("updated application for #{job_id}");
        }
        ApplyCommand::Remove { job_id } => {
            store.delete(job_id).await?;
            println!("stopped tracking #{job_id}");
        }
        ApplyCommand::Calendar => {
            let applications = store.fetch().await?;
            for event in calendar::due_events(&applications) {
                println!(
                    "{}  {:<24} {} [{}]",
                    event.start, event.company_name, event.title, event.apply_status
                );
            }
        }
    }
    Ok(())
}

async fn run_notifications(command: NotificationCommand, client: ApiClient) -> Result<()> {
    let store = NotificationStore::new(client);
    match command {
        NotificationCommand::List { kind, unread } => {
            let kind = match kind {
                KindArg::CvMatch => NotificationType::CvMatch,
                KindArg::ApplyDue => NotificationType::ApplyDue,
            };
            for notification in store.fetch(kind, unread).await? {
                let marker = if notification.read { " " } else { "*" };
                println!(
                    "{marker} #{:<6} {}  {}",
                    notification.id,
                    notification.sent_at.split('T').next().unwrap_or(""),
                    notification.alarm_text
                );
            }
        }
        NotificationCommand::Read { id } => {
            store.mark_read(id).await?;
            println!("marked #{id} read");
        }
        NotificationCommand::Delete { id } => {
            store.delete(id).await?;
            println!("deleted #{id}");
        }
    }
    Ok(())
}

async fn run_cv(command: CvCommand, client: ApiClient) -> Result<()> {
    let store = CvStore::new(client.clone());
    let uploads = UploadStore::new(client);
    match command {
        CvCommand::List => {
            for cv in store.fetch().await? {
                println!("#{:<4} {:<32} uploaded {}", cv.id, cv.file_name, cv.uploaded_at);
            }
        }
        CvCommand::Summary { id } => {
            let cv_id = match id {
                Some(id) => id,
                None => store.select_latest().await?,
            };
            println!("{}", store.summary(cv_id).await?);
        }
        CvCommand::Upload { path, name } => {
            let data = std::fs::read(&path)
                .with_context(|| format!("could not read {}", path.display()))?;
            let name = match name {
                Some(name) => name,
                None => path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .context("path has no file name")?,
            };
            uploads.upload(&name, "application/pdf", data).await?;
            println!("uploaded '{name}'");
        }
        CvCommand::Delete { id } => {
            store.delete(id).await?;
            println!("deleted CV #{id}");
        }
        CvCommand::DeleteAll => {
            store.delete_all().await?;
            println!("deleted all CVs");
        }
        CvCommand::Rename { old, new } => {
            let renamed = uploads.rename(&old, &new).await?;
            println!("renamed to '{renamed}'");
        }
        CvCommand::DownloadUrl { name } => {
            println!("{}", uploads.presigned_download_url(&name).await?);
        }
    }
    Ok(())
}

async fn run_admin(command: AdminCommand, client: ApiClient) -> Result<()> {
    let store = AdminStore::new(client);
    match command {
        AdminCommand::Plan => {
            let plan = store.plan_distribution().await?;
            println!("starter    {:>8.1}", plan.starter);
            println!("basic      {:>8.1}", plan.basic);
            println!("enterprise {:>8.1}", plan.enterprise);
        }
        AdminCommand::Status => {
            for server in store.server_status().await? {
                println!(
                    "{:<20} {} uptime {:>6.2}%  {:>6.0}ms",
                    server.name,
                    if server.up { "up  " } else { "DOWN" },
                    server.uptime,
                    server.response_time
                );
            }
        }
    }
    Ok(())
}
