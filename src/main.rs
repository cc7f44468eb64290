use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use fedctl::api::coach::CoachMembershipActions;
use fedctl::api::partner::PartnerMembershipActions;
use fedctl::api::payments::parse_amount;
use fedctl::api::ApiClient;
use fedctl::config::{self, FedConfig};
use fedctl::filter::{self, FilterCriteria};
use fedctl::models::PaymentIntentRequest;
use fedctl::output::{json as json_out, table};
use fedctl::summary::{CourtStats, SessionStats, StudentStats};
use fedctl::Store;

#[derive(Parser)]
#[command(name = "fedctl", version, about = "Federation membership client — sessions, students, courts and memberships")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// API base URL (default: VITE_API_URL, then config, then http://localhost:3000)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token (default: FEDCTL_TOKEN, then config)
    #[arg(long, global = true)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List coaching sessions
    Sessions {
        /// Filter by status (scheduled, completed, cancelled, all)
        #[arg(long)]
        status: Option<String>,

        /// Filter by level
        #[arg(long)]
        level: Option<String>,

        /// Filter by date range start (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Filter by date range end (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Search by player name (case-insensitive)
        #[arg(long)]
        search: Option<String>,

        /// Only print the header stats
        #[arg(long)]
        stats: bool,
    },

    /// List students
    Students {
        /// Filter by level
        #[arg(long)]
        level: Option<String>,

        /// Joined on or after (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Joined on or before (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Search by name (case-insensitive)
        #[arg(long)]
        search: Option<String>,
    },

    /// List courts
    Courts {
        /// Filter by status (available, maintenance, all)
        #[arg(long)]
        status: Option<String>,

        /// Filter by surface
        #[arg(long)]
        surface: Option<String>,

        /// Search by court name
        #[arg(long)]
        search: Option<String>,
    },

    /// Show the dashboard for the authenticated user
    Dashboard,

    /// Manage the coach membership
    Coach {
        #[command(subcommand)]
        action: CoachAction,
    },

    /// Manage the partner membership
    Partner {
        #[command(subcommand)]
        action: PartnerAction,
    },

    /// Create a payment intent and print its client secret
    Pay {
        /// Amount, e.g. 49.90
        #[arg(long)]
        amount: String,

        /// ISO currency code
        #[arg(long, default_value = "mxn")]
        currency: String,

        /// Plan being paid for
        #[arg(long)]
        plan: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Upload a profile photo
    Upload {
        /// Image file (jpg, png, webp)
        path: PathBuf,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum CoachAction {
    /// Show the current membership
    Show,
    /// Subscribe to a plan
    Subscribe {
        #[arg(long)]
        plan: String,
        /// Saved payment method id from the card widget
        #[arg(long)]
        payment_method: Option<String>,
    },
    /// Cancel the membership
    Cancel {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Renew the membership now
    Renew,
    /// Replace the payment method
    PaymentMethod {
        /// Payment method id from the card widget
        id: String,
    },
}

#[derive(Subcommand)]
enum PartnerAction {
    /// Show the current membership
    Show,
    /// Subscribe to a plan
    Subscribe {
        #[arg(long)]
        plan: String,
    },
    /// Cancel the membership
    Cancel {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Switch to another plan
    ChangePlan {
        #[arg(long)]
        plan: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a config template to ~/.fedctl/config.toml
    Init,
    /// Print the config with secrets redacted
    Show,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let json_output = cli.json;

    if let Commands::Config { action } = &cli.command {
        return run_config(action);
    }

    let cfg = FedConfig::load()?;
    let base_url = config::resolve_base_url(cli.api_url.as_deref(), &cfg.api);
    let token = config::resolve_token(cli.token.as_deref(), &cfg.api)?;
    if token.is_none() {
        tracing::warn!("No token configured; requests will be unauthenticated");
    }
    let client = ApiClient::new(base_url, token);
    let mut store = Store::new();

    match cli.command {
        Commands::Sessions {
            status,
            level,
            from,
            to,
            search,
            stats,
        } => {
            let criteria = FilterCriteria::from_bounds(from, to, search)?
                .with_optional_category("status", status)
                .with_optional_category("level", level);

            let sessions = store
                .sessions
                .fetch(|| client.coach_sessions())
                .map_err(retry_hint)?;
            let header = SessionStats::compute(sessions);
            let visible = filter::apply(sessions, &criteria);

            if json_output {
                let items = (!stats).then_some(visible.as_slice());
                json_out::print_list("sessions", items, &header)?;
            } else {
                table::print_session_stats(&header);
                if !stats {
                    table::print_sessions(&visible);
                }
            }
        }

        Commands::Students {
            level,
            from,
            to,
            search,
        } => {
            let criteria = FilterCriteria::from_bounds(from, to, search)?.with_optional_category("level", level);

            // the active count needs every session, not just a filtered view
            store
                .sessions
                .fetch(|| client.coach_sessions())
                .map_err(retry_hint)?;
            store
                .students
                .fetch(|| client.coach_students())
                .map_err(retry_hint)?;
            let students = store.students.data().map(Vec::as_slice).unwrap_or(&[]);
            let today = chrono::Local::now().date_naive();
            let header = StudentStats::compute(students, store.session_list(), today);
            let visible = filter::apply(students, &criteria);

            if json_output {
                json_out::print_list("students", Some(visible.as_slice()), &header)?;
            } else {
                table::print_student_stats(&header);
                table::print_students(&visible);
            }
        }

        Commands::Courts {
            status,
            surface,
            search,
        } => {
            let criteria = FilterCriteria::from_bounds(None, None, search)?
                .with_optional_category("status", status)
                .with_optional_category("surface", surface);

            let courts = store
                .courts
                .fetch(|| client.courts())
                .map_err(retry_hint)?;
            let header = CourtStats::compute(courts);
            let visible = filter::apply(courts, &criteria);

            if json_output {
                json_out::print_list("courts", Some(visible.as_slice()), &header)?;
            } else {
                table::print_court_stats(&header);
                table::print_courts(&visible);
            }
        }

        Commands::Dashboard => {
            let d = store
                .dashboard
                .fetch(|| client.dashboard())
                .map_err(retry_hint)?;
            if json_output {
                json_out::print_json(d)?;
            } else {
                table::print_dashboard(d);
            }
        }

        Commands::Coach { action } => {
            let mut actions = CoachMembershipActions::new(&client, &mut store.coach_membership);
            let result = match action {
                CoachAction::Show => actions.fetch(),
                CoachAction::Subscribe {
                    plan,
                    payment_method,
                } => actions.subscribe(&plan, payment_method.as_deref()),
                CoachAction::Cancel { force } => {
                    if !force && !confirm("Cancel your coach membership?")? {
                        println!("Cancelled.");
                        return Ok(());
                    }
                    actions.cancel()
                }
                CoachAction::Renew => actions.renew(),
                CoachAction::PaymentMethod { id } => actions.update_payment_method(&id),
            };
            let m = result.map_err(|e| anyhow!("{e}"))?;
            if json_output {
                json_out::print_json(m)?;
            } else {
                table::print_coach_membership(m);
            }
        }

        Commands::Partner { action } => {
            let mut actions =
                PartnerMembershipActions::new(&client, &mut store.partner_membership);
            let result = match action {
                PartnerAction::Show => actions.fetch(),
                PartnerAction::Subscribe { plan } => actions.subscribe(&plan),
                PartnerAction::Cancel { force } => {
                    if !force && !confirm("Cancel your partner membership?")? {
                        println!("Cancelled.");
                        return Ok(());
                    }
                    actions.cancel()
                }
                PartnerAction::ChangePlan { plan } => {
                    // plan changes are checked against the current membership
                    if let Err(e) = actions.fetch() {
                        bail!("{e}");
                    }
                    actions.change_plan(&plan)
                }
            };
            let m = result.map_err(|e| anyhow!("{e}"))?;
            if json_output {
                json_out::print_json(m)?;
            } else {
                table::print_partner_membership(m);
            }
        }

        Commands::Pay {
            amount,
            currency,
            plan,
            description,
        } => {
            let req = PaymentIntentRequest {
                amount: parse_amount(&amount).map_err(|e| anyhow!(e.user_message()))?,
                currency,
                plan,
                description,
            };
            let intent = client
                .create_payment_intent(&req)
                .map_err(|e| anyhow!(e.user_message()))?;
            let public_key = config::resolve_stripe_key(&cfg.api);

            if json_output {
                json_out::print_json(&serde_json::json!({
                    "client_secret": intent.client_secret,
                    "payment_intent": intent.id,
                    "public_key": public_key,
                }))?;
            } else {
                println!("Payment intent created.");
                println!("  Client secret: {}", intent.client_secret);
                match public_key {
                    Some(k) => println!("  Public key:    {k}"),
                    None => println!(
                        "  Public key:    (set {} to confirm with the card widget)",
                        config::STRIPE_KEY_ENV
                    ),
                }
            }
        }

        Commands::Upload { path } => {
            let uploaded = client
                .upload_profile_photo(&path)
                .map_err(|e| anyhow!(e.user_message()))?;
            if json_output {
                json_out::print_json(&uploaded)?;
            } else {
                println!("Uploaded: {}", uploaded.url);
            }
        }

        Commands::Config { .. } => unreachable!("handled before loading config"),
    }

    Ok(())
}

fn run_config(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = config::config_path()?;
            if config::init_config()? {
                println!("Wrote {}", path.display());
            } else {
                println!("Config already exists: {}", path.display());
            }
        }
        ConfigAction::Show => {
            let cfg = FedConfig::load()?;
            println!("{}", cfg.display_redacted());
        }
    }
    Ok(())
}

fn retry_hint(message: &str) -> anyhow::Error {
    anyhow!("{message}\nRun the command again to retry.")
}

fn confirm(question: &str) -> Result<bool> {
    eprint!("{question} [y/N] ");
    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}
