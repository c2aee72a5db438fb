use anyhow::Result;
use clap::Parser;
use eapi::api::{DEFAULT_LIMIT, Page};
use eapi::commands::{self, ConnectOptions, agents, deploy, messages, tasks};
use eapi::config::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_MS};

/// eapi - Enterprise API client
///
/// Register agents, assign tasks and fetch results from an Enterprise API server.
///
/// The base URL and API key can also be supplied through the EAPI_BASE_URL and
/// EAPI_API_KEY environment variables.
///
/// Examples:
///   eapi agents register research_agent_001 research
///   eapi tasks assign research_agent_001 "Analyze sentiment" --data '{"text":"great"}'
///   eapi results get research_agent_001
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the API, e.g. https://api.example.com/v1
    #[arg(long, env = "EAPI_BASE_URL", value_name = "URL", global = true)]
    base_url: Option<String>,

    /// API key sent as a bearer token
    #[arg(
        long,
        env = "EAPI_API_KEY",
        value_name = "KEY",
        hide_env_values = true,
        global = true
    )]
    api_key: Option<String>,

    /// Per-attempt timeout in milliseconds
    #[arg(long, env = "EAPI_TIMEOUT_MS", value_name = "MS", default_value_t = DEFAULT_TIMEOUT_MS, global = true)]
    timeout_ms: u64,

    /// Retries for GET/DELETE (and for POST/PUT with --retry) on network failures
    #[arg(long, env = "EAPI_MAX_RETRIES", value_name = "N", default_value_t = DEFAULT_MAX_RETRIES, global = true)]
    max_retries: usize,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Manage agents
    #[command(subcommand)]
    Agents(AgentsCommand),

    /// Manage tasks
    #[command(subcommand)]
    Tasks(TasksCommand),

    /// Fetch agent results
    #[command(subcommand)]
    Results(ResultsCommand),

    /// Manage deployments
    #[command(subcommand)]
    Deploy(DeployCommand),

    /// Manage agent status records
    #[command(subcommand)]
    Status(StatusCommand),

    /// Manage queue messages
    #[command(subcommand)]
    Messages(MessagesCommand),

    /// Send an arbitrary request
    Request(RequestArgs),
}

#[derive(clap::Subcommand, Debug)]
enum AgentsCommand {
    /// Register a new agent
    Register {
        #[arg(value_name = "ID")]
        agent_id: String,
        #[arg(value_name = "TYPE")]
        agent_type: String,
    },
}

#[derive(clap::Subcommand, Debug)]
enum TasksCommand {
    /// Assign a task to an agent
    Assign {
        #[arg(value_name = "AGENT_ID")]
        agent_id: String,
        #[arg(value_name = "DESCRIPTION")]
        description: String,
        /// Task data as a JSON document
        #[arg(long, value_name = "JSON")]
        data: Option<String>,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ResultsCommand {
    /// Fetch the results produced by an agent
    Get {
        #[arg(value_name = "AGENT_ID")]
        agent_id: String,
    },
}

#[derive(clap::Args, Debug)]
struct PageArgs {
    /// Maximum number of items to return
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: u32,
    /// Number of items to skip
    #[arg(long, default_value_t = 0)]
    offset: u32,
}

impl From<PageArgs> for Page {
    fn from(args: PageArgs) -> Self {
        Page {
            limit: args.limit,
            offset: args.offset,
        }
    }
}

#[derive(clap::Subcommand, Debug)]
enum DeployCommand {
    /// List deployments
    List(PageArgs),
    /// Create a deployment from a JSON document
    Create {
        #[arg(value_name = "JSON")]
        data: String,
    },
}

#[derive(clap::Subcommand, Debug)]
enum StatusCommand {
    /// Show an agent's status
    Get {
        #[arg(value_name = "AGENT_ID")]
        agent_id: String,
    },
    /// Replace an agent's status with a JSON document
    Update {
        #[arg(value_name = "AGENT_ID")]
        agent_id: String,
        #[arg(value_name = "JSON")]
        data: String,
    },
    /// Delete an agent's status
    Delete {
        #[arg(value_name = "AGENT_ID")]
        agent_id: String,
    },
}

#[derive(clap::Subcommand, Debug)]
enum MessagesCommand {
    /// List queued messages
    List(PageArgs),
    /// Queue a message from a JSON document
    Create {
        #[arg(value_name = "JSON")]
        data: String,
    },
}

#[derive(clap::Args, Debug)]
struct RequestArgs {
    /// GET, POST, PUT or DELETE
    #[arg(value_name = "METHOD")]
    method: String,
    /// Path beginning with '/'
    #[arg(value_name = "PATH")]
    path: String,
    /// JSON request body
    #[arg(long, value_name = "JSON")]
    body: Option<String>,
    /// Also retry POST/PUT on network failures
    #[arg(long)]
    retry: bool,
}

impl Cli {
    fn connect_options(&self) -> Result<ConnectOptions> {
        let base_url = self
            .base_url
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No base URL given. Use --base-url or EAPI_BASE_URL."))?;
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No API key given. Use --api-key or EAPI_API_KEY."))?;

        let mut options = ConnectOptions::new(base_url, api_key);
        options.timeout_ms = self.timeout_ms;
        options.max_retries = self.max_retries;
        Ok(options)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let client = commands::connect(&cli.connect_options()?)?;

    let value = match cli.command {
        Commands::Agents(AgentsCommand::Register {
            agent_id,
            agent_type,
        }) => agents::register(&client, &agent_id, &agent_type).await?,
        Commands::Tasks(TasksCommand::Assign {
            agent_id,
            description,
            data,
        }) => tasks::assign(&client, &agent_id, &description, data.as_deref()).await?,
        Commands::Results(ResultsCommand::Get { agent_id }) => {
            agents::results(&client, &agent_id).await?
        }
        Commands::Deploy(DeployCommand::List(page)) => {
            deploy::list_deployments(&client, page.into()).await?
        }
        Commands::Deploy(DeployCommand::Create { data }) => {
            deploy::create_deployment(&client, &data).await?
        }
        Commands::Status(StatusCommand::Get { agent_id }) => {
            agents::status(&client, &agent_id).await?
        }
        Commands::Status(StatusCommand::Update { agent_id, data }) => {
            agents::update_status(&client, &agent_id, &data).await?
        }
        Commands::Status(StatusCommand::Delete { agent_id }) => {
            agents::delete_status(&client, &agent_id).await?
        }
        Commands::Messages(MessagesCommand::List(page)) => {
            messages::list_messages(&client, page.into()).await?
        }
        Commands::Messages(MessagesCommand::Create { data }) => {
            messages::create_message(&client, &data).await?
        }
        Commands::Request(args) => {
            commands::request::request(
                &client,
                &args.method,
                &args.path,
                args.body.as_deref(),
                args.retry,
            )
            .await?
        }
    };

    commands::write_json(&mut std::io::stdout().lock(), &value)
}
