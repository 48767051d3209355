use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use miniq::command::{self, Command, Output};
use miniq::config::ClientConfig;
use miniq::protocol::QueueClient;

#[derive(Parser, Debug)]
#[command(name = "miniq")]
#[command(version)]
#[command(about = "Command-line client for the miniq cluster job queue")]
struct Args {
    /// Give up if connecting or awaiting the reply takes longer than this
    #[arg(long, value_name = "SECS", global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Submit a script to the queue
    Submit {
        /// Path to the script to run
        script: PathBuf,

        /// Requested runtime in minutes
        #[arg(short = 't', value_name = "MINUTES",
              value_parser = clap::value_parser!(u32).range(1..))]
        minutes: u32,

        /// Number of nodes to run on
        #[arg(short = 'n', value_name = "NUM_NODES",
              value_parser = clap::value_parser!(u32).range(1..))]
        num_nodes: u32,
    },

    /// Show the state of queued and running jobs
    Status {
        /// Restrict the query to a single job
        #[arg(long)]
        id: Option<u64>,
    },

    /// Delete a job from the queue
    Delete {
        /// Id of the job to delete
        id: u64,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn render(output: Output) {
    match output {
        Output::Raw(response) => println!("{response}"),
        Output::Jobs(jobs) => {
            for job in jobs {
                println!("{job}");
            }
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();
    let args = Args::parse();

    let mut config = ClientConfig::from_env();
    config.timeout = args.timeout.map(Duration::from_secs);

    let command = match args.command {
        Commands::Submit {
            script,
            minutes,
            num_nodes,
        } => Command::Submit {
            script,
            minutes,
            num_nodes,
        },
        Commands::Status { id } => Command::Status { id },
        Commands::Delete { id } => Command::Delete { id },
    };

    let client = QueueClient::new(config);
    match command::dispatch(&client, &command).await {
        Ok(output) => render(output),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
