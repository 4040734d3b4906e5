use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    load_settings, load_settings_from, ClientSettings, Completion, DiagramClient,
    HttpDiagramClient, ParameterField, ParameterModel, SelectionController,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod events;

use commands::{parse_command, ReplCommand, HELP};

#[derive(Parser, Debug)]
#[command(about = "Fretboard scale and chord diagrams from a scalemate server")]
struct Cli {
    /// Overrides the configured server, e.g. http://127.0.0.1:8080
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Config file (defaults to ./scalemate.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Edit parameters line by line and watch the diagram follow.
    Interactive(QueryArgs),
    /// Fetch one diagram and write it to a file.
    Render {
        #[command(flatten)]
        query: QueryArgs,
        #[arg(long, default_value = "scale.png")]
        output: PathBuf,
        /// Use the image-only endpoint (no chord list).
        #[arg(long = "static")]
        static_image: bool,
    },
    /// Print the image URL for static embedding.
    StaticUrl(QueryArgs),
}

#[derive(Args, Debug, Default)]
struct QueryArgs {
    #[arg(long)]
    root: Option<String>,
    #[arg(long)]
    scale: Option<String>,
    /// Notes separated by whitespace, e.g. "E A D G B E"
    #[arg(long)]
    tuning: Option<String>,
    #[arg(long)]
    frets: Option<String>,
    /// Chord to highlight, e.g. Amin7
    #[arg(long)]
    chord: Option<String>,
}

impl QueryArgs {
    fn overrides(&self) -> Vec<(ParameterField, &str)> {
        [
            (ParameterField::Root, &self.root),
            (ParameterField::ScaleType, &self.scale),
            (ParameterField::Tuning, &self.tuning),
            (ParameterField::Frets, &self.frets),
            (ParameterField::ChordFilter, &self.chord),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|value| (field, value)))
        .collect()
    }

    /// Settings defaults with the command-line values applied on top.
    fn model(&self, settings: &ClientSettings) -> Result<ParameterModel> {
        let mut model = ParameterModel::new(settings.initial_query()?);
        for (field, value) in self.overrides() {
            model
                .update(field, value)
                .with_context(|| format!("invalid --{field}"))?;
        }
        Ok(model)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => load_settings_from(path),
        None => load_settings(),
    };
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    let client = Arc::new(HttpDiagramClient::from_settings(&settings)?);
    info!(server_url = %settings.server_url, "using diagram server");

    match cli
        .command
        .unwrap_or_else(|| Command::Interactive(QueryArgs::default()))
    {
        Command::Interactive(query) => {
            run_interactive(query.model(&settings)?, client).await
        }
        Command::Render {
            query,
            output,
            static_image,
        } => {
            let model = query.model(&settings)?;
            if static_image {
                let bytes = client.fetch_static_image(&model.current_query()).await?;
                write_diagram(&output, &bytes).await
            } else {
                render_once(model, client, &output).await
            }
        }
        Command::StaticUrl(query) => {
            let model = query.model(&settings)?;
            println!("{}", client.static_image_url(&model.current_query()));
            Ok(())
        }
    }
}

async fn write_diagram(path: &Path, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("failed to write diagram to {}", path.display()))?;
    println!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

async fn render_once(
    model: ParameterModel,
    client: Arc<HttpDiagramClient>,
    output: &Path,
) -> Result<()> {
    let mut controller = SelectionController::new(model, client as Arc<dyn DiagramClient>);
    controller.refresh();

    for completion in controller.settle().await {
        if let Completion::Failed { error, .. } = completion {
            return Err(anyhow!(events::describe_failure(&error)));
        }
    }

    let diagram = controller
        .ui()
        .diagram()
        .ok_or_else(|| anyhow!("no diagram was received"))?;
    write_diagram(output, diagram).await?;
    println!(
        "chords: {}",
        controller.ui().chord_options().options().join(" ")
    );
    Ok(())
}

async fn run_interactive(model: ParameterModel, client: Arc<HttpDiagramClient>) -> Result<()> {
    let mut controller = SelectionController::new(model, client as Arc<dyn DiagramClient>);
    let mut event_rx = controller.subscribe_events();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    controller.refresh();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(ReplCommand::Quit)) => break,
                    Ok(Some(ReplCommand::Help)) => println!("{HELP}"),
                    Ok(Some(ReplCommand::Show)) => {
                        let query = controller.current_query();
                        println!(
                            "{} | tuning {} | {} frets | chord {} | state {:?}",
                            query.title(),
                            query.tuning,
                            query.frets,
                            query.chord_filter,
                            controller.state()
                        );
                        println!(
                            "chords: {}",
                            controller.ui().chord_options().options().join(" ")
                        );
                    }
                    Ok(Some(ReplCommand::Save(path))) => match controller.ui().diagram() {
                        Some(diagram) => write_diagram(Path::new(&path), diagram).await?,
                        None => println!("no diagram yet"),
                    },
                    Ok(Some(ReplCommand::Set { field, value })) => {
                        if let Err(err) = controller.update(field, &value) {
                            println!("rejected: {err}");
                        }
                    }
                    Err(message) => println!("{message}"),
                }
            }
            Some(_) = controller.next_completion(), if controller.has_in_flight() => {}
        }

        while let Ok(event) = event_rx.try_recv() {
            println!("{}", events::render_event(&event));
        }
    }

    Ok(())
}
