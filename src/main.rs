use std::future::Future;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressFinish, ProgressStyle};
use log::LevelFilter;
use serde::Serialize;
use simple_logger::SimpleLogger;
use tokio::runtime::Runtime;

use safebooru::api::{Comments, Posts, Tags};
use safebooru::cli::{Action, Cli, Parser};
use safebooru::Safebooru;

const SPINNER_FINISH_MODE: ProgressFinish = ProgressFinish::AndClear;
const SPINNER_TICK_SECS: f32 = 0.1;

#[inline]
fn build_spinner() -> ProgressBar {
    ProgressBar::new_spinner()
        .with_finish(SPINNER_FINISH_MODE)
        .with_style(
            ProgressStyle::with_template("{spinner:.blue} {msg}")
                .unwrap()
                // NOTE: use `ascii` only, because cmd/powershell maybe not support unicode.
                .tick_strings(&[".  ", ".. ", "...", " ..", "  .", "   "]),
        )
}

#[inline]
fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Await `future` while a spinner shows `msg`.
async fn with_spinner<T>(msg: &'static str, future: impl Future<Output = T>) -> T {
    let spinner = build_spinner();
    spinner.set_message(msg);
    spinner.enable_steady_tick(Duration::from_secs_f32(SPINNER_TICK_SECS));
    let output = future.await;
    spinner.finish();
    output
}

#[inline]
fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn async_main(sb: Safebooru, action: Action) -> anyhow::Result<()> {
    match action {
        Action::Random => {
            let id = with_spinner("Waiting for the random post redirect...", sb.random_id())
                .await
                .context("failed to get a random post id")?;
            println!("{id}");
        }
        Action::Post { id } => {
            let posts = with_spinner("Fetching post...", sb.json_from(&Posts::new().with_id(id)))
                .await
                .with_context(|| format!("failed to fetch post {id}"))?;
            print_json(&posts)?;
        }
        Action::Posts { tags, limit, pid } => {
            let query = Posts::new().with_tags(tags).with_limit(limit).with_pid(pid);
            let posts = with_spinner("Fetching posts...", sb.json_from(&query))
                .await
                .context("failed to fetch posts")?;
            print_json(&posts)?;
        }
        Action::Tags { name, limit } => {
            let query = Tags::new().with_limit(limit);
            let query = match name {
                Some(name) => query.with_name(name),
                None => query,
            };
            let tags = with_spinner("Fetching tags...", sb.json_from(&query))
                .await
                .context("failed to fetch tags")?;
            print_json(&tags)?;
        }
        Action::Comments { post_id, all } => {
            let query = Comments::new(post_id.unwrap_or_default()).with_list_all(all);
            let comments = with_spinner("Fetching comments...", sb.json_from(&query))
                .await
                .context("failed to fetch comments")?;
            print_json(&comments)?;
        }
        Action::Download {
            id,
            tags,
            random,
            post_num,
            filename,
            directory,
        } => {
            let posts = match (id, tags) {
                (Some(id), _) => Posts::new().with_id(id),
                (None, Some(tags)) => Posts::new().with_tags(tags),
                (None, None) if random => {
                    let id = with_spinner("Waiting for the random post redirect...", sb.random_id())
                        .await
                        .context("failed to get a random post id")?;
                    Posts::new().with_id(id)
                }
                (None, None) => anyhow::bail!("one of `--id`, `--tags` or `--random` is required"),
            };

            let download = sb.download(&posts).post_num(post_num);
            let download = match &filename {
                Some(filename) => download.filename(filename),
                None => download,
            };
            let download = match &directory {
                Some(directory) => download.directory(directory),
                None => download,
            };
            let file_path = with_spinner("Downloading...", download.run())
                .await
                .context("failed to download the image")?;
            println!("{}", file_path.display());
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    SimpleLogger::new()
        .with_level(log_level(cli.verbose))
        .init()
        .context("failed to init logger")?;

    let config = cli.config.unwrap_or_default();
    let sb = Safebooru::build(&config).context("failed to build the http client")?;

    let runtime = Runtime::new().context("failed to build tokio runtime")?;
    runtime.block_on(async_main(sb, cli.action))?;

    Ok(ExitCode::SUCCESS)
}
